//! Write policies for resources.
//!
//! Reads are public. Mutations are judged per object by a `WritePolicy`,
//! which sees the acting user and the attributes of the resource. The
//! policy is only consulted for resources that exist, so a missing object
//! surfaces as `NotFound` before any permission decision is made.

pub use eventum_types::abac::AttrSet;
use eventum_types::auth_adapter::AuthCtx;

use crate::prelude::*;

pub trait WritePolicy: Send + Sync {
	/// Returns true if `actor` may update or delete `object`
	fn can_write(&self, actor: &AuthCtx, object: &dyn AttrSet) -> bool;
}

/// Only the owner of a resource may modify it.
///
/// Ownership is decided on user ids, never on usernames.
#[derive(Debug, Default, Clone, Copy)]
pub struct OwnerPolicy;

impl WritePolicy for OwnerPolicy {
	fn can_write(&self, actor: &AuthCtx, object: &dyn AttrSet) -> bool {
		object.owner_id() == Some(actor.user_id)
	}
}

/// Fails with `PermissionDenied` unless the policy allows the write
pub fn check_write(
	policy: &dyn WritePolicy,
	actor: &AuthCtx,
	object: &dyn AttrSet,
	action: &str,
) -> ClResult<()> {
	if policy.can_write(actor, object) {
		Ok(())
	} else {
		warn!(
			subject = %actor.username,
			owner = ?object.get("owner"),
			action = action,
			"Write permission denied"
		);
		Err(Error::PermissionDenied)
	}
}


// vim: ts=4
