//! Attribute access for policy evaluation.

use crate::types::UserId;

/// Attribute set trait - every resource a policy can judge implements this
pub trait AttrSet: Send + Sync {
	/// Get a single string attribute
	fn get(&self, key: &str) -> Option<&str>;

	/// Identity of the owning user, if the resource has one
	fn owner_id(&self) -> Option<UserId> {
		None
	}
}

// vim: ts=4
