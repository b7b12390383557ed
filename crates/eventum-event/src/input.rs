//! Request bodies for event writes and their validation

use serde::Deserialize;

use crate::filter::parse_filter_date;
use crate::prelude::*;
use eventum_types::meta_adapter::{EVENT_NAME_MAX_LEN, UpdateEventData};

/// Writable event fields. `id`, `creator` and `attendees` in a body are ignored.
#[derive(Debug, Default, Deserialize)]
pub struct EventInput {
	#[serde(default)]
	pub name: Patch<String>,
	#[serde(default)]
	pub description: Patch<String>,
	#[serde(default)]
	pub start_date: Patch<String>,
	#[serde(default)]
	pub end_date: Patch<String>,
}

/// A fully validated set of writable fields
#[derive(Debug)]
pub struct ValidEvent {
	pub name: Box<str>,
	pub description: Box<str>,
	pub start_at: Timestamp,
	pub end_at: Timestamp,
}

impl From<ValidEvent> for UpdateEventData {
	fn from(event: ValidEvent) -> Self {
		UpdateEventData {
			name: Patch::Value(event.name),
			description: Patch::Value(event.description),
			start_at: Patch::Value(event.start_at),
			end_at: Patch::Value(event.end_at),
		}
	}
}

fn validate_name(value: &str) -> ClResult<Box<str>> {
	let value = value.trim();
	if value.is_empty() {
		return Err(Error::field("name", "This field may not be blank."));
	}
	if value.chars().count() > EVENT_NAME_MAX_LEN {
		return Err(Error::field(
			"name",
			format!("Ensure this field has no more than {} characters.", EVENT_NAME_MAX_LEN),
		));
	}
	Ok(value.into())
}

fn validate_description(value: &str) -> ClResult<Box<str>> {
	let value = value.trim();
	if value.is_empty() {
		return Err(Error::field("description", "This field may not be blank."));
	}
	Ok(value.into())
}

fn validate_date(field: &str, value: &str) -> ClResult<Timestamp> {
	parse_filter_date(value).ok_or_else(|| {
		Error::field(field, "Datetime has wrong format. Use YYYY-MM-DD or RFC 3339.")
	})
}

/// Value of a field that must be present and non-null
fn required<'a>(field: &str, value: &'a Patch<String>) -> ClResult<&'a str> {
	match value {
		Patch::Value(v) => Ok(v),
		Patch::Null => Err(Error::field(field, "This field may not be null.")),
		Patch::Undefined => Err(Error::field(field, "This field is required.")),
	}
}

/// Validates a field that may be omitted but not nulled
fn optional<T>(
	field: &str,
	value: &Patch<String>,
	validate: impl FnOnce(&str) -> ClResult<T>,
) -> ClResult<Patch<T>> {
	match value {
		Patch::Undefined => Ok(Patch::Undefined),
		Patch::Null => Err(Error::field(field, "This field may not be null.")),
		Patch::Value(v) => validate(v).map(Patch::Value),
	}
}

impl EventInput {
	/// Validation for create and full replace: every field is required
	pub fn validate_full(&self) -> ClResult<ValidEvent> {
		Ok(ValidEvent {
			name: validate_name(required("name", &self.name)?)?,
			description: validate_description(required("description", &self.description)?)?,
			start_at: validate_date("start_date", required("start_date", &self.start_date)?)?,
			end_at: validate_date("end_date", required("end_date", &self.end_date)?)?,
		})
	}

	/// Validation for partial updates: omitted fields stay untouched
	pub fn validate_partial(&self) -> ClResult<UpdateEventData> {
		Ok(UpdateEventData {
			name: optional("name", &self.name, validate_name)?,
			description: optional("description", &self.description, validate_description)?,
			start_at: optional("start_date", &self.start_date, |v| validate_date("start_date", v))?,
			end_at: optional("end_date", &self.end_date, |v| validate_date("end_date", v))?,
		})
	}
}


// vim: ts=4
