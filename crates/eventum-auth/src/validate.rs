//! Input validation for user registration

use regex::Regex;

use crate::prelude::*;

pub const USERNAME_MAX_LEN: usize = 150;

/// Returns the value of a required field, rejecting missing or blank input
pub fn required<'a>(field: &str, value: Option<&'a str>) -> ClResult<&'a str> {
	match value {
		None => Err(Error::field(field, "This field is required.")),
		Some(v) if v.trim().is_empty() => Err(Error::field(field, "This field may not be blank.")),
		Some(v) => Ok(v),
	}
}

/// Letters, digits and `@ . + - _`, at most 150 characters
pub fn validate_username(username: &str) -> ClResult<()> {
	let username_regex = Regex::new(r"^[\w.@+-]+$")
		.map_err(|e| Error::Internal(format!("username regex compilation failed: {}", e)))?;

	if username.chars().count() > USERNAME_MAX_LEN {
		return Err(Error::field(
			"username",
			format!("Ensure this field has no more than {} characters.", USERNAME_MAX_LEN),
		));
	}
	if !username_regex.is_match(username) {
		return Err(Error::field(
			"username",
			"Enter a valid username. This value may contain only letters, numbers, and @/./+/-/_ characters.",
		));
	}
	Ok(())
}

pub fn validate_email(email: &str) -> ClResult<()> {
	let email_regex = Regex::new(r"^[^@\s]+@[^@\s]+\.[^@\s.]+$")
		.map_err(|e| Error::Internal(format!("email regex compilation failed: {}", e)))?;

	if email_regex.is_match(email) {
		Ok(())
	} else {
		Err(Error::field("email", "Enter a valid email address."))
	}
}


// vim: ts=4
