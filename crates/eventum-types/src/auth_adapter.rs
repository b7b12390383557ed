//! Adapter that manages and stores user accounts, credentials and tokens.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_with::skip_serializing_none;
use std::fmt::Debug;

use crate::prelude::*;

pub const ACCESS_TOKEN_EXPIRY: i64 = 3600;
pub const REFRESH_TOKEN_EXPIRY: i64 = 86400;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum TokenType {
	Access,
	Refresh,
}

/// JWT claims of access and refresh tokens
#[derive(Clone, Debug, Deserialize, Serialize)]
pub struct AccessToken<S> {
	pub sub: UserId,
	pub name: S,
	pub typ: TokenType,
	pub exp: Timestamp,
}

/// Context struct for an authenticated user
#[derive(Clone, Debug)]
pub struct AuthCtx {
	pub user_id: UserId,
	pub username: Box<str>,
}

/// Result of a successful password check
#[derive(Debug)]
pub struct AuthLogin {
	pub user_id: UserId,
	pub username: Box<str>,
	pub access: Box<str>,
	pub refresh: Box<str>,
}

/// Public view of a user account. The password hash is never part of it.
#[skip_serializing_none]
#[derive(Clone, Debug, Serialize)]
pub struct UserView {
	pub id: UserId,
	pub username: Box<str>,
	pub email: Option<Box<str>>,
}

/// Data needed to create a new user
#[derive(Debug)]
pub struct CreateUserData<'a> {
	pub username: &'a str,
	pub password: &'a str,
	pub email: Option<&'a str>,
}

#[async_trait]
pub trait AuthAdapter: Debug + Send + Sync {
	/// Validates an access token and returns the user context
	async fn validate_access_token(&self, token: &str) -> ClResult<AuthCtx>;

	/// Exchanges a refresh token for a new access token
	async fn refresh_access_token(&self, refresh_token: &str) -> ClResult<Box<str>>;

	/// Creates a user. A taken username is reported as a field error on `username`.
	async fn create_user(&self, data: CreateUserData<'_>) -> ClResult<UserView>;

	/// Checks the password and issues an access/refresh token pair
	async fn check_user_password(&self, username: &str, password: &str) -> ClResult<AuthLogin>;
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn test_access_token_claims() {
		let token = AccessToken {
			sub: UserId(7),
			name: "alice",
			typ: TokenType::Refresh,
			exp: Timestamp(1_700_000_000),
		};
		let json = serde_json::to_value(&token).unwrap();
		assert_eq!(json["sub"], 7);
		assert_eq!(json["name"], "alice");
		assert_eq!(json["typ"], "refresh");
		assert_eq!(json["exp"], 1_700_000_000);
	}

	#[test]
	fn test_user_view_has_no_password() {
		let user = UserView { id: UserId(1), username: "bob".into(), email: None };
		let json = serde_json::to_value(&user).unwrap();
		assert_eq!(json, serde_json::json!({ "id": 1, "username": "bob" }));
	}
}

// vim: ts=4
