//! User registration and token handlers

use axum::{Json, extract::State, http::StatusCode};
use serde::{Deserialize, Serialize};

use crate::prelude::*;
use crate::validate::{required, validate_email, validate_username};
use eventum_core::extract::{JsonBody, OptionalRequestId};
use eventum_types::auth_adapter::{CreateUserData, UserView};
use eventum_types::types::ApiResponse;

/// # POST /register_user/
#[derive(Debug, Deserialize)]
pub struct RegisterUserReq {
	username: Option<String>,
	password: Option<String>,
	email: Option<String>,
}

pub async fn post_register_user(
	State(app): State<App>,
	OptionalRequestId(req_id): OptionalRequestId,
	JsonBody(req): JsonBody<RegisterUserReq>,
) -> ClResult<(StatusCode, Json<ApiResponse<UserView>>)> {
	let username = required("username", req.username.as_deref())?;
	validate_username(username)?;
	let password = required("password", req.password.as_deref())?;
	let email = req.email.as_deref().map(str::trim).filter(|e| !e.is_empty());
	if let Some(email) = email {
		validate_email(email)?;
	}

	let user = app.auth_adapter.create_user(CreateUserData { username, password, email }).await?;

	info!(user_id = %user.id, username = %user.username, "POST /register_user/ - registered user");
	let response = ApiResponse::new(user).with_req_id(req_id.unwrap_or_default());
	Ok((StatusCode::CREATED, Json(response)))
}

/// # POST /api/token/
#[derive(Debug, Deserialize)]
pub struct TokenReq {
	username: Option<String>,
	password: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct TokenPair {
	pub access: Box<str>,
	pub refresh: Box<str>,
}

pub async fn post_token(
	State(app): State<App>,
	OptionalRequestId(req_id): OptionalRequestId,
	JsonBody(req): JsonBody<TokenReq>,
) -> ClResult<(StatusCode, Json<ApiResponse<TokenPair>>)> {
	let username = required("username", req.username.as_deref())?;
	let password = required("password", req.password.as_deref())?;

	match app.auth_adapter.check_user_password(username, password).await {
		Ok(login) => {
			info!(user = %login.username, "POST /api/token/ - issued token pair");
			let pair = TokenPair { access: login.access, refresh: login.refresh };
			let response = ApiResponse::new(pair).with_req_id(req_id.unwrap_or_default());
			Ok((StatusCode::OK, Json(response)))
		}
		Err(Error::Unauthorized) => {
			warn!(username = %username, "POST /api/token/ - invalid credentials");
			// Delay to slow down password guessing
			tokio::time::sleep(std::time::Duration::from_secs(1)).await;
			Err(Error::Unauthorized)
		}
		Err(err) => Err(err),
	}
}

/// # POST /api/token/refresh/
#[derive(Debug, Deserialize)]
pub struct RefreshReq {
	refresh: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct AccessTokenRes {
	pub access: Box<str>,
}

pub async fn post_token_refresh(
	State(app): State<App>,
	OptionalRequestId(req_id): OptionalRequestId,
	JsonBody(req): JsonBody<RefreshReq>,
) -> ClResult<(StatusCode, Json<ApiResponse<AccessTokenRes>>)> {
	let refresh = required("refresh", req.refresh.as_deref())?;

	let access = app.auth_adapter.refresh_access_token(refresh).await?;

	debug!("POST /api/token/refresh/ - refreshed access token");
	let response =
		ApiResponse::new(AccessTokenRes { access }).with_req_id(req_id.unwrap_or_default());
	Ok((StatusCode::OK, Json(response)))
}

// vim: ts=4
