//! Custom middlewares

use axum::{
	body::Body,
	extract::State,
	http::{HeaderValue, Request, header},
	middleware::Next,
	response::Response,
};

use crate::extract::{Auth, RequestId};
use crate::prelude::*;

pub const REQUEST_ID_HEADER: &str = "x-request-id";

/// Longest client-supplied request id that is accepted as-is
const MAX_REQUEST_ID_LEN: usize = 64;

/// Attaches a request id to the request extensions and echoes it in the response.
///
/// A well-formed `X-Request-Id` header from the client is reused, otherwise a
/// random UUID is generated.
pub async fn request_id(mut req: Request<Body>, next: Next) -> Response {
	let req_id = req
		.headers()
		.get(REQUEST_ID_HEADER)
		.and_then(|h| h.to_str().ok())
		.filter(|id| {
			!id.is_empty()
				&& id.len() <= MAX_REQUEST_ID_LEN
				&& id.chars().all(|c| c.is_ascii_alphanumeric() || c == '-')
		})
		.map_or_else(|| uuid::Uuid::new_v4().to_string(), str::to_string);

	req.extensions_mut().insert(RequestId(req_id.clone()));
	let mut res = next.run(req).await;
	if let Ok(val) = HeaderValue::from_str(&req_id) {
		res.headers_mut().insert(REQUEST_ID_HEADER, val);
	}
	res
}

/// Authenticates the request if it carries an `Authorization` header.
///
/// Requests without the header pass through anonymously. A header that is not
/// a valid bearer access token fails with `Unauthorized`, even on public routes.
pub async fn optional_auth(
	State(app): State<App>,
	mut req: Request<Body>,
	next: Next,
) -> ClResult<Response> {
	if let Some(auth_header) = req.headers().get(header::AUTHORIZATION) {
		let auth_header = auth_header.to_str().map_err(|_| Error::Unauthorized)?;
		let Some(token) = auth_header.strip_prefix("Bearer ") else {
			debug!("Unsupported authorization scheme");
			return Err(Error::Unauthorized);
		};

		let auth = app.auth_adapter.validate_access_token(token.trim()).await?;
		debug!(user = %auth.username, "Authenticated request");
		req.extensions_mut().insert(Auth(auth));
	}

	Ok(next.run(req).await)
}


// vim: ts=4
