//! Route table

use std::collections::BTreeMap;

use axum::{
	Json, Router,
	http::{HeaderMap, StatusCode, header},
	middleware,
	routing::{get, post},
};
use serde::Serialize;
use tower_http::trace::TraceLayer;

use crate::prelude::*;
use crate::types::ApiResponse;
use crate::{auth, event};
use eventum_core::extract::OptionalRequestId;
use eventum_core::middleware::{optional_auth, request_id};

// API root //
//**********//
#[derive(Debug, Serialize)]
pub struct Endpoint {
	pub url: String,
	pub methods: &'static [&'static str],
	pub description: &'static str,
}

const ENDPOINTS: &[(&str, &str, &[&str], &str)] = &[
	(
		"events",
		"/events/",
		&["GET", "POST"],
		"List events (filter by name, start_date, end_date) or create an event",
	),
	(
		"event_detail",
		"/events/{id}/",
		&["GET", "PUT", "PATCH", "DELETE"],
		"Retrieve an event, or modify it if you created it",
	),
	(
		"event_register",
		"/events/{id}/register/",
		&["POST"],
		"Register the authenticated user for an event",
	),
	(
		"event_unregister",
		"/events/{id}/unregister/",
		&["POST"],
		"Unregister the authenticated user from an event",
	),
	("register", "/register_user/", &["POST"], "Create a user account"),
	("token_obtain_pair", "/api/token/", &["POST"], "Obtain an access and refresh token pair"),
	("token_refresh", "/api/token/refresh/", &["POST"], "Exchange a refresh token for a new access token"),
];

/// GET / - Index of the API endpoints, with absolute URLs for the requested host
async fn get_api_root(
	OptionalRequestId(req_id): OptionalRequestId,
	headers: HeaderMap,
) -> (StatusCode, Json<ApiResponse<BTreeMap<&'static str, Endpoint>>>) {
	let host = headers.get(header::HOST).and_then(|h| h.to_str().ok()).unwrap_or("localhost");

	let index: BTreeMap<_, _> = ENDPOINTS
		.iter()
		.map(|&(name, path, methods, description)| {
			(name, Endpoint { url: format!("http://{}{}", host, path), methods, description })
		})
		.collect();

	(StatusCode::OK, Json(ApiResponse::new(index).with_req_id(req_id.unwrap_or_default())))
}

pub fn init(app: App) -> Router {
	let event_router = Router::new()
		.route("/events/", get(event::handler::list_events).post(event::handler::post_event))
		.route(
			"/events/{id}/",
			get(event::handler::get_event)
				.put(event::handler::put_event)
				.patch(event::handler::patch_event)
				.delete(event::handler::delete_event),
		)
		.route("/events/{id}/register/", post(event::registration::post_register))
		.route("/events/{id}/unregister/", post(event::registration::post_unregister));

	let auth_router = Router::new()
		.route("/register_user/", post(auth::handler::post_register_user))
		.route("/api/token/", post(auth::handler::post_token))
		.route("/api/token/refresh/", post(auth::handler::post_token_refresh));

	Router::new()
		.route("/", get(get_api_root))
		.merge(event_router)
		.merge(auth_router)
		.layer(middleware::from_fn_with_state(app.clone(), optional_auth))
		.layer(middleware::from_fn(request_id))
		.layer(TraceLayer::new_for_http())
		.with_state(app)
}

// vim: ts=4
