//! Attendance toggling
//!
//! Both actions act on the caller's own membership and are idempotent:
//! registering twice or unregistering a non-attendee still succeeds.

use axum::{
	Json,
	extract::{Path, State},
	http::StatusCode,
};

use crate::prelude::*;
use eventum_core::extract::{Auth, OptionalRequestId};
use eventum_types::auth_adapter::AuthCtx;
use eventum_types::meta_adapter::Event;
use eventum_types::types::ApiResponse;

/// Adds `actor` to the attendees of an event and returns the event.
/// Fails with `NotFound` before touching attendance if the event is missing.
pub async fn register(app: &App, ev_id: EventId, actor: &AuthCtx) -> ClResult<Event> {
	let added = app.meta_adapter.add_attendee(ev_id, actor.user_id).await?;
	debug!(user = %actor.username, ev_id = %ev_id, added = added, "Registered attendee");
	app.meta_adapter.read_event(ev_id).await
}

/// Removes `actor` from the attendees of an event and returns the event
pub async fn unregister(app: &App, ev_id: EventId, actor: &AuthCtx) -> ClResult<Event> {
	let removed = app.meta_adapter.remove_attendee(ev_id, actor.user_id).await?;
	debug!(user = %actor.username, ev_id = %ev_id, removed = removed, "Unregistered attendee");
	app.meta_adapter.read_event(ev_id).await
}

/// POST /events/{id}/register/ - Add the caller to the attendees
pub async fn post_register(
	State(app): State<App>,
	Auth(auth): Auth,
	OptionalRequestId(req_id): OptionalRequestId,
	Path(ev_id): Path<String>,
) -> ClResult<(StatusCode, Json<ApiResponse<Event>>)> {
	let ev_id: EventId = ev_id.parse()?;

	let event = register(&app, ev_id, &auth).await?;

	info!(user = %auth.username, ev_id = %ev_id, "POST /events/{{id}}/register/");
	let response = ApiResponse::new(event).with_req_id(req_id.unwrap_or_default());
	Ok((StatusCode::OK, Json(response)))
}

/// POST /events/{id}/unregister/ - Remove the caller from the attendees
pub async fn post_unregister(
	State(app): State<App>,
	Auth(auth): Auth,
	OptionalRequestId(req_id): OptionalRequestId,
	Path(ev_id): Path<String>,
) -> ClResult<(StatusCode, Json<ApiResponse<Event>>)> {
	let ev_id: EventId = ev_id.parse()?;

	let event = unregister(&app, ev_id, &auth).await?;

	info!(user = %auth.username, ev_id = %ev_id, "POST /events/{{id}}/unregister/");
	let response = ApiResponse::new(event).with_req_id(req_id.unwrap_or_default());
	Ok((StatusCode::OK, Json(response)))
}

// vim: ts=4
