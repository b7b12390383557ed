//! Event CRUD handlers
//!
//! Reads are public. Writes require an authenticated caller, and updates and
//! deletes additionally go through the app's write policy. The event is
//! loaded first, so a missing event is reported before any permission or
//! validation failure.

use axum::{
	Json,
	extract::{Path, Query, State, rejection::QueryRejection},
	http::StatusCode,
};

use crate::filter::EventFilterQuery;
use crate::input::EventInput;
use crate::prelude::*;
use eventum_core::abac::check_write;
use eventum_core::extract::{Auth, JsonBody, OptionalRequestId};
use eventum_types::meta_adapter::{CreateEventData, Event, UpdateEventData};
use eventum_types::types::ApiResponse;

type EventResponse = (StatusCode, Json<ApiResponse<Event>>);

fn respond(status: StatusCode, event: Event, req_id: Option<String>) -> EventResponse {
	(status, Json(ApiResponse::new(event).with_req_id(req_id.unwrap_or_default())))
}

/// GET /events/ - List events, optionally filtered by name and date range
pub async fn list_events(
	State(app): State<App>,
	OptionalRequestId(req_id): OptionalRequestId,
	query: Result<Query<EventFilterQuery>, QueryRejection>,
) -> ClResult<(StatusCode, Json<ApiResponse<Vec<Event>>>)> {
	let Query(query) = query.map_err(|err| Error::ValidationError(err.body_text()))?;
	let opts = query.into_options()?;

	let events = app.meta_adapter.list_events(&opts).await?;
	debug!(count = events.len(), "GET /events/ - listed events");

	let response = ApiResponse::new(events).with_req_id(req_id.unwrap_or_default());
	Ok((StatusCode::OK, Json(response)))
}

/// POST /events/ - Create an event owned by the caller
pub async fn post_event(
	State(app): State<App>,
	Auth(auth): Auth,
	OptionalRequestId(req_id): OptionalRequestId,
	JsonBody(input): JsonBody<EventInput>,
) -> ClResult<EventResponse> {
	let valid = input.validate_full()?;

	let event = app
		.meta_adapter
		.create_event(&CreateEventData {
			name: &valid.name,
			description: &valid.description,
			start_at: valid.start_at,
			end_at: valid.end_at,
			creator_id: auth.user_id,
			creator_tag: &auth.username,
		})
		.await?;

	info!(user = %auth.username, ev_id = %event.ev_id, "POST /events/ - created event");
	Ok(respond(StatusCode::CREATED, event, req_id))
}

/// GET /events/{id}/ - Retrieve a single event
pub async fn get_event(
	State(app): State<App>,
	OptionalRequestId(req_id): OptionalRequestId,
	Path(ev_id): Path<String>,
) -> ClResult<EventResponse> {
	let ev_id: EventId = ev_id.parse()?;
	let event = app.meta_adapter.read_event(ev_id).await?;

	Ok(respond(StatusCode::OK, event, req_id))
}

/// PUT /events/{id}/ - Replace all writable fields (owner only)
pub async fn put_event(
	State(app): State<App>,
	Auth(auth): Auth,
	OptionalRequestId(req_id): OptionalRequestId,
	Path(ev_id): Path<String>,
	JsonBody(input): JsonBody<EventInput>,
) -> ClResult<EventResponse> {
	let ev_id: EventId = ev_id.parse()?;
	let event = app.meta_adapter.read_event(ev_id).await?;
	check_write(app.write_policy.as_ref(), &auth, &event, "update")?;

	let data: UpdateEventData = input.validate_full()?.into();
	let event = app.meta_adapter.update_event(ev_id, &data).await?;

	info!(user = %auth.username, ev_id = %ev_id, "PUT /events/{{id}}/ - replaced event");
	Ok(respond(StatusCode::OK, event, req_id))
}

/// PATCH /events/{id}/ - Update a subset of the writable fields (owner only)
pub async fn patch_event(
	State(app): State<App>,
	Auth(auth): Auth,
	OptionalRequestId(req_id): OptionalRequestId,
	Path(ev_id): Path<String>,
	JsonBody(input): JsonBody<EventInput>,
) -> ClResult<EventResponse> {
	let ev_id: EventId = ev_id.parse()?;
	let event = app.meta_adapter.read_event(ev_id).await?;
	check_write(app.write_policy.as_ref(), &auth, &event, "update")?;

	let data = input.validate_partial()?;
	let event = app.meta_adapter.update_event(ev_id, &data).await?;

	info!(user = %auth.username, ev_id = %ev_id, "PATCH /events/{{id}}/ - updated event");
	Ok(respond(StatusCode::OK, event, req_id))
}

/// DELETE /events/{id}/ - Delete an event (owner only)
pub async fn delete_event(
	State(app): State<App>,
	Auth(auth): Auth,
	Path(ev_id): Path<String>,
) -> ClResult<StatusCode> {
	let ev_id: EventId = ev_id.parse()?;
	let event = app.meta_adapter.read_event(ev_id).await?;
	check_write(app.write_policy.as_ref(), &auth, &event, "delete")?;

	app.meta_adapter.delete_event(ev_id).await?;

	info!(user = %auth.username, ev_id = %ev_id, "DELETE /events/{{id}}/ - deleted event");
	Ok(StatusCode::NO_CONTENT)
}

// vim: ts=4
