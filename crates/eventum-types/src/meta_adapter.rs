//! Adapter that stores events and the attendance relation.

use async_trait::async_trait;
use serde::Serialize;
use std::fmt::Debug;

use crate::abac::AttrSet;
use crate::prelude::*;
use crate::types::serialize_timestamp_iso;

/// Maximum length of an event name, in characters
pub const EVENT_NAME_MAX_LEN: usize = 100;

/// An event together with its attendee set
#[derive(Clone, Debug, Serialize)]
pub struct Event {
	#[serde(rename = "id")]
	pub ev_id: EventId,
	pub name: Box<str>,
	pub description: Box<str>,
	#[serde(rename = "start_date", serialize_with = "serialize_timestamp_iso")]
	pub start_at: Timestamp,
	#[serde(rename = "end_date", serialize_with = "serialize_timestamp_iso")]
	pub end_at: Timestamp,
	#[serde(skip)]
	pub creator_id: UserId,
	/// Username of the creator
	#[serde(rename = "creator")]
	pub creator_tag: Box<str>,
	/// Attendee user ids in ascending order
	pub attendees: Vec<UserId>,
}

impl AttrSet for Event {
	fn get(&self, key: &str) -> Option<&str> {
		match key {
			"owner" => Some(self.creator_tag.as_ref()),
			_ => None,
		}
	}

	fn owner_id(&self) -> Option<UserId> {
		Some(self.creator_id)
	}
}

/// Restrictions on the event collection. Absent fields impose no restriction.
#[derive(Clone, Debug, Default)]
pub struct ListEventOptions {
	/// Case-insensitive substring of the event name
	pub name: Option<Box<str>>,
	/// Inclusive lower bound on the start timestamp
	pub start_from: Option<Timestamp>,
	/// Inclusive upper bound on the end timestamp
	pub end_until: Option<Timestamp>,
}

impl ListEventOptions {
	/// Returns true if the event satisfies every supplied restriction
	pub fn matches(&self, event: &Event) -> bool {
		if let Some(name) = &self.name {
			if !event.name.to_lowercase().contains(&name.to_lowercase()) {
				return false;
			}
		}
		if let Some(start_from) = self.start_from {
			if event.start_at < start_from {
				return false;
			}
		}
		if let Some(end_until) = self.end_until {
			if event.end_at > end_until {
				return false;
			}
		}
		true
	}
}

/// Data needed to create a new event
#[derive(Debug)]
pub struct CreateEventData<'a> {
	pub name: &'a str,
	pub description: &'a str,
	pub start_at: Timestamp,
	pub end_at: Timestamp,
	pub creator_id: UserId,
	pub creator_tag: &'a str,
}

/// Changes to an event. The creator is not updatable.
#[derive(Debug, Default)]
pub struct UpdateEventData {
	pub name: Patch<Box<str>>,
	pub description: Patch<Box<str>>,
	pub start_at: Patch<Timestamp>,
	pub end_at: Patch<Timestamp>,
}

#[async_trait]
pub trait MetaAdapter: Debug + Send + Sync {
	// Events
	//********
	/// Lists events matching the options in natural (id) order
	async fn list_events(&self, opts: &ListEventOptions) -> ClResult<Vec<Event>>;
	async fn read_event(&self, ev_id: EventId) -> ClResult<Event>;
	async fn create_event(&self, data: &CreateEventData<'_>) -> ClResult<Event>;
	async fn update_event(&self, ev_id: EventId, data: &UpdateEventData) -> ClResult<Event>;
	async fn delete_event(&self, ev_id: EventId) -> ClResult<()>;

	// Attendance
	//************
	/// Adds a user to the attendee set. Returns false if already present.
	/// Fails with `NotFound` if the event does not exist.
	async fn add_attendee(&self, ev_id: EventId, user_id: UserId) -> ClResult<bool>;

	/// Removes a user from the attendee set. Returns false if not present.
	/// Fails with `NotFound` if the event does not exist.
	async fn remove_attendee(&self, ev_id: EventId, user_id: UserId) -> ClResult<bool>;
}


// vim: ts=4
