//! SQLite implementation of the Eventum metadata adapter.
//!
//! Events live in the `events` table, attendance in `event_attendees` keyed
//! by `(ev_id, user_id)`. Every write runs in its own transaction.

#![forbid(unsafe_code)]

use async_trait::async_trait;
use sqlx::sqlite::{self, SqlitePool};
use std::path::Path;

use eventum::{meta_adapter::*, prelude::*};

mod event;
mod schema;
mod utils;

#[derive(Debug)]
pub struct MetaAdapterSqlite {
	db: SqlitePool,
}

impl MetaAdapterSqlite {
	/// Opens (or creates) `meta.db` in `db_dir`
	pub async fn new(db_dir: impl AsRef<Path>) -> ClResult<Self> {
		let db_path = db_dir.as_ref().join("meta.db");
		let opts = sqlite::SqliteConnectOptions::new()
			.filename(&db_path)
			.create_if_missing(true)
			.foreign_keys(true)
			.journal_mode(sqlite::SqliteJournalMode::Wal);
		let db = sqlite::SqlitePoolOptions::new()
			.max_connections(5)
			.connect_with(opts)
			.await
			.inspect_err(|err| error!("Cannot open meta database {:?}: {}", db_path, err))
			.map_err(|_| Error::DbError)?;

		schema::init_db(&db)
			.await
			.inspect_err(|err| error!("Meta schema init failed: {}", err))
			.map_err(|_| Error::DbError)?;

		Ok(Self { db })
	}
}

#[async_trait]
impl MetaAdapter for MetaAdapterSqlite {
	// Events
	//********
	async fn list_events(&self, opts: &ListEventOptions) -> ClResult<Vec<Event>> {
		event::list(&self.db, opts).await
	}

	async fn read_event(&self, ev_id: EventId) -> ClResult<Event> {
		event::read(&self.db, ev_id).await
	}

	async fn create_event(&self, data: &CreateEventData<'_>) -> ClResult<Event> {
		event::create(&self.db, data).await
	}

	async fn update_event(&self, ev_id: EventId, data: &UpdateEventData) -> ClResult<Event> {
		event::update(&self.db, ev_id, data).await
	}

	async fn delete_event(&self, ev_id: EventId) -> ClResult<()> {
		event::delete(&self.db, ev_id).await
	}

	// Attendance
	//************
	async fn add_attendee(&self, ev_id: EventId, user_id: UserId) -> ClResult<bool> {
		event::add_attendee(&self.db, ev_id, user_id).await
	}

	async fn remove_attendee(&self, ev_id: EventId, user_id: UserId) -> ClResult<bool> {
		event::remove_attendee(&self.db, ev_id, user_id).await
	}
}

// vim: ts=4
