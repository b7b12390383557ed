//! Database schema initialization and migrations

use sqlx::{Sqlite, SqlitePool, Transaction};

/// Get the current database version from vars table
async fn get_db_version(tx: &mut Transaction<'_, Sqlite>) -> i64 {
	sqlx::query_scalar::<_, String>("SELECT value FROM vars WHERE key = 'db_version'")
		.fetch_optional(&mut **tx)
		.await
		.ok()
		.flatten()
		.and_then(|v| v.parse().ok())
		.unwrap_or(0)
}

/// Set the database version in vars table
async fn set_db_version(tx: &mut Transaction<'_, Sqlite>, version: i64) {
	let _ = sqlx::query("INSERT OR REPLACE INTO vars (key, value) VALUES ('db_version', ?)")
		.bind(version.to_string())
		.execute(&mut **tx)
		.await;
}

// Current schema version - update this when adding new migrations
const CURRENT_DB_VERSION: i64 = 1;

/// Initialize the database schema and run migrations
pub(crate) async fn init_db(db: &SqlitePool) -> Result<(), sqlx::Error> {
	let mut tx = db.begin().await?;

	sqlx::query(
		"CREATE TABLE IF NOT EXISTS vars (
		key text NOT NULL,
		value text NOT NULL,
		created_at INTEGER DEFAULT (unixepoch()),
		updated_at INTEGER DEFAULT (unixepoch()),
		PRIMARY KEY(key)
	)",
	)
	.execute(&mut *tx)
	.await?;

	let version = get_db_version(&mut tx).await;

	// Events
	// AUTOINCREMENT keeps ids of deleted events from being handed out again
	sqlx::query(
		"CREATE TABLE IF NOT EXISTS events (
			ev_id integer PRIMARY KEY AUTOINCREMENT,
			name text NOT NULL,
			description text NOT NULL,
			start_at INTEGER NOT NULL,
			end_at INTEGER NOT NULL,
			creator_id integer NOT NULL,
			creator_tag text NOT NULL,
			created_at INTEGER DEFAULT (unixepoch()),
			updated_at INTEGER DEFAULT (unixepoch())
		)",
	)
	.execute(&mut *tx)
	.await?;
	sqlx::query("CREATE INDEX IF NOT EXISTS idx_events_start_at ON events (start_at)")
		.execute(&mut *tx)
		.await?;
	sqlx::query("CREATE INDEX IF NOT EXISTS idx_events_end_at ON events (end_at)")
		.execute(&mut *tx)
		.await?;
	sqlx::query(
		"CREATE TRIGGER IF NOT EXISTS events_updated_at AFTER UPDATE ON events FOR EACH ROW \
		BEGIN UPDATE events SET updated_at = unixepoch() WHERE ev_id = NEW.ev_id; END",
	)
	.execute(&mut *tx)
	.await?;

	// Attendance
	sqlx::query(
		"CREATE TABLE IF NOT EXISTS event_attendees (
			ev_id integer NOT NULL,
			user_id integer NOT NULL,
			created_at INTEGER DEFAULT (unixepoch()),
			PRIMARY KEY(ev_id, user_id),
			FOREIGN KEY(ev_id) REFERENCES events(ev_id) ON DELETE CASCADE
		)",
	)
	.execute(&mut *tx)
	.await?;

	// Fresh database: nothing to migrate
	if version == 0 {
		set_db_version(&mut tx, CURRENT_DB_VERSION).await;
	}

	tx.commit().await?;

	Ok(())
}

// vim: ts=4
