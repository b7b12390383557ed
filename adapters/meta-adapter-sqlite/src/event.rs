//! Event storage and attendance

use std::collections::HashMap;

use sqlx::{Row, SqliteConnection, SqlitePool, sqlite::SqliteRow};

use crate::utils::*;
use eventum::{meta_adapter::*, prelude::*};

const EVENT_COLUMNS: &str =
	"ev_id, name, description, start_at, end_at, creator_id, creator_tag";

fn event_from_row(row: &SqliteRow) -> Result<Event, sqlx::Error> {
	Ok(Event {
		ev_id: EventId(row.try_get("ev_id")?),
		name: row.try_get::<String, _>("name")?.into(),
		description: row.try_get::<String, _>("description")?.into(),
		start_at: Timestamp(row.try_get("start_at")?),
		end_at: Timestamp(row.try_get("end_at")?),
		creator_id: UserId(row.try_get("creator_id")?),
		creator_tag: row.try_get::<String, _>("creator_tag")?.into(),
		attendees: Vec::new(),
	})
}

async fn read_attendees(conn: &mut SqliteConnection, ev_id: EventId) -> ClResult<Vec<UserId>> {
	let rows = sqlx::query("SELECT user_id FROM event_attendees WHERE ev_id = ? ORDER BY user_id")
		.bind(ev_id.0)
		.fetch_all(&mut *conn)
		.await
		.inspect_err(inspect)
		.map_err(|_| Error::DbError)?;

	collect_res(rows.iter().map(|row| row.try_get("user_id").map(UserId)))
}

/// Reads an event with its attendees on the given connection
async fn read_in(conn: &mut SqliteConnection, ev_id: EventId) -> ClResult<Event> {
	let res = sqlx::query(&format!("SELECT {EVENT_COLUMNS} FROM events WHERE ev_id = ?"))
		.bind(ev_id.0)
		.fetch_one(&mut *conn)
		.await;
	let mut event = map_res(res, event_from_row)?;
	event.attendees = read_attendees(conn, ev_id).await?;

	Ok(event)
}

async fn ensure_exists(conn: &mut SqliteConnection, ev_id: EventId) -> ClResult<()> {
	let res = sqlx::query("SELECT ev_id FROM events WHERE ev_id = ?")
		.bind(ev_id.0)
		.fetch_one(&mut *conn)
		.await;
	map_res(res, |_| Ok(()))
}

pub(crate) async fn list(db: &SqlitePool, opts: &ListEventOptions) -> ClResult<Vec<Event>> {
	let mut query = sqlx::QueryBuilder::new("SELECT ");
	query.push(EVENT_COLUMNS).push(" FROM events WHERE 1=1");

	if let Some(start_from) = opts.start_from {
		query.push(" AND start_at >= ").push_bind(start_from.0);
	}
	if let Some(end_until) = opts.end_until {
		query.push(" AND end_at <= ").push_bind(end_until.0);
	}
	query.push(" ORDER BY ev_id");

	let rows = query
		.build()
		.fetch_all(db)
		.await
		.inspect_err(inspect)
		.map_err(|_| Error::DbError)?;

	// Name matching is case-insensitive for all of Unicode, which SQLite's
	// LIKE is not, so it happens here
	let mut events: Vec<Event> = collect_res(rows.iter().map(event_from_row))?
		.into_iter()
		.filter(|event| opts.matches(event))
		.collect();
	if events.is_empty() {
		return Ok(events);
	}

	let ev_ids: Vec<i64> = events.iter().map(|event| event.ev_id.0).collect();
	let mut query =
		sqlx::QueryBuilder::new("SELECT ev_id, user_id FROM event_attendees WHERE ev_id IN ");
	query = push_in(query, &ev_ids);
	query.push(" ORDER BY ev_id, user_id");

	let rows = query
		.build()
		.fetch_all(db)
		.await
		.inspect_err(inspect)
		.map_err(|_| Error::DbError)?;
	let pairs = collect_res(rows.iter().map(|row| {
		Ok((row.try_get::<i64, _>("ev_id")?, UserId(row.try_get("user_id")?)))
	}))?;

	let mut attendees: HashMap<i64, Vec<UserId>> = HashMap::new();
	for (ev_id, user_id) in pairs {
		attendees.entry(ev_id).or_default().push(user_id);
	}
	for event in &mut events {
		if let Some(list) = attendees.remove(&event.ev_id.0) {
			event.attendees = list;
		}
	}

	Ok(events)
}

pub(crate) async fn read(db: &SqlitePool, ev_id: EventId) -> ClResult<Event> {
	let mut conn = db.acquire().await.inspect_err(inspect).map_err(|_| Error::DbError)?;
	read_in(&mut conn, ev_id).await
}

pub(crate) async fn create(db: &SqlitePool, data: &CreateEventData<'_>) -> ClResult<Event> {
	let mut tx = db.begin().await.inspect_err(inspect).map_err(|_| Error::DbError)?;

	let res = sqlx::query(&format!(
		"INSERT INTO events (name, description, start_at, end_at, creator_id, creator_tag) \
		VALUES (?, ?, ?, ?, ?, ?) RETURNING {EVENT_COLUMNS}"
	))
	.bind(data.name)
	.bind(data.description)
	.bind(data.start_at.0)
	.bind(data.end_at.0)
	.bind(data.creator_id.0)
	.bind(data.creator_tag)
	.fetch_one(&mut *tx)
	.await;
	let event = map_res(res, event_from_row)?;

	tx.commit().await.inspect_err(inspect).map_err(|_| Error::DbError)?;
	Ok(event)
}

pub(crate) async fn update(
	db: &SqlitePool,
	ev_id: EventId,
	data: &UpdateEventData,
) -> ClResult<Event> {
	let mut tx = db.begin().await.inspect_err(inspect).map_err(|_| Error::DbError)?;

	let mut query = sqlx::QueryBuilder::new("UPDATE events SET ");
	let mut has_updates = false;

	has_updates = push_patch!(query, has_updates, "name", &data.name, |v| &**v);
	has_updates = push_patch!(query, has_updates, "description", &data.description, |v| &**v);
	has_updates = push_patch!(query, has_updates, "start_at", &data.start_at, |v| v.0);
	has_updates = push_patch!(query, has_updates, "end_at", &data.end_at, |v| v.0);

	// Writing first takes the write lock before anything is read
	if has_updates {
		query.push(" WHERE ev_id=").push_bind(ev_id.0);
		let res = query
			.build()
			.execute(&mut *tx)
			.await
			.inspect_err(inspect)
			.map_err(|_| Error::DbError)?;
		if res.rows_affected() == 0 {
			return Err(Error::NotFound);
		}
	}

	let event = read_in(&mut tx, ev_id).await?;
	tx.commit().await.inspect_err(inspect).map_err(|_| Error::DbError)?;

	Ok(event)
}

pub(crate) async fn delete(db: &SqlitePool, ev_id: EventId) -> ClResult<()> {
	let mut tx = db.begin().await.inspect_err(inspect).map_err(|_| Error::DbError)?;

	sqlx::query("DELETE FROM event_attendees WHERE ev_id = ?")
		.bind(ev_id.0)
		.execute(&mut *tx)
		.await
		.inspect_err(inspect)
		.map_err(|_| Error::DbError)?;
	let res = sqlx::query("DELETE FROM events WHERE ev_id = ?")
		.bind(ev_id.0)
		.execute(&mut *tx)
		.await
		.inspect_err(inspect)
		.map_err(|_| Error::DbError)?;

	if res.rows_affected() == 0 {
		return Err(Error::NotFound);
	}

	tx.commit().await.inspect_err(inspect).map_err(|_| Error::DbError)?;
	Ok(())
}

pub(crate) async fn add_attendee(
	db: &SqlitePool,
	ev_id: EventId,
	user_id: UserId,
) -> ClResult<bool> {
	let mut tx = db.begin().await.inspect_err(inspect).map_err(|_| Error::DbError)?;
	let res = sqlx::query(
		"INSERT OR IGNORE INTO event_attendees (ev_id, user_id) \
		SELECT ev_id, ? FROM events WHERE ev_id = ?",
	)
	.bind(user_id.0)
	.bind(ev_id.0)
	.execute(&mut *tx)
	.await
	.inspect_err(inspect)
	.map_err(|_| Error::DbError)?;
	if res.rows_affected() == 0 {
		// Already attending, or no such event
		ensure_exists(&mut tx, ev_id).await?;
	}

	tx.commit().await.inspect_err(inspect).map_err(|_| Error::DbError)?;
	Ok(res.rows_affected() > 0)
}

pub(crate) async fn remove_attendee(
	db: &SqlitePool,
	ev_id: EventId,
	user_id: UserId,
) -> ClResult<bool> {
	let mut tx = db.begin().await.inspect_err(inspect).map_err(|_| Error::DbError)?;
	let res = sqlx::query("DELETE FROM event_attendees WHERE ev_id = ? AND user_id = ?")
		.bind(ev_id.0)
		.bind(user_id.0)
		.execute(&mut *tx)
		.await
		.inspect_err(inspect)
		.map_err(|_| Error::DbError)?;
	if res.rows_affected() == 0 {
		ensure_exists(&mut tx, ev_id).await?;
	}

	tx.commit().await.inspect_err(inspect).map_err(|_| Error::DbError)?;
	Ok(res.rows_affected() > 0)
}

// vim: ts=4
