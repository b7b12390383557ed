//! SQLite implementation of the Eventum authentication adapter.
//!
//! Stores user accounts with bcrypt password hashes and signs HS256 JWTs with
//! a secret that is generated on first start and kept in the `vars` table.

#![forbid(unsafe_code)]

use async_trait::async_trait;
use sqlx::sqlite::{self, SqlitePool};
use std::{fmt::Debug, path::Path, sync::Arc};

use eventum::{auth_adapter::*, prelude::*, worker::WorkerPool};

mod auth;
mod crypto;
mod schema;
mod utils;

pub struct AuthAdapterSqlite {
	db: SqlitePool,
	worker: Arc<WorkerPool>,
	jwt_secret_str: Box<str>,
}

impl Debug for AuthAdapterSqlite {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		f.debug_struct("AuthAdapterSqlite").finish_non_exhaustive()
	}
}

impl AuthAdapterSqlite {
	/// Opens (or creates) `auth.db` in `db_dir`
	pub async fn new(worker: Arc<WorkerPool>, db_dir: impl AsRef<Path>) -> ClResult<Self> {
		let db_path = db_dir.as_ref().join("auth.db");
		let opts = sqlite::SqliteConnectOptions::new()
			.filename(&db_path)
			.create_if_missing(true)
			.journal_mode(sqlite::SqliteJournalMode::Wal);
		let db = sqlite::SqlitePoolOptions::new()
			.max_connections(5)
			.connect_with(opts)
			.await
			.inspect_err(|err| error!("Cannot open auth database {:?}: {}", db_path, err))
			.map_err(|_| Error::DbError)?;

		schema::init_db(&db)
			.await
			.inspect_err(|err| error!("Auth schema init failed: {}", err))
			.map_err(|_| Error::DbError)?;

		let jwt_secret_str = auth::ensure_jwt_secret(&db).await?.into_boxed_str();

		Ok(Self { db, worker, jwt_secret_str })
	}
}

#[async_trait]
impl AuthAdapter for AuthAdapterSqlite {
	async fn validate_access_token(&self, token: &str) -> ClResult<AuthCtx> {
		auth::validate_access_token(&self.db, &self.jwt_secret_str, token).await
	}

	async fn refresh_access_token(&self, refresh_token: &str) -> ClResult<Box<str>> {
		auth::refresh_access_token(&self.db, &self.worker, &self.jwt_secret_str, refresh_token)
			.await
	}

	async fn create_user(&self, data: CreateUserData<'_>) -> ClResult<UserView> {
		auth::create_user(&self.db, &self.worker, data).await
	}

	async fn check_user_password(&self, username: &str, password: &str) -> ClResult<AuthLogin> {
		auth::check_user_password(&self.db, &self.worker, &self.jwt_secret_str, username, password)
			.await
	}
}

// vim: ts=4
