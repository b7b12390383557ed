//! User accounts, authentication and token management

use sqlx::{Row, SqlitePool};

use crate::crypto;
use crate::utils::*;
use eventum::worker::WorkerPool;
use eventum::{auth_adapter::*, prelude::*};

/// Get or generate the JWT secret for HS256 signing
pub(crate) async fn ensure_jwt_secret(db: &SqlitePool) -> ClResult<String> {
	// Try to read existing secret
	let res = sqlx::query("SELECT value FROM vars WHERE key = ?1")
		.bind("jwt_secret")
		.fetch_optional(db)
		.await
		.inspect_err(inspect)
		.or(Err(Error::DbError))?;

	if let Some(row) = res {
		return row.try_get("value").inspect_err(inspect).or(Err(Error::DbError));
	}

	// Generate new secret (32 random bytes, base64 encoded)
	use base64::Engine;
	use rand::Rng;
	let mut secret_bytes = [0u8; 32];
	let mut rng = rand::rng();
	rng.fill_bytes(&mut secret_bytes);
	let secret_str = base64::engine::general_purpose::STANDARD.encode(secret_bytes);

	sqlx::query("INSERT OR REPLACE INTO vars (key, value) VALUES (?1, ?2)")
		.bind("jwt_secret")
		.bind(&secret_str)
		.execute(db)
		.await
		.inspect_err(inspect)
		.or(Err(Error::DbError))?;

	info!("Generated new JWT secret");
	Ok(secret_str)
}

/// Looks up the username of an active user
async fn read_username(db: &SqlitePool, user_id: UserId) -> ClResult<Box<str>> {
	let res = sqlx::query("SELECT username FROM users WHERE user_id = ? AND status = 'A'")
		.bind(user_id.0)
		.fetch_one(db)
		.await;

	map_res(res, |row| row.try_get::<String, _>("username").map(Box::from))
}

pub(crate) async fn create_user(
	db: &SqlitePool,
	worker: &WorkerPool,
	data: CreateUserData<'_>,
) -> ClResult<UserView> {
	let password_hash = crypto::generate_password_hash(worker, data.password.into()).await?;
	let email = data.email.filter(|e| !e.is_empty());

	let mut tx = db.begin().await.inspect_err(inspect).or(Err(Error::DbError))?;
	let res = sqlx::query(
		"INSERT INTO users (username, email, password, status) VALUES (?, ?, ?, 'A') \
		RETURNING user_id",
	)
	.bind(data.username)
	.bind(email)
	.bind(password_hash.as_ref())
	.fetch_one(&mut *tx)
	.await;

	let user_id: i64 = match res {
		Ok(row) => row.try_get("user_id").inspect_err(inspect).or(Err(Error::DbError))?,
		Err(err) if is_unique_violation(&err) => {
			debug!(username = %data.username, "Username already taken");
			return Err(Error::field("username", "A user with that username already exists."));
		}
		Err(err) => {
			inspect(&err);
			return Err(Error::DbError);
		}
	};
	tx.commit().await.inspect_err(inspect).or(Err(Error::DbError))?;

	info!(user_id = user_id, username = %data.username, "Created user");
	Ok(UserView { id: UserId(user_id), username: data.username.into(), email: email.map(Box::from) })
}

/// Issues an access token for an already authenticated user
async fn create_access_token(
	worker: &WorkerPool,
	jwt_secret_str: &str,
	user_id: UserId,
	username: &str,
) -> ClResult<Box<str>> {
	crypto::generate_token(
		worker,
		AccessToken {
			sub: user_id,
			name: username.into(),
			typ: TokenType::Access,
			exp: Timestamp::from_now(ACCESS_TOKEN_EXPIRY),
		},
		jwt_secret_str.into(),
	)
	.await
}

pub(crate) async fn check_user_password(
	db: &SqlitePool,
	worker: &WorkerPool,
	jwt_secret_str: &str,
	username: &str,
	password: &str,
) -> ClResult<AuthLogin> {
	let res = sqlx::query("SELECT user_id, password FROM users WHERE username = ? AND status = 'A'")
		.bind(username)
		.fetch_one(db)
		.await;

	let (user_id, password_hash) = match map_res(res, |row| {
		Ok((row.try_get::<i64, _>("user_id")?, row.try_get::<String, _>("password")?))
	}) {
		Ok(user) => user,
		Err(Error::NotFound) => return Err(Error::Unauthorized),
		Err(err) => return Err(err),
	};

	crypto::check_password(worker, password.into(), password_hash.into()).await?;

	let user_id = UserId(user_id);
	let access = create_access_token(worker, jwt_secret_str, user_id, username).await?;
	let refresh = crypto::generate_token(
		worker,
		AccessToken {
			sub: user_id,
			name: username.into(),
			typ: TokenType::Refresh,
			exp: Timestamp::from_now(REFRESH_TOKEN_EXPIRY),
		},
		jwt_secret_str.into(),
	)
	.await?;

	Ok(AuthLogin { user_id, username: username.into(), access, refresh })
}

pub(crate) async fn refresh_access_token(
	db: &SqlitePool,
	worker: &WorkerPool,
	jwt_secret_str: &str,
	refresh_token: &str,
) -> ClResult<Box<str>> {
	let claims = crypto::decode_token(refresh_token, jwt_secret_str, TokenType::Refresh)?;
	let username = match read_username(db, claims.sub).await {
		Ok(username) => username,
		Err(Error::NotFound) => return Err(Error::Unauthorized),
		Err(err) => return Err(err),
	};

	create_access_token(worker, jwt_secret_str, claims.sub, &username).await
}

/// Validates an access token and checks that its user still exists
pub(crate) async fn validate_access_token(
	db: &SqlitePool,
	jwt_secret_str: &str,
	token: &str,
) -> ClResult<AuthCtx> {
	let claims = crypto::decode_token(token, jwt_secret_str, TokenType::Access)?;
	match read_username(db, claims.sub).await {
		Ok(username) => Ok(AuthCtx { user_id: claims.sub, username }),
		Err(Error::NotFound) => Err(Error::Unauthorized),
		Err(err) => Err(err),
	}
}

// vim: ts=4
