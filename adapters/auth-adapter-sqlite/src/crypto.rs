//! Password hashing and token signing
//!
//! bcrypt and JWT signing are CPU bound, so they run on the worker pool.

use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation};

use eventum::{auth_adapter::*, prelude::*, worker::WorkerPool};

const BCRYPT_COST: u32 = 10;

fn generate_password_hash_sync(password: Box<str>) -> ClResult<Box<str>> {
	let hash = bcrypt::hash(password.as_ref(), BCRYPT_COST)
		.map_err(|err| Error::Internal(format!("bcrypt hash: {err}")))?;

	Ok(hash.into())
}

pub(crate) async fn generate_password_hash(
	worker: &WorkerPool,
	password: Box<str>,
) -> ClResult<Box<str>> {
	worker.try_run_immed(move || generate_password_hash_sync(password)).await
}

fn check_password_sync(password: Box<str>, password_hash: Box<str>) -> ClResult<()> {
	let res = bcrypt::verify(password.as_ref(), &password_hash).map_err(|_| Error::Unauthorized)?;
	if res { Ok(()) } else { Err(Error::Unauthorized) }
}

/// Verifies a password against a bcrypt hash. A mismatch is `Unauthorized`.
pub(crate) async fn check_password(
	worker: &WorkerPool,
	password: Box<str>,
	password_hash: Box<str>,
) -> ClResult<()> {
	worker.try_run_immed(move || check_password_sync(password, password_hash)).await
}

fn generate_token_sync(claims: &AccessToken<Box<str>>, jwt_secret: &str) -> ClResult<Box<str>> {
	let token = jsonwebtoken::encode(
		&Header::new(Algorithm::HS256),
		claims,
		&EncodingKey::from_secret(jwt_secret.as_bytes()),
	)
	.map_err(|err| Error::Internal(format!("jwt encode: {err}")))?;

	Ok(token.into())
}

/// Signs an access or refresh token with the adapter's HS256 secret
pub(crate) async fn generate_token(
	worker: &WorkerPool,
	claims: AccessToken<Box<str>>,
	jwt_secret: Box<str>,
) -> ClResult<Box<str>> {
	worker.try_run(move || generate_token_sync(&claims, &jwt_secret)).await
}

/// Decodes a token and checks its signature, expiry and type
pub(crate) fn decode_token(
	token: &str,
	jwt_secret: &str,
	typ: TokenType,
) -> ClResult<AccessToken<Box<str>>> {
	let token_data = jsonwebtoken::decode::<AccessToken<Box<str>>>(
		token,
		&DecodingKey::from_secret(jwt_secret.as_bytes()),
		&Validation::new(Algorithm::HS256),
	)
	.map_err(|err| {
		debug!("Token rejected: {}", err);
		Error::Unauthorized
	})?;

	if token_data.claims.typ != typ {
		debug!("Token rejected: expected {:?}, got {:?}", typ, token_data.claims.typ);
		return Err(Error::Unauthorized);
	}

	Ok(token_data.claims)
}


// vim: ts=4
