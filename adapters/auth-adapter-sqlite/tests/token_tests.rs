//! JWT secret persistence and token lifecycle tests

use eventum::auth_adapter::{AuthAdapter, CreateUserData};
use eventum::prelude::*;
use eventum::worker::WorkerPool;
use eventum_auth_adapter_sqlite::AuthAdapterSqlite;
use std::sync::Arc;
use tempfile::TempDir;

async fn create_user_and_login(adapter: &AuthAdapterSqlite) -> (UserId, Box<str>, Box<str>) {
	let view = adapter
		.create_user(CreateUserData { username: "alice", password: "secret", email: None })
		.await
		.unwrap();
	let login = adapter.check_user_password("alice", "secret").await.unwrap();
	(view.id, login.access, login.refresh)
}

#[tokio::test]
async fn test_access_token_validates() {
	let tmp_dir = TempDir::new().unwrap();
	let adapter = AuthAdapterSqlite::new(Arc::new(WorkerPool::new(1, 1)), tmp_dir.path())
		.await
		.unwrap();
	let (user_id, access, _refresh) = create_user_and_login(&adapter).await;

	let ctx = adapter.validate_access_token(&access).await.unwrap();
	assert_eq!(ctx.user_id, user_id);
	assert_eq!(ctx.username.as_ref(), "alice");
}

#[tokio::test]
async fn test_refresh_token_is_not_an_access_token() {
	let tmp_dir = TempDir::new().unwrap();
	let adapter = AuthAdapterSqlite::new(Arc::new(WorkerPool::new(1, 1)), tmp_dir.path())
		.await
		.unwrap();
	let (_user_id, access, refresh) = create_user_and_login(&adapter).await;

	assert!(matches!(adapter.validate_access_token(&refresh).await, Err(Error::Unauthorized)));
	assert!(matches!(adapter.refresh_access_token(&access).await, Err(Error::Unauthorized)));
}

#[tokio::test]
async fn test_refresh_issues_valid_access_token() {
	let tmp_dir = TempDir::new().unwrap();
	let adapter = AuthAdapterSqlite::new(Arc::new(WorkerPool::new(1, 1)), tmp_dir.path())
		.await
		.unwrap();
	let (user_id, _access, refresh) = create_user_and_login(&adapter).await;

	let new_access = adapter.refresh_access_token(&refresh).await.unwrap();
	let ctx = adapter.validate_access_token(&new_access).await.unwrap();
	assert_eq!(ctx.user_id, user_id);
}

#[tokio::test]
async fn test_garbage_tokens_are_rejected() {
	let tmp_dir = TempDir::new().unwrap();
	let adapter = AuthAdapterSqlite::new(Arc::new(WorkerPool::new(1, 1)), tmp_dir.path())
		.await
		.unwrap();

	assert!(matches!(adapter.validate_access_token("").await, Err(Error::Unauthorized)));
	assert!(matches!(adapter.validate_access_token("abc.def.ghi").await, Err(Error::Unauthorized)));
	assert!(matches!(adapter.refresh_access_token("nope").await, Err(Error::Unauthorized)));
}

#[tokio::test]
async fn test_jwt_secret_persists_across_restarts() {
	let tmp_dir = TempDir::new().unwrap();
	let worker = Arc::new(WorkerPool::new(1, 1));

	let access = {
		let adapter = AuthAdapterSqlite::new(worker.clone(), tmp_dir.path()).await.unwrap();
		let (_user_id, access, _refresh) = create_user_and_login(&adapter).await;
		access
	};

	let adapter = AuthAdapterSqlite::new(worker, tmp_dir.path()).await.unwrap();
	let ctx = adapter.validate_access_token(&access).await.unwrap();
	assert_eq!(ctx.username.as_ref(), "alice");
}

#[tokio::test]
async fn test_token_from_other_instance_is_rejected() {
	let worker = Arc::new(WorkerPool::new(1, 1));
	let tmp_a = TempDir::new().unwrap();
	let tmp_b = TempDir::new().unwrap();
	let adapter_a = AuthAdapterSqlite::new(worker.clone(), tmp_a.path()).await.unwrap();
	let adapter_b = AuthAdapterSqlite::new(worker, tmp_b.path()).await.unwrap();

	let (_user_id, access, _refresh) = create_user_and_login(&adapter_a).await;
	create_user_and_login(&adapter_b).await;

	assert!(matches!(adapter_b.validate_access_token(&access).await, Err(Error::Unauthorized)));
}

// vim: ts=4
