//! Common test utilities and helpers
//!
//! Builds a full application on temporary SQLite databases and drives the
//! router in-process with `oneshot`.

#![allow(dead_code)]

use std::sync::Arc;

use axum::Router;
use axum::body::Body;
use axum::http::{HeaderMap, Method, Request, StatusCode, header};
use http_body_util::BodyExt;
use serde_json::{Value, json};
use tempfile::TempDir;
use tower::ServiceExt;

use eventum::abac::WritePolicy;
use eventum::worker::WorkerPool;
use eventum::{App, AppBuilder, routes};
use eventum_auth_adapter_sqlite::AuthAdapterSqlite;
use eventum_meta_adapter_sqlite::MetaAdapterSqlite;

pub struct TestApp {
	pub app: App,
	pub router: Router,
	_tmp_dir: TempDir,
}

pub struct TestResponse {
	pub status: StatusCode,
	pub headers: HeaderMap,
	pub body: Value,
}

impl TestResponse {
	pub fn data(&self) -> &Value {
		&self.body["data"]
	}

	pub fn error_code(&self) -> Option<&str> {
		self.body["error"]["code"].as_str()
	}

	pub fn error_field(&self) -> Option<&str> {
		self.body["error"]["details"]["field"].as_str()
	}
}

pub async fn test_app() -> TestApp {
	build_test_app(None).await
}

pub async fn test_app_with_policy(write_policy: Arc<dyn WritePolicy>) -> TestApp {
	build_test_app(Some(write_policy)).await
}

async fn build_test_app(write_policy: Option<Arc<dyn WritePolicy>>) -> TestApp {
	let tmp_dir = TempDir::new().unwrap();
	let worker = Arc::new(WorkerPool::new(1, 2));

	let auth_adapter = AuthAdapterSqlite::new(worker, tmp_dir.path()).await.unwrap();
	let meta_adapter = MetaAdapterSqlite::new(tmp_dir.path()).await.unwrap();

	let mut builder = AppBuilder::new();
	builder
		.auth_adapter(Arc::new(auth_adapter))
		.meta_adapter(Arc::new(meta_adapter));
	if let Some(write_policy) = write_policy {
		builder.write_policy(write_policy);
	}
	let app = builder.build().unwrap();

	TestApp { router: routes::init(app.clone()), app, _tmp_dir: tmp_dir }
}

impl TestApp {
	pub async fn send_with(
		&self,
		method: Method,
		uri: &str,
		token: Option<&str>,
		body: Option<Value>,
		extra_headers: &[(&str, &str)],
	) -> TestResponse {
		let mut req = Request::builder().method(method).uri(uri).header(header::HOST, "testserver");
		if let Some(token) = token {
			req = req.header(header::AUTHORIZATION, format!("Bearer {}", token));
		}
		for (name, value) in extra_headers {
			req = req.header(*name, *value);
		}
		let req = match body {
			Some(body) => req
				.header(header::CONTENT_TYPE, "application/json")
				.body(Body::from(body.to_string()))
				.unwrap(),
			None => req.body(Body::empty()).unwrap(),
		};

		let res = self.router.clone().oneshot(req).await.unwrap();
		let status = res.status();
		let headers = res.headers().clone();
		let bytes = res.into_body().collect().await.unwrap().to_bytes();
		let body = if bytes.is_empty() { Value::Null } else { serde_json::from_slice(&bytes).unwrap() };

		TestResponse { status, headers, body }
	}

	pub async fn send(
		&self,
		method: Method,
		uri: &str,
		token: Option<&str>,
		body: Option<Value>,
	) -> TestResponse {
		self.send_with(method, uri, token, body, &[]).await
	}

	pub async fn get(&self, uri: &str) -> TestResponse {
		self.send(Method::GET, uri, None, None).await
	}

	pub async fn register_user(&self, username: &str, password: &str) -> TestResponse {
		self.send(
			Method::POST,
			"/register_user/",
			None,
			Some(json!({
				"username": username,
				"password": password,
				"email": format!("{}@example.com", username),
			})),
		)
		.await
	}

	pub async fn obtain_tokens(&self, username: &str, password: &str) -> TestResponse {
		self.send(
			Method::POST,
			"/api/token/",
			None,
			Some(json!({ "username": username, "password": password })),
		)
		.await
	}

	/// Registers a user and returns a fresh access token for it
	pub async fn user_token(&self, username: &str) -> String {
		let res = self.register_user(username, "s3cret-pass").await;
		assert_eq!(res.status, StatusCode::CREATED, "register {}: {}", username, res.body);
		let res = self.obtain_tokens(username, "s3cret-pass").await;
		assert_eq!(res.status, StatusCode::OK, "login {}: {}", username, res.body);
		res.data()["access"].as_str().unwrap().to_string()
	}

	/// Creates an event and returns its JSON representation
	pub async fn create_event(&self, token: &str, name: &str, start: &str, end: &str) -> Value {
		let res = self
			.send(
				Method::POST,
				"/events/",
				Some(token),
				Some(json!({
					"name": name,
					"description": format!("About {}", name),
					"start_date": start,
					"end_date": end,
				})),
			)
			.await;
		assert_eq!(res.status, StatusCode::CREATED, "create {}: {}", name, res.body);
		res.data().clone()
	}
}

pub fn event_uri(event: &Value, suffix: &str) -> String {
	format!("/events/{}/{}", event["id"].as_i64().unwrap(), suffix)
}

pub fn names(events: &Value) -> Vec<String> {
	events
		.as_array()
		.unwrap()
		.iter()
		.map(|e| e["name"].as_str().unwrap().to_string())
		.collect()
}

// vim: ts=4
