//! User registration, tokens and the shared response envelope

mod common;

use axum::http::{Method, StatusCode};
use serde_json::json;

use common::*;
use eventum_core::middleware::REQUEST_ID_HEADER;

#[tokio::test]
async fn test_register_user() {
	let t = test_app().await;

	let res = t.register_user("alice", "s3cret").await;
	assert_eq!(res.status, StatusCode::CREATED);
	assert_eq!(res.data()["username"], "alice");
	assert_eq!(res.data()["email"], "alice@example.com");
	assert!(res.data()["id"].as_i64().unwrap() > 0);
	assert!(res.data().get("password").is_none());
	assert!(!res.body.to_string().contains("s3cret"));
}

#[tokio::test]
async fn test_register_duplicate_username() {
	let t = test_app().await;
	assert_eq!(t.register_user("alice", "one").await.status, StatusCode::CREATED);

	let res = t.register_user("alice", "two").await;
	assert_eq!(res.status, StatusCode::BAD_REQUEST);
	assert_eq!(res.error_code(), Some("E-VALIDATION"));
	assert_eq!(res.error_field(), Some("username"));

	// The first account keeps its password
	assert_eq!(t.obtain_tokens("alice", "one").await.status, StatusCode::OK);
}

#[tokio::test]
async fn test_register_validation() {
	let t = test_app().await;

	let cases = [
		(json!({ "password": "pw" }), "username"),
		(json!({ "username": "", "password": "pw" }), "username"),
		(json!({ "username": "bad name", "password": "pw" }), "username"),
		(json!({ "username": "bob" }), "password"),
		(json!({ "username": "bob", "password": "pw", "email": "not-an-email" }), "email"),
	];
	for (body, field) in cases {
		let res = t.send(Method::POST, "/register_user/", None, Some(body.clone())).await;
		assert_eq!(res.status, StatusCode::BAD_REQUEST, "{}", body);
		assert_eq!(res.error_field(), Some(field), "{}", body);
	}

	// Email is optional
	let res = t
		.send(
			Method::POST,
			"/register_user/",
			None,
			Some(json!({ "username": "bob", "password": "pw", "email": "" })),
		)
		.await;
	assert_eq!(res.status, StatusCode::CREATED);
	assert!(res.data().get("email").is_none());
}

#[tokio::test]
async fn test_obtain_and_refresh_tokens() {
	let t = test_app().await;
	t.register_user("alice", "s3cret").await;

	let res = t.obtain_tokens("alice", "s3cret").await;
	assert_eq!(res.status, StatusCode::OK);
	let access = res.data()["access"].as_str().unwrap().to_string();
	let refresh = res.data()["refresh"].as_str().unwrap().to_string();
	assert_ne!(access, refresh);

	let res = t
		.send(Method::POST, "/api/token/refresh/", None, Some(json!({ "refresh": refresh })))
		.await;
	assert_eq!(res.status, StatusCode::OK);
	let new_access = res.data()["access"].as_str().unwrap().to_string();

	let token = new_access.as_str();
	let res = t
		.send(
			Method::POST,
			"/events/",
			Some(token),
			Some(json!({
				"name": "Party",
				"description": "x",
				"start_date": "2024-01-01",
				"end_date": "2024-01-02",
			})),
		)
		.await;
	assert_eq!(res.status, StatusCode::CREATED);
	assert_eq!(res.data()["creator"], "alice");
}

#[tokio::test]
async fn test_token_types_are_not_interchangeable() {
	let t = test_app().await;
	t.register_user("alice", "s3cret").await;
	let res = t.obtain_tokens("alice", "s3cret").await;
	let access = res.data()["access"].as_str().unwrap().to_string();
	let refresh = res.data()["refresh"].as_str().unwrap().to_string();

	let res = t
		.send(Method::POST, "/api/token/refresh/", None, Some(json!({ "refresh": access })))
		.await;
	assert_eq!(res.status, StatusCode::UNAUTHORIZED);

	let res = t.send(Method::GET, "/events/", Some(&refresh), None).await;
	assert_eq!(res.status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_wrong_credentials() {
	let t = test_app().await;
	t.register_user("alice", "s3cret").await;

	let res = t.obtain_tokens("alice", "wrong").await;
	assert_eq!(res.status, StatusCode::UNAUTHORIZED);
	assert_eq!(res.error_code(), Some("E-AUTH-UNAUTH"));

	let res = t.obtain_tokens("nobody", "s3cret").await;
	assert_eq!(res.status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_invalid_bearer_fails_on_public_routes() {
	let t = test_app().await;

	let res = t.send(Method::GET, "/events/", Some("garbage.token.value"), None).await;
	assert_eq!(res.status, StatusCode::UNAUTHORIZED);

	let res = t
		.send_with(Method::GET, "/events/", None, None, &[("authorization", "Basic YWxpY2U6cHc=")])
		.await;
	assert_eq!(res.status, StatusCode::UNAUTHORIZED);

	// No header at all is anonymous
	assert_eq!(t.get("/events/").await.status, StatusCode::OK);
}

#[tokio::test]
async fn test_api_root_lists_endpoints() {
	let t = test_app().await;

	let res = t.get("/").await;
	assert_eq!(res.status, StatusCode::OK);
	let events = &res.data()["events"];
	assert_eq!(events["url"], "http://testserver/events/");
	assert_eq!(events["methods"], json!(["GET", "POST"]));
	assert!(events["description"].as_str().is_some());
	assert_eq!(res.data()["register"]["url"], "http://testserver/register_user/");
	assert_eq!(res.data()["token_obtain_pair"]["url"], "http://testserver/api/token/");
	assert_eq!(res.data()["token_refresh"]["url"], "http://testserver/api/token/refresh/");
}

#[tokio::test]
async fn test_response_envelope_carries_request_id() {
	let t = test_app().await;

	let res = t.send_with(Method::GET, "/events/", None, None, &[(REQUEST_ID_HEADER, "req-42")]).await;
	assert_eq!(res.status, StatusCode::OK);
	assert_eq!(res.headers.get(REQUEST_ID_HEADER).unwrap(), "req-42");
	assert_eq!(res.body["reqId"], "req-42");
	assert!(res.body["time"].as_i64().unwrap() > 0);

	let res = t.get("/events/").await;
	let generated = res.headers.get(REQUEST_ID_HEADER).unwrap().to_str().unwrap();
	assert_eq!(res.body["reqId"], generated);
}

#[tokio::test]
async fn test_error_responses_carry_request_id_header() {
	let t = test_app().await;

	let res = t.send(Method::GET, "/events/", Some("bogus"), None).await;
	assert_eq!(res.status, StatusCode::UNAUTHORIZED);
	assert!(res.headers.get(REQUEST_ID_HEADER).is_some());
	assert!(res.body["error"]["message"].as_str().is_some());
}

// vim: ts=4
