mod common;

use anyhow::Result;
use reqwest::StatusCode;
use serde_json::{json, Value};

#[tokio::test]
async fn register_returns_public_fields() -> Result<()> {
    let server = common::ensure_server().await?;
    let client = reqwest::Client::new();
    let email = common::unique_email("register");

    let user = common::register(&client, server, &email, "secret1").await?;

    assert_eq!(user["email"], email.as_str());
    assert_eq!(user["name"], "Test User");
    assert_eq!(user["provider"], false);
    assert!(user["id"].is_string());
    assert!(user.get("password").is_none());
    assert!(user.get("password_hash").is_none());
    Ok(())
}

#[tokio::test]
async fn duplicate_email_is_rejected() -> Result<()> {
    let server = common::ensure_server().await?;
    let client = reqwest::Client::new();
    let email = common::unique_email("dup");

    common::register(&client, server, &email, "secret1").await?;

    let res = client
        .post(server.url("/users"))
        .json(&json!({ "name": "Again", "email": email, "password": "secret2" }))
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);
    let body = res.json::<Value>().await?;
    assert_eq!(body["code"], "CONFLICT", "{}", body);
    assert_eq!(body["message"], "User already exists", "{}", body);
    Ok(())
}

#[tokio::test]
async fn invalid_registration_reports_fields() -> Result<()> {
    let server = common::ensure_server().await?;
    let client = reqwest::Client::new();

    let res = client
        .post(server.url("/users"))
        .json(&json!({ "name": "Shorty", "email": "not-an-email", "password": "123" }))
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);
    let body = res.json::<Value>().await?;
    assert_eq!(body["code"], "VALIDATION_ERROR", "{}", body);
    assert!(body["field_errors"]["email"].is_string(), "{}", body);
    assert!(body["field_errors"]["password"].is_string(), "{}", body);
    Ok(())
}

#[tokio::test]
async fn malformed_json_is_rejected() -> Result<()> {
    let server = common::ensure_server().await?;
    let client = reqwest::Client::new();

    let res = client
        .post(server.url("/users"))
        .header("content-type", "application/json")
        .body("{ not json")
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);
    let body = res.json::<Value>().await?;
    assert_eq!(body["code"], "INVALID_JSON", "{}", body);
    Ok(())
}

#[tokio::test]
async fn wrong_old_password_is_unauthorized() -> Result<()> {
    let server = common::ensure_server().await?;
    let client = reqwest::Client::new();
    let (_, token) = common::signed_in_user(&client, server, "oldpw").await?;

    let res = client
        .put(server.url("/users"))
        .bearer_auth(&token)
        .json(&json!({ "oldPassword": "wrong-1", "password": "secret2", "confirmPassword": "secret2" }))
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::UNAUTHORIZED);
    let body = res.json::<Value>().await?;
    assert_eq!(body["message"], "Password does not match", "{}", body);
    Ok(())
}

#[tokio::test]
async fn mismatched_confirmation_fails_validation() -> Result<()> {
    let server = common::ensure_server().await?;
    let client = reqwest::Client::new();
    let (_, token) = common::signed_in_user(&client, server, "confirm").await?;

    let res = client
        .put(server.url("/users"))
        .bearer_auth(&token)
        .json(&json!({ "oldPassword": "secret1", "password": "secret2", "confirmPassword": "secret3" }))
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);
    let body = res.json::<Value>().await?;
    assert!(body["field_errors"]["confirmPassword"].is_string(), "{}", body);
    Ok(())
}

#[tokio::test]
async fn email_change_to_taken_address_conflicts() -> Result<()> {
    let server = common::ensure_server().await?;
    let client = reqwest::Client::new();
    let taken = common::unique_email("taken");
    common::register(&client, server, &taken, "secret1").await?;
    let (id, token) = common::signed_in_user(&client, server, "mover").await?;

    let res = client
        .put(server.url("/users"))
        .bearer_auth(&token)
        .json(&json!({ "email": taken }))
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);
    let body = res.json::<Value>().await?;
    assert_eq!(body["code"], "CONFLICT", "{}", body);

    let fresh = common::unique_email("moved");
    let res = client
        .put(server.url("/users"))
        .bearer_auth(&token)
        .json(&json!({ "email": fresh, "name": "Renamed" }))
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::OK);
    let body = res.json::<Value>().await?;
    assert_eq!(body["data"]["id"], id.as_str());
    assert_eq!(body["data"]["email"], fresh.as_str());
    assert_eq!(body["data"]["name"], "Renamed");
    assert!(body["data"]["avatar"].is_null(), "{}", body);
    Ok(())
}
