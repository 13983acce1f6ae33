mod common;

use anyhow::Result;
use axum::http::StatusCode;
use common::{get, json, with_token, TestApp};

#[tokio::test]
async fn root_lists_endpoints() -> Result<()> {
    let app = TestApp::new()?;
    let (status, body) = app.send(get("/")).await?;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["success"], true);
    assert!(body["data"]["endpoints"]["artworks"].is_string());
    Ok(())
}

#[tokio::test]
async fn health_reports_unreachable_database() -> Result<()> {
    let app = TestApp::new()?;
    let (status, body) = app.send(get("/health")).await?;

    assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
    assert_eq!(body["success"], false);
    assert_eq!(body["data"]["status"], "degraded");
    Ok(())
}

#[tokio::test]
async fn protected_routes_require_a_token() -> Result<()> {
    let app = TestApp::new()?;

    for uri in ["/api/auth/profile", "/api/categories/my", "/api/artworks/my", "/api/projects/my"] {
        let (status, body) = app.send(get(uri)).await?;
        assert_eq!(status, StatusCode::UNAUTHORIZED, "{}", uri);
        assert_eq!(body["message"], "Access token required");
    }
    Ok(())
}

#[tokio::test]
async fn rejects_forged_and_malformed_tokens() -> Result<()> {
    let app = TestApp::new()?;

    let (status, body) = app.send(with_token(get("/api/artworks/my"), "not.a.jwt")).await?;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["code"], "UNAUTHORIZED");

    let mut other = app.config.clone();
    other.security.jwt_secret = "someone-else".to_string();
    let forged = portfolio_cms_api::auth::issue_token(7, "ada", "ada@example.com", &other.security)?;
    let (status, _) = app.send(with_token(get("/api/artworks/my"), &forged)).await?;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    Ok(())
}

#[tokio::test]
async fn login_rejects_malformed_json() -> Result<()> {
    let app = TestApp::new()?;
    let (status, body) = app.send(json("POST", "/api/auth/login", "{not json")).await?;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], "INVALID_JSON");
    Ok(())
}

#[tokio::test]
async fn register_validates_before_touching_the_database() -> Result<()> {
    let app = TestApp::new()?;

    let (status, body) = app
        .send(json(
            "POST",
            "/api/auth/register",
            r#"{"username":"a b","email":"ada@example.com","password":"secret1"}"#,
        ))
        .await?;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["field_errors"]["username"].is_string());

    let (status, body) = app
        .send(json(
            "POST",
            "/api/auth/register",
            r#"{"username":"ada","email":"ada@example.com","password":"abc"}"#,
        ))
        .await?;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["field_errors"]["password"], "Password must be at least 6 characters long");
    Ok(())
}

#[tokio::test]
async fn database_outage_surfaces_as_503() -> Result<()> {
    let app = TestApp::new()?;
    let token = app.token()?;

    let (status, body) = app.send(with_token(get("/api/categories/my"), &token)).await?;
    assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
    assert_eq!(body["error"], true);
    Ok(())
}
