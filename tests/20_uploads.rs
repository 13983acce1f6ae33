mod common;

use anyhow::Result;
use axum::http::StatusCode;
use common::{multipart, with_token, Part, TestApp};

const PNG: &[u8] = &[0x89, b'P', b'N', b'G', 0x0d, 0x0a, 0x1a, 0x0a];

#[tokio::test]
async fn artwork_type_must_be_portfolio_or_scratch() -> Result<()> {
    let app = TestApp::new()?;
    let token = app.token()?;

    let request = multipart(
        "POST",
        "/api/artworks",
        &[
            Part::Text("title", "Dusk"),
            Part::Text("type", "bogus"),
            Part::File {
                field: "image",
                file_name: "dusk.png",
                content_type: "image/png",
                bytes: PNG,
            },
        ],
    );
    let (status, body) = app.send(with_token(request, &token)).await?;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["field_errors"]["type"], r#"Type must be either "portfolio" or "scratch""#);
    Ok(())
}

#[tokio::test]
async fn artwork_requires_an_image() -> Result<()> {
    let app = TestApp::new()?;
    let token = app.token()?;

    let request = multipart("POST", "/api/artworks", &[Part::Text("title", "Dusk")]);
    let (status, body) = app.send(with_token(request, &token)).await?;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["message"], "Image file is required");
    Ok(())
}

#[tokio::test]
async fn missing_image_is_reported_before_a_bad_type() -> Result<()> {
    let app = TestApp::new()?;
    let token = app.token()?;

    let request = multipart(
        "POST",
        "/api/artworks",
        &[Part::Text("title", "Dusk"), Part::Text("type", "bogus")],
    );
    let (status, body) = app.send(with_token(request, &token)).await?;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["message"], "Image file is required");
    assert!(body["field_errors"]["type"].is_null());
    Ok(())
}

#[tokio::test]
async fn uploads_must_be_images() -> Result<()> {
    let app = TestApp::new()?;
    let token = app.token()?;

    let request = multipart(
        "POST",
        "/api/artworks",
        &[Part::File {
            field: "image",
            file_name: "notes.txt",
            content_type: "text/plain",
            bytes: b"hello",
        }],
    );
    let (status, body) = app.send(with_token(request, &token)).await?;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["field_errors"]["image"], "Only image files are allowed");
    Ok(())
}

#[tokio::test]
async fn project_requires_at_least_one_image() -> Result<()> {
    let app = TestApp::new()?;
    let token = app.token()?;

    let request = multipart("POST", "/api/projects", &[Part::Text("title", "Zine")]);
    let (status, body) = app.send(with_token(request, &token)).await?;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["message"], "At least one image file is required");
    Ok(())
}

#[tokio::test]
async fn project_requires_a_title() -> Result<()> {
    let app = TestApp::new()?;
    let token = app.token()?;

    let request = multipart(
        "POST",
        "/api/projects",
        &[
            Part::Text("title", "   "),
            Part::File {
                field: "images",
                file_name: "cover.png",
                content_type: "image/png",
                bytes: PNG,
            },
        ],
    );
    let (status, body) = app.send(with_token(request, &token)).await?;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["field_errors"]["title"], "Title is required");
    Ok(())
}

#[tokio::test]
async fn project_image_count_is_capped() -> Result<()> {
    let app = TestApp::new()?;
    let token = app.token()?;
    let max = app.config.api.max_images_per_field;

    let names: Vec<String> = (0..=max).map(|i| format!("p{}.png", i)).collect();
    let parts: Vec<Part<'_>> = names
        .iter()
        .map(|name| Part::File {
            field: "images",
            file_name: name,
            content_type: "image/png",
            bytes: PNG,
        })
        .collect();
    let (status, _) = app
        .send(with_token(multipart("POST", "/api/projects", &parts), &token))
        .await?;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    Ok(())
}
