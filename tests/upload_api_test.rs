mod common;

use axum::{
    body::Body,
    http::{Request, StatusCode},
};

use common::setup;

const BOUNDARY: &str = "----mathlearningboundary";

fn multipart_request(uri: &str, token: &str, filename: &str, data: &[u8]) -> Request<Body> {
    let mut body = Vec::new();
    body.extend_from_slice(format!("--{}\r\n", BOUNDARY).as_bytes());
    body.extend_from_slice(
        format!(
            "Content-Disposition: form-data; name=\"file\"; filename=\"{}\"\r\n",
            filename
        )
        .as_bytes(),
    );
    body.extend_from_slice(b"Content-Type: application/octet-stream\r\n\r\n");
    body.extend_from_slice(data);
    body.extend_from_slice(format!("\r\n--{}--\r\n", BOUNDARY).as_bytes());

    Request::builder()
        .method("POST")
        .uri(uri)
        .header("authorization", format!("Bearer {}", token))
        .header(
            "content-type",
            format!("multipart/form-data; boundary={}", BOUNDARY),
        )
        .body(Body::from(body))
        .unwrap()
}

const PNG_BYTES: &[u8] = &[0x89, 0x50, 0x4E, 0x47, 0x0D, 0x0A, 0x1A, 0x0A, 0x00, 0x00];

#[tokio::test]
async fn teacher_uploads_and_deletes_an_image() {
    let Some(app) = setup().await else { return };
    let (_, teacher) = app.register_and_login("teacher").await;

    let (status, saved) = app
        .send(multipart_request(
            "/api/upload/image",
            &teacher,
            "graph.PNG",
            PNG_BYTES,
        ))
        .await;
    assert_eq!(status, StatusCode::OK, "{}", saved);
    assert_eq!(saved["success"], true);
    assert_eq!(saved["size"].as_u64(), Some(PNG_BYTES.len() as u64));
    let filename = saved["filename"].as_str().unwrap().to_string();
    assert!(filename.ends_with(".png"));
    assert_eq!(saved["url"], format!("/uploads/images/{}", filename));

    let (status, _) = app
        .call(
            "DELETE",
            &format!("/api/upload/images/{}", filename),
            Some(&teacher),
            None,
        )
        .await;
    assert_eq!(status, StatusCode::OK);

    let (status, _) = app
        .call(
            "DELETE",
            &format!("/api/upload/images/{}", filename),
            Some(&teacher),
            None,
        )
        .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn rejects_wrong_extension_and_forged_content() {
    let Some(app) = setup().await else { return };
    let (_, teacher) = app.register_and_login("teacher").await;

    let (status, _) = app
        .send(multipart_request(
            "/api/upload/image",
            &teacher,
            "notes.txt",
            b"hello",
        ))
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, _) = app
        .send(multipart_request(
            "/api/upload/image",
            &teacher,
            "fake.png",
            b"not really a png",
        ))
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, _) = app
        .call(
            "DELETE",
            "/api/upload/documents/file.png",
            Some(&teacher),
            None,
        )
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn students_cannot_upload() {
    let Some(app) = setup().await else { return };
    let (_, student) = app.register_and_login("student").await;

    let (status, _) = app
        .send(multipart_request(
            "/api/upload/image",
            &student,
            "graph.png",
            PNG_BYTES,
        ))
        .await;
    assert_eq!(status, StatusCode::FORBIDDEN);
}
