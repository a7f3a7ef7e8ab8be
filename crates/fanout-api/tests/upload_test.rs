mod helpers;

use axum_test::multipart::MultipartForm;
use helpers::fixtures::{jpeg_form, jpeg_part, text_part};
use helpers::storage::MockRemoteStore;
use helpers::{setup_test_app, setup_test_app_with, TEST_BUCKET};

#[tokio::test]
async fn test_upload_jpeg_and_text_file() {
    let app = setup_test_app().await;
    let client = app.client();

    let form = MultipartForm::new()
        .add_part("files", jpeg_part("Summer Trip.JPG"))
        .add_part("files", text_part("notes.txt"));
    let response = client.post("/uploads/v2").multipart(form).await;

    assert_eq!(response.status_code(), 200);
    assert_eq!(response.text(), "all files uploaded");

    let artifacts = app.local_artifacts();
    assert_eq!(artifacts.len(), 4);

    let names: Vec<String> = artifacts
        .iter()
        .map(|p| p.file_name().unwrap().to_string_lossy().into_owned())
        .collect();
    let original = names
        .iter()
        .find(|n| !n.starts_with("lg_") && !n.starts_with("md_") && !n.starts_with("sm_"))
        .expect("original variant missing");
    assert!(original.ends_with(".jpg"));
    for prefix in ["lg_", "md_", "sm_"] {
        assert!(names.contains(&format!("{}{}", prefix, original)));
    }

    // <services>/<uuid>/posts/images/<file>
    let parent = artifacts[0].parent().unwrap();
    assert!(parent.ends_with("posts/images"));
    assert!(artifacts.iter().all(|p| p.parent().unwrap() == parent));

    let keys = app.wait_for_remote_objects(4).await;
    assert_eq!(keys.len(), 4);
    assert!(keys.iter().all(|k| k.starts_with(&format!("{}/", TEST_BUCKET))));
    assert_eq!(
        app.remote.content_type(&keys[0]).as_deref(),
        Some("image/jpeg")
    );
}

#[tokio::test]
async fn test_eleven_files_are_rejected_without_side_effects() {
    let app = setup_test_app().await;

    let response = app.client().post("/uploads/v2").multipart(jpeg_form(11)).await;

    assert_eq!(response.status_code(), 500);
    assert_eq!(
        response.text(),
        "please remove some images, only 10 files are allowed to upload"
    );
    assert!(app.local_artifacts().is_empty());
    assert!(app.remote.keys().is_empty());
    assert_eq!(app.remote.provision_count(), 0);
}

#[tokio::test]
async fn test_ten_files_are_accepted() {
    let app = setup_test_app().await;

    let response = app.client().post("/uploads/v2").multipart(jpeg_form(10)).await;

    assert_eq!(response.status_code(), 200);
    assert_eq!(app.local_artifacts().len(), 40);
}

#[tokio::test]
async fn test_missing_files_field() {
    let app = setup_test_app().await;

    let form = MultipartForm::new().add_text("caption", "no files here");
    let response = app.client().post("/uploads/v2").multipart(form).await;

    assert_eq!(response.status_code(), 500);
    assert_eq!(response.text(), "please select some files to upload");
    assert_eq!(app.remote.provision_count(), 0);
}

#[tokio::test]
async fn test_only_unsupported_files() {
    let app = setup_test_app().await;

    let form = MultipartForm::new()
        .add_part("files", text_part("a.txt"))
        .add_part("files", text_part("b.txt"));
    let response = app.client().post("/uploads/v2").multipart(form).await;

    assert_eq!(response.status_code(), 500);
    assert_eq!(response.text(), "invalid files given.");
    assert!(app.local_artifacts().is_empty());
    assert_eq!(app.remote.provision_count(), 0);
}

#[tokio::test]
async fn test_non_multipart_body_is_a_parse_failure() {
    let app = setup_test_app().await;

    let response = app
        .client()
        .post("/uploads/v2")
        .text("plain body")
        .await;

    assert_eq!(response.status_code(), 500);
    assert!(app.local_artifacts().is_empty());
}

#[tokio::test]
async fn test_wait_for_remote_reports_outcomes() {
    let app = setup_test_app_with(true, MockRemoteStore::failing_on("/lg_")).await;

    let form = MultipartForm::new().add_part("files", jpeg_part("photo.jpg"));
    let response = app.client().post("/uploads/v2").multipart(form).await;

    assert_eq!(response.status_code(), 200);
    let report: serde_json::Value = response.json();
    assert_eq!(report["message"], "all files uploaded");

    let tiers = report["files"][0]["tiers"].as_array().unwrap();
    assert_eq!(tiers.len(), 4);
    for tier in tiers {
        assert_eq!(tier["local"]["status"], "stored");
        let expected = if tier["tier"] == "large" { "failed" } else { "stored" };
        assert_eq!(tier["remote"]["status"], expected, "tier {}", tier["tier"]);
    }

    assert_eq!(app.local_artifacts().len(), 4);
    assert_eq!(app.remote.keys().len(), 3);
}
