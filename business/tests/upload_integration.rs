//! Upload batches end to end: multipart transfer, outcome classification and the single
//! refetch after the batch.

mod common;

use std::sync::Arc;

use common::{TestCtx, media_json, unreachable_api};
use serde_json::json;
use shoebox_business::{
    DEFAULT_DUPLICATE_SIGNAL, MediaApi, UploadEvent, UploadFile, UploadOutcome, UploadTracker,
    upload_and_refresh,
};
use wiremock::matchers::{body_string_contains, method, path};
use wiremock::{Mock, ResponseTemplate};

fn file(name: &str, len: usize) -> UploadFile {
    UploadFile::new(name, vec![b'x'; len])
}

async fn mount_upload(ctx: &TestCtx, file_name: &str, reply: serde_json::Value) {
    Mock::given(method("POST"))
        .and(path("/upload.php"))
        .and(body_string_contains(format!("filename=\"{file_name}\"")))
        .respond_with(ResponseTemplate::new(200).set_body_json(reply))
        .expect(1)
        .mount(&ctx.server)
        .await;
}

#[tokio::test]
async fn test_upload_sends_photo_part_with_file_name() {
    let ctx = TestCtx::new().await;
    Mock::given(method("POST"))
        .and(path("/upload.php"))
        .and(body_string_contains("name=\"photo\""))
        .and(body_string_contains("filename=\"beach.png\""))
        .and(body_string_contains("image/png"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "success": true,
            "message": "Tải ảnh thành công"
        })))
        .expect(1)
        .mount(&ctx.server)
        .await;

    let outcome = ctx
        .api
        .upload_one(file("beach.png", 32), Box::new(|_, _| {}))
        .await
        .expect("transfer should complete");
    assert_eq!(
        outcome,
        UploadOutcome::Success("Tải ảnh thành công".to_string())
    );
}

#[tokio::test]
async fn test_duplicate_signal_is_classified_as_duplicate() {
    let ctx = TestCtx::new().await;
    mount_upload(
        &ctx,
        "again.jpg",
        json!({"success": false, "message": DEFAULT_DUPLICATE_SIGNAL}),
    )
    .await;

    let outcome = ctx
        .api
        .upload_one(file("again.jpg", 8), Box::new(|_, _| {}))
        .await
        .unwrap();
    assert!(matches!(outcome, UploadOutcome::Duplicate(_)));
}

#[tokio::test]
async fn test_unexpected_reply_fails_closed() {
    let ctx = TestCtx::new().await;
    Mock::given(method("POST"))
        .and(path("/upload.php"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<b>Warning</b>: getimagesize()"))
        .mount(&ctx.server)
        .await;

    let outcome = ctx
        .api
        .upload_one(file("odd.jpg", 8), Box::new(|_, _| {}))
        .await
        .unwrap();
    assert!(matches!(outcome, UploadOutcome::Error(_)));
}

#[tokio::test]
async fn test_batch_with_failing_second_file_refetches_once() {
    let ctx = TestCtx::new().await;
    mount_upload(&ctx, "file1.jpg", json!({"success": true, "message": "ok"})).await;
    mount_upload(
        &ctx,
        "file2.jpg",
        json!({"success": false, "message": "Định dạng ảnh không hỗ trợ"}),
    )
    .await;
    mount_upload(&ctx, "file3.jpg", json!({"success": true, "message": "ok"})).await;
    Mock::given(method("GET"))
        .and(path("/get_media.php"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!([media_json(2, "file3.jpg"), media_json(1, "file1.jpg")])),
        )
        .expect(1)
        .mount(&ctx.server)
        .await;

    let api: Arc<dyn MediaApi> = Arc::new(ctx.api.clone());
    let (tx, rx) = flume::unbounded();
    let (summary, fetched) = upload_and_refresh(
        api,
        vec![
            file("file1.jpg", 100),
            file("file2.jpg", 100),
            file("file3.jpg", 100),
        ],
        &tx,
    )
    .await
    .expect("batch is not empty");

    assert_eq!(summary.success_count, 2);
    assert!(summary.duplicates.is_empty());
    assert_eq!(summary.errors.len(), 1);
    assert_eq!(summary.errors[0].file_name, "file2.jpg");
    assert_eq!(summary.errors[0].message, "Định dạng ảnh không hỗ trợ");
    assert_eq!(fetched.expect("refetch should decode").len(), 2);

    let mut tracker = UploadTracker::default();
    let mut finished = None;
    for event in rx.drain() {
        if let Some(summary) = tracker.apply(event) {
            finished = Some(summary);
        }
    }
    assert_eq!(finished, Some(summary));
    assert!(tracker.tasks().is_empty());
    assert!(!tracker.is_in_flight());
}

#[tokio::test]
async fn test_progress_ticks_follow_chunks() {
    let server = wiremock::MockServer::start().await;
    let mut config = shoebox_business::BusinessConfig::new(server.uri());
    config.upload_chunk_size = 10;
    let api = shoebox_business::HttpMediaApi::new(config).unwrap();
    Mock::given(method("POST"))
        .and(path("/upload.php"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "success": true,
            "message": "ok"
        })))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/get_media.php"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
        .mount(&server)
        .await;

    let (tx, rx) = flume::unbounded();
    upload_and_refresh(Arc::new(api), vec![file("big.jpg", 35)], &tx)
        .await
        .unwrap();

    let percents: Vec<u8> = rx
        .drain()
        .filter_map(|event| match event {
            UploadEvent::Progress { progress, .. } => Some(progress.percent),
            _ => None,
        })
        .collect();
    assert!(!percents.is_empty());
    assert!(percents.windows(2).all(|w| w[0] <= w[1]), "{percents:?}");
    assert_eq!(percents.last(), Some(&100));
}

#[tokio::test]
async fn test_unreachable_server_reports_generic_error() {
    let api: Arc<dyn MediaApi> = Arc::new(unreachable_api());

    let (tx, _rx) = flume::unbounded();
    let (summary, fetched) = upload_and_refresh(api, vec![file("lost.jpg", 4)], &tx)
        .await
        .unwrap();
    assert_eq!(summary.errors.len(), 1);
    assert_eq!(summary.errors[0].to_string(), "lost.jpg: could not upload file");
    assert!(fetched.unwrap_err().is_network());
}

#[tokio::test]
async fn test_file_read_from_disk_keeps_its_name() {
    let dir = tempfile::tempdir().unwrap();
    let on_disk = dir.path().join("harbour.jpg");
    tokio::fs::write(&on_disk, b"jpeg bytes").await.unwrap();

    let file = UploadFile::from_path(&on_disk).await.unwrap();
    assert_eq!(file.file_name, "harbour.jpg");
    assert_eq!(file.bytes, b"jpeg bytes".to_vec());
    assert_eq!(file.mime().essence_str(), "image/jpeg");

    let ctx = TestCtx::new().await;
    mount_upload(
        &ctx,
        "harbour.jpg",
        json!({"success": true, "message": "Tải ảnh thành công"}),
    )
    .await;
    let outcome = ctx
        .api
        .upload_one(file, Box::new(|_, _| {}))
        .await
        .unwrap();
    assert!(outcome.is_success());
}

#[tokio::test]
async fn test_missing_file_cannot_be_read() {
    let dir = tempfile::tempdir().unwrap();
    let err = UploadFile::from_path(dir.path().join("gone.mp4"))
        .await
        .unwrap_err();
    assert_eq!(err.kind(), std::io::ErrorKind::NotFound);
}

#[tokio::test]
async fn test_batch_finishes_after_receiver_is_gone() {
    let ctx = TestCtx::new().await;
    mount_upload(&ctx, "a.jpg", json!({"success": true, "message": "ok"})).await;
    mount_upload(&ctx, "b.jpg", json!({"success": true, "message": "ok"})).await;
    ctx.reply("GET", "get_media.php", json!([])).await;

    let api: Arc<dyn MediaApi> = Arc::new(ctx.api.clone());
    let (tx, rx) = flume::unbounded();
    drop(rx);
    let (summary, fetched) =
        upload_and_refresh(api, vec![file("a.jpg", 64), file("b.jpg", 64)], &tx)
            .await
            .unwrap();

    assert_eq!(summary.success_count, 2);
    assert!(fetched.unwrap().is_empty());
}
