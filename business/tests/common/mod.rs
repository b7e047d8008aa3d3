use serde_json::{Value, json};
use shoebox_business::{BusinessConfig, HttpMediaApi};
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

pub struct TestCtx {
    pub server: MockServer,
    pub api: HttpMediaApi,
}

impl TestCtx {
    pub async fn new() -> Self {
        let server = MockServer::start().await;
        let api = HttpMediaApi::new(BusinessConfig::new(server.uri()))
            .expect("client should build");
        Self { server, api }
    }

    /// Mounts a JSON reply for `verb` on `/<endpoint>`.
    pub async fn reply(&self, verb: &str, endpoint: &str, body: Value) {
        Mock::given(method(verb))
            .and(path(format!("/{endpoint}")))
            .respond_with(ResponseTemplate::new(200).set_body_json(body))
            .mount(&self.server)
            .await;
    }
}

#[allow(unused)]
pub fn media_json(id: i64, file_name: &str) -> Value {
    json!({
        "id": id.to_string(),
        "file_name": file_name,
        "file_path": format!("photos/user_1/{file_name}"),
        "thumbnail_path": format!("thumbnails/user_1/thumb_{file_name}"),
        "media_type": "image",
        "uploaded_at": "2024-05-01 09:30:00",
        "capture_date": null
    })
}

/// Nothing listens on the discard port, so every request fails to connect.
#[allow(unused)]
pub const UNREACHABLE_BASE_URL: &str = "http://127.0.0.1:9";

#[allow(unused)]
pub fn unreachable_api() -> HttpMediaApi {
    HttpMediaApi::new(BusinessConfig::new(UNREACHABLE_BASE_URL)).expect("client should build")
}
