use egui_kittest::Harness;
use serde_json::{Value, json};
use shoebox_ui::ShoeboxApp;
use shoebox_ui::state::State;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

pub struct TestCtx<'a> {
    mock_server: MockServer,
    harness: Harness<'a, ShoeboxApp>,
}

impl<'a> TestCtx<'a> {
    /// App pointed at a mock server where nobody is signed in.
    pub async fn new_app() -> Self {
        let mock_server = MockServer::start().await;
        Self::mount(
            &mock_server,
            "GET",
            "check_login.php",
            json!({ "success": false, "message": "Not logged in" }),
        )
        .await;
        Self::with_server(mock_server)
    }

    /// App whose session check confirms `username`, with `items` in the library.
    #[allow(unused)]
    pub async fn new_signed_in_app(username: &str, items: Vec<Value>) -> Self {
        Self::new_signed_in_app_with(username, Value::Array(items)).await
    }

    /// Same as [`Self::new_signed_in_app`] with an arbitrary listing reply.
    #[allow(unused)]
    pub async fn new_signed_in_app_with(username: &str, listing: Value) -> Self {
        let mock_server = MockServer::start().await;
        Self::mount(
            &mock_server,
            "GET",
            "check_login.php",
            json!({ "success": true, "user": { "id": "1", "username": username } }),
        )
        .await;
        Self::mount(&mock_server, "GET", "get_media.php", listing).await;
        Self::with_server(mock_server)
    }

    fn with_server(mock_server: MockServer) -> Self {
        let state = State::test(mock_server.uri());
        let app = ShoeboxApp::new(state);
        let harness = Harness::builder()
            .with_size(egui::vec2(1024.0, 768.0))
            .build_eframe(|_| app);
        Self {
            mock_server,
            harness,
        }
    }

    async fn mount(server: &MockServer, verb: &str, endpoint: &str, body: Value) {
        Mock::given(method(verb))
            .and(path(format!("/{endpoint}")))
            .respond_with(ResponseTemplate::new(200).set_body_json(body))
            .mount(server)
            .await;
    }

    #[allow(unused)]
    pub async fn reply(&self, verb: &str, endpoint: &str, body: Value) {
        Self::mount(&self.mock_server, verb, endpoint, body).await;
    }

    #[allow(unused)]
    pub fn server(&self) -> &MockServer {
        &self.mock_server
    }

    pub fn harness_mut(&mut self) -> &mut Harness<'a, ShoeboxApp> {
        &mut self.harness
    }

    /// Steps the app until `label` shows up, giving background requests time to land.
    #[allow(unused)]
    pub async fn wait_for_label(&mut self, label: &str) -> bool {
        use kittest::Queryable as _;

        for _ in 0..50 {
            tokio::time::sleep(std::time::Duration::from_millis(20)).await;
            self.harness.step();
            if self.harness.query_by_label_contains(label).is_some() {
                return true;
            }
        }
        false
    }
}

/// One listing entry the way the server sends it.
#[allow(unused)]
pub fn media_json(id: i64, name: &str) -> Value {
    json!({
        "id": id.to_string(),
        "file_name": name,
        "file_path": format!("photos/user_1/{name}"),
        "thumbnail_path": format!("thumbnails/user_1/thumb_{name}"),
        "media_type": "image",
        "uploaded_at": "2024-05-01 09:30:00"
    })
}
