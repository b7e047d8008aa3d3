//! Typed boundary to the storage and authentication collaborator.
//!
//! Every reply is decoded into an explicit type here. Anything that does not have the
//! expected shape fails closed as [`ApiError::Decode`] (or [`UploadOutcome::Error`] for
//! uploads) instead of leaking untyped JSON into the controllers.

use async_trait::async_trait;
use log::{debug, error, info, warn};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::config::BusinessConfig;
use crate::error::{ApiError, HttpError, ValidationError};
use crate::http::{self, ProgressFn, Response};
use crate::media::{MediaCollection, MediaId, MediaItem};
use crate::session::{LoginInput, RegisterInput, SessionUser};
use crate::upload::{UploadFile, UploadOutcome};

const CHECK_SESSION_ENDPOINT: &str = "check_login.php";
const LOGIN_ENDPOINT: &str = "login.php";
const LOGOUT_ENDPOINT: &str = "logout.php";
const REGISTER_ENDPOINT: &str = "register.php";
const UPLOAD_ENDPOINT: &str = "upload.php";
const DELETE_ENDPOINT: &str = "delete.php";
/// Multipart field the upload endpoint reads the file from.
const UPLOAD_FIELD: &str = "photo";

/// Operations consumed from the collaborator.
#[async_trait]
pub trait MediaApi: Send + Sync {
    /// `Some(user)` while the server-side session is alive.
    async fn check_session(&self) -> Result<Option<SessionUser>, ApiError>;

    /// Returns the signed-in user and the server's greeting message.
    async fn login(&self, input: &LoginInput) -> Result<(SessionUser, String), ApiError>;

    async fn logout(&self) -> Result<String, ApiError>;

    async fn register(&self, input: &RegisterInput) -> Result<String, ApiError>;

    async fn list_media(&self) -> Result<MediaCollection, ApiError>;

    /// Sends one file, reporting `(loaded, total)` bytes through `on_progress`.
    ///
    /// Server verdicts (including rejections) come back as `Ok`; `Err` means the transfer
    /// itself failed.
    async fn upload_one(
        &self,
        file: UploadFile,
        on_progress: ProgressFn,
    ) -> Result<UploadOutcome, ApiError>;

    async fn delete_many(&self, ids: &[MediaId]) -> Result<String, ApiError>;
}

/// The `{success, message, user?}` envelope shared by every mutating endpoint.
#[derive(Debug, Clone, Deserialize)]
pub struct StatusReply {
    pub success: bool,
    #[serde(default)]
    pub message: String,
    #[serde(default)]
    pub user: Option<SessionUser>,
}

impl StatusReply {
    fn into_result(self) -> Result<Self, ApiError> {
        if self.success {
            Ok(self)
        } else {
            Err(ApiError::Rejected(self.message))
        }
    }
}

#[derive(Serialize)]
struct LoginBody<'a> {
    /// Accepts either a username or an email.
    email: &'a str,
    password: &'a str,
}

#[derive(Serialize)]
struct RegisterBody<'a> {
    username: &'a str,
    email: &'a str,
    password: &'a str,
}

#[derive(Serialize)]
struct DeleteBody<'a> {
    ids: &'a [MediaId],
}

/// [`MediaApi`] over HTTP with a cookie-backed session.
#[derive(Debug, Clone)]
pub struct HttpMediaApi {
    client: http::Client,
    config: BusinessConfig,
}

impl HttpMediaApi {
    pub fn new(config: BusinessConfig) -> Result<Self, ApiError> {
        let client = http::Client::new(config.request_timeout)?;
        Ok(Self { client, config })
    }

    pub fn config(&self) -> &BusinessConfig {
        &self.config
    }

    async fn post_json<T: Serialize + Sync>(
        &self,
        endpoint: &str,
        body: &T,
    ) -> Result<StatusReply, ApiError> {
        let response = self
            .client
            .post(self.config.endpoint(endpoint))
            .json(body)
            .map_err(|e| ApiError::Decode(e.to_string()))?
            .send()
            .await?;
        decode_status(endpoint, &response)
    }
}

/// Decodes a `{success, message}` envelope.
///
/// A body that does not parse fails closed: on a non-2xx status it is reported as a
/// rejection naming the status, otherwise as a decode failure.
fn decode_status(endpoint: &str, response: &Response) -> Result<StatusReply, ApiError> {
    match response.json::<StatusReply>() {
        Ok(reply) => Ok(reply),
        Err(err) if !response.is_success() => {
            warn!(
                "MediaApi: {endpoint} answered {} with unreadable body: {err}",
                response.status
            );
            Err(ApiError::Rejected(format!(
                "Server error (status {})",
                response.status
            )))
        }
        Err(err) => {
            warn!("MediaApi: {endpoint} reply did not decode: {err}");
            Err(ApiError::Decode(err.to_string()))
        }
    }
}

/// Decodes the listing reply: an array of items, or an error object.
pub fn decode_media_list(response: &Response) -> Result<MediaCollection, ApiError> {
    let value: Value = match response.json() {
        Ok(value) => value,
        Err(err) if !response.is_success() => {
            warn!(
                "MediaApi: listing answered {} with unreadable body: {err}",
                response.status
            );
            return Err(ApiError::Rejected(format!(
                "Server error (status {})",
                response.status
            )));
        }
        Err(err) => return Err(ApiError::Decode(err.to_string())),
    };

    match value {
        Value::Array(items) => {
            let items: Vec<MediaItem> = serde_json::from_value(Value::Array(items))
                .map_err(|e| ApiError::Decode(e.to_string()))?;
            Ok(MediaCollection::new(items))
        }
        Value::Object(map) => {
            let message = ["message", "error"]
                .iter()
                .find_map(|key| map.get(*key).and_then(Value::as_str))
                .map(str::to_string);
            match message {
                Some(message) => Err(ApiError::Rejected(message)),
                None => Err(ApiError::Decode("expected an array of media".to_string())),
            }
        }
        other => Err(ApiError::Decode(format!(
            "expected an array of media, got {other}"
        ))),
    }
}

#[async_trait]
impl MediaApi for HttpMediaApi {
    async fn check_session(&self) -> Result<Option<SessionUser>, ApiError> {
        debug!("MediaApi: checking session");
        let response = self
            .client
            .get(self.config.endpoint(CHECK_SESSION_ENDPOINT))
            .send()
            .await?;
        let reply = decode_status(CHECK_SESSION_ENDPOINT, &response)?;
        match (reply.success, reply.user) {
            (true, Some(user)) => {
                info!("MediaApi: session alive for '{}'", user.username);
                Ok(Some(user))
            }
            (true, None) => Err(ApiError::Decode(
                "session reply marked success without a user".to_string(),
            )),
            (false, _) => {
                info!("MediaApi: no active session ({})", reply.message);
                Ok(None)
            }
        }
    }

    async fn login(&self, input: &LoginInput) -> Result<(SessionUser, String), ApiError> {
        input.validate()?;
        info!("MediaApi: logging in");
        let body = LoginBody {
            email: input.credential.trim(),
            password: &input.password,
        };
        let reply = self.post_json(LOGIN_ENDPOINT, &body).await?.into_result()?;
        let user = reply.user.ok_or_else(|| {
            ApiError::Decode("login reply marked success without a user".to_string())
        })?;
        info!("MediaApi: logged in as '{}'", user.username);
        Ok((user, reply.message))
    }

    async fn logout(&self) -> Result<String, ApiError> {
        info!("MediaApi: logging out");
        let response = self
            .client
            .post(self.config.endpoint(LOGOUT_ENDPOINT))
            .send()
            .await?;
        let reply = decode_status(LOGOUT_ENDPOINT, &response)?.into_result()?;
        Ok(reply.message)
    }

    async fn register(&self, input: &RegisterInput) -> Result<String, ApiError> {
        input.validate()?;
        info!("MediaApi: registering '{}'", input.username.trim());
        let body = RegisterBody {
            username: input.username.trim(),
            email: input.email.trim(),
            password: &input.password,
        };
        let reply = self
            .post_json(REGISTER_ENDPOINT, &body)
            .await?
            .into_result()?;
        Ok(reply.message)
    }

    async fn list_media(&self) -> Result<MediaCollection, ApiError> {
        let url = self.config.media_list_url();
        debug!("MediaApi: fetching media from {url}");
        let response = self.client.get(url).send().await?;
        let collection = decode_media_list(&response)?;
        info!("MediaApi: fetched {} media item(s)", collection.len());
        Ok(collection)
    }

    async fn upload_one(
        &self,
        file: UploadFile,
        on_progress: ProgressFn,
    ) -> Result<UploadOutcome, ApiError> {
        let total = file.len();
        let mime = file.mime();
        let file_name = file.file_name.clone();
        debug!("MediaApi: uploading '{file_name}' ({total} bytes, {mime})");

        let body = http::progress_body(file.bytes, self.config.upload_chunk_size, on_progress);
        let part = reqwest::multipart::Part::stream_with_length(body, total)
            .file_name(file_name.clone())
            .mime_str(mime.as_ref())
            .map_err(HttpError::from)?;
        let form = reqwest::multipart::Form::new().part(UPLOAD_FIELD, part);

        let response = self
            .client
            .post(self.config.endpoint(UPLOAD_ENDPOINT))
            .multipart(form)
            .send()
            .await
            .inspect_err(|err| error!("MediaApi: upload of '{file_name}' failed: {err}"))?;

        let outcome = match decode_status(UPLOAD_ENDPOINT, &response) {
            Ok(reply) => UploadOutcome::classify(
                reply.success,
                &reply.message,
                &self.config.duplicate_signal,
            ),
            Err(err) => UploadOutcome::Error(err.user_message()),
        };
        Ok(outcome)
    }

    async fn delete_many(&self, ids: &[MediaId]) -> Result<String, ApiError> {
        if ids.is_empty() {
            return Err(ValidationError::NoItemsSelected.into());
        }
        info!("MediaApi: deleting {} item(s)", ids.len());
        let reply = self
            .post_json(DELETE_ENDPOINT, &DeleteBody { ids })
            .await?
            .into_result()?;
        Ok(reply.message)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn response(status: u16, body: &str) -> Response {
        Response {
            status,
            body: body.as_bytes().to_vec(),
        }
    }

    #[test]
    fn list_accepts_array() {
        let collection = decode_media_list(&response(
            200,
            r#"[{"id": "3", "file_name": "a.jpg", "file_path": "p/a.jpg",
                 "thumbnail_path": "t/a.jpg", "uploaded_at": "2024-01-01 00:00:00"}]"#,
        ))
        .expect("array should decode");
        assert_eq!(collection.len(), 1);
        assert_eq!(collection.items()[0].id, MediaId(3));
    }

    #[test]
    fn list_error_object_is_rejection() {
        let err = decode_media_list(&response(
            200,
            r#"{"success": false, "message": "Vui lòng đăng nhập"}"#,
        ))
        .unwrap_err();
        assert_eq!(err, ApiError::Rejected("Vui lòng đăng nhập".to_string()));

        let err = decode_media_list(&response(200, r#"{"error": "db down"}"#)).unwrap_err();
        assert_eq!(err, ApiError::Rejected("db down".to_string()));
    }

    #[test]
    fn list_unexpected_shape_fails_closed() {
        assert!(matches!(
            decode_media_list(&response(200, "42")),
            Err(ApiError::Decode(_))
        ));
        assert!(matches!(
            decode_media_list(&response(200, "{}")),
            Err(ApiError::Decode(_))
        ));
        assert!(matches!(
            decode_media_list(&response(500, "<html>Fatal error</html>")),
            Err(ApiError::Rejected(_))
        ));
    }

    #[test]
    fn status_reply_defaults_missing_message() {
        let reply = decode_status("x.php", &response(200, r#"{"success": true}"#)).unwrap();
        assert!(reply.success);
        assert!(reply.message.is_empty());
        assert!(reply.user.is_none());
    }

    #[test]
    fn status_reply_non_json_error_page() {
        let err = decode_status("upload.php", &response(502, "Bad Gateway")).unwrap_err();
        assert_eq!(
            err,
            ApiError::Rejected("Server error (status 502)".to_string())
        );
    }

    #[test]
    fn delete_body_serializes_ids_as_numbers() {
        let ids = [MediaId(4), MediaId(9)];
        let json = serde_json::to_string(&DeleteBody { ids: &ids }).unwrap();
        assert_eq!(json, r#"{"ids":[4,9]}"#);
    }
}
