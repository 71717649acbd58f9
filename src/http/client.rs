use super::models::ErrorBody;
use super::{
    AccountTransport, ContactMessage, ContactResponse, HealthResponse, LoginRequest,
    LoginResponse, PredictResponse, PredictUpload, PredictionTransport, TransportError,
};
use crate::logger::LOGGER;
use reqwest::multipart::{Form, Part};
use serde::de::DeserializeOwned;
use std::sync::RwLock;
use url::Url;

/// reqwest-backed client for the prediction service.
#[derive(Debug)]
pub struct HttpTransport {
    client: reqwest::Client,
    base_url: String,
    bearer: RwLock<Option<String>>,
}

impl HttpTransport {
    pub fn new(base_url: &str) -> Result<Self, url::ParseError> {
        let parsed = Url::parse(base_url)?;
        Ok(Self {
            client: reqwest::Client::new(),
            base_url: parsed.as_str().trim_end_matches('/').to_string(),
            bearer: RwLock::new(None),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Token sent as `Authorization: Bearer` on prediction requests.
    pub fn set_bearer(&self, token: Option<String>) {
        if let Ok(mut bearer) = self.bearer.write() {
            *bearer = token;
        }
    }

    fn bearer(&self) -> Option<String> {
        self.bearer.read().ok().and_then(|b| b.clone())
    }

    fn endpoint(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path.trim_start_matches('/'))
    }

    fn error_message(body: &[u8]) -> Option<String> {
        serde_json::from_slice::<ErrorBody>(body)
            .ok()
            .and_then(ErrorBody::into_message)
    }

    fn status_error(status: reqwest::StatusCode, body: &[u8]) -> TransportError {
        TransportError::Status {
            status: status.as_u16(),
            message: Self::error_message(body),
        }
    }

    async fn read_json<T: DeserializeOwned>(
        response: reqwest::Response,
    ) -> Result<T, TransportError> {
        let status = response.status();
        let body = response.bytes().await?;

        if !status.is_success() {
            return Err(Self::status_error(status, &body));
        }

        serde_json::from_slice(&body).map_err(|e| TransportError::Malformed(e.to_string()))
    }
}

impl PredictionTransport for HttpTransport {
    async fn predict(&self, upload: PredictUpload) -> Result<PredictResponse, TransportError> {
        let url = self.endpoint("predict");
        LOGGER.http(&format!(
            "POST {} ({} bytes, {})",
            url,
            upload.contents.len(),
            upload.mime_type
        ));

        let file = Part::bytes(upload.contents)
            .file_name(upload.file_name)
            .mime_str(&upload.mime_type)?;
        let form = Form::new()
            .part("file", file)
            .text("age", upload.age.to_string())
            .text("sex", upload.sex)
            .text("anatom_site_general", upload.anatom_site_general);

        let mut request = self
            .client
            .post(&url)
            .header("Cache-Control", "no-cache, no-store, must-revalidate")
            .header("Pragma", "no-cache")
            .multipart(form);
        if let Some(token) = self.bearer() {
            request = request.bearer_auth(token);
        }

        let response = request.send().await?;
        LOGGER.http(&format!("POST {} -> {}", url, response.status()));
        Self::read_json(response).await
    }

    async fn health(&self) -> Result<HealthResponse, TransportError> {
        let url = self.endpoint("health");
        let response = self.client.get(&url).send().await?;
        LOGGER.http(&format!("GET {} -> {}", url, response.status()));

        let status = response.status();
        if !status.is_success() {
            return Err(TransportError::Status {
                status: status.as_u16(),
                message: None,
            });
        }
        // Any 2xx counts as reachable, whatever the body says.
        let body = response.bytes().await?;
        Ok(serde_json::from_slice(&body).unwrap_or_default())
    }
}

impl AccountTransport for HttpTransport {
    async fn login(&self, request: LoginRequest) -> Result<LoginResponse, TransportError> {
        let url = self.endpoint("api/auth/login");
        LOGGER.http(&format!("POST {}", url));
        let response = self.client.post(&url).json(&request).send().await?;
        let status = response.status();
        let body = response.bytes().await?;

        // Bad credentials come back in the body, often with a 4xx status.
        // A non-2xx reply is never a successful login, whatever it claims.
        match serde_json::from_slice::<LoginResponse>(&body) {
            Ok(mut parsed) => {
                if !status.is_success() {
                    parsed.success = false;
                    parsed.message = parsed
                        .message
                        .take()
                        .or_else(|| Self::error_message(&body));
                }
                Ok(parsed)
            }
            Err(_) if !status.is_success() => Err(Self::status_error(status, &body)),
            Err(e) => Err(TransportError::Malformed(e.to_string())),
        }
    }

    async fn send_contact(
        &self,
        message: &ContactMessage,
        token: &str,
    ) -> Result<ContactResponse, TransportError> {
        let url = self.endpoint("api/contact");
        LOGGER.http(&format!("POST {}", url));
        let response = self
            .client
            .post(&url)
            .bearer_auth(token)
            .json(message)
            .send()
            .await?;
        let status = response.status();
        let body = response.bytes().await?;

        match serde_json::from_slice::<ContactResponse>(&body) {
            Ok(mut parsed) => {
                if !status.is_success() {
                    parsed.success = false;
                    parsed.message = parsed
                        .message
                        .take()
                        .or_else(|| Self::error_message(&body));
                }
                Ok(parsed)
            }
            Err(_) if !status.is_success() => Err(Self::status_error(status, &body)),
            Err(e) => Err(TransportError::Malformed(e.to_string())),
        }
    }
}
