use std::time::Duration;

use cloner_logging::{cloner_debug, cloner_warn};
use futures_util::StreamExt;
use reqwest::header::{ACCEPT, CONTENT_TYPE};
use reqwest::Url;

use crate::{CloneError, CloneRequest, CloneResponse, EngineError, ErrorBody, FailureKind};

/// Path of the clone endpoint, relative to the service base URL.
pub const CLONE_PATH: &str = "/api/clone";

#[derive(Debug, Clone)]
pub struct ClientSettings {
    /// Base address of the cloning service, e.g. `http://localhost:8000`.
    pub service_url: String,
    pub connect_timeout: Duration,
    /// Whole-request budget; generation on the service side is slow.
    pub request_timeout: Duration,
    pub max_bytes: u64,
}

impl Default for ClientSettings {
    fn default() -> Self {
        Self {
            service_url: "http://localhost:8000".to_string(),
            connect_timeout: Duration::from_secs(10),
            request_timeout: Duration::from_secs(120),
            max_bytes: 8 * 1024 * 1024,
        }
    }
}

#[async_trait::async_trait]
pub trait CloneClient: Send + Sync {
    /// Asks the service to clone `url`; returns the generated HTML document.
    async fn clone_page(&self, url: &str) -> Result<String, CloneError>;

    /// Returns whether the service answers on its root path.
    async fn health_check(&self) -> bool;
}

#[derive(Debug, Clone)]
pub struct ReqwestCloneClient {
    client: reqwest::Client,
    base: Url,
    endpoint: Url,
    max_bytes: u64,
}

impl ReqwestCloneClient {
    pub fn new(settings: &ClientSettings) -> Result<Self, EngineError> {
        let base = parse_base(&settings.service_url)?;
        let endpoint = base
            .join(CLONE_PATH.trim_start_matches('/'))
            .map_err(|err| EngineError::InvalidServiceUrl(err.to_string()))?;

        let client = reqwest::Client::builder()
            .connect_timeout(settings.connect_timeout)
            .timeout(settings.request_timeout)
            .build()
            .map_err(EngineError::HttpClient)?;

        Ok(Self {
            client,
            base,
            endpoint,
            max_bytes: settings.max_bytes,
        })
    }

    pub fn endpoint(&self) -> &Url {
        &self.endpoint
    }

    async fn read_body(&self, response: reqwest::Response) -> Result<Vec<u8>, CloneError> {
        if let Some(content_len) = response.content_length() {
            if content_len > self.max_bytes {
                return Err(self.too_large(Some(content_len)));
            }
        }

        let mut bytes = Vec::new();
        let mut stream = response.bytes_stream();
        while let Some(chunk) = stream.next().await {
            let chunk = chunk.map_err(map_reqwest_error)?;
            let next_len = bytes.len() as u64 + chunk.len() as u64;
            if next_len > self.max_bytes {
                return Err(self.too_large(Some(next_len)));
            }
            bytes.extend_from_slice(&chunk);
        }
        Ok(bytes)
    }

    fn too_large(&self, actual: Option<u64>) -> CloneError {
        CloneError::new(
            FailureKind::TooLarge {
                max_bytes: self.max_bytes,
                actual,
            },
            "response too large",
        )
    }
}

#[async_trait::async_trait]
impl CloneClient for ReqwestCloneClient {
    async fn clone_page(&self, url: &str) -> Result<String, CloneError> {
        let body = serde_json::to_vec(&CloneRequest {
            url: url.to_string(),
        })
        .map_err(|err| CloneError::new(FailureKind::Transport, err.to_string()))?;

        let response = self
            .client
            .post(self.endpoint.clone())
            .header(CONTENT_TYPE, "application/json")
            .header(ACCEPT, "application/json")
            .body(body)
            .send()
            .await
            .map_err(map_reqwest_error)?;

        let status = response.status();
        if !status.is_success() {
            let detail = match self.read_body(response).await {
                Ok(bytes) => parse_detail(&bytes),
                Err(err) => {
                    cloner_debug!("Could not read error body: {}", err);
                    None
                }
            };
            return Err(CloneError::new(
                FailureKind::Service {
                    status: status.as_u16(),
                    detail,
                },
                status.to_string(),
            ));
        }

        let bytes = self.read_body(response).await?;
        let parsed: CloneResponse = serde_json::from_slice(&bytes).map_err(|err| {
            cloner_warn!("Clone response did not parse ({} bytes): {}", bytes.len(), err);
            CloneError::new(FailureKind::MalformedResponse, err.to_string())
        })?;
        if parsed.html_content.trim().is_empty() {
            cloner_warn!("Clone response carried an empty document");
            return Err(CloneError::new(
                FailureKind::MalformedResponse,
                "empty html_content",
            ));
        }
        Ok(parsed.html_content)
    }

    async fn health_check(&self) -> bool {
        match self.client.get(self.base.clone()).send().await {
            Ok(response) => response.status().is_success(),
            Err(err) => {
                cloner_debug!("Health check failed: {}", err);
                false
            }
        }
    }
}

fn parse_base(raw: &str) -> Result<Url, EngineError> {
    let mut base = Url::parse(raw.trim())
        .map_err(|err| EngineError::InvalidServiceUrl(format!("{raw}: {err}")))?;
    if base.cannot_be_a_base() {
        return Err(EngineError::InvalidServiceUrl(format!(
            "{raw}: not a hierarchical URL"
        )));
    }
    if !base.path().ends_with('/') {
        let path = format!("{}/", base.path());
        base.set_path(&path);
    }
    Ok(base)
}

/// Extracts `detail` from an error body. A body that is not JSON, or whose
/// `detail` is not a string, yields `None`.
fn parse_detail(bytes: &[u8]) -> Option<String> {
    serde_json::from_slice::<ErrorBody>(bytes)
        .ok()
        .and_then(|body| body.detail)
        .filter(|detail| !detail.trim().is_empty())
}

fn map_reqwest_error(err: reqwest::Error) -> CloneError {
    if err.is_timeout() {
        return CloneError::new(FailureKind::Transport, format!("timeout: {err}"));
    }
    CloneError::new(FailureKind::Transport, err.to_string())
}

#[cfg(test)]
mod tests {
    use super::{parse_base, parse_detail};

    #[test]
    fn base_gets_trailing_slash() {
        let base = parse_base("http://localhost:8000").unwrap();
        assert_eq!(base.as_str(), "http://localhost:8000/");
        let endpoint = base.join("api/clone").unwrap();
        assert_eq!(endpoint.as_str(), "http://localhost:8000/api/clone");
    }

    #[test]
    fn base_path_prefix_is_kept() {
        let base = parse_base("https://tools.example/cloner").unwrap();
        let endpoint = base.join("api/clone").unwrap();
        assert_eq!(endpoint.as_str(), "https://tools.example/cloner/api/clone");
    }

    #[test]
    fn invalid_base_is_rejected() {
        assert!(parse_base("localhost:8000/x y").is_err());
        assert!(parse_base("mailto:someone@example.com").is_err());
    }

    #[test]
    fn detail_is_extracted_when_string() {
        assert_eq!(
            parse_detail(br#"{"detail":"Could not fetch target page"}"#),
            Some("Could not fetch target page".to_string())
        );
    }

    #[test]
    fn non_string_or_missing_detail_is_none() {
        assert_eq!(parse_detail(br#"{}"#), None);
        assert_eq!(parse_detail(br#"{"detail":""}"#), None);
        assert_eq!(parse_detail(br#"{"detail":[{"loc":["body","url"]}]}"#), None);
        assert_eq!(parse_detail(b"<html>Bad Gateway</html>"), None);
    }
}
