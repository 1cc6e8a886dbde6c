//! HTTP Catalog Client - 拉取远端音色目录
//!
//! 实现 VoiceCatalogPort trait
//!
//! 远端 API:
//! GET {base_url}/cognitiveservices/voices/list
//! Header: Ocp-Apim-Subscription-Key (可选)
//! Response: JSON 数组，每项包含 Name / ShortName / Locale / Gender / LocalName

use async_trait::async_trait;
use reqwest::Client;
use std::time::Duration;

use super::dto::{normalize_catalog, RawCatalogEntry};
use crate::application::ports::{CatalogError, VoiceCatalogPort};
use crate::domain::VoiceRecord;

/// 订阅密钥请求头
pub const SUBSCRIPTION_KEY_HEADER: &str = "Ocp-Apim-Subscription-Key";

/// HTTP 目录客户端配置
#[derive(Debug, Clone)]
pub struct HttpCatalogClientConfig {
    /// 语音服务基础 URL
    pub base_url: String,
    /// 订阅密钥
    pub subscription_key: Option<String>,
    /// 请求超时时间（秒）
    pub timeout_secs: u64,
    pub user_agent: String,
}

impl Default for HttpCatalogClientConfig {
    fn default() -> Self {
        Self {
            base_url: "https://eastus.tts.speech.microsoft.com".to_string(),
            subscription_key: None,
            timeout_secs: 10,
            user_agent: concat!("edge-voice/", env!("CARGO_PKG_VERSION")).to_string(),
        }
    }
}

impl HttpCatalogClientConfig {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            ..Default::default()
        }
    }

    pub fn with_subscription_key(mut self, key: impl Into<String>) -> Self {
        self.subscription_key = Some(key.into());
        self
    }
}

/// HTTP 目录客户端
pub struct HttpCatalogClient {
    client: Client,
    config: HttpCatalogClientConfig,
}

impl HttpCatalogClient {
    pub fn new(config: HttpCatalogClientConfig) -> Result<Self, CatalogError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .user_agent(config.user_agent.clone())
            .build()
            .map_err(|e| CatalogError::NetworkError(e.to_string()))?;

        Ok(Self { client, config })
    }

    /// 获取目录 URL
    fn voices_url(&self) -> String {
        format!(
            "{}/cognitiveservices/voices/list",
            self.config.base_url.trim_end_matches('/')
        )
    }
}

#[async_trait]
impl VoiceCatalogPort for HttpCatalogClient {
    async fn fetch_voices(&self) -> Result<Vec<VoiceRecord>, CatalogError> {
        tracing::debug!(url = %self.voices_url(), "Requesting voice catalog");

        let mut request = self.client.get(self.voices_url());
        if let Some(key) = &self.config.subscription_key {
            request = request.header(SUBSCRIPTION_KEY_HEADER, key);
        }

        let response = request.send().await.map_err(|e| {
            if e.is_timeout() {
                CatalogError::Timeout(Duration::from_secs(self.config.timeout_secs))
            } else if e.is_connect() {
                CatalogError::NetworkError(format!("Cannot connect to voice service: {}", e))
            } else {
                CatalogError::NetworkError(e.to_string())
            }
        })?;

        let status = response.status();
        if !status.is_success() {
            let message = response.text().await.unwrap_or_default();
            return Err(CatalogError::ServiceError {
                status: status.as_u16(),
                message,
            });
        }

        let entries: Vec<RawCatalogEntry> = response
            .json()
            .await
            .map_err(|e| CatalogError::InvalidResponse(format!("Malformed catalog: {}", e)))?;

        let voices = normalize_catalog(&entries);
        if voices.is_empty() {
            return Err(CatalogError::InvalidResponse(
                "catalog contains no usable voices".to_string(),
            ));
        }

        tracing::debug!(raw = entries.len(), voices = voices.len(), "Voice catalog received");
        Ok(voices)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::Gender;

    #[test]
    fn test_voices_url() {
        let client =
            HttpCatalogClient::new(HttpCatalogClientConfig::new("http://localhost:9000/")).unwrap();
        assert_eq!(
            client.voices_url(),
            "http://localhost:9000/cognitiveservices/voices/list"
        );
    }

    #[tokio::test]
    async fn test_fetch_and_normalize() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("GET", "/cognitiveservices/voices/list")
            .match_header(SUBSCRIPTION_KEY_HEADER, "secret")
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(
                r#"[
                    {"Name": "Xiaoxiao", "ShortName": "zh-CN-XiaoxiaoNeural", "Gender": "Female", "Locale": "zh-CN", "LocalName": "晓晓"},
                    {"name": "Guy", "short_name": "en-US-GuyNeural", "gender": "male", "locale": "en-US"}
                ]"#,
            )
            .create_async()
            .await;

        let config = HttpCatalogClientConfig::new(server.url()).with_subscription_key("secret");
        let voices = HttpCatalogClient::new(config)
            .unwrap()
            .fetch_voices()
            .await
            .unwrap();

        mock.assert_async().await;
        assert_eq!(voices.len(), 2);
        assert_eq!(voices[0].local_name(), Some("晓晓"));
        assert_eq!(voices[1].gender(), Gender::Male);
    }

    #[tokio::test]
    async fn test_service_error() {
        let mut server = mockito::Server::new_async().await;
        let _mock = server
            .mock("GET", "/cognitiveservices/voices/list")
            .with_status(401)
            .with_body("unauthorized")
            .create_async()
            .await;

        let err = HttpCatalogClient::new(HttpCatalogClientConfig::new(server.url()))
            .unwrap()
            .fetch_voices()
            .await
            .unwrap_err();

        assert!(matches!(err, CatalogError::ServiceError { status: 401, .. }));
    }

    #[tokio::test]
    async fn test_malformed_body() {
        let mut server = mockito::Server::new_async().await;
        let _mock = server
            .mock("GET", "/cognitiveservices/voices/list")
            .with_status(200)
            .with_body("<html>maintenance</html>")
            .create_async()
            .await;

        let err = HttpCatalogClient::new(HttpCatalogClientConfig::new(server.url()))
            .unwrap()
            .fetch_voices()
            .await
            .unwrap_err();

        assert!(matches!(err, CatalogError::InvalidResponse(_)));
    }
}
