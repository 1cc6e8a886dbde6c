//! HTTP TTS Client - 调用远端语音合成服务
//!
//! 实现 SpeechSynthesisPort trait，通过 HTTP 调用合成服务
//!
//! 远端 API:
//! POST {base_url}/cognitiveservices/v1
//! Request: SSML (application/ssml+xml)，输出格式由 X-Microsoft-OutputFormat 指定
//! Response: 音频二进制流（默认 mp3）

use async_trait::async_trait;
use futures_util::StreamExt;
use reqwest::{Client, StatusCode};
use std::time::Duration;

use crate::application::ports::{
    AudioChunkStream, SpeechSynthesisPort, SynthesisRequest, TtsError,
};
use crate::domain::locale_from_voice_id;
use crate::infrastructure::adapters::catalog::SUBSCRIPTION_KEY_HEADER;

/// 无法从音色 id 推断语言时使用
const FALLBACK_LANG: &str = "en-US";

/// HTTP TTS 客户端配置
#[derive(Debug, Clone)]
pub struct HttpTtsClientConfig {
    /// 语音服务基础 URL
    pub base_url: String,
    /// 订阅密钥
    pub subscription_key: Option<String>,
    /// 请求超时时间（秒）
    pub timeout_secs: u64,
    pub user_agent: String,
}

impl Default for HttpTtsClientConfig {
    fn default() -> Self {
        Self {
            base_url: "https://eastus.tts.speech.microsoft.com".to_string(),
            subscription_key: None,
            timeout_secs: 30,
            user_agent: concat!("edge-voice/", env!("CARGO_PKG_VERSION")).to_string(),
        }
    }
}

impl HttpTtsClientConfig {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            ..Default::default()
        }
    }

    pub fn with_timeout(mut self, secs: u64) -> Self {
        self.timeout_secs = secs;
        self
    }

    pub fn with_subscription_key(mut self, key: impl Into<String>) -> Self {
        self.subscription_key = Some(key.into());
        self
    }
}

/// HTTP TTS 客户端
pub struct HttpTtsClient {
    client: Client,
    config: HttpTtsClientConfig,
}

impl HttpTtsClient {
    /// 创建新的 HTTP TTS 客户端
    pub fn new(config: HttpTtsClientConfig) -> Result<Self, TtsError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .user_agent(config.user_agent.clone())
            .build()
            .map_err(|e| TtsError::NetworkError(e.to_string()))?;

        Ok(Self { client, config })
    }

    /// 获取合成 URL
    fn synthesize_url(&self) -> String {
        format!(
            "{}/cognitiveservices/v1",
            self.config.base_url.trim_end_matches('/')
        )
    }
}

/// XML 转义（文本与属性值通用）
fn escape_xml(input: &str) -> String {
    let mut escaped = String::with_capacity(input.len());
    for c in input.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&apos;"),
            _ => escaped.push(c),
        }
    }
    escaped
}

/// 构建 SSML 请求体
fn build_ssml(request: &SynthesisRequest) -> String {
    let lang = locale_from_voice_id(&request.voice_id).unwrap_or(FALLBACK_LANG);
    format!(
        "<speak version='1.0' xmlns='http://www.w3.org/2001/10/synthesis' xml:lang='{lang}'>\
         <voice name='{voice}'>\
         <prosody rate='{rate}' pitch='{pitch}' volume='{volume}'>{text}</prosody>\
         </voice></speak>",
        lang = escape_xml(lang),
        voice = escape_xml(&request.voice_id),
        rate = escape_xml(&request.options.rate),
        pitch = escape_xml(&request.options.pitch),
        volume = escape_xml(&request.options.volume),
        text = escape_xml(&request.text),
    )
}

fn map_reqwest_error(e: reqwest::Error) -> TtsError {
    if e.is_timeout() {
        TtsError::Timeout
    } else if e.is_connect() {
        TtsError::NetworkError(format!("Cannot connect to TTS service: {}", e))
    } else {
        TtsError::NetworkError(e.to_string())
    }
}

#[async_trait]
impl SpeechSynthesisPort for HttpTtsClient {
    async fn synthesize(&self, request: &SynthesisRequest) -> Result<AudioChunkStream, TtsError> {
        let body = build_ssml(request);

        tracing::debug!(
            url = %self.synthesize_url(),
            text_len = request.text.len(),
            voice_id = %request.voice_id,
            format = %request.format,
            "Sending TTS synthesize request"
        );

        let mut http_request = self
            .client
            .post(self.synthesize_url())
            .header(reqwest::header::CONTENT_TYPE, "application/ssml+xml")
            .header("X-Microsoft-OutputFormat", request.format.output_format())
            .body(body);
        if let Some(key) = &self.config.subscription_key {
            http_request = http_request.header(SUBSCRIPTION_KEY_HEADER, key);
        }

        let response = http_request.send().await.map_err(map_reqwest_error)?;

        let status = response.status();
        if !status.is_success() {
            let error_text = response.text().await.unwrap_or_default();
            // 服务端对未知音色返回 400
            if matches!(status, StatusCode::BAD_REQUEST | StatusCode::NOT_FOUND) {
                tracing::debug!(voice_id = %request.voice_id, body = %error_text, "Voice rejected by TTS service");
                return Err(TtsError::VoiceNotFound(request.voice_id.clone()));
            }
            return Err(TtsError::ServiceError {
                status: status.as_u16(),
                message: error_text,
            });
        }

        let chunks = response
            .bytes_stream()
            .map(|chunk| chunk.map(|bytes| bytes.to_vec()).map_err(map_reqwest_error));

        Ok(chunks.boxed())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::ports::SpeechOptions;
    use crate::domain::AudioFormat;

    fn request(text: &str, voice_id: &str) -> SynthesisRequest {
        SynthesisRequest {
            text: text.to_string(),
            voice_id: voice_id.to_string(),
            format: AudioFormat::Mp3,
            options: SpeechOptions::default(),
        }
    }

    async fn collect(stream: AudioChunkStream) -> Vec<u8> {
        stream
            .fold(Vec::new(), |mut acc, chunk| async move {
                acc.extend_from_slice(&chunk.unwrap());
                acc
            })
            .await
    }

    #[test]
    fn test_config_default() {
        let config = HttpTtsClientConfig::default();
        assert_eq!(config.base_url, "https://eastus.tts.speech.microsoft.com");
        assert_eq!(config.timeout_secs, 30);
        assert!(config.subscription_key.is_none());
    }

    #[test]
    fn test_config_builder() {
        let config = HttpTtsClientConfig::new("http://example.com:9000")
            .with_timeout(60)
            .with_subscription_key("k");
        assert_eq!(config.base_url, "http://example.com:9000");
        assert_eq!(config.timeout_secs, 60);
        assert_eq!(config.subscription_key.as_deref(), Some("k"));
    }

    #[test]
    fn test_ssml_escapes_text_and_derives_lang() {
        let ssml = build_ssml(&request("a < b & \"c\"", "zh-CN-XiaoxiaoNeural"));
        assert!(ssml.contains("xml:lang='zh-CN'"));
        assert!(ssml.contains("<voice name='zh-CN-XiaoxiaoNeural'>"));
        assert!(ssml.contains("a &lt; b &amp; &quot;c&quot;"));
        assert!(ssml.contains("rate='+0%' pitch='+0Hz' volume='+0%'"));

        let fallback = build_ssml(&request("hi", "custom"));
        assert!(fallback.contains("xml:lang='en-US'"));
    }

    #[tokio::test]
    async fn test_synthesize_streams_audio() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("POST", "/cognitiveservices/v1")
            .match_header("content-type", "application/ssml+xml")
            .match_header("x-microsoft-outputformat", "audio-24khz-48kbitrate-mono-mp3")
            .match_body(mockito::Matcher::Regex("你好".to_string()))
            .with_status(200)
            .with_header("content-type", "audio/mpeg")
            .with_body(vec![0x49, 0x44, 0x33, 0x04])
            .create_async()
            .await;

        let client = HttpTtsClient::new(HttpTtsClientConfig::new(server.url())).unwrap();
        let stream = client
            .synthesize(&request("你好", "zh-CN-XiaoxiaoNeural"))
            .await
            .unwrap();

        assert_eq!(collect(stream).await, vec![0x49, 0x44, 0x33, 0x04]);
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn test_unknown_voice_maps_to_voice_not_found() {
        let mut server = mockito::Server::new_async().await;
        let _mock = server
            .mock("POST", "/cognitiveservices/v1")
            .with_status(400)
            .with_body("Unsupported voice not-a-real-voice")
            .create_async()
            .await;

        let client = HttpTtsClient::new(HttpTtsClientConfig::new(server.url())).unwrap();
        let err = client
            .synthesize(&request("hello", "not-a-real-voice"))
            .await
            .err()
            .unwrap();

        assert!(matches!(err, TtsError::VoiceNotFound(ref id) if id == "not-a-real-voice"));
        assert!(!err.is_transient());
    }

    #[tokio::test]
    async fn test_server_error_is_transient() {
        let mut server = mockito::Server::new_async().await;
        let _mock = server
            .mock("POST", "/cognitiveservices/v1")
            .with_status(503)
            .create_async()
            .await;

        let client = HttpTtsClient::new(HttpTtsClientConfig::new(server.url())).unwrap();
        let err = client
            .synthesize(&request("hello", "en-US-AriaNeural"))
            .await
            .err()
            .unwrap();

        assert!(matches!(err, TtsError::ServiceError { status: 503, .. }));
        assert!(err.is_transient());
    }
}
