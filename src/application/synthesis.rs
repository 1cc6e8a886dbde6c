//! Synthesis Engine - 文本到音频
//!
//! 在 SpeechSynthesisPort 之上增加：输入校验、单次超时、瞬时错误重试、取消

use futures_util::StreamExt;
use std::sync::Arc;
use std::time::Duration;
use tokio_util::sync::CancellationToken;

use super::error::ProviderError;
use super::ports::{SpeechOptions, SpeechSynthesisPort, SynthesisRequest, SynthesisResult, TtsError};
use crate::domain::AudioFormat;

/// 合成引擎配置
#[derive(Debug, Clone)]
pub struct SynthesisEngineConfig {
    /// 单次请求超时（含读取完整音频）
    pub timeout: Duration,
    /// 瞬时错误的最大重试次数
    pub max_retries: u32,
    /// 重试前等待时间
    pub retry_backoff: Duration,
    pub format: AudioFormat,
    pub options: SpeechOptions,
}

impl Default for SynthesisEngineConfig {
    fn default() -> Self {
        Self {
            timeout: Duration::from_secs(30),
            max_retries: 1,
            retry_backoff: Duration::from_millis(500),
            format: AudioFormat::Mp3,
            options: SpeechOptions::default(),
        }
    }
}

/// 合成引擎
pub struct SynthesisEngine {
    backend: Arc<dyn SpeechSynthesisPort>,
    config: SynthesisEngineConfig,
}

impl SynthesisEngine {
    pub fn new(backend: Arc<dyn SpeechSynthesisPort>, config: SynthesisEngineConfig) -> Self {
        Self { backend, config }
    }

    /// 合成完整音频
    ///
    /// 取消时丢弃进行中的请求（连接随之关闭），返回 `ProviderError::Cancelled`
    pub async fn synthesize(
        &self,
        text: &str,
        voice_id: &str,
        cancel: &CancellationToken,
    ) -> Result<SynthesisResult, ProviderError> {
        let text = text.trim();
        if text.is_empty() {
            return Err(ProviderError::invalid_input("text must not be empty"));
        }
        let voice_id = voice_id.trim();
        if voice_id.is_empty() {
            return Err(ProviderError::invalid_input("voice id must not be empty"));
        }

        let request = SynthesisRequest {
            text: text.to_string(),
            voice_id: voice_id.to_string(),
            format: self.config.format,
            options: self.config.options.clone(),
        };

        let mut attempt = 0;
        loop {
            let outcome = tokio::select! {
                biased;
                _ = cancel.cancelled() => {
                    tracing::info!(voice_id = %voice_id, "Synthesis cancelled");
                    return Err(ProviderError::Cancelled);
                }
                outcome = self.attempt(&request) => outcome,
            };

            match outcome {
                Ok(result) => {
                    tracing::info!(
                        voice_id = %voice_id,
                        text_len = text.len(),
                        audio_size = result.len(),
                        "Synthesis completed"
                    );
                    return Ok(result);
                }
                Err(e) if e.is_transient() && attempt < self.config.max_retries => {
                    attempt += 1;
                    tracing::warn!(
                        voice_id = %voice_id,
                        attempt = attempt,
                        error = %e,
                        "Transient synthesis failure, retrying"
                    );
                    tokio::select! {
                        biased;
                        _ = cancel.cancelled() => return Err(ProviderError::Cancelled),
                        _ = tokio::time::sleep(self.config.retry_backoff) => {}
                    }
                }
                Err(e) => {
                    tracing::error!(voice_id = %voice_id, error = %e, "Synthesis failed");
                    return Err(ProviderError::synthesis(voice_id, e));
                }
            }
        }
    }

    async fn attempt(&self, request: &SynthesisRequest) -> Result<SynthesisResult, TtsError> {
        match tokio::time::timeout(self.config.timeout, self.collect(request)).await {
            Ok(result) => result,
            Err(_) => Err(TtsError::Timeout),
        }
    }

    /// 读取全部分块后一次性返回，不向调用方暴露部分结果
    async fn collect(&self, request: &SynthesisRequest) -> Result<SynthesisResult, TtsError> {
        let mut stream = self.backend.synthesize(request).await?;
        let mut audio = Vec::new();
        while let Some(chunk) = stream.next().await {
            audio.extend_from_slice(&chunk?);
        }

        if audio.is_empty() {
            return Err(TtsError::InvalidResponse("backend returned no audio".to_string()));
        }

        Ok(SynthesisResult {
            audio,
            format: request.format,
        })
    }
}
