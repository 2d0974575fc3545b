//! Groq 백엔드 — 토큰 스트리밍 chat-completion 전송
//!
//! OpenAI 호환 `chat/completions` 엔드포인트에 `stream: true`로 요청하고,
//! SSE `data:` 줄의 `choices[0].delta.content` 조각을 도착 순서대로
//! 이어 붙여 전체 응답을 구성합니다. `data: [DONE]`이 스트림 종료 신호입니다.

use std::time::{Duration, Instant};

use async_trait::async_trait;
use futures::StreamExt;
use metrics::{counter, histogram};
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use codemend_core::metrics::{
    LABEL_PROVIDER, LLM_FAILURES_TOTAL, LLM_REQUEST_DURATION_SECONDS, LLM_REQUESTS_TOTAL,
};

use crate::error::ProviderError;
use crate::prompt::Prompt;
use crate::provider::{Credentials, GenerationParams, Provider};
use crate::providers::short_body;
use crate::sse::{SseLineDecoder, data_payload};

/// 백엔드 이름
pub const BACKEND_GROQ: &str = "groq";

/// 기본 모델
pub const DEFAULT_GROQ_MODEL: &str = "llama-3.3-70b-versatile";

/// 기본 API 베이스 URL
const GROQ_API_BASE: &str = "https://api.groq.com/openai/v1";

/// Groq 스트리밍 백엔드
pub struct GroqProvider {
    client: reqwest::Client,
    base_url: String,
    model: String,
    params: GenerationParams,
}

impl GroqProvider {
    /// 새 Groq 백엔드를 생성합니다.
    ///
    /// `model`이 빈 문자열이면 [`DEFAULT_GROQ_MODEL`]을 사용합니다.
    pub fn new(
        model: impl Into<String>,
        params: GenerationParams,
        request_timeout: Duration,
    ) -> Result<Self, ProviderError> {
        Self::with_base_url(GROQ_API_BASE, model, params, request_timeout)
    }

    /// 베이스 URL을 지정하여 생성합니다 (테스트용).
    pub fn with_base_url(
        base_url: impl Into<String>,
        model: impl Into<String>,
        params: GenerationParams,
        request_timeout: Duration,
    ) -> Result<Self, ProviderError> {
        let client = reqwest::Client::builder()
            .timeout(request_timeout)
            .build()
            .map_err(|e| ProviderError::Configuration {
                backend: BACKEND_GROQ.to_owned(),
                message: e.to_string(),
            })?;

        let model = model.into();
        let model = if model.is_empty() {
            DEFAULT_GROQ_MODEL.to_owned()
        } else {
            model
        };

        Ok(Self {
            client,
            base_url: base_url.into(),
            model,
            params,
        })
    }

    /// 현재 설정된 모델 식별자를 반환합니다.
    pub fn model(&self) -> &str {
        &self.model
    }
}

#[async_trait]
impl Provider for GroqProvider {
    fn name(&self) -> &str {
        BACKEND_GROQ
    }

    async fn generate(
        &self,
        prompt: &Prompt,
        credentials: &Credentials,
    ) -> Result<String, ProviderError> {
        let started = Instant::now();
        counter!(LLM_REQUESTS_TOTAL, LABEL_PROVIDER => BACKEND_GROQ).increment(1);

        let request = GroqChatRequest {
            model: &self.model,
            messages: vec![GroqMessage {
                role: "user",
                content: prompt.text(),
            }],
            temperature: self.params.temperature,
            top_p: self.params.top_p,
            max_completion_tokens: self.params.max_tokens,
            stream: true,
        };

        debug!(model = %self.model, kind = %prompt.kind(), "sending streaming chat request");

        let response = self
            .client
            .post(format!("{}/chat/completions", self.base_url))
            .bearer_auth(credentials.api_key())
            .json(&request)
            .send()
            .await
            .map_err(|e| {
                counter!(LLM_FAILURES_TOTAL, LABEL_PROVIDER => BACKEND_GROQ).increment(1);
                ProviderError::Http {
                    backend: BACKEND_GROQ.to_owned(),
                    message: e.to_string(),
                }
            })?;

        let status = response.status();
        if !status.is_success() {
            counter!(LLM_FAILURES_TOTAL, LABEL_PROVIDER => BACKEND_GROQ).increment(1);
            let body = response.text().await.unwrap_or_default();
            return Err(match status.as_u16() {
                401 | 403 => ProviderError::Auth {
                    backend: BACKEND_GROQ.to_owned(),
                },
                code => ProviderError::Status {
                    backend: BACKEND_GROQ.to_owned(),
                    status: code,
                    message: short_body(&body),
                },
            });
        }

        let mut stream = response.bytes_stream();
        let mut decoder = SseLineDecoder::new();
        let mut result = String::new();
        let mut done = false;

        'receive: while let Some(chunk) = stream.next().await {
            let chunk = chunk.map_err(|e| {
                counter!(LLM_FAILURES_TOTAL, LABEL_PROVIDER => BACKEND_GROQ).increment(1);
                ProviderError::Stream {
                    backend: BACKEND_GROQ.to_owned(),
                    message: e.to_string(),
                }
            })?;

            for line in decoder.push(&chunk) {
                let Some(payload) = data_payload(&line) else {
                    continue;
                };
                if payload == "[DONE]" {
                    done = true;
                    break 'receive;
                }

                let parsed: GroqStreamChunk = serde_json::from_str(payload).map_err(|e| {
                    counter!(LLM_FAILURES_TOTAL, LABEL_PROVIDER => BACKEND_GROQ).increment(1);
                    ProviderError::MalformedResponse {
                        backend: BACKEND_GROQ.to_owned(),
                        detail: format!("unparsable stream chunk: {e}"),
                    }
                })?;

                if let Some(choice) = parsed.choices.first() {
                    if let Some(content) = &choice.delta.content {
                        result.push_str(content);
                    }
                }
            }
        }

        if !done {
            // 서버가 [DONE] 없이 스트림을 닫은 경우 — 누적분은 유효하므로 반환
            warn!(model = %self.model, "stream ended without [DONE] marker");
        }

        histogram!(LLM_REQUEST_DURATION_SECONDS, LABEL_PROVIDER => BACKEND_GROQ)
            .record(started.elapsed().as_secs_f64());
        debug!(chars = result.len(), "streaming chat request completed");

        Ok(result)
    }
}

// --- Groq API 요청/응답 구조 ---

#[derive(Debug, Serialize)]
struct GroqChatRequest<'a> {
    model: &'a str,
    messages: Vec<GroqMessage<'a>>,
    temperature: f32,
    top_p: f32,
    max_completion_tokens: u32,
    stream: bool,
}

#[derive(Debug, Serialize)]
struct GroqMessage<'a> {
    role: &'a str,
    content: &'a str,
}

#[derive(Debug, Deserialize)]
struct GroqStreamChunk {
    #[serde(default)]
    choices: Vec<GroqStreamChoice>,
}

#[derive(Debug, Deserialize)]
struct GroqStreamChoice {
    #[serde(default)]
    delta: GroqDelta,
}

#[derive(Debug, Default, Deserialize)]
struct GroqDelta {
    #[serde(default)]
    content: Option<String>,
}
