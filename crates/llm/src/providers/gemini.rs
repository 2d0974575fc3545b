//! Gemini 백엔드 — 단발 JSON 요청/응답 전송
//!
//! `models/{model}:generateContent` 엔드포인트에 프롬프트를
//! `contents[].parts[].text` 경로로 담아 한 번에 보내고,
//! 응답의 `candidates[0].content.parts[0].text` 고정 경로에서
//! 생성 텍스트를 추출합니다.
//!
//! 경로 세그먼트가 하나라도 없으면 누락 세그먼트를 명시한
//! [`ProviderError::MalformedResponse`]가 됩니다. "모델이 빈 텍스트를
//! 반환함"(`Ok("")`)과는 구분됩니다.

use std::time::{Duration, Instant};

use async_trait::async_trait;
use metrics::{counter, histogram};
use serde::{Deserialize, Serialize};
use tracing::debug;

use codemend_core::metrics::{
    LABEL_PROVIDER, LLM_FAILURES_TOTAL, LLM_REQUEST_DURATION_SECONDS, LLM_REQUESTS_TOTAL,
};

use crate::error::ProviderError;
use crate::prompt::Prompt;
use crate::provider::{Credentials, GenerationParams, Provider};
use crate::providers::short_body;

/// 백엔드 이름
pub const BACKEND_GEMINI: &str = "gemini";

/// 기본 모델
pub const DEFAULT_GEMINI_MODEL: &str = "gemini-1.5-flash";

/// 기본 API 베이스 URL
const GEMINI_API_BASE: &str = "https://generativelanguage.googleapis.com/v1beta/models";

/// Gemini 단발 전송 백엔드
pub struct GeminiProvider {
    client: reqwest::Client,
    base_url: String,
    model: String,
    params: GenerationParams,
}

impl GeminiProvider {
    /// 새 Gemini 백엔드를 생성합니다.
    ///
    /// `model`이 빈 문자열이면 [`DEFAULT_GEMINI_MODEL`]을 사용합니다.
    pub fn new(
        model: impl Into<String>,
        params: GenerationParams,
        request_timeout: Duration,
    ) -> Result<Self, ProviderError> {
        Self::with_base_url(GEMINI_API_BASE, model, params, request_timeout)
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
                backend: BACKEND_GEMINI.to_owned(),
                message: e.to_string(),
            })?;

        let model = model.into();
        let model = if model.is_empty() {
            DEFAULT_GEMINI_MODEL.to_owned()
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
impl Provider for GeminiProvider {
    fn name(&self) -> &str {
        BACKEND_GEMINI
    }

    async fn generate(
        &self,
        prompt: &Prompt,
        credentials: &Credentials,
    ) -> Result<String, ProviderError> {
        let started = Instant::now();
        counter!(LLM_REQUESTS_TOTAL, LABEL_PROVIDER => BACKEND_GEMINI).increment(1);

        let request = GeminiRequest {
            contents: vec![GeminiContent {
                parts: vec![GeminiPart {
                    text: Some(prompt.text().to_owned()),
                }],
            }],
            generation_config: GeminiGenerationConfig {
                temperature: self.params.temperature,
                top_p: self.params.top_p,
                max_output_tokens: self.params.max_tokens,
            },
        };

        debug!(model = %self.model, kind = %prompt.kind(), "sending generateContent request");

        let url = format!(
            "{}/{}:generateContent?key={}",
            self.base_url,
            self.model,
            credentials.api_key()
        );

        let response = self.client.post(&url).json(&request).send().await.map_err(|e| {
            counter!(LLM_FAILURES_TOTAL, LABEL_PROVIDER => BACKEND_GEMINI).increment(1);
            ProviderError::Http {
                backend: BACKEND_GEMINI.to_owned(),
                // URL에 키가 포함되므로 reqwest 에러 메시지는 그대로 노출하지 않음
                message: e.without_url().to_string(),
            }
        })?;

        let status = response.status();
        if !status.is_success() {
            counter!(LLM_FAILURES_TOTAL, LABEL_PROVIDER => BACKEND_GEMINI).increment(1);
            let body = response.text().await.unwrap_or_default();
            return Err(match status.as_u16() {
                401 | 403 => ProviderError::Auth {
                    backend: BACKEND_GEMINI.to_owned(),
                },
                code => ProviderError::Status {
                    backend: BACKEND_GEMINI.to_owned(),
                    status: code,
                    message: short_body(&body),
                },
            });
        }

        let parsed: GeminiResponse = response.json().await.map_err(|e| {
            counter!(LLM_FAILURES_TOTAL, LABEL_PROVIDER => BACKEND_GEMINI).increment(1);
            ProviderError::MalformedResponse {
                backend: BACKEND_GEMINI.to_owned(),
                detail: format!("invalid response JSON: {}", e.without_url()),
            }
        })?;

        let text = extract_candidate_text(parsed).map_err(|segment| {
            counter!(LLM_FAILURES_TOTAL, LABEL_PROVIDER => BACKEND_GEMINI).increment(1);
            ProviderError::MalformedResponse {
                backend: BACKEND_GEMINI.to_owned(),
                detail: format!("missing response field: {segment}"),
            }
        })?;

        histogram!(LLM_REQUEST_DURATION_SECONDS, LABEL_PROVIDER => BACKEND_GEMINI)
            .record(started.elapsed().as_secs_f64());
        debug!(chars = text.len(), "generateContent request completed");

        Ok(text)
    }
}

/// 고정 경로 `candidates[0].content.parts[0].text`에서 텍스트를 추출합니다.
///
/// 누락된 첫 세그먼트의 이름을 `Err`로 반환합니다. 암묵적 기본값으로
/// 넘어가지 않으므로 호출자가 "빈 응답"과 "형태 불일치"를 구분할 수 있습니다.
fn extract_candidate_text(response: GeminiResponse) -> Result<String, &'static str> {
    let candidate = response
        .candidates
        .into_iter()
        .next()
        .ok_or("candidates[0]")?;
    let content = candidate.content.ok_or("candidates[0].content")?;
    let part = content
        .parts
        .into_iter()
        .next()
        .ok_or("candidates[0].content.parts[0]")?;
    part.text.ok_or("candidates[0].content.parts[0].text")
}

// --- Gemini API 요청/응답 구조 ---

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GeminiRequest {
    contents: Vec<GeminiContent>,
    generation_config: GeminiGenerationConfig,
}

#[derive(Debug, Serialize, Deserialize)]
struct GeminiContent {
    #[serde(default)]
    parts: Vec<GeminiPart>,
}

#[derive(Debug, Serialize, Deserialize)]
struct GeminiPart {
    #[serde(default)]
    text: Option<String>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GeminiGenerationConfig {
    temperature: f32,
    top_p: f32,
    max_output_tokens: u32,
}

#[derive(Debug, Deserialize)]
struct GeminiResponse {
    #[serde(default)]
    candidates: Vec<GeminiCandidate>,
}

#[derive(Debug, Deserialize)]
struct GeminiCandidate {
    #[serde(default)]
    content: Option<GeminiContent>,
}
