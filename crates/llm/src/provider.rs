//! LLM 백엔드 공통 인터페이스
//!
//! 모든 백엔드는 [`Provider`] trait 하나로 추상화됩니다.
//! 호출자는 `generate(prompt, credentials) -> text` 계약에만 의존하며,
//! 전송 방식(스트리밍/단발)과 응답 형태는 구현체 내부에 숨겨집니다.

use std::fmt;

use async_trait::async_trait;

use crate::error::ProviderError;
use crate::prompt::Prompt;

/// API 자격 증명
///
/// 호출마다 명시적으로 전달됩니다. 누출 방지를 위해 `Debug` 출력에서
/// 키 값은 가려지며, 직렬화를 지원하지 않습니다.
#[derive(Clone)]
pub struct Credentials {
    api_key: String,
}

impl Credentials {
    /// API 키로 자격 증명을 생성합니다.
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
        }
    }

    /// API 키를 반환합니다.
    pub fn api_key(&self) -> &str {
        &self.api_key
    }

    /// 키가 비어있는지 반환합니다.
    pub fn is_empty(&self) -> bool {
        self.api_key.is_empty()
    }
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("api_key", &"***REDACTED***")
            .finish()
    }
}

/// 생성 요청 샘플링 파라미터
///
/// 두 전송 방식 모두에 공통으로 전달되는 값입니다.
#[derive(Debug, Clone, Copy)]
pub struct GenerationParams {
    /// 샘플링 온도
    pub temperature: f32,
    /// nucleus sampling 임계값
    pub top_p: f32,
    /// 최대 출력 토큰 수
    pub max_tokens: u32,
}

impl Default for GenerationParams {
    fn default() -> Self {
        Self {
            temperature: 1.0,
            top_p: 1.0,
            max_tokens: 1024,
        }
    }
}

impl GenerationParams {
    /// core의 `LlmConfig`에서 샘플링 파라미터를 생성합니다.
    pub fn from_core(config: &codemend_core::config::LlmConfig) -> Self {
        Self {
            temperature: config.temperature,
            top_p: config.top_p,
            max_tokens: config.max_tokens,
        }
    }
}

/// LLM 백엔드 trait
///
/// 새로운 백엔드를 지원하려면 이 trait을 구현합니다.
///
/// # 계약
///
/// - 성공 시 일반 텍스트를 반환합니다 (모델이 아무것도 반환하지 않았다면 빈 문자열).
/// - 모든 실패는 [`ProviderError`]로 정규화됩니다.
/// - 클라이언트 내부에서 재시도하지 않습니다.
/// - 자격 증명은 호출마다 전달되며, 클라이언트는 전송 연결 외의
///   호출 간 상태를 갖지 않습니다.
#[async_trait]
pub trait Provider: Send + Sync {
    /// 백엔드 이름 (예: "groq", "gemini")
    fn name(&self) -> &str;

    /// 프롬프트에 대한 텍스트 생성을 요청합니다.
    async fn generate(
        &self,
        prompt: &Prompt,
        credentials: &Credentials,
    ) -> Result<String, ProviderError>;
}
