//! 설정 관리 — codemend.toml 파싱 및 런타임 설정
//!
//! [`CodemendConfig`]는 모든 모듈의 설정을 담는 최상위 구조체입니다.
//!
//! # 설정 로딩 우선순위
//! 1. CLI 인자 (최고 우선)
//! 2. 환경변수 (`CODEMEND_LLM_PROVIDER=gemini` 형식)
//! 3. 설정 파일 (`codemend.toml`)
//! 4. 기본값 (`Default` 구현)
//!
//! # 사용 예시
//! ```no_run
//! # async fn example() -> Result<(), codemend_core::error::CodemendError> {
//! use codemend_core::config::CodemendConfig;
//!
//! // 파일에서 로드 + 환경변수 오버라이드
//! let config = CodemendConfig::load("codemend.toml").await?;
//!
//! // TOML 문자열에서 직접 파싱
//! let config = CodemendConfig::parse("[general]\nlog_level = \"debug\"")?;
//! # Ok(())
//! # }
//! ```

use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::error::{CodemendError, ConfigError};

/// Codemend 통합 설정
///
/// `codemend.toml` 파일의 최상위 구조를 나타냅니다.
/// 각 모듈은 자기 섹션만 읽어 사용합니다.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CodemendConfig {
    /// 일반 설정
    #[serde(default)]
    pub general: GeneralConfig,
    /// 스캔(탐색 + 정적 분석) 설정
    #[serde(default)]
    pub scan: ScanConfig,
    /// LLM 설정
    #[serde(default)]
    pub llm: LlmConfig,
    /// 리포트 출력 설정
    #[serde(default)]
    pub report: ReportConfig,
}

impl CodemendConfig {
    /// TOML 파일에서 설정을 로드하고 환경변수 오버라이드를 적용합니다.
    ///
    /// 설정 로딩 순서:
    /// 1. TOML 파일 파싱
    /// 2. 환경변수 오버라이드 적용
    pub async fn load(path: impl AsRef<Path>) -> Result<Self, CodemendError> {
        let mut config = Self::from_file(path).await?;
        config.apply_env_overrides();
        config.validate()?;
        Ok(config)
    }

    /// TOML 파일에서 설정을 로드합니다 (환경변수 오버라이드 없음).
    pub async fn from_file(path: impl AsRef<Path>) -> Result<Self, CodemendError> {
        let path = path.as_ref();
        let content = tokio::fs::read_to_string(path).await.map_err(|e| {
            if e.kind() == std::io::ErrorKind::NotFound {
                CodemendError::Config(ConfigError::FileNotFound {
                    path: path.display().to_string(),
                })
            } else {
                CodemendError::Io(e)
            }
        })?;
        let config = Self::parse(&content)?;
        config.validate()?;
        Ok(config)
    }

    /// TOML 문자열에서 설정을 파싱합니다.
    pub fn parse(toml_str: &str) -> Result<Self, CodemendError> {
        toml::from_str(toml_str).map_err(|e| {
            CodemendError::Config(ConfigError::ParseFailed {
                reason: e.to_string(),
            })
        })
    }

    /// 환경변수로 설정값을 오버라이드합니다.
    ///
    /// 환경변수 네이밍 규칙: `CODEMEND_{SECTION}_{FIELD}`
    /// 예: `CODEMEND_LLM_PROVIDER=gemini`
    pub fn apply_env_overrides(&mut self) {
        // General
        override_string(&mut self.general.log_level, "CODEMEND_GENERAL_LOG_LEVEL");
        override_string(&mut self.general.log_format, "CODEMEND_GENERAL_LOG_FORMAT");

        // Scan
        override_csv(&mut self.scan.extensions, "CODEMEND_SCAN_EXTENSIONS");
        override_csv(&mut self.scan.exclude_paths, "CODEMEND_SCAN_EXCLUDE_PATHS");
        override_u64(
            &mut self.scan.analyzer_timeout_secs,
            "CODEMEND_SCAN_ANALYZER_TIMEOUT_SECS",
        );
        override_usize(&mut self.scan.max_file_size, "CODEMEND_SCAN_MAX_FILE_SIZE");
        override_string(&mut self.scan.analyzer_program, "CODEMEND_SCAN_ANALYZER_PROGRAM");

        // LLM
        override_string(&mut self.llm.provider, "CODEMEND_LLM_PROVIDER");
        override_string(&mut self.llm.model, "CODEMEND_LLM_MODEL");
        override_f32(&mut self.llm.temperature, "CODEMEND_LLM_TEMPERATURE");
        override_f32(&mut self.llm.top_p, "CODEMEND_LLM_TOP_P");
        override_u32(&mut self.llm.max_tokens, "CODEMEND_LLM_MAX_TOKENS");
        override_u64(
            &mut self.llm.request_timeout_secs,
            "CODEMEND_LLM_REQUEST_TIMEOUT_SECS",
        );

        // Report
        override_string(&mut self.report.output, "CODEMEND_REPORT_OUTPUT");
    }

    /// 설정값의 유효성을 검증합니다.
    pub fn validate(&self) -> Result<(), CodemendError> {
        // log_level 검증
        let valid_levels = ["trace", "debug", "info", "warn", "error"];
        if !valid_levels.contains(&self.general.log_level.as_str()) {
            return Err(ConfigError::InvalidValue {
                field: "general.log_level".to_owned(),
                reason: format!("must be one of: {}", valid_levels.join(", ")),
            }
            .into());
        }

        // log_format 검증
        let valid_formats = ["json", "pretty"];
        if !valid_formats.contains(&self.general.log_format.as_str()) {
            return Err(ConfigError::InvalidValue {
                field: "general.log_format".to_owned(),
                reason: format!("must be one of: {}", valid_formats.join(", ")),
            }
            .into());
        }

        // 스캔 대상 확장자는 최소 하나 필요
        if self.scan.extensions.is_empty() {
            return Err(ConfigError::InvalidValue {
                field: "scan.extensions".to_owned(),
                reason: "at least one file extension required".to_owned(),
            }
            .into());
        }

        if self.scan.analyzer_timeout_secs == 0 || self.scan.analyzer_timeout_secs > 3600 {
            return Err(ConfigError::InvalidValue {
                field: "scan.analyzer_timeout_secs".to_owned(),
                reason: "must be 1-3600".to_owned(),
            }
            .into());
        }

        const MAX_FILE_SIZE: usize = 100 * 1024 * 1024; // 100 MB
        if self.scan.max_file_size == 0 || self.scan.max_file_size > MAX_FILE_SIZE {
            return Err(ConfigError::InvalidValue {
                field: "scan.max_file_size".to_owned(),
                reason: format!("must be 1-{MAX_FILE_SIZE}"),
            }
            .into());
        }

        if self.scan.analyzer_program.is_empty() {
            return Err(ConfigError::InvalidValue {
                field: "scan.analyzer_program".to_owned(),
                reason: "analyzer program must not be empty".to_owned(),
            }
            .into());
        }

        // provider 검증
        let valid_providers = ["groq", "gemini"];
        if !valid_providers.contains(&self.llm.provider.as_str()) {
            return Err(ConfigError::InvalidValue {
                field: "llm.provider".to_owned(),
                reason: format!("must be one of: {}", valid_providers.join(", ")),
            }
            .into());
        }

        if !(0.0..=2.0).contains(&self.llm.temperature) {
            return Err(ConfigError::InvalidValue {
                field: "llm.temperature".to_owned(),
                reason: "must be 0.0-2.0".to_owned(),
            }
            .into());
        }

        if !(0.0..=1.0).contains(&self.llm.top_p) {
            return Err(ConfigError::InvalidValue {
                field: "llm.top_p".to_owned(),
                reason: "must be 0.0-1.0".to_owned(),
            }
            .into());
        }

        if self.llm.max_tokens == 0 {
            return Err(ConfigError::InvalidValue {
                field: "llm.max_tokens".to_owned(),
                reason: "must be greater than 0".to_owned(),
            }
            .into());
        }

        if self.llm.request_timeout_secs == 0 || self.llm.request_timeout_secs > 3600 {
            return Err(ConfigError::InvalidValue {
                field: "llm.request_timeout_secs".to_owned(),
                reason: "must be 1-3600".to_owned(),
            }
            .into());
        }

        if self.report.output.is_empty() {
            return Err(ConfigError::InvalidValue {
                field: "report.output".to_owned(),
                reason: "report output path must not be empty".to_owned(),
            }
            .into());
        }

        Ok(())
    }
}

/// 일반 설정
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GeneralConfig {
    /// 로그 레벨 (trace, debug, info, warn, error)
    pub log_level: String,
    /// 로그 형식 (json, pretty)
    pub log_format: String,
}

impl Default for GeneralConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_owned(),
            log_format: "pretty".to_owned(),
        }
    }
}

/// 스캔 설정
///
/// 파일 탐색과 정적 분석 도구 호출에 관한 설정입니다.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ScanConfig {
    /// 스캔 대상 파일 확장자 (점 제외, 대소문자 구분)
    pub extensions: Vec<String>,
    /// 제외 경로 조각 — 디렉토리 경로에 이 문자열이 포함되면 하위 전체를 건너뜀
    pub exclude_paths: Vec<String>,
    /// 정적 분석 도구 실행 파일명
    pub analyzer_program: String,
    /// 정적 분석 타임아웃 (초)
    pub analyzer_timeout_secs: u64,
    /// 파일 최대 허용 크기 (바이트) — 초과 시 해당 파일은 skipped 처리
    pub max_file_size: usize,
}

impl Default for ScanConfig {
    fn default() -> Self {
        Self {
            extensions: vec!["py".to_owned()],
            exclude_paths: vec![
                ".git".to_owned(),
                "venv".to_owned(),
                "__pycache__".to_owned(),
                "node_modules".to_owned(),
                "new".to_owned(), // 이전 실행의 수정 코드 출력 디렉토리
            ],
            analyzer_program: "bandit".to_owned(),
            analyzer_timeout_secs: 60,
            max_file_size: 1024 * 1024, // 1 MB
        }
    }
}

/// LLM 설정
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LlmConfig {
    /// 백엔드 이름 (groq, gemini)
    pub provider: String,
    /// 모델 식별자 (빈 문자열이면 백엔드 기본 모델 사용)
    pub model: String,
    /// 샘플링 온도
    pub temperature: f32,
    /// nucleus sampling 임계값
    pub top_p: f32,
    /// 최대 출력 토큰 수
    pub max_tokens: u32,
    /// HTTP 요청 타임아웃 (초)
    pub request_timeout_secs: u64,
}

impl Default for LlmConfig {
    fn default() -> Self {
        Self {
            provider: "groq".to_owned(),
            model: String::new(),
            temperature: 1.0,
            top_p: 1.0,
            max_tokens: 1024,
            request_timeout_secs: 120,
        }
    }
}

/// 리포트 출력 설정
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ReportConfig {
    /// 집계 리포트 출력 경로
    pub output: String,
}

impl Default for ReportConfig {
    fn default() -> Self {
        Self {
            output: "codemend-report.json".to_owned(),
        }
    }
}

// --- 환경변수 오버라이드 헬퍼 ---

fn override_string(target: &mut String, env_key: &str) {
    if let Ok(val) = std::env::var(env_key) {
        *target = val;
    }
}

fn override_u32(target: &mut u32, env_key: &str) {
    if let Ok(val) = std::env::var(env_key) {
        match val.parse::<u32>() {
            Ok(parsed) => *target = parsed,
            Err(_) => warn!(
                env_key,
                value = val.as_str(),
                "failed to parse u32 from env var, ignoring"
            ),
        }
    }
}

fn override_u64(target: &mut u64, env_key: &str) {
    if let Ok(val) = std::env::var(env_key) {
        match val.parse::<u64>() {
            Ok(parsed) => *target = parsed,
            Err(_) => warn!(
                env_key,
                value = val.as_str(),
                "failed to parse u64 from env var, ignoring"
            ),
        }
    }
}

fn override_usize(target: &mut usize, env_key: &str) {
    if let Ok(val) = std::env::var(env_key) {
        match val.parse::<usize>() {
            Ok(parsed) => *target = parsed,
            Err(_) => warn!(
                env_key,
                value = val.as_str(),
                "failed to parse usize from env var, ignoring"
            ),
        }
    }
}

fn override_f32(target: &mut f32, env_key: &str) {
    if let Ok(val) = std::env::var(env_key) {
        match val.parse::<f32>() {
            Ok(parsed) => *target = parsed,
            Err(_) => warn!(
                env_key,
                value = val.as_str(),
                "failed to parse f32 from env var, ignoring"
            ),
        }
    }
}

fn override_csv(target: &mut Vec<String>, env_key: &str) {
    if let Ok(val) = std::env::var(env_key) {
        *target = val.split(',').map(|s| s.trim().to_owned()).collect();
    }
}
