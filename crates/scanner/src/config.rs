//! 스캐너 설정
//!
//! [`ScannerConfig`]는 core의 [`ScanConfig`](codemend_core::config::ScanConfig)에서
//! 파생되며, 탐색 규칙과 분석 도구 호출 방식을 담습니다.
//!
//! # 사용 예시
//!
//! ```
//! use codemend_scanner::ScannerConfigBuilder;
//!
//! let config = ScannerConfigBuilder::new()
//!     .extensions(vec!["py".to_owned()])
//!     .analyzer_timeout_secs(30)
//!     .build()
//!     .unwrap();
//! ```

use codemend_core::error::ConfigError;

/// 스캐너 설정
///
/// # 필드
///
/// - **extensions**: 스캔 대상 파일 확장자 (점 제외, 대소문자 구분)
/// - **exclude_paths**: 제외 경로 조각 — 디렉토리 경로에 포함되면 하위 전체 제외
/// - **analyzer_program**: 분석 도구 실행 파일명
/// - **analyzer_timeout_secs**: 파일당 분석 타임아웃 (초)
#[derive(Debug, Clone)]
pub struct ScannerConfig {
    /// 스캔 대상 파일 확장자
    pub extensions: Vec<String>,
    /// 제외 경로 조각
    pub exclude_paths: Vec<String>,
    /// 분석 도구 실행 파일명
    pub analyzer_program: String,
    /// 파일당 분석 타임아웃 (초)
    pub analyzer_timeout_secs: u64,
}

impl Default for ScannerConfig {
    fn default() -> Self {
        let core = codemend_core::config::ScanConfig::default();
        Self {
            extensions: core.extensions,
            exclude_paths: core.exclude_paths,
            analyzer_program: core.analyzer_program,
            analyzer_timeout_secs: core.analyzer_timeout_secs,
        }
    }
}

impl ScannerConfig {
    /// core의 `ScanConfig`에서 스캐너 설정을 생성합니다.
    pub fn from_core(core: &codemend_core::config::ScanConfig) -> Self {
        Self {
            extensions: core.extensions.clone(),
            exclude_paths: core.exclude_paths.clone(),
            analyzer_program: core.analyzer_program.clone(),
            analyzer_timeout_secs: core.analyzer_timeout_secs,
        }
    }

    /// 설정 값의 유효성을 검증합니다.
    ///
    /// # 검증 규칙
    ///
    /// - `extensions`: 하나 이상, 빈 문자열 불가
    /// - `analyzer_program`: 비어있으면 안 됨
    /// - `analyzer_timeout_secs`: 1-3600
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.extensions.is_empty() {
            return Err(ConfigError::InvalidValue {
                field: "scan.extensions".to_owned(),
                reason: "at least one file extension required".to_owned(),
            });
        }

        if self.extensions.iter().any(|e| e.is_empty()) {
            return Err(ConfigError::InvalidValue {
                field: "scan.extensions".to_owned(),
                reason: "extensions must not be empty strings".to_owned(),
            });
        }

        if self.analyzer_program.is_empty() {
            return Err(ConfigError::InvalidValue {
                field: "scan.analyzer_program".to_owned(),
                reason: "analyzer program must not be empty".to_owned(),
            });
        }

        if self.analyzer_timeout_secs == 0 || self.analyzer_timeout_secs > 3600 {
            return Err(ConfigError::InvalidValue {
                field: "scan.analyzer_timeout_secs".to_owned(),
                reason: "must be 1-3600".to_owned(),
            });
        }

        Ok(())
    }
}

/// [`ScannerConfig`] 빌더
#[derive(Default)]
pub struct ScannerConfigBuilder {
    config: ScannerConfig,
}

impl ScannerConfigBuilder {
    /// 기본값을 가진 새 빌더를 생성합니다.
    pub fn new() -> Self {
        Self::default()
    }

    /// 스캔 대상 확장자를 설정합니다.
    pub fn extensions(mut self, extensions: Vec<String>) -> Self {
        self.config.extensions = extensions;
        self
    }

    /// 제외 경로 조각을 설정합니다.
    pub fn exclude_paths(mut self, fragments: Vec<String>) -> Self {
        self.config.exclude_paths = fragments;
        self
    }

    /// 분석 도구 실행 파일명을 설정합니다.
    pub fn analyzer_program(mut self, program: impl Into<String>) -> Self {
        self.config.analyzer_program = program.into();
        self
    }

    /// 분석 타임아웃(초)을 설정합니다.
    pub fn analyzer_timeout_secs(mut self, secs: u64) -> Self {
        self.config.analyzer_timeout_secs = secs;
        self
    }

    /// 설정을 검증하고 빌드합니다.
    ///
    /// # Errors
    ///
    /// 유효성 검증 실패 시 `ConfigError::InvalidValue` 반환
    pub fn build(self) -> Result<ScannerConfig, ConfigError> {
        self.config.validate()?;
        Ok(self.config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_is_valid() {
        let config = ScannerConfig::default();
        config.validate().unwrap();
    }

    #[test]
    fn from_core_preserves_values() {
        let core = codemend_core::config::ScanConfig {
            extensions: vec!["py".to_owned(), "pyw".to_owned()],
            exclude_paths: vec!["dist".to_owned()],
            analyzer_program: "bandit".to_owned(),
            analyzer_timeout_secs: 45,
            max_file_size: 1024,
        };
        let config = ScannerConfig::from_core(&core);
        assert_eq!(config.extensions, vec!["py", "pyw"]);
        assert_eq!(config.exclude_paths, vec!["dist"]);
        assert_eq!(config.analyzer_timeout_secs, 45);
    }

    #[test]
    fn validate_rejects_empty_extensions() {
        let result = ScannerConfigBuilder::new().extensions(vec![]).build();
        assert!(result.is_err());
    }

    #[test]
    fn validate_rejects_empty_extension_string() {
        let result = ScannerConfigBuilder::new()
            .extensions(vec!["py".to_owned(), String::new()])
            .build();
        assert!(result.is_err());
    }

    #[test]
    fn validate_rejects_empty_program() {
        let result = ScannerConfigBuilder::new().analyzer_program("").build();
        assert!(result.is_err());
    }

    #[test]
    fn validate_rejects_zero_timeout() {
        let result = ScannerConfigBuilder::new().analyzer_timeout_secs(0).build();
        assert!(result.is_err());
    }

    #[test]
    fn builder_all_setters() {
        let config = ScannerConfigBuilder::new()
            .extensions(vec!["py".to_owned()])
            .exclude_paths(vec![".git".to_owned(), "venv".to_owned()])
            .analyzer_program("bandit")
            .analyzer_timeout_secs(120)
            .build()
            .unwrap();

        assert_eq!(config.extensions, vec!["py"]);
        assert_eq!(config.exclude_paths, vec![".git", "venv"]);
        assert_eq!(config.analyzer_program, "bandit");
        assert_eq!(config.analyzer_timeout_secs, 120);
    }
}
