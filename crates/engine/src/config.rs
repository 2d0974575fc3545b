//! 엔진 설정
//!
//! [`EngineConfig`]는 한 번의 실행에 필요한 값(탐색 루트, 탐색 규칙,
//! 리포트 출력 경로)을 담습니다. core 설정과 CLI 인자에서 조립됩니다.

use std::path::PathBuf;

use codemend_core::config::CodemendConfig;
use codemend_core::error::ConfigError;

/// 엔진 실행 설정
#[derive(Debug, Clone)]
pub struct EngineConfig {
    /// 탐색 루트 디렉토리
    pub root: PathBuf,
    /// 스캔 대상 파일 확장자
    pub extensions: Vec<String>,
    /// 제외 경로 조각
    pub exclude_paths: Vec<String>,
    /// 파일 최대 허용 크기 (바이트) — 초과 시 해당 파일은 skipped
    pub max_file_size: usize,
    /// 집계 리포트 출력 경로
    pub report_output: PathBuf,
}

impl EngineConfig {
    /// core 통합 설정과 탐색 루트에서 엔진 설정을 조립합니다.
    pub fn from_core(config: &CodemendConfig, root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            extensions: config.scan.extensions.clone(),
            exclude_paths: config.scan.exclude_paths.clone(),
            max_file_size: config.scan.max_file_size,
            report_output: PathBuf::from(&config.report.output),
        }
    }

    /// 설정 값의 유효성을 검증합니다.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.root.as_os_str().is_empty() {
            return Err(ConfigError::InvalidValue {
                field: "root".to_owned(),
                reason: "scan root must not be empty".to_owned(),
            });
        }

        if self.extensions.is_empty() {
            return Err(ConfigError::InvalidValue {
                field: "scan.extensions".to_owned(),
                reason: "at least one file extension required".to_owned(),
            });
        }

        if self.max_file_size == 0 {
            return Err(ConfigError::InvalidValue {
                field: "scan.max_file_size".to_owned(),
                reason: "must be greater than 0".to_owned(),
            });
        }

        if self.report_output.as_os_str().is_empty() {
            return Err(ConfigError::InvalidValue {
                field: "report.output".to_owned(),
                reason: "report output path must not be empty".to_owned(),
            });
        }

        Ok(())
    }
}
