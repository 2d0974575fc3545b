//! 엔진 에러 타입
//!
//! [`WriteError`]는 파일 단위로 격리되는 쓰기 실패이고,
//! [`EngineError`]는 실행 자체를 중단시키는 치명적 에러입니다.
//! 파일 단위의 분석/LLM 실패는 에러로 전파되지 않고
//! [`FileOutcome`](codemend_core::types::FileOutcome)으로 기록됩니다.

use codemend_core::error::{ConfigError, DiscoveryError};

/// 파일 쓰기 실패
///
/// 수정 코드 저장 시에는 파일 단위로 격리되며,
/// 집계 리포트 저장 시에는 [`EngineError::Report`]로 승격됩니다.
#[derive(Debug, thiserror::Error)]
pub enum WriteError {
    /// 대상 디렉토리 생성 실패
    #[error("failed to create directory {path}: {source}")]
    CreateDir {
        path: String,
        source: std::io::Error,
    },

    /// 파일 쓰기 실패
    #[error("failed to write {path}: {source}")]
    WriteFile {
        path: String,
        source: std::io::Error,
    },

    /// 임시 파일 rename 실패
    #[error("failed to rename {from} to {to}: {source}")]
    Rename {
        from: String,
        to: String,
        source: std::io::Error,
    },

    /// 직렬화 실패
    #[error("failed to serialize report: {0}")]
    Serialize(#[from] serde_json::Error),
}

/// 실행 전체를 중단시키는 치명적 에러
///
/// 처리할 파일이 하나도 없게 만드는 조건(탐색 루트 불량, 설정 불량,
/// 리포트 저장 실패)만 여기에 해당합니다. 파일 몇 개의 실패는
/// 실행을 실패시키지 않습니다.
#[derive(Debug, thiserror::Error)]
pub enum EngineError {
    /// 파일 탐색 실패
    #[error("discovery failed: {0}")]
    Discovery(#[from] DiscoveryError),

    /// 설정 불량
    #[error("config error: {0}")]
    Config(#[from] ConfigError),

    /// 집계 리포트 저장 실패
    #[error("failed to persist run report: {0}")]
    Report(#[from] WriteError),

    /// 내부 태스크 실행 실패
    #[error("task error: {0}")]
    Task(String),
}
