//! 에러 타입 — 도메인별 에러 정의

/// Codemend 최상위 에러 타입
#[derive(Debug, thiserror::Error)]
pub enum CodemendError {
    /// 설정 관련 에러
    #[error("config error: {0}")]
    Config(#[from] ConfigError),

    /// 파일 탐색 에러
    #[error("discovery error: {0}")]
    Discovery(#[from] DiscoveryError),

    /// I/O 에러
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

/// 설정 관련 에러
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// 설정 파일을 찾을 수 없음
    #[error("config file not found: {path}")]
    FileNotFound { path: String },

    /// 설정 파싱 실패
    #[error("failed to parse config: {reason}")]
    ParseFailed { reason: String },

    /// 유효하지 않은 설정 값
    #[error("invalid config value for '{field}': {reason}")]
    InvalidValue { field: String, reason: String },
}

/// 파일 탐색 에러
///
/// 탐색 루트 자체에 문제가 있을 때만 발생합니다.
/// 실행 전체를 중단시키는 치명적 에러입니다.
#[derive(Debug, thiserror::Error)]
pub enum DiscoveryError {
    /// 탐색 루트가 존재하지 않음
    #[error("scan root not found: {path}")]
    RootNotFound { path: String },

    /// 탐색 루트가 디렉토리가 아님
    #[error("scan root is not a directory: {path}")]
    NotADirectory { path: String },

    /// 탐색 중 I/O 에러
    #[error("discovery io error: {path}: {source}")]
    Io {
        path: String,
        source: std::io::Error,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn config_error_display() {
        let err = ConfigError::InvalidValue {
            field: "llm.provider".to_owned(),
            reason: "must be one of: groq, gemini".to_owned(),
        };
        let msg = err.to_string();
        assert!(msg.contains("llm.provider"));
        assert!(msg.contains("groq"));
    }

    #[test]
    fn discovery_error_display() {
        let err = DiscoveryError::RootNotFound {
            path: "/missing/project".to_owned(),
        };
        assert!(err.to_string().contains("/missing/project"));
    }

    #[test]
    fn config_error_converts_to_codemend_error() {
        let err: CodemendError = ConfigError::FileNotFound {
            path: "codemend.toml".to_owned(),
        }
        .into();
        assert!(matches!(
            err,
            CodemendError::Config(ConfigError::FileNotFound { .. })
        ));
    }

    #[test]
    fn discovery_error_converts_to_codemend_error() {
        let err: CodemendError = DiscoveryError::NotADirectory {
            path: "a.py".to_owned(),
        }
        .into();
        assert!(matches!(err, CodemendError::Discovery(_)));
    }

    #[test]
    fn io_error_converts_to_codemend_error() {
        let io_err = std::io::Error::new(std::io::ErrorKind::PermissionDenied, "denied");
        let err: CodemendError = io_err.into();
        assert!(matches!(err, CodemendError::Io(_)));
    }
}
