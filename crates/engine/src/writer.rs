//! 수정 코드 저장 — 원본 옆 `new/` 디렉토리에 비파괴 저장
//!
//! 원본 파일은 절대 수정하거나 이동하지 않습니다. 수정 코드는 원본과 같은
//! 디렉토리의 `new/` 하위에 `new_<원본 파일명>`으로 저장되며, 반복 실행 시
//! 수정 코드 사본만 덮어씁니다 (매 실행이 새로운 수정본).

use std::path::{Path, PathBuf};

use tracing::debug;

use crate::error::WriteError;

/// 수정 코드 출력 디렉토리명
const REMEDIATION_DIR: &str = "new";

/// 수정 코드 파일명 접두어
const REMEDIATION_PREFIX: &str = "new_";

/// 원본 경로에서 수정 코드 저장 경로를 계산합니다 (순수 함수).
///
/// `<원본 디렉토리>/new/new_<원본 파일명>` 형태의 결정적 경로입니다.
pub fn remediation_path(original: &Path) -> PathBuf {
    let dir = original.parent().unwrap_or_else(|| Path::new("."));
    let name = original
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default();
    dir.join(REMEDIATION_DIR)
        .join(format!("{REMEDIATION_PREFIX}{name}"))
}

/// 수정 코드를 저장하고 저장된 경로를 반환합니다.
///
/// 대상 디렉토리가 없으면 생성합니다 (멱등). 이전 실행의 수정 코드가
/// 있으면 덮어씁니다.
///
/// # Errors
///
/// 디렉토리 생성 또는 파일 쓰기 실패 시 [`WriteError`]를 반환합니다.
/// 파일 단위로 격리되는 에러입니다.
pub async fn write_remediation(original: &Path, content: &str) -> Result<PathBuf, WriteError> {
    let dest = remediation_path(original);

    if let Some(dir) = dest.parent() {
        tokio::fs::create_dir_all(dir)
            .await
            .map_err(|e| WriteError::CreateDir {
                path: dir.display().to_string(),
                source: e,
            })?;
    }

    tokio::fs::write(&dest, content)
        .await
        .map_err(|e| WriteError::WriteFile {
            path: dest.display().to_string(),
            source: e,
        })?;

    debug!(path = %dest.display(), bytes = content.len(), "remediation written");

    Ok(dest)
}
