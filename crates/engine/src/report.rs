//! 집계 리포트 저장 — 실행당 한 번, 원자적 쓰기
//!
//! 리포트는 실행 중 점진적으로 디스크에 쓰이지 않습니다. 모든 파일 처리가
//! 끝난 뒤 한 번만 직렬화하며, 대상과 같은 디렉토리에 임시 파일을 쓴 후
//! rename하므로 읽는 쪽은 항상 완전한 이전 실행 또는 완전한 현재 실행만
//! 관찰합니다.

use std::path::Path;

use tracing::info;

use codemend_core::types::RunReport;

use crate::error::WriteError;

/// 집계 리포트를 JSON 문서 하나로 저장합니다.
///
/// # Errors
///
/// 직렬화, 디렉토리 생성, 쓰기, rename 실패 시 [`WriteError`]를 반환합니다.
pub async fn persist_report(report: &RunReport, path: &Path) -> Result<(), WriteError> {
    let json = serde_json::to_vec_pretty(report)?;

    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            tokio::fs::create_dir_all(parent)
                .await
                .map_err(|e| WriteError::CreateDir {
                    path: parent.display().to_string(),
                    source: e,
                })?;
        }
    }

    // rename이 원자적이려면 임시 파일이 대상과 같은 파일시스템에 있어야 한다
    let tmp = path.with_extension("tmp");
    tokio::fs::write(&tmp, &json)
        .await
        .map_err(|e| WriteError::WriteFile {
            path: tmp.display().to_string(),
            source: e,
        })?;

    tokio::fs::rename(&tmp, path)
        .await
        .map_err(|e| WriteError::Rename {
            from: tmp.display().to_string(),
            to: path.display().to_string(),
            source: e,
        })?;

    info!(path = %path.display(), files = report.len(), "run report persisted");

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use codemend_core::types::{FileOutcome, FileRunResult};

    fn sample_report() -> RunReport {
        let mut report = RunReport::new();
        report.push(FileRunResult {
            file: "a.py".to_owned(),
            report: Some(serde_json::json!({"issues": []})),
            remediated_path: None,
            outcome: FileOutcome::Succeeded,
        });
        report
    }

    #[tokio::test]
    async fn persisted_report_parses_as_complete_json_array() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("report.json");

        persist_report(&sample_report(), &path).await.unwrap();

        let content = tokio::fs::read_to_string(&path).await.unwrap();
        let parsed: serde_json::Value = serde_json::from_str(&content).unwrap();
        assert_eq!(parsed.as_array().unwrap().len(), 1);
        assert_eq!(parsed[0]["file"], "a.py");
    }

    #[tokio::test]
    async fn no_temp_file_remains_after_persist() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("report.json");

        persist_report(&sample_report(), &path).await.unwrap();

        assert!(!path.with_extension("tmp").exists());
        assert!(path.exists());
    }

    #[tokio::test]
    async fn persist_overwrites_previous_run() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("report.json");

        persist_report(&RunReport::new(), &path).await.unwrap();
        persist_report(&sample_report(), &path).await.unwrap();

        let content = tokio::fs::read_to_string(&path).await.unwrap();
        let parsed: serde_json::Value = serde_json::from_str(&content).unwrap();
        assert_eq!(parsed.as_array().unwrap().len(), 1);
    }

    #[tokio::test]
    async fn persist_creates_parent_directories() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out").join("nested").join("report.json");

        persist_report(&sample_report(), &path).await.unwrap();

        assert!(path.exists());
    }

    #[tokio::test]
    async fn empty_report_is_an_empty_array() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("report.json");

        persist_report(&RunReport::new(), &path).await.unwrap();

        let content = tokio::fs::read_to_string(&path).await.unwrap();
        assert_eq!(content.trim(), "[]");
    }
}
