//! 파일 탐색 — 확장자 허용 목록 + 제외 경로 기반 재귀 탐색
//!
//! 제외 판정은 디렉토리 단위로 한 번만 수행됩니다. 디렉토리 경로(루트 기준
//! 상대 경로)에 제외 조각이 포함되면 해당 서브트리 전체를 내려가지 않습니다.
//! 파일 단위 제외 검사를 반복하지 않으므로 제외된 서브트리의 비용은 0입니다.

use std::path::{Path, PathBuf};

use tracing::warn;
use walkdir::{DirEntry, WalkDir};

use codemend_core::error::DiscoveryError;

/// 루트 디렉토리 이하에서 스캔 대상 파일을 탐색합니다.
///
/// - 파일명이 `extensions` 중 하나로 끝나는 파일만 포함합니다 (대소문자 구분).
/// - 루트 기준 상대 경로에 `exclude_paths`의 조각이 포함된 디렉토리는
///   하위 전체가 제외됩니다.
/// - 반환 순서는 디렉토리 순회 순서이며, 한 번의 실행 내에서만 결정적입니다.
///
/// 동기 I/O를 수행하므로 비동기 컨텍스트에서는
/// `tokio::task::spawn_blocking` 내에서 호출해야 합니다.
///
/// # Errors
///
/// 루트가 존재하지 않거나 디렉토리가 아니거나 읽을 수 없는 경우에만
/// `DiscoveryError`를 반환합니다. 하위 디렉토리의 개별 I/O 에러는
/// 경고 로그 후 건너뜁니다.
pub fn discover(
    root: &Path,
    extensions: &[String],
    exclude_paths: &[String],
) -> Result<Vec<PathBuf>, DiscoveryError> {
    let metadata = std::fs::metadata(root).map_err(|e| {
        if e.kind() == std::io::ErrorKind::NotFound {
            DiscoveryError::RootNotFound {
                path: root.display().to_string(),
            }
        } else {
            DiscoveryError::Io {
                path: root.display().to_string(),
                source: e,
            }
        }
    })?;

    if !metadata.is_dir() {
        return Err(DiscoveryError::NotADirectory {
            path: root.display().to_string(),
        });
    }

    let suffixes: Vec<String> = extensions.iter().map(|ext| format!(".{ext}")).collect();

    let mut files = Vec::new();

    let walker = WalkDir::new(root)
        .into_iter()
        .filter_entry(|entry| !is_excluded_dir(entry, root, exclude_paths));

    for entry in walker {
        let entry = match entry {
            Ok(e) => e,
            Err(e) => {
                warn!(error = %e, "failed to read directory entry, skipping");
                continue;
            }
        };

        if !entry.file_type().is_file() {
            continue;
        }

        let name = entry.file_name().to_string_lossy();
        if suffixes.iter().any(|suffix| name.ends_with(suffix.as_str())) {
            files.push(entry.into_path());
        }
    }

    Ok(files)
}

/// 디렉토리 제외 여부를 판정합니다.
///
/// 루트 자신은 제외 대상이 아니며, 파일은 부모 디렉토리의 판정을 따릅니다.
fn is_excluded_dir(entry: &DirEntry, root: &Path, exclude_paths: &[String]) -> bool {
    if !entry.file_type().is_dir() || entry.path() == root {
        return false;
    }

    let relative = entry.path().strip_prefix(root).unwrap_or(entry.path());
    let relative = relative.to_string_lossy();
    exclude_paths
        .iter()
        .any(|fragment| !fragment.is_empty() && relative.contains(fragment.as_str()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    fn touch(path: &Path) {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).unwrap();
        }
        fs::write(path, "x = 1\n").unwrap();
    }

    fn names(paths: &[PathBuf], root: &Path) -> Vec<String> {
        let mut names: Vec<String> = paths
            .iter()
            .map(|p| {
                p.strip_prefix(root)
                    .unwrap()
                    .to_string_lossy()
                    .replace('\\', "/")
            })
            .collect();
        names.sort();
        names
    }

    #[test]
    fn discovers_matching_files_recursively() {
        let dir = tempfile::tempdir().unwrap();
        touch(&dir.path().join("a.py"));
        touch(&dir.path().join("sub/b.py"));
        touch(&dir.path().join("sub/deep/c.py"));

        let found = discover(dir.path(), &["py".to_owned()], &[]).unwrap();
        assert_eq!(
            names(&found, dir.path()),
            vec!["a.py", "sub/b.py", "sub/deep/c.py"]
        );
    }

    #[test]
    fn extension_filter_excludes_non_matching_files() {
        let dir = tempfile::tempdir().unwrap();
        touch(&dir.path().join("a.py"));
        touch(&dir.path().join("notes.txt"));
        touch(&dir.path().join("Makefile"));

        let found = discover(dir.path(), &["py".to_owned()], &[]).unwrap();
        assert_eq!(names(&found, dir.path()), vec!["a.py"]);
    }

    #[test]
    fn extension_match_is_case_sensitive() {
        let dir = tempfile::tempdir().unwrap();
        touch(&dir.path().join("a.py"));
        touch(&dir.path().join("b.PY"));

        let found = discover(dir.path(), &["py".to_owned()], &[]).unwrap();
        assert_eq!(names(&found, dir.path()), vec!["a.py"]);
    }

    #[test]
    fn excluded_subtree_is_pruned_regardless_of_extension() {
        let dir = tempfile::tempdir().unwrap();
        touch(&dir.path().join("a.py"));
        touch(&dir.path().join("devsecx_workflow/c.py"));
        touch(&dir.path().join("devsecx_workflow/nested/d.py"));

        let found = discover(
            dir.path(),
            &["py".to_owned()],
            &["devsecx_workflow".to_owned()],
        )
        .unwrap();
        assert_eq!(names(&found, dir.path()), vec!["a.py"]);
    }

    #[test]
    fn exclusion_matches_path_fragment_of_nested_dir() {
        let dir = tempfile::tempdir().unwrap();
        touch(&dir.path().join("src/ok.py"));
        touch(&dir.path().join("src/__pycache__/cached.py"));

        let found = discover(dir.path(), &["py".to_owned()], &["__pycache__".to_owned()]).unwrap();
        assert_eq!(names(&found, dir.path()), vec!["src/ok.py"]);
    }

    #[test]
    fn exclusion_does_not_apply_to_file_names() {
        let dir = tempfile::tempdir().unwrap();
        // 파일명에 제외 조각이 들어 있어도 파일은 제외되지 않는다
        touch(&dir.path().join("renew.py"));

        let found = discover(dir.path(), &["py".to_owned()], &["new".to_owned()]).unwrap();
        assert_eq!(names(&found, dir.path()), vec!["renew.py"]);
    }

    #[test]
    fn empty_fragment_does_not_exclude_everything() {
        let dir = tempfile::tempdir().unwrap();
        touch(&dir.path().join("sub/a.py"));

        let found = discover(dir.path(), &["py".to_owned()], &[String::new()]).unwrap();
        assert_eq!(names(&found, dir.path()), vec!["sub/a.py"]);
    }

    #[test]
    fn missing_root_is_an_error() {
        let result = discover(
            Path::new("/nonexistent/codemend/root"),
            &["py".to_owned()],
            &[],
        );
        assert!(matches!(result, Err(DiscoveryError::RootNotFound { .. })));
    }

    #[test]
    fn file_root_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let file = dir.path().join("a.py");
        touch(&file);

        let result = discover(&file, &["py".to_owned()], &[]);
        assert!(matches!(result, Err(DiscoveryError::NotADirectory { .. })));
    }

    #[test]
    fn empty_directory_yields_empty_list() {
        let dir = tempfile::tempdir().unwrap();
        let found = discover(dir.path(), &["py".to_owned()], &[]).unwrap();
        assert!(found.is_empty());
    }
}
