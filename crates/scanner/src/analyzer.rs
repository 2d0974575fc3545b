//! 정적 분석 어댑터 — Bandit 서브프로세스 호출 및 결과 변환
//!
//! [`StaticAnalyzer`] trait은 분석 도구 확장 지점입니다.
//! 새로운 분석 도구를 지원하려면 이 trait을 구현합니다.
//!
//! [`BanditAnalyzer`]는 파일 하나를 대상으로 `bandit -f json <file>`을
//! 실행하고 JSON 출력을 [`ScanFinding`] 목록으로 변환합니다.
//!
//! # 종료 코드 해석
//!
//! Bandit은 이슈가 발견되면 0이 아닌 종료 코드를 반환합니다.
//! 따라서 종료 코드가 아니라 **stdout이 유효한 JSON인지**로 성공을 판정합니다.
//! 실행 실패, 타임아웃, 파싱 불가만 [`AnalysisFailure`]입니다.

use std::path::Path;
use std::process::Stdio;
use std::time::{Duration, Instant};

use async_trait::async_trait;
use metrics::{counter, histogram};
use serde::Deserialize;
use tracing::{debug, warn};

use codemend_core::metrics::{
    LABEL_SEVERITY, SCANNER_ANALYSES_TOTAL, SCANNER_ANALYSIS_DURATION_SECONDS,
    SCANNER_ANALYSIS_FAILURES_TOTAL, SCANNER_FINDINGS_TOTAL,
};
use codemend_core::types::{Confidence, ScanFinding, Severity};

use crate::config::ScannerConfig;
use crate::error::AnalysisFailure;

/// 진단용 원시 출력 보관 상한 (바이트)
const MAX_DIAGNOSTIC_BYTES: usize = 4096;

/// 정적 분석 확장 지점 trait
///
/// 파일 하나에 대해 단 한 번의 분석을 수행합니다. 재시도하지 않습니다.
#[async_trait]
pub trait StaticAnalyzer: Send + Sync {
    /// 분석 도구 이름 (로깅용)
    fn tool_name(&self) -> &str;

    /// 파일 하나를 분석하여 탐지 결과 목록을 반환합니다.
    ///
    /// 이슈가 없으면 빈 목록을 반환합니다 (에러 아님).
    async fn analyze(&self, file: &Path) -> Result<Vec<ScanFinding>, AnalysisFailure>;
}

/// Bandit 서브프로세스 어댑터
pub struct BanditAnalyzer {
    program: String,
    timeout: Duration,
}

impl BanditAnalyzer {
    /// 스캐너 설정에서 어댑터를 생성합니다.
    pub fn new(config: &ScannerConfig) -> Self {
        Self {
            program: config.analyzer_program.clone(),
            timeout: Duration::from_secs(config.analyzer_timeout_secs),
        }
    }

    /// 실행 파일명과 타임아웃을 직접 지정하여 생성합니다.
    pub fn with_program(program: impl Into<String>, timeout: Duration) -> Self {
        Self {
            program: program.into(),
            timeout,
        }
    }
}

#[async_trait]
impl StaticAnalyzer for BanditAnalyzer {
    fn tool_name(&self) -> &str {
        &self.program
    }

    async fn analyze(&self, file: &Path) -> Result<Vec<ScanFinding>, AnalysisFailure> {
        let started = Instant::now();

        let child = tokio::process::Command::new(&self.program)
            .arg("-f")
            .arg("json")
            .arg(file)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true)
            .spawn()
            .map_err(|e| {
                counter!(SCANNER_ANALYSIS_FAILURES_TOTAL).increment(1);
                AnalysisFailure::Launch {
                    program: self.program.clone(),
                    source: e,
                }
            })?;

        // 타임아웃 시 future가 드롭되면서 kill_on_drop으로 프로세스가 종료됨
        let output = tokio::time::timeout(self.timeout, child.wait_with_output())
            .await
            .map_err(|_| {
                counter!(SCANNER_ANALYSIS_FAILURES_TOTAL).increment(1);
                AnalysisFailure::Timeout {
                    program: self.program.clone(),
                    timeout_secs: self.timeout.as_secs(),
                }
            })?
            .map_err(|e| {
                counter!(SCANNER_ANALYSIS_FAILURES_TOTAL).increment(1);
                AnalysisFailure::Launch {
                    program: self.program.clone(),
                    source: e,
                }
            })?;

        let stdout = String::from_utf8_lossy(&output.stdout);
        let stderr = String::from_utf8_lossy(&output.stderr);

        if !output.status.success() {
            // 이슈 발견 시의 정상적인 비정상 종료 — 파싱이 되면 성공으로 취급
            debug!(
                file = %file.display(),
                status = ?output.status.code(),
                "analyzer exited non-zero (findings expected)"
            );
        }

        let findings = parse_bandit_output(&stdout).map_err(|reason| {
            counter!(SCANNER_ANALYSIS_FAILURES_TOTAL).increment(1);
            warn!(file = %file.display(), %reason, "analyzer output unparsable");
            AnalysisFailure::OutputParse {
                reason,
                stdout: truncate(&stdout),
                stderr: truncate(&stderr),
            }
        })?;

        counter!(SCANNER_ANALYSES_TOTAL).increment(1);
        for finding in &findings {
            counter!(
                SCANNER_FINDINGS_TOTAL,
                LABEL_SEVERITY => finding.severity.to_string().to_lowercase()
            )
            .increment(1);
        }
        histogram!(SCANNER_ANALYSIS_DURATION_SECONDS).record(started.elapsed().as_secs_f64());

        debug!(
            file = %file.display(),
            findings = findings.len(),
            "static analysis completed"
        );

        Ok(findings)
    }
}

/// Bandit JSON 출력을 탐지 결과 목록으로 변환합니다 (순수 함수).
///
/// 출력 순서를 그대로 유지합니다. 선택 필드 누락은 기본값으로 허용합니다.
pub fn parse_bandit_output(stdout: &str) -> Result<Vec<ScanFinding>, String> {
    let output: BanditOutput =
        serde_json::from_str(stdout).map_err(|e| format!("invalid analyzer JSON: {e}"))?;

    Ok(output
        .results
        .into_iter()
        .map(|issue| ScanFinding {
            id: issue.test_id,
            description: issue.issue_text,
            severity: Severity::from_str_loose(&issue.issue_severity).unwrap_or_default(),
            confidence: Confidence::from_str_loose(&issue.issue_confidence).unwrap_or_default(),
            file: issue.filename,
            line: issue.line_number,
            cwe: issue.issue_cwe.map(|cwe| cwe.id),
        })
        .collect())
}

fn truncate(s: &str) -> String {
    if s.len() <= MAX_DIAGNOSTIC_BYTES {
        return s.to_owned();
    }
    let mut end = MAX_DIAGNOSTIC_BYTES;
    while !s.is_char_boundary(end) {
        end -= 1;
    }
    format!("{}... (truncated)", &s[..end])
}

// --- Bandit JSON 원시 구조 ---

#[derive(Debug, Deserialize)]
struct BanditOutput {
    #[serde(default)]
    results: Vec<BanditIssue>,
}

#[derive(Debug, Deserialize)]
struct BanditIssue {
    #[serde(default)]
    test_id: String,
    #[serde(default)]
    issue_text: String,
    #[serde(default)]
    issue_severity: String,
    #[serde(default)]
    issue_confidence: String,
    #[serde(default)]
    filename: String,
    #[serde(default)]
    line_number: u32,
    #[serde(default)]
    issue_cwe: Option<BanditCwe>,
}

#[derive(Debug, Deserialize)]
struct BanditCwe {
    #[serde(default)]
    id: u32,
}
