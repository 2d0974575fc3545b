//! 실행 조정자 — 전체 스캔-수정 파이프라인 흐름 관리
//!
//! [`RunCoordinator`]는 발견된 파일을 하나씩 순차 처리합니다.
//! 파일 하나의 상태 전이는 다음과 같습니다:
//!
//! ```text
//! Discovered --> (read) --> Scanned --> ReportGenerated --> RemediationGenerated --> Written --> Recorded
//!                  |            |              |                     |                  |
//!                skipped   scan_failed    llm_failed            llm_failed        write_failed
//! ```
//!
//! 어떤 실패 상태로의 전이든 해당 파일의 남은 단계만 건너뛰고,
//! 조정자는 항상 다음 파일로 진행합니다. 파일별 에러는 이 경계를
//! 넘어 전파되지 않습니다.
//!
//! # 수정 코드 생성 규칙
//!
//! - 수정 프롬프트에는 항상 **원본 소스**를 사용합니다 (생성된 리포트가 아니라).
//! - 이슈가 0건인 파일은 리포트만 생성하고 수정 코드 생성을 생략합니다.
//! - 리포트 생성이 실패해도 소스는 확보된 상태이므로 수정 코드 생성은 시도합니다.

use std::path::Path;
use std::time::Instant;

use metrics::{counter, histogram};
use tracing::{info, warn};

use codemend_core::metrics::{
    ENGINE_FILES_PROCESSED_TOTAL, ENGINE_REMEDIATIONS_WRITTEN_TOTAL, ENGINE_RUN_DURATION_SECONDS,
    LABEL_OUTCOME, SCANNER_FILES_DISCOVERED_TOTAL,
};
use codemend_core::types::{FileOutcome, FileRunResult, RunReport};
use codemend_llm::provider::{Credentials, Provider};
use codemend_llm::{build_remediation_prompt, build_report_prompt};
use codemend_scanner::analyzer::StaticAnalyzer;
use codemend_scanner::discover;

use crate::config::EngineConfig;
use crate::error::EngineError;
use crate::report::persist_report;
use crate::writer::write_remediation;

/// 실행 조정자
///
/// 한 번의 실행 동안 `RunReport`와 파일 내용을 단독 소유합니다.
/// 파일 간 공유 상태는 append-only 리포트뿐이므로 순차 구현에는
/// 별도의 동기화가 필요 없습니다.
pub struct RunCoordinator {
    config: EngineConfig,
    analyzer: Box<dyn StaticAnalyzer>,
    provider: Box<dyn Provider>,
    credentials: Credentials,
}

impl RunCoordinator {
    /// 전체 파이프라인을 실행하고 집계 리포트를 반환합니다.
    ///
    /// 발견된 모든 파일에 대해 처리를 시도하며, 파일별 실패는
    /// `FileOutcome`으로 기록됩니다. 리포트는 마지막 파일 처리 후
    /// 정확히 한 번 저장됩니다.
    ///
    /// # Errors
    ///
    /// 탐색 루트 불량, 리포트 저장 실패 등 파일을 전혀 처리할 수 없는
    /// 조건에서만 [`EngineError`]를 반환합니다.
    pub async fn run(&self) -> Result<RunReport, EngineError> {
        let run_id = uuid::Uuid::new_v4().to_string();
        let started = Instant::now();

        info!(
            run_id = %run_id,
            root = %self.config.root.display(),
            provider = self.provider.name(),
            analyzer = self.analyzer.tool_name(),
            "starting run"
        );

        // 탐색은 동기 I/O이므로 blocking 풀에서 수행
        let files = {
            let root = self.config.root.clone();
            let extensions = self.config.extensions.clone();
            let exclude_paths = self.config.exclude_paths.clone();
            tokio::task::spawn_blocking(move || discover(&root, &extensions, &exclude_paths))
                .await
                .map_err(|e| EngineError::Task(format!("spawn_blocking failed: {e}")))??
        };

        counter!(SCANNER_FILES_DISCOVERED_TOTAL).increment(files.len() as u64);
        info!(run_id = %run_id, files = files.len(), "discovery completed");

        let mut report = RunReport::new();
        for file in &files {
            let result = self.process_file(file).await;
            counter!(ENGINE_FILES_PROCESSED_TOTAL, LABEL_OUTCOME => result.outcome.as_str())
                .increment(1);
            info!(file = %file.display(), outcome = %result.outcome, "file processed");
            report.push(result);
        }

        persist_report(&report, &self.config.report_output).await?;

        histogram!(ENGINE_RUN_DURATION_SECONDS).record(started.elapsed().as_secs_f64());
        info!(
            run_id = %run_id,
            files = report.len(),
            succeeded = report.count(FileOutcome::Succeeded),
            "run completed"
        );

        Ok(report)
    }

    /// 파일 하나를 처리합니다. 실패는 결과 플래그로 흡수됩니다.
    async fn process_file(&self, file: &Path) -> FileRunResult {
        let file_name = file.display().to_string();

        // 소스 읽기 — 실패 시 skipped
        let source = match self.read_source(file).await {
            Ok(source) => source,
            Err(reason) => {
                warn!(file = %file_name, %reason, "skipping file");
                return FileRunResult {
                    file: file_name,
                    report: None,
                    remediated_path: None,
                    outcome: FileOutcome::Skipped,
                };
            }
        };

        // 정적 분석 — 실패 시 scan_failed, 이후 단계 생략
        let findings = match self.analyzer.analyze(file).await {
            Ok(findings) => findings,
            Err(e) => {
                warn!(file = %file_name, error = %e, "static analysis failed");
                return FileRunResult {
                    file: file_name,
                    report: None,
                    remediated_path: None,
                    outcome: FileOutcome::ScanFailed,
                };
            }
        };

        let mut llm_failed = false;
        let mut write_failed = false;

        // 리포트 생성 — 이슈 0건도 "이슈 없음" 리포트를 생성한다
        let report_prompt = build_report_prompt(&findings);
        let report = match self.provider.generate(&report_prompt, &self.credentials).await {
            Ok(text) => Some(parse_report_text(text)),
            Err(e) => {
                warn!(file = %file_name, error = %e, "report generation failed");
                llm_failed = true;
                None
            }
        };

        // 수정 코드 생성 — 이슈가 있을 때만, 원본 소스로 요청한다.
        // 리포트 생성이 실패했어도 소스는 있으므로 시도한다.
        let mut remediated_path = None;
        if !findings.is_empty() {
            let remediation_prompt = build_remediation_prompt(&source);
            match self
                .provider
                .generate(&remediation_prompt, &self.credentials)
                .await
            {
                Ok(code) => match write_remediation(file, &code).await {
                    Ok(path) => {
                        counter!(ENGINE_REMEDIATIONS_WRITTEN_TOTAL).increment(1);
                        remediated_path = Some(path.display().to_string());
                    }
                    Err(e) => {
                        warn!(file = %file_name, error = %e, "remediation write failed");
                        write_failed = true;
                    }
                },
                Err(e) => {
                    warn!(file = %file_name, error = %e, "remediation generation failed");
                    llm_failed = true;
                }
            }
        }

        let outcome = if llm_failed {
            FileOutcome::LlmFailed
        } else if write_failed {
            FileOutcome::WriteFailed
        } else {
            FileOutcome::Succeeded
        };

        FileRunResult {
            file: file_name,
            report,
            remediated_path,
            outcome,
        }
    }

    /// 크기 제한을 적용하여 소스 파일을 읽습니다.
    async fn read_source(&self, file: &Path) -> Result<String, String> {
        let metadata = tokio::fs::metadata(file)
            .await
            .map_err(|e| format!("failed to stat file: {e}"))?;

        let size = usize::try_from(metadata.len()).unwrap_or(usize::MAX);
        if size > self.config.max_file_size {
            return Err(format!(
                "file too large: {size} bytes (max: {})",
                self.config.max_file_size
            ));
        }

        tokio::fs::read_to_string(file)
            .await
            .map_err(|e| format!("failed to read file: {e}"))
    }
}

/// LLM 리포트 텍스트를 JSON으로 파싱을 시도합니다.
///
/// 파싱되면 구조화된 값으로, 아니면 문자열 값으로 보관합니다.
/// 내용 검증은 하지 않습니다 — 다운스트림 소비자가 해석합니다.
fn parse_report_text(text: String) -> serde_json::Value {
    match serde_json::from_str(&text) {
        Ok(value) => value,
        Err(_) => serde_json::Value::String(text),
    }
}

/// [`RunCoordinator`] 빌더
///
/// 설정, 분석기, LLM 백엔드, 자격 증명을 조립하고 빌드 시 검증합니다.
pub struct RunCoordinatorBuilder {
    config: Option<EngineConfig>,
    analyzer: Option<Box<dyn StaticAnalyzer>>,
    provider: Option<Box<dyn Provider>>,
    credentials: Option<Credentials>,
}

impl RunCoordinatorBuilder {
    /// 빈 빌더를 생성합니다.
    pub fn new() -> Self {
        Self {
            config: None,
            analyzer: None,
            provider: None,
            credentials: None,
        }
    }

    /// 엔진 설정을 지정합니다.
    pub fn config(mut self, config: EngineConfig) -> Self {
        self.config = Some(config);
        self
    }

    /// 정적 분석기를 지정합니다.
    pub fn analyzer(mut self, analyzer: Box<dyn StaticAnalyzer>) -> Self {
        self.analyzer = Some(analyzer);
        self
    }

    /// LLM 백엔드를 지정합니다.
    pub fn provider(mut self, provider: Box<dyn Provider>) -> Self {
        self.provider = Some(provider);
        self
    }

    /// API 자격 증명을 지정합니다.
    pub fn credentials(mut self, credentials: Credentials) -> Self {
        self.credentials = Some(credentials);
        self
    }

    /// 조정자를 빌드합니다.
    ///
    /// # Errors
    ///
    /// 구성 요소 누락, 설정 검증 실패, 빈 자격 증명 시
    /// `EngineError::Config`를 반환합니다.
    pub fn build(self) -> Result<RunCoordinator, EngineError> {
        let config = self.config.ok_or_else(|| missing("config"))?;
        config.validate()?;

        let analyzer = self.analyzer.ok_or_else(|| missing("analyzer"))?;
        let provider = self.provider.ok_or_else(|| missing("provider"))?;
        let credentials = self.credentials.ok_or_else(|| missing("credentials"))?;

        if credentials.is_empty() {
            return Err(codemend_core::error::ConfigError::InvalidValue {
                field: "credentials".to_owned(),
                reason: "api key must not be empty".to_owned(),
            }
            .into());
        }

        Ok(RunCoordinator {
            config,
            analyzer,
            provider,
            credentials,
        })
    }
}

impl Default for RunCoordinatorBuilder {
    fn default() -> Self {
        Self::new()
    }
}

fn missing(field: &str) -> EngineError {
    codemend_core::error::ConfigError::InvalidValue {
        field: field.to_owned(),
        reason: "required component not provided".to_owned(),
    }
    .into()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_report_text_keeps_json_structure() {
        let value = parse_report_text(r#"{"file":"a.py","issues":[]}"#.to_owned());
        assert_eq!(value["file"], "a.py");
        assert!(value["issues"].as_array().unwrap().is_empty());
    }

    #[test]
    fn parse_report_text_falls_back_to_string() {
        let value = parse_report_text("The file looks clean.".to_owned());
        assert_eq!(value, serde_json::Value::String("The file looks clean.".to_owned()));
    }

    #[test]
    fn builder_without_components_fails() {
        let result = RunCoordinatorBuilder::new().build();
        assert!(matches!(result, Err(EngineError::Config(_))));
    }
}
