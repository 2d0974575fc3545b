//! `codemend run` command handler
//!
//! Runs the full scan-and-remediate pipeline and renders a run summary.
//! Per-file failures are reflected in the aggregate report, not the exit
//! code -- a run that processed every file exits 0 even if individual
//! files failed. Only pipeline-setup errors (bad root, bad config,
//! missing credentials) fail the command.

use std::io::Write;
use std::path::Path;
use std::time::Duration;

use serde::Serialize;
use tracing::info;

use codemend_core::config::{CodemendConfig, LlmConfig};
use codemend_core::types::{FileOutcome, RunReport};
use codemend_engine::{EngineConfig, RunCoordinatorBuilder};
use codemend_llm::provider::{Credentials, GenerationParams, Provider};
use codemend_llm::{GeminiProvider, GroqProvider};
use codemend_scanner::{BanditAnalyzer, ScannerConfig};

use crate::cli::RunArgs;
use crate::error::CliError;
use crate::output::{OutputWriter, Render};

/// Environment variable holding the Groq API key.
const GROQ_API_KEY_VAR: &str = "GROQ_API_KEY";

/// Environment variable holding the Gemini API key.
const GEMINI_API_KEY_VAR: &str = "GEMINI_API_KEY";

/// Execute the `run` command.
pub async fn execute(
    args: RunArgs,
    config_path: &Path,
    writer: &OutputWriter,
) -> Result<(), CliError> {
    let mut config = CodemendConfig::load(config_path).await?;

    // CLI overrides take highest precedence
    if let Some(provider) = &args.provider {
        config.llm.provider = provider.clone();
    }
    if let Some(model) = &args.model {
        config.llm.model = model.clone();
    }
    config.validate()?;

    // Credentials are resolved here, once, and passed explicitly into the
    // engine. Leaf components never read the environment.
    let credentials = resolve_credentials(&config.llm.provider)?;
    let provider = build_provider(&config.llm)?;

    let mut engine_config = EngineConfig::from_core(&config, &args.path);
    if let Some(report_out) = &args.report_out {
        engine_config.report_output = report_out.clone();
    }
    let report_path = engine_config.report_output.clone();

    let scanner_config = ScannerConfig::from_core(&config.scan);
    let analyzer = BanditAnalyzer::new(&scanner_config);

    info!(
        path = %args.path.display(),
        provider = %config.llm.provider,
        "starting scan-and-remediate run"
    );

    let coordinator = RunCoordinatorBuilder::new()
        .config(engine_config)
        .analyzer(Box::new(analyzer))
        .provider(provider)
        .credentials(credentials)
        .build()?;

    let report = coordinator.run().await?;

    let summary = build_run_summary(&report, &report_path);
    writer.render(&summary)?;

    Ok(())
}

/// Resolve the API key for the configured backend from the environment.
fn resolve_credentials(provider: &str) -> Result<Credentials, CliError> {
    let var = match provider {
        "groq" => GROQ_API_KEY_VAR,
        "gemini" => GEMINI_API_KEY_VAR,
        other => {
            return Err(CliError::Config(format!(
                "unknown provider: {other} (expected: groq, gemini)"
            )));
        }
    };

    match std::env::var(var) {
        Ok(key) if !key.is_empty() => Ok(Credentials::new(key)),
        _ => Err(CliError::MissingCredentials { var }),
    }
}

/// Construct the configured LLM backend behind the uniform interface.
fn build_provider(config: &LlmConfig) -> Result<Box<dyn Provider>, CliError> {
    let params = GenerationParams::from_core(config);
    let timeout = Duration::from_secs(config.request_timeout_secs);

    match config.provider.as_str() {
        "groq" => {
            let provider = GroqProvider::new(config.model.clone(), params, timeout)
                .map_err(|e| CliError::Command(e.to_string()))?;
            Ok(Box::new(provider))
        }
        "gemini" => {
            let provider = GeminiProvider::new(config.model.clone(), params, timeout)
                .map_err(|e| CliError::Command(e.to_string()))?;
            Ok(Box::new(provider))
        }
        other => Err(CliError::Config(format!(
            "unknown provider: {other} (expected: groq, gemini)"
        ))),
    }
}

fn build_run_summary(report: &RunReport, report_path: &Path) -> RunSummary {
    RunSummary {
        files: report.len(),
        succeeded: report.count(FileOutcome::Succeeded),
        scan_failed: report.count(FileOutcome::ScanFailed),
        llm_failed: report.count(FileOutcome::LlmFailed),
        write_failed: report.count(FileOutcome::WriteFailed),
        skipped: report.count(FileOutcome::Skipped),
        remediated: report
            .results()
            .iter()
            .filter(|r| r.remediated_path.is_some())
            .count(),
        report_path: report_path.display().to_string(),
    }
}

/// Run summary rendered after a pipeline run.
#[derive(Serialize)]
pub struct RunSummary {
    pub files: usize,
    pub succeeded: usize,
    pub scan_failed: usize,
    pub llm_failed: usize,
    pub write_failed: usize,
    pub skipped: usize,
    pub remediated: usize,
    pub report_path: String,
}

impl Render for RunSummary {
    fn render_text(&self, w: &mut dyn Write) -> std::io::Result<()> {
        use colored::Colorize;

        writeln!(w, "Run summary")?;
        writeln!(w, "  Files processed: {}", self.files)?;

        let succeeded = format!("{}", self.succeeded);
        if self.succeeded == self.files {
            writeln!(w, "  Succeeded: {}", succeeded.green().bold())?;
        } else {
            writeln!(w, "  Succeeded: {}", succeeded.yellow().bold())?;
        }

        if self.scan_failed > 0 {
            writeln!(w, "  Scan failed: {}", self.scan_failed.to_string().red())?;
        }
        if self.llm_failed > 0 {
            writeln!(w, "  LLM failed: {}", self.llm_failed.to_string().red())?;
        }
        if self.write_failed > 0 {
            writeln!(w, "  Write failed: {}", self.write_failed.to_string().red())?;
        }
        if self.skipped > 0 {
            writeln!(w, "  Skipped: {}", self.skipped.to_string().dimmed())?;
        }

        writeln!(w, "  Remediated copies: {}", self.remediated)?;
        writeln!(w, "  Report: {}", self.report_path.bold())?;

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use codemend_core::types::FileRunResult;

    fn result(outcome: FileOutcome, remediated: bool) -> FileRunResult {
        FileRunResult {
            file: "x.py".to_owned(),
            report: None,
            remediated_path: remediated.then(|| "new/new_x.py".to_owned()),
            outcome,
        }
    }

    #[test]
    fn run_summary_counts_outcomes() {
        let mut report = RunReport::new();
        report.push(result(FileOutcome::Succeeded, true));
        report.push(result(FileOutcome::Succeeded, false));
        report.push(result(FileOutcome::ScanFailed, false));
        report.push(result(FileOutcome::LlmFailed, true));
        report.push(result(FileOutcome::Skipped, false));

        let summary = build_run_summary(&report, Path::new("report.json"));
        assert_eq!(summary.files, 5);
        assert_eq!(summary.succeeded, 2);
        assert_eq!(summary.scan_failed, 1);
        assert_eq!(summary.llm_failed, 1);
        assert_eq!(summary.write_failed, 0);
        assert_eq!(summary.skipped, 1);
        assert_eq!(summary.remediated, 2);
    }

    #[test]
    fn run_summary_renders_text() {
        let mut report = RunReport::new();
        report.push(result(FileOutcome::Succeeded, true));
        let summary = build_run_summary(&report, Path::new("out/report.json"));

        let mut buffer = Vec::new();
        summary.render_text(&mut buffer).unwrap();
        let output = String::from_utf8(buffer).unwrap();
        assert!(output.contains("Files processed: 1"));
        assert!(output.contains("out/report.json"));
    }

    #[test]
    fn unknown_provider_is_a_config_error() {
        let result = resolve_credentials("openai");
        assert!(matches!(result, Err(CliError::Config(_))));
    }

    #[test]
    fn build_provider_rejects_unknown_backend() {
        let config = LlmConfig {
            provider: "openai".to_owned(),
            ..Default::default()
        };
        assert!(matches!(
            build_provider(&config),
            Err(CliError::Config(_))
        ));
    }

    #[test]
    fn build_provider_constructs_known_backends() {
        for backend in ["groq", "gemini"] {
            let config = LlmConfig {
                provider: backend.to_owned(),
                ..Default::default()
            };
            let provider = build_provider(&config).unwrap();
            assert_eq!(provider.name(), backend);
        }
    }
}
