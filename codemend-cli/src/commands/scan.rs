//! `codemend scan` command handler
//!
//! Analysis-only mode: discovers files and runs the static analyzer, but
//! makes no LLM calls and writes nothing. Exits with code 4 when findings
//! at or above the severity threshold exist, so CI jobs can gate on it.

use std::io::Write;
use std::path::Path;

use serde::Serialize;
use tracing::{info, warn};

use codemend_core::config::CodemendConfig;
use codemend_core::error::CodemendError;
use codemend_core::types::Severity;
use codemend_scanner::analyzer::StaticAnalyzer;
use codemend_scanner::{BanditAnalyzer, ScannerConfig, discover};

use crate::cli::ScanArgs;
use crate::error::CliError;
use crate::output::{OutputWriter, Render};

/// Execute the `scan` command.
pub async fn execute(
    args: ScanArgs,
    config_path: &Path,
    writer: &OutputWriter,
) -> Result<(), CliError> {
    let config = CodemendConfig::load(config_path).await?;
    let min_severity = parse_severity(&args.min_severity)?;

    let scanner_config = ScannerConfig::from_core(&config.scan);
    let analyzer = BanditAnalyzer::new(&scanner_config);

    info!(path = %args.path.display(), "starting analysis-only scan");

    let files = {
        let root = args.path.clone();
        let extensions = scanner_config.extensions.clone();
        let exclude_paths = scanner_config.exclude_paths.clone();
        tokio::task::spawn_blocking(move || discover(&root, &extensions, &exclude_paths))
            .await
            .map_err(|e| CliError::Command(format!("spawn_blocking failed: {e}")))?
            .map_err(CodemendError::from)?
    };

    let mut findings = Vec::new();
    let mut scan_failures = 0;

    for file in &files {
        match analyzer.analyze(file).await {
            Ok(file_findings) => {
                for finding in file_findings {
                    if finding.severity < min_severity {
                        continue;
                    }
                    findings.push(FindingEntry {
                        id: finding.id,
                        severity: finding.severity.to_string(),
                        confidence: finding.confidence.to_string(),
                        file: finding.file,
                        line: finding.line,
                        cwe: finding.cwe,
                        description: finding.description,
                    });
                }
            }
            Err(e) => {
                warn!(file = %file.display(), error = %e, "analysis failed");
                scan_failures += 1;
            }
        }
    }

    let report = ScanCommandReport {
        path: args.path.display().to_string(),
        files_scanned: files.len(),
        scan_failures,
        total: findings.len(),
        findings,
    };

    writer.render(&report)?;

    // Non-zero exit for CI gating (exit code 4)
    if report.total > 0 {
        return Err(CliError::Scan(format!("found {} findings", report.total)));
    }

    Ok(())
}

fn parse_severity(s: &str) -> Result<Severity, CliError> {
    Severity::from_str_loose(s).ok_or_else(|| {
        CliError::Command(format!(
            "invalid severity: {s} (expected: info, low, medium, high, critical)"
        ))
    })
}

#[derive(Serialize)]
pub struct ScanCommandReport {
    pub path: String,
    pub files_scanned: usize,
    pub scan_failures: usize,
    pub total: usize,
    pub findings: Vec<FindingEntry>,
}

#[derive(Serialize)]
pub struct FindingEntry {
    pub id: String,
    pub severity: String,
    pub confidence: String,
    pub file: String,
    pub line: u32,
    pub cwe: Option<u32>,
    pub description: String,
}

impl Render for ScanCommandReport {
    fn render_text(&self, w: &mut dyn Write) -> std::io::Result<()> {
        use colored::Colorize;

        writeln!(w, "Scan: {}", self.path.bold())?;
        writeln!(w, "Files scanned: {}", self.files_scanned)?;
        if self.scan_failures > 0 {
            writeln!(
                w,
                "Scan failures: {}",
                self.scan_failures.to_string().red()
            )?;
        }
        writeln!(w)?;

        if self.findings.is_empty() {
            writeln!(w, "{}", "No findings.".green())?;
            return Ok(());
        }

        writeln!(
            w,
            "{:<8} {:<10} {:<10} {:<30} {:<6} Description",
            "ID", "Severity", "Confid.", "File", "Line"
        )?;
        writeln!(w, "{}", "-".repeat(100))?;

        for f in &self.findings {
            let severity_colored = match f.severity.as_str() {
                "Critical" => f.severity.red().bold(),
                "High" => f.severity.red(),
                "Medium" => f.severity.yellow(),
                "Low" => f.severity.normal(),
                "Info" => f.severity.dimmed(),
                _ => f.severity.normal(),
            };

            writeln!(
                w,
                "{:<8} {:<10} {:<10} {:<30} {:<6} {}",
                f.id, severity_colored, f.confidence, f.file, f.line, f.description
            )?;
        }

        writeln!(w)?;
        writeln!(w, "Total: {}", self.total.to_string().red().bold())?;

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_severity_accepts_known_levels() {
        assert_eq!(parse_severity("low").unwrap(), Severity::Low);
        assert_eq!(parse_severity("HIGH").unwrap(), Severity::High);
        assert_eq!(parse_severity("critical").unwrap(), Severity::Critical);
    }

    #[test]
    fn parse_severity_rejects_unknown_level() {
        assert!(parse_severity("severe").is_err());
    }

    #[test]
    fn scan_report_renders_no_findings() {
        let report = ScanCommandReport {
            path: "/project".to_owned(),
            files_scanned: 3,
            scan_failures: 0,
            total: 0,
            findings: vec![],
        };

        let mut buffer = Vec::new();
        report.render_text(&mut buffer).unwrap();
        let output = String::from_utf8(buffer).unwrap();
        assert!(output.contains("No findings."));
    }

    #[test]
    fn scan_report_renders_findings_table() {
        let report = ScanCommandReport {
            path: "/project".to_owned(),
            files_scanned: 1,
            scan_failures: 0,
            total: 1,
            findings: vec![FindingEntry {
                id: "B307".to_owned(),
                severity: "Medium".to_owned(),
                confidence: "High".to_owned(),
                file: "b.py".to_owned(),
                line: 3,
                cwe: Some(78),
                description: "Use of possibly insecure function eval.".to_owned(),
            }],
        };

        let mut buffer = Vec::new();
        report.render_text(&mut buffer).unwrap();
        let output = String::from_utf8(buffer).unwrap();
        assert!(output.contains("B307"));
        assert!(output.contains("b.py"));
        assert!(output.contains("Total: 1"));
    }

    #[test]
    fn scan_report_json_shape() {
        let report = ScanCommandReport {
            path: "/project".to_owned(),
            files_scanned: 2,
            scan_failures: 1,
            total: 0,
            findings: vec![],
        };

        let json = serde_json::to_value(&report).unwrap();
        assert_eq!(json["files_scanned"], 2);
        assert_eq!(json["scan_failures"], 1);
        assert!(json["findings"].as_array().unwrap().is_empty());
    }
}
