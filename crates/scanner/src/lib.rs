#![doc = include_str!("../README.md")]
//!
//! # Module Structure
//!
//! - [`error`]: Domain error types (`AnalysisFailure`)
//! - [`config`]: Scanner configuration (`ScannerConfig`, builder)
//! - [`discover`]: File discovery (extension allow-list, directory-level exclusion pruning)
//! - [`analyzer`]: Static analysis adapter (`StaticAnalyzer` trait, `BanditAnalyzer`)

pub mod analyzer;
pub mod config;
pub mod discover;
pub mod error;

// --- Public API Re-exports ---

// Discovery
pub use discover::discover;

// Analyzer
pub use analyzer::{BanditAnalyzer, StaticAnalyzer, parse_bandit_output};

// Configuration
pub use config::{ScannerConfig, ScannerConfigBuilder};

// Error
pub use error::AnalysisFailure;
