#![doc = include_str!("../README.md")]
//!
//! # Module Structure
//!
//! - [`error`]: Domain error types (`EngineError`, `WriteError`)
//! - [`config`]: Engine configuration (`EngineConfig`)
//! - [`writer`]: Remediation writer (`write_remediation`, `remediation_path`)
//! - [`report`]: Atomic run-report persistence (`persist_report`)
//! - [`coordinator`]: Main orchestrator (`RunCoordinator`, `RunCoordinatorBuilder`)
//!
//! # Architecture
//!
//! ```text
//! root --> discover --> [per file, sequentially]
//!                          |
//!                    StaticAnalyzer --> Vec<ScanFinding>
//!                          |
//!                 build_report_prompt --> Provider --> report
//!                          |
//!              build_remediation_prompt --> Provider --> writer --> new/new_<file>
//!                          |
//!                     FileRunResult --> RunReport --> persist once
//! ```

pub mod config;
pub mod coordinator;
pub mod error;
pub mod report;
pub mod writer;

// --- Public API Re-exports ---

// Coordinator (main orchestrator)
pub use coordinator::{RunCoordinator, RunCoordinatorBuilder};

// Configuration
pub use config::EngineConfig;

// Error
pub use error::{EngineError, WriteError};

// Writer
pub use writer::{remediation_path, write_remediation};

// Report persistence
pub use report::persist_report;
