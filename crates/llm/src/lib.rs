#![doc = include_str!("../README.md")]
//!
//! # Module Structure
//!
//! - [`error`]: Uniform backend error (`ProviderError`)
//! - [`prompt`]: Prompt templates (`Prompt`, `build_report_prompt`, `build_remediation_prompt`)
//! - [`provider`]: Backend interface (`Provider` trait, `Credentials`, `GenerationParams`)
//! - [`providers`]: Backend implementations (`GroqProvider`, `GeminiProvider`)
//! - [`sse`]: SSE line decoder for the streaming transport

pub mod error;
pub mod prompt;
pub mod provider;
pub mod providers;
pub mod sse;

// --- Public API Re-exports ---

// Error
pub use error::ProviderError;

// Prompt
pub use prompt::{Prompt, PromptKind, build_remediation_prompt, build_report_prompt};

// Provider interface
pub use provider::{Credentials, GenerationParams, Provider};

// Backends
pub use providers::gemini::{DEFAULT_GEMINI_MODEL, GeminiProvider};
pub use providers::groq::{DEFAULT_GROQ_MODEL, GroqProvider};
