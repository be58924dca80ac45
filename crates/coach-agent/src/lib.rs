//! `coach-agent`: client for the generative-language plan generator.
//!
//! # Architecture
//!
//! ```text
//! GenerationRequest (coach-core)
//!     │  serialised to JSON, sent as the single user turn
//!     ▼
//! GeminiClient    ← POST {base}/v1beta/models/{model}:generateContent
//!     │              system prompt + responseMimeType=application/json
//!     ▼
//! GenerateContentResponse
//!     │              first candidate, first text part
//!     ▼
//! Plan (coach-core)
//! ```
//!
//! Failures are reported once and never retried: a missing credential, a
//! non-success status, an empty candidate list, or text that is not a plan.
//!
//! # Quick start
//!
//! ```rust,ignore
//! use coach_agent::{GeminiClient, PlanGenerator};
//!
//! let client = GeminiClient::new(key, &config.generator)?;
//! let plan = client.generate(&request).await?;
//! ```

pub mod client;
pub mod error;
pub mod prompt;
pub mod types;


pub use client::{GeminiClient, PlanGenerator};
pub use error::AgentError;

/// Convenience `Result` alias for this crate.
pub type Result<T> = std::result::Result<T, AgentError>;
