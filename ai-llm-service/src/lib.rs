//! Ollama plumbing shared by the recipe finder.
//!
//! - [`service_profiles::LlmServiceProfiles`]: generation + embedding profiles
//! - [`services`]: HTTP and CLI transports
//! - [`health_service`]: `/api/tags` probe
//! - [`telemetry`]: tracing subscriber helpers

pub mod capabilities;
pub mod config;
pub mod error_handler;
pub mod health_service;
pub mod service_profiles;
pub mod services;
pub mod telemetry;

pub use capabilities::{TextEmbedder, TextGenerator};
pub use error_handler::{AiLlmError, Result};
