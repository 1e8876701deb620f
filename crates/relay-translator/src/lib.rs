//! LLM-backed recipe translation.
//!
//! [`TranslatorClient`] sends one chat-completion request per target
//! language and parses the labelled reply into a [`TranslationResult`].
//! [`estimate_cost`] gives a rough price for a planned batch.

pub mod client;
pub mod cost;
pub mod error;
pub(crate) mod parse;
pub(crate) mod prompt;
pub mod types;

pub use client::{TranslatorClient, TranslatorConfig};
pub use cost::{estimate_cost, CostEstimate};
pub use error::TranslatorError;
pub use types::{ResponseField, TranslationResult};
