//! Natural-language stock assistant: prompt templates, LLM client, and the
//! two-stage resolve-then-summarize pipeline.

pub mod llm;
pub mod pipeline;
pub mod prompts;

pub use llm::{CompletionProvider, OllamaClient};
pub use pipeline::{Assistant, StockSummary, CANDIDATE_LIMIT, NO_MEDICATION_FOUND};
pub use prompts::PromptEngine;
