//! Prompt templates for the two pipeline stages.

use handlebars::Handlebars;
use serde_json::json;

use crate::error::{Result, ServiceError};

const RESOLVE_SUPPLY: &str = "\
You are an inventory assistant for a medical supply room. Below is the \
catalog of known medications, one per line as `id: name`.\n\n\
Catalog:\n{{context}}\n\n\
Question: {{input}}\n\n\
Reply with only the numeric id of the medication the question refers to. \
Account for misspellings, brand names, and generic names. If no catalog \
entry matches, reply with exactly 0.";

const SUMMARIZE_STOCK: &str = "\
You are an inventory assistant for a medical supply room. Below is \
structured stock data for one medication as JSON. `quantity` is the total \
units on hand and `lots` is the number of stock lots it is spread across.\n\n\
Stock data:\n{{context}}\n\n\
Question: {{input}}\n\n\
Answer the question in one or two sentences of plain language, using only \
the stock data above.";

/// Renders the stage prompts with `{{input}}`/`{{context}}` substitution.
pub struct PromptEngine {
    handlebars: Handlebars<'static>,
}

impl PromptEngine {
    pub fn new() -> Result<Self> {
        let mut handlebars = Handlebars::new();
        handlebars.set_strict_mode(false);
        handlebars.register_escape_fn(handlebars::no_escape);

        handlebars
            .register_template_string("resolve_supply", RESOLVE_SUPPLY)
            .map_err(|e| ServiceError::Template(e.to_string()))?;
        handlebars
            .register_template_string("summarize_stock", SUMMARIZE_STOCK)
            .map_err(|e| ServiceError::Template(e.to_string()))?;

        Ok(Self { handlebars })
    }

    /// Stage-one prompt: free text plus the rendered candidate catalog.
    pub fn render_resolution(&self, question: &str, catalog: &str) -> Result<String> {
        let rendered = self.handlebars.render(
            "resolve_supply",
            &json!({ "input": question, "context": catalog }),
        )?;
        Ok(rendered)
    }

    /// Stage-two prompt: free text plus the stock summary JSON.
    pub fn render_summary(&self, question: &str, summary_json: &str) -> Result<String> {
        let rendered = self.handlebars.render(
            "summarize_stock",
            &json!({ "input": question, "context": summary_json }),
        )?;
        Ok(rendered)
    }
}
