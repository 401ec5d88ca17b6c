//! Two-stage question pipeline: resolve free text to a catalog id, then
//! summarize that supply's aggregate stock level.

use std::sync::Arc;

use serde::Serialize;
use tracing::debug;

use super::llm::CompletionProvider;
use super::prompts::PromptEngine;
use crate::error::Result;
use crate::models::{StockLevel, Supply, SupplyCandidate};
use crate::repository::{InventoryRepository, SupplyRepository};

/// Terminal reply when the question matches nothing in the catalog.
pub const NO_MEDICATION_FOUND: &str = "No Medication Found";

/// Upper bound on the catalog slice offered to the resolution stage.
pub const CANDIDATE_LIMIT: i64 = 50;

/// Structured input for the summarization stage.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StockSummary {
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub strength: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub route: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub quantity_per_package: Option<i32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub side_effects: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
    /// Total units on hand across all lots referencing the supply.
    pub quantity: i64,
    /// Number of lots the quantity is spread across.
    pub lots: i64,
}

impl StockSummary {
    pub fn new(supply: &Supply, stock: &StockLevel) -> Self {
        Self {
            name: supply.name.clone(),
            strength: supply.strength.clone(),
            route: supply.route.clone(),
            quantity_per_package: supply.quantity_per_package,
            side_effects: supply.side_effects.clone(),
            location: supply.location.clone(),
            quantity: stock.quantity,
            lots: stock.lots,
        }
    }
}

/// Renders candidates one per line as `id: name`.
pub fn render_catalog(candidates: &[SupplyCandidate]) -> String {
    candidates
        .iter()
        .map(|c| format!("{}: {}", c.id, c.name))
        .collect::<Vec<_>>()
        .join("\n")
}

/// Parses the resolution-stage reply. The model's output is untrusted:
/// `0`, an unparsable reply, or surrounding quotes all degrade to `None`.
pub fn parse_supply_id(reply: &str) -> Option<i64> {
    let trimmed = reply.trim().trim_matches(|c| c == '"' || c == '\'' || c == '.');
    match trimmed.parse::<i64>() {
        Ok(0) => None,
        Ok(id) if id > 0 => Some(id),
        _ => None,
    }
}

/// The question-answering pipeline. Constructed once at startup and shared
/// through application state; holds no session or identity data.
pub struct Assistant {
    llm: Arc<dyn CompletionProvider>,
    prompts: PromptEngine,
}

impl Assistant {
    pub fn new(llm: Arc<dyn CompletionProvider>) -> Result<Self> {
        Ok(Self {
            llm,
            prompts: PromptEngine::new()?,
        })
    }

    /// Stage one: offer the candidate catalog and ask the model for an id.
    /// Returns `None` when the model answers `0` or with an id that is not
    /// in the candidate set.
    pub async fn resolve(
        &self,
        candidates: &[SupplyCandidate],
        question: &str,
    ) -> Result<Option<i64>> {
        let catalog = render_catalog(candidates);
        let prompt = self.prompts.render_resolution(question, &catalog)?;
        let reply = self.llm.complete(&prompt).await?;

        debug!(reply = %reply.trim(), "Resolution stage reply");

        Ok(parse_supply_id(&reply).filter(|id| candidates.iter().any(|c| c.id == *id)))
    }

    /// Stage two: render the stock summary as JSON context and ask the model
    /// for a plain-language answer.
    pub async fn summarize(&self, summary: &StockSummary, question: &str) -> Result<String> {
        let context = serde_json::to_string(summary)?;
        let prompt = self.prompts.render_summary(question, &context)?;
        self.llm.complete(&prompt).await
    }

    /// Answers a free-text question about stock. Resolution failure is a
    /// terminal "No Medication Found"; the summarization stage is never
    /// reached in that case.
    #[tracing::instrument(skip(self, supplies, lots))]
    pub async fn answer(
        &self,
        supplies: &SupplyRepository,
        lots: &InventoryRepository,
        question: &str,
    ) -> Result<String> {
        let candidates = supplies.candidates(CANDIDATE_LIMIT).await?;

        let Some(id) = self.resolve(&candidates, question).await? else {
            return Ok(NO_MEDICATION_FOUND.to_string());
        };

        // The supply can disappear between the two fetches; treat that the
        // same as an unresolved name rather than a server fault.
        let Some(supply) = supplies.find_by_ids(&[id]).await?.into_iter().next() else {
            return Ok(NO_MEDICATION_FOUND.to_string());
        };

        let stock = lots.stock_level(id).await?;
        let summary = StockSummary::new(&supply, &stock);

        self.summarize(&summary, question).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;

    use async_trait::async_trait;
    use chrono::Utc;

    use crate::error::ServiceError;

    /// Scripted provider: pops replies in order and records every prompt.
    struct ScriptedLlm {
        replies: Mutex<Vec<String>>,
        prompts: Mutex<Vec<String>>,
    }

    impl ScriptedLlm {
        fn new(replies: &[&str]) -> Arc<Self> {
            Arc::new(Self {
                replies: Mutex::new(replies.iter().rev().map(|r| r.to_string()).collect()),
                prompts: Mutex::new(Vec::new()),
            })
        }

        fn prompts(&self) -> Vec<String> {
            self.prompts.lock().unwrap().clone()
        }
    }

    #[async_trait]
    impl CompletionProvider for ScriptedLlm {
        async fn complete(&self, prompt: &str) -> Result<String> {
            self.prompts.lock().unwrap().push(prompt.to_string());
            self.replies
                .lock()
                .unwrap()
                .pop()
                .ok_or_else(|| ServiceError::llm("no scripted reply left"))
        }
    }

    fn candidates() -> Vec<SupplyCandidate> {
        vec![
            SupplyCandidate {
                id: 1,
                name: "Ibuprofen (Advil)".to_string(),
            },
            SupplyCandidate {
                id: 2,
                name: "Diphenhydramine (Benadryl)".to_string(),
            },
        ]
    }

    fn benadryl() -> Supply {
        Supply {
            id: 2,
            supply_type: "medication".to_string(),
            name: "Diphenhydramine (Benadryl)".to_string(),
            strength: Some("25 mg".to_string()),
            route: Some("oral".to_string()),
            quantity_per_package: Some(30),
            side_effects: None,
            location: None,
            is_deleted: false,
            created_at: Utc::now(),
        }
    }

    #[test]
    fn test_parse_supply_id() {
        assert_eq!(parse_supply_id("2"), Some(2));
        assert_eq!(parse_supply_id(" 2 \n"), Some(2));
        assert_eq!(parse_supply_id("\"2\""), Some(2));
        assert_eq!(parse_supply_id("0"), None);
        assert_eq!(parse_supply_id("-3"), None);
        assert_eq!(parse_supply_id("the answer is 2"), None);
        assert_eq!(parse_supply_id(""), None);
    }

    #[test]
    fn test_render_catalog() {
        let rendered = render_catalog(&candidates());
        assert_eq!(
            rendered,
            "1: Ibuprofen (Advil)\n2: Diphenhydramine (Benadryl)"
        );
    }

    #[test]
    fn test_render_catalog_empty() {
        assert_eq!(render_catalog(&[]), "");
    }

    #[tokio::test]
    async fn test_resolve_matches_candidate() {
        let llm = ScriptedLlm::new(&["2"]);
        let assistant = Assistant::new(llm.clone()).unwrap();

        let id = assistant
            .resolve(&candidates(), "How much Benadril do we have in stock?")
            .await
            .unwrap();

        assert_eq!(id, Some(2));
        let prompts = llm.prompts();
        assert_eq!(prompts.len(), 1);
        assert!(prompts[0].contains("2: Diphenhydramine (Benadryl)"));
        assert!(prompts[0].contains("How much Benadril do we have in stock?"));
    }

    #[tokio::test]
    async fn test_resolve_zero_is_none() {
        let llm = ScriptedLlm::new(&["0"]);
        let assistant = Assistant::new(llm).unwrap();

        let id = assistant
            .resolve(&candidates(), "Do we carry plutonium?")
            .await
            .unwrap();

        assert_eq!(id, None);
    }

    #[tokio::test]
    async fn test_resolve_unknown_id_is_none() {
        // The model hallucinated an id outside the candidate set.
        let llm = ScriptedLlm::new(&["99"]);
        let assistant = Assistant::new(llm).unwrap();

        let id = assistant.resolve(&candidates(), "anything").await.unwrap();

        assert_eq!(id, None);
    }

    #[tokio::test]
    async fn test_summarize_passes_aggregate_as_context() {
        let llm = ScriptedLlm::new(&["You have 69 units across 2 lots."]);
        let assistant = Assistant::new(llm.clone()).unwrap();

        let summary = StockSummary::new(
            &benadryl(),
            &StockLevel {
                quantity: 69,
                lots: 2,
            },
        );

        let answer = assistant
            .summarize(&summary, "How much Benadril do we have in stock?")
            .await
            .unwrap();

        assert_eq!(answer, "You have 69 units across 2 lots.");

        let prompts = llm.prompts();
        assert_eq!(prompts.len(), 1);
        assert!(prompts[0].contains("\"quantity\":69"));
        assert!(prompts[0].contains("\"lots\":2"));
        assert!(prompts[0].contains("Diphenhydramine (Benadryl)"));
    }

    #[test]
    fn test_stock_summary_fields() {
        let summary = StockSummary::new(
            &benadryl(),
            &StockLevel {
                quantity: 69,
                lots: 2,
            },
        );

        assert_eq!(summary.name, "Diphenhydramine (Benadryl)");
        assert_eq!(summary.quantity, 69);
        assert_eq!(summary.lots, 2);

        let json = serde_json::to_value(&summary).unwrap();
        assert_eq!(json["quantity"], 69);
        assert_eq!(json["lots"], 2);
        assert!(json.get("side_effects").is_none());
    }

    #[tokio::test]
    async fn test_llm_failure_propagates() {
        let llm = ScriptedLlm::new(&[]);
        let assistant = Assistant::new(llm).unwrap();

        let err = assistant
            .resolve(&candidates(), "anything")
            .await
            .unwrap_err();

        assert!(matches!(err, ServiceError::Llm(_)));
    }
}
