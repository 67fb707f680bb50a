//! Branding family.

use std::sync::Arc;

use anyhow::Result;
use async_trait::async_trait;

use crate::llm::DeepSeekClient;

use super::input::GenerationInput;
use super::prompt::compose_user_prompt;
use super::trait_def::{ContentBuilder, ProgressFn};

/// Builds brand narrative assets.
pub struct BrandingBuilder {
    client: Arc<DeepSeekClient>,
}

impl BrandingBuilder {
    pub fn new(client: Arc<DeepSeekClient>) -> Self {
        Self { client }
    }

    fn task_statement(kind: &str) -> &'static str {
        match kind {
            "taglines" => {
                "Write 10 tagline options: a mix of literal, benefit-led, and \
                 evocative. Mark the three strongest and say why in one line."
            }
            "mission" => {
                "Write a mission statement (one sentence) and a vision statement \
                 (one sentence), plus a short paragraph expanding each."
            }
            "value_props" => {
                "Write the brand's three core value propositions, each as a \
                 headline plus a two-sentence proof-backed explanation."
            }
            _ => {
                "Write the brand story: origin, the problem that would not go \
                 away, the turn, and what the brand stands for now."
            }
        }
    }
}

#[async_trait]
impl ContentBuilder for BrandingBuilder {
    fn name(&self) -> &str {
        "branding"
    }

    async fn build(
        &self,
        input: &GenerationInput,
        progress: Option<&ProgressFn>,
    ) -> Result<String> {
        let kind = input.param(0).unwrap_or("brand_story");
        let system = "You are a brand strategist. Positioning before polish: \
                      everything you write must be differentiating, not merely \
                      pleasant.";
        let user = compose_user_prompt(Self::task_statement(kind), input);
        let text = self.client.stream(system, &user, progress).await?;
        Ok(text)
    }
}
