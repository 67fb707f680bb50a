//! LinkedIn profile and outreach family.

use std::sync::Arc;

use anyhow::Result;
use async_trait::async_trait;

use crate::llm::DeepSeekClient;

use super::input::GenerationInput;
use super::prompt::compose_user_prompt;
use super::trait_def::{ContentBuilder, ProgressFn};

/// Builds LinkedIn profile sections and outreach copy.
pub struct LinkedInBuilder {
    client: Arc<DeepSeekClient>,
}

impl LinkedInBuilder {
    pub fn new(client: Arc<DeepSeekClient>) -> Self {
        Self { client }
    }

    fn task_statement(kind: &str) -> &'static str {
        match kind {
            "profile_headline" => {
                "Write 5 LinkedIn profile headline options, each under 220 \
                 characters, each leading with the outcome delivered."
            }
            "experience_entry" => {
                "Write a LinkedIn experience entry: role summary plus 4 \
                 achievement bullets with concrete results."
            }
            "outreach_message" => {
                "Write a LinkedIn connection request note (under 300 chars) and \
                 a follow-up message that opens a conversation, not a pitch."
            }
            "company_page" => {
                "Write a LinkedIn company page About section: what the company \
                 does, for whom, and why it is credible."
            }
            _ => {
                "Write a LinkedIn profile About/summary section in first person: \
                 hook, credibility, who you help, and how to reach you."
            }
        }
    }
}

#[async_trait]
impl ContentBuilder for LinkedInBuilder {
    fn name(&self) -> &str {
        "linkedin"
    }

    async fn build(
        &self,
        input: &GenerationInput,
        progress: Option<&ProgressFn>,
    ) -> Result<String> {
        let kind = input.param(0).unwrap_or("profile_summary");
        let system = "You write LinkedIn copy that sounds like a competent human, \
                      not a brand account. Specific over superlative; no \
                      buzzwords, no emoji walls.";
        let user = compose_user_prompt(Self::task_statement(kind), input);
        let text = self.client.stream(system, &user, progress).await?;
        Ok(text)
    }
}
