//! Press and PR family.

use std::sync::Arc;

use anyhow::Result;
use async_trait::async_trait;

use crate::llm::DeepSeekClient;

use super::input::GenerationInput;
use super::prompt::compose_user_prompt;
use super::trait_def::{ContentBuilder, ProgressFn};

/// Builds press releases and media outreach copy.
pub struct PressReleaseBuilder {
    client: Arc<DeepSeekClient>,
}

impl PressReleaseBuilder {
    pub fn new(client: Arc<DeepSeekClient>) -> Self {
        Self { client }
    }

    fn task_statement(kind: &str) -> &'static str {
        match kind {
            "media_pitch" => {
                "Write a journalist pitch email: a subject line that states the \
                 story, why it matters now, and what you can offer (data, \
                 interview, exclusive). Under 150 words."
            }
            "boilerplate" => {
                "Write a company boilerplate paragraph for the bottom of press \
                 releases: what the company does, scale proof, and a URL line."
            }
            _ => {
                "Write a press release in AP style: headline, dateline, lead \
                 paragraph answering who/what/when/where/why, two quotes, and \
                 boilerplate."
            }
        }
    }
}

#[async_trait]
impl ContentBuilder for PressReleaseBuilder {
    fn name(&self) -> &str {
        "press"
    }

    async fn build(
        &self,
        input: &GenerationInput,
        progress: Option<&ProgressFn>,
    ) -> Result<String> {
        let kind = input.param(0).unwrap_or("press_release");
        let system = "You are a PR writer. Newsworthy facts first, adjectives \
                      last. Quotes must sound like something a person would \
                      actually say.";
        let user = compose_user_prompt(Self::task_statement(kind), input);
        let text = self.client.stream(system, &user, progress).await?;
        Ok(text)
    }
}
