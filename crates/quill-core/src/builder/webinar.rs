//! Webinar family.

use std::sync::Arc;

use anyhow::Result;
use async_trait::async_trait;

use crate::llm::DeepSeekClient;

use super::input::GenerationInput;
use super::prompt::compose_user_prompt;
use super::trait_def::{ContentBuilder, ProgressFn};

/// Builds webinar titles, registration copy, and session outlines.
pub struct WebinarBuilder {
    client: Arc<DeepSeekClient>,
}

impl WebinarBuilder {
    pub fn new(client: Arc<DeepSeekClient>) -> Self {
        Self { client }
    }

    fn task_statement(kind: &str) -> &'static str {
        match kind {
            "registration_page" => {
                "Write a webinar registration page: headline, 3 'you will learn' \
                 bullets, presenter bio blurb, and a registration CTA."
            }
            "slide_outline" => {
                "Write a 45-minute webinar outline: intro, 3 teaching sections \
                 with slide-level beats, transition to offer, and Q&A prompts."
            }
            "promo_sequence" => {
                "Write a 3-touch webinar promotion sequence (announcement, \
                 value tease, last chance) for email or social."
            }
            "follow_up" => {
                "Write post-webinar follow-up copy: replay email for attendees \
                 and a 'sorry we missed you' email for no-shows."
            }
            _ => {
                "Write 10 webinar title options with a matching one-sentence \
                 promise for each."
            }
        }
    }
}

#[async_trait]
impl ContentBuilder for WebinarBuilder {
    fn name(&self) -> &str {
        "webinar"
    }

    async fn build(
        &self,
        input: &GenerationInput,
        progress: Option<&ProgressFn>,
    ) -> Result<String> {
        let kind = input.param(0).unwrap_or("title_hooks");
        let system = "You are a webinar marketing specialist. Curiosity with \
                      substance: every promise made must be teachable in the \
                      session described by the inputs.";
        let user = compose_user_prompt(Self::task_statement(kind), input);
        let text = self.client.stream(system, &user, progress).await?;
        Ok(text)
    }
}
