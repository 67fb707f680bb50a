//! Video sales letter family.

use std::sync::Arc;

use anyhow::Result;
use async_trait::async_trait;

use crate::llm::DeepSeekClient;

use super::input::GenerationInput;
use super::prompt::compose_user_prompt;
use super::trait_def::{ContentBuilder, ProgressFn};

/// Builds video sales letter scripts and their components.
pub struct VslBuilder {
    client: Arc<DeepSeekClient>,
}

impl VslBuilder {
    pub fn new(client: Arc<DeepSeekClient>) -> Self {
        Self { client }
    }

    fn task_statement(kind: &str) -> &'static str {
        match kind {
            "lead" => {
                "Write only the lead (first 90 seconds) of a video sales letter: \
                 pattern interrupt, big promise, and a reason to keep watching."
            }
            "close" => {
                "Write only the close of a video sales letter: offer recap, \
                 stacked value, guarantee, scarcity if honest, and final CTA."
            }
            _ => {
                "Write a complete video sales letter script with timestamps: \
                 hook, story, mechanism, proof, offer, close. Spoken-word style."
            }
        }
    }
}

#[async_trait]
impl ContentBuilder for VslBuilder {
    fn name(&self) -> &str {
        "vsl"
    }

    async fn build(
        &self,
        input: &GenerationInput,
        progress: Option<&ProgressFn>,
    ) -> Result<String> {
        let kind = input.param(0).unwrap_or("script");
        let system = "You are a video sales letter scriptwriter. You write for the \
                      ear, not the eye: short sentences, spoken rhythm, no stage \
                      directions beyond [PAUSE] and [B-ROLL] markers.";
        let user = compose_user_prompt(Self::task_statement(kind), input);
        let text = self.client.stream(system, &user, progress).await?;
        Ok(text)
    }
}
