//! Paid advertising family.
//!
//! One builder serves every ad title: the first descriptor param is the
//! platform, the second the vertical. This is the canonical example of
//! params letting a generic builder back multiple registry entries.

use std::sync::Arc;

use anyhow::Result;
use async_trait::async_trait;

use crate::llm::DeepSeekClient;

use super::input::GenerationInput;
use super::prompt::compose_user_prompt;
use super::trait_def::{ContentBuilder, ProgressFn};

/// Builds ad copy for a given platform and vertical.
pub struct AdCopyBuilder {
    client: Arc<DeepSeekClient>,
}

impl AdCopyBuilder {
    pub fn new(client: Arc<DeepSeekClient>) -> Self {
        Self { client }
    }

    fn platform_constraints(platform: &str) -> &'static str {
        match platform {
            "google" => {
                "Google Search ads: 3 headlines of at most 30 characters each \
                 and 2 descriptions of at most 90 characters each."
            }
            "linkedin" => {
                "LinkedIn sponsored content: professional tone, 150-word \
                 intro text, a headline, and a CTA button label."
            }
            "youtube" => {
                "YouTube pre-roll script: hook inside the first 5 seconds, \
                 30-second total runtime, spoken-word style."
            }
            "tiktok" => {
                "TikTok ad script: native, creator-voiced, under 60 seconds, \
                 with an on-screen text suggestion per beat."
            }
            "native" => {
                "Native/advertorial placement: editorial headline and a \
                 story-style body that discloses the promotion honestly."
            }
            _ => {
                "Facebook feed ad: scroll-stopping primary text, a headline \
                 under 40 characters, and a link description."
            }
        }
    }
}

#[async_trait]
impl ContentBuilder for AdCopyBuilder {
    fn name(&self) -> &str {
        "ad_copy"
    }

    async fn build(
        &self,
        input: &GenerationInput,
        progress: Option<&ProgressFn>,
    ) -> Result<String> {
        let platform = input.param(0).unwrap_or("facebook");
        let vertical = input.param(1).unwrap_or("generic");
        let system = "You are a performance marketer writing paid ads. Every line \
                      earns its place; respect platform character limits exactly. \
                      Output only the ad copy, labeled by element.";
        let task = format!(
            "Write ad copy for the {vertical} vertical. Format: {}",
            Self::platform_constraints(platform)
        );
        let user = compose_user_prompt(&task, input);
        let text = self.client.stream(system, &user, progress).await?;
        Ok(text)
    }
}
