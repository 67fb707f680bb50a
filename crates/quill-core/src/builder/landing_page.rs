//! Landing page and website page family.
//!
//! Serves both the Landing Page and Website Pages categories; the variant
//! param picks the page type.

use std::sync::Arc;

use anyhow::Result;
use async_trait::async_trait;

use crate::llm::DeepSeekClient;

use super::input::GenerationInput;
use super::prompt::compose_user_prompt;
use super::trait_def::{ContentBuilder, ProgressFn};

/// Builds full-page web copy, section by section.
pub struct LandingPageBuilder {
    client: Arc<DeepSeekClient>,
}

impl LandingPageBuilder {
    pub fn new(client: Arc<DeepSeekClient>) -> Self {
        Self { client }
    }

    fn task_statement(kind: &str) -> &'static str {
        match kind {
            "squeeze_page" => {
                "Write a squeeze page: headline, three benefit bullets, and an \
                 email opt-in call to action. Keep it under 150 words."
            }
            "thank_you_page" => {
                "Write a thank-you page that confirms the action, sets \
                 expectations for what happens next, and offers one next step."
            }
            "homepage" => {
                "Write homepage copy: hero headline and subheadline, three \
                 value-proposition sections, social proof block, and footer CTA."
            }
            "about_page" => {
                "Write an about page that tells the company story as a narrative \
                 arc and ends with why it matters to the visitor."
            }
            "features_page" => {
                "Write a features page: one section per capability, each with a \
                 benefit-led heading and a short explanation."
            }
            "pricing_page" => {
                "Write pricing page copy: plan names, one-line plan summaries, \
                 an FAQ addressing the three most likely objections."
            }
            _ => {
                "Write a long-form sales landing page: headline, lead, problem, \
                 solution, offer, proof, risk reversal, and closing CTA."
            }
        }
    }
}

#[async_trait]
impl ContentBuilder for LandingPageBuilder {
    fn name(&self) -> &str {
        "landing_page"
    }

    async fn build(
        &self,
        input: &GenerationInput,
        progress: Option<&ProgressFn>,
    ) -> Result<String> {
        let kind = input.param(0).unwrap_or("sales_page");
        let system = "You are a conversion copywriter. You write page copy that \
                      reads like a person, not a brochure: concrete benefits, \
                      plain words, one idea per section. Output the page copy \
                      with section labels.";
        let user = compose_user_prompt(Self::task_statement(kind), input);
        let text = self.client.stream(system, &user, progress).await?;
        Ok(text)
    }
}
