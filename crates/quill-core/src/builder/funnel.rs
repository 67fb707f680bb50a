//! Sales funnel step family.
//!
//! Covers the Sales Funnel, Opt-in, Upsells, Order Bumps, Bonuses, and
//! Big Ideas categories; the variant param selects the funnel step.

use std::sync::Arc;

use anyhow::Result;
use async_trait::async_trait;

use crate::llm::DeepSeekClient;

use super::input::GenerationInput;
use super::prompt::compose_user_prompt;
use super::trait_def::{ContentBuilder, ProgressFn};

/// Builds copy for individual funnel steps.
pub struct FunnelStepBuilder {
    client: Arc<DeepSeekClient>,
}

impl FunnelStepBuilder {
    pub fn new(client: Arc<DeepSeekClient>) -> Self {
        Self { client }
    }

    fn task_statement(step: &str) -> &'static str {
        match step {
            "opt_in" => {
                "Write opt-in offer copy: lead magnet name options, a headline, \
                 3 bullets on what is inside, and the form CTA."
            }
            "bridge" => {
                "Write a bridge page that thanks the subscriber for opting in \
                 and transitions naturally into the core offer."
            }
            "upsell" => {
                "Write a one-time-offer upsell page shown right after purchase: \
                 congratulate, present the logical next step, justify the \
                 discount, and give accept/decline links."
            }
            "downsell" => {
                "Write a downsell page for buyers who declined the upsell: \
                 lighter version of the offer, lower price, same deadline."
            }
            "order_bump" => {
                "Write order-bump checkbox copy: a headline under 10 words and \
                 2-3 sentences selling a small add-on at the point of checkout."
            }
            "bonus_stack" => {
                "Write a bonus stack: name each bonus, state its standalone \
                 value, and explain in one sentence why it removes a friction."
            }
            "big_idea" => {
                "Write 5 'big idea' angles for this offer: each a named \
                 mechanism, a one-paragraph pitch, and the emotion it targets."
            }
            _ => {
                "Write an overview of a complete sales funnel for this offer: \
                 each step, its goal, and its key message."
            }
        }
    }
}

#[async_trait]
impl ContentBuilder for FunnelStepBuilder {
    fn name(&self) -> &str {
        "funnel_step"
    }

    async fn build(
        &self,
        input: &GenerationInput,
        progress: Option<&ProgressFn>,
    ) -> Result<String> {
        let step = input.param(0).unwrap_or("overview");
        let system = "You are a funnel copywriter. Each step has exactly one job; \
                      write copy that does that job and nothing else. Honest \
                      urgency only.";
        let user = compose_user_prompt(Self::task_statement(step), input);
        let text = self.client.stream(system, &user, progress).await?;
        Ok(text)
    }
}
