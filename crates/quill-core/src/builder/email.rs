//! Email content family.

use std::sync::Arc;

use anyhow::Result;
use async_trait::async_trait;

use crate::llm::DeepSeekClient;

use super::input::GenerationInput;
use super::prompt::compose_user_prompt;
use super::trait_def::{ContentBuilder, ProgressFn};

/// Builds marketing and lifecycle emails.
///
/// The first descriptor param selects the email kind (`welcome`,
/// `cart_abandonment`, `launch_sequence`, ...), so a single builder
/// serves every title in the Email category.
pub struct EmailBuilder {
    client: Arc<DeepSeekClient>,
}

impl EmailBuilder {
    pub fn new(client: Arc<DeepSeekClient>) -> Self {
        Self { client }
    }

    fn task_statement(kind: &str) -> &'static str {
        match kind {
            "welcome" => {
                "Write a warm welcome email for a new subscriber. Include a subject \
                 line, a short preview line, and a single clear call to action."
            }
            "cart_abandonment" => {
                "Write a cart-abandonment email that recovers the sale without \
                 sounding desperate. Include a subject line and one incentive."
            }
            "launch_sequence" => {
                "Write a 3-email product launch sequence (tease, reveal, last \
                 call). Label each email and include subject lines."
            }
            "re_engagement" => {
                "Write a re-engagement email for subscribers who have gone quiet. \
                 Include a subject line and a reason to come back today."
            }
            "newsletter" => {
                "Write a newsletter issue: one lead story, two short items, and a \
                 soft call to action. Include a subject line."
            }
            _ => {
                "Write a broadcast marketing email with a subject line, preview \
                 line, body, and a single call to action."
            }
        }
    }
}

#[async_trait]
impl ContentBuilder for EmailBuilder {
    fn name(&self) -> &str {
        "email"
    }

    async fn build(
        &self,
        input: &GenerationInput,
        progress: Option<&ProgressFn>,
    ) -> Result<String> {
        let kind = input.param(0).unwrap_or("broadcast");
        let system = "You are a direct-response email copywriter. You write emails \
                      people actually open and read: specific, conversational, and \
                      free of filler. Output only the email copy itself.";
        let user = compose_user_prompt(Self::task_statement(kind), input);
        let text = self.client.stream(system, &user, progress).await?;
        Ok(text)
    }
}
