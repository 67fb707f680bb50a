//! Article and long-form content family.

use std::sync::Arc;

use anyhow::Result;
use async_trait::async_trait;

use crate::llm::DeepSeekClient;

use super::input::GenerationInput;
use super::prompt::compose_user_prompt;
use super::trait_def::{ContentBuilder, ProgressFn};

/// Builds blog posts, guides, and other long-form articles.
pub struct ArticleBuilder {
    client: Arc<DeepSeekClient>,
}

impl ArticleBuilder {
    pub fn new(client: Arc<DeepSeekClient>) -> Self {
        Self { client }
    }

    fn task_statement(kind: &str) -> &'static str {
        match kind {
            "listicle" => {
                "Write a listicle article. Open with a hook, number each point, \
                 and close with a takeaway. Use markdown headings."
            }
            "how_to_guide" => {
                "Write a step-by-step how-to guide. Number the steps, call out \
                 common mistakes, and end with a summary checklist."
            }
            "case_study" => {
                "Write a customer case study: situation, obstacle, approach, \
                 result. Use concrete numbers from the inputs where available."
            }
            "pillar_page" => {
                "Write a comprehensive pillar article covering the topic end to \
                 end, with an intro, H2 sections, and a conclusion."
            }
            _ => {
                "Write a blog post with a compelling title, an opening hook, \
                 clearly structured sections, and a closing call to action."
            }
        }
    }
}

#[async_trait]
impl ContentBuilder for ArticleBuilder {
    fn name(&self) -> &str {
        "article"
    }

    async fn build(
        &self,
        input: &GenerationInput,
        progress: Option<&ProgressFn>,
    ) -> Result<String> {
        let kind = input.param(0).unwrap_or("blog_post");
        let system = "You are a content strategist and writer. You produce \
                      well-structured, genuinely useful articles in markdown, \
                      grounded in the provided context. No fluff, no invented \
                      statistics.";
        let user = compose_user_prompt(Self::task_statement(kind), input);
        let text = self.client.stream(system, &user, progress).await?;
        Ok(text)
    }
}
