//! Book and lead-magnet book family.

use std::sync::Arc;

use anyhow::Result;
use async_trait::async_trait;

use crate::llm::DeepSeekClient;

use super::input::GenerationInput;
use super::prompt::compose_user_prompt;
use super::trait_def::{ContentBuilder, ProgressFn};

/// Builds book outlines, chapters, and packaging copy.
pub struct BookBuilder {
    client: Arc<DeepSeekClient>,
}

impl BookBuilder {
    pub fn new(client: Arc<DeepSeekClient>) -> Self {
        Self { client }
    }

    fn task_statement(kind: &str) -> &'static str {
        match kind {
            "chapter" => {
                "Write a full book chapter based on the chapter topic in the \
                 inputs: opening anecdote, teaching body, and action summary."
            }
            "back_cover" => {
                "Write back-cover copy: hook question, promise paragraph, 3 \
                 bullets of what the reader will learn, author credibility line."
            }
            "titles" => {
                "Write 10 book title and subtitle pairs. Titles intrigue; \
                 subtitles state the concrete promise."
            }
            _ => {
                "Write a chapter-by-chapter book outline: working title, premise \
                 paragraph, and for each chapter a title plus 3 beat bullets."
            }
        }
    }
}

#[async_trait]
impl ContentBuilder for BookBuilder {
    fn name(&self) -> &str {
        "book"
    }

    async fn build(
        &self,
        input: &GenerationInput,
        progress: Option<&ProgressFn>,
    ) -> Result<String> {
        let kind = input.param(0).unwrap_or("outline");
        let system = "You are a nonfiction book coach and ghostwriter. Structure \
                      carries the book; every chapter must earn its place in the \
                      argument.";
        let user = compose_user_prompt(Self::task_statement(kind), input);
        let text = self.client.stream(system, &user, progress).await?;
        Ok(text)
    }
}
