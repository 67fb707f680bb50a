//! Generation dispatcher: resolves a request title to a builder and
//! invokes it, isolating failures.
//!
//! The dispatcher is the boundary where everything that can go wrong with
//! a single generation -- unknown title, malformed descriptor, builder or
//! LLM failure -- is converted into a `None` ("no content") return
//! instead of an error. One broken generator must never take down a
//! batch.

use std::sync::Arc;

use tracing::warn;

use crate::builder::{BlueprintValue, FieldValue, GenerationInput, ProgressFn};
use crate::event::{emit, EventSink, GenerationEvent};
use crate::registry::ServiceRegistry;

/// Coarse progress value attached to every streamed chunk. The upstream
/// API provides no expected-length signal to compute a real fraction
/// from, so the fixed placeholder is part of the client contract.
pub const AI_CHUNK_PROGRESS: u8 = 85;

/// Adapter from raw chunk strings to `ai_chunk` events on a sink.
pub fn ai_chunk_progress(sink: EventSink) -> impl Fn(&str) + Send + Sync {
    move |chunk: &str| {
        emit(
            &sink,
            GenerationEvent::AiChunk {
                content: chunk.to_string(),
                progress: AI_CHUNK_PROGRESS,
            },
        );
    }
}

/// Routes resolved generation requests to their builders.
#[derive(Clone)]
pub struct Dispatcher {
    registry: Arc<ServiceRegistry>,
}

impl Dispatcher {
    pub fn new(registry: Arc<ServiceRegistry>) -> Self {
        Self { registry }
    }

    pub fn registry(&self) -> &ServiceRegistry {
        &self.registry
    }

    /// Execute one generation request.
    ///
    /// Returns the generated content, or `None` when the title does not
    /// resolve, the descriptor fails validation, or the builder errors.
    /// Callers must treat `None` as "no content", not as success.
    pub async fn execute_service(
        &self,
        title: &str,
        blueprint_values: &[BlueprintValue],
        field_values: &[FieldValue],
        main_category: &str,
        progress: Option<&ProgressFn>,
        homepage_reference: Option<&str>,
    ) -> Option<String> {
        let Some(descriptor) = self.registry.resolve(title, main_category) else {
            warn!(
                title = %title,
                category = %main_category,
                "service not found, no content generated"
            );
            return None;
        };

        let report = self
            .registry
            .validate(&descriptor.title, descriptor.category.as_deref());
        if !report.is_valid {
            warn!(
                title = %title,
                errors = ?report.errors,
                "service failed validation, no content generated"
            );
            return None;
        }

        let input = GenerationInput {
            blueprint_values: blueprint_values.to_vec(),
            field_values: field_values.to_vec(),
            params: descriptor.params.clone(),
            homepage_reference: homepage_reference.map(str::to_string),
        };

        match descriptor.builder.build(&input, progress).await {
            Ok(content) => Some(content),
            Err(e) => {
                warn!(
                    title = %title,
                    builder = %descriptor.builder.name(),
                    error = %format!("{e:#}"),
                    "builder failed, no content generated"
                );
                None
            }
        }
    }
}
