//! The `ContentBuilder` trait -- the plugin interface for prompt builders.
//!
//! Each content family (email, article, landing page, ...) implements this
//! trait. The trait is intentionally object-safe so descriptors can hold
//! `Arc<dyn ContentBuilder>` in the
//! [`crate::registry::ServiceRegistry`].

use anyhow::Result;
use async_trait::async_trait;

use super::input::GenerationInput;

/// Per-chunk progress callback invoked for every streamed content delta.
pub type ProgressFn = dyn Fn(&str) + Send + Sync;

/// Interface for building and generating one piece of content.
///
/// Implementors assemble a system/user prompt pair from the input values
/// and stream the completion through the shared LLM client, forwarding
/// each chunk to `progress` when one is supplied.
///
/// # Object Safety
///
/// This trait is object-safe: it is stored as `Arc<dyn ContentBuilder>`
/// inside every registry descriptor, which is what replaces string-keyed
/// method dispatch with a statically-checked call signature.
#[async_trait]
pub trait ContentBuilder: Send + Sync {
    /// Stable name for this builder family (e.g. "email").
    fn name(&self) -> &str;

    /// Generate content for the given input, returning the full text.
    ///
    /// Errors from the underlying LLM call propagate to the dispatcher,
    /// which is the failure-isolating boundary; builders themselves do
    /// not swallow errors.
    async fn build(&self, input: &GenerationInput, progress: Option<&ProgressFn>)
    -> Result<String>;
}

// Compile-time assertion: ContentBuilder must be object-safe.
const _: () = {
    fn _assert_object_safe(_: &dyn ContentBuilder) {}
};

#[cfg(test)]
mod tests {
    use super::*;

    /// A trivial builder that echoes a constant, used only to prove the
    /// trait can be implemented and used as `dyn ContentBuilder`.
    struct NoopBuilder;

    #[async_trait]
    impl ContentBuilder for NoopBuilder {
        fn name(&self) -> &str {
            "noop"
        }

        async fn build(
            &self,
            _input: &GenerationInput,
            progress: Option<&ProgressFn>,
        ) -> Result<String> {
            if let Some(progress) = progress {
                progress("noop");
            }
            Ok("noop".to_string())
        }
    }

    #[test]
    fn builder_is_object_safe() {
        let builder: Box<dyn ContentBuilder> = Box::new(NoopBuilder);
        assert_eq!(builder.name(), "noop");
    }

    #[tokio::test]
    async fn noop_builder_invokes_progress() {
        use std::sync::{Arc, Mutex};

        let builder: Box<dyn ContentBuilder> = Box::new(NoopBuilder);
        let seen = Arc::new(Mutex::new(Vec::new()));
        let sink = Arc::clone(&seen);
        let callback = move |chunk: &str| sink.lock().unwrap().push(chunk.to_string());
        let callback: &ProgressFn = &callback;

        let out = builder
            .build(&GenerationInput::default(), Some(callback))
            .await
            .unwrap();
        assert_eq!(out, "noop");
        assert_eq!(*seen.lock().unwrap(), vec!["noop".to_string()]);
    }
}
