//! Test doubles for the generation pipeline.
//!
//! [`ScriptedBuilder`] stands in for a real LLM-backed builder: it can
//! return fixed output, stream scripted chunks through the progress
//! callback, delay to shape concurrency tests, or fail on demand. The
//! helpers at the bottom build registries and tasks with the minimum
//! fields that pass validation.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

use anyhow::{bail, Result};
use async_trait::async_trait;

use quill_core::builder::{
    BlueprintEntry, BlueprintValue, ContentBuilder, FieldValue, GenerationInput, ProgressFn,
};
use quill_core::generator::GenerationTask;
use quill_core::registry::{ServiceDescriptor, ServiceRegistry};

/// Tracks how many builds run at once.
#[derive(Default)]
pub struct ConcurrencyGauge {
    current: AtomicUsize,
    peak: AtomicUsize,
}

impl ConcurrencyGauge {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    fn enter(&self) {
        let now = self.current.fetch_add(1, Ordering::SeqCst) + 1;
        self.peak.fetch_max(now, Ordering::SeqCst);
    }

    fn exit(&self) {
        self.current.fetch_sub(1, Ordering::SeqCst);
    }

    pub fn peak(&self) -> usize {
        self.peak.load(Ordering::SeqCst)
    }
}

/// A builder whose behavior is scripted up front.
pub struct ScriptedBuilder {
    name: String,
    output: String,
    chunks: Vec<String>,
    delay: Option<Duration>,
    fail: bool,
    echo_params: bool,
    gauge: Option<Arc<ConcurrencyGauge>>,
    calls: AtomicUsize,
}

impl ScriptedBuilder {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            output: "scripted output".to_string(),
            chunks: Vec::new(),
            delay: None,
            fail: false,
            echo_params: false,
            gauge: None,
            calls: AtomicUsize::new(0),
        }
    }

    pub fn with_output(mut self, output: impl Into<String>) -> Self {
        self.output = output.into();
        self
    }

    /// Stream these chunks through the progress callback; the final
    /// output is their concatenation.
    pub fn with_chunks<I, S>(mut self, chunks: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.chunks = chunks.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    pub fn failing(mut self) -> Self {
        self.fail = true;
        self
    }

    /// Output becomes the descriptor params joined by `|`, so tests can
    /// assert which params reached the builder.
    pub fn echoing_params(mut self) -> Self {
        self.echo_params = true;
        self
    }

    pub fn with_gauge(mut self, gauge: Arc<ConcurrencyGauge>) -> Self {
        self.gauge = Some(gauge);
        self
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl ContentBuilder for ScriptedBuilder {
    fn name(&self) -> &str {
        &self.name
    }

    async fn build(
        &self,
        input: &GenerationInput,
        progress: Option<&ProgressFn>,
    ) -> Result<String> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if let Some(gauge) = &self.gauge {
            gauge.enter();
        }
        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }
        if let Some(gauge) = &self.gauge {
            gauge.exit();
        }
        if self.fail {
            bail!("scripted failure in {:?}", self.name);
        }
        if let Some(progress) = progress {
            for chunk in &self.chunks {
                progress(chunk);
            }
        }
        if self.echo_params {
            return Ok(input.params.join("|"));
        }
        if self.chunks.is_empty() {
            Ok(self.output.clone())
        } else {
            Ok(self.chunks.concat())
        }
    }
}

/// Descriptor for a scripted builder under the given title and category.
pub fn descriptor(
    title: &str,
    category: &str,
    builder: Arc<ScriptedBuilder>,
) -> ServiceDescriptor {
    ServiceDescriptor::new(title, category, builder as Arc<dyn ContentBuilder>)
}

/// Registry preloaded with the given descriptors.
pub fn registry_with(descriptors: Vec<ServiceDescriptor>) -> ServiceRegistry {
    let mut registry = ServiceRegistry::new();
    registry.register_batch(descriptors);
    registry
}

/// A task with just enough content to pass validation.
pub fn task(title: &str, category: &str) -> GenerationTask {
    GenerationTask {
        title: title.to_string(),
        blueprint_values: vec![BlueprintValue {
            title: "Project".to_string(),
            values: vec![BlueprintEntry {
                id: None,
                key: Some("product".to_string()),
                value: Some("Test Product".to_string()),
            }],
        }],
        field_values: vec![FieldValue::new("audience", "testers")],
        main_category: category.to_string(),
        priority: None,
        dependencies: Vec::new(),
        homepage_reference: None,
    }
}

/// Like [`task`], with dependencies on other task titles.
pub fn task_with_deps(title: &str, category: &str, deps: &[&str]) -> GenerationTask {
    GenerationTask {
        dependencies: deps.iter().map(|d| d.to_string()).collect(),
        ..task(title, category)
    }
}
