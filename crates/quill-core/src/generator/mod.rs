//! Continuous batch generator: runs a list of generation tasks under one
//! of three ordering policies, emitting lifecycle events as it goes.
//!
//! - Sequential: strict input order, one task at a time.
//! - Bounded parallel: windows of `max_concurrent` tasks; a window must
//!   fully settle before the next one starts.
//! - Dependency waves: each round runs every task whose dependencies are
//!   already finished; a round that can schedule nothing while tasks
//!   remain fails the whole batch.
//!
//! Per-task failures are recovered into the result list (partial-failure
//! semantics); only re-entrancy and an unschedulable dependency graph
//! escalate as [`GeneratorError`].

use std::collections::HashSet;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::time::Instant;

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{error, info, warn};
use uuid::Uuid;

use crate::builder::{BlueprintValue, FieldValue, ProgressFn};
use crate::dispatch::{ai_chunk_progress, Dispatcher};
use crate::event::{emit, EventSink, GenerationEvent};
use crate::registry::ValidationReport;

/// Errors that terminate a whole batch call.
#[derive(Debug, Error)]
pub enum GeneratorError {
    #[error("generation already in progress")]
    AlreadyRunning,

    #[error("dependency deadlock, tasks cannot be scheduled: {0}")]
    DependencyStuck(String),
}

/// One generation request inside a batch. Created per HTTP request,
/// consumed once, never persisted.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GenerationTask {
    pub title: String,
    #[serde(default)]
    pub blueprint_values: Vec<BlueprintValue>,
    #[serde(default)]
    pub field_values: Vec<FieldValue>,
    pub main_category: String,
    /// Carried for request compatibility; execution order is governed by
    /// the batch mode, not this field.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub priority: Option<i32>,
    /// Titles of other tasks in the same batch that must finish first.
    /// Only honored by [`ContinuousGenerator::generate_with_dependencies`].
    #[serde(default)]
    pub dependencies: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub homepage_reference: Option<String>,
}

/// Outcome of one task.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GenerationResult {
    pub title: String,
    pub content: Option<String>,
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    pub duration_ms: u64,
}

/// Batch execution settings.
#[derive(Debug, Clone)]
pub struct GeneratorConfig {
    pub parallel: bool,
    pub max_concurrent: usize,
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        Self {
            parallel: false,
            max_concurrent: 3,
        }
    }
}

/// Releases the single-flight flag when the run ends, error or not.
struct RunGuard<'a>(&'a AtomicBool);

impl Drop for RunGuard<'_> {
    fn drop(&mut self) {
        self.0.store(false, Ordering::SeqCst);
    }
}

/// Batch generator over a [`Dispatcher`].
///
/// The single-flight guard is instance-scoped: it prevents overlapping
/// runs on the same generator, not across separate instances.
pub struct ContinuousGenerator {
    dispatcher: Dispatcher,
    is_running: AtomicBool,
}

impl ContinuousGenerator {
    pub fn new(dispatcher: Dispatcher) -> Self {
        Self {
            dispatcher,
            is_running: AtomicBool::new(false),
        }
    }

    pub fn dispatcher(&self) -> &Dispatcher {
        &self.dispatcher
    }

    pub fn is_running(&self) -> bool {
        self.is_running.load(Ordering::SeqCst)
    }

    /// Advisory stop: clears the running flag so a future `generate` can
    /// start. In-flight tasks run to completion; nothing is aborted.
    pub fn stop(&self) {
        self.is_running.store(false, Ordering::SeqCst);
        info!("generator stop requested; in-flight tasks will run to completion");
    }

    fn acquire(&self) -> Result<RunGuard<'_>, GeneratorError> {
        if self
            .is_running
            .compare_exchange(false, true, Ordering::SeqCst, Ordering::SeqCst)
            .is_err()
        {
            return Err(GeneratorError::AlreadyRunning);
        }
        Ok(RunGuard(&self.is_running))
    }

    /// Run a batch sequentially or in bounded-parallel windows.
    ///
    /// Emits `generation_start`, the per-task lifecycle events, and a
    /// closing `generation_complete` with success/failure counts. The
    /// result list is index-aligned with the input in both modes.
    pub async fn generate(
        &self,
        tasks: &[GenerationTask],
        config: &GeneratorConfig,
        sink: &EventSink,
    ) -> Result<Vec<GenerationResult>, GeneratorError> {
        let _guard = self.acquire()?;

        let run_id = Uuid::new_v4();
        info!(
            run_id = %run_id,
            total = tasks.len(),
            parallel = config.parallel,
            "starting generation batch"
        );
        emit(
            sink,
            GenerationEvent::GenerationStart {
                run_id,
                total: tasks.len(),
            },
        );

        let results = if config.parallel {
            self.run_parallel(tasks, config.max_concurrent.max(1), sink)
                .await
        } else {
            self.run_sequential(tasks, sink).await
        };

        let successful = results.iter().filter(|r| r.success).count();
        let failed = results.len() - successful;
        info!(
            run_id = %run_id,
            successful = successful,
            failed = failed,
            "generation batch finished"
        );
        emit(
            sink,
            GenerationEvent::GenerationComplete {
                run_id,
                successful,
                failed,
            },
        );

        Ok(results)
    }

    async fn run_sequential(
        &self,
        tasks: &[GenerationTask],
        sink: &EventSink,
    ) -> Vec<GenerationResult> {
        let total = tasks.len();
        let mut results = Vec::with_capacity(total);
        for (index, task) in tasks.iter().enumerate() {
            results.push(self.generate_single_task(task, index, total, sink).await);
        }
        results
    }

    async fn run_parallel(
        &self,
        tasks: &[GenerationTask],
        max_concurrent: usize,
        sink: &EventSink,
    ) -> Vec<GenerationResult> {
        let total = tasks.len();
        let completed = AtomicUsize::new(0);
        let mut results = Vec::with_capacity(total);
        let mut offset = 0;

        for window in tasks.chunks(max_concurrent) {
            let window_futures = window.iter().enumerate().map(|(i, task)| {
                let completed = &completed;
                async move {
                    let result = self.generate_single_task(task, offset + i, total, sink).await;
                    // Progress counts per task resolution, not per window.
                    let done = completed.fetch_add(1, Ordering::SeqCst) + 1;
                    tracing::debug!(completed = done, total = total, "window task settled");
                    result
                }
            });
            // join_all preserves input order, so the results stay
            // index-aligned even though completion order is arbitrary.
            results.extend(futures::future::join_all(window_futures).await);
            offset += window.len();
        }
        results
    }

    /// Run a batch in dependency-resolved waves.
    ///
    /// Each round schedules every unfinished task whose dependencies have
    /// all finished (successfully or not). A round that schedules nothing
    /// while tasks remain means the graph is cyclic or references titles
    /// outside the batch; the whole call fails with
    /// [`GeneratorError::DependencyStuck`] before any of the stuck tasks
    /// execute, since partial results would be misleading.
    pub async fn generate_with_dependencies(
        &self,
        tasks: &[GenerationTask],
        sink: &EventSink,
    ) -> Result<Vec<GenerationResult>, GeneratorError> {
        let _guard = self.acquire()?;

        let run_id = Uuid::new_v4();
        let total = tasks.len();
        info!(run_id = %run_id, total = total, "starting dependency-ordered batch");
        emit(sink, GenerationEvent::GenerationStart { run_id, total });

        let mut finished_titles: HashSet<String> = HashSet::new();
        let mut finished_indexes: HashSet<usize> = HashSet::new();
        let mut results: Vec<Option<GenerationResult>> = vec![None; total];

        while finished_indexes.len() < total {
            let ready: Vec<usize> = (0..total)
                .filter(|i| {
                    !finished_indexes.contains(i)
                        && tasks[*i]
                            .dependencies
                            .iter()
                            .all(|dep| finished_titles.contains(dep))
                })
                .collect();

            if ready.is_empty() {
                let stuck: Vec<&str> = (0..total)
                    .filter(|i| !finished_indexes.contains(i))
                    .map(|i| tasks[i].title.as_str())
                    .collect();
                let err = GeneratorError::DependencyStuck(stuck.join(", "));
                error!(run_id = %run_id, stuck = ?stuck, "dependency batch cannot make progress");
                emit(
                    sink,
                    GenerationEvent::Error {
                        message: err.to_string(),
                    },
                );
                return Err(err);
            }

            let round = futures::future::join_all(
                ready
                    .iter()
                    .map(|&i| self.generate_single_task(&tasks[i], i, total, sink)),
            )
            .await;

            for (&i, result) in ready.iter().zip(round) {
                finished_titles.insert(tasks[i].title.clone());
                finished_indexes.insert(i);
                results[i] = Some(result);
            }
        }

        let results: Vec<GenerationResult> = results.into_iter().flatten().collect();
        let successful = results.iter().filter(|r| r.success).count();
        let failed = results.len() - successful;
        info!(run_id = %run_id, successful, failed, "dependency-ordered batch finished");
        emit(
            sink,
            GenerationEvent::GenerationComplete {
                run_id,
                successful,
                failed,
            },
        );

        Ok(results)
    }

    /// Execute one task: emit `task_start`, dispatch with a chunk-relay
    /// progress callback, emit `task_complete`/`task_error` with elapsed
    /// milliseconds. Never propagates an error; failures land in the
    /// returned result.
    pub async fn generate_single_task(
        &self,
        task: &GenerationTask,
        index: usize,
        total: usize,
        sink: &EventSink,
    ) -> GenerationResult {
        let started = Instant::now();
        emit(
            sink,
            GenerationEvent::TaskStart {
                title: task.title.clone(),
                index,
                total,
            },
        );
        info!(task_title = %task.title, index = index, total = total, "task started");

        let progress = ai_chunk_progress(sink.clone());
        let progress: &ProgressFn = &progress;
        let content = self
            .dispatcher
            .execute_service(
                &task.title,
                &task.blueprint_values,
                &task.field_values,
                &task.main_category,
                Some(progress),
                task.homepage_reference.as_deref(),
            )
            .await;

        let duration_ms = started.elapsed().as_millis() as u64;
        match content {
            Some(content) => {
                emit(
                    sink,
                    GenerationEvent::TaskComplete {
                        title: task.title.clone(),
                        duration_ms,
                    },
                );
                info!(task_title = %task.title, duration_ms = duration_ms, "task completed");
                GenerationResult {
                    title: task.title.clone(),
                    content: Some(content),
                    success: true,
                    error: None,
                    duration_ms,
                }
            }
            None => {
                let error = format!("no content generated for {:?}", task.title);
                emit(
                    sink,
                    GenerationEvent::TaskError {
                        title: task.title.clone(),
                        error: error.clone(),
                        duration_ms,
                    },
                );
                warn!(task_title = %task.title, duration_ms = duration_ms, "task failed");
                GenerationResult {
                    title: task.title.clone(),
                    content: None,
                    success: false,
                    error: Some(error),
                    duration_ms,
                }
            }
        }
    }

    /// Pre-flight check for a task. Pure; callers use it to screen tasks
    /// before submission, `generate` does not invoke it.
    pub fn validate_task(&self, task: &GenerationTask) -> ValidationReport {
        let registry = self.dispatcher.registry();
        let mut errors = Vec::new();

        if task.title.trim().is_empty() {
            errors.push("task title is empty".to_string());
        } else if registry.resolve(&task.title, &task.main_category).is_none() {
            errors.push(format!(
                "no service registered for {:?} in category {:?}",
                task.title, task.main_category
            ));
        }
        if task.blueprint_values.is_empty() {
            errors.push("blueprint values are empty".to_string());
        }
        if task.field_values.is_empty() {
            errors.push("field values are empty".to_string());
        }

        ValidationReport::from_errors(errors)
    }
}
