//! `quill generate` and `quill validate`: run or pre-check a batch file.
//!
//! A batch file is a JSON array of generation tasks. `generate` prints
//! every lifecycle event as a JSON line on stdout while the batch runs,
//! then a human-readable summary on stderr. `validate` checks each task
//! against the registry without calling the API.

use std::path::Path;
use std::sync::Arc;

use anyhow::{Context, Result};
use quill_core::dispatch::Dispatcher;
use quill_core::event::{channel, json_line};
use quill_core::generator::{ContinuousGenerator, GenerationTask, GeneratorConfig};
use quill_core::registry::ServiceRegistry;

/// Parse a batch file into tasks.
pub fn load_batch(path: &Path) -> Result<Vec<GenerationTask>> {
    let contents = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read batch file {}", path.display()))?;
    let tasks: Vec<GenerationTask> = serde_json::from_str(&contents)
        .with_context(|| format!("failed to parse batch file {}", path.display()))?;
    Ok(tasks)
}

/// Execute the `quill generate` command.
pub async fn run_generate(
    registry: Arc<ServiceRegistry>,
    path: &Path,
    parallel: bool,
    max_concurrent: usize,
) -> Result<()> {
    let tasks = load_batch(path)?;
    if tasks.is_empty() {
        anyhow::bail!("batch file {} contains no tasks", path.display());
    }

    let generator = ContinuousGenerator::new(Dispatcher::new(registry));

    // Surface validation problems before spending any API calls.
    let mut invalid = 0;
    for task in &tasks {
        let report = generator.validate_task(task);
        if !report.is_valid {
            invalid += 1;
            for error in &report.errors {
                eprintln!("invalid task {:?}: {error}", task.title);
            }
        }
    }
    if invalid > 0 {
        anyhow::bail!("{invalid} of {} tasks failed validation", tasks.len());
    }

    let (sink, mut rx) = channel();
    let printer = tokio::spawn(async move {
        while let Some(event) = rx.recv().await {
            println!("{}", json_line(&event));
        }
    });

    let use_deps = tasks.iter().any(|t| !t.dependencies.is_empty());
    let results = if use_deps {
        generator.generate_with_dependencies(&tasks, &sink).await?
    } else {
        let config = GeneratorConfig {
            parallel,
            max_concurrent,
        };
        generator.generate(&tasks, &config, &sink).await?
    };

    drop(sink);
    printer.await.ok();

    let successful = results.iter().filter(|r| r.success).count();
    eprintln!(
        "{successful}/{} tasks succeeded in {} ms",
        results.len(),
        results.iter().map(|r| r.duration_ms).sum::<u64>()
    );
    for result in results.iter().filter(|r| !r.success) {
        eprintln!(
            "  failed: {} ({})",
            result.title,
            result.error.as_deref().unwrap_or("unknown error")
        );
    }

    if successful < results.len() {
        std::process::exit(1);
    }
    Ok(())
}

/// Execute the `quill validate` command: report per-task problems and
/// exit non-zero if any task is invalid.
pub fn run_validate(registry: Arc<ServiceRegistry>, path: &Path) -> Result<()> {
    let tasks = load_batch(path)?;
    let generator = ContinuousGenerator::new(Dispatcher::new(registry));

    let mut invalid = 0;
    for task in &tasks {
        let report = generator.validate_task(task);
        if report.is_valid {
            println!("ok: {}", task.title);
        } else {
            invalid += 1;
            println!("INVALID: {}", task.title);
            for error in &report.errors {
                println!("  - {error}");
            }
        }
    }

    println!("{} tasks, {invalid} invalid", tasks.len());
    if invalid > 0 {
        std::process::exit(1);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn load_batch_parses_minimal_tasks() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(
            file,
            r#"[{{"title": "Welcome Email", "main_category": "Email",
                 "blueprint_values": [{{"title": "Project", "values": []}}],
                 "field_values": [{{"key": "audience", "value": "founders"}}]}}]"#
        )
        .unwrap();

        let tasks = load_batch(file.path()).unwrap();
        assert_eq!(tasks.len(), 1);
        assert_eq!(tasks[0].title, "Welcome Email");
        assert_eq!(tasks[0].main_category, "Email");
        assert!(tasks[0].dependencies.is_empty());
        assert_eq!(tasks[0].priority, None);
    }

    #[test]
    fn load_batch_rejects_malformed_json() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, "not json").unwrap();
        assert!(load_batch(file.path()).is_err());
    }
}
