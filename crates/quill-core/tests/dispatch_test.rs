//! Dispatcher behavior: resolution, failure isolation, param forwarding,
//! and the chunk-relay progress adapter.

use std::sync::Arc;

use quill_core::builder::ProgressFn;
use quill_core::dispatch::{ai_chunk_progress, Dispatcher, AI_CHUNK_PROGRESS};
use quill_core::event::{channel, GenerationEvent};
use quill_core::registry::ServiceDescriptor;

use quill_test_utils::{descriptor, registry_with, ScriptedBuilder};

fn dispatcher_with(descriptors: Vec<ServiceDescriptor>) -> Dispatcher {
    Dispatcher::new(Arc::new(registry_with(descriptors)))
}

#[tokio::test]
async fn unknown_title_yields_none_without_panicking() {
    let dispatcher = dispatcher_with(vec![]);
    let result = dispatcher
        .execute_service("Ghost", &[], &[], "Email", None, None)
        .await;
    assert_eq!(result, None);
}

#[tokio::test]
async fn builder_error_is_absorbed_into_none() {
    let bad = Arc::new(ScriptedBuilder::new("bad").failing());
    let dispatcher = dispatcher_with(vec![descriptor("Broken", "Email", bad)]);
    let result = dispatcher
        .execute_service("Broken", &[], &[], "Email", None, None)
        .await;
    assert_eq!(result, None);
}

#[tokio::test]
async fn descriptor_params_reach_the_builder() {
    let echo = Arc::new(ScriptedBuilder::new("echo").echoing_params());
    let dispatcher = dispatcher_with(vec![
        descriptor("Facebook Ad", "Advertising", echo).with_params(["facebook", "saas"])
    ]);
    let result = dispatcher
        .execute_service("Facebook Ad", &[], &[], "Advertising", None, None)
        .await;
    assert_eq!(result.as_deref(), Some("facebook|saas"));
}

#[tokio::test]
async fn title_registered_without_category_resolves_from_any_category() {
    let builder = Arc::new(ScriptedBuilder::new("b").with_output("shared"));
    let dispatcher = dispatcher_with(vec![ServiceDescriptor::uncategorized(
        "Anywhere",
        builder as Arc<dyn quill_core::builder::ContentBuilder>,
    )]);
    let result = dispatcher
        .execute_service("Anywhere", &[], &[], "Email", None, None)
        .await;
    assert_eq!(result.as_deref(), Some("shared"));
}

#[tokio::test]
async fn progress_adapter_relays_chunks_as_events() {
    let chunky = Arc::new(ScriptedBuilder::new("chunky").with_chunks(["Hello ", "world"]));
    let dispatcher = dispatcher_with(vec![descriptor("Streamer", "Email", chunky)]);

    let (sink, mut rx) = channel();
    let progress = ai_chunk_progress(sink.clone());
    let progress: &ProgressFn = &progress;
    let result = dispatcher
        .execute_service("Streamer", &[], &[], "Email", Some(progress), None)
        .await;
    assert_eq!(result.as_deref(), Some("Hello world"));

    drop(sink);
    let mut seen = Vec::new();
    while let Ok(event) = rx.try_recv() {
        match event {
            GenerationEvent::AiChunk { content, progress } => {
                assert_eq!(progress, AI_CHUNK_PROGRESS);
                seen.push(content);
            }
            other => panic!("unexpected event {other:?}"),
        }
    }
    assert_eq!(seen, vec!["Hello ", "world"]);
}
