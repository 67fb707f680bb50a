//! Core engine for quill: a streaming AI copywriting service.
//!
//! The crate is organized around a single control flow: a caller submits
//! [`generator::GenerationTask`]s, the [`registry::ServiceRegistry`] maps
//! each task's title to a [`builder::ContentBuilder`], the
//! [`dispatch::Dispatcher`] invokes the builder, and the builder streams
//! through the [`llm::DeepSeekClient`]. Progress chunks travel back up the
//! same path as [`event::GenerationEvent`]s toward the caller's sink.
//!
//! ```text
//! ContinuousGenerator (sequential | bounded-parallel | dependency waves)
//!     |
//!     v
//! Dispatcher --resolve(title, category)--> ServiceRegistry
//!     |                                        |
//!     |   build(input, progress) <-- Arc<dyn ContentBuilder>
//!     |        |
//!     |        v
//!     |   DeepSeekClient::stream --> per-chunk callback --> EventSink
//! ```

pub mod builder;
pub mod catalog;
pub mod dispatch;
pub mod event;
pub mod generator;
pub mod llm;
pub mod registry;
