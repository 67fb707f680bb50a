//! Generation lifecycle events and the sink they travel through.
//!
//! Events flow from the generator/dispatcher toward whatever transport
//! the caller attached: the HTTP layer encodes them as SSE frames, the
//! CLI prints them as JSON lines. Sends are best-effort; a consumer that
//! went away must never fail a generation in progress.

use serde::{Deserialize, Serialize};
use tokio::sync::mpsc;
use uuid::Uuid;

/// One lifecycle or progress event, tagged by `type` on the wire.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum GenerationEvent {
    /// A streamed content delta from the LLM.
    AiChunk { content: String, progress: u8 },
    TaskStart {
        title: String,
        index: usize,
        total: usize,
    },
    TaskComplete {
        title: String,
        duration_ms: u64,
    },
    TaskError {
        title: String,
        error: String,
        duration_ms: u64,
    },
    GenerationStart {
        run_id: Uuid,
        total: usize,
    },
    /// Batch summary. A `generation_complete` does not imply zero
    /// failures; consumers must inspect the counts.
    GenerationComplete {
        run_id: Uuid,
        successful: usize,
        failed: usize,
    },
    Complete {
        #[serde(default, skip_serializing_if = "Option::is_none")]
        content: Option<String>,
    },
    Error {
        message: String,
    },
}

/// Transport-agnostic event sink.
pub type EventSink = mpsc::UnboundedSender<GenerationEvent>;

/// Create a sink/receiver pair.
pub fn channel() -> (EventSink, mpsc::UnboundedReceiver<GenerationEvent>) {
    mpsc::unbounded_channel()
}

/// Best-effort send; a closed receiver is not an error.
pub fn emit(sink: &EventSink, event: GenerationEvent) {
    let _ = sink.send(event);
}

/// Encode an event as a Server-Sent-Events frame.
pub fn sse_frame(event: &GenerationEvent) -> String {
    format!("data: {}\n\n", json_line(event))
}

/// Encode an event as a bare JSON line (the non-SSE CLI path).
pub fn json_line(event: &GenerationEvent) -> String {
    serde_json::to_string(event).unwrap_or_else(|_| "{\"type\":\"error\"}".to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn events_serialize_with_snake_case_type_tags() {
        let event = GenerationEvent::TaskStart {
            title: "Welcome Email".to_string(),
            index: 0,
            total: 3,
        };
        let json: serde_json::Value = serde_json::from_str(&json_line(&event)).unwrap();
        assert_eq!(json["type"], "task_start");
        assert_eq!(json["title"], "Welcome Email");
        assert_eq!(json["total"], 3);
    }

    #[test]
    fn ai_chunk_carries_content_and_progress() {
        let event = GenerationEvent::AiChunk {
            content: "Buy now".to_string(),
            progress: 85,
        };
        let json: serde_json::Value = serde_json::from_str(&json_line(&event)).unwrap();
        assert_eq!(json["type"], "ai_chunk");
        assert_eq!(json["content"], "Buy now");
        assert_eq!(json["progress"], 85);
    }

    #[test]
    fn complete_omits_absent_content() {
        let json = json_line(&GenerationEvent::Complete { content: None });
        assert_eq!(json, r#"{"type":"complete"}"#);
    }

    #[test]
    fn sse_frame_is_newline_delimited() {
        let frame = sse_frame(&GenerationEvent::Error {
            message: "boom".to_string(),
        });
        assert!(frame.starts_with("data: {"));
        assert!(frame.ends_with("\n\n"));
    }

    #[test]
    fn emit_is_best_effort_after_receiver_drops() {
        let (sink, rx) = channel();
        drop(rx);
        // Must not panic or error.
        emit(&sink, GenerationEvent::Complete { content: None });
    }

    #[test]
    fn events_round_trip() {
        let event = GenerationEvent::GenerationComplete {
            run_id: Uuid::new_v4(),
            successful: 8,
            failed: 2,
        };
        let back: GenerationEvent = serde_json::from_str(&json_line(&event)).unwrap();
        assert_eq!(back, event);
    }
}
