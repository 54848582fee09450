//! Streaming event wire models.
//!
//! These are the JSON payloads carried by SSE events; transport framing is
//! the HTTP layer's concern. Every event carries its own `"type"` literal, so
//! a stream of heterogeneous events decodes through one discriminated union.

use serde_json::{Map, Value};

use crate::blocks::ContentBlock;
use crate::citations::Citation;
use crate::codec::wire_serde;
use crate::enums::open_enum;
use crate::errors::{DecodeError, ValidateError};
use crate::message::{Message, StopReason};
use crate::raw::{Decode, Encode, RawObject};
use crate::union::{self, UnionDef, UnknownVariant, VariantDef};
use crate::validate::Validate;

open_enum! {
    /// Error kinds reported by the API inside an `error` event.
    ErrorKind, "error kind" {
        InvalidRequestError => "invalid_request_error",
        AuthenticationError => "authentication_error",
        PermissionError => "permission_error",
        NotFoundError => "not_found_error",
        RateLimitError => "rate_limit_error",
        ApiError => "api_error",
        OverloadedError => "overloaded_error",
    }
}

/// Error payload carried by an `error` event.
#[derive(Debug, Clone, PartialEq)]
pub struct ApiErrorDetail {
    pub kind: ErrorKind,
    pub message: String,
    pub extra: Map<String, Value>,
}

impl Decode for ApiErrorDetail {
    fn decode(value: Value) -> Result<Self, DecodeError> {
        let mut raw = RawObject::from_value(value)?;
        Ok(Self {
            kind: raw.required("type")?,
            message: raw.required("message")?,
            extra: raw.into_map(),
        })
    }
}

impl Encode for ApiErrorDetail {
    fn encode(&self) -> Value {
        let mut raw = RawObject::new();
        raw.set_field("type", &self.kind);
        raw.set_field("message", &self.message);
        raw.extend_extra(&self.extra);
        raw.into_value()
    }
}

impl Validate for ApiErrorDetail {
    fn validate(&self) -> Result<(), ValidateError> {
        self.kind.validate().map_err(|e| e.at("type"))
    }
}

wire_serde!(ApiErrorDetail);

/// Top-of-message fields updated at the end of a streamed turn.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct MessageDelta {
    pub stop_reason: Option<StopReason>,
    pub stop_sequence: Option<String>,
    pub extra: Map<String, Value>,
}

impl Decode for MessageDelta {
    fn decode(value: Value) -> Result<Self, DecodeError> {
        let mut raw = RawObject::from_value(value)?;
        Ok(Self {
            stop_reason: raw.optional("stop_reason")?,
            stop_sequence: raw.optional("stop_sequence")?,
            extra: raw.into_map(),
        })
    }
}

impl Encode for MessageDelta {
    fn encode(&self) -> Value {
        let mut raw = RawObject::new();
        raw.set_optional("stop_reason", &self.stop_reason);
        raw.set_optional("stop_sequence", &self.stop_sequence);
        raw.extend_extra(&self.extra);
        raw.into_value()
    }
}

impl Validate for MessageDelta {
    fn validate(&self) -> Result<(), ValidateError> {
        self.stop_reason
            .validate()
            .map_err(|e| e.at("stop_reason"))
    }
}

wire_serde!(MessageDelta);

/// Cumulative usage reported alongside a message delta.
#[derive(Debug, Clone, PartialEq)]
pub struct MessageDeltaUsage {
    pub output_tokens: i64,
    pub input_tokens: Option<i64>,
    pub cache_creation_input_tokens: Option<i64>,
    pub cache_read_input_tokens: Option<i64>,
    pub extra: Map<String, Value>,
}

impl Decode for MessageDeltaUsage {
    fn decode(value: Value) -> Result<Self, DecodeError> {
        let mut raw = RawObject::from_value(value)?;
        Ok(Self {
            output_tokens: raw.required("output_tokens")?,
            input_tokens: raw.optional("input_tokens")?,
            cache_creation_input_tokens: raw.optional("cache_creation_input_tokens")?,
            cache_read_input_tokens: raw.optional("cache_read_input_tokens")?,
            extra: raw.into_map(),
        })
    }
}

impl Encode for MessageDeltaUsage {
    fn encode(&self) -> Value {
        let mut raw = RawObject::new();
        raw.set_field("output_tokens", &self.output_tokens);
        raw.set_optional("input_tokens", &self.input_tokens);
        raw.set_optional(
            "cache_creation_input_tokens",
            &self.cache_creation_input_tokens,
        );
        raw.set_optional("cache_read_input_tokens", &self.cache_read_input_tokens);
        raw.extend_extra(&self.extra);
        raw.into_value()
    }
}

impl Validate for MessageDeltaUsage {
    fn validate(&self) -> Result<(), ValidateError> {
        Ok(())
    }
}

wire_serde!(MessageDeltaUsage);

/// Incremental text for a text block.
#[derive(Debug, Clone, PartialEq)]
pub struct TextDelta {
    pub text: String,
    pub extra: Map<String, Value>,
}

impl TextDelta {
    pub const TYPE: &'static str = "text_delta";
}

impl Decode for TextDelta {
    fn decode(value: Value) -> Result<Self, DecodeError> {
        let mut raw = RawObject::from_value(value)?;
        raw.expect_tag(Self::TYPE)?;
        Ok(Self {
            text: raw.required("text")?,
            extra: raw.into_map(),
        })
    }
}

impl Encode for TextDelta {
    fn encode(&self) -> Value {
        let mut raw = RawObject::tagged(Self::TYPE);
        raw.set_field("text", &self.text);
        raw.extend_extra(&self.extra);
        raw.into_value()
    }
}

impl Validate for TextDelta {
    fn validate(&self) -> Result<(), ValidateError> {
        Ok(())
    }
}

wire_serde!(TextDelta);

/// Incremental JSON for a tool-use block's input.
#[derive(Debug, Clone, PartialEq)]
pub struct InputJsonDelta {
    pub partial_json: String,
    pub extra: Map<String, Value>,
}

impl InputJsonDelta {
    pub const TYPE: &'static str = "input_json_delta";
}

impl Decode for InputJsonDelta {
    fn decode(value: Value) -> Result<Self, DecodeError> {
        let mut raw = RawObject::from_value(value)?;
        raw.expect_tag(Self::TYPE)?;
        Ok(Self {
            partial_json: raw.required("partial_json")?,
            extra: raw.into_map(),
        })
    }
}

impl Encode for InputJsonDelta {
    fn encode(&self) -> Value {
        let mut raw = RawObject::tagged(Self::TYPE);
        raw.set_field("partial_json", &self.partial_json);
        raw.extend_extra(&self.extra);
        raw.into_value()
    }
}

impl Validate for InputJsonDelta {
    fn validate(&self) -> Result<(), ValidateError> {
        Ok(())
    }
}

wire_serde!(InputJsonDelta);

/// Incremental thinking text.
#[derive(Debug, Clone, PartialEq)]
pub struct ThinkingDelta {
    pub thinking: String,
    pub extra: Map<String, Value>,
}

impl ThinkingDelta {
    pub const TYPE: &'static str = "thinking_delta";
}

impl Decode for ThinkingDelta {
    fn decode(value: Value) -> Result<Self, DecodeError> {
        let mut raw = RawObject::from_value(value)?;
        raw.expect_tag(Self::TYPE)?;
        Ok(Self {
            thinking: raw.required("thinking")?,
            extra: raw.into_map(),
        })
    }
}

impl Encode for ThinkingDelta {
    fn encode(&self) -> Value {
        let mut raw = RawObject::tagged(Self::TYPE);
        raw.set_field("thinking", &self.thinking);
        raw.extend_extra(&self.extra);
        raw.into_value()
    }
}

impl Validate for ThinkingDelta {
    fn validate(&self) -> Result<(), ValidateError> {
        Ok(())
    }
}

wire_serde!(ThinkingDelta);

/// Signature for a completed thinking block.
#[derive(Debug, Clone, PartialEq)]
pub struct SignatureDelta {
    pub signature: String,
    pub extra: Map<String, Value>,
}

impl SignatureDelta {
    pub const TYPE: &'static str = "signature_delta";
}

impl Decode for SignatureDelta {
    fn decode(value: Value) -> Result<Self, DecodeError> {
        let mut raw = RawObject::from_value(value)?;
        raw.expect_tag(Self::TYPE)?;
        Ok(Self {
            signature: raw.required("signature")?,
            extra: raw.into_map(),
        })
    }
}

impl Encode for SignatureDelta {
    fn encode(&self) -> Value {
        let mut raw = RawObject::tagged(Self::TYPE);
        raw.set_field("signature", &self.signature);
        raw.extend_extra(&self.extra);
        raw.into_value()
    }
}

impl Validate for SignatureDelta {
    fn validate(&self) -> Result<(), ValidateError> {
        Ok(())
    }
}

wire_serde!(SignatureDelta);

/// A citation attached to the block mid-stream.
#[derive(Debug, Clone, PartialEq)]
pub struct CitationsDelta {
    pub citation: Citation,
    pub extra: Map<String, Value>,
}

impl CitationsDelta {
    pub const TYPE: &'static str = "citations_delta";
}

impl Decode for CitationsDelta {
    fn decode(value: Value) -> Result<Self, DecodeError> {
        let mut raw = RawObject::from_value(value)?;
        raw.expect_tag(Self::TYPE)?;
        Ok(Self {
            citation: raw.required("citation")?,
            extra: raw.into_map(),
        })
    }
}

impl Encode for CitationsDelta {
    fn encode(&self) -> Value {
        let mut raw = RawObject::tagged(Self::TYPE);
        raw.set_field("citation", &self.citation);
        raw.extend_extra(&self.extra);
        raw.into_value()
    }
}

impl Validate for CitationsDelta {
    fn validate(&self) -> Result<(), ValidateError> {
        self.citation.validate().map_err(|e| e.at("citation"))
    }
}

wire_serde!(CitationsDelta);

/// Incremental update to one content block.
#[derive(Debug, Clone, PartialEq)]
pub enum ContentBlockDelta {
    Text(TextDelta),
    InputJson(InputJsonDelta),
    Thinking(ThinkingDelta),
    Signature(SignatureDelta),
    Citations(CitationsDelta),
    Unknown(UnknownVariant),
}

static CONTENT_BLOCK_DELTA: UnionDef<ContentBlockDelta> = UnionDef {
    name: "content block delta",
    variants: &[
        VariantDef {
            tag: TextDelta::TYPE,
            decode: |v| TextDelta::decode(v).map(ContentBlockDelta::Text),
        },
        VariantDef {
            tag: InputJsonDelta::TYPE,
            decode: |v| InputJsonDelta::decode(v).map(ContentBlockDelta::InputJson),
        },
        VariantDef {
            tag: ThinkingDelta::TYPE,
            decode: |v| ThinkingDelta::decode(v).map(ContentBlockDelta::Thinking),
        },
        VariantDef {
            tag: SignatureDelta::TYPE,
            decode: |v| SignatureDelta::decode(v).map(ContentBlockDelta::Signature),
        },
        VariantDef {
            tag: CitationsDelta::TYPE,
            decode: |v| CitationsDelta::decode(v).map(ContentBlockDelta::Citations),
        },
    ],
};

impl Decode for ContentBlockDelta {
    fn decode(value: Value) -> Result<Self, DecodeError> {
        union::decode_tagged(&CONTENT_BLOCK_DELTA, ContentBlockDelta::Unknown, value)
    }
}

impl Encode for ContentBlockDelta {
    fn encode(&self) -> Value {
        match self {
            ContentBlockDelta::Text(d) => d.encode(),
            ContentBlockDelta::InputJson(d) => d.encode(),
            ContentBlockDelta::Thinking(d) => d.encode(),
            ContentBlockDelta::Signature(d) => d.encode(),
            ContentBlockDelta::Citations(d) => d.encode(),
            ContentBlockDelta::Unknown(unknown) => unknown.raw().clone(),
        }
    }
}

impl Validate for ContentBlockDelta {
    fn validate(&self) -> Result<(), ValidateError> {
        match self {
            ContentBlockDelta::Text(d) => d.validate(),
            ContentBlockDelta::InputJson(d) => d.validate(),
            ContentBlockDelta::Thinking(d) => d.validate(),
            ContentBlockDelta::Signature(d) => d.validate(),
            ContentBlockDelta::Citations(d) => d.validate(),
            ContentBlockDelta::Unknown(unknown) => Err(ValidateError::UnrecognizedVariant {
                union: "content block delta",
                tag: unknown.tag().map(str::to_owned),
            }),
        }
    }
}

wire_serde!(ContentBlockDelta);

/// Start of a streamed message.
#[derive(Debug, Clone, PartialEq)]
pub struct MessageStartEvent {
    pub message: Message,
    pub extra: Map<String, Value>,
}

impl MessageStartEvent {
    pub const TYPE: &'static str = "message_start";
}

impl Decode for MessageStartEvent {
    fn decode(value: Value) -> Result<Self, DecodeError> {
        let mut raw = RawObject::from_value(value)?;
        raw.expect_tag(Self::TYPE)?;
        Ok(Self {
            message: raw.required("message")?,
            extra: raw.into_map(),
        })
    }
}

impl Encode for MessageStartEvent {
    fn encode(&self) -> Value {
        let mut raw = RawObject::tagged(Self::TYPE);
        raw.set_field("message", &self.message);
        raw.extend_extra(&self.extra);
        raw.into_value()
    }
}

impl Validate for MessageStartEvent {
    fn validate(&self) -> Result<(), ValidateError> {
        self.message.validate().map_err(|e| e.at("message"))
    }
}

wire_serde!(MessageStartEvent);

/// End-of-turn updates to the message plus cumulative usage.
#[derive(Debug, Clone, PartialEq)]
pub struct MessageDeltaEvent {
    pub delta: MessageDelta,
    pub usage: MessageDeltaUsage,
    pub extra: Map<String, Value>,
}

impl MessageDeltaEvent {
    pub const TYPE: &'static str = "message_delta";
}

impl Decode for MessageDeltaEvent {
    fn decode(value: Value) -> Result<Self, DecodeError> {
        let mut raw = RawObject::from_value(value)?;
        raw.expect_tag(Self::TYPE)?;
        Ok(Self {
            delta: raw.required("delta")?,
            usage: raw.required("usage")?,
            extra: raw.into_map(),
        })
    }
}

impl Encode for MessageDeltaEvent {
    fn encode(&self) -> Value {
        let mut raw = RawObject::tagged(Self::TYPE);
        raw.set_field("delta", &self.delta);
        raw.set_field("usage", &self.usage);
        raw.extend_extra(&self.extra);
        raw.into_value()
    }
}

impl Validate for MessageDeltaEvent {
    fn validate(&self) -> Result<(), ValidateError> {
        self.delta.validate().map_err(|e| e.at("delta"))?;
        self.usage.validate().map_err(|e| e.at("usage"))
    }
}

wire_serde!(MessageDeltaEvent);

/// End of a streamed message.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct MessageStopEvent {
    pub extra: Map<String, Value>,
}

impl MessageStopEvent {
    pub const TYPE: &'static str = "message_stop";
}

impl Decode for MessageStopEvent {
    fn decode(value: Value) -> Result<Self, DecodeError> {
        let mut raw = RawObject::from_value(value)?;
        raw.expect_tag(Self::TYPE)?;
        Ok(Self {
            extra: raw.into_map(),
        })
    }
}

impl Encode for MessageStopEvent {
    fn encode(&self) -> Value {
        let mut raw = RawObject::tagged(Self::TYPE);
        raw.extend_extra(&self.extra);
        raw.into_value()
    }
}

impl Validate for MessageStopEvent {
    fn validate(&self) -> Result<(), ValidateError> {
        Ok(())
    }
}

wire_serde!(MessageStopEvent);

/// A new content block opened at `index`.
#[derive(Debug, Clone, PartialEq)]
pub struct ContentBlockStartEvent {
    pub index: i64,
    pub content_block: ContentBlock,
    pub extra: Map<String, Value>,
}

impl ContentBlockStartEvent {
    pub const TYPE: &'static str = "content_block_start";
}

impl Decode for ContentBlockStartEvent {
    fn decode(value: Value) -> Result<Self, DecodeError> {
        let mut raw = RawObject::from_value(value)?;
        raw.expect_tag(Self::TYPE)?;
        Ok(Self {
            index: raw.required("index")?,
            content_block: raw.required("content_block")?,
            extra: raw.into_map(),
        })
    }
}

impl Encode for ContentBlockStartEvent {
    fn encode(&self) -> Value {
        let mut raw = RawObject::tagged(Self::TYPE);
        raw.set_field("index", &self.index);
        raw.set_field("content_block", &self.content_block);
        raw.extend_extra(&self.extra);
        raw.into_value()
    }
}

impl Validate for ContentBlockStartEvent {
    fn validate(&self) -> Result<(), ValidateError> {
        self.content_block
            .validate()
            .map_err(|e| e.at("content_block"))
    }
}

wire_serde!(ContentBlockStartEvent);

/// An incremental update to the block at `index`.
#[derive(Debug, Clone, PartialEq)]
pub struct ContentBlockDeltaEvent {
    pub index: i64,
    pub delta: ContentBlockDelta,
    pub extra: Map<String, Value>,
}

impl ContentBlockDeltaEvent {
    pub const TYPE: &'static str = "content_block_delta";
}

impl Decode for ContentBlockDeltaEvent {
    fn decode(value: Value) -> Result<Self, DecodeError> {
        let mut raw = RawObject::from_value(value)?;
        raw.expect_tag(Self::TYPE)?;
        Ok(Self {
            index: raw.required("index")?,
            delta: raw.required("delta")?,
            extra: raw.into_map(),
        })
    }
}

impl Encode for ContentBlockDeltaEvent {
    fn encode(&self) -> Value {
        let mut raw = RawObject::tagged(Self::TYPE);
        raw.set_field("index", &self.index);
        raw.set_field("delta", &self.delta);
        raw.extend_extra(&self.extra);
        raw.into_value()
    }
}

impl Validate for ContentBlockDeltaEvent {
    fn validate(&self) -> Result<(), ValidateError> {
        self.delta.validate().map_err(|e| e.at("delta"))
    }
}

wire_serde!(ContentBlockDeltaEvent);

/// The block at `index` is complete.
#[derive(Debug, Clone, PartialEq)]
pub struct ContentBlockStopEvent {
    pub index: i64,
    pub extra: Map<String, Value>,
}

impl ContentBlockStopEvent {
    pub const TYPE: &'static str = "content_block_stop";
}

impl Decode for ContentBlockStopEvent {
    fn decode(value: Value) -> Result<Self, DecodeError> {
        let mut raw = RawObject::from_value(value)?;
        raw.expect_tag(Self::TYPE)?;
        Ok(Self {
            index: raw.required("index")?,
            extra: raw.into_map(),
        })
    }
}

impl Encode for ContentBlockStopEvent {
    fn encode(&self) -> Value {
        let mut raw = RawObject::tagged(Self::TYPE);
        raw.set_field("index", &self.index);
        raw.extend_extra(&self.extra);
        raw.into_value()
    }
}

impl Validate for ContentBlockStopEvent {
    fn validate(&self) -> Result<(), ValidateError> {
        Ok(())
    }
}

wire_serde!(ContentBlockStopEvent);

/// Keep-alive.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct PingEvent {
    pub extra: Map<String, Value>,
}

impl PingEvent {
    pub const TYPE: &'static str = "ping";
}

impl Decode for PingEvent {
    fn decode(value: Value) -> Result<Self, DecodeError> {
        let mut raw = RawObject::from_value(value)?;
        raw.expect_tag(Self::TYPE)?;
        Ok(Self {
            extra: raw.into_map(),
        })
    }
}

impl Encode for PingEvent {
    fn encode(&self) -> Value {
        let mut raw = RawObject::tagged(Self::TYPE);
        raw.extend_extra(&self.extra);
        raw.into_value()
    }
}

impl Validate for PingEvent {
    fn validate(&self) -> Result<(), ValidateError> {
        Ok(())
    }
}

wire_serde!(PingEvent);

/// Mid-stream error reported by the API.
#[derive(Debug, Clone, PartialEq)]
pub struct ErrorEvent {
    pub error: ApiErrorDetail,
    pub extra: Map<String, Value>,
}

impl ErrorEvent {
    pub const TYPE: &'static str = "error";
}

impl Decode for ErrorEvent {
    fn decode(value: Value) -> Result<Self, DecodeError> {
        let mut raw = RawObject::from_value(value)?;
        raw.expect_tag(Self::TYPE)?;
        Ok(Self {
            error: raw.required("error")?,
            extra: raw.into_map(),
        })
    }
}

impl Encode for ErrorEvent {
    fn encode(&self) -> Value {
        let mut raw = RawObject::tagged(Self::TYPE);
        raw.set_field("error", &self.error);
        raw.extend_extra(&self.extra);
        raw.into_value()
    }
}

impl Validate for ErrorEvent {
    fn validate(&self) -> Result<(), ValidateError> {
        self.error.validate().map_err(|e| e.at("error"))
    }
}

wire_serde!(ErrorEvent);

/// One event in a streamed message response.
#[derive(Debug, Clone, PartialEq)]
pub enum StreamEvent {
    MessageStart(MessageStartEvent),
    MessageDelta(MessageDeltaEvent),
    MessageStop(MessageStopEvent),
    ContentBlockStart(ContentBlockStartEvent),
    ContentBlockDelta(ContentBlockDeltaEvent),
    ContentBlockStop(ContentBlockStopEvent),
    Ping(PingEvent),
    Error(ErrorEvent),
    /// Event kind added by a newer server version; preserved verbatim.
    Unknown(UnknownVariant),
}

static STREAM_EVENT: UnionDef<StreamEvent> = UnionDef {
    name: "stream event",
    variants: &[
        VariantDef {
            tag: MessageStartEvent::TYPE,
            decode: |v| MessageStartEvent::decode(v).map(StreamEvent::MessageStart),
        },
        VariantDef {
            tag: MessageDeltaEvent::TYPE,
            decode: |v| MessageDeltaEvent::decode(v).map(StreamEvent::MessageDelta),
        },
        VariantDef {
            tag: MessageStopEvent::TYPE,
            decode: |v| MessageStopEvent::decode(v).map(StreamEvent::MessageStop),
        },
        VariantDef {
            tag: ContentBlockStartEvent::TYPE,
            decode: |v| ContentBlockStartEvent::decode(v).map(StreamEvent::ContentBlockStart),
        },
        VariantDef {
            tag: ContentBlockDeltaEvent::TYPE,
            decode: |v| ContentBlockDeltaEvent::decode(v).map(StreamEvent::ContentBlockDelta),
        },
        VariantDef {
            tag: ContentBlockStopEvent::TYPE,
            decode: |v| ContentBlockStopEvent::decode(v).map(StreamEvent::ContentBlockStop),
        },
        VariantDef {
            tag: PingEvent::TYPE,
            decode: |v| PingEvent::decode(v).map(StreamEvent::Ping),
        },
        VariantDef {
            tag: ErrorEvent::TYPE,
            decode: |v| ErrorEvent::decode(v).map(StreamEvent::Error),
        },
    ],
};

impl StreamEvent {
    /// Incremental assistant text carried by this event, if any.
    pub fn text_delta(&self) -> Option<&str> {
        match self {
            StreamEvent::ContentBlockDelta(event) => match &event.delta {
                ContentBlockDelta::Text(delta) => Some(&delta.text),
                _ => None,
            },
            _ => None,
        }
    }
}

impl Decode for StreamEvent {
    fn decode(value: Value) -> Result<Self, DecodeError> {
        union::decode_tagged(&STREAM_EVENT, StreamEvent::Unknown, value)
    }
}

impl Encode for StreamEvent {
    fn encode(&self) -> Value {
        match self {
            StreamEvent::MessageStart(e) => e.encode(),
            StreamEvent::MessageDelta(e) => e.encode(),
            StreamEvent::MessageStop(e) => e.encode(),
            StreamEvent::ContentBlockStart(e) => e.encode(),
            StreamEvent::ContentBlockDelta(e) => e.encode(),
            StreamEvent::ContentBlockStop(e) => e.encode(),
            StreamEvent::Ping(e) => e.encode(),
            StreamEvent::Error(e) => e.encode(),
            StreamEvent::Unknown(unknown) => unknown.raw().clone(),
        }
    }
}

impl Validate for StreamEvent {
    fn validate(&self) -> Result<(), ValidateError> {
        match self {
            StreamEvent::MessageStart(e) => e.validate(),
            StreamEvent::MessageDelta(e) => e.validate(),
            StreamEvent::MessageStop(e) => e.validate(),
            StreamEvent::ContentBlockStart(e) => e.validate(),
            StreamEvent::ContentBlockDelta(e) => e.validate(),
            StreamEvent::ContentBlockStop(e) => e.validate(),
            StreamEvent::Ping(e) => e.validate(),
            StreamEvent::Error(e) => e.validate(),
            StreamEvent::Unknown(unknown) => Err(ValidateError::UnrecognizedVariant {
                union: "stream event",
                tag: unknown.tag().map(str::to_owned),
            }),
        }
    }
}

wire_serde!(StreamEvent);

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn delta_event_exposes_text() {
        let event = StreamEvent::decode(json!({
            "type": "content_block_delta",
            "index": 0,
            "delta": {"type": "text_delta", "text": "Hel"}
        }))
        .unwrap();
        assert_eq!(event.text_delta(), Some("Hel"));
        assert!(event.validate().is_ok());
    }

    #[test]
    fn ping_and_stop_events_round_trip() {
        for payload in [
            json!({"type": "ping"}),
            json!({"type": "message_stop"}),
            json!({"type": "content_block_stop", "index": 2}),
        ] {
            let event = StreamEvent::decode(payload.clone()).unwrap();
            assert_eq!(event.encode(), payload);
        }
    }

    #[test]
    fn message_delta_carries_stop_reason_and_usage() {
        let event = StreamEvent::decode(json!({
            "type": "message_delta",
            "delta": {"stop_reason": "end_turn", "stop_sequence": null},
            "usage": {"output_tokens": 42}
        }))
        .unwrap();
        match &event {
            StreamEvent::MessageDelta(e) => {
                assert_eq!(e.delta.stop_reason, Some(StopReason::EndTurn));
                assert_eq!(e.usage.output_tokens, 42);
            }
            other => panic!("expected message_delta, got {other:?}"),
        }
    }

    #[test]
    fn error_event_kind_is_an_open_enum() {
        let event = StreamEvent::decode(json!({
            "type": "error",
            "error": {"type": "overloaded_error", "message": "try later"}
        }))
        .unwrap();
        match &event {
            StreamEvent::Error(e) => assert_eq!(e.error.kind, ErrorKind::OverloadedError),
            other => panic!("expected error event, got {other:?}"),
        }

        let future = StreamEvent::decode(json!({
            "type": "error",
            "error": {"type": "quota_exceeded_error", "message": "no"}
        }))
        .unwrap();
        let err = future.validate().unwrap_err();
        assert_eq!(
            err.to_string(),
            "error.type: unrecognized error kind value `quota_exceeded_error`"
        );
    }

    #[test]
    fn unknown_event_kind_decodes_and_fails_validation() {
        let payload = json!({"type": "usage_report", "tokens": 9});
        let event = StreamEvent::decode(payload.clone()).unwrap();
        assert!(matches!(&event, StreamEvent::Unknown(u) if u.tag() == Some("usage_report")));
        assert_eq!(event.encode(), payload);
        assert!(event.validate().is_err());
    }

    #[test]
    fn citations_delta_nests_the_citation_union() {
        let event = StreamEvent::decode(json!({
            "type": "content_block_delta",
            "index": 1,
            "delta": {
                "type": "citations_delta",
                "citation": {
                    "type": "char_location",
                    "cited_text": "quoted",
                    "document_index": 0,
                    "start_char_index": 5,
                    "end_char_index": 11
                }
            }
        }))
        .unwrap();
        assert!(event.validate().is_ok());
    }
}
