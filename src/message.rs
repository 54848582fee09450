//! Message wire models: roles, stop reasons, usage, and the message records.

use serde_json::{Map, Value};

use crate::blocks::{ContentBlock, TextBlock, ToolUseBlock};
use crate::codec::wire_serde;
use crate::enums::open_enum;
use crate::errors::{DecodeError, ValidateError};
use crate::raw::{Decode, Encode, RawObject};
use crate::union::{self, TrialDef, TrialVariantDef};
use crate::validate::Validate;

open_enum! {
    /// Conversational role of a message author.
    Role, "role" {
        User => "user",
        Assistant => "assistant",
        System => "system",
    }
}

open_enum! {
    /// The reason the model stopped generating.
    StopReason, "stop reason" {
        EndTurn => "end_turn",
        MaxTokens => "max_tokens",
        StopSequence => "stop_sequence",
        ToolUse => "tool_use",
        PauseTurn => "pause_turn",
        Refusal => "refusal",
    }
}

open_enum! {
    /// Model identifiers, with `Other` for preview and future models.
    Model, "model" {
        ClaudeOpus4 => "claude-opus-4-20250514",
        ClaudeSonnet4 => "claude-sonnet-4-20250514",
        Claude37Sonnet => "claude-3-7-sonnet-20250219",
        Claude35Haiku => "claude-3-5-haiku-20241022",
    }
}

open_enum! {
    /// Service tier the request was processed under.
    ServiceTier, "service tier" {
        Standard => "standard",
        Priority => "priority",
        Batch => "batch",
    }
}

/// Billing and rate-limit token counts.
#[derive(Debug, Clone, PartialEq)]
pub struct Usage {
    pub input_tokens: i64,
    pub output_tokens: i64,
    pub cache_creation_input_tokens: Option<i64>,
    pub cache_read_input_tokens: Option<i64>,
    pub service_tier: Option<ServiceTier>,
    pub extra: Map<String, Value>,
}

impl Usage {
    /// Total billed tokens for the turn.
    pub fn total(&self) -> i64 {
        self.input_tokens.saturating_add(self.output_tokens)
    }
}

impl Decode for Usage {
    fn decode(value: Value) -> Result<Self, DecodeError> {
        let mut raw = RawObject::from_value(value)?;
        Ok(Self {
            input_tokens: raw.required("input_tokens")?,
            output_tokens: raw.required("output_tokens")?,
            cache_creation_input_tokens: raw.optional("cache_creation_input_tokens")?,
            cache_read_input_tokens: raw.optional("cache_read_input_tokens")?,
            service_tier: raw.optional("service_tier")?,
            extra: raw.into_map(),
        })
    }
}

impl Encode for Usage {
    fn encode(&self) -> Value {
        let mut raw = RawObject::new();
        raw.set_field("input_tokens", &self.input_tokens);
        raw.set_field("output_tokens", &self.output_tokens);
        raw.set_optional(
            "cache_creation_input_tokens",
            &self.cache_creation_input_tokens,
        );
        raw.set_optional("cache_read_input_tokens", &self.cache_read_input_tokens);
        raw.set_optional("service_tier", &self.service_tier);
        raw.extend_extra(&self.extra);
        raw.into_value()
    }
}

impl Validate for Usage {
    fn validate(&self) -> Result<(), ValidateError> {
        self.service_tier
            .validate()
            .map_err(|e| e.at("service_tier"))
    }
}

wire_serde!(Usage);

/// Message content: a bare string or a list of content blocks.
///
/// Trial union; the string alternative is declared (and attempted) first.
#[derive(Debug, Clone, PartialEq)]
pub enum MessageContent {
    Text(String),
    Blocks(Vec<ContentBlock>),
}

static MESSAGE_CONTENT: TrialDef<MessageContent> = TrialDef {
    name: "message content",
    variants: &[
        TrialVariantDef {
            name: "string",
            decode: |v| String::decode(v).map(MessageContent::Text),
        },
        TrialVariantDef {
            name: "blocks",
            decode: |v| Vec::<ContentBlock>::decode(v).map(MessageContent::Blocks),
        },
    ],
};

impl Decode for MessageContent {
    fn decode(value: Value) -> Result<Self, DecodeError> {
        union::decode_trial(&MESSAGE_CONTENT, value)
    }
}

impl Encode for MessageContent {
    fn encode(&self) -> Value {
        match self {
            MessageContent::Text(text) => Value::String(text.clone()),
            MessageContent::Blocks(blocks) => blocks.encode(),
        }
    }
}

impl Validate for MessageContent {
    fn validate(&self) -> Result<(), ValidateError> {
        match self {
            MessageContent::Text(_) => Ok(()),
            MessageContent::Blocks(blocks) => blocks.validate(),
        }
    }
}

wire_serde!(MessageContent);

impl From<&str> for MessageContent {
    fn from(value: &str) -> Self {
        MessageContent::Text(value.to_string())
    }
}

impl From<String> for MessageContent {
    fn from(value: String) -> Self {
        MessageContent::Text(value)
    }
}

impl From<Vec<ContentBlock>> for MessageContent {
    fn from(value: Vec<ContentBlock>) -> Self {
        MessageContent::Blocks(value)
    }
}

/// System prompt: a bare string or a list of text blocks.
#[derive(Debug, Clone, PartialEq)]
pub enum SystemContent {
    Text(String),
    Blocks(Vec<TextBlock>),
}

static SYSTEM_CONTENT: TrialDef<SystemContent> = TrialDef {
    name: "system content",
    variants: &[
        TrialVariantDef {
            name: "string",
            decode: |v| String::decode(v).map(SystemContent::Text),
        },
        TrialVariantDef {
            name: "blocks",
            decode: |v| Vec::<TextBlock>::decode(v).map(SystemContent::Blocks),
        },
    ],
};

impl Decode for SystemContent {
    fn decode(value: Value) -> Result<Self, DecodeError> {
        union::decode_trial(&SYSTEM_CONTENT, value)
    }
}

impl Encode for SystemContent {
    fn encode(&self) -> Value {
        match self {
            SystemContent::Text(text) => Value::String(text.clone()),
            SystemContent::Blocks(blocks) => blocks.encode(),
        }
    }
}

impl Validate for SystemContent {
    fn validate(&self) -> Result<(), ValidateError> {
        match self {
            SystemContent::Text(_) => Ok(()),
            SystemContent::Blocks(blocks) => blocks.validate(),
        }
    }
}

wire_serde!(SystemContent);

impl From<&str> for SystemContent {
    fn from(value: &str) -> Self {
        SystemContent::Text(value.to_string())
    }
}

impl From<String> for SystemContent {
    fn from(value: String) -> Self {
        SystemContent::Text(value)
    }
}

/// A single input turn in a conversation.
#[derive(Debug, Clone, PartialEq)]
pub struct MessageParam {
    pub role: Role,
    pub content: MessageContent,
    pub extra: Map<String, Value>,
}

impl MessageParam {
    pub fn new(role: Role, content: impl Into<MessageContent>) -> Self {
        Self {
            role,
            content: content.into(),
            extra: Map::new(),
        }
    }

    pub fn user(content: impl Into<MessageContent>) -> Self {
        Self::new(Role::User, content)
    }

    pub fn assistant(content: impl Into<MessageContent>) -> Self {
        Self::new(Role::Assistant, content)
    }
}

impl Decode for MessageParam {
    fn decode(value: Value) -> Result<Self, DecodeError> {
        let mut raw = RawObject::from_value(value)?;
        Ok(Self {
            role: raw.required("role")?,
            content: raw.required("content")?,
            extra: raw.into_map(),
        })
    }
}

impl Encode for MessageParam {
    fn encode(&self) -> Value {
        let mut raw = RawObject::new();
        raw.set_field("role", &self.role);
        raw.set_field("content", &self.content);
        raw.extend_extra(&self.extra);
        raw.into_value()
    }
}

impl Validate for MessageParam {
    fn validate(&self) -> Result<(), ValidateError> {
        self.role.validate().map_err(|e| e.at("role"))?;
        self.content.validate().map_err(|e| e.at("content"))
    }
}

wire_serde!(MessageParam);

/// A complete assistant message returned by the API.
#[derive(Debug, Clone, PartialEq)]
pub struct Message {
    pub id: String,
    pub role: Role,
    pub content: Vec<ContentBlock>,
    pub model: Model,
    pub stop_reason: Option<StopReason>,
    pub stop_sequence: Option<String>,
    pub usage: Usage,
    pub extra: Map<String, Value>,
}

impl Message {
    pub const TYPE: &'static str = "message";

    /// Concatenated text of all text blocks.
    pub fn text(&self) -> String {
        let mut out = String::new();
        for block in &self.content {
            if let ContentBlock::Text(text) = block {
                out.push_str(&text.text);
            }
        }
        out
    }

    /// Tool invocations requested by this message, in order.
    pub fn tool_uses(&self) -> impl Iterator<Item = &ToolUseBlock> {
        self.content.iter().filter_map(ContentBlock::as_tool_use)
    }
}

impl Decode for Message {
    fn decode(value: Value) -> Result<Self, DecodeError> {
        let mut raw = RawObject::from_value(value)?;
        raw.expect_tag(Self::TYPE)?;
        Ok(Self {
            id: raw.required("id")?,
            role: raw.required("role")?,
            content: raw.required("content")?,
            model: raw.required("model")?,
            stop_reason: raw.optional("stop_reason")?,
            stop_sequence: raw.optional("stop_sequence")?,
            usage: raw.required("usage")?,
            extra: raw.into_map(),
        })
    }
}

impl Encode for Message {
    fn encode(&self) -> Value {
        let mut raw = RawObject::tagged(Self::TYPE);
        raw.set_field("id", &self.id);
        raw.set_field("role", &self.role);
        raw.set_field("content", &self.content);
        raw.set_field("model", &self.model);
        raw.set_optional("stop_reason", &self.stop_reason);
        raw.set_optional("stop_sequence", &self.stop_sequence);
        raw.set_field("usage", &self.usage);
        raw.extend_extra(&self.extra);
        raw.into_value()
    }
}

impl Validate for Message {
    fn validate(&self) -> Result<(), ValidateError> {
        self.role.validate().map_err(|e| e.at("role"))?;
        self.content.validate().map_err(|e| e.at("content"))?;
        self.model.validate().map_err(|e| e.at("model"))?;
        self.stop_reason
            .validate()
            .map_err(|e| e.at("stop_reason"))?;
        self.usage.validate().map_err(|e| e.at("usage"))
    }
}

wire_serde!(Message);

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    fn message_payload() -> Value {
        json!({
            "id": "msg_01ABC",
            "type": "message",
            "role": "assistant",
            "content": [
                {"type": "text", "text": "Let me check."},
                {"type": "tool_use", "id": "toolu_1", "name": "get_weather", "input": {"city": "Paris"}}
            ],
            "model": "claude-sonnet-4-20250514",
            "stop_reason": "tool_use",
            "stop_sequence": null,
            "usage": {"input_tokens": 12, "output_tokens": 34}
        })
    }

    #[test]
    fn message_decodes_with_typed_accessors() {
        let message = Message::decode(message_payload()).unwrap();
        assert_eq!(message.id, "msg_01ABC");
        assert_eq!(message.role, Role::Assistant);
        assert_eq!(message.model, Model::ClaudeSonnet4);
        assert_eq!(message.stop_reason, Some(StopReason::ToolUse));
        assert_eq!(message.stop_sequence, None);
        assert_eq!(message.text(), "Let me check.");
        let uses: Vec<_> = message.tool_uses().collect();
        assert_eq!(uses.len(), 1);
        assert_eq!(uses[0].name, "get_weather");
        assert!(message.validate().is_ok());
    }

    #[test]
    fn usage_total_is_computed() {
        let usage = Usage::decode(json!({"input_tokens": 10, "output_tokens": 5})).unwrap();
        assert_eq!(usage.total(), 15);
        assert_eq!(usage.cache_read_input_tokens, None);
    }

    #[test]
    fn message_content_string_and_blocks_dispatch_in_order() {
        let text = MessageContent::decode(json!("hello")).unwrap();
        assert_eq!(text, MessageContent::Text("hello".into()));

        let blocks = MessageContent::decode(json!([{"type": "text", "text": "hi"}])).unwrap();
        assert!(matches!(blocks, MessageContent::Blocks(b) if b.len() == 1));
    }

    #[test]
    fn future_model_id_round_trips_and_fails_strict_validation() {
        let mut payload = message_payload();
        payload["model"] = json!("claude-future-9");
        let message = Message::decode(payload).unwrap();
        assert!(matches!(&message.model, Model::Other(m) if m == "claude-future-9"));
        assert_eq!(message.encode()["model"], json!("claude-future-9"));
        let err = message.validate().unwrap_err();
        assert_eq!(err.to_string(), "model: unrecognized model value `claude-future-9`");
    }

    #[test]
    fn missing_usage_is_a_missing_required_field() {
        let mut payload = message_payload();
        payload.as_object_mut().unwrap().remove("usage");
        let err = Message::decode(payload).unwrap_err();
        assert!(matches!(
            err,
            DecodeError::MissingRequiredField { field: "usage" }
        ));
    }
}
