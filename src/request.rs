//! Request payload for the messages endpoint, with a fluent builder.

use serde_json::{Map, Value};

use crate::codec::wire_serde;
use crate::errors::{DecodeError, Error, Result, ValidateError};
use crate::message::{MessageContent, MessageParam, Model, Role, SystemContent};
use crate::raw::{Decode, Encode, RawObject};
use crate::tools::{ThinkingConfig, Tool, ToolChoice};
use crate::validate::Validate;

/// Caller-supplied metadata attached to a request.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct RequestMetadata {
    /// Opaque end-user identifier for abuse detection. Not PII.
    pub user_id: Option<String>,
    pub extra: Map<String, Value>,
}

impl Decode for RequestMetadata {
    fn decode(value: Value) -> Result<Self, DecodeError> {
        let mut raw = RawObject::from_value(value)?;
        Ok(Self {
            user_id: raw.optional("user_id")?,
            extra: raw.into_map(),
        })
    }
}

impl Encode for RequestMetadata {
    fn encode(&self) -> Value {
        let mut raw = RawObject::new();
        raw.set_optional("user_id", &self.user_id);
        raw.extend_extra(&self.extra);
        raw.into_value()
    }
}

impl Validate for RequestMetadata {
    fn validate(&self) -> Result<(), ValidateError> {
        Ok(())
    }
}

wire_serde!(RequestMetadata);

/// Request payload for `POST /v1/messages`.
#[derive(Debug, Clone, PartialEq)]
pub struct MessagesRequest {
    pub model: Model,
    pub messages: Vec<MessageParam>,
    pub max_tokens: i64,
    pub system: Option<SystemContent>,
    pub temperature: Option<f64>,
    pub top_p: Option<f64>,
    pub top_k: Option<i64>,
    pub stop_sequences: Option<Vec<String>>,
    pub stream: Option<bool>,
    pub tools: Option<Vec<Tool>>,
    pub tool_choice: Option<ToolChoice>,
    pub thinking: Option<ThinkingConfig>,
    pub metadata: Option<RequestMetadata>,
    pub extra: Map<String, Value>,
}

impl MessagesRequest {
    /// Fluent builder; checks request rules in `build()`.
    pub fn builder(model: impl Into<Model>, max_tokens: i64) -> MessagesRequestBuilder {
        MessagesRequestBuilder::new(model, max_tokens)
    }

    /// Request-level rules, checked without recursing into open enums so a
    /// freshly-built request may target a model this crate does not know yet.
    fn check_rules(&self) -> Result<(), ValidateError> {
        if matches!(&self.model, Model::Other(m) if m.trim().is_empty()) {
            return Err(ValidateError::invalid("model", "model is required"));
        }
        if self.messages.is_empty() {
            return Err(ValidateError::invalid(
                "messages",
                "at least one message is required",
            ));
        }
        if self.max_tokens <= 0 {
            return Err(ValidateError::invalid(
                "max_tokens",
                "must be a positive integer",
            ));
        }
        if let Some(temperature) = self.temperature {
            if !(0.0..=1.0).contains(&temperature) {
                return Err(ValidateError::invalid(
                    "temperature",
                    "must be between 0 and 1",
                ));
            }
        }
        Ok(())
    }
}

impl Decode for MessagesRequest {
    fn decode(value: Value) -> Result<Self, DecodeError> {
        let mut raw = RawObject::from_value(value)?;
        Ok(Self {
            model: raw.required("model")?,
            messages: raw.required("messages")?,
            max_tokens: raw.required("max_tokens")?,
            system: raw.optional("system")?,
            temperature: raw.optional("temperature")?,
            top_p: raw.optional("top_p")?,
            top_k: raw.optional("top_k")?,
            stop_sequences: raw.optional("stop_sequences")?,
            stream: raw.optional("stream")?,
            tools: raw.optional("tools")?,
            tool_choice: raw.optional("tool_choice")?,
            thinking: raw.optional("thinking")?,
            metadata: raw.optional("metadata")?,
            extra: raw.into_map(),
        })
    }
}

impl Encode for MessagesRequest {
    fn encode(&self) -> Value {
        let mut raw = RawObject::new();
        raw.set_field("model", &self.model);
        raw.set_field("messages", &self.messages);
        raw.set_field("max_tokens", &self.max_tokens);
        raw.set_optional("system", &self.system);
        raw.set_optional("temperature", &self.temperature);
        raw.set_optional("top_p", &self.top_p);
        raw.set_optional("top_k", &self.top_k);
        raw.set_optional("stop_sequences", &self.stop_sequences);
        raw.set_optional("stream", &self.stream);
        raw.set_optional("tools", &self.tools);
        raw.set_optional("tool_choice", &self.tool_choice);
        raw.set_optional("thinking", &self.thinking);
        raw.set_optional("metadata", &self.metadata);
        raw.extend_extra(&self.extra);
        raw.into_value()
    }
}

impl Validate for MessagesRequest {
    fn validate(&self) -> Result<(), ValidateError> {
        self.check_rules()?;
        self.model.validate().map_err(|e| e.at("model"))?;
        self.messages.validate().map_err(|e| e.at("messages"))?;
        self.system.validate().map_err(|e| e.at("system"))?;
        self.tools.validate().map_err(|e| e.at("tools"))?;
        self.tool_choice
            .validate()
            .map_err(|e| e.at("tool_choice"))?;
        self.thinking.validate().map_err(|e| e.at("thinking"))?;
        self.metadata.validate().map_err(|e| e.at("metadata"))
    }
}

wire_serde!(MessagesRequest);

/// Fluent builder for [`MessagesRequest`].
#[derive(Debug, Clone)]
pub struct MessagesRequestBuilder {
    model: Model,
    messages: Vec<MessageParam>,
    max_tokens: i64,
    system: Option<SystemContent>,
    temperature: Option<f64>,
    top_p: Option<f64>,
    top_k: Option<i64>,
    stop_sequences: Option<Vec<String>>,
    stream: Option<bool>,
    tools: Option<Vec<Tool>>,
    tool_choice: Option<ToolChoice>,
    thinking: Option<ThinkingConfig>,
    metadata: Option<RequestMetadata>,
}

impl MessagesRequestBuilder {
    pub fn new(model: impl Into<Model>, max_tokens: i64) -> Self {
        Self {
            model: model.into(),
            messages: Vec::new(),
            max_tokens,
            system: None,
            temperature: None,
            top_p: None,
            top_k: None,
            stop_sequences: None,
            stream: None,
            tools: None,
            tool_choice: None,
            thinking: None,
            metadata: None,
        }
    }

    /// Append a message with the given role.
    #[must_use]
    pub fn message(mut self, role: Role, content: impl Into<MessageContent>) -> Self {
        self.messages.push(MessageParam::new(role, content));
        self
    }

    #[must_use]
    pub fn user(self, content: impl Into<MessageContent>) -> Self {
        self.message(Role::User, content)
    }

    #[must_use]
    pub fn assistant(self, content: impl Into<MessageContent>) -> Self {
        self.message(Role::Assistant, content)
    }

    /// Replace the entire message list.
    #[must_use]
    pub fn messages(mut self, messages: Vec<MessageParam>) -> Self {
        self.messages = messages;
        self
    }

    #[must_use]
    pub fn system(mut self, system: impl Into<SystemContent>) -> Self {
        self.system = Some(system.into());
        self
    }

    #[must_use]
    pub fn temperature(mut self, temperature: f64) -> Self {
        self.temperature = Some(temperature);
        self
    }

    #[must_use]
    pub fn top_p(mut self, top_p: f64) -> Self {
        self.top_p = Some(top_p);
        self
    }

    #[must_use]
    pub fn top_k(mut self, top_k: i64) -> Self {
        self.top_k = Some(top_k);
        self
    }

    #[must_use]
    pub fn stop_sequences(mut self, stop_sequences: Vec<String>) -> Self {
        self.stop_sequences = Some(stop_sequences);
        self
    }

    #[must_use]
    pub fn stream(mut self, stream: bool) -> Self {
        self.stream = Some(stream);
        self
    }

    /// Append a tool definition.
    #[must_use]
    pub fn tool(mut self, tool: Tool) -> Self {
        self.tools.get_or_insert_with(Vec::new).push(tool);
        self
    }

    #[must_use]
    pub fn tools(mut self, tools: Vec<Tool>) -> Self {
        self.tools = Some(tools);
        self
    }

    #[must_use]
    pub fn tool_choice(mut self, tool_choice: ToolChoice) -> Self {
        self.tool_choice = Some(tool_choice);
        self
    }

    #[must_use]
    pub fn thinking(mut self, thinking: ThinkingConfig) -> Self {
        self.thinking = Some(thinking);
        self
    }

    /// Set the opaque end-user id carried in request metadata.
    #[must_use]
    pub fn user_id(mut self, user_id: impl Into<String>) -> Self {
        self.metadata
            .get_or_insert_with(RequestMetadata::default)
            .user_id = Some(user_id.into());
        self
    }

    pub fn build(self) -> Result<MessagesRequest> {
        let request = MessagesRequest {
            model: self.model,
            messages: self.messages,
            max_tokens: self.max_tokens,
            system: self.system,
            temperature: self.temperature,
            top_p: self.top_p,
            top_k: self.top_k,
            stop_sequences: self.stop_sequences,
            stream: self.stream,
            tools: self.tools,
            tool_choice: self.tool_choice,
            thinking: self.thinking,
            metadata: self.metadata,
            extra: Map::new(),
        };
        request.check_rules().map_err(Error::Validate)?;
        if !request
            .messages
            .iter()
            .any(|msg| msg.role == Role::User)
        {
            return Err(Error::Validate(ValidateError::invalid(
                "messages",
                "at least one user message is required",
            )));
        }
        Ok(request)
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn builder_populates_fields() {
        let request = MessagesRequest::builder(Model::ClaudeSonnet4, 1024)
            .system("You are terse.")
            .user("hi")
            .assistant("hello")
            .user("bye")
            .temperature(0.3)
            .stop_sequences(vec!["END".into()])
            .tool(Tool::new("lookup", json!({"type": "object"})))
            .tool_choice(ToolChoice::auto())
            .thinking(ThinkingConfig::enabled(2048))
            .user_id("user-77")
            .build()
            .unwrap();

        assert_eq!(request.messages.len(), 3);
        assert_eq!(request.max_tokens, 1024);
        assert_eq!(request.temperature, Some(0.3));
        assert_eq!(
            request.system,
            Some(SystemContent::Text("You are terse.".into()))
        );
        assert_eq!(
            request.metadata.as_ref().and_then(|m| m.user_id.as_deref()),
            Some("user-77")
        );
        assert!(request.validate().is_ok());
    }

    #[test]
    fn builder_requires_a_user_message() {
        let err = MessagesRequest::builder(Model::ClaudeSonnet4, 1024)
            .assistant("hello")
            .build()
            .unwrap_err();
        assert_eq!(err.to_string(), "messages: at least one user message is required");
    }

    #[test]
    fn builder_rejects_out_of_range_temperature() {
        let err = MessagesRequest::builder(Model::ClaudeSonnet4, 1024)
            .user("hi")
            .temperature(1.5)
            .build()
            .unwrap_err();
        assert_eq!(err.to_string(), "temperature: must be between 0 and 1");
    }

    #[test]
    fn builder_accepts_future_models_but_strict_validate_rejects_them() {
        let request = MessagesRequest::builder("claude-future-9", 256)
            .user("hi")
            .build()
            .unwrap();
        assert_eq!(request.encode()["model"], json!("claude-future-9"));
        let err = request.validate().unwrap_err();
        assert_eq!(err.to_string(), "model: unrecognized model value `claude-future-9`");
    }

    #[test]
    fn request_decode_enforces_required_fields() {
        let err = MessagesRequest::decode(json!({
            "model": "claude-sonnet-4-20250514",
            "messages": []
        }))
        .unwrap_err();
        assert!(matches!(
            err,
            DecodeError::MissingRequiredField { field: "max_tokens" }
        ));
    }

    #[test]
    fn request_round_trips_with_unknown_top_level_key() {
        let payload = json!({
            "model": "claude-sonnet-4-20250514",
            "messages": [{"role": "user", "content": "hi"}],
            "max_tokens": 64,
            "beta_features": ["context-windows-2x"]
        });
        let request = MessagesRequest::decode(payload.clone()).unwrap();
        assert_eq!(
            request.extra.get("beta_features"),
            Some(&json!(["context-windows-2x"]))
        );
        assert_eq!(request.encode(), payload);
    }
}
