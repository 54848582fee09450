//! Tool wire models: definitions, tool choice, and thinking configuration.

use serde_json::{Map, Value};

use crate::blocks::CacheControl;
use crate::codec::wire_serde;
use crate::errors::{DecodeError, ValidateError};
use crate::raw::{Decode, Encode, RawObject};
use crate::union::{self, UnionDef, UnknownVariant, VariantDef};
use crate::validate::Validate;

/// A tool the model may invoke.
///
/// `input_schema` is carried as an opaque JSON sub-tree; this crate does not
/// interpret schema documents.
#[derive(Debug, Clone, PartialEq)]
pub struct Tool {
    pub name: String,
    pub description: Option<String>,
    pub input_schema: Value,
    pub cache_control: Option<CacheControl>,
    pub extra: Map<String, Value>,
}

impl Tool {
    pub fn new(name: impl Into<String>, input_schema: Value) -> Self {
        Self {
            name: name.into(),
            description: None,
            input_schema,
            cache_control: None,
            extra: Map::new(),
        }
    }

    #[must_use]
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }
}

impl Decode for Tool {
    fn decode(value: Value) -> Result<Self, DecodeError> {
        let mut raw = RawObject::from_value(value)?;
        Ok(Self {
            name: raw.required("name")?,
            description: raw.optional("description")?,
            input_schema: raw.required("input_schema")?,
            cache_control: raw.optional("cache_control")?,
            extra: raw.into_map(),
        })
    }
}

impl Encode for Tool {
    fn encode(&self) -> Value {
        let mut raw = RawObject::new();
        raw.set_field("name", &self.name);
        raw.set_optional("description", &self.description);
        raw.set_field("input_schema", &self.input_schema);
        raw.set_optional("cache_control", &self.cache_control);
        raw.extend_extra(&self.extra);
        raw.into_value()
    }
}

impl Validate for Tool {
    fn validate(&self) -> Result<(), ValidateError> {
        if self.name.trim().is_empty() {
            return Err(ValidateError::invalid("name", "tool name is required"));
        }
        if !self.input_schema.is_object() {
            return Err(ValidateError::invalid("input_schema", "must be an object"));
        }
        self.cache_control
            .validate()
            .map_err(|e| e.at("cache_control"))
    }
}

wire_serde!(Tool);

/// Let the model decide whether to use tools.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct AutoToolChoice {
    pub disable_parallel_tool_use: Option<bool>,
    pub extra: Map<String, Value>,
}

impl AutoToolChoice {
    pub const TYPE: &'static str = "auto";
}

impl Decode for AutoToolChoice {
    fn decode(value: Value) -> Result<Self, DecodeError> {
        let mut raw = RawObject::from_value(value)?;
        raw.expect_tag(Self::TYPE)?;
        Ok(Self {
            disable_parallel_tool_use: raw.optional("disable_parallel_tool_use")?,
            extra: raw.into_map(),
        })
    }
}

impl Encode for AutoToolChoice {
    fn encode(&self) -> Value {
        let mut raw = RawObject::tagged(Self::TYPE);
        raw.set_optional(
            "disable_parallel_tool_use",
            &self.disable_parallel_tool_use,
        );
        raw.extend_extra(&self.extra);
        raw.into_value()
    }
}

impl Validate for AutoToolChoice {
    fn validate(&self) -> Result<(), ValidateError> {
        Ok(())
    }
}

wire_serde!(AutoToolChoice);

/// Require the model to use some tool.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct AnyToolChoice {
    pub disable_parallel_tool_use: Option<bool>,
    pub extra: Map<String, Value>,
}

impl AnyToolChoice {
    pub const TYPE: &'static str = "any";
}

impl Decode for AnyToolChoice {
    fn decode(value: Value) -> Result<Self, DecodeError> {
        let mut raw = RawObject::from_value(value)?;
        raw.expect_tag(Self::TYPE)?;
        Ok(Self {
            disable_parallel_tool_use: raw.optional("disable_parallel_tool_use")?,
            extra: raw.into_map(),
        })
    }
}

impl Encode for AnyToolChoice {
    fn encode(&self) -> Value {
        let mut raw = RawObject::tagged(Self::TYPE);
        raw.set_optional(
            "disable_parallel_tool_use",
            &self.disable_parallel_tool_use,
        );
        raw.extend_extra(&self.extra);
        raw.into_value()
    }
}

impl Validate for AnyToolChoice {
    fn validate(&self) -> Result<(), ValidateError> {
        Ok(())
    }
}

wire_serde!(AnyToolChoice);

/// Require the model to use one specific tool.
#[derive(Debug, Clone, PartialEq)]
pub struct NamedToolChoice {
    pub name: String,
    pub disable_parallel_tool_use: Option<bool>,
    pub extra: Map<String, Value>,
}

impl NamedToolChoice {
    pub const TYPE: &'static str = "tool";
}

impl Decode for NamedToolChoice {
    fn decode(value: Value) -> Result<Self, DecodeError> {
        let mut raw = RawObject::from_value(value)?;
        raw.expect_tag(Self::TYPE)?;
        Ok(Self {
            name: raw.required("name")?,
            disable_parallel_tool_use: raw.optional("disable_parallel_tool_use")?,
            extra: raw.into_map(),
        })
    }
}

impl Encode for NamedToolChoice {
    fn encode(&self) -> Value {
        let mut raw = RawObject::tagged(Self::TYPE);
        raw.set_field("name", &self.name);
        raw.set_optional(
            "disable_parallel_tool_use",
            &self.disable_parallel_tool_use,
        );
        raw.extend_extra(&self.extra);
        raw.into_value()
    }
}

impl Validate for NamedToolChoice {
    fn validate(&self) -> Result<(), ValidateError> {
        Ok(())
    }
}

wire_serde!(NamedToolChoice);

/// Forbid tool use entirely.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct NoneToolChoice {
    pub extra: Map<String, Value>,
}

impl NoneToolChoice {
    pub const TYPE: &'static str = "none";
}

impl Decode for NoneToolChoice {
    fn decode(value: Value) -> Result<Self, DecodeError> {
        let mut raw = RawObject::from_value(value)?;
        raw.expect_tag(Self::TYPE)?;
        Ok(Self {
            extra: raw.into_map(),
        })
    }
}

impl Encode for NoneToolChoice {
    fn encode(&self) -> Value {
        let mut raw = RawObject::tagged(Self::TYPE);
        raw.extend_extra(&self.extra);
        raw.into_value()
    }
}

impl Validate for NoneToolChoice {
    fn validate(&self) -> Result<(), ValidateError> {
        Ok(())
    }
}

wire_serde!(NoneToolChoice);

/// How the model should use the provided tools.
#[derive(Debug, Clone, PartialEq)]
pub enum ToolChoice {
    Auto(AutoToolChoice),
    Any(AnyToolChoice),
    Tool(NamedToolChoice),
    None(NoneToolChoice),
    Unknown(UnknownVariant),
}

static TOOL_CHOICE: UnionDef<ToolChoice> = UnionDef {
    name: "tool choice",
    variants: &[
        VariantDef {
            tag: AutoToolChoice::TYPE,
            decode: |v| AutoToolChoice::decode(v).map(ToolChoice::Auto),
        },
        VariantDef {
            tag: AnyToolChoice::TYPE,
            decode: |v| AnyToolChoice::decode(v).map(ToolChoice::Any),
        },
        VariantDef {
            tag: NamedToolChoice::TYPE,
            decode: |v| NamedToolChoice::decode(v).map(ToolChoice::Tool),
        },
        VariantDef {
            tag: NoneToolChoice::TYPE,
            decode: |v| NoneToolChoice::decode(v).map(ToolChoice::None),
        },
    ],
};

impl ToolChoice {
    pub fn auto() -> Self {
        ToolChoice::Auto(AutoToolChoice::default())
    }

    pub fn any() -> Self {
        ToolChoice::Any(AnyToolChoice::default())
    }

    pub fn tool(name: impl Into<String>) -> Self {
        ToolChoice::Tool(NamedToolChoice {
            name: name.into(),
            disable_parallel_tool_use: None,
            extra: Map::new(),
        })
    }

    pub fn none() -> Self {
        ToolChoice::None(NoneToolChoice::default())
    }
}

impl Decode for ToolChoice {
    fn decode(value: Value) -> Result<Self, DecodeError> {
        union::decode_tagged(&TOOL_CHOICE, ToolChoice::Unknown, value)
    }
}

impl Encode for ToolChoice {
    fn encode(&self) -> Value {
        match self {
            ToolChoice::Auto(c) => c.encode(),
            ToolChoice::Any(c) => c.encode(),
            ToolChoice::Tool(c) => c.encode(),
            ToolChoice::None(c) => c.encode(),
            ToolChoice::Unknown(unknown) => unknown.raw().clone(),
        }
    }
}

impl Validate for ToolChoice {
    fn validate(&self) -> Result<(), ValidateError> {
        match self {
            ToolChoice::Auto(c) => c.validate(),
            ToolChoice::Any(c) => c.validate(),
            ToolChoice::Tool(c) => c.validate(),
            ToolChoice::None(c) => c.validate(),
            ToolChoice::Unknown(unknown) => Err(ValidateError::UnrecognizedVariant {
                union: "tool choice",
                tag: unknown.tag().map(str::to_owned),
            }),
        }
    }
}

wire_serde!(ToolChoice);

/// Extended thinking enabled with a token budget.
#[derive(Debug, Clone, PartialEq)]
pub struct EnabledThinking {
    pub budget_tokens: i64,
    pub extra: Map<String, Value>,
}

impl EnabledThinking {
    pub const TYPE: &'static str = "enabled";
}

impl Decode for EnabledThinking {
    fn decode(value: Value) -> Result<Self, DecodeError> {
        let mut raw = RawObject::from_value(value)?;
        raw.expect_tag(Self::TYPE)?;
        Ok(Self {
            budget_tokens: raw.required("budget_tokens")?,
            extra: raw.into_map(),
        })
    }
}

impl Encode for EnabledThinking {
    fn encode(&self) -> Value {
        let mut raw = RawObject::tagged(Self::TYPE);
        raw.set_field("budget_tokens", &self.budget_tokens);
        raw.extend_extra(&self.extra);
        raw.into_value()
    }
}

impl Validate for EnabledThinking {
    fn validate(&self) -> Result<(), ValidateError> {
        Ok(())
    }
}

wire_serde!(EnabledThinking);

/// Extended thinking disabled.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct DisabledThinking {
    pub extra: Map<String, Value>,
}

impl DisabledThinking {
    pub const TYPE: &'static str = "disabled";
}

impl Decode for DisabledThinking {
    fn decode(value: Value) -> Result<Self, DecodeError> {
        let mut raw = RawObject::from_value(value)?;
        raw.expect_tag(Self::TYPE)?;
        Ok(Self {
            extra: raw.into_map(),
        })
    }
}

impl Encode for DisabledThinking {
    fn encode(&self) -> Value {
        let mut raw = RawObject::tagged(Self::TYPE);
        raw.extend_extra(&self.extra);
        raw.into_value()
    }
}

impl Validate for DisabledThinking {
    fn validate(&self) -> Result<(), ValidateError> {
        Ok(())
    }
}

wire_serde!(DisabledThinking);

/// Configuration for extended thinking.
#[derive(Debug, Clone, PartialEq)]
pub enum ThinkingConfig {
    Enabled(EnabledThinking),
    Disabled(DisabledThinking),
    Unknown(UnknownVariant),
}

static THINKING_CONFIG: UnionDef<ThinkingConfig> = UnionDef {
    name: "thinking config",
    variants: &[
        VariantDef {
            tag: EnabledThinking::TYPE,
            decode: |v| EnabledThinking::decode(v).map(ThinkingConfig::Enabled),
        },
        VariantDef {
            tag: DisabledThinking::TYPE,
            decode: |v| DisabledThinking::decode(v).map(ThinkingConfig::Disabled),
        },
    ],
};

impl ThinkingConfig {
    pub fn enabled(budget_tokens: i64) -> Self {
        ThinkingConfig::Enabled(EnabledThinking {
            budget_tokens,
            extra: Map::new(),
        })
    }

    pub fn disabled() -> Self {
        ThinkingConfig::Disabled(DisabledThinking::default())
    }
}

impl Decode for ThinkingConfig {
    fn decode(value: Value) -> Result<Self, DecodeError> {
        union::decode_tagged(&THINKING_CONFIG, ThinkingConfig::Unknown, value)
    }
}

impl Encode for ThinkingConfig {
    fn encode(&self) -> Value {
        match self {
            ThinkingConfig::Enabled(c) => c.encode(),
            ThinkingConfig::Disabled(c) => c.encode(),
            ThinkingConfig::Unknown(unknown) => unknown.raw().clone(),
        }
    }
}

impl Validate for ThinkingConfig {
    fn validate(&self) -> Result<(), ValidateError> {
        match self {
            ThinkingConfig::Enabled(c) => c.validate(),
            ThinkingConfig::Disabled(c) => c.validate(),
            ThinkingConfig::Unknown(unknown) => Err(ValidateError::UnrecognizedVariant {
                union: "thinking config",
                tag: unknown.tag().map(str::to_owned),
            }),
        }
    }
}

wire_serde!(ThinkingConfig);

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn tool_choice_dispatches_and_round_trips() {
        let payload = json!({"type": "tool", "name": "get_weather"});
        let choice = ToolChoice::decode(payload.clone()).unwrap();
        assert!(matches!(&choice, ToolChoice::Tool(t) if t.name == "get_weather"));
        assert_eq!(choice.encode(), payload);
    }

    #[test]
    fn tool_choice_constructors_carry_their_tags() {
        assert_eq!(ToolChoice::auto().encode(), json!({"type": "auto"}));
        assert_eq!(ToolChoice::none().encode(), json!({"type": "none"}));
    }

    #[test]
    fn tool_validation_requires_an_object_schema() {
        let tool = Tool::new("lookup", json!("not a schema"));
        let err = tool.validate().unwrap_err();
        assert_eq!(err.to_string(), "input_schema: must be an object");

        let tool = Tool::new("lookup", json!({"type": "object"}));
        assert!(tool.validate().is_ok());
    }

    #[test]
    fn thinking_config_enabled_requires_budget() {
        let err = ThinkingConfig::decode(json!({"type": "enabled"})).unwrap_err();
        assert!(matches!(err, DecodeError::VariantDecodeFailed { tag, .. } if tag == "enabled"));

        let config =
            ThinkingConfig::decode(json!({"type": "enabled", "budget_tokens": 2048})).unwrap();
        assert!(matches!(
            config,
            ThinkingConfig::Enabled(EnabledThinking {
                budget_tokens: 2048,
                ..
            })
        ));
    }

    #[test]
    fn unknown_tool_choice_is_tolerated_until_validation() {
        let choice = ToolChoice::decode(json!({"type": "weighted", "weights": [0.5]})).unwrap();
        assert!(matches!(&choice, ToolChoice::Unknown(_)));
        assert!(choice.validate().is_err());
    }
}
