//! Content block wire models: the polymorphic pieces of a message.

use serde_json::{Map, Value};

use crate::citations::Citation;
use crate::codec::wire_serde;
use crate::enums::open_enum;
use crate::errors::{DecodeError, ValidateError};
use crate::raw::{Decode, Encode, RawObject};
use crate::union::{self, TrialDef, TrialVariantDef, UnionDef, UnknownVariant, VariantDef};
use crate::validate::Validate;

open_enum! {
    /// Cache entry lifetimes accepted by the API.
    CacheTtl, "cache ttl" {
        FiveMinutes => "5m",
        OneHour => "1h",
    }
}

/// Prompt-caching marker for a block or tool definition.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct CacheControl {
    /// Requested lifetime. Absent means the server default; the wire value is
    /// only materialized when the caller set one.
    pub ttl: Option<CacheTtl>,
    pub extra: Map<String, Value>,
}

impl CacheControl {
    pub const TYPE: &'static str = "ephemeral";

    /// Effective lifetime, applying the server default for absent values.
    pub fn ttl(&self) -> CacheTtl {
        self.ttl.clone().unwrap_or(CacheTtl::FiveMinutes)
    }
}

impl Decode for CacheControl {
    fn decode(value: Value) -> Result<Self, DecodeError> {
        let mut raw = RawObject::from_value(value)?;
        raw.expect_tag(Self::TYPE)?;
        Ok(Self {
            ttl: raw.optional("ttl")?,
            extra: raw.into_map(),
        })
    }
}

impl Encode for CacheControl {
    fn encode(&self) -> Value {
        let mut raw = RawObject::tagged(Self::TYPE);
        raw.set_optional("ttl", &self.ttl);
        raw.extend_extra(&self.extra);
        raw.into_value()
    }
}

impl Validate for CacheControl {
    fn validate(&self) -> Result<(), ValidateError> {
        self.ttl.validate().map_err(|e| e.at("ttl"))
    }
}

wire_serde!(CacheControl);

/// Text content block.
#[derive(Debug, Clone, PartialEq)]
pub struct TextBlock {
    pub text: String,
    pub citations: Option<Vec<Citation>>,
    pub cache_control: Option<CacheControl>,
    /// Unknown fields preserved for round-tripping.
    pub extra: Map<String, Value>,
}

impl TextBlock {
    pub const TYPE: &'static str = "text";

    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            citations: None,
            cache_control: None,
            extra: Map::new(),
        }
    }
}

impl Decode for TextBlock {
    fn decode(value: Value) -> Result<Self, DecodeError> {
        let mut raw = RawObject::from_value(value)?;
        raw.expect_tag(Self::TYPE)?;
        Ok(Self {
            text: raw.required("text")?,
            citations: raw.optional("citations")?,
            cache_control: raw.optional("cache_control")?,
            extra: raw.into_map(),
        })
    }
}

impl Encode for TextBlock {
    fn encode(&self) -> Value {
        let mut raw = RawObject::tagged(Self::TYPE);
        raw.set_field("text", &self.text);
        raw.set_optional("citations", &self.citations);
        raw.set_optional("cache_control", &self.cache_control);
        raw.extend_extra(&self.extra);
        raw.into_value()
    }
}

impl Validate for TextBlock {
    fn validate(&self) -> Result<(), ValidateError> {
        self.citations.validate().map_err(|e| e.at("citations"))?;
        self.cache_control
            .validate()
            .map_err(|e| e.at("cache_control"))
    }
}

wire_serde!(TextBlock);

/// Inline base64 image payload.
#[derive(Debug, Clone, PartialEq)]
pub struct Base64ImageSource {
    pub media_type: String,
    pub data: String,
    pub extra: Map<String, Value>,
}

impl Base64ImageSource {
    pub const TYPE: &'static str = "base64";
}

impl Decode for Base64ImageSource {
    fn decode(value: Value) -> Result<Self, DecodeError> {
        let mut raw = RawObject::from_value(value)?;
        raw.expect_tag(Self::TYPE)?;
        Ok(Self {
            media_type: raw.required("media_type")?,
            data: raw.required("data")?,
            extra: raw.into_map(),
        })
    }
}

impl Encode for Base64ImageSource {
    fn encode(&self) -> Value {
        let mut raw = RawObject::tagged(Self::TYPE);
        raw.set_field("media_type", &self.media_type);
        raw.set_field("data", &self.data);
        raw.extend_extra(&self.extra);
        raw.into_value()
    }
}

impl Validate for Base64ImageSource {
    fn validate(&self) -> Result<(), ValidateError> {
        Ok(())
    }
}

wire_serde!(Base64ImageSource);

/// Image fetched by the server from a URL.
#[derive(Debug, Clone, PartialEq)]
pub struct UrlImageSource {
    pub url: String,
    pub extra: Map<String, Value>,
}

impl UrlImageSource {
    pub const TYPE: &'static str = "url";
}

impl Decode for UrlImageSource {
    fn decode(value: Value) -> Result<Self, DecodeError> {
        let mut raw = RawObject::from_value(value)?;
        raw.expect_tag(Self::TYPE)?;
        Ok(Self {
            url: raw.required("url")?,
            extra: raw.into_map(),
        })
    }
}

impl Encode for UrlImageSource {
    fn encode(&self) -> Value {
        let mut raw = RawObject::tagged(Self::TYPE);
        raw.set_field("url", &self.url);
        raw.extend_extra(&self.extra);
        raw.into_value()
    }
}

impl Validate for UrlImageSource {
    fn validate(&self) -> Result<(), ValidateError> {
        Ok(())
    }
}

wire_serde!(UrlImageSource);

/// Where an image's bytes come from.
#[derive(Debug, Clone, PartialEq)]
pub enum ImageSource {
    Base64(Base64ImageSource),
    Url(UrlImageSource),
    Unknown(UnknownVariant),
}

static IMAGE_SOURCE: UnionDef<ImageSource> = UnionDef {
    name: "image source",
    variants: &[
        VariantDef {
            tag: Base64ImageSource::TYPE,
            decode: |v| Base64ImageSource::decode(v).map(ImageSource::Base64),
        },
        VariantDef {
            tag: UrlImageSource::TYPE,
            decode: |v| UrlImageSource::decode(v).map(ImageSource::Url),
        },
    ],
};

impl Decode for ImageSource {
    fn decode(value: Value) -> Result<Self, DecodeError> {
        union::decode_tagged(&IMAGE_SOURCE, ImageSource::Unknown, value)
    }
}

impl Encode for ImageSource {
    fn encode(&self) -> Value {
        match self {
            ImageSource::Base64(s) => s.encode(),
            ImageSource::Url(s) => s.encode(),
            ImageSource::Unknown(unknown) => unknown.raw().clone(),
        }
    }
}

impl Validate for ImageSource {
    fn validate(&self) -> Result<(), ValidateError> {
        match self {
            ImageSource::Base64(s) => s.validate(),
            ImageSource::Url(s) => s.validate(),
            ImageSource::Unknown(unknown) => Err(ValidateError::UnrecognizedVariant {
                union: "image source",
                tag: unknown.tag().map(str::to_owned),
            }),
        }
    }
}

wire_serde!(ImageSource);

/// Image content block.
#[derive(Debug, Clone, PartialEq)]
pub struct ImageBlock {
    pub source: ImageSource,
    pub extra: Map<String, Value>,
}

impl ImageBlock {
    pub const TYPE: &'static str = "image";

    pub fn new(source: ImageSource) -> Self {
        Self {
            source,
            extra: Map::new(),
        }
    }
}

impl Decode for ImageBlock {
    fn decode(value: Value) -> Result<Self, DecodeError> {
        let mut raw = RawObject::from_value(value)?;
        raw.expect_tag(Self::TYPE)?;
        Ok(Self {
            source: raw.required("source")?,
            extra: raw.into_map(),
        })
    }
}

impl Encode for ImageBlock {
    fn encode(&self) -> Value {
        let mut raw = RawObject::tagged(Self::TYPE);
        raw.set_field("source", &self.source);
        raw.extend_extra(&self.extra);
        raw.into_value()
    }
}

impl Validate for ImageBlock {
    fn validate(&self) -> Result<(), ValidateError> {
        self.source.validate().map_err(|e| e.at("source"))
    }
}

wire_serde!(ImageBlock);

/// Tool invocation requested by the model.
#[derive(Debug, Clone, PartialEq)]
pub struct ToolUseBlock {
    pub id: String,
    pub name: String,
    /// Tool arguments, kept as an opaque JSON sub-tree.
    pub input: Value,
    pub extra: Map<String, Value>,
}

impl ToolUseBlock {
    pub const TYPE: &'static str = "tool_use";

    pub fn new(id: impl Into<String>, name: impl Into<String>, input: Value) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            input,
            extra: Map::new(),
        }
    }
}

impl Decode for ToolUseBlock {
    fn decode(value: Value) -> Result<Self, DecodeError> {
        let mut raw = RawObject::from_value(value)?;
        raw.expect_tag(Self::TYPE)?;
        Ok(Self {
            id: raw.required("id")?,
            name: raw.required("name")?,
            input: raw.required("input")?,
            extra: raw.into_map(),
        })
    }
}

impl Encode for ToolUseBlock {
    fn encode(&self) -> Value {
        let mut raw = RawObject::tagged(Self::TYPE);
        raw.set_field("id", &self.id);
        raw.set_field("name", &self.name);
        raw.set_field("input", &self.input);
        raw.extend_extra(&self.extra);
        raw.into_value()
    }
}

impl Validate for ToolUseBlock {
    fn validate(&self) -> Result<(), ValidateError> {
        Ok(())
    }
}

wire_serde!(ToolUseBlock);

/// Result of a tool invocation: a bare string or a list of content blocks.
///
/// No discriminator exists on the wire, so this is a trial union; the string
/// alternative is attempted first, per the declared contract.
#[derive(Debug, Clone, PartialEq)]
pub enum ToolResultContent {
    Text(String),
    Blocks(Vec<ContentBlock>),
}

static TOOL_RESULT_CONTENT: TrialDef<ToolResultContent> = TrialDef {
    name: "tool result content",
    variants: &[
        TrialVariantDef {
            name: "string",
            decode: |v| String::decode(v).map(ToolResultContent::Text),
        },
        TrialVariantDef {
            name: "blocks",
            decode: |v| Vec::<ContentBlock>::decode(v).map(ToolResultContent::Blocks),
        },
    ],
};

impl Decode for ToolResultContent {
    fn decode(value: Value) -> Result<Self, DecodeError> {
        union::decode_trial(&TOOL_RESULT_CONTENT, value)
    }
}

impl Encode for ToolResultContent {
    fn encode(&self) -> Value {
        match self {
            ToolResultContent::Text(text) => Value::String(text.clone()),
            ToolResultContent::Blocks(blocks) => blocks.encode(),
        }
    }
}

impl Validate for ToolResultContent {
    fn validate(&self) -> Result<(), ValidateError> {
        match self {
            ToolResultContent::Text(_) => Ok(()),
            ToolResultContent::Blocks(blocks) => blocks.validate(),
        }
    }
}

wire_serde!(ToolResultContent);

impl From<&str> for ToolResultContent {
    fn from(value: &str) -> Self {
        ToolResultContent::Text(value.to_string())
    }
}

impl From<String> for ToolResultContent {
    fn from(value: String) -> Self {
        ToolResultContent::Text(value)
    }
}

/// Tool result supplied back to the model.
#[derive(Debug, Clone, PartialEq)]
pub struct ToolResultBlock {
    pub tool_use_id: String,
    pub content: Option<ToolResultContent>,
    pub is_error: Option<bool>,
    pub extra: Map<String, Value>,
}

impl ToolResultBlock {
    pub const TYPE: &'static str = "tool_result";

    pub fn new(tool_use_id: impl Into<String>) -> Self {
        Self {
            tool_use_id: tool_use_id.into(),
            content: None,
            is_error: None,
            extra: Map::new(),
        }
    }

    #[must_use]
    pub fn with_content(mut self, content: impl Into<ToolResultContent>) -> Self {
        self.content = Some(content.into());
        self
    }

    #[must_use]
    pub fn with_error(mut self, is_error: bool) -> Self {
        self.is_error = Some(is_error);
        self
    }
}

impl Decode for ToolResultBlock {
    fn decode(value: Value) -> Result<Self, DecodeError> {
        let mut raw = RawObject::from_value(value)?;
        raw.expect_tag(Self::TYPE)?;
        Ok(Self {
            tool_use_id: raw.required("tool_use_id")?,
            content: raw.optional("content")?,
            is_error: raw.optional("is_error")?,
            extra: raw.into_map(),
        })
    }
}

impl Encode for ToolResultBlock {
    fn encode(&self) -> Value {
        let mut raw = RawObject::tagged(Self::TYPE);
        raw.set_field("tool_use_id", &self.tool_use_id);
        raw.set_optional("content", &self.content);
        raw.set_optional("is_error", &self.is_error);
        raw.extend_extra(&self.extra);
        raw.into_value()
    }
}

impl Validate for ToolResultBlock {
    fn validate(&self) -> Result<(), ValidateError> {
        self.content.validate().map_err(|e| e.at("content"))
    }
}

wire_serde!(ToolResultBlock);

/// Extended thinking emitted by the model.
#[derive(Debug, Clone, PartialEq)]
pub struct ThinkingBlock {
    pub thinking: String,
    pub signature: String,
    pub extra: Map<String, Value>,
}

impl ThinkingBlock {
    pub const TYPE: &'static str = "thinking";
}

impl Decode for ThinkingBlock {
    fn decode(value: Value) -> Result<Self, DecodeError> {
        let mut raw = RawObject::from_value(value)?;
        raw.expect_tag(Self::TYPE)?;
        Ok(Self {
            thinking: raw.required("thinking")?,
            signature: raw.required("signature")?,
            extra: raw.into_map(),
        })
    }
}

impl Encode for ThinkingBlock {
    fn encode(&self) -> Value {
        let mut raw = RawObject::tagged(Self::TYPE);
        raw.set_field("thinking", &self.thinking);
        raw.set_field("signature", &self.signature);
        raw.extend_extra(&self.extra);
        raw.into_value()
    }
}

impl Validate for ThinkingBlock {
    fn validate(&self) -> Result<(), ValidateError> {
        Ok(())
    }
}

wire_serde!(ThinkingBlock);

/// Thinking withheld by safety filtering; opaque to the client.
#[derive(Debug, Clone, PartialEq)]
pub struct RedactedThinkingBlock {
    pub data: String,
    pub extra: Map<String, Value>,
}

impl RedactedThinkingBlock {
    pub const TYPE: &'static str = "redacted_thinking";
}

impl Decode for RedactedThinkingBlock {
    fn decode(value: Value) -> Result<Self, DecodeError> {
        let mut raw = RawObject::from_value(value)?;
        raw.expect_tag(Self::TYPE)?;
        Ok(Self {
            data: raw.required("data")?,
            extra: raw.into_map(),
        })
    }
}

impl Encode for RedactedThinkingBlock {
    fn encode(&self) -> Value {
        let mut raw = RawObject::tagged(Self::TYPE);
        raw.set_field("data", &self.data);
        raw.extend_extra(&self.extra);
        raw.into_value()
    }
}

impl Validate for RedactedThinkingBlock {
    fn validate(&self) -> Result<(), ValidateError> {
        Ok(())
    }
}

wire_serde!(RedactedThinkingBlock);

/// One piece of message content, dispatched on the wire `"type"` tag.
#[derive(Debug, Clone, PartialEq)]
pub enum ContentBlock {
    Text(TextBlock),
    Image(ImageBlock),
    ToolUse(ToolUseBlock),
    ToolResult(ToolResultBlock),
    Thinking(ThinkingBlock),
    RedactedThinking(RedactedThinkingBlock),
    /// Block kind added by a newer server version; preserved verbatim.
    Unknown(UnknownVariant),
}

static CONTENT_BLOCK: UnionDef<ContentBlock> = UnionDef {
    name: "content block",
    variants: &[
        VariantDef {
            tag: TextBlock::TYPE,
            decode: |v| TextBlock::decode(v).map(ContentBlock::Text),
        },
        VariantDef {
            tag: ImageBlock::TYPE,
            decode: |v| ImageBlock::decode(v).map(ContentBlock::Image),
        },
        VariantDef {
            tag: ToolUseBlock::TYPE,
            decode: |v| ToolUseBlock::decode(v).map(ContentBlock::ToolUse),
        },
        VariantDef {
            tag: ToolResultBlock::TYPE,
            decode: |v| ToolResultBlock::decode(v).map(ContentBlock::ToolResult),
        },
        VariantDef {
            tag: ThinkingBlock::TYPE,
            decode: |v| ThinkingBlock::decode(v).map(ContentBlock::Thinking),
        },
        VariantDef {
            tag: RedactedThinkingBlock::TYPE,
            decode: |v| RedactedThinkingBlock::decode(v).map(ContentBlock::RedactedThinking),
        },
    ],
};

impl ContentBlock {
    /// Text block from a plain string.
    pub fn text(text: impl Into<String>) -> Self {
        ContentBlock::Text(TextBlock::new(text))
    }

    pub fn as_text(&self) -> Option<&TextBlock> {
        match self {
            ContentBlock::Text(block) => Some(block),
            _ => None,
        }
    }

    pub fn as_tool_use(&self) -> Option<&ToolUseBlock> {
        match self {
            ContentBlock::ToolUse(block) => Some(block),
            _ => None,
        }
    }

    pub fn as_tool_result(&self) -> Option<&ToolResultBlock> {
        match self {
            ContentBlock::ToolResult(block) => Some(block),
            _ => None,
        }
    }

    pub fn as_thinking(&self) -> Option<&ThinkingBlock> {
        match self {
            ContentBlock::Thinking(block) => Some(block),
            _ => None,
        }
    }
}

impl Decode for ContentBlock {
    fn decode(value: Value) -> Result<Self, DecodeError> {
        union::decode_tagged(&CONTENT_BLOCK, ContentBlock::Unknown, value)
    }
}

impl Encode for ContentBlock {
    fn encode(&self) -> Value {
        match self {
            ContentBlock::Text(block) => block.encode(),
            ContentBlock::Image(block) => block.encode(),
            ContentBlock::ToolUse(block) => block.encode(),
            ContentBlock::ToolResult(block) => block.encode(),
            ContentBlock::Thinking(block) => block.encode(),
            ContentBlock::RedactedThinking(block) => block.encode(),
            ContentBlock::Unknown(unknown) => unknown.raw().clone(),
        }
    }
}

impl Validate for ContentBlock {
    fn validate(&self) -> Result<(), ValidateError> {
        match self {
            ContentBlock::Text(block) => block.validate(),
            ContentBlock::Image(block) => block.validate(),
            ContentBlock::ToolUse(block) => block.validate(),
            ContentBlock::ToolResult(block) => block.validate(),
            ContentBlock::Thinking(block) => block.validate(),
            ContentBlock::RedactedThinking(block) => block.validate(),
            ContentBlock::Unknown(unknown) => Err(ValidateError::UnrecognizedVariant {
                union: "content block",
                tag: unknown.tag().map(str::to_owned),
            }),
        }
    }
}

wire_serde!(ContentBlock);

impl From<TextBlock> for ContentBlock {
    fn from(value: TextBlock) -> Self {
        ContentBlock::Text(value)
    }
}

impl From<ImageBlock> for ContentBlock {
    fn from(value: ImageBlock) -> Self {
        ContentBlock::Image(value)
    }
}

impl From<ToolUseBlock> for ContentBlock {
    fn from(value: ToolUseBlock) -> Self {
        ContentBlock::ToolUse(value)
    }
}

impl From<ToolResultBlock> for ContentBlock {
    fn from(value: ToolResultBlock) -> Self {
        ContentBlock::ToolResult(value)
    }
}

impl From<ThinkingBlock> for ContentBlock {
    fn from(value: ThinkingBlock) -> Self {
        ContentBlock::Thinking(value)
    }
}

impl From<RedactedThinkingBlock> for ContentBlock {
    fn from(value: RedactedThinkingBlock) -> Self {
        ContentBlock::RedactedThinking(value)
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn text_block_preserves_unknown_fields() {
        let payload = json!({
            "type": "text",
            "text": "hello",
            "annotation_level": "high"
        });
        let block = ContentBlock::decode(payload.clone()).unwrap();
        let text = block.as_text().unwrap();
        assert_eq!(text.text, "hello");
        assert_eq!(text.extra.get("annotation_level"), Some(&json!("high")));
        assert_eq!(block.encode(), payload);
    }

    #[test]
    fn tag_is_authoritative_over_structure() {
        // Body would also satisfy tool_result's optional-only shape; the tag
        // must still select tool_use and fail on its required fields.
        let err = ContentBlock::decode(json!({"type": "tool_use", "tool_use_id": "t1"}))
            .unwrap_err();
        assert!(matches!(err, DecodeError::VariantDecodeFailed { tag, .. } if tag == "tool_use"));
    }

    #[test]
    fn tool_result_content_prefers_the_string_alternative() {
        let content = ToolResultContent::decode(json!("plain output")).unwrap();
        assert_eq!(content, ToolResultContent::Text("plain output".into()));

        let content =
            ToolResultContent::decode(json!([{"type": "text", "text": "block output"}])).unwrap();
        match content {
            ToolResultContent::Blocks(blocks) => {
                assert_eq!(blocks.len(), 1);
                assert_eq!(blocks[0].as_text().unwrap().text, "block output");
            }
            other => panic!("expected blocks, got {other:?}"),
        }
    }

    #[test]
    fn cache_control_ttl_defaults_without_materializing() {
        let block = TextBlock::decode(json!({
            "type": "text",
            "text": "cached",
            "cache_control": {"type": "ephemeral"}
        }))
        .unwrap();
        let cache = block.cache_control.as_ref().unwrap();
        assert_eq!(cache.ttl, None);
        assert_eq!(cache.ttl(), CacheTtl::FiveMinutes);
        // The default is applied at the accessor, never written to the wire.
        assert_eq!(
            block.encode()["cache_control"],
            json!({"type": "ephemeral"})
        );

        let block = TextBlock::decode(json!({
            "type": "text",
            "text": "cached",
            "cache_control": {"type": "ephemeral", "ttl": "1h"}
        }))
        .unwrap();
        assert_eq!(block.cache_control.as_ref().unwrap().ttl(), CacheTtl::OneHour);
        assert!(block.validate().is_ok());
    }

    #[test]
    fn unrecognized_cache_ttl_fails_validation_with_a_path() {
        let block = TextBlock::decode(json!({
            "type": "text",
            "text": "cached",
            "cache_control": {"type": "ephemeral", "ttl": "90d"}
        }))
        .unwrap();
        let err = block.validate().unwrap_err();
        assert_eq!(
            err.to_string(),
            "cache_control.ttl: unrecognized cache ttl value `90d`"
        );
    }

    #[test]
    fn image_source_dispatches_on_tag() {
        let source = ImageSource::decode(json!({
            "type": "base64",
            "media_type": "image/png",
            "data": "aGVsbG8="
        }))
        .unwrap();
        assert!(matches!(source, ImageSource::Base64(_)));

        let source = ImageSource::decode(json!({"type": "url", "url": "https://x/y.png"})).unwrap();
        assert!(matches!(source, ImageSource::Url(_)));
    }

    #[test]
    fn unknown_block_validates_with_its_tag_in_the_error() {
        let block = ContentBlock::decode(json!({"type": "hologram", "frames": 3})).unwrap();
        let err = block.validate().unwrap_err();
        assert_eq!(
            err.to_string(),
            "unrecognized `content block` variant `hologram`"
        );
    }

    #[test]
    fn nested_citation_failure_carries_a_path() {
        let block = ContentBlock::decode(json!({
            "type": "text",
            "text": "cited",
            "citations": [{"type": "orbit_location", "cited_text": "x"}]
        }))
        .unwrap();
        let err = block.validate().unwrap_err();
        assert_eq!(
            err.to_string(),
            "citations[0]: unrecognized `citation` variant `orbit_location`"
        );
    }
}
