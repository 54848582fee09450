//! Wire-model serialization core for LLM messages APIs.
//!
//! Strongly-typed request/response models over a lossless JSON substrate:
//! every record keeps unknown fields, every discriminated union keeps unknown
//! variants, and every open enum keeps unrecognized strings, so payloads from
//! newer server versions survive a decode→encode round trip unchanged.
//! Strictness is opt-in: [`Validate`] rejects the forward-compat placeholders
//! that decoding deliberately tolerates.
//!
//! Model types are plain data with no interior mutability: decode once, then
//! share references freely across threads.
//!
//! ## Example
//!
//! ```
//! use modelwire::{from_str, Message};
//!
//! let message: Message = from_str(
//!     r#"{
//!         "id": "msg_01",
//!         "type": "message",
//!         "role": "assistant",
//!         "content": [{"type": "text", "text": "Hello!"}],
//!         "model": "claude-sonnet-4-20250514",
//!         "usage": {"input_tokens": 3, "output_tokens": 5}
//!     }"#,
//! )?;
//! assert_eq!(message.text(), "Hello!");
//! # Ok::<(), modelwire::Error>(())
//! ```

mod blocks;
mod citations;
mod codec;
mod enums;
mod errors;
mod message;
mod raw;
mod request;
mod stream;
mod tools;
mod union;
mod validate;

pub use blocks::{
    Base64ImageSource, CacheControl, CacheTtl, ContentBlock, ImageBlock, ImageSource,
    RedactedThinkingBlock, TextBlock, ThinkingBlock, ToolResultBlock, ToolResultContent,
    ToolUseBlock, UrlImageSource,
};
pub use citations::{
    CharLocationCitation, Citation, ContentBlockLocationCitation, PageLocationCitation,
    SearchResultLocationCitation,
};
pub use codec::{from_slice, from_str, from_value, to_string, to_value, WireCodec, WireOptions};
pub use errors::{DecodeError, Error, Result, TrialFailure, ValidateError};
pub use message::{
    Message, MessageContent, MessageParam, Model, Role, ServiceTier, StopReason, SystemContent,
    Usage,
};
pub use raw::{Decode, Encode, RawObject};
pub use request::{MessagesRequest, MessagesRequestBuilder, RequestMetadata};
pub use stream::{
    ApiErrorDetail, CitationsDelta, ContentBlockDelta, ContentBlockDeltaEvent,
    ContentBlockStartEvent, ContentBlockStopEvent, ErrorEvent, ErrorKind, InputJsonDelta,
    MessageDelta, MessageDeltaEvent, MessageDeltaUsage, MessageStartEvent, MessageStopEvent,
    PingEvent, SignatureDelta, StreamEvent, TextDelta, ThinkingDelta,
};
pub use tools::{
    AnyToolChoice, AutoToolChoice, DisabledThinking, EnabledThinking, NamedToolChoice,
    NoneToolChoice, ThinkingConfig, Tool, ToolChoice,
};
pub use union::{
    decode_tagged, decode_trial, TrialDef, TrialVariantDef, UnionDef, UnknownVariant, VariantDef,
};
pub use validate::Validate;
