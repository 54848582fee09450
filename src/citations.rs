//! Citation wire models attached to text blocks.

use serde_json::{Map, Value};

use crate::codec::wire_serde;
use crate::errors::{DecodeError, ValidateError};
use crate::raw::{Decode, Encode, RawObject};
use crate::union::{self, UnionDef, UnknownVariant, VariantDef};
use crate::validate::Validate;

/// Character-range citation into a plain-text document.
#[derive(Debug, Clone, PartialEq)]
pub struct CharLocationCitation {
    pub cited_text: String,
    pub document_index: i64,
    pub document_title: Option<String>,
    pub start_char_index: i64,
    pub end_char_index: i64,
    /// Unknown fields preserved for round-tripping.
    pub extra: Map<String, Value>,
}

impl CharLocationCitation {
    pub const TYPE: &'static str = "char_location";
}

impl Decode for CharLocationCitation {
    fn decode(value: Value) -> Result<Self, DecodeError> {
        let mut raw = RawObject::from_value(value)?;
        raw.expect_tag(Self::TYPE)?;
        Ok(Self {
            cited_text: raw.required("cited_text")?,
            document_index: raw.required("document_index")?,
            document_title: raw.optional("document_title")?,
            start_char_index: raw.required("start_char_index")?,
            end_char_index: raw.required("end_char_index")?,
            extra: raw.into_map(),
        })
    }
}

impl Encode for CharLocationCitation {
    fn encode(&self) -> Value {
        let mut raw = RawObject::tagged(Self::TYPE);
        raw.set_field("cited_text", &self.cited_text);
        raw.set_field("document_index", &self.document_index);
        raw.set_optional("document_title", &self.document_title);
        raw.set_field("start_char_index", &self.start_char_index);
        raw.set_field("end_char_index", &self.end_char_index);
        raw.extend_extra(&self.extra);
        raw.into_value()
    }
}

impl Validate for CharLocationCitation {
    fn validate(&self) -> Result<(), ValidateError> {
        Ok(())
    }
}

wire_serde!(CharLocationCitation);

/// Page-range citation into a PDF document.
#[derive(Debug, Clone, PartialEq)]
pub struct PageLocationCitation {
    pub cited_text: String,
    pub document_index: i64,
    pub document_title: Option<String>,
    pub start_page_number: i64,
    pub end_page_number: i64,
    pub extra: Map<String, Value>,
}

impl PageLocationCitation {
    pub const TYPE: &'static str = "page_location";
}

impl Decode for PageLocationCitation {
    fn decode(value: Value) -> Result<Self, DecodeError> {
        let mut raw = RawObject::from_value(value)?;
        raw.expect_tag(Self::TYPE)?;
        Ok(Self {
            cited_text: raw.required("cited_text")?,
            document_index: raw.required("document_index")?,
            document_title: raw.optional("document_title")?,
            start_page_number: raw.required("start_page_number")?,
            end_page_number: raw.required("end_page_number")?,
            extra: raw.into_map(),
        })
    }
}

impl Encode for PageLocationCitation {
    fn encode(&self) -> Value {
        let mut raw = RawObject::tagged(Self::TYPE);
        raw.set_field("cited_text", &self.cited_text);
        raw.set_field("document_index", &self.document_index);
        raw.set_optional("document_title", &self.document_title);
        raw.set_field("start_page_number", &self.start_page_number);
        raw.set_field("end_page_number", &self.end_page_number);
        raw.extend_extra(&self.extra);
        raw.into_value()
    }
}

impl Validate for PageLocationCitation {
    fn validate(&self) -> Result<(), ValidateError> {
        Ok(())
    }
}

wire_serde!(PageLocationCitation);

/// Block-range citation into custom document content.
#[derive(Debug, Clone, PartialEq)]
pub struct ContentBlockLocationCitation {
    pub cited_text: String,
    pub document_index: i64,
    pub document_title: Option<String>,
    pub start_block_index: i64,
    pub end_block_index: i64,
    pub extra: Map<String, Value>,
}

impl ContentBlockLocationCitation {
    pub const TYPE: &'static str = "content_block_location";
}

impl Decode for ContentBlockLocationCitation {
    fn decode(value: Value) -> Result<Self, DecodeError> {
        let mut raw = RawObject::from_value(value)?;
        raw.expect_tag(Self::TYPE)?;
        Ok(Self {
            cited_text: raw.required("cited_text")?,
            document_index: raw.required("document_index")?,
            document_title: raw.optional("document_title")?,
            start_block_index: raw.required("start_block_index")?,
            end_block_index: raw.required("end_block_index")?,
            extra: raw.into_map(),
        })
    }
}

impl Encode for ContentBlockLocationCitation {
    fn encode(&self) -> Value {
        let mut raw = RawObject::tagged(Self::TYPE);
        raw.set_field("cited_text", &self.cited_text);
        raw.set_field("document_index", &self.document_index);
        raw.set_optional("document_title", &self.document_title);
        raw.set_field("start_block_index", &self.start_block_index);
        raw.set_field("end_block_index", &self.end_block_index);
        raw.extend_extra(&self.extra);
        raw.into_value()
    }
}

impl Validate for ContentBlockLocationCitation {
    fn validate(&self) -> Result<(), ValidateError> {
        Ok(())
    }
}

wire_serde!(ContentBlockLocationCitation);

/// Citation into a search result block supplied by the caller.
#[derive(Debug, Clone, PartialEq)]
pub struct SearchResultLocationCitation {
    pub cited_text: String,
    pub search_result_index: i64,
    pub source: String,
    pub title: Option<String>,
    pub start_block_index: i64,
    pub end_block_index: i64,
    pub extra: Map<String, Value>,
}

impl SearchResultLocationCitation {
    pub const TYPE: &'static str = "search_result_location";
}

impl Decode for SearchResultLocationCitation {
    fn decode(value: Value) -> Result<Self, DecodeError> {
        let mut raw = RawObject::from_value(value)?;
        raw.expect_tag(Self::TYPE)?;
        Ok(Self {
            cited_text: raw.required("cited_text")?,
            search_result_index: raw.required("search_result_index")?,
            source: raw.required("source")?,
            title: raw.optional("title")?,
            start_block_index: raw.required("start_block_index")?,
            end_block_index: raw.required("end_block_index")?,
            extra: raw.into_map(),
        })
    }
}

impl Encode for SearchResultLocationCitation {
    fn encode(&self) -> Value {
        let mut raw = RawObject::tagged(Self::TYPE);
        raw.set_field("cited_text", &self.cited_text);
        raw.set_field("search_result_index", &self.search_result_index);
        raw.set_field("source", &self.source);
        raw.set_optional("title", &self.title);
        raw.set_field("start_block_index", &self.start_block_index);
        raw.set_field("end_block_index", &self.end_block_index);
        raw.extend_extra(&self.extra);
        raw.into_value()
    }
}

impl Validate for SearchResultLocationCitation {
    fn validate(&self) -> Result<(), ValidateError> {
        Ok(())
    }
}

wire_serde!(SearchResultLocationCitation);

/// Where a piece of cited text came from.
#[derive(Debug, Clone, PartialEq)]
pub enum Citation {
    CharLocation(CharLocationCitation),
    PageLocation(PageLocationCitation),
    ContentBlockLocation(ContentBlockLocationCitation),
    SearchResultLocation(SearchResultLocationCitation),
    /// Citation kind added by a newer server version; preserved verbatim.
    Unknown(UnknownVariant),
}

static CITATION: UnionDef<Citation> = UnionDef {
    name: "citation",
    variants: &[
        VariantDef {
            tag: CharLocationCitation::TYPE,
            decode: |v| CharLocationCitation::decode(v).map(Citation::CharLocation),
        },
        VariantDef {
            tag: PageLocationCitation::TYPE,
            decode: |v| PageLocationCitation::decode(v).map(Citation::PageLocation),
        },
        VariantDef {
            tag: ContentBlockLocationCitation::TYPE,
            decode: |v| ContentBlockLocationCitation::decode(v).map(Citation::ContentBlockLocation),
        },
        VariantDef {
            tag: SearchResultLocationCitation::TYPE,
            decode: |v| SearchResultLocationCitation::decode(v).map(Citation::SearchResultLocation),
        },
    ],
};

impl Citation {
    /// The cited text, common to every known citation kind.
    pub fn cited_text(&self) -> Option<&str> {
        match self {
            Citation::CharLocation(c) => Some(&c.cited_text),
            Citation::PageLocation(c) => Some(&c.cited_text),
            Citation::ContentBlockLocation(c) => Some(&c.cited_text),
            Citation::SearchResultLocation(c) => Some(&c.cited_text),
            Citation::Unknown(_) => None,
        }
    }
}

impl Decode for Citation {
    fn decode(value: Value) -> Result<Self, DecodeError> {
        union::decode_tagged(&CITATION, Citation::Unknown, value)
    }
}

impl Encode for Citation {
    fn encode(&self) -> Value {
        match self {
            Citation::CharLocation(c) => c.encode(),
            Citation::PageLocation(c) => c.encode(),
            Citation::ContentBlockLocation(c) => c.encode(),
            Citation::SearchResultLocation(c) => c.encode(),
            Citation::Unknown(unknown) => unknown.raw().clone(),
        }
    }
}

impl Validate for Citation {
    fn validate(&self) -> Result<(), ValidateError> {
        match self {
            Citation::CharLocation(c) => c.validate(),
            Citation::PageLocation(c) => c.validate(),
            Citation::ContentBlockLocation(c) => c.validate(),
            Citation::SearchResultLocation(c) => c.validate(),
            Citation::Unknown(unknown) => Err(ValidateError::UnrecognizedVariant {
                union: "citation",
                tag: unknown.tag().map(str::to_owned),
            }),
        }
    }
}

wire_serde!(Citation);

impl From<CharLocationCitation> for Citation {
    fn from(value: CharLocationCitation) -> Self {
        Citation::CharLocation(value)
    }
}

impl From<PageLocationCitation> for Citation {
    fn from(value: PageLocationCitation) -> Self {
        Citation::PageLocation(value)
    }
}

impl From<ContentBlockLocationCitation> for Citation {
    fn from(value: ContentBlockLocationCitation) -> Self {
        Citation::ContentBlockLocation(value)
    }
}

impl From<SearchResultLocationCitation> for Citation {
    fn from(value: SearchResultLocationCitation) -> Self {
        Citation::SearchResultLocation(value)
    }
}
