//! Union dispatch, unknown-variant tolerance, and open-enum fallback.

use serde_json::json;

use modelwire::{
    from_value, to_value, ContentBlock, DecodeError, Error, MessageContent, Model, StopReason,
    StreamEvent, ToolResultContent, Validate, ValidateError,
};

#[test]
fn discriminator_selects_the_variant_not_the_structure() {
    // The body also satisfies tool_result's optional-only shape, but the tag
    // says tool_use, so tool_use's required fields must be enforced.
    let err = from_value::<ContentBlock>(json!({
        "type": "tool_use",
        "tool_use_id": "t1",
        "content": "done"
    }))
    .unwrap_err();
    match err {
        Error::Decode(DecodeError::VariantDecodeFailed { tag, source, .. }) => {
            assert_eq!(tag, "tool_use");
            assert!(matches!(
                *source,
                DecodeError::MissingRequiredField { field: "id" }
            ));
        }
        other => panic!("expected VariantDecodeFailed, got {other}"),
    }

    let block: ContentBlock = from_value(json!({
        "type": "tool_use",
        "id": "toolu_1",
        "name": "calc",
        "input": {}
    }))
    .unwrap();
    assert!(block.as_tool_use().is_some());
}

#[test]
fn unknown_discriminator_decodes_then_fails_validation() {
    let payload = json!({"type": "some_future_type", "payload": {"nested": true}});
    let block: ContentBlock = from_value(payload.clone()).unwrap();

    match &block {
        ContentBlock::Unknown(unknown) => {
            assert_eq!(unknown.tag(), Some("some_future_type"));
            assert_eq!(unknown.raw(), &payload);
        }
        other => panic!("expected unknown variant, got {other:?}"),
    }

    let err = block.validate().unwrap_err();
    assert!(matches!(
        err,
        ValidateError::UnrecognizedVariant { union: "content block", .. }
    ));

    // The raw payload is re-emitted verbatim.
    assert_eq!(to_value(&block), payload);
}

#[test]
fn trial_union_resolves_in_declared_order() {
    let text: MessageContent = from_value(json!("hello")).unwrap();
    assert_eq!(text, MessageContent::Text("hello".into()));

    let blocks: MessageContent = from_value(json!([{"type": "text", "text": "hi"}])).unwrap();
    match blocks {
        MessageContent::Blocks(blocks) => {
            assert_eq!(blocks[0].as_text().unwrap().text, "hi");
        }
        other => panic!("expected blocks, got {other:?}"),
    }
}

#[test]
fn trial_union_exhaustion_reports_every_alternative() {
    let err = from_value::<MessageContent>(json!({"neither": "shape"})).unwrap_err();
    match err {
        Error::Decode(DecodeError::NoVariantMatched { union, causes }) => {
            assert_eq!(union, "message content");
            assert_eq!(causes.len(), 2);
            assert_eq!(causes[0].variant, "string");
            assert_eq!(causes[1].variant, "blocks");
        }
        other => panic!("expected NoVariantMatched, got {other}"),
    }
}

#[test]
fn tool_result_content_accepts_both_shapes() {
    let text: ToolResultContent = from_value(json!("raw output")).unwrap();
    assert_eq!(text, ToolResultContent::Text("raw output".into()));

    let blocks: ToolResultContent = from_value(json!([
        {"type": "text", "text": "structured output"}
    ]))
    .unwrap();
    assert!(matches!(blocks, ToolResultContent::Blocks(_)));
}

#[test]
fn open_enums_fall_back_without_failing() {
    let model = Model::from("claude-future-9");
    assert!(!model.is_known());
    assert_eq!(model.as_str(), "claude-future-9");
    assert_eq!(String::from(model.clone()), "claude-future-9");
    let err = model.validate().unwrap_err();
    assert!(matches!(
        err,
        ValidateError::UnrecognizedEnumValue { name: "model", value } if value == "claude-future-9"
    ));

    let reason = StopReason::from("end_turn");
    assert_eq!(reason, StopReason::EndTurn);
    assert!(reason.validate().is_ok());
}

#[test]
fn unknown_stream_event_round_trips_byte_for_byte() {
    let payload = json!({
        "type": "telemetry_snapshot",
        "window": {"start": 0, "end": 512},
        "samples": [1, 1, 2, 3, 5]
    });
    let event: StreamEvent = from_value(payload.clone()).unwrap();
    assert_eq!(to_value(&event), payload);
    assert!(event.validate().is_err());
}

#[test]
fn payload_without_discriminator_becomes_unknown() {
    let block: ContentBlock = from_value(json!({"text": "tagless"})).unwrap();
    assert!(matches!(&block, ContentBlock::Unknown(u) if u.tag().is_none()));

    let err = block.validate().unwrap_err();
    assert_eq!(err.to_string(), "unrecognized `content block` variant");
}
