use crate::blueprint::builders::{end, tag_start};
use crate::{
    MessageType, MessageValue, PREFERRED_CONTENT, UNEXPECTED_CONTENT, UnidocEvent,
    ValidationEvent, ValidationEventKind, ValidationMessage,
};

#[test]
fn builder_keeps_insertion_order() {
    let message = ValidationMessage::new(MessageType::Information, "custom:note")
        .with("z", "last")
        .with("a", 2u64)
        .with("z", "replaced");

    let keys: Vec<_> = message.data.keys().map(String::as_str).collect();
    assert_eq!(keys, ["z", "a"]);
    assert_eq!(message.get("z"), Some(&MessageValue::Text("replaced".into())));
    insta::assert_snapshot!(message, @r#"information[custom:note] z="replaced" a=2"#);
}

#[test]
fn standard_messages() {
    let blueprint = tag_start("a");
    let event = UnidocEvent::word("x");

    let unexpected = ValidationMessage::unexpected_content(&blueprint, &event);
    assert_eq!(unexpected.message_type, MessageType::Failure);
    assert_eq!(unexpected.code, UNEXPECTED_CONTENT);
    insta::assert_snapshot!(unexpected, @r#"failure[standard:blueprint:failure:unexpected-content] blueprint=tagStart("a") event=word "x""#);

    let unnecessary = ValidationMessage::unnecessary_content(&end(), None);
    assert!(unnecessary.get("event").is_none());

    let preferred = ValidationMessage::preferred_content(&blueprint);
    assert_eq!(preferred.message_type, MessageType::Warning);
    assert_eq!(preferred.code, PREFERRED_CONTENT);
}

#[test]
fn validation_event_display() {
    let events = [
        ValidationEvent {
            index: 0,
            batch: 1,
            kind: ValidationEventKind::Validation(UnidocEvent::tag_start("a")),
        },
        ValidationEvent {
            index: 1,
            batch: 1,
            kind: ValidationEventKind::BeginGroup("g".into()),
        },
        ValidationEvent {
            index: 2,
            batch: 2,
            kind: ValidationEventKind::DocumentCompletion,
        },
        ValidationEvent {
            index: 3,
            batch: 2,
            kind: ValidationEventKind::Message(ValidationMessage::required_content(&end())),
        },
    ];

    let rendered: Vec<_> = events.iter().map(ToString::to_string).collect();
    insta::assert_snapshot!(rendered.join("\n"), @r#"
    [0:1] VALIDATION <a>
    [1:1] BEGIN_GROUP "g"
    [2:2] DOCUMENT_COMPLETION
    [3:2] MESSAGE failure[standard:blueprint:failure:required-content] blueprint=end()
    "#);
    assert!(events[3].message().is_some());
    assert!(events[0].message().is_none());
}

#[test]
fn serde_roundtrip_of_log_entry() {
    let event = ValidationEvent {
        index: 4,
        batch: 1,
        kind: ValidationEventKind::Message(ValidationMessage::unexpected_content(
            &tag_start("a"),
            &UnidocEvent::tag_end("b"),
        )),
    };

    let json = serde_json::to_string(&event).unwrap();
    let parsed: ValidationEvent = serde_json::from_str(&json).unwrap();
    assert_eq!(parsed, event);
}
