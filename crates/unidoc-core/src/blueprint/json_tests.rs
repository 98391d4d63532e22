use indoc::indoc;

use super::builders::*;
use super::*;
use crate::predicate::Predicate;

#[test]
fn parse_event_and_end() {
    let json = indoc! {r#"
        {
            "type": "SEQUENCE",
            "operands": [
                { "type": "EVENT", "predicate": { "type": "TAG_START", "tag": "a" } },
                { "type": "END" }
            ]
        }
    "#};

    let blueprint = Blueprint::from_json(json).unwrap();
    assert_eq!(blueprint, sequence([tag_start("a"), end()]));
}

#[test]
fn parse_many_defaults() {
    let json = r#"{ "type": "MANY", "operand": { "type": "END" } }"#;

    let blueprint = Blueprint::from_json(json).unwrap();
    assert_eq!(blueprint, many(end()));
}

#[test]
fn parse_many_bounds() {
    let json = indoc! {r#"
        {
            "type": "MANY",
            "minimum": 1,
            "maximum": 2,
            "operand": { "type": "EVENT", "predicate": { "type": "WORD" } }
        }
    "#};

    let blueprint = Blueprint::from_json(json).unwrap();
    assert_eq!(blueprint.to_string(), "many(word()).between(1, 2)");
}

#[test]
fn parse_tag_group_and_predicates() {
    let json = indoc! {r#"
        {
            "type": "GROUP",
            "label": "section",
            "operand": {
                "type": "TAG",
                "predicate": {
                    "type": "ALL",
                    "operands": [
                        { "type": "TAG_START", "tag": "div" },
                        { "type": "CLASS", "class": "box" },
                        { "type": "NOT", "operand": { "type": "IDENTIFIER", "identifier": "skip" } }
                    ]
                },
                "content": {
                    "type": "LENIENT_SEQUENCE",
                    "operands": [
                        { "type": "EVENT", "predicate": { "type": "ANY", "operands": [
                            { "type": "WHITESPACE" },
                            { "type": "ANYTHING" }
                        ] } },
                        { "type": "SET", "operands": [] },
                        { "type": "DISJUNCTION", "operands": [
                            { "type": "EVENT", "predicate": { "type": "TAG_END" } }
                        ] }
                    ]
                }
            }
        }
    "#};

    let blueprint = Blueprint::from_json(json).unwrap();
    insta::assert_snapshot!(blueprint, @r#"group("section", tag(all(tagStart("div"), class("box"), not(identifier("skip"))), lenientSequence(any(whitespace(), anything()), set(), disjunction(tagEnd()))))"#);

    let BlueprintKind::Group { operand, .. } = blueprint.kind() else {
        panic!("expected GROUP");
    };
    let BlueprintKind::Tag { predicate, .. } = operand.kind() else {
        panic!("expected TAG");
    };
    assert!(matches!(predicate, Predicate::All(ops) if ops.len() == 3));
}

#[test]
fn unknown_type_is_json_error() {
    let json = r#"{ "type": "CHOICE", "operands": [] }"#;

    let err = Blueprint::from_json(json).unwrap_err();
    assert!(matches!(err, BlueprintError::Json(_)));
}

#[test]
fn loading_validates() {
    let json = r#"{ "type": "DISJUNCTION", "operands": [] }"#;

    let err = Blueprint::from_json(json).unwrap_err();
    assert!(matches!(err, BlueprintError::EmptyDisjunction));
}
