use super::builders::*;
use super::*;
use crate::predicate::Predicate;

#[test]
fn display_builder_notation() {
    let blueprint = sequence([
        tag("h1", many(word_any()).at_least(1)),
        set([tag_start("a"), whitespace()]),
        lenient_sequence([anything(), word("x")]),
        disjunction([tag_end("b"), end()]),
        group("footer", many(tag_start("p")).between(0, 3)),
    ]);

    insta::assert_snapshot!(blueprint, @r#"sequence(tag(tagStart("h1"), many(word()).atLeast(1)), set(tagStart("a"), whitespace()), lenientSequence(anything(), word("x")), disjunction(tagEnd("b"), end()), group("footer", many(tagStart("p")).between(0, 3)))"#);
}

#[test]
fn display_composite_predicates() {
    let blueprint = event(Predicate::All(vec![
        Predicate::TagStart(None),
        Predicate::Class("note".into()).negate(),
        Predicate::Any(vec![
            Predicate::Identifier("intro".into()),
            Predicate::Whitespace,
        ]),
    ]));

    insta::assert_snapshot!(blueprint, @r#"all(tagStart(), not(class("note")), any(identifier("intro"), whitespace()))"#);
}

#[test]
fn bounds_rewrap_many() {
    let word = word_any();

    let bounded = many(word.clone()).between(1, 2);
    let BlueprintKind::Many {
        operand,
        minimum,
        maximum,
    } = bounded.kind()
    else {
        panic!("expected MANY, got {bounded}");
    };
    assert!(operand.ptr_eq(&word));
    assert_eq!((*minimum, *maximum), (1, Some(2)));

    let wrapped = word.optional();
    assert_eq!(wrapped, many(word.clone()).between(0, 1));
    assert_eq!(word.at_least(2).to_string(), "many(word()).atLeast(2)");
}

#[test]
fn equality_is_structural_identity_is_not() {
    let a = sequence([tag_start("a"), end()]);
    let b = sequence([tag_start("a"), end()]);

    assert_eq!(a, b);
    assert!(!a.ptr_eq(&b));
    assert!(a.ptr_eq(&a.clone()));
}

#[test]
fn operands_in_declaration_order() {
    let inner = tag_start("x");
    let blueprint = tag("div", inner.clone());

    assert_eq!(blueprint.blueprint_type(), BlueprintType::Tag);
    assert_eq!(blueprint.operands().len(), 1);
    assert!(blueprint.operands()[0].ptr_eq(&inner));

    assert!(end().operands().is_empty());
    assert_eq!(set([end(), anything(), whitespace()]).operands().len(), 3);
}

#[test]
fn validate_rejects_empty_disjunction() {
    let blueprint = sequence([disjunction([])]);

    let err = blueprint.validate().unwrap_err();
    assert!(matches!(err, BlueprintError::EmptyDisjunction));
}

#[test]
fn validate_rejects_inverted_bounds() {
    let blueprint = group("g", many(end()).between(3, 1));

    let err = blueprint.validate().unwrap_err();
    insta::assert_snapshot!(err, @"repetition bounds 3..=1 are empty");
}

#[test]
fn validate_rejects_wide_operand_lists() {
    let blueprint = set((0..=MAX_OPERANDS).map(|_| whitespace()));

    let err = blueprint.validate().unwrap_err();
    insta::assert_snapshot!(err, @"SET has 256 operands, at most 255 are supported");

    let widest = set((0..MAX_OPERANDS).map(|_| whitespace()));
    assert!(widest.validate().is_ok());
}

#[test]
fn empty_sequence_and_set_are_valid() {
    assert!(sequence([]).validate().is_ok());
    assert!(set([]).validate().is_ok());
    assert!(many(end()).between(0, 0).validate().is_ok());
}
