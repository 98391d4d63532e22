use indoc::indoc;
use unidoc_core::blueprint::builders::{
    disjunction, end, group, lenient_sequence, many, sequence, set, tag, tag_start, word,
    word_any,
};
use unidoc_core::{
    Blueprint, BlueprintError, BranchId, REQUIRED_CONTENT, UNEXPECTED_CONTENT,
    UNNECESSARY_CONTENT, UnidocEvent,
};
use unidoc_vm::{PrintTracer, Verbosity};

use crate::Error;
use crate::outcome::{ValidationOutcome, Verdict};
use crate::tree::BranchStatus;
use crate::validator::{Validator, validate};

fn run(blueprint: &Blueprint, events: &[UnidocEvent]) -> ValidationOutcome {
    validate(blueprint, events).unwrap()
}

fn codes(outcome: &ValidationOutcome) -> Vec<&str> {
    outcome.messages().map(|m| m.code.as_str()).collect()
}

fn words(n: usize) -> Vec<UnidocEvent> {
    vec![UnidocEvent::word("w"); n]
}

#[test]
fn sequence_in_order_is_accepted() {
    let outcome = run(
        &sequence([tag_start("a"), end()]),
        &[UnidocEvent::tag_start("a")],
    );

    assert_eq!(outcome.verdict, Verdict::Accepted);
    assert_eq!(outcome.branch, BranchId(0));
    insta::assert_snapshot!(outcome.render(), @r"
    [0:1] VALIDATION <a>
    [1:2] DOCUMENT_COMPLETION
    ");
}

#[test]
fn sequence_out_of_order_is_rejected() {
    let outcome = run(
        &sequence([tag_start("a"), end()]),
        &[UnidocEvent::word("x")],
    );

    assert_eq!(outcome.verdict, Verdict::Rejected);
    insta::assert_snapshot!(outcome.render(), @r#"
    [0:1] VALIDATION word "x"
    [1:1] MESSAGE failure[standard:blueprint:failure:unexpected-content] blueprint=tagStart("a") event=word "x"
    "#);
}

#[test]
fn missing_content_is_required() {
    let outcome = run(&sequence([tag_start("a"), end()]), &[]);

    assert_eq!(outcome.verdict, Verdict::Rejected);
    assert_eq!(codes(&outcome), [REQUIRED_CONTENT]);
}

#[test]
fn trailing_content_is_unnecessary() {
    let outcome = run(
        &sequence([tag_start("a"), end()]),
        &[UnidocEvent::tag_start("a"), UnidocEvent::word("x")],
    );

    assert_eq!(outcome.verdict, Verdict::Rejected);
    assert_eq!(codes(&outcome), [UNNECESSARY_CONTENT]);
}

#[test]
fn many_bounds_decide_the_verdict() {
    let blueprint = sequence([many(word_any()).between(1, 2), end()]);

    let verdicts: Vec<Verdict> = (0..4)
        .map(|n| run(&blueprint, &words(n)).verdict)
        .collect();

    assert_eq!(
        verdicts,
        [
            Verdict::Rejected,
            Verdict::Accepted,
            Verdict::Accepted,
            Verdict::Rejected
        ]
    );
    assert_eq!(codes(&run(&blueprint, &words(0))), [REQUIRED_CONTENT]);
}

#[test]
fn unbounded_many_accepts_long_runs() {
    let blueprint = sequence([many(word_any()).at_least(2), end()]);

    assert_eq!(run(&blueprint, &words(1)).verdict, Verdict::Rejected);
    assert_eq!(run(&blueprint, &words(300)).verdict, Verdict::Accepted);
}

#[test]
fn bare_many_accepts_once_satisfied() {
    let blueprint = many(tag_start("x")).between(1, 2);

    let outcome = run(&blueprint, &vec![UnidocEvent::tag_start("x"); 3]);

    assert_eq!(outcome.verdict, Verdict::Accepted);
    assert_eq!(outcome.branch, BranchId(1));
    assert_eq!(outcome.messages().count(), 0);
    insta::assert_snapshot!(outcome.render(), @r"
    [0:1] VALIDATION <x>
    [1:2] VALIDATION <x>
    [2:3] VALIDATION <x>
    [3:4] DOCUMENT_COMPLETION
    ");
}

#[test]
fn anchored_many_rejects_an_extra_occurrence() {
    let blueprint = sequence([many(tag_start("x")).between(1, 2), end()]);
    let mut validator = Validator::new(&blueprint).unwrap();

    for _ in 0..3 {
        validator.event(&UnidocEvent::tag_start("x")).unwrap();
    }
    let outcome = validator.complete().unwrap();

    assert_eq!(outcome.verdict, Verdict::Rejected);
    let tree = validator.tree();
    assert_eq!(tree.status(BranchId(0)), Some(BranchStatus::Terminated));
    let log = tree.events(BranchId(0)).unwrap();
    let log: Vec<String> = log.iter().map(ToString::to_string).collect();
    insta::assert_snapshot!(log.join("\n"), @r#"
    [0:1] VALIDATION <x>
    [1:2] VALIDATION <x>
    [2:3] VALIDATION <x>
    [3:3] MESSAGE failure[standard:blueprint:failure:unnecessary-content] blueprint=many(tagStart("x")).between(1, 2)
    "#);
}

#[test]
fn sequence_reports_the_first_missing_operand() {
    let blueprint = sequence([tag_start("a"), tag_start("b"), tag_start("c"), end()]);
    let events = [
        UnidocEvent::tag_start("a"),
        UnidocEvent::tag_start("c"),
        UnidocEvent::tag_start("b"),
    ];

    let outcome = run(&blueprint, &events);

    assert_eq!(outcome.verdict, Verdict::Rejected);
    insta::assert_snapshot!(outcome.render(), @r#"
    [0:1] VALIDATION <a>
    [1:2] VALIDATION <c>
    [2:2] MESSAGE failure[standard:blueprint:failure:unexpected-content] blueprint=tagStart("b") event=<c>
    "#);
}

#[test]
fn set_accepts_any_permutation() {
    let blueprint = sequence([set([word("a"), word("b")]), end()]);

    for order in [["a", "b"], ["b", "a"]] {
        let events: Vec<_> = order.into_iter().map(UnidocEvent::word).collect();
        let outcome = run(&blueprint, &events);
        assert_eq!(outcome.verdict, Verdict::Accepted, "{order:?}");
        assert_eq!(outcome.messages().count(), 0, "{order:?}");
    }
}

#[test]
fn set_accepts_every_permutation_of_three() {
    let blueprint = sequence([
        set([tag_start("red"), tag_start("green"), tag_start("blue")]),
        end(),
    ]);
    let orders = [
        ["red", "green", "blue"],
        ["red", "blue", "green"],
        ["green", "red", "blue"],
        ["green", "blue", "red"],
        ["blue", "red", "green"],
        ["blue", "green", "red"],
    ];

    for order in orders {
        let events: Vec<_> = order.into_iter().map(UnidocEvent::tag_start).collect();
        let outcome = run(&blueprint, &events);
        assert_eq!(outcome.verdict, Verdict::Accepted, "{order:?}");
        assert_eq!(outcome.messages().count(), 0, "{order:?}");
    }
}

#[test]
fn set_rejects_duplicates() {
    let blueprint = sequence([set([word("a"), word("b")]), end()]);

    let outcome = run(&blueprint, &[UnidocEvent::word("a"), UnidocEvent::word("a")]);

    assert_eq!(outcome.verdict, Verdict::Rejected);
    assert_eq!(codes(&outcome), [UNEXPECTED_CONTENT]);
}

#[test]
fn set_of_tags_in_any_order() {
    let blueprint = sequence([
        set([tag("a", many(word_any())), tag("b", many(word_any()))]),
        end(),
    ]);
    let events = [
        UnidocEvent::tag_start("b"),
        UnidocEvent::tag_end("b"),
        UnidocEvent::tag_start("a"),
        UnidocEvent::word("x"),
        UnidocEvent::tag_end("a"),
    ];

    let outcome = run(&blueprint, &events);

    assert_eq!(outcome.verdict, Verdict::Accepted);
    assert_eq!(outcome.validations().count(), 5);
}

#[test]
fn foreign_tag_is_rejected() {
    let blueprint = sequence([set([tag_start("a"), tag_start("b")]), end()]);

    let outcome = run(&blueprint, &[UnidocEvent::tag_start("c")]);

    assert_eq!(outcome.verdict, Verdict::Rejected);
    assert_eq!(codes(&outcome), [UNEXPECTED_CONTENT]);
}

#[test]
fn closing_tag_must_match() {
    let blueprint = sequence([tag("p", word_any()), end()]);
    let events = [
        UnidocEvent::tag_start("p"),
        UnidocEvent::word("x"),
        UnidocEvent::tag_end("q"),
    ];

    let outcome = run(&blueprint, &events);

    assert_eq!(outcome.verdict, Verdict::Rejected);
    let message = outcome.messages().last().unwrap();
    assert_eq!(message.code, UNEXPECTED_CONTENT);
    insta::assert_snapshot!(message.get("event").unwrap(), @"</q>");
}

#[test]
fn disjunction_takes_the_matching_alternative() {
    let blueprint = disjunction([tag_start("a"), word("x")]);

    let outcome = run(&blueprint, &[UnidocEvent::word("x"), UnidocEvent::tag_start("b")]);

    assert_eq!(outcome.verdict, Verdict::Accepted);
    assert_eq!(outcome.branch, BranchId(1));
    insta::assert_snapshot!(outcome.render(), @r#"
    [0:1] VALIDATION word "x"
    [1:2] VALIDATION <b>
    [2:3] DOCUMENT_COMPLETION
    "#);
}

#[test]
fn disjunction_without_a_match_is_rejected() {
    let blueprint = disjunction([tag_start("a"), tag_start("b")]);

    let outcome = run(&blueprint, &[UnidocEvent::tag_start("c")]);

    assert_eq!(outcome.verdict, Verdict::Rejected);
    assert_eq!(outcome.branch, BranchId(1));
    insta::assert_snapshot!(outcome.render(), @r#"
    [0:1] VALIDATION <c>
    [1:1] MESSAGE failure[standard:blueprint:failure:unexpected-content] blueprint=tagStart("b") event=<c>
    "#);
    for name in ["a", "b"] {
        let outcome = run(&blueprint, &[UnidocEvent::tag_start(name)]);
        assert_eq!(outcome.verdict, Verdict::Accepted, "{name}");
    }
}

#[test]
fn lenient_sequence_warns_about_order() {
    let blueprint = sequence([lenient_sequence([word("a"), word("b")]), end()]);

    let outcome = run(&blueprint, &[UnidocEvent::word("b"), UnidocEvent::word("a")]);

    assert_eq!(outcome.verdict, Verdict::Accepted);
    insta::assert_snapshot!(outcome.render(), @r#"
    [0:1] VALIDATION word "b"
    [1:1] MESSAGE warning[standard:blueprint:warning:preferred-content] blueprint=word("a")
    [2:2] VALIDATION word "a"
    [3:3] DOCUMENT_COMPLETION
    "#);
}

#[test]
fn group_brackets_its_operand() {
    let mut validator = Validator::new(&group("g", tag_start("a"))).unwrap();

    validator.event(&UnidocEvent::tag_start("a")).unwrap();
    assert!(validator.is_accepting());
    let outcome = validator.complete().unwrap();

    insta::assert_snapshot!(outcome.render(), @r#"
    [0:0] BEGIN_GROUP "g"
    [1:1] VALIDATION <a>
    [2:1] END_GROUP "g"
    [3:2] DOCUMENT_COMPLETION
    "#);
}

#[test]
fn open_document_is_undecided() {
    let mut validator = Validator::new(&sequence([tag_start("a"), end()])).unwrap();

    validator.event(&UnidocEvent::tag_start("a")).unwrap();

    assert!(!validator.is_accepting());
    assert_eq!(validator.pending().len(), 1);
    let outcome = validator.tree().outcome();
    assert_eq!(outcome.verdict, Verdict::Undecided);
    assert_eq!(
        validator.tree().status(BranchId(0)),
        Some(BranchStatus::Running)
    );
}

#[test]
fn completed_validator_refuses_input() {
    let mut validator = Validator::new(&end()).unwrap();
    validator.complete().unwrap();

    assert!(matches!(
        validator.event(&UnidocEvent::word("x")),
        Err(Error::AlreadyCompleted)
    ));
    assert!(matches!(validator.complete(), Err(Error::AlreadyCompleted)));
}

#[test]
fn invalid_blueprint_is_refused() {
    let err = validate(&disjunction(Vec::new()), Vec::<UnidocEvent>::new()).unwrap_err();

    assert!(matches!(
        err,
        Error::Blueprint(BlueprintError::EmptyDisjunction)
    ));
    insta::assert_snapshot!(err, @"invalid blueprint: disjunction without operands can never match");
}

#[test]
fn json_blueprint_end_to_end() {
    let blueprint = Blueprint::from_json(indoc! {r#"
        {
            "type": "SEQUENCE",
            "operands": [
                {
                    "type": "TAG",
                    "predicate": { "type": "TAG_START", "tag": "p" },
                    "content": {
                        "type": "MANY",
                        "minimum": 1,
                        "operand": { "type": "EVENT", "predicate": { "type": "WORD" } }
                    }
                },
                { "type": "END" }
            ]
        }
    "#})
    .unwrap();
    let events = [
        UnidocEvent::tag_start("p"),
        UnidocEvent::word("hello"),
        UnidocEvent::word("world"),
        UnidocEvent::tag_end("p"),
    ];

    assert!(run(&blueprint, &events).is_accepted());
    assert!(!run(&blueprint, &events[..1]).is_accepted());
}

#[test]
fn outcome_serializes_to_json() {
    let outcome = run(
        &sequence([tag_start("a"), end()]),
        &[UnidocEvent::tag_start("a")],
    );

    let json = serde_json::to_value(&outcome).unwrap();

    assert_eq!(json["verdict"], "ACCEPTED");
    assert_eq!(json["branch"], 0);
    assert_eq!(json["events"].as_array().unwrap().len(), 2);
    assert_eq!(json["events"][1]["batch"], 2);
}

#[test]
fn tracer_sees_each_event() {
    let mut validator = Validator::new(&sequence([tag_start("a"), end()])).unwrap();
    let mut tracer = PrintTracer::new(Verbosity::Default);

    validator
        .event_with(&UnidocEvent::tag_start("a"), &mut tracer)
        .unwrap();

    insta::assert_snapshot!(tracer.dump(), @r"
    EVENT #0 g1[00]
    SUCCESS #0 g1[00]
    DIVE #0 g0[0101]
    START #0 g2[]
    ENTER #0 g2[00]
    ");
}

#[test]
fn log_tracer_runs_without_subscriber() {
    let mut validator = Validator::with_config(
        &sequence([many(word_any()), end()]),
        crate::ExecutorConfig::new().state_capacity(8),
    )
    .unwrap();
    let mut tracer = crate::LogTracer;

    validator
        .event_with(&UnidocEvent::word("x"), &mut tracer)
        .unwrap();
    let outcome = validator.complete_with(&mut tracer).unwrap();

    assert!(outcome.is_accepted());
}
