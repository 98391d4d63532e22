use super::builders::*;
use super::*;

#[test]
fn roundtrip() {
    let blueprint = group(
        "doc",
        sequence([
            tag("p", set([word("a"), many(whitespace()).between(1, 4)])),
            end(),
        ]),
    );

    let binary = blueprint.to_binary().unwrap();
    let decoded = Blueprint::from_binary(&binary).unwrap();

    assert_eq!(decoded, blueprint);
    assert_eq!(decoded.to_string(), blueprint.to_string());
}

#[test]
fn loading_validates() {
    let blueprint = many(end()).between(2, 1);
    let binary = blueprint.to_binary().unwrap();

    let err = Blueprint::from_binary(&binary).unwrap_err();
    assert!(matches!(
        err,
        BlueprintError::InvalidBounds {
            minimum: 2,
            maximum: 1
        }
    ));
}

#[test]
fn truncated_input_is_binary_error() {
    let binary = sequence([tag_start("a"), end()]).to_binary().unwrap();

    let err = Blueprint::from_binary(&binary[..binary.len() - 1]).unwrap_err();
    assert!(matches!(err, BlueprintError::Binary(_)));
}
