//! Integration tests for the spy generator
//!
//! These tests drive the public facade end to end:
//! - Reading protocol descriptions from JSON
//! - Synthesizing the spy
//! - Emitting Swift source

use spysmith::{
    AccessLevel, Declaration, PreprocessorFlag, SynthesisError, SynthesisOptions,
    generate_swift, synthesize,
};

/// Helper to read a declaration from JSON
fn declaration(json: &str) -> Declaration {
    serde_json::from_str(json).expect("declaration should deserialize")
}

const REPOSITORY: &str = r#"{
    "kind": "protocol",
    "name": "Repository",
    "visibility": "public",
    "associatedTypes": [ { "name": "Item" } ],
    "properties": [
        { "bindings": [ { "pattern": "count", "type": "Int" } ] },
        { "bindings": [ { "pattern": "delegate", "type": "Delegate?" } ], "isMutable": true }
    ],
    "methods": [
        { "name": "item", "parameters": [ { "label": "at", "name": "index", "type": "Int" } ], "returnType": "Item?" },
        { "name": "item", "parameters": [ { "label": "at", "name": "index", "type": "String" } ], "returnType": "Item?" },
        { "name": "reset" }
    ]
}"#;

#[test]
fn test_repository_spy_end_to_end() {
    let swift = generate_swift(&declaration(REPOSITORY), &SynthesisOptions::default())
        .expect("repository should synthesize");

    assert!(
        swift.starts_with("public class RepositorySpy<Item>: Repository, @unchecked Sendable {\n"),
        "{swift}"
    );
    assert!(swift.contains("    public var underlyingCount: Int!\n"), "{swift}");
    assert!(swift.contains("    public var delegate: Delegate?\n"), "{swift}");

    // Overloads on the same labels are told apart by parameter type
    assert!(swift.contains("    public var itemAtIntOptionalItemCallsCount: Int = 0\n"), "{swift}");
    assert!(swift.contains("    public var itemAtStringOptionalItemCallsCount: Int = 0\n"), "{swift}");
    assert!(swift.contains("    public var itemAtIntOptionalItemReceivedIndex: Int?\n"), "{swift}");
    assert!(swift.contains("    public var itemAtIntOptionalItemReturnValue: Item?\n"), "{swift}");
    assert!(swift.contains("    public func item(at index: Int) -> Item? {\n"), "{swift}");

    assert!(swift.contains("    public var resetCallsCount: Int = 0\n"), "{swift}");
    assert!(swift.contains("        resetClosure?()\n"), "{swift}");
    assert!(!swift.contains("resetReturnValue"), "{swift}");
}

#[test]
fn test_options_override_visibility_and_wrap() {
    let options = SynthesisOptions::default()
        .with_access_level(AccessLevel::Internal)
        .with_preprocessor_flag(PreprocessorFlag::literal("MOCKS"));
    let swift =
        generate_swift(&declaration(REPOSITORY), &options).expect("repository should synthesize");

    assert!(swift.starts_with("#if MOCKS\ninternal class RepositorySpy<Item>"), "{swift}");
    assert!(swift.ends_with("}\n#endif\n"), "{swift}");
    assert!(!swift.contains("public "), "{swift}");
}

#[test]
fn test_generation_is_deterministic() {
    let declaration = declaration(REPOSITORY);
    let options = SynthesisOptions::default();
    let first = generate_swift(&declaration, &options).expect("synthesizes");
    let second = generate_swift(&declaration, &options).expect("synthesizes");
    assert_eq!(first, second);
}

#[test]
fn test_non_protocol_is_rejected() {
    let err = synthesize(
        &declaration(r#"{ "kind": "struct", "name": "Point" }"#),
        &SynthesisOptions::default(),
    )
    .expect_err("structs cannot be spied on");

    assert_eq!(
        err,
        SynthesisError::NotAnInterface {
            name: "Point".to_string(),
            kind: "struct",
        }
    );
    let diagnostic = err.to_diagnostic("point.json");
    assert_eq!(diagnostic.code, 1001);
    assert_eq!(diagnostic.notes.len(), 1);
}

#[test]
fn test_non_literal_flag_is_rejected() {
    let options = SynthesisOptions::default().with_preprocessor_flag(PreprocessorFlag::new("flag"));
    let err = generate_swift(&declaration(REPOSITORY), &options).expect_err("flag is not a literal");
    assert!(matches!(err, SynthesisError::NonLiteralPreprocessorFlag { .. }));
}
