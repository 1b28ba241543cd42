use super::*;
use spysmith_syntax::parse_type;

fn ty(text: &str) -> TypeShape {
    parse_type(text).unwrap_or_else(|err| panic!("failed to parse {text:?}: {err}"))
}

#[test]
fn test_classify() {
    assert_eq!(classify(&ty("String?")), ShapeCategory::Optional);
    assert_eq!(classify(&ty("String!")), ShapeCategory::ImplicitlyUnwrapped);
    assert_eq!(classify(&ty("[Int]")), ShapeCategory::Array);
    assert_eq!(classify(&ty("[String: Int]")), ShapeCategory::Dictionary);
    assert_eq!(classify(&ty("(a: Int, b: Int)")), ShapeCategory::Tuple);
    assert_eq!(classify(&ty("(Int) -> Void")), ShapeCategory::Function);
    assert_eq!(classify(&ty("T")), ShapeCategory::GenericIdentifier);
    assert_eq!(classify(&ty("Set<T>")), ShapeCategory::GenericApplication);
    assert_eq!(classify(&ty("A & B")), ShapeCategory::Composite);
    assert_eq!(
        classify(&ty("any Error")),
        ShapeCategory::Qualified(Qualifier::Any)
    );
    assert_eq!(
        classify(&ty("some View")),
        ShapeCategory::Qualified(Qualifier::Some)
    );
    assert_eq!(classify(&ty("Foo.Bar")), ShapeCategory::MemberQualified);
    assert_eq!(classify(&ty("@escaping () -> Void")), ShapeCategory::Attributed);
    assert_eq!(classify(&ty("Int...")), ShapeCategory::Variadic);
    assert_eq!(
        classify(&TypeShape::Opaque("~Copyable".to_string())),
        ShapeCategory::Opaque
    );
}

#[test]
fn test_erasure_replaces_every_occurrence() {
    let names = ["T", "U"];
    let cases = [
        ("T", "Any"),
        ("T?", "Any?"),
        ("[T]", "[Any]"),
        ("[String: U]", "[String: Any]"),
        ("(T, Int) -> U", "(Any, Int) -> Any"),
        ("Result<T, any Error>", "Result<Any, any Error>"),
        ("(value: T, count: Int)", "(value: Any, count: Int)"),
        ("@escaping (T) -> Void", "@escaping (Any) -> Void"),
        ("T.Element", "Any"),
        ("Set<T.Element>?", "Set<Any>?"),
        ("Tee", "Tee"),
    ];
    for (input, expected) in cases {
        assert_eq!(
            erasing_generic_parameters(&ty(input), &names).to_string(),
            expected,
            "erasing {input:?}"
        );
    }
}

#[test]
fn test_erasure_without_names_is_identity() {
    let shape = ty("[String: (Int) async throws -> T?]");
    assert_eq!(erasing_generic_parameters(&shape, &[]), shape);
}

#[test]
fn test_erasure_leaves_opaque_untouched() {
    let shape = TypeShape::optional(TypeShape::Opaque("T where T: P".to_string()));
    assert_eq!(erasing_generic_parameters(&shape, &["T"]), shape);
}

#[test]
fn test_contains_generic_parameter() {
    assert!(contains_generic_parameter(&ty("[String: [T]]"), &["T"]));
    assert!(contains_generic_parameter(&ty("(Int) -> T"), &["T"]));
    assert!(contains_generic_parameter(&ty("T.Type"), &["T"]));
    assert!(!contains_generic_parameter(&ty("Tee"), &["T"]));
    assert!(!contains_generic_parameter(&ty("T"), &[]));
}

#[test]
fn test_sanitized_labels() {
    let cases = [
        ("String", "String"),
        ("[String]", "ArrayString"),
        ("Array<String>", "ArrayString"),
        ("[String: Int]", "DictionaryStringInt"),
        ("String?", "OptionalString"),
        ("[String?]", "ArrayOptionalString"),
        ("[String]?", "OptionalArrayString"),
        ("String!", "ImplicitlyUnwrappedString"),
        ("(Int) -> Bool", "FunctionIntReturnsBool"),
        ("any Error", "AnyError"),
        ("some View", "SomeView"),
        ("A & B", "AAndB"),
        ("Foundation.Date", "FoundationDate"),
        ("()", "Void"),
        ("Void", "Void"),
    ];
    for (input, expected) in cases {
        assert_eq!(sanitized_label(&ty(input)), expected, "label of {input:?}");
    }
}

#[test]
fn test_sanitized_label_is_identifier_safe() {
    let label = sanitized_label(&ty("(name: String, Int) async throws -> [Int: T]?"));
    assert!(label.chars().all(|c| c.is_alphanumeric() || c == '_'), "{label}");
}

#[test]
fn test_void_and_optional_predicates() {
    assert!(is_void(&ty("Void")));
    assert!(is_void(&ty("()")));
    assert!(is_void(&ty("Swift.Void")));
    assert!(!is_void(&ty("Void?")));

    assert!(is_optional_like(&ty("Int?")));
    assert!(is_optional_like(&ty("Int!")));
    assert!(!is_optional_like(&ty("[Int?]")));
}

#[test]
fn test_plain_function_detection() {
    assert!(is_plain_function(&ty("() -> Void")));
    assert!(is_plain_function(&ty("@Sendable () -> Void")));
    assert!(!is_plain_function(&ty("@escaping () -> Void")));
    assert!(!is_plain_function(&ty("(() -> Void)?")));
    assert!(!is_plain_function(&ty("Int")));
}

#[test]
fn test_storage_type() {
    assert_eq!(
        storage_type(&ty("@escaping (T) -> Void"), &["T"]).to_string(),
        "(Any) -> Void"
    );
    assert_eq!(storage_type(&ty("some Collection"), &[]).to_string(), "any Collection");
    assert_eq!(storage_type(&ty("[some Shape]"), &[]).to_string(), "[any Shape]");
    assert_eq!(
        storage_type(&ty("@Sendable @escaping () -> Void"), &[]).to_string(),
        "@Sendable () -> Void"
    );
}

#[test]
fn test_erasure_in_typed_throws() {
    assert_eq!(
        erasing_generic_parameters(&ty("(T) throws(E) -> Void"), &["T", "E"]).to_string(),
        "(Any) throws(any Error) -> Void"
    );
    assert_eq!(
        erasing_generic_parameters(&ty("() throws(MyError) -> T"), &["T"]).to_string(),
        "() throws(MyError) -> Any"
    );
    assert!(contains_generic_parameter(&ty("() throws(E) -> Void"), &["E"]));
    assert_eq!(
        sanitized_label(&ty("() throws(MyError) -> Void")),
        "FunctionThrowsMyErrorReturnsVoid"
    );
}
