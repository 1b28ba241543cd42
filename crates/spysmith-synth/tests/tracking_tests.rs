use super::*;
use spysmith_syntax::{Effects, GenericParameter, parse_type};

fn ty(text: &str) -> TypeShape {
    parse_type(text).unwrap_or_else(|err| panic!("failed to parse {text:?}: {err}"))
}

fn field_names(fields: &TrackingFieldSet) -> Vec<String> {
    fields
        .declarations(None)
        .iter()
        .map(|member| member.name().to_string())
        .collect()
}

#[test]
fn test_fetch_id_fields() {
    let method = MethodMember::new("fetch")
        .with_parameter(Parameter::new("id", ty("String")))
        .with_effects(Effects::ASYNC | Effects::THROWS)
        .returning(ty("Int"));
    let fields = fields_for(&method, "fetchId");

    assert_eq!(
        field_names(&fields),
        [
            "fetchIdCallsCount",
            "fetchIdCalled",
            "fetchIdReceivedId",
            "fetchIdReceivedInvocations",
            "fetchIdThrowableError",
            "fetchIdReturnValue",
            "fetchIdClosure",
        ]
    );

    let recording = fields.recording.as_ref().expect("trackable");
    assert_eq!(recording.received.ty.to_string(), "String?");
    assert_eq!(recording.invocations.ty.to_string(), "[String]");
    assert_eq!(
        fields.throwable_error.as_ref().map(|f| f.ty.to_string()),
        Some("(any Error)?".to_string())
    );
    assert_eq!(
        fields.return_value.as_ref().map(|f| f.ty.to_string()),
        Some("Int!".to_string())
    );
    assert_eq!(
        fields.closure.ty.to_string(),
        "((String) async throws -> Int)?"
    );
    assert!(fields.cast_target.is_none());
}

#[test]
fn test_no_parameters_means_no_recording() {
    let method = MethodMember::new("reset");
    let fields = fields_for(&method, "reset");
    assert!(fields.recording.is_none());
    assert!(fields.throwable_error.is_none());
    assert!(fields.return_value.is_none());
    assert_eq!(
        field_names(&fields),
        ["resetCallsCount", "resetCalled", "resetClosure"]
    );
    assert_eq!(fields.closure.ty.to_string(), "(() -> Void)?");
}

#[test]
fn test_multiple_parameters_use_a_labeled_tuple() {
    let method = MethodMember::new("move")
        .with_parameter(Parameter::labeled("from", "source", ty("Int")))
        .with_parameter(Parameter::labeled("to", "destination", ty("Int?")));
    let fields = fields_for(&method, "moveFromTo");

    let recording = fields.recording.as_ref().expect("trackable");
    assert_eq!(recording.received.name, "moveFromToReceivedArguments");
    assert_eq!(
        recording.received.ty.to_string(),
        "(source: Int, destination: Int?)?"
    );
    assert_eq!(
        recording.invocations.ty.to_string(),
        "[(source: Int, destination: Int?)]"
    );
    assert_eq!(recording.arguments.as_slice(), ["source", "destination"]);
}

#[test]
fn test_optional_parameter_is_not_double_wrapped() {
    let method = MethodMember::new("update").with_parameter(Parameter::new("tag", ty("String?")));
    let fields = fields_for(&method, "updateTag");
    let recording = fields.recording.expect("trackable");
    assert_eq!(recording.received.ty.to_string(), "String?");
    assert_eq!(recording.invocations.ty.to_string(), "[String?]");
}

#[test]
fn test_non_escaping_closure_parameter_is_untrackable() {
    let method = MethodMember::new("perform")
        .with_parameter(Parameter::new("id", ty("Int")))
        .with_parameter(Parameter::new("action", ty("() -> Void")));
    let fields = fields_for(&method, "performIdAction");
    assert!(fields.recording.is_none());
    assert_eq!(
        fields.closure.ty.to_string(),
        "((Int, () -> Void) -> Void)?"
    );
}

#[test]
fn test_variadic_closure_parameter_is_trackable() {
    let method = MethodMember::new("run")
        .with_parameter(Parameter::unlabeled("actions", ty("() -> Void")).variadic());
    assert!(is_trackable(&method.parameters));

    let fields = fields_for(&method, "run");
    assert_eq!(
        field_names(&fields),
        [
            "runCallsCount",
            "runCalled",
            "runReceivedActions",
            "runReceivedInvocations",
            "runClosure",
        ]
    );
    let recording = fields.recording.as_ref().expect("trackable");
    assert_eq!(recording.received.ty.to_string(), "[() -> Void]?");
    assert_eq!(recording.invocations.ty.to_string(), "[[() -> Void]]");
}

#[test]
fn test_escaping_closure_is_stored_without_attribute() {
    let method = MethodMember::new("subscribe")
        .with_parameter(Parameter::new("handler", ty("@escaping (Int) -> Void")));
    let fields = fields_for(&method, "subscribeHandler");
    let recording = fields.recording.as_ref().expect("trackable");
    assert_eq!(recording.received.ty.to_string(), "((Int) -> Void)?");
    assert_eq!(
        fields.closure.ty.to_string(),
        "((@escaping (Int) -> Void) -> Void)?"
    );
}

#[test]
fn test_generic_method_storage_is_erased() {
    let method = MethodMember::new("decode")
        .with_generic(GenericParameter::new("T"))
        .with_parameter(Parameter::unlabeled("data", ty("[T]")))
        .returning(ty("T"));
    let fields = fields_for(&method, "decode");

    let recording = fields.recording.as_ref().expect("trackable");
    assert_eq!(recording.received.name, "decodeReceivedData");
    assert_eq!(recording.received.ty.to_string(), "[Any]?");
    assert_eq!(
        fields.return_value.as_ref().map(|f| f.ty.to_string()),
        Some("Any!".to_string())
    );
    assert_eq!(fields.closure.ty.to_string(), "(([Any]) -> Any)?");
    assert_eq!(fields.cast_target, Some(ty("T")));
}

#[test]
fn test_variadic_inout_and_autoclosure_parameters() {
    let method = MethodMember::new("log")
        .with_parameter(Parameter::unlabeled("values", ty("String")).variadic())
        .with_parameter(Parameter::new("count", ty("Int")).inout());
    let fields = fields_for(&method, "logCount");
    let recording = fields.recording.as_ref().expect("trackable");
    assert_eq!(
        recording.received.ty.to_string(),
        "(values: [String], count: Int)?"
    );
    assert_eq!(
        fields.closure.ty.to_string(),
        "(([String], inout Int) -> Void)?"
    );

    let method = MethodMember::new("assert")
        .with_parameter(Parameter::new("message", ty("@escaping () -> String")).autoclosure());
    let fields = fields_for(&method, "assertMessage");
    assert!(fields.recording.is_some());
    assert_eq!(
        fields.closure.ty.to_string(),
        "((@autoclosure @escaping () -> String) -> Void)?"
    );

    let method = MethodMember::new("expect")
        .with_parameter(Parameter::new("message", ty("() -> String")).autoclosure());
    assert!(fields_for(&method, "expectMessage").recording.is_none());
}

#[test]
fn test_optional_and_opaque_returns() {
    let method = MethodMember::new("find").returning(ty("String?"));
    let fields = fields_for(&method, "find");
    assert_eq!(
        fields.return_value.map(|f| f.ty.to_string()),
        Some("String?".to_string())
    );

    let method = MethodMember::new("render").returning(ty("some View"));
    let fields = fields_for(&method, "render");
    assert_eq!(
        fields.return_value.map(|f| f.ty.to_string()),
        Some("(any View)!".to_string())
    );
    assert_eq!(fields.closure.ty.to_string(), "(() -> any View)?");
}

#[test]
fn test_void_return_has_no_return_value() {
    let method = MethodMember::new("flush").returning(ty("Void"));
    let fields = fields_for(&method, "flush");
    assert!(!fields.returns_value());
    assert_eq!(fields.closure.ty.to_string(), "(() -> Void)?");
}

#[test]
fn test_declarations_carry_access_and_initializers() {
    let method = MethodMember::new("ping").with_parameter(Parameter::new("host", ty("String")));
    let members = fields_for(&method, "pingHost").declarations(Some(AccessLevel::Public));
    assert!(members.iter().all(|m| m.access() == Some(AccessLevel::Public)));

    let SpyMember::StoredProperty(count) = &members[0] else {
        panic!("expected the counter first");
    };
    assert_eq!(count.initializer, Some(SwiftNode::int(0)));

    let SpyMember::ComputedProperty(called) = &members[1] else {
        panic!("expected the computed called flag");
    };
    assert!(called.setter.is_none());

    let SpyMember::StoredProperty(invocations) = &members[3] else {
        panic!("expected the invocation history");
    };
    assert_eq!(invocations.initializer, Some(SwiftNode::EmptyArray));
}
