use super::*;
use spysmith_common::{ErrorKind, PreprocessorFlag};
use spysmith_syntax::{AssociatedType, Parameter, PropertyBinding};

fn protocol(interface: InterfaceDescription) -> Declaration {
    Declaration::Protocol(interface)
}

fn service() -> InterfaceDescription {
    InterfaceDescription::new("Service")
        .with_property(PropertyMember::new("name", TypeShape::named("String"), true))
        .with_property(PropertyMember::new(
            "tag",
            TypeShape::optional(TypeShape::named("String")),
            true,
        ))
        .with_method(
            MethodMember::new("fetch")
                .with_parameter(Parameter::new("id", TypeShape::named("String")))
                .with_effects(Effects::ASYNC | Effects::THROWS)
                .returning(TypeShape::named("Int")),
        )
}

fn synth(interface: InterfaceDescription) -> SpyDeclaration {
    synthesize(&protocol(interface), &SynthesisOptions::default()).expect("synthesizes")
}

#[test]
fn test_empty_interface_has_only_initializer_scaffolding() {
    let output = synth(InterfaceDescription::new("Empty"));
    assert_eq!(output.spy.name, "EmptySpy");
    assert_eq!(output.spy.member_names().collect::<Vec<_>>(), ["init"]);
    assert_eq!(output.spy.instrumentation_len(), 0);
    assert!(output.condition.is_none());
    assert_eq!(
        output.spy.inheritance,
        vec![
            TypeShape::named("Empty"),
            TypeShape::attributed(vec!["@unchecked".to_string()], TypeShape::named("Sendable")),
        ]
    );

    let SpyMember::Initializer(init) = &output.spy.members[0] else {
        panic!("expected the default initializer");
    };
    assert!(!init.is_override);
    assert!(init.body.is_empty());
}

#[test]
fn test_member_order_and_names() {
    let output = synth(service());
    assert_eq!(
        output.spy.member_names().collect::<Vec<_>>(),
        [
            "init",
            "name",
            "underlyingName",
            "tag",
            "fetchIdCallsCount",
            "fetchIdCalled",
            "fetchIdReceivedId",
            "fetchIdReceivedInvocations",
            "fetchIdThrowableError",
            "fetchIdReturnValue",
            "fetchIdClosure",
            "fetch",
        ]
    );
}

#[test]
fn test_non_optional_property_redirects_to_underlying_storage() {
    let output = synth(service());

    let Some(SpyMember::ComputedProperty(name)) = output.spy.property("name") else {
        panic!("expected a computed property");
    };
    assert_eq!(name.ty, TypeShape::named("String"));
    assert_eq!(
        name.getter,
        vec![SwiftNode::ret(Some(SwiftNode::id("underlyingName")))]
    );
    assert_eq!(
        name.setter,
        Some(vec![SwiftNode::assign(
            SwiftNode::id("underlyingName"),
            SwiftNode::id("newValue")
        )])
    );
    assert_eq!(
        output
            .spy
            .property("underlyingName")
            .and_then(SpyMember::property_type)
            .map(ToString::to_string),
        Some("String!".to_string())
    );
}

#[test]
fn test_optional_property_is_stored_directly() {
    let output = synth(service());
    let Some(SpyMember::StoredProperty(tag)) = output.spy.property("tag") else {
        panic!("expected a stored property");
    };
    assert_eq!(tag.ty.as_ref().map(ToString::to_string), Some("String?".to_string()));
    assert!(tag.initializer.is_none());
    assert!(output.spy.property("underlyingTag").is_none());
}

#[test]
fn test_method_keeps_its_signature() {
    let output = synth(service());
    let fetch: Vec<_> = output.spy.methods("fetch").collect();
    assert_eq!(fetch.len(), 1);
    assert_eq!(fetch[0].effects, Effects::ASYNC | Effects::THROWS);
    assert_eq!(fetch[0].return_type, Some(TypeShape::named("Int")));
    assert_eq!(fetch[0].parameters[0].call_label(), Some("id"));
    assert_eq!(fetch[0].body.len(), 5);
}

#[test]
fn test_compute_overloads_get_distinct_prefixes() {
    let output = synth(
        InterfaceDescription::new("Calculator")
            .with_method(
                MethodMember::new("compute")
                    .with_parameter(Parameter::new("value", TypeShape::named("String")))
                    .returning(TypeShape::named("String")),
            )
            .with_method(
                MethodMember::new("compute")
                    .with_parameter(Parameter::new("value", TypeShape::named("Int")))
                    .returning(TypeShape::named("String")),
            ),
    );
    assert!(output.spy.property("computeValueStringStringCallsCount").is_some());
    assert!(output.spy.property("computeValueIntStringCallsCount").is_some());
    assert_eq!(output.spy.methods("compute").count(), 2);
}

#[test]
fn test_unnamed_parameters_get_synthetic_names() {
    let mut parameter = Parameter::new("_", TypeShape::named("Int"));
    parameter.name = None;
    let output = synth(
        InterfaceDescription::new("Sink")
            .with_method(MethodMember::new("consume").with_parameter(parameter)),
    );
    assert!(output.spy.property("consumeReceivedArg1").is_some());
    let consume = output.spy.methods("consume").next().expect("method");
    assert_eq!(consume.parameters[0].internal_name(), "arg1");
    assert_eq!(consume.parameters[0].call_label(), None);
}

#[test]
fn test_synthetic_names_skip_declared_parameter_names() {
    let mut unnamed = Parameter::new("_", TypeShape::named("Int"));
    unnamed.name = None;
    let output = synth(
        InterfaceDescription::new("Sink").with_method(
            MethodMember::new("f")
                .with_parameter(unnamed)
                .with_parameter(Parameter::new("arg1", TypeShape::named("Int"))),
        ),
    );

    let method = output.spy.methods("f").next().expect("method");
    let names: Vec<&str> = method
        .parameters
        .iter()
        .map(|param| param.internal_name())
        .collect();
    assert_eq!(names, vec!["arg2", "arg1"]);

    let received = output
        .spy
        .property("fArg1ReceivedArguments")
        .and_then(SpyMember::property_type)
        .expect("received arguments");
    assert_eq!(received.to_string(), "(arg2: Int, arg1: Int)?");
}

#[test]
fn test_associated_types_become_generic_parameters() {
    let output = synth(
        InterfaceDescription::new("Repository").with_associated_type(AssociatedType {
            name: "Item".to_string(),
            constraint: Some(TypeShape::named("Codable")),
        }),
    );
    assert_eq!(
        output.spy.generic_parameters,
        vec![GenericParameter::new("Item").with_constraint(TypeShape::named("Codable"))]
    );
}

#[test]
fn test_inherited_type_chains_initializers() {
    let interface = InterfaceDescription::new("Store").with_initializer(InitializerMember {
        parameters: vec![Parameter::new("name", TypeShape::named("String"))],
        ..InitializerMember::default()
    });
    let options = SynthesisOptions::default().with_inherited_type("NSObject");
    let output = synthesize(&protocol(interface), &options).expect("synthesizes");

    assert_eq!(output.spy.inheritance[0], TypeShape::named("NSObject"));
    let inits: Vec<&InitializerDecl> = output
        .spy
        .members
        .iter()
        .filter_map(|member| match member {
            SpyMember::Initializer(init) => Some(init),
            _ => None,
        })
        .collect();
    assert_eq!(inits.len(), 2);
    assert!(inits[0].is_override && !inits[0].is_required);
    assert!(inits[1].is_required && !inits[1].is_override);
    let super_init = SwiftNode::call(SwiftNode::member(SwiftNode::id("super"), "init"), vec![]);
    assert_eq!(inits[0].body, vec![super_init.clone()]);
    assert_eq!(inits[1].body, vec![super_init]);
}

#[test]
fn test_declared_empty_initializer_replaces_the_default() {
    let interface = InterfaceDescription::new("Factory")
        .with_initializer(InitializerMember::default());
    let output = synth(interface);
    let SpyMember::Initializer(init) = &output.spy.members[0] else {
        panic!("expected an initializer");
    };
    assert!(init.is_required);
    assert_eq!(output.spy.member_names().filter(|n| *n == "init").count(), 1);
}

#[test]
fn test_access_level_applies_everywhere() {
    let options = SynthesisOptions::default().with_access_level(AccessLevel::Public);
    let output = synthesize(&protocol(service()), &options).expect("synthesizes");
    assert_eq!(output.spy.access, Some(AccessLevel::Public));
    assert!(
        output
            .spy
            .members
            .iter()
            .all(|member| member.access() == Some(AccessLevel::Public))
    );
}

#[test]
fn test_private_visibility_becomes_fileprivate() {
    let interface = service().with_visibility(AccessLevel::Private);
    let output = synth(interface);
    assert_eq!(output.spy.access, Some(AccessLevel::Fileprivate));

    // An explicit option wins over the declared visibility
    let options = SynthesisOptions::default().with_access_level(AccessLevel::Internal);
    let interface = service().with_visibility(AccessLevel::Public);
    let output = synthesize(&protocol(interface), &options).expect("synthesizes");
    assert_eq!(output.spy.access, Some(AccessLevel::Internal));
}

#[test]
fn test_no_access_level_means_no_modifier() {
    let output = synth(service());
    assert_eq!(output.spy.access, None);
    assert!(output.spy.members.iter().all(|member| member.access().is_none()));
}

#[test]
fn test_preprocessor_flag_wraps_the_declaration() {
    let options =
        SynthesisOptions::default().with_preprocessor_flag(PreprocessorFlag::literal("DEBUG"));
    let output = synthesize(&protocol(service()), &options).expect("synthesizes");
    assert_eq!(output.condition.as_deref(), Some("DEBUG"));
}

#[test]
fn test_non_literal_flag_is_rejected() {
    for raw in ["DEBUG", "\"\\(prefix)DEBUG\"", "\"\"", "\"DEBUG }\""] {
        let options =
            SynthesisOptions::default().with_preprocessor_flag(PreprocessorFlag::new(raw));
        let err = synthesize(&protocol(service()), &options).expect_err("must fail");
        assert_eq!(err.kind(), ErrorKind::Configuration, "{raw}");
    }
}

#[test]
fn test_non_protocol_is_rejected() {
    let declaration = Declaration::Struct {
        name: "Config".to_string(),
    };
    let err = synthesize(&declaration, &SynthesisOptions::default()).expect_err("must fail");
    assert_eq!(
        err,
        SynthesisError::NotAnInterface {
            name: "Config".to_string(),
            kind: "struct",
        }
    );
}

#[test]
fn test_multi_binding_property_is_rejected() {
    let mut property = PropertyMember::new("a", TypeShape::named("Int"), true);
    property.bindings.push(PropertyBinding {
        pattern: BindingPattern::Identifier("b".to_string()),
        ty: TypeShape::named("Int"),
    });
    let err = synthesize(
        &protocol(InterfaceDescription::new("Pair").with_property(property)),
        &SynthesisOptions::default(),
    )
    .expect_err("must fail");
    assert_eq!(err, SynthesisError::PropertyNotSingleBinding { count: 2 });
}

#[test]
fn test_tuple_pattern_property_is_rejected() {
    let property = PropertyMember {
        bindings: vec![PropertyBinding {
            pattern: BindingPattern::parse("(a, b)"),
            ty: TypeShape::tuple(vec![
                (None, TypeShape::named("Int")),
                (None, TypeShape::named("Int")),
            ]),
        }],
        is_mutable: false,
    };
    let err = synthesize(
        &protocol(InterfaceDescription::new("Pair").with_property(property)),
        &SynthesisOptions::default(),
    )
    .expect_err("must fail");
    assert_eq!(err.kind(), ErrorKind::PropertyPattern);
}

#[test]
fn test_synthesis_is_idempotent() {
    let options = SynthesisOptions::default()
        .with_access_level(AccessLevel::Public)
        .with_preprocessor_flag(PreprocessorFlag::literal("DEBUG"));
    let first = synthesize(&protocol(service()), &options).expect("synthesizes");
    let second = synthesize(&protocol(service()), &options).expect("synthesizes");
    assert_eq!(first, second);
}

#[test]
fn test_open_access_is_capped_on_initializers() {
    let options = SynthesisOptions::default().with_access_level(AccessLevel::Open);
    let output = synthesize(&protocol(service()), &options).expect("synthesizes");
    assert_eq!(output.spy.access, Some(AccessLevel::Open));
    assert_eq!(output.spy.members[0].access(), Some(AccessLevel::Public));
    assert_eq!(
        output.spy.property("name").and_then(SpyMember::access),
        Some(AccessLevel::Open)
    );
}
