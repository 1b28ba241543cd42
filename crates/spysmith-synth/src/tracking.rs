//! Tracking state for one spied method.
//!
//! For a method with prefix `p` the spy stores:
//!
//! | field | type | present |
//! |-------|------|---------|
//! | `pCallsCount` | `Int = 0` | always |
//! | `pCalled` | `Bool` (computed) | always |
//! | `pReceived<Name>` / `pReceivedArguments` | `T?` / `(a: A, b: B)?` | trackable, non-empty parameters |
//! | `pReceivedInvocations` | `[T]` / `[(a: A, b: B)]` | same as above |
//! | `pThrowableError` | `(any Error)?` | throwing methods |
//! | `pReturnValue` | `R!` | non-Void return |
//! | `pClosure` | `((params) async throws -> R)?` | always |

use smallvec::SmallVec;
use spysmith_common::AccessLevel;
use spysmith_syntax::{MethodMember, Parameter, TupleElement, TypeShape};

use crate::ir::{ComputedPropertyDecl, SpyMember, StoredPropertyDecl, SwiftNode};
use crate::namer::capitalize_first;
use crate::type_analysis::{
    contains_generic_parameter, erasing_generic_parameters, existentialize, is_optional_like,
    is_plain_function, is_void, storage_type,
};

/// A generated field: name and declared type.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TrackedField {
    pub name: String,
    pub ty: TypeShape,
}

impl TrackedField {
    fn new(name: String, ty: TypeShape) -> Self {
        Self { name, ty }
    }
}

/// Argument recording fields, present only for trackable parameter lists.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArgumentRecording {
    /// `pReceived<Name>` or `pReceivedArguments`
    pub received: TrackedField,
    /// `pReceivedInvocations`
    pub invocations: TrackedField,
    /// Internal names of the recorded parameters, in declaration order
    pub arguments: SmallVec<[String; 4]>,
}

/// All tracking fields of one method.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TrackingFieldSet {
    pub prefix: String,
    pub calls_count: String,
    pub called: String,
    pub recording: Option<ArgumentRecording>,
    pub throwable_error: Option<TrackedField>,
    pub return_value: Option<TrackedField>,
    pub closure: TrackedField,
    /// Declared return type when it mentions one of the method's generic
    /// parameters; results must then be force-cast back to it.
    pub cast_target: Option<TypeShape>,
}

/// Whether every parameter can be retained by the spy.
///
/// A bare non-escaping closure parameter (including a non-escaping
/// `@autoclosure`) makes the whole list untrackable. Variadic closures
/// arrive as an array and are always escaping.
#[must_use]
pub fn is_trackable(parameters: &[Parameter]) -> bool {
    !parameters
        .iter()
        .any(|param| !param.is_variadic && is_plain_function(&param.ty))
}

/// Stored form of a parameter: erased, without parameter-only attributes,
/// variadics as arrays.
fn parameter_storage_type(param: &Parameter, generic_names: &[&str]) -> TypeShape {
    let stored = match storage_type(&param.ty, generic_names) {
        TypeShape::Variadic(element) => TypeShape::Array(element),
        other => other,
    };
    if param.is_variadic {
        TypeShape::array(stored)
    } else {
        stored
    }
}

/// `T!` is not a legal element or tuple component type; use `T?`.
fn without_iuo(ty: TypeShape) -> TypeShape {
    match ty {
        TypeShape::ImplicitlyUnwrapped(inner) => TypeShape::Optional(inner),
        other => other,
    }
}

fn wrap_optional(ty: TypeShape) -> TypeShape {
    match ty {
        TypeShape::ImplicitlyUnwrapped(inner) => TypeShape::Optional(inner),
        optional @ TypeShape::Optional(_) => optional,
        other => TypeShape::optional(other),
    }
}

/// Prepend `attribute` to the attribute list of `ty`.
fn with_leading_attribute(attribute: &str, ty: TypeShape) -> TypeShape {
    match ty {
        TypeShape::Attributed {
            mut attributes,
            base,
        } => {
            attributes.insert(0, attribute.to_string());
            TypeShape::Attributed { attributes, base }
        }
        other => TypeShape::attributed(vec![attribute.to_string()], other),
    }
}

/// Parameter type as seen by the behavior closure: erased, but keeping
/// `inout`, `@autoclosure` and `@escaping`.
fn closure_parameter_type(param: &Parameter, generic_names: &[&str]) -> TypeShape {
    let mut ty = existentialize(&erasing_generic_parameters(&param.ty, generic_names));
    if param.is_variadic {
        ty = TypeShape::array(ty);
    }
    if param.is_autoclosure {
        ty = with_leading_attribute("@autoclosure", ty);
    }
    if param.is_inout {
        ty = with_leading_attribute("inout", ty);
    }
    ty
}

fn erased_return_type(method: &MethodMember, generic_names: &[&str]) -> Option<TypeShape> {
    method
        .return_type
        .as_ref()
        .filter(|ty| !is_void(ty))
        .map(|ty| storage_type(ty, generic_names))
}

fn recording_for(
    method: &MethodMember,
    prefix: &str,
    generic_names: &[&str],
) -> Option<ArgumentRecording> {
    if method.parameters.is_empty() || !is_trackable(&method.parameters) {
        return None;
    }

    let arguments: SmallVec<[String; 4]> = method
        .parameters
        .iter()
        .map(|param| param.internal_name().to_string())
        .collect();

    let (received, element) = if let [param] = method.parameters.as_slice() {
        let stored = parameter_storage_type(param, generic_names);
        let name = format!(
            "{prefix}Received{}",
            capitalize_first(param.internal_name())
        );
        (
            TrackedField::new(name, wrap_optional(stored.clone())),
            without_iuo(stored),
        )
    } else {
        let tuple = TypeShape::Tuple(
            method
                .parameters
                .iter()
                .map(|param| TupleElement {
                    label: Some(param.internal_name().trim_matches('`').to_string()),
                    ty: without_iuo(parameter_storage_type(param, generic_names)),
                })
                .collect(),
        );
        (
            TrackedField::new(
                format!("{prefix}ReceivedArguments"),
                TypeShape::optional(tuple.clone()),
            ),
            tuple,
        )
    };

    Some(ArgumentRecording {
        received,
        invocations: TrackedField::new(
            format!("{prefix}ReceivedInvocations"),
            TypeShape::array(element),
        ),
        arguments,
    })
}

/// Compute the tracking fields of `method` under `prefix`.
#[must_use]
pub fn fields_for(method: &MethodMember, prefix: &str) -> TrackingFieldSet {
    let generic_names: SmallVec<[&str; 4]> = method.generic_names().collect();

    let return_value = erased_return_type(method, &generic_names).map(|ty| {
        let ty = if is_optional_like(&ty) {
            ty
        } else {
            TypeShape::implicitly_unwrapped(ty)
        };
        TrackedField::new(format!("{prefix}ReturnValue"), ty)
    });

    let closure_type = TypeShape::optional(TypeShape::function_with_effects(
        method
            .parameters
            .iter()
            .map(|param| closure_parameter_type(param, &generic_names))
            .collect(),
        method.is_async(),
        method.is_throwing(),
        erased_return_type(method, &generic_names).unwrap_or_else(TypeShape::void),
    ));

    let cast_target = method
        .return_type
        .as_ref()
        .filter(|ty| !is_void(ty) && contains_generic_parameter(ty, &generic_names))
        .cloned();

    TrackingFieldSet {
        prefix: prefix.to_string(),
        calls_count: format!("{prefix}CallsCount"),
        called: format!("{prefix}Called"),
        recording: recording_for(method, prefix, &generic_names),
        throwable_error: method.is_throwing().then(|| {
            TrackedField::new(
                format!("{prefix}ThrowableError"),
                TypeShape::optional(TypeShape::existential(TypeShape::named("Error"))),
            )
        }),
        return_value,
        closure: TrackedField::new(format!("{prefix}Closure"), closure_type),
        cast_target,
    }
}

impl TrackingFieldSet {
    /// Whether the method returns a value.
    #[must_use]
    pub const fn returns_value(&self) -> bool {
        self.return_value.is_some()
    }

    fn stored(
        access: Option<AccessLevel>,
        field: &TrackedField,
        initializer: Option<SwiftNode>,
    ) -> SpyMember {
        SpyMember::StoredProperty(StoredPropertyDecl {
            access,
            name: field.name.clone(),
            ty: Some(field.ty.clone()),
            initializer,
        })
    }

    /// Property declarations for every field, in emission order.
    #[must_use]
    pub fn declarations(&self, access: Option<AccessLevel>) -> Vec<SpyMember> {
        let mut members = Vec::with_capacity(7);

        members.push(SpyMember::StoredProperty(StoredPropertyDecl {
            access,
            name: self.calls_count.clone(),
            ty: Some(TypeShape::named("Int")),
            initializer: Some(SwiftNode::int(0)),
        }));
        members.push(SpyMember::ComputedProperty(ComputedPropertyDecl {
            access,
            name: self.called.clone(),
            ty: TypeShape::named("Bool"),
            getter: vec![SwiftNode::ret(Some(SwiftNode::binary(
                SwiftNode::id(&self.calls_count),
                ">",
                SwiftNode::int(0),
            )))],
            setter: None,
        }));

        if let Some(recording) = &self.recording {
            members.push(Self::stored(access, &recording.received, None));
            members.push(Self::stored(
                access,
                &recording.invocations,
                Some(SwiftNode::EmptyArray),
            ));
        }
        if let Some(error) = &self.throwable_error {
            members.push(Self::stored(access, error, None));
        }
        if let Some(return_value) = &self.return_value {
            members.push(Self::stored(access, return_value, None));
        }
        members.push(Self::stored(access, &self.closure, None));

        members
    }
}

#[cfg(test)]
#[path = "../tests/tracking_tests.rs"]
mod tests;
