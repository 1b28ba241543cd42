//! Type Shape Analysis
//!
//! Classification, generic-parameter erasure and containment checks over
//! `TypeShape`, plus the derived storage forms the builders need.
//!
//! Every function here is pure and total. Shapes the model cannot look
//! inside (`Opaque`) pass through unchanged instead of failing.
//!
//! # Example
//!
//! ```rust,ignore
//! let ty = parse_type("[T: Int]?")?;
//! assert!(contains_generic_parameter(&ty, &["T"]));
//! assert_eq!(erasing_generic_parameters(&ty, &["T"]).to_string(), "[Any: Int]?");
//! ```

use spysmith_syntax::{FunctionShape, Qualifier, TupleElement, TypeShape};

use crate::namer::capitalize_first;

/// Attributes that are only legal on a parameter and must be dropped
/// before a type is used for storage.
const PARAMETER_ONLY_ATTRIBUTES: &[&str] = &[
    "@escaping",
    "@autoclosure",
    "inout",
    "borrowing",
    "consuming",
    "sending",
    "isolated",
    "__owned",
    "__shared",
];

/// Shape category of a type.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ShapeCategory {
    Optional,
    ImplicitlyUnwrapped,
    Array,
    Dictionary,
    Tuple,
    Function,
    /// A bare identifier: `T`, `String`
    GenericIdentifier,
    /// An identifier with arguments: `Result<T, E>`
    GenericApplication,
    Composite,
    Qualified(Qualifier),
    MemberQualified,
    Attributed,
    Variadic,
    Opaque,
}

/// Classify a type into its shape category.
#[must_use]
pub fn classify(ty: &TypeShape) -> ShapeCategory {
    match ty {
        TypeShape::Named {
            generic_arguments, ..
        } => {
            if generic_arguments.is_empty() {
                ShapeCategory::GenericIdentifier
            } else {
                ShapeCategory::GenericApplication
            }
        }
        TypeShape::Optional(_) => ShapeCategory::Optional,
        TypeShape::ImplicitlyUnwrapped(_) => ShapeCategory::ImplicitlyUnwrapped,
        TypeShape::Array(_) => ShapeCategory::Array,
        TypeShape::Dictionary { .. } => ShapeCategory::Dictionary,
        TypeShape::Tuple(_) => ShapeCategory::Tuple,
        TypeShape::Function(_) => ShapeCategory::Function,
        TypeShape::Composite(_) => ShapeCategory::Composite,
        TypeShape::Qualified { qualifier, .. } => ShapeCategory::Qualified(*qualifier),
        TypeShape::MemberQualified { .. } => ShapeCategory::MemberQualified,
        TypeShape::Attributed { .. } => ShapeCategory::Attributed,
        TypeShape::Variadic(_) => ShapeCategory::Variadic,
        TypeShape::Opaque(_) => ShapeCategory::Opaque,
    }
}

// =============================================================================
// Traversal
// =============================================================================

/// Rebuild `ty`, letting `replace` substitute any node (pre-order).
/// When `replace` returns `Some`, that node's children are not visited.
fn rewrite<F>(ty: &TypeShape, replace: &F) -> TypeShape
where
    F: Fn(&TypeShape) -> Option<TypeShape>,
{
    if let Some(replacement) = replace(ty) {
        return replacement;
    }

    let boxed = |inner: &TypeShape| Box::new(rewrite(inner, replace));
    match ty {
        TypeShape::Named {
            name,
            generic_arguments,
        } => TypeShape::Named {
            name: name.clone(),
            generic_arguments: generic_arguments
                .iter()
                .map(|arg| rewrite(arg, replace))
                .collect(),
        },
        TypeShape::Optional(inner) => TypeShape::Optional(boxed(inner)),
        TypeShape::ImplicitlyUnwrapped(inner) => TypeShape::ImplicitlyUnwrapped(boxed(inner)),
        TypeShape::Array(element) => TypeShape::Array(boxed(element)),
        TypeShape::Dictionary { key, value } => TypeShape::Dictionary {
            key: boxed(key),
            value: boxed(value),
        },
        TypeShape::Tuple(elements) => TypeShape::Tuple(
            elements
                .iter()
                .map(|element| TupleElement {
                    label: element.label.clone(),
                    ty: rewrite(&element.ty, replace),
                })
                .collect(),
        ),
        TypeShape::Function(function) => TypeShape::Function(FunctionShape {
            parameters: function
                .parameters
                .iter()
                .map(|param| rewrite(param, replace))
                .collect(),
            is_async: function.is_async,
            is_throwing: function.is_throwing,
            thrown_error: function.thrown_error.as_deref().map(|error| {
                match rewrite(error, replace) {
                    // `throws(Any)` does not type-check; fall back to untyped errors
                    TypeShape::Named { name, .. } if name == "Any" && !is_any(error) => {
                        Box::new(TypeShape::existential(TypeShape::named("Error")))
                    }
                    rewritten => Box::new(rewritten),
                }
            }),
            return_type: boxed(&function.return_type),
        }),
        TypeShape::Composite(constituents) => TypeShape::Composite(
            constituents
                .iter()
                .map(|constituent| rewrite(constituent, replace))
                .collect(),
        ),
        TypeShape::Qualified {
            qualifier,
            constraint,
        } => TypeShape::Qualified {
            qualifier: *qualifier,
            constraint: boxed(constraint),
        },
        TypeShape::MemberQualified { base, member } => TypeShape::MemberQualified {
            base: boxed(base),
            member: member.clone(),
        },
        TypeShape::Attributed { attributes, base } => TypeShape::Attributed {
            attributes: attributes.clone(),
            base: boxed(base),
        },
        TypeShape::Variadic(element) => TypeShape::Variadic(boxed(element)),
        TypeShape::Opaque(_) => ty.clone(),
    }
}

/// Whether any node of `ty` satisfies `predicate`. Short-circuits.
fn any_node<F>(ty: &TypeShape, predicate: &F) -> bool
where
    F: Fn(&TypeShape) -> bool,
{
    if predicate(ty) {
        return true;
    }
    match ty {
        TypeShape::Named {
            generic_arguments, ..
        } => generic_arguments.iter().any(|arg| any_node(arg, predicate)),
        TypeShape::Optional(inner)
        | TypeShape::ImplicitlyUnwrapped(inner)
        | TypeShape::Array(inner)
        | TypeShape::Variadic(inner) => any_node(inner, predicate),
        TypeShape::Dictionary { key, value } => {
            any_node(key, predicate) || any_node(value, predicate)
        }
        TypeShape::Tuple(elements) => elements.iter().any(|e| any_node(&e.ty, predicate)),
        TypeShape::Function(function) => {
            function.parameters.iter().any(|p| any_node(p, predicate))
                || function
                    .thrown_error
                    .as_deref()
                    .is_some_and(|error| any_node(error, predicate))
                || any_node(&function.return_type, predicate)
        }
        TypeShape::Composite(constituents) => {
            constituents.iter().any(|c| any_node(c, predicate))
        }
        TypeShape::Qualified { constraint, .. } => any_node(constraint, predicate),
        TypeShape::MemberQualified { base, .. } | TypeShape::Attributed { base, .. } => {
            any_node(base, predicate)
        }
        TypeShape::Opaque(_) => false,
    }
}

fn is_any(ty: &TypeShape) -> bool {
    matches!(ty, TypeShape::Named { name, .. } if name == "Any")
}

fn is_generic_name(ty: &TypeShape, names: &[&str]) -> bool {
    matches!(ty, TypeShape::Named { name, .. } if names.contains(&name.as_str()))
}

// =============================================================================
// Generic parameters
// =============================================================================

/// Replace every occurrence of the named generic parameters by `Any`.
///
/// A member-qualified type rooted in a generic parameter (`T.Element`) is
/// erased as a whole, since `Any.Element` does not exist.
#[must_use]
pub fn erasing_generic_parameters(ty: &TypeShape, names: &[&str]) -> TypeShape {
    if names.is_empty() {
        return ty.clone();
    }
    rewrite(ty, &|node| match node {
        TypeShape::Named { .. } if is_generic_name(node, names) => {
            Some(TypeShape::any_placeholder())
        }
        TypeShape::MemberQualified { base, .. } if contains_generic_parameter(base, names) => {
            Some(TypeShape::any_placeholder())
        }
        _ => None,
    })
}

/// Whether `ty` mentions any of the named generic parameters.
#[must_use]
pub fn contains_generic_parameter(ty: &TypeShape, names: &[&str]) -> bool {
    !names.is_empty() && any_node(ty, &|node| is_generic_name(node, names))
}

// =============================================================================
// Predicates
// =============================================================================

/// `Void`, `Swift.Void` or `()`.
#[must_use]
pub fn is_void(ty: &TypeShape) -> bool {
    match ty {
        TypeShape::Named {
            name,
            generic_arguments,
        } => name == "Void" && generic_arguments.is_empty(),
        TypeShape::Tuple(elements) => elements.is_empty(),
        TypeShape::MemberQualified { base, member } => {
            member == "Void" && base.name() == Some("Swift")
        }
        _ => false,
    }
}

/// `T?` or `T!`: storage that tolerates an absent value.
#[must_use]
pub const fn is_optional_like(ty: &TypeShape) -> bool {
    matches!(
        ty,
        TypeShape::Optional(_) | TypeShape::ImplicitlyUnwrapped(_)
    )
}

/// A bare function type without `@escaping`: such a value cannot be retained.
///
/// Optional closures are implicitly escaping and therefore not plain.
#[must_use]
pub fn is_plain_function(ty: &TypeShape) -> bool {
    match ty {
        TypeShape::Function(_) => true,
        TypeShape::Attributed { attributes, base } => {
            !attributes.iter().any(|a| a == "@escaping") && is_plain_function(base)
        }
        _ => false,
    }
}

// =============================================================================
// Storage forms
// =============================================================================

/// Drop parameter-only attributes (`@escaping`, `inout`, ...) at the top level.
#[must_use]
pub fn strip_parameter_attributes(ty: &TypeShape) -> TypeShape {
    match ty {
        TypeShape::Attributed { attributes, base } => {
            let kept: Vec<String> = attributes
                .iter()
                .filter(|a| !PARAMETER_ONLY_ATTRIBUTES.contains(&a.as_str()))
                .cloned()
                .collect();
            let base = strip_parameter_attributes(base);
            if kept.is_empty() {
                base
            } else {
                TypeShape::attributed(kept, base)
            }
        }
        other => other.clone(),
    }
}

/// Rewrite every `some P` into `any P`; opaque types cannot be stored.
#[must_use]
pub fn existentialize(ty: &TypeShape) -> TypeShape {
    fn replace(node: &TypeShape) -> Option<TypeShape> {
        match node {
            TypeShape::Qualified {
                qualifier: Qualifier::Some,
                constraint,
            } => Some(TypeShape::existential(rewrite(constraint, &replace))),
            _ => None,
        }
    }
    rewrite(ty, &replace)
}

/// The form of a declared type used for spy storage: parameter-only
/// attributes removed, generics erased to `Any`, `some` made `any`.
#[must_use]
pub fn storage_type(ty: &TypeShape, generic_names: &[&str]) -> TypeShape {
    let stripped = strip_parameter_attributes(ty);
    existentialize(&erasing_generic_parameters(&stripped, generic_names))
}

// =============================================================================
// Sanitized labels
// =============================================================================

/// Flatten a type into an identifier-safe token stream for name
/// disambiguation: `[String: Int]?` becomes `OptionalDictionaryStringInt`.
#[must_use]
pub fn sanitized_label(ty: &TypeShape) -> String {
    let mut out = String::new();
    push_label(&mut out, ty);
    out
}

fn push_token(out: &mut String, text: &str) {
    let cleaned: String = text
        .chars()
        .filter(|c| c.is_alphanumeric() || *c == '_')
        .collect();
    out.push_str(&capitalize_first(&cleaned));
}

fn push_label(out: &mut String, ty: &TypeShape) {
    match ty {
        TypeShape::Named {
            name,
            generic_arguments,
        } => {
            push_token(out, name);
            for arg in generic_arguments {
                push_label(out, arg);
            }
        }
        TypeShape::Optional(inner) => {
            out.push_str("Optional");
            push_label(out, inner);
        }
        TypeShape::ImplicitlyUnwrapped(inner) => {
            out.push_str("ImplicitlyUnwrapped");
            push_label(out, inner);
        }
        TypeShape::Array(element) => {
            out.push_str("Array");
            push_label(out, element);
        }
        TypeShape::Dictionary { key, value } => {
            out.push_str("Dictionary");
            push_label(out, key);
            push_label(out, value);
        }
        TypeShape::Tuple(elements) if elements.is_empty() => out.push_str("Void"),
        TypeShape::Tuple(elements) => {
            out.push_str("Tuple");
            for element in elements {
                if let Some(label) = &element.label {
                    push_token(out, label);
                }
                push_label(out, &element.ty);
            }
        }
        TypeShape::Function(function) => {
            out.push_str("Function");
            for param in &function.parameters {
                push_label(out, param);
            }
            if function.is_async {
                out.push_str("Async");
            }
            if function.is_throwing {
                out.push_str("Throws");
                if let Some(error) = &function.thrown_error {
                    push_label(out, error);
                }
            }
            out.push_str("Returns");
            push_label(out, &function.return_type);
        }
        TypeShape::Composite(constituents) => {
            for (i, constituent) in constituents.iter().enumerate() {
                if i > 0 {
                    out.push_str("And");
                }
                push_label(out, constituent);
            }
        }
        TypeShape::Qualified {
            qualifier,
            constraint,
        } => {
            out.push_str(match qualifier {
                Qualifier::Any => "Any",
                Qualifier::Some => "Some",
            });
            push_label(out, constraint);
        }
        TypeShape::MemberQualified { base, member } => {
            push_label(out, base);
            push_token(out, member);
        }
        TypeShape::Attributed { base, .. } => push_label(out, base),
        TypeShape::Variadic(element) => {
            out.push_str("Variadic");
            push_label(out, element);
        }
        TypeShape::Opaque(text) => push_token(out, text),
    }
}

#[cfg(test)]
#[path = "../tests/type_analysis_tests.rs"]
mod tests;
