//! Type Shapes
//!
//! A closed, structural representation of a declared Swift type. Every type
//! the engine inspects, erases or re-emits is a `TypeShape`; shapes the
//! reader cannot model are kept verbatim as `Opaque`.
//!
//! Printing a shape (`Display`) yields Swift syntax. Parentheses are not part
//! of the model: the printer inserts them wherever precedence requires, so
//! `Optional(Function(..))` prints as `(() -> Void)?`.

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;

/// A structural type description.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum TypeShape {
    /// Identifier type with optional generic arguments: `String`, `Result<T, E>`
    Named {
        name: String,
        generic_arguments: Vec<TypeShape>,
    },
    /// `T?`
    Optional(Box<TypeShape>),
    /// `T!`
    ImplicitlyUnwrapped(Box<TypeShape>),
    /// `[T]`
    Array(Box<TypeShape>),
    /// `[K: V]`
    Dictionary {
        key: Box<TypeShape>,
        value: Box<TypeShape>,
    },
    /// `(a: A, B)`; the empty tuple is `()`
    Tuple(Vec<TupleElement>),
    /// `(A, B) async throws -> R`
    Function(FunctionShape),
    /// `A & B`
    Composite(Vec<TypeShape>),
    /// `any P` / `some P`
    Qualified {
        qualifier: Qualifier,
        constraint: Box<TypeShape>,
    },
    /// `Base.Member`, including metatypes (`T.Type`)
    MemberQualified {
        base: Box<TypeShape>,
        member: String,
    },
    /// Attributes and specifiers: `@escaping (Int) -> Void`, `inout String`
    Attributed {
        attributes: Vec<String>,
        base: Box<TypeShape>,
    },
    /// Variadic parameter element: `T...`
    Variadic(Box<TypeShape>),
    /// Anything not modeled above, kept as written
    Opaque(String),
}

/// One element of a tuple type.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct TupleElement {
    pub label: Option<String>,
    pub ty: TypeShape,
}

/// A function (closure) type.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct FunctionShape {
    pub parameters: Vec<TypeShape>,
    pub is_async: bool,
    pub is_throwing: bool,
    /// Error type of a typed `throws(E)`; `None` for untyped `throws`.
    pub thrown_error: Option<Box<TypeShape>>,
    pub return_type: Box<TypeShape>,
}

/// Existential (`any`) or opaque (`some`) qualifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Qualifier {
    Any,
    Some,
}

impl Qualifier {
    #[must_use]
    pub const fn keyword(self) -> &'static str {
        match self {
            Self::Any => "any",
            Self::Some => "some",
        }
    }
}

// =========================================================================
// Builder helpers
// =========================================================================

impl TypeShape {
    /// Create a plain identifier type
    pub fn named(name: impl Into<String>) -> Self {
        Self::Named {
            name: name.into(),
            generic_arguments: Vec::new(),
        }
    }

    /// Create a generic application: `Name<args>`
    pub fn generic(name: impl Into<String>, arguments: Vec<Self>) -> Self {
        Self::Named {
            name: name.into(),
            generic_arguments: arguments,
        }
    }

    /// The universal placeholder used for erased generic parameters
    pub fn any_placeholder() -> Self {
        Self::named("Any")
    }

    /// `Void`
    pub fn void() -> Self {
        Self::named("Void")
    }

    pub fn optional(inner: Self) -> Self {
        Self::Optional(Box::new(inner))
    }

    pub fn implicitly_unwrapped(inner: Self) -> Self {
        Self::ImplicitlyUnwrapped(Box::new(inner))
    }

    pub fn array(element: Self) -> Self {
        Self::Array(Box::new(element))
    }

    pub fn dictionary(key: Self, value: Self) -> Self {
        Self::Dictionary {
            key: Box::new(key),
            value: Box::new(value),
        }
    }

    /// Create a labeled tuple
    pub fn tuple(elements: Vec<(Option<String>, Self)>) -> Self {
        Self::Tuple(
            elements
                .into_iter()
                .map(|(label, ty)| TupleElement { label, ty })
                .collect(),
        )
    }

    pub fn function(parameters: Vec<Self>, return_type: Self) -> Self {
        Self::Function(FunctionShape {
            parameters,
            is_async: false,
            is_throwing: false,
            thrown_error: None,
            return_type: Box::new(return_type),
        })
    }

    pub fn function_with_effects(
        parameters: Vec<Self>,
        is_async: bool,
        is_throwing: bool,
        return_type: Self,
    ) -> Self {
        Self::Function(FunctionShape {
            parameters,
            is_async,
            is_throwing,
            thrown_error: None,
            return_type: Box::new(return_type),
        })
    }

    /// Attach a typed-throws error type to a function type.
    /// Any other shape is returned unchanged.
    #[must_use]
    pub fn with_thrown_error(self, error: Self) -> Self {
        match self {
            Self::Function(mut function) => {
                function.is_throwing = true;
                function.thrown_error = Some(Box::new(error));
                Self::Function(function)
            }
            other => other,
        }
    }

    pub fn existential(constraint: Self) -> Self {
        Self::Qualified {
            qualifier: Qualifier::Any,
            constraint: Box::new(constraint),
        }
    }

    pub fn opaque_some(constraint: Self) -> Self {
        Self::Qualified {
            qualifier: Qualifier::Some,
            constraint: Box::new(constraint),
        }
    }

    pub fn attributed(attributes: Vec<String>, base: Self) -> Self {
        Self::Attributed {
            attributes,
            base: Box::new(base),
        }
    }

    /// The identifier of a `Named` shape, if this is one.
    #[must_use]
    pub fn name(&self) -> Option<&str> {
        match self {
            Self::Named { name, .. } => Some(name),
            _ => None,
        }
    }

    /// Whether this shape must be parenthesized when a postfix operator
    /// (`?`, `!`, `...`, `.Member`) is applied to it.
    fn needs_postfix_parens(&self) -> bool {
        matches!(
            self,
            Self::Function(_)
                | Self::Composite(_)
                | Self::Qualified { .. }
                | Self::Attributed { .. }
        )
    }
}

// =========================================================================
// Printing
// =========================================================================

impl fmt::Display for TypeShape {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Named {
                name,
                generic_arguments,
            } => {
                f.write_str(name)?;
                if !generic_arguments.is_empty() {
                    f.write_str("<")?;
                    write_comma_separated(f, generic_arguments)?;
                    f.write_str(">")?;
                }
                Ok(())
            }
            Self::Optional(inner) => {
                write_postfix_operand(f, inner)?;
                f.write_str("?")
            }
            Self::ImplicitlyUnwrapped(inner) => {
                write_postfix_operand(f, inner)?;
                f.write_str("!")
            }
            Self::Array(element) => write!(f, "[{element}]"),
            Self::Dictionary { key, value } => write!(f, "[{key}: {value}]"),
            Self::Tuple(elements) => {
                f.write_str("(")?;
                for (i, element) in elements.iter().enumerate() {
                    if i > 0 {
                        f.write_str(", ")?;
                    }
                    if let Some(label) = &element.label {
                        write!(f, "{label}: ")?;
                    }
                    write!(f, "{}", element.ty)?;
                }
                f.write_str(")")
            }
            Self::Function(function) => {
                f.write_str("(")?;
                write_comma_separated(f, &function.parameters)?;
                f.write_str(")")?;
                if function.is_async {
                    f.write_str(" async")?;
                }
                if function.is_throwing {
                    f.write_str(" throws")?;
                    if let Some(error) = &function.thrown_error {
                        write!(f, "({error})")?;
                    }
                }
                write!(f, " -> {}", function.return_type)
            }
            Self::Composite(constituents) => {
                for (i, constituent) in constituents.iter().enumerate() {
                    if i > 0 {
                        f.write_str(" & ")?;
                    }
                    if matches!(constituent, Self::Function(_) | Self::Qualified { .. }) {
                        write!(f, "({constituent})")?;
                    } else {
                        write!(f, "{constituent}")?;
                    }
                }
                Ok(())
            }
            Self::Qualified {
                qualifier,
                constraint,
            } => {
                if matches!(**constraint, Self::Function(_)) {
                    write!(f, "{} ({constraint})", qualifier.keyword())
                } else {
                    write!(f, "{} {constraint}", qualifier.keyword())
                }
            }
            Self::MemberQualified { base, member } => {
                write_postfix_operand(f, base)?;
                write!(f, ".{member}")
            }
            Self::Attributed { attributes, base } => {
                for attribute in attributes {
                    write!(f, "{attribute} ")?;
                }
                write!(f, "{base}")
            }
            Self::Variadic(element) => {
                write_postfix_operand(f, element)?;
                f.write_str("...")
            }
            Self::Opaque(text) => f.write_str(text),
        }
    }
}

fn write_postfix_operand(f: &mut fmt::Formatter<'_>, operand: &TypeShape) -> fmt::Result {
    if operand.needs_postfix_parens() {
        write!(f, "({operand})")
    } else {
        write!(f, "{operand}")
    }
}

fn write_comma_separated(f: &mut fmt::Formatter<'_>, shapes: &[TypeShape]) -> fmt::Result {
    for (i, shape) in shapes.iter().enumerate() {
        if i > 0 {
            f.write_str(", ")?;
        }
        write!(f, "{shape}")?;
    }
    Ok(())
}

// =========================================================================
// Serde: shapes travel as type-expression strings
// =========================================================================

impl Serialize for TypeShape {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for TypeShape {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        use serde::de::Error;

        let text = String::deserialize(deserializer)?;
        crate::type_parser::parse_type(&text)
            .map_err(|err| Error::custom(format!("invalid type '{text}': {err}")))
    }
}
