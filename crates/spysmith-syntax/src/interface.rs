//! Interface descriptions.
//!
//! The structural input of the synthesis engine: a declaration as produced
//! by an external parser, with every type already in `TypeShape` form. The
//! engine never re-reads source text.

use bitflags::bitflags;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use spysmith_common::AccessLevel;

use crate::type_shape::TypeShape;

// =============================================================================
// Declarations
// =============================================================================

/// A top-level declaration handed to the engine.
///
/// Only `Protocol` is synthesizable; the other kinds exist so the engine can
/// reject them with a precise diagnostic.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Declaration {
    Protocol(InterfaceDescription),
    Class { name: String },
    Struct { name: String },
    Enum { name: String },
    Actor { name: String },
    Extension { name: String },
    Function { name: String },
    Typealias { name: String },
}

impl Declaration {
    #[must_use]
    pub fn name(&self) -> &str {
        match self {
            Self::Protocol(interface) => &interface.name,
            Self::Class { name }
            | Self::Struct { name }
            | Self::Enum { name }
            | Self::Actor { name }
            | Self::Extension { name }
            | Self::Function { name }
            | Self::Typealias { name } => name,
        }
    }

    /// The Swift keyword introducing this declaration.
    #[must_use]
    pub const fn keyword(&self) -> &'static str {
        match self {
            Self::Protocol(_) => "protocol",
            Self::Class { .. } => "class",
            Self::Struct { .. } => "struct",
            Self::Enum { .. } => "enum",
            Self::Actor { .. } => "actor",
            Self::Extension { .. } => "extension",
            Self::Function { .. } => "func",
            Self::Typealias { .. } => "typealias",
        }
    }
}

/// A protocol: the interface a spy conforms to.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InterfaceDescription {
    pub name: String,
    /// Declared visibility; `None` is the implicit default (internal).
    #[serde(default)]
    pub visibility: Option<AccessLevel>,
    #[serde(default)]
    pub associated_types: Vec<AssociatedType>,
    #[serde(default)]
    pub initializers: Vec<InitializerMember>,
    #[serde(default)]
    pub properties: Vec<PropertyMember>,
    #[serde(default)]
    pub methods: Vec<MethodMember>,
}

impl InterfaceDescription {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    #[must_use]
    pub fn with_property(mut self, property: PropertyMember) -> Self {
        self.properties.push(property);
        self
    }

    #[must_use]
    pub fn with_method(mut self, method: MethodMember) -> Self {
        self.methods.push(method);
        self
    }

    #[must_use]
    pub fn with_initializer(mut self, initializer: InitializerMember) -> Self {
        self.initializers.push(initializer);
        self
    }

    #[must_use]
    pub fn with_associated_type(mut self, associated_type: AssociatedType) -> Self {
        self.associated_types.push(associated_type);
        self
    }

    #[must_use]
    pub fn with_visibility(mut self, visibility: AccessLevel) -> Self {
        self.visibility = Some(visibility);
        self
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.properties.is_empty() && self.methods.is_empty() && self.initializers.is_empty()
    }
}

/// `associatedtype Name: Constraint`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AssociatedType {
    pub name: String,
    #[serde(default)]
    pub constraint: Option<TypeShape>,
}

/// A generic parameter introduced by a method: `<T: Codable>`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GenericParameter {
    pub name: String,
    #[serde(default)]
    pub constraint: Option<TypeShape>,
}

impl GenericParameter {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            constraint: None,
        }
    }

    #[must_use]
    pub fn with_constraint(mut self, constraint: TypeShape) -> Self {
        self.constraint = Some(constraint);
        self
    }
}

// =============================================================================
// Properties
// =============================================================================

/// `var name: Type { get }` / `{ get set }`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PropertyMember {
    pub bindings: Vec<PropertyBinding>,
    #[serde(default)]
    pub is_mutable: bool,
}

impl PropertyMember {
    /// A single-binding property, the only form the engine accepts.
    pub fn new(name: impl Into<String>, ty: TypeShape, is_mutable: bool) -> Self {
        Self {
            bindings: vec![PropertyBinding {
                pattern: BindingPattern::Identifier(name.into()),
                ty,
            }],
            is_mutable,
        }
    }
}

/// One `pattern: Type` binding of a property declaration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PropertyBinding {
    pub pattern: BindingPattern,
    #[serde(rename = "type")]
    pub ty: TypeShape,
}

/// The pattern on the left of a property binding.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BindingPattern {
    Identifier(String),
    Wildcard,
    Tuple(Vec<BindingPattern>),
}

impl BindingPattern {
    /// Read a pattern from its source form: `name`, `_`, `(a, (b, c))`.
    #[must_use]
    pub fn parse(text: &str) -> Self {
        let text = text.trim();
        if text == "_" {
            return Self::Wildcard;
        }
        let Some(inner) = text.strip_prefix('(').and_then(|t| t.strip_suffix(')')) else {
            return Self::Identifier(text.to_string());
        };

        let mut parts = Vec::new();
        let mut depth = 0usize;
        let mut start = 0;
        for (i, ch) in inner.char_indices() {
            match ch {
                '(' => depth += 1,
                ')' => depth = depth.saturating_sub(1),
                ',' if depth == 0 => {
                    parts.push(Self::parse(&inner[start..i]));
                    start = i + 1;
                }
                _ => {}
            }
        }
        if !inner[start..].trim().is_empty() {
            parts.push(Self::parse(&inner[start..]));
        }
        Self::Tuple(parts)
    }

    #[must_use]
    pub fn identifier(&self) -> Option<&str> {
        match self {
            Self::Identifier(name) => Some(name),
            _ => None,
        }
    }
}

impl std::fmt::Display for BindingPattern {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Identifier(name) => f.write_str(name),
            Self::Wildcard => f.write_str("_"),
            Self::Tuple(parts) => {
                f.write_str("(")?;
                for (i, part) in parts.iter().enumerate() {
                    if i > 0 {
                        f.write_str(", ")?;
                    }
                    write!(f, "{part}")?;
                }
                f.write_str(")")
            }
        }
    }
}

impl Serialize for BindingPattern {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for BindingPattern {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let text = String::deserialize(deserializer)?;
        Ok(Self::parse(&text))
    }
}

// =============================================================================
// Methods
// =============================================================================

bitflags! {
    /// Effects declared on a method signature.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
    #[serde(transparent)]
    pub struct Effects: u8 {
        const ASYNC = 1 << 0;
        const THROWS = 1 << 1;
    }
}

impl Default for Effects {
    fn default() -> Self {
        Self::empty()
    }
}

/// `func name<T>(params) async throws -> R where ...`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MethodMember {
    pub name: String,
    #[serde(default)]
    pub generic_parameters: Vec<GenericParameter>,
    #[serde(default)]
    pub parameters: Vec<Parameter>,
    #[serde(default)]
    pub effects: Effects,
    #[serde(default)]
    pub return_type: Option<TypeShape>,
    /// `where` requirements, emitted verbatim after the signature
    #[serde(default)]
    pub where_requirements: Vec<String>,
}

impl MethodMember {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            generic_parameters: Vec::new(),
            parameters: Vec::new(),
            effects: Effects::empty(),
            return_type: None,
            where_requirements: Vec::new(),
        }
    }

    #[must_use]
    pub fn with_parameter(mut self, parameter: Parameter) -> Self {
        self.parameters.push(parameter);
        self
    }

    #[must_use]
    pub fn with_generic(mut self, generic: GenericParameter) -> Self {
        self.generic_parameters.push(generic);
        self
    }

    #[must_use]
    pub fn returning(mut self, return_type: TypeShape) -> Self {
        self.return_type = Some(return_type);
        self
    }

    #[must_use]
    pub fn with_effects(mut self, effects: Effects) -> Self {
        self.effects = effects;
        self
    }

    #[must_use]
    pub fn with_where_requirement(mut self, requirement: impl Into<String>) -> Self {
        self.where_requirements.push(requirement.into());
        self
    }

    #[must_use]
    pub const fn is_async(&self) -> bool {
        self.effects.contains(Effects::ASYNC)
    }

    #[must_use]
    pub const fn is_throwing(&self) -> bool {
        self.effects.contains(Effects::THROWS)
    }

    /// Names of the generic parameters this method introduces.
    pub fn generic_names(&self) -> impl Iterator<Item = &str> {
        self.generic_parameters.iter().map(|g| g.name.as_str())
    }
}

/// `init(params)` requirement.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InitializerMember {
    #[serde(default)]
    pub parameters: Vec<Parameter>,
    #[serde(default)]
    pub is_failable: bool,
    #[serde(default)]
    pub effects: Effects,
}

// =============================================================================
// Parameters
// =============================================================================

/// One method parameter.
///
/// `inout`, `@autoclosure` and variadic `...` are held as flags; the type
/// itself is free of them (other attributes such as `@escaping` stay in the
/// type). Deserialization normalizes a type string like `"inout Int"` into
/// that form.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", from = "RawParameter")]
pub struct Parameter {
    /// Call-site label; `None` or `_` means the parameter is unlabeled.
    pub label: Option<String>,
    /// Name used inside the body; defaults to the label.
    pub name: Option<String>,
    #[serde(rename = "type")]
    pub ty: TypeShape,
    pub is_inout: bool,
    pub is_autoclosure: bool,
    pub is_variadic: bool,
}

impl Parameter {
    /// `label: Type` where the label doubles as the internal name.
    pub fn new(label: impl Into<String>, ty: TypeShape) -> Self {
        Self {
            label: Some(label.into()),
            name: None,
            ty,
            is_inout: false,
            is_autoclosure: false,
            is_variadic: false,
        }
    }

    /// `_ name: Type`
    pub fn unlabeled(name: impl Into<String>, ty: TypeShape) -> Self {
        Self {
            label: Some("_".to_string()),
            name: Some(name.into()),
            ty,
            is_inout: false,
            is_autoclosure: false,
            is_variadic: false,
        }
    }

    /// `label name: Type`
    pub fn labeled(label: impl Into<String>, name: impl Into<String>, ty: TypeShape) -> Self {
        Self {
            label: Some(label.into()),
            name: Some(name.into()),
            ty,
            is_inout: false,
            is_autoclosure: false,
            is_variadic: false,
        }
    }

    #[must_use]
    pub fn inout(mut self) -> Self {
        self.is_inout = true;
        self
    }

    #[must_use]
    pub fn autoclosure(mut self) -> Self {
        self.is_autoclosure = true;
        self
    }

    #[must_use]
    pub fn variadic(mut self) -> Self {
        self.is_variadic = true;
        self
    }

    /// The call-site label, `None` when the parameter is unlabeled.
    #[must_use]
    pub fn call_label(&self) -> Option<&str> {
        self.label.as_deref().filter(|label| *label != "_")
    }

    /// The name the parameter is referenced by inside the body.
    #[must_use]
    pub fn internal_name(&self) -> &str {
        self.name
            .as_deref()
            .or(self.label.as_deref())
            .unwrap_or("_")
    }
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawParameter {
    #[serde(default)]
    label: Option<String>,
    #[serde(default)]
    name: Option<String>,
    #[serde(rename = "type")]
    ty: TypeShape,
    #[serde(default)]
    is_inout: bool,
    #[serde(default)]
    is_autoclosure: bool,
    #[serde(default)]
    is_variadic: bool,
}

impl From<RawParameter> for Parameter {
    fn from(raw: RawParameter) -> Self {
        let mut parameter = Self {
            label: raw.label,
            name: raw.name,
            ty: raw.ty,
            is_inout: raw.is_inout,
            is_autoclosure: raw.is_autoclosure,
            is_variadic: raw.is_variadic,
        };

        // Hoist parameter-level markers out of the type.
        if let TypeShape::Attributed { attributes, base } = &parameter.ty {
            let mut kept = Vec::with_capacity(attributes.len());
            for attribute in attributes {
                match attribute.as_str() {
                    "inout" => parameter.is_inout = true,
                    "@autoclosure" => parameter.is_autoclosure = true,
                    _ => kept.push(attribute.clone()),
                }
            }
            let base = (**base).clone();
            parameter.ty = if kept.is_empty() {
                base
            } else {
                TypeShape::attributed(kept, base)
            };
        }
        let inner = match &parameter.ty {
            TypeShape::Variadic(element) => Some((**element).clone()),
            _ => None,
        };
        if let Some(element) = inner {
            parameter.is_variadic = true;
            parameter.ty = element;
        }
        parameter
    }
}

#[cfg(test)]
#[path = "../tests/interface_tests.rs"]
mod tests;
