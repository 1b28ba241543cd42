//! Spy IR (Intermediate Representation)
//!
//! The synthesizer produces a tree of declarations and statements instead of
//! text. The printer (`spysmith-emitter`) walks this tree and emits Swift.
//!
//! # IR Structure
//!
//! - `SpyDeclaration`: the whole output, optionally guarded by `#if FLAG`
//! - `SpyType`: the spy class with its ordered `SpyMember`s
//! - `SwiftNode`: statements and expressions inside member bodies

use serde::Serialize;
use spysmith_common::AccessLevel;
use spysmith_syntax::{Effects, GenericParameter, Parameter, TypeShape};

/// Statement or expression node inside a spy member body.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SwiftNode {
    // =========================================================================
    // Literals
    // =========================================================================
    /// Integer literal: `0`, `1`
    IntegerLiteral(i64),

    /// `nil`
    NilLiteral,

    /// Empty array literal: `[]`
    EmptyArray,

    // =========================================================================
    // Expressions
    // =========================================================================
    /// Identifier: `fetchIdCallsCount`, `newValue`
    Identifier(String),

    /// Parenthesized tuple: `(a, b)`; a single element prints as `(a)`
    Tuple(Vec<Self>),

    /// Member access: `base.member`
    MemberAccess { base: Box<Self>, member: String },

    /// Call expression: `callee(args)`
    Call {
        callee: Box<Self>,
        arguments: Vec<Self>,
    },

    /// Optional chaining marker: `callee?`
    OptionalChain(Box<Self>),

    /// Force unwrap: `value!`
    ForceUnwrap(Box<Self>),

    /// In-out argument: `&value`
    InOut(Box<Self>),

    /// Binary expression, including assignment: `left op right`
    Binary {
        left: Box<Self>,
        operator: String,
        right: Box<Self>,
    },

    /// Forced cast: `expr as! Type`
    ForcedCast { expr: Box<Self>, ty: TypeShape },

    /// `try expr`
    Try(Box<Self>),

    /// `await expr`
    Await(Box<Self>),

    // =========================================================================
    // Statements
    // =========================================================================
    /// `return` / `return expr`
    Return(Option<Box<Self>>),

    /// `throw expr`
    Throw(Box<Self>),

    /// `if condition { then } else { otherwise }`
    If {
        condition: Box<Condition>,
        then_branch: Vec<Self>,
        else_branch: Option<Vec<Self>>,
    },
}

/// Condition of an `if` statement.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Condition {
    /// Boolean expression
    Expression(SwiftNode),
    /// `let name = value`
    OptionalBinding { name: String, value: SwiftNode },
}

// =========================================================================
// Builder helpers for IR construction
// =========================================================================

impl SwiftNode {
    /// Create an identifier node
    pub fn id(name: impl Into<String>) -> Self {
        Self::Identifier(name.into())
    }

    /// Create an integer literal
    pub const fn int(value: i64) -> Self {
        Self::IntegerLiteral(value)
    }

    /// Create a call expression
    pub fn call(callee: Self, args: Vec<Self>) -> Self {
        Self::Call {
            callee: Box::new(callee),
            arguments: args,
        }
    }

    /// Create a member access
    pub fn member(base: Self, member: impl Into<String>) -> Self {
        Self::MemberAccess {
            base: Box::new(base),
            member: member.into(),
        }
    }

    /// Create a binary expression
    pub fn binary(left: Self, op: impl Into<String>, right: Self) -> Self {
        Self::Binary {
            left: Box::new(left),
            operator: op.into(),
            right: Box::new(right),
        }
    }

    /// Create an assignment: `target = value`
    pub fn assign(target: Self, value: Self) -> Self {
        Self::binary(target, "=", value)
    }

    /// Create a return statement
    pub fn ret(expr: Option<Self>) -> Self {
        Self::Return(expr.map(Box::new))
    }

    /// Create a throw statement
    pub fn throw(expr: Self) -> Self {
        Self::Throw(Box::new(expr))
    }

    /// `self!`
    pub fn force_unwrap(self) -> Self {
        Self::ForceUnwrap(Box::new(self))
    }

    /// `self?`
    pub fn optional_chain(self) -> Self {
        Self::OptionalChain(Box::new(self))
    }

    /// `&self`
    pub fn in_out(self) -> Self {
        Self::InOut(Box::new(self))
    }

    /// `self as! ty`
    pub fn forced_cast(self, ty: TypeShape) -> Self {
        Self::ForcedCast {
            expr: Box::new(self),
            ty,
        }
    }

    /// Wrap in `try` when `condition` holds
    pub fn try_if(self, condition: bool) -> Self {
        if condition {
            Self::Try(Box::new(self))
        } else {
            self
        }
    }

    /// Wrap in `await` when `condition` holds
    pub fn await_if(self, condition: bool) -> Self {
        if condition {
            Self::Await(Box::new(self))
        } else {
            self
        }
    }

    /// Create an `if` statement
    pub fn if_stmt(
        condition: Condition,
        then_branch: Vec<Self>,
        else_branch: Option<Vec<Self>>,
    ) -> Self {
        Self::If {
            condition: Box::new(condition),
            then_branch,
            else_branch,
        }
    }
}

// =========================================================================
// Declarations
// =========================================================================

/// The complete output of one synthesis call.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SpyDeclaration {
    pub spy: SpyType,
    /// Conditional-compilation flag guarding the whole declaration
    pub condition: Option<String>,
}

/// The synthesized spy class.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SpyType {
    pub name: String,
    pub access: Option<AccessLevel>,
    pub generic_parameters: Vec<GenericParameter>,
    pub inheritance: Vec<TypeShape>,
    pub members: Vec<SpyMember>,
}

impl SpyType {
    /// Names of all members, in emission order. Initializers report `init`.
    pub fn member_names(&self) -> impl Iterator<Item = &str> {
        self.members.iter().map(SpyMember::name)
    }

    /// Find a stored or computed property by name.
    #[must_use]
    pub fn property(&self, name: &str) -> Option<&SpyMember> {
        self.members.iter().find(|member| {
            matches!(
                member,
                SpyMember::StoredProperty(_) | SpyMember::ComputedProperty(_)
            ) && member.name() == name
        })
    }

    /// All methods with the given name (overloads included).
    pub fn methods<'a>(&'a self, name: &'a str) -> impl Iterator<Item = &'a MethodDecl> + 'a {
        self.members.iter().filter_map(move |member| match member {
            SpyMember::Method(method) if method.name == name => Some(method),
            _ => None,
        })
    }

    /// Number of non-initializer members.
    #[must_use]
    pub fn instrumentation_len(&self) -> usize {
        self.members
            .iter()
            .filter(|member| !matches!(member, SpyMember::Initializer(_)))
            .count()
    }
}

/// One member of the spy class.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "member", rename_all = "snake_case")]
pub enum SpyMember {
    Initializer(InitializerDecl),
    StoredProperty(StoredPropertyDecl),
    ComputedProperty(ComputedPropertyDecl),
    Method(MethodDecl),
}

impl SpyMember {
    #[must_use]
    pub fn name(&self) -> &str {
        match self {
            Self::Initializer(_) => "init",
            Self::StoredProperty(decl) => &decl.name,
            Self::ComputedProperty(decl) => &decl.name,
            Self::Method(decl) => &decl.name,
        }
    }

    /// Declared type of a stored or computed property.
    #[must_use]
    pub fn property_type(&self) -> Option<&TypeShape> {
        match self {
            Self::StoredProperty(decl) => decl.ty.as_ref(),
            Self::ComputedProperty(decl) => Some(&decl.ty),
            _ => None,
        }
    }

    #[must_use]
    pub const fn access(&self) -> Option<AccessLevel> {
        match self {
            Self::Initializer(decl) => decl.access,
            Self::StoredProperty(decl) => decl.access,
            Self::ComputedProperty(decl) => decl.access,
            Self::Method(decl) => decl.access,
        }
    }
}

/// `[access] [required] [override] init[?](params) [async] [throws] { body }`
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct InitializerDecl {
    pub access: Option<AccessLevel>,
    pub is_required: bool,
    pub is_override: bool,
    pub is_failable: bool,
    pub parameters: Vec<Parameter>,
    pub effects: Effects,
    pub body: Vec<SwiftNode>,
}

/// `[access] var name[: Type][ = initializer]`
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StoredPropertyDecl {
    pub access: Option<AccessLevel>,
    pub name: String,
    pub ty: Option<TypeShape>,
    pub initializer: Option<SwiftNode>,
}

/// `[access] var name: Type { get { ... } [set { ... }] }`
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ComputedPropertyDecl {
    pub access: Option<AccessLevel>,
    pub name: String,
    pub ty: TypeShape,
    pub getter: Vec<SwiftNode>,
    pub setter: Option<Vec<SwiftNode>>,
}

/// A spy method: the protocol's signature with a synthetic body.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MethodDecl {
    pub access: Option<AccessLevel>,
    pub name: String,
    pub generic_parameters: Vec<GenericParameter>,
    pub parameters: Vec<Parameter>,
    pub effects: Effects,
    pub return_type: Option<TypeShape>,
    pub where_requirements: Vec<String>,
    pub body: Vec<SwiftNode>,
}
