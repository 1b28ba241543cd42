//! Interface description model for the spysmith spy generator.
//!
//! This crate defines the structural input of the engine:
//! - Declarations and protocol members (`Declaration`, `InterfaceDescription`)
//! - Structural types (`TypeShape`) and their Swift printing
//! - A reader for single type expressions (`parse_type`)

pub mod type_shape;
pub use type_shape::{FunctionShape, Qualifier, TupleElement, TypeShape};

pub mod type_parser;
pub use type_parser::{TypeParseError, parse_type};

pub mod interface;
pub use interface::{
    AssociatedType, BindingPattern, Declaration, Effects, GenericParameter, InitializerMember,
    InterfaceDescription, MethodMember, Parameter, PropertyBinding, PropertyMember,
};
