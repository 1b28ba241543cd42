//! Spy synthesis engine for the spysmith spy generator.
//!
//! Turns a protocol description into a structural spy declaration:
//! - `type_analysis`: shape classification and generic erasure over `TypeShape`
//! - `namer`: unique per-member variable prefixes
//! - `tracking`: the tracking fields of each method
//! - `forwarding`: the record-then-answer body of each method
//! - `synthesizer`: assembly of the `<Name>Spy` declaration
//! - `ir`: the output tree consumed by `spysmith-emitter`

pub mod ir;
pub use ir::{
    ComputedPropertyDecl, Condition, InitializerDecl, MethodDecl, SpyDeclaration, SpyMember,
    SpyType, StoredPropertyDecl, SwiftNode,
};

pub mod type_analysis;
pub use type_analysis::{
    ShapeCategory, classify, contains_generic_parameter, erasing_generic_parameters,
};

pub mod namer;
pub use namer::UsedPrefixes;

pub mod tracking;
pub use tracking::{ArgumentRecording, TrackedField, TrackingFieldSet, fields_for};

pub mod forwarding;
pub use forwarding::body_for;

pub mod synthesizer;
pub use synthesizer::{SpySynthesizer, synthesize};
