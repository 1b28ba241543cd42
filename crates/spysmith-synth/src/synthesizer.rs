//! Spy synthesis.
//!
//! `SpySynthesizer` turns one protocol declaration into a `SpyDeclaration`:
//! the `<Name>Spy` class conforming to the protocol, with tracking state and
//! a forwarding body per method, optionally guarded by `#if FLAG`.
//!
//! # Example
//!
//! ```rust,ignore
//! let spy = synthesize(&declaration, &SynthesisOptions::default())?;
//! assert_eq!(spy.spy.name, "ServiceSpy");
//! ```

use rustc_hash::FxHashSet;
use smallvec::SmallVec;
use spysmith_common::{AccessLevel, SynthesisError, SynthesisOptions};
use spysmith_syntax::{
    BindingPattern, Declaration, Effects, GenericParameter, InitializerMember, InterfaceDescription,
    MethodMember, PropertyMember, TypeShape, parse_type,
};
use tracing::{debug, trace};

use crate::forwarding::body_for;
use crate::ir::{
    ComputedPropertyDecl, InitializerDecl, MethodDecl, SpyDeclaration, SpyMember, SpyType,
    StoredPropertyDecl, SwiftNode,
};
use crate::namer::{capitalize_first, resolve};
use crate::tracking::fields_for;
use crate::type_analysis::is_optional_like;

/// Synthesize the spy for `declaration` under `options`.
///
/// Fails without partial output when the declaration is not a protocol,
/// when a property cannot be mapped, or when the preprocessor flag is not a
/// plain string literal.
pub fn synthesize(
    declaration: &Declaration,
    options: &SynthesisOptions,
) -> Result<SpyDeclaration, SynthesisError> {
    SpySynthesizer::new(options).synthesize(declaration)
}

/// Synthesizer configured for one set of options.
#[derive(Debug, Clone)]
pub struct SpySynthesizer<'a> {
    options: &'a SynthesisOptions,
    base: Option<TypeShape>,
}

impl<'a> SpySynthesizer<'a> {
    #[must_use]
    pub fn new(options: &'a SynthesisOptions) -> Self {
        let base = options.inherited_type.as_deref().map(|text| {
            parse_type(text).unwrap_or_else(|_| TypeShape::Opaque(text.trim().to_string()))
        });
        Self { options, base }
    }

    /// Effective access modifier: explicit option, else the protocol's own.
    #[must_use]
    pub fn effective_access(&self, interface: &InterfaceDescription) -> Option<AccessLevel> {
        self.options
            .access_level
            .or(interface.visibility)
            .map(AccessLevel::emittable)
    }

    #[tracing::instrument(level = "debug", skip_all, fields(interface = %declaration.name()))]
    pub fn synthesize(&self, declaration: &Declaration) -> Result<SpyDeclaration, SynthesisError> {
        let Declaration::Protocol(interface) = declaration else {
            return Err(SynthesisError::NotAnInterface {
                name: declaration.name().to_string(),
                kind: declaration.keyword(),
            });
        };

        let access = self.effective_access(interface);
        let mut members = self.initializers(interface, access);
        for property in &interface.properties {
            members.extend(Self::property(property, access)?);
        }
        members.extend(Self::methods(&interface.methods, access));

        let spy = SpyType {
            name: format!("{}Spy", interface.name),
            access,
            generic_parameters: interface
                .associated_types
                .iter()
                .map(|associated| GenericParameter {
                    name: associated.name.clone(),
                    constraint: associated.constraint.clone(),
                })
                .collect(),
            inheritance: self.inheritance(interface),
            members,
        };

        let condition = self
            .options
            .preprocessor_flag
            .as_ref()
            .map(|flag| flag.validate())
            .transpose()?;

        debug!(
            spy = %spy.name,
            members = spy.members.len(),
            wrapped = condition.is_some(),
            "synthesized spy"
        );
        Ok(SpyDeclaration { spy, condition })
    }

    fn inheritance(&self, interface: &InterfaceDescription) -> Vec<TypeShape> {
        let mut inheritance = Vec::with_capacity(3);
        if let Some(base) = &self.base {
            inheritance.push(base.clone());
        }
        inheritance.push(TypeShape::named(&interface.name));
        inheritance.push(TypeShape::attributed(
            vec!["@unchecked".to_string()],
            TypeShape::named("Sendable"),
        ));
        inheritance
    }

    fn super_init_body(&self) -> Vec<SwiftNode> {
        if self.base.is_some() {
            vec![SwiftNode::call(
                SwiftNode::member(SwiftNode::id("super"), "init"),
                Vec::new(),
            )]
        } else {
            Vec::new()
        }
    }

    fn initializers(
        &self,
        interface: &InterfaceDescription,
        access: Option<AccessLevel>,
    ) -> Vec<SpyMember> {
        let mut members = Vec::with_capacity(interface.initializers.len() + 1);
        let has_base = self.base.is_some();
        // Initializers cannot be `open`
        let access = access.map(|level| level.min(AccessLevel::Public));

        let declares_empty_init = interface
            .initializers
            .iter()
            .any(|init| init.parameters.is_empty());
        if !declares_empty_init {
            members.push(SpyMember::Initializer(InitializerDecl {
                access,
                is_required: false,
                is_override: has_base,
                is_failable: false,
                parameters: Vec::new(),
                effects: Effects::empty(),
                body: self.super_init_body(),
            }));
        }

        for init in &interface.initializers {
            trace!(parameters = init.parameters.len(), "required initializer");
            members.push(SpyMember::Initializer(self.required_initializer(init, access)));
        }
        members
    }

    fn required_initializer(
        &self,
        init: &InitializerMember,
        access: Option<AccessLevel>,
    ) -> InitializerDecl {
        InitializerDecl {
            access,
            is_required: true,
            is_override: self.base.is_some() && init.parameters.is_empty(),
            is_failable: init.is_failable,
            parameters: init.parameters.clone(),
            effects: init.effects,
            body: self.super_init_body(),
        }
    }

    fn property(
        property: &PropertyMember,
        access: Option<AccessLevel>,
    ) -> Result<SmallVec<[SpyMember; 2]>, SynthesisError> {
        let [binding] = property.bindings.as_slice() else {
            return Err(SynthesisError::PropertyNotSingleBinding {
                count: property.bindings.len(),
            });
        };
        let BindingPattern::Identifier(name) = &binding.pattern else {
            return Err(SynthesisError::PropertyNotIdentifierPattern {
                pattern: binding.pattern.to_string(),
            });
        };
        trace!(property = %name, ty = %binding.ty, "property");

        let mut members = SmallVec::new();
        if is_optional_like(&binding.ty) {
            members.push(SpyMember::StoredProperty(StoredPropertyDecl {
                access,
                name: name.clone(),
                ty: Some(binding.ty.clone()),
                initializer: None,
            }));
            return Ok(members);
        }

        let underlying = format!("underlying{}", capitalize_first(name));
        members.push(SpyMember::ComputedProperty(ComputedPropertyDecl {
            access,
            name: name.clone(),
            ty: binding.ty.clone(),
            getter: vec![SwiftNode::ret(Some(SwiftNode::id(&underlying)))],
            setter: Some(vec![SwiftNode::assign(
                SwiftNode::id(&underlying),
                SwiftNode::id("newValue"),
            )]),
        }));
        members.push(SpyMember::StoredProperty(StoredPropertyDecl {
            access,
            name: underlying,
            ty: Some(TypeShape::implicitly_unwrapped(binding.ty.clone())),
            initializer: None,
        }));
        Ok(members)
    }

    fn methods(methods: &[MethodMember], access: Option<AccessLevel>) -> Vec<SpyMember> {
        let methods: Vec<MethodMember> = methods.iter().map(with_named_parameters).collect();
        let prefixes = resolve(&methods);

        let mut members = Vec::new();
        for (method, prefix) in methods.iter().zip(&prefixes) {
            trace!(method = %method.name, prefix = %prefix, "method");
            let fields = fields_for(method, prefix);
            members.extend(fields.declarations(access));
            members.push(SpyMember::Method(MethodDecl {
                access,
                name: method.name.clone(),
                generic_parameters: method.generic_parameters.clone(),
                parameters: method.parameters.clone(),
                effects: method.effects,
                return_type: method.return_type.clone(),
                where_requirements: method.where_requirements.clone(),
                body: body_for(method, &fields),
            }));
        }
        members
    }
}

/// Give every parameter a referable internal name: `_: Int` becomes
/// `_ arg1: Int` so the body can record and forward it.
///
/// The synthetic name never shadows another parameter: `f(_: Int, arg1: Int)`
/// names the first parameter `arg2`.
fn with_named_parameters(method: &MethodMember) -> MethodMember {
    let mut method = method.clone();
    let mut taken: FxHashSet<String> = method
        .parameters
        .iter()
        .map(|param| param.internal_name().trim_matches('`').to_string())
        .filter(|name| name != "_")
        .collect();

    for (index, param) in method.parameters.iter_mut().enumerate() {
        if param.internal_name() != "_" {
            continue;
        }
        let mut ordinal = index + 1;
        let mut candidate = format!("arg{ordinal}");
        while !taken.insert(candidate.clone()) {
            ordinal += 1;
            candidate = format!("arg{ordinal}");
        }
        param.name = Some(candidate);
    }
    method
}

#[cfg(test)]
#[path = "../tests/synthesizer_tests.rs"]
mod tests;
