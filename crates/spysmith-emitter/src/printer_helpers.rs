//! Helper methods for the Swift printer.
//!
//! Output plumbing (text, newlines, indentation) and the signature pieces
//! shared by initializers and methods: access modifiers, generic parameter
//! clauses, parameter lists and effects.

use spysmith_common::AccessLevel;
use spysmith_syntax::{Effects, GenericParameter, Parameter, TypeShape};

use crate::printer::SwiftPrinter;

impl SwiftPrinter {
    pub(crate) fn write(&mut self, s: &str) {
        self.output.push_str(s);
    }

    pub(crate) fn write_line(&mut self) {
        self.output.push('\n');
    }

    pub(crate) fn write_indent(&mut self) {
        for _ in 0..self.indent_level {
            self.output.push_str(self.indent_str);
        }
    }

    pub(crate) const fn increase_indent(&mut self) {
        self.indent_level += 1;
    }

    pub(crate) const fn decrease_indent(&mut self) {
        if self.indent_level > 0 {
            self.indent_level -= 1;
        }
    }

    /// `public ` etc.; nothing when no level is set.
    pub(crate) fn write_access(&mut self, access: Option<AccessLevel>) {
        if let Some(level) = access {
            self.write(level.keyword());
            self.write(" ");
        }
    }

    /// `<T: Codable, U>`; nothing for an empty list.
    pub(crate) fn write_generic_parameters(&mut self, generics: &[GenericParameter]) {
        if generics.is_empty() {
            return;
        }
        self.write("<");
        for (i, generic) in generics.iter().enumerate() {
            if i > 0 {
                self.write(", ");
            }
            self.write(&generic.name);
            if let Some(constraint) = &generic.constraint {
                self.write(": ");
                self.write(&constraint.to_string());
            }
        }
        self.write(">");
    }

    /// `(label name: Type, ...)`
    pub(crate) fn write_parameters(&mut self, parameters: &[Parameter]) {
        self.write("(");
        for (i, param) in parameters.iter().enumerate() {
            if i > 0 {
                self.write(", ");
            }
            self.write_parameter(param);
        }
        self.write(")");
    }

    fn write_parameter(&mut self, param: &Parameter) {
        let name = param.internal_name();
        match param.call_label() {
            None if name == "_" => self.write("_"),
            None => {
                self.write("_ ");
                self.write(name);
            }
            Some(label) if label == name => self.write(label),
            Some(label) => {
                self.write(label);
                self.write(" ");
                self.write(name);
            }
        }
        self.write(": ");

        if param.is_inout {
            self.write("inout ");
        }
        if param.is_autoclosure {
            self.write("@autoclosure ");
        }
        if param.is_variadic {
            self.write(&TypeShape::Variadic(Box::new(param.ty.clone())).to_string());
        } else {
            self.write(&param.ty.to_string());
        }
    }

    /// ` async`, ` throws`, ` async throws`
    pub(crate) fn write_effects(&mut self, effects: Effects) {
        if effects.contains(Effects::ASYNC) {
            self.write(" async");
        }
        if effects.contains(Effects::THROWS) {
            self.write(" throws");
        }
    }
}
