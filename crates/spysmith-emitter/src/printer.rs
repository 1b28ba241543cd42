//! Swift Printer
//!
//! Walks the spy IR and emits Swift source text.
//!
//! ```swift
//! #if DEBUG
//! public class ServiceSpy: Service, @unchecked Sendable {
//!     public init() {}
//!
//!     public var fetchIdCallsCount: Int = 0
//!     ...
//!     public func fetch(id: String) async throws -> Int {
//!         fetchIdCallsCount += 1
//!         ...
//!     }
//! }
//! #endif
//! ```

use spysmith_synth::ir::{
    ComputedPropertyDecl, Condition, InitializerDecl, MethodDecl, SpyDeclaration, SpyMember,
    SpyType, StoredPropertyDecl, SwiftNode,
};

/// Printer that converts spy IR to Swift source.
pub struct SwiftPrinter {
    pub(crate) output: String,
    pub(crate) indent_level: u32,
    pub(crate) indent_str: &'static str,
}

impl Default for SwiftPrinter {
    fn default() -> Self {
        Self::new()
    }
}

impl SwiftPrinter {
    #[must_use]
    pub const fn new() -> Self {
        Self {
            output: String::new(),
            indent_level: 0,
            indent_str: "    ",
        }
    }

    /// Use a different indentation unit (default: four spaces).
    #[must_use]
    pub const fn with_indent(mut self, indent: &'static str) -> Self {
        self.indent_str = indent;
        self
    }

    /// Get the output string
    #[must_use]
    pub fn get_output(&self) -> &str {
        &self.output
    }

    /// Take the output string
    #[must_use]
    pub fn take_output(self) -> String {
        self.output
    }

    /// Emit a single statement or expression to a string.
    #[must_use]
    pub fn emit_to_string(node: &SwiftNode) -> String {
        let mut printer = Self::new();
        printer.emit_node(node);
        printer.output
    }

    /// Emit a complete spy declaration to a string.
    #[must_use]
    pub fn emit_declaration(declaration: &SpyDeclaration) -> String {
        let mut printer = Self::new();
        printer.print_declaration(declaration);
        printer.output
    }

    /// Print a spy declaration, wrapped in `#if` when it carries a condition.
    pub fn print_declaration(&mut self, declaration: &SpyDeclaration) {
        if let Some(flag) = &declaration.condition {
            self.write("#if ");
            self.write(flag);
            self.write_line();
        }
        self.print_type(&declaration.spy);
        if declaration.condition.is_some() {
            self.write("#endif");
            self.write_line();
        }
    }

    // =========================================================================
    // Declarations
    // =========================================================================

    fn print_type(&mut self, spy: &SpyType) {
        self.write_access(spy.access);
        self.write("class ");
        self.write(&spy.name);
        self.write_generic_parameters(&spy.generic_parameters);
        if !spy.inheritance.is_empty() {
            self.write(": ");
            for (i, inherited) in spy.inheritance.iter().enumerate() {
                if i > 0 {
                    self.write(", ");
                }
                self.write(&inherited.to_string());
            }
        }
        self.write(" {");
        self.write_line();
        self.increase_indent();

        let mut previous: Option<&SpyMember> = None;
        for member in &spy.members {
            if previous.is_some_and(|prev| needs_blank_line(prev, member)) {
                self.write_line();
            }
            self.print_member(member);
            previous = Some(member);
        }

        self.decrease_indent();
        self.write("}");
        self.write_line();
    }

    fn print_member(&mut self, member: &SpyMember) {
        match member {
            SpyMember::Initializer(init) => self.print_initializer(init),
            SpyMember::StoredProperty(property) => self.print_stored_property(property),
            SpyMember::ComputedProperty(property) => self.print_computed_property(property),
            SpyMember::Method(method) => self.print_method(method),
        }
    }

    fn print_initializer(&mut self, init: &InitializerDecl) {
        self.write_indent();
        self.write_access(init.access);
        if init.is_required {
            self.write("required ");
        }
        if init.is_override {
            self.write("override ");
        }
        self.write(if init.is_failable { "init?" } else { "init" });
        self.write_parameters(&init.parameters);
        self.write_effects(init.effects);
        self.write_block(&init.body);
        self.write_line();
    }

    fn print_stored_property(&mut self, property: &StoredPropertyDecl) {
        self.write_indent();
        self.write_access(property.access);
        self.write("var ");
        self.write(&property.name);
        if let Some(ty) = &property.ty {
            self.write(": ");
            self.write(&ty.to_string());
        }
        if let Some(initializer) = &property.initializer {
            self.write(" = ");
            self.emit_node(initializer);
        }
        self.write_line();
    }

    fn print_computed_property(&mut self, property: &ComputedPropertyDecl) {
        self.write_indent();
        self.write_access(property.access);
        self.write("var ");
        self.write(&property.name);
        self.write(": ");
        self.write(&property.ty.to_string());
        self.write(" {");
        self.write_line();
        self.increase_indent();

        match &property.setter {
            None => self.emit_statements(&property.getter),
            Some(setter) => {
                self.write_indent();
                self.write("get");
                self.write_inline_block(&property.getter);
                self.write_line();
                self.write_indent();
                self.write("set");
                self.write_inline_block(setter);
                self.write_line();
            }
        }

        self.decrease_indent();
        self.write_indent();
        self.write("}");
        self.write_line();
    }

    fn print_method(&mut self, method: &MethodDecl) {
        self.write_indent();
        self.write_access(method.access);
        self.write("func ");
        self.write(&method.name);
        self.write_generic_parameters(&method.generic_parameters);
        self.write_parameters(&method.parameters);
        self.write_effects(method.effects);
        if let Some(return_type) = &method.return_type {
            self.write(" -> ");
            self.write(&return_type.to_string());
        }
        if !method.where_requirements.is_empty() {
            self.write(" where ");
            self.write(&method.where_requirements.join(", "));
        }
        self.write_block(&method.body);
        self.write_line();
    }

    // =========================================================================
    // Statements
    // =========================================================================

    /// ` {}` for an empty body, otherwise a braced, indented block.
    fn write_block(&mut self, body: &[SwiftNode]) {
        if body.is_empty() {
            self.write(" {}");
            return;
        }
        self.write(" {");
        self.write_line();
        self.increase_indent();
        self.emit_statements(body);
        self.decrease_indent();
        self.write_indent();
        self.write("}");
    }

    /// ` { stmt }` on one line, used for accessor bodies.
    fn write_inline_block(&mut self, body: &[SwiftNode]) {
        self.write(" {");
        for statement in body {
            self.write(" ");
            self.emit_node(statement);
        }
        self.write(" }");
    }

    fn emit_statements(&mut self, statements: &[SwiftNode]) {
        for statement in statements {
            self.write_indent();
            self.emit_node(statement);
            self.write_line();
        }
    }

    fn emit_condition(&mut self, condition: &Condition) {
        match condition {
            Condition::Expression(expr) => self.emit_node(expr),
            Condition::OptionalBinding { name, value } => {
                self.write("let ");
                self.write(name);
                self.write(" = ");
                self.emit_node(value);
            }
        }
    }

    // =========================================================================
    // Nodes
    // =========================================================================

    pub(crate) fn emit_node(&mut self, node: &SwiftNode) {
        match node {
            SwiftNode::IntegerLiteral(value) => self.write(&value.to_string()),
            SwiftNode::NilLiteral => self.write("nil"),
            SwiftNode::EmptyArray => self.write("[]"),
            SwiftNode::Identifier(name) => self.write(name),
            SwiftNode::Tuple(elements) => {
                self.write("(");
                self.emit_comma_separated(elements);
                self.write(")");
            }
            SwiftNode::MemberAccess { base, member } => {
                self.emit_node(base);
                self.write(".");
                self.write(member);
            }
            SwiftNode::Call { callee, arguments } => {
                self.emit_node(callee);
                self.write("(");
                self.emit_comma_separated(arguments);
                self.write(")");
            }
            SwiftNode::OptionalChain(expr) => {
                self.emit_node(expr);
                self.write("?");
            }
            SwiftNode::ForceUnwrap(expr) => {
                self.emit_node(expr);
                self.write("!");
            }
            SwiftNode::InOut(expr) => {
                self.write("&");
                self.emit_node(expr);
            }
            SwiftNode::Binary {
                left,
                operator,
                right,
            } => {
                self.emit_node(left);
                self.write(" ");
                self.write(operator);
                self.write(" ");
                self.emit_node(right);
            }
            SwiftNode::ForcedCast { expr, ty } => {
                self.emit_node(expr);
                self.write(" as! ");
                self.write(&ty.to_string());
            }
            SwiftNode::Try(expr) => {
                self.write("try ");
                self.emit_node(expr);
            }
            SwiftNode::Await(expr) => {
                self.write("await ");
                self.emit_node(expr);
            }
            SwiftNode::Return(expr) => {
                self.write("return");
                if let Some(expr) = expr {
                    self.write(" ");
                    self.emit_node(expr);
                }
            }
            SwiftNode::Throw(expr) => {
                self.write("throw ");
                self.emit_node(expr);
            }
            SwiftNode::If {
                condition,
                then_branch,
                else_branch,
            } => {
                self.write("if ");
                self.emit_condition(condition);
                self.write_block(then_branch);
                if let Some(else_branch) = else_branch {
                    self.write(" else");
                    self.write_block(else_branch);
                }
            }
        }
    }

    fn emit_comma_separated(&mut self, nodes: &[SwiftNode]) {
        for (i, node) in nodes.iter().enumerate() {
            if i > 0 {
                self.write(", ");
            }
            self.emit_node(node);
        }
    }
}

/// Members are separated by a blank line except within a run of
/// properties or a run of initializers.
fn needs_blank_line(previous: &SpyMember, current: &SpyMember) -> bool {
    use SpyMember::{ComputedProperty, Initializer, StoredProperty};
    !matches!(
        (previous, current),
        (
            StoredProperty(_) | ComputedProperty(_),
            StoredProperty(_) | ComputedProperty(_)
        ) | (Initializer(_), Initializer(_))
    )
}

#[cfg(test)]
#[path = "../tests/printer_tests.rs"]
mod tests;
