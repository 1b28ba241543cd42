//! Type-expression reader.
//!
//! Turns the textual form of a single Swift type into a `TypeShape`. This is
//! not a declaration parser: it exists so interface descriptions can carry
//! types as strings (`"[String: Int]?"`, `"@escaping (Data) async throws -> Void"`).
//!
//! Grammar (loosest binding first):
//!
//! ```text
//! type      := attribute* composite '...'?
//! composite := postfix ('&' postfix)*
//! postfix   := primary ('?' | '!' | '.' IDENT generics?)*
//! primary   := ('any' | 'some') composite
//!            | '[' type (':' type)? ']'
//!            | '(' elements? ')' ('async'? ('throws' | 'rethrows')? '->' type)?
//!            | IDENT generics?
//! ```

use smallvec::SmallVec;

use crate::type_shape::{Qualifier, TupleElement, TypeShape};

/// Failure to read a type expression.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum TypeParseError {
    #[error("unexpected character '{ch}' at offset {offset}")]
    UnexpectedCharacter { ch: char, offset: usize },
    #[error("unexpected '{found}' at offset {offset}, expected {expected}")]
    UnexpectedToken {
        found: String,
        offset: usize,
        expected: &'static str,
    },
    #[error("unexpected end of type, expected {expected}")]
    UnexpectedEnd { expected: &'static str },
    #[error("unterminated {what} starting at offset {offset}")]
    Unterminated { what: &'static str, offset: usize },
}

/// Parameter specifiers that prefix a type the way attributes do.
const SPECIFIERS: &[&str] = &[
    "inout",
    "borrowing",
    "consuming",
    "sending",
    "isolated",
    "__owned",
    "__shared",
];

/// Read one complete type expression.
pub fn parse_type(text: &str) -> Result<TypeShape, TypeParseError> {
    let tokens = tokenize(text)?;
    let mut parser = TypeParser { tokens, pos: 0 };
    let ty = parser.parse_type_expr()?;
    if let Some(token) = parser.peek() {
        return Err(TypeParseError::UnexpectedToken {
            found: token.kind.text().to_string(),
            offset: token.offset,
            expected: "end of type",
        });
    }
    tracing::trace!(input = text, parsed = %ty, "parsed type expression");
    Ok(ty)
}

// =============================================================================
// Tokens
// =============================================================================

#[derive(Debug, Clone, PartialEq, Eq)]
enum TokenKind {
    Ident(String),
    Attribute(String),
    Punct(&'static str),
}

impl TokenKind {
    fn text(&self) -> &str {
        match self {
            Self::Ident(text) | Self::Attribute(text) => text,
            Self::Punct(p) => p,
        }
    }
}

#[derive(Debug, Clone)]
struct Token {
    kind: TokenKind,
    offset: usize,
}

fn is_ident_char(ch: char) -> bool {
    ch.is_alphanumeric() || ch == '_' || ch == '$'
}

fn tokenize(text: &str) -> Result<Vec<Token>, TypeParseError> {
    let chars: Vec<(usize, char)> = text.char_indices().collect();
    let mut tokens = Vec::new();
    let mut i = 0;

    while i < chars.len() {
        let (offset, ch) = chars[i];

        if ch.is_whitespace() {
            i += 1;
            continue;
        }

        // Multi-character punctuation first
        let rest = &text[offset..];
        if rest.starts_with("->") {
            tokens.push(Token {
                kind: TokenKind::Punct("->"),
                offset,
            });
            i += 2;
            continue;
        }
        if rest.starts_with("...") {
            tokens.push(Token {
                kind: TokenKind::Punct("..."),
                offset,
            });
            i += 3;
            continue;
        }

        match ch {
            '?' | '!' | '.' | '<' | '>' | '[' | ']' | '(' | ')' | ':' | ',' | '&' => {
                let punct = match ch {
                    '?' => "?",
                    '!' => "!",
                    '.' => ".",
                    '<' => "<",
                    '>' => ">",
                    '[' => "[",
                    ']' => "]",
                    '(' => "(",
                    ')' => ")",
                    ':' => ":",
                    ',' => ",",
                    _ => "&",
                };
                tokens.push(Token {
                    kind: TokenKind::Punct(punct),
                    offset,
                });
                i += 1;
            }
            '`' => {
                // Escaped identifier: `Type`
                let mut end = i + 1;
                while end < chars.len() && chars[end].1 != '`' {
                    end += 1;
                }
                if end >= chars.len() {
                    return Err(TypeParseError::Unterminated {
                        what: "escaped identifier",
                        offset,
                    });
                }
                let close = chars[end].0 + 1;
                tokens.push(Token {
                    kind: TokenKind::Ident(text[offset..close].to_string()),
                    offset,
                });
                i = end + 1;
            }
            '@' => {
                let mut end = i + 1;
                while end < chars.len() && is_ident_char(chars[end].1) {
                    end += 1;
                }
                // Attribute arguments: @convention(c)
                if end < chars.len() && chars[end].1 == '(' {
                    let mut depth = 0usize;
                    loop {
                        if end >= chars.len() {
                            return Err(TypeParseError::Unterminated {
                                what: "attribute argument",
                                offset,
                            });
                        }
                        match chars[end].1 {
                            '(' => depth += 1,
                            ')' => {
                                depth -= 1;
                                if depth == 0 {
                                    end += 1;
                                    break;
                                }
                            }
                            _ => {}
                        }
                        end += 1;
                    }
                }
                let stop = chars.get(end).map_or(text.len(), |(o, _)| *o);
                tokens.push(Token {
                    kind: TokenKind::Attribute(text[offset..stop].to_string()),
                    offset,
                });
                i = end;
            }
            c if is_ident_char(c) => {
                let mut end = i;
                while end < chars.len() && is_ident_char(chars[end].1) {
                    end += 1;
                }
                let stop = chars.get(end).map_or(text.len(), |(o, _)| *o);
                tokens.push(Token {
                    kind: TokenKind::Ident(text[offset..stop].to_string()),
                    offset,
                });
                i = end;
            }
            other => {
                return Err(TypeParseError::UnexpectedCharacter { ch: other, offset });
            }
        }
    }

    Ok(tokens)
}

// =============================================================================
// Parser
// =============================================================================

struct TypeParser {
    tokens: Vec<Token>,
    pos: usize,
}

impl TypeParser {
    fn peek(&self) -> Option<&Token> {
        self.tokens.get(self.pos)
    }

    fn peek_at(&self, ahead: usize) -> Option<&Token> {
        self.tokens.get(self.pos + ahead)
    }

    fn is_punct(&self, punct: &str) -> bool {
        matches!(self.peek(), Some(Token { kind: TokenKind::Punct(p), .. }) if *p == punct)
    }

    fn is_ident(&self, ident: &str) -> bool {
        matches!(self.peek(), Some(Token { kind: TokenKind::Ident(text), .. }) if text == ident)
    }

    fn eat_punct(&mut self, punct: &str) -> bool {
        if self.is_punct(punct) {
            self.pos += 1;
            true
        } else {
            false
        }
    }

    fn eat_ident(&mut self, ident: &str) -> bool {
        if self.is_ident(ident) {
            self.pos += 1;
            true
        } else {
            false
        }
    }

    fn expect_punct(&mut self, punct: &'static str) -> Result<(), TypeParseError> {
        if self.eat_punct(punct) {
            return Ok(());
        }
        Err(self.unexpected(punct))
    }

    fn unexpected(&self, expected: &'static str) -> TypeParseError {
        match self.peek() {
            Some(token) => TypeParseError::UnexpectedToken {
                found: token.kind.text().to_string(),
                offset: token.offset,
                expected,
            },
            None => TypeParseError::UnexpectedEnd { expected },
        }
    }

    fn parse_type_expr(&mut self) -> Result<TypeShape, TypeParseError> {
        let mut attributes: SmallVec<[String; 2]> = SmallVec::new();
        loop {
            match self.peek().map(|t| &t.kind) {
                Some(TokenKind::Attribute(attribute)) => {
                    attributes.push(attribute.clone());
                    self.pos += 1;
                }
                Some(TokenKind::Ident(word)) if SPECIFIERS.contains(&word.as_str()) => {
                    attributes.push(word.clone());
                    self.pos += 1;
                }
                _ => break,
            }
        }

        let mut ty = self.parse_composite()?;
        if self.eat_punct("...") {
            ty = TypeShape::Variadic(Box::new(ty));
        }
        if !attributes.is_empty() {
            ty = TypeShape::attributed(attributes.into_vec(), ty);
        }
        Ok(ty)
    }

    fn parse_composite(&mut self) -> Result<TypeShape, TypeParseError> {
        let first = self.parse_postfix()?;
        if !self.is_punct("&") {
            return Ok(first);
        }
        let mut constituents = vec![first];
        while self.eat_punct("&") {
            constituents.push(self.parse_postfix()?);
        }
        Ok(TypeShape::Composite(constituents))
    }

    fn parse_postfix(&mut self) -> Result<TypeShape, TypeParseError> {
        let mut ty = self.parse_primary()?;
        loop {
            if self.eat_punct("?") {
                ty = TypeShape::optional(ty);
            } else if self.eat_punct("!") {
                ty = TypeShape::implicitly_unwrapped(ty);
            } else if self.eat_punct(".") {
                let member = self.parse_identifier_type()?;
                ty = TypeShape::MemberQualified {
                    base: Box::new(ty),
                    member: member.to_string(),
                };
            } else {
                return Ok(ty);
            }
        }
    }

    fn parse_primary(&mut self) -> Result<TypeShape, TypeParseError> {
        if let Some(qualifier) = self.peek_qualifier() {
            self.pos += 1;
            let constraint = self.parse_composite()?;
            return Ok(TypeShape::Qualified {
                qualifier,
                constraint: Box::new(constraint),
            });
        }

        if self.eat_punct("[") {
            let element = self.parse_type_expr()?;
            if self.eat_punct(":") {
                let value = self.parse_type_expr()?;
                self.expect_punct("]")?;
                return Ok(TypeShape::dictionary(element, value));
            }
            self.expect_punct("]")?;
            return Ok(TypeShape::array(element));
        }

        if self.eat_punct("(") {
            return self.parse_parenthesized();
        }

        self.parse_identifier_type()
    }

    /// `any` / `some` only act as qualifiers when a type follows them.
    fn peek_qualifier(&self) -> Option<Qualifier> {
        let qualifier = if self.is_ident("any") {
            Qualifier::Any
        } else if self.is_ident("some") {
            Qualifier::Some
        } else {
            return None;
        };
        match self.peek_at(1).map(|t| &t.kind) {
            Some(TokenKind::Ident(_) | TokenKind::Punct("(" | "[")) => Some(qualifier),
            _ => None,
        }
    }

    fn parse_identifier_type(&mut self) -> Result<TypeShape, TypeParseError> {
        let name = match self.peek().map(|t| &t.kind) {
            Some(TokenKind::Ident(name)) => name.clone(),
            _ => return Err(self.unexpected("a type name")),
        };
        self.pos += 1;

        let mut generic_arguments = Vec::new();
        if self.eat_punct("<") {
            loop {
                generic_arguments.push(self.parse_type_expr()?);
                if self.eat_punct(",") {
                    continue;
                }
                self.expect_punct(">")?;
                break;
            }
        }
        Ok(TypeShape::Named {
            name,
            generic_arguments,
        })
    }

    /// Everything after an opening `(`: a tuple, a grouping, or a function type.
    fn parse_parenthesized(&mut self) -> Result<TypeShape, TypeParseError> {
        let mut elements = Vec::new();
        if !self.eat_punct(")") {
            loop {
                elements.push(self.parse_tuple_element()?);
                if self.eat_punct(",") {
                    continue;
                }
                self.expect_punct(")")?;
                break;
            }
        }

        let is_async = self.eat_ident("async");
        let mut is_throwing = false;
        let mut thrown_error = None;
        if self.eat_ident("throws") || self.eat_ident("rethrows") {
            is_throwing = true;
            // Typed throws: throws(MyError)
            if self.eat_punct("(") {
                thrown_error = Some(self.parse_type_expr()?);
                self.expect_punct(")")?;
            }
        }

        if is_async || is_throwing || self.is_punct("->") {
            self.expect_punct("->")?;
            let return_type = self.parse_type_expr()?;
            let function = TypeShape::function_with_effects(
                elements.into_iter().map(|element| element.ty).collect(),
                is_async,
                is_throwing,
                return_type,
            );
            return Ok(match thrown_error {
                Some(error) => function.with_thrown_error(error),
                None => function,
            });
        }

        if elements.len() == 1 && elements[0].label.is_none() {
            return Ok(elements.remove(0).ty);
        }
        Ok(TypeShape::Tuple(elements))
    }

    fn parse_tuple_element(&mut self) -> Result<TupleElement, TypeParseError> {
        let label = match (self.peek().map(|t| &t.kind), self.peek_at(1).map(|t| &t.kind)) {
            (Some(TokenKind::Ident(label)), Some(TokenKind::Punct(":"))) => {
                let label = label.clone();
                self.pos += 2;
                Some(label)
            }
            // `_ name: Type` in function parameter position
            (Some(TokenKind::Ident(_)), Some(TokenKind::Ident(_)))
                if matches!(
                    self.peek_at(2).map(|t| &t.kind),
                    Some(TokenKind::Punct(":"))
                ) =>
            {
                self.pos += 3;
                None
            }
            _ => None,
        };
        let ty = self.parse_type_expr()?;
        Ok(TupleElement { label, ty })
    }
}

#[cfg(test)]
#[path = "../tests/type_parser_tests.rs"]
mod tests;
