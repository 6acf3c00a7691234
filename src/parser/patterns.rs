//! Patterns: `instanceof` type patterns (Java 16+), record deconstruction
//! patterns (Java 21+), primitive patterns (Java 23+ preview, Java 25
//! finalized), and the `when` guard clause on a `switch` pattern label.
//!
//! Which of the three pattern shapes applies is a version-and-phase-gated
//! decision: the concrete `ParseStrategy` implementations in
//! `crate::strategy::constructs` decide *which* of these functions to call;
//! this module only knows how to parse each shape once selected.

use crate::context::ParseContext;
use crate::error::ParseError;
use crate::parser::support::{at, eat, guarded, leaf, node};
use crate::parser::types::{parse_qualified_name, parse_type};
use crate::token::TokenKind;
use crate::tree::{NodeId, NodeKind};

pub(crate) fn is_primitive_keyword(kind: TokenKind) -> bool {
    matches!(
        kind,
        TokenKind::Boolean
            | TokenKind::Byte
            | TokenKind::Short
            | TokenKind::Int
            | TokenKind::Long
            | TokenKind::Char
            | TokenKind::Float
            | TokenKind::Double
    )
}

/// `Type identifier`, e.g. `String s` in `x instanceof String s`.
pub(crate) fn parse_type_pattern(ctx: &mut ParseContext) -> Result<NodeId, ParseError> {
    guarded(ctx, |ctx| {
        node(ctx, NodeKind::TypePattern, |ctx| {
            parse_type(ctx)?;
            leaf(ctx, NodeKind::IdentifierNode)?;
            Ok(())
        })
    })
}

/// Same shape as a type pattern, but the type is restricted to a primitive:
/// `x instanceof int i`. Kept as a distinct node kind rather than folded
/// into `TypePattern`, since a primitive can never be the operand of a
/// user-defined type hierarchy check.
pub(crate) fn parse_primitive_pattern(ctx: &mut ParseContext) -> Result<NodeId, ParseError> {
    guarded(ctx, |ctx| {
        node(ctx, NodeKind::PrimitivePattern, |ctx| {
            leaf(ctx, NodeKind::PrimitiveType)?;
            leaf(ctx, NodeKind::IdentifierNode)?;
            Ok(())
        })
    })
}

/// `Type(pattern, pattern, ...)`, e.g. `Point(var x, var y)`. Components may
/// themselves be record patterns, recursively.
pub(crate) fn parse_record_pattern(ctx: &mut ParseContext) -> Result<NodeId, ParseError> {
    guarded(ctx, |ctx| {
        node(ctx, NodeKind::RecordPattern, |ctx| {
            parse_qualified_name(ctx)?;
            ctx.expect(TokenKind::LParen)?;
            if !at(ctx, TokenKind::RParen) {
                loop {
                    parse_nested_pattern(ctx)?;
                    if !eat(ctx, TokenKind::Comma) {
                        break;
                    }
                }
            }
            ctx.expect(TokenKind::RParen)?;
            Ok(())
        })
    })
}

/// A component inside a record pattern's parens: either another record
/// pattern, a primitive pattern, or a type pattern (including the `var x`
/// shorthand, which parses as an ordinary type pattern with `VarType`).
fn parse_nested_pattern(ctx: &mut ParseContext) -> Result<NodeId, ParseError> {
    if looks_like_record_pattern(ctx) {
        return parse_record_pattern(ctx);
    }
    if is_primitive_keyword(ctx.current().kind) {
        return parse_primitive_pattern(ctx);
    }
    parse_type_pattern(ctx)
}

/// True if the upcoming tokens are `QualifiedName (`, i.e. a nested record
/// deconstruction rather than a plain type pattern.
pub(crate) fn looks_like_record_pattern(ctx: &ParseContext) -> bool {
    if ctx.peek(0).kind != TokenKind::Identifier {
        return false;
    }
    let mut i = 1;
    while ctx.peek(i).kind == TokenKind::Dot && ctx.peek(i + 1).kind == TokenKind::Identifier {
        i += 2;
    }
    ctx.peek(i).kind == TokenKind::LParen
}

/// `when expr` trailing a pattern label in a `switch` rule, e.g.
/// `case Point(var x, var y) when x == y -> ...`.
pub(crate) fn parse_guard(ctx: &mut ParseContext) -> Result<NodeId, ParseError> {
    guarded(ctx, |ctx| {
        node(ctx, NodeKind::Guard, |ctx| {
            ctx.expect(TokenKind::When)?;
            crate::parser::expressions::parse_expression(ctx)?;
            Ok(())
        })
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lexer::Lexer;
    use crate::tree::NodeStorage;

    fn ctx_for(src: &'static str) -> ParseContext<'static> {
        let tokens: Vec<_> = Lexer::tokenize_all(src)
            .into_iter()
            .filter(|t| !t.kind.is_trivia())
            .collect();
        ParseContext::new(src, tokens, NodeStorage::create(64).unwrap(), 1000)
    }

    #[test]
    fn type_pattern() {
        let mut ctx = ctx_for("String s");
        let id = parse_type_pattern(&mut ctx).unwrap();
        assert_eq!(ctx.storage().get_node(id).unwrap().kind, NodeKind::TypePattern);
    }

    #[test]
    fn primitive_pattern() {
        let mut ctx = ctx_for("int i");
        let id = parse_primitive_pattern(&mut ctx).unwrap();
        assert_eq!(ctx.storage().get_node(id).unwrap().kind, NodeKind::PrimitivePattern);
    }

    #[test]
    fn nested_record_pattern() {
        let mut ctx = ctx_for("Point(var x, var y)");
        let id = parse_record_pattern(&mut ctx).unwrap();
        let rec = ctx.storage().get_node(id).unwrap();
        assert_eq!(rec.kind, NodeKind::RecordPattern);
        assert_eq!(rec.children.len(), 3); // name + two component type-patterns
    }

    #[test]
    fn record_pattern_detection() {
        let ctx = ctx_for("Point(var x, var y)");
        assert!(looks_like_record_pattern(&ctx));
        let ctx2 = ctx_for("String s");
        assert!(!looks_like_record_pattern(&ctx2));
    }
}
