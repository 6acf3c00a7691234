//! Types: primitive types, class/interface types (possibly generic,
//! possibly qualified, possibly array), wildcards, type arguments/parameters,
//! and `var`.

use crate::context::ParseContext;
use crate::error::ParseError;
use crate::parser::annotations::at_annotation;
use crate::parser::support::{at, eat, guarded, leaf, node};
use crate::token::TokenKind;
use crate::tree::{NodeId, NodeKind};

fn is_primitive(kind: TokenKind) -> bool {
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
            | TokenKind::Void
    )
}

/// `Identifier (DOT Identifier)*`, as a single `Name` node. Used for package
/// names, import targets, and annotation names — any place the grammar wants
/// a dotted reference rather than a full type (with generics).
pub(crate) fn parse_qualified_name(ctx: &mut ParseContext) -> Result<NodeId, ParseError> {
    node(ctx, NodeKind::Name, |ctx| {
        leaf(ctx, NodeKind::IdentifierNode)?;
        while at(ctx, TokenKind::Dot) && ctx.peek(1).kind == TokenKind::Identifier {
            ctx.expect(TokenKind::Dot)?;
            leaf(ctx, NodeKind::IdentifierNode)?;
        }
        Ok(())
    })
}

/// Entry point for any type reference: primitive, class/interface
/// (qualified, generic), array (of either), or `var`.
///
/// The arena's `parent < child id` invariant means a node can never be
/// wrapped in a new parent after the fact — unlike a
/// rowan-style green tree, there is no retroactive "start_node_at a
/// checkpoint". So array-ness has to be known *before* the base type node
/// is allocated: we scan ahead (without allocating anything) to see whether
/// `[]` follows the base type, and only then decide whether the node we're
/// about to build is a plain base type or an `ArrayType` wrapping one.
pub(crate) fn parse_type(ctx: &mut ParseContext) -> Result<NodeId, ParseError> {
    guarded(ctx, |ctx| {
        if at(ctx, TokenKind::Var) {
            return leaf(ctx, NodeKind::VarType);
        }
        let base_len = if is_primitive(ctx.current().kind) {
            1
        } else {
            scan_class_type_len(ctx)
        };
        let dims = count_trailing_array_dims(ctx, base_len);
        if dims == 0 {
            return if is_primitive(ctx.current().kind) {
                leaf(ctx, NodeKind::PrimitiveType)
            } else {
                parse_class_type(ctx)
            };
        }
        node(ctx, NodeKind::ArrayType, |ctx| {
            if is_primitive(ctx.current().kind) {
                leaf(ctx, NodeKind::PrimitiveType)?;
            } else {
                parse_class_type(ctx)?;
            }
            for _ in 0..dims {
                ctx.expect(TokenKind::LBracket)?;
                ctx.expect(TokenKind::RBracket)?;
            }
            Ok(())
        })
    })
}

/// Number of tokens the upcoming class type (qualified, possibly generic)
/// spans, found without allocating any nodes. `base_len` lets
/// `count_trailing_array_dims` look exactly past the base type regardless
/// of which kind it turns out to be.
fn scan_class_type_len(ctx: &ParseContext) -> usize {
    scan_class_type_len_at(ctx, 0)
}

fn scan_class_type_len_at(ctx: &ParseContext, start: usize) -> usize {
    if ctx.peek(start).kind != TokenKind::Identifier {
        return start;
    }
    let mut i = start + 1;
    loop {
        if ctx.peek(i).kind == TokenKind::Lt {
            i = skip_type_argument_span(ctx, i + 1);
        }
        if ctx.peek(i).kind == TokenKind::Dot && ctx.peek(i + 1).kind == TokenKind::Identifier {
            i += 2;
            continue;
        }
        break;
    }
    i
}

/// `true` if the token at `offset` can start a type reference (primitive
/// keyword, `var`, or an identifier — the start of a possibly-qualified,
/// possibly-generic class type).
pub(crate) fn peek_starts_type(ctx: &ParseContext, offset: usize) -> bool {
    is_primitive(ctx.peek(offset).kind)
        || ctx.peek(offset).kind == TokenKind::Var
        || ctx.peek(offset).kind == TokenKind::Identifier
}

/// Read-only: token offset just past the type reference starting at
/// `start`, including any trailing `[]` array dimensions. Mirrors
/// `parse_type`'s own shape without allocating, for callers that only need
/// to know where a type ends (e.g. deciding whether an identifier follows).
pub(crate) fn peek_type_span_len(ctx: &ParseContext, start: usize) -> usize {
    if ctx.peek(start).kind == TokenKind::Var {
        return start + 1;
    }
    let base_len = if is_primitive(ctx.peek(start).kind) {
        start + 1
    } else {
        scan_class_type_len_at(ctx, start)
    };
    let mut i = base_len;
    while ctx.peek(i).kind == TokenKind::LBracket && ctx.peek(i + 1).kind == TokenKind::RBracket {
        i += 2;
    }
    i
}

/// Walks past a `<...>` type-argument span starting just after the opening
/// `<` (at token offset `i`), accounting for `>>`/`>>>` closing multiple
/// nesting levels at once. Returns the offset just past the matching close.
fn skip_type_argument_span(ctx: &ParseContext, mut i: usize) -> usize {
    let mut depth: i32 = 1;
    loop {
        match ctx.peek(i).kind {
            TokenKind::Lt => {
                depth += 1;
                i += 1;
            }
            TokenKind::Gt => {
                depth -= 1;
                i += 1;
            }
            TokenKind::RShift => {
                depth -= 2;
                i += 1;
            }
            TokenKind::URShift => {
                depth -= 3;
                i += 1;
            }
            TokenKind::Eof => return i,
            _ => i += 1,
        }
        if depth <= 0 {
            return i;
        }
    }
}

fn count_trailing_array_dims(ctx: &ParseContext, base_len: usize) -> usize {
    let mut dims = 0;
    let mut i = base_len;
    while ctx.peek(i).kind == TokenKind::LBracket && ctx.peek(i + 1).kind == TokenKind::RBracket {
        dims += 1;
        i += 2;
    }
    dims
}

fn parse_class_type(ctx: &mut ParseContext) -> Result<NodeId, ParseError> {
    node(ctx, NodeKind::ClassType, |ctx| {
        leaf(ctx, NodeKind::IdentifierNode)?;
        if at(ctx, TokenKind::Lt) {
            parse_type_arguments(ctx)?;
        }
        while at(ctx, TokenKind::Dot) && ctx.peek(1).kind == TokenKind::Identifier {
            ctx.expect(TokenKind::Dot)?;
            leaf(ctx, NodeKind::IdentifierNode)?;
            if at(ctx, TokenKind::Lt) {
                parse_type_arguments(ctx)?;
            }
        }
        Ok(())
    })
}

/// `< Type (, Type)* >` or the diamond `<>`. `>`/`>>`/`>>>` ambiguity at the
/// closing angle bracket is resolved by splitting the compound shift token
/// and injecting the remainder back onto the stream: closing two nested
/// generics with `>>` requires splitting it into two `>` tokens.
pub(crate) fn parse_type_arguments(ctx: &mut ParseContext) -> Result<NodeId, ParseError> {
    node(ctx, NodeKind::TypeArguments, |ctx| {
        ctx.expect(TokenKind::Lt)?;
        if at(ctx, TokenKind::Gt) {
            close_angle(ctx)?;
            return Ok(());
        }
        loop {
            if at(ctx, TokenKind::Question) {
                parse_wildcard(ctx)?;
            } else {
                parse_type(ctx)?;
            }
            if !eat(ctx, TokenKind::Comma) {
                break;
            }
        }
        close_angle(ctx)?;
        Ok(())
    })
}

/// Consumes one `>` from the current token, splitting a compound
/// `>>`/`>>>`/`>>=`/`>>>=` via the pending-token slot if that's what's
/// actually sitting at the cursor.
fn close_angle(ctx: &mut ParseContext) -> Result<(), ParseError> {
    use crate::token::Token;
    match ctx.current().kind {
        TokenKind::Gt => {
            ctx.advance();
            Ok(())
        }
        TokenKind::RShift => {
            let start = ctx.current().start;
            ctx.advance();
            ctx.inject_token(Token::new(TokenKind::Gt, start + 1, 1, None));
            Ok(())
        }
        TokenKind::URShift => {
            let start = ctx.current().start;
            ctx.advance();
            ctx.inject_token(Token::new(TokenKind::RShift, start + 1, 2, None));
            Ok(())
        }
        TokenKind::RShiftAssign => {
            let start = ctx.current().start;
            ctx.advance();
            ctx.inject_token(Token::new(TokenKind::Ge, start + 1, 2, None));
            Ok(())
        }
        TokenKind::URShiftAssign => {
            let start = ctx.current().start;
            ctx.advance();
            ctx.inject_token(Token::new(TokenKind::RShiftAssign, start + 1, 3, None));
            Ok(())
        }
        _ => ctx.expect(TokenKind::Gt).map(|_| ()),
    }
}

fn parse_wildcard(ctx: &mut ParseContext) -> Result<NodeId, ParseError> {
    node(ctx, NodeKind::WildcardType, |ctx| {
        ctx.expect(TokenKind::Question)?;
        if eat(ctx, TokenKind::Extends) || eat(ctx, TokenKind::Super) {
            parse_type(ctx)?;
        }
        Ok(())
    })
}

/// `< TypeParameter (, TypeParameter)* >`, e.g. `<T extends Comparable<T>>`.
pub(crate) fn parse_type_parameters(ctx: &mut ParseContext) -> Result<NodeId, ParseError> {
    node(ctx, NodeKind::TypeParameters, |ctx| {
        ctx.expect(TokenKind::Lt)?;
        loop {
            parse_type_parameter(ctx)?;
            if !eat(ctx, TokenKind::Comma) {
                break;
            }
        }
        close_angle(ctx)?;
        Ok(())
    })
}

fn parse_type_parameter(ctx: &mut ParseContext) -> Result<NodeId, ParseError> {
    node(ctx, NodeKind::TypeParameter, |ctx| {
        while at_annotation(ctx) {
            crate::parser::annotations::parse_annotation(ctx)?;
        }
        leaf(ctx, NodeKind::IdentifierNode)?;
        if eat(ctx, TokenKind::Extends) {
            parse_type(ctx)?;
            while eat(ctx, TokenKind::BitAnd) {
                parse_type(ctx)?;
            }
        }
        Ok(())
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
    fn primitive_array() {
        let mut ctx = ctx_for("int[]");
        let id = parse_type(&mut ctx).unwrap();
        assert_eq!(ctx.storage().get_node(id).unwrap().kind, NodeKind::ArrayType);
    }

    #[test]
    fn generic_class_type() {
        let mut ctx = ctx_for("Map<String, List<Integer>>");
        let id = parse_type(&mut ctx).unwrap();
        assert_eq!(ctx.storage().get_node(id).unwrap().kind, NodeKind::ClassType);
        assert_eq!(ctx.current().kind, TokenKind::Eof);
    }

    #[test]
    fn nested_generics_split_shift() {
        // `>>` here must close two generic levels via split-token injection.
        let mut ctx = ctx_for("List<List<String>>");
        let id = parse_type(&mut ctx).unwrap();
        assert_eq!(ctx.storage().get_node(id).unwrap().kind, NodeKind::ClassType);
        assert_eq!(ctx.current().kind, TokenKind::Eof);
    }

    #[test]
    fn wildcard_with_bound() {
        let mut ctx = ctx_for("List<? extends Number>");
        let id = parse_type(&mut ctx).unwrap();
        assert_eq!(ctx.storage().get_node(id).unwrap().kind, NodeKind::ClassType);
    }
}
