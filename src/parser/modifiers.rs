//! Modifier lists: the run of annotations and modifier keywords that can
//! precede any declaration (`public static final`, `@Deprecated private`, a
//! mix of both, in any order Java allows).

use crate::context::ParseContext;
use crate::error::ParseError;
use crate::parser::annotations::{at_annotation, parse_annotation};
use crate::parser::support::{leaf, node};
use crate::token::TokenKind;
use crate::tree::{NodeId, NodeKind};

fn is_modifier_keyword(kind: TokenKind) -> bool {
    matches!(
        kind,
        TokenKind::Public
            | TokenKind::Protected
            | TokenKind::Private
            | TokenKind::Static
            | TokenKind::Final
            | TokenKind::Abstract
            | TokenKind::Synchronized
            | TokenKind::Native
            | TokenKind::Transient
            | TokenKind::Volatile
            | TokenKind::Strictfp
            | TokenKind::Default
            | TokenKind::Sealed
            | TokenKind::NonSealed
    )
}

/// `true` if the current token starts a modifier list (even an empty one is
/// legal — this just tells the caller whether it's worth allocating the
/// node at all).
pub(crate) fn at_modifier(ctx: &ParseContext) -> bool {
    at_annotation(ctx) || is_modifier_keyword(ctx.current().kind)
}

/// Read-only: the token offset just past a run of modifier keywords and
/// annotations starting at `start`, without allocating anything. Used by
/// `crate::parser::statements` to look past an optional modifier run when
/// deciding whether what follows is a local variable/class declaration.
pub(crate) fn skip_modifiers(ctx: &ParseContext, start: usize) -> usize {
    let mut i = start;
    loop {
        if ctx.peek(i).kind == TokenKind::At && ctx.peek(i + 1).kind != TokenKind::Interface {
            i += 1;
            while ctx.peek(i).kind == TokenKind::Identifier {
                i += 1;
                if ctx.peek(i).kind == TokenKind::Dot && ctx.peek(i + 1).kind == TokenKind::Identifier {
                    i += 1;
                } else {
                    break;
                }
            }
            if ctx.peek(i).kind == TokenKind::LParen {
                let mut depth = 1;
                i += 1;
                while depth > 0 && ctx.peek(i).kind != TokenKind::Eof {
                    match ctx.peek(i).kind {
                        TokenKind::LParen => depth += 1,
                        TokenKind::RParen => depth -= 1,
                        _ => {}
                    }
                    i += 1;
                }
            }
            continue;
        }
        if is_modifier_keyword(ctx.peek(i).kind) {
            i += 1;
            continue;
        }
        break;
    }
    i
}

/// Consumes zero or more annotations/modifier keywords into one
/// `ModifierList` node. Always succeeds — an empty modifier list is
/// represented as a zero-child node at the current position, rather than
/// `None`, so every declaration has a uniform shape.
pub(crate) fn parse_modifiers(ctx: &mut ParseContext) -> Result<NodeId, ParseError> {
    node(ctx, NodeKind::ModifierList, |ctx| {
        loop {
            if at_annotation(ctx) {
                parse_annotation(ctx)?;
            } else if is_modifier_keyword(ctx.current().kind) {
                leaf(ctx, NodeKind::IdentifierNode)?;
            } else {
                break;
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
    fn mixed_annotation_and_keywords() {
        let mut ctx = ctx_for("@Deprecated public static final");
        let id = parse_modifiers(&mut ctx).unwrap();
        let rec = ctx.storage().get_node(id).unwrap();
        assert_eq!(rec.kind, NodeKind::ModifierList);
        assert_eq!(rec.children.len(), 4);
        assert_eq!(ctx.current().kind, TokenKind::Eof);
    }

    #[test]
    fn empty_modifier_list() {
        let mut ctx = ctx_for("class Foo {}");
        let id = parse_modifiers(&mut ctx).unwrap();
        assert_eq!(ctx.storage().get_node(id).unwrap().children.len(), 0);
        assert_eq!(ctx.current().kind, TokenKind::Class);
    }
}
