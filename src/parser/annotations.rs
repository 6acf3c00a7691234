//! Annotations: `@Name`, `@Name(value)`, `@Name(k = v, ...)`.

use crate::context::ParseContext;
use crate::error::ParseError;
use crate::parser::support::{at, eat, guarded, leaf, node};
use crate::parser::types::parse_qualified_name;
use crate::token::TokenKind;
use crate::tree::{NodeId, NodeKind};

pub(crate) fn at_annotation(ctx: &ParseContext) -> bool {
    at(ctx, TokenKind::At) && !at_offset_is_interface(ctx)
}

fn at_offset_is_interface(ctx: &ParseContext) -> bool {
    // `@interface Foo {}` is an annotation *type declaration*, not a use of
    // an annotation; the declarations module handles that shape directly.
    ctx.peek(1).kind == TokenKind::Interface
}

pub(crate) fn parse_annotation(ctx: &mut ParseContext) -> Result<NodeId, ParseError> {
    guarded(ctx, |ctx| {
        let has_paren;
        {
            // Peek past `@Name` to see whether `(` follows at all; that much
            // is decidable before parsing, but marker vs. single-member vs.
            // normal needs the argument list's actual shape, so the node
            // starts out tagged with a provisional kind and gets retagged
            // below once `parse_annotation_body` reports what it saw. We
            // don't know the name's token length ahead of time, so walk
            // forward conservatively: qualified names are `IDENTIFIER (DOT
            // IDENTIFIER)*`.
            let mut offset = 1; // skip `@`
            loop {
                if ctx.peek(offset).kind != TokenKind::Identifier {
                    break;
                }
                offset += 1;
                if ctx.peek(offset).kind == TokenKind::Dot {
                    offset += 1;
                } else {
                    break;
                }
            }
            has_paren = ctx.peek(offset).kind == TokenKind::LParen;
        }
        let provisional_kind = if has_paren {
            NodeKind::NormalAnnotation
        } else {
            NodeKind::MarkerAnnotation
        };

        let mut body_shape = AnnotationBody::Empty;
        let id = node(ctx, provisional_kind, |ctx| {
            ctx.expect(TokenKind::At)?;
            parse_qualified_name(ctx)?;
            if eat(ctx, TokenKind::LParen) {
                body_shape = parse_annotation_body(ctx)?;
                ctx.expect(TokenKind::RParen)?;
            }
            Ok(())
        })?;
        // `@Name()` and `@Name(k = v, ...)` are both `NormalAnnotation`
        // (the provisional kind), so only the single-member shorthand needs
        // a retag — the same post-hoc technique `close_angle` uses to split
        // `>>`/`>>>` once the real shape is known.
        if body_shape == AnnotationBody::SingleMember {
            ctx.storage_mut()
                .update_kind(id, NodeKind::SingleMemberAnnotation)?;
        }
        Ok(id)
    })
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum AnnotationBody {
    /// `@Name()`, or no parens at all.
    Empty,
    /// `@Name(k1 = v1, k2 = v2)`.
    Normal,
    /// The single-member shorthand `@Name(v)`.
    SingleMember,
}

fn parse_annotation_body(ctx: &mut ParseContext) -> Result<AnnotationBody, ParseError> {
    if at(ctx, TokenKind::RParen) {
        return Ok(AnnotationBody::Empty);
    }
    // `@Name(k1 = v1, k2 = v2)` vs the single-member shorthand `@Name(v)`.
    if at(ctx, TokenKind::Identifier) && ctx.peek(1).kind == TokenKind::Assign {
        loop {
            node(ctx, NodeKind::AnnotationArgument, |ctx| {
                leaf(ctx, crate::tree::NodeKind::IdentifierNode)?;
                ctx.expect(TokenKind::Assign)?;
                parse_element_value(ctx)?;
                Ok(())
            })?;
            if !eat(ctx, TokenKind::Comma) {
                break;
            }
        }
        Ok(AnnotationBody::Normal)
    } else {
        node(ctx, NodeKind::AnnotationArgument, |ctx| {
            parse_element_value(ctx)?;
            Ok(())
        })?;
        Ok(AnnotationBody::SingleMember)
    }
}

/// An element value is an annotation, an array initializer `{ ... }`, or a
/// conditional expression — there's no separate `ElementValue` wrapper node,
/// so annotation arguments are stored directly as the expression/annotation
/// node they resolve to.
fn parse_element_value(ctx: &mut ParseContext) -> Result<NodeId, ParseError> {
    if at(ctx, TokenKind::At) {
        return parse_annotation(ctx);
    }
    if at(ctx, TokenKind::LBrace) {
        return node(ctx, NodeKind::ArgumentList, |ctx| {
            ctx.expect(TokenKind::LBrace)?;
            while !at(ctx, TokenKind::RBrace) && !at(ctx, TokenKind::Eof) {
                parse_element_value(ctx)?;
                if !eat(ctx, TokenKind::Comma) {
                    break;
                }
            }
            ctx.expect(TokenKind::RBrace)?;
            Ok(())
        });
    }
    crate::parser::expressions::parse_conditional(ctx)
}
