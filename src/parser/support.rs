//! Shared node-building plumbing used by every construct parser in this
//! module. Not part of the CORE's public contract (only `NodeStorage` and
//! `ParseContext` themselves are) — this is driver glue, mirroring the
//! `start_node`/`finish_node` pairing of a typical green-tree builder.

use crate::context::ParseContext;
use crate::error::ParseError;
use crate::token::TokenKind;
use crate::tree::{NodeId, NodeKind, NONE};

/// Allocates a node of `kind` rooted at the current token, runs `body` with
/// that node pushed as the current parent, then fixes up the node's length
/// to span everything `body` consumed — a node's true extent isn't known
/// until its children are parsed.
///
/// `body` consumes tokens and allocates children via recursive calls to
/// `node`/`leaf`; the parent stack discipline (`push_parent`/`pop_parent`)
/// means children body allocates automatically get `id` as their parent.
pub(crate) fn node<F>(ctx: &mut ParseContext, kind: NodeKind, body: F) -> Result<NodeId, ParseError>
where
    F: FnOnce(&mut ParseContext) -> Result<(), ParseError>,
{
    let start = ctx.current().start;
    let parent = ctx.current_parent();
    let id = ctx.storage_mut().allocate(start, 0, kind, parent)?;
    ctx.push_parent(id);

    let result = body(ctx);

    let end = ctx.previous_end().max(start);
    ctx.pop_parent();
    match result {
        Ok(()) => {
            ctx.storage_mut().update_length(id, end - start)?;
            Ok(id)
        }
        Err(e) => Err(e),
    }
}

/// Allocates a zero-children leaf node covering exactly the current token,
/// then advances past it. Used for names, literals, and other tokens that
/// become a node of their own without further structure.
pub(crate) fn leaf(ctx: &mut ParseContext, kind: NodeKind) -> Result<NodeId, ParseError> {
    let tok = ctx.current().clone();
    let parent = ctx.current_parent();
    let id = ctx
        .storage_mut()
        .allocate(tok.start, tok.length, kind, parent)?;
    ctx.advance();
    Ok(id)
}

/// Recursion-depth-bounded entry point every recursive construct parser
/// calls before doing any work. Always paired with `exit_recursion` via this
/// helper so a propagated error still releases the depth it consumed.
pub(crate) fn guarded<F>(ctx: &mut ParseContext, body: F) -> Result<NodeId, ParseError>
where
    F: FnOnce(&mut ParseContext) -> Result<NodeId, ParseError>,
{
    ctx.enter_recursion()?;
    let result = body(ctx);
    ctx.exit_recursion();
    result
}

/// Allocates a single `ERROR` node covering the current token and advances
/// past it — the lexer-level "every byte becomes part of some token"
/// recovery extended one level up: an unrecognized construct becomes one
/// `ERROR` node rather than aborting the whole parse. Deeper recovery (
/// resuming mid-construct, multi-token skip heuristics) is out of scope.
pub(crate) fn error_node(ctx: &mut ParseContext) -> Result<NodeId, ParseError> {
    leaf(ctx, NodeKind::Error)
}

/// Skips tokens until `stop` matches the current token or EOF is reached,
/// without allocating anything — the resynchronization step after a
/// recovered error, so the next top-level/member/statement parse starts
/// from a plausible boundary instead of immediately re-failing on the same
/// token.
pub(crate) fn resync_to(ctx: &mut ParseContext, stop: &[TokenKind]) {
    while !ctx.current_is(TokenKind::Eof) && !stop.contains(&ctx.current().kind) {
        ctx.advance();
    }
}

/// `true` if the current token is `kind`.
pub(crate) fn at(ctx: &ParseContext, kind: TokenKind) -> bool {
    ctx.current_is(kind)
}

/// `true` if the token `offset` positions ahead is `kind`.
pub(crate) fn at_offset(ctx: &ParseContext, offset: usize, kind: TokenKind) -> bool {
    ctx.peek(offset).kind == kind
}

/// Consumes and discards the current token if it matches `kind`, reporting
/// whether it did.
pub(crate) fn eat(ctx: &mut ParseContext, kind: TokenKind) -> bool {
    if ctx.current_is(kind) {
        ctx.advance();
        true
    } else {
        false
    }
}

/// Sentinel used by construct parsers that want to express "no node here"
/// without importing `NONE` directly at every call site.
pub(crate) const EMPTY: NodeId = NONE;
