//! Expressions.
//!
//! The arena's append-only, forward-parent design ("parent id < this id")
//! rules out the usual Pratt-parser trick of parsing a left operand,
//! discovering an operator afterward, and wrapping the already-allocated
//! operand in a new parent node — that would require the wrapper's id to
//! precede an id it was allocated after. `crate::parser` works around this
//! the same way it does for array types (`crate::parser::types`): a
//! read-only, depth-tracked scan decides *before* allocating anything
//! whether the upcoming expression contains a top-level operator at all, and
//! if so, which kind of node it resolves to.
//!
//! Operator-precedence shape (which operand binds to which operator first)
//! is explicitly out of scope here — that's a surface AST's job, built by a
//! downstream conversion pipeline. This module stores a compound expression
//! as one node per top-level operator *chain*, with operands and operator
//! tokens as direct children in source order; a parenthesized sub-expression
//! gets its own nested node the same way, recursively.

use crate::context::ParseContext;
use crate::error::ParseError;
use crate::parser::patterns::is_primitive_keyword;
use crate::parser::support::{at, eat, guarded, leaf, node};
use crate::parser::types::parse_type;
use crate::strategy::{LanguageLevel, Phase, StrategyRegistry};
use crate::token::TokenKind;
use crate::tree::{NodeId, NodeKind};

fn is_assignment_op(kind: TokenKind) -> bool {
    matches!(
        kind,
        TokenKind::Assign
            | TokenKind::PlusAssign
            | TokenKind::MinusAssign
            | TokenKind::MultAssign
            | TokenKind::DivAssign
            | TokenKind::ModAssign
            | TokenKind::AndAssign
            | TokenKind::OrAssign
            | TokenKind::XorAssign
            | TokenKind::LShiftAssign
            | TokenKind::RShiftAssign
            | TokenKind::URShiftAssign
    )
}

fn is_binary_op(kind: TokenKind) -> bool {
    matches!(
        kind,
        TokenKind::LogicalOr
            | TokenKind::LogicalAnd
            | TokenKind::BitOr
            | TokenKind::Caret
            | TokenKind::BitAnd
            | TokenKind::Eq
            | TokenKind::Ne
            | TokenKind::Lt
            | TokenKind::Gt
            | TokenKind::Le
            | TokenKind::Ge
            | TokenKind::LShift
            | TokenKind::RShift
            | TokenKind::URShift
            | TokenKind::Plus
            | TokenKind::Minus
            | TokenKind::Mult
            | TokenKind::Div
            | TokenKind::Mod
    )
}

fn is_top_level_operator(kind: TokenKind) -> bool {
    is_assignment_op(kind) || is_binary_op(kind) || kind == TokenKind::Question || kind == TokenKind::Instanceof
}

/// Read-only scan from the current position for the first operator sitting
/// at the same bracket/paren/brace nesting depth we started at. Returns
/// `None` if a statement/argument/chain terminator is reached first.
fn scan_first_top_level_operator(ctx: &ParseContext) -> Option<TokenKind> {
    let mut depth: i32 = 0;
    // A leading `new Type<Args>(...)` has its own generic-argument `<...>`
    // span, which this scan can't otherwise tell apart from a `<` comparison
    // operator sitting at the same nesting depth — skip straight past it so
    // `new ArrayList<String>()` isn't misread as a binary `<` expression.
    let mut i = if ctx.peek(0).kind == TokenKind::New {
        new_expression_span_len(ctx)
    } else {
        0
    };
    loop {
        let kind = ctx.peek(i).kind;
        match kind {
            TokenKind::LParen | TokenKind::LBracket | TokenKind::LBrace => depth += 1,
            TokenKind::RParen | TokenKind::RBracket | TokenKind::RBrace => {
                if depth == 0 {
                    return None;
                }
                depth -= 1;
            }
            TokenKind::Semicolon | TokenKind::Comma | TokenKind::Colon | TokenKind::Arrow
            | TokenKind::When | TokenKind::Eof
                if depth == 0 =>
            {
                return None;
            }
            _ if depth == 0 && is_top_level_operator(kind) => return Some(kind),
            _ => {}
        }
        i += 1;
        if i > 4096 {
            return None;
        }
    }
}

fn classify_operator(op: TokenKind) -> NodeKind {
    if is_assignment_op(op) {
        NodeKind::AssignmentExpression
    } else if op == TokenKind::Question {
        NodeKind::ConditionalExpression
    } else if op == TokenKind::Instanceof {
        NodeKind::InstanceofExpression
    } else {
        NodeKind::BinaryExpression
    }
}

pub(crate) fn parse_expression(ctx: &mut ParseContext) -> Result<NodeId, ParseError> {
    parse_expression_with_registry(ctx, None, LanguageLevel::default())
}

/// Entry point used by statement/declaration parsers that have a
/// `StrategyRegistry` handy and want `instanceof`/`switch`-case patterns to
/// go through version-gated dispatch rather than always falling back to a
/// plain type pattern.
pub(crate) fn parse_expression_with_registry(
    ctx: &mut ParseContext,
    registry: Option<&StrategyRegistry>,
    level: LanguageLevel,
) -> Result<NodeId, ParseError> {
    guarded(ctx, |ctx| {
        if lambda_ahead(ctx) {
            return parse_lambda(ctx, registry, level);
        }
        match scan_first_top_level_operator(ctx) {
            None => parse_unary(ctx, registry, level),
            Some(op) => {
                let kind = classify_operator(op);
                node(ctx, kind, |ctx| parse_operator_chain(ctx, registry, level))
            }
        }
    })
}

/// A conservative, assignment/lambda-free view used for annotation element
/// values and other conditional-expression-only positions — reuses the same
/// scan/classify machinery rather than validating which expression forms are
/// legal in which grammar position, which is left to a later stage.
pub(crate) fn parse_conditional(ctx: &mut ParseContext) -> Result<NodeId, ParseError> {
    parse_expression_with_registry(ctx, None, LanguageLevel::default())
}

fn parse_operator_chain(
    ctx: &mut ParseContext,
    registry: Option<&StrategyRegistry>,
    level: LanguageLevel,
) -> Result<(), ParseError> {
    parse_unary(ctx, registry, level)?;
    loop {
        let kind = ctx.current().kind;
        if kind == TokenKind::Instanceof {
            leaf(ctx, NodeKind::IdentifierNode)?;
            parse_pattern_or_type(ctx, registry, level)?;
        } else if kind == TokenKind::Question {
            leaf(ctx, NodeKind::IdentifierNode)?;
            parse_expression_with_registry(ctx, registry, level)?;
            ctx.expect(TokenKind::Colon)?;
            parse_expression_with_registry(ctx, registry, level)?;
        } else if is_assignment_op(kind) || is_binary_op(kind) {
            leaf(ctx, NodeKind::IdentifierNode)?;
            parse_unary(ctx, registry, level)?;
        } else {
            break;
        }
    }
    Ok(())
}

/// After `instanceof`, the right-hand side is either a bare type (legacy
/// form) or a pattern (Java 16+ type patterns, Java 21+ record patterns,
/// Java 23+ primitive patterns). Dispatch among them through the registry
/// when one is available; fall back to a bare type otherwise.
fn parse_pattern_or_type(
    ctx: &mut ParseContext,
    registry: Option<&StrategyRegistry>,
    level: LanguageLevel,
) -> Result<NodeId, ParseError> {
    if let Some(registry) = registry {
        if let Some(strategy) = registry.find_strategy(level, Phase::Expression, ctx) {
            ctx.metrics().record_strategy_dispatch();
            return strategy.parse_construct(ctx);
        }
    }
    if is_primitive_keyword(ctx.current().kind) {
        return crate::parser::patterns::parse_primitive_pattern(ctx);
    }
    // Bare type with no binding (`x instanceof String`) vs a type pattern
    // (`x instanceof String s`): look one token past the type for an
    // identifier to decide.
    let checkpoint = ctx.save_position();
    let ty = parse_type(ctx)?;
    if ctx.current().kind == TokenKind::Identifier {
        ctx.set_position(checkpoint);
        return crate::parser::patterns::parse_type_pattern(ctx);
    }
    Ok(ty)
}

/// `Identifier -> ...` or `(params) -> ...`.
fn lambda_ahead(ctx: &ParseContext) -> bool {
    if ctx.peek(0).kind == TokenKind::Identifier && ctx.peek(1).kind == TokenKind::Arrow {
        return true;
    }
    if ctx.peek(0).kind == TokenKind::LParen {
        if let Some(end) = matching_close(ctx, 0) {
            return ctx.peek(end + 1).kind == TokenKind::Arrow;
        }
    }
    false
}

/// Offset of the `)`/`]`/`}` matching the open bracket at `open_offset`, or
/// `None` if it's never closed before EOF.
fn matching_close(ctx: &ParseContext, open_offset: usize) -> Option<usize> {
    let mut depth = 0i32;
    let mut i = open_offset;
    loop {
        match ctx.peek(i).kind {
            TokenKind::LParen | TokenKind::LBracket | TokenKind::LBrace => depth += 1,
            TokenKind::RParen | TokenKind::RBracket | TokenKind::RBrace => {
                depth -= 1;
                if depth == 0 {
                    return Some(i);
                }
            }
            TokenKind::Eof => return None,
            _ => {}
        }
        i += 1;
    }
}

fn parse_lambda(
    ctx: &mut ParseContext,
    registry: Option<&StrategyRegistry>,
    level: LanguageLevel,
) -> Result<NodeId, ParseError> {
    node(ctx, NodeKind::LambdaExpression, |ctx| {
        if eat(ctx, TokenKind::LParen) {
            if !at(ctx, TokenKind::RParen) {
                loop {
                    leaf(ctx, NodeKind::IdentifierNode)?;
                    if !eat(ctx, TokenKind::Comma) {
                        break;
                    }
                }
            }
            ctx.expect(TokenKind::RParen)?;
        } else {
            leaf(ctx, NodeKind::IdentifierNode)?;
        }
        ctx.expect(TokenKind::Arrow)?;
        if at(ctx, TokenKind::LBrace) {
            crate::parser::statements::parse_block(ctx, registry, level)?;
        } else {
            parse_expression_with_registry(ctx, registry, level)?;
        }
        Ok(())
    })
}

fn is_unary_prefix(kind: TokenKind) -> bool {
    matches!(
        kind,
        TokenKind::Plus
            | TokenKind::Minus
            | TokenKind::Not
            | TokenKind::Tilde
            | TokenKind::Increment
            | TokenKind::Decrement
    )
}

fn parse_unary(
    ctx: &mut ParseContext,
    registry: Option<&StrategyRegistry>,
    level: LanguageLevel,
) -> Result<NodeId, ParseError> {
    if is_unary_prefix(ctx.current().kind) {
        return node(ctx, NodeKind::UnaryExpression, |ctx| {
            leaf(ctx, NodeKind::IdentifierNode)?;
            parse_unary(ctx, registry, level)?;
            Ok(())
        });
    }
    if at(ctx, TokenKind::LParen) && cast_ahead(ctx) {
        return node(ctx, NodeKind::CastExpression, |ctx| {
            ctx.expect(TokenKind::LParen)?;
            parse_type(ctx)?;
            ctx.expect(TokenKind::RParen)?;
            parse_unary(ctx, registry, level)?;
            Ok(())
        });
    }
    parse_postfix(ctx, registry, level)
}

/// `( Type )` immediately followed by a token that can only start a new
/// unary expression — never a binary operator continuing the parenthesized
/// value — disambiguates a cast from a parenthesized expression. This is a
/// deliberate simplification of javac's full cast-vs-paren grammar;
/// documented in `DESIGN.md`.
fn cast_ahead(ctx: &ParseContext) -> bool {
    let Some(close) = matching_close(ctx, 0) else {
        return false;
    };
    let inside_starts_type = matches!(
        ctx.peek(1).kind,
        TokenKind::Identifier
            | TokenKind::Boolean
            | TokenKind::Byte
            | TokenKind::Short
            | TokenKind::Int
            | TokenKind::Long
            | TokenKind::Char
            | TokenKind::Float
            | TokenKind::Double
    );
    if !inside_starts_type {
        return false;
    }
    matches!(
        ctx.peek(close + 1).kind,
        TokenKind::Identifier
            | TokenKind::This
            | TokenKind::Super
            | TokenKind::New
            | TokenKind::Not
            | TokenKind::Tilde
            | TokenKind::LParen
            | TokenKind::IntegerLiteral
            | TokenKind::LongLiteral
            | TokenKind::FloatLiteral
            | TokenKind::DoubleLiteral
            | TokenKind::CharLiteral
            | TokenKind::StringLiteral
            | TokenKind::TextBlockLiteral
            | TokenKind::BooleanLiteral
            | TokenKind::NullLiteral
    )
}

/// Like the binary-operator chain, a postfix chain (`a.b().c[0]++`) can't be
/// built by parsing the primary first and wrapping it afterward — the
/// wrapper would need a smaller id than the primary it wraps. So: scan past
/// the primary (without allocating) to see whether any postfix operator
/// follows at all; if so, open one node up front (kind taken from the first
/// operator) and parse the primary as its first child, then flatten the
/// rest of the chain as further children, the same simplification the
/// binary chain uses for precedence shape.
fn parse_postfix(
    ctx: &mut ParseContext,
    registry: Option<&StrategyRegistry>,
    level: LanguageLevel,
) -> Result<NodeId, ParseError> {
    let primary_len = primary_span_len(ctx);
    match first_postfix_operator(ctx, primary_len) {
        None => parse_primary(ctx, registry, level),
        Some(kind) => node(ctx, classify_postfix(kind), |ctx| {
            parse_primary(ctx, registry, level)?;
            parse_postfix_chain(ctx, registry, level)
        }),
    }
}

fn is_postfix_operator(kind: TokenKind) -> bool {
    matches!(
        kind,
        TokenKind::Dot
            | TokenKind::DoubleColon
            | TokenKind::LBracket
            | TokenKind::LParen
            | TokenKind::Increment
            | TokenKind::Decrement
    )
}

fn classify_postfix(kind: TokenKind) -> NodeKind {
    match kind {
        TokenKind::Dot => NodeKind::FieldAccess,
        TokenKind::DoubleColon => NodeKind::MethodReference,
        TokenKind::LBracket => NodeKind::ArrayAccess,
        TokenKind::LParen => NodeKind::MethodInvocation,
        _ => NodeKind::UnaryExpression,
    }
}

fn first_postfix_operator(ctx: &ParseContext, primary_len: usize) -> Option<TokenKind> {
    let kind = ctx.peek(primary_len).kind;
    is_postfix_operator(kind).then_some(kind)
}

fn parse_postfix_chain(
    ctx: &mut ParseContext,
    registry: Option<&StrategyRegistry>,
    level: LanguageLevel,
) -> Result<(), ParseError> {
    loop {
        match ctx.current().kind {
            TokenKind::Dot => {
                ctx.expect(TokenKind::Dot)?;
                leaf(ctx, NodeKind::IdentifierNode)?;
            }
            TokenKind::DoubleColon => {
                ctx.expect(TokenKind::DoubleColon)?;
                if at(ctx, TokenKind::New) {
                    ctx.expect(TokenKind::New)?;
                } else {
                    leaf(ctx, NodeKind::IdentifierNode)?;
                }
            }
            TokenKind::LBracket => {
                ctx.expect(TokenKind::LBracket)?;
                parse_expression_with_registry(ctx, registry, level)?;
                ctx.expect(TokenKind::RBracket)?;
            }
            TokenKind::LParen => {
                parse_argument_list(ctx, registry, level)?;
            }
            TokenKind::Increment | TokenKind::Decrement => {
                leaf(ctx, NodeKind::IdentifierNode)?;
            }
            _ => break,
        }
    }
    Ok(())
}

/// Length, in tokens, of the primary expression sitting at the cursor —
/// computed read-only so `parse_postfix` can peek just past it.
fn primary_span_len(ctx: &ParseContext) -> usize {
    match ctx.peek(0).kind {
        TokenKind::LParen => matching_close(ctx, 0).map_or(1, |c| c + 1),
        TokenKind::New => new_expression_span_len(ctx),
        TokenKind::Switch => switch_expression_span_len(ctx),
        _ => 1,
    }
}

fn new_expression_span_len(ctx: &ParseContext) -> usize {
    let mut i = 1;
    while matches!(ctx.peek(i).kind, TokenKind::Identifier | TokenKind::Dot) {
        i += 1;
    }
    if ctx.peek(i).kind == TokenKind::Lt {
        i = skip_generic_span(ctx, i);
    }
    if ctx.peek(i).kind == TokenKind::LBracket {
        while ctx.peek(i).kind == TokenKind::LBracket {
            i = matching_close(ctx, i).map_or(i, |c| c + 1);
        }
        if ctx.peek(i).kind == TokenKind::LBrace {
            i = matching_close(ctx, i).map_or(i, |c| c + 1);
        }
        return i;
    }
    if ctx.peek(i).kind == TokenKind::LParen {
        i = matching_close(ctx, i).map_or(i, |c| c + 1);
        if ctx.peek(i).kind == TokenKind::LBrace {
            i = matching_close(ctx, i).map_or(i, |c| c + 1);
        }
    }
    i
}

fn switch_expression_span_len(ctx: &ParseContext) -> usize {
    let mut i = 1;
    if ctx.peek(i).kind == TokenKind::LParen {
        i = matching_close(ctx, i).map_or(i, |c| c + 1);
    }
    if ctx.peek(i).kind == TokenKind::LBrace {
        i = matching_close(ctx, i).map_or(i, |c| c + 1);
    }
    i
}

/// Like `skip_type_argument_span` in `crate::parser::types`, but operating
/// on raw offsets with no `ParseContext` mutation — used here purely to
/// measure a span, never to parse one.
fn skip_generic_span(ctx: &ParseContext, open: usize) -> usize {
    let mut depth: i32 = 1;
    let mut i = open + 1;
    loop {
        match ctx.peek(i).kind {
            TokenKind::Lt => depth += 1,
            TokenKind::Gt => depth -= 1,
            TokenKind::RShift => depth -= 2,
            TokenKind::URShift => depth -= 3,
            TokenKind::Eof => return i,
            _ => {}
        }
        i += 1;
        if depth <= 0 {
            return i;
        }
    }
}

fn parse_primary(
    ctx: &mut ParseContext,
    registry: Option<&StrategyRegistry>,
    level: LanguageLevel,
) -> Result<NodeId, ParseError> {
    match ctx.current().kind {
        TokenKind::IntegerLiteral
        | TokenKind::LongLiteral
        | TokenKind::FloatLiteral
        | TokenKind::DoubleLiteral
        | TokenKind::CharLiteral
        | TokenKind::StringLiteral
        | TokenKind::TextBlockLiteral
        | TokenKind::BooleanLiteral
        | TokenKind::NullLiteral => leaf(ctx, NodeKind::LiteralExpression),
        TokenKind::This => leaf(ctx, NodeKind::ThisExpression),
        TokenKind::Super => leaf(ctx, NodeKind::SuperExpression),
        TokenKind::New => parse_instance_creation(ctx, registry, level),
        TokenKind::Switch => crate::parser::statements::parse_switch(ctx, registry, level, true),
        TokenKind::LParen => node(ctx, NodeKind::ParenthesizedExpression, |ctx| {
            ctx.expect(TokenKind::LParen)?;
            parse_expression_with_registry(ctx, registry, level)?;
            ctx.expect(TokenKind::RParen)?;
            Ok(())
        }),
        TokenKind::Identifier => leaf(ctx, NodeKind::NameExpression),
        _ => crate::parser::support::error_node(ctx),
    }
}

fn parse_instance_creation(
    ctx: &mut ParseContext,
    registry: Option<&StrategyRegistry>,
    level: LanguageLevel,
) -> Result<NodeId, ParseError> {
    // `new Type(args)` vs `new Type[dim]...` vs `new Type[] { init }`.
    let is_array = {
        let mut i = 1;
        while matches!(ctx.peek(i).kind, TokenKind::Identifier | TokenKind::Dot) {
            i += 1;
        }
        ctx.peek(i).kind == TokenKind::LBracket
    };
    if is_array {
        node(ctx, NodeKind::ArrayCreation, |ctx| {
            ctx.expect(TokenKind::New)?;
            parse_type(ctx)?;
            while eat(ctx, TokenKind::LBracket) {
                if !at(ctx, TokenKind::RBracket) {
                    parse_expression_with_registry(ctx, registry, level)?;
                }
                ctx.expect(TokenKind::RBracket)?;
            }
            if at(ctx, TokenKind::LBrace) {
                parse_array_initializer(ctx, registry, level)?;
            }
            Ok(())
        })
    } else {
        node(ctx, NodeKind::ClassInstanceCreation, |ctx| {
            ctx.expect(TokenKind::New)?;
            parse_type(ctx)?;
            parse_argument_list(ctx, registry, level)?;
            if at(ctx, TokenKind::LBrace) {
                // anonymous class body; class-body member parsing lives in
                // `declarations`, reused here for the anonymous subclass.
                crate::parser::declarations::parse_class_body(ctx, registry, level)?;
            }
            Ok(())
        })
    }
}

fn parse_array_initializer(
    ctx: &mut ParseContext,
    registry: Option<&StrategyRegistry>,
    level: LanguageLevel,
) -> Result<NodeId, ParseError> {
    node(ctx, NodeKind::ArgumentList, |ctx| {
        ctx.expect(TokenKind::LBrace)?;
        while !at(ctx, TokenKind::RBrace) && !at(ctx, TokenKind::Eof) {
            if at(ctx, TokenKind::LBrace) {
                parse_array_initializer(ctx, registry, level)?;
            } else {
                parse_expression_with_registry(ctx, registry, level)?;
            }
            if !eat(ctx, TokenKind::Comma) {
                break;
            }
        }
        ctx.expect(TokenKind::RBrace)?;
        Ok(())
    })
}

pub(crate) fn parse_argument_list(
    ctx: &mut ParseContext,
    registry: Option<&StrategyRegistry>,
    level: LanguageLevel,
) -> Result<NodeId, ParseError> {
    node(ctx, NodeKind::ArgumentList, |ctx| {
        ctx.expect(TokenKind::LParen)?;
        if !at(ctx, TokenKind::RParen) {
            loop {
                parse_expression_with_registry(ctx, registry, level)?;
                if !eat(ctx, TokenKind::Comma) {
                    break;
                }
            }
        }
        ctx.expect(TokenKind::RParen)?;
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
    fn bare_literal_parses_as_leaf() {
        let mut ctx = ctx_for("42");
        let id = parse_expression(&mut ctx).unwrap();
        assert_eq!(ctx.storage().get_node(id).unwrap().kind, NodeKind::LiteralExpression);
    }

    #[test]
    fn binary_expression_is_one_flattened_node() {
        let mut ctx = ctx_for("a + b * c");
        let id = parse_expression(&mut ctx).unwrap();
        let rec = ctx.storage().get_node(id).unwrap();
        assert_eq!(rec.kind, NodeKind::BinaryExpression);
        assert_eq!(rec.children.len(), 5); // a, +, b, *, c
    }

    #[test]
    fn assignment_binds_looser_than_conditional() {
        let mut ctx = ctx_for("x = y ? 1 : 2");
        let id = parse_expression(&mut ctx).unwrap();
        assert_eq!(ctx.storage().get_node(id).unwrap().kind, NodeKind::AssignmentExpression);
    }

    #[test]
    fn method_invocation_chain_flattens_postfix() {
        let mut ctx = ctx_for("a.b().c[0]");
        let id = parse_expression(&mut ctx).unwrap();
        assert_eq!(ctx.storage().get_node(id).unwrap().kind, NodeKind::FieldAccess);
    }

    #[test]
    fn lambda_with_parenthesized_params() {
        let mut ctx = ctx_for("(x, y) -> x + y");
        let id = parse_expression(&mut ctx).unwrap();
        assert_eq!(ctx.storage().get_node(id).unwrap().kind, NodeKind::LambdaExpression);
    }

    #[test]
    fn no_arg_lambda() {
        let mut ctx = ctx_for("() -> 1");
        let id = parse_expression(&mut ctx).unwrap();
        assert_eq!(ctx.storage().get_node(id).unwrap().kind, NodeKind::LambdaExpression);
    }

    #[test]
    fn cast_ahead_distinguishes_cast_from_parenthesized_expression() {
        let mut ctx = ctx_for("(String) x");
        let id = parse_expression(&mut ctx).unwrap();
        assert_eq!(ctx.storage().get_node(id).unwrap().kind, NodeKind::CastExpression);

        let mut ctx = ctx_for("(x)");
        let id = parse_expression(&mut ctx).unwrap();
        assert_eq!(ctx.storage().get_node(id).unwrap().kind, NodeKind::ParenthesizedExpression);
    }

    #[test]
    fn instanceof_with_type_pattern_binding() {
        let mut ctx = ctx_for("x instanceof String s");
        let id = parse_expression(&mut ctx).unwrap();
        assert_eq!(ctx.storage().get_node(id).unwrap().kind, NodeKind::InstanceofExpression);
    }

    #[test]
    fn array_creation_with_initializer() {
        let mut ctx = ctx_for("new int[]{1, 2, 3}");
        let id = parse_expression(&mut ctx).unwrap();
        assert_eq!(ctx.storage().get_node(id).unwrap().kind, NodeKind::ArrayCreation);
    }

    #[test]
    fn generic_class_instance_creation_is_not_misread_as_a_comparison() {
        let mut ctx = ctx_for("new ArrayList<String>()");
        let id = parse_expression(&mut ctx).unwrap();
        assert_eq!(ctx.storage().get_node(id).unwrap().kind, NodeKind::ClassInstanceCreation);
        assert_eq!(ctx.current().kind, TokenKind::Eof);
    }

    #[test]
    fn class_instance_creation_with_anonymous_body() {
        let mut ctx = ctx_for("new Runnable() { public void run() {} }");
        let id = parse_expression(&mut ctx).unwrap();
        assert_eq!(ctx.storage().get_node(id).unwrap().kind, NodeKind::ClassInstanceCreation);
    }

    #[test]
    fn argument_list_with_multiple_expressions() {
        let mut ctx = ctx_for("(1, 2, 3)");
        let id = parse_argument_list(&mut ctx, None, LanguageLevel::default()).unwrap();
        assert_eq!(ctx.storage().get_node(id).unwrap().children.len(), 3);
    }
}
