//! Statements: blocks and every statement form a method/constructor/static
//! initializer body can contain.

use crate::context::ParseContext;
use crate::error::ParseError;
use crate::parser::expressions::parse_expression_with_registry;
use crate::parser::modifiers::{at_modifier, parse_modifiers};
use crate::parser::patterns::parse_guard;
use crate::parser::support::{at, eat, guarded, leaf, node, resync_to};
use crate::parser::types::parse_type;
use crate::strategy::{LanguageLevel, Phase, StrategyRegistry};
use crate::token::TokenKind;
use crate::tree::{NodeId, NodeKind};

/// `{ BlockStatement* }`.
pub(crate) fn parse_block(
    ctx: &mut ParseContext,
    registry: Option<&StrategyRegistry>,
    level: LanguageLevel,
) -> Result<NodeId, ParseError> {
    guarded(ctx, |ctx| {
        node(ctx, NodeKind::Block, |ctx| {
            ctx.expect(TokenKind::LBrace)?;
            while !at(ctx, TokenKind::RBrace) && !at(ctx, TokenKind::Eof) {
                if let Err(e) = parse_statement(ctx, registry, level) {
                    match e {
                        ParseError::RecursionLimit { .. } | ParseError::Storage(_) => return Err(e),
                        _ => {
                            ctx.metrics().record_recovered_error();
                            crate::parser::support::error_node(ctx)?;
                            resync_to(
                                ctx,
                                &[TokenKind::Semicolon, TokenKind::RBrace, TokenKind::Eof],
                            );
                            eat(ctx, TokenKind::Semicolon);
                        }
                    }
                }
            }
            ctx.expect(TokenKind::RBrace)?;
            Ok(())
        })
    })
}

/// Entry point registered with the `ParseContext` as the statement delegate
/// so nested constructs (lambda bodies, loop bodies) can recurse back in
/// without depending on `crate::parser` directly.
pub(crate) fn parse_statement(
    ctx: &mut ParseContext,
    registry: Option<&StrategyRegistry>,
    level: LanguageLevel,
) -> Result<NodeId, ParseError> {
    guarded(ctx, |ctx| match ctx.current().kind {
        TokenKind::LBrace => parse_block(ctx, registry, level),
        TokenKind::If => parse_if(ctx, registry, level),
        TokenKind::While => parse_while(ctx, registry, level),
        TokenKind::Do => parse_do_while(ctx, registry, level),
        TokenKind::For => parse_for(ctx, registry, level),
        TokenKind::Switch => parse_switch(ctx, registry, level, false),
        TokenKind::Return => parse_return(ctx, registry, level),
        TokenKind::Throw => parse_throw(ctx, registry, level),
        TokenKind::Break => parse_break(ctx),
        TokenKind::Continue => parse_continue(ctx),
        TokenKind::Yield => parse_yield(ctx, registry, level),
        TokenKind::Try => parse_try(ctx, registry, level),
        TokenKind::Synchronized => parse_synchronized(ctx, registry, level),
        TokenKind::Assert => parse_assert(ctx, registry, level),
        TokenKind::Semicolon => leaf(ctx, NodeKind::EmptyStatement),
        TokenKind::Identifier if ctx.peek(1).kind == TokenKind::Colon => parse_labeled(ctx, registry, level),
        _ if at_local_class(ctx) => parse_local_class(ctx, registry, level),
        _ if at_local_variable(ctx) => parse_local_variable(ctx, registry, level),
        _ => parse_expression_statement(ctx, registry, level),
    })
}

fn at_local_class(ctx: &ParseContext) -> bool {
    matches!(
        ctx.current().kind,
        TokenKind::Class | TokenKind::Interface | TokenKind::Enum | TokenKind::Record
    ) || (at_modifier(ctx) && at_local_class_after_modifiers(ctx))
}

fn at_local_class_after_modifiers(ctx: &ParseContext) -> bool {
    let i = crate::parser::modifiers::skip_modifiers(ctx, 0);
    matches!(
        ctx.peek(i).kind,
        TokenKind::Class | TokenKind::Interface | TokenKind::Enum | TokenKind::Record
    )
}

fn parse_local_class(
    ctx: &mut ParseContext,
    registry: Option<&StrategyRegistry>,
    level: LanguageLevel,
) -> Result<NodeId, ParseError> {
    node(ctx, NodeKind::LocalClassDeclaration, |ctx| {
        crate::parser::declarations::parse_type_declaration(ctx, registry, level)?;
        Ok(())
    })
}

/// A local variable declaration is distinguished from an expression
/// statement by scanning for `Modifiers* Type Identifier` followed by `=`,
/// `;`, `,`, or `:` (enhanced-for header) — a plain method call or
/// assignment never has a bare type name followed directly by another
/// identifier.
fn at_local_variable(ctx: &ParseContext) -> bool {
    let i = crate::parser::modifiers::skip_modifiers(ctx, 0);
    if ctx.peek(i).kind == TokenKind::Var {
        return ctx.peek(i + 1).kind == TokenKind::Identifier;
    }
    if !crate::parser::types::peek_starts_type(ctx, i) {
        return false;
    }
    let after_type = crate::parser::types::peek_type_span_len(ctx, i);
    ctx.peek(after_type).kind == TokenKind::Identifier
}

fn parse_local_variable(
    ctx: &mut ParseContext,
    registry: Option<&StrategyRegistry>,
    level: LanguageLevel,
) -> Result<NodeId, ParseError> {
    node(ctx, NodeKind::LocalVariableDeclaration, |ctx| {
        parse_modifiers(ctx)?;
        parse_type(ctx)?;
        loop {
            leaf(ctx, NodeKind::IdentifierNode)?;
            while eat(ctx, TokenKind::LBracket) {
                ctx.expect(TokenKind::RBracket)?;
            }
            if eat(ctx, TokenKind::Assign) {
                if at(ctx, TokenKind::LBrace) {
                    parse_array_initializer_statement(ctx, registry, level)?;
                } else {
                    parse_expression_with_registry(ctx, registry, level)?;
                }
            }
            if !eat(ctx, TokenKind::Comma) {
                break;
            }
        }
        ctx.expect(TokenKind::Semicolon)?;
        Ok(())
    })
}

fn parse_array_initializer_statement(
    ctx: &mut ParseContext,
    registry: Option<&StrategyRegistry>,
    level: LanguageLevel,
) -> Result<NodeId, ParseError> {
    node(ctx, NodeKind::ArgumentList, |ctx| {
        ctx.expect(TokenKind::LBrace)?;
        while !at(ctx, TokenKind::RBrace) && !at(ctx, TokenKind::Eof) {
            if at(ctx, TokenKind::LBrace) {
                parse_array_initializer_statement(ctx, registry, level)?;
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

fn parse_expression_statement(
    ctx: &mut ParseContext,
    registry: Option<&StrategyRegistry>,
    level: LanguageLevel,
) -> Result<NodeId, ParseError> {
    node(ctx, NodeKind::ExpressionStatement, |ctx| {
        parse_expression_with_registry(ctx, registry, level)?;
        ctx.expect(TokenKind::Semicolon)?;
        Ok(())
    })
}

fn parse_if(
    ctx: &mut ParseContext,
    registry: Option<&StrategyRegistry>,
    level: LanguageLevel,
) -> Result<NodeId, ParseError> {
    node(ctx, NodeKind::IfStatement, |ctx| {
        ctx.expect(TokenKind::If)?;
        ctx.expect(TokenKind::LParen)?;
        parse_expression_with_registry(ctx, registry, level)?;
        ctx.expect(TokenKind::RParen)?;
        parse_statement(ctx, registry, level)?;
        if eat(ctx, TokenKind::Else) {
            parse_statement(ctx, registry, level)?;
        }
        Ok(())
    })
}

fn parse_while(
    ctx: &mut ParseContext,
    registry: Option<&StrategyRegistry>,
    level: LanguageLevel,
) -> Result<NodeId, ParseError> {
    node(ctx, NodeKind::WhileStatement, |ctx| {
        ctx.expect(TokenKind::While)?;
        ctx.expect(TokenKind::LParen)?;
        parse_expression_with_registry(ctx, registry, level)?;
        ctx.expect(TokenKind::RParen)?;
        parse_statement(ctx, registry, level)?;
        Ok(())
    })
}

fn parse_do_while(
    ctx: &mut ParseContext,
    registry: Option<&StrategyRegistry>,
    level: LanguageLevel,
) -> Result<NodeId, ParseError> {
    node(ctx, NodeKind::DoWhileStatement, |ctx| {
        ctx.expect(TokenKind::Do)?;
        parse_statement(ctx, registry, level)?;
        ctx.expect(TokenKind::While)?;
        ctx.expect(TokenKind::LParen)?;
        parse_expression_with_registry(ctx, registry, level)?;
        ctx.expect(TokenKind::RParen)?;
        ctx.expect(TokenKind::Semicolon)?;
        Ok(())
    })
}

/// `for (init; cond; update) body` vs `for (Type id : expr) body` — the
/// enhanced form is detected by scanning past a local-variable-shaped header
/// for a `:` before the first `;`.
fn parse_for(
    ctx: &mut ParseContext,
    registry: Option<&StrategyRegistry>,
    level: LanguageLevel,
) -> Result<NodeId, ParseError> {
    if is_enhanced_for(ctx) {
        return node(ctx, NodeKind::EnhancedForStatement, |ctx| {
            ctx.expect(TokenKind::For)?;
            ctx.expect(TokenKind::LParen)?;
            parse_modifiers(ctx)?;
            parse_type(ctx)?;
            leaf(ctx, NodeKind::IdentifierNode)?;
            ctx.expect(TokenKind::Colon)?;
            parse_expression_with_registry(ctx, registry, level)?;
            ctx.expect(TokenKind::RParen)?;
            parse_statement(ctx, registry, level)?;
            Ok(())
        });
    }
    node(ctx, NodeKind::ForStatement, |ctx| {
        ctx.expect(TokenKind::For)?;
        ctx.expect(TokenKind::LParen)?;
        if !at(ctx, TokenKind::Semicolon) {
            if at_local_variable(ctx) {
                parse_for_init_declaration(ctx, registry, level)?;
            } else {
                loop {
                    parse_expression_with_registry(ctx, registry, level)?;
                    if !eat(ctx, TokenKind::Comma) {
                        break;
                    }
                }
                ctx.expect(TokenKind::Semicolon)?;
            }
        } else {
            ctx.expect(TokenKind::Semicolon)?;
        }
        if !at(ctx, TokenKind::Semicolon) {
            parse_expression_with_registry(ctx, registry, level)?;
        }
        ctx.expect(TokenKind::Semicolon)?;
        if !at(ctx, TokenKind::RParen) {
            loop {
                parse_expression_with_registry(ctx, registry, level)?;
                if !eat(ctx, TokenKind::Comma) {
                    break;
                }
            }
        }
        ctx.expect(TokenKind::RParen)?;
        parse_statement(ctx, registry, level)?;
        Ok(())
    })
}

/// The `for (...)` init clause's local-declaration form, inlined (rather
/// than reusing `parse_local_variable`) because it's terminated by the
/// loop's own `;` handling, not a standalone statement.
fn parse_for_init_declaration(
    ctx: &mut ParseContext,
    registry: Option<&StrategyRegistry>,
    level: LanguageLevel,
) -> Result<NodeId, ParseError> {
    node(ctx, NodeKind::LocalVariableDeclaration, |ctx| {
        parse_modifiers(ctx)?;
        parse_type(ctx)?;
        loop {
            leaf(ctx, NodeKind::IdentifierNode)?;
            if eat(ctx, TokenKind::Assign) {
                parse_expression_with_registry(ctx, registry, level)?;
            }
            if !eat(ctx, TokenKind::Comma) {
                break;
            }
        }
        ctx.expect(TokenKind::Semicolon)?;
        Ok(())
    })
}

fn is_enhanced_for(ctx: &ParseContext) -> bool {
    // offset 0 is `for`, offset 1 is `(`.
    let i = crate::parser::modifiers::skip_modifiers(ctx, 2);
    if ctx.peek(i).kind == TokenKind::Var {
        return ctx.peek(i + 1).kind == TokenKind::Identifier && ctx.peek(i + 2).kind == TokenKind::Colon;
    }
    if !crate::parser::types::peek_starts_type(ctx, i) {
        return false;
    }
    let after_type = crate::parser::types::peek_type_span_len(ctx, i);
    ctx.peek(after_type).kind == TokenKind::Identifier && ctx.peek(after_type + 1).kind == TokenKind::Colon
}

/// Shared by both the `switch` statement and `switch` expression forms — the
/// only difference is the wrapper node kind and whether `yield`/falling off
/// the end is meaningful, which the CORE doesn't validate either way.
pub(crate) fn parse_switch(
    ctx: &mut ParseContext,
    registry: Option<&StrategyRegistry>,
    level: LanguageLevel,
    as_expression: bool,
) -> Result<NodeId, ParseError> {
    let kind = if as_expression {
        NodeKind::SwitchExpression
    } else {
        NodeKind::SwitchStatement
    };
    node(ctx, kind, |ctx| {
        ctx.expect(TokenKind::Switch)?;
        ctx.expect(TokenKind::LParen)?;
        parse_expression_with_registry(ctx, registry, level)?;
        ctx.expect(TokenKind::RParen)?;
        ctx.expect(TokenKind::LBrace)?;
        while !at(ctx, TokenKind::RBrace) && !at(ctx, TokenKind::Eof) {
            parse_switch_case(ctx, registry, level)?;
        }
        ctx.expect(TokenKind::RBrace)?;
        Ok(())
    })
}

fn parse_switch_case(
    ctx: &mut ParseContext,
    registry: Option<&StrategyRegistry>,
    level: LanguageLevel,
) -> Result<NodeId, ParseError> {
    node(ctx, NodeKind::SwitchRule, |ctx| {
        parse_switch_label(ctx, registry, level)?;
        if eat(ctx, TokenKind::Arrow) {
            if at(ctx, TokenKind::LBrace) {
                parse_block(ctx, registry, level)?;
            } else if at(ctx, TokenKind::Throw) {
                parse_throw(ctx, registry, level)?;
            } else {
                node(ctx, NodeKind::ExpressionStatement, |ctx| {
                    parse_expression_with_registry(ctx, registry, level)?;
                    ctx.expect(TokenKind::Semicolon)?;
                    Ok(())
                })?;
            }
            return Ok(());
        }
        ctx.expect(TokenKind::Colon)?;
        while !at(ctx, TokenKind::Case)
            && !at(ctx, TokenKind::Default)
            && !at(ctx, TokenKind::RBrace)
            && !at(ctx, TokenKind::Eof)
        {
            parse_statement(ctx, registry, level)?;
        }
        Ok(())
    })
}

/// `case Pattern (when Expr)? :` or `default :`. Parsed directly under the
/// enclosing `SwitchRule` node (opened by the caller) so the label's node id
/// never needs to be re-parented.
fn parse_switch_label(
    ctx: &mut ParseContext,
    registry: Option<&StrategyRegistry>,
    level: LanguageLevel,
) -> Result<NodeId, ParseError> {
    node(ctx, NodeKind::SwitchLabel, |ctx| {
        if eat(ctx, TokenKind::Default) {
            return Ok(());
        }
        ctx.expect(TokenKind::Case)?;
        loop {
            parse_case_pattern(ctx, registry, level)?;
            if !eat(ctx, TokenKind::Comma) {
                break;
            }
        }
        if at(ctx, TokenKind::When) {
            parse_guard(ctx)?;
        }
        Ok(())
    })
}

fn parse_case_pattern(
    ctx: &mut ParseContext,
    registry: Option<&StrategyRegistry>,
    level: LanguageLevel,
) -> Result<NodeId, ParseError> {
    if at(ctx, TokenKind::NullLiteral) {
        return leaf(ctx, NodeKind::LiteralExpression);
    }
    if let Some(registry) = registry {
        if let Some(strategy) = registry.find_strategy(level, Phase::Expression, ctx) {
            ctx.metrics().record_strategy_dispatch();
            return strategy.parse_construct(ctx);
        }
    }
    if crate::parser::patterns::is_primitive_keyword(ctx.current().kind) {
        return crate::parser::patterns::parse_primitive_pattern(ctx);
    }
    let checkpoint = ctx.save_position();
    if crate::parser::types::peek_starts_type(ctx, 0) {
        let after = crate::parser::types::peek_type_span_len(ctx, 0);
        if ctx.peek(after).kind == TokenKind::LParen {
            return crate::parser::patterns::parse_record_pattern(ctx);
        }
        if ctx.peek(after).kind == TokenKind::Identifier {
            return crate::parser::patterns::parse_type_pattern(ctx);
        }
    }
    ctx.set_position(checkpoint);
    parse_expression_with_registry(ctx, registry, level)
}

fn parse_return(
    ctx: &mut ParseContext,
    registry: Option<&StrategyRegistry>,
    level: LanguageLevel,
) -> Result<NodeId, ParseError> {
    node(ctx, NodeKind::ReturnStatement, |ctx| {
        ctx.expect(TokenKind::Return)?;
        if !at(ctx, TokenKind::Semicolon) {
            parse_expression_with_registry(ctx, registry, level)?;
        }
        ctx.expect(TokenKind::Semicolon)?;
        Ok(())
    })
}

fn parse_throw(
    ctx: &mut ParseContext,
    registry: Option<&StrategyRegistry>,
    level: LanguageLevel,
) -> Result<NodeId, ParseError> {
    node(ctx, NodeKind::ThrowStatement, |ctx| {
        ctx.expect(TokenKind::Throw)?;
        parse_expression_with_registry(ctx, registry, level)?;
        ctx.expect(TokenKind::Semicolon)?;
        Ok(())
    })
}

fn parse_break(ctx: &mut ParseContext) -> Result<NodeId, ParseError> {
    node(ctx, NodeKind::BreakStatement, |ctx| {
        ctx.expect(TokenKind::Break)?;
        if at(ctx, TokenKind::Identifier) {
            leaf(ctx, NodeKind::IdentifierNode)?;
        }
        ctx.expect(TokenKind::Semicolon)?;
        Ok(())
    })
}

fn parse_continue(ctx: &mut ParseContext) -> Result<NodeId, ParseError> {
    node(ctx, NodeKind::ContinueStatement, |ctx| {
        ctx.expect(TokenKind::Continue)?;
        if at(ctx, TokenKind::Identifier) {
            leaf(ctx, NodeKind::IdentifierNode)?;
        }
        ctx.expect(TokenKind::Semicolon)?;
        Ok(())
    })
}

fn parse_yield(
    ctx: &mut ParseContext,
    registry: Option<&StrategyRegistry>,
    level: LanguageLevel,
) -> Result<NodeId, ParseError> {
    node(ctx, NodeKind::YieldStatement, |ctx| {
        ctx.expect(TokenKind::Yield)?;
        parse_expression_with_registry(ctx, registry, level)?;
        ctx.expect(TokenKind::Semicolon)?;
        Ok(())
    })
}

fn parse_try(
    ctx: &mut ParseContext,
    registry: Option<&StrategyRegistry>,
    level: LanguageLevel,
) -> Result<NodeId, ParseError> {
    let has_resources = ctx.peek(1).kind == TokenKind::LParen;
    let kind = if has_resources {
        NodeKind::TryWithResources
    } else {
        NodeKind::TryStatement
    };
    node(ctx, kind, |ctx| {
        ctx.expect(TokenKind::Try)?;
        if has_resources {
            parse_resource_specification(ctx, registry, level)?;
        }
        parse_block(ctx, registry, level)?;
        while at(ctx, TokenKind::Catch) {
            parse_catch(ctx, registry, level)?;
        }
        if eat(ctx, TokenKind::Finally) {
            node(ctx, NodeKind::FinallyClause, |ctx| {
                parse_block(ctx, registry, level)?;
                Ok(())
            })?;
        }
        Ok(())
    })
}

fn parse_resource_specification(
    ctx: &mut ParseContext,
    registry: Option<&StrategyRegistry>,
    level: LanguageLevel,
) -> Result<NodeId, ParseError> {
    node(ctx, NodeKind::ResourceSpecification, |ctx| {
        ctx.expect(TokenKind::LParen)?;
        loop {
            if at_local_variable(ctx) {
                node(ctx, NodeKind::LocalVariableDeclaration, |ctx| {
                    parse_modifiers(ctx)?;
                    parse_type(ctx)?;
                    leaf(ctx, NodeKind::IdentifierNode)?;
                    ctx.expect(TokenKind::Assign)?;
                    parse_expression_with_registry(ctx, registry, level)?;
                    Ok(())
                })?;
            } else {
                parse_expression_with_registry(ctx, registry, level)?;
            }
            if !eat(ctx, TokenKind::Semicolon) {
                break;
            }
            if at(ctx, TokenKind::RParen) {
                break;
            }
        }
        ctx.expect(TokenKind::RParen)?;
        Ok(())
    })
}

fn parse_catch(
    ctx: &mut ParseContext,
    registry: Option<&StrategyRegistry>,
    level: LanguageLevel,
) -> Result<NodeId, ParseError> {
    node(ctx, NodeKind::CatchClause, |ctx| {
        ctx.expect(TokenKind::Catch)?;
        ctx.expect(TokenKind::LParen)?;
        parse_modifiers(ctx)?;
        parse_type(ctx)?;
        while eat(ctx, TokenKind::BitOr) {
            parse_type(ctx)?;
        }
        leaf(ctx, NodeKind::IdentifierNode)?;
        ctx.expect(TokenKind::RParen)?;
        parse_block(ctx, registry, level)?;
        Ok(())
    })
}

fn parse_synchronized(
    ctx: &mut ParseContext,
    registry: Option<&StrategyRegistry>,
    level: LanguageLevel,
) -> Result<NodeId, ParseError> {
    node(ctx, NodeKind::SynchronizedStatement, |ctx| {
        ctx.expect(TokenKind::Synchronized)?;
        ctx.expect(TokenKind::LParen)?;
        parse_expression_with_registry(ctx, registry, level)?;
        ctx.expect(TokenKind::RParen)?;
        parse_block(ctx, registry, level)?;
        Ok(())
    })
}

fn parse_assert(
    ctx: &mut ParseContext,
    registry: Option<&StrategyRegistry>,
    level: LanguageLevel,
) -> Result<NodeId, ParseError> {
    node(ctx, NodeKind::AssertStatement, |ctx| {
        ctx.expect(TokenKind::Assert)?;
        parse_expression_with_registry(ctx, registry, level)?;
        if eat(ctx, TokenKind::Colon) {
            parse_expression_with_registry(ctx, registry, level)?;
        }
        ctx.expect(TokenKind::Semicolon)?;
        Ok(())
    })
}

fn parse_labeled(
    ctx: &mut ParseContext,
    registry: Option<&StrategyRegistry>,
    level: LanguageLevel,
) -> Result<NodeId, ParseError> {
    node(ctx, NodeKind::LabeledStatement, |ctx| {
        leaf(ctx, NodeKind::IdentifierNode)?;
        ctx.expect(TokenKind::Colon)?;
        parse_statement(ctx, registry, level)?;
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
        ParseContext::new(src, tokens, NodeStorage::create(256).unwrap(), 1000)
    }

    #[test]
    fn block_with_local_variable_and_return() {
        let mut ctx = ctx_for("{ int x = 1; return x; }");
        let id = parse_block(&mut ctx, None, LanguageLevel::default()).unwrap();
        let rec = ctx.storage().get_node(id).unwrap();
        assert_eq!(rec.kind, NodeKind::Block);
        assert_eq!(rec.children.len(), 2);
        assert_eq!(ctx.current().kind, TokenKind::Eof);
    }

    #[test]
    fn if_else_chain() {
        let mut ctx = ctx_for("{ if (x) { y(); } else { z(); } }");
        let id = parse_block(&mut ctx, None, LanguageLevel::default()).unwrap();
        assert_eq!(ctx.storage().get_node(id).unwrap().kind, NodeKind::Block);
        assert_eq!(ctx.current().kind, TokenKind::Eof);
    }

    #[test]
    fn enhanced_for_vs_classic_for() {
        let mut ctx = ctx_for("{ for (String s : list) {} }");
        let id = parse_block(&mut ctx, None, LanguageLevel::default()).unwrap();
        let block = ctx.storage().get_node(id).unwrap();
        let for_id = block.children[0];
        assert_eq!(
            ctx.storage().get_node(for_id).unwrap().kind,
            NodeKind::EnhancedForStatement
        );

        let mut ctx2 = ctx_for("{ for (int i = 0; i < 10; i++) {} }");
        let id2 = parse_block(&mut ctx2, None, LanguageLevel::default()).unwrap();
        let block2 = ctx2.storage().get_node(id2).unwrap();
        let for_id2 = block2.children[0];
        assert_eq!(
            ctx2.storage().get_node(for_id2).unwrap().kind,
            NodeKind::ForStatement
        );
    }

    #[test]
    fn switch_statement_with_arrow_rules() {
        let mut ctx = ctx_for("{ switch (x) { case 1 -> foo(); default -> bar(); } }");
        let id = parse_block(&mut ctx, None, LanguageLevel::default()).unwrap();
        assert_eq!(ctx.storage().get_node(id).unwrap().kind, NodeKind::Block);
        assert_eq!(ctx.current().kind, TokenKind::Eof);
    }

    #[test]
    fn switch_label_nests_under_its_rule() {
        let mut ctx = ctx_for("{ switch (x) { case 1 -> foo(); } }");
        let id = parse_block(&mut ctx, None, LanguageLevel::default()).unwrap();
        let block = ctx.storage().get_node(id).unwrap();
        let switch = ctx.storage().get_node(block.children[0]).unwrap();
        let rule = ctx.storage().get_node(switch.children[1]).unwrap();
        assert_eq!(rule.kind, NodeKind::SwitchRule);
        assert_eq!(
            ctx.storage().get_node(rule.children[0]).unwrap().kind,
            NodeKind::SwitchLabel
        );
    }

    #[test]
    fn try_with_resources_and_catch() {
        let mut ctx = ctx_for("{ try (var r = open()) { use(r); } catch (IOException e) { } }");
        let id = parse_block(&mut ctx, None, LanguageLevel::default()).unwrap();
        assert_eq!(ctx.storage().get_node(id).unwrap().kind, NodeKind::Block);
        assert_eq!(ctx.current().kind, TokenKind::Eof);
    }

    #[test]
    fn malformed_statement_recovers_with_error_node() {
        let mut ctx = ctx_for("{ )garbage; return 1; }");
        let id = parse_block(&mut ctx, None, LanguageLevel::default()).unwrap();
        let block = ctx.storage().get_node(id).unwrap();
        assert!(block.children.len() >= 2);
        assert_eq!(ctx.current().kind, TokenKind::Eof);
    }
}
