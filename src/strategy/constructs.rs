//! Concrete `ParseStrategy` implementations: the version-gated constructs
//! that only exist from a particular Java release onward. Each strategy owns
//! exactly one construct's `can_handle`/`parse_construct` pair; the parser
//! modules under `crate::parser` never reference a Java version directly,
//! only a `Phase` and (via `ParseContext`) the current token.

use std::rc::Rc;

use crate::context::ParseContext;
use crate::error::ParseError;
use crate::parser::expressions::parse_argument_list;
use crate::parser::patterns::{looks_like_record_pattern, parse_primitive_pattern, parse_record_pattern, parse_type_pattern, is_primitive_keyword};
use crate::parser::support::{at, error_node, guarded, leaf, node, resync_to};
use crate::parser::types::peek_starts_type;
use crate::strategy::{LanguageLevel, ParseStrategy, Phase, StrategyRegistry};
use crate::token::TokenKind;
use crate::tree::{NodeId, NodeKind};

/// Java 22+ flexible constructor bodies (JEP 447/482): statements may precede
/// the explicit `this(...)`/`super(...)` invocation, which previously had to
/// be the body's first statement. `crate::parser::declarations` already
/// tries `Phase::ConstructorBody` dispatch before falling back to an ordinary
/// block — this is the strategy that dispatch finds once the target level
/// supports it.
pub(crate) struct FlexibleConstructorBodyStrategy;

impl ParseStrategy for FlexibleConstructorBodyStrategy {
    fn can_handle(&self, _level: LanguageLevel, phase: Phase, ctx: &ParseContext) -> bool {
        phase == Phase::ConstructorBody && at(ctx, TokenKind::LBrace)
    }

    fn parse_construct(&self, ctx: &mut ParseContext) -> Result<NodeId, ParseError> {
        guarded(ctx, |ctx| {
            node(ctx, NodeKind::FlexibleConstructorBody, |ctx| {
                ctx.expect(TokenKind::LBrace)?;
                while !at(ctx, TokenKind::RBrace) && !at(ctx, TokenKind::Eof) {
                    let result = if at_explicit_constructor_invocation(ctx) {
                        parse_explicit_constructor_invocation(ctx)
                    } else {
                        ctx.parse_statement()
                    };
                    if let Err(e) = result {
                        match e {
                            ParseError::RecursionLimit { .. } | ParseError::Storage(_) => return Err(e),
                            _ => {
                                ctx.metrics().record_recovered_error();
                                error_node(ctx)?;
                                resync_to(ctx, &[TokenKind::Semicolon, TokenKind::RBrace, TokenKind::Eof]);
                                crate::parser::support::eat(ctx, TokenKind::Semicolon);
                            }
                        }
                    }
                }
                ctx.expect(TokenKind::RBrace)?;
                Ok(())
            })
        })
    }

    fn priority(&self) -> i32 {
        100
    }

    fn description(&self) -> &'static str {
        "flexible constructor body (JEP 447/482)"
    }
}

fn at_explicit_constructor_invocation(ctx: &ParseContext) -> bool {
    matches!(ctx.current().kind, TokenKind::This | TokenKind::Super) && ctx.peek(1).kind == TokenKind::LParen
}

fn parse_explicit_constructor_invocation(ctx: &mut ParseContext) -> Result<NodeId, ParseError> {
    node(ctx, NodeKind::ExplicitConstructorInvocation, |ctx| {
        if at(ctx, TokenKind::This) {
            leaf(ctx, NodeKind::ThisExpression)?;
        } else {
            leaf(ctx, NodeKind::SuperExpression)?;
        }
        parse_argument_list(ctx, None, LanguageLevel::default())?;
        ctx.expect(TokenKind::Semicolon)?;
        Ok(())
    })
}

/// Java 25+ `import module Name;`, usable inside an ordinary compilation
/// unit's import list alongside single-type and on-demand imports.
pub(crate) struct ModuleImportStrategy;

impl ParseStrategy for ModuleImportStrategy {
    fn can_handle(&self, _level: LanguageLevel, phase: Phase, ctx: &ParseContext) -> bool {
        phase == Phase::TopLevel && at(ctx, TokenKind::Import) && ctx.peek(1).kind == TokenKind::Module
    }

    fn parse_construct(&self, ctx: &mut ParseContext) -> Result<NodeId, ParseError> {
        crate::parser::module_decl::parse_module_import(ctx)
    }

    fn priority(&self) -> i32 {
        100
    }

    fn description(&self) -> &'static str {
        "module import declaration"
    }
}

/// Java 23+ preview (finalized Java 25) primitive `instanceof`/`case`
/// patterns: `x instanceof int i`, `case int i -> ...`.
pub(crate) struct PrimitivePatternStrategy;

impl ParseStrategy for PrimitivePatternStrategy {
    fn can_handle(&self, _level: LanguageLevel, phase: Phase, ctx: &ParseContext) -> bool {
        phase == Phase::Expression
            && is_primitive_keyword(ctx.current().kind)
            && ctx.peek(1).kind == TokenKind::Identifier
    }

    fn parse_construct(&self, ctx: &mut ParseContext) -> Result<NodeId, ParseError> {
        parse_primitive_pattern(ctx)
    }

    fn priority(&self) -> i32 {
        90
    }

    fn description(&self) -> &'static str {
        "primitive pattern"
    }
}

/// Java 21+ record deconstruction patterns: `case Point(var x, var y) -> ...`,
/// `x instanceof Point(var x, var y)`.
pub(crate) struct RecordPatternStrategy;

impl ParseStrategy for RecordPatternStrategy {
    fn can_handle(&self, _level: LanguageLevel, phase: Phase, ctx: &ParseContext) -> bool {
        phase == Phase::Expression && looks_like_record_pattern(ctx)
    }

    fn parse_construct(&self, ctx: &mut ParseContext) -> Result<NodeId, ParseError> {
        parse_record_pattern(ctx)
    }

    fn priority(&self) -> i32 {
        80
    }

    fn description(&self) -> &'static str {
        "record deconstruction pattern"
    }
}

/// Java 16+ type patterns: `x instanceof String s`, `case String s -> ...`.
/// Lowest priority among the pattern strategies — it's the catch-all a plain
/// `Type identifier` shape falls into once the more specific primitive/record
/// shapes have already had a chance to match.
pub(crate) struct TypePatternStrategy;

impl ParseStrategy for TypePatternStrategy {
    fn can_handle(&self, _level: LanguageLevel, phase: Phase, ctx: &ParseContext) -> bool {
        if phase != Phase::Expression || !peek_starts_type(ctx, 0) {
            return false;
        }
        let after = crate::parser::types::peek_type_span_len(ctx, 0);
        ctx.peek(after).kind == TokenKind::Identifier
    }

    fn parse_construct(&self, ctx: &mut ParseContext) -> Result<NodeId, ParseError> {
        parse_type_pattern(ctx)
    }

    fn priority(&self) -> i32 {
        10
    }

    fn description(&self) -> &'static str {
        "type pattern"
    }
}

/// Registers every construct strategy this crate ships across the level
/// window each became available in. Called by `StrategyRegistry::with_defaults`.
pub(crate) fn register_defaults(registry: &mut StrategyRegistry) {
    let from = |min: LanguageLevel| -> Vec<LanguageLevel> {
        LanguageLevel::ALL.into_iter().filter(|&l| l >= min).collect()
    };

    registry.register(&from(LanguageLevel::Java22), Rc::new(FlexibleConstructorBodyStrategy));
    registry.register(&from(LanguageLevel::Java25), Rc::new(ModuleImportStrategy));
    registry.register(&from(LanguageLevel::Java23), Rc::new(PrimitivePatternStrategy));
    registry.register(&from(LanguageLevel::Java21), Rc::new(RecordPatternStrategy));
    registry.register(&from(LanguageLevel::Java16), Rc::new(TypePatternStrategy));
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
        ParseContext::new(src, tokens, NodeStorage::create(128).unwrap(), 1000)
    }

    #[test]
    fn flexible_constructor_body_allows_statement_before_super_call() {
        let mut ctx = ctx_for("{ validate(x); super(x); }");
        let strategy = FlexibleConstructorBodyStrategy;
        ctx.set_statement_parser(Box::new(|ctx| {
            crate::parser::statements::parse_statement(ctx, None, LanguageLevel::default())
        }));
        let id = strategy.parse_construct(&mut ctx).unwrap();
        let rec = ctx.storage().get_node(id).unwrap();
        assert_eq!(rec.kind, NodeKind::FlexibleConstructorBody);
        assert_eq!(rec.children.len(), 2);
        assert_eq!(ctx.current().kind, TokenKind::Eof);
    }

    #[test]
    fn registry_finds_record_pattern_over_type_pattern() {
        let mut registry = StrategyRegistry::new();
        register_defaults(&mut registry);
        let ctx = ctx_for("Point(var x, var y)");
        let strategy = registry
            .find_strategy(LanguageLevel::Java25, Phase::Expression, &ctx)
            .unwrap();
        assert_eq!(strategy.description(), "record deconstruction pattern");
    }

    #[test]
    fn registry_falls_back_to_type_pattern_for_plain_type() {
        let mut registry = StrategyRegistry::new();
        register_defaults(&mut registry);
        let ctx = ctx_for("String s");
        let strategy = registry
            .find_strategy(LanguageLevel::Java25, Phase::Expression, &ctx)
            .unwrap();
        assert_eq!(strategy.description(), "type pattern");
    }

    #[test]
    fn registry_has_no_module_import_strategy_below_java25() {
        let mut registry = StrategyRegistry::new();
        register_defaults(&mut registry);
        let ctx = ctx_for("import module java.base;");
        assert!(registry
            .find_strategy(LanguageLevel::Java21, Phase::TopLevel, &ctx)
            .is_none());
        assert!(registry
            .find_strategy(LanguageLevel::Java25, Phase::TopLevel, &ctx)
            .is_some());
    }
}
