//! Construct parsers: one module per grammar area, assembled here into the
//! single `parse_compilation_unit` entry point `crate::Parser` drives.

pub(crate) mod annotations;
pub(crate) mod declarations;
pub(crate) mod expressions;
pub(crate) mod modifiers;
pub(crate) mod module_decl;
pub(crate) mod patterns;
pub(crate) mod statements;
pub(crate) mod support;
pub(crate) mod types;

use crate::context::ParseContext;
use crate::error::ParseError;
use crate::parser::support::{at, eat, guarded, node};
use crate::strategy::{LanguageLevel, Phase, StrategyRegistry};
use crate::token::TokenKind;
use crate::tree::{NodeId, NodeKind};

/// `PackageDeclaration? ImportDeclaration* (ModuleDeclaration | TypeDeclaration*)`,
/// with the Java 21+ (JEP 463/477) "unnamed class" top level — bare members
/// with no enclosing `class Name { ... }` — handled as a third alternative.
///
/// The unnamed-class check happens here rather than as a registered
/// `ParseStrategy` at `Phase::TopLevel`: `declarations::parse_member_sequence`
/// already consults the registry once per member, and a strategy whose
/// `can_handle` is "doesn't start an ordinary type declaration" would match
/// on every iteration of that loop, re-wrapping the remaining members in an
/// ever-deeper `UnnamedClassDeclaration` instead of parsing them once. A
/// one-time decision at the very top of the file has no such recursion.
pub(crate) fn parse_compilation_unit(
    ctx: &mut ParseContext,
    registry: Option<&StrategyRegistry>,
    level: LanguageLevel,
) -> Result<NodeId, ParseError> {
    guarded(ctx, |ctx| {
        node(ctx, NodeKind::CompilationUnit, |ctx| {
            if at(ctx, TokenKind::Package) {
                parse_package_declaration(ctx)?;
            }
            while at_import(ctx) {
                parse_import(ctx, registry, level)?;
            }
            if at(ctx, TokenKind::Module)
                || (at(ctx, TokenKind::Open) && ctx.peek(1).kind == TokenKind::Module)
            {
                module_decl::parse_module_declaration(ctx, registry, level)?;
                return Ok(());
            }
            if level >= LanguageLevel::Java21
                && !at(ctx, TokenKind::Eof)
                && !declarations::at_type_declaration_start(ctx)
            {
                node(ctx, NodeKind::UnnamedClassDeclaration, |ctx| {
                    declarations::parse_member_sequence(ctx, registry, level, TokenKind::Eof)
                })?;
                return Ok(());
            }
            while !at(ctx, TokenKind::Eof) {
                declarations::parse_type_declaration(ctx, registry, level)?;
            }
            Ok(())
        })
    })
}

fn at_import(ctx: &ParseContext) -> bool {
    at(ctx, TokenKind::Import)
}

fn parse_package_declaration(ctx: &mut ParseContext) -> Result<NodeId, ParseError> {
    node(ctx, NodeKind::PackageDeclaration, |ctx| {
        while at(ctx, TokenKind::At) {
            annotations::parse_annotation(ctx)?;
        }
        ctx.expect(TokenKind::Package)?;
        types::parse_qualified_name(ctx)?;
        ctx.expect(TokenKind::Semicolon)?;
        Ok(())
    })
}

/// `import static? QualifiedName (.*)? ;` or, from Java 25, `import module
/// Name;` — the latter is tried via `Phase::TopLevel` registry dispatch
/// first (`ModuleImportStrategy`, `crate::strategy::constructs`) since
/// whether it's recognized at all is version-gated; a direct call is the
/// fallback so the construct still parses with no registry configured.
fn parse_import(
    ctx: &mut ParseContext,
    registry: Option<&StrategyRegistry>,
    level: LanguageLevel,
) -> Result<NodeId, ParseError> {
    if ctx.peek(1).kind == TokenKind::Module {
        if let Some(registry) = registry {
            if let Some(strategy) = registry.find_strategy(level, Phase::TopLevel, ctx) {
                ctx.metrics().record_strategy_dispatch();
                return strategy.parse_construct(ctx);
            }
        }
        return module_decl::parse_module_import(ctx);
    }
    node(ctx, NodeKind::ImportDeclaration, |ctx| {
        ctx.expect(TokenKind::Import)?;
        eat(ctx, TokenKind::Static);
        types::parse_qualified_name(ctx)?;
        if at(ctx, TokenKind::Dot) && ctx.peek(1).kind == TokenKind::Mult {
            ctx.advance();
            ctx.advance();
        }
        ctx.expect(TokenKind::Semicolon)?;
        Ok(())
    })
}
