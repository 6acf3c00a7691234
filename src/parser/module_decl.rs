//! `module-info.java`: the module declaration and its directives
//! (`requires`, `exports`, `opens`, `uses`, `provides`), plus the Java 25+
//! "module import" declaration usable inside an ordinary compilation unit.

use crate::context::ParseContext;
use crate::error::ParseError;
use crate::parser::annotations::{at_annotation, parse_annotation};
use crate::parser::support::{at, eat, guarded, node};
use crate::parser::types::parse_qualified_name;
use crate::strategy::{LanguageLevel, Phase, StrategyRegistry};
use crate::token::TokenKind;
use crate::tree::{NodeId, NodeKind};

/// `(open)? module Name { Directive* }`.
pub(crate) fn parse_module_declaration(
    ctx: &mut ParseContext,
    registry: Option<&StrategyRegistry>,
    level: LanguageLevel,
) -> Result<NodeId, ParseError> {
    guarded(ctx, |ctx| {
        node(ctx, NodeKind::ModuleDeclaration, |ctx| {
            while at_annotation(ctx) {
                parse_annotation(ctx)?;
            }
            eat(ctx, TokenKind::Open);
            ctx.expect(TokenKind::Module)?;
            parse_qualified_name(ctx)?;
            ctx.expect(TokenKind::LBrace)?;
            while !at(ctx, TokenKind::RBrace) && !at(ctx, TokenKind::Eof) {
                parse_directive(ctx, registry, level)?;
            }
            ctx.expect(TokenKind::RBrace)?;
            Ok(())
        })
    })
}

/// `import module Name;` (Java 25+) — imports every package a module
/// exports, rather than one type or one package. Dispatched via
/// `Phase::ModuleBody` the same way the other directives are, since whether
/// it's recognized at all is itself a version-gated decision.
pub(crate) fn parse_module_import(ctx: &mut ParseContext) -> Result<NodeId, ParseError> {
    guarded(ctx, |ctx| {
        node(ctx, NodeKind::ModuleImportDeclaration, |ctx| {
            ctx.expect(TokenKind::Import)?;
            ctx.expect(TokenKind::Module)?;
            parse_qualified_name(ctx)?;
            ctx.expect(TokenKind::Semicolon)?;
            Ok(())
        })
    })
}

fn parse_directive(
    ctx: &mut ParseContext,
    registry: Option<&StrategyRegistry>,
    level: LanguageLevel,
) -> Result<NodeId, ParseError> {
    if let Some(registry) = registry {
        if let Some(strategy) = registry.find_strategy(level, Phase::ModuleBody, ctx) {
            ctx.metrics().record_strategy_dispatch();
            return strategy.parse_construct(ctx);
        }
    }
    match ctx.current().kind {
        TokenKind::Requires => parse_requires(ctx),
        TokenKind::Exports => parse_exports(ctx),
        TokenKind::Opens => parse_opens(ctx),
        TokenKind::Uses => parse_uses(ctx),
        TokenKind::Provides => parse_provides(ctx),
        _ => crate::parser::support::error_node(ctx),
    }
}

fn parse_requires(ctx: &mut ParseContext) -> Result<NodeId, ParseError> {
    node(ctx, NodeKind::RequiresDirective, |ctx| {
        ctx.expect(TokenKind::Requires)?;
        loop {
            if eat(ctx, TokenKind::Transitive) || eat(ctx, TokenKind::Static) {
                continue;
            }
            break;
        }
        parse_qualified_name(ctx)?;
        ctx.expect(TokenKind::Semicolon)?;
        Ok(())
    })
}

fn parse_exports(ctx: &mut ParseContext) -> Result<NodeId, ParseError> {
    node(ctx, NodeKind::ExportsDirective, |ctx| {
        ctx.expect(TokenKind::Exports)?;
        parse_qualified_name(ctx)?;
        if eat(ctx, TokenKind::To) {
            loop {
                parse_qualified_name(ctx)?;
                if !eat(ctx, TokenKind::Comma) {
                    break;
                }
            }
        }
        ctx.expect(TokenKind::Semicolon)?;
        Ok(())
    })
}

fn parse_opens(ctx: &mut ParseContext) -> Result<NodeId, ParseError> {
    node(ctx, NodeKind::OpensDirective, |ctx| {
        ctx.expect(TokenKind::Opens)?;
        parse_qualified_name(ctx)?;
        if eat(ctx, TokenKind::To) {
            loop {
                parse_qualified_name(ctx)?;
                if !eat(ctx, TokenKind::Comma) {
                    break;
                }
            }
        }
        ctx.expect(TokenKind::Semicolon)?;
        Ok(())
    })
}

fn parse_uses(ctx: &mut ParseContext) -> Result<NodeId, ParseError> {
    node(ctx, NodeKind::UsesDirective, |ctx| {
        ctx.expect(TokenKind::Uses)?;
        parse_qualified_name(ctx)?;
        ctx.expect(TokenKind::Semicolon)?;
        Ok(())
    })
}

fn parse_provides(ctx: &mut ParseContext) -> Result<NodeId, ParseError> {
    node(ctx, NodeKind::ProvidesDirective, |ctx| {
        ctx.expect(TokenKind::Provides)?;
        parse_qualified_name(ctx)?;
        ctx.expect(TokenKind::With)?;
        loop {
            parse_qualified_name(ctx)?;
            if !eat(ctx, TokenKind::Comma) {
                break;
            }
        }
        ctx.expect(TokenKind::Semicolon)?;
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
        ParseContext::new(src, tokens, NodeStorage::create(128).unwrap(), 1000)
    }

    #[test]
    fn module_with_all_directive_kinds() {
        let mut ctx = ctx_for(
            "module com.example.app { requires transitive com.example.lib; exports com.example.api to com.example.client; opens com.example.internal; uses com.example.Service; provides com.example.Service with com.example.impl.ServiceImpl; }",
        );
        let id = parse_module_declaration(&mut ctx, None, LanguageLevel::default()).unwrap();
        let rec = ctx.storage().get_node(id).unwrap();
        assert_eq!(rec.kind, NodeKind::ModuleDeclaration);
        assert_eq!(rec.children.len(), 6); // name + 5 directives
        assert_eq!(ctx.current().kind, TokenKind::Eof);
    }

    #[test]
    fn open_module() {
        let mut ctx = ctx_for("open module m { }");
        let id = parse_module_declaration(&mut ctx, None, LanguageLevel::default()).unwrap();
        assert_eq!(ctx.storage().get_node(id).unwrap().kind, NodeKind::ModuleDeclaration);
    }

    #[test]
    fn module_import_declaration() {
        let mut ctx = ctx_for("import module java.base;");
        let id = parse_module_import(&mut ctx).unwrap();
        assert_eq!(
            ctx.storage().get_node(id).unwrap().kind,
            NodeKind::ModuleImportDeclaration
        );
        assert_eq!(ctx.current().kind, TokenKind::Eof);
    }
}
