//! Type declarations (class/interface/enum/record/annotation type) and their
//! members (fields, methods, constructors, initializers).

use crate::context::ParseContext;
use crate::error::ParseError;
use crate::parser::annotations::parse_annotation;
use crate::parser::expressions::{parse_argument_list, parse_conditional, parse_expression_with_registry};
use crate::parser::modifiers::parse_modifiers;
use crate::parser::statements::parse_block;
use crate::parser::support::{at, eat, guarded, leaf, node, resync_to};
use crate::parser::types::{parse_qualified_name, parse_type, parse_type_parameters};
use crate::strategy::{LanguageLevel, Phase, StrategyRegistry};
use crate::token::TokenKind;
use crate::tree::{NodeId, NodeKind};

/// Dispatches on the keyword introducing a type declaration. Used both at
/// the top level (`crate::parser::compilation_unit`) and for local classes
/// (`crate::parser::statements`).
pub(crate) fn parse_type_declaration(
    ctx: &mut ParseContext,
    registry: Option<&StrategyRegistry>,
    level: LanguageLevel,
) -> Result<NodeId, ParseError> {
    guarded(ctx, |ctx| {
        parse_modifiers(ctx)?;
        match ctx.current().kind {
            TokenKind::Class => parse_class(ctx, registry, level),
            TokenKind::Interface => parse_interface(ctx, registry, level),
            TokenKind::Enum => parse_enum(ctx, registry, level),
            TokenKind::Record => parse_record(ctx, registry, level),
            TokenKind::At if ctx.peek(1).kind == TokenKind::Interface => {
                parse_annotation_type(ctx, registry, level)
            }
            _ => crate::parser::support::error_node(ctx),
        }
    })
}

fn parse_class(
    ctx: &mut ParseContext,
    registry: Option<&StrategyRegistry>,
    level: LanguageLevel,
) -> Result<NodeId, ParseError> {
    node(ctx, NodeKind::ClassDeclaration, |ctx| {
        ctx.expect(TokenKind::Class)?;
        leaf(ctx, NodeKind::IdentifierNode)?;
        if at(ctx, TokenKind::Lt) {
            parse_type_parameters(ctx)?;
        }
        if eat(ctx, TokenKind::Extends) {
            node(ctx, NodeKind::ExtendsClause, |ctx| {
                parse_type(ctx)?;
                Ok(())
            })?;
        }
        if at(ctx, TokenKind::Implements) {
            parse_implements_clause(ctx)?;
        }
        if at(ctx, TokenKind::Permits) {
            parse_permits_clause(ctx)?;
        }
        parse_class_body(ctx, registry, level)?;
        Ok(())
    })
}

fn parse_interface(
    ctx: &mut ParseContext,
    registry: Option<&StrategyRegistry>,
    level: LanguageLevel,
) -> Result<NodeId, ParseError> {
    node(ctx, NodeKind::InterfaceDeclaration, |ctx| {
        ctx.expect(TokenKind::Interface)?;
        leaf(ctx, NodeKind::IdentifierNode)?;
        if at(ctx, TokenKind::Lt) {
            parse_type_parameters(ctx)?;
        }
        if eat(ctx, TokenKind::Extends) {
            node(ctx, NodeKind::ExtendsClause, |ctx| {
                loop {
                    parse_type(ctx)?;
                    if !eat(ctx, TokenKind::Comma) {
                        break;
                    }
                }
                Ok(())
            })?;
        }
        if at(ctx, TokenKind::Permits) {
            parse_permits_clause(ctx)?;
        }
        parse_class_body(ctx, registry, level)?;
        Ok(())
    })
}

fn parse_implements_clause(ctx: &mut ParseContext) -> Result<NodeId, ParseError> {
    node(ctx, NodeKind::ImplementsClause, |ctx| {
        ctx.expect(TokenKind::Implements)?;
        loop {
            parse_type(ctx)?;
            if !eat(ctx, TokenKind::Comma) {
                break;
            }
        }
        Ok(())
    })
}

fn parse_permits_clause(ctx: &mut ParseContext) -> Result<NodeId, ParseError> {
    node(ctx, NodeKind::PermitsClause, |ctx| {
        ctx.expect(TokenKind::Permits)?;
        loop {
            parse_qualified_name(ctx)?;
            if !eat(ctx, TokenKind::Comma) {
                break;
            }
        }
        Ok(())
    })
}

fn parse_enum(
    ctx: &mut ParseContext,
    registry: Option<&StrategyRegistry>,
    level: LanguageLevel,
) -> Result<NodeId, ParseError> {
    node(ctx, NodeKind::EnumDeclaration, |ctx| {
        ctx.expect(TokenKind::Enum)?;
        leaf(ctx, NodeKind::IdentifierNode)?;
        if at(ctx, TokenKind::Implements) {
            parse_implements_clause(ctx)?;
        }
        ctx.expect(TokenKind::LBrace)?;
        if !at(ctx, TokenKind::Semicolon) && !at(ctx, TokenKind::RBrace) {
            loop {
                parse_enum_constant(ctx, registry, level)?;
                if !eat(ctx, TokenKind::Comma) {
                    break;
                }
                if at(ctx, TokenKind::Semicolon) || at(ctx, TokenKind::RBrace) {
                    break;
                }
            }
        }
        if eat(ctx, TokenKind::Semicolon) {
            parse_member_sequence(ctx, registry, level, TokenKind::RBrace)?;
        }
        ctx.expect(TokenKind::RBrace)?;
        Ok(())
    })
}

fn parse_enum_constant(
    ctx: &mut ParseContext,
    registry: Option<&StrategyRegistry>,
    level: LanguageLevel,
) -> Result<NodeId, ParseError> {
    node(ctx, NodeKind::EnumConstant, |ctx| {
        while at(ctx, TokenKind::At) {
            parse_annotation(ctx)?;
        }
        leaf(ctx, NodeKind::IdentifierNode)?;
        if at(ctx, TokenKind::LParen) {
            parse_argument_list(ctx, registry, level)?;
        }
        if at(ctx, TokenKind::LBrace) {
            parse_class_body(ctx, registry, level)?;
        }
        Ok(())
    })
}

fn parse_record(
    ctx: &mut ParseContext,
    registry: Option<&StrategyRegistry>,
    level: LanguageLevel,
) -> Result<NodeId, ParseError> {
    node(ctx, NodeKind::RecordDeclaration, |ctx| {
        ctx.expect(TokenKind::Record)?;
        leaf(ctx, NodeKind::IdentifierNode)?;
        if at(ctx, TokenKind::Lt) {
            parse_type_parameters(ctx)?;
        }
        ctx.expect(TokenKind::LParen)?;
        if !at(ctx, TokenKind::RParen) {
            loop {
                parse_record_component(ctx)?;
                if !eat(ctx, TokenKind::Comma) {
                    break;
                }
            }
        }
        ctx.expect(TokenKind::RParen)?;
        if at(ctx, TokenKind::Implements) {
            parse_implements_clause(ctx)?;
        }
        parse_class_body(ctx, registry, level)?;
        Ok(())
    })
}

fn parse_record_component(ctx: &mut ParseContext) -> Result<NodeId, ParseError> {
    node(ctx, NodeKind::RecordComponent, |ctx| {
        while at(ctx, TokenKind::At) {
            parse_annotation(ctx)?;
        }
        parse_type(ctx)?;
        if eat(ctx, TokenKind::Ellipsis) {
            // varargs trailing component; stored as an ordinary component —
            // there's no separate varargs marker node kind.
        }
        leaf(ctx, NodeKind::IdentifierNode)?;
        Ok(())
    })
}

fn parse_annotation_type(
    ctx: &mut ParseContext,
    registry: Option<&StrategyRegistry>,
    level: LanguageLevel,
) -> Result<NodeId, ParseError> {
    node(ctx, NodeKind::AnnotationTypeDeclaration, |ctx| {
        ctx.expect(TokenKind::At)?;
        ctx.expect(TokenKind::Interface)?;
        leaf(ctx, NodeKind::IdentifierNode)?;
        ctx.expect(TokenKind::LBrace)?;
        while !at(ctx, TokenKind::RBrace) && !at(ctx, TokenKind::Eof) {
            parse_annotation_type_element(ctx, registry, level)?;
        }
        ctx.expect(TokenKind::RBrace)?;
        Ok(())
    })
}

fn parse_annotation_type_element(
    ctx: &mut ParseContext,
    registry: Option<&StrategyRegistry>,
    level: LanguageLevel,
) -> Result<NodeId, ParseError> {
    guarded(ctx, |ctx| {
        parse_modifiers(ctx)?;
        if at_type_declaration_keyword(ctx) {
            return parse_type_declaration_after_modifiers(ctx, registry, level);
        }
        node(ctx, NodeKind::AnnotationTypeElement, |ctx| {
            parse_type(ctx)?;
            leaf(ctx, NodeKind::IdentifierNode)?;
            if eat(ctx, TokenKind::LParen) {
                ctx.expect(TokenKind::RParen)?;
            }
            if eat(ctx, TokenKind::Default) {
                parse_default_value(ctx, registry, level)?;
            }
            ctx.expect(TokenKind::Semicolon)?;
            Ok(())
        })
    })
}

/// The default-value clause of an annotation element — a dedicated `Phase`
/// (`Phase::AnnotationMember`) exists for version-gated dispatch here even
/// though, absent any such strategy, it falls back to the same conditional
/// expression or annotation value any other element value accepts.
fn parse_default_value(
    ctx: &mut ParseContext,
    registry: Option<&StrategyRegistry>,
    level: LanguageLevel,
) -> Result<NodeId, ParseError> {
    if let Some(registry) = registry {
        if let Some(strategy) = registry.find_strategy(level, Phase::AnnotationMember, ctx) {
            ctx.metrics().record_strategy_dispatch();
            return strategy.parse_construct(ctx);
        }
    }
    if at(ctx, TokenKind::At) {
        return parse_annotation(ctx);
    }
    if at(ctx, TokenKind::LBrace) {
        return node(ctx, NodeKind::ArgumentList, |ctx| {
            ctx.expect(TokenKind::LBrace)?;
            while !at(ctx, TokenKind::RBrace) && !at(ctx, TokenKind::Eof) {
                parse_conditional(ctx)?;
                if !eat(ctx, TokenKind::Comma) {
                    break;
                }
            }
            ctx.expect(TokenKind::RBrace)?;
            Ok(())
        });
    }
    parse_conditional(ctx)
}

/// `{ ClassBodyDeclaration* }`, shared by classes, interfaces, enums,
/// records, and anonymous class bodies.
pub(crate) fn parse_class_body(
    ctx: &mut ParseContext,
    registry: Option<&StrategyRegistry>,
    level: LanguageLevel,
) -> Result<NodeId, ParseError> {
    guarded(ctx, |ctx| {
        node(ctx, NodeKind::ClassDeclaration, |ctx| {
            ctx.expect(TokenKind::LBrace)?;
            parse_member_sequence(ctx, registry, level, TokenKind::RBrace)?;
            ctx.expect(TokenKind::RBrace)?;
            Ok(())
        })
    })
    .map(|id| {
        // `parse_class_body` reuses `ClassDeclaration` purely as a container
        // kind for "a brace-delimited member sequence"; callers that embed
        // it (anonymous class bodies, enum constant bodies) don't read this
        // node's kind, only its children, so the shared kind is harmless.
        id
    })
}

pub(crate) fn parse_member_sequence(
    ctx: &mut ParseContext,
    registry: Option<&StrategyRegistry>,
    level: LanguageLevel,
    stop: TokenKind,
) -> Result<(), ParseError> {
    while !at(ctx, stop) && !at(ctx, TokenKind::Eof) && !at(ctx, TokenKind::Default) {
        if eat(ctx, TokenKind::Semicolon) {
            continue;
        }
        if let Some(registry) = registry {
            if let Some(strategy) = registry.find_strategy(level, Phase::TopLevel, ctx) {
                ctx.metrics().record_strategy_dispatch();
                if let Err(e) = strategy.parse_construct(ctx) {
                    return recover_member(ctx, stop, e);
                }
                continue;
            }
        }
        if let Err(e) = parse_member(ctx, registry, level) {
            return recover_member(ctx, stop, e);
        }
    }
    Ok(())
}

fn recover_member(ctx: &mut ParseContext, stop: TokenKind, e: ParseError) -> Result<(), ParseError> {
    match e {
        ParseError::RecursionLimit { .. } | ParseError::Storage(_) => Err(e),
        _ => {
            ctx.metrics().record_recovered_error();
            crate::parser::support::error_node(ctx)?;
            resync_to(ctx, &[TokenKind::Semicolon, stop, TokenKind::Eof]);
            eat(ctx, TokenKind::Semicolon);
            Ok(())
        }
    }
}

fn at_type_declaration_keyword(ctx: &ParseContext) -> bool {
    matches!(
        ctx.current().kind,
        TokenKind::Class | TokenKind::Interface | TokenKind::Enum | TokenKind::Record
    ) || (at(ctx, TokenKind::At) && ctx.peek(1).kind == TokenKind::Interface)
}

/// `true` if a type declaration (possibly preceded by modifiers/annotations)
/// starts at the current position. Used by `crate::parser::parse_compilation_unit`
/// to tell an unnamed-class top level (Java 21+, JEP 463/477) — plain
/// members with no enclosing `class Name { ... }` — apart from an ordinary
/// compilation unit's first type declaration.
pub(crate) fn at_type_declaration_start(ctx: &ParseContext) -> bool {
    let i = crate::parser::modifiers::skip_modifiers(ctx, 0);
    matches!(
        ctx.peek(i).kind,
        TokenKind::Class | TokenKind::Interface | TokenKind::Enum | TokenKind::Record
    ) || (ctx.peek(i).kind == TokenKind::At && ctx.peek(i + 1).kind == TokenKind::Interface)
}

fn parse_type_declaration_after_modifiers(
    ctx: &mut ParseContext,
    registry: Option<&StrategyRegistry>,
    level: LanguageLevel,
) -> Result<NodeId, ParseError> {
    match ctx.current().kind {
        TokenKind::Class => parse_class(ctx, registry, level),
        TokenKind::Interface => parse_interface(ctx, registry, level),
        TokenKind::Enum => parse_enum(ctx, registry, level),
        TokenKind::Record => parse_record(ctx, registry, level),
        _ => parse_annotation_type(ctx, registry, level),
    }
}

/// One member of a class/interface/enum/record body: a nested type
/// declaration, a static/instance initializer, a field, a constructor, a
/// compact constructor, or a method — disambiguated by scanning past
/// modifiers and an optional type-parameter list for the shape that
/// follows.
fn parse_member(
    ctx: &mut ParseContext,
    registry: Option<&StrategyRegistry>,
    level: LanguageLevel,
) -> Result<NodeId, ParseError> {
    guarded(ctx, |ctx| {
        if at(ctx, TokenKind::Static) && ctx.peek(1).kind == TokenKind::LBrace {
            return node(ctx, NodeKind::StaticInitializer, |ctx| {
                ctx.expect(TokenKind::Static)?;
                parse_block(ctx, registry, level)?;
                Ok(())
            });
        }
        let mods = parse_modifiers(ctx)?;
        if at_type_declaration_keyword(ctx) {
            return parse_type_declaration_after_modifiers(ctx, registry, level);
        }
        if at(ctx, TokenKind::LBrace) {
            let _ = mods;
            return node(ctx, NodeKind::InstanceInitializer, |ctx| {
                parse_block(ctx, registry, level)?;
                Ok(())
            });
        }
        let mut offset = 0;
        if at(ctx, TokenKind::Lt) {
            offset = skip_generic_span(ctx);
        }
        if ctx.peek(offset).kind == TokenKind::Identifier && ctx.peek(offset + 1).kind == TokenKind::LParen
        {
            return parse_constructor(ctx, registry, level);
        }
        if ctx.peek(offset).kind == TokenKind::Identifier
            && ctx.peek(offset + 1).kind == TokenKind::LBrace
        {
            return parse_compact_constructor(ctx, registry, level);
        }
        if at(ctx, TokenKind::Lt) {
            return parse_generic_method(ctx, registry, level);
        }
        parse_field_or_method(ctx, registry, level)
    })
}

fn skip_generic_span(ctx: &ParseContext) -> usize {
    let mut depth: i32 = 1;
    let mut i = 1;
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

fn parse_constructor(
    ctx: &mut ParseContext,
    registry: Option<&StrategyRegistry>,
    level: LanguageLevel,
) -> Result<NodeId, ParseError> {
    node(ctx, NodeKind::ConstructorDeclaration, |ctx| {
        leaf(ctx, NodeKind::IdentifierNode)?;
        parse_formal_parameters(ctx)?;
        if eat(ctx, TokenKind::Throws) {
            parse_throws_clause(ctx)?;
        }
        parse_constructor_body(ctx, registry, level)?;
        Ok(())
    })
}

/// A constructor body is either an ordinary block or a Java 22+ "flexible"
/// body whose statements may precede an explicit `this(...)`/`super(...)`
/// call — version-gated dispatch happens here.
fn parse_constructor_body(
    ctx: &mut ParseContext,
    registry: Option<&StrategyRegistry>,
    level: LanguageLevel,
) -> Result<NodeId, ParseError> {
    if let Some(registry) = registry {
        if let Some(strategy) = registry.find_strategy(level, Phase::ConstructorBody, ctx) {
            ctx.metrics().record_strategy_dispatch();
            return strategy.parse_construct(ctx);
        }
    }
    parse_block(ctx, registry, level)
}

fn parse_compact_constructor(
    ctx: &mut ParseContext,
    registry: Option<&StrategyRegistry>,
    level: LanguageLevel,
) -> Result<NodeId, ParseError> {
    node(ctx, NodeKind::CompactConstructorDeclaration, |ctx| {
        leaf(ctx, NodeKind::IdentifierNode)?;
        parse_block(ctx, registry, level)?;
        Ok(())
    })
}

fn parse_generic_method(
    ctx: &mut ParseContext,
    registry: Option<&StrategyRegistry>,
    level: LanguageLevel,
) -> Result<NodeId, ParseError> {
    node(ctx, NodeKind::MethodDeclaration, |ctx| {
        parse_type_parameters(ctx)?;
        parse_return_type_and_rest(ctx, registry, level)
    })
}

fn parse_field_or_method(
    ctx: &mut ParseContext,
    registry: Option<&StrategyRegistry>,
    level: LanguageLevel,
) -> Result<NodeId, ParseError> {
    let ty_len = crate::parser::types::peek_type_span_len(ctx, 0);
    let is_method = ctx.peek(ty_len).kind == TokenKind::Identifier
        && ctx.peek(ty_len + 1).kind == TokenKind::LParen;
    if is_method {
        node(ctx, NodeKind::MethodDeclaration, |ctx| {
            parse_return_type_and_rest(ctx, registry, level)
        })
    } else {
        parse_field(ctx, registry, level)
    }
}

fn parse_return_type_and_rest(
    ctx: &mut ParseContext,
    registry: Option<&StrategyRegistry>,
    level: LanguageLevel,
) -> Result<(), ParseError> {
    parse_type(ctx)?;
    leaf(ctx, NodeKind::IdentifierNode)?;
    parse_formal_parameters(ctx)?;
    while eat(ctx, TokenKind::LBracket) {
        ctx.expect(TokenKind::RBracket)?;
    }
    if eat(ctx, TokenKind::Throws) {
        parse_throws_clause(ctx)?;
    }
    if at(ctx, TokenKind::LBrace) {
        parse_block(ctx, registry, level)?;
    } else {
        ctx.expect(TokenKind::Semicolon)?;
    }
    Ok(())
}

fn parse_field(
    ctx: &mut ParseContext,
    registry: Option<&StrategyRegistry>,
    level: LanguageLevel,
) -> Result<NodeId, ParseError> {
    node(ctx, NodeKind::FieldDeclaration, |ctx| {
        parse_type(ctx)?;
        loop {
            leaf(ctx, NodeKind::IdentifierNode)?;
            while eat(ctx, TokenKind::LBracket) {
                ctx.expect(TokenKind::RBracket)?;
            }
            if eat(ctx, TokenKind::Assign) {
                if at(ctx, TokenKind::LBrace) {
                    parse_field_initializer_array(ctx, registry, level)?;
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

fn parse_field_initializer_array(
    ctx: &mut ParseContext,
    registry: Option<&StrategyRegistry>,
    level: LanguageLevel,
) -> Result<NodeId, ParseError> {
    node(ctx, NodeKind::ArgumentList, |ctx| {
        ctx.expect(TokenKind::LBrace)?;
        while !at(ctx, TokenKind::RBrace) && !at(ctx, TokenKind::Eof) {
            if at(ctx, TokenKind::LBrace) {
                parse_field_initializer_array(ctx, registry, level)?;
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

fn parse_formal_parameters(ctx: &mut ParseContext) -> Result<NodeId, ParseError> {
    node(ctx, NodeKind::ClassDeclaration, |ctx| {
        ctx.expect(TokenKind::LParen)?;
        if !at(ctx, TokenKind::RParen) {
            loop {
                parse_formal_parameter(ctx)?;
                if !eat(ctx, TokenKind::Comma) {
                    break;
                }
            }
        }
        ctx.expect(TokenKind::RParen)?;
        Ok(())
    })
}

fn parse_formal_parameter(ctx: &mut ParseContext) -> Result<NodeId, ParseError> {
    node(ctx, NodeKind::LocalVariableDeclaration, |ctx| {
        parse_modifiers(ctx)?;
        parse_type(ctx)?;
        if eat(ctx, TokenKind::Ellipsis) {
            // varargs parameter; no dedicated marker node in the catalog.
        }
        leaf(ctx, NodeKind::IdentifierNode)?;
        Ok(())
    })
}

fn parse_throws_clause(ctx: &mut ParseContext) -> Result<NodeId, ParseError> {
    node(ctx, NodeKind::ThrowsClause, |ctx| {
        loop {
            parse_type(ctx)?;
            if !eat(ctx, TokenKind::Comma) {
                break;
            }
        }
        Ok(())
    })
}
