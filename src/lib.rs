//! `java-cst`: a version-aware Java source parser CORE — lexer, arena-backed
//! index-overlay syntax tree, and a `StrategyRegistry` that dispatches
//! construct parsing across JDK feature releases 8 through 25.
//!
//! The CORE deliberately stops at a concrete-syntax arena: building a typed
//! AST, resolving symbols, and type-checking are all a downstream consumer's
//! job. `Parser::parse` is the one entry point that ties the lexer, the
//! arena, and the registry together into a single pass over source text.

mod context;
mod error;
mod lexer;
mod limit;
pub mod metrics;
mod parser;
mod strategy;
mod token;
mod tree;

pub use context::ParseContext;
pub use error::{ParseError, StorageError};
pub use lexer::Lexer;
pub use limit::{LimitTracker, DEFAULT_RECURSION_LIMIT};
pub use metrics::MetricsSnapshot;
pub use strategy::{LanguageLevel, ParseStrategy, Phase, StrategyRegistry};
pub use token::{Token, TokenKind};
pub use tree::{NodeId, NodeKind, NodeRecord, NodeStorage, NONE};

use std::rc::Rc;

use metrics::SessionMetrics;

/// Default arena capacity a `Parser` allocates for a session when the caller
/// hasn't sized it to the input, e.g. via a prior line-count estimate.
pub const DEFAULT_INITIAL_NODE_CAPACITY: usize = 1024;

/// A configured parser session, borrowing the source text it was built from.
/// A `recursion_limit`/`token_limit`-style builder: construct with `new`,
/// configure with the `.language_level` family, then consume with `.parse()`.
pub struct Parser<'src> {
    source: &'src str,
    level: LanguageLevel,
    recursion_limit: usize,
    initial_capacity: usize,
    registry: Rc<StrategyRegistry>,
}

impl<'src> Parser<'src> {
    pub fn new(source: &'src str) -> Self {
        Self {
            source,
            level: LanguageLevel::default(),
            recursion_limit: DEFAULT_RECURSION_LIMIT,
            initial_capacity: DEFAULT_INITIAL_NODE_CAPACITY,
            registry: Rc::new(StrategyRegistry::with_defaults()),
        }
    }

    /// Target language level; construct strategies gated to a later level
    /// than this one never match (`StrategyRegistry::find_strategy`).
    pub fn language_level(mut self, level: LanguageLevel) -> Self {
        self.level = level;
        self
    }

    pub fn recursion_limit(mut self, limit: usize) -> Self {
        self.recursion_limit = limit;
        self
    }

    pub fn initial_node_capacity(mut self, capacity: usize) -> Self {
        self.initial_capacity = capacity;
        self
    }

    /// Replaces the default construct-strategy registry, e.g. with one built
    /// via `StrategyRegistry::new()` plus a caller's own strategies, or with
    /// the defaults' registry minus a construct the caller wants disabled.
    pub fn registry(mut self, registry: StrategyRegistry) -> Self {
        self.registry = Rc::new(registry);
        self
    }

    /// Lexes, then parses, the source this session was built from: tokenizes,
    /// filters trivia, allocates the arena, wires the statement-delegate
    /// hook, and walks `crate::parser::parse_compilation_unit`.
    pub fn parse(self) -> Result<ParseOutcome, ParseError> {
        let span = tracing::debug_span!("parse", level = ?self.level, source_len = self.source.len());
        let _enter = span.enter();

        let tokens: Vec<Token> = Lexer::tokenize_all(self.source)
            .into_iter()
            .filter(|t| !t.kind.is_trivia())
            .collect();

        let metrics = Rc::new(SessionMetrics::new());
        metrics.record_tokens_scanned(tokens.len() as u64);

        let storage = NodeStorage::create(self.initial_capacity)?;
        let mut ctx = ParseContext::with_metrics(
            self.source,
            tokens,
            storage,
            self.recursion_limit,
            Rc::clone(&metrics),
        );

        let level = self.level;
        let statement_registry = Rc::clone(&self.registry);
        ctx.set_statement_parser(Box::new(move |ctx| {
            parser::statements::parse_statement(ctx, Some(statement_registry.as_ref()), level)
        }));

        let registry = Rc::clone(&self.registry);
        let result = parser::parse_compilation_unit(&mut ctx, Some(registry.as_ref()), level);

        match result {
            Ok(root) => {
                let snapshot = metrics.snapshot();
                tracing::debug!(nodes = snapshot.nodes_allocated, "parse completed");
                Ok(ParseOutcome {
                    root,
                    storage: ctx.into_storage(),
                    metrics: snapshot,
                })
            }
            Err(e) => {
                match &e {
                    ParseError::Storage(StorageError::StorageFull { capacity, requested }) => {
                        tracing::warn!(capacity, requested, "node storage exhausted, aborting parse");
                    }
                    ParseError::RecursionLimit { offset } => {
                        tracing::warn!(offset, "recursion limit reached, aborting parse");
                    }
                    _ => {}
                }
                Err(e)
            }
        }
    }
}

/// The result of a completed parse: the compilation unit's root node id, the
/// arena it lives in, and a snapshot of this session's metrics (all zero
/// unless `crate::metrics::enable_metrics` was called beforehand).
pub struct ParseOutcome {
    pub root: NodeId,
    pub storage: NodeStorage,
    pub metrics: MetricsSnapshot,
}

/// Parses `source` at the default language level with a fresh, default-configured
/// `Parser`. A convenience for callers that don't need to tune the recursion
/// limit, initial capacity, or construct-strategy registry.
pub fn parse(source: &str) -> Result<ParseOutcome, ParseError> {
    Parser::new(source).parse()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_empty_source_to_a_bare_compilation_unit() {
        let outcome = parse("").unwrap();
        let rec = outcome.storage.get_node(outcome.root).unwrap();
        assert_eq!(rec.kind, NodeKind::CompilationUnit);
        assert_eq!(rec.children.len(), 0);
    }

    #[test]
    fn parses_package_import_and_class() {
        let src = "package com.example; import java.util.List; class Foo { List<String> x; }";
        let outcome = parse(src).unwrap();
        let rec = outcome.storage.get_node(outcome.root).unwrap();
        assert_eq!(rec.kind, NodeKind::CompilationUnit);
        assert_eq!(rec.children.len(), 3); // package + import + class
    }

    #[test]
    fn unnamed_class_top_level_at_java21_plus() {
        let src = "void main() { System.out.println(\"hi\"); }";
        let outcome = Parser::new(src).language_level(LanguageLevel::Java21).parse().unwrap();
        let rec = outcome.storage.get_node(outcome.root).unwrap();
        assert_eq!(rec.kind, NodeKind::CompilationUnit);
        assert_eq!(rec.children.len(), 1);
        let unnamed = outcome.storage.get_node(rec.children[0]).unwrap();
        assert_eq!(unnamed.kind, NodeKind::UnnamedClassDeclaration);
        assert_eq!(unnamed.children.len(), 1); // the bare method
    }

    #[test]
    fn flexible_constructor_body_dispatches_at_java22_plus() {
        let src = "class Foo { Foo(int x) { validate(x); super(); } }";
        let outcome = Parser::new(src).language_level(LanguageLevel::Java22).parse().unwrap();
        assert_eq!(
            outcome.storage.get_node(outcome.root).unwrap().kind,
            NodeKind::CompilationUnit
        );
    }

    #[test]
    fn storage_full_surfaces_as_storage_error() {
        let err = Parser::new("class Foo { int x; }")
            .initial_node_capacity(1)
            .parse()
            .unwrap_err();
        assert!(matches!(err, ParseError::Storage(StorageError::StorageFull { .. })));
    }
}
