//! Arena and strategy-dispatch invariants exercised through the public API.

use java_cst::{LanguageLevel, NodeKind, NodeStorage, Parser, Phase, StrategyRegistry, NONE};

#[test]
fn allocation_ids_are_strictly_increasing_and_children_land_in_order() {
    let mut storage = NodeStorage::create(8).unwrap();
    let a = storage.allocate(0, 1, NodeKind::Block, NONE).unwrap();
    let b = storage.allocate(1, 1, NodeKind::LiteralExpression, a).unwrap();
    let c = storage.allocate(2, 1, NodeKind::LiteralExpression, a).unwrap();
    assert!(a < b);
    assert!(b < c);

    let parent = storage.get_node(a).unwrap();
    assert_eq!(parent.parent, NONE);
    let child_b = storage.get_node(b).unwrap();
    assert_eq!(child_b.parent, a);
    assert_eq!(storage.get_children(a).unwrap(), vec![b, c]);
    assert_eq!(storage.count(), 3);
}

#[test]
fn length_fixup_only_touches_the_node_updated() {
    let mut storage = NodeStorage::create(4).unwrap();
    let a = storage.allocate(0, 0, NodeKind::Block, NONE).unwrap();
    let b = storage.allocate(0, 5, NodeKind::LiteralExpression, a).unwrap();
    storage.update_length(a, 42).unwrap();
    assert_eq!(storage.get_node(a).unwrap().length, 42);
    assert_eq!(storage.get_node(b).unwrap().length, 5);
}

#[test]
fn released_storage_rejects_further_operations() {
    let mut storage = NodeStorage::create(4).unwrap();
    let id = storage.allocate(0, 1, NodeKind::Block, NONE).unwrap();
    storage.release();
    assert!(!storage.is_alive());
    assert!(storage.get_node(id).is_err());
    assert!(storage.allocate(1, 1, NodeKind::Block, NONE).is_err());
}

#[test]
fn storage_full_when_capacity_exhausted() {
    let mut storage = NodeStorage::create(1).unwrap();
    storage.allocate(0, 1, NodeKind::Block, NONE).unwrap();
    assert!(storage.allocate(1, 1, NodeKind::Block, NONE).is_err());
}

#[test]
fn flexible_constructor_body_dispatch_is_version_gated() {
    let src = "Foo(int x) { validate(x); super(); }";
    let tokens: Vec<_> = java_cst::Lexer::tokenize_all(src)
        .into_iter()
        .filter(|t| !t.kind.is_trivia())
        .collect();
    let storage = NodeStorage::create(32).unwrap();
    let ctx = java_cst::ParseContext::new(src, tokens, storage, 1000);
    let registry = StrategyRegistry::with_defaults();

    assert!(registry
        .find_strategy(LanguageLevel::Java22, Phase::ConstructorBody, &ctx)
        .is_some());
    assert!(registry
        .find_strategy(LanguageLevel::Java21, Phase::ConstructorBody, &ctx)
        .is_none());
}

#[test]
fn dispatch_is_deterministic_across_repeated_lookups() {
    let src = "{ }";
    let tokens: Vec<_> = java_cst::Lexer::tokenize_all(src)
        .into_iter()
        .filter(|t| !t.kind.is_trivia())
        .collect();
    let storage = NodeStorage::create(8).unwrap();
    let ctx = java_cst::ParseContext::new(src, tokens, storage, 1000);
    let registry = StrategyRegistry::with_defaults();

    let first = registry.find_strategy(LanguageLevel::Java25, Phase::ConstructorBody, &ctx);
    let second = registry.find_strategy(LanguageLevel::Java25, Phase::ConstructorBody, &ctx);
    assert_eq!(first.is_some(), second.is_some());
    if let (Some(a), Some(b)) = (first, second) {
        assert_eq!(a.description(), b.description());
    }
}

#[test]
fn recursion_limit_rejects_pathologically_nested_expressions() {
    let mut src = String::new();
    for _ in 0..2000 {
        src.push('(');
    }
    src.push('1');
    for _ in 0..2000 {
        src.push(')');
    }
    let src = format!("class Foo {{ void m() {{ x = {src}; }} }}");

    let err = Parser::new(&src).recursion_limit(100).parse().unwrap_err();
    assert!(matches!(err, java_cst::ParseError::RecursionLimit { .. }));
}
