//! End-to-end compilation-unit parsing through the public `Parser`/`parse` API.

use java_cst::{parse, LanguageLevel, NodeKind, Parser};

fn kind_of(outcome: &java_cst::ParseOutcome, id: java_cst::NodeId) -> NodeKind {
    outcome.storage.get_node(id).unwrap().kind
}

#[test]
fn package_import_and_class_declaration() {
    let src = "package com.example;\nimport java.util.List;\nclass Foo { List<String> names; }";
    let outcome = parse(src).unwrap();
    assert_eq!(kind_of(&outcome, outcome.root), NodeKind::CompilationUnit);
    let root = outcome.storage.get_node(outcome.root).unwrap();
    assert_eq!(root.children.len(), 3);
    assert_eq!(kind_of(&outcome, root.children[0]), NodeKind::PackageDeclaration);
    assert_eq!(kind_of(&outcome, root.children[1]), NodeKind::ImportDeclaration);
    assert_eq!(kind_of(&outcome, root.children[2]), NodeKind::ClassDeclaration);
}

#[test]
fn static_and_on_demand_imports() {
    let src = "import static java.util.Collections.emptyList;\nimport java.util.*;\nclass Foo {}";
    let outcome = parse(src).unwrap();
    let root = outcome.storage.get_node(outcome.root).unwrap();
    assert_eq!(root.children.len(), 3);
    assert_eq!(kind_of(&outcome, root.children[0]), NodeKind::ImportDeclaration);
    assert_eq!(kind_of(&outcome, root.children[1]), NodeKind::ImportDeclaration);
}

#[test]
fn multiple_top_level_type_declarations() {
    let src = "class A {} interface B {} enum C { X, Y }";
    let outcome = parse(src).unwrap();
    let root = outcome.storage.get_node(outcome.root).unwrap();
    assert_eq!(root.children.len(), 3);
    assert_eq!(kind_of(&outcome, root.children[0]), NodeKind::ClassDeclaration);
    assert_eq!(kind_of(&outcome, root.children[1]), NodeKind::InterfaceDeclaration);
    assert_eq!(kind_of(&outcome, root.children[2]), NodeKind::EnumDeclaration);
}

#[test]
fn record_declaration_with_components() {
    let src = "record Point(int x, int y) {}";
    let outcome = parse(src).unwrap();
    let root = outcome.storage.get_node(outcome.root).unwrap();
    assert_eq!(kind_of(&outcome, root.children[0]), NodeKind::RecordDeclaration);
}

#[test]
fn annotation_type_declaration() {
    let src = "@interface Config { String value() default \"x\"; }";
    let outcome = parse(src).unwrap();
    let root = outcome.storage.get_node(outcome.root).unwrap();
    assert_eq!(kind_of(&outcome, root.children[0]), NodeKind::AnnotationTypeDeclaration);
}

#[test]
fn module_declaration_with_directives() {
    let src = "module com.example { requires java.base; exports com.example.api; }";
    let outcome = parse(src).unwrap();
    let root = outcome.storage.get_node(outcome.root).unwrap();
    assert_eq!(root.children.len(), 1);
    assert_eq!(kind_of(&outcome, root.children[0]), NodeKind::ModuleDeclaration);
}

#[test]
fn unnamed_class_top_level_only_active_from_java21() {
    let src = "void main() { System.out.println(\"hi\"); }";

    // Before Java 21, a bare top-level method isn't a type declaration;
    // each leading token is recovered as its own ERROR node.
    let old = Parser::new(src).language_level(LanguageLevel::Java17).parse().unwrap();
    let old_root = old.storage.get_node(old.root).unwrap();
    assert_ne!(kind_of(&old, old_root.children[0]), NodeKind::MethodDeclaration);

    let outcome = Parser::new(src).language_level(LanguageLevel::Java21).parse().unwrap();
    let root = outcome.storage.get_node(outcome.root).unwrap();
    assert_eq!(root.children.len(), 1);
    assert_eq!(kind_of(&outcome, root.children[0]), NodeKind::UnnamedClassDeclaration);
    let unnamed = outcome.storage.get_node(root.children[0]).unwrap();
    assert_eq!(unnamed.children.len(), 1);
    assert_eq!(kind_of(&outcome, unnamed.children[0]), NodeKind::MethodDeclaration);
}

#[test]
fn empty_source_is_a_childless_compilation_unit() {
    let outcome = parse("").unwrap();
    let root = outcome.storage.get_node(outcome.root).unwrap();
    assert_eq!(root.kind, NodeKind::CompilationUnit);
    assert_eq!(root.children.len(), 0);
}
