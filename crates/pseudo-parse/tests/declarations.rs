use pseudo_ast::ast::{Node, NodeKind};
use pseudo_ast::token::TokKind;
use pseudo_parse::{parse_str, SyntaxError};

fn only_stmt(src: &str) -> Node {
    let mut root = parse_str(src).expect("parse ok");
    assert_eq!(root.kind, NodeKind::Program);
    assert_eq!(root.children.len(), 1, "expected one statement");
    root.children.remove(0)
}

fn lexemes(n: &Node) -> Vec<&str> {
    n.children.iter().map(|c| c.lexeme()).collect()
}

#[test]
fn scalar_integer() {
    let d = only_stmt("Declare x As Integer");
    assert_eq!(d.kind, NodeKind::Declaration);
    assert_eq!(d.lexeme(), "Declare");
    assert_eq!(lexemes(&d), vec!["x", "Integer"]);
    assert!(!d.is_array_declaration());
}

#[test]
fn scalar_string() {
    let d = only_stmt("Declare str As String");
    assert_eq!(lexemes(&d), vec!["str", "String"]);
    assert_eq!(d.children[1].token.kind, TokKind::KwString);
}

#[test]
fn unknown_type_name_is_kept_opaque() {
    let d = only_stmt("Declare flag As Boolean");
    assert_eq!(lexemes(&d), vec!["flag", "Boolean"]);
    assert_eq!(d.children[1].token.kind, TokKind::Ident);
}

#[test]
fn array_has_four_children() {
    let d = only_stmt("Declare arr As Array Of Integer[5]");
    assert!(d.is_array_declaration());
    assert_eq!(lexemes(&d), vec!["arr", "Array", "Integer", "5"]);
    assert!(d.children.iter().all(|c| c.kind == NodeKind::Identifier));
}

#[test]
fn array_extra_dimensions_append_children() {
    let d = only_stmt("Declare matrix As Array Of Integer[3][4]");
    assert_eq!(lexemes(&d), vec!["matrix", "Array", "Integer", "3", "4"]);
}

#[test]
fn array_size_may_be_a_name() {
    let d = only_stmt("Declare buf As Array Of String[N]");
    assert_eq!(lexemes(&d), vec!["buf", "Array", "String", "N"]);
}

#[test]
fn declarations_keep_source_order() {
    let root = parse_str("Declare a As Integer\nDeclare b As String").unwrap();
    let names: Vec<_> = root.children.iter().map(|d| d.children[0].lexeme()).collect();
    assert_eq!(names, vec!["a", "b"]);
}

#[test]
fn missing_identifier() {
    let err = parse_str("Declare As Integer").unwrap_err();
    assert!(err.to_string().contains("expected identifier after `Declare`"));
}

#[test]
fn missing_type_after_as() {
    let err = parse_str("Declare x As").unwrap_err();
    assert_eq!(
        err.to_string(),
        "expected a type name, found end of input at 12..12"
    );
}

#[test]
fn array_without_size() {
    let err = parse_str("Declare arr As Array Of Integer").unwrap_err();
    assert!(err.to_string().contains("expected `[` with the array size"));
}

#[test]
fn array_size_must_be_single_token() {
    let err = parse_str("Declare arr As Array Of Integer[2 + 3]").unwrap_err();
    assert!(matches!(err, SyntaxError::BadArraySize { ref found, .. } if found == "`+`"));

    let err = parse_str("Declare arr As Array Of Integer[]").unwrap_err();
    assert!(matches!(err, SyntaxError::BadArraySize { .. }));
}
