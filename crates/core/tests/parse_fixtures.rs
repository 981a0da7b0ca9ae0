//! End-to-end parsing of the `.thrift` fixtures and of the documented
//! behaviours: literal forms, enum numbering, comment attribution, error
//! lines and repeatability.

use std::path::Path;
use thrift_ast_core::{
    parse, parse_with, to_json, ContainerKind, DuplicateFieldIds, Literal, ParseOptions,
    Qualifier, SubjectKind, ThriftAst, TypeRef,
};

fn fixture(name: &str) -> String {
    let path = Path::new(env!("CARGO_MANIFEST_DIR"))
        .join("tests/fixtures")
        .join(name);
    std::fs::read_to_string(&path)
        .unwrap_or_else(|e| panic!("failed to read {}: {}", path.display(), e))
}

fn parse_ok(src: &str) -> ThriftAst {
    parse(src).unwrap_or_else(|e| panic!("unexpected syntax error: {}", e))
}

// ──────────────────────────────────────────────
// 1. Fixtures
// ──────────────────────────────────────────────

#[test]
fn tutorial_fixture_parses_every_kind() {
    let ast = parse_ok(&fixture("tutorial.thrift"));
    for kind in SubjectKind::ALL {
        assert!(ast.contains_kind(kind), "missing {}", kind.as_str());
    }

    let inc = ast.include("shared").expect("include");
    assert_eq!(inc.path, "shared.thrift");

    assert_eq!(ast.namespace("go").map(|n| n.path.as_str()), Some("tutorial.api"));
    assert_eq!(
        ast.typedef("MyInteger").map(|t| t.type_.clone()),
        Some(TypeRef::scalar("i32"))
    );
    assert_eq!(ast.constant("MASK").map(|c| c.value.clone()), Some(Literal::Hex(0xFF00)));
    assert_eq!(
        ast.constant("RATE").map(|c| c.value.clone()),
        Some(Literal::Exponent(1500.0))
    );

    let op = ast.enumeration("Operation").expect("enum");
    let values: Vec<i64> = op.items.iter().map(|i| i.value).collect();
    assert_eq!(values, vec![1, 2, 3, 4]);
    assert_eq!(op.items[2].comments.tail.as_deref(), Some("// three"));
    assert!(op
        .comments
        .head
        .as_deref()
        .is_some_and(|c| c.contains("Arithmetic operations.")));

    let work = ast.fields(SubjectKind::Struct, "Work").expect("struct");
    assert_eq!(work.len(), 4);
    assert_eq!(work[0].default, Some(Literal::Int(0)));
    assert_eq!(work[3].qualifier, Some(Qualifier::Optional));

    let payload = ast.fields(SubjectKind::Union, "Payload").expect("union");
    assert_eq!(
        payload[1].type_,
        TypeRef::ListLike {
            kind: ContainerKind::Set,
            value: Box::new(TypeRef::scalar("i64")),
        }
    );

    let calc = ast.service("Calculator").expect("service");
    assert_eq!(calc.extends.as_deref(), Some("shared.SharedService"));
    let names: Vec<&str> = calc.functions.keys().map(String::as_str).collect();
    assert_eq!(names, vec!["ping", "add", "calculate", "zip"]);
    assert!(calc.functions["zip"].oneway);
    assert_eq!(
        calc.functions["zip"].comments.tail.as_deref(),
        Some("// fire and forget")
    );
    assert_eq!(calc.functions["calculate"].throws.len(), 1);
    assert!(calc.functions["ping"]
        .comments
        .head
        .as_deref()
        .is_some_and(|c| c.starts_with("/**")));
}

#[test]
fn shared_fixture_namespaces_by_scope() {
    let ast = parse_ok(&fixture("shared.thrift"));
    let scopes: Vec<&String> = ast
        .get(SubjectKind::Namespace)
        .expect("namespaces")
        .keys()
        .collect();
    assert_eq!(scopes, vec!["cpp", "java", "*"]);
    assert!(!ast.contains_kind(SubjectKind::Enum));
}

#[test]
fn fixture_json_has_only_present_kinds() {
    let v = to_json(&parse_ok(&fixture("shared.thrift")));
    let mut keys: Vec<&String> = v.as_object().expect("object").keys().collect();
    keys.sort();
    assert_eq!(keys, vec!["namespace", "service", "struct"]);
    assert_eq!(v["struct"]["SharedStruct"][1]["name"], "value");
}

// ──────────────────────────────────────────────
// 2. Documented behaviours
// ──────────────────────────────────────────────

#[test]
fn numeric_literal_forms() {
    let ast = parse_ok(
        "const i32 A = 0x1A\nconst i32 B = -0x1A\nconst double C = 1.5e3\nconst double D = -2E-1\nconst bool E = true\nconst bool F = false",
    );
    let value = |name: &str| ast.constant(name).map(|c| c.value.clone());
    assert_eq!(value("A").and_then(|v| v.as_i64()), Some(26));
    assert_eq!(value("B").and_then(|v| v.as_i64()), Some(-26));
    assert_eq!(value("C").and_then(|v| v.as_f64()), Some(1500.0));
    assert_eq!(value("D").and_then(|v| v.as_f64()), Some(-0.2));
    assert_eq!(value("E"), Some(Literal::Bool(true)));
    assert_eq!(value("F"), Some(Literal::Bool(false)));
}

#[test]
fn enum_auto_increment() {
    let ast = parse_ok("enum E { A, B, C = 5, D }");
    let e = ast.enumeration("E").expect("enum");
    let pairs: Vec<(&str, i64)> = e.items.iter().map(|i| (i.name.as_str(), i.value)).collect();
    assert_eq!(pairs, vec![("A", 0), ("B", 1), ("C", 5), ("D", 6)]);
}

#[test]
fn comment_attribution_head_and_tail() {
    let src = "\
struct User {
  1: i64 id // primary key

  // Display name.
  // Never empty.
  2: string name
}
";
    let ast = parse_ok(src);
    let fields = ast.fields(SubjectKind::Struct, "User").expect("struct");
    assert_eq!(fields[0].comments.tail.as_deref(), Some("// primary key"));
    assert_eq!(fields[0].comments.head, None);
    assert_eq!(
        fields[1].comments.head.as_deref(),
        Some("// Display name.\r\n// Never empty.")
    );
    assert_eq!(fields[1].comments.tail, None);
}

#[test]
fn container_types_keep_structure_scalars_collapse() {
    let ast = parse_ok("struct S { 1: list<string> tags, 2: MyStruct inner }");
    let fields = ast.fields(SubjectKind::Struct, "S").expect("struct");
    assert_eq!(
        fields[0].type_,
        TypeRef::ListLike {
            kind: ContainerKind::List,
            value: Box::new(TypeRef::scalar("string")),
        }
    );
    assert_eq!(fields[1].type_, TypeRef::scalar("MyStruct"));
}

#[test]
fn service_extends_does_not_copy_parent_functions() {
    let ast = parse_ok("service A { void base() }\nservice B extends A { void ping() }");
    let b = ast.service("B").expect("service");
    assert_eq!(b.extends.as_deref(), Some("A"));
    assert_eq!(b.functions.len(), 1);
    assert!(b.functions.contains_key("ping"));
}

#[test]
fn trailing_separators_are_optional() {
    let with = parse_ok("typedef i32 A;\ntypedef i32 B,\nenum E { X; Y, Z };");
    let without = parse_ok("typedef i32 A\ntypedef i32 B\nenum E { X Y Z }");
    assert_eq!(with, without);
}

#[test]
fn parsing_twice_gives_identical_asts() {
    let src = fixture("tutorial.thrift");
    assert_eq!(parse_ok(&src), parse_ok(&src));
}

#[test]
fn empty_and_comment_only_sources_give_empty_ast() {
    assert!(parse_ok("").is_empty());
    assert!(parse_ok("\n  // nothing here\n/* at all */\n").is_empty());
}

#[test]
fn leading_byte_order_mark_is_skipped() {
    let ast = parse_ok("\u{feff}// header\ntypedef i32 Id\n");
    assert_eq!(ast.len(), 1);
    let id = ast.typedef("Id").expect("typedef");
    assert_eq!(id.comments.head.as_deref(), Some("// header"));

    let err = parse("\u{feff}typedef i32 A\n@@@").unwrap_err();
    assert_eq!(err.line, 2);
}

#[test]
fn non_finite_double_constant_serializes_as_null() {
    let v = to_json(&parse_ok("const double HUGE = 1e999"));
    assert!(v["const"]["HUGE"]["value"].is_null());
}

// ──────────────────────────────────────────────
// 3. Errors
// ──────────────────────────────────────────────

#[test]
fn trailing_garbage_reports_its_line() {
    let src = "struct A {\n  1: i32 x\n}\n\n@@@ not thrift\n";
    let err = parse(src).unwrap_err();
    assert_eq!(err.line, 5);
    assert!(err.context.starts_with("@@@ not thrift"));
    assert!(err.message.contains("expected"), "message: {}", err.message);
}

#[test]
fn error_context_is_bounded() {
    let src = format!("typedef i32 Ok\n{}", "x".repeat(300));
    let err = parse(&src).unwrap_err();
    assert_eq!(err.line, 2);
    assert_eq!(err.context.chars().count(), 100);

    let narrow = ParseOptions::new().context_width(10);
    let err = parse_with(&src, narrow).unwrap_err();
    assert_eq!(err.context, "x".repeat(10));
}

#[test]
fn malformed_declaration_fails_at_its_start() {
    let src = "typedef i32 A\nstruct Broken {\n  1: i32\n}\n";
    let err = parse(src).unwrap_err();
    assert_eq!(err.line, 2);
    assert!(err.context.starts_with("struct Broken"));
}

#[test]
fn duplicate_field_ids() {
    let src = "struct S {\n  1: i32 a\n  1: i32 b\n}";
    let err = parse(src).unwrap_err();
    assert!(err.message.contains("duplicate field id 1"), "message: {}", err.message);

    let lenient = ParseOptions::new().duplicate_field_ids(DuplicateFieldIds::Keep);
    let ast = parse_with(src, lenient).expect("lenient parse");
    assert_eq!(ast.fields(SubjectKind::Struct, "S").map(|f| f.len()), Some(2));
}

#[test]
fn crlf_line_endings_count_once() {
    let src = "typedef i32 A\r\ntypedef i32 B\r\n???";
    let err = parse(src).unwrap_err();
    assert_eq!(err.line, 3);
}

#[test]
fn unterminated_string_is_an_error() {
    let err = parse("const string S = \"open\n").unwrap_err();
    assert_eq!(err.line, 1);
}
