// Integration tests for the KPL front end

use std::path::PathBuf;

use kplc::parser::ast::{Expr, SourceLocation, Stmt};
use kplc::parser::lexer::TokenKind;
use kplc::symtab::{ConstantValue, ObjectKind, ParamMode, Type};
use kplc::{compile, compile_file, CompileError, ErrorKind};
use rstest::rstest;

fn fixture(name: &str) -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("tests")
        .join("fixtures")
        .join(name)
}

fn init_logging() {
    let _ = env_logger::builder().is_test(true).try_init();
}

#[test]
fn test_minimal_program() {
    init_logging();
    let compilation = compile("program P; begin end.").expect("Compile failed");

    assert_eq!(compilation.program().name, "P");
    assert!(compilation.body().is_empty());
}

#[test]
fn test_program_name_is_root_object() {
    let compilation = compile("program Hello;\nvar x : integer;\nbegin x := 1 end.").unwrap();

    let root = compilation.program();
    assert_eq!(root.name, "Hello");
    assert!(matches!(root.kind, ObjectKind::Program { .. }));
    assert_eq!(compilation.body().len(), 1);
}

#[rstest]
#[case::missing_semicolon(
    "program P begin end.",
    ErrorKind::MissingToken { expected: TokenKind::Semicolon, found: TokenKind::KwBegin },
    1, 11
)]
#[case::redeclared_variable(
    "program P;\nvar x : integer; x : char;\nbegin end.",
    ErrorKind::Redeclared { name: "x".to_string() },
    2, 18
)]
#[case::zero_array_size(
    "program P;\nvar a : array(.0.) of integer;\nbegin end.",
    ErrorKind::InvalidArraySize,
    2, 16
)]
#[case::undeclared_type(
    "program P;\nvar t : matrix;\nbegin end.",
    ErrorKind::UndeclaredType { name: "matrix".to_string() },
    2, 9
)]
#[case::constant_used_as_type(
    "program P;\nconst k = 1;\nvar t : k;\nbegin end.",
    ErrorKind::NotAType { name: "k".to_string() },
    3, 9
)]
#[case::negated_char_constant(
    "program P;\nconst a = -'x';\nbegin end.",
    ErrorKind::InvalidConstant,
    2, 12
)]
#[case::constant_expression(
    "program P;\nconst c = 'a' + 1;\nbegin end.",
    ErrorKind::MissingToken { expected: TokenKind::Semicolon, found: TokenKind::Plus },
    2, 15
)]
#[case::number_as_type(
    "program P;\nvar x : 5;\nbegin end.",
    ErrorKind::InvalidType,
    2, 9
)]
#[case::array_return_type(
    "program P;\nfunction f : array(.2.) of integer;\nbegin end;\nbegin end.",
    ErrorKind::InvalidBasicType,
    2, 14
)]
#[case::numeric_parameter(
    "program P;\nprocedure q(1 : integer);\nbegin end;\nbegin end.",
    ErrorKind::InvalidParameter,
    2, 13
)]
#[case::dangling_operator(
    "program P;\nbegin\n  x := 1 +\nend.",
    ErrorKind::InvalidFactor,
    4, 1
)]
#[case::condition_without_comparator(
    "program P;\nvar x : integer;\nbegin\n  while x do x := 1\nend.",
    ErrorKind::InvalidComparator,
    4, 11
)]
#[case::lone_bang(
    "program P;\nvar x : integer;\nbegin x := 1 ! 2 end.",
    ErrorKind::InvalidSymbol,
    3, 14
)]
#[case::unterminated_comment(
    "program P; (* open\nbegin end.",
    ErrorKind::EndOfComment,
    1, 12
)]
#[case::long_identifier(
    "program P;\nvar abcdefghijklmnop : integer;\nbegin end.",
    ErrorKind::IdentTooLong,
    2, 5
)]
#[case::two_char_literal(
    "program P;\nconst c = 'ab';\nbegin end.",
    ErrorKind::InvalidCharConstant,
    2, 11
)]
fn test_first_defect_is_reported_at_its_token(
    #[case] source: &str,
    #[case] kind: ErrorKind,
    #[case] line: usize,
    #[case] column: usize,
) {
    let err = compile(source).unwrap_err();

    assert_eq!(err.kind, kind);
    assert_eq!(err.location, SourceLocation::new(line, column));
}

#[test]
fn test_diagnostic_text() {
    let err = compile("program P;\nvar x : integer\nbegin end.").unwrap_err();
    assert_eq!(err.to_string(), "3-1:Missing ';'");
}

#[test]
fn test_parameter_shadows_outer_variable() {
    let compilation = compile(
        "program P;\n\
         var x : char;\n\
         procedure Q(x : integer);\n\
         begin x := 1 end;\n\
         begin x := 'c' end.",
    )
    .unwrap();
    let table = compilation.table();

    let outer = compilation.lookup("x").unwrap();
    assert!(matches!(
        &table.object(outer).kind,
        ObjectKind::Variable { ty: Type::Char, .. }
    ));

    let q = compilation.lookup("Q").unwrap();
    let q_scope = table.object(q).scope().unwrap();
    let inner = table.lookup_in(q_scope, "x").unwrap();
    assert_ne!(inner, outer);
    assert!(matches!(
        &table.object(inner).kind,
        ObjectKind::Parameter { mode: ParamMode::Value, ty: Type::Int, .. }
    ));
}

#[test]
fn test_redeclaration_in_nested_scope_is_allowed() {
    let compilation = compile(
        "program P;\n\
         var x : integer;\n\
         procedure Q;\n\
         var x : char;\n\
         begin end;\n\
         begin end.",
    );
    assert!(compilation.is_ok(), "{:?}", compilation.err());
}

#[test]
fn test_procedure_cannot_redeclare_its_parameter() {
    let err = compile(
        "program P;\n\
         procedure Q(n : integer);\n\
         var n : char;\n\
         begin end;\n\
         begin end.",
    )
    .unwrap_err();

    assert_eq!(err.kind, ErrorKind::Redeclared { name: "n".to_string() });
    assert_eq!(err.location, SourceLocation::new(3, 5));
}

#[test]
fn test_variable_type_is_independent_of_type_declaration() {
    let mut compilation =
        compile("program P;\ntype t = integer;\nvar x : t;\nbegin end.").unwrap();

    let t = compilation.lookup("t").unwrap();
    let x = compilation.lookup("x").unwrap();
    compilation.table_mut().object_mut(t).kind = ObjectKind::TypeDef { actual: Type::Char };

    let ty = compilation.table().object(x).value_type().unwrap();
    assert_eq!(ty.resolved(), &Type::Int);
}

#[test]
fn test_precedence_in_program_body() {
    let compilation = compile("program P;\nvar x : integer;\nbegin x := 2 + 3 * 4 end.").unwrap();

    let [Stmt::Assign { value, .. }] = compilation.body() else {
        panic!("Expected a single assignment");
    };
    let Expr::BinaryOp { right, .. } = value else {
        panic!("Expected a binary expression");
    };
    assert!(matches!(
        **right,
        Expr::BinaryOp { op: kplc::parser::ast::BinOp::Mul, .. }
    ));
}

#[test]
fn test_compile_file_minimal() {
    let compilation = compile_file(fixture("minimal.kpl")).unwrap();
    assert_eq!(compilation.render_tree(), "Program Minimal\n");
}

#[test]
fn test_compile_file_factorial() {
    let compilation = compile_file(fixture("factorial.kpl")).unwrap();

    assert_eq!(
        compilation.render_tree(),
        "Program Factorial\n\
         \x20 Var n : Int\n\
         \x20 Function F : Int\n\
         \x20   Param n : Int\n"
    );

    let f = compilation.lookup("F").unwrap();
    let Some([Stmt::If { else_branch, .. }]) = compilation.table().object(f).body() else {
        panic!("Expected F's body to be a single if statement");
    };
    assert!(else_branch.is_some());
}

#[test]
fn test_function_body_binds_to_itself() {
    let compilation = compile(
        "program P;\n\
         function F(n : integer) : integer;\n\
         begin F := F(n - 1) end;\n\
         begin end.",
    )
    .unwrap();

    let f = compilation.lookup("F").unwrap();
    let Some([Stmt::Assign { target, value, .. }]) = compilation.table().object(f).body() else {
        panic!("Expected F's body to be a single assignment");
    };
    assert_eq!(target.binding, Some(f));
    assert!(matches!(
        value,
        Expr::Name { binding, args: Some(args), .. } if *binding == Some(f) && args.len() == 1
    ));
}

#[test]
fn test_compile_file_arrays() {
    let compilation = compile_file(fixture("arrays.kpl")).unwrap();

    assert_eq!(
        compilation.render_tree(),
        "Program Arrays\n\
         \x20 Const max = 10\n\
         \x20 Const letter = 'k'\n\
         \x20 Const neg = -10\n\
         \x20 Type vector = Arr(10,Int)\n\
         \x20 Type grid = Arr(4,vector)\n\
         \x20 Var v : vector\n\
         \x20 Var g : grid\n\
         \x20 Var i : Int\n\
         \x20 Var c : Char\n\
         \x20 Procedure Fill\n\
         \x20   Param VAR a : Int\n\
         \x20   Param b : Char\n\
         \x20   Var k : Int\n"
    );

    let neg = compilation.lookup("neg").unwrap();
    assert!(matches!(
        compilation.table().object(neg).kind,
        ObjectKind::Constant { value: ConstantValue::Int(-10) }
    ));
    assert_eq!(compilation.body().len(), 4);
}

#[test]
fn test_compile_file_reports_diagnostic() {
    let err = compile_file(fixture("missing_semicolon.kpl")).unwrap_err();

    let diag = err.diagnostic().expect("Expected a diagnostic");
    assert_eq!(
        diag.kind,
        ErrorKind::MissingToken { expected: TokenKind::Semicolon, found: TokenKind::KwBegin }
    );
    assert_eq!(err.location(), Some(&SourceLocation::new(3, 1)));
}

#[test]
fn test_compile_file_missing_path() {
    let err = compile_file(fixture("does_not_exist.kpl")).unwrap_err();

    assert!(matches!(err, CompileError::Io { .. }));
    assert!(err.to_string().contains("does_not_exist.kpl"));
}
