pub mod parser;

pub use parser::Parser;

#[cfg(test)]
mod tests {
    use super::*;
    use marl_lexer::Lexer;
    use marl_syntax::ast::*;
    use marl_syntax::error::Error;
    use marl_syntax::token::{Token, TokenKind};

    fn parse_expr_str(input: &str) -> Expression {
        let tokens = Lexer::new(input).tokenize().expect("Lexing should succeed");
        let mut parser = Parser::new(tokens);
        parser.parse_expr().expect("Parsing should succeed")
    }

    fn parse_expr_err(input: &str) -> Error {
        let tokens = Lexer::new(input).tokenize().expect("Lexing should succeed");
        let mut parser = Parser::new(tokens);
        parser.parse_expr().expect_err("Parsing should fail")
    }

    fn parse_module_str(input: &str) -> Module {
        let tokens = Lexer::new(input).tokenize().expect("Lexing should succeed");
        let mut parser = Parser::new(tokens);
        parser.parse().expect("Parsing should succeed")
    }

    fn parse_module_err(input: &str) -> Error {
        let tokens = Lexer::new(input).tokenize().expect("Lexing should succeed");
        let mut parser = Parser::new(tokens);
        parser.parse().expect_err("Parsing should fail")
    }

    /// Single statement wrapped in a minimal function, unwrapped again.
    fn parse_stmt_str(stmt: &str) -> Statement {
        let src = format!("function void f() {{ {} }}", stmt);
        let mut module = parse_module_str(&src);
        let mut body = module.functions.remove(0).body;
        assert_eq!(body.len(), 1);
        body.remove(0)
    }

    fn ident(e: &Expression) -> &str {
        match &e.kind {
            ExprKind::Identifier(name) => name,
            other => panic!("Expected identifier, got {:?}", other),
        }
    }

    #[test]
    fn test_literal_expressions() {
        assert!(matches!(parse_expr_str("42").kind, ExprKind::IntLiteral(42)));
        assert!(matches!(parse_expr_str("3.5").kind, ExprKind::FloatLiteral(v) if v == 3.5));
        assert!(matches!(parse_expr_str("true").kind, ExprKind::BoolLiteral(true)));
        assert!(matches!(parse_expr_str("false").kind, ExprKind::BoolLiteral(false)));
        assert!(matches!(parse_expr_str("\"hi\"").kind, ExprKind::StringLiteral(s) if s == "hi"));
        assert!(matches!(parse_expr_str("x").kind, ExprKind::Identifier(s) if s == "x"));
    }

    #[test]
    fn test_int_literal_overflow_is_rejected() {
        let err = parse_expr_err("99999999999999999999999999");
        assert!(matches!(err, Error::InvalidLiteral { .. }), "got {:?}", err);
    }

    #[test]
    fn test_operator_precedence() {
        // ^ binds tighter than *, which binds tighter than +
        let e = parse_expr_str("a + b * c ^ d");
        let ExprKind::Addition(lhs, rhs) = e.kind else {
            panic!("Expected addition at the top");
        };
        assert_eq!(ident(&lhs), "a");
        let ExprKind::Multiplication(ml, mr) = rhs.kind else {
            panic!("Expected multiplication under addition");
        };
        assert_eq!(ident(&ml), "b");
        let ExprKind::Exponentiation(el, er) = mr.kind else {
            panic!("Expected exponentiation under multiplication");
        };
        assert_eq!(ident(&el), "c");
        assert_eq!(ident(&er), "d");
    }

    #[test]
    fn test_exponentiation_is_right_associative() {
        let e = parse_expr_str("2 ^ 3 ^ 2");
        let ExprKind::Exponentiation(left, right) = e.kind else {
            panic!("Expected exponentiation at the top");
        };
        assert!(matches!(left.kind, ExprKind::IntLiteral(2)));
        let ExprKind::Exponentiation(rl, rr) = right.kind else {
            panic!("Expected nested exponentiation on the right");
        };
        assert!(matches!(rl.kind, ExprKind::IntLiteral(3)));
        assert!(matches!(rr.kind, ExprKind::IntLiteral(2)));
    }

    #[test]
    fn test_subtraction_is_left_associative() {
        let e = parse_expr_str("a - b - c");
        let ExprKind::Subtraction(left, right) = e.kind else {
            panic!("Expected subtraction at the top");
        };
        assert_eq!(ident(&right), "c");
        let ExprKind::Subtraction(ll, lr) = left.kind else {
            panic!("Expected nested subtraction on the left");
        };
        assert_eq!(ident(&ll), "a");
        assert_eq!(ident(&lr), "b");
    }

    #[test]
    fn test_comparison_redescends_into_addsub() {
        // a < b < c parses as (a < b) < c; the semantic phase rejects it later
        let e = parse_expr_str("a < b < c");
        let ExprKind::Compare(Comparison::Less, left, right) = e.kind else {
            panic!("Expected comparison at the top");
        };
        assert_eq!(ident(&right), "c");
        assert!(matches!(left.kind, ExprKind::Compare(Comparison::Less, _, _)));
    }

    #[test]
    fn test_logical_operators() {
        assert!(matches!(parse_expr_str("a && b").kind, ExprKind::And(_, _)));
        assert!(matches!(parse_expr_str("a || b").kind, ExprKind::Or(_, _)));
        assert!(matches!(parse_expr_str("!a").kind, ExprKind::Not(_)));
        // prefix operators do not repeat
        assert!(matches!(parse_expr_err("!!a"), Error::UnexpectedToken { .. }));
        assert!(matches!(parse_expr_err("--a"), Error::UnexpectedToken { .. }));
    }

    #[test]
    fn test_unary_minus_binds_looser_than_exponent() {
        let e = parse_expr_str("-x ^ 2");
        let ExprKind::UnaryMinus(operand) = e.kind else {
            panic!("Expected unary minus at the top");
        };
        assert!(matches!(operand.kind, ExprKind::Exponentiation(_, _)));
    }

    #[test]
    fn test_ternary_selection() {
        let e = parse_expr_str("a ? b : c");
        assert!(matches!(e.kind, ExprKind::Select { .. }));
    }

    #[test]
    fn test_ternary_does_not_nest_without_parens() {
        let err = parse_expr_err("a ? b ? c : d : e");
        let Error::UnexpectedToken { found, .. } = err else {
            panic!("Expected an unexpected-token fault");
        };
        assert_eq!(found.kind, TokenKind::QMark);

        // explicit parentheses make the inner ternary an or-level operand
        let e = parse_expr_str("a ? (b ? c : d) : e");
        let ExprKind::Select { true_case, .. } = e.kind else {
            panic!("Expected selection at the top");
        };
        assert!(matches!(true_case.kind, ExprKind::Select { .. }));
    }

    #[test]
    fn test_matrix_operators() {
        // · binds looser than #
        let e = parse_expr_str("a · b # c");
        let ExprKind::DotProduct(_, rhs) = e.kind else {
            panic!("Expected dot product at the top");
        };
        assert!(matches!(rhs.kind, ExprKind::MatrixMultiplication(_, _)));

        assert!(matches!(parse_expr_str("'m").kind, ExprKind::MatrixTranspose(_)));
        assert!(matches!(parse_expr_str("m.rows").kind, ExprKind::MatrixRows(_)));
        assert!(matches!(parse_expr_str("m.cols").kind, ExprKind::MatrixCols(_)));
        assert!(matches!(parse_expr_str("v.dim").kind, ExprKind::VectorDimension(_)));
    }

    #[test]
    fn test_subranges() {
        let e = parse_expr_str("v{1:2:5}");
        assert!(matches!(e.kind, ExprKind::SubVector { .. }));

        let e = parse_expr_str("m{0:1:2}{0:1:3}");
        let ExprKind::SubMatrix { target, col_end, .. } = e.kind else {
            panic!("Expected sub-matrix selection");
        };
        assert_eq!(ident(&target), "m");
        assert!(matches!(col_end.kind, ExprKind::IntLiteral(3)));
    }

    #[test]
    fn test_element_select_chains() {
        let e = parse_expr_str("m[i][j]");
        let ExprKind::ElementSelect { target, index } = e.kind else {
            panic!("Expected element select at the top");
        };
        assert_eq!(ident(&index), "j");
        assert!(matches!(target.kind, ExprKind::ElementSelect { .. }));

        let e = parse_expr_str("r@f");
        assert!(matches!(e.kind, ExprKind::RecordElementSelect { element, .. } if element == "f"));

        // record select below element select: r@f[0] indexes the field
        let e = parse_expr_str("r@f[0]");
        let ExprKind::ElementSelect { target, .. } = e.kind else {
            panic!("Expected element select at the top");
        };
        assert!(matches!(target.kind, ExprKind::RecordElementSelect { .. }));
    }

    #[test]
    fn test_calls_and_initializers() {
        let e = parse_expr_str("add(1, 2)");
        let ExprKind::Call { name, args } = e.kind else {
            panic!("Expected call");
        };
        assert_eq!(name, "add");
        assert_eq!(args.len(), 2);

        assert!(matches!(parse_expr_str("nop()").kind, ExprKind::Call { args, .. } if args.is_empty()));

        let e = parse_expr_str("[1, 2, 3]");
        assert!(matches!(e.kind, ExprKind::StructureInit(elements) if elements.len() == 3));

        let e = parse_expr_str("@P[1, 2]");
        let ExprKind::RecordInit { name, elements } = e.kind else {
            panic!("Expected record initializer");
        };
        assert_eq!(name, "P");
        assert_eq!(elements.len(), 2);

        // initializer lists need at least one element
        assert!(matches!(parse_expr_err("[]"), Error::UnexpectedToken { .. }));
    }

    #[test]
    fn test_end_to_end_function() {
        let module = parse_module_str("function int f(int x) { return x + 1; }");
        assert_eq!(module.functions.len(), 1);
        assert!(module.records.is_empty());

        let f = &module.functions[0];
        assert_eq!(f.name, "f");
        assert_eq!(f.return_type.kind, TypeKind::Int);
        assert_eq!(f.parameters.len(), 1);
        assert_eq!(f.parameters[0].name, "x");
        assert_eq!(f.parameters[0].type_specifier.kind, TypeKind::Int);

        assert_eq!(f.body.len(), 1);
        let StmtKind::Return(value) = &f.body[0].kind else {
            panic!("Expected a return statement");
        };
        let ExprKind::Addition(lhs, rhs) = &value.kind else {
            panic!("Expected an addition");
        };
        assert_eq!(ident(lhs), "x");
        assert!(matches!(rhs.kind, ExprKind::IntLiteral(1)));
    }

    #[test]
    fn test_record_round_trip() {
        let module = parse_module_str("record P { var int x; val float y; }");
        assert_eq!(module.records.len(), 1);
        let record = &module.records[0];
        assert_eq!(record.name, "P");
        assert_eq!(record.elements.len(), 2);
        assert!(record.elements[0].is_mutable);
        assert_eq!(record.elements[0].name, "x");
        assert!(!record.elements[1].is_mutable);
        assert_eq!(record.elements[1].name, "y");
    }

    #[test]
    fn test_empty_record_is_rejected() {
        let err = parse_module_err("record E { }");
        let Error::UnexpectedToken { found, expected } = err else {
            panic!("Expected an unexpected-token fault");
        };
        assert_eq!(found.kind, TokenKind::RBrace);
        assert_eq!(expected, vec![TokenKind::Val, TokenKind::Var]);
    }

    #[test]
    fn test_top_level_dispatch() {
        let err = parse_module_err("val int x = 1;");
        let Error::UnexpectedToken { expected, .. } = err else {
            panic!("Expected an unexpected-token fault");
        };
        assert_eq!(expected, vec![TokenKind::Function, TokenKind::Record]);
    }

    #[test]
    fn test_assignment_target_shapes() {
        let stmt = parse_stmt_str("x = 1;");
        let StmtKind::VariableAssignment { target, .. } = stmt.kind else {
            panic!("Expected assignment");
        };
        assert!(matches!(target.kind, LhsKind::Plain(name) if name == "x"));

        let stmt = parse_stmt_str("v[i] = 1;");
        let StmtKind::VariableAssignment { target, .. } = stmt.kind else {
            panic!("Expected assignment");
        };
        assert!(matches!(target.kind, LhsKind::Indexed { col: None, .. }));

        let stmt = parse_stmt_str("m[i][j] = 1;");
        let StmtKind::VariableAssignment { target, .. } = stmt.kind else {
            panic!("Expected assignment");
        };
        assert!(matches!(target.kind, LhsKind::Indexed { col: Some(_), .. }));

        let stmt = parse_stmt_str("r@f = 1;");
        let StmtKind::VariableAssignment { target, .. } = stmt.kind else {
            panic!("Expected assignment");
        };
        assert!(matches!(target.kind, LhsKind::FieldSelect { element, .. } if element == "f"));
    }

    #[test]
    fn test_assignment_target_is_not_composable() {
        // index then field selector is not an assignable shape
        let err = parse_module_err("function void f() { m[i]@f = 1; }");
        let Error::UnexpectedToken { found, expected } = err else {
            panic!("Expected an unexpected-token fault");
        };
        assert_eq!(found.kind, TokenKind::At);
        assert_eq!(expected, vec![TokenKind::Assign]);

        // a third index level is rejected the same way
        let err = parse_module_err("function void f() { m[i][j][k] = 1; }");
        let Error::UnexpectedToken { found, .. } = err else {
            panic!("Expected an unexpected-token fault");
        };
        assert_eq!(found.kind, TokenKind::LBracket);
    }

    #[test]
    fn test_call_statement() {
        let stmt = parse_stmt_str("print(x);");
        let StmtKind::Call(call) = stmt.kind else {
            panic!("Expected call statement");
        };
        assert!(matches!(call.kind, ExprKind::Call { name, .. } if name == "print"));
    }

    #[test]
    fn test_value_def_and_var_decl() {
        let stmt = parse_stmt_str("val int x = 1;");
        assert!(matches!(stmt.kind, StmtKind::ValueDefinition { name, .. } if name == "x"));

        let stmt = parse_stmt_str("var float y;");
        assert!(matches!(stmt.kind, StmtKind::VariableDeclaration { name, .. } if name == "y"));

        // val requires an initializer, var forbids one
        assert!(matches!(parse_module_err("function void f() { val int x; }"), Error::UnexpectedToken { .. }));
        assert!(matches!(parse_module_err("function void f() { var int y = 1; }"), Error::UnexpectedToken { .. }));
    }

    #[test]
    fn test_vector_and_matrix_types() {
        let stmt = parse_stmt_str("val vector<float>[3] v = x;");
        let StmtKind::ValueDefinition { type_specifier, .. } = stmt.kind else {
            panic!("Expected value definition");
        };
        let TypeKind::Vector { element, size } = type_specifier.kind else {
            panic!("Expected vector type");
        };
        assert_eq!(element, ElementType::Float);
        assert!(matches!(size.kind, ExprKind::IntLiteral(3)));

        let stmt = parse_stmt_str("var matrix<int>[2][n] m;");
        let StmtKind::VariableDeclaration { type_specifier, .. } = stmt.kind else {
            panic!("Expected variable declaration");
        };
        assert!(matches!(type_specifier.kind, TypeKind::Matrix { element: ElementType::Int, .. }));

        let stmt = parse_stmt_str("var P p;");
        let StmtKind::VariableDeclaration { type_specifier, .. } = stmt.kind else {
            panic!("Expected variable declaration");
        };
        assert!(matches!(type_specifier.kind, TypeKind::Record(name) if name == "P"));
    }

    #[test]
    fn test_structure_element_type_is_numeric_only() {
        let err = parse_module_err("function void f() { var vector<bool>[2] v; }");
        let Error::UnexpectedToken { found, expected } = err else {
            panic!("Expected an unexpected-token fault");
        };
        assert_eq!(found.kind, TokenKind::Bool);
        assert_eq!(expected, vec![TokenKind::Int, TokenKind::Float]);
    }

    #[test]
    fn test_for_loop() {
        let stmt = parse_stmt_str("for (i = 0; i < n; i = i + 1) { x = i; }");
        let StmtKind::ForLoop { init_name, update_name, body, .. } = stmt.kind else {
            panic!("Expected for loop");
        };
        assert_eq!(init_name, "i");
        assert_eq!(update_name, "i");
        assert!(matches!(body.kind, StmtKind::Compound(_)));
    }

    #[test]
    fn test_foreach_loop() {
        let stmt = parse_stmt_str("foreach (val int e : v) x = e;");
        let StmtKind::ForEachLoop { iterator, source, .. } = stmt.kind else {
            panic!("Expected foreach loop");
        };
        assert_eq!(iterator.name, "e");
        assert!(!iterator.is_mutable);
        assert_eq!(ident(&source), "v");
    }

    #[test]
    fn test_dangling_else_binds_to_nearest_if() {
        let stmt = parse_stmt_str("if (a) if (b) x = 1; else x = 2;");
        let StmtKind::If { then_branch, else_branch, .. } = stmt.kind else {
            panic!("Expected if statement");
        };
        assert!(else_branch.is_none(), "else must not attach to the outer if");
        let StmtKind::If { else_branch: inner_else, .. } = then_branch.kind else {
            panic!("Expected nested if in the then branch");
        };
        assert!(inner_else.is_some(), "else must attach to the inner if");
    }

    #[test]
    fn test_switch_is_syntactically_permissive() {
        // zero branches
        let stmt = parse_stmt_str("switch (x) { }");
        let StmtKind::Switch { cases, defaults, .. } = stmt.kind else {
            panic!("Expected switch statement");
        };
        assert!(cases.is_empty());
        assert!(defaults.is_empty());

        // several cases and defaults in any order; uniqueness is checked later
        let stmt = parse_stmt_str(
            "switch (x) { case 1: y = 1; default: y = 0; case 2: y = 2; default: y = 9; }",
        );
        let StmtKind::Switch { cases, defaults, .. } = stmt.kind else {
            panic!("Expected switch statement");
        };
        assert_eq!(cases.len(), 2);
        assert_eq!(defaults.len(), 2);
        assert!(matches!(cases[1].condition.kind, ExprKind::IntLiteral(2)));
    }

    #[test]
    fn test_compound_statement() {
        let stmt = parse_stmt_str("{ x = 1; y = 2; }");
        assert!(matches!(stmt.kind, StmtKind::Compound(body) if body.len() == 2));
    }

    #[test]
    fn test_node_locations() {
        let module = parse_module_str("function int f() {\n  return 1;\n}");
        let f = &module.functions[0];
        assert_eq!(f.location.line, 1);
        assert_eq!(f.location.col, 1);
        assert_eq!(f.body[0].location.line, 2);
        assert_eq!(f.body[0].location.col, 3);
    }

    #[test]
    fn test_truncated_stream_is_malformed() {
        // no Eof terminator: pulling past the last token is a stream fault
        let tokens = vec![Token::new(TokenKind::Ident, "x", 1, 1)];
        let mut parser = Parser::new(tokens);
        let err = parser.parse_expr().expect_err("Parsing should fail");
        assert!(matches!(err, Error::MalformedTokenStream { .. }), "got {:?}", err);
    }

    #[test]
    fn test_error_token_is_malformed_stream() {
        let tokens = vec![
            Token::new(TokenKind::IntLit, "1", 1, 1),
            Token::new(TokenKind::Plus, "+", 1, 3),
            Token::new(TokenKind::Error, "$", 1, 5),
            Token::new(TokenKind::Eof, "", 1, 6),
        ];
        let mut parser = Parser::new(tokens);
        let err = parser.parse_expr().expect_err("Parsing should fail");
        let Error::MalformedTokenStream { location } = err else {
            panic!("Expected a malformed-stream fault");
        };
        assert_eq!(location.line, 1);
        assert_eq!(location.col, 5);
    }

    #[test]
    fn test_module_roundtrip_with_records_and_functions() {
        let src = "
            record Vec2 { val float x; val float y; }
            function float norm(Vec2 p) {
                return p@x * p@x + p@y * p@y;
            }
            function void main() {
                val Vec2 p = @Vec2[1.0, 2.0];
                print(norm(p));
            }
        ";
        let module = parse_module_str(src);
        assert_eq!(module.records.len(), 1);
        assert_eq!(module.functions.len(), 2);
        assert_eq!(module.functions[0].name, "norm");
        assert_eq!(module.functions[1].name, "main");
    }
}
