use super::{
    parse, tokenize, Expected, Expression, LexError, Location, Name, ParseError, Program,
    Statement, TokenType as TT,
};
use pretty_assertions::assert_eq;
use proptest::prelude::*;

fn parse_string(input: &str) -> Result<Program, ParseError> {
    let tokens = tokenize(input).expect("input should tokenize");
    parse(&tokens)
}

fn parse_tree_matches(input: &str, tree_repr: &str) {
    let result = parse_string(input);
    match result {
        Ok(ref tree) => {
            let result_repr = format!("{tree:?}");
            assert!(
                result_repr.contains(tree_repr),
                "\nFailed to parse \"{}\":\nexpected \"{}\" somewhere in \"{}\"\n",
                input,
                tree_repr,
                result_repr
            )
        }
        Err(err) => panic!("\nFailed to parse \"{input}\": {err}\n"),
    }
}

fn assert_raises_error(input: &str, msg: &str) {
    match parse_string(input) {
        Err(err) => assert_eq!(msg, err.to_string()),
        Ok(tree) => panic!("\nExpected \"{input}\" to fail, got {tree:?}\n"),
    }
}

fn token_types(input: &str) -> Vec<TT> {
    tokenize(input)
        .expect("input should tokenize")
        .iter()
        .map(|token| token.typ())
        .collect()
}

fn lexemes(input: &str) -> Vec<String> {
    tokenize(input)
        .expect("input should tokenize")
        .iter()
        .map(|token| token.lexeme().to_string())
        .collect()
}

fn ident(name: &str) -> Expression {
    Expression::Identifier(Name {
        name: name.to_string(),
        span: Default::default(),
    })
}

#[test]
fn test_tokenize_declaration() {
    assert_eq!(
        token_types("var x = 1 + 2;"),
        vec![
            TT::Let,
            TT::Identifier,
            TT::Assignment,
            TT::Number,
            TT::BinaryOperator,
            TT::Number,
            TT::Semicolon,
            TT::EndOfFile,
        ]
    );
    assert_eq!(
        lexemes("var x = 1 + 2;"),
        vec!["var", "x", "=", "1", "+", "2", ";", ""]
    );
}

#[test]
fn test_tokenize_keywords_need_whole_words() {
    assert_eq!(token_types("variable"), vec![TT::Identifier, TT::EndOfFile]);
    assert_eq!(token_types("typex"), vec![TT::Identifier, TT::EndOfFile]);
    assert_eq!(
        token_types("type null var"),
        vec![TT::Type, TT::Null, TT::Let, TT::EndOfFile]
    );
}

#[test]
fn test_tokenize_names_and_numbers() {
    assert_eq!(lexemes("größe"), vec!["größe", ""]);
    assert_eq!(
        token_types("x1"),
        vec![TT::Identifier, TT::Number, TT::EndOfFile]
    );
    assert_eq!(lexemes("007"), vec!["007", ""]);
}

#[test]
fn test_tokenize_operators_are_greedy() {
    assert_eq!(
        lexemes("a==b>=c=d<e!=f"),
        vec!["a", "==", "b", ">=", "c", "=", "d", "<", "e", "!=", "f", ""]
    );
    assert_eq!(
        token_types("a <= b"),
        vec![
            TT::Identifier,
            TT::ComparisonOperator,
            TT::Identifier,
            TT::EndOfFile
        ]
    );
}

#[test]
fn test_tokenize_skips_lone_exclamation() {
    assert_eq!(lexemes("!x"), vec!["x", ""]);
    assert_eq!(lexemes("!!"), vec![""]);
}

#[test]
fn test_tokenize_locations() {
    let tokens = tokenize("var x;\n  x;").unwrap();
    assert_eq!(tokens[3].lexeme(), "x");
    assert_eq!(tokens[3].span.start(), Location::new(1, 2));
    assert_eq!(tokens[3].span.end(), Location::new(1, 3));
    let eof = tokens.last().unwrap();
    assert_eq!(eof.typ(), TT::EndOfFile);
    assert_eq!(eof.span.start(), Location::new(1, 4));
}

#[test]
fn test_tokenize_columns_count_characters() {
    let tokens = tokenize("größe = 1;").unwrap();
    assert_eq!(tokens[1].span.start(), Location::new(0, 6));
    assert_eq!(tokens[0].span.end(), Location::new(0, 5));
    assert_eq!(
        tokenize("größe @").unwrap_err(),
        LexError::UnexpectedCharacter {
            character: '@',
            location: Location::new(0, 6),
        }
    );
    assert_eq!(
        tokenize("größe @").unwrap_err().to_string(),
        "unexpected character '@' at line 1, column 7"
    );
}

/// Source text drawn only from characters the tokenizer recognizes.
fn recognized_source() -> impl Strategy<Value = String> {
    prop::string::string_regex(r"[a-zA-Zäöüß0-9 \t\r\n=!<>+*/%(){},.;-]{0,80}")
        .expect("valid regex")
}

proptest! {
    #[test]
    fn test_tokenize_is_total_and_deterministic(source in recognized_source()) {
        let tokens = tokenize(&source);
        prop_assert!(tokens.is_ok(), "failed to tokenize {:?}: {:?}", source, tokens);
        let tokens = tokens.unwrap();
        prop_assert_eq!(tokens.last().map(|token| token.typ()), Some(TT::EndOfFile));
        prop_assert_eq!(
            tokens.iter().filter(|token| token.typ() == TT::EndOfFile).count(),
            1
        );
        prop_assert_eq!(tokenize(&source), Ok(tokens));
    }
}

#[test]
fn test_tokenize_empty_source() {
    assert_eq!(token_types(""), vec![TT::EndOfFile]);
    assert_eq!(token_types(" \t\r\n\n"), vec![TT::EndOfFile]);
}

#[test]
fn test_tokenize_unexpected_character() {
    assert_eq!(
        tokenize("x @ y"),
        Err(LexError::UnexpectedCharacter {
            character: '@',
            location: Location::new(0, 2),
        })
    );
    assert_eq!(
        tokenize("x;\ny # z").unwrap_err().to_string(),
        "unexpected character '#' at line 2, column 3"
    );
}

#[test]
fn test_empty_program() {
    assert_eq!(parse_string("").unwrap(), Program::default());
    assert_eq!(parse(&[]).unwrap(), Program::default());
}

#[test]
fn test_variable_declaration() {
    parse_tree_matches(
        "var x = 1;",
        "VariableDeclaration(Name(\"x\"), Some(NumericLiteral(1)))",
    );
    parse_tree_matches("var x;", "VariableDeclaration(Name(\"x\"), None)");
    parse_tree_matches(
        "var n = null;",
        "VariableDeclaration(Name(\"n\"), Some(NullLiteral))",
    );
}

#[test]
fn test_type_declaration() {
    parse_tree_matches(
        "type Point = { x; y; }",
        "TypeDeclaration(TypeDeclaration { name: Name(\"Point\"), properties: \
         [PropertyDeclaration(Name(\"x\")), PropertyDeclaration(Name(\"y\"))] })",
    );
    parse_tree_matches("type Unit = {};", "properties: []");
}

#[test]
fn test_arithmetic_precedence() {
    parse_tree_matches(
        "2 + 3 * 4;",
        "BinaryOperation(Plus, (NumericLiteral(2), BinaryOperation(Times, \
         (NumericLiteral(3), NumericLiteral(4)))))",
    );
    parse_tree_matches(
        "(2 + 3) * 4;",
        "BinaryOperation(Times, (BinaryOperation(Plus, (NumericLiteral(2), \
         NumericLiteral(3))), NumericLiteral(4)))",
    );
    parse_tree_matches(
        "8 - 2 - 1;",
        "BinaryOperation(Minus, (BinaryOperation(Minus, (NumericLiteral(8), \
         NumericLiteral(2))), NumericLiteral(1)))",
    );
    parse_tree_matches(
        "7 % 4 / 2;",
        "BinaryOperation(Divide, (BinaryOperation(Modulo, (NumericLiteral(7), \
         NumericLiteral(4))), NumericLiteral(2)))",
    );
}

#[test]
fn test_comparison_binds_loosest() {
    parse_tree_matches(
        "1 + 1 == 2;",
        "Comparison(Equal, (BinaryOperation(Plus, (NumericLiteral(1), \
         NumericLiteral(1))), NumericLiteral(2)))",
    );
    parse_tree_matches(
        "1 < 2 != 0;",
        "Comparison(NotEqual, (Comparison(LessThan, (NumericLiteral(1), \
         NumericLiteral(2))), NumericLiteral(0)))",
    );
}

#[test]
fn test_assignment() {
    let program = parse_string("x = x + 1;").unwrap();
    assert_eq!(
        program.body,
        vec![Statement::Expression(Expression::Assignment(
            Box::new(ident("x")),
            Box::new(Expression::BinaryOperation(
                super::BinaryOperator::Plus,
                Box::new((ident("x"), Expression::NumericLiteral(1))),
            )),
        ))]
    );
    parse_tree_matches(
        "p.x = 5;",
        "Assignment(Member(Identifier(Name(\"p\")), Name(\"x\")), NumericLiteral(5))",
    );
}

#[test]
fn test_member_and_call() {
    parse_tree_matches(
        "a.b.c;",
        "Member(Member(Identifier(Name(\"a\")), Name(\"b\")), Name(\"c\"))",
    );
    parse_tree_matches(
        "Point(Point);",
        "Call(Identifier(Name(\"Point\")), [Identifier(Name(\"Point\"))])",
    );
    parse_tree_matches("f();", "Call(Identifier(Name(\"f\")), [])");
    parse_tree_matches(
        "f(1, 2)(3);",
        "Call(Call(Identifier(Name(\"f\")), [NumericLiteral(1), NumericLiteral(2)]), \
         [NumericLiteral(3)])",
    );
    parse_tree_matches(
        "a.b(1);",
        "Call(Member(Identifier(Name(\"a\")), Name(\"b\")), [NumericLiteral(1)])",
    );
}

#[test]
fn test_statement_semicolons_are_optional() {
    let with = parse_string("x; y;").unwrap();
    let without = parse_string("x y").unwrap();
    assert_eq!(with, without);
    assert_eq!(with.body.len(), 2);
    assert_eq!(
        parse_string("type P = { x; }; 1").unwrap().body.len(),
        2
    );
}

#[test]
fn test_names_compare_without_locations() {
    let first = parse_string("x;").unwrap();
    let second = parse_string("\n\n    x").unwrap();
    assert_eq!(first, second);
}

#[test]
fn test_assignment_requires_semicolon() {
    assert_raises_error(
        "x = 1",
        "expected ';' but found EndOfFile('') in assignment at line 1, column 6",
    );
}

#[test]
fn test_variable_declaration_errors() {
    assert_raises_error(
        "var = 1;",
        "expected identifier but found Assignment('=') in variable declaration at line 1, column 5",
    );
    assert_raises_error(
        "var x = 1",
        "expected ';' but found EndOfFile('') in variable declaration at line 1, column 10",
    );
    assert_raises_error(
        "var x 1;",
        "expected '=' but found Number('1') in variable declaration at line 1, column 7",
    );
}

#[test]
fn test_type_declaration_errors() {
    assert_raises_error(
        "type P = { x }",
        "expected ';' but found CloseBrace('}') in type declaration at line 1, column 14",
    );
    assert_raises_error(
        "type P { x; }",
        "expected '=' but found OpenBrace('{') in type declaration at line 1, column 8",
    );
    assert_raises_error(
        "type P = { x;",
        "expected '}' but found EndOfFile('') in type declaration at line 1, column 14",
    );
}

#[test]
fn test_expression_errors() {
    assert_raises_error(
        "1 +;",
        "expected expression but found Semicolon(';') in program at line 1, column 4",
    );
    assert_raises_error(
        "(1 + 2",
        "expected ')' but found EndOfFile('') in parenthesized expression at line 1, column 7",
    );
    assert_raises_error(
        "p.;",
        "expected identifier but found Semicolon(';') in member access at line 1, column 3",
    );
    assert_raises_error(
        "f(1,);",
        "expected expression but found CloseParen(')') in argument list at line 1, column 5",
    );
}

#[test]
fn test_first_error_stops_parsing() {
    let err = parse_string("var x = ;\nvar = 2;").unwrap_err();
    assert_eq!(
        err,
        ParseError::UnexpectedToken {
            expected: Expected::Expression,
            actual: tokenize("var x = ;").unwrap()[3].clone(),
            context: "variable declaration",
            location: Location::new(0, 8),
        }
    );
}

#[test]
fn test_numeric_literal_out_of_range() {
    assert_eq!(
        parse_string("x = 99999999999999999999;"),
        Err(ParseError::InvalidNumericLiteral {
            literal: "99999999999999999999".to_string(),
            location: Location::new(0, 4),
        })
    );
    parse_tree_matches("9223372036854775807;", "NumericLiteral(9223372036854775807)");
}
