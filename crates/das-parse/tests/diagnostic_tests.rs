//! Diagnostics: message text, location and pointer rendering

use das_parse::{ErrorKind, LimitExceeded, ParseLimits, Parser, SourceBuilder, TokenVec};
use insta::assert_snapshot;

fn error(builder: SourceBuilder) -> das_parse::Error {
    let (text, source) = builder.into_source();
    Parser::new("script.das")
        .parse(&text, source)
        .expect_err("parse should fail")
}

#[test]
fn unexpected_token_message() {
    let err = error(SourceBuilder::new().bare("echo").space(" ").rbracket());
    assert_snapshot!(err.to_string(), @"script.das:1:6: unexpected `]` in end of pipeline");
}

#[test]
fn diagnostic_keeps_source_and_name() {
    let err = error(SourceBuilder::new().bare("a").pipe().pipe());
    assert_eq!(err.name, "script.das");
    assert_eq!(err.source_text, "a||");
    assert_eq!(err.offset, 2);
    assert_eq!((err.line, err.column), (1, 3));
}

#[test]
fn pointer_rendering() {
    let err = error(
        SourceBuilder::new()
            .bare("echo")
            .space(" ")
            .lparen()
            .bare("a")
            .space(" ")
            .bare("b"),
    );
    assert_snapshot!(err.render(), @r"
    script.das:1:10: unexpected end of input in factor of item list
      echo (a b
               ^
    ");
}

#[test]
fn line_and_column_on_later_line() {
    // Tokens of the first line were consumed by an earlier parse; the
    // diagnostic still reports positions relative to the whole text.
    let text = "ls\ncat )";
    let tokens = vec![
        das_parse::Token::new(das_parse::TokenKind::Bare, "cat", 3),
        das_parse::Token::new(das_parse::TokenKind::Space, " ", 6),
        das_parse::Token::new(das_parse::TokenKind::RParen, ")", 7),
    ];
    let err = Parser::new("multi.das")
        .parse(text, TokenVec::new(tokens, text.len()))
        .unwrap_err();
    assert_eq!((err.line, err.column), (2, 5));
    assert_eq!(err.source_line(), "cat )");
    assert_snapshot!(err.to_string(), @"multi.das:2:5: unexpected `)` in end of pipeline");
}

#[test]
fn redirection_messages() {
    let err = error(SourceBuilder::new().bare("x").redir("<<"));
    assert_snapshot!(err.message(), @r#"unexpected redirection direction "<<""#);

    let err = error(SourceBuilder::new().bare("x").redir(">[9=z]"));
    assert_snapshot!(err.message(), @r#"invalid old fd in qualified redirection "z""#);

    let err = error(SourceBuilder::new().bare("x").redir(">>[q]").bare("f"));
    assert_snapshot!(err.message(), @r#"invalid new fd in qualified redirection "q""#);
}

#[test]
fn decode_message_names_literal() {
    let err = error(SourceBuilder::new().double(r#""\c""#));
    assert_snapshot!(err.message(), @r#"invalid literal "\c": unknown escape sequence `\c`"#);
}

#[test]
fn depth_limit_message() {
    let (text, source) = SourceBuilder::new()
        .lbracket()
        .lbracket()
        .rbracket()
        .rbracket()
        .into_source();
    let err = Parser::new("deep.das")
        .with_limits(ParseLimits::new().max_depth(1))
        .parse(&text, source)
        .unwrap_err();
    assert_eq!(err.kind, ErrorKind::Limit(LimitExceeded::MaxDepth(1)));
    assert_eq!(err.offset, 1);
    assert_snapshot!(err.to_string(), @"deep.das:1:2: maximum nesting depth exceeded (1)");
}

#[test]
fn error_source_chain() {
    use std::error::Error as _;

    let err = error(SourceBuilder::new().rparen());
    let source = err.source().expect("diagnostic has a source");
    assert_eq!(source.to_string(), "unexpected `)` in factor");
}
