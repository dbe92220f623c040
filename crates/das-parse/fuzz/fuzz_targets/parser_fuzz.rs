//! Fuzz target for the parser
//!
//! Each input byte picks a token kind; literal and leader tokens take their
//! text from the following bytes. This reaches deep nesting, odd pushback
//! sequences and malformed redirection leaders.
//!
//! Run with: cargo +nightly fuzz run parser_fuzz -- -max_total_time=300

#![no_main]

use das_parse::{ErrorKind, ParseLimits, Parser, SourceBuilder, TokenKind};
use libfuzzer_sys::fuzz_target;

const KINDS: [TokenKind; 13] = [
    TokenKind::Bare,
    TokenKind::SingleQuoted,
    TokenKind::DoubleQuoted,
    TokenKind::Pipe,
    TokenKind::Caret,
    TokenKind::Dollar,
    TokenKind::LParen,
    TokenKind::RParen,
    TokenKind::LBracket,
    TokenKind::RBracket,
    TokenKind::RedirLeader,
    TokenKind::Space,
    TokenKind::EndOfLine,
];

fuzz_target!(|data: &[u8]| {
    // Limit input size
    if data.len() > 4_096 {
        return;
    }

    let mut builder = SourceBuilder::new();
    let mut bytes = data.iter();
    while let Some(&b) = bytes.next() {
        let kind = KINDS[b as usize % KINDS.len()];
        let text = match kind {
            TokenKind::Bare => {
                let n = bytes.next().map_or(1, |&n| n as usize % 4 + 1);
                "ab=".chars().cycle().skip(n % 3).take(n).collect::<String>()
            }
            TokenKind::SingleQuoted => {
                let n = bytes.next().map_or(0, |&n| n as usize % 4);
                format!("'{}'", "x'".repeat(n))
            }
            TokenKind::DoubleQuoted => {
                let escape = bytes.next().map_or('n', |&e| e as char);
                format!("\"a\\{}\"", escape.escape_default())
            }
            TokenKind::RedirLeader => {
                let leaders = ["<", "<>", ">", ">>", "<<", ">[2]", ">[2=1]", ">[3=]", ">[x=]"];
                let i = bytes.next().map_or(0, |&i| i as usize % leaders.len());
                leaders[i].to_string()
            }
            TokenKind::Pipe => "|".to_string(),
            TokenKind::Caret => "^".to_string(),
            TokenKind::Dollar => "$".to_string(),
            TokenKind::LParen => "(".to_string(),
            TokenKind::RParen => ")".to_string(),
            TokenKind::LBracket => "[".to_string(),
            TokenKind::RBracket => "]".to_string(),
            TokenKind::Space => " ".to_string(),
            TokenKind::EndOfLine | TokenKind::EndOfInput => "\n".to_string(),
        };
        builder = builder.push(kind, &text);
    }

    let (text, source) = builder.into_source();
    let result = Parser::new("fuzz")
        .with_limits(ParseLimits::new().max_depth(64))
        .parse(&text, source);

    // Errors are fine; internal invariant violations and panics are not
    if let Err(err) = result {
        assert!(!matches!(err.kind, ErrorKind::Internal(_)), "{}", err.render());
    }
});
