//! Grammar tests: tokenizing, verb extraction, segment parsing, parse
//! failures, and render round-trips.

use httprule::{
    parse, render_path, tokenize, ParseError, Parser, Segment, Variable, EOF,
};

fn lit(s: &str) -> Segment {
    Segment::Literal(s.to_string())
}

fn var(path: &str, segments: Vec<Segment>) -> Segment {
    Segment::Variable(Variable {
        field_path: path.to_string(),
        segments,
    })
}

// ==================== Tokenizer ====================

fn token_table() -> Vec<(&'static str, Vec<&'static str>)> {
    vec![
        ("", vec![EOF]),
        ("v1", vec!["v1", EOF]),
        ("v1/b", vec!["v1", "/", "b", EOF]),
        (
            "v1/endpoint/*",
            vec!["v1", "/", "endpoint", "/", "*", EOF],
        ),
        (
            "v1/endpoint/**",
            vec!["v1", "/", "endpoint", "/", "**", EOF],
        ),
        (
            "v1/b/{bucket_name=*}",
            vec!["v1", "/", "b", "/", "{", "bucket_name", "=", "*", "}", EOF],
        ),
        (
            "v1/b/{bucket_name=buckets/*}",
            vec![
                "v1", "/", "b", "/", "{", "bucket_name", "=", "buckets", "/", "*", "}", EOF,
            ],
        ),
        (
            "v1/b/{bucket_name=buckets/*}/o",
            vec![
                "v1", "/", "b", "/", "{", "bucket_name", "=", "buckets", "/", "*", "}", "/",
                "o", EOF,
            ],
        ),
        (
            "v1/b/{bucket_name=buckets/*}/o/{name}",
            vec![
                "v1", "/", "b", "/", "{", "bucket_name", "=", "buckets", "/", "*", "}", "/",
                "o", "/", "{", "name", "}", EOF,
            ],
        ),
        (
            "v1/a=b&c=d;e=f:g/endpoint.rdf",
            vec!["v1", "/", "a=b&c=d;e=f:g", "/", "endpoint.rdf", EOF],
        ),
    ]
}

#[test]
fn tokenize_splits_on_mode_delimiters() {
    for (src, want) in token_table() {
        let (tokens, verb) = tokenize(src);
        assert_eq!(tokens, want, "tokenize({:?})", src);
        assert_eq!(verb, None, "tokenize({:?}) verb", src);
    }
}

#[test]
fn tokenize_extracts_trailing_verb() {
    // appending ":LOCK" adds the verb without changing the token sequence
    for (src, want) in token_table() {
        let with_verb = format!("{}:LOCK", src);
        let (tokens, verb) = tokenize(&with_verb);
        assert_eq!(tokens, want, "tokenize({:?})", with_verb);
        assert_eq!(verb, Some("LOCK"), "tokenize({:?}) verb", with_verb);
    }
}

// ==================== Parser: valid token sequences ====================

#[test]
fn parse_segments_table() {
    let cases: Vec<(Vec<&str>, Vec<Segment>)> = vec![
        (vec!["v1", EOF], vec![lit("v1")]),
        // a bare slash token satisfies the wildcard delimiter class
        (vec!["/", EOF], vec![Segment::Wildcard]),
        (
            vec!["-._~!$&'()*+,;=:@", EOF],
            vec![lit("-._~!$&'()*+,;=:@")],
        ),
        (
            vec!["%e7%ac%ac%e4%b8%80%e7%89%88", EOF],
            vec![lit("%e7%ac%ac%e4%b8%80%e7%89%88")],
        ),
        (vec!["v1", "/", "*", EOF], vec![lit("v1"), Segment::Wildcard]),
        (
            vec!["v1", "/", "**", EOF],
            vec![lit("v1"), Segment::DeepWildcard],
        ),
        (
            vec!["{", "name", "}", EOF],
            vec![var("name", vec![Segment::Wildcard])],
        ),
        (
            vec!["{", "name", "=", "*", "}", EOF],
            vec![var("name", vec![Segment::Wildcard])],
        ),
        (
            vec!["{", "field", ".", "nested", ".", "nested2", "=", "*", "}", EOF],
            vec![var("field.nested.nested2", vec![Segment::Wildcard])],
        ),
        (
            vec!["{", "name", "=", "a", "/", "b", "/", "*", "}", EOF],
            vec![var("name", vec![lit("a"), lit("b"), Segment::Wildcard])],
        ),
        (
            vec![
                "v1", "/", "{", "name", ".", "nested", "=", "a", "/", "b", "/", "*", "}", "/",
                "o", "/", "{", "another_name", "=", "a", "/", "b", "/", "*", "/", "c", "}",
                "/", "**", EOF,
            ],
            vec![
                lit("v1"),
                var("name.nested", vec![lit("a"), lit("b"), Segment::Wildcard]),
                lit("o"),
                var(
                    "another_name",
                    vec![lit("a"), lit("b"), Segment::Wildcard, lit("c")],
                ),
                Segment::DeepWildcard,
            ],
        ),
    ];
    for (tokens, want) in cases {
        let mut parser = Parser::new(&tokens);
        let segments = match parser.top_level_segments() {
            Ok(s) => s,
            Err(e) => panic!("tokens {:?} failed to parse: {}", tokens, e),
        };
        assert_eq!(segments, want, "tokens {:?}", tokens);
        assert!(
            parser.remaining().is_empty(),
            "tokens {:?} not fully consumed: {:?}",
            tokens,
            parser.remaining()
        );
    }
}

#[test]
fn parser_records_accepted_tokens() {
    let tokens = ["v1", "/", "*", EOF];
    let mut parser = Parser::new(&tokens);
    parser.top_level_segments().expect("parse");
    assert_eq!(parser.accepted(), &["v1", "/", "*", EOF]);
    assert!(parser.remaining().is_empty());
}

#[test]
fn deep_wildcard_parses_in_non_trailing_position() {
    // the grammar does not force `**` into trailing position
    let tokens = ["**", "/", "v1", EOF];
    let segments = Parser::new(&tokens).top_level_segments().expect("parse");
    assert_eq!(segments, vec![Segment::DeepWildcard, lit("v1")]);
}

// ==================== Parser: invalid token sequences ====================

#[test]
fn parse_segments_errors() {
    let cases: Vec<Vec<&str>> = vec![
        // double slash inside one token is not a pchar literal
        vec!["//", EOF],
        // invalid literal
        vec!["a?b", EOF],
        // invalid percent-encoding
        vec!["%", EOF],
        vec!["%2", EOF],
        vec!["a%2z", EOF],
        // empty sequence
        vec![EOF],
        // unterminated variable
        vec!["{", "name", EOF],
        vec!["{", "name", "=", EOF],
        vec!["{", "name", "=", "*", EOF],
        // empty component in field path
        vec!["{", "name", ".", "}", EOF],
        vec!["{", "name", ".", ".", "nested", "}", EOF],
        // invalid character in identifier
        vec!["{", "field-name", "}", EOF],
        // no slash between segments
        vec!["v1", "endpoint", EOF],
        vec!["v1", "{", "name", "}", EOF],
    ];
    for tokens in cases {
        let mut parser = Parser::new(&tokens);
        let result = parser.top_level_segments();
        assert!(result.is_err(), "tokens {:?} parsed as {:?}", tokens, result);
    }
}

#[test]
fn trailing_token_reports_accepted_prefix() {
    let tokens = ["v1", "endpoint", EOF];
    let err = Parser::new(&tokens).top_level_segments().unwrap_err();
    match err {
        ParseError::TrailingToken { token, accepted } => {
            assert_eq!(token, "endpoint");
            assert_eq!(accepted, "v1");
        }
        other => panic!("expected a trailing-token error, got {}", other),
    }
}

#[test]
fn unterminated_variable_names_its_field_path() {
    let tokens = ["{", "buckets", ".", "name", EOF];
    let err = Parser::new(&tokens).top_level_segments().unwrap_err();
    match err {
        ParseError::InvalidSegment(inner) => match *inner {
            ParseError::UnterminatedVariable { ref field_path } => {
                assert_eq!(field_path, "buckets.name");
            }
            ref other => panic!("expected an unterminated-variable error, got {}", other),
        },
        other => panic!("expected an invalid-segment error, got {}", other),
    }
    // the rendered message carries the full chain
    let tokens = ["{", "name", EOF];
    let err = Parser::new(&tokens).top_level_segments().unwrap_err();
    let msg = err.to_string();
    assert!(msg.contains("unterminated variable"), "{}", msg);
    assert!(msg.contains("name"), "{}", msg);
}

#[test]
fn missing_sentinel_is_an_error_not_a_panic() {
    let tokens = ["v1"];
    let err = Parser::new(&tokens).top_level_segments().unwrap_err();
    assert!(matches!(err, ParseError::TrailingToken { .. }), "{}", err);
}

// ==================== parse() and rendering ====================

#[test]
fn parse_returns_template_with_verb() {
    let t = parse("v1/b/{bucket_name=buckets/*}:archive").expect("parse");
    assert_eq!(t.verb.as_deref(), Some("archive"));
    assert_eq!(t.segments.len(), 3);
    assert_eq!(
        t.segments[2],
        var("bucket_name", vec![lit("buckets"), Segment::Wildcard])
    );
}

#[test]
fn parse_defaults_variable_pattern_to_wildcard() {
    let t = parse("v1/o/{name}").expect("parse");
    assert_eq!(t.verb, None);
    assert_eq!(t.segments[2], var("name", vec![Segment::Wildcard]));
}

#[test]
fn parse_empty_template_fails() {
    assert!(parse("").is_err());
}

#[test]
fn render_normalizes_default_patterns() {
    let t = parse("o/{name}").expect("parse");
    assert_eq!(t.to_string(), "o/{name=*}");
    assert_eq!(render_path(&t.segments), "o/{name=*}");
}

#[test]
fn render_round_trip_is_stable() {
    let templates = [
        "v1",
        "v1/b",
        "v1/endpoint/*",
        "v1/endpoint/**",
        "v1/b/{bucket_name=buckets/*}/o/{name}",
        "v1/{name.nested.nested2=a/b/*}/o/{another_name=a/b/*/c}/**",
        "v1/shelves/{shelf}/books/{book.id}:archive",
        "a::b",
    ];
    for src in templates {
        let first = parse(src).expect("parse");
        let rendered = first.to_string();
        let second = match parse(&rendered) {
            Ok(t) => t,
            Err(e) => panic!("re-parse of {:?} (from {:?}) failed: {}", rendered, src, e),
        };
        assert_eq!(first, second, "round trip of {:?} via {:?}", src, rendered);
    }
}
