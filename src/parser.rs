//! Tokenizer and recursive-descent parser for path templates.
//!
//! ```text
//! Segments  := Segment ('/' Segment)*
//! Segment   := '*' | '**' | Literal | Variable
//! Variable  := '{' FieldPath ('=' Segments)? '}'
//! FieldPath := Ident ('.' Ident)*
//! ```
//!
//! [`tokenize`] splits a template into delimiter and span tokens plus an
//! optional trailing verb; [`Parser`] then consumes the token sequence
//! strictly left to right, no backtracking. Literal tokens are restricted
//! to RFC 3986 pchars (percent-encoding included), field-path components
//! to schema identifiers.

use crate::ast::{Segment, Template, Variable};

/// Sentinel terminating every token sequence.
pub const EOF: &str = "\u{0}";

/// Terminal classes accepted by the parser.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TermType {
    Slash,
    Star,
    DoubleStar,
    Dot,
    Equals,
    OpenBrace,
    CloseBrace,
    Ident,
    Literal,
    Eof,
}

impl TermType {
    fn delimiter(self) -> Option<&'static str> {
        match self {
            TermType::Slash => Some("/"),
            TermType::Star => Some("*"),
            TermType::DoubleStar => Some("**"),
            TermType::Dot => Some("."),
            TermType::Equals => Some("="),
            TermType::OpenBrace => Some("{"),
            TermType::CloseBrace => Some("}"),
            _ => None,
        }
    }
}

impl std::fmt::Display for TermType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            TermType::Slash => "/",
            TermType::Star => "*",
            TermType::DoubleStar => "**",
            TermType::Dot => ".",
            TermType::Equals => "=",
            TermType::OpenBrace => "{",
            TermType::CloseBrace => "}",
            TermType::Ident => "ident",
            TermType::Literal => "literal",
            TermType::Eof => "EOF",
        };
        f.write_str(s)
    }
}

/// Failure raised while parsing a template's token sequence.
///
/// Every failure is total: no partial segment tree is returned.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ParseError {
    /// The head token did not match the terminal class the grammar needed.
    #[error("expected {expected} but got {found:?}")]
    UnexpectedToken { expected: TermType, found: String },

    /// A structurally valid parse left tokens unconsumed.
    #[error("unexpected token {token:?} after segments {accepted:?}")]
    TrailingToken { token: String, accepted: String },

    /// `{` without a matching `}`.
    #[error("unterminated variable segment: {field_path}")]
    UnterminatedVariable { field_path: String },

    /// A token in segment position matched none of the segment forms.
    #[error("segment is neither a wildcard, literal, nor variable: {0}")]
    InvalidSegment(#[source] Box<ParseError>),

    /// The `= pattern` part of a variable failed to parse.
    #[error("invalid segment in variable {field_path:?}: {source}")]
    InvalidVariablePattern {
        field_path: String,
        #[source]
        source: Box<ParseError>,
    },

    /// A field-path component after `.` was not an identifier.
    #[error("invalid field path component: {0}")]
    InvalidFieldPathComponent(#[source] Box<ParseError>),

    /// Identifiers must be non-empty.
    #[error("empty identifier")]
    EmptyIdent,

    /// Identifiers must not start with a digit.
    #[error("identifier starting with digit: {0:?}")]
    IdentStartsWithDigit(String),

    /// Identifiers are limited to letters, digits, and underscores.
    #[error("invalid character {ch:?} (U+{code:04X}) in identifier {ident:?}", code = u32::from(*.ch))]
    InvalidIdentChar { ch: char, ident: String },

    /// Literals are limited to RFC 3986 pchars.
    #[error("invalid character {ch:?} (U+{code:04X}) in path segment", code = u32::from(*.ch))]
    InvalidPathChar { ch: char },

    /// Percent-encoding triplets must be `%` plus two hex digits.
    #[error("invalid hex digit {ch:?} (U+{code:04X}) in percent-encoding", code = u32::from(*.ch))]
    InvalidHexDigit { ch: char },

    /// A literal ended in the middle of a percent-encoding triplet.
    #[error("incomplete percent-encoding in {0:?}")]
    IncompletePctEncoding(String),
}

#[derive(Clone, Copy)]
enum ScanMode {
    Init,
    Field,
    Nested,
}

/// Split a template (leading `/` already stripped) into tokens plus an
/// optional trailing verb.
///
/// Each delimiter active in the current scan mode becomes its own token
/// and the spans between delimiters become literal or identifier tokens.
/// Only the final token is inspected for a `:verb` suffix; colons earlier
/// in the template stay part of their literal. The returned sequence
/// always ends with [`EOF`].
pub fn tokenize(path: &str) -> (Vec<&str>, Option<&str>) {
    if path.is_empty() {
        return (vec![EOF], None);
    }

    let mut tokens = Vec::new();
    let mut rest = path;
    let mut mode = ScanMode::Init;
    while !rest.is_empty() {
        let idx = match mode {
            ScanMode::Init => rest.find(['/', '{']),
            ScanMode::Field => rest.find(['.', '=', '}']),
            ScanMode::Nested => rest.find(['/', '}']),
        };
        let Some(idx) = idx else {
            tokens.push(rest);
            break;
        };
        match rest.as_bytes()[idx] {
            b'{' => mode = ScanMode::Field,
            b'=' => mode = ScanMode::Nested,
            b'}' => mode = ScanMode::Init,
            _ => {}
        }
        if idx > 0 {
            tokens.push(&rest[..idx]);
        }
        tokens.push(&rest[idx..idx + 1]);
        rest = &rest[idx + 1..];
    }

    // Only the trailing token can carry a verb suffix.
    let mut verb = None;
    if let Some(&last) = tokens.last() {
        match last.rfind(':') {
            Some(0) => {
                tokens.pop();
                verb = Some(&last[1..]);
            }
            Some(idx) => {
                if let Some(t) = tokens.last_mut() {
                    *t = &last[..idx];
                }
                verb = Some(&last[idx + 1..]);
            }
            None => {}
        }
    }

    tokens.push(EOF);
    (tokens, verb.filter(|v| !v.is_empty()))
}

/// Recursive-descent parser over a tokenized template.
///
/// Holds the remaining tokens plus every token accepted so far, the latter
/// kept only for error reporting. Construct one per parse; state is never
/// reused.
#[derive(Debug)]
pub struct Parser<'a> {
    tokens: &'a [&'a str],
    accepted: Vec<&'a str>,
}

impl<'a> Parser<'a> {
    /// The token sequence must end with [`EOF`].
    pub fn new(tokens: &'a [&'a str]) -> Self {
        Parser {
            tokens,
            accepted: Vec::new(),
        }
    }

    /// Tokens not yet consumed.
    pub fn remaining(&self) -> &[&'a str] {
        self.tokens
    }

    /// Tokens accepted so far, in order, sentinel included.
    pub fn accepted(&self) -> &[&'a str] {
        &self.accepted
    }

    /// Parse the whole sequence into top-level segments; the sentinel must
    /// directly follow them.
    pub fn top_level_segments(&mut self) -> Result<Vec<Segment>, ParseError> {
        let segments = self.segments()?;
        if self.accept(TermType::Eof).is_err() {
            return Err(ParseError::TrailingToken {
                token: self.tokens.first().copied().unwrap_or_default().to_string(),
                accepted: self.accepted.concat(),
            });
        }
        Ok(segments)
    }

    fn segments(&mut self) -> Result<Vec<Segment>, ParseError> {
        let mut segments = vec![self.segment()?];
        while self.accept(TermType::Slash).is_ok() {
            segments.push(self.segment()?);
        }
        Ok(segments)
    }

    fn segment(&mut self) -> Result<Segment, ParseError> {
        if self.accept(TermType::Star).is_ok() {
            return Ok(Segment::Wildcard);
        }
        if self.accept(TermType::DoubleStar).is_ok() {
            return Ok(Segment::DeepWildcard);
        }
        if let Ok(lit) = self.literal() {
            return Ok(lit);
        }
        self.variable()
            .map_err(|e| ParseError::InvalidSegment(Box::new(e)))
    }

    fn literal(&mut self) -> Result<Segment, ParseError> {
        let lit = self.accept(TermType::Literal)?;
        Ok(Segment::Literal(lit.to_string()))
    }

    fn variable(&mut self) -> Result<Segment, ParseError> {
        self.accept(TermType::OpenBrace)?;
        let field_path = self.field_path()?;
        let segments = if self.accept(TermType::Equals).is_ok() {
            self.segments()
                .map_err(|e| ParseError::InvalidVariablePattern {
                    field_path: field_path.clone(),
                    source: Box::new(e),
                })?
        } else {
            vec![Segment::Wildcard]
        };
        if self.accept(TermType::CloseBrace).is_err() {
            return Err(ParseError::UnterminatedVariable { field_path });
        }
        Ok(Segment::Variable(Variable {
            field_path,
            segments,
        }))
    }

    fn field_path(&mut self) -> Result<String, ParseError> {
        let mut components = vec![self.accept(TermType::Ident)?];
        while self.accept(TermType::Dot).is_ok() {
            let c = self
                .accept(TermType::Ident)
                .map_err(|e| ParseError::InvalidFieldPathComponent(Box::new(e)))?;
            components.push(c);
        }
        Ok(components.join("."))
    }

    /// Consume the head token if it matches the terminal class, recording
    /// it in the accepted list.
    fn accept(&mut self, term: TermType) -> Result<&'a str, ParseError> {
        let Some(&t) = self.tokens.first() else {
            return Err(ParseError::UnexpectedToken {
                expected: term,
                found: String::new(),
            });
        };
        match term {
            TermType::Eof => {
                if t != EOF {
                    return Err(ParseError::UnexpectedToken {
                        expected: term,
                        found: t.to_string(),
                    });
                }
            }
            TermType::Ident => expect_ident(t)?,
            TermType::Literal => expect_pchars(t)?,
            _ => {
                // A bare slash token satisfies any single-delimiter class.
                if Some(t) != term.delimiter() && t != "/" {
                    return Err(ParseError::UnexpectedToken {
                        expected: term,
                        found: t.to_string(),
                    });
                }
            }
        }
        self.tokens = &self.tokens[1..];
        self.accepted.push(t);
        Ok(t)
    }
}

/// Tokenize and parse a template whose leading `/` is already stripped.
pub fn parse(path: &str) -> Result<Template, ParseError> {
    let (tokens, verb) = tokenize(path);
    let segments = Parser::new(&tokens).top_level_segments()?;
    Ok(Template {
        segments,
        verb: verb.map(str::to_string),
    })
}

/// RFC 3986 pchar check for literal tokens.
fn expect_pchars(t: &str) -> Result<(), ParseError> {
    // hex digits still owed to an open % triplet
    let mut pending: u8 = 0;
    for ch in t.chars() {
        if pending > 0 {
            if !ch.is_ascii_hexdigit() {
                return Err(ParseError::InvalidHexDigit { ch });
            }
            pending -= 1;
            continue;
        }
        match ch {
            // unreserved
            'A'..='Z' | 'a'..='z' | '0'..='9' | '-' | '.' | '_' | '~' => {}
            // sub-delims
            '!' | '$' | '&' | '\'' | '(' | ')' | '*' | '+' | ',' | ';' | '=' => {}
            // rest of pchar
            ':' | '@' => {}
            '%' => pending = 2,
            _ => return Err(ParseError::InvalidPathChar { ch }),
        }
    }
    if pending > 0 {
        return Err(ParseError::IncompletePctEncoding(t.to_string()));
    }
    Ok(())
}

/// Schema identifier check: `[A-Za-z_][A-Za-z0-9_]*`.
fn expect_ident(ident: &str) -> Result<(), ParseError> {
    if ident.is_empty() {
        return Err(ParseError::EmptyIdent);
    }
    for (pos, ch) in ident.char_indices() {
        match ch {
            '0'..='9' => {
                if pos == 0 {
                    return Err(ParseError::IdentStartsWithDigit(ident.to_string()));
                }
            }
            'A'..='Z' | 'a'..='z' | '_' => {}
            _ => {
                return Err(ParseError::InvalidIdentChar {
                    ch,
                    ident: ident.to_string(),
                });
            }
        }
    }
    Ok(())
}
