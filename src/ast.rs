//! Segment tree for parsed path templates.

use std::fmt;

/// One segment of a parsed path template.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Segment {
    /// Fixed path component, matched verbatim.
    Literal(String),
    /// `*`: matches exactly one path component.
    Wildcard,
    /// `**`: matches all remaining path components.
    DeepWildcard,
    /// `{field.path=pattern}`: captures the components matched by the
    /// pattern into the named request field.
    Variable(Variable),
}

/// A named capture: dotted request-field path plus the pattern it matches.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Variable {
    /// Dot-joined field path, e.g. `book.id`.
    pub field_path: String,
    /// Capture pattern; a single [`Segment::Wildcard`] when the template
    /// wrote `{name}` without an explicit pattern.
    pub segments: Vec<Segment>,
}

/// A complete parsed template: top-level segments plus the optional verb.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Template {
    pub segments: Vec<Segment>,
    pub verb: Option<String>,
}

impl fmt::Display for Segment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Segment::Literal(lit) => f.write_str(lit),
            Segment::Wildcard => f.write_str("*"),
            Segment::DeepWildcard => f.write_str("**"),
            Segment::Variable(v) => {
                write!(f, "{{{}={}}}", v.field_path, render_path(&v.segments))
            }
        }
    }
}

impl fmt::Display for Template {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&render_path(&self.segments))?;
        if let Some(verb) = &self.verb {
            write!(f, ":{}", verb)?;
        }
        Ok(())
    }
}

/// Render segments back to template text, joined by `/`. A variable always
/// renders its pattern explicitly, so `{name}` comes back as `{name=*}`.
pub fn render_path(segments: &[Segment]) -> String {
    let parts: Vec<String> = segments.iter().map(|s| s.to_string()).collect();
    parts.join("/")
}
