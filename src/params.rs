//! Path- and query-parameter derivation for code generators.
//!
//! Path parameters come from the variables of a parsed template, query
//! parameters from flattening the request message's remaining fields into
//! dotted leaves. Both lists feed request-binding codegen directly, so
//! their ordering rules are contractual.

use crate::ast::{Segment, Template};
use crate::descriptor::{FieldDescriptor, FieldKind};
use crate::parser::{parse, tokenize, ParseError, Parser};

/// Failure while deriving parameters from a method's HTTP rule.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ParamError {
    /// Path templates on methods must be absolute.
    #[error("no leading / in path template {pattern:?}")]
    NoLeadingSlash { pattern: String },

    #[error("invalid path template: {0}")]
    Parse(#[from] ParseError),
}

/// One template variable bound to a path position.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PathParam {
    /// 1-based position among the template's top-level segments.
    pub index: usize,
    /// Raw dotted field path, e.g. `book.id`.
    pub name: String,
    /// Camel rendering of the field path with dots kept, e.g. `Book.Id`.
    pub canonical_name: String,
}

impl PathParam {
    /// Proper dotted prefixes of the canonical name, outermost first and
    /// excluding the full name: `A.B.C` yields `["A", "A.B"]`. Emitters
    /// chain these to reach the bound leaf.
    pub fn canonical_prefixes(&self) -> Vec<String> {
        let parts: Vec<&str> = self.canonical_name.split('.').collect();
        (1..parts.len()).map(|i| parts[..i].join(".")).collect()
    }
}

/// One leaf of the request message reachable as a query parameter.
#[derive(Debug, Clone)]
pub struct QueryParam<'a, F> {
    /// Camel rendering of the dotted leaf path, e.g. `Pagination.PageSize`.
    pub canonical_name: String,
    /// Raw dotted leaf path, e.g. `pagination.page_size`.
    pub name: String,
    /// Descriptor the leaf was reached through.
    pub field: &'a F,
}

/// Everything the code emitter needs for one method's HTTP binding.
#[derive(Debug)]
pub struct MethodBinding<'a, F> {
    /// Parsed template, verb included.
    pub template: Template,
    /// Ordered path parameters, see [`path_params`].
    pub path_params: Vec<PathParam>,
    /// Flattened query parameters, minus leaves the path already binds.
    pub query_params: Vec<QueryParam<'a, F>>,
}

/// Camel rendering used for canonical parameter names: uppercase the first
/// letter and any letter directly after `_` or `.`, dropping the
/// underscore and keeping the dot. A separator not followed by a letter
/// passes through unchanged, so `a_1` stays `A_1`.
pub fn to_camel_case(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    let mut chars = s.chars().peekable();
    let mut first = true;
    while let Some(ch) = chars.next() {
        match ch {
            '_' | '.' => match chars.peek() {
                Some(&next) if next.is_ascii_alphabetic() => {
                    if ch == '.' {
                        out.push('.');
                    }
                    out.push(next.to_ascii_uppercase());
                    chars.next();
                }
                _ => out.push(ch),
            },
            _ if first && ch.is_ascii_alphabetic() => out.push(ch.to_ascii_uppercase()),
            _ => out.push(ch),
        }
        first = false;
    }
    out
}

/// Collect the path parameters of parsed top-level segments.
///
/// Ordering is a hard contract for downstream destructuring: sorted first
/// by number of dotted components, fewer first, then by raw name. A
/// shallower path therefore always binds before a deeper one sharing its
/// prefix.
pub fn path_params(segments: &[Segment]) -> Vec<PathParam> {
    let mut params: Vec<PathParam> = segments
        .iter()
        .enumerate()
        .filter_map(|(i, seg)| match seg {
            Segment::Variable(v) => Some(PathParam {
                index: i + 1,
                name: v.field_path.clone(),
                canonical_name: to_camel_case(&v.field_path),
            }),
            _ => None,
        })
        .collect();
    params.sort_by(|a, b| {
        let depth_a = a.name.split('.').count();
        let depth_b = b.name.split('.').count();
        depth_a.cmp(&depth_b).then_with(|| a.name.cmp(&b.name))
    });
    params
}

/// Derive path parameters straight from a method's template string, which
/// must carry a leading `/`. Any trailing verb is ignored.
pub fn parse_path_params(pattern: &str) -> Result<Vec<PathParam>, ParamError> {
    let Some(path) = pattern.strip_prefix('/') else {
        return Err(ParamError::NoLeadingSlash {
            pattern: pattern.to_string(),
        });
    };
    let (tokens, _verb) = tokenize(path);
    let segments = Parser::new(&tokens).top_level_segments()?;
    Ok(path_params(&segments))
}

/// Flatten message fields into dotted query-parameter leaves.
///
/// Callers pass the request's descriptors minus any fields already claimed
/// by path parameters. Message-kind fields recurse with both name prefixes
/// extended; leaves keep declaration order. A message type already on the
/// visiting stack is skipped, so self-referential schemas terminate.
pub fn query_params<F: FieldDescriptor>(fields: &[F]) -> Vec<QueryParam<'_, F>> {
    let mut out = Vec::new();
    let mut visiting = Vec::new();
    flatten(fields, "", "", &mut visiting, &mut out);
    out
}

fn flatten<'a, F: FieldDescriptor>(
    fields: &'a [F],
    canonical_prefix: &str,
    raw_prefix: &str,
    visiting: &mut Vec<&'a str>,
    out: &mut Vec<QueryParam<'a, F>>,
) {
    for field in fields {
        match field.kind() {
            FieldKind::Message => {
                if visiting.contains(&field.type_name()) {
                    continue;
                }
                visiting.push(field.type_name());
                let canonical =
                    format!("{}{}.", canonical_prefix, to_camel_case(field.name()));
                let raw = format!("{}{}.", raw_prefix, field.name());
                flatten(field.fields(), &canonical, &raw, visiting, out);
                visiting.pop();
            }
            FieldKind::Scalar => out.push(QueryParam {
                canonical_name: format!("{}{}", canonical_prefix, to_camel_case(field.name())),
                name: format!("{}{}", raw_prefix, field.name()),
                field,
            }),
        }
    }
}

/// Parse a method's template and derive both parameter lists from it and
/// the request's field descriptors. Query leaves whose raw dotted name
/// matches a path parameter are excluded.
pub fn bind_method<'a, F: FieldDescriptor>(
    pattern: &str,
    request_fields: &'a [F],
) -> Result<MethodBinding<'a, F>, ParamError> {
    let Some(path) = pattern.strip_prefix('/') else {
        return Err(ParamError::NoLeadingSlash {
            pattern: pattern.to_string(),
        });
    };
    let template = parse(path)?;
    let path_params = path_params(&template.segments);
    let query_params = query_params(request_fields)
        .into_iter()
        .filter(|q| path_params.iter().all(|p| p.name != q.name))
        .collect();
    Ok(MethodBinding {
        template,
        path_params,
        query_params,
    })
}
