//! # httprule — HTTP-rule path template grammar
//!
//! Parser for the REST path templates used to annotate RPC methods with
//! HTTP bindings, plus derivation of the positional path parameters and
//! flattened query parameters that request-binding code generators
//! consume.
//!
//! ## Template grammar
//!
//! ```text
//! Template  := '/' Segments (':' Verb)?
//! Segments  := Segment ('/' Segment)*
//! Segment   := '*' | '**' | Literal | Variable
//! Variable  := '{' FieldPath ('=' Segments)? '}'
//! FieldPath := Ident ('.' Ident)*
//! ```
//!
//! Literals are RFC 3986 pchars (percent-encoding included), field paths
//! are dot-separated schema identifiers, and `{name}` without a pattern
//! captures a single `*`. A template may end with a `:verb` suffix on its
//! final segment.
//!
//! ## Derived parameters
//!
//! - [`parse_path_params`] / [`path_params`]: template variables with
//!   their 1-based segment position, raw dotted name, and canonical camel
//!   name, ordered shallow-to-deep then lexicographically.
//! - [`query_params`]: request-message fields flattened depth-first into
//!   dotted leaves behind the [`FieldDescriptor`] boundary.
//! - [`bind_method`]: both lists for one method, with path-bound leaves
//!   excluded from the query list.
//!
//! Parsing performs no I/O and holds no global state. See
//! `tests/grammar.rs` and `tests/params.rs` for worked examples.

pub mod ast;
pub mod descriptor;
pub mod params;
pub mod parser;

pub use ast::{render_path, Segment, Template, Variable};
pub use descriptor::{FieldDescriptor, FieldKind, SimpleField};
pub use params::{
    bind_method, parse_path_params, path_params, query_params, to_camel_case, MethodBinding,
    ParamError, PathParam, QueryParam,
};
pub use parser::{parse, tokenize, ParseError, Parser, TermType, EOF};

/// Identity a generator stamps into its output headers.
///
/// Passed explicitly to whatever drives generation; nothing here is
/// global or mutable after construction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GeneratorInfo {
    pub name: String,
    pub version: String,
}

impl GeneratorInfo {
    /// Identity of this crate, for generators that do not override it.
    pub fn from_crate() -> Self {
        GeneratorInfo {
            name: env!("CARGO_PKG_NAME").to_string(),
            version: env!("CARGO_PKG_VERSION").to_string(),
        }
    }
}
