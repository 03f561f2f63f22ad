//! Read-only view of request-message fields, supplied by the surrounding
//! schema-reflection layer.

/// Kind of a message field, as far as query flattening cares.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldKind {
    /// Leaf field, emitted as a query parameter.
    Scalar,
    /// Nested message, recursed into during flattening.
    Message,
}

/// Descriptor of one field of a request message.
///
/// Implementations come from whatever schema layer drives generation; the
/// crate only ever reads these four accessors.
pub trait FieldDescriptor: Sized {
    /// Field name as declared in the schema, conventionally snake_case.
    fn name(&self) -> &str;

    /// Whether the field is a leaf or a nested message.
    fn kind(&self) -> FieldKind;

    /// Identity of the field's type. For message kinds this keys the
    /// flattener's cycle guard, so it must be stable and unique per
    /// message type; a fully-qualified name qualifies.
    fn type_name(&self) -> &str;

    /// Fields of the nested message; empty for scalar kinds.
    fn fields(&self) -> &[Self];
}

/// Self-contained descriptor for tests and for callers without a
/// reflection layer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SimpleField {
    pub name: String,
    pub kind: FieldKind,
    pub type_name: String,
    pub fields: Vec<SimpleField>,
}

impl SimpleField {
    /// Leaf field of the given scalar type.
    pub fn scalar(name: &str, type_name: &str) -> Self {
        SimpleField {
            name: name.to_string(),
            kind: FieldKind::Scalar,
            type_name: type_name.to_string(),
            fields: Vec::new(),
        }
    }

    /// Message-kind field with the given child fields.
    pub fn message(name: &str, type_name: &str, fields: Vec<SimpleField>) -> Self {
        SimpleField {
            name: name.to_string(),
            kind: FieldKind::Message,
            type_name: type_name.to_string(),
            fields,
        }
    }
}

impl FieldDescriptor for SimpleField {
    fn name(&self) -> &str {
        &self.name
    }

    fn kind(&self) -> FieldKind {
        self.kind
    }

    fn type_name(&self) -> &str {
        &self.type_name
    }

    fn fields(&self) -> &[Self] {
        &self.fields
    }
}
