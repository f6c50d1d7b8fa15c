//! The record model: an ordered field bag tagged with an object type.

use chrono::{DateTime, FixedOffset, NaiveDate};

/// A scalar field value.
///
/// The set is closed: anything the Partner API cannot serialize is
/// unrepresentable rather than rejected at serialization time.
#[derive(Debug, Clone, PartialEq)]
pub enum Scalar {
    Text(String),
    Boolean(bool),
    Int(i64),
    Double(f64),
    Date(NaiveDate),
    DateTime(DateTime<FixedOffset>),
}

impl Scalar {
    /// Render the wire form of this scalar (unescaped).
    pub fn render(&self) -> String {
        match self {
            Scalar::Text(s) => s.clone(),
            Scalar::Boolean(b) => b.to_string(),
            Scalar::Int(i) => i.to_string(),
            Scalar::Double(d) => d.to_string(),
            Scalar::Date(d) => d.format("%Y-%m-%d").to_string(),
            Scalar::DateTime(dt) => dt.to_rfc3339(),
        }
    }
}

/// A field value inside a record.
///
/// `Null` is an explicit "clear this field" marker, distinct from omitting
/// the field entirely (omission means "leave unchanged" on update).
/// `List` serializes as repeated sibling elements with the same tag.
#[derive(Debug, Clone, PartialEq)]
pub enum FieldValue {
    Scalar(Scalar),
    Null,
    List(Vec<Scalar>),
}

impl From<Scalar> for FieldValue {
    fn from(value: Scalar) -> Self {
        FieldValue::Scalar(value)
    }
}

impl From<&str> for FieldValue {
    fn from(value: &str) -> Self {
        FieldValue::Scalar(Scalar::Text(value.to_string()))
    }
}

impl From<String> for FieldValue {
    fn from(value: String) -> Self {
        FieldValue::Scalar(Scalar::Text(value))
    }
}

impl From<bool> for FieldValue {
    fn from(value: bool) -> Self {
        FieldValue::Scalar(Scalar::Boolean(value))
    }
}

impl From<i64> for FieldValue {
    fn from(value: i64) -> Self {
        FieldValue::Scalar(Scalar::Int(value))
    }
}

impl From<i32> for FieldValue {
    fn from(value: i32) -> Self {
        FieldValue::Scalar(Scalar::Int(value.into()))
    }
}

impl From<f64> for FieldValue {
    fn from(value: f64) -> Self {
        FieldValue::Scalar(Scalar::Double(value))
    }
}

impl From<NaiveDate> for FieldValue {
    fn from(value: NaiveDate) -> Self {
        FieldValue::Scalar(Scalar::Date(value))
    }
}

impl From<DateTime<FixedOffset>> for FieldValue {
    fn from(value: DateTime<FixedOffset>) -> Self {
        FieldValue::Scalar(Scalar::DateTime(value))
    }
}

impl<T: Into<Scalar>> From<Vec<T>> for FieldValue {
    fn from(values: Vec<T>) -> Self {
        FieldValue::List(values.into_iter().map(Into::into).collect())
    }
}

impl<T: Into<FieldValue>> From<Option<T>> for FieldValue {
    fn from(value: Option<T>) -> Self {
        match value {
            Some(v) => v.into(),
            None => FieldValue::Null,
        }
    }
}

impl From<&str> for Scalar {
    fn from(value: &str) -> Self {
        Scalar::Text(value.to_string())
    }
}

impl From<String> for Scalar {
    fn from(value: String) -> Self {
        Scalar::Text(value)
    }
}

impl From<i64> for Scalar {
    fn from(value: i64) -> Self {
        Scalar::Int(value)
    }
}

/// One instance of a remote object: a type name, an optional id, and an
/// ordered field bag.
///
/// Insertion order of fields is preserved and reproduced verbatim in the
/// serialized XML; the Partner API is order-sensitive about the `type` and
/// `Id` elements, and keeping the rest stable makes request bodies
/// reproducible.
///
/// The bag never holds a field named `Id` or `type`: setting those routes
/// to the dedicated slots instead.
#[derive(Debug, Clone, PartialEq)]
pub struct SObject {
    object_type: String,
    id: Option<String>,
    fields: Vec<(String, FieldValue)>,
}

impl SObject {
    /// Create a record of the given object type.
    pub fn new(object_type: impl Into<String>) -> Self {
        Self {
            object_type: object_type.into(),
            id: None,
            fields: Vec::new(),
        }
    }

    /// Set the record id (an existing remote instance).
    pub fn with_id(mut self, id: impl Into<String>) -> Self {
        self.id = Some(id.into());
        self
    }

    /// Append a field, preserving insertion order.
    ///
    /// A field named `Id` sets the id slot; a field named `type` sets the
    /// object type. Setting the same ordinary field twice keeps both
    /// entries, mirroring what the caller asked to serialize.
    pub fn field(mut self, name: impl Into<String>, value: impl Into<FieldValue>) -> Self {
        self.insert(name.into(), value.into());
        self
    }

    /// Mark a field to be cleared on the server.
    pub fn null_field(self, name: impl Into<String>) -> Self {
        self.field(name, FieldValue::Null)
    }

    pub(crate) fn insert(&mut self, name: String, value: FieldValue) {
        if name == "Id" {
            if let FieldValue::Scalar(Scalar::Text(id)) = value {
                self.id = Some(id);
            }
            return;
        }
        if name == "type" {
            if let FieldValue::Scalar(Scalar::Text(t)) = value {
                self.object_type = t;
            }
            return;
        }
        self.fields.push((name, value));
    }

    /// The remote object type name.
    pub fn object_type(&self) -> &str {
        &self.object_type
    }

    /// The record id, when this refers to an existing remote instance.
    pub fn id(&self) -> Option<&str> {
        self.id.as_deref()
    }

    /// The ordered field bag.
    pub fn fields(&self) -> &[(String, FieldValue)] {
        &self.fields
    }

    /// Look up the first field with the given name.
    pub fn get(&self, name: &str) -> Option<&FieldValue> {
        self.fields
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, v)| v)
    }

    /// Look up a field and return it as text, when it is one.
    pub fn get_text(&self, name: &str) -> Option<&str> {
        match self.get(name) {
            Some(FieldValue::Scalar(Scalar::Text(s))) => Some(s),
            _ => None,
        }
    }
}
