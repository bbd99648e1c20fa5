use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// The value type for fields in a document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum DataValue {
    Null,
    Bool(bool),
    Int64(i64),
    Float64(f64),

    /// Keyword content indexed as a single exact term.
    String(String),

    /// Free text, split on whitespace. Each token is indexed lowercased and,
    /// when it differs, as written.
    Text(String),

    /// List of keywords (e.g. tags), each indexed as an exact term.
    List(Vec<String>),
}

impl DataValue {
    /// Returns the text value if this is a Text or String variant.
    pub fn as_text(&self) -> Option<&str> {
        match self {
            DataValue::Text(s) | DataValue::String(s) => Some(s),
            _ => None,
        }
    }

    /// Returns the integer value if this is an Int64 variant.
    pub fn as_integer(&self) -> Option<i64> {
        match self {
            DataValue::Int64(i) => Some(*i),
            _ => None,
        }
    }

    /// Returns the boolean value if this is a Bool variant.
    pub fn as_boolean(&self) -> Option<bool> {
        match self {
            DataValue::Bool(b) => Some(*b),
            _ => None,
        }
    }

    /// The single term a query built from this value looks up.
    ///
    /// Terms are taken as written for every variant.
    pub fn as_term(&self) -> Option<String> {
        match self {
            DataValue::Null | DataValue::List(_) => None,
            DataValue::Bool(b) => Some(b.to_string()),
            DataValue::Int64(i) => Some(i.to_string()),
            DataValue::Float64(f) => Some(f.to_string()),
            DataValue::String(s) | DataValue::Text(s) => Some(s.clone()),
        }
    }

    /// All terms this value contributes to the inverted index.
    pub fn index_terms(&self) -> Vec<String> {
        match self {
            DataValue::Null => Vec::new(),
            DataValue::Text(s) => s
                .split_whitespace()
                .flat_map(|token| {
                    let lower = token.to_lowercase();
                    let original = (lower != token).then(|| token.to_string());
                    std::iter::once(lower).chain(original)
                })
                .collect(),
            DataValue::List(values) => values.clone(),
            other => other.as_term().into_iter().collect(),
        }
    }
}

// --- Conversions ---

impl From<String> for DataValue {
    fn from(v: String) -> Self {
        DataValue::Text(v)
    }
}

impl From<&str> for DataValue {
    fn from(v: &str) -> Self {
        DataValue::Text(v.to_string())
    }
}

impl From<i64> for DataValue {
    fn from(v: i64) -> Self {
        DataValue::Int64(v)
    }
}

impl From<i32> for DataValue {
    fn from(v: i32) -> Self {
        DataValue::Int64(v as i64)
    }
}

impl From<f64> for DataValue {
    fn from(v: f64) -> Self {
        DataValue::Float64(v)
    }
}

impl From<bool> for DataValue {
    fn from(v: bool) -> Self {
        DataValue::Bool(v)
    }
}

impl From<Vec<String>> for DataValue {
    fn from(v: Vec<String>) -> Self {
        DataValue::List(v)
    }
}

/// A typed document.
///
/// Every document carries an external identifier and a type name. Documents
/// of a child type also carry the external identifier of their parent, which
/// must be a document of the parent type declared in the schema.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Document {
    /// External identifier, unique per type.
    pub id: Option<String>,

    /// Type name as declared in the schema.
    pub doc_type: String,

    /// External identifier of the parent document, for child types.
    pub parent: Option<String>,

    /// Field data.
    pub fields: HashMap<String, DataValue>,
}

impl Document {
    /// Create a new empty document of the given type.
    pub fn new(doc_type: impl Into<String>) -> Self {
        Self {
            id: None,
            doc_type: doc_type.into(),
            parent: None,
            fields: HashMap::new(),
        }
    }

    /// Create a new document of the given type with a specific ID.
    pub fn new_with_id(doc_type: impl Into<String>, id: impl Into<String>) -> Self {
        Self::new(doc_type).set_id(id)
    }

    /// Set the document ID.
    pub fn set_id(mut self, id: impl Into<String>) -> Self {
        self.id = Some(id.into());
        self
    }

    /// Set the parent document ID.
    pub fn set_parent(mut self, parent: impl Into<String>) -> Self {
        self.parent = Some(parent.into());
        self
    }

    /// Add a field to the document.
    pub fn add_field(mut self, name: impl Into<String>, value: impl Into<DataValue>) -> Self {
        self.fields.insert(name.into(), value.into());
        self
    }

    /// Add a keyword field, indexed as one exact term.
    pub fn add_keyword(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.fields
            .insert(name.into(), DataValue::String(value.into()));
        self
    }

    /// Add an integer field.
    pub fn add_integer(mut self, name: impl Into<String>, value: i64) -> Self {
        self.fields.insert(name.into(), DataValue::Int64(value));
        self
    }

    /// Get a reference to a field's value.
    pub fn get(&self, name: &str) -> Option<&DataValue> {
        self.fields.get(name)
    }

    /// Check if the document has a field.
    pub fn has_field(&self, name: &str) -> bool {
        self.fields.contains_key(name)
    }

    /// Get the number of fields.
    pub fn len(&self) -> usize {
        self.fields.len()
    }

    /// Check if the document has no fields.
    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_text_terms_keep_original_case() {
        let value = DataValue::from("Red yellow");
        assert_eq!(value.index_terms(), vec!["red", "Red", "yellow"]);
        assert_eq!(value.as_term().as_deref(), Some("Red yellow"));
    }

    #[test]
    fn test_keyword_and_integer_terms() {
        assert_eq!(
            DataValue::String("P_Value1".into()).index_terms(),
            vec!["P_Value1"]
        );
        assert_eq!(DataValue::from(330).as_term().as_deref(), Some("330"));
        assert!(DataValue::Null.as_term().is_none());
    }

    #[test]
    fn test_document_builder() {
        let doc = Document::new_with_id("child", "c1")
            .set_parent("p1")
            .add_field("c_field", "red")
            .add_integer("num", 330);

        assert_eq!(doc.id.as_deref(), Some("c1"));
        assert_eq!(doc.doc_type, "child");
        assert_eq!(doc.parent.as_deref(), Some("p1"));
        assert_eq!(doc.len(), 2);
        assert_eq!(doc.get("num").and_then(|v| v.as_integer()), Some(330));
    }
}
