use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use crate::error::{IrisError, Result};

/// Declared document types and their parent relationships.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct IndexSchema {
    /// Mapping for each document type.
    pub types: HashMap<String, TypeMapping>,
}

impl IndexSchema {
    pub fn new() -> Self {
        Self {
            types: HashMap::new(),
        }
    }

    pub fn builder() -> IndexSchemaBuilder {
        IndexSchemaBuilder::default()
    }

    /// Parse a schema from its JSON form and validate it.
    pub fn from_json(json: &str) -> Result<Self> {
        let schema: IndexSchema = serde_json::from_str(json)?;
        schema.validate()?;
        Ok(schema)
    }

    /// Check that every declared parent type exists and is not the child itself.
    pub fn validate(&self) -> Result<()> {
        for (name, mapping) in &self.types {
            if let Some(parent) = &mapping.parent {
                if parent == name {
                    return Err(IrisError::invalid_config(format!(
                        "type [{name}] cannot be its own parent"
                    )));
                }
                if !self.types.contains_key(parent) {
                    return Err(IrisError::invalid_config(format!(
                        "type [{name}] declares unknown parent type [{parent}]"
                    )));
                }
            }
        }
        Ok(())
    }

    pub fn has_type(&self, name: &str) -> bool {
        self.types.contains_key(name)
    }

    /// The parent type declared by `child_type`, if any.
    pub fn parent_type_of(&self, child_type: &str) -> Option<&str> {
        self.types
            .get(child_type)
            .and_then(|mapping| mapping.parent.as_deref())
    }

    /// Types that declare `parent_type` as their parent, sorted by name.
    pub fn child_types_of(&self, parent_type: &str) -> Vec<&str> {
        let mut children: Vec<&str> = self
            .types
            .iter()
            .filter(|(_, mapping)| mapping.parent.as_deref() == Some(parent_type))
            .map(|(name, _)| name.as_str())
            .collect();
        children.sort_unstable();
        children
    }
}

/// Mapping of a single document type.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TypeMapping {
    /// The `_parent` type of documents of this type.
    /// If None, documents of this type have no parent.
    #[serde(default, rename = "_parent")]
    pub parent: Option<String>,
}

#[derive(Default)]
pub struct IndexSchemaBuilder {
    types: HashMap<String, TypeMapping>,
}

impl IndexSchemaBuilder {
    /// Declare a type without a parent.
    pub fn add_type(mut self, name: impl Into<String>) -> Self {
        self.types.insert(name.into(), TypeMapping::default());
        self
    }

    /// Declare a type whose documents are children of `parent`.
    pub fn add_child_type(mut self, name: impl Into<String>, parent: impl Into<String>) -> Self {
        self.types.insert(
            name.into(),
            TypeMapping {
                parent: Some(parent.into()),
            },
        );
        self
    }

    /// Build and validate the schema.
    pub fn build(self) -> Result<IndexSchema> {
        let schema = IndexSchema { types: self.types };
        schema.validate()?;
        Ok(schema)
    }
}
