use serde::Serialize;
use std::fmt;

use super::reference::ReferenceSet;

/// Kind of schema definition object
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum SchemaKind {
    Class,
    Attribute,
}

impl SchemaKind {
    /// `objectClass` value of the definition objects of this kind
    pub fn object_class(&self) -> &'static str {
        match self {
            SchemaKind::Class => "classSchema",
            SchemaKind::Attribute => "attributeSchema",
        }
    }

    /// Attribute holding the OID of the definition
    pub fn identifier_attribute(&self) -> &'static str {
        match self {
            SchemaKind::Class => "governsID",
            SchemaKind::Attribute => "attributeID",
        }
    }
}

impl fmt::Display for SchemaKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SchemaKind::Class => write!(f, "class"),
            SchemaKind::Attribute => write!(f, "attribute"),
        }
    }
}

/// A classSchema or attributeSchema object
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SchemaObject {
    pub common_name: String,
    pub identifier: Option<String>,
    pub kind: SchemaKind,
}

impl SchemaObject {
    pub fn new(common_name: String, identifier: Option<String>, kind: SchemaKind) -> Self {
        Self {
            common_name,
            identifier,
            kind,
        }
    }
}

/// Outcome of a schema enumeration run
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EnumerationResult {
    pub schema_dn: String,
    pub classes: Vec<SchemaObject>,
    pub attributes: Vec<SchemaObject>,
    pub custom_classes: Vec<SchemaObject>,
    pub custom_attributes: Vec<SchemaObject>,
}

impl EnumerationResult {
    /// Partition retrieved definitions against the reference set
    pub fn classify(
        schema_dn: String,
        classes: Vec<SchemaObject>,
        attributes: Vec<SchemaObject>,
        reference: &ReferenceSet,
    ) -> Self {
        let custom_classes = classes
            .iter()
            .filter(|c| !reference.is_default_class(&c.common_name))
            .cloned()
            .collect();
        let custom_attributes = attributes
            .iter()
            .filter(|a| !reference.is_default_attribute(&a.common_name))
            .cloned()
            .collect();

        Self {
            schema_dn,
            classes,
            attributes,
            custom_classes,
            custom_attributes,
        }
    }

    pub fn class_count(&self) -> usize {
        self.classes.len()
    }

    pub fn attribute_count(&self) -> usize {
        self.attributes.len()
    }

    pub fn custom_class_names(&self) -> Vec<&str> {
        self.custom_classes.iter().map(|c| c.common_name.as_str()).collect()
    }

    pub fn custom_attribute_names(&self) -> Vec<&str> {
        self.custom_attributes
            .iter()
            .map(|a| a.common_name.as_str())
            .collect()
    }
}
