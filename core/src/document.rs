//! # Schema Document Shims
//!
//! Intermediate deserialization layer for OpenAPI / JSON Schema documents.
//! Only the keywords the resolver consumes are modelled; anything else in the
//! source document is ignored.

use crate::error::{SchemaError, SchemaResult};
use indexmap::IndexMap;
use serde::Deserialize;
use serde_json::Value;

/// Section of an OpenAPI document holding named schemas.
pub const COMPONENT_SCHEMAS_POINTER: &str = "/components/schemas";

/// A parsed schema document.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct SchemaDocument {
    /// The `components` object, if any.
    #[serde(default)]
    pub components: Option<Components>,
}

impl SchemaDocument {
    /// Named schemas in declaration order (empty when the document has none).
    pub fn schemas(&self) -> impl Iterator<Item = (&String, &SchemaNode)> {
        self.components.iter().flat_map(|c| c.schemas.iter())
    }
}

/// The OpenAPI `components` object.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct Components {
    /// Named schema definitions.
    #[serde(default)]
    pub schemas: IndexMap<String, SchemaNode>,
}

/// The `type` keyword: a single name or an OpenAPI 3.1 list.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(untagged)]
pub enum TypeDecl {
    /// `type: string`
    Single(String),
    /// `type: [string, "null"]`
    Union(Vec<String>),
}

/// `exclusiveMinimum` / `exclusiveMaximum`: a flag (OAS 3.0) or a bound (OAS 3.1).
#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum ExclusiveBound {
    /// Makes the sibling `minimum` / `maximum` exclusive.
    Flag(bool),
    /// The exclusive bound itself.
    Value(f64),
}

/// `additionalProperties`: a flag or a schema.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum AdditionalProperties {
    /// `additionalProperties: true|false`
    Allowed(bool),
    /// `additionalProperties: { ... }`
    Schema(Box<SchemaNode>),
}

/// The XML Object.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct XmlMapping {
    /// Element or attribute name.
    pub name: Option<String>,
    /// Namespace URI.
    pub namespace: Option<String>,
    /// Namespace prefix.
    pub prefix: Option<String>,
    /// Serialize as an attribute rather than an element.
    #[serde(default)]
    pub attribute: bool,
    /// Wrap array items in an outer element.
    #[serde(default)]
    pub wrapped: bool,
}

/// One node of the schema tree.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SchemaNode {
    /// Declared type.
    #[serde(rename = "type")]
    pub schema_type: Option<TypeDecl>,
    /// OAS 3.0 nullability flag.
    pub nullable: Option<bool>,
    /// `$ref` directive.
    #[serde(rename = "$ref")]
    pub reference: Option<String>,
    /// Format hint (`int32`, `date-time`, ...).
    pub format: Option<String>,
    /// Human readable description.
    pub description: Option<String>,
    /// Deprecation flag.
    pub deprecated: Option<bool>,
    /// Default value.
    pub default: Option<Value>,
    /// String pattern.
    pub pattern: Option<String>,
    /// Minimum string length.
    pub min_length: Option<usize>,
    /// Maximum string length.
    pub max_length: Option<usize>,
    /// Inclusive lower bound.
    pub minimum: Option<f64>,
    /// Inclusive upper bound.
    pub maximum: Option<f64>,
    /// Exclusive lower bound.
    pub exclusive_minimum: Option<ExclusiveBound>,
    /// Exclusive upper bound.
    pub exclusive_maximum: Option<ExclusiveBound>,
    /// Multiple-of constraint.
    pub multiple_of: Option<f64>,
    /// Array element schema.
    pub items: Option<Box<SchemaNode>>,
    /// Object properties in declaration order.
    #[serde(default)]
    pub properties: IndexMap<String, SchemaNode>,
    /// Required property names.
    #[serde(default)]
    pub required: Vec<String>,
    /// `oneOf` alternatives.
    #[serde(default)]
    pub one_of: Vec<SchemaNode>,
    /// `allOf` members.
    #[serde(default)]
    pub all_of: Vec<SchemaNode>,
    /// Additional properties.
    pub additional_properties: Option<AdditionalProperties>,
    /// Minimum property count.
    pub min_properties: Option<usize>,
    /// Maximum property count.
    pub max_properties: Option<usize>,
    /// XML mapping annotation.
    pub xml: Option<XmlMapping>,
}

impl SchemaNode {
    /// Creates a node with only `type` set.
    pub fn of_type(ty: &str) -> Self {
        Self {
            schema_type: Some(TypeDecl::Single(ty.to_string())),
            ..Self::default()
        }
    }

    /// Creates a `$ref` node.
    pub fn reference(reference: &str) -> Self {
        Self {
            reference: Some(reference.to_string()),
            ..Self::default()
        }
    }

    /// The effective type name: the declared type, or the first non-`null`
    /// entry of a type list.
    pub fn declared_type(&self) -> Option<&str> {
        match self.schema_type.as_ref()? {
            TypeDecl::Single(t) => Some(t.as_str()),
            TypeDecl::Union(types) => types.iter().map(String::as_str).find(|t| *t != "null"),
        }
    }

    /// True when `nullable: true` or the type list contains `null`.
    pub fn is_nullable(&self) -> bool {
        if self.nullable == Some(true) {
            return true;
        }
        matches!(&self.schema_type, Some(TypeDecl::Union(types)) if types.iter().any(|t| t == "null"))
    }
}

/// Parses a document from YAML or JSON text.
///
/// `origin` is only used in diagnostics.
pub fn parse_document(text: &str, origin: &str) -> SchemaResult<SchemaDocument> {
    serde_yaml::from_str(text)
        .map_err(|e| SchemaError::Parse(format!("Failed to parse '{}': {}", origin, e)))
}
