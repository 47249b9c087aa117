//! # Field Model
//!
//! Output structures produced by the resolver: one `Field` per resolved schema
//! node. Variants share a `FieldBase` and add type specific constraints.
//! Optional constraints stay `None` when the schema omits them, so "unset" is
//! never confused with zero.

use crate::naming::TargetNames;
use indexmap::IndexMap;
use serde::Serialize;
use std::sync::Arc;

/// A container of resolved fields, in source-declaration order.
pub type Fields = IndexMap<String, Field>;

/// Attributes shared by every field variant.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FieldBase {
    /// Resolved semantic type tag (`string`, `int64`, `float32`, `struct`, `ref`, ...).
    #[serde(rename = "type")]
    pub type_tag: String,
    /// Exported identifier.
    pub name: String,
    /// Local identifier.
    pub var_name: String,
    /// Content type → serialized name. Always holds the JSON name.
    pub target_names: TargetNames,
    /// Listed in the parent object's `required`.
    pub required: bool,
    /// Produced through an `array` schema.
    pub is_array: bool,
    /// Accepts `null`.
    pub nullable: bool,
    /// Serialized as an XML attribute.
    pub xml_attribute: bool,
    /// Schema description.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Schema deprecation flag.
    pub deprecated: bool,
    /// Reserved for source-location tracking.
    pub path: String,
}

/// A string field.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StringField {
    /// Shared attributes.
    #[serde(flatten)]
    pub base: FieldBase,
    /// Default value.
    pub default: Option<String>,
    /// Regular expression constraint.
    pub pattern: Option<String>,
    /// Minimum length.
    pub min_len: Option<usize>,
    /// Maximum length.
    pub max_len: Option<usize>,
    /// Format hint.
    pub format: Option<String>,
}

/// An integer or floating point field.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NumberField {
    /// Shared attributes.
    #[serde(flatten)]
    pub base: FieldBase,
    /// Default value.
    pub default: Option<f64>,
    /// Inclusive lower bound.
    pub min: Option<f64>,
    /// Inclusive upper bound.
    pub max: Option<f64>,
    /// Exclusive lower bound.
    pub min_exclusive: Option<f64>,
    /// Exclusive upper bound.
    pub max_exclusive: Option<f64>,
    /// Multiple-of constraint.
    pub multiple_of: Option<f64>,
}

/// A boolean field.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct BooleanField {
    /// Shared attributes.
    #[serde(flatten)]
    pub base: FieldBase,
    /// Default value.
    pub default: Option<bool>,
}

/// An array whose element schema is unknown.
///
/// Arrays with `items` are flattened into their element field instead.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ArrayField {
    /// Shared attributes, `is_array` is always set.
    #[serde(flatten)]
    pub base: FieldBase,
}

/// An object field.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ObjectField {
    /// Shared attributes.
    #[serde(flatten)]
    pub base: FieldBase,
    /// Members contributed by properties, `oneOf` and `allOf`.
    pub members: Fields,
    /// Resolved `additionalProperties` schema, when given as a schema.
    pub additional_properties: Vec<Field>,
    /// `additionalProperties` when given as a flag.
    pub allow_additional: Option<bool>,
    /// Minimum property count.
    pub min_properties: Option<usize>,
    /// Maximum property count.
    pub max_properties: Option<usize>,
}

/// Where a reference points.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RefTarget {
    /// Registered schema name.
    pub schema: String,
    /// Document holding the target.
    pub doc_path: String,
    /// Absolute item path of the target.
    pub item_path: String,
}

/// A `$ref` field.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RefField {
    /// Shared attributes.
    #[serde(flatten)]
    pub base: FieldBase,
    /// The raw reference string.
    pub reference: String,
    /// Resolved target; `None` marks an unresolved reference.
    pub target: Option<RefTarget>,
    /// The target schema resolved inline (expand mode only). Shared between
    /// every reference to the same target within one top-level schema.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub resolved: Option<Arc<Field>>,
}

impl RefField {
    /// True when the reference was not resolved to a registered schema.
    pub fn is_unresolved(&self) -> bool {
        self.target.is_none()
    }
}

/// A resolved field.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum Field {
    /// `boolean`
    Boolean(BooleanField),
    /// `integer` / `number`
    Number(NumberField),
    /// `string`
    String(StringField),
    /// `array` without `items`
    Array(ArrayField),
    /// `object`
    Object(ObjectField),
    /// `$ref`
    Reference(RefField),
    /// Untyped node, emitted only when configured to.
    Unknown(FieldBase),
}

impl Field {
    /// Shared attributes.
    pub fn base(&self) -> &FieldBase {
        match self {
            Field::Boolean(f) => &f.base,
            Field::Number(f) => &f.base,
            Field::String(f) => &f.base,
            Field::Array(f) => &f.base,
            Field::Object(f) => &f.base,
            Field::Reference(f) => &f.base,
            Field::Unknown(base) => base,
        }
    }

    /// Mutable access to the shared attributes.
    pub fn base_mut(&mut self) -> &mut FieldBase {
        match self {
            Field::Boolean(f) => &mut f.base,
            Field::Number(f) => &mut f.base,
            Field::String(f) => &mut f.base,
            Field::Array(f) => &mut f.base,
            Field::Object(f) => &mut f.base,
            Field::Reference(f) => &mut f.base,
            Field::Unknown(base) => base,
        }
    }

    /// Exported identifier.
    pub fn name(&self) -> &str {
        &self.base().name
    }

    /// Resolved type tag.
    pub fn type_tag(&self) -> &str {
        &self.base().type_tag
    }

    /// Whether the field is required by its parent.
    pub fn is_required(&self) -> bool {
        self.base().required
    }

    /// Whether the field was reached through an array.
    pub fn is_array(&self) -> bool {
        self.base().is_array
    }

    /// Serialized name for `content_type`, if the field has one.
    pub fn target_name(&self, content_type: &str) -> Option<&str> {
        self.base().target_names.get(content_type).map(String::as_str)
    }

    /// Object members, for `Object` fields.
    pub fn members(&self) -> Option<&Fields> {
        match self {
            Field::Object(obj) => Some(&obj.members),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::naming::JSON_CONTENT_TYPE;

    fn base(tag: &str) -> FieldBase {
        let mut target_names = TargetNames::new();
        target_names.insert(JSON_CONTENT_TYPE.into(), "count".into());
        FieldBase {
            type_tag: tag.into(),
            name: "Count".into(),
            var_name: "count".into(),
            target_names,
            required: true,
            ..FieldBase::default()
        }
    }

    #[test]
    fn test_accessors_reach_base() {
        let field = Field::Number(NumberField {
            base: base("int64"),
            ..NumberField::default()
        });
        assert_eq!(field.name(), "Count");
        assert_eq!(field.type_tag(), "int64");
        assert!(field.is_required());
        assert!(!field.is_array());
        assert_eq!(field.target_name(JSON_CONTENT_TYPE), Some("count"));
        assert_eq!(field.target_name("text/xml"), None);
        assert!(field.members().is_none());
    }

    #[test]
    fn test_unset_bounds_serialize_as_null() {
        let field = Field::Number(NumberField {
            base: base("int64"),
            min: Some(0.0),
            ..NumberField::default()
        });
        let json = serde_json::to_value(&field).unwrap();
        assert_eq!(json["kind"], "number");
        assert_eq!(json["type"], "int64");
        assert_eq!(json["min"], 0.0);
        assert!(json["max"].is_null());
        assert_eq!(json["targetNames"]["application/json"], "count");
    }

    #[test]
    fn test_unresolved_reference_marker() {
        let field = RefField {
            base: base("ref"),
            reference: "https://example.com/a.yaml".into(),
            ..RefField::default()
        };
        assert!(field.is_unresolved());
    }
}
