//! Scalar handlers: `boolean`, `integer` / `number` and `string`.

use super::{ResolutionContext, Resolver};
use crate::document::{ExclusiveBound, SchemaNode};
use crate::error::{SchemaError, SchemaResult};
use crate::fields::{BooleanField, Field, NumberField, StringField};
use serde_json::Value;

impl Resolver<'_> {
    pub(super) fn resolve_boolean(
        &mut self,
        name: &str,
        node: &SchemaNode,
        ctx: ResolutionContext<'_>,
    ) -> SchemaResult<Field> {
        let default = typed_default(name, node, "boolean", Value::as_bool)?;
        Ok(Field::Boolean(BooleanField {
            base: self.field_base(name, node, ctx, "bool"),
            default,
        }))
    }

    pub(super) fn resolve_string(
        &mut self,
        name: &str,
        node: &SchemaNode,
        ctx: ResolutionContext<'_>,
    ) -> SchemaResult<Field> {
        let default = typed_default(name, node, "string", |v| v.as_str().map(String::from))?;
        Ok(Field::String(StringField {
            base: self.field_base(name, node, ctx, "string"),
            default,
            pattern: node.pattern.clone(),
            min_len: node.min_length,
            max_len: node.max_length,
            format: node.format.clone(),
        }))
    }

    pub(super) fn resolve_numeric(
        &mut self,
        name: &str,
        node: &SchemaNode,
        ctx: ResolutionContext<'_>,
    ) -> SchemaResult<Field> {
        let default = typed_default(name, node, "number", Value::as_f64)?;
        let type_tag = numeric_type_tag(node);
        Ok(Field::Number(NumberField {
            base: self.field_base(name, node, ctx, &type_tag),
            default,
            min: node.minimum,
            max: node.maximum,
            min_exclusive: exclusive_bound(node.exclusive_minimum, node.minimum),
            max_exclusive: exclusive_bound(node.exclusive_maximum, node.maximum),
            multiple_of: node.multiple_of,
        }))
    }
}

/// Type tag for an `integer` or `number` node.
///
/// Integers use their `format` (default `int64`). Numbers are `float32` only
/// when a `maximum` is declared and fits in a 32-bit float.
pub(crate) fn numeric_type_tag(node: &SchemaNode) -> String {
    if node.declared_type() == Some("integer") {
        return node.format.clone().unwrap_or_else(|| "int64".to_string());
    }
    match node.maximum {
        Some(max) if max <= f64::from(f32::MAX) => "float32".to_string(),
        _ => "float64".to_string(),
    }
}

// OAS 3.0 flags reuse the inclusive bound; OAS 3.1 carries the bound itself.
fn exclusive_bound(bound: Option<ExclusiveBound>, inclusive: Option<f64>) -> Option<f64> {
    match bound? {
        ExclusiveBound::Value(v) => Some(v),
        ExclusiveBound::Flag(true) => inclusive,
        ExclusiveBound::Flag(false) => None,
    }
}

fn typed_default<T>(
    name: &str,
    node: &SchemaNode,
    expected: &'static str,
    extract: impl Fn(&Value) -> Option<T>,
) -> SchemaResult<Option<T>> {
    match node.default.as_ref() {
        None | Some(Value::Null) => Ok(None),
        Some(value) => extract(value)
            .map(Some)
            .ok_or_else(|| SchemaError::InvalidDefault {
                field: name.to_string(),
                expected,
            }),
    }
}

#[cfg(test)]
mod tests {
    use super::super::test_support::*;
    use super::*;
    use crate::config::GeneratorConfig;

    fn number_with_max(max: Option<f64>) -> SchemaNode {
        SchemaNode {
            maximum: max,
            ..SchemaNode::of_type("number")
        }
    }

    #[test]
    fn test_integer_format_passthrough() {
        let int32 = SchemaNode {
            format: Some("int32".into()),
            ..SchemaNode::of_type("integer")
        };
        assert_eq!(numeric_type_tag(&int32), "int32");
        assert_eq!(numeric_type_tag(&SchemaNode::of_type("integer")), "int64");
    }

    #[test]
    fn test_float_boundary() {
        assert_eq!(numeric_type_tag(&number_with_max(Some(3.4e38))), "float32");
        assert_eq!(
            numeric_type_tag(&number_with_max(Some(f64::from(f32::MAX)))),
            "float32"
        );
        let beyond: f64 = "1.8e308".parse().unwrap();
        assert_eq!(numeric_type_tag(&number_with_max(Some(beyond))), "float64");
        assert_eq!(numeric_type_tag(&number_with_max(Some(3.5e38))), "float64");
        assert_eq!(numeric_type_tag(&number_with_max(None)), "float64");
        // Negative maxima always fit.
        assert_eq!(numeric_type_tag(&number_with_max(Some(-1.0))), "float32");
    }

    #[test]
    fn test_number_constraints_keep_unset_distinct_from_zero() {
        let cfg = GeneratorConfig::default();
        let node = yaml("{type: integer, minimum: 0, multipleOf: 5, default: 10}");
        let (res, fields, _) = resolve_with(&cfg, "count", &node);
        res.unwrap();
        let Field::Number(f) = &fields["count"] else {
            panic!("Expected number field")
        };
        assert_eq!(f.base.type_tag, "int64");
        assert_eq!(f.min, Some(0.0));
        assert_eq!(f.max, None);
        assert_eq!(f.multiple_of, Some(5.0));
        assert_eq!(f.default, Some(10.0));
        assert_eq!(f.min_exclusive, None);
    }

    #[test]
    fn test_exclusive_dialects() {
        let cfg = GeneratorConfig::default();
        let node = yaml("{type: number, minimum: 1, exclusiveMinimum: true, exclusiveMaximum: 100}");
        let (res, fields, _) = resolve_with(&cfg, "ratio", &node);
        res.unwrap();
        let Field::Number(f) = &fields["ratio"] else {
            panic!("Expected number field")
        };
        assert_eq!(f.min_exclusive, Some(1.0));
        assert_eq!(f.max_exclusive, Some(100.0));
        assert_eq!(f.base.type_tag, "float64");
    }

    #[test]
    fn test_string_constraints() {
        let cfg = GeneratorConfig::default();
        let node = yaml(
            "{type: string, pattern: '^[a-z]+$', minLength: 1, maxLength: 64, format: email, default: a}",
        );
        let (res, fields, _) = resolve_with(&cfg, "email", &node);
        res.unwrap();
        let Field::String(f) = &fields["email"] else {
            panic!("Expected string field")
        };
        assert_eq!(f.base.type_tag, "string");
        assert_eq!(f.pattern.as_deref(), Some("^[a-z]+$"));
        assert_eq!(f.min_len, Some(1));
        assert_eq!(f.max_len, Some(64));
        assert_eq!(f.format.as_deref(), Some("email"));
        assert_eq!(f.default.as_deref(), Some("a"));
    }

    #[test]
    fn test_boolean_default() {
        let cfg = GeneratorConfig::default();
        let (res, fields, _) = resolve_with(&cfg, "active", &yaml("{type: boolean, default: true}"));
        res.unwrap();
        let Field::Boolean(f) = &fields["active"] else {
            panic!("Expected boolean field")
        };
        assert_eq!(f.base.type_tag, "bool");
        assert_eq!(f.default, Some(true));
    }

    #[test]
    fn test_mistyped_default_is_rejected() {
        let cfg = GeneratorConfig::default();
        let (res, _, _) = resolve_with(&cfg, "active", &yaml("{type: boolean, default: 'yes'}"));
        assert!(matches!(
            res,
            Err(SchemaError::InvalidDefault { expected: "boolean", .. })
        ));
    }
}
