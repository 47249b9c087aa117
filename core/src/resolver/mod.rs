//! # Resolver Module
//!
//! Recursive descent from a schema node to `Field` entries.
//!
//! Handles:
//! - Dispatch on `$ref` first, then on the declared `type`.
//! - Scalar handlers (`boolean`, `integer`/`number`, `string`).
//! - `array` flattening and `object` composition (`oneOf`, `allOf`, `properties`).
//! - `$ref` resolution across documents, with cycle detection.

pub mod context;
mod objects;
mod refs;
mod scalars;

pub use context::{RequiredFields, ResolutionContext};

use crate::config::{GeneratorConfig, UnknownTypePolicy};
use crate::document::SchemaNode;
use crate::error::{SchemaError, SchemaResult};
use crate::fields::{Field, FieldBase, Fields};
use crate::loader::DocumentLoader;
use crate::naming::{self, XmlPrefixes};
use crate::registry::SchemaGen;
use std::collections::HashMap;
use std::sync::Arc;
use url::Url;

/// Resolver state for one top-level schema.
///
/// The XML prefix accumulator, the stack of schemas being expanded and the
/// targets already expanded live here; everything else travels in the
/// [`ResolutionContext`].
pub struct Resolver<'g> {
    registry: &'g mut SchemaGen,
    loader: &'g dyn DocumentLoader,
    config: &'g GeneratorConfig,
    xml_prefixes: XmlPrefixes,
    resolving: Vec<Url>,
    expanded: HashMap<Url, Arc<Field>>,
}

impl<'g> Resolver<'g> {
    /// Creates a resolver writing new registrations into `registry`.
    pub fn new(
        registry: &'g mut SchemaGen,
        loader: &'g dyn DocumentLoader,
        config: &'g GeneratorConfig,
    ) -> Self {
        Self {
            registry,
            loader,
            config,
            xml_prefixes: XmlPrefixes::new(),
            resolving: Vec::new(),
            expanded: HashMap::new(),
        }
    }

    /// Marks the schema at `item` as being resolved, for cycle detection.
    pub fn enter(&mut self, item: Url) {
        self.resolving.push(item);
    }

    /// Consumes the resolver, returning the XML prefixes it collected.
    pub fn into_xml_prefixes(self) -> XmlPrefixes {
        self.xml_prefixes
    }

    /// Resolves `node` and inserts exactly one field named `name` into `scope`.
    pub fn resolve(
        &mut self,
        name: &str,
        node: &SchemaNode,
        ctx: ResolutionContext<'_>,
        scope: &mut Fields,
    ) -> SchemaResult<()> {
        if let Some(reference) = node.reference.as_deref() {
            let field = self.resolve_reference(name, reference, node, ctx)?;
            scope.insert(name.to_string(), Field::Reference(field));
            return Ok(());
        }

        let field = match node.declared_type() {
            Some("boolean") => self.resolve_boolean(name, node, ctx)?,
            Some("integer") | Some("number") => self.resolve_numeric(name, node, ctx)?,
            Some("string") => self.resolve_string(name, node, ctx)?,
            Some("array") => match node.items.as_deref() {
                // The element takes the array's place under the same name.
                Some(items) => return self.resolve(name, items, ctx.array(), scope),
                None => self.resolve_untyped_array(name, node, ctx),
            },
            Some("object") => self.resolve_object(name, node, ctx)?,
            declared => match self.config.unknown_types {
                UnknownTypePolicy::Error => {
                    return Err(SchemaError::UnknownSchemaType {
                        field: name.to_string(),
                        declared: declared.map(String::from),
                    })
                }
                UnknownTypePolicy::EmitUnknown => {
                    tracing::debug!(field = name, ?declared, "emitting unknown field");
                    Field::Unknown(self.field_base(name, node, ctx, "unknown"))
                }
            },
        };

        scope.insert(name.to_string(), field);
        Ok(())
    }

    /// Attributes shared by every variant.
    fn field_base(
        &mut self,
        name: &str,
        node: &SchemaNode,
        ctx: ResolutionContext<'_>,
        type_tag: &str,
    ) -> FieldBase {
        FieldBase {
            type_tag: type_tag.to_string(),
            name: naming::field_name(name),
            var_name: naming::var_name(name),
            target_names: naming::target_names(name, node.xml.as_ref(), &mut self.xml_prefixes),
            required: ctx.is_required(name),
            is_array: ctx.is_array,
            nullable: node.is_nullable(),
            xml_attribute: node.xml.as_ref().is_some_and(|x| x.attribute),
            description: node.description.clone(),
            deprecated: node.deprecated.unwrap_or(false),
            path: String::new(),
        }
    }
}

#[cfg(test)]
pub(crate) mod test_support {
    use super::*;
    use crate::loader::InMemoryLoader;

    pub(crate) const DOC: &str = "file:///specs/api.yaml";

    /// Resolves `node` under `name` with a throwaway registry.
    pub(crate) fn resolve_with(
        config: &GeneratorConfig,
        name: &str,
        node: &SchemaNode,
    ) -> (SchemaResult<()>, Fields, XmlPrefixes) {
        let mut registry = SchemaGen::new();
        let loader = InMemoryLoader::new();
        let doc = Url::parse(DOC).unwrap();
        let mut fields = Fields::new();
        let mut resolver = Resolver::new(&mut registry, &loader, config);
        let result = resolver.resolve(
            name,
            node,
            ResolutionContext::root(&doc, "/components/schemas"),
            &mut fields,
        );
        (result, fields, resolver.into_xml_prefixes())
    }

    pub(crate) fn yaml(text: &str) -> SchemaNode {
        serde_yaml::from_str(text).unwrap()
    }
}

#[cfg(test)]
mod tests {
    use super::test_support::*;
    use super::*;
    use crate::naming::{JSON_CONTENT_TYPE, XML_CONTENT_TYPE};

    #[test]
    fn test_inserts_exactly_one_field() {
        let cfg = GeneratorConfig::default();
        let (res, fields, _) = resolve_with(&cfg, "title", &SchemaNode::of_type("string"));
        res.unwrap();
        assert_eq!(fields.len(), 1);
        let field = &fields["title"];
        assert_eq!(field.name(), "Title");
        assert_eq!(field.base().var_name, "title");
        assert_eq!(field.target_name(JSON_CONTENT_TYPE), Some("title"));
        assert_eq!(field.target_name(XML_CONTENT_TYPE), None);
    }

    #[test]
    fn test_unknown_type_is_an_error_by_default() {
        let cfg = GeneratorConfig::default();
        let (res, fields, _) = resolve_with(&cfg, "blob", &SchemaNode::default());
        match res.unwrap_err() {
            SchemaError::UnknownSchemaType { field, declared } => {
                assert_eq!(field, "blob");
                assert_eq!(declared, None);
            }
            other => panic!("unexpected error: {}", other),
        }
        assert!(fields.is_empty());

        let (res, _, _) = resolve_with(&cfg, "x", &SchemaNode::of_type("file"));
        assert!(matches!(
            res,
            Err(SchemaError::UnknownSchemaType { declared: Some(_), .. })
        ));
    }

    #[test]
    fn test_unknown_type_can_be_emitted() {
        let cfg = GeneratorConfig {
            unknown_types: UnknownTypePolicy::EmitUnknown,
            ..GeneratorConfig::default()
        };
        let (res, fields, _) = resolve_with(&cfg, "blob", &SchemaNode::default());
        res.unwrap();
        assert!(matches!(&fields["blob"], Field::Unknown(b) if b.type_tag == "unknown"));
    }

    #[test]
    fn test_base_attributes_copied() {
        let cfg = GeneratorConfig::default();
        let node = yaml(
            "{type: [string, 'null'], description: Display name, deprecated: true, xml: {attribute: true}}",
        );
        let (res, fields, _) = resolve_with(&cfg, "display_name", &node);
        res.unwrap();
        let base = fields["display_name"].base();
        assert_eq!(base.name, "DisplayName");
        assert_eq!(base.var_name, "displayName");
        assert!(base.nullable);
        assert!(base.deprecated);
        assert!(base.xml_attribute);
        assert_eq!(base.description.as_deref(), Some("Display name"));
        assert_eq!(base.target_names[XML_CONTENT_TYPE], "display_name");
    }
}
