//! Composite handlers: `object` composition and untyped arrays.
//!
//! Members are collected in this order: `oneOf` alternatives, `allOf`
//! members, then `properties`. `oneOf` alternatives and properties replace
//! any earlier field of the same name. With [`CompositionMode::Flatten`],
//! `allOf` members that resolve to an object (inline, or through an expanded
//! `$ref`) contribute their members one by one; anything else, and every
//! member under [`CompositionMode::Nest`], lands under the composing
//! object's name. Either way collisions follow the configured
//! [`MergePolicy`].

use super::{RequiredFields, ResolutionContext, Resolver};
use crate::config::{CompositionMode, MergePolicy};
use crate::document::{AdditionalProperties, SchemaNode};
use crate::error::{SchemaError, SchemaResult};
use crate::fields::{ArrayField, Field, Fields, ObjectField, RefField};
use std::sync::Arc;

impl Resolver<'_> {
    pub(super) fn resolve_object(
        &mut self,
        name: &str,
        node: &SchemaNode,
        ctx: ResolutionContext<'_>,
    ) -> SchemaResult<Field> {
        let required: RequiredFields = node.required.iter().cloned().collect();
        let member_ctx = ctx.members(&required);
        let mut members = Fields::new();

        for alternative in &node.one_of {
            self.resolve(name, alternative, member_ctx, &mut members)?;
        }

        for part in &node.all_of {
            let mut scratch = Fields::new();
            self.resolve(name, part, member_ctx, &mut scratch)?;
            for (key, field) in scratch {
                let contributed = match self.config.all_of_composition {
                    CompositionMode::Flatten => composed_members(key, field),
                    CompositionMode::Nest => vec![(key, field)],
                };
                for (member, mut field) in contributed {
                    if required.contains(&member) {
                        field.base_mut().required = true;
                    }
                    self.merge(name, &mut members, member, field)?;
                }
            }
        }

        for (prop_name, prop) in &node.properties {
            self.resolve(prop_name, prop, member_ctx, &mut members)?;
        }

        let mut additional_properties = Vec::new();
        let mut allow_additional = None;
        match node.additional_properties.as_ref() {
            Some(AdditionalProperties::Allowed(flag)) => allow_additional = Some(*flag),
            Some(AdditionalProperties::Schema(schema)) => {
                let mut scratch = Fields::new();
                self.resolve(name, schema, member_ctx, &mut scratch)?;
                additional_properties.extend(scratch.into_values());
            }
            None => {}
        }

        Ok(Field::Object(ObjectField {
            base: self.field_base(name, node, ctx, "struct"),
            members,
            additional_properties,
            allow_additional,
            min_properties: node.min_properties,
            max_properties: node.max_properties,
        }))
    }

    pub(super) fn resolve_untyped_array(
        &mut self,
        name: &str,
        node: &SchemaNode,
        ctx: ResolutionContext<'_>,
    ) -> Field {
        Field::Array(ArrayField {
            base: self.field_base(name, node, ctx.array(), "any"),
        })
    }

    fn merge(
        &self,
        object: &str,
        members: &mut Fields,
        member: String,
        field: Field,
    ) -> SchemaResult<()> {
        if members.contains_key(&member) && self.config.all_of_merge == MergePolicy::RejectConflicts {
            return Err(SchemaError::MergeConflict {
                object: object.to_string(),
                field: member,
            });
        }
        members.insert(member, field);
        Ok(())
    }
}

/// Splits an `allOf` result into the members it contributes.
fn composed_members(key: String, field: Field) -> Vec<(String, Field)> {
    match field {
        Field::Object(obj) => obj.members.into_iter().collect(),
        Field::Reference(RefField {
            resolved: Some(resolved),
            ..
        }) if matches!(*resolved, Field::Object(_)) => {
            composed_members(key, Arc::unwrap_or_clone(resolved))
        }
        other => vec![(key, other)],
    }
}
