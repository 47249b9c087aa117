//! `$ref` handling.
//!
//! - `http` / `https`: handed to the loader only when allow-listed.
//! - any other scheme: rejected.
//! - relative document: resolved against the current document, loaded once,
//!   and its component schemas registered.
//! - fragment only: matched against schemas already registered for the
//!   current document.
//!
//! In expand mode the target schema is then resolved inline; a target that
//! is already on the resolution stack is a cycle. A target expands once per
//! top-level schema; later references share the result.

use super::{ResolutionContext, Resolver};
use crate::config::{DegradePolicy, ReferenceMode};
use crate::document::SchemaNode;
use crate::error::{SchemaError, SchemaResult};
use crate::fields::{Fields, RefField, RefTarget};
use crate::ref_utils::{canonical_item, parse_reference, strip_fragment, ReferenceKind};
use std::sync::Arc;
use url::Url;

impl Resolver<'_> {
    pub(super) fn resolve_reference(
        &mut self,
        name: &str,
        reference: &str,
        node: &SchemaNode,
        ctx: ResolutionContext<'_>,
    ) -> SchemaResult<RefField> {
        let field = RefField {
            base: self.field_base(name, node, ctx, "ref"),
            reference: reference.to_string(),
            target: None,
            resolved: None,
        };

        let invalid = |reason: String| SchemaError::InvalidReference {
            field: name.to_string(),
            reference: reference.to_string(),
            reason,
        };

        let parsed = parse_reference(reference).map_err(|e| invalid(e.to_string()))?;
        let target_url = match parsed.kind {
            ReferenceKind::Unsupported { scheme } => {
                return Err(SchemaError::UnsupportedReferenceScheme {
                    field: name.to_string(),
                    reference: reference.to_string(),
                    scheme,
                });
            }
            ReferenceKind::Remote { .. } => {
                let url = Url::parse(reference).map_err(|e| invalid(e.to_string()))?;
                if !self.config.remote_refs.is_allowed(url.as_str()) {
                    let err = SchemaError::RemoteReferenceDisallowed {
                        field: name.to_string(),
                        reference: reference.to_string(),
                    };
                    return self.degrade(field, err, self.config.remote_refs.on_disallowed);
                }
                if let Err(err) = self.ensure_loaded(reference, &url) {
                    return self.degrade(field, err, self.config.on_load_failure);
                }
                url
            }
            ReferenceKind::Relative => {
                let url = ctx
                    .doc_path
                    .join(reference)
                    .map_err(|e| invalid(e.to_string()))?;
                if let Err(err) = self.ensure_loaded(reference, &url) {
                    return self.degrade(field, err, self.config.on_load_failure);
                }
                url
            }
            ReferenceKind::Local => ctx
                .doc_path
                .join(reference)
                .map_err(|e| invalid(e.to_string()))?,
        };

        let target_url = canonical_item(&target_url).map_err(|e| invalid(e.to_string()))?;
        let Some(info) = self.registry.lookup(&target_url) else {
            let err = SchemaError::UnresolvedReference {
                field: name.to_string(),
                reference: target_url.to_string(),
            };
            return self.degrade(field, err, self.config.on_load_failure);
        };

        let target_name = info.name.clone();
        let schema = info.schema.clone();
        let doc_path = info.doc_path.clone();
        let base_path = info.base_path.clone();
        let item_path = info.item_path.clone();

        let mut field = RefField {
            target: Some(RefTarget {
                schema: target_name.clone(),
                doc_path: doc_path.to_string(),
                item_path: item_path.to_string(),
            }),
            ..field
        };

        if self.config.references == ReferenceMode::Link {
            return Ok(field);
        }

        // A finished expansion contains no cycle through any stack entry.
        if let Some(done) = self.expanded.get(&item_path) {
            field.resolved = Some(Arc::clone(done));
            return Ok(field);
        }

        if let Some(pos) = self.resolving.iter().position(|u| *u == item_path) {
            let mut cycle: Vec<String> = self.resolving[pos..].iter().map(Url::to_string).collect();
            cycle.push(item_path.to_string());
            return Err(SchemaError::CyclicSchema { cycle });
        }

        self.resolving.push(item_path.clone());
        let mut scratch = Fields::new();
        let outcome = self.resolve(
            &target_name,
            &schema,
            ResolutionContext::root(&doc_path, &base_path),
            &mut scratch,
        );
        self.resolving.pop();
        outcome?;

        if let Some(resolved) = scratch.shift_remove(&target_name) {
            let resolved = Arc::new(resolved);
            self.expanded.insert(item_path, Arc::clone(&resolved));
            field.resolved = Some(resolved);
        }
        Ok(field)
    }

    /// Loads the document behind `url` unless it is already indexed, and
    /// registers its component schemas.
    fn ensure_loaded(&mut self, reference: &str, url: &Url) -> SchemaResult<()> {
        let doc_url = strip_fragment(url.clone());
        if self.registry.has_document(&doc_url) {
            return Ok(());
        }

        let load_error = |reason: String| SchemaError::ReferenceLoad {
            reference: reference.to_string(),
            document: doc_url.to_string(),
            reason,
        };

        let document = self
            .loader
            .load(&doc_url)
            .map_err(|e| load_error(e.to_string()))?;
        tracing::debug!(document = %doc_url, schemas = document.schemas().count(), "loaded referenced document");
        self.registry
            .add_document_at(&doc_url, &document)
            .map_err(|e| load_error(e.to_string()))
    }

    fn degrade(
        &self,
        field: RefField,
        err: SchemaError,
        policy: DegradePolicy,
    ) -> SchemaResult<RefField> {
        match policy {
            DegradePolicy::Fail => Err(err),
            DegradePolicy::Unresolved => {
                tracing::warn!(reference = %field.reference, error = %err, "leaving reference unresolved");
                Ok(field)
            }
        }
    }
}
