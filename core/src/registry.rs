//! # Schema Registry
//!
//! Stores every named schema of a generation run together with the document
//! it was declared in. Two indices are kept:
//!
//! - `schema_infos`: name → `SchemaInfo`, the generation worklist.
//! - `references`: document URL → (item URL → name), used to find the schema
//!   a `$ref` points at.
//!
//! A referenced document may declare a name that is already taken by another
//! document. Such a schema is still indexed by item URL, so references to it
//! resolve, but it stays out of the name worklist.
//!
//! No network access is performed here; documents arrive through
//! [`SchemaGen::add_document`] or the reference resolver.

use crate::document::{SchemaDocument, SchemaNode, COMPONENT_SCHEMAS_POINTER};
use crate::error::{SchemaError, SchemaResult};
use crate::fields::Fields;
use crate::naming::XmlPrefixes;
use crate::ref_utils::{item_url, normalize_pointer, parse_doc_path, strip_fragment};
use indexmap::IndexMap;
use std::collections::HashMap;
use std::sync::Arc;
use url::Url;

/// A registered schema and its generation output.
#[derive(Debug, Clone)]
pub struct SchemaInfo {
    /// Registered name.
    pub name: String,
    /// The schema node.
    pub schema: Arc<SchemaNode>,
    /// Document the schema was declared in.
    pub doc_path: Url,
    /// JSON pointer of the section holding the schema (e.g. `/components/schemas`).
    pub base_path: String,
    /// Absolute location of the schema (`doc_path` + `#base_path/name`).
    pub item_path: Url,
    /// Resolved top-level fields, filled by generation.
    pub fields: Fields,
    /// XML prefix → namespace bindings collected while resolving this schema.
    pub xml_prefixes: XmlPrefixes,
}

/// Registry of named schemas, plus the generation entry points.
#[derive(Debug, Default)]
pub struct SchemaGen {
    schema_infos: IndexMap<String, SchemaInfo>,
    references: HashMap<String, HashMap<String, String>>,
    shadowed: HashMap<String, SchemaInfo>,
}

impl SchemaGen {
    /// Creates an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers `schema` under `name`.
    ///
    /// The item path is `base_path + "/" + name` resolved against `doc_path`.
    /// Registering the same name for the same location again is a no-op;
    /// registering it for another location is a `DuplicateSchema` error.
    pub fn add(
        &mut self,
        name: &str,
        doc_path: &str,
        base_path: &str,
        schema: SchemaNode,
    ) -> SchemaResult<()> {
        let doc_url = parse_doc_path(doc_path)?;
        self.add_at(name, &doc_url, base_path, Arc::new(schema))
    }

    /// Registers every component schema of `document`, declared at `doc_path`.
    ///
    /// A name already registered for another document does not fail the
    /// call: the schema is indexed by its item URL only.
    pub fn add_document(&mut self, doc_path: &str, document: &SchemaDocument) -> SchemaResult<()> {
        let doc_url = parse_doc_path(doc_path)?;
        self.add_document_at(&doc_url, document)
    }

    pub(crate) fn add_document_at(
        &mut self,
        doc_url: &Url,
        document: &SchemaDocument,
    ) -> SchemaResult<()> {
        let doc_url = strip_fragment(doc_url.clone());
        // Indexed up front so a document is never loaded twice.
        self.references.entry(doc_url.to_string()).or_default();

        for (name, schema) in document.schemas() {
            let schema = Arc::new(schema.clone());
            let info = self.new_info(name, &doc_url, COMPONENT_SCHEMAS_POINTER, schema)?;
            if self.shadowed.contains_key(info.item_path.as_str()) {
                continue;
            }
            match self.schema_infos.get(name) {
                Some(existing) if existing.item_path != info.item_path => {
                    tracing::warn!(
                        schema = name,
                        existing = %existing.item_path,
                        shadowed = %info.item_path,
                        "schema name already registered, indexing by location only"
                    );
                    self.index(&info);
                    self.shadowed.insert(info.item_path.to_string(), info);
                }
                Some(_) => {}
                None => self.insert(info),
            }
        }
        Ok(())
    }

    pub(crate) fn add_at(
        &mut self,
        name: &str,
        doc_url: &Url,
        base_path: &str,
        schema: Arc<SchemaNode>,
    ) -> SchemaResult<()> {
        let info = self.new_info(name, doc_url, base_path, schema)?;

        if let Some(existing) = self.schema_infos.get(name) {
            if existing.item_path == info.item_path {
                return Ok(());
            }
            return Err(SchemaError::DuplicateSchema {
                name: name.to_string(),
                existing: existing.item_path.to_string(),
                incoming: info.item_path.to_string(),
            });
        }

        self.insert(info);
        Ok(())
    }

    fn new_info(
        &self,
        name: &str,
        doc_url: &Url,
        base_path: &str,
        schema: Arc<SchemaNode>,
    ) -> SchemaResult<SchemaInfo> {
        let doc_url = strip_fragment(doc_url.clone());
        let pointer = normalize_pointer(base_path)?;
        let item = item_url(&doc_url, &pointer, name)?;
        Ok(SchemaInfo {
            name: name.to_string(),
            schema,
            doc_path: doc_url,
            base_path: pointer,
            item_path: item,
            fields: Fields::new(),
            xml_prefixes: XmlPrefixes::new(),
        })
    }

    fn index(&mut self, info: &SchemaInfo) {
        self.references
            .entry(info.doc_path.to_string())
            .or_default()
            .insert(info.item_path.to_string(), info.name.clone());
    }

    fn insert(&mut self, info: SchemaInfo) {
        tracing::debug!(schema = %info.name, item = %info.item_path, "registered schema");
        self.index(&info);
        self.schema_infos.insert(info.name.clone(), info);
    }

    /// True when the document at `doc_url` has already been indexed.
    pub fn has_document(&self, doc_url: &Url) -> bool {
        self.references
            .contains_key(strip_fragment(doc_url.clone()).as_str())
    }

    /// Finds the schema registered at the absolute `item` URL.
    pub fn lookup(&self, item: &Url) -> Option<&SchemaInfo> {
        let doc = strip_fragment(item.clone());
        let name = self.references.get(doc.as_str())?.get(item.as_str())?;
        self.schema_infos
            .get(name)
            .filter(|info| info.item_path == *item)
            .or_else(|| self.shadowed.get(item.as_str()))
    }

    /// Returns a registered schema by name.
    pub fn get(&self, name: &str) -> Option<&SchemaInfo> {
        self.schema_infos.get(name)
    }

    pub(crate) fn get_mut(&mut self, name: &str) -> Option<&mut SchemaInfo> {
        self.schema_infos.get_mut(name)
    }

    pub(crate) fn get_index(&self, idx: usize) -> Option<&SchemaInfo> {
        self.schema_infos.get_index(idx).map(|(_, info)| info)
    }

    /// All registered schemas, in registration order.
    pub fn schema_infos(&self) -> impl Iterator<Item = &SchemaInfo> {
        self.schema_infos.values()
    }

    /// Number of registered schemas.
    pub fn len(&self) -> usize {
        self.schema_infos.len()
    }

    /// True when nothing is registered.
    pub fn is_empty(&self) -> bool {
        self.schema_infos.is_empty()
    }

    /// Item paths registered for the document at `doc_url`.
    pub fn item_paths(&self, doc_url: &Url) -> Vec<&str> {
        let mut items: Vec<&str> = self
            .references
            .get(strip_fragment(doc_url.clone()).as_str())
            .map(|m| m.keys().map(String::as_str).collect())
            .unwrap_or_default();
        items.sort_unstable();
        items
    }

    /// Serializes the generation output: name → document, fields and XML prefixes.
    pub fn to_json(&self) -> serde_json::Value {
        let mut out = serde_json::Map::new();
        for info in self.schema_infos.values() {
            out.insert(
                info.name.clone(),
                serde_json::json!({
                    "docPath": info.doc_path.as_str(),
                    "basePath": info.base_path,
                    "itemPath": info.item_path.as_str(),
                    "fields": info.fields,
                    "xmlPrefixes": info.xml_prefixes,
                }),
            );
        }
        serde_json::Value::Object(out)
    }
}
