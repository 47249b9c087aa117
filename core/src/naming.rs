//! # Naming Policy
//!
//! Maps raw schema property names to exported / local identifiers and to the
//! serialized name used by each content type.

use crate::document::XmlMapping;
use heck::{ToLowerCamelCase, ToUpperCamelCase};
use std::collections::BTreeMap;

/// Content type tag for the JSON representation.
pub const JSON_CONTENT_TYPE: &str = "application/json";
/// Content type tag for the XML representation.
pub const XML_CONTENT_TYPE: &str = "text/xml";

/// Content type → serialized name.
pub type TargetNames = BTreeMap<String, String>;

/// XML prefix → namespace URI, accumulated per top-level schema.
pub type XmlPrefixes = BTreeMap<String, String>;

/// Exported identifier for a property (`user_id` → `UserId`).
pub fn field_name(raw: &str) -> String {
    sanitize(raw.to_upper_camel_case(), "Field")
}

/// Local identifier for a property (`user_id` → `userId`).
pub fn var_name(raw: &str) -> String {
    sanitize(raw.to_lower_camel_case(), "field")
}

/// Serialized names for `raw`.
///
/// JSON always uses the raw name. XML is only present when the schema carries
/// an XML mapping; its name is `[prefix ":"] + (xml.name | raw)`. A declared
/// namespace is recorded in `prefixes` under its prefix (the empty string
/// stands for the default namespace).
pub fn target_names(raw: &str, xml: Option<&XmlMapping>, prefixes: &mut XmlPrefixes) -> TargetNames {
    let mut names = TargetNames::new();
    names.insert(JSON_CONTENT_TYPE.to_string(), raw.to_string());

    let Some(xml) = xml else {
        return names;
    };

    let local = xml.name.as_deref().unwrap_or(raw);
    let qualified = match xml.prefix.as_deref() {
        Some(prefix) if !prefix.is_empty() => format!("{}:{}", prefix, local),
        _ => local.to_string(),
    };

    if let Some(namespace) = xml.namespace.as_deref() {
        let prefix = xml.prefix.clone().unwrap_or_default();
        match prefixes.get(&prefix) {
            Some(existing) if existing != namespace => {
                tracing::warn!(
                    prefix = %prefix,
                    existing = %existing,
                    ignored = %namespace,
                    "XML prefix already bound to a different namespace"
                );
            }
            Some(_) => {}
            None => {
                prefixes.insert(prefix, namespace.to_string());
            }
        }
    }

    names.insert(XML_CONTENT_TYPE.to_string(), qualified);
    names
}

fn sanitize(ident: String, fallback: &str) -> String {
    if ident.is_empty() {
        return fallback.to_string();
    }
    if ident.starts_with(|c: char| c.is_ascii_digit()) {
        return format!("_{}", ident);
    }
    ident
}
