//! # Reference Utilities
//!
//! Helpers for turning document paths, base paths and `$ref` strings into
//! absolute URLs. All joining goes through RFC 3986 resolution in `url`.

use crate::error::{SchemaError, SchemaResult};
use percent_encoding::percent_decode_str;
use std::path::Path;
use url::{ParseError, Url};

/// The classification of a `$ref` string.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReferenceKind {
    /// `#/components/schemas/Pet`
    Local,
    /// `common.yaml#/components/schemas/Pet`
    Relative,
    /// `https://example.com/common.yaml#/...`
    Remote {
        /// Lower-cased scheme (`http` or `https`).
        scheme: String,
    },
    /// Any other absolute URI (`ftp:`, `file:`, `urn:` ...).
    Unsupported {
        /// Lower-cased scheme.
        scheme: String,
    },
}

/// A `$ref` split into its document part and fragment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedReference<'a> {
    /// Reference kind.
    pub kind: ReferenceKind,
    /// Everything before `#`.
    pub document: &'a str,
    /// Everything after `#`, if present.
    pub fragment: Option<&'a str>,
}

/// Splits and classifies a reference string.
///
/// Fails when the string has a scheme but is not a valid absolute URI.
pub fn parse_reference(reference: &str) -> Result<ParsedReference<'_>, ParseError> {
    let (document, fragment) = match reference.split_once('#') {
        Some((doc, frag)) => (doc, Some(frag)),
        None => (reference, None),
    };

    let kind = match Url::parse(reference) {
        Ok(url) => match url.scheme() {
            "http" | "https" => ReferenceKind::Remote {
                scheme: url.scheme().to_string(),
            },
            other => ReferenceKind::Unsupported {
                scheme: other.to_string(),
            },
        },
        Err(ParseError::RelativeUrlWithoutBase) => {
            if document.is_empty() {
                ReferenceKind::Local
            } else {
                ReferenceKind::Relative
            }
        }
        Err(e) => return Err(e),
    };

    Ok(ParsedReference {
        kind,
        document,
        fragment,
    })
}

/// Parses a document path into an absolute URL.
///
/// Absolute URLs are taken as-is; filesystem paths become `file:` URLs,
/// relative ones against the current working directory.
pub fn parse_doc_path(doc_path: &str) -> SchemaResult<Url> {
    let malformed = |reason: String| SchemaError::MalformedPath {
        path: doc_path.to_string(),
        reason,
    };

    if doc_path.trim().is_empty() {
        return Err(malformed("document path is empty".to_string()));
    }

    match Url::parse(doc_path) {
        Ok(url) if !looks_like_drive_letter(&url) => Ok(strip_fragment(url)),
        Ok(_) | Err(ParseError::RelativeUrlWithoutBase) => {
            let path = Path::new(doc_path);
            let absolute = if path.is_absolute() {
                path.to_path_buf()
            } else {
                std::env::current_dir()
                    .map_err(|e| malformed(e.to_string()))?
                    .join(path)
            };
            Url::from_file_path(&absolute)
                .map_err(|_| malformed("not representable as a file URL".to_string()))
        }
        Err(e) => Err(malformed(e.to_string())),
    }
}

/// Normalizes a base path to a JSON pointer (`#/components/schemas/` → `/components/schemas`).
pub fn normalize_pointer(base_path: &str) -> SchemaResult<String> {
    let trimmed = base_path.trim();
    let pointer = trimmed.strip_prefix('#').unwrap_or(trimmed);
    if pointer.contains('#') || pointer.chars().any(char::is_whitespace) {
        return Err(SchemaError::MalformedPath {
            path: base_path.to_string(),
            reason: "not a JSON pointer".to_string(),
        });
    }
    let pointer = pointer.trim_end_matches('/');
    if pointer.is_empty() {
        return Ok(String::new());
    }
    if pointer.starts_with('/') {
        Ok(pointer.to_string())
    } else {
        Ok(format!("/{}", pointer))
    }
}

/// Builds the absolute item URL of `name` under `pointer` in `doc`.
pub fn item_url(doc: &Url, pointer: &str, name: &str) -> SchemaResult<Url> {
    let fragment = format!("#{}/{}", pointer, encode_pointer_segment(name));
    doc.join(&fragment).map_err(|e| SchemaError::MalformedPath {
        path: fragment.clone(),
        reason: e.to_string(),
    })
}

/// The parent pointer of a fragment (`/components/schemas/Pet` → `/components/schemas`).
pub fn parent_pointer(fragment: &str) -> String {
    let pointer = fragment.trim_end_matches('/');
    match pointer.rfind('/') {
        Some(idx) => pointer[..idx].to_string(),
        None => String::new(),
    }
}

/// Returns `url` without its fragment.
pub fn strip_fragment(mut url: Url) -> Url {
    url.set_fragment(None);
    url
}

/// Encodes a JSON Pointer segment (`~` → `~0`, `/` → `~1`).
pub fn encode_pointer_segment(segment: &str) -> String {
    segment.replace('~', "~0").replace('/', "~1")
}

/// Decodes a JSON Pointer segment taken from a URI fragment.
///
/// Percent escapes are undone before `~1` / `~0`, so `%7E1` reads as `/`.
pub fn decode_pointer_segment(segment: &str) -> String {
    percent_decode_str(segment)
        .decode_utf8_lossy()
        .replace("~1", "/")
        .replace("~0", "~")
}

/// Rewrites the fragment of `target` to the spelling [`item_url`] produces,
/// so escaped and unescaped forms of the same schema pointer compare equal.
pub fn canonical_item(target: &Url) -> SchemaResult<Url> {
    let Some(fragment) = target.fragment() else {
        return Ok(target.clone());
    };
    let pointer = normalize_pointer(&parent_pointer(fragment))?;
    let name = fragment
        .trim_end_matches('/')
        .rsplit('/')
        .next()
        .unwrap_or_default();
    item_url(
        &strip_fragment(target.clone()),
        &pointer,
        &decode_pointer_segment(name),
    )
}

// `C:\specs\api.yaml` parses as a URL with scheme `c`.
fn looks_like_drive_letter(url: &Url) -> bool {
    url.scheme().len() == 1 && cfg!(windows)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_reference_kinds() {
        let local = parse_reference("#/components/schemas/Pet").unwrap();
        assert_eq!(local.kind, ReferenceKind::Local);
        assert_eq!(local.document, "");
        assert_eq!(local.fragment, Some("/components/schemas/Pet"));

        let relative = parse_reference("../common.yaml#/components/schemas/Id").unwrap();
        assert_eq!(relative.kind, ReferenceKind::Relative);
        assert_eq!(relative.document, "../common.yaml");

        let remote = parse_reference("https://example.com/a.yaml#/x").unwrap();
        assert_eq!(
            remote.kind,
            ReferenceKind::Remote {
                scheme: "https".into()
            }
        );

        let ftp = parse_reference("ftp://example.com/a.yaml").unwrap();
        assert_eq!(
            ftp.kind,
            ReferenceKind::Unsupported {
                scheme: "ftp".into()
            }
        );
    }

    #[test]
    fn test_parse_reference_invalid() {
        assert!(parse_reference("http://[::1").is_err());
    }

    #[test]
    fn test_doc_path_from_url_and_file() {
        let url = parse_doc_path("https://example.com/api.yaml#ignored").unwrap();
        assert_eq!(url.as_str(), "https://example.com/api.yaml");

        let file = parse_doc_path("/specs/api.yaml").unwrap();
        assert_eq!(file.scheme(), "file");
        assert!(file.path().ends_with("/specs/api.yaml"));

        let err = parse_doc_path("").unwrap_err();
        assert!(matches!(err, SchemaError::MalformedPath { .. }));
    }

    #[test]
    fn test_normalize_pointer() {
        assert_eq!(
            normalize_pointer("#/components/schemas/").unwrap(),
            "/components/schemas"
        );
        assert_eq!(
            normalize_pointer("components/schemas").unwrap(),
            "/components/schemas"
        );
        assert_eq!(normalize_pointer("#").unwrap(), "");
        assert!(normalize_pointer("#/a#b").is_err());
    }

    #[test]
    fn test_item_url_matches_joined_reference() {
        let doc = Url::parse("file:///specs/api.yaml").unwrap();
        let item = item_url(&doc, "/components/schemas", "Pet").unwrap();
        let via_ref = doc.join("#/components/schemas/Pet").unwrap();
        assert_eq!(item, via_ref);

        let other = doc.join("common.yaml#/components/schemas/Pet").unwrap();
        assert_eq!(other.as_str(), "file:///specs/common.yaml#/components/schemas/Pet");
    }

    #[test]
    fn test_pointer_segments() {
        assert_eq!(encode_pointer_segment("a/b~c"), "a~1b~0c");
        assert_eq!(decode_pointer_segment("User%20Profile~1details"), "User Profile/details");
        assert_eq!(decode_pointer_segment("%7E1"), "/");
        assert_eq!(decode_pointer_segment("a~01"), "a~1");
        assert_eq!(parent_pointer("/components/schemas/Pet"), "/components/schemas");
        assert_eq!(parent_pointer("Pet"), "");
    }

    #[test]
    fn test_canonical_item_matches_registered_spelling() {
        let doc = Url::parse("file:///specs/api.yaml").unwrap();
        let registered = item_url(&doc, "/components/schemas", "a/b").unwrap();
        assert_eq!(registered.fragment(), Some("/components/schemas/a~1b"));

        let escaped = doc.join("#/components/schemas/a%7E1b").unwrap();
        assert_ne!(escaped, registered);
        assert_eq!(canonical_item(&escaped).unwrap(), registered);
        assert_eq!(canonical_item(&registered).unwrap(), registered);

        assert_eq!(canonical_item(&doc).unwrap(), doc);
    }
}
