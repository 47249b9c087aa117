//! # Error Handling
//!
//! Provides the unified `SchemaError` enum used across the resolver, plus the
//! per-schema failure records collected by a generation run.

use derive_more::{Display, From};

/// The Global Error Enum.
///
/// We use `derive_more` for boilerplate.
/// Note: String errors default to `General`.
#[derive(Debug, Display, From)]
pub enum SchemaError {
    /// A document, base or item path could not be parsed as a URI reference.
    #[from(ignore)]
    #[display("Malformed path '{path}': {reason}")]
    MalformedPath {
        /// The offending path as given.
        path: String,
        /// Parser diagnostic.
        reason: String,
    },

    /// A `$ref` uses a scheme other than empty / http / https.
    #[from(ignore)]
    #[display("Unsupported protocol '{scheme}' in reference '{reference}' of field '{field}'. Only http or https are valid")]
    UnsupportedReferenceScheme {
        /// Field holding the reference.
        field: String,
        /// Raw reference string.
        reference: String,
        /// The rejected scheme.
        scheme: String,
    },

    /// A `$ref` targets http/https and is not on the allow-list.
    #[from(ignore)]
    #[display("Remote reference '{reference}' of field '{field}' is not allow-listed")]
    RemoteReferenceDisallowed {
        /// Field holding the reference.
        field: String,
        /// Raw reference string.
        reference: String,
    },

    /// The document behind an external reference could not be read or parsed.
    #[from(ignore)]
    #[display("Failed to load '{document}' for reference '{reference}': {reason}")]
    ReferenceLoad {
        /// Raw reference string.
        reference: String,
        /// Absolute location of the document.
        document: String,
        /// Loader diagnostic.
        reason: String,
    },

    /// Reference recursion revisited a schema that is still being resolved.
    #[from(ignore)]
    #[display("Cyclic schema reference: {}", cycle.join(" -> "))]
    CyclicSchema {
        /// Item paths on the cycle, starting and ending with the revisited schema.
        cycle: Vec<String>,
    },

    /// A schema node declares no recognised type and no reference.
    #[from(ignore)]
    #[display("Unknown schema type {declared:?} for field '{field}'")]
    UnknownSchemaType {
        /// Field name.
        field: String,
        /// The declared type, if any.
        declared: Option<String>,
    },

    /// A reference string is not a valid URI reference.
    #[from(ignore)]
    #[display("Invalid URI reference '{reference}' for field '{field}': {reason}")]
    InvalidReference {
        /// Field holding the reference.
        field: String,
        /// Raw reference string.
        reference: String,
        /// Parser diagnostic.
        reason: String,
    },

    /// A reference names no registered schema.
    #[from(ignore)]
    #[display("Reference '{reference}' of field '{field}' matches no registered schema")]
    UnresolvedReference {
        /// Field holding the reference.
        field: String,
        /// Absolute form of the reference.
        reference: String,
    },

    /// A schema name is already registered for a different location.
    #[from(ignore)]
    #[display("Schema '{name}' already registered at '{existing}', cannot register '{incoming}'")]
    DuplicateSchema {
        /// Schema name.
        name: String,
        /// Item path of the existing registration.
        existing: String,
        /// Item path of the rejected registration.
        incoming: String,
    },

    /// Two `allOf` members produced the same field under the reject policy.
    #[from(ignore)]
    #[display("allOf members of '{object}' both define field '{field}'")]
    MergeConflict {
        /// Object being composed.
        object: String,
        /// Colliding field name.
        field: String,
    },

    /// A `default` value does not match the declared type.
    #[from(ignore)]
    #[display("Default of field '{field}' must be a {expected}")]
    InvalidDefault {
        /// Field name.
        field: String,
        /// Expected JSON type.
        expected: &'static str,
    },

    /// A document failed to deserialize.
    #[from(ignore)]
    #[display("Parse Error: {_0}")]
    Parse(String),

    /// Wrapper for standard IO errors.
    #[display("IO Error: {_0}")]
    Io(std::io::Error),

    /// Generic errors.
    #[display("General Error: {_0}")]
    General(String),
}

/// Manual implementation of the standard Error trait.
impl std::error::Error for SchemaError {}

/// Helper type alias for Result using SchemaError.
pub type SchemaResult<T> = Result<T, SchemaError>;

/// A schema that could not be generated, with enough context to locate it.
#[derive(Debug)]
pub struct GenerationFailure {
    /// Registered schema name.
    pub schema: String,
    /// Document the schema was declared in.
    pub doc_path: String,
    /// The underlying error.
    pub error: SchemaError,
}

/// Outcome of one generation run.
#[derive(Debug, Default)]
pub struct GenerationReport {
    /// Names of schemas that resolved cleanly, in visit order.
    pub generated: Vec<String>,
    /// Per-schema failures, in visit order.
    pub failures: Vec<GenerationFailure>,
}

impl GenerationReport {
    /// True when every schema resolved.
    pub fn is_success(&self) -> bool {
        self.failures.is_empty()
    }

    /// Looks up the failure recorded for `schema`.
    pub fn failure(&self, schema: &str) -> Option<&GenerationFailure> {
        self.failures.iter().find(|f| f.schema == schema)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::{Error, ErrorKind};

    #[test]
    fn test_io_conversion() {
        let io_err = Error::new(ErrorKind::Other, "test");
        let err: SchemaError = io_err.into();
        assert!(matches!(err, SchemaError::Io(_)));
    }

    #[test]
    fn test_string_conversion() {
        let msg = String::from("something wrong");
        let err: SchemaError = msg.into();
        match err {
            SchemaError::General(s) => assert_eq!(s, "something wrong"),
            _ => panic!("String should convert to SchemaError::General"),
        }
    }

    #[test]
    fn test_cycle_display() {
        let err = SchemaError::CyclicSchema {
            cycle: vec!["#/A".into(), "#/B".into(), "#/A".into()],
        };
        assert_eq!(err.to_string(), "Cyclic schema reference: #/A -> #/B -> #/A");
    }

    #[test]
    fn test_report_lookup() {
        let mut report = GenerationReport::default();
        assert!(report.is_success());
        report.failures.push(GenerationFailure {
            schema: "Pet".into(),
            doc_path: "file:///api.yaml".into(),
            error: SchemaError::General("boom".into()),
        });
        assert!(!report.is_success());
        assert!(report.failure("Pet").is_some());
        assert!(report.failure("Owner").is_none());
    }
}
