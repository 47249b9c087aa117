//! # Generator Configuration
//!
//! Policies that decide how the resolver treats remote references, load
//! failures, `allOf` collisions and untyped schema nodes.
//!
//! Every field has a default, so an empty YAML document is a valid config:
//!
//! ```yaml
//! remote_refs:
//!   allow: ["https://schemas.example.com/"]
//!   on_disallowed: unresolved
//! references: link
//! all_of_merge: reject_conflicts
//! all_of_composition: nest
//! load_timeout_ms: 2000
//! ```

use crate::error::{SchemaError, SchemaResult};
use serde::Deserialize;
use std::time::Duration;

/// What to do with a reference that cannot be honoured.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DegradePolicy {
    /// Fail the schema that holds the reference.
    #[default]
    Fail,
    /// Keep the reference field with no target.
    Unresolved,
}

/// How reference fields are resolved.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReferenceMode {
    /// Resolve the target schema inline into the reference field.
    #[default]
    Expand,
    /// Only record the target location.
    Link,
}

/// Merge policy for fields contributed by several `allOf` members.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MergePolicy {
    /// A later member replaces an earlier field of the same name.
    #[default]
    LastWins,
    /// A second definition of the same field is a `MergeConflict`.
    RejectConflicts,
}

/// What an `allOf` member contributes to the composing object.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CompositionMode {
    /// Members that resolve to objects contribute their own members; other
    /// members sit under the composing object's name.
    #[default]
    Flatten,
    /// Every member resolves under the composing object's name, so the last
    /// one is what remains.
    Nest,
}

/// Handling of schema nodes without a recognised type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UnknownTypePolicy {
    /// Raise `UnknownSchemaType`.
    #[default]
    Error,
    /// Emit a field typed `unknown`.
    EmitUnknown,
}

/// Remote (http/https) reference settings.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct RemoteRefConfig {
    /// URL prefixes whose references are handed to the loader.
    pub allow: Vec<String>,
    /// Behaviour for references outside the allow-list.
    pub on_disallowed: DegradePolicy,
}

impl RemoteRefConfig {
    /// True if `url` starts with one of the allowed prefixes.
    pub fn is_allowed(&self, url: &str) -> bool {
        self.allow.iter().any(|prefix| url.starts_with(prefix.as_str()))
    }
}

/// Top level configuration for a generation run.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct GeneratorConfig {
    /// Remote reference policy.
    pub remote_refs: RemoteRefConfig,
    /// Behaviour when a referenced document fails to load or a fragment matches nothing.
    pub on_load_failure: DegradePolicy,
    /// Reference resolution mode.
    pub references: ReferenceMode,
    /// `allOf` collision policy.
    pub all_of_merge: MergePolicy,
    /// `allOf` member shape.
    pub all_of_composition: CompositionMode,
    /// Untyped node policy.
    pub unknown_types: UnknownTypePolicy,
    /// Upper bound for a single external document load, in milliseconds.
    pub load_timeout_ms: u64,
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        Self {
            remote_refs: RemoteRefConfig::default(),
            on_load_failure: DegradePolicy::Fail,
            references: ReferenceMode::Expand,
            all_of_merge: MergePolicy::LastWins,
            all_of_composition: CompositionMode::Flatten,
            unknown_types: UnknownTypePolicy::Error,
            load_timeout_ms: 10_000,
        }
    }
}

impl GeneratorConfig {
    /// Parses a configuration from YAML (or JSON).
    pub fn from_yaml_str(yaml: &str) -> SchemaResult<Self> {
        if yaml.trim().is_empty() {
            return Ok(Self::default());
        }
        serde_yaml::from_str(yaml)
            .map_err(|e| SchemaError::Parse(format!("Failed to parse generator config: {}", e)))
    }

    /// The load timeout as a `Duration`.
    pub fn load_timeout(&self) -> Duration {
        Duration::from_millis(self.load_timeout_ms)
    }
}
