//! # Resolution Context
//!
//! The ambient parameters of one recursive descent, passed by value.

use std::collections::BTreeSet;
use url::Url;

/// Names listed in an object's `required`.
pub type RequiredFields = BTreeSet<String>;

/// Ambient state for resolving one schema node.
#[derive(Debug, Clone, Copy)]
pub struct ResolutionContext<'c> {
    /// Document the node was declared in; base for relative references.
    pub doc_path: &'c Url,
    /// Pointer of the section holding the top-level schema.
    pub base_path: &'c str,
    /// Set while descending through `items`.
    pub is_array: bool,
    /// `required` of the enclosing object, if any.
    pub required: Option<&'c RequiredFields>,
}

impl<'c> ResolutionContext<'c> {
    /// Context for a top-level schema.
    pub fn root(doc_path: &'c Url, base_path: &'c str) -> Self {
        Self {
            doc_path,
            base_path,
            is_array: false,
            required: None,
        }
    }

    /// Same context with the array flag set.
    pub fn array(self) -> Self {
        Self {
            is_array: true,
            ..self
        }
    }

    /// Context for the members of an object with the given `required` set.
    ///
    /// Members start outside any array.
    pub fn members<'n>(&'n self, required: &'n RequiredFields) -> ResolutionContext<'n> {
        ResolutionContext {
            doc_path: self.doc_path,
            base_path: self.base_path,
            is_array: false,
            required: Some(required),
        }
    }

    /// True when `name` is listed in the enclosing `required`.
    pub fn is_required(&self, name: &str) -> bool {
        self.required.is_some_and(|r| r.contains(name))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_context_derivations() {
        let doc = Url::parse("file:///api.yaml").unwrap();
        let root = ResolutionContext::root(&doc, "/components/schemas");
        assert!(!root.is_array);
        assert!(!root.is_required("a"));

        let arr = root.array();
        assert!(arr.is_array);

        let required: RequiredFields = ["a".to_string()].into_iter().collect();
        let members = arr.members(&required);
        assert!(!members.is_array);
        assert!(members.is_required("a"));
        assert!(!members.is_required("b"));
        assert_eq!(members.doc_path, &doc);
    }
}
