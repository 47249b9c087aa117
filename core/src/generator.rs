//! # Generation
//!
//! Drives the resolver over every registered schema. Schemas registered
//! while resolving (from referenced documents) are appended to the registry
//! and picked up by the same pass. A failing schema is recorded in the
//! report and does not stop the others.

use crate::config::GeneratorConfig;
use crate::error::{GenerationFailure, GenerationReport, SchemaResult};
use crate::fields::Fields;
use crate::loader::{DocumentLoader, FsLoader};
use crate::ref_utils::parse_doc_path;
use crate::registry::SchemaGen;
use crate::resolver::{ResolutionContext, Resolver};

impl SchemaGen {
    /// Resolves every registered schema into its field tree.
    ///
    /// Referenced documents are fetched through `loader`.
    pub fn generate(
        &mut self,
        loader: &dyn DocumentLoader,
        config: &GeneratorConfig,
    ) -> GenerationReport {
        let mut report = GenerationReport::default();
        let mut idx = 0;

        while let Some(info) = self.get_index(idx) {
            idx += 1;
            let name = info.name.clone();
            let schema = info.schema.clone();
            let doc_path = info.doc_path.clone();
            let base_path = info.base_path.clone();
            let item_path = info.item_path.clone();

            let _span = tracing::debug_span!("schema", name = %name).entered();

            let mut fields = Fields::new();
            let mut resolver = Resolver::new(self, loader, config);
            resolver.enter(item_path);
            let outcome = resolver.resolve(
                &name,
                &schema,
                ResolutionContext::root(&doc_path, &base_path),
                &mut fields,
            );
            let xml_prefixes = resolver.into_xml_prefixes();

            match outcome {
                Ok(()) => {
                    if let Some(info) = self.get_mut(&name) {
                        info.fields = fields;
                        info.xml_prefixes = xml_prefixes;
                    }
                    report.generated.push(name);
                }
                Err(error) => {
                    tracing::warn!(schema = %name, %error, "schema generation failed");
                    report.failures.push(GenerationFailure {
                        schema: name,
                        doc_path: doc_path.to_string(),
                        error,
                    });
                }
            }
        }

        tracing::info!(
            generated = report.generated.len(),
            failed = report.failures.len(),
            "schema generation finished"
        );
        report
    }

    /// [`SchemaGen::generate`] with the filesystem loader and default configuration.
    pub fn generate_with_defaults(&mut self) -> GenerationReport {
        let config = GeneratorConfig::default();
        let loader = FsLoader::from_config(&config);
        self.generate(&loader, &config)
    }
}

/// Loads the document at `doc_path`, registers its component schemas and
/// generates them.
///
/// Errors only when the entry document itself cannot be read or registered;
/// per-schema failures are in the returned report.
pub fn load_and_generate(
    doc_path: &str,
    config: &GeneratorConfig,
) -> SchemaResult<(SchemaGen, GenerationReport)> {
    let loader = FsLoader::from_config(config);
    let doc_url = parse_doc_path(doc_path)?;
    let document = loader.load(&doc_url)?;

    let mut registry = SchemaGen::new();
    registry.add_document_at(&doc_url, &document)?;
    let report = registry.generate(&loader, config);
    Ok((registry, report))
}
