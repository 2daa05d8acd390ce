//! Schema loader for record type declarations stored on disk
//!
//! - One JSON document per record type in the schema directory
//! - Files are read in file-name order; non-JSON files are skipped
//! - `extends` may name another document or a type already in the registry
//! - Malformed files, duplicate names, unknown bases and cycles are errors

use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use indexmap::IndexMap;

use super::errors::{SchemaError, SchemaResult};
use super::types::SchemaDocument;
use crate::observability::{log_event_with_fields, Event};
use crate::record::{RecordType, Registry};

/// Reads schema documents and registers them as record types.
pub struct SchemaLoader {
    /// Directory containing schema files
    schema_dir: PathBuf,
    /// Loaded documents indexed by record type name, in load order
    documents: IndexMap<String, SchemaDocument>,
}

impl SchemaLoader {
    /// Creates a loader for the given schema directory.
    pub fn new(schema_dir: &Path) -> Self {
        Self {
            schema_dir: schema_dir.to_path_buf(),
            documents: IndexMap::new(),
        }
    }

    /// Returns the schema directory path.
    pub fn schema_dir(&self) -> &Path {
        &self.schema_dir
    }

    /// Loads every `*.json` file from the schema directory.
    ///
    /// A missing directory loads nothing.
    pub fn load_all(&mut self) -> SchemaResult<()> {
        if !self.schema_dir.exists() {
            return Ok(());
        }

        let entries = fs::read_dir(&self.schema_dir).map_err(|e| {
            SchemaError::malformed(
                self.schema_dir.display().to_string(),
                format!("Failed to read schema directory: {}", e),
            )
        })?;

        let mut paths = Vec::new();
        for entry in entries {
            let entry = entry.map_err(|e| {
                SchemaError::malformed(
                    self.schema_dir.display().to_string(),
                    format!("Failed to read directory entry: {}", e),
                )
            })?;

            let path = entry.path();
            if path.extension().map_or(true, |ext| ext != "json") {
                continue;
            }
            paths.push(path);
        }
        paths.sort();

        for path in paths {
            self.load_schema_file(&path)?;
        }

        Ok(())
    }

    /// Loads a single schema file.
    fn load_schema_file(&mut self, path: &Path) -> SchemaResult<()> {
        let content = fs::read_to_string(path).map_err(|e| {
            SchemaError::malformed(path.display().to_string(), format!("Failed to read file: {}", e))
        })?;

        let document: SchemaDocument = serde_json::from_str(&content).map_err(|e| {
            SchemaError::malformed(path.display().to_string(), format!("Invalid JSON: {}", e))
        })?;

        document
            .validate_structure()
            .map_err(|e| SchemaError::malformed(path.display().to_string(), e))?;

        self.add_document(document)
    }

    /// Adds a document directly (for testing or programmatic creation).
    pub fn add_document(&mut self, document: SchemaDocument) -> SchemaResult<()> {
        document
            .validate_structure()
            .map_err(|e| SchemaError::malformed("<in-memory>", e))?;

        if self.documents.contains_key(&document.name) {
            return Err(SchemaError::Duplicate(document.name));
        }
        self.documents.insert(document.name.clone(), document);
        Ok(())
    }

    /// Gets a loaded document by record type name.
    pub fn get(&self, name: &str) -> Option<&SchemaDocument> {
        self.documents.get(name)
    }

    /// Returns the number of loaded documents.
    pub fn document_count(&self) -> usize {
        self.documents.len()
    }

    /// Defines every loaded document in `registry`, bases before subtypes.
    ///
    /// Returns the newly defined types in definition order.
    pub fn register_all(&self, registry: &mut Registry) -> SchemaResult<Vec<Arc<RecordType>>> {
        let mut defined: IndexMap<String, Arc<RecordType>> = IndexMap::new();
        let mut visiting: HashSet<String> = HashSet::new();

        for name in self.documents.keys() {
            self.define_one(name, registry, &mut defined, &mut visiting)?;
        }

        let count = defined.len().to_string();
        let dir = self.schema_dir.display().to_string();
        log_event_with_fields(
            Event::SchemasLoaded,
            &[("count", count.as_str()), ("schema_dir", dir.as_str())],
        );

        Ok(defined.into_values().collect())
    }

    fn define_one(
        &self,
        name: &str,
        registry: &mut Registry,
        defined: &mut IndexMap<String, Arc<RecordType>>,
        visiting: &mut HashSet<String>,
    ) -> SchemaResult<Arc<RecordType>> {
        if let Some(record_type) = defined.get(name) {
            return Ok(Arc::clone(record_type));
        }

        let document = self.documents.get(name).ok_or_else(|| SchemaError::UnknownBase {
            schema: name.to_string(),
            base: name.to_string(),
        })?;

        if !visiting.insert(name.to_string()) {
            return Err(SchemaError::Cycle(name.to_string()));
        }

        let base = match document.extends.as_deref() {
            None => None,
            Some(base) if self.documents.contains_key(base) => {
                Some(self.define_one(base, registry, defined, visiting)?)
            }
            Some(base) => match registry.get(base) {
                Some(existing) => Some(Arc::clone(existing)),
                None => {
                    return Err(SchemaError::UnknownBase {
                        schema: name.to_string(),
                        base: base.to_string(),
                    })
                }
            },
        };

        let builder = document
            .to_builder(base.as_ref())
            .map_err(|e| SchemaError::malformed(name, e))?;
        let record_type = registry.define(builder).map_err(|e| {
            let reason = e.to_string();
            log_event_with_fields(
                Event::SchemaRejected,
                &[("reason", reason.as_str()), ("schema", name)],
            );
            SchemaError::from(e)
        })?;

        visiting.remove(name);
        defined.insert(name.to_string(), Arc::clone(&record_type));
        Ok(record_type)
    }

    /// Saves a document to the schema directory as `<name>.json`.
    ///
    /// Existing files are never overwritten.
    pub fn save_document(&self, document: &SchemaDocument) -> SchemaResult<PathBuf> {
        document
            .validate_structure()
            .map_err(|e| SchemaError::malformed("<in-memory>", e))?;

        let path = self.schema_dir.join(format!("{}.json", document.name));
        if path.exists() {
            return Err(SchemaError::Immutable(document.name.clone()));
        }

        if !self.schema_dir.exists() {
            fs::create_dir_all(&self.schema_dir).map_err(|e| {
                SchemaError::malformed(
                    self.schema_dir.display().to_string(),
                    format!("Failed to create schema directory: {}", e),
                )
            })?;
        }

        let content = serde_json::to_string_pretty(document).map_err(|e| {
            SchemaError::malformed(
                path.display().to_string(),
                format!("Failed to serialize schema: {}", e),
            )
        })?;

        fs::write(&path, content).map_err(|e| {
            SchemaError::malformed(path.display().to_string(), format!("Failed to write file: {}", e))
        })?;

        Ok(path)
    }
}
