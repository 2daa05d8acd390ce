//! Schema Loading Tests
//!
//! Tests for record types declared in schema files:
//! - Field order in the file is constructor parameter order
//! - `extends` resolves regardless of file order
//! - Loaded types enforce their declared constraints
//! - Broken schema directories fail as a whole

use std::fs;
use std::path::Path;

use recordkit::schema::{ConstraintSpec, FieldDoc, SchemaDocument, SchemaLoader};
use recordkit::{args, FieldType, Registry};
use serde_json::{json, Value};
use tempfile::TempDir;

// =============================================================================
// Helper Functions
// =============================================================================

fn write_schema(dir: &Path, file: &str, schema: Value) {
    fs::write(dir.join(file), serde_json::to_string_pretty(&schema).unwrap()).unwrap();
}

fn load(dir: &Path) -> Registry {
    let mut loader = SchemaLoader::new(dir);
    loader.load_all().unwrap();

    let mut registry = Registry::new();
    loader.register_all(&mut registry).unwrap();
    registry
}

fn setup_stock_dir() -> TempDir {
    let tmp = TempDir::new().unwrap();
    write_schema(
        tmp.path(),
        "a_listed.json",
        json!({
            "name": "ListedStock",
            "extends": "Stock",
            "fields": [
                {"name": "exchange", "constraints": [{"kind": "pattern", "regex": "^[A-Z]{2,6}$"}]},
                {"name": "shares", "constraints": [
                    {"kind": "type", "expected": "int"},
                    {"kind": "at_least", "bound": 1}
                ]}
            ]
        }),
    );
    write_schema(
        tmp.path(),
        "b_stock.json",
        json!({
            "name": "Stock",
            "fields": [
                {"name": "name", "constraints": [{"kind": "type", "expected": "text"}]},
                {"name": "shares", "constraints": [
                    {"kind": "type", "expected": "int"},
                    {"kind": "positive"}
                ]},
                {"name": "price", "constraints": [
                    {"kind": "type", "expected": "float"},
                    {"kind": "positive"}
                ]}
            ]
        }),
    );
    tmp
}

// =============================================================================
// Loading Tests
// =============================================================================

/// Bases are defined before subtypes even when their file sorts later.
#[test]
fn test_base_defined_first() {
    let tmp = setup_stock_dir();
    let registry = load(tmp.path());

    let names: Vec<_> = registry.iter().map(|t| t.name().to_string()).collect();
    assert_eq!(names, vec!["Stock", "ListedStock"]);
}

/// Inherited fields first, overrides in place, new fields appended.
#[test]
fn test_subtype_signature() {
    let tmp = setup_stock_dir();
    let registry = load(tmp.path());

    let listed = registry.get("ListedStock").unwrap();
    assert_eq!(listed.signature().to_string(), "(name, shares, price, exchange)");
    assert_eq!(listed.base_name(), Some("Stock"));
    assert_eq!(listed.field("shares").unwrap().rules(), vec!["type(int)", "at_least(1)"]);
}

/// The bundled schema directory loads cleanly.
#[test]
fn test_bundled_schemas_load() {
    let dir = Path::new(env!("CARGO_MANIFEST_DIR")).join("schemas");
    let registry = load(&dir);

    assert!(registry.contains("Stock"));
    assert_eq!(
        registry.get("ListedStock").unwrap().signature().to_string(),
        "(name, shares, price, exchange)"
    );
}

// =============================================================================
// Construction Tests
// =============================================================================

/// Loaded types construct and validate like coded ones.
#[test]
fn test_loaded_type_validates() {
    let tmp = setup_stock_dir();
    let registry = load(tmp.path());

    let stock = registry.construct("Stock", args!["ACME", 50, 91.1]).unwrap();
    assert_eq!(stock.to_json(), json!({"name": "ACME", "shares": 50, "price": 91.1}));

    let err = registry
        .construct("Stock", args!["ACME", "fifty", 91.1])
        .unwrap_err();
    assert!(err.as_validation().unwrap().is_type_error());
}

/// Overridden constraints apply only to the subtype.
#[test]
fn test_override_applies_to_subtype_only() {
    let tmp = setup_stock_dir();
    let registry = load(tmp.path());

    assert!(registry.construct("Stock", args!["ACME", 0, 1.0]).is_ok());

    let err = registry
        .construct("ListedStock", args!["ACME", 0, 1.0, "NYSE"])
        .unwrap_err();
    assert_eq!(err.as_validation().unwrap().field, "shares");

    let err = registry
        .construct("ListedStock", args!["ACME", 5, 1.0, exchange = "nyse"])
        .unwrap_err();
    assert_eq!(err.as_validation().unwrap().field, "exchange");
}

// =============================================================================
// Failure Tests
// =============================================================================

/// A single unknown constraint kind fails the whole directory.
#[test]
fn test_unknown_constraint_kind_fails() {
    let tmp = setup_stock_dir();
    write_schema(
        tmp.path(),
        "c_bond.json",
        json!({"name": "Bond", "fields": [{"name": "coupon", "constraints": [{"kind": "between"}]}]}),
    );

    let mut loader = SchemaLoader::new(tmp.path());
    let err = loader.load_all().unwrap_err();
    assert_eq!(err.code(), "SCHEMA_MALFORMED");
    assert!(err.to_string().contains("c_bond.json"));
}

/// An invalid regex is reported at registration, not on first write.
#[test]
fn test_invalid_regex_fails_registration() {
    let tmp = TempDir::new().unwrap();
    write_schema(
        tmp.path(),
        "ticker.json",
        json!({"name": "Ticker", "fields": [{"name": "symbol", "constraints": [{"kind": "pattern", "regex": "(["}]}]}),
    );

    let mut loader = SchemaLoader::new(tmp.path());
    loader.load_all().unwrap();
    let err = loader.register_all(&mut Registry::new()).unwrap_err();
    assert_eq!(err.code(), "SCHEMA_MALFORMED");
}

/// Documents saved by the loader load back into the same record type.
#[test]
fn test_saved_document_loads() {
    let tmp = TempDir::new().unwrap();
    let document = SchemaDocument::new(
        "Point",
        vec![
            FieldDoc::new("x", vec![ConstraintSpec::Type { expected: FieldType::Int }]),
            FieldDoc::new("y", vec![ConstraintSpec::Type { expected: FieldType::Int }]),
        ],
    );
    SchemaLoader::new(tmp.path()).save_document(&document).unwrap();

    let registry = load(tmp.path());
    let p = registry.construct("Point", args![y = 2, x = 1]).unwrap();
    assert_eq!(p.to_string(), "Point(x=1, y=2)");
}
