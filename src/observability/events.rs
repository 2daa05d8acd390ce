//! Observable events
//!
//! Events are explicit and typed. Field descriptors never emit events;
//! registration, loading and the CLI do.

use std::fmt;

use super::logger::Severity;

/// Observable events in recordkit
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Event {
    // Configuration
    /// Configuration loaded
    ConfigLoaded,

    // Schema definition
    /// A record type finished registration
    SchemaRegistered,
    /// All schema files in a directory were loaded
    SchemasLoaded,
    /// A schema file or definition was rejected
    SchemaRejected,

    // Records
    /// A record was constructed from a request
    RecordConstructed,
    /// A constructor call was rejected
    RecordRejected,

    // Stock query
    /// A stock query window was resolved
    QueryWindowResolved,
}

impl Event {
    /// Returns the string representation of the event
    pub fn as_str(&self) -> &'static str {
        match self {
            Event::ConfigLoaded => "CONFIG_LOADED",
            Event::SchemaRegistered => "SCHEMA_REGISTERED",
            Event::SchemasLoaded => "SCHEMAS_LOADED",
            Event::SchemaRejected => "SCHEMA_REJECTED",
            Event::RecordConstructed => "RECORD_CONSTRUCTED",
            Event::RecordRejected => "RECORD_REJECTED",
            Event::QueryWindowResolved => "QUERY_WINDOW_RESOLVED",
        }
    }

    /// Severity the event is logged at
    pub fn severity(&self) -> Severity {
        match self {
            // one line per type gets noisy for large schema sets
            Event::SchemaRegistered => Severity::Trace,
            Event::SchemaRejected | Event::RecordRejected => Severity::Warn,
            _ => Severity::Info,
        }
    }
}

impl fmt::Display for Event {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
