//! Stock query inputs
//!
//! Fetching a time series is left to an external data source. This module
//! validates the inputs of such a fetch with a `StockQuery` record type and
//! resolves them into a concrete date window:
//!
//! - `symbol`: ticker, upper-cased in the window
//! - `source`: data source identifier such as `nasdaq` or `stooq`
//! - `days`: lookback in days, `>= 0`
//!
//! The window ends today and starts `days` calendar days earlier. Dates
//! serialize as `%Y-%m-%d`.

use std::sync::Arc;

use chrono::{Days, NaiveDate};
use serde::Serialize;
use serde_json::Value;

use crate::args;
use crate::record::{
    ConstraintKind, Field, Pattern, Positive, Record, RecordResult, RecordType, RecordTypeBuilder,
    RegistrationError, TypeIs, ValidationError,
};

/// Record type name of the stock query schema
pub const STOCK_QUERY: &str = "StockQuery";

const SYMBOL_PATTERN: &str = r"^[A-Za-z][A-Za-z0-9.\-]{0,9}$";
const SOURCE_PATTERN: &str = r"^[a-z][a-z0-9_\-]*$";

/// Builds the `StockQuery` record type.
pub fn stock_query_type() -> Result<Arc<RecordType>, RegistrationError> {
    stock_query_builder()?.define()
}

/// Declarations of the `StockQuery` record type, for defining it in a `Registry`.
pub fn stock_query_builder() -> Result<RecordTypeBuilder, RegistrationError> {
    let builder = RecordType::builder(STOCK_QUERY)
        .field(
            "symbol",
            Field::new()
                .with(TypeIs::text())
                .with(pattern("symbol", SYMBOL_PATTERN)?),
        )
        .field(
            "source",
            Field::new()
                .with(TypeIs::text())
                .with(pattern("source", SOURCE_PATTERN)?),
        )
        .field("days", Field::new().with(TypeIs::int()).with(Positive));
    Ok(builder)
}

fn pattern(field: &str, regex: &str) -> Result<Pattern, RegistrationError> {
    Pattern::new(regex).map_err(|e| RegistrationError::InvalidConstraint {
        field: field.to_string(),
        reason: e.to_string(),
    })
}

/// Resolved date range for a time series fetch.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct QueryWindow {
    pub symbol: String,
    pub source: String,
    pub days: u64,
    pub start: NaiveDate,
    pub end: NaiveDate,
}

impl QueryWindow {
    /// Validates the inputs and resolves the window ending at `today`.
    pub fn resolve(symbol: &str, source: &str, days: i64, today: NaiveDate) -> RecordResult<Self> {
        let query_type = stock_query_type()?;
        let record = query_type.construct(args![symbol, source, days])?;
        Self::from_record(&record, today)
    }

    /// Resolves the window for a constructed `StockQuery` record.
    pub fn from_record(record: &Record, today: NaiveDate) -> RecordResult<Self> {
        let symbol = text_field(record, "symbol")?.to_uppercase();
        let source = text_field(record, "source")?.to_string();

        let days = record.get("days")?.as_u64().ok_or_else(|| {
            ValidationError::new("days", ConstraintKind::Range, "must be a non-negative integer")
        })?;

        let start = today.checked_sub_days(Days::new(days)).ok_or_else(|| {
            ValidationError::new(
                "days",
                ConstraintKind::Range,
                format!("lookback of {} days is out of calendar range", days),
            )
        })?;

        Ok(Self {
            symbol,
            source,
            days,
            start,
            end: today,
        })
    }

    /// Number of calendar days covered, both ends included.
    pub fn calendar_days(&self) -> i64 {
        (self.end - self.start).num_days() + 1
    }
}

fn text_field<'r>(record: &'r Record, name: &str) -> RecordResult<&'r str> {
    match record.get(name)? {
        Value::String(s) => Ok(s.as_str()),
        other => Err(ValidationError::new(
            name,
            ConstraintKind::Type,
            format!("expected text, got {}", crate::record::value_type_name(other)),
        )
        .into()),
    }
}
