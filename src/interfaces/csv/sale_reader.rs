use crate::application::validator::validate_sale;
use crate::domain::sale::DataVaultSaleRequest;
use crate::error::{GatewayError, Result};
use serde_json::{Map, Value};
use std::collections::HashMap;
use std::io::Read;

/// Reads sale requests from a CSV source whose header row names the input keys
/// (`posInputMode`, `amount`, `ITBIS`, ...).
///
/// Whitespace is trimmed and short rows are accepted; missing columns are
/// simply absent from the record. Empty cells become `null`.
pub struct SaleReader<R: Read> {
    reader: csv::Reader<R>,
}

impl<R: Read> SaleReader<R> {
    pub fn new(source: R) -> Self {
        let reader = csv::ReaderBuilder::new()
            .trim(csv::Trim::All)
            .flexible(true)
            .from_reader(source);
        Self { reader }
    }

    /// Lazily yields each row as an untyped record.
    pub fn records(self) -> impl Iterator<Item = Result<Value>> {
        self.reader
            .into_deserialize::<HashMap<String, String>>()
            .map(|result| result.map(into_record).map_err(GatewayError::from))
    }

    /// Lazily yields each row validated as a sale request.
    pub fn sales(self) -> impl Iterator<Item = Result<DataVaultSaleRequest>> {
        self.records()
            .map(|record| record.and_then(|record| validate_sale(&record)))
    }
}

fn into_record(row: HashMap<String, String>) -> Value {
    let fields: Map<String, Value> = row
        .into_iter()
        .map(|(key, cell)| {
            let value = if cell.is_empty() {
                Value::Null
            } else {
                Value::String(cell)
            };
            (key, value)
        })
        .collect();
    Value::Object(fields)
}
