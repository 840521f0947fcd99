#![allow(dead_code)]

use std::fs::File;
use std::io::Error;
use std::path::Path;

pub const STORE: &str = "39038540035";
pub const AUTH1: &str = "testcert2";
pub const AUTH2: &str = "testcert2";

/// Config flags shared by every command that builds an envelope.
pub fn gateway_args() -> [&'static str; 6] {
    ["--store", STORE, "--auth1", AUTH1, "--auth2", AUTH2]
}

/// Writes `rows` valid token sales, one per row, each for `row * 100` minor units.
pub fn generate_sales_csv(path: &Path, rows: usize) -> Result<(), Error> {
    let file = File::create(path)?;
    let mut wtr = csv::WriterBuilder::new().from_writer(file);

    wtr.write_record(["posInputMode", "amount", "ITBIS", "orderNumber", "dataVaultToken"])?;

    for i in 1..=rows {
        wtr.write_record([
            "E-Commerce",
            &(i * 100).to_string(),
            "000",
            &i.to_string(),
            &format!("TOKEN-{i}"),
        ])?;
    }

    wtr.flush()?;
    Ok(())
}
