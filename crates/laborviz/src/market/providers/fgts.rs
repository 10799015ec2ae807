//! Bundled FGTS gross-collection dataset.
//!
//! Caixa publishes FGTS collection as annual reports rather than a query API,
//! so the figures ship with the binary as a static CSV.

use serde::{Deserialize, Serialize};

const DATASET: &str = include_str!("fgts_collection.csv");

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FgtsYear {
    pub year: i32,
    pub gross_collection_bn: f64,
}

pub fn bundled() -> Result<Vec<FgtsYear>, csv::Error> {
    let mut reader = csv::Reader::from_reader(DATASET.as_bytes());
    reader.deserialize().collect()
}
