//! Read-only reference tables: production-type codes and area codes.
//!
//! Both tables are injected into the code that needs them rather than
//! loaded as process-wide state, so tests can supply synthetic tables.
//! Table correctness is owned here, at the loading boundary; the
//! assemblers treat a missing entry as a blank label and move on.

use std::collections::HashMap;
use std::io::Read;
use std::path::Path;

use serde::Deserialize;

use crate::error::Error;

/// `code → label` lookup for production types (`B01` → `Biomass`, ...).
///
/// Many-to-one is allowed; the mapping is consumed read-only.
#[derive(Debug, Clone, Default)]
pub struct ProductionTypeTable {
    labels: HashMap<String, String>,
}

#[derive(Debug, Deserialize)]
struct PsrTypeRow {
    #[serde(rename = "Code")]
    code: String,
    #[serde(rename = "Meaning")]
    meaning: String,
}

impl ProductionTypeTable {
    /// Load from a `Code,Meaning` CSV.
    pub fn from_csv_path(path: &Path) -> Result<Self, Error> {
        let file = std::fs::File::open(path).map_err(|e| Error::Table {
            path: path.display().to_string(),
            message: e.to_string(),
        })?;
        Self::from_reader(file).map_err(|message| Error::Table {
            path: path.display().to_string(),
            message,
        })
    }

    fn from_reader(reader: impl Read) -> Result<Self, String> {
        let mut csv_reader = csv::ReaderBuilder::new()
            .trim(csv::Trim::All)
            .from_reader(reader);
        let mut labels = HashMap::new();
        for row in csv_reader.deserialize() {
            let row: PsrTypeRow = row.map_err(|e| e.to_string())?;
            labels.insert(row.code, row.meaning);
        }
        Ok(Self { labels })
    }

    /// The standard Transparency Platform production-type table.
    pub fn standard() -> Self {
        let labels = [
            ("B01", "Biomass"),
            ("B02", "Fossil Brown coal/Lignite"),
            ("B03", "Fossil Coal-derived gas"),
            ("B04", "Fossil Gas"),
            ("B05", "Fossil Hard coal"),
            ("B06", "Fossil Oil"),
            ("B07", "Fossil Oil shale"),
            ("B08", "Fossil Peat"),
            ("B09", "Geothermal"),
            ("B10", "Hydro Pumped Storage"),
            ("B11", "Hydro Run-of-river and poundage"),
            ("B12", "Hydro Water Reservoir"),
            ("B13", "Marine"),
            ("B14", "Nuclear"),
            ("B15", "Other renewable"),
            ("B16", "Solar"),
            ("B17", "Waste"),
            ("B18", "Wind Offshore"),
            ("B19", "Wind Onshore"),
            ("B20", "Other"),
            ("B21", "AC Link"),
            ("B22", "DC Link"),
            ("B23", "Substation"),
            ("B24", "Transformer"),
            ("B25", "Energy storage"),
        ];
        Self {
            labels: labels
                .into_iter()
                .map(|(code, label)| (code.to_string(), label.to_string()))
                .collect(),
        }
    }

    pub fn label(&self, code: &str) -> Option<&str> {
        self.labels.get(code).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.labels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.labels.is_empty()
    }
}

/// `country key → domain code` lookup used by drivers before they build
/// a query (`France (FR)` → `10YFR-RTE------C`). Not consumed inside the
/// fetch/decode core itself.
#[derive(Debug, Clone, Default)]
pub struct AreaTable {
    codes: HashMap<String, String>,
}

#[derive(Debug, Deserialize)]
struct AreaRow {
    #[serde(rename = "Key")]
    key: String,
    #[serde(rename = "Code")]
    code: String,
}

impl AreaTable {
    /// Load from a `Key,Code` CSV.
    pub fn from_csv_path(path: &Path) -> Result<Self, Error> {
        let file = std::fs::File::open(path).map_err(|e| Error::Table {
            path: path.display().to_string(),
            message: e.to_string(),
        })?;
        Self::from_reader(file).map_err(|message| Error::Table {
            path: path.display().to_string(),
            message,
        })
    }

    fn from_reader(reader: impl Read) -> Result<Self, String> {
        let mut csv_reader = csv::ReaderBuilder::new()
            .trim(csv::Trim::All)
            .from_reader(reader);
        let mut codes = HashMap::new();
        for row in csv_reader.deserialize() {
            let row: AreaRow = row.map_err(|e| e.to_string())?;
            codes.insert(row.key, row.code);
        }
        Ok(Self { codes })
    }

    pub fn code(&self, key: &str) -> Option<&str> {
        self.codes.get(key).map(String::as_str)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn standard_table_covers_the_b_codes() {
        let table = ProductionTypeTable::standard();
        assert_eq!(table.len(), 25);
        assert_eq!(table.label("B01"), Some("Biomass"));
        assert_eq!(table.label("B04"), Some("Fossil Gas"));
        assert_eq!(table.label("B19"), Some("Wind Onshore"));
        assert_eq!(table.label("B99"), None);
    }

    #[test]
    fn psr_table_reads_code_meaning_csv() {
        let csv = "Code,Meaning\nB01,Biomass\nB02,Fossil Gas\n";
        let table = ProductionTypeTable::from_reader(csv.as_bytes()).unwrap();
        assert_eq!(table.label("B02"), Some("Fossil Gas"));
    }

    #[test]
    fn area_table_reads_key_code_csv() {
        let csv = "Key,Code\nFrance (FR),10YFR-RTE------C\nBZN|GB,10YGB----------A\n";
        let table = AreaTable::from_reader(csv.as_bytes()).unwrap();
        assert_eq!(table.code("France (FR)"), Some("10YFR-RTE------C"));
        assert_eq!(table.code("BZN|GB"), Some("10YGB----------A"));
        assert_eq!(table.code("Atlantis"), None);
    }
}
