use crate::error::ParseError;
use csv::ReaderBuilder;
use serde::de::{MapAccess, Visitor};
use serde::{Deserialize, Deserializer, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// Column holding the year key in annual index files.
pub const YEAR_COLUMN: &str = "year";

/// Grouping column left behind by the index pipeline; not an index.
pub const DECADE_COLUMN: &str = "decade";

/// The climate indices computed for one calendar year.
///
/// Field names are whatever the index pipeline produced (`su30`, `tr20`,
/// `wsdi_days`, `cdd`, `anomaly`, ...); this type does not interpret them.
/// Only finite values are stored, so a missing index simply has no entry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnnualIndexSet {
    pub year: i32,
    #[serde(flatten)]
    pub fields: BTreeMap<String, f64>,
}

impl AnnualIndexSet {
    pub fn new(year: i32) -> Self {
        AnnualIndexSet {
            year,
            fields: BTreeMap::new(),
        }
    }

    /// Builder-style setter. Non-finite values are dropped.
    pub fn with_field(mut self, name: &str, value: f64) -> Self {
        self.set(name, value);
        self
    }

    pub fn set(&mut self, name: &str, value: f64) {
        if value.is_finite() {
            self.fields.insert(name.to_string(), value);
        } else {
            self.fields.remove(name);
        }
    }

    /// The named index, or `None` if it is absent for this year.
    pub fn get(&self, name: &str) -> Option<f64> {
        self.fields.get(name).copied().filter(|v| v.is_finite())
    }

    /// Parse the annual index CSV.
    ///
    /// Expected format (with headers): a `year` column followed by any number
    /// of numeric index columns. Empty or non-numeric cells are skipped.
    ///
    /// # Example CSV
    /// ```text
    /// year,su25,su30,tr20,wsdi_days
    /// 1940,201,48,12,6
    /// 1941,188,,9,0
    /// ```
    pub fn parse_csv(csv_data: &str) -> Result<Vec<AnnualIndexSet>, ParseError> {
        let mut rdr = ReaderBuilder::new()
            .has_headers(true)
            .flexible(true)
            .trim(csv::Trim::All)
            .from_reader(csv_data.as_bytes());
        let headers = rdr.headers()?.clone();
        let year_idx = headers
            .iter()
            .position(|h| h == YEAR_COLUMN)
            .ok_or(ParseError::MissingColumn(YEAR_COLUMN))?;

        let mut records = Vec::new();
        let mut skipped = 0u32;
        for row in rdr.records() {
            let r = row?;
            let year_str = r.get(year_idx).unwrap_or("");
            let year = parse_year(year_str)?;
            let mut set = AnnualIndexSet::new(year);
            for (idx, name) in headers.iter().enumerate() {
                if idx == year_idx || name == DECADE_COLUMN {
                    continue;
                }
                match r.get(idx).and_then(|s| s.parse::<f64>().ok()) {
                    Some(value) if value.is_finite() => set.set(name, value),
                    _ => skipped += 1,
                }
            }
            records.push(set);
        }
        log::debug!(
            "parsed {} annual index sets from CSV, skipped {} empty cells",
            records.len(),
            skipped
        );
        sort_by_year(records)
    }

    /// Parse the `metrics.json` export: an object keyed by year whose values
    /// are objects of index name to number (or `null`).
    ///
    /// ```text
    /// {"1940": {"su30": 48, "tr20": 12, "cdd": null}}
    /// ```
    pub fn parse_metrics_json(json_data: &str) -> Result<Vec<AnnualIndexSet>, ParseError> {
        let YearEntries(raw) = serde_json::from_str(json_data)?;
        let mut records = Vec::with_capacity(raw.len());
        for (year_key, entries) in raw {
            let mut set = AnnualIndexSet::new(parse_year(&year_key)?);
            for (name, value) in entries {
                if name == DECADE_COLUMN {
                    continue;
                }
                if let Some(v) = value.as_f64() {
                    set.set(&name, v);
                }
            }
            records.push(set);
        }
        sort_by_year(records)
    }
}

/// Top-level `metrics.json` object, kept in document order with repeated
/// keys preserved so duplicate years reach [`sort_by_year`].
struct YearEntries(Vec<(String, BTreeMap<String, serde_json::Value>)>);

impl<'de> Deserialize<'de> for YearEntries {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        struct YearEntriesVisitor;

        impl<'de> Visitor<'de> for YearEntriesVisitor {
            type Value = YearEntries;

            fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
                f.write_str("an object keyed by year")
            }

            fn visit_map<A>(self, mut map: A) -> Result<Self::Value, A::Error>
            where
                A: MapAccess<'de>,
            {
                let mut entries = Vec::with_capacity(map.size_hint().unwrap_or(0));
                while let Some(entry) = map.next_entry()? {
                    entries.push(entry);
                }
                Ok(YearEntries(entries))
            }
        }

        deserializer.deserialize_map(YearEntriesVisitor)
    }
}

/// Year keys may come through pandas as `1940.0`.
fn parse_year(s: &str) -> Result<i32, ParseError> {
    let trimmed = s.trim();
    if let Ok(year) = trimmed.parse::<i32>() {
        return Ok(year);
    }
    match trimmed.parse::<f64>() {
        Ok(v) if v.is_finite() && v.fract() == 0.0 && v.abs() < i32::MAX as f64 => Ok(v as i32),
        _ => Err(ParseError::InvalidYear(trimmed.to_string())),
    }
}

/// Sort ascending by year and enforce at most one set per year.
pub fn sort_by_year(
    mut records: Vec<AnnualIndexSet>,
) -> Result<Vec<AnnualIndexSet>, ParseError> {
    records.sort_by_key(|r| r.year);
    for pair in records.windows(2) {
        if pair[0].year == pair[1].year {
            return Err(ParseError::DuplicateYear(pair[0].year));
        }
    }
    Ok(records)
}
