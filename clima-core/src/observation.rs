use crate::error::ParseError;
use chrono::NaiveDate;
use csv::ReaderBuilder;
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;

/// Provenance of a daily record after gap filling upstream.
/// - `Ok`: measured value
/// - `Interpolated`: short gap filled by interpolation
/// - `InterpolatedLong`: long gap filled; treat with care
#[derive(Debug, PartialEq, Eq, Clone, Copy, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DataQuality {
    Ok,
    Interpolated,
    InterpolatedLong,
}

/// The numeric fields of a [`DailyObservation`], for generic access.
#[derive(Debug, PartialEq, Eq, Clone, Copy, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DailyField {
    TempMax,
    TempMin,
    TempMean,
    Precipitation,
    Humidity,
    WindMax,
}

impl DailyField {
    pub const ALL: [DailyField; 6] = [
        DailyField::TempMax,
        DailyField::TempMin,
        DailyField::TempMean,
        DailyField::Precipitation,
        DailyField::Humidity,
        DailyField::WindMax,
    ];

    /// Column name used in the daily CSV/JSON files.
    pub fn column(&self) -> &'static str {
        match self {
            DailyField::TempMax => "temp_max",
            DailyField::TempMin => "temp_min",
            DailyField::TempMean => "temp_mean",
            DailyField::Precipitation => "precipitation",
            DailyField::Humidity => "humidity",
            DailyField::WindMax => "wind_max",
        }
    }

    pub fn from_column(name: &str) -> Option<DailyField> {
        DailyField::ALL
            .into_iter()
            .find(|field| field.column() == name.trim())
    }
}

/// One calendar day of observations at the station.
///
/// Temperatures in °C, precipitation in mm, humidity in %. Any numeric field
/// may be missing; a non-finite value read from a file is also treated as
/// missing by [`DailyObservation::value`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DailyObservation {
    pub date: NaiveDate,
    #[serde(default)]
    pub temp_max: Option<f64>,
    #[serde(default)]
    pub temp_min: Option<f64>,
    #[serde(default)]
    pub temp_mean: Option<f64>,
    #[serde(default)]
    pub precipitation: Option<f64>,
    #[serde(default)]
    pub humidity: Option<f64>,
    #[serde(default)]
    pub wind_max: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data_quality: Option<DataQuality>,
}

impl DailyObservation {
    /// A record with only a date set; handy for building fixtures.
    pub fn empty(date: NaiveDate) -> Self {
        DailyObservation {
            date,
            temp_max: None,
            temp_min: None,
            temp_mean: None,
            precipitation: None,
            humidity: None,
            wind_max: None,
            data_quality: None,
        }
    }

    /// The value of `field`, or `None` when missing or non-finite.
    pub fn value(&self, field: DailyField) -> Option<f64> {
        let raw = match field {
            DailyField::TempMax => self.temp_max,
            DailyField::TempMin => self.temp_min,
            DailyField::TempMean => self.temp_mean,
            DailyField::Precipitation => self.precipitation,
            DailyField::Humidity => self.humidity,
            DailyField::WindMax => self.wind_max,
        };
        raw.filter(|v| v.is_finite())
    }

    /// Parse the cleaned daily CSV.
    ///
    /// Expected columns (with headers):
    /// `date,temp_max,temp_min,temp_mean,precipitation,humidity,wind_max[,data_quality]`.
    /// Extra columns are ignored and empty cells are read as missing.
    ///
    /// # Example CSV
    /// ```text
    /// date,temp_max,temp_min,temp_mean,precipitation,humidity,wind_max,data_quality
    /// 1940-01-01,29.4,18.2,23.1,0.0,81,12.6,ok
    /// ```
    pub fn parse_csv(csv_data: &str) -> Result<Vec<DailyObservation>, ParseError> {
        let mut rdr = ReaderBuilder::new()
            .has_headers(true)
            .flexible(true)
            .trim(csv::Trim::All)
            .from_reader(csv_data.as_bytes());
        let mut records = Vec::new();
        for row in rdr.deserialize() {
            let record: DailyObservation = row?;
            records.push(record);
        }
        log::debug!("parsed {} daily observations from CSV", records.len());
        Ok(records)
    }

    /// Parse the daily JSON export: an array of records with `null` for
    /// missing values.
    pub fn parse_json(json_data: &str) -> Result<Vec<DailyObservation>, ParseError> {
        let records: Vec<DailyObservation> = serde_json::from_str(json_data)?;
        log::debug!("parsed {} daily observations from JSON", records.len());
        Ok(records)
    }
}

impl Ord for DailyObservation {
    fn cmp(&self, other: &Self) -> Ordering {
        self.date.cmp(&other.date)
    }
}

impl Eq for DailyObservation {}

impl PartialOrd for DailyObservation {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}
