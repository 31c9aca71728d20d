//! File loading and JSON output shared by the subcommands.
//!
//! Inputs may be gzip-compressed (`.gz` suffix). JSON output is also written
//! gzip-compressed alongside the plain file when asked to, or when the
//! payload is larger than [`SIZE_LIMIT`].

use anyhow::Context;
use clima_core::{AnnualIndexSet, DailyObservation};
use flate2::read::GzDecoder;
use flate2::write::GzEncoder;
use flate2::Compression;
use log::info;
use serde::Serialize;
use std::io::{Read, Write};
use std::path::Path;

/// Payloads above this many bytes are always compressed too.
pub const SIZE_LIMIT: usize = 500 * 1024;

/// Read a whole file as text, decompressing `.gz` files.
pub fn read_input(path: &str) -> anyhow::Result<String> {
    let bytes = std::fs::read(path).with_context(|| format!("reading {path}"))?;
    if path.ends_with(".gz") {
        let mut text = String::new();
        GzDecoder::new(bytes.as_slice())
            .read_to_string(&mut text)
            .with_context(|| format!("decompressing {path}"))?;
        Ok(text)
    } else {
        String::from_utf8(bytes).with_context(|| format!("{path} is not UTF-8"))
    }
}

/// True when the path (ignoring a `.gz` suffix) names a JSON file.
pub fn is_json(path: &str) -> bool {
    path.trim_end_matches(".gz").ends_with(".json")
}

/// Load daily observations from CSV or JSON.
pub fn load_daily(path: &str) -> anyhow::Result<Vec<DailyObservation>> {
    let text = read_input(path)?;
    let records = if is_json(path) {
        DailyObservation::parse_json(&text)
    } else {
        DailyObservation::parse_csv(&text)
    }
    .with_context(|| format!("parsing daily observations in {path}"))?;
    info!("Loaded {} daily observations from {}", records.len(), path);
    Ok(records)
}

/// Load annual index sets from CSV or `metrics.json`.
pub fn load_annual(path: &str) -> anyhow::Result<Vec<AnnualIndexSet>> {
    let text = read_input(path)?;
    let records = if is_json(path) {
        AnnualIndexSet::parse_metrics_json(&text)
    } else {
        AnnualIndexSet::parse_csv(&text)
    }
    .with_context(|| format!("parsing annual indices in {path}"))?;
    info!("Loaded {} annual index sets from {}", records.len(), path);
    Ok(records)
}

/// Gzip `payload` into a byte buffer.
pub fn gzip(payload: &[u8]) -> anyhow::Result<Vec<u8>> {
    let mut encoder = GzEncoder::new(Vec::new(), Compression::default());
    encoder.write_all(payload)?;
    Ok(encoder.finish()?)
}

/// Serialize `value` as compact JSON to `output`, or to stdout when `output`
/// is `None`. The plain file is always written; `<output>.gz` is added when
/// `compress` is set or the payload exceeds [`SIZE_LIMIT`].
pub fn write_json<T: Serialize>(
    output: Option<&str>,
    value: &T,
    compress: bool,
) -> anyhow::Result<()> {
    let payload = serde_json::to_string(value)?;
    let Some(path) = output else {
        println!("{payload}");
        return Ok(());
    };

    std::fs::write(path, &payload).with_context(|| format!("writing {path}"))?;
    info!("  -> {}  ({:.1} KB)", path, payload.len() as f64 / 1024.0);

    if compress || payload.len() > SIZE_LIMIT {
        let gz_path = format!("{path}.gz");
        let compressed = gzip(payload.as_bytes())?;
        std::fs::write(Path::new(&gz_path), &compressed)
            .with_context(|| format!("writing {gz_path}"))?;
        info!(
            "  -> {}  ({:.1} KB compressed)",
            gz_path,
            compressed.len() as f64 / 1024.0
        );
    }
    Ok(())
}
