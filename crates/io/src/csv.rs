// CSV export of the quote table

use std::path::{Path, PathBuf};

use chrono::Local;

use quotegrid_engine::quote::QuoteData;

/// Export into `dir` under a timestamped file name, returning the path.
pub fn export_quote(quote: &QuoteData, dir: &Path) -> Result<PathBuf, String> {
    std::fs::create_dir_all(dir).map_err(|e| e.to_string())?;
    let name = format!("quote-{}.csv", Local::now().format("%Y%m%d-%H%M%S"));
    let path = dir.join(name);
    export(quote, &path)?;
    Ok(path)
}

/// Export the quote as CSV: one record per non-empty row, then a total
/// record. The trailing entry row (and any other structurally empty row)
/// is not exported.
pub fn export(quote: &QuoteData, path: &Path) -> Result<(), String> {
    let mut writer = csv::Writer::from_path(path).map_err(|e| e.to_string())?;

    writer
        .write_record([
            "#", "Width", "Height", "Type", "Price", "Location", "Fabric", "Color",
        ])
        .map_err(|e| e.to_string())?;

    let mut sequence = 0usize;
    for item in &quote.items {
        if item.is_empty() {
            continue;
        }
        sequence += 1;
        writer
            .write_record([
                sequence.to_string(),
                item.width.map(|w| w.to_string()).unwrap_or_default(),
                item.height.map(|h| h.to_string()).unwrap_or_default(),
                item.fabric_type.map(|t| t.to_string()).unwrap_or_default(),
                item.line_price.map(|p| format!("{:.2}", p)).unwrap_or_default(),
                item.detail.location.clone().unwrap_or_default(),
                item.detail.fabric.clone().unwrap_or_default(),
                item.detail.color.clone().unwrap_or_default(),
            ])
            .map_err(|e| e.to_string())?;
    }

    let total = quote
        .summary
        .total_sum
        .map(|t| format!("{:.2}", t))
        .unwrap_or_default();
    writer
        .write_record(["", "", "", "Total", &total, "", "", ""])
        .map_err(|e| e.to_string())?;

    writer.flush().map_err(|e| e.to_string())
}
