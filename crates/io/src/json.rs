// Quote file save/load (JSON)

use std::fs::File;
use std::io::BufWriter;
use std::path::{Path, PathBuf};

use chrono::Local;

use quotegrid_engine::quote::QuoteData;

/// Serialize a quote to a pretty JSON string.
pub fn to_json_string(quote: &QuoteData) -> Result<String, String> {
    serde_json::to_string_pretty(quote).map_err(|e| e.to_string())
}

/// Save a quote into `dir` under a timestamped file name.
/// Returns the path of the written file.
pub fn save_quote(quote: &QuoteData, dir: &Path) -> Result<PathBuf, String> {
    std::fs::create_dir_all(dir).map_err(|e| e.to_string())?;
    let name = format!("quote-{}.json", Local::now().format("%Y%m%d-%H%M%S"));
    let path = dir.join(name);
    write_quote(quote, &path)?;
    Ok(path)
}

/// Write a quote to an explicit path.
pub fn write_quote(quote: &QuoteData, path: &Path) -> Result<(), String> {
    let file = File::create(path).map_err(|e| e.to_string())?;
    let writer = BufWriter::new(file);
    serde_json::to_writer_pretty(writer, quote).map_err(|e| e.to_string())
}

/// Parse the content of a loaded quote file.
///
/// The file name is checked for a `.json` extension before the content is
/// touched, so a stray `.csv` drop gives a clear message instead of a
/// parse error.
pub fn parse_file_content(name: &str, content: &str) -> Result<QuoteData, String> {
    if !name.to_ascii_lowercase().ends_with(".json") {
        return Err(format!("'{}' is not a .json quote file.", name));
    }
    let quote: QuoteData = serde_json::from_str(content)
        .map_err(|e| format!("Could not read '{}': {}", name, e))?;
    if quote.items.is_empty() {
        return Err(format!("'{}' contains no quote items.", name));
    }
    Ok(quote)
}

/// Read and parse a quote file from disk.
pub fn read_quote(path: &Path) -> Result<QuoteData, String> {
    let name = path
        .file_name()
        .and_then(|n| n.to_str())
        .unwrap_or("quote file");
    let content = std::fs::read_to_string(path).map_err(|e| e.to_string())?;
    parse_file_content(name, &content)
}

#[cfg(test)]
mod tests {
    use super::*;
    use quotegrid_engine::item::Column;
    use quotegrid_engine::quote::QuoteStore;
    use tempfile::tempdir;

    fn sample_quote() -> QuoteData {
        let mut store = QuoteStore::new();
        store.update_item_value(0, Column::Width, Some(600));
        store.update_item_value(0, Column::Height, Some(900));
        store.cycle_item_type(0);
        store.data_mut().items[0].line_price = Some(118.0);
        store
            .data_mut()
            .items
            .get_mut(0)
            .unwrap()
            .detail
            .set(Column::Location, Some("Kitchen".into()));
        store.data_mut().summary.total_sum = Some(118.0);
        store.data().clone()
    }

    #[test]
    fn test_round_trip_preserves_quote() {
        let dir = tempdir().unwrap();
        let quote = sample_quote();
        let path = save_quote(&quote, dir.path()).unwrap();
        let loaded = read_quote(&path).unwrap();
        assert_eq!(loaded, quote);
    }

    #[test]
    fn test_parse_rejects_wrong_extension() {
        let err = parse_file_content("quote.csv", "{}").unwrap_err();
        assert!(err.contains("not a .json"));
    }

    #[test]
    fn test_parse_rejects_garbage() {
        assert!(parse_file_content("quote.json", "not json").is_err());
        assert!(parse_file_content("quote.json", r#"{"items": []}"#).is_err());
    }

    #[test]
    fn test_wire_field_names() {
        // The on-disk format uses the original camelCase field names.
        let json = to_json_string(&sample_quote()).unwrap();
        assert!(json.contains("\"fabricType\": \"BO\""));
        assert!(json.contains("\"linePrice\""));
        assert!(json.contains("\"totalSum\""));
        assert!(json.contains("\"itemId\""));
    }
}
