//! Price book: the per-fabric-type price matrices.
//!
//! Ships with built-in tables and accepts an operator override file at
//! `<config dir>/quotegrid/pricebook.toml`. A missing file means built-ins;
//! a malformed file is reported on stderr and the built-ins are kept, so a
//! bad edit never takes the application down.

use std::path::PathBuf;

use serde::Deserialize;

use quotegrid_engine::item::FabricType;
use quotegrid_engine::pricing::{MatrixSet, PriceMatrix};

/// Breakpoints used by the built-in tables, in millimetres.
const BUILTIN_BREAKPOINTS: [u32; 9] = [900, 1200, 1500, 1800, 2100, 2400, 2700, 3000, 3300];

#[derive(Debug, Clone)]
pub struct PriceBook {
    matrices: MatrixSet,
}

/// On-disk shape of one matrix table.
///
/// Prices are rows by drop, columns by width. TOML has no null, so a
/// non-positive price marks a combination the supplier does not quote.
#[derive(Debug, Deserialize)]
struct MatrixFile {
    widths: Vec<u32>,
    drops: Vec<u32>,
    prices: Vec<Vec<f64>>,
}

#[derive(Debug, Deserialize)]
struct PriceBookFile {
    #[serde(rename = "BO")]
    bo: Option<MatrixFile>,
    #[serde(rename = "BO1")]
    bo1: Option<MatrixFile>,
    #[serde(rename = "SN")]
    sn: Option<MatrixFile>,
}

impl MatrixFile {
    fn into_matrix(self) -> Result<PriceMatrix, String> {
        if self.prices.len() != self.drops.len() {
            return Err(format!(
                "expected {} price rows, found {}",
                self.drops.len(),
                self.prices.len()
            ));
        }
        for (i, row) in self.prices.iter().enumerate() {
            if row.len() != self.widths.len() {
                return Err(format!(
                    "price row {} has {} cells, expected {}",
                    i,
                    row.len(),
                    self.widths.len()
                ));
            }
        }
        if !self.widths.windows(2).all(|w| w[0] < w[1])
            || !self.drops.windows(2).all(|d| d[0] < d[1])
        {
            return Err("breakpoints must be strictly ascending".to_string());
        }

        let prices = self
            .prices
            .into_iter()
            .map(|row| {
                row.into_iter()
                    .map(|p| if p > 0.0 { Some(p) } else { None })
                    .collect()
            })
            .collect();
        Ok(PriceMatrix {
            widths: self.widths,
            drops: self.drops,
            prices,
        })
    }
}

impl PriceBook {
    /// The built-in tables: one matrix per fabric type over the standard
    /// breakpoints, priced per band.
    pub fn builtin() -> Self {
        let mut matrices = MatrixSet::new();
        matrices.insert(FabricType::Bo, builtin_matrix(96.0, 14.0, 11.0));
        matrices.insert(FabricType::Bo1, builtin_matrix(108.0, 16.0, 12.0));
        matrices.insert(FabricType::Sn, builtin_matrix(122.0, 18.0, 14.0));
        Self { matrices }
    }

    /// Load the price book, applying `pricebook.toml` overrides when the
    /// file exists and parses.
    pub fn load() -> Self {
        Self::load_from(Self::override_path())
    }

    fn load_from(path: PathBuf) -> Self {
        let mut book = Self::builtin();
        let content = match std::fs::read_to_string(&path) {
            Ok(c) => c,
            Err(_) => return book, // no override file
        };
        match toml::from_str::<PriceBookFile>(&content) {
            Ok(file) => {
                book.apply_overrides(file);
            }
            Err(e) => {
                eprintln!("Error parsing {}: {}", path.display(), e);
                eprintln!("Using built-in price book");
            }
        }
        book
    }

    /// Build a price book directly from TOML content. Used by tests and
    /// the CLI's explicit `--pricebook` flag.
    pub fn from_toml(content: &str) -> Result<Self, String> {
        let file: PriceBookFile = toml::from_str(content).map_err(|e| e.to_string())?;
        let mut book = Self::builtin();
        book.apply_overrides_strict(file)?;
        Ok(book)
    }

    fn apply_overrides(&mut self, file: PriceBookFile) {
        for (fabric, entry) in [
            (FabricType::Bo, file.bo),
            (FabricType::Bo1, file.bo1),
            (FabricType::Sn, file.sn),
        ] {
            if let Some(entry) = entry {
                match entry.into_matrix() {
                    Ok(matrix) => self.matrices.insert(fabric, matrix),
                    Err(e) => eprintln!("Ignoring {} override: {}", fabric, e),
                }
            }
        }
    }

    fn apply_overrides_strict(&mut self, file: PriceBookFile) -> Result<(), String> {
        for (fabric, entry) in [
            (FabricType::Bo, file.bo),
            (FabricType::Bo1, file.bo1),
            (FabricType::Sn, file.sn),
        ] {
            if let Some(entry) = entry {
                let matrix = entry
                    .into_matrix()
                    .map_err(|e| format!("{} matrix: {}", fabric, e))?;
                self.matrices.insert(fabric, matrix);
            }
        }
        Ok(())
    }

    pub fn matrices(&self) -> &MatrixSet {
        &self.matrices
    }

    pub fn override_path() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("quotegrid")
            .join("pricebook.toml")
    }
}

impl Default for PriceBook {
    fn default() -> Self {
        Self::builtin()
    }
}

/// One banded table: price grows by `width_step` per width band and
/// `drop_step` per drop band from `base` at the smallest cell.
fn builtin_matrix(base: f64, width_step: f64, drop_step: f64) -> PriceMatrix {
    let widths = BUILTIN_BREAKPOINTS.to_vec();
    let drops = BUILTIN_BREAKPOINTS.to_vec();
    let prices = (0..drops.len())
        .map(|d| {
            (0..widths.len())
                .map(|w| Some(base + w as f64 * width_step + d as f64 * drop_step))
                .collect()
        })
        .collect();
    PriceMatrix {
        widths,
        drops,
        prices,
    }
}
