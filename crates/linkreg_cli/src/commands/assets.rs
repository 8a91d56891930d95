//! Assets command implementation.

use linkreg_core::{Asset, Registry};
use serde::Serialize;
use std::path::Path;
use tracing::info;

/// One asset as displayed.
#[derive(Debug, Serialize)]
pub struct AssetView {
    /// Content hash.
    pub hash: String,
    /// Size in bytes.
    pub size_bytes: u32,
    /// Raw flag bits.
    pub flags: u8,
    /// Names of the set flags.
    pub flag_names: Vec<&'static str>,
    /// 01 bit pairs in the hash.
    pub hash_bit_pairs: u32,
}

impl From<&Asset> for AssetView {
    fn from(asset: &Asset) -> Self {
        Self {
            hash: asset.hash().to_owned(),
            size_bytes: asset.size_bytes(),
            flags: asset.flags().bits(),
            flag_names: asset.flags().names(),
            hash_bit_pairs: asset.hash_bit_pairs(),
        }
    }
}

/// Runs the assets command.
pub fn run(path: &Path, format: &str) -> Result<(), Box<dyn std::error::Error>> {
    info!("Loading assets from {:?}", path);

    let mut registry = Registry::new();
    registry.load_assets(path)?;
    let views: Vec<AssetView> = registry.assets().iter().map(AssetView::from).collect();

    match format {
        "json" => {
            println!("{}", serde_json::to_string_pretty(&views)?);
        }
        _ => {
            print_text_output(&views);
        }
    }

    Ok(())
}

fn print_text_output(views: &[AssetView]) {
    println!("Assets ({}):", views.len());
    for view in views {
        let names = if view.flag_names.is_empty() {
            "-".to_owned()
        } else {
            view.flag_names.join(", ")
        };
        println!(
            "  {:<24} {:>10} bytes  flags {:#04x} [{}]",
            view.hash, view.size_bytes, view.flags, names
        );
    }
}
