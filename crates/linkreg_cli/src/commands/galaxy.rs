//! Battle history commands.

use linkreg_core::{Battle, Config, FleetStatus, GalaxyHistory, StatusOp};
use serde::Serialize;
use std::path::Path;
use tracing::info;

/// One battle as displayed.
#[derive(Debug, Serialize)]
pub struct BattleView {
    /// Battle name.
    pub name: String,
    /// Battle date.
    pub date: u32,
    /// Fleets in recorded order.
    pub fleets: Vec<FleetView>,
}

/// One fleet as displayed.
#[derive(Debug, Serialize)]
pub struct FleetView {
    /// Fleet name.
    pub name: String,
    /// Number of ships.
    pub total_ships: u16,
    /// Raw status bits.
    pub status: u32,
    /// Names of the set status bits.
    pub status_names: Vec<&'static str>,
}

impl From<&Battle> for BattleView {
    fn from(battle: &Battle) -> Self {
        Self {
            name: battle.name().to_owned(),
            date: battle.date(),
            fleets: battle
                .fleets()
                .iter()
                .map(|fleet| FleetView {
                    name: fleet.name().to_owned(),
                    total_ships: fleet.total_ships(),
                    status: fleet.status().bits(),
                    status_names: fleet.status().names(),
                })
                .collect(),
        }
    }
}

fn open(path: &Path) -> Result<GalaxyHistory, Box<dyn std::error::Error>> {
    info!("Loading battle history from {:?}", path);
    Ok(GalaxyHistory::open(path, &Config::default())?)
}

/// Runs the galaxy command.
pub fn show(path: &Path, format: &str) -> Result<(), Box<dyn std::error::Error>> {
    let history = open(path)?;
    let views: Vec<BattleView> = history.iter().map(BattleView::from).collect();

    match format {
        "json" => {
            println!("{}", serde_json::to_string_pretty(&views)?);
        }
        _ => {
            println!(
                "Battles: {}  Fleets: {}",
                history.total_battles(),
                history.total_fleets()
            );
            for battle in &views {
                println!();
                println!("{} ({})", battle.name, battle.date);
                for fleet in &battle.fleets {
                    let status = if fleet.status_names.is_empty() {
                        "-".to_owned()
                    } else {
                        fleet.status_names.join(", ")
                    };
                    println!(
                        "  {:<24} {:>6} ships  {:#06x} [{}]",
                        fleet.name, fleet.total_ships, fleet.status, status
                    );
                }
            }
        }
    }

    Ok(())
}

/// Runs the count-status command.
pub fn count_status(path: &Path, mask: u32) -> Result<(), Box<dyn std::error::Error>> {
    let history = open(path)?;
    let count = history.count_fleets_with_status_bits(FleetStatus::from_bits_retain(mask));
    println!("{count}");
    Ok(())
}

/// Runs the modify-status command.
pub fn modify_status(
    path: &Path,
    battle: &str,
    op: StatusOp,
    mask: u32,
    write: bool,
) -> Result<(), Box<dyn std::error::Error>> {
    let mut history = open(path)?;
    let modified =
        history.modify_fleet_statuses(battle, op, FleetStatus::from_bits_retain(mask))?;
    println!("Modified {modified} fleet(s) in {battle}");

    if write {
        history.save(path)?;
    } else {
        println!("(dry run - pass --write to save)");
    }
    Ok(())
}
