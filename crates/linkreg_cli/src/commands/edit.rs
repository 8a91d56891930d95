//! Commands that change assets or ownership.

use super::users::{load, print_text_output, UserView};
use linkreg_core::Registry;
use std::path::Path;
use tracing::info;

/// Runs the delete-asset command.
pub fn delete_asset(
    assets: &Path,
    users: &Path,
    hash: &str,
    write: bool,
) -> Result<(), Box<dyn std::error::Error>> {
    let mut registry = load(assets, users)?;
    let owners: Vec<String> = registry
        .owners_of(hash)?
        .into_iter()
        .map(str::to_owned)
        .collect();

    let removed = registry.delete_asset(hash)?;
    println!(
        "Deleted {} ({} bytes), detached from {} user(s)",
        removed.hash(),
        removed.size_bytes(),
        owners.len()
    );
    for owner in &owners {
        println!("  - {owner}");
    }

    if write {
        registry.save_all(assets, users)?;
    } else {
        println!("(dry run - pass --write to save)");
    }
    Ok(())
}

/// Runs the assign command.
pub fn assign(
    assets: &Path,
    users: &Path,
    user: &str,
    hash: &str,
    write: bool,
) -> Result<(), Box<dyn std::error::Error>> {
    let mut registry = load(assets, users)?;
    registry.assign_asset(user, hash)?;
    info!("Assigned {} to {}", hash, user);
    finish(&registry, users, user, write)
}

/// Runs the unassign command.
pub fn unassign(
    assets: &Path,
    users: &Path,
    user: &str,
    hash: &str,
    write: bool,
) -> Result<(), Box<dyn std::error::Error>> {
    let mut registry = load(assets, users)?;
    registry.unassign_asset(user, hash)?;
    info!("Unassigned {} from {}", hash, user);
    finish(&registry, users, user, write)
}

fn finish(
    registry: &Registry,
    users: &Path,
    user: &str,
    write: bool,
) -> Result<(), Box<dyn std::error::Error>> {
    let view = UserView::from(registry.find_user(user)?);
    print_text_output(std::slice::from_ref(&view));

    if write {
        registry.save_users(users)?;
    } else {
        println!("(dry run - pass --write to save)");
    }
    Ok(())
}
