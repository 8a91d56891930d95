//! Users command implementation.

use linkreg_core::{Registry, User};
use serde::Serialize;
use std::path::Path;
use tracing::info;

/// One user as displayed.
#[derive(Debug, Serialize)]
pub struct UserView {
    /// Username.
    pub username: String,
    /// Numeric id.
    pub user_id: u32,
    /// Owned asset hashes, in attachment order.
    pub owned: Vec<String>,
    /// 01 bit pairs in the username.
    pub name_bit_pairs: u32,
}

impl From<&User> for UserView {
    fn from(user: &User) -> Self {
        Self {
            username: user.username().to_owned(),
            user_id: user.user_id(),
            owned: user.owned().map(str::to_owned).collect(),
            name_bit_pairs: user.name_bit_pairs(),
        }
    }
}

/// Loads assets then users into a fresh registry.
pub(crate) fn load(
    assets: &Path,
    users: &Path,
) -> Result<Registry, Box<dyn std::error::Error>> {
    info!("Loading assets from {:?} and users from {:?}", assets, users);

    let mut registry = Registry::new();
    registry.load_assets(assets)?;
    registry.load_users(users)?;
    Ok(registry)
}

/// Runs the users command.
pub fn run(assets: &Path, users: &Path, format: &str) -> Result<(), Box<dyn std::error::Error>> {
    let registry = load(assets, users)?;
    let views: Vec<UserView> = registry.users().iter().map(UserView::from).collect();

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

pub(crate) fn print_text_output(views: &[UserView]) {
    println!("Users ({}):", views.len());
    for view in views {
        println!("  {} (id {})", view.username, view.user_id);
        if view.owned.is_empty() {
            println!("    (no assets)");
        }
        for hash in &view.owned {
            println!("    - {hash}");
        }
    }
}
