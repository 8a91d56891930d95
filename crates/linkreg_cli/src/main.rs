//! linkreg CLI
//!
//! Command-line tools for asset, user and battle-history files.
//!
//! # Commands
//!
//! - `assets` - Display an asset file
//! - `users` - Display users with the assets they own
//! - `delete-asset` - Delete an asset and every reference to it
//! - `assign` / `unassign` - Edit a user's owned assets
//! - `galaxy` - Display a battle history
//! - `count-status` - Count fleets with any of the given status bits
//! - `modify-status` - Set, clear or toggle status bits in one battle
//! - `bit-pairs` - Count 01 bit pairs in a string

mod commands;

use clap::{Parser, Subcommand, ValueEnum};
use linkreg_core::StatusOp;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

/// linkreg command-line tools.
#[derive(Parser)]
#[command(name = "linkreg")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Enable verbose output
    #[arg(global = true, short, long)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Display an asset file
    Assets {
        /// Asset file
        file: PathBuf,

        /// Output format (text, json)
        #[arg(short, long, default_value = "text")]
        format: String,
    },

    /// Display users and the assets they own
    Users {
        /// Asset file, loaded first
        assets: PathBuf,

        /// User file
        users: PathBuf,

        /// Output format (text, json)
        #[arg(short, long, default_value = "text")]
        format: String,
    },

    /// Delete an asset and remove it from every user
    DeleteAsset {
        /// Asset file
        assets: PathBuf,

        /// User file
        users: PathBuf,

        /// Hash of the asset to delete
        hash: String,

        /// Save both files after the change
        #[arg(short, long)]
        write: bool,
    },

    /// Give a user an asset
    Assign {
        /// Asset file
        assets: PathBuf,

        /// User file
        users: PathBuf,

        /// Username
        user: String,

        /// Asset hash
        hash: String,

        /// Save the user file after the change
        #[arg(short, long)]
        write: bool,
    },

    /// Take an asset away from a user
    Unassign {
        /// Asset file
        assets: PathBuf,

        /// User file
        users: PathBuf,

        /// Username
        user: String,

        /// Asset hash
        hash: String,

        /// Save the user file after the change
        #[arg(short, long)]
        write: bool,
    },

    /// Display a battle history
    Galaxy {
        /// Battle history file
        file: PathBuf,

        /// Output format (text, json)
        #[arg(short, long, default_value = "text")]
        format: String,
    },

    /// Count fleets with at least one bit of MASK set
    CountStatus {
        /// Battle history file
        file: PathBuf,

        /// Status mask, decimal or 0x-prefixed hex
        #[arg(value_parser = parse_mask)]
        mask: u32,
    },

    /// Apply MASK to every fleet of a battle
    ModifyStatus {
        /// Battle history file
        file: PathBuf,

        /// Battle name
        battle: String,

        /// How to combine MASK with each fleet's status
        #[arg(value_enum)]
        op: OpArg,

        /// Status mask, decimal or 0x-prefixed hex
        #[arg(value_parser = parse_mask)]
        mask: u32,

        /// Save the history after the change
        #[arg(short, long)]
        write: bool,
    },

    /// Count 01 bit pairs in a string
    BitPairs {
        /// Text to scan
        text: String,
    },

    /// Show version information
    Version,
}

/// Status operation as spelled on the command line.
#[derive(Debug, Clone, Copy, ValueEnum)]
enum OpArg {
    /// OR the mask in
    Set,
    /// AND NOT the mask out
    Clear,
    /// XOR the mask
    Toggle,
}

impl From<OpArg> for StatusOp {
    fn from(op: OpArg) -> Self {
        match op {
            OpArg::Set => StatusOp::Set,
            OpArg::Clear => StatusOp::Clear,
            OpArg::Toggle => StatusOp::Toggle,
        }
    }
}

fn parse_mask(text: &str) -> Result<u32, String> {
    let parsed = match text
        .strip_prefix("0x")
        .or_else(|| text.strip_prefix("0X"))
    {
        Some(hex) => u32::from_str_radix(hex, 16),
        None => text.parse(),
    };
    parsed.map_err(|err| format!("invalid mask {text:?}: {err}"))
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    // Initialize logging; RUST_LOG wins over --verbose
    let level = if cli.verbose { "debug" } else { "info" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));
    tracing_subscriber::fmt().with_env_filter(filter).init();

    match cli.command {
        Commands::Assets { file, format } => {
            commands::assets::run(&file, &format)?;
        }
        Commands::Users {
            assets,
            users,
            format,
        } => {
            commands::users::run(&assets, &users, &format)?;
        }
        Commands::DeleteAsset {
            assets,
            users,
            hash,
            write,
        } => {
            commands::edit::delete_asset(&assets, &users, &hash, write)?;
        }
        Commands::Assign {
            assets,
            users,
            user,
            hash,
            write,
        } => {
            commands::edit::assign(&assets, &users, &user, &hash, write)?;
        }
        Commands::Unassign {
            assets,
            users,
            user,
            hash,
            write,
        } => {
            commands::edit::unassign(&assets, &users, &user, &hash, write)?;
        }
        Commands::Galaxy { file, format } => {
            commands::galaxy::show(&file, &format)?;
        }
        Commands::CountStatus { file, mask } => {
            commands::galaxy::count_status(&file, mask)?;
        }
        Commands::ModifyStatus {
            file,
            battle,
            op,
            mask,
            write,
        } => {
            commands::galaxy::modify_status(&file, &battle, op.into(), mask, write)?;
        }
        Commands::BitPairs { text } => {
            println!("{}", linkreg_core::count_01_pairs_in_str(&text));
        }
        Commands::Version => {
            println!("linkreg CLI v{}", env!("CARGO_PKG_VERSION"));
            println!("linkreg Core v{}", linkreg_core::VERSION);
        }
    }

    Ok(())
}
