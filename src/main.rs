//! Hexfield - Entry Point
//!
//! Generates a battlefield over the configured terrain, deploys a small
//! roster for each faction, and provides a command loop for moving forces,
//! advancing rounds, and flipping the fog-of-war viewpoint.

use std::io::{self, Write};
use std::path::PathBuf;

use clap::Parser;

use hexfield::battlefield::Battlefield;
use hexfield::core::config::BattlefieldConfig;
use hexfield::core::error::Result;
use hexfield::core::types::{ControlFaction, Faction, ForceId, HexId};
use hexfield::force::Force;
use hexfield::grid::generator::{ElevationSource, HexGridGenerator};
use hexfield::visibility::RandomBlocking;

#[derive(Parser, Debug)]
#[command(name = "hexfield", about = "Hex-grid battlefield with fog of war")]
struct Args {
    /// Config file (TOML). Defaults apply when omitted.
    #[arg(long)]
    config: Option<PathBuf>,

    /// Seed for line-of-sight rolls, for reproducible sessions.
    #[arg(long)]
    seed: Option<u64>,
}

/// Synthetic cone-shaped peak centered on the battlefield, standing in for a
/// terrain tileset.
struct ConePeak {
    lon: f64,
    lat: f64,
    peak_m: f64,
    falloff_per_degree: f64,
}

impl ElevationSource for ConePeak {
    fn height_at(&self, lon: f64, lat: f64) -> f64 {
        let d = ((lon - self.lon).powi(2) + (lat - self.lat).powi(2)).sqrt();
        (self.peak_m - d * self.falloff_per_degree).max(0.0)
    }
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter("hexfield=debug")
        .init();

    let args = Args::parse();
    let config = match &args.config {
        Some(path) => BattlefieldConfig::load(path)?,
        None => BattlefieldConfig::default(),
    };

    tracing::info!("Hexfield starting...");

    let bounds = config.grid.bounds;
    let terrain = ConePeak {
        lon: (bounds.min_lon + bounds.max_lon) / 2.0,
        lat: bounds.mid_lat(),
        peak_m: 600.0,
        falloff_per_degree: 6_000.0,
    };
    let grid = HexGridGenerator::new(&config).generate(&terrain);

    let mut field = match args.seed {
        Some(seed) => {
            let policy = Box::new(RandomBlocking::seeded(seed, config.vision.pass_chance));
            Battlefield::with_policy(config, grid, policy)
        }
        None => Battlefield::new(config, grid),
    };

    field.init_forces(initial_roster())?;

    println!("\n=== HEXFIELD ===");
    println!("Hex-grid battlefield with probabilistic fog of war");
    println!();
    println!("Commands:");
    println!("  round / r            - Advance one round (recomputes fog)");
    println!("  move <force> <hex>   - Move a force (e.g. move blue-1 H_4_2)");
    println!("  view <blue|red>      - Switch whose fog is displayed");
    println!("  hex <id>             - Inspect a hex");
    println!("  status / s           - Show battlefield status");
    println!("  quit / q             - Exit");
    println!();

    loop {
        display_status(&field);

        print!("> ");
        io::stdout().flush()?;

        let mut input = String::new();
        io::stdin().read_line(&mut input)?;
        let input = input.trim();

        if input.is_empty() {
            continue;
        }
        if input == "quit" || input == "q" {
            break;
        }
        if input == "round" || input == "r" {
            field.advance_round();
            println!("Round {} begins.", field.round());
            continue;
        }
        if input == "status" || input == "s" {
            display_status(&field);
            continue;
        }
        if let Some(rest) = input.strip_prefix("view ") {
            match rest.trim() {
                "blue" => field.switch_faction(Faction::Blue),
                "red" => field.switch_faction(Faction::Red),
                other => {
                    println!("Unknown faction: {}", other);
                    continue;
                }
            }
            println!("Viewing as {:?}.", field.active_faction());
            continue;
        }
        if let Some(rest) = input.strip_prefix("move ") {
            let mut parts = rest.split_whitespace();
            match (parts.next(), parts.next()) {
                (Some(force), Some(hex)) => {
                    let force_id = ForceId::new(force);
                    match field.move_force(&force_id, &HexId::new(hex)) {
                        Ok(()) => println!("{} moved to {}.", force, hex),
                        Err(e) => println!("Move failed: {}", e),
                    }
                }
                _ => println!("Usage: move <force> <hex>"),
            }
            continue;
        }
        if let Some(rest) = input.strip_prefix("hex ") {
            display_hex(&field, &HexId::new(rest.trim()));
            continue;
        }

        println!("Unknown command. Available: round, move <force> <hex>, view <faction>, hex <id>, status, quit");
    }

    println!(
        "\nGoodbye! {} forces on the field after {} rounds.",
        field.force_count(),
        field.round()
    );
    Ok(())
}

/// A small starting roster on opposite corners of the grid.
fn initial_roster() -> Vec<Force> {
    vec![
        Force::new(
            ForceId::new("blue-1"),
            "1st Blue Battalion",
            Faction::Blue,
            HexId::new("H_0_0"),
            3,
        ),
        Force::new(
            ForceId::new("blue-2"),
            "2nd Blue Battalion",
            Faction::Blue,
            HexId::new("H_2_1"),
            2,
        ),
        Force::new(
            ForceId::new("red-1"),
            "1st Red Battalion",
            Faction::Red,
            HexId::new("H_6_3"),
            3,
        ),
    ]
}

/// Brief battlefield summary
fn display_status(field: &Battlefield) {
    println!();
    println!(
        "--- Round {} | Viewing as {:?} | {} hexes, {} forces ---",
        field.round(),
        field.active_faction(),
        field.grid().len(),
        field.force_count()
    );
    for faction in Faction::ALL {
        println!(
            "  {:?} sees {} of {} hexes",
            faction,
            field.visible_hex_count(faction),
            field.grid().len()
        );
    }
    println!();
}

fn display_hex(field: &Battlefield, hex_id: &HexId) {
    let Some(cell) = field.grid().get(hex_id) else {
        println!("No such hex: {}", hex_id);
        return;
    };
    println!();
    println!("{}", hex_id);
    println!(
        "  Terrain: {:?} at {:.0}m",
        cell.terrain.terrain_type, cell.terrain.elevation
    );
    match field.control_faction(hex_id) {
        ControlFaction::Neutral => println!("  Control: neutral"),
        ControlFaction::Held(f) => println!("  Control: held by {:?}", f),
        ControlFaction::Contested => println!("  Control: contested"),
    }
    let occupants = field.forces_in_hex(hex_id);
    if occupants.is_empty() {
        println!("  Occupants: none");
    } else {
        for id in occupants {
            println!("  Occupant: {}", id);
        }
    }
    for faction in Faction::ALL {
        println!(
            "  Visible to {:?}: {}",
            faction,
            field.is_visible(faction, hex_id)
        );
    }
    println!();
}
