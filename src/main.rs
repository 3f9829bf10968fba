//! Asterion map inspector
//!
//! Native: prints a generated cluster and the scaled enemy stats per node.
//! The browser build loads the library through `web::MetaMap` instead.

#[cfg(not(target_arch = "wasm32"))]
fn main() -> std::process::ExitCode {
    env_logger::init();

    match native::parse_args(std::env::args().skip(1)) {
        Ok(args) => {
            native::print_cluster(&args);
            std::process::ExitCode::SUCCESS
        }
        Err(msg) => {
            eprintln!("{msg}");
            eprintln!("usage: asterion [cluster_id] [base_tier] [player_level]");
            std::process::ExitCode::from(2)
        }
    }
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // WASM entry point is web::start, this is just to satisfy the compiler
}

#[cfg(not(target_arch = "wasm32"))]
mod native {
    use asterion::consts::{DEFAULT_BASE_TIER, DEFAULT_CLUSTER_ID};
    use asterion::meta::generate_cluster;
    use asterion::{EnemyKind, Scaling};

    /// Base stats used for the preview columns
    const PREVIEW_HP: f64 = 100.0;
    const PREVIEW_DMG: f64 = 10.0;

    pub struct Args {
        pub cluster_id: String,
        pub base_tier: u32,
        pub player_level: u32,
    }

    pub fn parse_args(mut args: impl Iterator<Item = String>) -> Result<Args, String> {
        let cluster_id = args.next().unwrap_or_else(|| DEFAULT_CLUSTER_ID.to_string());
        let base_tier = match args.next() {
            Some(s) => s
                .parse()
                .map_err(|_| format!("invalid base tier: {s}"))?,
            None => DEFAULT_BASE_TIER,
        };
        let player_level = match args.next() {
            Some(s) => s
                .parse()
                .map_err(|_| format!("invalid player level: {s}"))?,
            None => 1,
        };
        Ok(Args {
            cluster_id,
            base_tier,
            player_level,
        })
    }

    pub fn print_cluster(args: &Args) {
        let scaling = Scaling::default();
        let nodes = generate_cluster(&args.cluster_id, args.base_tier);
        log::info!(
            "Cluster {} at base tier {} for player level {}",
            args.cluster_id,
            args.base_tier,
            args.player_level
        );

        println!(
            "{:<18} {:<8} {:>4} {:>6} {:>6} {:>6} {:>6}  {:<28} links",
            "node", "type", "tier", "lvl", "hp", "dmg", "elite", "mods"
        );
        for node in &nodes {
            let kind = if node.is_boss() {
                EnemyKind::Boss
            } else {
                EnemyKind::Normal
            };
            let level = scaling.enemy_level(args.player_level, node.tier, kind);
            let params = scaling.encounter_params(node.tier);
            let mods = node
                .mods
                .iter()
                .map(|m| format!("{m:?}"))
                .collect::<Vec<_>>()
                .join(",");
            println!(
                "{:<18} {:<8} {:>4} {:>6} {:>6} {:>6} {:>5.1}%  {:<28} {}",
                node.id,
                node.kind.as_str(),
                node.tier,
                level,
                scaling.hp(PREVIEW_HP, level, node.tier, kind),
                scaling.damage(PREVIEW_DMG, level, node.tier, kind),
                params.elite_rate * 100.0,
                mods,
                node.connections.join(" "),
            );
        }
    }
}
