//! Cluster generation
//!
//! One PRNG per cluster, seeded from the cluster id. Draw order per cluster:
//! 1. For each node: seed draw, modifier roll, 0-2 modifier picks
//! 2. For each node: branch draw, back-link draw (always taken, even at bounds)

use super::node::{Act, Cluster, MODIFIER_POOL, Modifier, Node, NodeType};
use super::rng::Mulberry32;
use crate::consts::*;

/// Node type by index. Priority order matters: index 0 is an EVENT.
pub fn roll_type(index: usize) -> NodeType {
    if index == NODES_PER_CLUSTER - 1 {
        NodeType::Boss
    } else if index % 7 == 0 {
        NodeType::Event
    } else if index % 5 == 0 {
        NodeType::Resource
    } else if index % 11 == 0 {
        NodeType::Anomaly
    } else {
        NodeType::Combat
    }
}

/// Roll 0-2 modifiers from one draw `r`.
///
/// `r < 0.40` adds one modifier and `r < 0.10` adds a second, so the split is
/// ~60% none, ~30% exactly one, ~10% two.
pub fn roll_mods(rng: &mut Mulberry32) -> Vec<Modifier> {
    let mut mods = Vec::with_capacity(2);
    let r = rng.draw();
    if r < MOD_CHANCE {
        mods.push(MODIFIER_POOL[rng.pick(MODIFIER_POOL.len())]);
    }
    // Same roll: double-mod nodes are a subset of single-mod nodes
    if r < DOUBLE_MOD_CHANCE {
        let mut second = MODIFIER_POOL[rng.pick(MODIFIER_POOL.len())];
        if mods.first() == Some(&second) {
            second = second.next();
        }
        mods.push(second);
    }
    mods
}

/// Generate the 30 nodes of a cluster
pub fn generate_cluster(cluster_id: &str, base_tier: u32) -> Vec<Node> {
    let mut rng = Mulberry32::for_cluster(cluster_id);

    let mut nodes: Vec<Node> = (0..NODES_PER_CLUSTER)
        .map(|i| {
            let seed = (rng.draw() * 1e9).floor() as u32;
            let mods = roll_mods(&mut rng);
            Node {
                id: node_id(cluster_id, i),
                index: i as u32,
                kind: roll_type(i),
                tier: base_tier.saturating_add((i / 3) as u32),
                seed,
                mods,
                connections: Vec::new(),
            }
        })
        .collect();

    // Mostly forward, some branches + a few back-links
    for i in 0..NODES_PER_CLUSTER {
        let mut links = Vec::with_capacity(3);
        if i + 1 < NODES_PER_CLUSTER {
            links.push(i + 1);
        }
        if rng.chance(BRANCH_CHANCE) && i + 2 < NODES_PER_CLUSTER {
            links.push(i + 2);
        }
        if rng.chance(BACKLINK_CHANCE) && i >= 2 {
            links.push(i - 2);
        }

        let connections = &mut nodes[i].connections;
        for j in links {
            let id = node_id(cluster_id, j);
            if !connections.contains(&id) {
                connections.push(id);
            }
        }
    }

    nodes
}

/// First-boot map: one act with one cluster
pub fn generate_default_acts() -> Vec<Act> {
    let nodes = generate_cluster(DEFAULT_CLUSTER_ID, DEFAULT_BASE_TIER);
    log::info!(
        "Generated cluster {} ({} nodes, tiers {}-{})",
        DEFAULT_CLUSTER_ID,
        nodes.len(),
        nodes.first().map(|n| n.tier).unwrap_or(DEFAULT_BASE_TIER),
        nodes.last().map(|n| n.tier).unwrap_or(DEFAULT_BASE_TIER),
    );

    vec![Act {
        id: DEFAULT_ACT_ID.to_string(),
        name: DEFAULT_ACT_NAME.to_string(),
        clusters: vec![Cluster {
            id: DEFAULT_CLUSTER_ID.to_string(),
            name: DEFAULT_CLUSTER_NAME.to_string(),
            nodes,
        }],
    }]
}

fn node_id(cluster_id: &str, index: usize) -> String {
    format!("{cluster_id}_N{index}")
}
