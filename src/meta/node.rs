//! Map data types: acts, clusters and nodes
//!
//! Everything here is generated once and then treated as immutable save data.

use rand::SeedableRng;
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

/// Encounter type of a node
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum NodeType {
    Combat,
    Event,
    Resource,
    Anomaly,
    Boss,
}

impl NodeType {
    pub fn as_str(&self) -> &'static str {
        match self {
            NodeType::Combat => "COMBAT",
            NodeType::Event => "EVENT",
            NodeType::Resource => "RESOURCE",
            NodeType::Anomaly => "ANOMALY",
            NodeType::Boss => "BOSS",
        }
    }
}

/// Run modifier attached to a node
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Modifier {
    ElitePacks,
    FastEnemies,
    BulletHell,
    NebulaLowVis,
    IonStorm,
    RichOre,
    LootQualityUp,
    XpBoost,
}

/// Modifier roll pool. Order is part of the generation contract.
pub const MODIFIER_POOL: [Modifier; 8] = [
    Modifier::ElitePacks,
    Modifier::FastEnemies,
    Modifier::BulletHell,
    Modifier::NebulaLowVis,
    Modifier::IonStorm,
    Modifier::RichOre,
    Modifier::LootQualityUp,
    Modifier::XpBoost,
];

impl Modifier {
    /// Position in `MODIFIER_POOL`
    pub fn pool_index(&self) -> usize {
        *self as usize
    }

    /// Next pool entry (wraps around)
    pub fn next(&self) -> Modifier {
        MODIFIER_POOL[(self.pool_index() + 1) % MODIFIER_POOL.len()]
    }
}

/// A selectable encounter on the map
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Node {
    pub id: String,
    pub index: u32,
    #[serde(rename = "type")]
    pub kind: NodeType,
    pub tier: u32,
    /// Seed for downstream per-node randomness
    pub seed: u32,
    /// 0-2 modifiers, never duplicated
    #[serde(default)]
    pub mods: Vec<Modifier>,
    /// Outgoing links (same cluster, no duplicates)
    #[serde(default)]
    pub connections: Vec<String>,
}

impl Node {
    /// Deterministic RNG for content rolled inside this node's run
    pub fn rng(&self) -> Pcg32 {
        Pcg32::seed_from_u64(u64::from(self.seed))
    }

    /// Whether `node_id` is a direct outgoing neighbor
    pub fn connects_to(&self, node_id: &str) -> bool {
        self.connections.iter().any(|c| c == node_id)
    }

    pub fn is_boss(&self) -> bool {
        self.kind == NodeType::Boss
    }
}

/// A generated group of nodes sharing one PRNG seed
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Cluster {
    pub id: String,
    pub name: String,
    pub nodes: Vec<Node>,
}

impl Cluster {
    pub fn node(&self, node_id: &str) -> Option<&Node> {
        self.nodes.iter().find(|n| n.id == node_id)
    }

    pub fn first_node(&self) -> Option<&Node> {
        self.nodes.first()
    }
}

/// Top-level campaign partition
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Act {
    pub id: String,
    pub name: String,
    pub clusters: Vec<Cluster>,
}

impl Act {
    pub fn cluster(&self, cluster_id: &str) -> Option<&Cluster> {
        self.clusters.iter().find(|c| c.id == cluster_id)
    }

    /// All nodes of the act in cluster order
    pub fn nodes(&self) -> impl Iterator<Item = &Node> {
        self.clusters.iter().flat_map(|c| c.nodes.iter())
    }
}
