//! Asterion - persistent node map and difficulty scaling
//!
//! Core modules:
//! - `meta`: Seeded node-graph generation, progression store, traversal rules
//! - `scaling`: Enemy level/stat scaling keyed off player level and node tier
//! - `persistence`: Save envelope and LocalStorage I/O
//! - `web`: Browser bindings (wasm32 only)

pub mod meta;
pub mod persistence;
pub mod scaling;
#[cfg(target_arch = "wasm32")]
pub mod web;

pub use meta::{
    Act, Cluster, CurrentPointer, Modifier, Node, NodeState, NodeType, ProgressionStore,
    TraversalError,
};
pub use scaling::{EncounterParams, EnemyKind, Scaling};

/// Map generation constants
pub mod consts {
    /// Nodes generated per cluster (index 0..29, last one is the boss)
    pub const NODES_PER_CLUSTER: usize = 30;
    /// Persisted map schema version
    pub const MAP_VERSION: u32 = 1;

    /// Chance a node rolls at least one modifier
    pub const MOD_CHANCE: f64 = 0.40;
    /// Chance a node rolls a second modifier (same roll as `MOD_CHANCE`)
    pub const DOUBLE_MOD_CHANCE: f64 = 0.10;
    /// Chance of a skip-ahead link to `i + 2`
    pub const BRANCH_CHANCE: f64 = 0.28;
    /// Chance of a back-link to `i - 2`
    pub const BACKLINK_CHANCE: f64 = 0.12;

    /// Default act/cluster generated on first boot
    pub const DEFAULT_ACT_ID: &str = "ACT_01";
    pub const DEFAULT_ACT_NAME: &str = "Galaxie Asterion";
    pub const DEFAULT_CLUSTER_ID: &str = "ACT_01_C1";
    pub const DEFAULT_CLUSTER_NAME: &str = "Wrackgürtel";
    pub const DEFAULT_BASE_TIER: u32 = 1;
}

/// Round half toward positive infinity (`Math.round` semantics)
#[inline]
pub fn round_half_up(x: f64) -> f64 {
    (x + 0.5).floor()
}
