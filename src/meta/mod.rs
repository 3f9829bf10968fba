//! Persistent meta-progression map
//!
//! Acts contain clusters, clusters contain 30 procedurally generated nodes.
//! Generation must stay pure and deterministic:
//! - Cluster seed derived from the cluster id only
//! - Pinned hash and PRNG (bit-for-bit reproducible)
//! - Fixed draw order, including draws whose result goes unused

pub mod generator;
pub mod node;
pub mod rng;
pub mod store;
pub mod traversal;

pub use generator::{generate_cluster, generate_default_acts, roll_mods, roll_type};
pub use node::{Act, Cluster, MODIFIER_POOL, Modifier, Node, NodeType};
pub use rng::{Mulberry32, hash_seed};
pub use store::{CurrentPointer, ProgressionStore};
pub use traversal::{NodeState, TraversalError};
