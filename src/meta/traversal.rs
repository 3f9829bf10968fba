//! Node traversal rules
//!
//! Per-node progression is monotonic: Locked -> Unlocked -> Cleared.
//! Nothing transitions on its own; the run/menu flow drives both entry points:
//! - `select_node` / `set_current_node` when the player picks a node
//! - `mark_cleared` after the run played on that node has ended

use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::node::Node;
use super::store::{CurrentPointer, ProgressionStore, find_node};

/// Progression state of a single node
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum NodeState {
    Locked,
    Unlocked,
    Cleared,
}

/// Why a node cannot become the current node
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TraversalError {
    #[error("unknown node: {0}")]
    UnknownNode(String),
    #[error("node locked: {0}")]
    Locked(String),
}

impl ProgressionStore {
    /// State of a node, `None` if it is not on the map
    pub fn node_state(&self, node_id: &str) -> Option<NodeState> {
        self.node(node_id)?;
        Some(if self.cleared_nodes.contains(node_id) {
            NodeState::Cleared
        } else if self.unlocked_nodes.contains(node_id) {
            NodeState::Unlocked
        } else {
            NodeState::Locked
        })
    }

    pub fn is_unlocked(&self, node_id: &str) -> bool {
        self.unlocked_nodes.contains(node_id)
    }

    pub fn is_cleared(&self, node_id: &str) -> bool {
        self.cleared_nodes.contains(node_id)
    }

    pub fn is_fast_travel(&self, node_id: &str) -> bool {
        self.fast_travel.contains(node_id)
    }

    /// Check whether `node_id` may become the current node
    pub fn can_select(&self, node_id: &str) -> Result<(), TraversalError> {
        if self.node(node_id).is_none() {
            return Err(TraversalError::UnknownNode(node_id.to_string()));
        }

        let replay = node_id == self.current.node_id;
        let adjacent = self
            .current_node()
            .is_some_and(|current| current.connects_to(node_id));

        if replay || adjacent || self.is_unlocked(node_id) {
            Ok(())
        } else {
            Err(TraversalError::Locked(node_id.to_string()))
        }
    }

    /// Move to a node. Entering a node unlocks it (idempotent).
    pub fn select_node(&mut self, node_id: &str) -> Result<(), TraversalError> {
        if let Err(e) = self.can_select(node_id) {
            log::debug!("Rejected node selection: {}", e);
            return Err(e);
        }

        if let Some((act, cluster, node)) = self.locate(node_id) {
            let pointer = CurrentPointer {
                act_id: act.id.clone(),
                cluster_id: cluster.id.clone(),
                node_id: node.id.clone(),
            };
            self.unlocked_nodes.insert(pointer.node_id.clone());
            self.current = pointer;
        }
        Ok(())
    }

    /// Boolean form of `select_node` for UI callers
    pub fn set_current_node(&mut self, node_id: &str) -> bool {
        self.select_node(node_id).is_ok()
    }

    /// Record a completed run on a node and unlock its outgoing neighbors.
    ///
    /// Unknown or empty ids are ignored. Clearing twice is harmless.
    pub fn mark_cleared(&mut self, node_id: &str) {
        let Some(node) = find_node(&self.acts, node_id) else {
            log::debug!("Ignoring clear of unknown node {:?}", node_id);
            return;
        };

        self.cleared_nodes.insert(node.id.clone());
        self.fast_travel.insert(node.id.clone());
        let mut unlocked = 0;
        for next in &node.connections {
            if find_node(&self.acts, next).is_some() {
                self.unlocked_nodes.insert(next.clone());
                unlocked += 1;
            }
        }

        log::info!("Cleared {} ({} connections unlocked)", node.id, unlocked);
    }

    /// What the start screen offers: replay current, then its neighbors
    pub fn selectable_nodes(&self) -> Vec<&Node> {
        let Some(current) = self.current_node() else {
            return Vec::new();
        };
        std::iter::once(current)
            .chain(self.connected(&current.id))
            .collect()
    }
}
