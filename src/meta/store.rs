//! Progression store: the persisted map aggregate
//!
//! Holds the generated acts plus unlock/clear/fast-travel sets and the
//! current-position pointer. Save data is accepted as an untyped JSON value
//! and repaired on load, so a corrupt or outdated save never fails outward.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::generator::generate_default_acts;
use super::node::{Act, Cluster, Node};
use crate::consts::*;

/// Where the player currently is on the map
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct CurrentPointer {
    pub act_id: String,
    pub cluster_id: String,
    pub node_id: String,
}

impl Default for CurrentPointer {
    fn default() -> Self {
        Self {
            act_id: DEFAULT_ACT_ID.to_string(),
            cluster_id: DEFAULT_CLUSTER_ID.to_string(),
            node_id: format!("{DEFAULT_CLUSTER_ID}_N0"),
        }
    }
}

/// Persistent map progress
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProgressionStore {
    pub version: u32,
    pub acts: Vec<Act>,
    pub unlocked_acts: BTreeSet<String>,
    // Only grow; mutated through traversal
    pub(super) unlocked_nodes: BTreeSet<String>,
    pub(super) cleared_nodes: BTreeSet<String>,
    pub(super) fast_travel: BTreeSet<String>,
    pub(super) current: CurrentPointer,
}

impl Default for ProgressionStore {
    fn default() -> Self {
        Self::new()
    }
}

impl ProgressionStore {
    /// Fresh store with the default generated map
    pub fn new() -> Self {
        let mut store = Self::empty();
        store.repair();
        store
    }

    /// Build a valid store from a (possibly malformed) meta save record.
    ///
    /// Reads the `map` field; anything missing, mistyped or dangling is
    /// replaced with defaults.
    pub fn initialize(meta: &Value) -> Self {
        let mut store = match meta.get("map") {
            Some(map @ Value::Object(_)) => Self::from_map_value(map),
            Some(other) => {
                log::warn!("Save map is not an object ({}), resetting", type_name(other));
                Self::empty()
            }
            None => {
                log::info!("No map in save, starting fresh");
                Self::empty()
            }
        };
        store.repair();
        store
    }

    /// Default shape with no acts (not yet valid, see `repair`)
    fn empty() -> Self {
        Self {
            version: MAP_VERSION,
            acts: Vec::new(),
            unlocked_acts: BTreeSet::from([DEFAULT_ACT_ID.to_string()]),
            unlocked_nodes: BTreeSet::new(),
            cleared_nodes: BTreeSet::new(),
            fast_travel: BTreeSet::new(),
            current: CurrentPointer::default(),
        }
    }

    /// Field-by-field lenient decode of a map object
    fn from_map_value(map: &Value) -> Self {
        let version = map
            .get("version")
            .and_then(Value::as_u64)
            .and_then(|v| u32::try_from(v).ok())
            .unwrap_or(MAP_VERSION);

        let acts = match map.get("acts") {
            Some(value) => serde_json::from_value::<Vec<Act>>(value.clone()).unwrap_or_else(|e| {
                log::warn!("Discarding unreadable acts: {}", e);
                Vec::new()
            }),
            None => Vec::new(),
        };

        let current = map
            .get("current")
            .and_then(|v| serde_json::from_value::<CurrentPointer>(v.clone()).ok())
            .unwrap_or_default();

        Self {
            version,
            acts,
            unlocked_acts: map.get("unlockedActs").map(id_set).unwrap_or_default(),
            unlocked_nodes: map.get("unlockedNodes").map(id_set).unwrap_or_default(),
            cleared_nodes: map.get("clearedNodes").map(id_set).unwrap_or_default(),
            fast_travel: map.get("fastTravel").map(id_set).unwrap_or_default(),
            current,
        }
    }

    /// Restore every store invariant. A no-op on an already valid store.
    pub fn repair(&mut self) {
        // First boot (or a graph with nothing in it): generate
        if self.node_count() == 0 {
            if !self.acts.is_empty() {
                log::warn!("Map has {} acts but no nodes, regenerating", self.acts.len());
            }
            self.acts = generate_default_acts();
            self.unlocked_nodes.clear();
            self.cleared_nodes.clear();
            self.fast_travel.clear();
            self.unlocked_nodes.insert(self.current.node_id.clone());
        }

        if self.unlocked_acts.is_empty() {
            if let Some(act) = self.acts.first() {
                self.unlocked_acts.insert(act.id.clone());
            }
        }

        // Current node must resolve; keep act/cluster ids in sync with it
        let location = self
            .locate(&self.current.node_id)
            .map(|(act, cluster, _)| (act.id.clone(), cluster.id.clone()));
        match location {
            Some((act_id, cluster_id)) => {
                if self.current.act_id != act_id || self.current.cluster_id != cluster_id {
                    log::warn!(
                        "Current pointer out of sync for {}, fixing",
                        self.current.node_id
                    );
                    self.current.act_id = act_id;
                    self.current.cluster_id = cluster_id;
                }
            }
            None => {
                if let Some(pointer) = self.first_pointer() {
                    log::warn!(
                        "Current node {:?} not found, resetting to {}",
                        self.current.node_id,
                        pointer.node_id
                    );
                    self.unlocked_nodes.insert(pointer.node_id.clone());
                    self.current = pointer;
                }
            }
        }

        // Connections stay inside their own cluster
        for cluster in self.acts.iter_mut().flat_map(|a| a.clusters.iter_mut()) {
            let ids: BTreeSet<String> = cluster.nodes.iter().map(|n| n.id.clone()).collect();
            for node in &mut cluster.nodes {
                let before = node.connections.len();
                node.connections.retain(|c| ids.contains(c));
                if node.connections.len() != before {
                    log::warn!(
                        "Dropped {} dangling connections from {}",
                        before - node.connections.len(),
                        node.id
                    );
                }
            }
        }

        // Drop ids that no longer resolve
        let acts = &self.acts;
        let resolves = |id: &String| find_node(acts, id).is_some();
        for (name, set) in [
            ("unlocked", &mut self.unlocked_nodes),
            ("cleared", &mut self.cleared_nodes),
            ("fast-travel", &mut self.fast_travel),
        ] {
            let before = set.len();
            set.retain(|id| resolves(id));
            if set.len() != before {
                log::warn!("Dropped {} dangling {} node ids", before - set.len(), name);
            }
        }

        // Every cleared node is fast-travelable
        for id in &self.cleared_nodes {
            if self.fast_travel.insert(id.clone()) {
                log::warn!("Cleared node {} missing from fast travel, fixing", id);
            }
        }
    }

    /// Pointer to the first node of the first non-empty cluster
    fn first_pointer(&self) -> Option<CurrentPointer> {
        self.acts.iter().find_map(|act| {
            act.clusters.iter().find_map(|cluster| {
                cluster.first_node().map(|node| CurrentPointer {
                    act_id: act.id.clone(),
                    cluster_id: cluster.id.clone(),
                    node_id: node.id.clone(),
                })
            })
        })
    }

    /// Total nodes across all acts
    pub fn node_count(&self) -> usize {
        self.acts.iter().map(|a| a.nodes().count()).sum()
    }

    /// Look up a node by id (linear scan, the graph is small)
    pub fn node(&self, node_id: &str) -> Option<&Node> {
        find_node(&self.acts, node_id)
    }

    /// Look up a node together with the act and cluster holding it
    pub fn locate(&self, node_id: &str) -> Option<(&Act, &Cluster, &Node)> {
        self.acts.iter().find_map(|act| {
            act.clusters
                .iter()
                .find_map(|cluster| cluster.node(node_id).map(|node| (act, cluster, node)))
        })
    }

    pub fn act(&self, act_id: &str) -> Option<&Act> {
        self.acts.iter().find(|a| a.id == act_id)
    }

    /// Outgoing neighbors of a node; dangling ids are skipped
    pub fn connected(&self, node_id: &str) -> Vec<&Node> {
        self.node(node_id)
            .map(|node| {
                node.connections
                    .iter()
                    .filter_map(|id| self.node(id))
                    .collect()
            })
            .unwrap_or_default()
    }

    pub fn current(&self) -> &CurrentPointer {
        &self.current
    }

    pub fn current_node(&self) -> Option<&Node> {
        self.node(&self.current.node_id)
    }

    /// Tier of the current node (1 if it does not resolve)
    pub fn current_tier(&self) -> u32 {
        self.current_node().map(|n| n.tier).unwrap_or(1)
    }

    /// 1-based position of the current act (1 if it does not resolve)
    pub fn current_act_index(&self) -> usize {
        self.acts
            .iter()
            .position(|a| a.id == self.current.act_id)
            .map(|i| i + 1)
            .unwrap_or(1)
    }

    pub fn unlocked_nodes(&self) -> &BTreeSet<String> {
        &self.unlocked_nodes
    }

    pub fn cleared_nodes(&self) -> &BTreeSet<String> {
        &self.cleared_nodes
    }

    pub fn fast_travel(&self) -> &BTreeSet<String> {
        &self.fast_travel
    }
}

pub(super) fn find_node<'a>(acts: &'a [Act], node_id: &str) -> Option<&'a Node> {
    acts.iter().flat_map(Act::nodes).find(|n| n.id == node_id)
}

/// Decode an id set saved either as `["id", ...]` or `{"id": true, ...}`
fn id_set(value: &Value) -> BTreeSet<String> {
    match value {
        Value::Array(items) => items
            .iter()
            .filter_map(Value::as_str)
            .map(str::to_owned)
            .collect(),
        Value::Object(entries) => entries
            .iter()
            .filter(|(_, flag)| flag.as_bool() == Some(true))
            .map(|(id, _)| id.clone())
            .collect(),
        _ => BTreeSet::new(),
    }
}

fn type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "bool",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    const FIRST: &str = "ACT_01_C1_N0";

    #[test]
    fn test_fresh_store() {
        let store = ProgressionStore::new();
        assert_eq!(store.version, MAP_VERSION);
        assert_eq!(store.acts.len(), 1);
        assert_eq!(store.node_count(), NODES_PER_CLUSTER);
        assert_eq!(store.current().node_id, FIRST);
        assert_eq!(store.current().act_id, DEFAULT_ACT_ID);
        assert!(store.unlocked_nodes().contains(FIRST));
        assert_eq!(store.unlocked_nodes().len(), 1);
        assert!(store.cleared_nodes().is_empty());
        assert!(store.unlocked_acts.contains(DEFAULT_ACT_ID));
        assert_eq!(store.current_tier(), 1);
        assert_eq!(store.current_act_index(), 1);
    }

    #[test]
    fn test_initialize_rejects_non_object_map() {
        for meta in [
            json!(null),
            json!({}),
            json!({ "map": null }),
            json!({ "map": [1, 2, 3] }),
            json!({ "map": "ACT_01" }),
            json!({ "map": 7 }),
            json!([]),
        ] {
            assert_eq!(ProgressionStore::initialize(&meta), ProgressionStore::new());
        }
    }

    #[test]
    fn test_initialize_empty_acts_regenerates() {
        let meta = json!({
            "map": {
                "version": 1,
                "acts": [],
                "unlockedNodes": { "GHOST_N1": true },
                "current": { "actId": "ACT_01", "clusterId": "ACT_01_C1", "nodeId": "ACT_01_C1_N0" }
            }
        });
        let store = ProgressionStore::initialize(&meta);
        assert_eq!(store.node_count(), NODES_PER_CLUSTER);
        assert_eq!(store.unlocked_nodes().iter().collect::<Vec<_>>(), vec![FIRST]);
    }

    #[test]
    fn test_initialize_resets_dangling_current() {
        let mut saved = serde_json::to_value(ProgressionStore::new()).unwrap();
        saved["current"]["nodeId"] = json!("ACT_09_C4_N12");
        let store = ProgressionStore::initialize(&json!({ "map": saved }));
        assert_eq!(store.current().node_id, FIRST);
        assert!(store.current_node().is_some());
        assert!(store.unlocked_nodes().contains(FIRST));
    }

    #[test]
    fn test_initialize_syncs_pointer_ids() {
        let mut saved = serde_json::to_value(ProgressionStore::new()).unwrap();
        saved["current"] = json!({ "actId": "ACT_07", "nodeId": "ACT_01_C1_N0" });
        saved["unlockedNodes"] = json!(["ACT_01_C1_N0"]);
        let store = ProgressionStore::initialize(&json!({ "map": saved }));
        assert_eq!(store.current().act_id, DEFAULT_ACT_ID);
        assert_eq!(store.current().cluster_id, DEFAULT_CLUSTER_ID);
    }

    #[test]
    fn test_initialize_reads_legacy_object_sets() {
        let mut saved = serde_json::to_value(ProgressionStore::new()).unwrap();
        saved["unlockedNodes"] = json!({
            "ACT_01_C1_N0": true,
            "ACT_01_C1_N1": true,
            "ACT_01_C1_N2": false,
            "NOPE": true
        });
        saved["clearedNodes"] = json!({ "ACT_01_C1_N0": true });
        saved["fastTravel"] = json!({});
        let store = ProgressionStore::initialize(&json!({ "map": saved }));

        assert!(store.unlocked_nodes().contains("ACT_01_C1_N1"));
        assert!(!store.unlocked_nodes().contains("ACT_01_C1_N2"));
        assert!(!store.unlocked_nodes().contains("NOPE"));
        assert!(store.cleared_nodes().contains(FIRST));
        assert!(store.fast_travel().contains(FIRST));
    }

    #[test]
    fn test_initialize_survives_garbage_fields() {
        let meta = json!({
            "map": {
                "version": "two",
                "acts": { "not": "a list" },
                "unlockedActs": 5,
                "unlockedNodes": "x",
                "current": 12
            }
        });
        let store = ProgressionStore::initialize(&meta);
        assert_eq!(store, ProgressionStore::new());
    }

    #[test]
    fn test_initialize_is_idempotent() {
        let mut store = ProgressionStore::new();
        store.mark_cleared(FIRST);
        assert!(store.set_current_node("ACT_01_C1_N1"));

        let saved = json!({ "map": serde_json::to_value(&store).unwrap() });
        let once = ProgressionStore::initialize(&saved);
        assert_eq!(once, store);

        let again = ProgressionStore::initialize(&json!({ "map": serde_json::to_value(&once).unwrap() }));
        assert_eq!(again, once);

        let mut repaired = once.clone();
        repaired.repair();
        assert_eq!(repaired, once);
    }

    #[test]
    fn test_connected_skips_dangling() {
        let mut store = ProgressionStore::new();
        store.acts[0].clusters[0].nodes[0]
            .connections
            .push("ACT_01_C1_N99".to_string());
        let connected = store.connected(FIRST);
        assert_eq!(connected.len(), 1);
        assert_eq!(connected[0].id, "ACT_01_C1_N1");
        assert!(store.connected("missing").is_empty());
    }

    #[test]
    fn test_initialize_drops_dangling_connections() {
        let mut saved = serde_json::to_value(ProgressionStore::new()).unwrap();
        saved["acts"][0]["clusters"][0]["nodes"][0]["connections"] =
            json!(["ACT_01_C1_N1", "GHOST"]);
        let mut store = ProgressionStore::initialize(&json!({ "map": saved }));
        assert_eq!(store.node(FIRST).unwrap().connections, vec!["ACT_01_C1_N1"]);

        store.mark_cleared(FIRST);
        assert!(!store.is_unlocked("GHOST"));

        let reloaded = crate::persistence::decode(&crate::persistence::encode(&store).unwrap());
        assert!(reloaded.unlocked_nodes().is_superset(store.unlocked_nodes()));
        assert_eq!(reloaded, store);
    }

    #[test]
    fn test_current_tier_defaults_when_unresolved() {
        let mut store = ProgressionStore::new();
        store.current.node_id = "ACT_01_C1_N404".to_string();
        assert!(store.current_node().is_none());
        assert_eq!(store.current_tier(), 1);
    }

    #[test]
    fn test_lookups() {
        let store = ProgressionStore::new();
        assert!(store.act(DEFAULT_ACT_ID).is_some());
        assert!(store.act("ACT_02").is_none());
        let (act, cluster, node) = store.locate("ACT_01_C1_N29").unwrap();
        assert_eq!(act.id, DEFAULT_ACT_ID);
        assert_eq!(cluster.name, DEFAULT_CLUSTER_NAME);
        assert!(node.is_boss());
        assert!(store.node("").is_none());
    }
}
