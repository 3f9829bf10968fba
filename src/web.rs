//! Browser bindings
//!
//! Exposes the map read/write surface and the difficulty functions to the
//! JS host. Structured values cross the boundary as JSON strings.

use wasm_bindgen::prelude::*;

use crate::meta::ProgressionStore;
use crate::persistence;
use crate::scaling::{EnemyKind, Scaling};

#[wasm_bindgen(start)]
pub fn start() {
    console_error_panic_hook::set_once();
    // Host may have installed a logger already
    let _ = console_log::init_with_level(log::Level::Info);
    log::info!("Asterion meta map module loaded");
}

/// Caller-owned handle to the persistent map
#[wasm_bindgen]
pub struct MetaMap {
    store: ProgressionStore,
}

#[wasm_bindgen]
impl MetaMap {
    /// Load from LocalStorage (fresh map if none)
    #[wasm_bindgen(constructor)]
    pub fn load() -> MetaMap {
        MetaMap {
            store: persistence::load(),
        }
    }

    /// Build from a save envelope string (repairs malformed input)
    #[wasm_bindgen(js_name = fromJson)]
    pub fn from_json(json: &str) -> MetaMap {
        MetaMap {
            store: persistence::decode(json),
        }
    }

    pub fn save(&self) -> Result<(), JsError> {
        Ok(persistence::save(&self.store)?)
    }

    #[wasm_bindgen(js_name = toJson)]
    pub fn to_json(&self) -> Result<String, JsError> {
        Ok(persistence::encode(&self.store)?)
    }

    #[wasm_bindgen(js_name = getCurrentNode)]
    pub fn current_node(&self) -> Option<String> {
        self.store
            .current_node()
            .and_then(|n| serde_json::to_string(n).ok())
    }

    #[wasm_bindgen(js_name = getCurrentTier)]
    pub fn current_tier(&self) -> u32 {
        self.store.current_tier()
    }

    #[wasm_bindgen(js_name = getConnected)]
    pub fn connected(&self, node_id: &str) -> Result<String, JsError> {
        Ok(serde_json::to_string(&self.store.connected(node_id))?)
    }

    /// Replay option first, then reachable neighbors
    #[wasm_bindgen(js_name = getNodeOptions)]
    pub fn node_options(&self) -> Result<String, JsError> {
        Ok(serde_json::to_string(&self.store.selectable_nodes())?)
    }

    #[wasm_bindgen(js_name = getAct)]
    pub fn act(&self, act_id: &str) -> Option<String> {
        self.store
            .act(act_id)
            .and_then(|a| serde_json::to_string(a).ok())
    }

    #[wasm_bindgen(js_name = nodeState)]
    pub fn node_state(&self, node_id: &str) -> Option<String> {
        self.store
            .node_state(node_id)
            .and_then(|s| serde_json::to_string(&s).ok())
    }

    #[wasm_bindgen(js_name = setCurrentNode)]
    pub fn set_current_node(&mut self, node_id: &str) -> bool {
        self.store.set_current_node(node_id)
    }

    #[wasm_bindgen(js_name = markCleared)]
    pub fn mark_cleared(&mut self, node_id: &str) {
        self.store.mark_cleared(node_id);
    }
}

fn kind(name: &str) -> EnemyKind {
    EnemyKind::from_str(name).unwrap_or_default()
}

#[wasm_bindgen(js_name = enemyLevel)]
pub fn js_enemy_level(player_level: u32, node_tier: u32, kind_name: &str) -> u32 {
    Scaling::default().enemy_level(player_level, node_tier, kind(kind_name))
}

#[wasm_bindgen(js_name = enemyHp)]
pub fn js_hp(base_hp: f64, level: u32, node_tier: u32, kind_name: &str) -> f64 {
    Scaling::default().hp(base_hp, level, node_tier, kind(kind_name)) as f64
}

#[wasm_bindgen(js_name = enemyDamage)]
pub fn js_damage(base_dmg: f64, level: u32, node_tier: u32, kind_name: &str) -> f64 {
    Scaling::default().damage(base_dmg, level, node_tier, kind(kind_name)) as f64
}

#[wasm_bindgen(js_name = encounterParams)]
pub fn js_encounter_params(node_tier: u32) -> Result<String, JsError> {
    Ok(serde_json::to_string(
        &Scaling::default().encounter_params(node_tier),
    )?)
}
