//! Persistence — a versioned JSON envelope around the whole game state.
//!
//! Saves are debounced: any change to a persisted resource arms a short
//! countdown, and the write happens once the countdown drains. A version
//! mismatch on load discards the save entirely; there is no migration.

use bevy::prelude::*;
use serde::{Deserialize, Serialize};
#[cfg(not(target_arch = "wasm32"))]
use std::fs;
#[cfg(not(target_arch = "wasm32"))]
use std::path::PathBuf;
#[cfg(not(target_arch = "wasm32"))]
use std::time::{SystemTime, UNIX_EPOCH};

use crate::economy::{EconomyStats, SaleStats};
use crate::shared::*;

// ═══════════════════════════════════════════════════════════════════════
// SAVE TYPES
// ═══════════════════════════════════════════════════════════════════════

/// Grid contents flattened for JSON: maps keyed by `Coord` don't survive
/// JSON's string-keyed objects, and sets serialize as arrays.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct GridSave {
    pub cells: Vec<(Coord, AnimalId)>,
    pub purchased_cells: Vec<Coord>,
    pub created_animals: Vec<AnimalId>,
}

impl GridSave {
    pub fn capture(grid: &GridState) -> Self {
        let mut cells: Vec<(Coord, AnimalId)> =
            grid.cells.iter().map(|(&c, id)| (c, id.clone())).collect();
        cells.sort_by_key(|(c, _)| *c);
        let mut purchased_cells: Vec<Coord> = grid.purchased.iter().copied().collect();
        purchased_cells.sort();
        let mut created_animals: Vec<AnimalId> =
            grid.created_animals.iter().cloned().collect();
        created_animals.sort();
        Self {
            cells,
            purchased_cells,
            created_animals,
        }
    }
}

/// Everything a save round-trips. The mergeable-pairs cache is derived and
/// deliberately absent.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SaveData {
    pub ledger: Ledger,
    pub grid: GridSave,
    pub automation: AutomationState,
    pub shuffle: ShuffleState,
    pub coops: CoopStates,
    pub campaign: CampaignLevel,
    pub economy_stats: EconomyStats,
    pub sale_stats: SaleStats,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SaveFile {
    pub version: u32,
    pub saved_at: u64,
    pub game_state: SaveData,
}

pub fn encode_save(data: &SaveData) -> Result<String, String> {
    let file = SaveFile {
        version: SAVE_VERSION,
        saved_at: current_timestamp(),
        game_state: data.clone(),
    };
    serde_json::to_string_pretty(&file).map_err(|e| format!("Serialization failed: {}", e))
}

/// Strict envelope check: a parse failure or a version other than the
/// current one discards the save.
pub fn decode_save(json: &str) -> Option<SaveData> {
    let file: SaveFile = match serde_json::from_str(json) {
        Ok(file) => file,
        Err(e) => {
            warn!("[Save] Corrupt save discarded: {}", e);
            return None;
        }
    };
    if file.version != SAVE_VERSION {
        warn!(
            "[Save] Save version {} does not match current version {}. Discarding.",
            file.version, SAVE_VERSION
        );
        return None;
    }
    Some(file.game_state)
}

// ═══════════════════════════════════════════════════════════════════════
// EVENTS & RESOURCES
// ═══════════════════════════════════════════════════════════════════════

/// Manual save trigger (pause menu, quit hook).
#[derive(Event, Debug, Clone)]
pub struct SaveRequestEvent;

/// Debounce bookkeeping for autosaves. Carries snapshots of the persisted
/// upgrade flags so `mark_dirty` can ignore their per-frame countdown churn
/// without missing a toggle or purchase.
#[derive(Resource, Debug)]
pub struct SaveDebounce {
    pub dirty: bool,
    pub remaining_secs: f32,
    automation_flags: (bool, bool, u32),
    shuffle_flags: (bool, bool),
}

impl Default for SaveDebounce {
    fn default() -> Self {
        let automation = AutomationState::default();
        let shuffle = ShuffleState::default();
        Self {
            dirty: false,
            remaining_secs: 0.0,
            automation_flags: (automation.owned, automation.enabled, automation.level),
            shuffle_flags: (shuffle.owned, shuffle.enabled),
        }
    }
}

// ═══════════════════════════════════════════════════════════════════════
// PLUGIN
// ═══════════════════════════════════════════════════════════════════════

pub struct SavePlugin;

impl Plugin for SavePlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<SaveDebounce>()
            .add_event::<SaveRequestEvent>()
            .add_systems(OnEnter(GameState::Playing), apply_save_once)
            .add_systems(
                Update,
                (mark_dirty, tick_debounce, handle_save_request)
                    .chain()
                    .run_if(in_state(GameState::Playing)),
            )
            // Pausing flushes immediately so a quit from the pause screen
            // never loses progress.
            .add_systems(OnEnter(GameState::Paused), save_now);
    }
}

// ═══════════════════════════════════════════════════════════════════════
// STORAGE BACKENDS
// ═══════════════════════════════════════════════════════════════════════

#[cfg(not(target_arch = "wasm32"))]
fn save_path() -> PathBuf {
    let exe_dir = std::env::current_exe()
        .ok()
        .and_then(|p| p.parent().map(|p| p.to_path_buf()))
        .unwrap_or_else(|| PathBuf::from("."));
    exe_dir.join("featherfield_save.json")
}

#[cfg(not(target_arch = "wasm32"))]
fn current_timestamp() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs())
        .unwrap_or(0)
}

#[cfg(target_arch = "wasm32")]
fn current_timestamp() -> u64 {
    0
}

#[cfg(not(target_arch = "wasm32"))]
fn write_storage(json: &str) -> Result<(), String> {
    let path = save_path();
    // Temp file then rename for atomicity.
    let tmp_path = path.with_extension("json.tmp");
    fs::write(&tmp_path, json)
        .map_err(|e| format!("Write failed for {}: {}", tmp_path.display(), e))?;
    fs::rename(&tmp_path, &path).map_err(|e| format!("Rename failed: {}", e))?;
    Ok(())
}

#[cfg(not(target_arch = "wasm32"))]
fn read_storage() -> Option<String> {
    let path = save_path();
    if !path.exists() {
        return None;
    }
    fs::read_to_string(&path).ok()
}

#[cfg(target_arch = "wasm32")]
const STORAGE_KEY: &str = "featherfield_save";

#[cfg(target_arch = "wasm32")]
fn local_storage() -> Option<web_sys::Storage> {
    web_sys::window().and_then(|w| w.local_storage().ok().flatten())
}

#[cfg(target_arch = "wasm32")]
fn write_storage(json: &str) -> Result<(), String> {
    let storage = local_storage().ok_or_else(|| "localStorage unavailable".to_string())?;
    storage
        .set_item(STORAGE_KEY, json)
        .map_err(|_| "localStorage write failed".to_string())
}

#[cfg(target_arch = "wasm32")]
fn read_storage() -> Option<String> {
    local_storage()?.get_item(STORAGE_KEY).ok().flatten()
}

// ═══════════════════════════════════════════════════════════════════════
// SYSTEMS
// ═══════════════════════════════════════════════════════════════════════

/// Restores a saved session, if one decodes cleanly. Cell contents with
/// ids no longer in the catalog are dropped; the pairs cache is rebuilt
/// rather than trusted from disk.
fn apply_save_once(
    registry: Res<AnimalRegistry>,
    spots: Res<SpotRegistry>,
    mut grid: ResMut<GridState>,
    mut ledger: ResMut<Ledger>,
    mut automation: ResMut<AutomationState>,
    mut shuffle: ResMut<ShuffleState>,
    mut coops: ResMut<CoopStates>,
    mut campaign: ResMut<CampaignLevel>,
    mut economy_stats: ResMut<EconomyStats>,
    mut sale_stats: ResMut<SaleStats>,
    mut debounce: ResMut<SaveDebounce>,
) {
    let Some(json) = read_storage() else {
        info!("[Save] No save found; starting fresh.");
        return;
    };
    let Some(data) = decode_save(&json) else {
        info!("[Save] Save discarded; starting fresh.");
        return;
    };

    *ledger = data.ledger;
    *automation = data.automation;
    *shuffle = data.shuffle;
    *campaign = data.campaign;
    *economy_stats = data.economy_stats;
    *sale_stats = data.sale_stats;

    coops.coops = data
        .coops
        .coops
        .into_iter()
        .filter(|(id, _)| registry.get(id).is_some())
        .collect();

    grid.cells.clear();
    for (coord, id) in data.grid.cells {
        if registry.get(&id).is_none() {
            warn!("[Save] Dropping unknown animal '{}' at {:?}.", id, coord);
            continue;
        }
        if !spots.contains(coord) {
            warn!("[Save] Dropping animal outside the spot list at {:?}.", coord);
            continue;
        }
        grid.cells.insert(coord, id);
    }
    grid.purchased = data
        .grid
        .purchased_cells
        .into_iter()
        .filter(|&c| spots.contains(c))
        .collect();
    grid.created_animals = data.grid.created_animals.into_iter().collect();
    grid.recompute_pairs(&registry, &spots);

    // The restore itself must not arm an autosave.
    debounce.dirty = false;
    debounce.automation_flags = (automation.owned, automation.enabled, automation.level);
    debounce.shuffle_flags = (shuffle.owned, shuffle.enabled);
    info!(
        "[Save] Session restored: {} coins, {} animals on the board.",
        ledger.coins,
        grid.occupied_count()
    );
}

fn capture(
    grid: &GridState,
    ledger: &Ledger,
    automation: &AutomationState,
    shuffle: &ShuffleState,
    coops: &CoopStates,
    campaign: &CampaignLevel,
    economy_stats: &EconomyStats,
    sale_stats: &SaleStats,
) -> SaveData {
    SaveData {
        ledger: ledger.clone(),
        grid: GridSave::capture(grid),
        automation: automation.clone(),
        shuffle: shuffle.clone(),
        coops: coops.clone(),
        campaign: campaign.clone(),
        economy_stats: economy_stats.clone(),
        sale_stats: sale_stats.clone(),
    }
}

/// Any change to a persisted resource re-arms the debounce countdown.
pub fn mark_dirty(
    grid: Res<GridState>,
    ledger: Res<Ledger>,
    automation: Res<AutomationState>,
    shuffle: Res<ShuffleState>,
    coops: Res<CoopStates>,
    campaign: Res<CampaignLevel>,
    mut debounce: ResMut<SaveDebounce>,
) {
    // The automation countdown and the pending-shuffle delay mutate every
    // tick; keying the debounce off whole-resource change detection would
    // save continuously. The persisted flags are snapshotted instead, so
    // purchases, toggles, and level-ups still arm the countdown.
    let automation_flags = (automation.owned, automation.enabled, automation.level);
    let shuffle_flags = (shuffle.owned, shuffle.enabled);
    let changed = grid.is_changed()
        || ledger.is_changed()
        || coops.is_changed()
        || campaign.is_changed()
        || automation_flags != debounce.automation_flags
        || shuffle_flags != debounce.shuffle_flags;
    debounce.automation_flags = automation_flags;
    debounce.shuffle_flags = shuffle_flags;
    if changed {
        debounce.dirty = true;
        debounce.remaining_secs = SAVE_DEBOUNCE_SECS;
    }
}

fn tick_debounce(
    time: Res<Time>,
    mut debounce: ResMut<SaveDebounce>,
    grid: Res<GridState>,
    ledger: Res<Ledger>,
    automation: Res<AutomationState>,
    shuffle: Res<ShuffleState>,
    coops: Res<CoopStates>,
    campaign: Res<CampaignLevel>,
    economy_stats: Res<EconomyStats>,
    sale_stats: Res<SaleStats>,
) {
    if !debounce.dirty {
        return;
    }
    debounce.remaining_secs -= time.delta_secs();
    if debounce.remaining_secs > 0.0 {
        return;
    }
    debounce.dirty = false;

    let data = capture(
        &grid,
        &ledger,
        &automation,
        &shuffle,
        &coops,
        &campaign,
        &economy_stats,
        &sale_stats,
    );
    match encode_save(&data).and_then(|json| write_storage(&json)) {
        Ok(()) => info!("[Save] Autosave written."),
        Err(e) => warn!("[Save] Autosave FAILED: {}", e),
    }
}

fn save_now(
    grid: Res<GridState>,
    ledger: Res<Ledger>,
    automation: Res<AutomationState>,
    shuffle: Res<ShuffleState>,
    coops: Res<CoopStates>,
    campaign: Res<CampaignLevel>,
    economy_stats: Res<EconomyStats>,
    sale_stats: Res<SaleStats>,
    mut debounce: ResMut<SaveDebounce>,
) {
    debounce.dirty = false;
    let data = capture(
        &grid,
        &ledger,
        &automation,
        &shuffle,
        &coops,
        &campaign,
        &economy_stats,
        &sale_stats,
    );
    match encode_save(&data).and_then(|json| write_storage(&json)) {
        Ok(()) => info!("[Save] Save written."),
        Err(e) => warn!("[Save] Save FAILED: {}", e),
    }
}

fn handle_save_request(
    mut events: EventReader<SaveRequestEvent>,
    grid: Res<GridState>,
    ledger: Res<Ledger>,
    automation: Res<AutomationState>,
    shuffle: Res<ShuffleState>,
    coops: Res<CoopStates>,
    campaign: Res<CampaignLevel>,
    economy_stats: Res<EconomyStats>,
    sale_stats: Res<SaleStats>,
    mut debounce: ResMut<SaveDebounce>,
    mut toast_writer: EventWriter<ToastEvent>,
) {
    if events.read().next().is_none() {
        return;
    }
    debounce.dirty = false;
    let data = capture(
        &grid,
        &ledger,
        &automation,
        &shuffle,
        &coops,
        &campaign,
        &economy_stats,
        &sale_stats,
    );
    match encode_save(&data).and_then(|json| write_storage(&json)) {
        Ok(()) => {
            toast_writer.send(ToastEvent {
                message: "Game saved.".into(),
                duration_secs: 1.5,
            });
        }
        Err(e) => {
            warn!("[Save] Manual save FAILED: {}", e);
            toast_writer.send(ToastEvent {
                message: "Save failed.".into(),
                duration_secs: 2.0,
            });
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_data() -> SaveData {
        let mut grid = GridState::default();
        grid.purchased.insert(Coord::new(0, 0));
        grid.purchased.insert(Coord::new(0, 1));
        grid.cells.insert(Coord::new(0, 0), "chick".into());
        grid.note_created("chick");
        SaveData {
            ledger: Ledger {
                coins: 123,
                total_merges: 4,
                total_processed: 7,
            },
            grid: GridSave::capture(&grid),
            automation: AutomationState {
                owned: true,
                ..Default::default()
            },
            shuffle: ShuffleState::default(),
            coops: CoopStates::default(),
            campaign: CampaignLevel { level: 2 },
            economy_stats: EconomyStats::default(),
            sale_stats: SaleStats::default(),
        }
    }

    #[test]
    fn test_save_round_trip() {
        let data = sample_data();
        let json = encode_save(&data).unwrap();
        let restored = decode_save(&json).expect("current-version save must decode");
        assert_eq!(restored.ledger.coins, 123);
        assert_eq!(restored.ledger.total_processed, 7);
        assert_eq!(restored.campaign.level, 2);
        assert!(restored.automation.owned);
        assert_eq!(restored.grid.cells, vec![(Coord::new(0, 0), "chick".to_string())]);
        assert_eq!(restored.grid.purchased_cells.len(), 2);
        assert_eq!(restored.grid.created_animals, vec!["chick".to_string()]);
    }

    #[test]
    fn test_version_mismatch_discards() {
        let data = sample_data();
        let json = encode_save(&data).unwrap();
        let mut file: serde_json::Value = serde_json::from_str(&json).unwrap();
        file["version"] = serde_json::json!(SAVE_VERSION + 1);
        let tampered = serde_json::to_string(&file).unwrap();
        assert!(decode_save(&tampered).is_none());
    }

    #[test]
    fn test_corrupt_json_discards() {
        assert!(decode_save("{ not json").is_none());
        assert!(decode_save("{}").is_none());
    }

    #[test]
    fn test_envelope_shape() {
        let json = encode_save(&sample_data()).unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(value["version"], SAVE_VERSION);
        assert!(value["saved_at"].is_u64());
        assert!(value["game_state"]["grid"]["purchased_cells"].is_array());
        assert!(value["game_state"]["grid"]["created_animals"].is_array());
    }
}
