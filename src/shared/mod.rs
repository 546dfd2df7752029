//! Shared resources, events, and states for Featherfield.
//!
//! This is the type contract. Every domain plugin imports from here.
//! No domain imports from any other domain directly.

use bevy::prelude::*;
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet, VecDeque};

// ═══════════════════════════════════════════════════════════════════════
// GAME STATE — top-level state machine
// ═══════════════════════════════════════════════════════════════════════

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, States, Default)]
pub enum GameState {
    #[default]
    Loading,
    Playing,
    Paused,
}

// ═══════════════════════════════════════════════════════════════════════
// ANIMAL CATALOG
// ═══════════════════════════════════════════════════════════════════════

/// Unique identifier for every animal type in the game.
/// Using string IDs for data-driven flexibility.
pub type AnimalId = String;

/// What merging two of this animal produces. `Terminal` animals are the
/// end of their chain and never appear in a mergeable pair.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum MergeOutcome {
    Terminal,
    Mergeable { into: AnimalId },
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnimalDef {
    pub id: AnimalId,
    pub name: String,
    /// Ordinal position in its merge chain, 1 = base animal.
    pub tier: u8,
    pub outcome: MergeOutcome,
    /// Coins credited when this animal is processed. 0 = not sellable.
    pub sell_price: u32,
    /// Coins to buy one from the hatchery. None = merge-only.
    pub buy_price: Option<u32>,
    /// Campaign level at which this animal becomes valid.
    pub unlock_level: u8,
    /// Placeholder render colour until real sprites land.
    pub color: (f32, f32, f32),
}

impl AnimalDef {
    pub fn merge_target(&self) -> Option<&AnimalId> {
        match &self.outcome {
            MergeOutcome::Terminal => None,
            MergeOutcome::Mergeable { into } => Some(into),
        }
    }
}

#[derive(Resource, Debug, Clone, Default)]
pub struct AnimalRegistry {
    pub animals: HashMap<AnimalId, AnimalDef>,
}

impl AnimalRegistry {
    pub fn get(&self, id: &str) -> Option<&AnimalDef> {
        self.animals.get(id)
    }

    pub fn merge_target(&self, id: &str) -> Option<&AnimalId> {
        self.get(id).and_then(|def| def.merge_target())
    }
}

// ═══════════════════════════════════════════════════════════════════════
// GRID SPOTS
// ═══════════════════════════════════════════════════════════════════════

#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
pub struct Coord {
    pub row: u8,
    pub col: u8,
}

impl Coord {
    pub fn new(row: u8, col: u8) -> Self {
        Self { row, col }
    }
}

/// A purchasable grid position. The spot list is row-major ordered and is
/// not necessarily a dense rectangle.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SpotDef {
    pub coord: Coord,
    pub cost: u32,
    /// Free spots start purchased on a fresh game.
    pub free: bool,
}

#[derive(Resource, Debug, Clone, Default)]
pub struct SpotRegistry {
    /// Row-major order. Placement scan and shuffle reassignment follow it.
    pub spots: Vec<SpotDef>,
    pub rows: u8,
    pub cols: u8,
}

impl SpotRegistry {
    pub fn get(&self, coord: Coord) -> Option<&SpotDef> {
        self.spots.iter().find(|s| s.coord == coord)
    }

    pub fn contains(&self, coord: Coord) -> bool {
        self.get(coord).is_some()
    }

    pub fn free_coords(&self) -> impl Iterator<Item = Coord> + '_ {
        self.spots.iter().filter(|s| s.free).map(|s| s.coord)
    }
}

// ═══════════════════════════════════════════════════════════════════════
// GRID STATE — authoritative board contents
// ═══════════════════════════════════════════════════════════════════════

/// The authoritative grid: cell contents, the purchased-cell set, the
/// one-time discovery set, and the derived mergeable-pairs cache.
///
/// The pairs cache is recomputed from scratch after every mutation rather
/// than updated incrementally; see `grid::pairs`.
#[derive(Resource, Debug, Clone, Default)]
pub struct GridState {
    pub cells: HashMap<Coord, AnimalId>,
    pub purchased: HashSet<Coord>,
    /// Every animal type ever created this save, for the catalog screen.
    pub created_animals: HashSet<AnimalId>,
    /// Unordered, duplicate-free. Derived; never persisted.
    pub mergeable_pairs: Vec<(Coord, Coord)>,
}

impl GridState {
    pub fn animal_at(&self, coord: Coord) -> Option<&AnimalId> {
        self.cells.get(&coord)
    }

    pub fn is_purchased(&self, coord: Coord) -> bool {
        self.purchased.contains(&coord)
    }

    pub fn is_empty_purchased(&self, coord: Coord) -> bool {
        self.is_purchased(coord) && !self.cells.contains_key(&coord)
    }

    pub fn occupied_count(&self) -> usize {
        self.cells.len()
    }

    /// Records a type in the discovery set. Returns true the first time.
    pub fn note_created(&mut self, id: &str) -> bool {
        self.created_animals.insert(id.to_string())
    }
}

/// Campaign progression gate. The grid engine treats "valid for the active
/// level" as an external predicate; nothing in this crate derives the level
/// itself beyond the debug advance key.
#[derive(Resource, Debug, Clone, Serialize, Deserialize)]
pub struct CampaignLevel {
    pub level: u8,
}

impl Default for CampaignLevel {
    fn default() -> Self {
        Self { level: 1 }
    }
}

/// True iff the type exists in the catalog and is unlocked at the active
/// campaign level. Unknown ids are never valid.
pub fn animal_unlocked(
    registry: &AnimalRegistry,
    campaign: &CampaignLevel,
    id: &str,
) -> bool {
    registry
        .get(id)
        .map(|def| def.unlock_level <= campaign.level)
        .unwrap_or(false)
}

// ═══════════════════════════════════════════════════════════════════════
// LEDGER — balance and monotonic counters
// ═══════════════════════════════════════════════════════════════════════

#[derive(Resource, Debug, Clone, Serialize, Deserialize)]
pub struct Ledger {
    pub coins: u32,
    pub total_merges: u64,
    pub total_processed: u64,
}

impl Default for Ledger {
    fn default() -> Self {
        Self {
            coins: STARTING_COINS,
            total_merges: 0,
            total_processed: 0,
        }
    }
}

impl Ledger {
    pub fn can_afford(&self, cost: u32) -> bool {
        self.coins >= cost
    }

    /// Guarded deduction. Returns false (and changes nothing) when the
    /// balance is insufficient.
    pub fn spend(&mut self, cost: u32) -> bool {
        if !self.can_afford(cost) {
            return false;
        }
        self.coins -= cost;
        true
    }

    pub fn credit(&mut self, amount: u32) {
        self.coins = self.coins.saturating_add(amount);
    }

    pub fn record_merge(&mut self) {
        self.total_merges += 1;
    }

    pub fn record_processed(&mut self) {
        self.total_processed += 1;
    }
}

// ═══════════════════════════════════════════════════════════════════════
// AUTOMATION & SHUFFLE
// ═══════════════════════════════════════════════════════════════════════

/// Auto-merge scheduler state. `owned` transitions false→true exactly once
/// (purchase); `enabled` is user-toggleable and takes effect before the
/// next tick because the countdown only runs while both are set.
#[derive(Resource, Debug, Clone, Serialize, Deserialize)]
pub struct AutomationState {
    pub owned: bool,
    pub enabled: bool,
    pub level: u32,
    pub interval_secs: f32,
    pub countdown_secs: f32,
}

impl Default for AutomationState {
    fn default() -> Self {
        Self {
            owned: false,
            enabled: true,
            level: 1,
            interval_secs: AUTOMATION_BASE_INTERVAL,
            countdown_secs: AUTOMATION_BASE_INTERVAL,
        }
    }
}

/// Auto-shuffle upgrade state. When owned and enabled, a shuffle is
/// scheduled a fixed delay after each automation pass.
#[derive(Resource, Debug, Clone, Serialize, Deserialize)]
pub struct ShuffleState {
    pub owned: bool,
    pub enabled: bool,
    /// Seconds until the pending post-pass shuffle fires. None = idle.
    pub pending_secs: Option<f32>,
}

impl Default for ShuffleState {
    fn default() -> Self {
        Self {
            owned: false,
            enabled: true,
            pending_secs: None,
        }
    }
}

// ═══════════════════════════════════════════════════════════════════════
// COOPS — bounded per-type processing queues
// ═══════════════════════════════════════════════════════════════════════

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CoopState {
    pub queue: VecDeque<AnimalId>,
    pub capacity: usize,
    pub countdown_secs: f32,
}

impl CoopState {
    pub fn new(capacity: usize, interval_secs: f32) -> Self {
        Self {
            queue: VecDeque::new(),
            capacity,
            countdown_secs: interval_secs,
        }
    }

    pub fn is_full(&self) -> bool {
        self.queue.len() >= self.capacity
    }
}

/// One coop per animal type, keyed explicitly — no dynamic field synthesis.
#[derive(Resource, Debug, Clone, Default, Serialize, Deserialize)]
pub struct CoopStates {
    pub coops: HashMap<AnimalId, CoopState>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CoopError {
    QueueFull,
    NotSellable,
    EmptyCell,
}

// ═══════════════════════════════════════════════════════════════════════
// EVENTS — cross-domain communication
// ═══════════════════════════════════════════════════════════════════════

#[derive(Event, Debug, Clone)]
pub struct CoinChangeEvent {
    pub amount: i64, // positive = gain, negative = spend
    pub reason: String,
}

/// Request to place an animal on the grid. `target: None` = first free
/// purchased spot in scan order.
#[derive(Event, Debug, Clone)]
pub struct PlaceAnimalEvent {
    pub animal_id: AnimalId,
    pub target: Option<Coord>,
}

/// Hatchery purchase: validates price, then places.
#[derive(Event, Debug, Clone)]
pub struct BuyAnimalEvent {
    pub animal_id: AnimalId,
}

#[derive(Event, Debug, Clone)]
pub struct MergeRequestEvent {
    pub source: Coord,
    pub target: Coord,
}

#[derive(Event, Debug, Clone)]
pub struct SwapRequestEvent {
    pub source: Coord,
    pub target: Coord,
}

#[derive(Event, Debug, Clone)]
pub struct MoveRequestEvent {
    pub source: Coord,
    pub target: Coord,
}

#[derive(Event, Debug, Clone)]
pub struct ShuffleRequestEvent;

#[derive(Event, Debug, Clone)]
pub struct PurchaseCellEvent {
    pub coord: Coord,
}

/// Move a grid animal into its type's processing queue.
#[derive(Event, Debug, Clone)]
pub struct SendToCoopEvent {
    pub coord: Coord,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UpgradeKind {
    Automation,
    Shuffle,
}

#[derive(Event, Debug, Clone)]
pub struct BuyUpgradeEvent {
    pub upgrade: UpgradeKind,
}

#[derive(Event, Debug, Clone)]
pub struct ToggleUpgradeEvent {
    pub upgrade: UpgradeKind,
}

/// A merge completed (manual or automated).
#[derive(Event, Debug, Clone)]
pub struct AnimalMergedEvent {
    pub result: AnimalId,
    pub at: Coord,
}

/// First-ever creation of a type this save.
#[derive(Event, Debug, Clone)]
pub struct AnimalCreatedEvent {
    pub animal_id: AnimalId,
}

/// A coop finished processing one animal.
#[derive(Event, Debug, Clone)]
pub struct AnimalSoldEvent {
    pub animal_id: AnimalId,
    pub price: u32,
}

/// Toast notification for player feedback.
#[derive(Event, Debug, Clone)]
pub struct ToastEvent {
    pub message: String,
    pub duration_secs: f32,
}

#[derive(Event, Debug, Clone)]
pub struct PlaySfxEvent {
    pub sfx_id: String,
}

// ═══════════════════════════════════════════════════════════════════════
// CONSTANTS
// ═══════════════════════════════════════════════════════════════════════

pub const SCREEN_WIDTH: f32 = 960.0;
pub const SCREEN_HEIGHT: f32 = 540.0;

pub const CELL_SIZE: f32 = 72.0;
pub const CELL_GAP: f32 = 6.0;

pub const STARTING_COINS: u32 = 25;

pub const AUTOMATION_BASE_INTERVAL: f32 = 30.0;
pub const AUTOMATION_MIN_INTERVAL: f32 = 5.0;
/// Seconds shaved off the automation interval per level gained.
pub const AUTOMATION_INTERVAL_DECAY: f32 = 2.5;
pub const AUTOMATION_COST: u32 = 500;

pub const SHUFFLE_COST: u32 = 250;
/// Delay between an automation pass and its follow-up shuffle.
pub const SHUFFLE_DELAY_SECS: f32 = 3.0;

pub const PROCESSING_BASE_INTERVAL: f32 = 10.0;
pub const PROCESSING_MIN_INTERVAL: f32 = 2.0;
pub const PROCESSING_INTERVAL_DECAY: f32 = 1.0;
pub const COOP_BASE_CAPACITY: usize = 3;
pub const COOP_MAX_CAPACITY: usize = 10;

pub const MAX_CAMPAIGN_LEVEL: u8 = 5;

pub const SAVE_VERSION: u32 = 1;
pub const SAVE_DEBOUNCE_SECS: f32 = 2.0;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ledger_spend_guarded() {
        let mut ledger = Ledger {
            coins: 5,
            ..Default::default()
        };
        assert!(!ledger.spend(10));
        assert_eq!(ledger.coins, 5, "failed spend must not touch the balance");
        assert!(ledger.spend(5));
        assert_eq!(ledger.coins, 0);
    }

    #[test]
    fn test_ledger_credit_saturates() {
        let mut ledger = Ledger {
            coins: u32::MAX - 1,
            ..Default::default()
        };
        ledger.credit(10);
        assert_eq!(ledger.coins, u32::MAX);
    }

    #[test]
    fn test_animal_unlocked_unknown_id_invalid() {
        let registry = AnimalRegistry::default();
        let campaign = CampaignLevel::default();
        assert!(!animal_unlocked(&registry, &campaign, "not_a_real_animal"));
    }

    #[test]
    fn test_merge_target_terminal() {
        let def = AnimalDef {
            id: "phoenix".into(),
            name: "Phoenix".into(),
            tier: 7,
            outcome: MergeOutcome::Terminal,
            sell_price: 2000,
            buy_price: None,
            unlock_level: 1,
            color: (1.0, 0.5, 0.0),
        };
        assert!(def.merge_target().is_none());
    }
}
