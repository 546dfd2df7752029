use bevy::prelude::*;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use crate::shared::*;

// ═══════════════════════════════════════════════════════════════════════
// SALE STATS — per-type processed counts and revenue
// ═══════════════════════════════════════════════════════════════════════

/// Accumulated statistics about processed animals.
/// Key = animal_id, Value = (total_processed_count, total_revenue_coins).
#[derive(Resource, Debug, Clone, Default, Serialize, Deserialize)]
pub struct SaleStats {
    pub animals: HashMap<AnimalId, (u32, u32)>,
}

/// Reads `AnimalSoldEvent` and updates `SaleStats`.
pub fn track_sales(mut events: EventReader<AnimalSoldEvent>, mut stats: ResMut<SaleStats>) {
    for ev in events.read() {
        let entry = stats.animals.entry(ev.animal_id.clone()).or_insert((0, 0));
        entry.0 = entry.0.saturating_add(1);
        entry.1 = entry.1.saturating_add(ev.price);
        info!(
            "[Economy/Stats] Processed {} for {}c (lifetime: {}x, {}c).",
            ev.animal_id, ev.price, entry.0, entry.1
        );
    }
}
