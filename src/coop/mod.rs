//! Coop domain — bounded per-type processing queues.
//!
//! Each animal type gets its own coop, created lazily the first time one of
//! that type is sent in. A coop holds a FIFO queue; while the queue is
//! non-empty a countdown runs, and each expiry sells the head for its
//! catalog price. Capacity and processing speed scale with the shared
//! processing level derived from the total-processed counter.

use bevy::prelude::*;

use crate::automation::{coop_capacity, processing_interval, processing_level};
use crate::shared::*;

pub struct CoopPlugin;

impl Plugin for CoopPlugin {
    fn build(&self, app: &mut App) {
        app.add_systems(
            Update,
            (sync_coop_capacities, handle_send_to_coop, tick_coops)
                .chain()
                .run_if(in_state(GameState::Playing)),
        );
    }
}

/// Validation shared by the event handler and the headless tests. Does not
/// mutate anything.
pub fn check_send_to_coop(
    grid: &GridState,
    coops: &CoopStates,
    registry: &AnimalRegistry,
    coord: Coord,
) -> Result<AnimalId, CoopError> {
    let Some(id) = grid.animal_at(coord) else {
        return Err(CoopError::EmptyCell);
    };
    let sellable = registry.get(id).map(|d| d.sell_price > 0).unwrap_or(false);
    if !sellable {
        return Err(CoopError::NotSellable);
    }
    if coops.coops.get(id).map(CoopState::is_full).unwrap_or(false) {
        return Err(CoopError::QueueFull);
    }
    Ok(id.clone())
}

fn handle_send_to_coop(
    mut events: EventReader<SendToCoopEvent>,
    mut grid: ResMut<GridState>,
    mut coops: ResMut<CoopStates>,
    registry: Res<AnimalRegistry>,
    spots: Res<SpotRegistry>,
    ledger: Res<Ledger>,
    mut toast_writer: EventWriter<ToastEvent>,
    mut sfx_writer: EventWriter<PlaySfxEvent>,
) {
    for ev in events.read() {
        let id = match check_send_to_coop(&grid, &coops, &registry, ev.coord) {
            Ok(id) => id,
            Err(err) => {
                let message = match err {
                    CoopError::EmptyCell => "Nothing there to send.".to_string(),
                    CoopError::NotSellable => "That animal can't be processed.".to_string(),
                    CoopError::QueueFull => "That coop is full.".to_string(),
                };
                toast_writer.send(ToastEvent {
                    message,
                    duration_secs: 2.0,
                });
                sfx_writer.send(PlaySfxEvent { sfx_id: "error".into() });
                continue;
            }
        };

        grid.cells.remove(&ev.coord);
        grid.recompute_pairs(&registry, &spots);

        let level = processing_level(ledger.total_processed);
        let coop = coops
            .coops
            .entry(id.clone())
            .or_insert_with(|| CoopState::new(coop_capacity(level), processing_interval(level)));
        coop.queue.push_back(id.clone());
        sfx_writer.send(PlaySfxEvent { sfx_id: "place".into() });
        info!(
            "[Coop] Queued '{}' ({}/{}).",
            id,
            coop.queue.len(),
            coop.capacity
        );
    }
}

fn tick_coops(
    time: Res<Time>,
    mut coops: ResMut<CoopStates>,
    mut ledger: ResMut<Ledger>,
    registry: Res<AnimalRegistry>,
    mut coin_writer: EventWriter<CoinChangeEvent>,
    mut sold_writer: EventWriter<AnimalSoldEvent>,
    mut sfx_writer: EventWriter<PlaySfxEvent>,
) {
    let delta = time.delta_secs();
    // Sells landing this frame don't speed up this frame's other coops.
    let level = processing_level(ledger.total_processed);
    let interval = processing_interval(level);

    for coop in coops.coops.values_mut() {
        if coop.queue.is_empty() {
            // Idle coops hold a fresh countdown so the first sell after a
            // send takes a full interval.
            coop.countdown_secs = interval;
            continue;
        }
        coop.countdown_secs -= delta;
        if coop.countdown_secs > 0.0 {
            continue;
        }
        coop.countdown_secs = interval;

        let Some(id) = coop.queue.pop_front() else {
            continue;
        };
        let price = registry.get(&id).map(|d| d.sell_price).unwrap_or(0);
        ledger.record_processed();
        coin_writer.send(CoinChangeEvent {
            amount: price as i64,
            reason: format!("processed {}", id),
        });
        sold_writer.send(AnimalSoldEvent {
            animal_id: id,
            price,
        });
        sfx_writer.send(PlaySfxEvent { sfx_id: "sell".into() });
    }
}

/// Grows every coop to the capacity for the current processing level.
/// Capacity never shrinks, so queues filled at a higher level stay legal.
fn sync_coop_capacities(ledger: Res<Ledger>, mut coops: ResMut<CoopStates>) {
    if !ledger.is_changed() {
        return;
    }
    let capacity = coop_capacity(processing_level(ledger.total_processed));
    for coop in coops.coops.values_mut() {
        if coop.capacity < capacity {
            coop.capacity = capacity;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sellable_registry() -> AnimalRegistry {
        let mut registry = AnimalRegistry::default();
        for (id, sell_price) in [("hen", 12u32), ("duckling", 0u32)] {
            registry.animals.insert(
                id.to_string(),
                AnimalDef {
                    id: id.to_string(),
                    name: id.to_string(),
                    tier: 1,
                    outcome: MergeOutcome::Terminal,
                    sell_price,
                    buy_price: None,
                    unlock_level: 1,
                    color: (1.0, 1.0, 1.0),
                },
            );
        }
        registry
    }

    #[test]
    fn test_send_validation_errors() {
        let registry = sellable_registry();
        let mut grid = GridState::default();
        let coops = CoopStates::default();
        let spot = Coord::new(0, 0);
        grid.purchased.insert(spot);

        assert_eq!(
            check_send_to_coop(&grid, &coops, &registry, spot),
            Err(CoopError::EmptyCell)
        );

        grid.cells.insert(spot, "duckling".into());
        assert_eq!(
            check_send_to_coop(&grid, &coops, &registry, spot),
            Err(CoopError::NotSellable)
        );

        grid.cells.insert(spot, "hen".into());
        assert_eq!(
            check_send_to_coop(&grid, &coops, &registry, spot),
            Ok("hen".to_string())
        );
    }

    #[test]
    fn test_full_queue_refuses() {
        let registry = sellable_registry();
        let mut grid = GridState::default();
        let spot = Coord::new(0, 0);
        grid.purchased.insert(spot);
        grid.cells.insert(spot, "hen".into());

        let mut coops = CoopStates::default();
        let mut coop = CoopState::new(2, PROCESSING_BASE_INTERVAL);
        coop.queue.push_back("hen".into());
        coop.queue.push_back("hen".into());
        coops.coops.insert("hen".into(), coop);

        assert_eq!(
            check_send_to_coop(&grid, &coops, &registry, spot),
            Err(CoopError::QueueFull)
        );
    }

    #[test]
    fn test_is_full_tracks_capacity() {
        let mut coop = CoopState::new(1, PROCESSING_BASE_INTERVAL);
        assert!(!coop.is_full());
        coop.queue.push_back("hen".into());
        assert!(coop.is_full());
    }
}
