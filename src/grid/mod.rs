//! Grid domain — board state, merge/move/swap primitives, shuffle, and
//! cell purchases.
//!
//! Communicates with other domains exclusively through crate::shared
//! events/resources. The primitives live in `engine`/`pairs`/`shuffle` as
//! methods on `GridState` so the automation scheduler and the headless
//! tests drive the exact same code as the manual path.

use bevy::prelude::*;

use crate::shared::*;

mod engine;
mod pairs;
mod shuffle;

pub use pairs::neighbors;

pub struct GridPlugin;

impl Plugin for GridPlugin {
    fn build(&self, app: &mut App) {
        app.add_systems(OnEnter(GameState::Playing), setup_board)
            .add_systems(
                Update,
                (
                    handle_buy_animal,
                    handle_place_animal,
                    handle_merge_request,
                    handle_swap_request,
                    handle_move_request,
                    handle_shuffle_request,
                    handle_purchase_cell,
                )
                    .run_if(in_state(GameState::Playing)),
            );
    }
}

/// Unions the free spots into the purchased set. Idempotent, so it is safe
/// regardless of whether a save was applied before or after it runs.
fn setup_board(
    mut grid: ResMut<GridState>,
    registry: Res<AnimalRegistry>,
    spots: Res<SpotRegistry>,
) {
    let free: Vec<Coord> = spots.free_coords().collect();
    let before = grid.purchased.len();
    grid.purchased.extend(free);
    if grid.purchased.len() != before {
        info!(
            "[Grid] Board ready: {} purchased cells.",
            grid.purchased.len()
        );
    }
    grid.recompute_pairs(&registry, &spots);
}

/// Inserts into the discovery set and fires the one-time creation
/// announcements if the type is new.
fn announce_if_new(
    grid: &mut GridState,
    registry: &AnimalRegistry,
    animal_id: &str,
    created_writer: &mut EventWriter<AnimalCreatedEvent>,
    toast_writer: &mut EventWriter<ToastEvent>,
) {
    if !grid.note_created(animal_id) {
        return;
    }
    created_writer.send(AnimalCreatedEvent {
        animal_id: animal_id.to_string(),
    });
    let name = registry
        .get(animal_id)
        .map(|d| d.name.clone())
        .unwrap_or_else(|| animal_id.to_string());
    toast_writer.send(ToastEvent {
        message: format!("New animal discovered: {}!", name),
        duration_secs: 3.0,
    });
}

fn handle_buy_animal(
    mut events: EventReader<BuyAnimalEvent>,
    mut grid: ResMut<GridState>,
    registry: Res<AnimalRegistry>,
    spots: Res<SpotRegistry>,
    campaign: Res<CampaignLevel>,
    ledger: Res<Ledger>,
    mut coin_writer: EventWriter<CoinChangeEvent>,
    mut created_writer: EventWriter<AnimalCreatedEvent>,
    mut toast_writer: EventWriter<ToastEvent>,
    mut sfx_writer: EventWriter<PlaySfxEvent>,
) {
    for ev in events.read() {
        let Some(def) = registry.get(&ev.animal_id) else {
            warn!("[Grid] Buy request for unknown animal '{}'.", ev.animal_id);
            continue;
        };
        let Some(price) = def.buy_price else {
            toast_writer.send(ToastEvent {
                message: format!("{} cannot be bought.", def.name),
                duration_secs: 2.0,
            });
            continue;
        };
        if !ledger.can_afford(price) {
            toast_writer.send(ToastEvent {
                message: format!("Not enough coins for a {}.", def.name),
                duration_secs: 2.0,
            });
            sfx_writer.send(PlaySfxEvent { sfx_id: "error".into() });
            continue;
        }
        if !grid.place(&ev.animal_id, None, &registry, &campaign, &spots) {
            toast_writer.send(ToastEvent {
                message: "No free cell on the board.".into(),
                duration_secs: 2.0,
            });
            sfx_writer.send(PlaySfxEvent { sfx_id: "error".into() });
            continue;
        }
        coin_writer.send(CoinChangeEvent {
            amount: -(price as i64),
            reason: format!("bought {}", def.name),
        });
        sfx_writer.send(PlaySfxEvent { sfx_id: "place".into() });
        announce_if_new(
            &mut grid,
            &registry,
            &ev.animal_id,
            &mut created_writer,
            &mut toast_writer,
        );
    }
}

fn handle_place_animal(
    mut events: EventReader<PlaceAnimalEvent>,
    mut grid: ResMut<GridState>,
    registry: Res<AnimalRegistry>,
    spots: Res<SpotRegistry>,
    campaign: Res<CampaignLevel>,
    mut created_writer: EventWriter<AnimalCreatedEvent>,
    mut toast_writer: EventWriter<ToastEvent>,
    mut sfx_writer: EventWriter<PlaySfxEvent>,
) {
    for ev in events.read() {
        if grid.place(&ev.animal_id, ev.target, &registry, &campaign, &spots) {
            sfx_writer.send(PlaySfxEvent { sfx_id: "place".into() });
            announce_if_new(
                &mut grid,
                &registry,
                &ev.animal_id,
                &mut created_writer,
                &mut toast_writer,
            );
        } else {
            info!(
                "[Grid] Place of '{}' refused (target {:?}).",
                ev.animal_id, ev.target
            );
        }
    }
}

fn handle_merge_request(
    mut events: EventReader<MergeRequestEvent>,
    mut grid: ResMut<GridState>,
    mut ledger: ResMut<Ledger>,
    registry: Res<AnimalRegistry>,
    spots: Res<SpotRegistry>,
    campaign: Res<CampaignLevel>,
    mut merged_writer: EventWriter<AnimalMergedEvent>,
    mut created_writer: EventWriter<AnimalCreatedEvent>,
    mut toast_writer: EventWriter<ToastEvent>,
    mut sfx_writer: EventWriter<PlaySfxEvent>,
) {
    for ev in events.read() {
        let Some(result) = grid.apply_merge(ev.source, ev.target, &registry, &campaign)
        else {
            toast_writer.send(ToastEvent {
                message: "Those two can't merge.".into(),
                duration_secs: 1.5,
            });
            sfx_writer.send(PlaySfxEvent { sfx_id: "error".into() });
            continue;
        };
        // Manual merges refresh the cache immediately.
        grid.recompute_pairs(&registry, &spots);
        ledger.record_merge();
        merged_writer.send(AnimalMergedEvent {
            result: result.clone(),
            at: ev.target,
        });
        sfx_writer.send(PlaySfxEvent { sfx_id: "merge".into() });
        announce_if_new(
            &mut grid,
            &registry,
            &result,
            &mut created_writer,
            &mut toast_writer,
        );
    }
}

fn handle_swap_request(
    mut events: EventReader<SwapRequestEvent>,
    mut grid: ResMut<GridState>,
    registry: Res<AnimalRegistry>,
    spots: Res<SpotRegistry>,
    campaign: Res<CampaignLevel>,
    mut sfx_writer: EventWriter<PlaySfxEvent>,
) {
    for ev in events.read() {
        if grid.swap(ev.source, ev.target, &registry, &campaign, &spots) {
            sfx_writer.send(PlaySfxEvent { sfx_id: "place".into() });
        }
    }
}

fn handle_move_request(
    mut events: EventReader<MoveRequestEvent>,
    mut grid: ResMut<GridState>,
    registry: Res<AnimalRegistry>,
    spots: Res<SpotRegistry>,
    campaign: Res<CampaignLevel>,
    mut sfx_writer: EventWriter<PlaySfxEvent>,
) {
    for ev in events.read() {
        if grid.move_to_empty(ev.source, ev.target, &registry, &campaign, &spots) {
            sfx_writer.send(PlaySfxEvent { sfx_id: "place".into() });
        }
    }
}

fn handle_shuffle_request(
    mut events: EventReader<ShuffleRequestEvent>,
    mut grid: ResMut<GridState>,
    registry: Res<AnimalRegistry>,
    spots: Res<SpotRegistry>,
    shuffle_state: Res<ShuffleState>,
    mut toast_writer: EventWriter<ToastEvent>,
    mut sfx_writer: EventWriter<PlaySfxEvent>,
) {
    for _ in events.read() {
        if !shuffle_state.owned {
            toast_writer.send(ToastEvent {
                message: "Buy the auto-shuffle upgrade first.".into(),
                duration_secs: 2.0,
            });
            continue;
        }
        let mut rng = rand::thread_rng();
        if grid.shuffle_animals(&registry, &spots, &mut rng) {
            info!("[Grid] Board shuffled.");
            sfx_writer.send(PlaySfxEvent { sfx_id: "shuffle".into() });
        }
    }
}

fn handle_purchase_cell(
    mut events: EventReader<PurchaseCellEvent>,
    mut grid: ResMut<GridState>,
    registry: Res<AnimalRegistry>,
    spots: Res<SpotRegistry>,
    ledger: Res<Ledger>,
    mut coin_writer: EventWriter<CoinChangeEvent>,
    mut toast_writer: EventWriter<ToastEvent>,
    mut sfx_writer: EventWriter<PlaySfxEvent>,
) {
    for ev in events.read() {
        let Some(spot) = spots.get(ev.coord) else {
            warn!("[Grid] Purchase request outside the spot list: {:?}", ev.coord);
            continue;
        };
        if grid.is_purchased(ev.coord) {
            continue;
        }
        if !ledger.can_afford(spot.cost) {
            toast_writer.send(ToastEvent {
                message: format!("That cell costs {} coins.", spot.cost),
                duration_secs: 2.0,
            });
            sfx_writer.send(PlaySfxEvent { sfx_id: "error".into() });
            continue;
        }
        if grid.unlock_cell(ev.coord, &registry, &spots) {
            coin_writer.send(CoinChangeEvent {
                amount: -(spot.cost as i64),
                reason: format!("unlocked cell ({}, {})", ev.coord.row, ev.coord.col),
            });
            sfx_writer.send(PlaySfxEvent { sfx_id: "purchase".into() });
        }
    }
}
