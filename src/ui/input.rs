//! Keyboard controls.
//!
//! Arrows move the board cursor. Space grabs the cursor cell and, with a
//! grab held, applies merge/move/swap against the cell under the cursor.
//! The rest are single-key commands listed on the HUD hint line.

use bevy::prelude::*;

use crate::shared::*;

/// Keyboard cursor over the board, plus an optional grabbed source cell.
#[derive(Resource, Debug, Default)]
pub struct BoardCursor {
    pub coord: Coord,
    pub grabbed: Option<Coord>,
}

pub fn move_cursor(
    keys: Res<ButtonInput<KeyCode>>,
    spots: Res<SpotRegistry>,
    mut cursor: ResMut<BoardCursor>,
) {
    let mut coord = cursor.coord;
    if keys.just_pressed(KeyCode::ArrowLeft) {
        coord.col = coord.col.saturating_sub(1);
    }
    if keys.just_pressed(KeyCode::ArrowRight) && coord.col + 1 < spots.cols {
        coord.col += 1;
    }
    if keys.just_pressed(KeyCode::ArrowUp) {
        coord.row = coord.row.saturating_sub(1);
    }
    if keys.just_pressed(KeyCode::ArrowDown) && coord.row + 1 < spots.rows {
        coord.row += 1;
    }
    if coord != cursor.coord {
        cursor.coord = coord;
    }
}

/// Space: grab / apply. With a grab held, the action against the target is
/// picked by inspection: same type = merge, empty purchased = move,
/// different occupant = swap.
pub fn grab_and_apply(
    keys: Res<ButtonInput<KeyCode>>,
    grid: Res<GridState>,
    mut cursor: ResMut<BoardCursor>,
    mut merge_writer: EventWriter<MergeRequestEvent>,
    mut move_writer: EventWriter<MoveRequestEvent>,
    mut swap_writer: EventWriter<SwapRequestEvent>,
) {
    if !keys.just_pressed(KeyCode::Space) {
        return;
    }
    let target = cursor.coord;
    let Some(source) = cursor.grabbed else {
        if grid.animal_at(target).is_some() {
            cursor.grabbed = Some(target);
        }
        return;
    };
    cursor.grabbed = None;
    if source == target {
        return;
    }
    match (grid.animal_at(source), grid.animal_at(target)) {
        (Some(a), Some(b)) if a == b => {
            merge_writer.send(MergeRequestEvent { source, target });
        }
        (Some(_), Some(_)) => {
            swap_writer.send(SwapRequestEvent { source, target });
        }
        (Some(_), None) => {
            move_writer.send(MoveRequestEvent { source, target });
        }
        (None, _) => {}
    }
}

pub fn command_keys(
    keys: Res<ButtonInput<KeyCode>>,
    cursor: Res<BoardCursor>,
    mut buy_writer: EventWriter<BuyAnimalEvent>,
    mut shuffle_writer: EventWriter<ShuffleRequestEvent>,
    mut purchase_writer: EventWriter<PurchaseCellEvent>,
    mut coop_writer: EventWriter<SendToCoopEvent>,
    mut buy_upgrade_writer: EventWriter<BuyUpgradeEvent>,
    mut toggle_writer: EventWriter<ToggleUpgradeEvent>,
) {
    if keys.just_pressed(KeyCode::KeyB) {
        buy_writer.send(BuyAnimalEvent {
            animal_id: "chick".into(),
        });
    }
    if keys.just_pressed(KeyCode::KeyD) {
        buy_writer.send(BuyAnimalEvent {
            animal_id: "duckling".into(),
        });
    }
    if keys.just_pressed(KeyCode::KeyS) {
        shuffle_writer.send(ShuffleRequestEvent);
    }
    if keys.just_pressed(KeyCode::KeyP) {
        purchase_writer.send(PurchaseCellEvent {
            coord: cursor.coord,
        });
    }
    if keys.just_pressed(KeyCode::KeyC) {
        coop_writer.send(SendToCoopEvent {
            coord: cursor.coord,
        });
    }
    if keys.just_pressed(KeyCode::KeyQ) {
        buy_upgrade_writer.send(BuyUpgradeEvent {
            upgrade: UpgradeKind::Automation,
        });
    }
    if keys.just_pressed(KeyCode::KeyW) {
        buy_upgrade_writer.send(BuyUpgradeEvent {
            upgrade: UpgradeKind::Shuffle,
        });
    }
    if keys.just_pressed(KeyCode::KeyA) {
        toggle_writer.send(ToggleUpgradeEvent {
            upgrade: UpgradeKind::Automation,
        });
    }
    if keys.just_pressed(KeyCode::KeyE) {
        toggle_writer.send(ToggleUpgradeEvent {
            upgrade: UpgradeKind::Shuffle,
        });
    }
}

/// Debug key: advance the campaign level, capped at the max.
pub fn debug_advance_campaign(
    keys: Res<ButtonInput<KeyCode>>,
    mut campaign: ResMut<CampaignLevel>,
    mut toast_writer: EventWriter<ToastEvent>,
) {
    if !keys.just_pressed(KeyCode::KeyL) {
        return;
    }
    if campaign.level >= MAX_CAMPAIGN_LEVEL {
        return;
    }
    campaign.level += 1;
    info!("[Input] Campaign level advanced to {}.", campaign.level);
    toast_writer.send(ToastEvent {
        message: format!("Campaign level {} unlocked!", campaign.level),
        duration_secs: 3.0,
    });
}

pub fn pause_toggle(
    keys: Res<ButtonInput<KeyCode>>,
    state: Res<State<GameState>>,
    mut next_state: ResMut<NextState<GameState>>,
) {
    if !keys.just_pressed(KeyCode::Escape) {
        return;
    }
    match state.get() {
        GameState::Playing => next_state.set(GameState::Paused),
        GameState::Paused => next_state.set(GameState::Playing),
        GameState::Loading => {}
    }
}
