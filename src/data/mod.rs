//! Data layer — populates the immutable registries at game startup.
//!
//! This plugin runs in OnEnter(GameState::Loading), fills the AnimalRegistry
//! and SpotRegistry from the hard-coded game-design data in submodules, then
//! transitions the game into GameState::Playing.
//!
//! No other domain needs to seed these resources. All domain plugins can
//! safely read them once GameState has advanced past Loading.

mod animals;
mod spots;

use bevy::prelude::*;

use crate::shared::*;

pub struct DataPlugin;

impl Plugin for DataPlugin {
    fn build(&self, app: &mut App) {
        app.add_systems(OnEnter(GameState::Loading), load_all_data);
    }
}

/// Single system that populates every registry and then transitions to Playing.
fn load_all_data(
    mut animal_registry: ResMut<AnimalRegistry>,
    mut spot_registry: ResMut<SpotRegistry>,
    mut next_state: ResMut<NextState<GameState>>,
) {
    info!("[Data] populating registries…");

    animals::populate_animals(&mut animal_registry);
    info!("  Animal types loaded: {}", animal_registry.animals.len());

    spots::populate_spots(&mut spot_registry);
    info!(
        "  Grid spots loaded: {} ({} free) on a {}x{} board",
        spot_registry.spots.len(),
        spot_registry.spots.iter().filter(|s| s.free).count(),
        spot_registry.rows,
        spot_registry.cols,
    );

    info!("[Data] all registries populated. Transitioning to Playing.");
    next_state.set(GameState::Playing);
}
