mod audio;
mod hud;
pub mod input;
mod render;
mod toast;

use bevy::prelude::*;

use crate::shared::*;
use input::BoardCursor;
use render::BoardEntities;

pub struct UiPlugin;

impl Plugin for UiPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<BoardEntities>()
            .init_resource::<BoardCursor>();

        // ─── TOASTS — container lives for the whole session ───
        app.add_systems(Startup, toast::spawn_toast_container);
        app.add_systems(
            Update,
            (
                toast::wire_coin_toasts,
                toast::handle_toast_events,
                toast::update_toasts,
            )
                .chain(),
        );

        // ─── BOARD RENDER + HUD — Playing state ───
        app.add_systems(
            OnEnter(GameState::Playing),
            (render::spawn_tiles, hud::spawn_hud),
        );
        app.add_systems(OnExit(GameState::Playing), hud::despawn_hud);
        app.add_systems(
            Update,
            (
                render::sync_tiles,
                render::sync_animal_sprites,
                render::sync_cursor,
                hud::update_coin_display,
                hud::update_counter_display,
                hud::update_automation_display,
                hud::update_coop_display,
            )
                .run_if(in_state(GameState::Playing)),
        );

        // ─── INPUT — Playing state, plus Escape everywhere ───
        app.add_systems(
            Update,
            (
                input::move_cursor,
                input::grab_and_apply,
                input::command_keys,
                input::debug_advance_campaign,
            )
                .run_if(in_state(GameState::Playing)),
        );
        app.add_systems(Update, input::pause_toggle);

        // ─── AUDIO ───
        app.add_systems(Update, audio::handle_play_sfx);

        info!("[Ui] UiPlugin registered.");
    }
}
