mod shared;
mod grid;
mod automation;
mod coop;
mod economy;
mod ui;
mod save;
mod data;

use bevy::prelude::*;
use bevy::window::{PresentMode, WindowResolution};

use shared::*;

fn main() {
    App::new()
        .add_plugins(
            DefaultPlugins
                .set(WindowPlugin {
                    primary_window: Some(Window {
                        title: "Featherfield".into(),
                        resolution: WindowResolution::new(SCREEN_WIDTH, SCREEN_HEIGHT),
                        present_mode: PresentMode::AutoVsync,
                        resizable: true,
                        ..default()
                    }),
                    ..default()
                })
                .set(ImagePlugin::default_nearest()),
        )
        // Game state
        .init_state::<GameState>()
        // Shared resources
        .init_resource::<AnimalRegistry>()
        .init_resource::<SpotRegistry>()
        .init_resource::<GridState>()
        .init_resource::<Ledger>()
        .init_resource::<AutomationState>()
        .init_resource::<ShuffleState>()
        .init_resource::<CoopStates>()
        .init_resource::<CampaignLevel>()
        // Events
        .add_event::<CoinChangeEvent>()
        .add_event::<PlaceAnimalEvent>()
        .add_event::<BuyAnimalEvent>()
        .add_event::<MergeRequestEvent>()
        .add_event::<SwapRequestEvent>()
        .add_event::<MoveRequestEvent>()
        .add_event::<ShuffleRequestEvent>()
        .add_event::<PurchaseCellEvent>()
        .add_event::<SendToCoopEvent>()
        .add_event::<BuyUpgradeEvent>()
        .add_event::<ToggleUpgradeEvent>()
        .add_event::<AnimalMergedEvent>()
        .add_event::<AnimalCreatedEvent>()
        .add_event::<AnimalSoldEvent>()
        .add_event::<ToastEvent>()
        .add_event::<PlaySfxEvent>()
        // Domain plugins
        .add_plugins(grid::GridPlugin)
        .add_plugins(automation::AutomationPlugin)
        .add_plugins(coop::CoopPlugin)
        .add_plugins(economy::EconomyPlugin)
        .add_plugins(ui::UiPlugin)
        .add_plugins(save::SavePlugin)
        // Data loading
        .add_plugins(data::DataPlugin)
        // Camera
        .add_systems(Startup, setup_camera)
        .run();
}

fn setup_camera(mut commands: Commands) {
    commands.spawn(Camera2d);
}
