//! Economy domain — coin ledger application, upgrade purchases, sale stats.
//!
//! All cross-domain communication goes through `crate::shared::*` events and
//! resources. No other domain module is imported here.

use bevy::prelude::*;

use crate::shared::*;

pub mod coins;
pub mod stats;
pub mod upgrades;

use coins::apply_coin_changes;
pub use coins::{format_coins, EconomyStats};
pub use stats::SaleStats;
use stats::track_sales;
use upgrades::{handle_buy_upgrade, handle_toggle_upgrade};

pub struct EconomyPlugin;

impl Plugin for EconomyPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<EconomyStats>()
            .init_resource::<SaleStats>();

        app.add_systems(
            Update,
            (
                handle_buy_upgrade,
                handle_toggle_upgrade,
                // Coin change events can arrive from any domain; apply last
                // in this set so same-frame purchases are reflected.
                apply_coin_changes,
                track_sales,
            )
                .chain()
                .run_if(in_state(GameState::Playing)),
        );

        info!("[Economy] EconomyPlugin registered.");
    }
}
