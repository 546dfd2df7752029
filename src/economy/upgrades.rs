//! Upgrade purchases and toggles — the automation scheduler and the
//! auto-shuffle. Each is bought once; after that only the enabled flag
//! changes, and it takes effect before the next tick because the
//! countdowns gate on it every frame.

use bevy::prelude::*;

use crate::shared::*;

fn upgrade_cost(upgrade: UpgradeKind) -> u32 {
    match upgrade {
        UpgradeKind::Automation => AUTOMATION_COST,
        UpgradeKind::Shuffle => SHUFFLE_COST,
    }
}

fn upgrade_name(upgrade: UpgradeKind) -> &'static str {
    match upgrade {
        UpgradeKind::Automation => "Auto-merge",
        UpgradeKind::Shuffle => "Auto-shuffle",
    }
}

pub fn handle_buy_upgrade(
    mut events: EventReader<BuyUpgradeEvent>,
    ledger: Res<Ledger>,
    mut automation: ResMut<AutomationState>,
    mut shuffle: ResMut<ShuffleState>,
    mut coin_writer: EventWriter<CoinChangeEvent>,
    mut toast_writer: EventWriter<ToastEvent>,
    mut sfx_writer: EventWriter<PlaySfxEvent>,
) {
    for ev in events.read() {
        let owned = match ev.upgrade {
            UpgradeKind::Automation => automation.owned,
            UpgradeKind::Shuffle => shuffle.owned,
        };
        if owned {
            toast_writer.send(ToastEvent {
                message: format!("{} is already installed.", upgrade_name(ev.upgrade)),
                duration_secs: 2.0,
            });
            continue;
        }
        let cost = upgrade_cost(ev.upgrade);
        if !ledger.can_afford(cost) {
            toast_writer.send(ToastEvent {
                message: format!("{} costs {} coins.", upgrade_name(ev.upgrade), cost),
                duration_secs: 2.0,
            });
            sfx_writer.send(PlaySfxEvent { sfx_id: "error".into() });
            continue;
        }
        match ev.upgrade {
            UpgradeKind::Automation => {
                automation.owned = true;
                automation.countdown_secs = automation.interval_secs;
            }
            UpgradeKind::Shuffle => shuffle.owned = true,
        }
        coin_writer.send(CoinChangeEvent {
            amount: -(cost as i64),
            reason: format!("bought {}", upgrade_name(ev.upgrade)),
        });
        sfx_writer.send(PlaySfxEvent { sfx_id: "purchase".into() });
        toast_writer.send(ToastEvent {
            message: format!("{} installed!", upgrade_name(ev.upgrade)),
            duration_secs: 2.5,
        });
        info!("[Economy] Upgrade bought: {:?}.", ev.upgrade);
    }
}

pub fn handle_toggle_upgrade(
    mut events: EventReader<ToggleUpgradeEvent>,
    mut automation: ResMut<AutomationState>,
    mut shuffle: ResMut<ShuffleState>,
    mut toast_writer: EventWriter<ToastEvent>,
) {
    for ev in events.read() {
        let (owned, enabled) = match ev.upgrade {
            UpgradeKind::Automation => {
                if automation.owned {
                    automation.enabled = !automation.enabled;
                }
                (automation.owned, automation.enabled)
            }
            UpgradeKind::Shuffle => {
                if shuffle.owned {
                    shuffle.enabled = !shuffle.enabled;
                    // Disabling cancels any queued shuffle.
                    if !shuffle.enabled {
                        shuffle.pending_secs = None;
                    }
                }
                (shuffle.owned, shuffle.enabled)
            }
        };
        if !owned {
            continue;
        }
        toast_writer.send(ToastEvent {
            message: format!(
                "{} {}.",
                upgrade_name(ev.upgrade),
                if enabled { "on" } else { "off" }
            ),
            duration_secs: 1.5,
        });
        info!(
            "[Economy] Upgrade {:?} toggled {}.",
            ev.upgrade,
            if enabled { "on" } else { "off" }
        );
    }
}
