use bevy::prelude::*;

use crate::economy::format_coins;
use crate::shared::*;

// ═══════════════════════════════════════════════════════════════════════
// MARKER COMPONENTS
// ═══════════════════════════════════════════════════════════════════════

#[derive(Component)]
pub struct HudRoot;

#[derive(Component)]
pub struct HudCoinText;

#[derive(Component)]
pub struct HudCounterText;

#[derive(Component)]
pub struct HudAutomationText;

#[derive(Component)]
pub struct HudCoopText;

// ═══════════════════════════════════════════════════════════════════════
// SPAWN HUD
// ═══════════════════════════════════════════════════════════════════════

pub fn spawn_hud(mut commands: Commands) {
    commands
        .spawn((
            HudRoot,
            Node {
                width: Val::Percent(100.0),
                height: Val::Percent(100.0),
                flex_direction: FlexDirection::Column,
                justify_content: JustifyContent::SpaceBetween,
                ..default()
            },
            PickingBehavior::IGNORE,
        ))
        .with_children(|parent| {
            // ─── TOP BAR ───
            parent
                .spawn((
                    Node {
                        width: Val::Percent(100.0),
                        height: Val::Px(40.0),
                        flex_direction: FlexDirection::Row,
                        justify_content: JustifyContent::SpaceBetween,
                        align_items: AlignItems::Center,
                        padding: UiRect::axes(Val::Px(12.0), Val::Px(4.0)),
                        ..default()
                    },
                    BackgroundColor(Color::srgba(0.0, 0.0, 0.0, 0.6)),
                    PickingBehavior::IGNORE,
                ))
                .with_children(|top_bar| {
                    top_bar.spawn((
                        HudCoinText,
                        Text::new("25c"),
                        TextFont {
                            font_size: 18.0,
                            ..default()
                        },
                        TextColor(Color::srgb(1.0, 0.85, 0.3)),
                        PickingBehavior::IGNORE,
                    ));
                    top_bar.spawn((
                        HudCounterText,
                        Text::new("Merges: 0  Processed: 0"),
                        TextFont {
                            font_size: 16.0,
                            ..default()
                        },
                        TextColor(Color::WHITE),
                        PickingBehavior::IGNORE,
                    ));
                    top_bar.spawn((
                        HudAutomationText,
                        Text::new("Auto-merge: not installed"),
                        TextFont {
                            font_size: 16.0,
                            ..default()
                        },
                        TextColor(Color::srgb(0.6, 0.8, 1.0)),
                        PickingBehavior::IGNORE,
                    ));
                });

            // ─── BOTTOM BAR: coop status + key hints ───
            parent
                .spawn((
                    Node {
                        width: Val::Percent(100.0),
                        flex_direction: FlexDirection::Column,
                        align_items: AlignItems::Center,
                        padding: UiRect::axes(Val::Px(12.0), Val::Px(4.0)),
                        row_gap: Val::Px(2.0),
                        ..default()
                    },
                    BackgroundColor(Color::srgba(0.0, 0.0, 0.0, 0.6)),
                    PickingBehavior::IGNORE,
                ))
                .with_children(|bottom| {
                    bottom.spawn((
                        HudCoopText,
                        Text::new("Coops: empty"),
                        TextFont {
                            font_size: 14.0,
                            ..default()
                        },
                        TextColor(Color::WHITE),
                        PickingBehavior::IGNORE,
                    ));
                    bottom.spawn((
                        Text::new(
                            "[B/D] buy  [Space] grab/apply  [C] coop  [P] unlock  [S] shuffle  \
                             [Q/W] buy upgrade  [A/E] toggle  [L] level  [Esc] pause",
                        ),
                        TextFont {
                            font_size: 12.0,
                            ..default()
                        },
                        TextColor(Color::srgba(0.8, 0.8, 0.8, 0.8)),
                        PickingBehavior::IGNORE,
                    ));
                });
        });
}

pub fn despawn_hud(mut commands: Commands, query: Query<Entity, With<HudRoot>>) {
    for entity in &query {
        commands.entity(entity).despawn_recursive();
    }
}

// ═══════════════════════════════════════════════════════════════════════
// UPDATE SYSTEMS
// ═══════════════════════════════════════════════════════════════════════

pub fn update_coin_display(
    ledger: Res<Ledger>,
    mut query: Query<&mut Text, With<HudCoinText>>,
) {
    if !ledger.is_changed() {
        return;
    }
    for mut text in &mut query {
        **text = format_coins(ledger.coins);
    }
}

pub fn update_counter_display(
    ledger: Res<Ledger>,
    mut query: Query<&mut Text, With<HudCounterText>>,
) {
    if !ledger.is_changed() {
        return;
    }
    for mut text in &mut query {
        **text = format!(
            "Merges: {}  Processed: {}",
            ledger.total_merges, ledger.total_processed
        );
    }
}

pub fn update_automation_display(
    automation: Res<AutomationState>,
    mut query: Query<&mut Text, With<HudAutomationText>>,
) {
    for mut text in &mut query {
        **text = if !automation.owned {
            "Auto-merge: not installed".to_string()
        } else if !automation.enabled {
            "Auto-merge: off".to_string()
        } else {
            format!(
                "Auto-merge L{}: next in {:.0}s",
                automation.level,
                automation.countdown_secs.max(0.0)
            )
        };
    }
}

pub fn update_coop_display(
    coops: Res<CoopStates>,
    mut query: Query<&mut Text, With<HudCoopText>>,
) {
    if !coops.is_changed() {
        return;
    }
    for mut text in &mut query {
        let mut parts: Vec<String> = coops
            .coops
            .iter()
            .filter(|(_, coop)| !coop.queue.is_empty())
            .map(|(id, coop)| format!("{} {}/{}", id, coop.queue.len(), coop.capacity))
            .collect();
        parts.sort();
        **text = if parts.is_empty() {
            "Coops: empty".to_string()
        } else {
            format!("Coops: {}", parts.join("  "))
        };
    }
}
