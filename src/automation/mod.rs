//! Automation domain — the auto-merge scheduler and its level progression.
//!
//! While owned and enabled, a countdown runs on wall-clock time; when it
//! reaches zero the scheduler snapshots the mergeable-pairs cache, applies
//! every pair still valid at execution time, and only then recomputes the
//! cache. Chains therefore resolve one merge step per tick, never a full
//! cascade — that pacing is deliberate and pinned by tests.

use bevy::prelude::*;

use crate::shared::*;

pub mod progression;

pub use progression::*;

pub struct AutomationPlugin;

impl Plugin for AutomationPlugin {
    fn build(&self, app: &mut App) {
        app.add_systems(
            Update,
            (
                update_automation_level,
                tick_automation,
                tick_pending_shuffle,
            )
                .chain()
                .run_if(in_state(GameState::Playing)),
        );
    }
}

/// Outcome of one scheduler pass, for the summary notification.
#[derive(Debug, Default)]
pub struct MergePassReport {
    pub merges: usize,
    pub discovered: Vec<AnimalId>,
}

/// Applies every pair from the pre-pass snapshot that still validates,
/// then recomputes the cache exactly once. Shared by the scheduler system
/// and the headless tests.
pub fn run_merge_pass(
    grid: &mut GridState,
    ledger: &mut Ledger,
    registry: &AnimalRegistry,
    campaign: &CampaignLevel,
    spots: &SpotRegistry,
) -> MergePassReport {
    let mut report = MergePassReport::default();
    let snapshot = grid.mergeable_pairs.clone();

    for (source, target) in snapshot {
        // Defensive re-check: an earlier merge in this pass may have
        // consumed or changed either endpoint.
        let Some(result) = grid.apply_merge(source, target, registry, campaign) else {
            continue;
        };
        ledger.record_merge();
        report.merges += 1;
        if grid.note_created(&result) {
            report.discovered.push(result);
        }
    }

    // Single recompute after the whole pass — cascades wait for next tick.
    grid.recompute_pairs(registry, spots);
    report
}

/// Re-derives the automation level from the total-processed counter and
/// tightens the interval when the level rises. The countdown is clamped so
/// a shorter interval applies no later than the next tick.
pub fn update_automation_level(
    ledger: Res<Ledger>,
    mut automation: ResMut<AutomationState>,
    mut toast_writer: EventWriter<ToastEvent>,
) {
    let level = progression::automation_level(ledger.total_processed);
    if level <= automation.level {
        return;
    }
    automation.level = level;
    automation.interval_secs = progression::automation_interval(level);
    automation.countdown_secs = automation.countdown_secs.min(automation.interval_secs);
    info!(
        "[Automation] Level up: {} (interval {:.1}s).",
        level, automation.interval_secs
    );
    toast_writer.send(ToastEvent {
        message: format!(
            "Automation level {} — merges every {:.0}s.",
            level, automation.interval_secs
        ),
        duration_secs: 3.0,
    });
}

pub fn tick_automation(
    time: Res<Time>,
    mut automation: ResMut<AutomationState>,
    mut shuffle_state: ResMut<ShuffleState>,
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
    if !automation.owned || !automation.enabled {
        return;
    }
    automation.countdown_secs -= time.delta_secs();
    if automation.countdown_secs > 0.0 {
        return;
    }

    let report = run_merge_pass(&mut grid, &mut ledger, &registry, &campaign, &spots);
    automation.countdown_secs = automation.interval_secs;

    if report.merges > 0 {
        sfx_writer.send(PlaySfxEvent { sfx_id: "merge".into() });
        // One summary toast per pass, not one per merge.
        let mut message = format!("Auto-merge: {} merge(s).", report.merges);
        if !report.discovered.is_empty() {
            let names: Vec<String> = report
                .discovered
                .iter()
                .map(|id| {
                    registry
                        .get(id)
                        .map(|d| d.name.clone())
                        .unwrap_or_else(|| id.clone())
                })
                .collect();
            message.push_str(&format!(" Discovered: {}.", names.join(", ")));
        }
        toast_writer.send(ToastEvent {
            message,
            duration_secs: 2.5,
        });
        for id in &report.discovered {
            created_writer.send(AnimalCreatedEvent {
                animal_id: id.clone(),
            });
            // Result coords are not tracked per pair; announce type only.
            merged_writer.send(AnimalMergedEvent {
                result: id.clone(),
                at: Coord::new(0, 0),
            });
        }
        info!("[Automation] Pass applied {} merge(s).", report.merges);
    }

    if shuffle_state.owned && shuffle_state.enabled {
        shuffle_state.pending_secs = Some(SHUFFLE_DELAY_SECS);
    }
}

/// Runs the post-pass shuffle once its delay expires.
pub fn tick_pending_shuffle(
    time: Res<Time>,
    mut shuffle_state: ResMut<ShuffleState>,
    mut grid: ResMut<GridState>,
    registry: Res<AnimalRegistry>,
    spots: Res<SpotRegistry>,
    mut sfx_writer: EventWriter<PlaySfxEvent>,
) {
    let Some(remaining) = shuffle_state.pending_secs else {
        return;
    };
    let remaining = remaining - time.delta_secs();
    if remaining > 0.0 {
        shuffle_state.pending_secs = Some(remaining);
        return;
    }
    shuffle_state.pending_secs = None;
    if !shuffle_state.enabled {
        return;
    }
    let mut rng = rand::thread_rng();
    if grid.shuffle_animals(&registry, &spots, &mut rng) {
        info!("[Automation] Post-pass shuffle.");
        sfx_writer.send(PlaySfxEvent { sfx_id: "shuffle".into() });
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn chain_registry() -> AnimalRegistry {
        let mut registry = AnimalRegistry::default();
        for (id, tier, outcome) in [
            (
                "chick",
                1,
                MergeOutcome::Mergeable { into: "chicken".into() },
            ),
            (
                "chicken",
                2,
                MergeOutcome::Mergeable { into: "hen".into() },
            ),
            ("hen", 3, MergeOutcome::Terminal),
        ] {
            registry.animals.insert(
                id.to_string(),
                AnimalDef {
                    id: id.to_string(),
                    name: id.to_string(),
                    tier,
                    outcome,
                    sell_price: 1,
                    buy_price: None,
                    unlock_level: 1,
                    color: (1.0, 1.0, 1.0),
                },
            );
        }
        registry
    }

    fn row_spots(cols: u8) -> SpotRegistry {
        SpotRegistry {
            rows: 1,
            cols,
            spots: (0..cols)
                .map(|col| SpotDef {
                    coord: Coord::new(0, col),
                    cost: 0,
                    free: true,
                })
                .collect(),
        }
    }

    #[test]
    fn test_three_in_a_row_resolves_one_step_per_pass() {
        let registry = chain_registry();
        let spots = row_spots(3);
        let campaign = CampaignLevel::default();
        let mut ledger = Ledger::default();
        let mut grid = GridState::default();
        grid.purchased.extend(spots.free_coords());
        for col in 0..3 {
            grid.cells.insert(Coord::new(0, col), "chick".into());
        }
        grid.recompute_pairs(&registry, &spots);
        assert_eq!(grid.mergeable_pairs.len(), 2);

        // Pass 1: the (0,0)-(0,1) merge lands first; the second snapshot
        // pair re-checks false because (0,1) now holds a chicken.
        let report = run_merge_pass(&mut grid, &mut ledger, &registry, &campaign, &spots);
        assert_eq!(report.merges, 1, "one merge step per pass, no cascade");
        assert_eq!(ledger.total_merges, 1);
        assert_eq!(grid.occupied_count(), 2);

        // The surviving chick and the new chicken are not a pair.
        let report = run_merge_pass(&mut grid, &mut ledger, &registry, &campaign, &spots);
        assert_eq!(report.merges, 0);
    }

    #[test]
    fn test_pass_discovers_new_types_once() {
        let registry = chain_registry();
        let spots = row_spots(4);
        let campaign = CampaignLevel::default();
        let mut ledger = Ledger::default();
        let mut grid = GridState::default();
        grid.purchased.extend(spots.free_coords());
        grid.note_created("chick");
        // Two disjoint pairs merge in the same pass; "chicken" is
        // discovered exactly once.
        for col in 0..4 {
            grid.cells.insert(Coord::new(0, col), "chick".into());
        }
        grid.recompute_pairs(&registry, &spots);

        let report = run_merge_pass(&mut grid, &mut ledger, &registry, &campaign, &spots);
        assert_eq!(report.merges, 2);
        assert_eq!(report.discovered, vec!["chicken".to_string()]);
    }

    #[test]
    fn test_pass_with_empty_cache_is_noop() {
        let registry = chain_registry();
        let spots = row_spots(2);
        let campaign = CampaignLevel::default();
        let mut ledger = Ledger::default();
        let mut grid = GridState::default();
        grid.purchased.extend(spots.free_coords());
        grid.cells.insert(Coord::new(0, 0), "hen".into());
        grid.recompute_pairs(&registry, &spots);

        let report = run_merge_pass(&mut grid, &mut ledger, &registry, &campaign, &spots);
        assert_eq!(report.merges, 0);
        assert_eq!(ledger.total_merges, 0);
        assert_eq!(grid.occupied_count(), 1);
    }
}
