use crate::shared::*;

/// Populate the AnimalRegistry with both merge chains.
///
/// Chicken chain (campaign level 1):
///   chick → chicken → hen → prize_hen → rooster → golden_hen → phoenix
/// Duck chain (campaign level 2):
///   duckling → duck → drake → swan → royal_swan
///
/// Only base animals carry a buy price; everything else is merge-only.
/// `duckling` has sell price 0 — it cannot be processed until merged up.
pub fn populate_animals(registry: &mut AnimalRegistry) {
    let animals: Vec<AnimalDef> = vec![
        // ── Chicken chain ───────────────────────────────────────────────────
        AnimalDef {
            id: "chick".into(),
            name: "Chick".into(),
            tier: 1,
            outcome: MergeOutcome::Mergeable { into: "chicken".into() },
            sell_price: 1,
            buy_price: Some(10),
            unlock_level: 1,
            color: (0.98, 0.92, 0.36),
        },
        AnimalDef {
            id: "chicken".into(),
            name: "Chicken".into(),
            tier: 2,
            outcome: MergeOutcome::Mergeable { into: "hen".into() },
            sell_price: 5,
            buy_price: None,
            unlock_level: 1,
            color: (0.95, 0.95, 0.88),
        },
        AnimalDef {
            id: "hen".into(),
            name: "Hen".into(),
            tier: 3,
            outcome: MergeOutcome::Mergeable { into: "prize_hen".into() },
            sell_price: 12,
            buy_price: None,
            unlock_level: 1,
            color: (0.85, 0.62, 0.35),
        },
        AnimalDef {
            id: "prize_hen".into(),
            name: "Prize Hen".into(),
            tier: 4,
            outcome: MergeOutcome::Mergeable { into: "rooster".into() },
            sell_price: 30,
            buy_price: None,
            unlock_level: 1,
            color: (0.80, 0.42, 0.25),
        },
        AnimalDef {
            id: "rooster".into(),
            name: "Rooster".into(),
            tier: 5,
            outcome: MergeOutcome::Mergeable { into: "golden_hen".into() },
            sell_price: 75,
            buy_price: None,
            unlock_level: 1,
            color: (0.75, 0.20, 0.18),
        },
        AnimalDef {
            id: "golden_hen".into(),
            name: "Golden Hen".into(),
            tier: 6,
            outcome: MergeOutcome::Mergeable { into: "phoenix".into() },
            sell_price: 200,
            buy_price: None,
            unlock_level: 1,
            color: (0.95, 0.78, 0.12),
        },
        AnimalDef {
            id: "phoenix".into(),
            name: "Phoenix".into(),
            tier: 7,
            outcome: MergeOutcome::Terminal,
            sell_price: 2000,
            buy_price: None,
            unlock_level: 1,
            color: (1.00, 0.45, 0.05),
        },
        // ── Duck chain ──────────────────────────────────────────────────────
        AnimalDef {
            id: "duckling".into(),
            name: "Duckling".into(),
            tier: 1,
            outcome: MergeOutcome::Mergeable { into: "duck".into() },
            // Too small to sell — merge it first.
            sell_price: 0,
            buy_price: Some(40),
            unlock_level: 2,
            color: (0.96, 0.87, 0.55),
        },
        AnimalDef {
            id: "duck".into(),
            name: "Duck".into(),
            tier: 2,
            outcome: MergeOutcome::Mergeable { into: "drake".into() },
            sell_price: 15,
            buy_price: None,
            unlock_level: 2,
            color: (0.55, 0.68, 0.40),
        },
        AnimalDef {
            id: "drake".into(),
            name: "Drake".into(),
            tier: 3,
            outcome: MergeOutcome::Mergeable { into: "swan".into() },
            sell_price: 45,
            buy_price: None,
            unlock_level: 2,
            color: (0.25, 0.48, 0.30),
        },
        AnimalDef {
            id: "swan".into(),
            name: "Swan".into(),
            tier: 4,
            outcome: MergeOutcome::Mergeable { into: "royal_swan".into() },
            sell_price: 140,
            buy_price: None,
            unlock_level: 2,
            color: (0.92, 0.94, 0.98),
        },
        AnimalDef {
            id: "royal_swan".into(),
            name: "Royal Swan".into(),
            tier: 5,
            outcome: MergeOutcome::Terminal,
            sell_price: 1200,
            buy_price: None,
            unlock_level: 2,
            color: (0.75, 0.80, 0.95),
        },
    ];

    for animal in animals {
        registry.animals.insert(animal.id.clone(), animal);
    }
}
