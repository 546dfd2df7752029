//! Grid primitives — place, merge, swap, move, unlock.
//!
//! Every operation is a pure validation followed by an unconditional
//! mutation: it either fully applies or is rejected before touching the
//! grid. All mutating methods except `apply_merge` recompute the
//! mergeable-pairs cache themselves; `apply_merge` leaves that to the
//! caller so the automation pass can recompute once after a whole batch
//! (see `automation::run_merge_pass`).

use crate::shared::*;

impl GridState {
    /// First purchased empty spot in row-major spot-list order.
    pub fn first_free_spot(&self, spots: &SpotRegistry) -> Option<Coord> {
        spots
            .spots
            .iter()
            .map(|s| s.coord)
            .find(|&c| self.is_empty_purchased(c))
    }

    /// Place an animal on the given spot, or the first free one when no
    /// target is supplied. Returns false (mutating nothing) when the type
    /// is locked or no usable spot exists.
    pub fn place(
        &mut self,
        animal_id: &str,
        target: Option<Coord>,
        registry: &AnimalRegistry,
        campaign: &CampaignLevel,
        spots: &SpotRegistry,
    ) -> bool {
        if !animal_unlocked(registry, campaign, animal_id) {
            return false;
        }
        let coord = match target {
            Some(c) if self.is_empty_purchased(c) => c,
            Some(_) => return false,
            None => match self.first_free_spot(spots) {
                Some(c) => c,
                None => return false,
            },
        };
        self.cells.insert(coord, animal_id.to_string());
        self.recompute_pairs(registry, spots);
        true
    }

    pub fn can_merge(
        &self,
        source: Coord,
        target: Coord,
        registry: &AnimalRegistry,
        campaign: &CampaignLevel,
    ) -> bool {
        if source == target || !self.is_purchased(target) {
            return false;
        }
        let (Some(src_id), Some(dst_id)) = (self.animal_at(source), self.animal_at(target))
        else {
            return false;
        };
        if src_id != dst_id {
            return false;
        }
        let Some(result_id) = registry.merge_target(src_id) else {
            return false;
        };
        animal_unlocked(registry, campaign, src_id)
            && animal_unlocked(registry, campaign, dst_id)
            && animal_unlocked(registry, campaign, result_id)
    }

    /// Clears the source and writes the merge result into the target.
    /// Requires `can_merge`; returns the result id. Does NOT recompute the
    /// pairs cache — the caller decides when (immediately for the manual
    /// path, once per pass for automation).
    pub fn apply_merge(
        &mut self,
        source: Coord,
        target: Coord,
        registry: &AnimalRegistry,
        campaign: &CampaignLevel,
    ) -> Option<AnimalId> {
        if !self.can_merge(source, target, registry, campaign) {
            return None;
        }
        let src_id = self.cells.remove(&source)?;
        let result = registry.merge_target(&src_id)?.clone();
        self.cells.insert(target, result.clone());
        Some(result)
    }

    pub fn can_swap(
        &self,
        source: Coord,
        target: Coord,
        registry: &AnimalRegistry,
        campaign: &CampaignLevel,
    ) -> bool {
        if !self.is_purchased(target) {
            return false;
        }
        let (Some(src_id), Some(dst_id)) = (self.animal_at(source), self.animal_at(target))
        else {
            return false;
        };
        src_id != dst_id
            && animal_unlocked(registry, campaign, src_id)
            && animal_unlocked(registry, campaign, dst_id)
    }

    /// Exchanges two occupied cells' contents. Requires `can_swap`.
    pub fn swap(
        &mut self,
        source: Coord,
        target: Coord,
        registry: &AnimalRegistry,
        campaign: &CampaignLevel,
        spots: &SpotRegistry,
    ) -> bool {
        if !self.can_swap(source, target, registry, campaign) {
            return false;
        }
        // Overwrite both cells from cloned ids; no removal step that could
        // ever leave a hole or a fabricated id behind.
        let (Some(src_id), Some(dst_id)) = (
            self.animal_at(source).cloned(),
            self.animal_at(target).cloned(),
        ) else {
            return false;
        };
        self.cells.insert(source, dst_id);
        self.cells.insert(target, src_id);
        self.recompute_pairs(registry, spots);
        true
    }

    pub fn can_move_to_empty(
        &self,
        source: Coord,
        target: Coord,
        registry: &AnimalRegistry,
        campaign: &CampaignLevel,
    ) -> bool {
        if !self.is_empty_purchased(target) {
            return false;
        }
        match self.animal_at(source) {
            Some(id) => animal_unlocked(registry, campaign, id),
            None => false,
        }
    }

    /// Moves an animal onto an empty purchased cell. Requires
    /// `can_move_to_empty`.
    pub fn move_to_empty(
        &mut self,
        source: Coord,
        target: Coord,
        registry: &AnimalRegistry,
        campaign: &CampaignLevel,
        spots: &SpotRegistry,
    ) -> bool {
        if !self.can_move_to_empty(source, target, registry, campaign) {
            return false;
        }
        if let Some(id) = self.cells.remove(&source) {
            self.cells.insert(target, id);
        }
        self.recompute_pairs(registry, spots);
        true
    }

    /// Adds a coord to the purchased set. Payment is validated by the
    /// purchase system before calling this.
    pub fn unlock_cell(
        &mut self,
        coord: Coord,
        registry: &AnimalRegistry,
        spots: &SpotRegistry,
    ) -> bool {
        if !spots.contains(coord) || self.is_purchased(coord) {
            return false;
        }
        self.purchased.insert(coord);
        self.recompute_pairs(registry, spots);
        true
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;

    /// Two-stage fixture chain: critter → beast (terminal), plus a locked
    /// chain only valid from campaign level 2.
    pub(crate) fn test_registry() -> AnimalRegistry {
        let mut registry = AnimalRegistry::default();
        for def in [
            AnimalDef {
                id: "critter".into(),
                name: "Critter".into(),
                tier: 1,
                outcome: MergeOutcome::Mergeable { into: "beast".into() },
                sell_price: 1,
                buy_price: Some(10),
                unlock_level: 1,
                color: (0.5, 0.5, 0.5),
            },
            AnimalDef {
                id: "beast".into(),
                name: "Beast".into(),
                tier: 2,
                outcome: MergeOutcome::Terminal,
                sell_price: 10,
                buy_price: None,
                unlock_level: 1,
                color: (0.4, 0.4, 0.4),
            },
            AnimalDef {
                id: "rare".into(),
                name: "Rare".into(),
                tier: 1,
                outcome: MergeOutcome::Mergeable { into: "rare2".into() },
                sell_price: 5,
                buy_price: None,
                unlock_level: 2,
                color: (0.3, 0.3, 0.3),
            },
            AnimalDef {
                id: "rare2".into(),
                name: "Rare II".into(),
                tier: 2,
                outcome: MergeOutcome::Terminal,
                sell_price: 50,
                buy_price: None,
                unlock_level: 2,
                color: (0.2, 0.2, 0.2),
            },
        ] {
            registry.animals.insert(def.id.clone(), def);
        }
        registry
    }

    /// Dense 3x3 spot list, top row free.
    pub(crate) fn test_spots() -> SpotRegistry {
        let mut registry = SpotRegistry {
            rows: 3,
            cols: 3,
            spots: Vec::new(),
        };
        for row in 0..3u8 {
            for col in 0..3u8 {
                registry.spots.push(SpotDef {
                    coord: Coord::new(row, col),
                    cost: if row == 0 { 0 } else { 100 },
                    free: row == 0,
                });
            }
        }
        registry
    }

    pub(crate) fn fresh_grid(spots: &SpotRegistry) -> GridState {
        let mut grid = GridState::default();
        grid.purchased.extend(spots.free_coords());
        grid
    }

    #[test]
    fn test_place_scans_row_major() {
        let registry = test_registry();
        let spots = test_spots();
        let campaign = CampaignLevel::default();
        let mut grid = fresh_grid(&spots);

        assert!(grid.place("critter", None, &registry, &campaign, &spots));
        assert_eq!(grid.animal_at(Coord::new(0, 0)), Some(&"critter".to_string()));
        assert!(grid.place("beast", None, &registry, &campaign, &spots));
        assert_eq!(grid.animal_at(Coord::new(0, 1)), Some(&"beast".to_string()));
    }

    #[test]
    fn test_place_full_grid_fails_without_mutation() {
        let registry = test_registry();
        let spots = test_spots();
        let campaign = CampaignLevel::default();
        let mut grid = fresh_grid(&spots);
        for _ in 0..3 {
            assert!(grid.place("critter", None, &registry, &campaign, &spots));
        }
        let before = grid.cells.clone();
        assert!(!grid.place("critter", None, &registry, &campaign, &spots));
        assert_eq!(grid.cells, before);
    }

    #[test]
    fn test_place_rejects_locked_type() {
        let registry = test_registry();
        let spots = test_spots();
        let campaign = CampaignLevel { level: 1 };
        let mut grid = fresh_grid(&spots);
        assert!(!grid.place("rare", None, &registry, &campaign, &spots));
        assert!(grid.cells.is_empty());
    }

    #[test]
    fn test_merge_clears_source_and_counts() {
        let registry = test_registry();
        let spots = test_spots();
        let campaign = CampaignLevel::default();
        let mut grid = fresh_grid(&spots);
        let a = Coord::new(0, 0);
        let b = Coord::new(0, 1);
        grid.cells.insert(a, "critter".into());
        grid.cells.insert(b, "critter".into());

        assert!(grid.can_merge(a, b, &registry, &campaign));
        let result = grid.apply_merge(a, b, &registry, &campaign);
        assert_eq!(result, Some("beast".to_string()));
        assert!(grid.animal_at(a).is_none(), "source must be cleared");
        assert_eq!(grid.animal_at(b), Some(&"beast".to_string()));
    }

    #[test]
    fn test_terminal_type_cannot_merge() {
        let registry = test_registry();
        let spots = test_spots();
        let campaign = CampaignLevel::default();
        let mut grid = fresh_grid(&spots);
        grid.cells.insert(Coord::new(0, 0), "beast".into());
        grid.cells.insert(Coord::new(0, 1), "beast".into());
        assert!(!grid.can_merge(Coord::new(0, 0), Coord::new(0, 1), &registry, &campaign));
    }

    #[test]
    fn test_merge_rejected_when_result_locked() {
        let registry = test_registry();
        let spots = test_spots();
        let mut grid = fresh_grid(&spots);
        grid.cells.insert(Coord::new(0, 0), "rare".into());
        grid.cells.insert(Coord::new(0, 1), "rare".into());

        let level1 = CampaignLevel { level: 1 };
        assert!(!grid.can_merge(Coord::new(0, 0), Coord::new(0, 1), &registry, &level1));

        let level2 = CampaignLevel { level: 2 };
        assert!(grid.can_merge(Coord::new(0, 0), Coord::new(0, 1), &registry, &level2));
    }

    #[test]
    fn test_swap_exchanges_contents() {
        let registry = test_registry();
        let spots = test_spots();
        let campaign = CampaignLevel::default();
        let mut grid = fresh_grid(&spots);
        let a = Coord::new(0, 0);
        let b = Coord::new(0, 2);
        grid.cells.insert(a, "critter".into());
        grid.cells.insert(b, "beast".into());

        assert!(grid.swap(a, b, &registry, &campaign, &spots));
        assert_eq!(grid.animal_at(a), Some(&"beast".to_string()));
        assert_eq!(grid.animal_at(b), Some(&"critter".to_string()));
    }

    #[test]
    fn test_swap_rejects_same_type() {
        let registry = test_registry();
        let spots = test_spots();
        let campaign = CampaignLevel::default();
        let mut grid = fresh_grid(&spots);
        grid.cells.insert(Coord::new(0, 0), "critter".into());
        grid.cells.insert(Coord::new(0, 1), "critter".into());
        assert!(!grid.can_swap(Coord::new(0, 0), Coord::new(0, 1), &registry, &campaign));
    }

    #[test]
    fn test_swap_refused_leaves_cells_intact() {
        let registry = test_registry();
        let spots = test_spots();
        let campaign = CampaignLevel::default();
        let mut grid = fresh_grid(&spots);
        let a = Coord::new(0, 0);
        let empty = Coord::new(0, 2);
        grid.cells.insert(a, "critter".into());

        // Swap toward an empty cell is refused, and never writes a
        // fabricated id into either cell.
        assert!(!grid.swap(a, empty, &registry, &campaign, &spots));
        assert_eq!(grid.animal_at(a), Some(&"critter".to_string()));
        assert!(grid.animal_at(empty).is_none());
        assert!(grid.cells.values().all(|id| !id.is_empty()));
    }

    #[test]
    fn test_move_to_empty() {
        let registry = test_registry();
        let spots = test_spots();
        let campaign = CampaignLevel::default();
        let mut grid = fresh_grid(&spots);
        let a = Coord::new(0, 0);
        let b = Coord::new(0, 2);
        grid.cells.insert(a, "critter".into());

        assert!(grid.move_to_empty(a, b, &registry, &campaign, &spots));
        assert!(grid.animal_at(a).is_none());
        assert_eq!(grid.animal_at(b), Some(&"critter".to_string()));

        // Unpurchased target refused.
        assert!(!grid.can_move_to_empty(b, Coord::new(2, 2), &registry, &campaign));
    }

    #[test]
    fn test_unlock_cell_rejects_unknown_and_repeat() {
        let registry = test_registry();
        let spots = test_spots();
        let mut grid = fresh_grid(&spots);
        let c = Coord::new(1, 1);
        assert!(grid.unlock_cell(c, &registry, &spots));
        assert!(!grid.unlock_cell(c, &registry, &spots), "already purchased");
        assert!(
            !grid.unlock_cell(Coord::new(7, 7), &registry, &spots),
            "coord outside the spot list"
        );
    }
}
