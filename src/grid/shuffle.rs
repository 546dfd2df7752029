//! Board shuffle — an unbiased permutation of the animals currently on
//! the board, reassigned over the same occupied coordinates in spot order.

use rand::seq::SliceRandom;
use rand::Rng;

use crate::shared::*;

impl GridState {
    /// Fisher–Yates shuffle of the occupied cells' contents. The multiset
    /// of animal types and the occupied-cell count are invariant. No-op
    /// (returns false) when the board holds no animals.
    pub fn shuffle_animals(
        &mut self,
        registry: &AnimalRegistry,
        spots: &SpotRegistry,
        rng: &mut impl Rng,
    ) -> bool {
        // Occupied coords in spot-list order, for deterministic reassignment.
        let coords: Vec<Coord> = spots
            .spots
            .iter()
            .map(|s| s.coord)
            .filter(|&c| self.is_purchased(c) && self.cells.contains_key(&c))
            .collect();
        if coords.is_empty() {
            return false;
        }

        let mut animals: Vec<AnimalId> = coords
            .iter()
            .filter_map(|c| self.cells.remove(c))
            .collect();
        animals.shuffle(rng);

        for (coord, animal) in coords.iter().zip(animals) {
            self.cells.insert(*coord, animal);
        }
        self.recompute_pairs(registry, spots);
        true
    }
}

#[cfg(test)]
mod tests {
    use super::super::engine::tests::{fresh_grid, test_registry, test_spots};
    use crate::shared::*;

    #[test]
    fn test_shuffle_preserves_multiset_and_count() {
        let registry = test_registry();
        let spots = test_spots();
        let mut grid = fresh_grid(&spots);
        grid.cells.insert(Coord::new(0, 0), "critter".into());
        grid.cells.insert(Coord::new(0, 1), "beast".into());
        grid.cells.insert(Coord::new(0, 2), "critter".into());

        let mut before: Vec<AnimalId> = grid.cells.values().cloned().collect();
        before.sort();
        let occupied_before = grid.occupied_count();

        let mut rng = rand::thread_rng();
        assert!(grid.shuffle_animals(&registry, &spots, &mut rng));

        let mut after: Vec<AnimalId> = grid.cells.values().cloned().collect();
        after.sort();
        assert_eq!(before, after, "shuffle must be a permutation");
        assert_eq!(grid.occupied_count(), occupied_before);

        // Animals stay on the coords that were occupied.
        for coord in [Coord::new(0, 0), Coord::new(0, 1), Coord::new(0, 2)] {
            assert!(grid.cells.contains_key(&coord));
        }
    }

    #[test]
    fn test_shuffle_empty_board_is_noop() {
        let registry = test_registry();
        let spots = test_spots();
        let mut grid = fresh_grid(&spots);
        let mut rng = rand::thread_rng();
        assert!(!grid.shuffle_animals(&registry, &spots, &mut rng));
        assert!(grid.cells.is_empty());
    }
}
