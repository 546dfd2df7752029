//! Mergeable-pair detection.
//!
//! The cache is rebuilt from scratch after every grid mutation rather than
//! patched incrementally — the board never exceeds a handful of cells, so a
//! full O(cells × 4) rescan is cheaper than getting invalidation wrong.

use std::collections::HashSet;

use crate::shared::*;

/// Axis neighbors in fixed scan order: right, down, left, up. The order is
/// load-bearing for pair-discovery order, which tests assert.
pub fn neighbors(coord: Coord) -> [Option<Coord>; 4] {
    [
        Some(Coord::new(coord.row, coord.col.wrapping_add(1))),
        Some(Coord::new(coord.row.wrapping_add(1), coord.col)),
        coord.col.checked_sub(1).map(|c| Coord::new(coord.row, c)),
        coord.row.checked_sub(1).map(|r| Coord::new(r, coord.col)),
    ]
}

impl GridState {
    /// Rebuild `mergeable_pairs`: every unordered pair of axis-adjacent
    /// purchased cells holding the same non-terminal type, each recorded
    /// exactly once, discovered in spot-list order.
    pub fn recompute_pairs(&mut self, registry: &AnimalRegistry, spots: &SpotRegistry) {
        let mut pairs: Vec<(Coord, Coord)> = Vec::new();
        let mut seen: HashSet<(Coord, Coord)> = HashSet::new();

        for spot in &spots.spots {
            let coord = spot.coord;
            if !self.is_purchased(coord) {
                continue;
            }
            let Some(id) = self.animal_at(coord) else {
                continue;
            };
            if registry.merge_target(id).is_none() {
                continue;
            }
            for neighbor in neighbors(coord).into_iter().flatten() {
                if !self.is_purchased(neighbor) {
                    continue;
                }
                if self.animal_at(neighbor) != Some(id) {
                    continue;
                }
                let key = if coord < neighbor {
                    (coord, neighbor)
                } else {
                    (neighbor, coord)
                };
                if seen.insert(key) {
                    pairs.push((coord, neighbor));
                }
            }
        }

        self.mergeable_pairs = pairs;
    }
}

#[cfg(test)]
mod tests {
    use super::super::engine::tests::{fresh_grid, test_registry, test_spots};
    use super::*;

    fn normalized(pairs: &[(Coord, Coord)]) -> Vec<(Coord, Coord)> {
        let mut out: Vec<(Coord, Coord)> = pairs
            .iter()
            .map(|&(a, b)| if a < b { (a, b) } else { (b, a) })
            .collect();
        out.sort();
        out
    }

    #[test]
    fn test_pairs_exact_and_duplicate_free() {
        let registry = test_registry();
        let spots = test_spots();
        let mut grid = fresh_grid(&spots);
        // Row 0 purchased: critter critter critter  → pairs (0,0)-(0,1), (0,1)-(0,2)
        grid.cells.insert(Coord::new(0, 0), "critter".into());
        grid.cells.insert(Coord::new(0, 1), "critter".into());
        grid.cells.insert(Coord::new(0, 2), "critter".into());

        grid.recompute_pairs(&registry, &spots);

        let got = normalized(&grid.mergeable_pairs);
        assert_eq!(
            got,
            vec![
                (Coord::new(0, 0), Coord::new(0, 1)),
                (Coord::new(0, 1), Coord::new(0, 2)),
            ]
        );
        // No duplicates even though both endpoints discover each other.
        assert_eq!(grid.mergeable_pairs.len(), 2);
    }

    #[test]
    fn test_pairs_ignore_terminal_and_unpurchased() {
        let registry = test_registry();
        let spots = test_spots();
        let mut grid = fresh_grid(&spots);
        // Terminal animals never pair.
        grid.cells.insert(Coord::new(0, 0), "beast".into());
        grid.cells.insert(Coord::new(0, 1), "beast".into());
        // Same type adjacent, but (1, 2) is not purchased.
        grid.cells.insert(Coord::new(0, 2), "critter".into());
        grid.cells.insert(Coord::new(1, 2), "critter".into());

        grid.recompute_pairs(&registry, &spots);
        assert!(grid.mergeable_pairs.is_empty());
    }

    #[test]
    fn test_pairs_vertical_adjacency() {
        let registry = test_registry();
        let spots = test_spots();
        let mut grid = fresh_grid(&spots);
        grid.purchased.insert(Coord::new(1, 0));
        grid.cells.insert(Coord::new(0, 0), "critter".into());
        grid.cells.insert(Coord::new(1, 0), "critter".into());

        grid.recompute_pairs(&registry, &spots);
        assert_eq!(
            normalized(&grid.mergeable_pairs),
            vec![(Coord::new(0, 0), Coord::new(1, 0))]
        );
    }

    #[test]
    fn test_recompute_is_idempotent() {
        let registry = test_registry();
        let spots = test_spots();
        let mut grid = fresh_grid(&spots);
        grid.cells.insert(Coord::new(0, 0), "critter".into());
        grid.cells.insert(Coord::new(0, 1), "critter".into());

        grid.recompute_pairs(&registry, &spots);
        let first = grid.mergeable_pairs.clone();
        grid.recompute_pairs(&registry, &spots);
        assert_eq!(grid.mergeable_pairs, first);
    }

    #[test]
    fn test_stale_pair_gone_after_merge_and_recompute() {
        let registry = test_registry();
        let spots = test_spots();
        let campaign = CampaignLevel::default();
        let mut grid = fresh_grid(&spots);
        let a = Coord::new(0, 0);
        let b = Coord::new(0, 1);
        grid.cells.insert(a, "critter".into());
        grid.cells.insert(b, "critter".into());
        grid.recompute_pairs(&registry, &spots);
        assert_eq!(grid.mergeable_pairs.len(), 1);

        grid.apply_merge(a, b, &registry, &campaign);
        grid.recompute_pairs(&registry, &spots);
        assert!(grid.animal_at(a).is_none());
        assert!(grid.mergeable_pairs.is_empty());
    }
}
