use crate::shared::*;

/// Populate the SpotRegistry with the board layout.
///
/// 4x4 board with the bottom-right corner left out (15 spots total): the
/// spot list need not be a dense rectangle, and the engine must not assume
/// one. The top row is free; everything else carries an individual cost
/// rising with distance from the start.
pub fn populate_spots(registry: &mut SpotRegistry) {
    registry.rows = 4;
    registry.cols = 4;

    let costed: [(u8, u8, u32); 15] = [
        (0, 0, 0),
        (0, 1, 0),
        (0, 2, 0),
        (0, 3, 0),
        (1, 0, 50),
        (1, 1, 75),
        (1, 2, 100),
        (1, 3, 150),
        (2, 0, 250),
        (2, 1, 350),
        (2, 2, 500),
        (2, 3, 750),
        (3, 0, 1000),
        (3, 1, 1500),
        (3, 2, 2500),
        // (3, 3) intentionally absent — reserved for the coop hut sprite.
    ];

    registry.spots = costed
        .iter()
        .map(|&(row, col, cost)| SpotDef {
            coord: Coord::new(row, col),
            cost,
            free: cost == 0,
        })
        .collect();
}
