//! Visual synchronisation systems — keep the board's sprites in sync with
//! `GridState`. Placeholder coloured quads with text labels until real
//! sprites land.

use bevy::prelude::*;
use std::collections::HashMap;

use super::input::BoardCursor;
use crate::shared::*;

// ─────────────────────────────────────────────────────────────────────────────
// Entity bookkeeping
// ─────────────────────────────────────────────────────────────────────────────

#[derive(Resource, Default)]
pub struct BoardEntities {
    pub tiles: HashMap<Coord, Entity>,
    pub animals: HashMap<Coord, Entity>,
    pub cursor: Option<Entity>,
}

#[derive(Component)]
pub struct TileEntity {
    pub coord: Coord,
    pub shown_purchased: bool,
}

#[derive(Component)]
pub struct AnimalSprite {
    pub coord: Coord,
    pub animal_id: AnimalId,
}

#[derive(Component)]
pub struct CursorSprite;

/// Board-centred world position for a grid coordinate. Row 0 is the top row.
pub fn grid_to_world(coord: Coord, spots: &SpotRegistry, z: f32) -> Vec3 {
    let pitch = CELL_SIZE + CELL_GAP;
    let x = (coord.col as f32 - (spots.cols.saturating_sub(1)) as f32 / 2.0) * pitch;
    let y = ((spots.rows.saturating_sub(1)) as f32 / 2.0 - coord.row as f32) * pitch;
    Vec3::new(x, y, z)
}

fn tile_color(purchased: bool) -> Color {
    if purchased {
        Color::srgb(0.35, 0.55, 0.30)
    } else {
        Color::srgb(0.22, 0.22, 0.25)
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Tile sync
// ─────────────────────────────────────────────────────────────────────────────

/// Spawns one quad per spot on entering Playing. Locked tiles carry their
/// unlock cost as a label; `sync_tiles` strips it after purchase.
pub fn spawn_tiles(
    mut commands: Commands,
    mut entities: ResMut<BoardEntities>,
    grid: Res<GridState>,
    spots: Res<SpotRegistry>,
) {
    for spot in &spots.spots {
        if entities.tiles.contains_key(&spot.coord) {
            continue;
        }
        let purchased = grid.is_purchased(spot.coord);
        let entity = commands
            .spawn((
                Sprite {
                    color: tile_color(purchased),
                    custom_size: Some(Vec2::splat(CELL_SIZE)),
                    ..default()
                },
                Transform::from_translation(grid_to_world(spot.coord, &spots, 1.0)),
                TileEntity {
                    coord: spot.coord,
                    shown_purchased: purchased,
                },
            ))
            .with_children(|parent| {
                if !purchased {
                    parent.spawn((
                        Text2d::new(format!("{}c", spot.cost)),
                        TextFont {
                            font_size: 14.0,
                            ..default()
                        },
                        TextColor(Color::srgba(0.8, 0.8, 0.6, 0.9)),
                        Transform::from_translation(Vec3::new(0.0, 0.0, 0.5)),
                    ));
                }
            })
            .id();
        entities.tiles.insert(spot.coord, entity);
    }
}

pub fn sync_tiles(
    mut commands: Commands,
    grid: Res<GridState>,
    mut tile_query: Query<(Entity, &mut TileEntity, &mut Sprite)>,
) {
    if !grid.is_changed() {
        return;
    }
    for (entity, mut tile, mut sprite) in &mut tile_query {
        let purchased = grid.is_purchased(tile.coord);
        if purchased == tile.shown_purchased {
            continue;
        }
        tile.shown_purchased = purchased;
        sprite.color = tile_color(purchased);
        if purchased {
            commands.entity(entity).despawn_descendants();
        }
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Animal sprite sync
// ─────────────────────────────────────────────────────────────────────────────

/// Spawns missing animal sprites, retargets moved ones, despawns stale ones.
pub fn sync_animal_sprites(
    mut commands: Commands,
    mut entities: ResMut<BoardEntities>,
    grid: Res<GridState>,
    registry: Res<AnimalRegistry>,
    spots: Res<SpotRegistry>,
    animal_query: Query<&AnimalSprite>,
) {
    if !grid.is_changed() {
        return;
    }

    // Despawn entities whose cell emptied.
    let stale: Vec<Coord> = entities
        .animals
        .keys()
        .filter(|coord| !grid.cells.contains_key(coord))
        .cloned()
        .collect();
    for coord in stale {
        if let Some(entity) = entities.animals.remove(&coord) {
            commands.entity(entity).despawn_recursive();
        }
    }

    // A changed occupant (merge result) is cheapest as a respawn: drop the
    // old entity here, the missing-sprite pass below recreates it.
    let changed: Vec<Coord> = animal_query
        .iter()
        .filter(|marker| {
            grid.animal_at(marker.coord)
                .map(|id| *id != marker.animal_id)
                .unwrap_or(false)
        })
        .map(|marker| marker.coord)
        .collect();
    for coord in changed {
        if let Some(entity) = entities.animals.remove(&coord) {
            commands.entity(entity).despawn_recursive();
        }
    }

    // Spawn sprites for occupied cells without one.
    let missing: Vec<(Coord, AnimalId)> = grid
        .cells
        .iter()
        .filter(|(coord, _)| !entities.animals.contains_key(coord))
        .map(|(&coord, id)| (coord, id.clone()))
        .collect();
    for (coord, id) in missing {
        let (color, label) = registry
            .get(&id)
            .map(|def| {
                (
                    Color::srgb(def.color.0, def.color.1, def.color.2),
                    def.name.clone(),
                )
            })
            .unwrap_or((Color::srgb(0.8, 0.2, 0.8), id.clone()));
        let entity = commands
            .spawn((
                Sprite {
                    color,
                    custom_size: Some(Vec2::splat(CELL_SIZE * 0.8)),
                    ..default()
                },
                Transform::from_translation(grid_to_world(coord, &spots, 2.0)),
                AnimalSprite {
                    coord,
                    animal_id: id,
                },
            ))
            .with_children(|parent| {
                parent.spawn((
                    Text2d::new(label),
                    TextFont {
                        font_size: 11.0,
                        ..default()
                    },
                    TextColor(Color::BLACK),
                    Transform::from_translation(Vec3::new(0.0, 0.0, 0.5)),
                ));
            })
            .id();
        entities.animals.insert(coord, entity);
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Cursor
// ─────────────────────────────────────────────────────────────────────────────

pub fn sync_cursor(
    mut commands: Commands,
    mut entities: ResMut<BoardEntities>,
    cursor: Res<BoardCursor>,
    spots: Res<SpotRegistry>,
    mut cursor_query: Query<(&mut Transform, &mut Sprite), With<CursorSprite>>,
) {
    let entity = match entities.cursor {
        Some(e) => e,
        None => {
            let e = commands
                .spawn((
                    Sprite {
                        color: Color::srgba(1.0, 1.0, 0.4, 0.35),
                        custom_size: Some(Vec2::splat(CELL_SIZE + 4.0)),
                        ..default()
                    },
                    Transform::from_translation(grid_to_world(cursor.coord, &spots, 3.0)),
                    CursorSprite,
                ))
                .id();
            entities.cursor = Some(e);
            return;
        }
    };
    if let Ok((mut transform, mut sprite)) = cursor_query.get_mut(entity) {
        transform.translation = grid_to_world(cursor.coord, &spots, 3.0);
        // Grabbed cells render the cursor warmer.
        sprite.color = if cursor.grabbed.is_some() {
            Color::srgba(1.0, 0.6, 0.2, 0.45)
        } else {
            Color::srgba(1.0, 1.0, 0.4, 0.35)
        };
    }
}
