//! Seeded tower placement on free tiles.

use rand::{seq::SliceRandom, SeedableRng};
use rand_chacha::ChaCha8Rng;
use waypoint_defence_core::TowerKind;
use waypoint_defence_world::GridMap;

use crate::args::TowerOrder;

/// Picks up to `count` distinct buildable tiles and a tower kind for each.
///
/// The same seed always yields the same orders for the same map.
pub(crate) fn plan(map: &GridMap, count: usize, seed: u64) -> Vec<TowerOrder> {
    let mut rng = ChaCha8Rng::seed_from_u64(seed);
    let mut tiles = map.buildable_tiles();
    tiles.shuffle(&mut rng);

    tiles
        .into_iter()
        .take(count)
        .filter_map(|tile| {
            let kind = *TowerKind::ALL.choose(&mut rng)?;
            Some(TowerOrder {
                kind,
                position: map.tile_centre(tile),
            })
        })
        .collect()
}
