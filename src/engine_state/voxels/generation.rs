//! # World Generation Module
//!
//! Populates a [`BlockStore`] with a bounded, square patch of terrain in a
//! single pass.
//!
//! ## Pipeline
//!
//! 1. A height function picks the ground level of every column. The default
//!    `waves` shape overlaps two sine/cosine swells, the `perlin` shape samples
//!    2D Perlin noise. Both flatten the desert corner (`x > 20 && y > 20`) to a
//!    fixed low elevation.
//! 2. The biome classifier picks the material of every cell of the column from
//!    its height and position: bedrock floor, shallow water, desert sand,
//!    snow caps, an ore band deep under the surface, stone cliffs and grass.
//! 3. A decoration pass grows trees on low grassland and cacti in the desert.
//!
//! Terrain shape is fully deterministic. Decorations draw from the injected
//! random generator, so two worlds only match when that generator is seeded
//! identically.

use cgmath::Point3;
use noise::{NoiseFn, Perlin};
use web_time::Instant;

use crate::config::{TerrainShape, WorldConfig};

use super::{block::block_type::BlockType, block_store::BlockStore};

/// Ground level of every desert column.
pub const DESERT_HEIGHT: i32 = 2;
/// Cells strictly above this height are snow outside the desert.
const SNOW_LINE: i32 = 12;
/// Cells strictly above this height (and above the ore band) are stone.
const CLIFF_LINE: i32 = 9;
/// Water fills cells strictly below this height that lie above the ground.
const WATER_LINE: i32 = 4;
/// Depth under the surface where the ore band begins.
const ORE_DEPTH: i32 = 3;
/// Iron only appears strictly below this height.
const IRON_CEILING: i32 = 8;

/// Chance per eligible column of growing a tree.
const TREE_CHANCE: f64 = 0.02;
/// Chance per desert column of growing a cactus.
const CACTUS_CHANCE: f64 = 0.01;
/// Number of wood blocks in a trunk.
const TRUNK_HEIGHT: i32 = 3;
/// Number of cactus blocks in a cactus.
const CACTUS_HEIGHT: i32 = 2;

/// Scaling factor applied to world coordinates when sampling Perlin noise.
const PERLIN_SCALE_FACTOR: f64 = 0.04;

/// Whether a column lies in the flat desert corner of the world.
pub fn is_desert(x: i32, y: i32) -> bool {
    x > 20 && y > 20
}

/// Ground level of the `waves` terrain shape.
///
/// Two sine/cosine products at different spatial frequencies are summed,
/// scaled and floored, so neighbouring columns differ by at most a few blocks.
/// The result is never below 1.
pub fn wave_height(x: i32, y: i32) -> i32 {
    if is_desert(x, y) {
        return DESERT_HEIGHT;
    }

    let (x, y) = (x as f64, y as f64);
    let n1 = (x / 10.0).sin() * (y / 10.0).cos();
    let n2 = (x / 20.0 + 100.0).sin() * (y / 20.0 + 100.0).cos();
    let height = ((n1 + n2) * 4.0).floor() as i32 + 3;

    (height + 6).max(1)
}

/// Picks the material of the cell at `(x, y, z)` in a column whose ground
/// level is `ground`.
///
/// The rules are checked in order, the first match wins:
///
/// | Condition                           | Material                         |
/// |-------------------------------------|----------------------------------|
/// | `z == 0`                            | `BEDROCK`                        |
/// | `z < 4` and `z > ground`            | `WATER`                          |
/// | desert column                       | `SAND`                           |
/// | `z > 12`                            | `SNOW`                           |
/// | `z <= ground - 3`                   | `COAL_ORE`, `IRON_ORE` or `STONE`|
/// | `z > 9`                             | `STONE`                          |
/// | otherwise                           | `GRASS`                          |
///
/// Ores are picked from `sin(x * y * z)`: above 0.95 gives coal, below -0.96
/// gives iron when `z < 8`.
pub fn biome(x: i32, y: i32, z: i32, ground: i32) -> BlockType {
    if z == 0 {
        return BlockType::BEDROCK;
    }
    if z < WATER_LINE && z > ground {
        return BlockType::WATER;
    }
    if is_desert(x, y) {
        return BlockType::SAND;
    }
    if z > SNOW_LINE {
        return BlockType::SNOW;
    }

    if z <= ground - ORE_DEPTH {
        let ore_noise = (x as f64 * y as f64 * z as f64).sin();
        if ore_noise > 0.95 {
            return BlockType::COAL_ORE;
        }
        if ore_noise < -0.96 && z < IRON_CEILING {
            return BlockType::IRON_ORE;
        }
        return BlockType::STONE;
    }

    if z > CLIFF_LINE {
        return BlockType::STONE;
    }
    BlockType::GRASS
}

/// Height map sampler for one configured terrain shape.
pub struct TerrainGenerator {
    shape: TerrainShape,
    perlin: Option<Perlin>,
}

impl TerrainGenerator {
    /// Creates a sampler for the given shape.
    pub fn new(shape: TerrainShape) -> Self {
        let perlin = match shape {
            TerrainShape::Waves => None,
            TerrainShape::Perlin { seed } => Some(Perlin::new(seed)),
        };
        Self { shape, perlin }
    }

    /// The shape this sampler was built for.
    pub fn shape(&self) -> TerrainShape {
        self.shape
    }

    /// Ground level of the column at `(x, y)`. Never below 1.
    pub fn height(&self, x: i32, y: i32) -> i32 {
        match &self.perlin {
            None => wave_height(x, y),
            Some(perlin) => {
                if is_desert(x, y) {
                    return DESERT_HEIGHT;
                }
                let sample = perlin.get([
                    x as f64 * PERLIN_SCALE_FACTOR,
                    y as f64 * PERLIN_SCALE_FACTOR,
                ]);
                ((sample * 8.0).floor() as i32 + 9).max(1)
            }
        }
    }
}

/// Generates a complete world.
///
/// Every column with `x, y` in `[-G, G]` (where `G` is
/// [`WorldConfig::generation_half_width`]) receives a bedrock floor at `z = 0`
/// and cells `1..=height` from [`biome`], then may be decorated.
///
/// # Arguments
/// * `config` - World size and terrain shape
/// * `rng` - Source of randomness for tree and cactus placement
///
/// # Returns
/// The populated block store.
pub fn generate(config: &WorldConfig, rng: &mut fastrand::Rng) -> BlockStore {
    let started = Instant::now();
    let terrain = TerrainGenerator::new(config.terrain);
    let half_width = config.generation_half_width();

    let side = (2 * half_width + 1) as usize;
    let mut store = BlockStore::with_capacity(side * side * 10);

    let mut trees = 0usize;
    let mut cacti = 0usize;

    for x in -half_width..=half_width {
        for y in -half_width..=half_width {
            let height = terrain.height(x, y);

            store.set(x, y, 0, BlockType::BEDROCK);
            for z in 1..=height {
                store.set(x, y, z, biome(x, y, z, height));
            }

            if height > 4
                && height < 10
                && rng.f64() < TREE_CHANCE
                && x <= 20
                && biome(x, y, height, height) == BlockType::GRASS
            {
                grow_tree(&mut store, Point3::new(x, y, height));
                trees += 1;
            }

            if is_desert(x, y) && rng.f64() < CACTUS_CHANCE {
                grow_cactus(&mut store, Point3::new(x, y, height));
                cacti += 1;
            }
        }
    }

    log::info!(
        "Generated {} blocks ({} trees, {} cacti) in {:?}",
        store.len(),
        trees,
        cacti,
        started.elapsed()
    );

    store
}

/// Grows a tree on top of the surface block at `ground`.
///
/// The trunk fills the three cells above the ground. A ring of leaves
/// surrounds the top trunk cell and one more leaf caps it.
fn grow_tree(store: &mut BlockStore, ground: Point3<i32>) {
    for i in 1..=TRUNK_HEIGHT {
        store.set(ground.x, ground.y, ground.z + i, BlockType::WOOD);
    }

    let crown = ground.z + TRUNK_HEIGHT;
    for lx in -1..=1 {
        for ly in -1..=1 {
            if lx == 0 && ly == 0 {
                continue;
            }
            store.set(ground.x + lx, ground.y + ly, crown, BlockType::LEAVES);
        }
    }
    store.set(ground.x, ground.y, crown + 1, BlockType::LEAVES);
}

/// Grows a cactus on top of the surface block at `ground`.
fn grow_cactus(store: &mut BlockStore, ground: Point3<i32>) {
    for i in 1..=CACTUS_HEIGHT {
        store.set(ground.x, ground.y, ground.z + i, BlockType::CACTUS);
    }
}
