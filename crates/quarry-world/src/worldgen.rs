use fastnoise_lite::{FastNoiseLite, NoiseType};
use quarry_blocks::BlockId;
use serde::Deserialize;

use crate::CHUNK_HEIGHT;

/// Terrain parameters, read from the `[worldgen]` table.
#[derive(Clone, Debug, Deserialize, PartialEq)]
#[serde(default)]
pub struct WorldGenParams {
    pub seed: i32,
    pub base_height: f32,
    pub amplitude: f32,
    pub frequency: f32,
    pub octaves: u32,
    pub persistence: f32,
    pub lacunarity: f32,
    pub dirt_depth: i32,
    /// Probability that a grass column carries a log trunk.
    pub tree_chance: f32,
    pub trunk_height: i32,
    /// Per-channel colour variation applied to every block.
    pub color_jitter: u8,
}

impl Default for WorldGenParams {
    fn default() -> Self {
        Self {
            seed: 1337,
            base_height: 64.0,
            amplitude: 24.0,
            frequency: 0.01,
            octaves: 4,
            persistence: 0.5,
            lacunarity: 2.0,
            dirt_depth: 3,
            tree_chance: 0.01,
            trunk_height: 5,
            color_jitter: 12,
        }
    }
}

/// Deterministic 2D noise in `[-1, 1]`.
pub trait Noise2d {
    fn noise2d(&self, x: f32, z: f32) -> f32;
}

/// OpenSimplex2 noise at unit frequency; octave scaling is done by `TerrainGen`.
pub struct TerrainNoise {
    inner: FastNoiseLite,
}

impl TerrainNoise {
    pub fn new(seed: i32) -> Self {
        let mut inner = FastNoiseLite::with_seed(seed);
        inner.set_noise_type(Some(NoiseType::OpenSimplex2));
        inner.set_frequency(Some(1.0));
        Self { inner }
    }
}

impl Noise2d for TerrainNoise {
    #[inline]
    fn noise2d(&self, x: f32, z: f32) -> f32 {
        self.inner.get_noise_2d(x, z)
    }
}

/// Same value everywhere. Gives flat worlds for tests and benches.
#[derive(Clone, Copy, Debug, Default)]
pub struct ConstantNoise(pub f32);

impl Noise2d for ConstantNoise {
    #[inline]
    fn noise2d(&self, _x: f32, _z: f32) -> f32 {
        self.0
    }
}

#[inline]
fn uhash32(mut a: u32) -> u32 {
    a ^= a >> 16;
    a = a.wrapping_mul(0x7feb_352d);
    a ^= a >> 15;
    a = a.wrapping_mul(0x846c_a68b);
    a ^= a >> 16;
    a
}

#[inline]
pub fn hash3(x: i32, y: i32, z: i32, seed: u32) -> u32 {
    let mut h = seed ^ 0x9e37_79b9;
    h ^= uhash32((x as u32).wrapping_add(0x85eb_ca6b));
    h ^= uhash32((y as u32).wrapping_add(0xc2b2_ae35));
    h ^= uhash32((z as u32).wrapping_add(0x27d4_eb2f));
    uhash32(h)
}

#[inline]
fn rand01(h: u32) -> f32 {
    (h & 0x00FF_FFFF) as f32 / 16_777_216.0
}

pub const MIN_SURFACE: i32 = 1;
pub const MAX_SURFACE: i32 = CHUNK_HEIGHT as i32 - 2;

/// Column rules shared by every chunk. Pure function of world coordinates.
pub struct TerrainGen<N: Noise2d = TerrainNoise> {
    pub params: WorldGenParams,
    noise: N,
}

impl TerrainGen<TerrainNoise> {
    pub fn from_params(params: WorldGenParams) -> Self {
        let noise = TerrainNoise::new(params.seed);
        Self { params, noise }
    }
}

impl<N: Noise2d> TerrainGen<N> {
    pub fn with_noise(params: WorldGenParams, noise: N) -> Self {
        Self { params, noise }
    }

    /// Normalised fractal sum in `[-1, 1]`.
    pub fn fbm(&self, wx: f32, wz: f32) -> f32 {
        let p = &self.params;
        let mut amp = 1.0_f32;
        let mut freq = p.frequency;
        let mut sum = 0.0_f32;
        let mut max_amp = 0.0_f32;
        for _ in 0..p.octaves.max(1) {
            sum += self.noise.noise2d(wx * freq, wz * freq) * amp;
            max_amp += amp;
            amp *= p.persistence;
            freq *= p.lacunarity;
        }
        if max_amp > 0.0 { sum / max_amp } else { sum }
    }

    /// Surface height of the column, clamped so bedrock and one air cell fit.
    pub fn height_at(&self, wx: i32, wz: i32) -> i32 {
        let h = self.params.base_height + self.params.amplitude * self.fbm(wx as f32, wz as f32);
        (h.round() as i32).clamp(MIN_SURFACE, MAX_SURFACE)
    }

    /// Block type at height `y` in a column whose surface is `height`.
    pub fn block_at(&self, y: i32, height: i32) -> BlockId {
        if y == 0 {
            BlockId::Bedrock
        } else if y > height {
            BlockId::Air
        } else if y == height {
            BlockId::Grass
        } else if y >= height - self.params.dirt_depth {
            BlockId::Dirt
        } else {
            BlockId::Stone
        }
    }

    /// Base colour of `id` with a deterministic per-cell variation.
    pub fn color_at(&self, id: BlockId, wx: i32, y: i32, wz: i32) -> [u8; 3] {
        let base = id.base_color();
        let j = self.params.color_jitter as i32;
        if j == 0 || id == BlockId::Air {
            return base;
        }
        let h = hash3(wx, y, wz, self.params.seed as u32);
        let d = (h % (2 * j as u32 + 1)) as i32 - j;
        base.map(|c| (c as i32 + d).clamp(0, 255) as u8)
    }

    /// Whether a trunk grows on this column.
    pub fn tree_at(&self, wx: i32, wz: i32) -> bool {
        let h = hash3(wx, 0x7eed, wz, self.params.seed as u32 ^ 0x5bd1_e995);
        rand01(h) < self.params.tree_chance
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn column_layers_follow_depth() {
        let g = TerrainGen::with_noise(WorldGenParams::default(), ConstantNoise(0.0));
        let h = g.height_at(5, 5);
        assert_eq!(h, 64);
        assert_eq!(g.block_at(0, h), BlockId::Bedrock);
        assert_eq!(g.block_at(h, h), BlockId::Grass);
        assert_eq!(g.block_at(h - 1, h), BlockId::Dirt);
        assert_eq!(g.block_at(h - 3, h), BlockId::Dirt);
        assert_eq!(g.block_at(h - 4, h), BlockId::Stone);
        assert_eq!(g.block_at(h + 1, h), BlockId::Air);
    }

    #[test]
    fn height_is_clamped() {
        let params = WorldGenParams {
            amplitude: 1000.0,
            ..WorldGenParams::default()
        };
        let hi = TerrainGen::with_noise(params.clone(), ConstantNoise(1.0));
        assert_eq!(hi.height_at(0, 0), MAX_SURFACE);
        let lo = TerrainGen::with_noise(params, ConstantNoise(-1.0));
        assert_eq!(lo.height_at(0, 0), MIN_SURFACE);
    }

    #[test]
    fn colors_are_deterministic() {
        let g = TerrainGen::from_params(WorldGenParams::default());
        let a = g.color_at(BlockId::Stone, 10, 20, -30);
        let b = g.color_at(BlockId::Stone, 10, 20, -30);
        assert_eq!(a, b);
        let base = BlockId::Stone.base_color();
        for (c, b) in a.iter().zip(base) {
            assert!((*c as i32 - b as i32).abs() <= 12);
        }
    }

    #[test]
    fn simplex_heights_repeat_for_same_seed() {
        let a = TerrainGen::from_params(WorldGenParams::default());
        let b = TerrainGen::from_params(WorldGenParams::default());
        for (x, z) in [(0, 0), (-100, 37), (512, -9)] {
            assert_eq!(a.height_at(x, z), b.height_at(x, z));
        }
    }
}
