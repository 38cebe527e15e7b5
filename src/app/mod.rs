//! Headless application context and the demos driven by the CLI.

mod blocks;
mod collide;
mod cast;

pub use blocks::{BlocksSummary, run_blocks};
pub use collide::{DemoBody, GjkSweep, run_gjk};
pub use cast::{RaycastSummary, run_raycast};

use quarry_geom::Vec3;
use quarry_mesh_cpu::{HeadlessMeshBuilder, MeshBuilder, MeshId, block_outline_vertices};
use quarry_runtime::{ChunkStore, DrawItem, RayHit, StreamReport};
use quarry_world::TerrainGen;

use crate::config::QuarryConfig;

const OUTLINE_COLOR: u32 = 0xff_00_00_00;

/// Everything a frame loop touches. Owned by `main`, never global.
pub struct App {
    pub config: QuarryConfig,
    pub store: ChunkStore<MeshId>,
    pub builder: HeadlessMeshBuilder,
    pub focal: Vec3,
    pub frame: u64,
    /// Highlight box drawn around the targeted block.
    pub outline: Option<MeshId>,
}

impl App {
    pub fn new(config: QuarryConfig, focal: Vec3) -> Self {
        let terrain = TerrainGen::from_params(config.worldgen.clone());
        let store = ChunkStore::new(config.stream.clone(), terrain);
        let mut builder = HeadlessMeshBuilder::new();
        let outline = Some(builder.build_color_mesh(&block_outline_vertices(0.002, OUTLINE_COLOR)));
        Self {
            config,
            store,
            builder,
            focal,
            frame: 0,
            outline,
        }
    }

    pub fn step(&mut self) -> StreamReport {
        self.frame += 1;
        let report = self.store.stream(self.focal, &mut self.builder);
        if !report.created.is_empty() {
            log::debug!(
                "frame {}: +{} chunks around {:?}, {} resident",
                self.frame,
                report.created.len(),
                report.center,
                self.store.len()
            );
        }
        report
    }

    /// Steps until a frame creates nothing, i.e. the window around the
    /// focal chunk is complete. Returns the number of frames taken.
    pub fn fill_window(&mut self, max_frames: u64) -> u64 {
        let start = self.frame;
        while self.frame - start < max_frames {
            if self.step().created.is_empty() {
                break;
            }
        }
        self.frame - start
    }

    /// Meshes a renderer would submit this frame, ordered per
    /// `[stream] sort_draw_list`.
    pub fn draw_list(&self) -> Vec<DrawItem<'_, MeshId>> {
        self.store.draw_list(self.focal, self.config.stream.sort_draw_list)
    }

    pub fn cast(&self, origin: Vec3, ray: Vec3) -> Option<RayHit> {
        self.store.cast_ray(origin, ray)
    }

    /// Releases every mesh handle the app owns.
    pub fn shutdown(&mut self) {
        self.store.clear(&mut self.builder);
        if let Some(h) = self.outline.take() {
            self.builder.destroy_mesh(h);
        }
        if self.builder.live_count() != 0 {
            log::warn!("{} meshes still live at shutdown", self.builder.live_count());
        }
    }
}
