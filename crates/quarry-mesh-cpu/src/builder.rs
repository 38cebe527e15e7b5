use std::collections::HashMap;

use crate::vertex::{ColorVertex, TextureColorVertex};

/// Render-side collaborator that turns vertex lists into opaque mesh handles.
pub trait MeshBuilder {
    type Handle;

    fn build_mesh(&mut self, verts: &[TextureColorVertex]) -> Self::Handle;
    fn build_color_mesh(&mut self, verts: &[ColorVertex]) -> Self::Handle;
    fn destroy_mesh(&mut self, handle: Self::Handle);
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct MeshId(pub u32);

/// Keeps vertex counts instead of GPU buffers. Used by the headless binary
/// and by tests to check that every handle is destroyed exactly once.
#[derive(Debug, Default)]
pub struct HeadlessMeshBuilder {
    next: u32,
    live: HashMap<MeshId, usize>,
    pub built: u64,
    pub destroyed: u64,
    pub uploaded_bytes: u64,
}

impl HeadlessMeshBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn live_count(&self) -> usize {
        self.live.len()
    }

    pub fn vertex_count(&self, id: MeshId) -> Option<usize> {
        self.live.get(&id).copied()
    }

    pub fn live_vertices(&self) -> usize {
        self.live.values().sum()
    }

    fn alloc(&mut self, count: usize, bytes: usize) -> MeshId {
        let id = MeshId(self.next);
        self.next = self.next.wrapping_add(1);
        self.live.insert(id, count);
        self.built += 1;
        self.uploaded_bytes += bytes as u64;
        id
    }
}

impl MeshBuilder for HeadlessMeshBuilder {
    type Handle = MeshId;

    fn build_mesh(&mut self, verts: &[TextureColorVertex]) -> MeshId {
        let bytes = bytemuck::cast_slice::<_, u8>(verts).len();
        self.alloc(verts.len(), bytes)
    }

    fn build_color_mesh(&mut self, verts: &[ColorVertex]) -> MeshId {
        let bytes = bytemuck::cast_slice::<_, u8>(verts).len();
        self.alloc(verts.len(), bytes)
    }

    fn destroy_mesh(&mut self, handle: MeshId) {
        if self.live.remove(&handle).is_some() {
            self.destroyed += 1;
        } else {
            log::warn!("destroy of unknown mesh {:?}", handle);
        }
    }
}
