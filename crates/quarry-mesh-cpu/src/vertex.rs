use bytemuck::{Pod, Zeroable};

/// Textured, tinted vertex used for chunk meshes.
#[repr(C)]
#[derive(Clone, Copy, Debug, Default, PartialEq, Pod, Zeroable)]
pub struct TextureColorVertex {
    pub position: [f32; 3],
    pub texcoord: [f32; 2],
    /// RGBA, little-endian packed.
    pub color: u32,
}

/// Untextured vertex used for outlines and debug shapes.
#[repr(C)]
#[derive(Clone, Copy, Debug, Default, PartialEq, Pod, Zeroable)]
pub struct ColorVertex {
    pub position: [f32; 3],
    pub color: u32,
}
