//! BMF: little-endian vertices, texture groups and box colliders.
//!
//! ```text
//! i32 vertex_count                      3..=0xffff
//! vertex_count * { f32[3] position, f32[3] normal, f32[2] texcoord }
//! i32 texture_group_count               1..=0xffff
//! per group: u8 name_len (<= 32), name bytes, i32 vertex_count (1..=0xffff)
//! i32 box_collider_count                0..=0xffff
//! per collider: f32[3] half_extents, f32[4] quaternion xyzw, f32[3] position
//! ```

use std::path::{Path, PathBuf};
use std::sync::Arc;

use quarry_geom::{Quat, Vec3};
use quarry_gjk::Shape;

pub const MAX_COUNT: i32 = 0xffff;
pub const MAX_NAME_LEN: usize = 32;

#[derive(Debug, thiserror::Error)]
pub enum BmfError {
    #[error("failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("{field}: data ends at byte {offset}")]
    Truncated { field: &'static str, offset: usize },
    #[error("{field}: {value} outside {min}..={max}")]
    InvalidCount {
        field: &'static str,
        value: i32,
        min: i32,
        max: i32,
    },
    #[error("texture group {index}: name length {len} > {max}", max = MAX_NAME_LEN)]
    NameTooLong { index: usize, len: usize },
    #[error("{extra} trailing bytes after box colliders")]
    TrailingBytes { extra: usize },
}

#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct BmfVertex {
    pub position: [f32; 3],
    pub normal: [f32; 3],
    pub texcoord: [f32; 2],
}

#[derive(Clone, Debug, PartialEq)]
pub struct TextureGroup {
    pub name: String,
    pub vertex_count: u32,
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct BoxCollider {
    pub half_extents: Vec3,
    pub rotation: Quat,
    pub position: Vec3,
}

impl BoxCollider {
    pub fn to_shape(&self) -> Shape {
        Shape::from_box_collider(self.half_extents, self.rotation, self.position)
    }
}

#[derive(Clone, Debug, Default, PartialEq)]
pub struct Bmf {
    pub vertices: Vec<BmfVertex>,
    pub texture_groups: Vec<TextureGroup>,
    pub box_colliders: Vec<BoxCollider>,
}

impl Bmf {
    /// Every vertex as a triangle list; its convex hull is what GJK sees.
    pub fn hull_shape(&self) -> Shape {
        let positions: Vec<Vec3> = self.vertices.iter().map(|v| Vec3::from(v.position)).collect();
        let indices = (0..positions.len() as u32).collect();
        Shape::new(positions, indices)
    }

    pub fn collider_shapes(&self) -> Vec<Arc<Shape>> {
        self.box_colliders.iter().map(|c| Arc::new(c.to_shape())).collect()
    }
}

struct Reader<'a> {
    buf: &'a [u8],
    pos: usize,
}

impl<'a> Reader<'a> {
    fn take(&mut self, n: usize, field: &'static str) -> Result<&'a [u8], BmfError> {
        let end = self.pos.checked_add(n).filter(|&e| e <= self.buf.len());
        let Some(end) = end else {
            return Err(BmfError::Truncated {
                field,
                offset: self.buf.len(),
            });
        };
        let s = &self.buf[self.pos..end];
        self.pos = end;
        Ok(s)
    }

    fn u8(&mut self, field: &'static str) -> Result<u8, BmfError> {
        Ok(self.take(1, field)?[0])
    }

    fn i32(&mut self, field: &'static str) -> Result<i32, BmfError> {
        let b = self.take(4, field)?;
        Ok(i32::from_le_bytes([b[0], b[1], b[2], b[3]]))
    }

    fn f32s<const N: usize>(&mut self, field: &'static str) -> Result<[f32; N], BmfError> {
        let b = self.take(4 * N, field)?;
        let mut out = [0.0f32; N];
        for (o, c) in out.iter_mut().zip(b.chunks_exact(4)) {
            *o = f32::from_le_bytes([c[0], c[1], c[2], c[3]]);
        }
        Ok(out)
    }

    fn count(&mut self, field: &'static str, min: i32) -> Result<usize, BmfError> {
        let value = self.i32(field)?;
        if !(min..=MAX_COUNT).contains(&value) {
            return Err(BmfError::InvalidCount {
                field,
                value,
                min,
                max: MAX_COUNT,
            });
        }
        Ok(value as usize)
    }
}

pub fn parse_bmf(bytes: &[u8]) -> Result<Bmf, BmfError> {
    let mut r = Reader { buf: bytes, pos: 0 };

    let vertex_count = r.count("vertex_count", 3)?;
    let mut vertices = Vec::with_capacity(vertex_count);
    for _ in 0..vertex_count {
        vertices.push(BmfVertex {
            position: r.f32s("vertex position")?,
            normal: r.f32s("vertex normal")?,
            texcoord: r.f32s("vertex texcoord")?,
        });
    }

    let group_count = r.count("texture_group_count", 1)?;
    let mut texture_groups = Vec::with_capacity(group_count);
    for index in 0..group_count {
        let len = r.u8("texture group name length")? as usize;
        if len > MAX_NAME_LEN {
            return Err(BmfError::NameTooLong { index, len });
        }
        let name = String::from_utf8_lossy(r.take(len, "texture group name")?).into_owned();
        let vertex_count = r.count("texture group vertex_count", 1)? as u32;
        texture_groups.push(TextureGroup { name, vertex_count });
    }

    let collider_count = r.count("box_collider_count", 0)?;
    let mut box_colliders = Vec::with_capacity(collider_count);
    for _ in 0..collider_count {
        let h: [f32; 3] = r.f32s("box collider half extents")?;
        let q: [f32; 4] = r.f32s("box collider quaternion")?;
        let p: [f32; 3] = r.f32s("box collider position")?;
        box_colliders.push(BoxCollider {
            half_extents: Vec3::from(h),
            rotation: Quat::new(q[0], q[1], q[2], q[3]),
            position: Vec3::from(p),
        });
    }

    let extra = bytes.len() - r.pos;
    if extra > 0 {
        return Err(BmfError::TrailingBytes { extra });
    }
    Ok(Bmf {
        vertices,
        texture_groups,
        box_colliders,
    })
}

pub fn load_bmf(path: impl AsRef<Path>) -> Result<Bmf, BmfError> {
    let path = path.as_ref();
    let bytes = std::fs::read(path).map_err(|source| BmfError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    let bmf = parse_bmf(&bytes)?;
    log::info!(
        "loaded {}: {} vertices, {} groups, {} colliders",
        path.display(),
        bmf.vertices.len(),
        bmf.texture_groups.len(),
        bmf.box_colliders.len()
    );
    Ok(bmf)
}

/// Serialises `bmf` in the layout `parse_bmf` reads. Names longer than the
/// limit are cut.
pub fn encode_bmf(bmf: &Bmf) -> Vec<u8> {
    let mut out = Vec::new();
    let f = |out: &mut Vec<u8>, v: &[f32]| {
        for x in v {
            out.extend_from_slice(&x.to_le_bytes());
        }
    };
    out.extend_from_slice(&(bmf.vertices.len() as i32).to_le_bytes());
    for v in &bmf.vertices {
        f(&mut out, &v.position);
        f(&mut out, &v.normal);
        f(&mut out, &v.texcoord);
    }
    out.extend_from_slice(&(bmf.texture_groups.len() as i32).to_le_bytes());
    for g in &bmf.texture_groups {
        let name = &g.name.as_bytes()[..g.name.len().min(MAX_NAME_LEN)];
        out.push(name.len() as u8);
        out.extend_from_slice(name);
        out.extend_from_slice(&(g.vertex_count as i32).to_le_bytes());
    }
    out.extend_from_slice(&(bmf.box_colliders.len() as i32).to_le_bytes());
    for c in &bmf.box_colliders {
        f(&mut out, &c.half_extents.to_array());
        f(&mut out, &[c.rotation.x, c.rotation.y, c.rotation.z, c.rotation.w]);
        f(&mut out, &c.position.to_array());
    }
    out
}
