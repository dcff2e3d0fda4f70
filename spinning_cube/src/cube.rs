use bytemuck::{Pod, Zeroable};
use coreglut::glam::Vec4;

/// Interleaved vertex: homogeneous position followed by RGBA color.
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Pod, Zeroable)]
pub struct Vertex {
    pub position: Vec4,
    pub color: Vec4,
}

pub const STRIDE: i32 = std::mem::size_of::<Vertex>() as i32;
pub const POSITION_OFFSET: i32 = std::mem::offset_of!(Vertex, position) as i32;
pub const COLOR_OFFSET: i32 = std::mem::offset_of!(Vertex, color) as i32;

const fn vertex(x: f32, y: f32, z: f32, r: f32, g: f32, b: f32) -> Vertex {
    Vertex {
        position: Vec4::new(x, y, z, 1.0),
        color: Vec4::new(r, g, b, 0.0),
    }
}

/// The cube `[-1, 1]^3` as a single triangle strip. Each corner is colored
/// by where it sits: red towards +x, green towards +y, blue towards -z.
#[rustfmt::skip]
pub const CUBE_STRIP: [Vertex; 14] = [
    vertex(-1.0, -1.0,  1.0, 0.0, 0.0, 0.0),
    vertex( 1.0, -1.0,  1.0, 1.0, 0.0, 0.0),
    vertex( 1.0,  1.0,  1.0, 1.0, 1.0, 0.0),
    vertex( 1.0, -1.0, -1.0, 1.0, 0.0, 1.0),
    vertex( 1.0,  1.0, -1.0, 1.0, 1.0, 1.0),
    vertex(-1.0,  1.0, -1.0, 0.0, 1.0, 1.0),
    vertex( 1.0,  1.0,  1.0, 1.0, 1.0, 0.0),
    vertex(-1.0,  1.0,  1.0, 0.0, 1.0, 0.0),
    vertex(-1.0, -1.0,  1.0, 0.0, 0.0, 0.0),
    vertex(-1.0,  1.0, -1.0, 0.0, 1.0, 1.0),
    vertex(-1.0, -1.0, -1.0, 0.0, 0.0, 1.0),
    vertex( 1.0, -1.0, -1.0, 1.0, 0.0, 1.0),
    vertex(-1.0, -1.0,  1.0, 0.0, 0.0, 0.0),
    vertex( 1.0, -1.0,  1.0, 1.0, 0.0, 0.0),
];
