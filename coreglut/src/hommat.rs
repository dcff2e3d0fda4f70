//! Homogeneous transformation helpers.
//!
//! Every builder takes the current matrix `old` and returns `old * M`, so the
//! newly built transform is applied to a column vector before `old` is.
//! Matrices are written row by row below and transposed into glam's column
//! major storage.

use std::f32::consts::PI;

use glam::{Mat4, Vec3};

fn radians(degrees: f32) -> f32 {
    degrees * PI / 180.0
}

pub fn identity() -> Mat4 {
    Mat4::IDENTITY
}

pub fn translation(old: Mat4, dir: Vec3) -> Mat4 {
    #[rustfmt::skip]
    let m = Mat4::from_cols_array(&[
        1.0, 0.0, 0.0, dir.x,
        0.0, 1.0, 0.0, dir.y,
        0.0, 0.0, 1.0, dir.z,
        0.0, 0.0, 0.0, 1.0,
    ]).transpose();
    old * m
}

/// Rotation by `angle` degrees around `axis`. The axis is used as given and
/// should already be unit length.
pub fn rotation(old: Mat4, angle: f32, axis: Vec3) -> Mat4 {
    let (sina, cosa) = radians(angle).sin_cos();
    let cosa1 = 1.0 - cosa;
    let Vec3 { x, y, z } = axis;

    #[rustfmt::skip]
    let m = Mat4::from_cols_array(&[
        x * x * cosa1 + cosa,     x * y * cosa1 - z * sina, x * z * cosa1 + y * sina, 0.0,
        y * x * cosa1 + z * sina, y * y * cosa1 + cosa,     y * z * cosa1 - x * sina, 0.0,
        z * x * cosa1 - y * sina, z * y * cosa1 + x * sina, z * z * cosa1 + cosa,     0.0,
        0.0,                      0.0,                      0.0,                      1.0,
    ]).transpose();
    old * m
}

pub fn scale(old: Mat4, axes: Vec3) -> Mat4 {
    old * Mat4::from_diagonal(axes.extend(1.0))
}

/// Orthographic projection of the box `[left, right] x [bottom, top] x
/// [near, far]` onto the unit cube. Unlike `glOrtho`, depth is not flipped:
/// `z = near` maps to -1 and `z = far` to +1. Degenerate bounds are not
/// checked.
pub fn ortho(old: Mat4, left: f32, right: f32, bottom: f32, top: f32, near: f32, far: f32) -> Mat4 {
    let (w, h, d) = (right - left, top - bottom, far - near);

    #[rustfmt::skip]
    let m = Mat4::from_cols_array(&[
        2.0 / w, 0.0,     0.0,      -(right + left) / w,
        0.0,     2.0 / h, 0.0,      -(top + bottom) / h,
        0.0,     0.0,     2.0 / d,  -(far + near) / d,
        0.0,     0.0,     0.0,      1.0,
    ]).transpose();
    old * m
}

/// Symmetric perspective projection with vertical field of view `fovy` in
/// degrees.
pub fn perspective(old: Mat4, fovy: f32, aspect: f32, near: f32, far: f32) -> Mat4 {
    let f = 1.0 / (radians(fovy) / 2.0).tan();

    #[rustfmt::skip]
    let m = Mat4::from_cols_array(&[
        f / aspect, 0.0, 0.0,                          0.0,
        0.0,        f,   0.0,                          0.0,
        0.0,        0.0, (far + near) / (near - far),  (2.0 * far * near) / (near - far),
        0.0,        0.0, -1.0,                         0.0,
    ]).transpose();
    old * m
}

/// [lookat_up] with +Y as the up direction.
pub fn lookat(old: Mat4, eye: Vec3, at: Vec3) -> Mat4 {
    lookat_up(old, eye, at, Vec3::Y)
}

/// View transform for a camera at `eye` looking at `at`.
///
/// The rotation rows are `s = f x up`, `u = s x f` and `-f`, and the
/// translation by `-eye` is composed onto that rotation before the result is
/// composed onto `old`. `s` is not renormalized, so `up` should not be
/// parallel to the viewing direction.
pub fn lookat_up(old: Mat4, eye: Vec3, at: Vec3, up: Vec3) -> Mat4 {
    let f = (at - eye).normalize();
    let up = up.normalize();
    let s = f.cross(up);
    let u = s.cross(f);

    #[rustfmt::skip]
    let basis = Mat4::from_cols_array(&[
        s.x,  s.y,  s.z,  0.0,
        u.x,  u.y,  u.z,  0.0,
        -f.x, -f.y, -f.z, 0.0,
        0.0,  0.0,  0.0,  1.0,
    ]).transpose();
    old * translation(basis, -eye)
}
