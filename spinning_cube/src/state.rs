use coreglut::glam::{Mat4, Vec3};
use coreglut::hommat;
use coreglut::sdl2::keyboard::Keycode;

use crate::config::CubeConfig;

/// Everything the frame, resize and key callbacks share.
#[derive(Debug, Clone)]
pub struct RenderState {
    view: Mat4,
    projection: Mat4,
    /// `projection * view`, refreshed on resize.
    view_projection: Mat4,
    /// Degrees around +Y, kept in `[0, 360)`.
    rotation: f32,
    degrees_per_second: f32,
    fovy: f32,
    near: f32,
    far: f32,
    running: bool,
}

impl RenderState {
    pub fn new(config: &CubeConfig) -> Self {
        let view = hommat::lookat(hommat::identity(), config.eye, config.target);
        RenderState {
            view,
            projection: hommat::identity(),
            view_projection: view,
            rotation: 0.0,
            degrees_per_second: 360.0 / config.rotation_period,
            fovy: config.fovy,
            near: config.near,
            far: config.far,
            running: true,
        }
    }

    pub fn resize(&mut self, width: u32, height: u32) {
        // A minimized window reports a zero height.
        let aspect = width as f32 / height.max(1) as f32;
        self.projection =
            hommat::perspective(hommat::identity(), self.fovy, aspect, self.near, self.far);
        self.view_projection = self.projection * self.view;
    }

    /// Advances the rotation by `dt` seconds of wall-clock time.
    pub fn advance(&mut self, dt: f32) {
        self.rotation = (self.rotation + dt * self.degrees_per_second).rem_euclid(360.0);
    }

    pub fn key_down(&mut self, keycode: Option<Keycode>) {
        if keycode == Some(Keycode::Escape) {
            self.running = false;
        }
    }

    pub fn model_view_projection(&self) -> Mat4 {
        hommat::rotation(self.view_projection, self.rotation, Vec3::Y)
    }

    pub fn rotation(&self) -> f32 {
        self.rotation
    }

    pub fn running(&self) -> bool {
        self.running
    }
}
