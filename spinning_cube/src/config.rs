use std::path::PathBuf;

use coreglut::glam::{Vec3, Vec4};

/// Overrides [CubeConfig::shader_dir].
pub const SHADER_DIR_ENV: &str = "SPINNING_CUBE_SHADERS";

#[derive(Debug, Clone)]
pub struct CubeConfig {
    pub eye: Vec3,
    pub target: Vec3,
    /// Vertical field of view in degrees.
    pub fovy: f32,
    pub near: f32,
    pub far: f32,
    /// Seconds per full turn.
    pub rotation_period: f32,
    pub clear_color: Vec4,
    pub point_size: f32,
    pub shader_dir: PathBuf,
}

impl Default for CubeConfig {
    fn default() -> Self {
        Self {
            eye: Vec3::new(2.5, 1.5, 2.5),
            target: Vec3::ZERO,
            fovy: 70.0,
            near: 0.1,
            far: 10.0,
            rotation_period: 5.0,
            clear_color: Vec4::new(1.0, 1.0, 1.0, 0.0),
            point_size: 5.0,
            shader_dir: PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("shaders"),
        }
    }
}

impl CubeConfig {
    pub fn from_env() -> Self {
        let mut config = Self::default();
        if let Some(dir) = std::env::var_os(SHADER_DIR_ENV) {
            config.shader_dir = PathBuf::from(dir);
        }
        config
    }

    pub fn vertex_shader(&self) -> PathBuf {
        self.shader_dir.join("shader.vert")
    }

    pub fn fragment_shader(&self) -> PathBuf {
        self.shader_dir.join("shader.frag")
    }
}
