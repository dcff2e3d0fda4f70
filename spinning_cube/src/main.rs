use std::process::ExitCode;

use coreglut::{
    attribute_locations, check_gl_error, create_program,
    glow::{
        Context, HasContext, NativeBuffer, NativeProgram, NativeUniformLocation,
        NativeVertexArray, ARRAY_BUFFER, COLOR_BUFFER_BIT, CULL_FACE, DEPTH_BUFFER_BIT,
        DEPTH_TEST, FLOAT, POINTS, STATIC_DRAW, TRIANGLE_STRIP,
    },
    log_gl_info,
    logging::init_logging,
    sdl2::keyboard::{Keycode, Mod},
    uniform_locations, CoreGlut, Error, FrameTime, Result, Window,
};

use config::CubeConfig;
use cube::{COLOR_OFFSET, CUBE_STRIP, POSITION_OFFSET, STRIDE};
use state::RenderState;

mod config;
mod cube;
mod state;

const ATTRIBUTES: [&str; 2] = ["vs_position", "vs_color"];

struct App {
    state: RenderState,
    program: NativeProgram,
    vao: NativeVertexArray,
    vbo: NativeBuffer,
    mvp_location: Option<NativeUniformLocation>,
}

/// Uploads the cube into a fresh vertex array bound to the given attribute
/// locations.
fn upload_cube(
    gl: &Context,
    position_loc: u32,
    color_loc: u32,
) -> Result<(NativeVertexArray, NativeBuffer)> {
    unsafe {
        let vao = gl
            .create_vertex_array()
            .map_err(|reason| Error::ObjectCreation { what: "vertex array", reason })?;
        gl.bind_vertex_array(Some(vao));

        let vbo = match gl.create_buffer() {
            Ok(vbo) => vbo,
            Err(reason) => {
                gl.delete_vertex_array(vao);
                return Err(Error::ObjectCreation { what: "vertex buffer", reason });
            }
        };
        gl.bind_buffer(ARRAY_BUFFER, Some(vbo));
        gl.buffer_data_u8_slice(ARRAY_BUFFER, bytemuck::cast_slice(&CUBE_STRIP), STATIC_DRAW);

        gl.enable_vertex_attrib_array(position_loc);
        gl.vertex_attrib_pointer_f32(position_loc, 4, FLOAT, false, STRIDE, POSITION_OFFSET);
        gl.enable_vertex_attrib_array(color_loc);
        gl.vertex_attrib_pointer_f32(color_loc, 4, FLOAT, false, STRIDE, COLOR_OFFSET);

        // The vertex array keeps the buffer binding for both attributes.
        gl.bind_buffer(ARRAY_BUFFER, None);

        Ok((vao, vbo))
    }
}

impl CoreGlut for App {
    fn init(gl: &Context, _window: &Window) -> Result<Self> {
        let config = CubeConfig::from_env();
        log::debug!("{config:?}");
        log_gl_info(gl);

        unsafe {
            gl.enable(DEPTH_TEST);
            gl.enable(CULL_FACE);
            let c = config.clear_color;
            gl.clear_color(c.x, c.y, c.z, c.w);
            gl.point_size(config.point_size);
        }

        let program = create_program(gl, config.vertex_shader(), config.fragment_shader())?;
        let mvp_location = uniform_locations(gl, program, &["mvp"]).pop().flatten();
        if mvp_location.is_none() {
            log::warn!("uniform `mvp` is not active in the shader program");
        }

        let locations = attribute_locations(gl, program, &ATTRIBUTES);
        let uploaded = match (locations[0], locations[1]) {
            (Some(position_loc), Some(color_loc)) => upload_cube(gl, position_loc, color_loc),
            _ => {
                let missing = ATTRIBUTES
                    .iter()
                    .zip(&locations)
                    .find_map(|(name, loc)| loc.is_none().then_some(*name))
                    .unwrap_or_default();
                Err(Error::MissingAttribute(missing.to_owned()))
            }
        };
        let (vao, vbo) = match uploaded {
            Ok(objects) => objects,
            Err(e) => {
                unsafe { gl.delete_program(program) };
                return Err(e);
            }
        };

        let mut app = App {
            state: RenderState::new(&config),
            program,
            vao,
            vbo,
            mvp_location,
        };
        if let Err(e) = check_gl_error(gl, "init") {
            app.cleanup(gl);
            return Err(e);
        }
        Ok(app)
    }

    fn display(&mut self, gl: &Context, frame: FrameTime) {
        let mvp = self.state.model_view_projection();

        unsafe {
            gl.clear(COLOR_BUFFER_BIT | DEPTH_BUFFER_BIT);
            gl.use_program(Some(self.program));
            gl.uniform_matrix_4_f32_slice(self.mvp_location.as_ref(), false, mvp.as_ref());

            gl.bind_vertex_array(Some(self.vao));
            gl.draw_arrays(TRIANGLE_STRIP, 0, CUBE_STRIP.len() as i32);
            gl.draw_arrays(POINTS, 0, CUBE_STRIP.len() as i32);
        }

        self.state.advance(frame.dt);
    }

    fn resize(&mut self, gl: &Context, width: u32, height: u32) {
        log::debug!("resize to {width}x{height}");
        unsafe { gl.viewport(0, 0, width as i32, height as i32) };
        self.state.resize(width, height);
    }

    fn key_down(&mut self, keycode: Option<Keycode>, _keymod: Mod, _repeat: bool) {
        self.state.key_down(keycode);
    }

    fn running(&self) -> bool {
        self.state.running()
    }

    fn cleanup(&mut self, gl: &Context) {
        unsafe {
            gl.delete_buffer(self.vbo);
            gl.delete_vertex_array(self.vao);
            gl.delete_program(self.program);
        }
    }
}

fn main() -> ExitCode {
    init_logging();

    let result = App::sdl2_window("OpenGL Core Profile Test")
        .window_size(400, 300)
        .gl_version(3, 2)
        .start();

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            log::error!("{e}");
            ExitCode::FAILURE
        }
    }
}
