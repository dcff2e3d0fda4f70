use std::marker::PhantomData;

use glow::{
    Context, HasContext, NO_ERROR, RENDERER, SHADING_LANGUAGE_VERSION, VENDOR, VERSION,
};
use sdl2::keyboard::{Keycode, Mod};

pub use glam;
pub use glow;
pub use sdl2::{self, video::Window};

mod error;
pub mod hommat;
mod load_shaders;
pub mod logging;
pub mod time;

pub use error::{Error, Result};
pub use load_shaders::{
    attribute_locations, compile_shader, create_program, load_shader, load_shaders,
    uniform_locations, LoadShaders, ShaderBackend, ShaderKind, ShaderSource,
};
use time::FrameClock;
pub use time::FrameTime;

/// Drains the GL error queue, logging every pending error.
pub fn check_gl_error(gl: &Context, what: &str) -> Result<()> {
    let mut codes = Vec::new();
    unsafe {
        let mut error = gl.get_error();
        while error != NO_ERROR {
            log::error!("{what}: gl error 0x{error:04x}");
            codes.push(error);
            error = gl.get_error();
        }
    }

    if codes.is_empty() {
        Ok(())
    } else {
        Err(Error::Gl {
            what: what.to_owned(),
            codes,
        })
    }
}

/// Logs vendor, renderer and version strings of the current context.
pub fn log_gl_info(gl: &Context) {
    log::info!("OpenGL information:");
    for (name, param) in [
        ("GL_VENDOR", VENDOR),
        ("GL_RENDERER", RENDERER),
        ("GL_VERSION", VERSION),
        ("GL_SHADING_LANGUAGE_VERSION", SHADING_LANGUAGE_VERSION),
    ] {
        let value = unsafe { gl.get_parameter_string(param) };
        log::info!("\t{name} = {value}");
    }
}

/// Application callbacks driven by [StartBuilder::start].
///
/// Everything runs on the thread that called `start`; callbacks are invoked
/// between frames while events are polled.
#[allow(unused)]
pub trait CoreGlut: Sized {
    fn init(gl: &Context, window: &Window) -> Result<Self>;
    fn display(&mut self, gl: &Context, frame: FrameTime);

    /// Called once before the first frame and whenever the drawable size
    /// changes. Sizes are in pixels.
    fn resize(&mut self, gl: &Context, width: u32, height: u32) {}

    fn key_down(&mut self, keycode: Option<Keycode>, keymod: Mod, repeat: bool) {}

    /// The loop stops after the frame in which this returns false.
    fn running(&self) -> bool {
        true
    }

    /// Release GL objects while the context is still current.
    fn cleanup(&mut self, gl: &Context) {}

    fn sdl2_window(window_title: impl Into<String>) -> StartBuilder<Self> {
        StartBuilder::new(window_title.into())
    }
}

pub struct StartBuilder<T: CoreGlut> {
    window_title: String,
    window_width: Option<u32>,
    window_height: Option<u32>,
    gl_version: Option<(u8, u8)>,
    vsync: bool,
    core_glut: PhantomData<T>,
}

impl<T: CoreGlut> StartBuilder<T> {
    pub fn new(window_title: String) -> Self {
        StartBuilder {
            window_title,
            window_width: None,
            window_height: None,
            gl_version: None,
            vsync: true,
            core_glut: PhantomData,
        }
    }

    pub fn window_size(mut self, width: u32, height: u32) -> Self {
        self.window_width = Some(width);
        self.window_height = Some(height);
        self
    }

    pub fn gl_version(mut self, major: u8, minor: u8) -> Self {
        self.gl_version = Some((major, minor));
        self
    }

    pub fn vsync(mut self, enabled: bool) -> Self {
        self.vsync = enabled;
        self
    }

    /// Opens the window, runs the event loop until the window is closed or
    /// the application stops running, and returns.
    pub fn start(self) -> Result<()> {
        let (gl_major_version, gl_minor_version) = self.gl_version.unwrap_or((3, 2));

        let sdl = sdl2::init().map_err(Error::init)?;
        let video = sdl.video().map_err(Error::init)?;
        let gl_attr = video.gl_attr();
        gl_attr.set_context_profile(sdl2::video::GLProfile::Core);
        gl_attr.set_context_version(gl_major_version, gl_minor_version);
        gl_attr.set_context_flags().forward_compatible().set();
        gl_attr.set_depth_size(24);
        gl_attr.set_double_buffer(true);

        let window = video
            .window(
                &self.window_title,
                self.window_width.unwrap_or(800),
                self.window_height.unwrap_or(800),
            )
            .allow_highdpi()
            .opengl()
            .resizable()
            .build()
            .map_err(Error::init)?;
        let gl_context = window.gl_create_context().map_err(Error::init)?;
        window.gl_make_current(&gl_context).map_err(Error::init)?;
        if let Err(e) = video.gl_set_swap_interval(i32::from(self.vsync)) {
            log::warn!("unable to set swap interval: {e}");
        }

        let gl =
            unsafe { Context::from_loader_function(|s| video.gl_get_proc_address(s) as *const _) };
        log::debug!(
            "created {}x{} window with a {gl_major_version}.{gl_minor_version} core context",
            window.size().0,
            window.size().1,
        );

        // Acquired before the app so nothing fallible sits between its
        // init and cleanup.
        let mut event_loop = sdl.event_pump().map_err(Error::init)?;

        let mut app = T::init(&gl, &window)?;
        let (width, height) = window.drawable_size();
        app.resize(&gl, width, height);

        let mut clock = FrameClock::new();
        let mut running = true;
        while running && app.running() {
            for event in event_loop.poll_iter() {
                use sdl2::event::{Event, WindowEvent};

                match event {
                    Event::Quit { .. } => running = false,
                    Event::Window {
                        win_event: WindowEvent::SizeChanged(..),
                        ..
                    } => {
                        let (width, height) = window.drawable_size();
                        app.resize(&gl, width, height);
                    }
                    Event::KeyDown {
                        keycode,
                        keymod,
                        repeat,
                        ..
                    } => app.key_down(keycode, keymod, repeat),
                    _ => {}
                }
            }

            app.display(&gl, clock.tick());
            window.gl_swap_window();
        }

        app.cleanup(&gl);
        Ok(())
    }
}
