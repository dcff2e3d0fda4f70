use std::fmt;
use std::path::{Path, PathBuf};

use glow::{
    Context, HasContext, NativeProgram, NativeShader, NativeUniformLocation, FRAGMENT_SHADER,
    VERTEX_SHADER,
};

use crate::error::{Error, Result};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ShaderKind {
    Vertex,
    Fragment,
}

impl ShaderKind {
    pub fn gl_enum(self) -> u32 {
        match self {
            ShaderKind::Vertex => VERTEX_SHADER,
            ShaderKind::Fragment => FRAGMENT_SHADER,
        }
    }
}

impl fmt::Display for ShaderKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ShaderKind::Vertex => f.write_str("vertex"),
            ShaderKind::Fragment => f.write_str("fragment"),
        }
    }
}

/// The slice of the GL API the loader needs.
pub trait ShaderBackend {
    type Shader: Copy;
    type Program: Copy;
    type UniformLocation;

    fn create_shader(&self, kind: ShaderKind) -> std::result::Result<Self::Shader, String>;
    fn shader_source(&self, shader: Self::Shader, source: &str);
    fn compile_shader(&self, shader: Self::Shader);
    fn shader_compile_status(&self, shader: Self::Shader) -> bool;
    fn shader_info_log(&self, shader: Self::Shader) -> String;
    fn delete_shader(&self, shader: Self::Shader);

    fn create_program(&self) -> std::result::Result<Self::Program, String>;
    fn attach_shader(&self, program: Self::Program, shader: Self::Shader);
    fn link_program(&self, program: Self::Program);
    fn program_link_status(&self, program: Self::Program) -> bool;
    fn program_info_log(&self, program: Self::Program) -> String;
    fn delete_program(&self, program: Self::Program);

    fn uniform_location(&self, program: Self::Program, name: &str)
        -> Option<Self::UniformLocation>;
    fn attrib_location(&self, program: Self::Program, name: &str) -> Option<u32>;
}

// Methods sharing a name with `HasContext` are called fully qualified.
impl ShaderBackend for Context {
    type Shader = NativeShader;
    type Program = NativeProgram;
    type UniformLocation = NativeUniformLocation;

    fn create_shader(&self, kind: ShaderKind) -> std::result::Result<NativeShader, String> {
        unsafe { HasContext::create_shader(self, kind.gl_enum()) }
    }

    fn shader_source(&self, shader: NativeShader, source: &str) {
        unsafe { HasContext::shader_source(self, shader, source) }
    }

    fn compile_shader(&self, shader: NativeShader) {
        unsafe { HasContext::compile_shader(self, shader) }
    }

    fn shader_compile_status(&self, shader: NativeShader) -> bool {
        unsafe { self.get_shader_compile_status(shader) }
    }

    fn shader_info_log(&self, shader: NativeShader) -> String {
        unsafe { self.get_shader_info_log(shader) }
    }

    fn delete_shader(&self, shader: NativeShader) {
        unsafe { HasContext::delete_shader(self, shader) }
    }

    fn create_program(&self) -> std::result::Result<NativeProgram, String> {
        unsafe { HasContext::create_program(self) }
    }

    fn attach_shader(&self, program: NativeProgram, shader: NativeShader) {
        unsafe { HasContext::attach_shader(self, program, shader) }
    }

    fn link_program(&self, program: NativeProgram) {
        unsafe { HasContext::link_program(self, program) }
    }

    fn program_link_status(&self, program: NativeProgram) -> bool {
        unsafe { self.get_program_link_status(program) }
    }

    fn program_info_log(&self, program: NativeProgram) -> String {
        unsafe { self.get_program_info_log(program) }
    }

    fn delete_program(&self, program: NativeProgram) {
        unsafe { HasContext::delete_program(self, program) }
    }

    fn uniform_location(
        &self,
        program: NativeProgram,
        name: &str,
    ) -> Option<NativeUniformLocation> {
        unsafe { self.get_uniform_location(program, name) }
    }

    fn attrib_location(&self, program: NativeProgram, name: &str) -> Option<u32> {
        unsafe { self.get_attrib_location(program, name) }
    }
}

/// Owns a GL object until [Guard::keep] hands it back, releasing it on drop
/// otherwise.
struct Guard<'a, B: ShaderBackend + ?Sized, H: Copy> {
    gl: &'a B,
    handle: H,
    armed: bool,
    release: fn(&B, H),
}

impl<'a, B: ShaderBackend + ?Sized, H: Copy> Guard<'a, B, H> {
    fn new(gl: &'a B, handle: H, release: fn(&B, H)) -> Self {
        Guard {
            gl,
            handle,
            armed: true,
            release,
        }
    }

    fn get(&self) -> H {
        self.handle
    }

    fn keep(mut self) -> H {
        self.armed = false;
        self.handle
    }
}

impl<B: ShaderBackend + ?Sized, H: Copy> Drop for Guard<'_, B, H> {
    fn drop(&mut self) {
        if self.armed {
            (self.release)(self.gl, self.handle);
        }
    }
}

fn shader_guard<B: ShaderBackend + ?Sized>(gl: &B, shader: B::Shader) -> Guard<'_, B, B::Shader> {
    Guard::new(gl, shader, |gl, shader| gl.delete_shader(shader))
}

fn program_guard<B: ShaderBackend + ?Sized>(
    gl: &B,
    program: B::Program,
) -> Guard<'_, B, B::Program> {
    Guard::new(gl, program, |gl, program| gl.delete_program(program))
}

/// Where a shader stage's source comes from.
#[derive(Debug, Clone)]
pub enum ShaderSource {
    Path(PathBuf),
    Inline(String),
}

impl fmt::Display for ShaderSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ShaderSource::Path(path) => write!(f, "{}", path.display()),
            ShaderSource::Inline(_) => f.write_str("<inline>"),
        }
    }
}

impl ShaderSource {
    fn load<B: ShaderBackend + ?Sized>(&self, gl: &B, kind: ShaderKind) -> Result<B::Shader> {
        match self {
            ShaderSource::Path(path) => load_shader(gl, path, kind),
            ShaderSource::Inline(source) => compile_shader(gl, source, kind),
        }
    }
}

pub struct LoadShaders {
    vertex: ShaderSource,
    fragment: ShaderSource,
}

impl LoadShaders {
    pub fn new(vertex: impl Into<String>, fragment: impl Into<String>) -> Self {
        LoadShaders {
            vertex: ShaderSource::Inline(vertex.into()),
            fragment: ShaderSource::Inline(fragment.into()),
        }
    }

    /// Sources are read when [LoadShaders::compile] runs, not here.
    pub fn new_from_path(
        vertex_shader_path: impl AsRef<Path>,
        fragment_shader_path: impl AsRef<Path>,
    ) -> Self {
        LoadShaders {
            vertex: ShaderSource::Path(vertex_shader_path.as_ref().to_path_buf()),
            fragment: ShaderSource::Path(fragment_shader_path.as_ref().to_path_buf()),
        }
    }

    /// Creates the program, compiles both stages and links them.
    ///
    /// Whatever fails, every object created along the way is deleted before
    /// the error is returned. On success the shaders are only flagged for
    /// deletion; the driver keeps them alive while they are attached.
    pub fn compile<B: ShaderBackend + ?Sized>(&self, gl: &B) -> Result<B::Program> {
        let program = gl
            .create_program()
            .map_err(|reason| Error::object_creation("program", reason))?;
        let program = program_guard(gl, program);

        let vertex = shader_guard(gl, self.vertex.load(gl, ShaderKind::Vertex)?);
        let fragment = shader_guard(gl, self.fragment.load(gl, ShaderKind::Fragment)?);

        gl.attach_shader(program.get(), vertex.get());
        gl.attach_shader(program.get(), fragment.get());
        gl.link_program(program.get());

        if !gl.program_link_status(program.get()) {
            let log = gl.program_info_log(program.get());
            return Err(Error::ProgramLink { log });
        }

        log::debug!("linked program from {} and {}", self.vertex, self.fragment);
        Ok(program.keep())
    }
}

/// Compiles a single shader stage from source. The caller owns the returned
/// shader; a shader that fails to compile is deleted here.
pub fn compile_shader<B: ShaderBackend + ?Sized>(
    gl: &B,
    source: &str,
    kind: ShaderKind,
) -> Result<B::Shader> {
    let shader = gl
        .create_shader(kind)
        .map_err(|reason| Error::object_creation("shader", reason))?;
    let shader = shader_guard(gl, shader);

    gl.shader_source(shader.get(), source);
    gl.compile_shader(shader.get());

    if !gl.shader_compile_status(shader.get()) {
        let log = gl.shader_info_log(shader.get());
        return Err(Error::ShaderCompile { kind, log });
    }

    Ok(shader.keep())
}

/// Reads `path` in full and compiles it as a `kind` shader.
pub fn load_shader<B: ShaderBackend + ?Sized>(
    gl: &B,
    path: impl AsRef<Path>,
    kind: ShaderKind,
) -> Result<B::Shader> {
    let path = path.as_ref();
    let source = std::fs::read_to_string(path).map_err(|source| Error::Io {
        path: path.to_path_buf(),
        source,
    })?;
    compile_shader(gl, &source, kind)
}

/// Builds a program from a vertex and a fragment shader file.
pub fn create_program<B: ShaderBackend + ?Sized>(
    gl: &B,
    vertex_shader_path: impl AsRef<Path>,
    fragment_shader_path: impl AsRef<Path>,
) -> Result<B::Program> {
    LoadShaders::new_from_path(vertex_shader_path, fragment_shader_path).compile(gl)
}

/// Simplified [LoadShaders] for in-memory vertex and fragment sources.
pub fn load_shaders<B: ShaderBackend + ?Sized>(
    gl: &B,
    vertex_shader_source: impl Into<String>,
    fragment_shader_source: impl Into<String>,
) -> Result<B::Program> {
    LoadShaders::new(vertex_shader_source, fragment_shader_source).compile(gl)
}

/// Uniform locations in the order of `names`. Unknown or optimized-out
/// uniforms come back as `None`.
pub fn uniform_locations<B: ShaderBackend + ?Sized>(
    gl: &B,
    program: B::Program,
    names: &[&str],
) -> Vec<Option<B::UniformLocation>> {
    names
        .iter()
        .map(|name| gl.uniform_location(program, name))
        .collect()
}

/// Attribute locations in the order of `names`, `None` where not found.
pub fn attribute_locations<B: ShaderBackend + ?Sized>(
    gl: &B,
    program: B::Program,
    names: &[&str],
) -> Vec<Option<u32>> {
    names
        .iter()
        .map(|name| gl.attrib_location(program, name))
        .collect()
}

#[cfg(test)]
mod tests {
    use std::cell::{Cell, RefCell};
    use std::collections::{HashMap, HashSet};

    use super::*;

    const VALID_VS: &str =
        "#version 150\nin vec4 vs_position;\nvoid main() { gl_Position = vs_position; }\n";
    const VALID_FS: &str = "#version 150\nout vec4 color;\nvoid main() { color = vec4(1.0); }\n";
    const BROKEN_FS: &str = "#version 150\nout vec4 color;\nvoid main() { color = vec4(1.0) }\n";
    const COMPILE_LOG: &str = "0:3(32): error: syntax error, unexpected '}'";
    const LINK_LOG: &str = "error: vertex shader output `v_color' not read by fragment shader";

    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    enum Object {
        Shader(u32),
        Program(u32),
    }

    /// Records object lifetimes. Sources containing `) }` fail to compile;
    /// linking fails when `fail_link` is set.
    #[derive(Default)]
    struct MockGl {
        next_name: Cell<u32>,
        live: RefCell<HashSet<Object>>,
        created: Cell<usize>,
        deleted: Cell<usize>,
        sources: RefCell<HashMap<u32, String>>,
        compiled: RefCell<HashMap<u32, bool>>,
        attached: RefCell<Vec<(u32, u32)>>,
        fail_link: bool,
        fail_create_program: bool,
    }

    impl MockGl {
        fn failing_link() -> Self {
            MockGl {
                fail_link: true,
                ..Default::default()
            }
        }

        fn create(&self, object: impl Fn(u32) -> Object) -> u32 {
            let name = self.next_name.get() + 1;
            self.next_name.set(name);
            self.created.set(self.created.get() + 1);
            self.live.borrow_mut().insert(object(name));
            name
        }

        fn delete(&self, object: Object) {
            assert!(self.live.borrow_mut().remove(&object), "double delete of {object:?}");
            self.deleted.set(self.deleted.get() + 1);
        }

        fn live(&self) -> usize {
            self.live.borrow().len()
        }

        fn assert_balanced(&self) {
            assert_eq!(self.live(), 0, "leaked objects: {:?}", self.live.borrow());
            assert_eq!(self.created.get(), self.deleted.get());
        }
    }

    impl ShaderBackend for MockGl {
        type Shader = u32;
        type Program = u32;
        type UniformLocation = u32;

        fn create_shader(&self, _kind: ShaderKind) -> std::result::Result<u32, String> {
            Ok(self.create(Object::Shader))
        }

        fn shader_source(&self, shader: u32, source: &str) {
            self.sources.borrow_mut().insert(shader, source.to_owned());
        }

        fn compile_shader(&self, shader: u32) {
            let ok = self
                .sources
                .borrow()
                .get(&shader)
                .is_some_and(|s| !s.contains(") }"));
            self.compiled.borrow_mut().insert(shader, ok);
        }

        fn shader_compile_status(&self, shader: u32) -> bool {
            self.compiled.borrow().get(&shader).copied().unwrap_or(false)
        }

        fn shader_info_log(&self, _shader: u32) -> String {
            COMPILE_LOG.to_owned()
        }

        fn delete_shader(&self, shader: u32) {
            self.delete(Object::Shader(shader));
        }

        fn create_program(&self) -> std::result::Result<u32, String> {
            if self.fail_create_program {
                return Err("out of memory".to_owned());
            }
            Ok(self.create(Object::Program))
        }

        fn attach_shader(&self, program: u32, shader: u32) {
            self.attached.borrow_mut().push((program, shader));
        }

        fn link_program(&self, _program: u32) {}

        fn program_link_status(&self, _program: u32) -> bool {
            !self.fail_link
        }

        fn program_info_log(&self, _program: u32) -> String {
            LINK_LOG.to_owned()
        }

        fn delete_program(&self, program: u32) {
            self.delete(Object::Program(program));
        }

        fn uniform_location(&self, _program: u32, name: &str) -> Option<u32> {
            match name {
                "mvp" => Some(0),
                "tint" => Some(1),
                _ => None,
            }
        }

        fn attrib_location(&self, _program: u32, name: &str) -> Option<u32> {
            match name {
                "vs_position" => Some(0),
                "vs_color" => Some(1),
                _ => None,
            }
        }
    }

    fn write_temp(name: &str, contents: &str) -> PathBuf {
        let dir = std::env::temp_dir().join(format!("coreglut-{}", std::process::id()));
        std::fs::create_dir_all(&dir).unwrap();
        let path = dir.join(name);
        std::fs::write(&path, contents).unwrap();
        path
    }

    #[test]
    fn compile_failure_deletes_shader_and_reports_log() {
        let gl = MockGl::default();

        let err = compile_shader(&gl, BROKEN_FS, ShaderKind::Fragment).unwrap_err();

        match &err {
            Error::ShaderCompile { kind, log } => {
                assert_eq!(*kind, ShaderKind::Fragment);
                assert_eq!(log, COMPILE_LOG);
            }
            other => panic!("unexpected error: {other:?}"),
        }
        assert!(err.to_string().contains(COMPILE_LOG));
        assert_eq!(gl.created.get(), 1);
        gl.assert_balanced();
    }

    #[test]
    fn compiled_shader_is_owned_by_caller() {
        let gl = MockGl::default();

        let shader = compile_shader(&gl, VALID_VS, ShaderKind::Vertex).unwrap();

        assert_eq!(gl.live(), 1);
        assert!(gl.live.borrow().contains(&Object::Shader(shader)));
        gl.delete_shader(shader);
        gl.assert_balanced();
    }

    #[test]
    fn load_shader_reads_file() {
        let gl = MockGl::default();
        let path = write_temp("load_ok.vert", VALID_VS);

        let shader = load_shader(&gl, &path, ShaderKind::Vertex).unwrap();

        assert_eq!(gl.sources.borrow()[&shader], VALID_VS);
    }

    #[test]
    fn load_shader_failure_from_file_deletes_shader() {
        let gl = MockGl::default();
        let path = write_temp("load_broken.frag", BROKEN_FS);

        let err = load_shader(&gl, &path, ShaderKind::Fragment).unwrap_err();

        assert!(err.to_string().contains(COMPILE_LOG), "{err}");
        gl.assert_balanced();
    }

    #[test]
    fn missing_file_creates_nothing() {
        let gl = MockGl::default();
        let path = std::env::temp_dir().join("coreglut-does-not-exist.vert");

        let err = load_shader(&gl, &path, ShaderKind::Vertex).unwrap_err();

        assert!(matches!(err, Error::Io { .. }), "{err:?}");
        assert_eq!(gl.created.get(), 0);
    }

    #[test]
    fn program_links_and_flags_shaders_for_deletion() {
        let gl = MockGl::default();

        let program = load_shaders(&gl, VALID_VS, VALID_FS).unwrap();

        // Only the program survives; both shaders were attached before deletion.
        assert_eq!(
            gl.live.borrow().iter().copied().collect::<Vec<_>>(),
            [Object::Program(program)]
        );
        assert_eq!(gl.attached.borrow().len(), 2);
        assert!(gl.attached.borrow().iter().all(|(p, _)| *p == program));
        assert_eq!(gl.created.get(), 3);
    }

    #[test]
    fn broken_fragment_shader_leaves_nothing_allocated() {
        let gl = MockGl::default();
        let vertex = write_temp("program_ok.vert", VALID_VS);
        let fragment = write_temp("program_broken.frag", BROKEN_FS);

        let err = create_program(&gl, &vertex, &fragment).unwrap_err();

        assert!(
            matches!(
                &err,
                Error::ShaderCompile { kind: ShaderKind::Fragment, log } if log == COMPILE_LOG
            ),
            "{err:?}"
        );
        // program, vertex shader, fragment shader
        assert_eq!(gl.created.get(), 3);
        gl.assert_balanced();
    }

    #[test]
    fn broken_vertex_shader_leaves_nothing_allocated() {
        let gl = MockGl::default();

        let err = load_shaders(&gl, BROKEN_FS, VALID_FS).unwrap_err();

        assert!(matches!(err, Error::ShaderCompile { kind: ShaderKind::Vertex, .. }));
        // The fragment stage is never attempted.
        assert_eq!(gl.created.get(), 2);
        gl.assert_balanced();
    }

    #[test]
    fn link_failure_leaves_nothing_allocated() {
        let gl = MockGl::failing_link();

        let err = load_shaders(&gl, VALID_VS, VALID_FS).unwrap_err();

        match &err {
            Error::ProgramLink { log } => assert_eq!(log, LINK_LOG),
            other => panic!("unexpected error: {other:?}"),
        }
        assert!(err.to_string().contains(LINK_LOG));
        gl.assert_balanced();
    }

    #[test]
    fn missing_shader_file_releases_program() {
        let gl = MockGl::default();
        let vertex = write_temp("program_missing_frag.vert", VALID_VS);
        let fragment = std::env::temp_dir().join("coreglut-missing.frag");

        let err = create_program(&gl, &vertex, &fragment).unwrap_err();

        assert!(matches!(err, Error::Io { .. }), "{err:?}");
        gl.assert_balanced();
    }

    #[test]
    fn program_creation_failure_is_reported() {
        let gl = MockGl {
            fail_create_program: true,
            ..Default::default()
        };

        let err = load_shaders(&gl, VALID_VS, VALID_FS).unwrap_err();

        assert!(matches!(err, Error::ObjectCreation { what: "program", .. }));
        assert_eq!(gl.created.get(), 0);
    }

    #[test]
    fn locations_follow_name_order_and_pass_through_misses() {
        let gl = MockGl::default();
        let program = load_shaders(&gl, VALID_VS, VALID_FS).unwrap();

        let uniforms = uniform_locations(&gl, program, &["tint", "nope", "mvp"]);
        assert_eq!(uniforms, [Some(1), None, Some(0)]);

        let attributes =
            attribute_locations(&gl, program, &["vs_color", "vs_position", "vs_normal"]);
        assert_eq!(attributes, [Some(1), Some(0), None]);

        assert!(uniform_locations(&gl, program, &[]).is_empty());
    }
}
