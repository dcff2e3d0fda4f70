use std::path::PathBuf;

use crate::load_shaders::ShaderKind;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(thiserror::Error, Debug)]
pub enum Error {
    /// SDL, window or GL context setup failed.
    #[error("initialization error: {0}")]
    Init(String),

    #[error("unable to read {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The driver refused to hand out a new object name.
    #[error("unable to create {what}: {reason}")]
    ObjectCreation { what: &'static str, reason: String },

    #[error("unable to compile {kind} shader. Info log:\n{log}")]
    ShaderCompile { kind: ShaderKind, log: String },

    #[error("unable to link program. Info log:\n{log}")]
    ProgramLink { log: String },

    #[error("{what}: gl error(s) {codes:?}")]
    Gl { what: String, codes: Vec<u32> },

    #[error("attribute `{0}` not found in program")]
    MissingAttribute(String),
}

impl Error {
    pub fn init(detail: impl std::fmt::Display) -> Self {
        Self::Init(detail.to_string())
    }

    pub(crate) fn object_creation(what: &'static str, reason: String) -> Self {
        Self::ObjectCreation { what, reason }
    }
}
