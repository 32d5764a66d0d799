pub mod device;
pub mod program;
pub mod source;

use std::ffi::NulError;
use std::fmt;
use std::path::PathBuf;
use thiserror::Error;

pub use device::{GlDevice, ShaderDevice};
pub use program::{build_program, compile_stage, create_program, CompiledStage, ShaderProgram};
pub use source::{parse_shader_source, ShaderSource};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ShaderStage {
    Vertex,
    Fragment,
}

impl ShaderStage {
    pub fn gl_type(self) -> gl::types::GLenum {
        match self {
            ShaderStage::Vertex => gl::VERTEX_SHADER,
            ShaderStage::Fragment => gl::FRAGMENT_SHADER,
        }
    }
}

impl fmt::Display for ShaderStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ShaderStage::Vertex => f.write_str("vertex"),
            ShaderStage::Fragment => f.write_str("fragment"),
        }
    }
}

#[derive(Debug, Error)]
pub enum ShaderError {
    #[error("Shader resource not found: {}", path.display())]
    ResourceNotFound {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("The {stage} shader source contains a nul byte")]
    InvalidSource {
        stage: ShaderStage,
        #[source]
        source: NulError,
    },
    #[error("Failed to compile {stage} shader: {log}")]
    Compile { stage: ShaderStage, log: String },
    #[error("Failed to link program: {log}")]
    Link { log: String },
    #[error("Failed to validate program: {log}")]
    Validation { log: String },
}
