pub mod animation;
pub mod config;
pub mod render;
pub mod shader;

// Re-export commonly used types
pub use animation::{advance_offset, OffsetParams, OffsetState};
pub use config::{AppConfig, ConfigError};
pub use render::TriangleRenderer;
pub use shader::{build_program, parse_shader_source, ShaderError, ShaderProgram, ShaderSource};
