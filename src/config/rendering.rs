use serde::{Deserialize, Serialize};
use std::path::PathBuf;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RenderConfig {
    /// Tagged file holding both shader stages.
    pub shader_path: PathBuf,
    pub vsync: bool,
    pub clear_color: [f32; 4],
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            shader_path: PathBuf::from("res/shaders/Base.shader"),
            vsync: true,
            clear_color: [0.02, 0.02, 0.02, 1.0],
        }
    }
}
