use super::device::{GlDevice, ShaderDevice};
use super::source::ShaderSource;
use super::{ShaderError, ShaderStage};
use gl::types::*;
use glam::Mat4;
use std::collections::HashMap;
use std::ffi::CString;

const NO_LOG: &str = "no diagnostic log was provided";

fn non_empty(log: String) -> String {
    if log.trim().is_empty() {
        NO_LOG.to_string()
    } else {
        log
    }
}

/// A compiled, unlinked shader stage. Deleted on drop.
pub struct CompiledStage<D: ShaderDevice = GlDevice> {
    device: D,
    id: GLuint,
    stage: ShaderStage,
}

impl<D: ShaderDevice> CompiledStage<D> {
    pub fn id(&self) -> GLuint {
        self.id
    }

    pub fn stage(&self) -> ShaderStage {
        self.stage
    }
}

impl<D: ShaderDevice> Drop for CompiledStage<D> {
    fn drop(&mut self) {
        self.device.delete_shader(self.id);
    }
}

/// Compiles `source` as the complete source of one `stage`.
pub fn compile_stage<D: ShaderDevice>(
    device: &D,
    stage: ShaderStage,
    source: &str,
) -> Result<CompiledStage<D>, ShaderError> {
    let source =
        CString::new(source).map_err(|source| ShaderError::InvalidSource { stage, source })?;

    let id = device.create_shader(stage);
    if id == 0 {
        return Err(ShaderError::Compile {
            stage,
            log: "the device could not create a shader object".to_string(),
        });
    }
    let shader = CompiledStage {
        device: device.clone(),
        id,
        stage,
    };

    if !device.compile_shader(shader.id, &source) {
        let log = non_empty(device.shader_info_log(shader.id));
        return Err(ShaderError::Compile { stage, log });
    }

    log::debug!("Compiled {} shader {}", stage, shader.id);
    Ok(shader)
}

/// Links a vertex and a fragment stage into a validated program.
///
/// Both stages are consumed. Whatever the outcome, no device object created
/// here outlives a failed call.
pub fn create_program<D: ShaderDevice>(
    device: &D,
    vertex: CompiledStage<D>,
    fragment: CompiledStage<D>,
) -> Result<ShaderProgram<D>, ShaderError> {
    if vertex.stage != ShaderStage::Vertex || fragment.stage != ShaderStage::Fragment {
        return Err(ShaderError::Link {
            log: format!(
                "expected a vertex and a fragment stage, got {} and {}",
                vertex.stage, fragment.stage
            ),
        });
    }

    let id = device.create_program();
    if id == 0 {
        return Err(ShaderError::Link {
            log: "the device could not create a program object".to_string(),
        });
    }
    let program = ShaderProgram::from_raw(device.clone(), id);

    device.attach_shader(id, vertex.id);
    device.attach_shader(id, fragment.id);

    if !device.link_program(id) {
        let log = non_empty(device.program_info_log(id));
        return Err(ShaderError::Link { log });
    }
    log::debug!("Linked program {}", id);

    if !device.validate_program(id) {
        let log = non_empty(device.program_info_log(id));
        return Err(ShaderError::Validation { log });
    }

    // The linked program keeps its own executable.
    device.detach_shader(id, vertex.id);
    device.detach_shader(id, fragment.id);

    log::debug!("Program {} ready", id);
    Ok(program)
}

/// Compiles both stages of `source` and links them into a program.
pub fn build_program<D: ShaderDevice>(
    device: &D,
    source: &ShaderSource,
) -> Result<ShaderProgram<D>, ShaderError> {
    let vertex = compile_stage(device, ShaderStage::Vertex, &source.vertex)?;
    let fragment = compile_stage(device, ShaderStage::Fragment, &source.fragment)?;
    create_program(device, vertex, fragment)
}

/// A linked and validated shader program. Deleted on drop.
pub struct ShaderProgram<D: ShaderDevice = GlDevice> {
    device: D,
    id: GLuint,
    uniforms: HashMap<String, Option<GLint>>,
}

impl<D: ShaderDevice> ShaderProgram<D> {
    fn from_raw(device: D, id: GLuint) -> Self {
        Self {
            device,
            id,
            uniforms: HashMap::new(),
        }
    }

    pub fn id(&self) -> GLuint {
        self.id
    }

    pub fn bind(&self) {
        self.device.use_program(self.id);
    }

    pub fn unbind(&self) {
        self.device.use_program(0);
    }

    /// Looks up a uniform, caching the answer. Missing uniforms are reported
    /// once and yield `None`.
    pub fn uniform_location(&mut self, name: &str) -> Option<GLint> {
        if let Some(location) = self.uniforms.get(name) {
            return *location;
        }

        let location = match CString::new(name) {
            Ok(cname) => Some(self.device.uniform_location(self.id, &cname)).filter(|l| *l != -1),
            Err(_) => None,
        };
        if location.is_none() {
            log::warn!("Uniform '{}' not found in program {}", name, self.id);
        }

        self.uniforms.insert(name.to_string(), location);
        location
    }

    /// Uploads `matrix` to a mat4 uniform. The program must be bound.
    pub fn set_uniform_mat4(&mut self, name: &str, matrix: &Mat4) {
        if let Some(location) = self.uniform_location(name) {
            self.device.uniform_matrix4(location, &matrix.to_cols_array());
        }
    }

    /// Releases the program now rather than at end of scope.
    pub fn destroy(self) {
        drop(self);
    }
}

impl<D: ShaderDevice> Drop for ShaderProgram<D> {
    fn drop(&mut self) {
        log::debug!("Deleting program {}", self.id);
        self.device.delete_program(self.id);
    }
}
