use super::ShaderStage;
use gl::types::*;
use std::ffi::{c_void, CStr};
use std::ptr;

/// Device calls used to build and drive a shader program.
///
/// Object ids are the raw GL names. Implementations are cheap handles;
/// compiled stages and programs keep a clone so they can release
/// themselves on drop.
pub trait ShaderDevice: Clone {
    fn create_shader(&self, stage: ShaderStage) -> GLuint;
    /// Uploads `source` as the whole compilation unit and compiles it.
    /// Returns the compile status.
    fn compile_shader(&self, shader: GLuint, source: &CStr) -> bool;
    fn shader_info_log(&self, shader: GLuint) -> String;
    fn delete_shader(&self, shader: GLuint);

    fn create_program(&self) -> GLuint;
    fn attach_shader(&self, program: GLuint, shader: GLuint);
    fn detach_shader(&self, program: GLuint, shader: GLuint);
    fn link_program(&self, program: GLuint) -> bool;
    fn validate_program(&self, program: GLuint) -> bool;
    fn program_info_log(&self, program: GLuint) -> String;
    fn delete_program(&self, program: GLuint);

    fn use_program(&self, program: GLuint);
    fn uniform_location(&self, program: GLuint, name: &CStr) -> GLint;
    fn uniform_matrix4(&self, location: GLint, columns: &[f32; 16]);
}

/// [`ShaderDevice`] backed by the global `gl` function pointers.
///
/// Only obtainable through [`GlDevice::load_with`], so holding one means the
/// functions have been loaded for a current context.
#[derive(Debug, Clone, Copy)]
pub struct GlDevice {
    _loaded: (),
}

impl GlDevice {
    pub fn load_with<F>(loader: F) -> Self
    where
        F: FnMut(&'static str) -> *const c_void,
    {
        gl::load_with(loader);
        log::info!("OpenGL functions loaded");
        Self { _loaded: () }
    }

    /// Driver version string, if the context reports one.
    pub fn version(&self) -> Option<String> {
        let version = unsafe { gl::GetString(gl::VERSION) };
        if version.is_null() {
            return None;
        }
        let version = unsafe { CStr::from_ptr(version as *const _) };
        Some(version.to_string_lossy().into_owned())
    }
}

/// Converts a GL info log buffer into a string, dropping the nul terminator.
fn info_log_to_string(mut buffer: Vec<u8>, written: GLsizei) -> String {
    buffer.truncate(written.max(0) as usize);
    String::from_utf8_lossy(&buffer).trim_end().to_string()
}

impl ShaderDevice for GlDevice {
    fn create_shader(&self, stage: ShaderStage) -> GLuint {
        unsafe { gl::CreateShader(stage.gl_type()) }
    }

    fn compile_shader(&self, shader: GLuint, source: &CStr) -> bool {
        let mut success = 0;
        unsafe {
            gl::ShaderSource(shader, 1, &source.as_ptr(), ptr::null());
            gl::CompileShader(shader);
            gl::GetShaderiv(shader, gl::COMPILE_STATUS, &mut success);
        }
        success != 0
    }

    fn shader_info_log(&self, shader: GLuint) -> String {
        let mut len = 0;
        unsafe {
            gl::GetShaderiv(shader, gl::INFO_LOG_LENGTH, &mut len);
        }

        let mut buffer = vec![0u8; len.max(1) as usize];
        let mut written = 0;
        unsafe {
            gl::GetShaderInfoLog(
                shader,
                buffer.len() as GLsizei,
                &mut written,
                buffer.as_mut_ptr() as *mut GLchar,
            );
        }
        info_log_to_string(buffer, written)
    }

    fn delete_shader(&self, shader: GLuint) {
        unsafe { gl::DeleteShader(shader) };
    }

    fn create_program(&self) -> GLuint {
        unsafe { gl::CreateProgram() }
    }

    fn attach_shader(&self, program: GLuint, shader: GLuint) {
        unsafe { gl::AttachShader(program, shader) };
    }

    fn detach_shader(&self, program: GLuint, shader: GLuint) {
        unsafe { gl::DetachShader(program, shader) };
    }

    fn link_program(&self, program: GLuint) -> bool {
        let mut success = 0;
        unsafe {
            gl::LinkProgram(program);
            gl::GetProgramiv(program, gl::LINK_STATUS, &mut success);
        }
        success != 0
    }

    fn validate_program(&self, program: GLuint) -> bool {
        let mut success = 0;
        unsafe {
            gl::ValidateProgram(program);
            gl::GetProgramiv(program, gl::VALIDATE_STATUS, &mut success);
        }
        success != 0
    }

    fn program_info_log(&self, program: GLuint) -> String {
        let mut len = 0;
        unsafe {
            gl::GetProgramiv(program, gl::INFO_LOG_LENGTH, &mut len);
        }

        let mut buffer = vec![0u8; len.max(1) as usize];
        let mut written = 0;
        unsafe {
            gl::GetProgramInfoLog(
                program,
                buffer.len() as GLsizei,
                &mut written,
                buffer.as_mut_ptr() as *mut GLchar,
            );
        }
        info_log_to_string(buffer, written)
    }

    fn delete_program(&self, program: GLuint) {
        unsafe { gl::DeleteProgram(program) };
    }

    fn use_program(&self, program: GLuint) {
        unsafe { gl::UseProgram(program) };
    }

    fn uniform_location(&self, program: GLuint, name: &CStr) -> GLint {
        unsafe { gl::GetUniformLocation(program, name.as_ptr()) }
    }

    fn uniform_matrix4(&self, location: GLint, columns: &[f32; 16]) {
        unsafe { gl::UniformMatrix4fv(location, 1, gl::FALSE, columns.as_ptr()) };
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_info_log_drops_terminator_and_padding() {
        let buffer = b"0:1: error: syntax\n\0\0\0".to_vec();
        assert_eq!(info_log_to_string(buffer, 19), "0:1: error: syntax");
    }

    #[test]
    fn test_info_log_empty() {
        assert_eq!(info_log_to_string(vec![0], 0), "");
    }
}
