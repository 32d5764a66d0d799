use gl::types::*;
use std::mem;
use std::ptr;

pub const POSITION_ATTRIBUTE: GLuint = 0;
pub const COLOR_ATTRIBUTE: GLuint = 1;

pub const POSITIONS: [[f32; 2]; 3] = [
    [-0.5, -0.5], // left
    [0.0, 0.5],   // top
    [0.5, -0.5],  // right
];

pub const COLORS: [[f32; 4]; 3] = [
    [1.0, 0.0, 0.0, 1.0],
    [0.0, 1.0, 0.0, 1.0],
    [0.0, 0.0, 1.0, 1.0],
];

/// The static triangle: one vertex array with a position buffer and a colour
/// buffer. Needs a current context for its whole life.
pub struct TriangleMesh {
    vao: GLuint,
    buffers: [GLuint; 2],
}

impl TriangleMesh {
    pub fn upload() -> Self {
        let mut vao = 0;
        let mut buffers = [0; 2];

        unsafe {
            gl::GenVertexArrays(1, &mut vao);
            gl::BindVertexArray(vao);
            gl::GenBuffers(2, buffers.as_mut_ptr());

            upload_attribute(buffers[0], POSITION_ATTRIBUTE, 2, bytemuck::cast_slice(&POSITIONS));
            upload_attribute(buffers[1], COLOR_ATTRIBUTE, 4, bytemuck::cast_slice(&COLORS));

            gl::BindVertexArray(0);
        }

        log::debug!("Uploaded triangle mesh (vao {}, buffers {:?})", vao, buffers);
        Self { vao, buffers }
    }

    pub fn vertex_count(&self) -> GLsizei {
        POSITIONS.len() as GLsizei
    }

    pub fn bind(&self) {
        unsafe { gl::BindVertexArray(self.vao) };
    }

    pub fn unbind(&self) {
        unsafe { gl::BindVertexArray(0) };
    }
}

/// Fills `buffer` with tightly packed float data and points `attribute` at it.
/// The target vertex array must be bound.
unsafe fn upload_attribute(buffer: GLuint, attribute: GLuint, components: GLint, data: &[u8]) {
    gl::BindBuffer(gl::ARRAY_BUFFER, buffer);
    gl::BufferData(
        gl::ARRAY_BUFFER,
        data.len() as GLsizeiptr,
        data.as_ptr() as *const _,
        gl::STATIC_DRAW,
    );
    gl::VertexAttribPointer(
        attribute,
        components,
        gl::FLOAT,
        gl::FALSE,
        components * mem::size_of::<f32>() as GLsizei,
        ptr::null(),
    );
    gl::EnableVertexAttribArray(attribute);
    gl::BindBuffer(gl::ARRAY_BUFFER, 0);
}

impl Drop for TriangleMesh {
    fn drop(&mut self) {
        unsafe {
            gl::DeleteBuffers(2, self.buffers.as_ptr());
            gl::DeleteVertexArrays(1, &self.vao);
        }
    }
}
