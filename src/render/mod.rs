pub mod mesh;

use crate::animation::{advance_offset, OffsetParams, OffsetState};
use crate::shader::{GlDevice, ShaderProgram};
use mesh::TriangleMesh;

pub use mesh::{COLORS, POSITIONS};

pub const MODEL_UNIFORM: &str = "model";

/// Draws the triangle once per frame and sweeps it left and right.
pub struct TriangleRenderer {
    program: ShaderProgram<GlDevice>,
    mesh: TriangleMesh,
    params: OffsetParams,
    state: OffsetState,
}

impl TriangleRenderer {
    pub fn new(mut program: ShaderProgram<GlDevice>, mesh: TriangleMesh, params: OffsetParams) -> Self {
        // Resolve once so a missing uniform is reported at startup.
        program.uniform_location(MODEL_UNIFORM);
        Self {
            program,
            mesh,
            params,
            state: OffsetState::default(),
        }
    }

    pub fn offset(&self) -> OffsetState {
        self.state
    }

    /// Issues the draw for the current offset, then advances it.
    pub fn draw(&mut self) {
        let model = self.state.model_matrix();

        self.mesh.bind();
        self.program.bind();
        self.program.set_uniform_mat4(MODEL_UNIFORM, &model);
        unsafe {
            gl::DrawArrays(gl::TRIANGLES, 0, self.mesh.vertex_count());
        }
        self.program.unbind();
        self.mesh.unbind();

        self.state = advance_offset(self.state, &self.params);
    }

    /// Deletes the program and buffers. The context must still be current.
    pub fn destroy(self) {
        let TriangleRenderer { program, mesh, .. } = self;
        program.destroy();
        drop(mesh);
        log::info!("Renderer resources released");
    }
}
