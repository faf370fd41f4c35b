//! Module for anything related to rendering.
//!
//! This module drives the render loop from `objview-core` with OpenGL and owns the
//! shaders used by the viewer.

use glam::Vec4;
use glow::HasContext;
use objview_core::{render::RenderBackend, transform::TransformSet};

use crate::abs::{App, Mesh, ShaderProgram};

/// Renders through the window and context owned by an [`App`].
pub struct GlBackend<'a> {
    app: &'a mut App,
    program: &'a ShaderProgram,
    closed: bool,
}

impl<'a> GlBackend<'a> {
    /// Binds `program` and prepares the fixed pipeline state.
    pub fn new(app: &'a mut App, program: &'a ShaderProgram) -> Self {
        unsafe {
            app.gl.enable(glow::DEPTH_TEST);
        }
        program.use_program();

        Self {
            app,
            program,
            closed: false,
        }
    }
}

impl RenderBackend for GlBackend<'_> {
    type Shape = Mesh;

    fn close_requested(&mut self) -> bool {
        self.closed
    }

    fn clear(&mut self, color: Vec4) {
        unsafe {
            self.app.gl.clear_color(color.x, color.y, color.z, color.w);
            self.app
                .gl
                .clear(glow::COLOR_BUFFER_BIT | glow::DEPTH_BUFFER_BIT);
        }
    }

    fn upload_transforms(&mut self, transforms: &TransformSet) {
        self.program.set_uniform("model", transforms.model);
        self.program.set_uniform("view", transforms.view);
        self.program.set_uniform("projection", transforms.projection);
    }

    fn draw_shape(&mut self, shape: &Mesh) {
        shape.draw();
    }

    fn present(&mut self) {
        self.app.window.gl_swap_window();
        if self.app.poll_close() {
            log::info!("Window close requested");
            self.closed = true;
        }
    }
}
