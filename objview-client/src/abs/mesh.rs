//! Mesh management module.
//!
//! A [`VertexBuffer`] holds the vertices of a whole model and is shared by every
//! [`Mesh`]. Each mesh owns its index buffer and a vertex array object that ties
//! the two together. Vertices should implement the [`Vertex`] trait.

use std::{rc::Rc, sync::Arc};

use glow::HasContext;
use objview_core::geometry::{MeshVertex, drawable_index_count};

use crate::error::ViewerError;

/// Trait that defines the necessary methods for a vertex.
pub trait Vertex: bytemuck::Pod {
    /// Sets up the vertex attribute pointers for the vertex.
    fn vertex_attribs(gl: &glow::Context);
}

impl Vertex for MeshVertex {
    fn vertex_attribs(gl: &glow::Context) {
        unsafe {
            let stride = size_of::<MeshVertex>() as i32;

            // Position attribute
            gl.enable_vertex_attrib_array(0);
            gl.vertex_attrib_pointer_f32(0, 3, glow::FLOAT, false, stride, 0);

            // Texture coordinate attribute
            gl.enable_vertex_attrib_array(1);
            gl.vertex_attrib_pointer_f32(
                1,
                2,
                glow::FLOAT,
                false,
                stride,
                size_of::<glam::Vec3>() as i32,
            );
        }
    }
}

/// Vertex data stored on the GPU side.
pub struct VertexBuffer {
    gl: Arc<glow::Context>,
    vbo: glow::Buffer,
    vertex_count: usize,
}

impl VertexBuffer {
    /// Uploads `vertices` into a new buffer.
    pub fn new<V: Vertex>(gl: &Arc<glow::Context>, vertices: &[V]) -> Result<Self, ViewerError> {
        unsafe {
            let vbo = gl.create_buffer().map_err(ViewerError::gl)?;
            gl.bind_buffer(glow::ARRAY_BUFFER, Some(vbo));
            gl.buffer_data_u8_slice(
                glow::ARRAY_BUFFER,
                bytemuck::cast_slice(vertices),
                glow::STATIC_DRAW,
            );
            gl.bind_buffer(glow::ARRAY_BUFFER, None);

            Ok(Self {
                gl: Arc::clone(gl),
                vbo,
                vertex_count: vertices.len(),
            })
        }
    }

    pub fn vertex_count(&self) -> usize {
        self.vertex_count
    }
}

impl Drop for VertexBuffer {
    fn drop(&mut self) {
        unsafe {
            self.gl.delete_buffer(self.vbo);
        }
    }
}

/// Represents an indexed triangle mesh stored on the GPU side.
pub struct Mesh {
    gl: Arc<glow::Context>,
    vao: glow::VertexArray,
    ebo: glow::Buffer,
    index_count: usize,
    _vertices: Rc<VertexBuffer>,
}

impl Mesh {
    /// Creates a new mesh drawing `indices` out of the shared `vertices`.
    pub fn new<V: Vertex>(
        gl: &Arc<glow::Context>,
        vertices: &Rc<VertexBuffer>,
        indices: &[u32],
    ) -> Result<Self, ViewerError> {
        unsafe {
            let vao = gl.create_vertex_array().map_err(ViewerError::gl)?;
            let ebo = match gl.create_buffer() {
                Ok(ebo) => ebo,
                Err(e) => {
                    gl.delete_vertex_array(vao);
                    return Err(ViewerError::gl(e));
                }
            };

            gl.bind_vertex_array(Some(vao));
            gl.bind_buffer(glow::ARRAY_BUFFER, Some(vertices.vbo));

            gl.bind_buffer(glow::ELEMENT_ARRAY_BUFFER, Some(ebo));
            gl.buffer_data_u8_slice(
                glow::ELEMENT_ARRAY_BUFFER,
                bytemuck::cast_slice(indices),
                glow::STATIC_DRAW,
            );

            V::vertex_attribs(gl);

            gl.bind_vertex_array(None);
            gl.bind_buffer(glow::ARRAY_BUFFER, None);
            gl.bind_buffer(glow::ELEMENT_ARRAY_BUFFER, None);

            Ok(Self {
                gl: Arc::clone(gl),
                vao,
                ebo,
                index_count: drawable_index_count(indices.len()),
                _vertices: Rc::clone(vertices),
            })
        }
    }

    /// Draws the mesh as a triangle list.
    pub fn draw(&self) {
        unsafe {
            self.gl.bind_vertex_array(Some(self.vao));
            self.gl.draw_elements(glow::TRIANGLES, self.index_count as i32, glow::UNSIGNED_INT, 0);
            self.gl.bind_vertex_array(None);
        }
    }

    // Returns the amount of of indices drawn by the mesh
    pub fn index_count(&self) -> usize {
        self.index_count
    }
}

impl Drop for Mesh {
    fn drop(&mut self) {
        unsafe {
            self.gl.delete_buffer(self.ebo);
            self.gl.delete_vertex_array(self.vao);
        }
    }
}
