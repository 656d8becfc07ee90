//! Vertex format of the frame painter.
//!
//! Every draw call of a frame ends up as flat-coloured triangles in one shared
//! vertex buffer, so a vertex only carries a clip-space position and a colour.

/// A vertex in the frame painter's triangle list.
///
/// # Memory Layout
/// - Position: [f32; 2] (8 bytes)
/// - Color: [f32; 4] (16 bytes)
///
/// Total size: 24 bytes
///
/// # GPU Representation
///
/// In the shader, this corresponds to:
/// ```wgsl
/// struct VertexInput {
///     @location(0) position: vec2<f32>,
///     @location(1) color: vec4<f32>,
/// }
/// ```
#[repr(C)]
#[derive(Copy, Clone, Debug, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
pub struct PaintVertex {
    /// Position in normalized device coordinates, y up
    pub position: [f32; 2],
    /// Straight-alpha colour, already in the target's colour space
    pub color: [f32; 4],
}

impl PaintVertex {
    /// Creates a vertex.
    pub fn new(position: [f32; 2], color: [f32; 4]) -> Self {
        Self { position, color }
    }

    /// Returns the vertex buffer layout description for the painter pipeline.
    ///
    /// # Shader Attributes
    /// - `location = 0`: position (vec2<f32>)
    /// - `location = 1`: color (vec4<f32>)
    pub fn desc<'a>() -> wgpu::VertexBufferLayout<'a> {
        wgpu::VertexBufferLayout {
            array_stride: std::mem::size_of::<PaintVertex>() as wgpu::BufferAddress,
            step_mode: wgpu::VertexStepMode::Vertex,
            attributes: &[
                wgpu::VertexAttribute {
                    offset: 0,
                    shader_location: 0,
                    format: wgpu::VertexFormat::Float32x2,
                },
                wgpu::VertexAttribute {
                    offset: std::mem::size_of::<[f32; 2]>() as wgpu::BufferAddress,
                    shader_location: 1,
                    format: wgpu::VertexFormat::Float32x4,
                },
            ],
        }
    }
}
