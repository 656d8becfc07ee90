//! GPU back end of the [`Canvas`] boundary.
//!
//! A frame is built on the CPU as a [`PaintList`]: every draw call is
//! tessellated into flat-coloured triangles appended to one vertex and index
//! list. The [`FramePainter`] then uploads the list and draws it with a single
//! alpha-blended pipeline. There is no depth buffer, so triangles composite in
//! exactly the order the draw calls were made.

use std::f32::consts::TAU;

use cgmath::{InnerSpace, Point2, Vector2};
use log::{debug, error};
use wgpu::{Buffer, Device, Queue, RenderPipeline, Surface, SurfaceConfiguration, TextureFormat};

use super::{color::Rgba, vertex::PaintVertex, Canvas};

/// Painter shader, embedded at build time.
const PAINTER_SHADER: &str = include_str!("../../../assets/shaders/painter.wgsl");

/// Rim vertices used to approximate a circle.
const CIRCLE_SEGMENTS: u32 = 32;

/// Initial capacity of the GPU buffers, in elements.
const INITIAL_VERTEX_CAPACITY: u64 = 16 * 1024;
const INITIAL_INDEX_CAPACITY: u64 = 32 * 1024;

/// One frame's worth of tessellated draw calls.
#[derive(Debug)]
pub struct PaintList {
    width: f32,
    height: f32,
    linear_output: bool,
    clear_color: Rgba,
    vertices: Vec<PaintVertex>,
    indices: Vec<u32>,
}

impl PaintList {
    /// Creates an empty list for a viewport.
    ///
    /// # Arguments
    /// * `width` - Viewport width in pixels
    /// * `height` - Viewport height in pixels
    /// * `linear_output` - Whether colours must be converted to linear light,
    ///   which is the case for sRGB render targets
    pub fn new(width: f32, height: f32, linear_output: bool) -> Self {
        Self {
            width,
            height,
            linear_output,
            clear_color: Rgba::BLACK,
            vertices: Vec::new(),
            indices: Vec::new(),
        }
    }

    /// Empties the list and adopts a new viewport size.
    pub fn reset(&mut self, width: f32, height: f32) {
        self.width = width;
        self.height = height;
        self.clear_color = Rgba::BLACK;
        self.vertices.clear();
        self.indices.clear();
    }

    /// The tessellated vertices.
    pub fn vertices(&self) -> &[PaintVertex] {
        &self.vertices
    }

    /// Triangle indices into [`PaintList::vertices`].
    pub fn indices(&self) -> &[u32] {
        &self.indices
    }

    /// The background colour of the frame.
    pub fn clear_color(&self) -> Rgba {
        self.clear_color
    }

    /// Whether nothing but the background will be drawn.
    pub fn is_empty(&self) -> bool {
        self.indices.is_empty()
    }

    fn encode_color(&self, color: Rgba) -> [f32; 4] {
        if self.linear_output {
            color.to_linear()
        } else {
            color.to_array()
        }
    }

    /// Converts a pixel position to normalized device coordinates.
    fn to_ndc(&self, point: Point2<f32>) -> [f32; 2] {
        [
            point.x / self.width * 2.0 - 1.0,
            1.0 - point.y / self.height * 2.0,
        ]
    }

    /// Appends a triangle fan around the first point.
    fn push_fan(&mut self, points: &[Point2<f32>], color: Rgba) {
        if points.len() < 3 {
            return;
        }
        let color = self.encode_color(color);
        let base = self.vertices.len() as u32;
        for &point in points {
            let position = self.to_ndc(point);
            self.vertices.push(PaintVertex::new(position, color));
        }
        for i in 1..points.len() as u32 - 1 {
            self.indices.extend_from_slice(&[base, base + i, base + i + 1]);
        }
    }
}

impl Canvas for PaintList {
    fn viewport(&self) -> (f32, f32) {
        (self.width, self.height)
    }

    fn clear(&mut self, color: Rgba) {
        self.clear_color = color;
        self.vertices.clear();
        self.indices.clear();
    }

    fn fill_polygon(&mut self, points: &[Point2<f32>], color: Rgba) {
        self.push_fan(points, color);
    }

    fn stroke_segment(&mut self, from: Point2<f32>, to: Point2<f32>, width: f32, color: Rgba) {
        let along = to - from;
        if along.magnitude2() <= f32::EPSILON {
            return;
        }
        let normal = Vector2::new(-along.y, along.x).normalize() * (width / 2.0);
        self.push_fan(&[from + normal, to + normal, to - normal, from - normal], color);
    }

    fn fill_circle(&mut self, center: Point2<f32>, radius: f32, color: Rgba) {
        if radius <= 0.0 {
            return;
        }
        let rim: Vec<Point2<f32>> = (0..CIRCLE_SEGMENTS)
            .map(|i| {
                let angle = TAU * i as f32 / CIRCLE_SEGMENTS as f32;
                center + Vector2::new(angle.cos(), angle.sin()) * radius
            })
            .collect();
        self.push_fan(&rim, color);
    }
}

/// Draws [`PaintList`]s to a window surface.
pub struct FramePainter {
    surface: Surface<'static>,
    surface_config: SurfaceConfiguration,
    device: Device,
    queue: Queue,
    render_pipeline: RenderPipeline,
    vertex_buffer: Buffer,
    vertex_capacity: u64,
    index_buffer: Buffer,
    index_capacity: u64,
}

impl FramePainter {
    /// Creates the painter pipeline for a configured surface.
    ///
    /// # Arguments
    /// * `surface` - The window surface, already configured with `surface_config`
    /// * `surface_config` - Size and format of the surface
    /// * `device` - The WebGPU device
    /// * `queue` - The WebGPU queue for uploads and submission
    pub fn new(
        surface: Surface<'static>,
        surface_config: SurfaceConfiguration,
        device: Device,
        queue: Queue,
    ) -> Self {
        let shader = device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some("Painter Shader"),
            source: wgpu::ShaderSource::Wgsl(PAINTER_SHADER.into()),
        });

        let render_pipeline = Self::create_render_pipeline(&device, &shader, surface_config.format);

        let vertex_buffer = Self::create_buffer(
            &device,
            "Painter Vertex Buffer",
            INITIAL_VERTEX_CAPACITY * std::mem::size_of::<PaintVertex>() as u64,
            wgpu::BufferUsages::VERTEX,
        );
        let index_buffer = Self::create_buffer(
            &device,
            "Painter Index Buffer",
            INITIAL_INDEX_CAPACITY * std::mem::size_of::<u32>() as u64,
            wgpu::BufferUsages::INDEX,
        );

        Self {
            surface,
            surface_config,
            device,
            queue,
            render_pipeline,
            vertex_buffer,
            vertex_capacity: INITIAL_VERTEX_CAPACITY,
            index_buffer,
            index_capacity: INITIAL_INDEX_CAPACITY,
        }
    }

    /// Creates the alpha-blended triangle pipeline.
    ///
    /// # Arguments
    /// * `device` - The WebGPU device
    /// * `shader` - The shader module containing `vs_main` and `fs_main`
    /// * `format` - The texture format of the render target
    ///
    /// # Returns
    /// A pipeline without depth testing or face culling.
    fn create_render_pipeline(
        device: &Device,
        shader: &wgpu::ShaderModule,
        format: TextureFormat,
    ) -> RenderPipeline {
        let pipeline_layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
            label: Some("Painter Pipeline Layout"),
            bind_group_layouts: &[],
            push_constant_ranges: &[],
        });

        device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
            label: Some("Painter Render Pipeline"),
            layout: Some(&pipeline_layout),
            vertex: wgpu::VertexState {
                module: shader,
                entry_point: Some("vs_main"),
                buffers: &[PaintVertex::desc()],
                compilation_options: Default::default(),
            },
            fragment: Some(wgpu::FragmentState {
                module: shader,
                entry_point: Some("fs_main"),
                compilation_options: Default::default(),
                targets: &[Some(wgpu::ColorTargetState {
                    format,
                    blend: Some(wgpu::BlendState {
                        color: wgpu::BlendComponent {
                            src_factor: wgpu::BlendFactor::SrcAlpha,
                            dst_factor: wgpu::BlendFactor::OneMinusSrcAlpha,
                            operation: wgpu::BlendOperation::Add,
                        },
                        alpha: wgpu::BlendComponent {
                            src_factor: wgpu::BlendFactor::One,
                            dst_factor: wgpu::BlendFactor::OneMinusSrcAlpha,
                            operation: wgpu::BlendOperation::Add,
                        },
                    }),
                    write_mask: wgpu::ColorWrites::ALL,
                })],
            }),
            primitive: wgpu::PrimitiveState {
                topology: wgpu::PrimitiveTopology::TriangleList,
                strip_index_format: None,
                front_face: wgpu::FrontFace::Ccw,
                cull_mode: None,
                polygon_mode: wgpu::PolygonMode::Fill,
                unclipped_depth: false,
                conservative: false,
            },
            depth_stencil: None,
            multisample: wgpu::MultisampleState::default(),
            multiview: None,
            cache: None,
        })
    }

    fn create_buffer(device: &Device, label: &str, size: u64, usage: wgpu::BufferUsages) -> Buffer {
        device.create_buffer(&wgpu::BufferDescriptor {
            label: Some(label),
            size,
            usage: usage | wgpu::BufferUsages::COPY_DST,
            mapped_at_creation: false,
        })
    }

    /// Starts a paint list matching the current surface.
    pub fn begin_frame(&self) -> PaintList {
        PaintList::new(
            self.surface_config.width as f32,
            self.surface_config.height as f32,
            self.surface_config.format.is_srgb(),
        )
    }

    /// Current surface size in pixels.
    pub fn size(&self) -> (u32, u32) {
        (self.surface_config.width, self.surface_config.height)
    }

    /// Reconfigures the surface for a new window size.
    ///
    /// Zero sizes (a minimised window) are ignored.
    pub fn resize(&mut self, width: u32, height: u32) {
        if width == 0 || height == 0 {
            return;
        }
        self.surface_config.width = width;
        self.surface_config.height = height;
        self.surface.configure(&self.device, &self.surface_config);
    }

    /// Grows the GPU buffers so that `list` fits.
    fn reserve(&mut self, list: &PaintList) {
        let vertices = list.vertices().len() as u64;
        if vertices > self.vertex_capacity {
            self.vertex_capacity = vertices.next_power_of_two();
            self.vertex_buffer = Self::create_buffer(
                &self.device,
                "Painter Vertex Buffer",
                self.vertex_capacity * std::mem::size_of::<PaintVertex>() as u64,
                wgpu::BufferUsages::VERTEX,
            );
            debug!("Grew painter vertex buffer to {} vertices", self.vertex_capacity);
        }

        let indices = list.indices().len() as u64;
        if indices > self.index_capacity {
            self.index_capacity = indices.next_power_of_two();
            self.index_buffer = Self::create_buffer(
                &self.device,
                "Painter Index Buffer",
                self.index_capacity * std::mem::size_of::<u32>() as u64,
                wgpu::BufferUsages::INDEX,
            );
            debug!("Grew painter index buffer to {} indices", self.index_capacity);
        }
    }

    /// Draws a paint list and presents it.
    ///
    /// A lost or outdated surface is reconfigured and the frame skipped; a
    /// timeout skips the frame. Other surface errors are logged.
    pub fn render(&mut self, list: &PaintList) {
        let frame = match self.surface.get_current_texture() {
            Ok(frame) => frame,
            Err(wgpu::SurfaceError::Lost | wgpu::SurfaceError::Outdated) => {
                debug!("Surface lost or outdated, reconfiguring");
                self.surface.configure(&self.device, &self.surface_config);
                return;
            }
            Err(wgpu::SurfaceError::Timeout) => {
                debug!("Timed out acquiring the next frame");
                return;
            }
            Err(err) => {
                error!("Error getting current frame: {:?}", err);
                return;
            }
        };

        self.reserve(list);
        if !list.is_empty() {
            self.queue
                .write_buffer(&self.vertex_buffer, 0, bytemuck::cast_slice(list.vertices()));
            self.queue
                .write_buffer(&self.index_buffer, 0, bytemuck::cast_slice(list.indices()));
        }

        let [r, g, b, a] = list.encode_color(list.clear_color());
        let clear = wgpu::Color {
            r: r as f64,
            g: g as f64,
            b: b as f64,
            a: a as f64,
        };

        let view = frame.texture.create_view(&Default::default());
        let mut encoder = self.device.create_command_encoder(&Default::default());
        {
            let mut rpass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                label: Some("Painter Pass"),
                color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                    view: &view,
                    resolve_target: None,
                    ops: wgpu::Operations {
                        load: wgpu::LoadOp::Clear(clear),
                        store: wgpu::StoreOp::Store,
                    },
                })],
                ..Default::default()
            });

            if !list.is_empty() {
                let vertex_bytes = (list.vertices().len() * std::mem::size_of::<PaintVertex>()) as u64;
                let index_bytes = (list.indices().len() * std::mem::size_of::<u32>()) as u64;
                rpass.set_pipeline(&self.render_pipeline);
                rpass.set_vertex_buffer(0, self.vertex_buffer.slice(..vertex_bytes));
                rpass.set_index_buffer(self.index_buffer.slice(..index_bytes), wgpu::IndexFormat::Uint32);
                rpass.draw_indexed(0..list.indices().len() as u32, 0, 0..1);
            }
        }

        self.queue.submit([encoder.finish()]);
        frame.present();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn list() -> PaintList {
        PaintList::new(200.0, 100.0, false)
    }

    #[test]
    fn pixels_map_to_ndc() {
        let list = list();
        assert_eq!(list.to_ndc(Point2::new(0.0, 0.0)), [-1.0, 1.0]);
        assert_eq!(list.to_ndc(Point2::new(200.0, 100.0)), [1.0, -1.0]);
        assert_eq!(list.to_ndc(Point2::new(100.0, 50.0)), [0.0, 0.0]);
    }

    #[test]
    fn polygons_become_fans() {
        let mut list = list();
        list.fill_rect(0.0, 0.0, 10.0, 10.0, Rgba::WHITE);
        assert_eq!(list.vertices().len(), 4);
        assert_eq!(list.indices(), &[0, 1, 2, 0, 2, 3]);

        list.fill_polygon(
            &[Point2::new(0.0, 0.0), Point2::new(1.0, 0.0), Point2::new(0.0, 1.0)],
            Rgba::BLACK,
        );
        assert_eq!(&list.indices()[6..], &[4, 5, 6]);
    }

    #[test]
    fn degenerate_shapes_are_dropped() {
        let mut list = list();
        list.fill_polygon(&[Point2::new(0.0, 0.0), Point2::new(1.0, 0.0)], Rgba::WHITE);
        list.stroke_segment(Point2::new(3.0, 3.0), Point2::new(3.0, 3.0), 2.0, Rgba::WHITE);
        list.fill_circle(Point2::new(3.0, 3.0), 0.0, Rgba::WHITE);
        assert!(list.is_empty());
    }

    #[test]
    fn segments_have_their_width() {
        let mut list = PaintList::new(2.0, 2.0, false);
        list.stroke_segment(Point2::new(0.0, 1.0), Point2::new(2.0, 1.0), 1.0, Rgba::WHITE);
        let ys: Vec<f32> = list.vertices().iter().map(|v| v.position[1]).collect();
        // Half a pixel either side of the centre line, in NDC.
        assert_eq!(ys, vec![-0.5, -0.5, 0.5, 0.5]);
    }

    #[test]
    fn circles_are_fans_of_the_rim() {
        let mut list = list();
        list.fill_circle(Point2::new(100.0, 50.0), 10.0, Rgba::WHITE);
        assert_eq!(list.vertices().len(), CIRCLE_SEGMENTS as usize);
        assert_eq!(list.indices().len(), 3 * (CIRCLE_SEGMENTS as usize - 2));
    }

    #[test]
    fn clear_restarts_the_frame() {
        let mut list = list();
        list.fill_rect(0.0, 0.0, 10.0, 10.0, Rgba::WHITE);
        let sky = Rgba::from_hex(0x60a5fa);
        list.clear(sky);
        assert!(list.is_empty());
        assert_eq!(list.clear_color(), sky);
    }

    #[test]
    fn srgb_targets_get_linear_colours() {
        let mut list = PaintList::new(10.0, 10.0, true);
        let grey = Rgba::new(0.5, 0.5, 0.5, 0.25);
        list.fill_rect(0.0, 0.0, 1.0, 1.0, grey);
        let color = list.vertices()[0].color;
        assert!(color[0] < 0.5);
        assert_eq!(color[3], 0.25);
    }
}
