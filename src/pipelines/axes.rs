//! Debug axes helper: three colored lines along X (red), Y (green) and
//! Z (blue), hidden by default.

use wgpu::util::DeviceExt;

use crate::{data_structures::texture::Texture, pipelines::mk_render_pipeline};

#[repr(C)]
#[derive(Debug, Copy, Clone, bytemuck::Pod, bytemuck::Zeroable)]
struct AxisVertex {
    position: [f32; 3],
    color: [f32; 3],
}

impl AxisVertex {
    fn desc() -> wgpu::VertexBufferLayout<'static> {
        use std::mem;
        wgpu::VertexBufferLayout {
            array_stride: mem::size_of::<AxisVertex>() as wgpu::BufferAddress,
            step_mode: wgpu::VertexStepMode::Vertex,
            attributes: &[
                wgpu::VertexAttribute {
                    offset: 0,
                    shader_location: 0,
                    format: wgpu::VertexFormat::Float32x3,
                },
                wgpu::VertexAttribute {
                    offset: mem::size_of::<[f32; 3]>() as wgpu::BufferAddress,
                    shader_location: 1,
                    format: wgpu::VertexFormat::Float32x3,
                },
            ],
        }
    }
}

pub fn mk_axes_pipeline(
    device: &wgpu::Device,
    config: &wgpu::SurfaceConfiguration,
    camera_bind_group_layout: &wgpu::BindGroupLayout,
) -> wgpu::RenderPipeline {
    let layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
        label: Some("Axes Pipeline Layout"),
        bind_group_layouts: &[Some(camera_bind_group_layout)],
        immediate_size: 0,
    });

    let shader = wgpu::ShaderModuleDescriptor {
        label: Some("Axes Shader"),
        source: wgpu::ShaderSource::Wgsl(include_str!("axes.wgsl").into()),
    };

    mk_render_pipeline(
        device,
        &layout,
        config.format,
        Some(Texture::DEPTH_FORMAT),
        &[AxisVertex::desc()],
        wgpu::PrimitiveTopology::LineList,
        None,
        shader,
    )
}

pub struct AxesHelper {
    vertex_buffer: wgpu::Buffer,
    pub visible: bool,
}

impl AxesHelper {
    pub fn new(device: &wgpu::Device, length: f32) -> Self {
        let vertices = [
            AxisVertex {
                position: [0.0, 0.0, 0.0],
                color: [1.0, 0.0, 0.0],
            },
            AxisVertex {
                position: [length, 0.0, 0.0],
                color: [1.0, 0.0, 0.0],
            },
            AxisVertex {
                position: [0.0, 0.0, 0.0],
                color: [0.0, 1.0, 0.0],
            },
            AxisVertex {
                position: [0.0, length, 0.0],
                color: [0.0, 1.0, 0.0],
            },
            AxisVertex {
                position: [0.0, 0.0, 0.0],
                color: [0.0, 0.0, 1.0],
            },
            AxisVertex {
                position: [0.0, 0.0, length],
                color: [0.0, 0.0, 1.0],
            },
        ];
        let vertex_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("Axes Vertex Buffer"),
            contents: bytemuck::cast_slice(&vertices),
            usage: wgpu::BufferUsages::VERTEX,
        });
        Self {
            vertex_buffer,
            visible: false,
        }
    }

    /// No-op while hidden; the caller sets the pipeline.
    pub fn draw(&self, render_pass: &mut wgpu::RenderPass<'_>) {
        if !self.visible {
            return;
        }
        render_pass.set_vertex_buffer(0, self.vertex_buffer.slice(..));
        render_pass.draw(0..6, 0..1);
    }
}
