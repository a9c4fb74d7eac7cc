//! Plain double-sided lit pipeline, used by the fan blades.

use crate::{
    data_structures::{geometry::Vertex, texture::Texture, transform::TransformRaw},
    pipelines::mk_render_pipeline,
};

/// Culling is off so both faces of the blade wedges render; the shader flips
/// the normal on back faces to light them correctly.
pub fn mk_flat_pipeline(
    device: &wgpu::Device,
    config: &wgpu::SurfaceConfiguration,
    camera_bind_group_layout: &wgpu::BindGroupLayout,
    light_bind_group_layout: &wgpu::BindGroupLayout,
) -> wgpu::RenderPipeline {
    let layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
        label: Some("Flat Pipeline Layout"),
        bind_group_layouts: &[Some(camera_bind_group_layout), Some(light_bind_group_layout)],
        immediate_size: 0,
    });

    let shader = wgpu::ShaderModuleDescriptor {
        label: Some("Flat Shader"),
        source: wgpu::ShaderSource::Wgsl(include_str!("flat.wgsl").into()),
    };

    mk_render_pipeline(
        device,
        &layout,
        config.format,
        Some(Texture::DEPTH_FORMAT),
        &[Vertex::desc(), TransformRaw::desc()],
        wgpu::PrimitiveTopology::TriangleList,
        None,
        shader,
    )
}
