//! Mesh nodes and the group container.
//!
//! The scene graph is fixed after construction: nodes are created once, only
//! their transforms change. A [`MeshNode`] owns one or more instances of a
//! shared geometry (the six blades are six instances of a single node); a
//! [`Group`] composes its transform onto its children CPU-side before the
//! instance buffers are rewritten.

use std::rc::Rc;

use cgmath::{Matrix4, SquareMatrix};
use wgpu::util::DeviceExt;

use crate::data_structures::{
    geometry::MeshBuffers,
    transform::Transform,
};

/// Which pipeline a node is drawn with.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Material {
    /// Capture-texture shading, no live lighting.
    Matcap,
    /// Plain double-sided colored surface, lit by the scene lights.
    Flat,
}

pub struct MeshNode {
    pub geometry: Rc<MeshBuffers>,
    pub material: Material,
    pub locals: Vec<Transform>,
    instance_buffer: wgpu::Buffer,
}

impl MeshNode {
    pub fn new(
        device: &wgpu::Device,
        geometry: Rc<MeshBuffers>,
        material: Material,
        locals: Vec<Transform>,
        label: &str,
    ) -> Self {
        let identity = Matrix4::identity();
        let raws = locals
            .iter()
            .map(|t| t.to_raw(&identity))
            .collect::<Vec<_>>();
        let instance_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some(&format!("{label} Instance Buffer")),
            contents: bytemuck::cast_slice(&raws),
            usage: wgpu::BufferUsages::VERTEX | wgpu::BufferUsages::COPY_DST,
        });
        Self {
            geometry,
            material,
            locals,
            instance_buffer,
        }
    }

    pub fn instance_count(&self) -> u32 {
        self.locals.len() as u32
    }

    /// Recompute world transforms under `parent` and rewrite the instance
    /// buffer in place. The buffer never changes size.
    pub fn write_world(&self, queue: &wgpu::Queue, parent: &Matrix4<f32>) {
        let raws = self
            .locals
            .iter()
            .map(|t| t.to_raw(parent))
            .collect::<Vec<_>>();
        queue.write_buffer(&self.instance_buffer, 0, bytemuck::cast_slice(&raws));
    }

    pub fn draw(&self, render_pass: &mut wgpu::RenderPass<'_>) {
        if self.locals.is_empty() {
            log::warn!("you attempted to render a node with zero instances");
            return;
        }
        render_pass.set_vertex_buffer(0, self.geometry.vertex_buffer.slice(..));
        render_pass.set_vertex_buffer(1, self.instance_buffer.slice(..));
        render_pass
            .set_index_buffer(self.geometry.index_buffer.slice(..), wgpu::IndexFormat::Uint32);
        render_pass.draw_indexed(0..self.geometry.num_elements, 0, 0..self.instance_count());
    }
}

/// A container composing one transform onto a set of child nodes.
pub struct Group {
    pub transform: Transform,
    pub children: Vec<MeshNode>,
}

impl Group {
    pub fn new() -> Self {
        Self {
            transform: Transform::new(),
            children: Vec::new(),
        }
    }

    pub fn add(&mut self, child: MeshNode) {
        self.children.push(child);
    }

    pub fn write_world(&self, queue: &wgpu::Queue) {
        let parent = self.transform.to_matrix();
        for child in &self.children {
            child.write_world(queue, &parent);
        }
    }
}

impl Default for Group {
    fn default() -> Self {
        Self::new()
    }
}
