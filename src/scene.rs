//! The fan scene: built once, mutated only through [`crate::rig::FanRig`].
//!
//! The spinning assembly (blades, torus ring, shaft) lives in a group that
//! oscillates around Y; the stand column and base disc sit directly at the
//! scene root and never move.

use std::f32::consts::FRAC_PI_2;
use std::rc::Rc;

use crate::{
    context::Context,
    data_structures::{
        geometry::{CircleGeometry, CylinderGeometry, MeshBuffers, TorusGeometry},
        node::{Group, Material, MeshNode},
        texture::Texture,
        transform::Transform,
    },
    pipelines::{axes::AxesHelper, matcap::mk_texture_bind_group},
    rig::FanRig,
};

const BLADE_RADIUS: f32 = 8.0;
const BLADE_SEGMENTS: u32 = 4;
const BLADE_ARC: f32 = 1.0;

const RING_RADIUS: f32 = 10.0;
const RING_TUBE: f32 = 1.485;

const SHAFT_RADIUS: f32 = 4.0;
const SHAFT_LENGTH: f32 = 20.0;

const GROUP_LIFT: f32 = 10.0;
const AXES_LENGTH: f32 = 5.0;

// Index of the blade node among the group's children.
const BLADES: usize = 0;

/// The local transform of every mesh instance in the scene, before upload.
///
/// [`FanScene::new`] turns exactly these into nodes: the blades, ring and
/// shaft under the group, the column and disc at the root. Membership never
/// changes afterwards; this is the piece of the builder that needs no GPU.
struct SceneLocals {
    blades: Vec<Transform>,
    ring: Transform,
    shaft: Transform,
    column: Transform,
    disc: Transform,
}

fn assembly_locals(rig: &FanRig) -> SceneLocals {
    let blades = rig
        .blade_angles
        .iter()
        .map(|&angle| {
            let mut local = Transform::new();
            local.rotation.z = angle;
            local
        })
        .collect();

    let mut shaft = Transform::at(0.0, 0.0, -10.0);
    shaft.rotation.x = FRAC_PI_2;

    SceneLocals {
        blades,
        ring: Transform::new(),
        shaft,
        column: Transform::at(0.0, -6.0, -7.5),
        disc: Transform::at(0.0, -21.0, -7.5),
    }
}

pub struct FanScene {
    matcap_bind_group: wgpu::BindGroup,
    group: Group,
    root: Vec<MeshNode>,
    pub axes: AxesHelper,
}

impl FanScene {
    /// Wire the whole scene graph. Runs exactly once; nothing is created or
    /// destroyed afterwards.
    pub fn new(ctx: &Context, matcap: &Texture) -> Self {
        let device = &ctx.device;
        let matcap_bind_group =
            mk_texture_bind_group(device, &ctx.pipelines.matcap_texture_layout, matcap);

        let blade_geometry = Rc::new(MeshBuffers::new(
            device,
            &CircleGeometry {
                radius: BLADE_RADIUS,
                segments: BLADE_SEGMENTS,
                theta_start: 0.0,
                theta_length: BLADE_ARC,
            }
            .mesh_data(),
            "Blade",
        ));
        let ring_geometry = Rc::new(MeshBuffers::new(
            device,
            &TorusGeometry {
                radius: RING_RADIUS,
                tube: RING_TUBE,
                radial_segments: 2,
                tubular_segments: 106,
            }
            .mesh_data(),
            "Ring",
        ));
        let shaft_geometry = Rc::new(MeshBuffers::new(
            device,
            &CylinderGeometry {
                radius_top: SHAFT_RADIUS,
                radius_bottom: SHAFT_RADIUS,
                height: SHAFT_LENGTH,
                radial_segments: 20,
            }
            .mesh_data(),
            "Shaft",
        ));
        let column_geometry = Rc::new(MeshBuffers::new(
            device,
            &CylinderGeometry {
                radius_top: 2.0,
                radius_bottom: 3.0,
                height: 30.0,
                radial_segments: 10,
            }
            .mesh_data(),
            "Column",
        ));
        let disc_geometry = Rc::new(MeshBuffers::new(
            device,
            &CylinderGeometry {
                radius_top: 10.0,
                radius_bottom: 14.0,
                height: 1.0,
                radial_segments: 32,
            }
            .mesh_data(),
            "Base Disc",
        ));

        let locals = assembly_locals(&FanRig::new());

        let mut group = Group::new();
        group.transform.position.y = GROUP_LIFT;
        group.add(MeshNode::new(
            device,
            blade_geometry,
            Material::Flat,
            locals.blades,
            "Blades",
        ));
        group.add(MeshNode::new(
            device,
            ring_geometry,
            Material::Matcap,
            vec![locals.ring],
            "Ring",
        ));
        group.add(MeshNode::new(
            device,
            shaft_geometry,
            Material::Matcap,
            vec![locals.shaft],
            "Shaft",
        ));
        group.write_world(&ctx.queue);

        // The stand is not part of the oscillating assembly.
        let root = vec![
            MeshNode::new(
                device,
                column_geometry,
                Material::Matcap,
                vec![locals.column],
                "Column",
            ),
            MeshNode::new(
                device,
                disc_geometry,
                Material::Matcap,
                vec![locals.disc],
                "Base Disc",
            ),
        ];

        let axes = AxesHelper::new(device, AXES_LENGTH);

        Self {
            matcap_bind_group,
            group,
            root,
            axes,
        }
    }

    /// Mirror the rig into the node transforms and rewrite the instance
    /// buffers of the oscillating assembly. The stand never changes.
    pub fn sync(&mut self, rig: &FanRig, queue: &wgpu::Queue) {
        for (local, &angle) in self.group.children[BLADES]
            .locals
            .iter_mut()
            .zip(rig.blade_angles.iter())
        {
            local.rotation.z = angle;
        }
        self.group.transform.rotation.y = rig.group_yaw;
        self.group.write_world(queue);
    }

    pub fn draw(&self, ctx: &Context, render_pass: &mut wgpu::RenderPass<'_>) {
        render_pass.set_pipeline(&ctx.pipelines.matcap);
        render_pass.set_bind_group(0, &self.matcap_bind_group, &[]);
        render_pass.set_bind_group(1, &ctx.camera.bind_group, &[]);
        for node in self.matcap_nodes() {
            node.draw(render_pass);
        }

        render_pass.set_pipeline(&ctx.pipelines.flat);
        render_pass.set_bind_group(0, &ctx.camera.bind_group, &[]);
        render_pass.set_bind_group(1, &ctx.light.bind_group, &[]);
        for node in self.flat_nodes() {
            node.draw(render_pass);
        }

        if self.axes.visible {
            render_pass.set_pipeline(&ctx.pipelines.axes);
            render_pass.set_bind_group(0, &ctx.camera.bind_group, &[]);
            self.axes.draw(render_pass);
        }
    }

    fn matcap_nodes(&self) -> impl Iterator<Item = &MeshNode> {
        self.group
            .children
            .iter()
            .chain(self.root.iter())
            .filter(|node| node.material == Material::Matcap)
    }

    fn flat_nodes(&self) -> impl Iterator<Item = &MeshNode> {
        self.group
            .children
            .iter()
            .chain(self.root.iter())
            .filter(|node| node.material == Material::Flat)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rig::BLADE_COUNT;

    #[test]
    fn membership_is_six_blades_plus_ring_and_shaft_in_the_group() {
        let locals = assembly_locals(&FanRig::new());
        assert_eq!(locals.blades.len(), BLADE_COUNT);
        // ring, shaft: group; column, disc: root. Eight group instances,
        // two root instances, nothing else.
        let group_instances = locals.blades.len() + 2;
        assert_eq!(group_instances, 8);
    }

    #[test]
    fn blade_locals_carry_the_rig_angles() {
        let rig = FanRig::new();
        let locals = assembly_locals(&rig);
        for (local, &angle) in locals.blades.iter().zip(rig.blade_angles.iter()) {
            assert_eq!(local.rotation.z, angle);
            assert_eq!(local.position.x, 0.0);
        }
    }

    #[test]
    fn shaft_sits_behind_the_rotor_plane() {
        let locals = assembly_locals(&FanRig::new());
        assert_eq!(locals.shaft.position.z, -10.0);
        assert_eq!(locals.shaft.rotation.x, FRAC_PI_2);
    }

    #[test]
    fn stand_is_placed_below_the_assembly() {
        let locals = assembly_locals(&FanRig::new());
        assert_eq!(locals.column.position.y, -6.0);
        assert_eq!(locals.disc.position.y, -21.0);
        assert_eq!(locals.column.position.z, locals.disc.position.z);
    }
}
