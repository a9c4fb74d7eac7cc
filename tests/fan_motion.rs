//! Drives the animation state through the same transform math the scene
//! uploads, without a window or a GPU device.

use cgmath::{InnerSpace, Matrix4, Point3, Rad, Transform as _, Vector3};

use whirl::data_structures::transform::Transform;
use whirl::rig::{BLADE_COUNT, FanRig};

const BLADE_RADIUS: f32 = 8.0;
const GROUP_LIFT: f32 = 10.0;

/// World position of the tip of blade `i`, composed exactly as the scene
/// composes it: group lift and yaw as the parent, blade spin as the local.
fn blade_tip(rig: &FanRig, i: usize) -> Point3<f32> {
    let mut group = Transform::new();
    group.position.y = GROUP_LIFT;
    group.rotation.y = rig.group_yaw;

    let mut local = Transform::new();
    local.rotation.z = rig.blade_angles[i];

    let model: Matrix4<f32> = group.to_matrix() * local.to_matrix();
    model.transform_point(Point3::new(BLADE_RADIUS, 0.0, 0.0))
}

#[test]
fn advancing_two_rigs_in_lockstep_is_deterministic() {
    let mut a = FanRig::new();
    let mut b = FanRig::new();
    for _ in 0..1000 {
        a.advance();
        b.advance();
    }
    assert_eq!(a.blade_angles, b.blade_angles);
    assert_eq!(a.group_yaw, b.group_yaw);
    assert_eq!(a.time, b.time);
}

#[test]
fn blade_tips_stay_on_their_circle_while_spinning() {
    let mut rig = FanRig::new();
    for _ in 0..250 {
        rig.advance();
    }
    let center = Point3::new(0.0, GROUP_LIFT, 0.0);
    for i in 0..BLADE_COUNT {
        let r = (blade_tip(&rig, i) - center).magnitude();
        assert!((r - BLADE_RADIUS).abs() < 1e-3, "blade {i}: radius {r}");
    }
}

#[test]
fn adjacent_blade_tips_keep_their_spacing() {
    let mut rig = FanRig::new();
    for _ in 0..777 {
        rig.advance();
    }
    // The chord of a 60 degree arc equals the radius.
    for i in 0..BLADE_COUNT {
        let a = blade_tip(&rig, i);
        let b = blade_tip(&rig, (i + 1) % BLADE_COUNT);
        let chord = (b - a).magnitude();
        assert!(
            (chord - BLADE_RADIUS).abs() < 1e-3,
            "blades {i}/{}: chord {chord}",
            (i + 1) % BLADE_COUNT
        );
    }
}

#[test]
fn blade_tips_stay_coplanar_under_yaw() {
    let mut rig = FanRig::new();
    // Advance until the yaw is well away from zero.
    for _ in 0..157 {
        rig.advance();
    }
    assert!(rig.group_yaw.abs() > 0.05);

    // The blade plane normal is the group's local Z axis after yaw.
    let normal = Matrix4::from_angle_y(Rad(rig.group_yaw))
        .transform_vector(Vector3::new(0.0, 0.0, 1.0))
        .normalize();
    let center = Point3::new(0.0, GROUP_LIFT, 0.0);
    for i in 0..BLADE_COUNT {
        let offset = blade_tip(&rig, i) - center;
        assert!(
            offset.dot(normal).abs() < 1e-3,
            "blade {i} left the rotor plane"
        );
    }
}
