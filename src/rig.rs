//! Animation state of the fan, separated from the GPU scene.
//!
//! [`FanRig`] is the single mutable context the frame updater works on:
//! blade spin angles, the group's oscillating yaw, the time accumulator and
//! the held-key flag. One call to [`FanRig::advance`] is exactly one frame,
//! so tests can drive any number of ticks without a display clock.

use std::f32::consts::PI;

pub const BLADE_COUNT: usize = 6;

/// Spin applied to every blade per tick, in radians. Fixed-step: the
/// animation is not scaled by elapsed real time.
pub const BLADE_STEP: f32 = 0.02;

/// Growth of the time accumulator per tick. Also fixed-step.
pub const TIME_STEP: f32 = 0.01;

#[derive(Debug, Clone)]
pub struct FanRig {
    /// Z rotation of each blade. Grows unbounded; wrapped only on read.
    pub blade_angles: [f32; BLADE_COUNT],
    /// Oscillating yaw of the fan assembly, always within [-0.3, 0.3].
    pub group_yaw: f32,
    /// Monotonic tick accumulator, never reset.
    pub time: f32,
    /// Space held down. Currently consumed by nothing in the render path.
    pub is_down: bool,
}

impl FanRig {
    /// Blades distributed at equal angles around the full circle, plus the
    /// fixed 6π base offset the scene has always carried (a no-op modulo 2π
    /// for an even blade count).
    pub fn new() -> Self {
        let mut blade_angles = [0.0; BLADE_COUNT];
        for (i, angle) in blade_angles.iter_mut().enumerate() {
            *angle = i as f32 * 2.0 * PI / BLADE_COUNT as f32 + PI * BLADE_COUNT as f32;
        }
        Self {
            blade_angles,
            group_yaw: 0.0,
            time: 0.0,
            is_down: false,
        }
    }

    /// One tick: spin the blades, advance time, derive the assembly yaw.
    ///
    /// The yaw mapping `(sin(t) + 1) * 0.3 - 0.3` keeps the oscillation in
    /// [-0.3, 0.3].
    pub fn advance(&mut self) {
        for angle in &mut self.blade_angles {
            *angle += BLADE_STEP;
        }
        self.time += TIME_STEP;
        let value = self.time.sin();
        self.group_yaw = (value + 1.0) * 0.3 - 0.3;
    }

    pub fn key_pressed(&mut self) {
        self.is_down = true;
    }

    pub fn key_released(&mut self) {
        self.is_down = false;
    }
}

impl Default for FanRig {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f32::consts::TAU;

    #[test]
    fn blades_start_evenly_distributed() {
        let rig = FanRig::new();
        for (i, angle) in rig.blade_angles.iter().enumerate() {
            let expected = i as f32 * TAU / 6.0 + 6.0 * PI;
            assert_eq!(*angle, expected);
        }
        // all distinct modulo the shared base offset
        for i in 1..BLADE_COUNT {
            assert!(rig.blade_angles[i] > rig.blade_angles[i - 1]);
        }
    }

    #[test]
    fn one_tick_moves_every_blade_by_the_fixed_step() {
        let mut rig = FanRig::new();
        let before = rig.blade_angles;
        rig.advance();
        for i in 0..BLADE_COUNT {
            assert!((rig.blade_angles[i] - before[i] - BLADE_STEP).abs() < 1e-6);
        }
    }

    #[test]
    fn time_accumulates_and_never_resets() {
        let mut rig = FanRig::new();
        for _ in 0..500 {
            rig.advance();
        }
        assert!((rig.time - 5.0).abs() < 1e-3);
    }

    #[test]
    fn yaw_follows_the_oscillation_formula() {
        let mut rig = FanRig::new();
        for f in 1..=400u32 {
            rig.advance();
            let expected = ((f as f32 * TIME_STEP).sin() + 1.0) * 0.3 - 0.3;
            assert!((rig.group_yaw - expected).abs() < 1e-3);
        }
    }

    #[test]
    fn yaw_stays_inside_its_range() {
        let mut rig = FanRig::new();
        for _ in 0..2000 {
            rig.advance();
            assert!(rig.group_yaw >= -0.3 - 1e-6);
            assert!(rig.group_yaw <= 0.3 + 1e-6);
        }
    }

    #[test]
    fn key_flag_toggles_independently_of_ticks() {
        let mut rig = FanRig::new();
        rig.key_pressed();
        assert!(rig.is_down);
        rig.advance();
        rig.advance();
        assert!(rig.is_down);
        rig.key_released();
        assert!(!rig.is_down);
    }
}
