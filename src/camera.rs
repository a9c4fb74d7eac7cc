//! Camera, projection and the orbit controller.
//!
//! The camera orbits a fixed target point. Pointer drag rotates, the wheel
//! zooms; motion is damped towards the input goal every frame. View and
//! projection are kept separate so a window resize only touches the
//! projection's aspect ratio.

use cgmath::{InnerSpace, Matrix4, Point3, Rad, Vector3};
use instant::Duration;
use winit::event::{ElementState, MouseButton, MouseScrollDelta, WindowEvent};

#[rustfmt::skip]
pub const OPENGL_TO_WGPU_MATRIX: Matrix4<f32> = Matrix4::new(
    1.0, 0.0, 0.0, 0.0,
    0.0, 1.0, 0.0, 0.0,
    0.0, 0.0, 0.5, 0.0,
    0.0, 0.0, 0.5, 1.0,
);

#[derive(Debug, Clone, Copy)]
pub struct Camera {
    pub position: Point3<f32>,
    pub target: Point3<f32>,
    pub up: Vector3<f32>,
}

impl Camera {
    pub fn new<P: Into<Point3<f32>>>(position: P) -> Self {
        Self {
            position: position.into(),
            target: Point3::new(0.0, 0.0, 0.0),
            up: Vector3::unit_y(),
        }
    }

    pub fn look_at<P: Into<Point3<f32>>>(&mut self, target: P) {
        self.target = target.into();
    }

    pub fn calc_matrix(&self) -> Matrix4<f32> {
        Matrix4::look_at_rh(self.position, self.target, self.up)
    }
}

#[derive(Debug, Clone, Copy)]
pub struct Projection {
    pub aspect: f32,
    pub fovy: Rad<f32>,
    pub znear: f32,
    pub zfar: f32,
}

impl Projection {
    pub fn new<F: Into<Rad<f32>>>(width: u32, height: u32, fovy: F, znear: f32, zfar: f32) -> Self {
        Self {
            aspect: width as f32 / height as f32,
            fovy: fovy.into(),
            znear,
            zfar,
        }
    }

    pub fn resize(&mut self, width: u32, height: u32) {
        self.aspect = width as f32 / height as f32;
    }

    pub fn calc_matrix(&self) -> Matrix4<f32> {
        OPENGL_TO_WGPU_MATRIX * cgmath::perspective(self.fovy, self.aspect, self.znear, self.zfar)
    }
}

/// Orbits the camera around its target with damped pointer input.
#[derive(Debug)]
pub struct OrbitController {
    yaw: f32,
    pitch: f32,
    radius: f32,
    goal_yaw: f32,
    goal_pitch: f32,
    goal_radius: f32,
    dragging: bool,
    rotate_speed: f32,
    zoom_speed: f32,
    damping: f32,
}

impl OrbitController {
    const MIN_PITCH: f32 = -1.54;
    const MAX_PITCH: f32 = 1.54;
    const MIN_RADIUS: f32 = 2.0;
    const MAX_RADIUS: f32 = 90.0;

    /// Derive the orbit state from the camera's current placement so taking
    /// over control causes no jump.
    pub fn from_camera(camera: &Camera) -> Self {
        let offset = camera.position - camera.target;
        let radius = offset.magnitude().max(Self::MIN_RADIUS);
        let yaw = offset.x.atan2(offset.z);
        let pitch = (offset.y / radius).asin();
        Self {
            yaw,
            pitch,
            radius,
            goal_yaw: yaw,
            goal_pitch: pitch,
            goal_radius: radius,
            dragging: false,
            rotate_speed: 0.005,
            zoom_speed: 0.1,
            damping: 10.0,
        }
    }

    pub fn handle_window_events(&mut self, event: &WindowEvent) {
        match event {
            WindowEvent::MouseInput {
                state,
                button: MouseButton::Left,
                ..
            } => {
                self.dragging = *state == ElementState::Pressed;
            }
            WindowEvent::MouseWheel { delta, .. } => {
                let scroll = match delta {
                    MouseScrollDelta::LineDelta(_, y) => *y,
                    MouseScrollDelta::PixelDelta(pos) => pos.y as f32 / 50.0,
                };
                self.goal_radius = (self.goal_radius * (1.0 - scroll * self.zoom_speed))
                    .clamp(Self::MIN_RADIUS, Self::MAX_RADIUS);
            }
            _ => (),
        }
    }

    /// Feed a raw pointer delta. Ignored unless a drag is in progress.
    pub fn handle_mouse(&mut self, dx: f64, dy: f64) {
        if !self.dragging {
            return;
        }
        self.goal_yaw -= dx as f32 * self.rotate_speed;
        self.goal_pitch = (self.goal_pitch + dy as f32 * self.rotate_speed)
            .clamp(Self::MIN_PITCH, Self::MAX_PITCH);
    }

    /// Approach the input goals and reposition the camera on its orbit.
    pub fn update(&mut self, camera: &mut Camera, dt: Duration) {
        let t = 1.0 - (-self.damping * dt.as_secs_f32()).exp();
        self.yaw += (self.goal_yaw - self.yaw) * t;
        self.pitch += (self.goal_pitch - self.pitch) * t;
        self.radius += (self.goal_radius - self.radius) * t;

        let (sin_yaw, cos_yaw) = self.yaw.sin_cos();
        let (sin_pitch, cos_pitch) = self.pitch.sin_cos();
        camera.position = camera.target
            + Vector3::new(
                self.radius * cos_pitch * sin_yaw,
                self.radius * sin_pitch,
                self.radius * cos_pitch * cos_yaw,
            );
    }
}

/// Camera data as laid out for the shaders.
///
/// The view matrix is carried separately from the combined view-projection
/// because the matcap shader needs view-space normals.
#[repr(C)]
#[derive(Debug, Copy, Clone, bytemuck::Pod, bytemuck::Zeroable)]
pub struct CameraUniform {
    view_position: [f32; 4],
    view: [[f32; 4]; 4],
    view_proj: [[f32; 4]; 4],
}

impl CameraUniform {
    pub fn new() -> Self {
        use cgmath::SquareMatrix;
        Self {
            view_position: [0.0; 4],
            view: Matrix4::identity().into(),
            view_proj: Matrix4::identity().into(),
        }
    }

    pub fn update_view_proj(&mut self, camera: &Camera, projection: &Projection) {
        let view = camera.calc_matrix();
        self.view_position = [
            camera.position.x,
            camera.position.y,
            camera.position.z,
            1.0,
        ];
        self.view = view.into();
        self.view_proj = (projection.calc_matrix() * view).into();
    }
}

impl Default for CameraUniform {
    fn default() -> Self {
        Self::new()
    }
}

pub fn mk_bind_group_layout(device: &wgpu::Device) -> wgpu::BindGroupLayout {
    device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
        entries: &[wgpu::BindGroupLayoutEntry {
            binding: 0,
            visibility: wgpu::ShaderStages::VERTEX | wgpu::ShaderStages::FRAGMENT,
            ty: wgpu::BindingType::Buffer {
                ty: wgpu::BufferBindingType::Uniform,
                has_dynamic_offset: false,
                min_binding_size: None,
            },
            count: None,
        }],
        label: Some("camera_bind_group_layout"),
    })
}

/// Everything camera-related the context owns: state, controller and the GPU
/// resources the pipelines bind.
#[derive(Debug)]
pub struct CameraResources {
    pub camera: Camera,
    pub controller: OrbitController,
    pub uniform: CameraUniform,
    pub buffer: wgpu::Buffer,
    pub bind_group: wgpu::BindGroup,
    pub bind_group_layout: wgpu::BindGroupLayout,
}

#[cfg(test)]
mod tests {
    use super::*;
    use cgmath::Deg;

    #[test]
    fn resize_updates_aspect_exactly() {
        let mut projection = Projection::new(800, 600, Deg(76.0), 0.1, 100.0);
        projection.resize(1920, 1080);
        assert_eq!(projection.aspect, 1920.0 / 1080.0);
    }

    #[test]
    fn orbit_state_roundtrips_the_camera_position() {
        let mut camera = Camera::new((24.0, 24.0, 20.0));
        let mut controller = OrbitController::from_camera(&camera);
        // A long step converges onto the (unchanged) goal.
        controller.update(&mut camera, Duration::from_secs(10));
        assert!((camera.position.x - 24.0).abs() < 1e-3);
        assert!((camera.position.y - 24.0).abs() < 1e-3);
        assert!((camera.position.z - 20.0).abs() < 1e-3);
    }

    #[test]
    fn drag_is_ignored_unless_pressed() {
        let camera = Camera::new((0.0, 0.0, 10.0));
        let mut controller = OrbitController::from_camera(&camera);
        controller.handle_mouse(100.0, 0.0);
        assert_eq!(controller.goal_yaw, controller.yaw);
    }
}
