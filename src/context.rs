//! Central GPU context: window surface, device/queue, camera and light
//! resources, and the render pipelines. Created once at startup.

use std::sync::Arc;

use wgpu::util::DeviceExt;
use winit::window::Window;

use crate::{
    camera::{self, Camera, CameraResources, CameraUniform, OrbitController, Projection},
    data_structures::texture::Texture,
    pipelines::{
        axes::mk_axes_pipeline,
        flat::mk_flat_pipeline,
        light::{LightResources, LightUniform},
        matcap::{mk_matcap_pipeline, mk_texture_bind_group_layout},
    },
};

/// Vertical field of view in degrees.
const CAMERA_FOVY: f32 = 76.0;
const CAMERA_NEAR: f32 = 0.1;
const CAMERA_FAR: f32 = 100.0;
const CAMERA_POSITION: (f32, f32, f32) = (24.0, 24.0, 40.0);

/// Mid grey backdrop, 0x666666.
const CLEAR_COLOUR: wgpu::Color = wgpu::Color {
    r: 0.4,
    g: 0.4,
    b: 0.4,
    a: 1.0,
};

const LIGHT_DIRECTION: [f32; 3] = [1.0, 1.0, 1.0];
const LIGHT_INTENSITY: f32 = 1.0;
const LIGHT_COLOR: [f32; 3] = [1.0, 1.0, 1.0];
const AMBIENT_INTENSITY: f32 = 0.2;

#[derive(Debug)]
pub struct Pipelines {
    pub matcap: wgpu::RenderPipeline,
    pub flat: wgpu::RenderPipeline,
    pub axes: wgpu::RenderPipeline,
    pub matcap_texture_layout: wgpu::BindGroupLayout,
}

#[derive(Debug)]
pub struct Context {
    pub window: Arc<Window>,
    pub surface: wgpu::Surface<'static>,
    pub device: wgpu::Device,
    pub queue: wgpu::Queue,
    pub config: wgpu::SurfaceConfiguration,
    pub clear_colour: wgpu::Color,
    pub depth_texture: Texture,
    pub camera: CameraResources,
    pub projection: Projection,
    pub light: LightResources,
    pub pipelines: Pipelines,
}

impl Context {
    pub async fn new(window: Arc<Window>) -> anyhow::Result<Self> {
        let size = window.inner_size();

        // The instance is a handle to our GPU
        let instance = wgpu::Instance::new(wgpu::InstanceDescriptor {
            #[cfg(not(target_arch = "wasm32"))]
            backends: wgpu::Backends::PRIMARY,
            #[cfg(target_arch = "wasm32")]
            backends: wgpu::Backends::GL,
            ..wgpu::InstanceDescriptor::new_without_display_handle()
        });

        let surface = instance.create_surface(window.clone())?;

        let adapter = instance
            .request_adapter(&wgpu::RequestAdapterOptions {
                power_preference: wgpu::PowerPreference::default(),
                compatible_surface: Some(&surface),
                force_fallback_adapter: false,
            })
            .await?;
        let (device, queue) = adapter
            .request_device(&wgpu::DeviceDescriptor {
                label: None,
                required_features: wgpu::Features::empty(),
                // WebGL doesn't support all of wgpu's features.
                required_limits: if cfg!(target_arch = "wasm32") {
                    wgpu::Limits::downlevel_webgl2_defaults()
                } else {
                    wgpu::Limits::default()
                },
                memory_hints: Default::default(),
                trace: wgpu::Trace::Off,
                experimental_features: wgpu::ExperimentalFeatures::disabled(),
            })
            .await?;

        let surface_caps = surface.get_capabilities(&adapter);
        // The shaders assume an sRGB surface; fall back to whatever the
        // platform offers otherwise.
        let surface_format = surface_caps
            .formats
            .iter()
            .copied()
            .find(|f| f.is_srgb())
            .unwrap_or(surface_caps.formats[0]);
        let config = wgpu::SurfaceConfiguration {
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
            format: surface_format,
            width: size.width.max(1),
            height: size.height.max(1),
            present_mode: surface_caps.present_modes[0],
            alpha_mode: surface_caps.alpha_modes[0],
            view_formats: vec![],
            desired_maximum_frame_latency: 2,
        };

        let mut camera = Camera::new(CAMERA_POSITION);
        camera.look_at((0.0, 0.0, 0.0));
        // The z override after the look-at is deliberate; it is how the
        // scene has always been framed.
        camera.position.z = 20.0;
        let projection = Projection::new(
            config.width,
            config.height,
            cgmath::Deg(CAMERA_FOVY),
            CAMERA_NEAR,
            CAMERA_FAR,
        );
        let controller = OrbitController::from_camera(&camera);

        let mut camera_uniform = CameraUniform::new();
        camera_uniform.update_view_proj(&camera, &projection);

        let camera_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("Camera Buffer"),
            contents: bytemuck::cast_slice(&[camera_uniform]),
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
        });

        let camera_bind_group_layout = camera::mk_bind_group_layout(&device);
        let camera_bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
            layout: &camera_bind_group_layout,
            entries: &[wgpu::BindGroupEntry {
                binding: 0,
                resource: camera_buffer.as_entire_binding(),
            }],
            label: Some("camera_bind_group"),
        });

        let light = LightResources::new(
            &device,
            LightUniform::new(
                LIGHT_DIRECTION,
                LIGHT_INTENSITY,
                LIGHT_COLOR,
                AMBIENT_INTENSITY,
            ),
        );

        let matcap_texture_layout = mk_texture_bind_group_layout(&device);
        let pipelines = Pipelines {
            matcap: mk_matcap_pipeline(
                &device,
                &config,
                &matcap_texture_layout,
                &camera_bind_group_layout,
            ),
            flat: mk_flat_pipeline(
                &device,
                &config,
                &camera_bind_group_layout,
                &light.bind_group_layout,
            ),
            axes: mk_axes_pipeline(&device, &config, &camera_bind_group_layout),
            matcap_texture_layout,
        };

        let depth_texture = Texture::create_depth_texture(
            &device,
            [config.width, config.height],
            "depth_texture",
        );

        let camera = CameraResources {
            camera,
            controller,
            uniform: camera_uniform,
            buffer: camera_buffer,
            bind_group: camera_bind_group,
            bind_group_layout: camera_bind_group_layout,
        };

        Ok(Self {
            window,
            surface,
            device,
            queue,
            config,
            clear_colour: CLEAR_COLOUR,
            depth_texture,
            camera,
            projection,
            light,
            pipelines,
        })
    }

    /// Reconfigure the surface, depth texture and projection for a new
    /// window size. Called once per resize event.
    pub fn resize(&mut self, width: u32, height: u32) {
        if width > 0 && height > 0 {
            self.config.width = width;
            self.config.height = height;
            self.projection.resize(width, height);
            self.surface.configure(&self.device, &self.config);
            self.depth_texture = Texture::create_depth_texture(
                &self.device,
                [self.config.width, self.config.height],
                "depth_texture",
            );
        }
    }
}
