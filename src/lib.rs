//! whirl
//!
//! A small cross-platform viewer rendering a stylized desk fan with wgpu,
//! native and in the browser. The scene is built once; animation happens by
//! mutating transforms and rewriting instance buffers, one fixed step per
//! presented frame.
//!
//! High-level modules
//! - `app`: winit lifecycle and the per-frame loop
//! - `camera`: camera types, orbit controller and uniforms for view/projection
//! - `context`: central GPU and window context that owns device/queue/pipelines
//! - `data_structures`: meshes, transforms, nodes and textures
//! - `pipelines`: matcap, flat and axes render pipelines
//! - `resources`: texture loading, native and over HTTP on the web
//! - `rig`: the deterministic animation state of the fan
//! - `scene`: the fan scene graph
//!

pub mod app;
pub mod camera;
pub mod context;
pub mod data_structures;
pub mod pipelines;
pub mod resources;
pub mod rig;
pub mod scene;

// Re-exports commonly used types for convenience in downstream code.
pub use cgmath::*;
pub use winit::event::DeviceEvent;
pub use winit::event::WindowEvent;

pub use app::run;
