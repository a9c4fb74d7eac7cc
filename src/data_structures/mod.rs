//! Scene data: geometry, transforms, nodes and textures.
//!
//! - `geometry` holds the procedural shape generators and their GPU buffers
//! - `transform` holds per-instance transformation data
//! - `node` holds the mesh nodes and the group container
//! - `texture` holds the GPU texture wrapper and creation utilities

pub mod geometry;
pub mod node;
pub mod texture;
pub mod transform;
