//! wire3d Core Library - extruded solids, view transforms and a hidden-line rasterizer
//!
//! The core is host-agnostic: a front-end sets interaction parameters on a
//! [`ViewState`], calls [`Renderer::render`], and receives visible pixels
//! through its [`RenderSurface`].

pub mod algebra;
pub mod config;
pub mod error;
pub mod interaction;
pub mod model;
pub mod raster;
pub mod scene;
pub mod solid;
pub mod surface;
pub mod transform;

// Re-export commonly used types
pub use config::Wire3dConfig;
pub use error::ConfigError;
pub use interaction::{DragTracker, SharedViewState, ViewState};
pub use model::{Model, NamedSolid, Profile};
pub use raster::{FillRule, FrameBuffers, Plane, Rasterizer};
pub use scene::{FrameStats, Renderer};
pub use solid::{extrude, Face, Solid};
pub use surface::RenderSurface;
pub use transform::{Pipeline, Transform};
