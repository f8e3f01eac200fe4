//! # Galaxy
//!
//! A procedurally generated spiral galaxy, rendered as an additive point
//! cloud with a live tweak panel and an orbit camera.
//!
//! ## Quick Start
//!
//! ```ignore
//! use galaxy::prelude::*;
//!
//! fn main() -> Result<(), GalaxyError> {
//!     galaxy::init_logging();
//!     Galaxy::new()
//!         .with_count(50_000)
//!         .with_branches(3)
//!         .with_spin(1.0)
//!         .run()
//! }
//! ```
//!
//! ## Generating without a window
//!
//! The generator is a plain function of a [`GalaxyParams`] snapshot:
//!
//! ```
//! use galaxy::{generate, GalaxyParams};
//!
//! let buffers = generate(&GalaxyParams { count: 500, ..Default::default() });
//! assert_eq!(buffers.len(), 500);
//! assert_eq!(buffers.colors.len(), 3 * 500);
//! ```
//!
//! ## Parameters
//!
//! | Parameter | Panel range | Effect |
//! |-----------|-------------|--------|
//! | `count` | 10 - 200000 | Number of particles |
//! | `size` | 0.001 - 0.1 | Point size, attenuated with distance |
//! | `radius` | 2 - 20 | Outer radius of the disc |
//! | `spin` | -5 - 5 | Twist per unit radius |
//! | `branches` | 1 - 20 | Spiral arm count |
//! | `randomness_power` | 0 - 5 | Higher values pull particles onto the arms |
//!
//! Controls: drag to orbit, scroll to zoom, double-click or `F` for
//! fullscreen, `Escape` to leave fullscreen or quit.

mod app;
pub mod camera;
pub mod color;
mod error;
pub mod generator;
mod gpu;
pub mod input;
pub mod panel;
pub mod params;
pub mod scene;
mod shader;
pub mod time;

pub use app::{next_fullscreen, toggle_fullscreen, Galaxy};
pub use color::Rgb;
pub use error::{ColorParseError, GalaxyError, GpuError, ParamError};
pub use generator::{generate, generate_with, ParticleBuffers, Sampler};
pub use params::GalaxyParams;
pub use scene::{RenderBackend, SceneDriver};

/// Default log filter; `RUST_LOG` overrides it.
pub const DEFAULT_LOG_FILTER: &str = "info,wgpu_core=warn,wgpu_hal=warn,naga=warn";

/// Install the `env_logger` backend for the `log` facade.
///
/// Calling this more than once is harmless.
pub fn init_logging() {
    let _ = env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(DEFAULT_LOG_FILTER))
        .format_timestamp_millis()
        .try_init();
}

/// Convenient re-exports for common usage.
///
/// ```ignore
/// use galaxy::prelude::*;
/// ```
pub mod prelude {
    pub use crate::app::Galaxy;
    pub use crate::color::Rgb;
    pub use crate::error::GalaxyError;
    pub use crate::generator::{generate, generate_with, ParticleBuffers, RngSampler, Sampler};
    pub use crate::params::GalaxyParams;
    pub use glam::Vec3;
}
