//! Scene driver: owns the point cloud and runs the per-frame animation.
//!
//! Rendering goes through the [`RenderBackend`] trait so the lifecycle here
//! (generate, release the old cloud, attach the new one, animate, tear down)
//! does not depend on a live GPU. The wgpu implementation lives in
//! [`crate::gpu`].

use std::f32::consts::FRAC_PI_2;

use glam::Mat4;
use rand::rngs::StdRng;
use rand::SeedableRng;

use crate::camera::Camera;
use crate::generator::{generate_with, ParticleBuffers, RngSampler, Sampler};
use crate::params::GalaxyParams;

/// Upper bound on the device pixel ratio used for the drawable surface.
pub const MAX_PIXEL_RATIO: f64 = 2.0;

/// Rotation speed of the galaxy about the vertical axis, radians per second.
pub const ROTATION_SPEED: f32 = FRAC_PI_2;

/// Rendering description for a point cloud.
///
/// Points are always blended additively, so dense regions glow.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PointsMaterial {
    /// Point size in world units.
    pub size: f32,
    /// Whether points shrink with distance from the camera.
    pub size_attenuation: bool,
    pub depth_write: bool,
    /// Take per-point colors from the color buffer.
    pub vertex_colors: bool,
}

impl PointsMaterial {
    pub fn for_params(params: &GalaxyParams) -> Self {
        Self {
            size: params.size,
            size_attenuation: true,
            depth_write: false,
            vertex_colors: true,
        }
    }
}

/// Drawable surface size in physical pixels.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SurfaceSize {
    pub width: u32,
    pub height: u32,
}

/// Surface size for a window of `width x height` physical pixels.
///
/// Up to [`MAX_PIXEL_RATIO`] the surface matches the window exactly. Denser
/// displays render at the capped ratio and are scaled up on present, which
/// bounds fill rate.
pub fn surface_size(width: u32, height: u32, scale_factor: f64) -> SurfaceSize {
    let shrink = if scale_factor > MAX_PIXEL_RATIO {
        MAX_PIXEL_RATIO / scale_factor
    } else {
        1.0
    };
    SurfaceSize {
        width: ((width as f64 * shrink).round() as u32).max(1),
        height: ((height as f64 * shrink).round() as u32).max(1),
    }
}

/// Everything a backend needs to draw one frame.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FrameView {
    pub view_proj: Mat4,
    /// Transform of the point cloud.
    pub model: Mat4,
    pub material: Option<PointsMaterial>,
}

/// The graphics layer the scene driver draws through.
pub trait RenderBackend {
    /// GPU-side resources for one uploaded point cloud.
    type Points;
    type Error;

    /// Upload a freshly generated cloud.
    fn upload(&mut self, buffers: &ParticleBuffers, material: &PointsMaterial) -> Self::Points;

    /// Free a cloud's resources. The handle is consumed.
    fn release(&mut self, points: Self::Points);

    /// The drawable surface changed size.
    fn resize(&mut self, size: SurfaceSize);

    /// Draw one frame. `points` is `None` when nothing is attached or the
    /// attached cloud is empty.
    fn draw(&mut self, frame: &FrameView, points: Option<&Self::Points>) -> Result<(), Self::Error>;
}

/// A point cloud attached to the scene.
#[derive(Debug)]
pub struct PointCloud<P> {
    points: P,
    material: PointsMaterial,
    count: u32,
}

impl<P> PointCloud<P> {
    pub fn count(&self) -> u32 {
        self.count
    }

    pub fn material(&self) -> &PointsMaterial {
        &self.material
    }

    pub fn points(&self) -> &P {
        &self.points
    }
}

/// Owns the scene state and sequences regeneration and drawing.
///
/// At most one point cloud is attached at a time: the previous one is
/// released before its replacement is generated, and dropping the driver
/// releases whatever is still attached.
pub struct SceneDriver<B: RenderBackend> {
    backend: B,
    camera: Camera,
    params: Option<GalaxyParams>,
    cloud: Option<PointCloud<B::Points>>,
    rotation_y: f32,
    sampler: Box<dyn Sampler>,
}

impl<B: RenderBackend> SceneDriver<B> {
    /// Create a driver for a `width x height` viewport, drawing
    /// randomness from an entropy-seeded RNG.
    pub fn new(backend: B, width: u32, height: u32) -> Self {
        Self::with_sampler(
            backend,
            width,
            height,
            Box::new(RngSampler::new(StdRng::from_entropy())),
        )
    }

    /// Create a driver that draws randomness from `sampler`.
    pub fn with_sampler(backend: B, width: u32, height: u32, sampler: Box<dyn Sampler>) -> Self {
        Self {
            backend,
            camera: Camera::new(aspect_ratio(width, height)),
            params: None,
            cloud: None,
            rotation_y: 0.0,
            sampler,
        }
    }

    /// Replace the point cloud with one generated from `params`.
    pub fn on_parameter_committed(&mut self, params: GalaxyParams) {
        if let Some(old) = self.cloud.take() {
            self.backend.release(old.points);
        }

        let buffers = generate_with(&params, &mut *self.sampler);
        let material = PointsMaterial::for_params(&params);
        let points = self.backend.upload(&buffers, &material);

        log::info!(
            "galaxy regenerated: {} particles, {} branches, radius {}, spin {}, power {}",
            params.count,
            params.branches,
            params.radius,
            params.spin,
            params.randomness_power
        );

        self.cloud = Some(PointCloud {
            points,
            material,
            count: params.count,
        });
        self.params = Some(params);
    }

    /// Window resized to `width x height` physical pixels.
    ///
    /// The aspect ratio is the same in physical and logical pixels, so it is
    /// taken from the physical size directly. A zero-sized viewport
    /// (minimized window) is ignored.
    pub fn on_resize(&mut self, width: u32, height: u32, scale_factor: f64) {
        if width == 0 || height == 0 {
            return;
        }
        self.camera.aspect = aspect_ratio(width, height);
        let size = surface_size(width, height, scale_factor);
        log::debug!(
            "window {}x{} (scale {:.2}) -> surface {}x{}",
            width,
            height,
            scale_factor,
            size.width,
            size.height
        );
        self.backend.resize(size);
    }

    /// Advance the animation to `elapsed_secs` and draw once.
    pub fn frame(&mut self, elapsed_secs: f32) -> Result<(), B::Error> {
        self.rotation_y = elapsed_secs * ROTATION_SPEED;
        self.camera.update();

        let view = FrameView {
            view_proj: self.camera.view_proj(),
            model: Mat4::from_rotation_y(self.rotation_y),
            material: self.cloud.as_ref().map(|c| c.material),
        };
        let points = self
            .cloud
            .as_ref()
            .filter(|c| c.count > 0)
            .map(|c| &c.points);
        self.backend.draw(&view, points)
    }

    /// Release the attached cloud. Safe to call more than once.
    pub fn shutdown(&mut self) {
        if let Some(cloud) = self.cloud.take() {
            log::debug!("releasing point cloud of {} particles", cloud.count);
            self.backend.release(cloud.points);
        }
    }

    /// The parameters of the attached cloud, if any.
    pub fn params(&self) -> Option<&GalaxyParams> {
        self.params.as_ref()
    }

    pub fn cloud(&self) -> Option<&PointCloud<B::Points>> {
        self.cloud.as_ref()
    }

    /// Particles in the attached cloud.
    pub fn particle_count(&self) -> u32 {
        self.cloud.as_ref().map_or(0, |c| c.count)
    }

    /// Current rotation of the cloud about +Y, in radians.
    pub fn rotation_y(&self) -> f32 {
        self.rotation_y
    }

    pub fn camera(&self) -> &Camera {
        &self.camera
    }

    pub fn camera_mut(&mut self) -> &mut Camera {
        &mut self.camera
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }

    pub fn backend_mut(&mut self) -> &mut B {
        &mut self.backend
    }
}

impl<B: RenderBackend> Drop for SceneDriver<B> {
    fn drop(&mut self) {
        self.shutdown();
    }
}

fn aspect_ratio(width: u32, height: u32) -> f32 {
    width.max(1) as f32 / height.max(1) as f32
}
