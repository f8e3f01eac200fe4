//! Galaxy viewer builder and window event handling.

use std::sync::Arc;

use rand::rngs::StdRng;
use rand::SeedableRng;
use winit::{
    application::ApplicationHandler,
    event::{ElementState, MouseButton, WindowEvent},
    event_loop::{ActiveEventLoop, ControlFlow, EventLoop},
    window::{Fullscreen, Window, WindowId},
};

use crate::color::Rgb;
use crate::error::GalaxyError;
use crate::generator::{RngSampler, Sampler};
use crate::gpu::GpuState;
use crate::input::{Action, Input};
use crate::panel::{PanelStats, TweakPanel};
use crate::params::GalaxyParams;
use crate::scene::SceneDriver;
use crate::time::Clock;

/// A galaxy viewer builder.
///
/// Use method chaining to configure, then call `.run()` to open the window.
///
/// ```ignore
/// galaxy::Galaxy::new()
///     .with_branches(3)
///     .with_spin(-2.0)
///     .run()?;
/// ```
#[derive(Debug, Clone)]
pub struct Galaxy {
    params: GalaxyParams,
    seed: Option<u64>,
    title: String,
    window_size: (u32, u32),
}

impl Galaxy {
    /// Create a viewer with the default parameters.
    pub fn new() -> Self {
        Self {
            params: GalaxyParams::default(),
            seed: None,
            title: "Galaxy Generator".to_string(),
            window_size: (1280, 720),
        }
    }

    /// Replace all parameters at once.
    pub fn with_params(mut self, params: GalaxyParams) -> Self {
        self.params = params;
        self
    }

    pub fn with_count(mut self, count: u32) -> Self {
        self.params.count = count;
        self
    }

    pub fn with_size(mut self, size: f32) -> Self {
        self.params.size = size;
        self
    }

    pub fn with_radius(mut self, radius: f32) -> Self {
        self.params.radius = radius;
        self
    }

    pub fn with_spin(mut self, spin: f32) -> Self {
        self.params.spin = spin;
        self
    }

    pub fn with_branches(mut self, branches: u32) -> Self {
        self.params.branches = branches;
        self
    }

    pub fn with_randomness_power(mut self, power: f32) -> Self {
        self.params.randomness_power = power;
        self
    }

    /// Set the center and rim colors of the gradient.
    pub fn with_colors(mut self, inside: Rgb, outside: Rgb) -> Self {
        self.params.inside_color = inside;
        self.params.outside_color = outside;
        self
    }

    /// Seed the particle RNG so every run produces the same galaxy.
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = title.into();
        self
    }

    /// Initial window size in logical pixels.
    pub fn with_window_size(mut self, width: u32, height: u32) -> Self {
        self.window_size = (width, height);
        self
    }

    pub fn params(&self) -> &GalaxyParams {
        &self.params
    }

    fn sampler(&self) -> Box<dyn Sampler> {
        let rng = match self.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        Box::new(RngSampler::new(rng))
    }

    /// Open the window and run until it is closed.
    pub fn run(self) -> Result<(), GalaxyError> {
        self.params.validate()?;

        let event_loop = EventLoop::new()?;
        event_loop.set_control_flow(ControlFlow::Poll);

        let mut app = App::new(self);
        event_loop.run_app(&mut app)?;

        match app.error.take() {
            Some(err) => Err(err),
            None => Ok(()),
        }
    }
}

impl Default for Galaxy {
    fn default() -> Self {
        Self::new()
    }
}

/// Fullscreen state to switch to from `current`.
pub fn next_fullscreen(current: Option<&Fullscreen>) -> Option<Fullscreen> {
    match current {
        Some(_) => None,
        None => Some(Fullscreen::Borderless(None)),
    }
}

/// Enter borderless fullscreen on the current monitor, or leave it.
///
/// Platforms without fullscreen support ignore the request.
pub fn toggle_fullscreen(window: &Window) {
    let next = next_fullscreen(window.fullscreen().as_ref());
    if next.is_some() && window.current_monitor().is_none() {
        log::debug!("no monitor available, ignoring fullscreen request");
        return;
    }
    log::debug!("fullscreen {}", if next.is_some() { "on" } else { "off" });
    window.set_fullscreen(next);
}

struct App {
    config: Galaxy,
    window: Option<Arc<Window>>,
    driver: Option<SceneDriver<GpuState>>,
    panel: TweakPanel,
    input: Input,
    clock: Clock,
    error: Option<GalaxyError>,
}

impl App {
    fn new(config: Galaxy) -> Self {
        let panel = TweakPanel::new(config.params);
        Self {
            config,
            window: None,
            driver: None,
            panel,
            input: Input::new(),
            clock: Clock::new(),
            error: None,
        }
    }

    fn start(&mut self, event_loop: &ActiveEventLoop) -> Result<(), GalaxyError> {
        let (width, height) = self.config.window_size;
        let window_attrs = Window::default_attributes()
            .with_title(self.config.title.clone())
            .with_inner_size(winit::dpi::LogicalSize::new(width, height));

        let window = Arc::new(event_loop.create_window(window_attrs)?);
        let gpu = pollster::block_on(GpuState::new(window.clone()))?;

        let size = window.inner_size();
        let mut driver = SceneDriver::with_sampler(gpu, size.width, size.height, self.config.sampler());
        driver.on_parameter_committed(self.config.params);

        self.window = Some(window);
        self.driver = Some(driver);
        self.clock = Clock::new();
        Ok(())
    }

    fn apply(&mut self, action: Action, event_loop: &ActiveEventLoop) {
        let (Some(window), Some(driver)) = (&self.window, &mut self.driver) else {
            return;
        };
        match action {
            Action::Rotate { dx, dy } => driver.camera_mut().rotate(dx, dy),
            Action::Zoom(lines) => driver.camera_mut().zoom(lines),
            Action::ToggleFullscreen => toggle_fullscreen(window),
            Action::Escape => {
                if window.fullscreen().is_some() {
                    window.set_fullscreen(None);
                } else {
                    event_loop.exit();
                }
            }
        }
    }

    fn redraw(&mut self, event_loop: &ActiveEventLoop) {
        let (Some(window), Some(driver)) = (&self.window, &mut self.driver) else {
            return;
        };

        let elapsed = self.clock.tick();
        let stats = PanelStats {
            particles: driver.particle_count(),
            fps: self.clock.fps(),
        };
        let panel = &mut self.panel;
        if let Some(params) = driver.backend_mut().build_overlay(|ctx| panel.show(ctx, stats)) {
            driver.on_parameter_committed(params);
        }

        match driver.frame(elapsed) {
            Ok(()) => {}
            Err(wgpu::SurfaceError::Lost | wgpu::SurfaceError::Outdated) => {
                log::warn!("surface lost, reconfiguring");
                driver.backend_mut().reconfigure();
            }
            Err(wgpu::SurfaceError::OutOfMemory) => {
                log::error!("GPU out of memory, exiting");
                event_loop.exit();
            }
            Err(e) => log::warn!("render error: {:?}", e),
        }

        window.request_redraw();
    }
}

impl ApplicationHandler for App {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.window.is_some() {
            return;
        }
        if let Err(err) = self.start(event_loop) {
            log::error!("{err}");
            self.error = Some(err);
            event_loop.exit();
        }
    }

    fn window_event(&mut self, event_loop: &ActiveEventLoop, _id: WindowId, event: WindowEvent) {
        let consumed = self
            .driver
            .as_mut()
            .is_some_and(|driver| driver.backend_mut().overlay_event(&event));

        match event {
            WindowEvent::CloseRequested => {
                event_loop.exit();
            }
            WindowEvent::Resized(physical_size) => {
                if let (Some(window), Some(driver)) = (&self.window, &mut self.driver) {
                    driver.on_resize(physical_size.width, physical_size.height, window.scale_factor());
                }
            }
            WindowEvent::RedrawRequested => self.redraw(event_loop),
            // A release must always end a drag, even over the panel
            WindowEvent::MouseInput {
                state: ElementState::Released,
                button: MouseButton::Left,
                ..
            } => self.input.release(),
            _ if consumed => {}
            _ => {
                let scale_factor = self.window.as_ref().map_or(1.0, |w| w.scale_factor());
                if let Some(action) = self.input.handle(&event, scale_factor) {
                    self.apply(action, event_loop);
                }
            }
        }
    }

    fn exiting(&mut self, _event_loop: &ActiveEventLoop) {
        if let Some(driver) = self.driver.as_mut() {
            driver.shutdown();
        }
        log::info!("galaxy viewer closed after {} frames", self.clock.frame());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fullscreen_toggles() {
        let entered = next_fullscreen(None);
        assert!(matches!(entered, Some(Fullscreen::Borderless(None))));
        assert!(next_fullscreen(entered.as_ref()).is_none());
    }

    #[test]
    fn test_builder_sets_params() {
        let galaxy = Galaxy::new()
            .with_count(42)
            .with_branches(3)
            .with_spin(-2.0)
            .with_radius(7.0)
            .with_size(0.02)
            .with_randomness_power(4.0)
            .with_colors(Rgb::BLACK, Rgb::WHITE);
        let p = galaxy.params();
        assert_eq!(p.count, 42);
        assert_eq!(p.branches, 3);
        assert_eq!(p.spin, -2.0);
        assert_eq!(p.radius, 7.0);
        assert_eq!(p.size, 0.02);
        assert_eq!(p.randomness_power, 4.0);
        assert_eq!(p.inside_color, Rgb::BLACK);
        assert_eq!(p.outside_color, Rgb::WHITE);
    }

    #[test]
    fn test_seeded_samplers_agree() {
        let galaxy = Galaxy::new().with_seed(99);
        let mut a = galaxy.sampler();
        let mut b = galaxy.sampler();
        for _ in 0..16 {
            assert_eq!(a.uniform(), b.uniform());
        }
    }
}
