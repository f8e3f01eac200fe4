//! Tweak panel for the galaxy parameters.
//!
//! Widgets edit a working copy. Nothing is regenerated while a slider is
//! being dragged; the snapshot is committed once an edit happened and the
//! pointer has been let go.

use crate::color::Rgb;
use crate::params::{ranges, GalaxyParams, ParamRange};

/// Decides when a run of edits is finished.
#[derive(Debug, Default, Clone)]
pub struct CommitGate {
    pending: bool,
}

impl CommitGate {
    /// Feed one UI frame. Returns `true` when the pending edit should be
    /// committed.
    pub fn observe(&mut self, changed: bool, pointer_down: bool) -> bool {
        self.pending |= changed;
        if self.pending && !pointer_down {
            self.pending = false;
            true
        } else {
            false
        }
    }

    pub fn is_pending(&self) -> bool {
        self.pending
    }
}

/// Numbers shown under the controls.
#[derive(Debug, Clone, Copy, Default)]
pub struct PanelStats {
    pub particles: u32,
    pub fps: f32,
}

/// The parameter panel.
#[derive(Debug)]
pub struct TweakPanel {
    working: GalaxyParams,
    gate: CommitGate,
}

impl TweakPanel {
    pub fn new(params: GalaxyParams) -> Self {
        Self {
            working: params,
            gate: CommitGate::default(),
        }
    }

    /// The values currently shown in the panel.
    pub fn working(&self) -> &GalaxyParams {
        &self.working
    }

    /// Draw the panel. Returns a snapshot when an edit gesture finishes or
    /// the user asks for a fresh draw.
    pub fn show(&mut self, ctx: &egui::Context, stats: PanelStats) -> Option<GalaxyParams> {
        let mut changed = false;
        let mut regenerate = false;

        egui::Window::new("Parameters")
            .default_pos([12.0, 12.0])
            .resizable(false)
            .show(ctx, |ui| {
                let p = &mut self.working;
                changed |= edit(ui, &mut p.count, |v| int_slider(v, ranges::COUNT, "count"));
                changed |= edit(ui, &mut p.size, |v| float_slider(v, ranges::SIZE, "size"));
                changed |= edit(ui, &mut p.radius, |v| float_slider(v, ranges::RADIUS, "radius"));
                changed |= edit(ui, &mut p.spin, |v| float_slider(v, ranges::SPIN, "spin"));
                changed |= edit(ui, &mut p.branches, |v| int_slider(v, ranges::BRANCHES, "branches"));
                changed |= edit(ui, &mut p.randomness_power, |v| {
                    float_slider(v, ranges::RANDOMNESS_POWER, "randomness power")
                });

                changed |= color_row(ui, "inside color", &mut p.inside_color);
                changed |= color_row(ui, "outside color", &mut p.outside_color);

                ui.separator();
                regenerate = ui.button("Regenerate").clicked();
                ui.label(format!("{} particles, {:.0} fps", stats.particles, stats.fps));
            });

        let pointer_down = ctx.input(|i| i.pointer.any_down());
        let finished = self.gate.observe(changed, pointer_down);
        if finished || regenerate {
            log::debug!("committing parameters {:?}", self.working);
            Some(self.working)
        } else {
            None
        }
    }
}

/// Run one slider against a scratch copy of `value`.
///
/// Sliders snap off-step values to the step as soon as they are shown. Only
/// a value the user actually moved is written back, so the starting
/// parameters survive until someone touches them.
fn edit<T: Copy>(
    ui: &mut egui::Ui,
    value: &mut T,
    slider: impl FnOnce(&mut T) -> egui::Slider<'_>,
) -> bool {
    let mut scratch = *value;
    let response = ui.add(slider(&mut scratch));
    let touched = response.changed()
        && (response.dragged()
            || response.is_pointer_button_down_on()
            || response.clicked()
            || response.has_focus());
    if touched {
        *value = scratch;
    }
    touched
}

fn int_slider<'a>(value: &'a mut u32, range: ParamRange, label: &str) -> egui::Slider<'a> {
    egui::Slider::new(value, range.min as u32..=range.max as u32)
        .step_by(range.step)
        .text(label)
}

fn float_slider<'a>(value: &'a mut f32, range: ParamRange, label: &str) -> egui::Slider<'a> {
    egui::Slider::new(value, range.min as f32..=range.max as f32)
        .step_by(range.step)
        .text(label)
}

fn color_row(ui: &mut egui::Ui, label: &str, color: &mut Rgb) -> bool {
    ui.horizontal(|ui| {
        let mut srgb = color.to_srgb_u8();
        let changed = ui.color_edit_button_srgb(&mut srgb).changed();
        ui.label(label);
        if changed {
            *color = Rgb::from_srgb_u8(srgb);
        }
        changed
    })
    .inner
}
