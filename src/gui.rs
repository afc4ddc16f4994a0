//! `egui` widgets drawn on top of the animated scene: the stats overlay and the control panel.

use crate::controls::Controls;
use crate::stats::{FrameStats, StatsMode};

const OVERLAY_BACKGROUND: egui::Color32 = egui::Color32::from_rgb(0, 0, 34);
const FPS_COLOR: egui::Color32 = egui::Color32::from_rgb(0, 255, 255);
const MS_COLOR: egui::Color32 = egui::Color32::from_rgb(0, 255, 0);
const GRAPH_SIZE: egui::Vec2 = egui::vec2(74.0, 30.0);

/// Draws the frame counter in the top-left corner. Clicking it switches between FPS and MS.
pub fn show_stats(ctx: &egui::Context, stats: &mut FrameStats) {
    egui::Area::new(egui::Id::new("stats_overlay"))
        .anchor(egui::Align2::LEFT_TOP, [0.0, 0.0])
        .show(ctx, |ui| {
            egui::Frame::default()
                .fill(OVERLAY_BACKGROUND)
                .show(ui, |ui| {
                    let color = match stats.mode() {
                        StatsMode::Fps => FPS_COLOR,
                        StatsMode::Ms => MS_COLOR,
                    };

                    let mut text = format!("{:.0} {}", stats.value(), stats.mode().label());
                    if let (StatsMode::Fps, Some((min, max))) = (stats.mode(), stats.fps_range()) {
                        text.push_str(&format!(" ({min:.0}-{max:.0})"));
                    }

                    let label = ui
                        .label(egui::RichText::new(text).color(color).monospace())
                        .interact(egui::Sense::click());
                    if label.clicked() {
                        stats.cycle_mode();
                    }

                    let (rect, _) = ui.allocate_exact_size(GRAPH_SIZE, egui::Sense::hover());
                    let painter = ui.painter_at(rect);
                    let peak = stats.history().fold(1.0_f32, f32::max);
                    let bar_width = rect.width() / FrameStats::HISTORY_LEN as f32;
                    let offset = FrameStats::HISTORY_LEN - stats.history().len();
                    for (i, value) in stats.history().enumerate() {
                        let x = rect.left() + (offset + i) as f32 * bar_width;
                        let height = (value / peak).clamp(0.0, 1.0) * rect.height();
                        let bar = egui::Rect::from_min_max(
                            egui::pos2(x, rect.bottom() - height),
                            egui::pos2(x + bar_width, rect.bottom()),
                        );
                        painter.rect_filled(bar, 0.0, color);
                    }
                });
        });
}

/// Draws the speed sliders in the top-right corner and writes changes back through `controls`.
pub fn show_controls(ctx: &egui::Context, controls: &mut Controls, running: bool) {
    egui::Window::new("Controls")
        .anchor(egui::Align2::RIGHT_TOP, [-8.0, 8.0])
        .resizable(false)
        .collapsible(true)
        .show(ctx, |ui| {
            let mut rotation_speed = controls.rotation_speed();
            if ui
                .add(
                    egui::Slider::new(&mut rotation_speed, Controls::SPEED_RANGE)
                        .text("rotationSpeed"),
                )
                .changed()
            {
                controls.set_rotation_speed(rotation_speed);
            }

            let mut bouncing_speed = controls.bouncing_speed();
            if ui
                .add(
                    egui::Slider::new(&mut bouncing_speed, Controls::SPEED_RANGE)
                        .text("bouncingSpeed"),
                )
                .changed()
            {
                controls.set_bouncing_speed(bouncing_speed);
                log::debug!("Bouncing speed set to {}", controls.bouncing_speed());
            }

            if !running {
                ui.label("Paused (Space to resume)");
            }
        });
}
