//! 2D layer drawn over the 3D view with egui: axis labels, hover tooltip,
//! load status and the FPS readout. Nothing here is interactable, so the
//! overlay never takes pointer input away from the orbit controls.

use egui::{Align2, Color32, CornerRadius, Frame, Margin, RichText};
use glam::Vec2;

use crate::camera::PerspectiveCamera;
use crate::scene::AxisLabel;

/// Tooltip sits this far right and below the cursor, in pixels
pub const TOOLTIP_OFFSET: Vec2 = Vec2::new(10.0, 10.0);

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Tooltip {
    pub text: String,
    pub visible: bool,
    /// Top-left corner in physical pixels
    pub position: Vec2,
}

impl Tooltip {
    pub fn show(&mut self, text: impl Into<String>, cursor: Vec2) {
        self.text = text.into();
        self.position = cursor + TOOLTIP_OFFSET;
        self.visible = true;
    }

    pub fn hide(&mut self) {
        self.visible = false;
    }
}

/// Boxed text look shared by labels and the tooltip
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LabelStyle {
    pub text_color: Color32,
    pub background: Color32,
    pub font_size: f32,
    pub padding: Margin,
    pub corner_radius: u8,
}

impl LabelStyle {
    pub fn axis() -> Self {
        Self {
            text_color: Color32::WHITE,
            background: Color32::from_black_alpha(128),
            font_size: 20.0,
            padding: Margin::symmetric(10, 5),
            corner_radius: 5,
        }
    }

    pub fn tooltip() -> Self {
        Self {
            font_size: 14.0,
            ..Self::axis()
        }
    }

    fn frame(&self) -> Frame {
        Frame::NONE
            .fill(self.background)
            .inner_margin(self.padding)
            .corner_radius(CornerRadius::same(self.corner_radius))
    }

    fn text(&self, text: &str) -> RichText {
        RichText::new(text).size(self.font_size).color(self.text_color)
    }
}

impl Default for LabelStyle {
    fn default() -> Self {
        Self::axis()
    }
}

/// Label text at a screen position in physical pixels
#[derive(Debug, Clone, PartialEq)]
pub struct ScreenLabel {
    pub text: String,
    pub position: Vec2,
}

/// Labels that land inside the depth range, in pixels
pub fn project_labels(
    labels: &[AxisLabel],
    camera: &PerspectiveCamera,
    viewport: Vec2,
) -> Vec<ScreenLabel> {
    labels
        .iter()
        .filter_map(|label| {
            camera.project(label.position, viewport).map(|position| ScreenLabel {
                text: label.text.clone(),
                position,
            })
        })
        .collect()
}

#[derive(Debug, Clone, PartialEq)]
pub enum Status {
    Loading(String),
    Ready,
    Error(String),
}

impl Status {
    pub fn message(&self) -> Option<String> {
        match self {
            Status::Loading(path) => Some(format!("Loading {}...", path)),
            Status::Ready => None,
            Status::Error(message) => Some(format!("Error loading model: {}", message)),
        }
    }
}

#[derive(Debug, Clone)]
pub struct Overlay {
    pub enabled: bool,
    pub labels: Vec<ScreenLabel>,
    pub tooltip: Tooltip,
    pub status: Status,
    pub fps: f32,
    pub label_style: LabelStyle,
    pub tooltip_style: LabelStyle,
}

impl Overlay {
    pub fn new(enabled: bool) -> Self {
        Self {
            enabled,
            labels: Vec::new(),
            tooltip: Tooltip::default(),
            status: Status::Ready,
            fps: 0.0,
            label_style: LabelStyle::axis(),
            tooltip_style: LabelStyle::tooltip(),
        }
    }

    /// Draw into the current egui pass. Positions are stored in physical
    /// pixels and converted to points here.
    pub fn draw(&self, ctx: &egui::Context, pixels_per_point: f32) {
        if !self.enabled {
            return;
        }
        let to_points = |p: Vec2| egui::pos2(p.x / pixels_per_point, p.y / pixels_per_point);

        for (i, label) in self.labels.iter().enumerate() {
            boxed_text(
                ctx,
                egui::Id::new(("axis_label", i)),
                to_points(label.position),
                Align2::CENTER_CENTER,
                egui::Order::Background,
                &self.label_style,
                &label.text,
            );
        }

        if self.tooltip.visible {
            boxed_text(
                ctx,
                egui::Id::new("hover_tooltip"),
                to_points(self.tooltip.position),
                Align2::LEFT_TOP,
                egui::Order::Tooltip,
                &self.tooltip_style,
                &self.tooltip.text,
            );
        }

        if let Some(message) = self.status.message() {
            let color = match self.status {
                Status::Error(_) => Color32::from_rgb(200, 40, 40),
                _ => Color32::DARK_GRAY,
            };
            egui::Area::new(egui::Id::new("status"))
                .anchor(Align2::LEFT_BOTTOM, egui::vec2(10.0, -10.0))
                .interactable(false)
                .show(ctx, |ui| {
                    ui.label(RichText::new(message).size(16.0).color(color));
                });
        }

        egui::Area::new(egui::Id::new("fps"))
            .fixed_pos(egui::pos2(10.0, 10.0))
            .interactable(false)
            .show(ctx, |ui| {
                ui.label(
                    RichText::new(format!("{:.0}", self.fps))
                        .size(48.0)
                        .color(Color32::from_rgb(74, 158, 255)),
                );
                ui.label(RichText::new("FPS").size(12.0).color(Color32::GRAY));
            });
    }
}

fn boxed_text(
    ctx: &egui::Context,
    id: egui::Id,
    pos: egui::Pos2,
    pivot: Align2,
    order: egui::Order,
    style: &LabelStyle,
    text: &str,
) {
    egui::Area::new(id)
        .fixed_pos(pos)
        .pivot(pivot)
        .order(order)
        .interactable(false)
        .show(ctx, |ui| {
            style.frame().show(ui, |ui| {
                ui.add(
                    egui::Label::new(style.text(text))
                        .wrap_mode(egui::TextWrapMode::Extend)
                        .selectable(false),
                );
            });
        });
}
