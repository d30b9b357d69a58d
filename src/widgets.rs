use std::f32::consts::{FRAC_PI_2, TAU};

use eframe::egui::{
    self, pos2, vec2, Color32, FontId, Mesh, Pos2, Response, Sense, Shape, Stroke, Ui, Vec2,
};
use epaint::TextShape;

use crate::{
    color::{contrast_color, ItemColor, RIM_SHADE},
    helpers::ArcSteps,
    item::Item,
    resolver::POINTER_ANGLE_DEG,
    spin::WheelSnapshot,
};

const ARC_STEP: f32 = TAU / 96.0;
const RIM_MARGIN: f32 = 0.08;
const PEG_RADIUS: f32 = 0.012;
const CAP_RADIUS: f32 = 0.07;
const POINTER_SIZE: Vec2 = vec2(0.08, 0.12);

const SHADOW: Color32 = Color32::from_rgb(0x0f, 0x17, 0x2a);
const PEG_FILL: Color32 = Color32::from_rgb(0xe2, 0xe8, 0xf0);
const PEG_STROKE: Color32 = Color32::from_rgb(0x64, 0x74, 0x8b);
const CAP_FILL: Color32 = Color32::from_rgb(0x47, 0x55, 0x69);
const CAP_STROKE: Color32 = Color32::from_rgb(0x94, 0xa3, 0xb8);
const CAP_DOT: Color32 = Color32::from_rgb(0xf4, 0x72, 0xb6);
const POINTER_FILL: Color32 = Color32::from_rgb(0xcb, 0xd5, 0xe1);
const POINTER_STROKE: Color32 = Color32::from_rgb(0x1e, 0x1b, 0x4b);

/// Point at `angle` radians on a circle, clockwise from screen-right.
fn polar(center: Pos2, radius: f32, angle: f32) -> Pos2 {
    center + radius * Vec2::new(angle.cos(), angle.sin())
}

/// One segment as a triangle fan, shaded from the item color at the
/// hub to a darker rim.
fn segment_mesh(center: Pos2, radius: f32, start: f32, end: f32, color: ItemColor) -> Mesh {
    let mut mesh = Mesh::default();
    mesh.colored_vertex(center, color.into());
    let rim: Color32 = color.shade(RIM_SHADE).into();
    let mut last = None;
    for (a, b) in ArcSteps::new(start, end, ARC_STEP) {
        let first = match last {
            Some(i) => i,
            None => {
                mesh.colored_vertex(polar(center, radius, a), rim);
                mesh.vertices.len() as u32 - 1
            }
        };
        mesh.colored_vertex(polar(center, radius, b), rim);
        let second = mesh.vertices.len() as u32 - 1;
        mesh.add_triangle(0, first, second);
        last = Some(second);
    }
    mesh
}

fn segment_label(
    painter: &egui::Painter,
    center: Pos2,
    radius: f32,
    angle: f32,
    item: &Item,
) -> Shape {
    let font = FontId::proportional((radius * 0.075).clamp(9.0, 24.0));
    let text_color = contrast_color(Color32::from(item.color));
    let galley = painter.layout_no_wrap(item.display_label(), font, text_color);
    // right-aligned, ending short of the rim, centered on the segment axis
    let size = galley.size();
    let along = radius * 0.88 - size.x;
    let across = -size.y / 2.0;
    let (sin, cos) = angle.sin_cos();
    let pos = center + vec2(along * cos - across * sin, along * sin + across * cos);
    Shape::Text(TextShape::new(pos, galley, Color32::WHITE).with_angle(angle))
}

/// Paints the wheel and its pointer. `deflection_deg` tilts the pointer
/// after a tick.
pub fn wheel(ui: &mut Ui, items: &[Item], snapshot: &WheelSnapshot, deflection_deg: f32) -> Response {
    #[cfg(feature = "puffin")]
    puffin::profile_function!();
    let side = ui.available_width().min(ui.available_height()).max(64.0);
    let (response, painter) = ui.allocate_painter(Vec2::splat(side), Sense::click());
    let rect = response.rect;
    let center = rect.center();
    let radius = side / 2.0 * (1.0 - RIM_MARGIN);
    if items.is_empty() {
        return response;
    }

    let rotation = snapshot.rotation as f32;
    let segment = TAU / items.len() as f32;

    painter.circle_filled(center, radius * 1.03, SHADOW);

    for (i, item) in items.iter().enumerate() {
        let start = i as f32 * segment + rotation;
        let end = start + segment;
        painter.add(Shape::mesh(segment_mesh(center, radius, start, end, item.color)));
        painter.line_segment(
            [center, polar(center, radius, start)],
            Stroke::new(1.5, Color32::from_white_alpha(50)),
        );
        painter.add(segment_label(&painter, center, radius, start + segment / 2.0, item));
    }

    for i in 0..items.len() {
        let angle = i as f32 * segment + rotation;
        painter.circle(
            polar(center, radius * 1.01, angle),
            side * PEG_RADIUS,
            PEG_FILL,
            Stroke::new(1.5, PEG_STROKE),
        );
    }

    painter.circle(center, side * CAP_RADIUS, CAP_FILL, Stroke::new(3.0, CAP_STROKE));
    painter.circle_filled(center, side * CAP_RADIUS * 0.3, CAP_DOT);

    pointer(&painter, center, radius, side, deflection_deg);
    response
}

/// Downward triangle above the wheel at the resolver's pointer angle.
fn pointer(painter: &egui::Painter, center: Pos2, radius: f32, side: f32, deflection_deg: f32) {
    let size = POINTER_SIZE * side;
    let anchor = polar(center, radius + size.y * 0.3, (POINTER_ANGLE_DEG as f32).to_radians());
    let tilt = deflection_deg.to_radians();
    let (sin, cos) = tilt.sin_cos();
    // rotate around the top edge, like a flap hinged above the wheel
    let hinge = anchor - vec2(0.0, size.y);
    let turn = |p: Pos2| {
        let d = p - hinge;
        hinge + vec2(d.x * cos - d.y * sin, d.x * sin + d.y * cos)
    };
    let points = vec![
        turn(pos2(anchor.x - size.x / 2.0, hinge.y)),
        turn(pos2(anchor.x + size.x / 2.0, hinge.y)),
        turn(anchor),
    ];
    painter.add(Shape::convex_polygon(
        points,
        POINTER_FILL,
        Stroke::new(2.0, POINTER_STROKE),
    ));
}

/// Renders a small static wheel as window icon pixels, using the same
/// angular convention as the painter above.
pub fn wheel_icon(size: u32, colors: &[ItemColor]) -> egui::IconData {
    let mut rgba = Vec::with_capacity((size * size * 4) as usize);
    let half = size as f32 / 2.0;
    let count = colors.len().max(1);
    let segment = TAU / count as f32;
    for y in 0..size {
        for x in 0..size {
            let dx = x as f32 + 0.5 - half;
            let dy = y as f32 + 0.5 - half;
            if dx.hypot(dy) > half - 0.5 || colors.is_empty() {
                rgba.extend_from_slice(&[0, 0, 0, 0]);
                continue;
            }
            // icon rests a quarter turn back so segment 0 sits under the pointer
            let angle = (dy.atan2(dx) + FRAC_PI_2).rem_euclid(TAU);
            let index = ((angle / segment) as usize).min(count - 1);
            let color = colors[index];
            rgba.extend(color.iter());
            rgba.push(255);
        }
    }
    egui::IconData {
        rgba,
        width: size,
        height: size,
    }
}
