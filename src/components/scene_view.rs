use std::f32::consts::FRAC_PI_4;

use glam::Vec2;
use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::{Color, Style, Stylize},
    widgets::Widget,
};

use crate::{
    constants::scene::*,
    engine::{Aabb, NodeKind, SceneTree, Sprite},
};

/// Where the scene lands inside a terminal area. Every cell holds two square pixels.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Viewport {
    /// Pixels per scene unit.
    pub scale: f32,
    pub x: u16,
    pub y: u16,
    pub width: u16,
    /// Height in pixels, i.e. twice the number of rows used.
    pub height: u16,
    scene_height: f32,
}

impl Viewport {
    pub fn fit(scene: Vec2, area: Rect) -> Self {
        let pixels = Vec2::new(area.width as f32, area.height as f32 * 2.0);
        let scale = if scene.x > 0.0 && scene.y > 0.0 { (pixels / scene).min_element() } else { 0.0 };
        let width = ((scene.x * scale).round() as u16).min(area.width);
        let rows = (((scene.y * scale).round() as u16 + 1) / 2).min(area.height);
        Self {
            scale,
            x: area.x + (area.width - width) / 2,
            y: area.y + (area.height - rows) / 2,
            width,
            height: rows * 2,
            scene_height: scene.y,
        }
    }

    pub fn rows(&self) -> u16 {
        self.height / 2
    }

    /// Pixel column and row, counted from the top-left corner, of a scene point.
    pub fn to_pixel(&self, point: Vec2) -> Vec2 {
        Vec2::new(point.x, self.scene_height - point.y) * self.scale
    }

    /// Pixel rectangle `[x0, x1) x [y0, y1)` covered by `aabb`, clipped to the viewport.
    fn pixels(&self, aabb: &Aabb) -> Option<(u16, u16, u16, u16)> {
        let top_left = self.to_pixel(Vec2::new(aabb.min.x, aabb.max.y)).round();
        let bottom_right = self.to_pixel(Vec2::new(aabb.max.x, aabb.min.y)).round();
        let clip = |v: f32, max: u16| v.clamp(0.0, max as f32) as u16;
        let (x0, x1) = (clip(top_left.x, self.width), clip(bottom_right.x, self.width));
        let (y0, y1) = (clip(top_left.y, self.height), clip(bottom_right.y, self.height));
        (x0 < x1 && y0 < y1).then_some((x0, x1, y0, y1))
    }
}

struct Canvas {
    width: u16,
    pixels: Vec<Color>,
}

impl Canvas {
    fn new(width: u16, height: u16, fill: Color) -> Self {
        Self { width, pixels: vec![fill; width as usize * height as usize] }
    }

    /// Paints a rectangle, asking `shade` for the color at normalised coordinates (u right, v down).
    fn paint(&mut self, (x0, x1, y0, y1): (u16, u16, u16, u16), shade: impl Fn(f32, f32) -> Option<Color>) {
        let (w, h) = ((x1 - x0) as f32, (y1 - y0) as f32);
        for y in y0..y1 {
            for x in x0..x1 {
                let u = (x - x0) as f32 / w;
                let v = (y - y0) as f32 / h;
                if let Some(color) = shade(u, v) {
                    self.pixels[y as usize * self.width as usize + x as usize] = color;
                }
            }
        }
    }

    fn get(&self, x: u16, y: u16) -> Color {
        self.pixels.get(y as usize * self.width as usize + x as usize).copied().unwrap_or(SKY_COLOR)
    }
}

/// Rasterises a [`SceneTree`] with half-block glyphs, aspect-fit into the target area.
#[derive(Debug)]
pub struct SceneView<'a> {
    tree: &'a SceneTree,
}

impl<'a> SceneView<'a> {
    pub fn new(tree: &'a SceneTree) -> Self {
        Self { tree }
    }

    fn shade(sprite: Sprite, frame: usize) -> impl Fn(f32, f32) -> Option<Color> {
        move |u, v| match sprite {
            Sprite::Invisible => None,
            Sprite::Pipe if u < 0.15 || u > 0.85 => Some(PIPE_EDGE_COLOR),
            Sprite::Pipe => Some(PIPE_COLOR),
            Sprite::Ground if v < GRASS_DEPTH => Some(GRASS_COLOR),
            Sprite::Ground => Some(GROUND_COLOR),
            Sprite::Bird if u >= 0.75 && (0.3..0.7).contains(&v) => Some(BEAK_COLOR),
            Sprite::Bird if u < 0.5 && (frame % BIRD_FRAMES == 0) == (v < 0.5) => Some(WING_COLOR),
            Sprite::Bird => Some(BIRD_COLOR),
        }
    }
}

impl Widget for SceneView<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let viewport = Viewport::fit(self.tree.size(), area);
        if viewport.width == 0 || viewport.height == 0 {
            return;
        }

        let mut canvas = Canvas::new(viewport.width, viewport.height, SKY_COLOR);
        let mut labels = Vec::new();
        for id in self.tree.walk() {
            let Some(node) = self.tree.get(id) else { continue };
            let center = self.tree.origin(id) + self.tree.offset(id);
            match &node.kind {
                NodeKind::Container => {},
                NodeKind::Label(text) => labels.push((center, text.as_str())),
                NodeKind::Sprite(sprite) => {
                    // Quarter turns are as close as cells get to a rotated sprite.
                    let size =
                        if node.rotation.abs() > FRAC_PI_4 { Vec2::new(node.size.y, node.size.x) } else { node.size };
                    if let Some(pixels) = viewport.pixels(&Aabb::from_center(center, size)) {
                        canvas.paint(pixels, Self::shade(*sprite, node.frame));
                    }
                },
            }
        }

        for row in 0..viewport.rows() {
            for col in 0..viewport.width {
                let (top, bottom) = (canvas.get(col, row * 2), canvas.get(col, row * 2 + 1));
                if let Some(cell) = buf.cell_mut((viewport.x + col, viewport.y + row)) {
                    cell.set_symbol(PIXEL_GLYPH).set_fg(top).set_bg(bottom);
                }
            }
        }

        for (center, text) in labels {
            let pixel = viewport.to_pixel(center);
            let width = text.chars().count() as u16;
            if pixel.y < 0.0 || pixel.y >= viewport.height as f32 || width > viewport.width {
                continue;
            }
            let col = (pixel.x.max(0.0) as u16).saturating_sub(width / 2).min(viewport.width - width);
            let row = pixel.y as u16 / 2;
            let bg = canvas.get(col, row * 2);
            buf.set_string(viewport.x + col, viewport.y + row, text, Style::default().fg(SCORE_COLOR).bg(bg).bold());
        }
    }
}
