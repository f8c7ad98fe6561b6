// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Geometric utility types and functions.
//!
//! Screen-space rectangles use `f32` logical points (the same unit egui
//! uses), with exclusive right/bottom edges: a rectangle at `x` with width
//! `w` spans `x..x + w`. Width and height may be negative while a drag is in
//! progress; [`Rect::normalized`] flips them back.
//!
//! Image-space rectangles use [`PixelRect`] with unsigned pixel coordinates.

/// A point in screen space.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Point {
    pub x: f32,
    pub y: f32,
}

impl Point {
    pub fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }
}

impl From<egui::Pos2> for Point {
    fn from(p: egui::Pos2) -> Self {
        Self::new(p.x, p.y)
    }
}

impl From<Point> for egui::Pos2 {
    fn from(p: Point) -> Self {
        egui::pos2(p.x, p.y)
    }
}

/// Axis-aligned rectangle in screen space.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Rect {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

impl Rect {
    pub const EMPTY: Rect = Rect {
        x: 0.0,
        y: 0.0,
        width: 0.0,
        height: 0.0,
    };

    pub fn new(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// Rectangle spanning two corners, in the order given (not normalized).
    pub fn from_corners(top_left: Point, bottom_right: Point) -> Self {
        Self::new(
            top_left.x,
            top_left.y,
            bottom_right.x - top_left.x,
            bottom_right.y - top_left.y,
        )
    }

    pub fn right(&self) -> f32 {
        self.x + self.width
    }

    pub fn bottom(&self) -> f32 {
        self.y + self.height
    }

    pub fn top_left(&self) -> Point {
        Point::new(self.x, self.y)
    }

    pub fn top_right(&self) -> Point {
        Point::new(self.right(), self.y)
    }

    pub fn bottom_left(&self) -> Point {
        Point::new(self.x, self.bottom())
    }

    pub fn bottom_right(&self) -> Point {
        Point::new(self.right(), self.bottom())
    }

    /// True when the rectangle covers no area.
    pub fn is_empty(&self) -> bool {
        self.width == 0.0 || self.height == 0.0
    }

    /// Moves the top-left corner, keeping the bottom-right corner fixed.
    pub fn set_top_left(&mut self, p: Point) {
        let (right, bottom) = (self.right(), self.bottom());
        self.x = p.x;
        self.y = p.y;
        self.width = right - p.x;
        self.height = bottom - p.y;
    }

    /// Moves the top-right corner, keeping the bottom-left corner fixed.
    pub fn set_top_right(&mut self, p: Point) {
        let bottom = self.bottom();
        self.width = p.x - self.x;
        self.y = p.y;
        self.height = bottom - p.y;
    }

    /// Moves the bottom-left corner, keeping the top-right corner fixed.
    pub fn set_bottom_left(&mut self, p: Point) {
        let right = self.right();
        self.x = p.x;
        self.width = right - p.x;
        self.height = p.y - self.y;
    }

    /// Moves the bottom-right corner, keeping the top-left corner fixed.
    pub fn set_bottom_right(&mut self, p: Point) {
        self.width = p.x - self.x;
        self.height = p.y - self.y;
    }

    /// Translates the rectangle so its top-left corner lands on `p`.
    pub fn move_to(&mut self, p: Point) {
        self.x = p.x;
        self.y = p.y;
    }

    /// Returns the same area with non-negative width and height.
    pub fn normalized(&self) -> Rect {
        let (x, width) = if self.width < 0.0 {
            (self.x + self.width, -self.width)
        } else {
            (self.x, self.width)
        };
        let (y, height) = if self.height < 0.0 {
            (self.y + self.height, -self.height)
        } else {
            (self.y, self.height)
        };
        Rect::new(x, y, width, height)
    }

    /// Inclusive containment test on both edges.
    pub fn contains(&self, p: Point) -> bool {
        let r = self.normalized();
        p.x >= r.x && p.x <= r.right() && p.y >= r.y && p.y <= r.bottom()
    }

    /// Clamps a point into this rectangle.
    pub fn clamp_point(&self, p: Point) -> Point {
        Point::new(
            p.x.clamp(self.x, self.right().max(self.x)),
            p.y.clamp(self.y, self.bottom().max(self.y)),
        )
    }

    /// Normalizes `self` and clamps both corners into `bounds`.
    pub fn clamp_to(&self, bounds: &Rect) -> Rect {
        let r = self.normalized();
        Rect::from_corners(
            bounds.clamp_point(r.top_left()),
            bounds.clamp_point(r.bottom_right()),
        )
    }
}

impl From<Rect> for egui::Rect {
    fn from(r: Rect) -> Self {
        let r = r.normalized();
        egui::Rect::from_min_size(egui::pos2(r.x, r.y), egui::vec2(r.width, r.height))
    }
}

impl From<egui::Rect> for Rect {
    fn from(r: egui::Rect) -> Self {
        Rect::new(r.min.x, r.min.y, r.width(), r.height())
    }
}

/// Axis-aligned rectangle in image pixels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct PixelRect {
    pub x: u32,
    pub y: u32,
    pub width: u32,
    pub height: u32,
}

impl PixelRect {
    pub fn new(x: u32, y: u32, width: u32, height: u32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.width == 0 || self.height == 0
    }

    /// True when `self` lies fully inside a `width` x `height` image.
    pub fn fits_within(&self, width: u32, height: u32) -> bool {
        u64::from(self.x) + u64::from(self.width) <= u64::from(width)
            && u64::from(self.y) + u64::from(self.height) <= u64::from(height)
    }
}

/// Fit an image of the given size into `available`, keeping the aspect
/// ratio and centering it.
pub fn fit_rect(image_width: u32, image_height: u32, available: &Rect) -> Rect {
    if image_width == 0 || image_height == 0 || available.is_empty() {
        return Rect::EMPTY;
    }

    // Never upscale past the native size.
    let scale = (available.width / image_width as f32)
        .min(available.height / image_height as f32)
        .min(1.0);

    let display_width = image_width as f32 * scale;
    let display_height = image_height as f32 * scale;

    Rect::new(
        available.x + (available.width - display_width) / 2.0,
        available.y + (available.height - display_height) / 2.0,
        display_width,
        display_height,
    )
}

/// Width of an image scaled to the given height, keeping the aspect ratio.
pub fn width_for_height(image_width: u32, image_height: u32, height: f32) -> f32 {
    if image_height == 0 {
        return 0.0;
    }
    image_width as f32 * height / image_height as f32
}

/// Map a screen-space selection on a displayed image to image pixels.
///
/// `image_rect` is where the image is drawn on screen; the result is clamped
/// to the image bounds.
pub fn to_pixel_rect(
    selection: &Rect,
    image_rect: &Rect,
    image_width: u32,
    image_height: u32,
) -> PixelRect {
    if image_rect.is_empty() {
        return PixelRect::default();
    }

    let sel = selection.normalized();
    let sx = image_width as f32 / image_rect.width;
    let sy = image_height as f32 / image_rect.height;

    let map = |v: f32, origin: f32, scale: f32, max: u32| -> u32 {
        (((v - origin) * scale).round().max(0.0) as u32).min(max)
    };

    let left = map(sel.x, image_rect.x, sx, image_width);
    let top = map(sel.y, image_rect.y, sy, image_height);
    let right = map(sel.right(), image_rect.x, sx, image_width);
    let bottom = map(sel.bottom(), image_rect.y, sy, image_height);

    PixelRect::new(left, top, right - left, bottom - top)
}
