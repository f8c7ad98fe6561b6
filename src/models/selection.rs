// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Crop region selection.
//!
//! [`RegionSelector`] is a plain state machine driven by pointer events in
//! screen coordinates. It knows nothing about egui; the crop overlay widget
//! translates raw input into the `pointer_*` calls and renders the result.
//!
//! The user drags out a rectangle inside the available area (the displayed
//! image), then adjusts it by dragging one of the four corner handles or
//! moving the whole rectangle.

use crate::util::geometry::{Point, Rect};

/// Side length of a corner handle, in logical points.
pub const HANDLE_SIZE: f32 = 15.0;

/// Corner handle of the selection.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Handle {
    TopLeft,
    TopRight,
    BottomLeft,
    BottomRight,
}

impl Handle {
    pub const ALL: [Handle; 4] = [
        Handle::TopLeft,
        Handle::TopRight,
        Handle::BottomLeft,
        Handle::BottomRight,
    ];
}

/// Cursor the host should display over the selector.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CursorHint {
    #[default]
    Default,
    Crosshair,
    /// Top-left / bottom-right diagonal.
    ResizeNwSe,
    /// Top-right / bottom-left diagonal.
    ResizeNeSw,
    Move,
}

/// What the primary button is currently doing.
#[derive(Debug, Clone, Copy, PartialEq)]
enum Drag {
    None,
    Selecting,
    Resizing(Handle),
    Moving { last: Point },
}

/// Crop rectangle state machine.
#[derive(Debug, Clone)]
pub struct RegionSelector {
    available: Rect,
    selected: Rect,
    started: bool,
    nothing_selected: bool,
    drag: Drag,
    hovered_handle: Option<Handle>,
    hovered_inside: bool,
    cursor: CursorHint,
}

impl RegionSelector {
    /// Create a selector bound to `available` and start selecting.
    pub fn new(available: Rect) -> Self {
        let mut selector = Self {
            available,
            selected: Rect::EMPTY,
            started: false,
            nothing_selected: true,
            drag: Drag::None,
            hovered_handle: None,
            hovered_inside: false,
            cursor: CursorHint::Default,
        };
        selector.start(available);
        selector
    }

    /// Enter the active state with no selection.
    pub fn start(&mut self, available: Rect) {
        self.available = available;
        self.selected = Rect::EMPTY;
        self.started = true;
        self.nothing_selected = true;
        self.drag = Drag::None;
        self.hovered_handle = None;
        self.hovered_inside = false;
        self.cursor = CursorHint::Default;
    }

    /// Leave the active state, discarding any drag in progress.
    pub fn stop(&mut self) {
        self.started = false;
        self.drag = Drag::None;
        self.hovered_handle = None;
        self.hovered_inside = false;
        self.cursor = CursorHint::Default;
    }

    pub fn is_started(&self) -> bool {
        self.started
    }

    pub fn available_rect(&self) -> Rect {
        self.available
    }

    /// Current selection, or an empty rectangle if nothing was selected yet.
    pub fn selected_rect(&self) -> Rect {
        if self.nothing_selected {
            Rect::EMPTY
        } else {
            self.selected
        }
    }

    pub fn has_selection(&self) -> bool {
        !self.nothing_selected
    }

    pub fn is_dragging(&self) -> bool {
        self.drag != Drag::None
    }

    /// Handle being dragged, if any.
    pub fn active_handle(&self) -> Option<Handle> {
        match self.drag {
            Drag::Resizing(handle) => Some(handle),
            _ => None,
        }
    }

    pub fn hovered_handle(&self) -> Option<Handle> {
        self.hovered_handle
    }

    pub fn cursor(&self) -> CursorHint {
        self.cursor
    }

    /// Whether handles straddle the selection edges instead of sitting
    /// inside them. Small selections would otherwise be covered by handles.
    fn handles_outside(&self) -> bool {
        let r = self.selected.normalized();
        r.width < HANDLE_SIZE * 3.0 || r.height < HANDLE_SIZE * 3.0
    }

    /// Hit zone of a corner handle.
    pub fn handle_rect(&self, handle: Handle) -> Rect {
        let r = self.selected.normalized();
        let h = HANDLE_SIZE;

        let (x, y) = if self.handles_outside() {
            match handle {
                Handle::TopLeft => (r.x - h, r.y - h),
                Handle::TopRight => (r.right(), r.y - h),
                Handle::BottomLeft => (r.x - h, r.bottom()),
                Handle::BottomRight => (r.right(), r.bottom()),
            }
        } else {
            match handle {
                Handle::TopLeft => (r.x, r.y),
                Handle::TopRight => (r.right() - h, r.y),
                Handle::BottomLeft => (r.x, r.bottom() - h),
                Handle::BottomRight => (r.right() - h, r.bottom() - h),
            }
        };

        Rect::new(x, y, h, h)
    }

    fn handle_at(&self, p: Point) -> Option<Handle> {
        Handle::ALL
            .into_iter()
            .find(|&handle| self.handle_rect(handle).contains(p))
    }

    /// Clamp a single point into the available area.
    fn bound_to_available(&self, p: Point) -> Point {
        self.available.clamp_point(p)
    }

    /// Clamp a prospective top-left so the whole selection stays inside.
    fn bound_top_left_to_available(&self, p: Point) -> Point {
        let a = &self.available;
        let max_x = (a.right() - self.selected.width).max(a.x);
        let max_y = (a.bottom() - self.selected.height).max(a.y);
        Point::new(p.x.clamp(a.x, max_x), p.y.clamp(a.y, max_y))
    }

    /// Primary button pressed at `p`.
    pub fn pointer_pressed(&mut self, p: Point) {
        if !self.started {
            return;
        }

        if self.has_selection() {
            if let Some(handle) = self.handle_at(p) {
                self.drag = Drag::Resizing(handle);
                log::debug!("Resizing selection from {:?}", handle);
                return;
            }

            if self.selected.contains(p) {
                self.drag = Drag::Moving { last: p };
                log::debug!("Moving selection");
                return;
            }
        }

        if self.available.contains(p) {
            let anchor = self.bound_to_available(p);
            self.selected = Rect::new(anchor.x, anchor.y, 0.0, 0.0);
            self.nothing_selected = true;
            self.drag = Drag::Selecting;
            log::debug!("Started new selection at ({:.1}, {:.1})", anchor.x, anchor.y);
        }
    }

    /// Pointer moved to `p`, with or without the button held.
    pub fn pointer_moved(&mut self, p: Point) {
        if !self.started {
            return;
        }

        match self.drag {
            Drag::Selecting => {
                let corner = self.bound_to_available(p);
                self.selected.set_bottom_right(corner);
                if self.selected.width != 0.0 && self.selected.height != 0.0 {
                    self.nothing_selected = false;
                }
            }
            Drag::Resizing(handle) => {
                let corner = self.bound_to_available(p);
                match handle {
                    Handle::TopLeft => self.selected.set_top_left(corner),
                    Handle::TopRight => self.selected.set_top_right(corner),
                    Handle::BottomLeft => self.selected.set_bottom_left(corner),
                    Handle::BottomRight => self.selected.set_bottom_right(corner),
                }
            }
            Drag::Moving { last } => {
                let target = Point::new(
                    self.selected.x + p.x - last.x,
                    self.selected.y + p.y - last.y,
                );
                let top_left = self.bound_top_left_to_available(target);
                self.selected.move_to(top_left);
                self.drag = Drag::Moving { last: p };
            }
            Drag::None => self.update_hover(p),
        }
    }

    /// Primary button released.
    pub fn pointer_released(&mut self) {
        if self.drag == Drag::None {
            return;
        }

        self.drag = Drag::None;
        self.hovered_handle = None;
        self.selected = self.selected.normalized();

        if self.selected.is_empty() {
            self.nothing_selected = true;
        }

        log::debug!("Selection is now {:?}", self.selected_rect());
    }

    fn update_hover(&mut self, p: Point) {
        self.hovered_handle = None;
        self.hovered_inside = false;

        if self.has_selection() {
            self.hovered_handle = self.handle_at(p);
            self.hovered_inside = self.hovered_handle.is_none() && self.selected.contains(p);
        }

        self.cursor = match self.hovered_handle {
            Some(Handle::TopLeft) | Some(Handle::BottomRight) => CursorHint::ResizeNwSe,
            Some(Handle::TopRight) | Some(Handle::BottomLeft) => CursorHint::ResizeNeSw,
            None if self.hovered_inside => CursorHint::Move,
            None if !self.has_selection() && self.available.contains(p) => CursorHint::Crosshair,
            None => CursorHint::Default,
        };
    }

    /// The available area changed (e.g. the window was resized).
    ///
    /// Each edge of the selection keeps its distance from the matching edge
    /// of the available area, scaled by the new-to-old size ratio.
    pub fn set_available_rect(&mut self, new: Rect) {
        let old = self.available;
        self.available = new;

        if self.nothing_selected || old == new {
            return;
        }

        if old.width == 0.0 || old.height == 0.0 {
            self.selected = self.selected.clamp_to(&new);
            return;
        }

        let x_ratio = new.width / old.width;
        let y_ratio = new.height / old.height;
        let sel = self.selected;

        let left = (sel.x - old.x) * x_ratio + new.x;
        let top = (sel.y - old.y) * y_ratio + new.y;
        let right = new.right() - (old.right() - sel.right()) * x_ratio;
        let bottom = new.bottom() - (old.bottom() - sel.bottom()) * y_ratio;

        self.selected = Rect::from_corners(Point::new(left, top), Point::new(right, bottom));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn drag(selector: &mut RegionSelector, from: (f32, f32), to: (f32, f32)) {
        selector.pointer_moved(Point::new(from.0, from.1));
        selector.pointer_pressed(Point::new(from.0, from.1));
        selector.pointer_moved(Point::new(to.0, to.1));
        selector.pointer_released();
    }

    fn selector_with(sel: Rect) -> RegionSelector {
        let mut s = RegionSelector::new(Rect::new(0.0, 0.0, 400.0, 300.0));
        drag(&mut s, (sel.x, sel.y), (sel.right(), sel.bottom()));
        assert_eq!(s.selected_rect(), sel);
        s
    }

    #[test]
    fn test_nothing_selected_initially() {
        let s = RegionSelector::new(Rect::new(0.0, 0.0, 400.0, 300.0));
        assert!(s.is_started());
        assert_eq!(s.selected_rect(), Rect::EMPTY);
    }

    #[test]
    fn test_drag_creates_clamped_selection() {
        let mut s = RegionSelector::new(Rect::new(10.0, 10.0, 200.0, 100.0));
        drag(&mut s, (50.0, 50.0), (500.0, 500.0));
        assert_eq!(s.selected_rect(), Rect::new(50.0, 50.0, 160.0, 60.0));
    }

    #[test]
    fn test_reverse_drag_is_normalized() {
        let mut s = RegionSelector::new(Rect::new(0.0, 0.0, 400.0, 300.0));
        drag(&mut s, (200.0, 150.0), (100.0, 50.0));
        let r = s.selected_rect();
        assert_eq!(r, Rect::new(100.0, 50.0, 100.0, 100.0));
        assert!(r.width >= 0.0 && r.height >= 0.0);
    }

    #[test]
    fn test_click_without_drag_selects_nothing() {
        let mut s = RegionSelector::new(Rect::new(0.0, 0.0, 400.0, 300.0));
        drag(&mut s, (100.0, 100.0), (100.0, 100.0));
        assert!(!s.has_selection());
        assert_eq!(s.selected_rect(), Rect::EMPTY);
    }

    #[test]
    fn test_handles_inside_large_selection() {
        let s = selector_with(Rect::new(50.0, 50.0, 100.0, 100.0));
        assert_eq!(
            s.handle_rect(Handle::TopLeft),
            Rect::new(50.0, 50.0, HANDLE_SIZE, HANDLE_SIZE)
        );
        assert_eq!(
            s.handle_rect(Handle::BottomRight),
            Rect::new(135.0, 135.0, HANDLE_SIZE, HANDLE_SIZE)
        );
    }

    #[test]
    fn test_handles_outside_small_selection() {
        let s = selector_with(Rect::new(100.0, 100.0, 40.0, 100.0));
        assert_eq!(
            s.handle_rect(Handle::TopLeft),
            Rect::new(85.0, 85.0, HANDLE_SIZE, HANDLE_SIZE)
        );
        assert_eq!(
            s.handle_rect(Handle::TopRight),
            Rect::new(140.0, 85.0, HANDLE_SIZE, HANDLE_SIZE)
        );
        assert_eq!(
            s.handle_rect(Handle::BottomLeft),
            Rect::new(85.0, 200.0, HANDLE_SIZE, HANDLE_SIZE)
        );
    }

    #[test]
    fn test_hover_cursor_feedback() {
        let mut s = selector_with(Rect::new(50.0, 50.0, 100.0, 100.0));

        s.pointer_moved(Point::new(55.0, 55.0));
        assert_eq!(s.cursor(), CursorHint::ResizeNwSe);
        assert_eq!(s.hovered_handle(), Some(Handle::TopLeft));

        s.pointer_moved(Point::new(145.0, 55.0));
        assert_eq!(s.cursor(), CursorHint::ResizeNeSw);

        s.pointer_moved(Point::new(100.0, 100.0));
        assert_eq!(s.cursor(), CursorHint::Move);

        s.pointer_moved(Point::new(300.0, 250.0));
        assert_eq!(s.cursor(), CursorHint::Default);
    }

    #[test]
    fn test_resize_by_corner_handle() {
        let mut s = selector_with(Rect::new(50.0, 50.0, 100.0, 100.0));
        drag(&mut s, (145.0, 145.0), (200.0, 180.0));
        // The press was 5 points inside the corner; the corner follows the pointer.
        assert_eq!(s.selected_rect(), Rect::new(50.0, 50.0, 150.0, 130.0));
    }

    #[test]
    fn test_resize_past_opposite_corner_normalizes() {
        let mut s = selector_with(Rect::new(50.0, 50.0, 100.0, 100.0));
        drag(&mut s, (52.0, 52.0), (250.0, 200.0));
        assert_eq!(s.selected_rect(), Rect::new(150.0, 150.0, 100.0, 50.0));
    }

    #[test]
    fn test_resize_to_zero_width_clears_selection() {
        let mut s = selector_with(Rect::new(50.0, 50.0, 100.0, 100.0));
        // Top-left corner dragged onto the right edge.
        drag(&mut s, (55.0, 55.0), (150.0, 80.0));
        assert!(!s.has_selection());
        assert_eq!(s.selected_rect(), Rect::EMPTY);

        // The next drag starts a fresh selection.
        drag(&mut s, (10.0, 10.0), (30.0, 40.0));
        assert_eq!(s.selected_rect(), Rect::new(10.0, 10.0, 20.0, 30.0));
    }

    #[test]
    fn test_resize_is_clamped_to_available() {
        let mut s = selector_with(Rect::new(50.0, 50.0, 100.0, 100.0));
        drag(&mut s, (55.0, 55.0), (-100.0, -100.0));
        assert_eq!(s.selected_rect(), Rect::new(0.0, 0.0, 150.0, 150.0));
    }

    #[test]
    fn test_move_keeps_rect_inside() {
        let mut s = selector_with(Rect::new(50.0, 50.0, 100.0, 100.0));
        drag(&mut s, (100.0, 100.0), (130.0, 90.0));
        assert_eq!(s.selected_rect(), Rect::new(80.0, 40.0, 100.0, 100.0));

        drag(&mut s, (100.0, 100.0), (1000.0, 1000.0));
        assert_eq!(s.selected_rect(), Rect::new(300.0, 200.0, 100.0, 100.0));
    }

    #[test]
    fn test_available_rect_halved_rescales_selection() {
        let mut s = selector_with(Rect::new(50.0, 50.0, 100.0, 100.0));
        s.set_available_rect(Rect::new(0.0, 0.0, 200.0, 150.0));

        let r = s.selected_rect();
        assert_eq!(r.top_left(), Point::new(25.0, 25.0));
        assert_eq!(r.bottom_right(), Point::new(75.0, 75.0));
    }

    #[test]
    fn test_available_rect_moved_preserves_relative_position() {
        let mut s = selector_with(Rect::new(50.0, 50.0, 100.0, 100.0));
        s.set_available_rect(Rect::new(100.0, 20.0, 400.0, 300.0));
        assert_eq!(s.selected_rect(), Rect::new(150.0, 70.0, 100.0, 100.0));
    }

    #[test]
    fn test_zero_sized_old_available_skips_rescale() {
        let mut s = RegionSelector::new(Rect::EMPTY);
        s.set_available_rect(Rect::new(0.0, 0.0, 100.0, 100.0));
        assert_eq!(s.selected_rect(), Rect::EMPTY);

        let mut s = selector_with(Rect::new(50.0, 50.0, 100.0, 100.0));
        s.available = Rect::new(0.0, 0.0, 0.0, 300.0);
        s.set_available_rect(Rect::new(0.0, 0.0, 120.0, 300.0));
        let r = s.selected_rect();
        assert!(r.x.is_finite() && r.width.is_finite());
        assert_eq!(r, Rect::new(50.0, 50.0, 70.0, 100.0));
    }

    #[test]
    fn test_stop_discards_drag() {
        let mut s = RegionSelector::new(Rect::new(0.0, 0.0, 400.0, 300.0));
        s.pointer_pressed(Point::new(10.0, 10.0));
        assert!(s.is_dragging());
        s.stop();
        assert!(!s.is_dragging());
        assert!(!s.is_started());

        // Input is ignored while stopped.
        s.pointer_pressed(Point::new(20.0, 20.0));
        assert!(!s.is_dragging());
    }

    #[test]
    fn test_new_selection_outside_existing_one() {
        let mut s = selector_with(Rect::new(50.0, 50.0, 100.0, 100.0));
        drag(&mut s, (250.0, 200.0), (300.0, 260.0));
        assert_eq!(s.selected_rect(), Rect::new(250.0, 200.0, 50.0, 60.0));
    }
}
