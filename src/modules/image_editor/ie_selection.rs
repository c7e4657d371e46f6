//! Drag-to-select crop rectangle.
//!
//! Points are display coordinates: offsets from the top-left corner of the
//! on-screen image rectangle. The shown image can be smaller than the pixel
//! buffer (it is fitted to the canvas), so a committed selection is scaled by
//! `source / display` on each axis before it is clamped to the image bounds.

use eframe::egui;

/// Source-pixel rectangle produced by a successful commit.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CropRegion { pub x: u32, pub y: u32, pub width: u32, pub height: u32 }

#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct RegionSelector {
    anchor: Option<egui::Pos2>,
    current: Option<egui::Pos2>,
    frozen: bool,
}

impl RegionSelector {
    /// Pointer-down. Starts a new selection and drops the previous overlay.
    pub fn begin(&mut self, point: egui::Pos2) {
        self.anchor = Some(point);
        self.current = None;
        self.frozen = false;
    }

    /// Pointer-drag. Moves the free corner.
    pub fn update(&mut self, point: egui::Pos2) {
        if self.anchor.is_some() && !self.frozen { self.current = Some(point); }
    }

    /// Pointer-up. The rectangle stays put until it is committed or replaced.
    pub fn end(&mut self, point: egui::Pos2) {
        if self.anchor.is_some() && !self.frozen {
            self.current = Some(point);
            self.frozen = true;
        }
    }

    pub fn reset(&mut self) { *self = Self::default(); }

    pub fn is_frozen(&self) -> bool { self.frozen }
    pub fn has_selection(&self) -> bool { self.anchor.is_some() && self.current.is_some() }

    /// Rectangle to draw, in display coordinates.
    pub fn overlay(&self) -> Option<egui::Rect> {
        Some(egui::Rect::from_two_pos(self.anchor?, self.current?))
    }

    /// Maps the selection into source pixels without consuming it.
    pub fn preview(&self, source_size: (u32, u32), display_size: egui::Vec2) -> Option<CropRegion> {
        let (anchor, current) = (self.anchor?, self.current?);
        if display_size.x <= 0.0 || display_size.y <= 0.0 { return None; }

        let (src_w, src_h) = (i64::from(source_size.0), i64::from(source_size.1));
        let scale_x: f64 = src_w as f64 / f64::from(display_size.x);
        let scale_y: f64 = src_h as f64 / f64::from(display_size.y);

        // `as` truncates toward zero
        let to_src = |v: f32, scale: f64| (f64::from(v) * scale) as i64;
        let x1: i64 = to_src(anchor.x.min(current.x), scale_x).max(0);
        let y1: i64 = to_src(anchor.y.min(current.y), scale_y).max(0);
        let x2: i64 = to_src(anchor.x.max(current.x), scale_x).min(src_w);
        let y2: i64 = to_src(anchor.y.max(current.y), scale_y).min(src_h);

        if x2 - x1 <= 0 || y2 - y1 <= 0 { return None; }
        Some(CropRegion { x: x1 as u32, y: y1 as u32, width: (x2 - x1) as u32, height: (y2 - y1) as u32 })
    }

    /// Consumes the selection. The selector is empty afterwards whatever the result.
    pub fn commit(&mut self, source_size: (u32, u32), display_size: egui::Vec2) -> Option<CropRegion> {
        let selection: RegionSelector = std::mem::take(self);
        selection.preview(source_size, display_size)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use eframe::egui::{pos2, vec2};

    fn dragged(from: egui::Pos2, to: egui::Pos2) -> RegionSelector {
        let mut sel = RegionSelector::default();
        sel.begin(from);
        sel.update(pos2((from.x + to.x) / 2.0, (from.y + to.y) / 2.0));
        sel.end(to);
        sel
    }

    #[test]
    fn maps_display_rectangle_through_scale_factors() {
        let mut sel = dragged(pos2(10.0, 10.0), pos2(60.0, 60.0));
        let region = sel.commit((1000, 500), vec2(500.0, 250.0));
        assert_eq!(region, Some(CropRegion { x: 20, y: 20, width: 100, height: 100 }));
        assert!(!sel.has_selection());
    }

    #[test]
    fn corner_order_does_not_matter() {
        let mut sel = dragged(pos2(60.0, 40.0), pos2(10.0, 5.0));
        let region = sel.commit((200, 100), vec2(200.0, 100.0));
        assert_eq!(region, Some(CropRegion { x: 10, y: 5, width: 50, height: 35 }));
    }

    #[test]
    fn fractional_coordinates_truncate() {
        let mut sel = dragged(pos2(1.9, 2.7), pos2(10.2, 8.99));
        let region = sel.commit((300, 300), vec2(100.0, 100.0));
        // 5.7 -> 5, 8.1 -> 8, 30.6 -> 30, 26.97 -> 26
        assert_eq!(region, Some(CropRegion { x: 5, y: 8, width: 25, height: 18 }));
    }

    #[test]
    fn degenerate_selection_commits_nothing() {
        let mut sel = dragged(pos2(25.0, 25.0), pos2(25.0, 25.0));
        assert_eq!(sel.commit((100, 100), vec2(100.0, 100.0)), None);
        assert_eq!(sel, RegionSelector::default());
    }

    #[test]
    fn click_without_drag_has_no_selection() {
        let mut sel = RegionSelector::default();
        sel.begin(pos2(5.0, 5.0));
        assert!(!sel.has_selection());
        assert!(sel.overlay().is_none());
        assert_eq!(sel.commit((100, 100), vec2(100.0, 100.0)), None);
    }

    #[test]
    fn partially_outside_selection_is_clamped() {
        let mut sel = dragged(pos2(-20.0, 80.0), pos2(30.0, 150.0));
        let region = sel.commit((100, 100), vec2(100.0, 100.0));
        assert_eq!(region, Some(CropRegion { x: 0, y: 80, width: 30, height: 20 }));
    }

    #[test]
    fn selection_fully_outside_is_a_no_op() {
        let mut sel = dragged(pos2(120.0, 10.0), pos2(180.0, 40.0));
        assert_eq!(sel.commit((100, 100), vec2(100.0, 100.0)), None);

        let mut sel = dragged(pos2(-50.0, -50.0), pos2(-10.0, -5.0));
        assert_eq!(sel.commit((100, 100), vec2(100.0, 100.0)), None);
    }

    #[test]
    fn zero_sized_display_is_rejected() {
        let mut sel = dragged(pos2(0.0, 0.0), pos2(10.0, 10.0));
        assert_eq!(sel.commit((100, 100), vec2(0.0, 50.0)), None);
    }

    #[test]
    fn new_pointer_down_discards_previous_overlay() {
        let mut sel = dragged(pos2(0.0, 0.0), pos2(10.0, 10.0));
        assert!(sel.is_frozen());
        sel.begin(pos2(3.0, 3.0));
        assert!(!sel.is_frozen());
        assert!(sel.overlay().is_none());
        sel.update(pos2(8.0, 9.0));
        assert_eq!(sel.overlay(), Some(egui::Rect::from_min_max(pos2(3.0, 3.0), pos2(8.0, 9.0))));
    }

    #[test]
    fn frozen_selection_ignores_stray_drag_events() {
        let mut sel = dragged(pos2(0.0, 0.0), pos2(10.0, 10.0));
        sel.update(pos2(90.0, 90.0));
        assert_eq!(sel.overlay(), Some(egui::Rect::from_min_max(pos2(0.0, 0.0), pos2(10.0, 10.0))));
    }

    #[test]
    fn preview_leaves_selection_in_place() {
        let sel = dragged(pos2(0.0, 0.0), pos2(10.0, 10.0));
        assert!(sel.preview((20, 20), vec2(10.0, 10.0)).is_some());
        assert!(sel.has_selection());
    }
}
