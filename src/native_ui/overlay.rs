//! Overlay window state: placement, visibility, drag-by-mouse

use eframe::egui::{self, Pos2, Vec2, WindowLevel};

use super::theme::{OVERLAY_CORNER_OFFSET, OVERLAY_SIZE};

/// Transient window state, rebuilt every run
#[derive(Debug, Clone, Default)]
pub struct UiState {
    /// Outer position we last placed the window at; `None` until placed
    pub position: Option<Pos2>,
    pub visible: bool,
}

impl UiState {
    pub fn new() -> Self {
        Self {
            position: None,
            visible: true,
        }
    }
}

/// Tracks a drag gesture in screen coordinates.
///
/// Press captures where the pointer sits relative to the window origin;
/// while dragging the window is moved so that offset stays constant.
#[derive(Debug, Clone, Copy, Default)]
pub struct DragState {
    offset: Option<Vec2>,
}

impl DragState {
    pub fn press(&mut self, pointer: Pos2, origin: Pos2) {
        self.offset = Some(pointer - origin);
    }

    /// New window origin for the pointer position, if a drag is in progress
    pub fn drag_to(&self, pointer: Pos2) -> Option<Pos2> {
        self.offset.map(|offset| pointer - offset)
    }

    pub fn release(&mut self) {
        self.offset = None;
    }
}

/// Launch position: near the bottom-right corner of the monitor
pub fn initial_position(monitor_size: Vec2) -> Pos2 {
    (monitor_size - OVERLAY_CORNER_OFFSET).to_pos2()
}

pub fn window_level(topmost: bool) -> WindowLevel {
    if topmost {
        WindowLevel::AlwaysOnTop
    } else {
        WindowLevel::Normal
    }
}

/// Native window options for the overlay
pub fn viewport(topmost: bool) -> egui::ViewportBuilder {
    egui::ViewportBuilder::default()
        .with_title("StockBar")
        .with_inner_size(OVERLAY_SIZE)
        .with_resizable(false)
        .with_decorations(false)
        .with_transparent(true)
        .with_taskbar(false)
        .with_window_level(window_level(topmost))
}

#[cfg(test)]
mod tests {
    use super::*;
    use eframe::egui::{pos2, vec2};

    #[test]
    fn test_drag_keeps_pointer_offset() {
        let mut drag = DragState::default();
        drag.press(pos2(1830.0, 1000.0), pos2(1810.0, 980.0));

        assert_eq!(drag.drag_to(pos2(1500.0, 700.0)), Some(pos2(1480.0, 680.0)));
        assert_eq!(drag.drag_to(pos2(10.0, 10.0)), Some(pos2(-10.0, -10.0)));
    }

    #[test]
    fn test_no_move_without_press() {
        let drag = DragState::default();
        assert_eq!(drag.drag_to(pos2(100.0, 100.0)), None);
    }

    #[test]
    fn test_release_ends_drag() {
        let mut drag = DragState::default();
        drag.press(pos2(5.0, 5.0), pos2(0.0, 0.0));
        drag.release();
        assert_eq!(drag.drag_to(pos2(50.0, 50.0)), None);
    }

    #[test]
    fn test_initial_position_bottom_right() {
        assert_eq!(initial_position(vec2(1920.0, 1080.0)), pos2(1810.0, 980.0));
    }

    #[test]
    fn test_window_level() {
        assert_eq!(window_level(true), WindowLevel::AlwaysOnTop);
        assert_eq!(window_level(false), WindowLevel::Normal);
    }

    #[test]
    fn test_ui_state_starts_visible_unplaced() {
        let state = UiState::new();
        assert!(state.visible);
        assert!(state.position.is_none());
    }
}
