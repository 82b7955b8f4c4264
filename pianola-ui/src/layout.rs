use pianola_types::{KeyGeometry, KeyboardMap};

use crate::ui::Rect;

const HEADER_HEIGHT: u16 = 3;
const KNOBS_HEIGHT: u16 = 5;

/// Width of one knob slot in the knob strip.
pub const KNOB_SLOT_WIDTH: u16 = 14;

/// Screen regions for one frame. Rendering and mouse hit-testing both read
/// from the same `ScreenLayout`, so a click lands on what was drawn.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScreenLayout {
    pub header: Option<Rect>,
    pub knobs: Option<Rect>,
    /// Bordered block around the keyboard.
    pub piano: Rect,
    /// Cells the keys are drawn into, relative origin for the geometry.
    pub keys: Rect,
}

impl ScreenLayout {
    pub fn compute(area: Rect, fullscreen: bool, map: &KeyboardMap) -> Self {
        let (header, knobs, piano) = if fullscreen || area.height < HEADER_HEIGHT + KNOBS_HEIGHT + 4 {
            (None, None, area)
        } else {
            let header = Rect::new(area.x, area.y, area.width, HEADER_HEIGHT);
            let knobs = Rect::new(area.x, area.y + HEADER_HEIGHT, area.width, KNOBS_HEIGHT);
            let top = HEADER_HEIGHT + KNOBS_HEIGHT;
            let piano = Rect::new(area.x, area.y + top, area.width, area.height - top);
            (Some(header), Some(knobs), piano)
        };

        let inner = Rect::new(
            piano.x.saturating_add(1),
            piano.y.saturating_add(1),
            piano.width.saturating_sub(2),
            piano.height.saturating_sub(2),
        );
        let wanted = KeyGeometry::cells(inner.height).total_width(map).ceil() as u16;
        let width = wanted.min(inner.width);
        let keys = Rect::new(inner.x + (inner.width - width) / 2, inner.y, width, inner.height);

        Self { header, knobs, piano, keys }
    }

    /// Geometry for the current keys area.
    pub fn geometry(&self) -> KeyGeometry {
        KeyGeometry::cells(self.keys.height)
    }

    /// Index of the key drawn at terminal cell `(column, row)`.
    pub fn key_at(&self, map: &KeyboardMap, column: u16, row: u16) -> Option<usize> {
        if !contains(self.keys, column, row) {
            return None;
        }
        let x = (column - self.keys.x) as f32;
        let y = (row - self.keys.y) as f32;
        self.geometry().hit_test(map, x, y)
    }

    /// Index of the knob slot at `(column, row)`.
    pub fn knob_at(&self, count: usize, column: u16, row: u16) -> Option<usize> {
        let knobs = self.knobs?;
        if !contains(knobs, column, row) {
            return None;
        }
        let slot = ((column - knobs.x) / KNOB_SLOT_WIDTH) as usize;
        (slot < count).then_some(slot)
    }
}

fn contains(rect: Rect, column: u16, row: u16) -> bool {
    column >= rect.x
        && column < rect.x.saturating_add(rect.width)
        && row >= rect.y
        && row < rect.y.saturating_add(rect.height)
}
