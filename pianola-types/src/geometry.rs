use crate::keyboard_map::KeyboardMap;
use crate::note::{KeyColor, NoteDefinition};

/// Placement rules for drawing keys and resolving hits.
///
/// White keys sit at `position * white_spacing`. A black key's left edge is
/// `position * white_spacing + white_width * black_offset_ratio - black_width / 2`,
/// which puts it in the notch after the white key sharing its position.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct KeyGeometry {
    pub white_width: f32,
    pub white_spacing: f32,
    pub white_height: f32,
    pub black_width: f32,
    pub black_height: f32,
    pub black_offset_ratio: f32,
}

/// Horizontal span and height of one key.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct KeyRect {
    pub left: f32,
    pub width: f32,
    pub height: f32,
}

impl KeyRect {
    pub fn right(&self) -> f32 {
        self.left + self.width
    }

    pub fn contains(&self, x: f32, y: f32) -> bool {
        x >= self.left && x < self.right() && y >= 0.0 && y < self.height
    }
}

impl KeyGeometry {
    /// Pixel layout of the browser keyboard.
    pub const PIXELS: KeyGeometry = KeyGeometry {
        white_width: 48.0,
        white_spacing: 50.0,
        white_height: 200.0,
        black_width: 30.0,
        black_height: 120.0,
        black_offset_ratio: 0.65,
    };

    /// Character-cell layout: five-cell white keys with a one-cell border,
    /// three-cell black keys centered on the border.
    pub fn cells(height: u16) -> Self {
        let white_height = height as f32;
        Self {
            white_width: 5.0,
            white_spacing: 6.0,
            white_height,
            black_width: 3.0,
            black_height: (white_height * 0.6).round().max(1.0),
            black_offset_ratio: 1.0,
        }
    }

    pub fn white_left(&self, position: u8) -> f32 {
        position as f32 * self.white_spacing
    }

    pub fn black_left(&self, position: u8) -> f32 {
        self.white_left(position) + self.white_width * self.black_offset_ratio
            - self.black_width / 2.0
    }

    pub fn key_rect(&self, def: &NoteDefinition) -> KeyRect {
        match def.color {
            KeyColor::White => KeyRect {
                left: self.white_left(def.position),
                width: self.white_width,
                height: self.white_height,
            },
            KeyColor::Black => KeyRect {
                left: self.black_left(def.position),
                width: self.black_width,
                height: self.black_height,
            },
        }
    }

    /// Total width of the keyboard.
    pub fn total_width(&self, map: &KeyboardMap) -> f32 {
        map.white_count() as f32 * self.white_spacing
    }

    /// Index of the key under `(x, y)`, relative to the keyboard's top-left.
    /// Black keys are drawn over white keys and win where both overlap.
    pub fn hit_test(&self, map: &KeyboardMap, x: f32, y: f32) -> Option<usize> {
        map.black_keys()
            .find(|(_, def)| self.key_rect(def).contains(x, y))
            .or_else(|| {
                map.white_keys()
                    .find(|(_, def)| self.key_rect(def).contains(x, y))
            })
            .map(|(i, _)| i)
    }
}
