use pianola_core::controller::NoteController;
use pianola_types::{KeyColor, NoteDefinition};

use crate::layout::ScreenLayout;
use crate::ui::{Color, Rect, RenderBuf, Style};

const HOUSING: Color = Color::SLATE_800;

fn face(def: &NoteDefinition, pressed: bool) -> Color {
    match (def.color, pressed) {
        (KeyColor::White, false) => Color::WHITE_KEY,
        (KeyColor::White, true) => Color::WHITE_KEY_DOWN,
        (KeyColor::Black, false) => Color::BLACK_KEY,
        (KeyColor::Black, true) => Color::BLACK_KEY_DOWN,
    }
}

fn ink(def: &NoteDefinition) -> Color {
    match def.color {
        KeyColor::White => Color::SLATE_700,
        KeyColor::Black => Color::SLATE_300,
    }
}

/// The keyboard. Every cell is colored by the same hit test the mouse uses.
pub fn render(buf: &mut RenderBuf, layout: &ScreenLayout, controller: &NoteController, fullscreen: bool) {
    let border = Style::new().fg(Color::SLATE_600).bg(HOUSING);
    let title = if fullscreen { "" } else { " Keys " };
    buf.draw_block(layout.piano, title, border, Style::new().fg(Color::SLATE_300).bg(HOUSING));
    let inner = Rect::new(
        layout.piano.x.saturating_add(1),
        layout.piano.y.saturating_add(1),
        layout.piano.width.saturating_sub(2),
        layout.piano.height.saturating_sub(2),
    );
    buf.fill(inner, ' ', Style::new().bg(HOUSING));

    let keys = layout.keys;
    if keys.width == 0 || keys.height == 0 {
        return;
    }
    let map = controller.map();

    for row in keys.y..keys.y + keys.height {
        for col in keys.x..keys.x + keys.width {
            let Some(def) = layout.key_at(map, col, row).and_then(|i| map.note(i)) else {
                continue;
            };
            let pressed = controller.is_pressed(&def.trigger);
            buf.set_cell(col, row, ' ', Style::new().bg(face(def, pressed)));
        }
    }

    let geometry = layout.geometry();
    for def in map.notes() {
        let rect = geometry.key_rect(def);
        let left = keys.x + rect.left.ceil() as u16;
        let width = rect.width as u16;
        let bottom = keys.y + rect.height as u16;
        let style = Style::new()
            .fg(ink(def))
            .bg(face(def, controller.is_pressed(&def.trigger)));

        let trigger = def.trigger.label();
        label(buf, keys, left, width, bottom.saturating_sub(1), &trigger, style.bold());
        if def.color == KeyColor::White && rect.height >= 4.0 {
            let name = def.note.to_string();
            label(buf, keys, left, width, bottom.saturating_sub(2), &name, style);
        }
    }
}

/// Text centered on a key, dropped if it would spill outside the keys area.
fn label(buf: &mut RenderBuf, keys: Rect, left: u16, width: u16, y: u16, text: &str, style: Style) {
    let len = text.chars().count() as u16;
    if len > width || y < keys.y {
        return;
    }
    let x = left + (width - len) / 2;
    if x + len > keys.x + keys.width {
        return;
    }
    buf.draw_str(x, y, text, style);
}
