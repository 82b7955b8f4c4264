use pianola_core::knob::Knob;

use crate::layout::KNOB_SLOT_WIDTH;
use crate::ui::{Color, Rect, RenderBuf, Style};

// Pointer glyphs from -135° to +135° in 45° steps
const POINTERS: [char; 7] = ['↙', '←', '↖', '↑', '↗', '→', '↘'];

fn pointer(knob: &Knob) -> char {
    let step = ((knob.rotation_degrees() + 135.0) / 45.0).round() as usize;
    POINTERS[step.min(POINTERS.len() - 1)]
}

/// Knob strip: pointer glyph, label and value per knob.
pub fn render(buf: &mut RenderBuf, area: Rect, knobs: &[Knob], selected: usize) {
    let border = Style::new().fg(Color::SLATE_600);
    let inner = buf.draw_block(area, " Controls ", border, Style::new().fg(Color::SLATE_300));
    if inner.height < 3 {
        return;
    }

    for (i, knob) in knobs.iter().enumerate() {
        let x = area.x + 1 + i as u16 * KNOB_SLOT_WIDTH;
        if x + KNOB_SLOT_WIDTH > inner.x + inner.width + 1 {
            break;
        }
        let active = i == selected || knob.is_dragging();
        let accent = if active { Color::KNOB_ACTIVE } else { Color::SLATE_500 };

        let dial = format!("({})", pointer(knob));
        let center = x + (KNOB_SLOT_WIDTH - 1) / 2;
        buf.draw_str(center - 1, inner.y, &dial, Style::new().fg(accent).bold());

        let label_style = if active {
            Style::new().fg(Color::SLATE_100).bold()
        } else {
            Style::new().fg(Color::SLATE_300)
        };
        draw_centered(buf, x, inner.y + 1, knob.label(), label_style);
        draw_centered(buf, x, inner.y + 2, &knob.display(), Style::new().fg(accent));
    }
}

fn draw_centered(buf: &mut RenderBuf, x: u16, y: u16, text: &str, style: Style) {
    let len = text.chars().count().min(KNOB_SLOT_WIDTH as usize - 1) as u16;
    let text: String = text.chars().take(len as usize).collect();
    buf.draw_str(x + (KNOB_SLOT_WIDTH - 1 - len) / 2, y, &text, style);
}
