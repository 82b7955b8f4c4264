use pianola_core::sink::NoteEvent;

use crate::ui::{Color, Rect, RenderBuf, Style};

const HINTS: &str = "F11 fullscreen  ←→ knob  ↑↓ adjust  Esc quit";

/// Title bar: name, active output and the most recent event.
pub fn render(buf: &mut RenderBuf, area: Rect, sink_name: &str, last: Option<&NoteEvent>) {
    let border = Style::new().fg(Color::SLATE_600);
    let inner = buf.draw_block(area, "", border, border);
    if inner.height == 0 {
        return;
    }

    let sink = format!("  out: {}", sink_name);
    let last = match last {
        Some(event) => format!("  {}", event),
        None => "  play with the keyboard or mouse".to_string(),
    };
    buf.draw_line(
        inner,
        &[
            (" PIANOLA", Style::new().fg(Color::GOLD).bold()),
            (sink.as_str(), Style::new().fg(Color::SKY_BLUE)),
            (last.as_str(), Style::new().fg(Color::SLATE_300)),
        ],
    );

    let hints_width = HINTS.chars().count() as u16;
    if inner.width > hints_width + 40 {
        let x = inner.x + inner.width - hints_width - 1;
        buf.draw_str(x, inner.y, HINTS, Style::new().fg(Color::DARK_GRAY));
    }
}
