use std::io::{self, Stdout};
use std::time::Duration;

use crossterm::{
    event::{
        self, DisableMouseCapture, EnableMouseCapture, Event, KeyCode as CrosstermKeyCode,
        KeyEvent, KeyEventKind, KeyModifiers, KeyboardEnhancementFlags,
        MouseButton as CrosstermMouseButton, MouseEvent as CrosstermMouseEvent,
        MouseEventKind as CrosstermMouseEventKind, PopKeyboardEnhancementFlags,
        PushKeyboardEnhancementFlags,
    },
    execute,
    terminal::{
        disable_raw_mode, enable_raw_mode, supports_keyboard_enhancement, EnterAlternateScreen,
        LeaveAlternateScreen,
    },
};
use ratatui::{
    backend::CrosstermBackend,
    buffer::Buffer,
    layout::Rect as RatatuiRect,
    style::Style as RatatuiStyle,
    widgets::Widget,
    Terminal,
};

use super::style::Color;
use super::{
    AppEvent, InputEvent, InputSource, KeyCode, KeyPhase, Modifiers, MouseButton, MouseEvent,
    MouseEventKind,
};

/// Ratatui-based terminal backend.
///
/// `start` captures the terminal's input (raw mode, mouse, key release
/// reporting where available); `stop` or drop hands it back.
pub struct RatatuiBackend {
    terminal: Terminal<CrosstermBackend<Stdout>>,
    keyboard_enhancement_enabled: bool,
    started: bool,
}

impl RatatuiBackend {
    /// Create a new ratatui backend (does not start terminal mode)
    pub fn new() -> io::Result<Self> {
        let backend = CrosstermBackend::new(io::stdout());
        let terminal = Terminal::new(backend)?;
        Ok(Self {
            terminal,
            keyboard_enhancement_enabled: false,
            started: false,
        })
    }

    /// Enter raw mode and alternate screen with mouse capture
    pub fn start(&mut self) -> io::Result<()> {
        enable_raw_mode()?;
        self.started = true;

        // Check terminal support BEFORE entering alternate screen
        let supports_enhancement = matches!(supports_keyboard_enhancement(), Ok(true));

        execute!(io::stdout(), EnterAlternateScreen, EnableMouseCapture)?;

        // Kitty protocol with event types gives us key release events
        if supports_enhancement
            && execute!(
                io::stdout(),
                PushKeyboardEnhancementFlags(
                    KeyboardEnhancementFlags::DISAMBIGUATE_ESCAPE_CODES
                        | KeyboardEnhancementFlags::REPORT_EVENT_TYPES
                )
            )
            .is_ok()
        {
            self.keyboard_enhancement_enabled = true;
        }
        log::info!(
            target: "terminal",
            "input captured (key release events: {})",
            self.keyboard_enhancement_enabled
        );

        self.terminal.clear()?;
        Ok(())
    }

    /// Leave raw mode and alternate screen
    pub fn stop(&mut self) -> io::Result<()> {
        if !self.started {
            return Ok(());
        }
        self.started = false;

        // Pop keyboard enhancement flags BEFORE leaving alternate screen
        if self.keyboard_enhancement_enabled {
            let _ = execute!(io::stdout(), PopKeyboardEnhancementFlags);
            self.keyboard_enhancement_enabled = false;
        }

        disable_raw_mode()?;
        execute!(io::stdout(), LeaveAlternateScreen, DisableMouseCapture)?;
        log::info!(target: "terminal", "input released");
        Ok(())
    }

    /// Begin a new frame for drawing, filled with `background`
    pub fn begin_frame(&self, background: Color) -> io::Result<RatatuiFrame> {
        let size = self.terminal.size()?;
        let area = RatatuiRect::new(0, 0, size.width, size.height);
        let mut buffer = Buffer::empty(area);
        buffer.set_style(area, RatatuiStyle::default().bg(background.into()));
        Ok(RatatuiFrame { buffer, area })
    }

    /// End the current frame and render to screen
    pub fn end_frame(&mut self, frame: RatatuiFrame) -> io::Result<()> {
        self.terminal.draw(|f| {
            let area = f.area();
            f.render_widget(BufferWidget(frame.buffer), area);
        })?;
        Ok(())
    }

    /// Whether the Kitty keyboard protocol was successfully enabled.
    pub fn keyboard_enhancement_enabled(&self) -> bool {
        self.keyboard_enhancement_enabled
    }
}

impl Drop for RatatuiBackend {
    fn drop(&mut self) {
        let _ = self.stop();
    }
}

/// A frame for drawing operations
pub struct RatatuiFrame {
    buffer: Buffer,
    area: RatatuiRect,
}

impl RatatuiFrame {
    /// Get mutable access to the underlying buffer
    pub fn buffer_mut(&mut self) -> &mut Buffer {
        &mut self.buffer
    }

    /// Get the full terminal area as a ratatui Rect
    pub fn area(&self) -> RatatuiRect {
        self.area
    }
}

impl InputSource for RatatuiBackend {
    fn poll_event(&mut self, timeout: Duration) -> Option<AppEvent> {
        let mut t = timeout;
        loop {
            if !event::poll(t).ok()? {
                return None;
            }
            match event::read().ok()? {
                Event::Key(key_event) => {
                    return Some(AppEvent::Key(convert_key_event(key_event)));
                }
                Event::Mouse(mouse_event) => {
                    if let Some(me) = convert_mouse_event(mouse_event) {
                        return Some(AppEvent::Mouse(me));
                    }
                    // Moved and friends: drain with zero timeout
                    t = Duration::ZERO;
                }
                Event::Resize(w, h) => {
                    return Some(AppEvent::Resize(w, h));
                }
                _ => {
                    // Focus and paste events: drain with zero timeout
                    t = Duration::ZERO;
                }
            }
        }
    }
}

fn convert_key_event(event: KeyEvent) -> InputEvent {
    let key = match event.code {
        CrosstermKeyCode::Char(c) => KeyCode::Char(c),
        CrosstermKeyCode::Enter => KeyCode::Enter,
        CrosstermKeyCode::Esc => KeyCode::Escape,
        CrosstermKeyCode::Backspace => KeyCode::Backspace,
        CrosstermKeyCode::Tab => KeyCode::Tab,
        CrosstermKeyCode::Up => KeyCode::Up,
        CrosstermKeyCode::Down => KeyCode::Down,
        CrosstermKeyCode::Left => KeyCode::Left,
        CrosstermKeyCode::Right => KeyCode::Right,
        CrosstermKeyCode::F(n) => KeyCode::F(n),
        _ => KeyCode::Other,
    };

    let phase = match event.kind {
        KeyEventKind::Press => KeyPhase::Press,
        KeyEventKind::Repeat => KeyPhase::Repeat,
        KeyEventKind::Release => KeyPhase::Release,
    };

    let mut input = InputEvent::new(key, phase);
    input.modifiers = convert_modifiers(event.modifiers);
    input
}

fn convert_modifiers(modifiers: KeyModifiers) -> Modifiers {
    Modifiers {
        ctrl: modifiers.contains(KeyModifiers::CONTROL),
        alt: modifiers.contains(KeyModifiers::ALT),
        shift: modifiers.contains(KeyModifiers::SHIFT),
    }
}

fn convert_mouse_button(button: CrosstermMouseButton) -> MouseButton {
    match button {
        CrosstermMouseButton::Left => MouseButton::Left,
        CrosstermMouseButton::Right => MouseButton::Right,
        CrosstermMouseButton::Middle => MouseButton::Middle,
    }
}

fn convert_mouse_event(event: CrosstermMouseEvent) -> Option<MouseEvent> {
    let kind = match event.kind {
        CrosstermMouseEventKind::Down(btn) => MouseEventKind::Down(convert_mouse_button(btn)),
        CrosstermMouseEventKind::Up(btn) => MouseEventKind::Up(convert_mouse_button(btn)),
        CrosstermMouseEventKind::Drag(btn) => MouseEventKind::Drag(convert_mouse_button(btn)),
        CrosstermMouseEventKind::ScrollUp => MouseEventKind::ScrollUp,
        CrosstermMouseEventKind::ScrollDown => MouseEventKind::ScrollDown,
        _ => return None, // Ignore Moved and other events
    };

    Some(MouseEvent {
        kind,
        column: event.column,
        row: event.row,
        modifiers: convert_modifiers(event.modifiers),
    })
}

/// Widget that renders a pre-built buffer
struct BufferWidget(Buffer);

impl Widget for BufferWidget {
    fn render(self, area: RatatuiRect, buf: &mut Buffer) {
        for y in area.y..area.y.saturating_add(area.height) {
            for x in area.x..area.x.saturating_add(area.width) {
                if x < self.0.area.width && y < self.0.area.height {
                    if let (Some(src), Some(dst)) = (self.0.cell((x, y)), buf.cell_mut((x, y))) {
                        *dst = src.clone();
                    }
                }
            }
        }
    }
}
