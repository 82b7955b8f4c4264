use std::time::Instant;

use pianola_core::config::Config;
use pianola_core::controller::{NoteController, PointerSource, ReleaseMode};
use pianola_core::knob::Knob;
use pianola_core::sink::{NoteEvent, NoteSink, RecordingSink, Tee};
use pianola_core::viewport::{self, Viewport, ViewportError};
use pianola_types::TriggerKey;

use crate::layout::ScreenLayout;
use crate::panes;
use crate::ui::{
    AppEvent, InputEvent, KeyCode, KeyPhase, MouseButton, MouseEvent, MouseEventKind, Rect,
    RenderBuf,
};

/// Recent events kept for the header line.
const HISTORY: usize = 32;

/// The running keyboard: controller, knobs, output and screen state.
pub struct App {
    controller: NoteController,
    knobs: Vec<Knob>,
    selected: usize,
    sink: Tee<Box<dyn NoteSink>, RecordingSink>,
    fullscreen: bool,
    area: Rect,
    quit: bool,
}

impl App {
    pub fn new(controller: NoteController, knobs: Vec<Knob>, sink: Box<dyn NoteSink>) -> Self {
        Self {
            controller,
            knobs,
            selected: 0,
            sink: Tee {
                primary: sink,
                secondary: RecordingSink::with_limit(HISTORY),
            },
            fullscreen: false,
            area: Rect::new(0, 0, 80, 24),
            quit: false,
        }
    }

    /// Build from config: layout, release timeout and knob list.
    pub fn from_config(config: &Config, sink: Box<dyn NoteSink>) -> pianola_core::Result<Self> {
        let controller = NoteController::two_octaves()?
            .with_layout(config.keyboard_layout())
            .with_release_mode(ReleaseMode::Timeout(config.release_timeout()));
        let travel = config.knob_travel_rows() as f64;
        let knobs = config.knobs().iter().map(|k| k.build(travel)).collect();
        Ok(Self::new(controller, knobs, sink))
    }

    pub fn controller(&self) -> &NoteController {
        &self.controller
    }

    pub fn set_release_mode(&mut self, mode: ReleaseMode) {
        self.controller.set_release_mode(mode);
    }

    pub fn knobs(&self) -> &[Knob] {
        &self.knobs
    }

    pub fn selected_knob(&self) -> usize {
        self.selected
    }

    pub fn last_event(&self) -> Option<&NoteEvent> {
        self.sink.secondary.last()
    }

    pub fn sink_name(&self) -> &'static str {
        self.sink.name()
    }

    pub fn should_quit(&self) -> bool {
        self.quit
    }

    pub fn set_area(&mut self, area: Rect) {
        self.area = area;
    }

    pub fn layout(&self) -> ScreenLayout {
        ScreenLayout::compute(self.area, self.fullscreen, self.controller.map())
    }

    pub fn handle_event(&mut self, event: AppEvent) {
        match event {
            AppEvent::Key(key) => self.handle_key(&key),
            AppEvent::Mouse(mouse) => self.handle_mouse(&mouse),
            AppEvent::Resize(w, h) => self.area = Rect::new(0, 0, w, h),
        }
    }

    /// Timeout releases; call once per loop iteration.
    pub fn tick(&mut self, now: Instant) {
        self.controller.check_releases(now, &mut self.sink);
    }

    /// Silence everything before the output goes away.
    pub fn shutdown(&mut self) {
        let released = self.controller.release_all(&mut self.sink);
        if !released.is_empty() {
            log::info!(target: "app", "released {} sounding notes", released.len());
        }
    }

    pub fn render(&self, area: Rect, buf: &mut RenderBuf) {
        let layout = ScreenLayout::compute(area, self.fullscreen, self.controller().map());
        if let Some(rect) = layout.header {
            panes::header::render(buf, rect, self.sink_name(), self.last_event());
        }
        if let Some(rect) = layout.knobs {
            panes::knobs::render(buf, rect, self.knobs(), self.selected_knob());
        }
        panes::piano::render(buf, &layout, &self.controller, self.fullscreen);
    }

    fn handle_key(&mut self, event: &InputEvent) {
        let key = event.piano_key();
        // Releases always reach the controller, whatever modifiers are held
        if event.phase == KeyPhase::Release {
            self.controller.key_up(key, &mut self.sink);
            return;
        }

        // Modifier chords are commands, never notes
        if event.modifiers.ctrl {
            if event.is_ctrl_char('c') {
                self.quit = true;
            }
            return;
        }

        let outcome = self.controller.key_down(key, event.timestamp, &mut self.sink);
        if outcome.suppress_default || self.controller.resolve(key).is_some() {
            return;
        }

        match event.key {
            KeyCode::Escape if event.phase == KeyPhase::Press => self.quit = true,
            KeyCode::F(11) if event.phase == KeyPhase::Press => {
                let fullscreen = viewport::toggle_fullscreen(self);
                log::debug!(target: "app", "fullscreen: {}", fullscreen);
            }
            KeyCode::Left if !self.knobs.is_empty() => {
                self.selected = (self.selected + self.knobs.len() - 1) % self.knobs.len();
            }
            KeyCode::Right if !self.knobs.is_empty() => {
                self.selected = (self.selected + 1) % self.knobs.len();
            }
            KeyCode::Up => self.scroll_knob(self.selected, true),
            KeyCode::Down => self.scroll_knob(self.selected, false),
            _ => {}
        }
    }

    fn handle_mouse(&mut self, event: &MouseEvent) {
        let layout = self.layout();
        match event.kind {
            MouseEventKind::Down(MouseButton::Left) => {
                if let Some(trigger) = self.trigger_at(&layout, event.column, event.row) {
                    self.controller.pointer_down(trigger, PointerSource::Mouse, &mut self.sink);
                } else if let Some(i) = layout.knob_at(self.knobs.len(), event.column, event.row) {
                    self.selected = i;
                    self.knobs[i].begin_drag(event.row as f64);
                }
            }
            MouseEventKind::Drag(MouseButton::Left) => {
                if let Some(i) = self.knobs.iter().position(Knob::is_dragging) {
                    if let Some(value) = self.knobs[i].drag_to(event.row as f64) {
                        self.sink.param_changed(self.knobs[i].label(), value);
                    }
                } else if let Some(trigger) = self.trigger_at(&layout, event.column, event.row) {
                    self.controller.pointer_enter(trigger, &mut self.sink);
                }
            }
            MouseEventKind::Up(_) => {
                self.controller.pointer_release(&mut self.sink);
                self.knobs.iter_mut().for_each(Knob::end_drag);
            }
            MouseEventKind::ScrollUp | MouseEventKind::ScrollDown => {
                if let Some(i) = layout.knob_at(self.knobs.len(), event.column, event.row) {
                    self.scroll_knob(i, event.kind == MouseEventKind::ScrollUp);
                }
            }
            _ => {}
        }
    }

    fn trigger_at(&self, layout: &ScreenLayout, column: u16, row: u16) -> Option<TriggerKey> {
        let map = self.controller.map();
        let index = layout.key_at(map, column, row)?;
        map.note(index).map(|def| def.trigger)
    }

    fn scroll_knob(&mut self, index: usize, up: bool) {
        let Some(knob) = self.knobs.get_mut(index) else {
            return;
        };
        if let Some(value) = knob.scroll(up) {
            self.sink.param_changed(knob.label(), value);
        }
    }
}

impl Viewport for App {
    fn is_fullscreen(&self) -> bool {
        self.fullscreen
    }

    fn request_fullscreen(&mut self) -> Result<(), ViewportError> {
        self.fullscreen = true;
        Ok(())
    }

    fn exit_fullscreen(&mut self) -> Result<(), ViewportError> {
        self.fullscreen = false;
        Ok(())
    }
}
