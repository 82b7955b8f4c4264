pub mod input;
pub mod ratatui_impl;
pub mod render;
pub mod style;

pub use input::{
    AppEvent, InputEvent, InputSource, KeyCode, KeyPhase, Modifiers, MouseButton, MouseEvent,
    MouseEventKind,
};
pub use ratatui_impl::RatatuiBackend;
pub use render::{Rect, RenderBuf};
pub use style::{Color, Style};
