//! Screen sections, each a free `render` over a `RenderBuf`.

pub mod header;
pub mod knobs;
pub mod piano;
