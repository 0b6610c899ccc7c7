mod input;
pub use input::*;

pub mod key_source;
pub mod options;
pub mod pointer_source;
pub mod pointer_state;
pub mod touch_source;
pub mod touch_state;
pub mod winit;
