//! Helpers the page layer applies on top of loaded entries

mod date;
mod html;
mod list;

pub use date::*;
pub use html::*;
pub use list::*;
