//! HTTP Handlers

mod events;
mod generate;
mod library;
mod ping;

pub use events::*;
pub use generate::*;
pub use library::*;
pub use ping::*;
