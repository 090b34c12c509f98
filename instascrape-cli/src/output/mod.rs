//! Output formatting for CLI.

mod json;
mod text;

pub use json::{list, JsonFormatter, SearchOutput};
pub use text::TextFormatter;
#[cfg(test)]
mod tests;
