//! Rendering of structuring output: page records and text dumps.

mod json;
mod structurer;
mod text;

pub use json::{to_json, JsonFormat};
pub use structurer::PageRecordStructurer;
pub use text::to_text;
