//! Plain text rendering of sequenced pages.

use crate::model::SequencedPage;

/// Width of the separator line written after each page.
const SEPARATOR_WIDTH: usize = 50;

/// Dump pages as plain text: a `Page N` header, the page's items in reading
/// order, and a dashed separator.
pub fn to_text(pages: &[SequencedPage]) -> String {
    let mut output = String::new();

    for page in pages {
        output.push_str(&format!("Page {}\n", page.index));
        for item in &page.items {
            let text = item.text();
            if !text.is_empty() {
                output.push_str(text);
                output.push('\n');
            }
        }
        output.push_str(&"-".repeat(SEPARATOR_WIDTH));
        output.push('\n');
    }

    output
}
