//! JSON rendering for page records.

use crate::error::{Error, Result};
use crate::model::PageRecord;

/// JSON output format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum JsonFormat {
    /// Pretty-printed JSON with indentation
    #[default]
    Pretty,
    /// Compact JSON without extra whitespace
    Compact,
}

/// Serialize records as a JSON array, one object per page.
pub fn to_json(records: &[PageRecord], format: JsonFormat) -> Result<String> {
    let result = match format {
        JsonFormat::Pretty => serde_json::to_string_pretty(records),
        JsonFormat::Compact => serde_json::to_string(records),
    };

    result.map_err(|e| Error::Render(format!("JSON serialization error: {}", e)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Traceability;

    fn record() -> PageRecord {
        PageRecord {
            page_number: 0,
            header: "SECTION 1".to_string(),
            content: "Body text.".to_string(),
            traceability: Traceability {
                exact_location: "Page_0".to_string(),
                ..Default::default()
            },
            ..Default::default()
        }
    }

    #[test]
    fn test_to_json_pretty() {
        let json = to_json(&[record()], JsonFormat::Pretty).unwrap();
        assert!(json.starts_with('['));
        assert!(json.contains("\"header\": \"SECTION 1\""));
        assert!(json.contains("\"vector\": null"));
        assert!(json.contains('\n'));
    }

    #[test]
    fn test_to_json_compact() {
        let json = to_json(&[record()], JsonFormat::Compact).unwrap();
        assert!(!json.contains('\n'));

        let value: serde_json::Value = serde_json::from_str(&json).unwrap();
        let page = &value[0];
        assert_eq!(page["page_number"], 0);
        assert_eq!(page["table_text"], "");
        assert_eq!(page["traceability"]["exact_location"], "Page_0");
    }
}
