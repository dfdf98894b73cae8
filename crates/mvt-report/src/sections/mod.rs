//! Report sections built from loaded scan data.
//!
//! Every builder is total over arbitrary JSON: records with unexpected shapes
//! are skipped or shown as missing data, never treated as an error.

mod apps;
mod browser;
mod findings;
mod network;
mod privacy;
mod recommendations;
mod summary;

use time::{Duration, OffsetDateTime};

use crate::device::DeviceType;
use crate::document::{Block, Document};
use crate::scan::ScanData;

pub use findings::format_security_issue;
pub use summary::device_info;

pub const REPORT_TITLE: &str = "Mobile Device Security Analysis Report";

const SECTION_GAP: f32 = 20.0;
const FOOTER_GAP: f32 = 30.0;
const FOOTER_TEXT: &str = "This report was generated by the Mobile Verification Toolkit (MVT) \
                           Dashboard. MVT is developed by Amnesty International for consensual \
                           forensic analysis. For questions about this report, contact your \
                           security team.";

/// Inputs shared by all section builders.
pub struct ReportContext<'a> {
    pub device_type: DeviceType,
    pub generated_at: OffsetDateTime,
    pub scan: &'a ScanData,
}

impl ReportContext<'_> {
    /// Cutoff for "recent" activity windows measured back from report time.
    pub(crate) fn days_ago(&self, days: i64) -> OffsetDateTime {
        self.generated_at - Duration::days(days)
    }
}

/// Builds the full report content in reading order.
pub fn build_document(context: &ReportContext<'_>) -> Document {
    let mut document = Document::new(REPORT_TITLE);
    document.extend(summary::title_page(context));

    let sections: [fn(&ReportContext<'_>) -> Vec<Block>; 10] = [
        summary::executive_summary,
        summary::device_info_section,
        findings::security_findings,
        apps::installed_applications,
        privacy::privacy_permissions,
        privacy::location_tracking,
        browser::browser_security,
        browser::configuration_profiles,
        network::network_activity,
        network::messaging,
    ];
    for section in sections {
        document.extend(section(context));
        document.push(Block::Spacer(SECTION_GAP));
    }

    document.extend(findings::timeline(context));
    document.push(Block::PageBreak);
    document.extend(recommendations::recommendations(context));

    document.push(Block::Spacer(FOOTER_GAP));
    document.push(Block::normal(FOOTER_TEXT));

    document
}

#[cfg(test)]
pub(crate) mod test_support {
    use std::collections::BTreeMap;

    use serde_json::Value;
    use time::macros::datetime;
    use time::OffsetDateTime;

    use crate::scan::ScanData;

    pub(crate) const NOW: OffsetDateTime = datetime!(2024-02-01 12:00:00 UTC);

    pub(crate) fn scan(entries: &[(&str, Value)]) -> ScanData {
        let results: BTreeMap<String, Value> = entries
            .iter()
            .map(|(key, value)| ((*key).to_string(), value.clone()))
            .collect();

        ScanData::from_results("/tmp/scan", results)
    }

    pub(crate) fn text(blocks: &[crate::document::Block]) -> String {
        blocks
            .iter()
            .map(crate::document::Block::plain_text)
            .collect::<Vec<_>>()
            .join("\n")
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::test_support::{NOW, scan};
    use super::*;

    #[test]
    fn test_build_document_orders_sections() {
        // Arrange
        let scan = scan(&[
            ("info", json!({"mvt_version": "2.5.0"})),
            ("tcc", json!([])),
            ("sms", json!([{"text": "hello"}])),
        ]);
        let context = ReportContext {
            device_type: DeviceType::Ios,
            generated_at: NOW,
            scan: &scan,
        };

        // Act
        let document = build_document(&context);

        // Assert
        assert_eq!(
            document.headings(),
            vec![
                "Executive Summary",
                "Device Information",
                "Security Findings",
                "Installed Applications Analysis",
                "Privacy & Permissions Analysis",
                "Messaging & Communications Analysis",
                "Timeline Analysis",
                "Recommendations",
            ]
        );
        assert!(matches!(document.blocks.first(), Some(Block::Title(title)) if title == REPORT_TITLE));
        assert!(document.plain_text().ends_with("contact your security team."));
    }
}
