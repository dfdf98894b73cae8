use serde_json::Value;
use time::OffsetDateTime;

use super::ReportContext;
use crate::document::Block;
use crate::value::{display_value, field, format_timestamp, parse_timestamp, title_case};

const ISSUES_PER_MODULE: usize = 5;
const TIMELINE_WINDOW_DAYS: i64 = 30;
const TIMELINE_LIMIT: usize = 10;

const ISSUE_DETAIL_FIELDS: [(&str, &str); 5] = [
    ("url", "URL"),
    ("domain", "Domain"),
    ("process", "Process"),
    ("bundle_id", "App"),
    ("matched_indicator", "IOC"),
];

/// One-line description of a detected issue: `[timestamp] detail | detail`.
pub fn format_security_issue(issue: &Value) -> String {
    let timestamp = match issue.get("timestamp") {
        None => "Unknown time".to_string(),
        Some(value @ Value::Number(_)) => {
            parse_timestamp(value).map_or_else(|| display_value(value), format_timestamp)
        }
        Some(value) => display_value(value),
    };

    let details: Vec<String> = ISSUE_DETAIL_FIELDS
        .iter()
        .filter_map(|(key, label)| {
            issue
                .get(*key)
                .map(|value| format!("{label}: {}", display_value(value)))
        })
        .collect();
    let detail_text = if details.is_empty() {
        "See raw data for details".to_string()
    } else {
        details.join(" | ")
    };

    format!("[{timestamp}] {detail_text}")
}

/// Detected issues grouped by the MVT module that raised them, in first-seen
/// order.
fn group_by_module(issues: &[Value]) -> Vec<(String, Vec<&Value>)> {
    let mut groups: Vec<(String, Vec<&Value>)> = Vec::new();
    for issue in issues {
        let module = field(issue, "module");
        if let Some((_, members)) = groups.iter_mut().find(|(name, _)| *name == module) {
            members.push(issue);
        } else {
            groups.push((module, vec![issue]));
        }
    }

    groups
}

pub(super) fn security_findings(context: &ReportContext<'_>) -> Vec<Block> {
    let issues = context.scan.detected_issues();
    let mut blocks = vec![Block::heading("Security Findings")];

    if issues.is_empty() {
        blocks.push(Block::success(
            "No indicators of compromise (IOCs) were detected in this analysis.",
        ));
        blocks.push(Block::normal(
            "Note: This does not guarantee the absence of sophisticated or unknown threats. \
             Regular security assessments and updates are recommended.",
        ));

        return blocks;
    }

    blocks.push(Block::alert(format!(
        "{} potential security issues detected:",
        issues.len()
    )));
    for (module, members) in group_by_module(issues) {
        blocks.push(Block::sub_heading(format!(
            "{} Issues ({}):",
            title_case(&module),
            members.len()
        )));
        for issue in members.iter().take(ISSUES_PER_MODULE) {
            blocks.push(Block::bullet(format_security_issue(issue)));
        }
        if members.len() > ISSUES_PER_MODULE {
            blocks.push(Block::normal(format!(
                "... and {} more {module} issues",
                members.len() - ISSUES_PER_MODULE
            )));
        }
    }

    blocks
}

pub(super) fn timeline(context: &ReportContext<'_>) -> Vec<Block> {
    let mut blocks = vec![Block::heading("Timeline Analysis")];

    let mut events: Vec<(OffsetDateTime, String)> = context
        .scan
        .detected_issues()
        .iter()
        .filter_map(|issue| {
            let timestamp = parse_timestamp(issue.get("timestamp")?)?;

            Some((timestamp, format_security_issue(issue)))
        })
        .collect();

    if events.is_empty() {
        blocks.push(Block::normal("No significant timeline events to display."));

        return blocks;
    }

    events.sort_by_key(|(timestamp, _)| *timestamp);
    let cutoff = context.days_ago(TIMELINE_WINDOW_DAYS);
    let recent: Vec<&(OffsetDateTime, String)> = events
        .iter()
        .filter(|(timestamp, _)| *timestamp > cutoff)
        .collect();

    if !recent.is_empty() {
        blocks.push(Block::sub_heading(
            "Recent Security Events (Last 30 Days):",
        ));
        for (timestamp, description) in recent.into_iter().take(TIMELINE_LIMIT) {
            blocks.push(Block::code(format!(
                "[{}] {description}",
                format_timestamp(*timestamp)
            )));
        }
    }

    blocks
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::super::test_support::{NOW, scan, text};
    use super::*;
    use crate::device::DeviceType;

    #[test]
    fn test_format_security_issue_lists_known_fields() {
        // Arrange
        let issue = json!({
            "timestamp": "2024-01-20 08:00:00",
            "url": "https://bad.example/x",
            "bundle_id": "com.bad.app",
            "matched_indicator": "bad.example"
        });

        // Act
        let formatted = format_security_issue(&issue);

        // Assert
        assert_eq!(
            formatted,
            "[2024-01-20 08:00:00] URL: https://bad.example/x | App: com.bad.app | IOC: bad.example"
        );
    }

    #[test]
    fn test_format_security_issue_without_details() {
        // Arrange
        let issue = json!({"module": "sms"});

        // Act
        let formatted = format_security_issue(&issue);

        // Assert
        assert_eq!(formatted, "[Unknown time] See raw data for details");
    }

    #[test]
    fn test_security_findings_caps_issues_per_module() {
        // Arrange
        let detections: Vec<Value> = (0..7)
            .map(|index| json!({"module": "safari_history", "url": format!("https://{index}.example")}))
            .chain(std::iter::once(json!({"module": "sms", "url": "https://sms.example"})))
            .collect();
        let scan = scan(&[("combined_detected", Value::Array(detections))]);
        let context = ReportContext {
            device_type: DeviceType::Ios,
            generated_at: NOW,
            scan: &scan,
        };

        // Act
        let findings = text(&security_findings(&context));

        // Assert
        assert!(findings.contains("8 potential security issues detected:"));
        assert!(findings.contains("Safari_History Issues (7):"));
        assert!(findings.contains("... and 2 more safari_history issues"));
        assert!(findings.contains("Sms Issues (1):"));
        assert!(!findings.contains("https://5.example"));
    }

    #[test]
    fn test_timeline_keeps_only_recent_events_in_order() {
        // Arrange
        let scan = scan(&[(
            "sms_detected",
            json!([
                {"module": "sms", "timestamp": "2024-01-25 10:00:00", "url": "https://late.example"},
                {"module": "sms", "timestamp": "2023-06-01 10:00:00", "url": "https://old.example"},
                {"module": "sms", "timestamp": "2024-01-10 10:00:00", "url": "https://early.example"},
                {"module": "sms", "url": "https://undated.example"}
            ]),
        )]);
        let context = ReportContext {
            device_type: DeviceType::Ios,
            generated_at: NOW,
            scan: &scan,
        };

        // Act
        let blocks = timeline(&context);

        // Assert
        let rendered = text(&blocks);
        assert!(rendered.contains("Recent Security Events (Last 30 Days):"));
        assert!(!rendered.contains("old.example"));
        assert!(!rendered.contains("undated.example"));
        let early = rendered.find("early.example").expect("early event missing");
        let late = rendered.find("late.example").expect("late event missing");
        assert!(early < late);
    }

    #[test]
    fn test_timeline_without_events() {
        // Arrange
        let scan = scan(&[("info", json!({}))]);
        let context = ReportContext {
            device_type: DeviceType::Ios,
            generated_at: NOW,
            scan: &scan,
        };

        // Act
        let blocks = timeline(&context);

        // Assert
        assert_eq!(
            text(&blocks),
            "Timeline Analysis\nNo significant timeline events to display."
        );
    }
}
