use super::ReportContext;
use crate::document::{Block, Priority, TextStyle};

const INCIDENT_ACTIONS: [(Priority, &str); 4] = [
    (
        Priority::Immediate,
        "Investigate all detected security issues flagged in this report",
    ),
    (
        Priority::Immediate,
        "Consider isolating the device from networks until issues are resolved",
    ),
    (
        Priority::High,
        "Perform a full factory reset if compromise is confirmed",
    ),
    (
        Priority::High,
        "Change all passwords and revoke authentication tokens for accounts used on this device",
    ),
];

const GENERAL_ACTIONS: [&str; 6] = [
    "Keep the device operating system updated to the latest version",
    "Only install applications from official app stores",
    "Regularly review and remove unused applications",
    "Enable automatic security updates where available",
    "Use strong, unique passwords and enable two-factor authentication",
    "Regularly backup important data to secure, offline storage",
];

fn recommendation(priority: Priority, action: &str) -> Block {
    Block::Paragraph {
        text: format!("[{}] {action}", priority.label()),
        style: TextStyle::Priority(priority),
    }
}

pub(super) fn recommendations(context: &ReportContext<'_>) -> Vec<Block> {
    let mut blocks = vec![Block::heading("Recommendations")];

    if !context.scan.detected_issues().is_empty() {
        blocks.extend(
            INCIDENT_ACTIONS
                .iter()
                .map(|(priority, action)| recommendation(*priority, action)),
        );
    }
    blocks.extend(
        GENERAL_ACTIONS
            .iter()
            .map(|action| recommendation(Priority::Medium, action)),
    );

    blocks
}
