use serde::Deserialize;
use serde_json::Value;

use super::{REPORT_TITLE, ReportContext};
use crate::document::Block;
use crate::value::{display_value, field, format_timestamp, group_thousands, safe_numeric, truthy};

const TITLE_GAP: f32 = 30.0;
const LISTED_SOURCES: usize = 8;

const BACKUP_INFO_FIELDS: [&str; 12] = [
    "Device Name",
    "Product Name",
    "Product Type",
    "Product Version",
    "Build Version",
    "Serial Number",
    "Phone Number",
    "IMEI",
    "MEID",
    "ICCID",
    "Last Backup Date",
    "Target Identifier",
];

/// Scan metadata MVT writes to `info.json`.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct ScanInfo {
    target_path: Option<Value>,
    mvt_version: Option<Value>,
    date: Option<Value>,
    ioc_files: Vec<Value>,
    hashes: Vec<Value>,
}

/// Insertion-ordered property list where a repeated key keeps its first
/// position and takes the latest value.
#[derive(Default)]
struct Properties(Vec<(String, String)>);

impl Properties {
    fn set(&mut self, key: &str, value: impl Into<String>) {
        let value = value.into();
        if let Some(entry) = self.0.iter_mut().find(|(existing, _)| existing == key) {
            entry.1 = value;
        } else {
            self.0.push((key.to_string(), value));
        }
    }

    fn get(&self, key: &str) -> Option<&str> {
        self.0
            .iter()
            .find(|(existing, _)| existing == key)
            .map(|(_, value)| value.as_str())
    }
}

fn optional_text(value: Option<&Value>) -> String {
    value.map_or_else(|| "Unknown".to_string(), display_value)
}

/// Key device and scan properties extracted from the loaded results.
pub fn device_info(context: &ReportContext<'_>) -> Vec<(String, String)> {
    let scan = context.scan;
    let mut properties = Properties::default();

    if let Some(info) = scan
        .get("info")
        .filter(|value| value.is_object())
        .and_then(|value| ScanInfo::deserialize(value).ok())
    {
        properties.set("Scan Target Path", optional_text(info.target_path.as_ref()));
        properties.set("MVT Version", optional_text(info.mvt_version.as_ref()));
        properties.set("Analysis Date", optional_text(info.date.as_ref()));
        properties.set("IOC Files Used", info.ioc_files.len().to_string());
        properties.set("Hash Files Used", info.hashes.len().to_string());
    }

    if let Some(backup) = scan.get("backup_info").filter(|value| value.is_object()) {
        for key in BACKUP_INFO_FIELDS {
            properties.set(key, field(backup, key));
        }
        if let Some(installed) = backup.get("Installed Applications").and_then(Value::as_array) {
            properties.set("Total Apps (Backup)", installed.len().to_string());
        }
    }

    if let Some(apps) = scan.list("applications") {
        let sideloaded = apps
            .iter()
            .filter(|app| truthy(app.get("sideLoadedDeviceBasedVPP")))
            .count();
        properties.set("Total Apps (Detailed)", apps.len().to_string());
        properties.set("App Store Apps", (apps.len() - sideloaded).to_string());
        properties.set("Sideloaded Apps", sideloaded.to_string());
    }

    if let Some(usage) = scan.list("datausage") {
        let sent: f64 = usage
            .iter()
            .map(|process| safe_numeric(process.get("wifi_out")) + safe_numeric(process.get("wwan_out")))
            .sum();
        properties.set("Network Processes", usage.len().to_string());
        properties.set("Total Data Sent (bytes)", group_thousands(sent));
    }

    let counted_lists = [
        ("filesystem", "Filesystem Entries"),
        ("tcc", "Privacy Permissions"),
        ("locationd_clients", "Location Clients"),
        ("webkit_resource_load_statistics", "Browser Tracking Domains"),
    ];
    for (key, label) in counted_lists {
        if let Some(items) = scan.list(key) {
            properties.set(label, items.len().to_string());
        }
    }

    properties.set("Report Generated", format_timestamp(context.generated_at));
    properties.set("Device Type", context.device_type.label());
    properties.set("Total Data Sources", scan.len().to_string());

    properties.0
}

pub(super) fn title_page(context: &ReportContext<'_>) -> Vec<Block> {
    let info = Properties(device_info(context));
    let lookup = |key: &str, default: &'static str| info.get(key).unwrap_or(default).to_string();

    let summary = [
        format!("Device Type: {}", context.device_type.label()),
        format!("Target Path: {}", lookup("Scan Target Path", "Unknown")),
        format!("MVT Version: {}", lookup("MVT Version", "Unknown")),
        format!("Analysis Date: {}", lookup("Analysis Date", "Unknown")),
        format!("IOC Files Used: {}", lookup("IOC Files Used", "0")),
        format!("Total Data Sources: {}", lookup("Total Data Sources", "0")),
        format!("Report Generated: {}", format_timestamp(context.generated_at)),
    ]
    .join("\n");

    vec![
        Block::Title(REPORT_TITLE.to_string()),
        Block::Spacer(TITLE_GAP),
        Block::normal(summary),
        Block::Spacer(TITLE_GAP),
    ]
}

pub(super) fn executive_summary(context: &ReportContext<'_>) -> Vec<Block> {
    let scan = context.scan;
    let mut blocks = vec![Block::heading("Executive Summary")];

    let total_issues = scan.detected_issues().len();
    if total_issues > 0 {
        blocks.push(Block::alert(format!(
            "SECURITY ALERT: This forensic analysis has identified {total_issues} potential \
             security issues that require immediate attention. These findings indicate possible \
             indicators of compromise (IOCs) or suspicious activities on the device."
        )));
    } else {
        blocks.push(Block::success(
            "CLEAN SCAN: No immediate security threats or indicators of compromise were \
             detected during this analysis. However, this does not guarantee the device is \
             completely free from sophisticated or unknown threats.",
        ));
    }

    let sources: Vec<&str> = scan.keys().collect();
    let app_count = scan.list("applications").map_or(0, <[Value]>::len);
    let network_count = scan.list("datausage").map_or(0, <[Value]>::len);
    let listed = sources
        .iter()
        .take(LISTED_SOURCES)
        .copied()
        .collect::<Vec<_>>()
        .join(", ");
    let others = if sources.len() > LISTED_SOURCES {
        format!(" and {} others", sources.len() - LISTED_SOURCES)
    } else {
        String::new()
    };
    blocks.push(Block::normal(format!(
        "This Mobile Verification Toolkit (MVT) analysis examined {} different data sources \
         from the {} device, including {app_count} applications, {network_count} network \
         processes, system logs, browser history, privacy permissions, location tracking data, \
         and messaging records. Data sources analyzed: {listed}{others}.",
        scan.len(),
        context.device_type.label(),
    )));

    blocks.push(Block::sub_heading("Key Analysis Areas:"));
    if scan.contains("applications") {
        let count = scan.list("applications").map_or(0, <[Value]>::len);
        blocks.push(Block::bullet(format!("Applications: {count} analyzed")));
    }
    if scan.contains("sms") {
        let count = scan.list("sms").map_or(0, <[Value]>::len);
        blocks.push(Block::bullet(format!("SMS Messages: {count} examined")));
    }
    if scan.contains("safari_history") || scan.contains("chrome_history") {
        blocks.push(Block::bullet("Browser History: Analyzed for malicious URLs"));
    }
    if scan.contains("netusage") || scan.contains("datausage") {
        blocks.push(Block::bullet(
            "Network Activity: Process-level traffic analysis",
        ));
    }

    blocks
}

pub(super) fn device_info_section(context: &ReportContext<'_>) -> Vec<Block> {
    vec![
        Block::heading("Device Information"),
        Block::Table {
            header: ("Property".to_string(), "Value".to_string()),
            rows: device_info(context),
        },
    ]
}
