use serde_json::Value;

use super::ReportContext;
use crate::document::Block;
use crate::value::{display_value, field, field_or};

const RECENT_BROWSING_DAYS: i64 = 7;
const CROSS_SITE_THRESHOLD: usize = 10;
const LISTED_DOMAINS: usize = 10;
const LISTED_PROFILES: usize = 10;

pub(super) fn browser_security(context: &ReportContext<'_>) -> Vec<Block> {
    let scan = context.scan;
    if !scan.contains("safari_history") && !scan.contains("webkit_resource_load_statistics") {
        return Vec::new();
    }
    let mut blocks = vec![Block::heading("Browser Security Analysis")];

    if let Some(history) = scan.list("safari_history").filter(|items| !items.is_empty()) {
        blocks.push(Block::normal(format!(
            "Safari History Entries: {}",
            history.len()
        )));

        #[allow(clippy::cast_precision_loss)]
        let cutoff = context.days_ago(RECENT_BROWSING_DAYS).unix_timestamp() as f64;
        let recent = history
            .iter()
            .filter_map(|entry| entry.get("visit_time").and_then(Value::as_f64))
            .filter(|visit_time| *visit_time > cutoff)
            .count();
        if recent > 0 {
            blocks.push(Block::normal(format!(
                "Recent browsing activity (last 7 days): {recent} visits"
            )));
        }
    }

    if let Some(webkit) = scan
        .list("webkit_resource_load_statistics")
        .filter(|items| !items.is_empty())
    {
        blocks.push(Block::normal(format!(
            "WebKit Tracking Data: {} domains",
            webkit.len()
        )));

        let cross_site_domains: Vec<String> = webkit
            .iter()
            .filter(|entry| {
                entry
                    .get("subframeUnderTopFrameOrigins")
                    .and_then(Value::as_array)
                    .is_some_and(|origins| origins.len() > CROSS_SITE_THRESHOLD)
            })
            .map(|entry| field_or(entry, "RegistrableDomain", ""))
            .collect();
        if !cross_site_domains.is_empty() {
            blocks.push(Block::normal(format!(
                "Domains with high cross-site activity: {}",
                cross_site_domains.len()
            )));
            blocks.push(Block::sub_heading("Top Cross-Site Tracking Domains:"));
            for domain in cross_site_domains.into_iter().take(LISTED_DOMAINS) {
                blocks.push(Block::bullet(domain));
            }
        }
    }

    blocks
}

pub(super) fn configuration_profiles(context: &ReportContext<'_>) -> Vec<Block> {
    let Some(profiles) = context.scan.get("configuration_profiles") else {
        return Vec::new();
    };
    let mut blocks = vec![Block::heading("Configuration Profiles Analysis")];

    let Some(profiles) = profiles.as_array() else {
        blocks.push(Block::normal("No configuration profiles data available."));

        return blocks;
    };
    if profiles.is_empty() {
        blocks.push(Block::success("No configuration profiles installed."));

        return blocks;
    }

    blocks.push(Block::alert(format!(
        "{} configuration profiles found:",
        profiles.len()
    )));
    blocks.push(Block::normal(
        "Configuration profiles can control device behavior and should be reviewed for \
         security implications.",
    ));
    for (index, profile) in profiles.iter().take(LISTED_PROFILES).enumerate() {
        let name = profile
            .get("payload_display_name")
            .map_or_else(|| format!("Profile {}", index + 1), display_value);
        blocks.push(Block::bullet(format!(
            "{name} (ID: {}) - Installed: {}",
            field_or(profile, "payload_identifier", "Unknown ID"),
            field(profile, "install_date")
        )));
    }
    if profiles.len() > LISTED_PROFILES {
        blocks.push(Block::normal(format!(
            "... and {} more profiles",
            profiles.len() - LISTED_PROFILES
        )));
    }

    blocks
}
