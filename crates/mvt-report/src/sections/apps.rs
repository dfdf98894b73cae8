use serde_json::Value;
use time::OffsetDateTime;

use super::ReportContext;
use crate::document::Block;
use crate::value::{bundle_display_name, field, first_field, format_date, parse_timestamp, truthy};

const TOP_CATEGORIES: usize = 10;
const HIGH_RISK_LIMIT: usize = 15;
const RECENT_INSTALL_LIMIT: usize = 10;
const RECENT_INSTALL_DAYS: i64 = 30;
const BACKUP_CATEGORY_LIMIT: usize = 10;

const HIGH_RISK_GENRES: [&str; 5] = [
    "Finance",
    "Business",
    "Productivity",
    "Medical",
    "Social Networking",
];

/// Bundle-id keyword buckets used when only the backup app list exists.
/// The first matching bucket wins; unmatched apps land in "Other".
const BACKUP_CATEGORIES: [(&str, &[&str]); 5] = [
    (
        "Banking/Finance",
        &["bank", "financial", "capital", "mbna", "cibc", "amex"],
    ),
    (
        "Social Media",
        &[
            "facebook",
            "instagram",
            "whatsapp",
            "messenger",
            "linkedin",
            "reddit",
            "skool",
        ],
    ),
    ("Google Services", &["google"]),
    ("Microsoft Office", &["microsoft"]),
    (
        "Security/VPN",
        &["vpn", "proton", "nord", "authenticator", "bitwarden", "duo"],
    ),
];

fn app_name(app: &Value) -> String {
    first_field(app, &["itemName", "name"])
}

fn purchase_date(app: &Value) -> Option<OffsetDateTime> {
    app.get("com.apple.iTunesStore.downloadInfo")?
        .get("purchaseDate")
        .and_then(parse_timestamp)
}

/// Counts genres, keeping first-seen order for equal counts.
fn genre_counts(apps: &[Value]) -> Vec<(String, usize)> {
    let mut counts: Vec<(String, usize)> = Vec::new();
    for app in apps {
        let genre = field(app, "genre");
        if let Some((_, count)) = counts.iter_mut().find(|(name, _)| *name == genre) {
            *count += 1;
        } else {
            counts.push((genre, 1));
        }
    }

    counts
}

pub(super) fn installed_applications(context: &ReportContext<'_>) -> Vec<Block> {
    let scan = context.scan;
    let mut blocks = vec![Block::heading("Installed Applications Analysis")];

    let backup_apps: Vec<&str> = scan
        .get("backup_info")
        .and_then(|backup| backup.get("Installed Applications"))
        .and_then(Value::as_array)
        .map(|apps| apps.iter().filter_map(Value::as_str).collect())
        .unwrap_or_default();
    let detailed_apps = scan.list("applications").unwrap_or_default();

    let total = if backup_apps.is_empty() {
        detailed_apps.len()
    } else {
        backup_apps.len()
    };
    blocks.push(Block::normal(format!("Total Applications Found: {total}")));

    if detailed_apps.is_empty() {
        blocks.extend(backup_app_categories(&backup_apps));
    } else {
        blocks.extend(detailed_app_analysis(context, detailed_apps));
    }

    blocks
}

fn detailed_app_analysis(context: &ReportContext<'_>, apps: &[Value]) -> Vec<Block> {
    let mut blocks = Vec::new();

    let sideloaded = apps
        .iter()
        .filter(|app| truthy(app.get("sideLoadedDeviceBasedVPP")))
        .count();
    let mut categories = genre_counts(apps);
    let most_common = categories
        .iter()
        .fold(None::<&(String, usize)>, |best, entry| match best {
            Some(current) if current.1 >= entry.1 => Some(current),
            _ => Some(entry),
        })
        .map_or("Unknown", |(genre, _)| genre.as_str())
        .to_string();

    blocks.push(Block::normal(format!(
        "App Store Applications: {}\nSideloaded Applications: {sideloaded}\nMost Common \
         Category: {most_common}",
        apps.len() - sideloaded
    )));
    if sideloaded > 0 {
        blocks.push(Block::alert(format!(
            "{sideloaded} sideloaded applications detected - requires security review"
        )));
    }

    blocks.push(Block::sub_heading("Application Categories:"));
    categories.sort_by(|left, right| right.1.cmp(&left.1));
    for (genre, count) in categories.iter().take(TOP_CATEGORIES) {
        blocks.push(Block::bullet(format!("{genre}: {count} apps")));
    }

    let high_risk: Vec<&Value> = apps
        .iter()
        .filter(|app| {
            app.get("genre")
                .and_then(Value::as_str)
                .is_some_and(|genre| HIGH_RISK_GENRES.contains(&genre))
        })
        .collect();
    if !high_risk.is_empty() {
        blocks.push(Block::sub_heading(
            "High-Risk Applications (Finance/Business/Medical):",
        ));
        for app in high_risk.iter().take(HIGH_RISK_LIMIT) {
            blocks.push(Block::bullet(format!(
                "{} ({}) - v{}",
                app_name(app),
                field(app, "genre"),
                field(app, "bundleShortVersionString")
            )));
        }
        if high_risk.len() > HIGH_RISK_LIMIT {
            blocks.push(Block::normal(format!(
                "... and {} more high-risk applications",
                high_risk.len() - HIGH_RISK_LIMIT
            )));
        }
    }

    let cutoff = context.days_ago(RECENT_INSTALL_DAYS);
    let mut recent: Vec<(&Value, OffsetDateTime)> = apps
        .iter()
        .filter_map(|app| purchase_date(app).map(|date| (app, date)))
        .filter(|(_, date)| *date > cutoff)
        .collect();
    if !recent.is_empty() {
        blocks.push(Block::sub_heading("Recently Installed Apps (Last 30 Days):"));
        recent.sort_by(|left, right| right.1.cmp(&left.1));
        for (app, date) in recent.into_iter().take(RECENT_INSTALL_LIMIT) {
            blocks.push(Block::bullet(format!(
                "{} - Installed: {}",
                app_name(app),
                format_date(date)
            )));
        }
    }

    blocks
}

fn backup_category(bundle_id: &str) -> &'static str {
    let lowered = bundle_id.to_lowercase();
    BACKUP_CATEGORIES
        .iter()
        .find(|(_, keywords)| keywords.iter().any(|keyword| lowered.contains(keyword)))
        .map_or("Other", |(name, _)| name)
}

fn backup_app_categories(backup_apps: &[&str]) -> Vec<Block> {
    if backup_apps.is_empty() {
        return Vec::new();
    }

    let mut sorted_apps = backup_apps.to_vec();
    sorted_apps.sort_unstable();

    let category_names = BACKUP_CATEGORIES
        .iter()
        .map(|(name, _)| *name)
        .chain(std::iter::once("Other"));
    let mut blocks = vec![Block::sub_heading("Installed Applications (Bundle IDs):")];
    for category in category_names {
        let members: Vec<&str> = sorted_apps
            .iter()
            .copied()
            .filter(|bundle_id| backup_category(bundle_id) == category)
            .collect();
        if members.is_empty() {
            continue;
        }

        blocks.push(Block::sub_heading(format!(
            "{category} ({} apps):",
            members.len()
        )));
        for bundle_id in members.iter().take(BACKUP_CATEGORY_LIMIT) {
            blocks.push(Block::nested_bullet(format!(
                "{} ({bundle_id})",
                bundle_display_name(bundle_id)
            )));
        }
        if members.len() > BACKUP_CATEGORY_LIMIT {
            blocks.push(Block::normal(format!(
                "  ... and {} more",
                members.len() - BACKUP_CATEGORY_LIMIT
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
    fn test_backup_category_matches_first_bucket() {
        // Arrange & Act & Assert
        assert_eq!(backup_category("com.cibc.mobile"), "Banking/Finance");
        assert_eq!(backup_category("net.whatsapp.WhatsApp"), "Social Media");
        assert_eq!(backup_category("com.google.Maps"), "Google Services");
        assert_eq!(backup_category("com.bitwarden.app"), "Security/VPN");
        assert_eq!(backup_category("org.example.notes"), "Other");
    }

    #[test]
    fn test_installed_applications_falls_back_to_backup_list() {
        // Arrange
        let scan = scan(&[(
            "backup_info",
            json!({"Installed Applications": ["net.whatsapp.WhatsApp", "com.google.Maps", "org.example.notes"]}),
        )]);
        let context = ReportContext {
            device_type: DeviceType::Ios,
            generated_at: NOW,
            scan: &scan,
        };

        // Act
        let rendered = text(&installed_applications(&context));

        // Assert
        assert!(rendered.contains("Total Applications Found: 3"));
        assert!(rendered.contains("Social Media (1 apps):"));
        assert!(rendered.contains("WhatsApp (net.whatsapp.WhatsApp)"));
        assert!(rendered.contains("Other (1 apps):"));
        assert!(!rendered.contains("Banking/Finance"));
    }

    #[test]
    fn test_installed_applications_analyzes_detailed_records() {
        // Arrange
        let scan = scan(&[(
            "applications",
            json!([
                {"itemName": "Bank", "genre": "Finance", "bundleShortVersionString": "4.1"},
                {"itemName": "Game", "genre": "Games"},
                {"itemName": "Wallet", "genre": "Finance", "sideLoadedDeviceBasedVPP": true,
                 "com.apple.iTunesStore.downloadInfo": {"purchaseDate": "2024-01-28T09:00:00Z"}},
                {"itemName": "Old", "genre": "Games",
                 "com.apple.iTunesStore.downloadInfo": {"purchaseDate": "2020-01-01T09:00:00Z"}}
            ]),
        )]);
        let context = ReportContext {
            device_type: DeviceType::Ios,
            generated_at: NOW,
            scan: &scan,
        };

        // Act
        let rendered = text(&installed_applications(&context));

        // Assert
        assert!(rendered.contains("App Store Applications: 3"));
        assert!(rendered.contains("Sideloaded Applications: 1"));
        assert!(rendered.contains("Most Common Category: Finance"));
        assert!(rendered.contains("1 sideloaded applications detected"));
        assert!(rendered.contains("Bank (Finance) - v4.1"));
        assert!(rendered.contains("Wallet - Installed: 2024-01-28"));
        assert!(!rendered.contains("Old - Installed"));
    }
}
