use serde_json::Value;

use super::ReportContext;
use crate::document::Block;
use crate::value::{bundle_display_name, field, first_field, truthy};

const LISTED_CLIENTS: usize = 10;
const LISTED_LOCATION_APPS: usize = 15;
const SYSTEM_PREFIX: &str = "com.apple.";

/// TCC services worth calling out, with their report labels.
const SENSITIVE_SERVICES: [(&str, &str); 16] = [
    ("kTCCServiceCamera", "Camera Access"),
    ("kTCCServiceMicrophone", "Microphone Access"),
    ("kTCCServiceLocation", "Location Services"),
    ("kTCCServicePhotos", "Photo Library Access"),
    ("kTCCServiceContactsLimited", "Contacts Access (Limited)"),
    ("kTCCServiceContactsFull", "Contacts Access (Full)"),
    ("kTCCServiceCalendar", "Calendar Access"),
    ("kTCCServiceReminders", "Reminders Access"),
    ("kTCCServiceFaceID", "Face ID Authentication"),
    ("kTCCServiceSiri", "Siri Access"),
    ("kTCCServiceMotion", "Motion & Fitness"),
    ("kTCCServiceBluetoothPeripheral", "Bluetooth Access"),
    ("kTCCServiceFileProviderPresence", "File Provider Access"),
    (
        "kTCCServiceSystemPolicyDesktopFolder",
        "Desktop Folder Access",
    ),
    (
        "kTCCServiceSystemPolicyDocumentsFolder",
        "Documents Folder Access",
    ),
    (
        "kTCCServiceSystemPolicyDownloadsFolder",
        "Downloads Folder Access",
    ),
];

/// Clients granted or refused one TCC service.
#[derive(Default)]
struct ServiceGrants {
    allowed: Vec<String>,
    denied: Vec<String>,
}

fn is_system_client(client: &str) -> bool {
    client.starts_with(SYSTEM_PREFIX) && !client.to_lowercase().contains("third")
}

/// Groups TCC entries by service, keeping first-seen service order.
fn grants_by_service(entries: &[Value]) -> Vec<(String, ServiceGrants)> {
    let mut services: Vec<(String, ServiceGrants)> = Vec::new();
    for entry in entries {
        let service = field(entry, "service");
        let client = field(entry, "client");
        let allowed = entry.get("auth_value").and_then(Value::as_str) == Some("allowed");

        let index = match services.iter().position(|(name, _)| *name == service) {
            Some(index) => index,
            None => {
                services.push((service, ServiceGrants::default()));
                services.len() - 1
            }
        };
        let grants = &mut services[index].1;
        if allowed {
            grants.allowed.push(client);
        } else {
            grants.denied.push(client);
        }
    }

    services
}

pub(super) fn privacy_permissions(context: &ReportContext<'_>) -> Vec<Block> {
    let Some(tcc) = context.scan.get("tcc") else {
        return Vec::new();
    };
    let mut blocks = vec![Block::heading("Privacy & Permissions Analysis")];

    let Some(entries) = tcc.as_array() else {
        blocks.push(Block::normal("No TCC permission data available."));

        return blocks;
    };

    let services = grants_by_service(entries);
    let mut sensitive_found = 0;
    for (service_key, service_name) in SENSITIVE_SERVICES {
        let Some((_, grants)) = services.iter().find(|(name, _)| name == service_key) else {
            continue;
        };
        sensitive_found += 1;
        tracing::debug!(
            service = service_key,
            denied = grants.denied.len(),
            "Sensitive TCC service present"
        );
        if grants.allowed.is_empty() {
            continue;
        }

        blocks.push(Block::sub_heading(format!("{service_name}:")));
        let (system_apps, user_apps): (Vec<&String>, Vec<&String>) = grants
            .allowed
            .iter()
            .partition(|client| is_system_client(client));

        if !user_apps.is_empty() {
            blocks.push(Block::normal("Third-party applications with access:"));
            for client in user_apps.iter().take(LISTED_CLIENTS) {
                blocks.push(Block::nested_bullet(bundle_display_name(client)));
            }
            if user_apps.len() > LISTED_CLIENTS {
                blocks.push(Block::normal(format!(
                    "  ... and {} more apps",
                    user_apps.len() - LISTED_CLIENTS
                )));
            }
        }
        if !system_apps.is_empty() {
            blocks.push(Block::normal(format!(
                "System applications: {} apps",
                system_apps.len()
            )));
        }
    }

    if sensitive_found == 0 {
        blocks.push(Block::success(
            "No sensitive privacy permissions detected in TCC data.",
        ));
    }

    blocks.push(Block::sub_heading("TCC Database Summary:"));
    blocks.push(Block::normal(format!(
        "Total Permission Entries: {}\nUnique Services: {}\nSensitive Permissions Found: \
         {sensitive_found}",
        entries.len(),
        services.len()
    )));

    blocks
}

pub(super) fn location_tracking(context: &ReportContext<'_>) -> Vec<Block> {
    let Some(location) = context.scan.get("locationd_clients") else {
        return Vec::new();
    };
    let mut blocks = vec![Block::heading("Location Tracking Analysis")];

    let Some(clients) = location.as_array() else {
        blocks.push(Block::normal("No location client data available."));

        return blocks;
    };

    let mut active_clients = Vec::new();
    let mut background_clients = Vec::new();
    for client in clients {
        if !(truthy(client.get("Authorized")) && truthy(client.get("BundleId"))) {
            continue;
        }

        let name = first_field(client, &["BundleId", "Executable"]);
        if client.get("BackgroundAppRefresh").is_some()
            || client.get("LocationServicesEnabled").is_some()
        {
            background_clients.push(name.clone());
        }
        active_clients.push(name);
    }

    blocks.push(Block::normal(format!(
        "Applications with Location Access: {}",
        active_clients.len()
    )));

    if !background_clients.is_empty() {
        blocks.push(Block::alert(format!(
            "{} applications may have background location access",
            background_clients.len()
        )));
        blocks.push(Block::sub_heading("Apps with Potential Background Location:"));
        for client in background_clients.iter().take(LISTED_CLIENTS) {
            blocks.push(Block::bullet(bundle_display_name(client)));
        }
    }

    let user_apps: Vec<&String> = active_clients
        .iter()
        .filter(|client| !client.starts_with(SYSTEM_PREFIX))
        .collect();
    if !user_apps.is_empty() {
        blocks.push(Block::sub_heading("Third-party Apps with Location Access:"));
        for client in user_apps.into_iter().take(LISTED_LOCATION_APPS) {
            blocks.push(Block::bullet(bundle_display_name(client)));
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
    fn test_privacy_permissions_splits_user_and_system_apps() {
        // Arrange
        let scan = scan(&[(
            "tcc",
            json!([
                {"service": "kTCCServiceCamera", "client": "com.apple.camera", "auth_value": "allowed"},
                {"service": "kTCCServiceCamera", "client": "org.signal.Signal", "auth_value": "allowed"},
                {"service": "kTCCServiceCamera", "client": "com.example.denied", "auth_value": "denied"},
                {"service": "kTCCServiceUbiquity", "client": "com.example.sync", "auth_value": "allowed"}
            ]),
        )]);
        let context = ReportContext {
            device_type: DeviceType::Ios,
            generated_at: NOW,
            scan: &scan,
        };

        // Act
        let rendered = text(&privacy_permissions(&context));

        // Assert
        assert!(rendered.contains("Camera Access:"));
        assert!(rendered.contains("Third-party applications with access:\nSignal"));
        assert!(rendered.contains("System applications: 1 apps"));
        assert!(!rendered.contains("denied"));
        assert!(rendered.contains(
            "Total Permission Entries: 4\nUnique Services: 2\nSensitive Permissions Found: 1"
        ));
    }

    #[test]
    fn test_privacy_permissions_reports_clean_database() {
        // Arrange
        let scan = scan(&[("tcc", json!([]))]);
        let context = ReportContext {
            device_type: DeviceType::Ios,
            generated_at: NOW,
            scan: &scan,
        };

        // Act
        let blocks = privacy_permissions(&context);

        // Assert
        assert!(blocks.contains(&Block::success(
            "No sensitive privacy permissions detected in TCC data."
        )));
    }

    #[test]
    fn test_privacy_permissions_skipped_without_tcc() {
        // Arrange
        let scan = scan(&[("sms", json!([]))]);
        let context = ReportContext {
            device_type: DeviceType::Ios,
            generated_at: NOW,
            scan: &scan,
        };

        // Act
        let blocks = privacy_permissions(&context);

        // Assert
        assert!(blocks.is_empty());
    }

    #[test]
    fn test_location_tracking_flags_background_clients() {
        // Arrange
        let scan = scan(&[(
            "locationd_clients",
            json!([
                {"BundleId": "com.apple.Maps", "Authorized": true},
                {"BundleId": "com.example.Tracker", "Authorized": true, "BackgroundAppRefresh": false},
                {"BundleId": "com.example.Denied", "Authorized": false},
                {"Executable": "/usr/libexec/locationd", "Authorized": true}
            ]),
        )]);
        let context = ReportContext {
            device_type: DeviceType::Ios,
            generated_at: NOW,
            scan: &scan,
        };

        // Act
        let rendered = text(&location_tracking(&context));

        // Assert
        assert!(rendered.contains("Applications with Location Access: 2"));
        assert!(rendered.contains("1 applications may have background location access"));
        assert!(rendered.contains("Third-party Apps with Location Access:\nTracker"));
        assert!(!rendered.contains("Denied"));
    }
}
