use serde_json::Value;
use time::OffsetDateTime;

use super::ReportContext;
use crate::document::Block;
use crate::value::{
    bundle_display_name, field, first_field, group_thousands, parse_timestamp, safe_numeric,
    to_megabytes, truthy,
};

const LISTED_CONSUMERS: usize = 10;
const LISTED_SUSPICIOUS: usize = 5;
const RECENT_SMS_DAYS: i64 = 30;
const UNKNOWN_BUNDLE: &str = "UNKNOWN";

/// Bytes a process sent and received across Wi-Fi and cellular.
struct Traffic {
    sent: f64,
    received: f64,
}

impl Traffic {
    fn of(process: &Value) -> Self {
        Self {
            sent: safe_numeric(process.get("wifi_out")) + safe_numeric(process.get("wwan_out")),
            received: safe_numeric(process.get("wifi_in")) + safe_numeric(process.get("wwan_in")),
        }
    }

    fn total(&self) -> f64 {
        self.sent + self.received
    }
}

fn has_valid_bundle(process: &Value) -> bool {
    truthy(process.get("bundle_id"))
        && process.get("bundle_id").and_then(Value::as_str) != Some(UNKNOWN_BUNDLE)
}

/// Totals are shown as whole megabytes with one decimal place.
fn whole_megabytes(bytes: f64) -> String {
    format!("{:.1}", to_megabytes(bytes).trunc())
}

fn consumer_label(process: &Value) -> String {
    let name = field(process, "proc_name");
    let bundle = match process.get("bundle_id") {
        Some(Value::String(bundle)) if !bundle.is_empty() && bundle != "Unknown" => bundle,
        _ => return name,
    };

    let clean_bundle = bundle_display_name(bundle);
    if clean_bundle == name {
        name
    } else {
        format!("{clean_bundle} ({name})")
    }
}

pub(super) fn network_activity(context: &ReportContext<'_>) -> Vec<Block> {
    let scan = context.scan;
    let Some(data) = scan
        .get("netusage")
        .or_else(|| scan.get("datausage"))
        .filter(|data| truthy(Some(data)))
    else {
        return Vec::new();
    };
    let mut blocks = vec![Block::heading("Network Activity Analysis")];

    let Some(processes) = data.as_array() else {
        blocks.push(Block::normal("No network usage data available."));

        return blocks;
    };

    let suspicious: Vec<&Value> = processes
        .iter()
        .filter(|process| !has_valid_bundle(process))
        .collect();
    let (total_sent, total_received) = processes
        .iter()
        .map(Traffic::of)
        .fold((0.0, 0.0), |(sent, received), traffic| {
            (sent + traffic.sent, received + traffic.received)
        });

    let mut consumers: Vec<(&Value, Traffic)> = processes
        .iter()
        .map(|process| (process, Traffic::of(process)))
        .filter(|(_, traffic)| traffic.total() > 0.0)
        .collect();
    consumers.sort_by(|left, right| right.1.total().total_cmp(&left.1.total()));

    blocks.push(Block::normal(format!(
        "Total processes with network activity: {}\nTotal data sent: {} bytes ({} MB)\nTotal \
         data received: {} bytes ({} MB)\nProcesses without valid bundle ID: {}",
        processes.len(),
        group_thousands(total_sent),
        whole_megabytes(total_sent),
        group_thousands(total_received),
        whole_megabytes(total_received),
        suspicious.len()
    )));

    if !consumers.is_empty() {
        blocks.push(Block::sub_heading("Top Network Data Consumers:"));
        for (process, traffic) in consumers.iter().take(LISTED_CONSUMERS) {
            blocks.push(Block::bullet(format!(
                "{} - Total: {:.1} MB (Sent: {:.1} MB, Received: {:.1} MB)",
                consumer_label(process),
                to_megabytes(traffic.total()),
                to_megabytes(traffic.sent),
                to_megabytes(traffic.received)
            )));
        }
    }

    if !suspicious.is_empty() {
        blocks.push(Block::alert(
            "Processes without valid bundle IDs detected. These may require investigation:",
        ));
        for process in suspicious.into_iter().take(LISTED_SUSPICIOUS) {
            let traffic = Traffic::of(process);
            blocks.push(Block::bullet(format!(
                "{} - Sent: {} bytes, Received: {} bytes",
                first_field(process, &["proc_name", "process"]),
                group_thousands(traffic.sent),
                group_thousands(traffic.received)
            )));
        }
    }

    blocks
}

fn message_date(message: &Value) -> Option<OffsetDateTime> {
    parse_timestamp(message.get("date")?)
}

fn non_empty_list<'a>(context: &'a ReportContext<'_>, key: &str) -> Option<&'a [Value]> {
    context.scan.list(key).filter(|items| !items.is_empty())
}

pub(super) fn messaging(context: &ReportContext<'_>) -> Vec<Block> {
    let scan = context.scan;
    let has_data = ["sms", "calls", "contacts"]
        .iter()
        .any(|key| truthy(scan.get(key)));
    if !has_data {
        return Vec::new();
    }
    let mut blocks = vec![Block::heading("Messaging & Communications Analysis")];

    if let Some(messages) = non_empty_list(context, "sms") {
        blocks.push(Block::normal(format!("SMS Messages: {}", messages.len())));

        let cutoff = context.days_ago(RECENT_SMS_DAYS);
        let recent = messages
            .iter()
            .filter_map(message_date)
            .filter(|date| *date > cutoff)
            .count();
        if recent > 0 {
            blocks.push(Block::normal(format!(
                "Recent SMS activity (last 30 days): {recent} messages"
            )));
        }

        let flagged = messages
            .iter()
            .filter(|message| truthy(message.get("flagged")) || truthy(message.get("suspicious")))
            .count();
        if flagged > 0 {
            blocks.push(Block::alert(format!(
                "{flagged} potentially suspicious SMS messages detected"
            )));
        }
    }

    if let Some(calls) = non_empty_list(context, "calls") {
        let direction_count = |direction: &str| {
            calls
                .iter()
                .filter(|call| call.get("direction").and_then(Value::as_str) == Some(direction))
                .count()
        };
        blocks.push(Block::normal(format!("Call Records: {}", calls.len())));
        blocks.push(Block::normal(format!(
            "Incoming calls: {}, Outgoing calls: {}",
            direction_count("incoming"),
            direction_count("outgoing")
        )));
    }

    if let Some(contacts) = non_empty_list(context, "contacts") {
        blocks.push(Block::normal(format!("Contacts: {}", contacts.len())));
    }

    blocks
}
