//! PDF security reports from Mobile Verification Toolkit scan results.
//!
//! [`generate_report`] loads every JSON result in an MVT output directory,
//! builds the report [`document::Document`] and writes it next to the
//! results as an A4 PDF.

pub mod device;
pub mod document;
pub mod error;
pub mod layout;
pub mod render;
pub mod scan;
pub mod sections;

mod value;

use std::path::{Path, PathBuf};

use time::OffsetDateTime;
use time::macros::format_description;
use tracing::info;

pub use device::DeviceType;
pub use error::ReportError;
pub use scan::ScanData;

const PDF_EXTENSION: &str = ".pdf";

/// Default report file name: `MVT_Security_Report_<Type>_<YYYYmmdd_HHMMSS>.pdf`.
pub fn default_file_name(device_type: DeviceType, generated_at: OffsetDateTime) -> String {
    let stamp_format = format_description!("[year][month][day]_[hour][minute][second]");
    let stamp = generated_at
        .format(stamp_format)
        .unwrap_or_else(|_| generated_at.unix_timestamp().to_string());

    format!("MVT_Security_Report_{}_{stamp}{PDF_EXTENSION}", device_type.label())
}

/// Appends `.pdf` unless the name already ends with it.
pub fn ensure_pdf_extension(file_name: &str) -> String {
    if file_name.ends_with(PDF_EXTENSION) {
        return file_name.to_string();
    }

    format!("{file_name}{PDF_EXTENSION}")
}

/// Current local time, falling back to UTC when the offset is unknown.
fn now() -> OffsetDateTime {
    OffsetDateTime::now_local().unwrap_or_else(|_| OffsetDateTime::now_utc())
}

/// Builds a PDF report for the scan results in `scan_dir` and returns the
/// written file path.
///
/// The device type is detected from the results when not given. The report
/// is written inside `scan_dir`.
///
/// # Errors
/// Returns an error when the directory holds no readable JSON results or the
/// PDF cannot be written.
pub fn generate_report(
    scan_dir: &Path,
    device_type: Option<DeviceType>,
    file_name: Option<&str>,
) -> Result<PathBuf, ReportError> {
    let scan = ScanData::load(scan_dir)?;
    let device_type = device_type.unwrap_or_else(|| DeviceType::detect(&scan));
    let generated_at = now();

    let file_name = match file_name.map(str::trim).filter(|name| !name.is_empty()) {
        Some(name) => ensure_pdf_extension(name),
        None => default_file_name(device_type, generated_at),
    };
    let output_path = scan_dir.join(file_name);

    let context = sections::ReportContext {
        device_type,
        generated_at,
        scan: &scan,
    };
    let document = sections::build_document(&context);
    let pages = layout::layout(&document);
    render::write_pdf(&document.title, &pages, &output_path)?;

    info!(
        path = %output_path.display(),
        pages = pages.len(),
        %device_type,
        "PDF report generated"
    );

    Ok(output_path)
}
