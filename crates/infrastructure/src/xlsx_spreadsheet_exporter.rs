//! XLSX rendering of exported logs.

use rust_xlsxwriter::{Format, Workbook, XlsxError};
use validash_application::{ExportTable, SpreadsheetExporter};
use validash_core::{AppError, AppResult};

/// Worksheet name used for exported logs.
pub const EXPORT_SHEET_NAME: &str = "API Logs";

/// Spreadsheet exporter writing a single-sheet XLSX workbook.
#[derive(Debug, Clone, Copy, Default)]
pub struct XlsxSpreadsheetExporter;

impl XlsxSpreadsheetExporter {
    /// Creates an exporter.
    #[must_use]
    pub fn new() -> Self {
        Self
    }

    fn write_workbook(table: &ExportTable) -> Result<Vec<u8>, XlsxError> {
        let mut workbook = Workbook::new();
        let header_format = Format::new().set_bold();
        let worksheet = workbook.add_worksheet();
        worksheet.set_name(EXPORT_SHEET_NAME)?;

        for (column, header) in (0_u16..).zip(table.headers()) {
            worksheet.write_string_with_format(0, column, *header, &header_format)?;
        }
        for (row, cells) in (1_u32..).zip(table.rows()) {
            for (column, cell) in (0_u16..).zip(cells) {
                worksheet.write_string(row, column, cell.as_str())?;
            }
        }
        worksheet.autofit();

        workbook.save_to_buffer()
    }
}

impl SpreadsheetExporter for XlsxSpreadsheetExporter {
    fn render(&self, table: &ExportTable) -> AppResult<Vec<u8>> {
        Self::write_workbook(table).map_err(|error| {
            AppError::Internal(format!("failed to render xlsx export: {error}"))
        })
    }
}

#[cfg(test)]
mod tests {
    use chrono::{TimeZone, Utc};
    use validash_application::{SpreadsheetExporter, build_export_table};
    use validash_core::RequestId;
    use validash_domain::{HttpMethod, LogEntry, LogStatus};

    use super::XlsxSpreadsheetExporter;

    #[test]
    fn renders_zip_container() {
        let captured_at = Utc
            .timestamp_millis_opt(1_712_327_400_000)
            .single()
            .unwrap_or_default();
        let entries = vec![
            LogEntry::record(
                captured_at,
                HttpMethod::Get,
                LogStatus::Success,
                "/api/validate",
                "1234567891012",
                RequestId::new(),
            ),
            LogEntry::record(
                captured_at,
                HttpMethod::Post,
                LogStatus::Error,
                "/api/validate",
                "000",
                RequestId::new(),
            ),
        ];

        let bytes = XlsxSpreadsheetExporter::new().render(&build_export_table(&entries));
        assert!(bytes.is_ok());
        let bytes = bytes.unwrap_or_default();
        assert!(bytes.starts_with(b"PK"));
    }

    #[test]
    fn renders_empty_table() {
        let bytes = XlsxSpreadsheetExporter::new().render(&build_export_table(&[]));
        assert!(bytes.is_ok_and(|bytes| !bytes.is_empty()));
    }
}
