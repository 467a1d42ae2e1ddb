// ── Export serializer ──
//
// Flattens report rows into ordered string records and writes them as a
// single-sheet `.xlsx` workbook. The on-screen report table uses the same
// records, so what users see is what they download.

use std::path::Path;

use indexmap::IndexMap;
use rust_xlsxwriter::{Format, Workbook};
use tracing::info;

use crate::error::CoreError;
use crate::format::stat_value;
use crate::model::{ReportPeriod, ReportRow};
use crate::report::format_period_label;

/// Column headers, in output order.
pub const EXPORT_COLUMNS: [&str; 7] = [
    "Period",
    "Min Temp",
    "Avg Temp",
    "Max Temp",
    "Avg Humidity",
    "Avg Heat Index",
    "Avg Dew Point",
];

/// Worksheet name used for every export.
pub const SHEET_NAME: &str = "Report";

/// One flattened row: column header → rendered cell.
pub type ExportRecord = IndexMap<&'static str, String>;

/// Flatten rows into records keyed by [`EXPORT_COLUMNS`].
pub fn to_export_rows(rows: &[ReportRow], period: ReportPeriod) -> Vec<ExportRecord> {
    rows.iter()
        .map(|row| {
            let cells = [
                format_period_label(&row.period, period),
                stat_value(row.min_temp),
                stat_value(row.avg_temp),
                stat_value(row.max_temp),
                stat_value(row.avg_humidity),
                stat_value(row.avg_heat_index),
                stat_value(row.avg_dew_point),
            ];
            EXPORT_COLUMNS.into_iter().zip(cells).collect()
        })
        .collect()
}

/// `Report_{Period Label}_{deviceId}_{sensorId}.xlsx`
///
/// Ids are free-form, so path separators and other characters file systems
/// reject become `_`. The result is always a single path component.
pub fn export_file_name(period: ReportPeriod, device_id: &str, sensor_id: &str) -> String {
    format!(
        "Report_{}_{}_{}.xlsx",
        period.label(),
        file_safe(device_id),
        file_safe(sensor_id)
    )
}

fn file_safe(id: &str) -> String {
    id.chars()
        .map(|c| {
            if c.is_control() || matches!(c, '/' | '\\' | ':' | '*' | '?' | '"' | '<' | '>' | '|') {
                '_'
            } else {
                c
            }
        })
        .collect()
}

/// Write records to `path` as a workbook with one `Report` sheet.
///
/// The header row is always written, even for an empty record set; callers
/// decide whether an empty export is worth offering.
pub fn write_workbook(records: &[ExportRecord], path: &Path) -> Result<(), CoreError> {
    let mut workbook = Workbook::new();
    let bold = Format::new().set_bold();
    let sheet = workbook.add_worksheet();
    sheet.set_name(SHEET_NAME)?;

    for (col, header) in (0u16..).zip(EXPORT_COLUMNS) {
        sheet.write_string_with_format(0, col, header, &bold)?;
    }

    for (row, record) in (1u32..).zip(records) {
        for (col, header) in (0u16..).zip(EXPORT_COLUMNS) {
            let cell = record.get(header).map_or("", String::as_str);
            sheet.write_string(row, col, cell)?;
        }
    }

    workbook.save(path)?;
    info!(path = %path.display(), rows = records.len(), "report exported");
    Ok(())
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]

    use chrono::NaiveDate;

    use super::*;
    use crate::model::PeriodStamp;

    fn stamp() -> PeriodStamp {
        PeriodStamp::At(
            NaiveDate::from_ymd_opt(2024, 3, 1)
                .unwrap()
                .and_hms_opt(14, 0, 0)
                .unwrap(),
        )
    }

    #[test]
    fn empty_rows_give_empty_records() {
        assert!(to_export_rows(&[], ReportPeriod::Daily).is_empty());
    }

    #[test]
    fn stats_render_two_decimals_or_dash() {
        let rows = vec![ReportRow {
            min_temp: Some(10.125),
            avg_temp: None,
            max_temp: Some(30.0),
            ..ReportRow::empty(stamp())
        }];
        let records = to_export_rows(&rows, ReportPeriod::Daily);

        assert_eq!(records.len(), 1);
        let record = &records[0];
        assert_eq!(record["Period"], "3/1/2024 02:00 PM");
        assert_eq!(record["Min Temp"], "10.13");
        assert_eq!(record["Avg Temp"], "-");
        assert_eq!(record["Max Temp"], "30.00");
        assert_eq!(record["Avg Dew Point"], "-");
    }

    #[test]
    fn column_order_is_stable() {
        let records = to_export_rows(&[ReportRow::empty(stamp())], ReportPeriod::Monthly);
        let keys: Vec<&str> = records[0].keys().copied().collect();
        assert_eq!(keys, EXPORT_COLUMNS);
        assert_eq!(records[0]["Period"], "3/1/2024");
    }

    #[test]
    fn file_name_uses_period_label() {
        assert_eq!(
            export_file_name(ReportPeriod::Weekly, "RA-01", "3"),
            "Report_Weekly Report_RA-01_3.xlsx"
        );
    }

    #[test]
    fn file_name_replaces_path_characters_in_ids() {
        assert_eq!(
            export_file_name(ReportPeriod::Daily, "room alert/1", "a:b"),
            "Report_Daily Report_room alert_1_a_b.xlsx"
        );
        let escaped = export_file_name(ReportPeriod::Monthly, "../../etc", "x\\y");
        assert_eq!(escaped, "Report_Monthly Report_.._.._etc_x_y.xlsx");
        assert_eq!(Path::new(&escaped).components().count(), 1);
    }

    #[test]
    fn workbook_with_slashed_device_id_lands_in_target_dir() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir
            .path()
            .join(export_file_name(ReportPeriod::Daily, "room alert/1", "3"));
        write_workbook(&[], &path).unwrap();
        assert!(path.exists());
        assert_eq!(path.parent(), Some(dir.path()));
    }

    #[test]
    fn workbook_is_written() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(export_file_name(ReportPeriod::Daily, "d", "s"));
        let records = to_export_rows(&[ReportRow::empty(stamp())], ReportPeriod::Daily);

        write_workbook(&records, &path).unwrap();

        let bytes = std::fs::read(&path).unwrap();
        assert!(bytes.starts_with(b"PK"), "xlsx files are zip archives");
    }

    #[test]
    fn unwritable_path_is_an_export_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("missing").join("out.xlsx");
        let err = write_workbook(&[], &path).unwrap_err();
        assert!(matches!(err, CoreError::Export { .. }));
    }
}
