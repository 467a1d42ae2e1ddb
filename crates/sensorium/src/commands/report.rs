//! Report table and spreadsheet export.

use tabled::builder::Builder;
use tabled::settings::Style;

use sensorium_core::{
    Dashboard, EXPORT_COLUMNS, ExportRecord, ReportRow, export_file_name, to_export_rows,
    write_workbook,
};

use crate::cli::{ExportArgs, GlobalOpts, OutputFormat, ReportArgs};
use crate::error::CliError;
use crate::output;

fn render_records(records: &[ExportRecord]) -> String {
    let mut builder = Builder::default();
    builder.push_record(EXPORT_COLUMNS);
    for record in records {
        builder.push_record(record.values().cloned());
    }
    builder.build().with(Style::rounded()).to_string()
}

fn render_report(rows: &[ReportRow], args: &ReportArgs, format: &OutputFormat) -> String {
    let records = to_export_rows(rows, args.period);
    match format {
        OutputFormat::Table if records.is_empty() => format!(
            "No {} rows for sensor {} on device {}.",
            args.period.code(),
            args.sensor,
            args.device
        ),
        OutputFormat::Table => render_records(&records),
        OutputFormat::Plain => records
            .iter()
            .map(|r| r.values().cloned().collect::<Vec<_>>().join("\t"))
            .collect::<Vec<_>>()
            .join("\n"),
        other => output::render_single(other, rows, |_| String::new(), |_| String::new()),
    }
}

// ── Handlers ────────────────────────────────────────────────────────

pub async fn handle(
    dashboard: &Dashboard,
    args: ReportArgs,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    let rows = dashboard
        .report(&args.device, &args.sensor, args.period)
        .await?;
    output::print_output(&render_report(&rows, &args, &global.output), global.quiet);
    Ok(())
}

/// Fetch the report and write it as `Report_{Period}_{device}_{sensor}.xlsx`.
/// An empty report is refused rather than written as a header-only sheet.
pub async fn export(
    dashboard: &Dashboard,
    args: ExportArgs,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    let ReportArgs {
        device,
        sensor,
        period,
    } = args.report;

    let rows = dashboard.report(&device, &sensor, period).await?;
    if rows.is_empty() {
        return Err(CliError::EmptyReport {
            device,
            sensor,
            period: period.code().into(),
        });
    }

    let path = args.out_dir.join(export_file_name(period, &device, &sensor));
    let records = to_export_rows(&rows, period);
    write_workbook(&records, &path)?;

    output::print_output(&path.display().to_string(), global.quiet);
    Ok(())
}

#[cfg(test)]
mod tests {
    use sensorium_core::{PeriodStamp, ReportPeriod};

    use super::*;

    fn args(period: ReportPeriod) -> ReportArgs {
        ReportArgs {
            device: "D1".into(),
            sensor: "S1".into(),
            period,
        }
    }

    fn row() -> ReportRow {
        ReportRow {
            min_temp: Some(10.125),
            ..ReportRow::empty(PeriodStamp::parse("2024-03-04"))
        }
    }

    #[test]
    fn table_uses_export_columns() {
        let text = render_report(&[row()], &args(ReportPeriod::Weekly), &OutputFormat::Table);
        assert!(text.contains("Avg Dew Point"));
        assert!(text.contains("3/4/2024"));
        assert!(text.contains("10.13"));
    }

    #[test]
    fn plain_is_tab_separated() {
        let text = render_report(&[row()], &args(ReportPeriod::Monthly), &OutputFormat::Plain);
        assert_eq!(text, "3/4/2024\t10.13\t-\t-\t-\t-\t-");
    }

    #[test]
    fn empty_table_says_so() {
        let text = render_report(&[], &args(ReportPeriod::Daily), &OutputFormat::Table);
        assert_eq!(text, "No daily rows for sensor S1 on device D1.");
    }
}
