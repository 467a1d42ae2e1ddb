//! Live readings, one card per device.

use serde::Serialize;
use tabled::Tabled;
use tracing::debug;

use sensorium_core::{
    Dashboard, DeviceGroup, DisplayField, LiveSnapshot, PollStatus, SensorCategory,
    renderable_fields,
};

use crate::cli::{GlobalOpts, LiveArgs, OutputFormat};
use crate::config::describe_interval;
use crate::error::CliError;
use crate::output;

// ── Card model ──────────────────────────────────────────────────────

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct DeviceCard<'a> {
    device: &'a sensorium_core::Device,
    sensors: Vec<SensorCard>,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct SensorCard {
    sensor_id: String,
    label: String,
    fields: Vec<DisplayField>,
}

fn cards(groups: &[DeviceGroup], category: SensorCategory) -> Vec<DeviceCard<'_>> {
    groups
        .iter()
        .map(|group| DeviceCard {
            device: &group.device,
            sensors: group
                .readings
                .iter()
                .map(|r| SensorCard {
                    sensor_id: r.sensor_id.clone(),
                    label: r.display_label(),
                    fields: renderable_fields(r, category),
                })
                .collect(),
        })
        .collect()
}

// ── Table rendering ─────────────────────────────────────────────────

#[derive(Tabled)]
struct FieldRow {
    #[tabled(rename = "Sensor")]
    sensor: String,
    #[tabled(rename = "Field")]
    field: String,
    #[tabled(rename = "Value")]
    value: String,
    #[tabled(rename = "High")]
    high: String,
    #[tabled(rename = "Low")]
    low: String,
}

fn field_rows(card: &DeviceCard<'_>, color: bool) -> Vec<FieldRow> {
    let mut rows = Vec::new();
    for sensor in &card.sensors {
        if sensor.fields.is_empty() {
            rows.push(FieldRow {
                sensor: sensor.label.clone(),
                field: "-".into(),
                value: output::muted("no data", color),
                high: String::new(),
                low: String::new(),
            });
            continue;
        }
        for (i, field) in sensor.fields.iter().enumerate() {
            let (high, low) = field.range_with_unit().unwrap_or_default();
            let value = match field.indicator {
                Some(on) => output::indicator(&field.value, on, color),
                None => field.value_with_unit(),
            };
            rows.push(FieldRow {
                sensor: if i == 0 { sensor.label.clone() } else { String::new() },
                field: field.kind.label().into(),
                value,
                high,
                low,
            });
        }
    }
    rows
}

fn render_cards(cards: &[DeviceCard<'_>], color: bool) -> String {
    if cards.is_empty() {
        return output::muted("No live readings.", color);
    }
    let mut blocks = Vec::with_capacity(cards.len());
    for card in cards {
        let mut block = vec![output::heading(&card.device.display_name(), color)];
        for (label, value) in card.device.info_lines() {
            block.push(format!("  {label}: {value}"));
        }
        block.push(output::render_table(&field_rows(card, color)));
        blocks.push(block.join("\n"));
    }
    blocks.join("\n\n")
}

fn render_snapshot(snapshot: &LiveSnapshot, global: &GlobalOpts) -> String {
    let cards = cards(&snapshot.groups, snapshot.category);
    let color = output::should_color(&global.color);
    match global.output {
        OutputFormat::Table => render_cards(&cards, color),
        OutputFormat::Plain => snapshot
            .groups
            .iter()
            .flat_map(|g| g.readings.iter().map(|r| format!("{}\t{}", g.device.id, r.sensor_id)))
            .collect::<Vec<_>>()
            .join("\n"),
        _ => output::render_single(&global.output, cards.as_slice(), |_| String::new(), |_| String::new()),
    }
}

fn status_line(snapshot: &LiveSnapshot, global: &GlobalOpts, dashboard: &Dashboard) -> String {
    let line = format!(
        "{} · {} devices · {} sensors · updated {} · {}",
        snapshot.category,
        snapshot.groups.len(),
        snapshot.reading_count(),
        snapshot.updated_at.format("%H:%M:%S"),
        describe_interval(dashboard.config().poll_interval),
    );
    output::muted(&line, output::should_color(&global.color))
}

// ── Handler ─────────────────────────────────────────────────────────

pub async fn handle(
    dashboard: &Dashboard,
    args: LiveArgs,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    if !args.watch {
        let snapshot = dashboard.live(args.category).await?;
        output::print_output(&render_snapshot(&snapshot, global), global.quiet);
        return Ok(());
    }
    watch(dashboard, args.category, global).await
}

/// Print every committed snapshot until Ctrl-C.
async fn watch(
    dashboard: &Dashboard,
    category: SensorCategory,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    let poller = dashboard.poll_live(category);
    let mut rx = poller.subscribe();
    let mut printed: Option<u64> = None;

    loop {
        tokio::select! {
            biased;
            _ = tokio::signal::ctrl_c() => {
                debug!("interrupted, stopping live watch");
                break;
            }
            changed = rx.changed() => {
                if changed.is_err() {
                    break;
                }
                let state = rx.borrow_and_update().clone();
                match (&state.status, &state.snapshot) {
                    (PollStatus::Stale { error }, _) => {
                        eprintln!("warning: live update failed, showing last good data ({error})");
                    }
                    (PollStatus::Live, Some(snapshot)) if printed != Some(snapshot.generation) => {
                        printed = Some(snapshot.generation);
                        if matches!(global.output, OutputFormat::Table) && !global.quiet {
                            println!("{}", status_line(snapshot, global, dashboard));
                        }
                        output::print_output(&render_snapshot(snapshot, global), global.quiet);
                    }
                    _ => {}
                }
            }
        }
    }

    poller.stop();
    Ok(())
}
