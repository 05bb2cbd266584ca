//! `watch`: the long-running poll loop, printing one line per position
//! update until Ctrl-C (or `--count` cycles).

use std::sync::Arc;
use std::time::Duration;

use owo_colors::OwoColorize;
use tokio_util::sync::CancellationToken;
use tracing::{info, warn};

use automower_core::{Hub, HubConfig, LocationSink, LocationUpdate, catalog, poller};

use crate::cli::{GlobalOpts, OutputFormat, WatchArgs};
use crate::error::CliError;
use crate::output;

fn update_line(update: &LocationUpdate, color: bool) -> String {
    let name = format!("{:<16}", update.host_name);
    let name = if color { name.bold().to_string() } else { name };
    format!(
        "{}  {name} {:>3}%  {:.5}, {:.5}  {}",
        chrono::Local::now().format("%Y-%m-%d %H:%M:%S"),
        update.battery,
        update.gps.0,
        update.gps.1,
        update.attributes.status.as_deref().unwrap_or(catalog::UNKNOWN_STATUS),
    )
}

fn render_update(format: OutputFormat, color: bool, update: &LocationUpdate) -> String {
    let rendered = match format {
        // One document per line keeps the stream parseable.
        OutputFormat::Json | OutputFormat::JsonCompact => output::render_single(
            OutputFormat::JsonCompact,
            update,
            |_| String::new(),
            |_| String::new(),
        ),
        OutputFormat::Yaml => {
            output::render_single(format, update, |_| String::new(), |_| String::new())
                .map(|yaml| format!("---\n{}", yaml.trim_end()))
        }
        OutputFormat::Table | OutputFormat::Plain => output::render_single(
            format,
            update,
            |u| update_line(u, color),
            |u| format!("{}\t{}\t{}\t{}", u.dev_id, u.gps.0, u.gps.1, u.battery),
        ),
    };
    rendered.unwrap_or_else(|e| {
        warn!(error = %e, "could not render location update");
        String::new()
    })
}

pub async fn handle(
    hub: &mut Hub,
    config: &HubConfig,
    args: WatchArgs,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    let period = args
        .interval
        .map_or(config.scan_interval, Duration::from_secs);
    let format = global.output;
    let color = output::should_color(global.color);
    let quiet = global.quiet;

    let sink: Arc<dyn LocationSink> = Arc::new(move |update: LocationUpdate| {
        output::print_output(&render_update(format, color, &update), quiet);
    });
    hub.registry_mut().attach_location_sink(&sink);

    let cancel = CancellationToken::new();
    let ctrl_c = cancel.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            ctrl_c.cancel();
        }
    });

    info!(
        mowers = hub.registry().len(),
        interval_secs = period.as_secs(),
        "watching"
    );

    let stop = cancel.clone();
    let mut seen = 0_u64;
    let cycles = poller::run(hub.registry_mut(), period, cancel, |report| {
        for (name, err) in &report.failed {
            eprintln!("{name}: {err}");
        }
        seen += 1;
        if args.count.is_some_and(|limit| seen >= limit) {
            stop.cancel();
        }
    })
    .await?;

    info!(cycles, "watch stopped");
    Ok(())
}

#[cfg(test)]
mod tests {
    use automower_core::TrackerAttributes;

    use super::*;

    fn update() -> LocationUpdate {
        LocationUpdate {
            dev_id: "automower_g_m_1".into(),
            host_name: "Lawnie".into(),
            battery: 80,
            gps: (57.7, 14.1),
            attributes: TrackerAttributes {
                status: Some("Cutting".into()),
                id: "automower_g_m_1".into(),
                name: "Lawnie".into(),
                icon: "mdi:robot".into(),
                vendor: "Husqvarna".into(),
                model: "Automower 430X".into(),
            },
        }
    }

    #[test]
    fn json_updates_are_single_lines() {
        let line = render_update(OutputFormat::Json, false, &update());
        assert!(!line.contains('\n'));
        assert!(line.contains(r#""dev_id":"automower_g_m_1""#));
    }

    #[test]
    fn plain_updates_are_tab_separated() {
        let line = render_update(OutputFormat::Plain, false, &update());
        assert_eq!(line, "automower_g_m_1\t57.7\t14.1\t80");
    }

    #[test]
    fn table_line_has_status() {
        let line = render_update(OutputFormat::Table, false, &update());
        assert!(line.contains("Lawnie"));
        assert!(line.ends_with("Cutting"));
    }
}
