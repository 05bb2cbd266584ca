//! Mower command handlers: list, status and the control verbs.

use serde::Serialize;
use tabled::Tabled;

use automower_core::{
    CommandOutcome, catalog, Hub, Mower, MowerIdentity, MowerState, MowerStatus, PollOutcome, RobotClient,
};

use crate::cli::GlobalOpts;
use crate::error::CliError;
use crate::output;

// ── Table rows ──────────────────────────────────────────────────────

#[derive(Tabled)]
struct MowerRow {
    #[tabled(rename = "Name")]
    name: String,
    #[tabled(rename = "Model")]
    model: String,
    #[tabled(rename = "ID")]
    id: String,
    #[tabled(rename = "Tracker ID")]
    dev_id: String,
}

impl From<&MowerIdentity> for MowerRow {
    fn from(m: &MowerIdentity) -> Self {
        Self {
            name: m.name.clone(),
            model: m.model_name().to_owned(),
            id: m.id.clone(),
            dev_id: m.dev_id(),
        }
    }
}

#[derive(Tabled)]
struct StatusRow {
    #[tabled(rename = "Name")]
    name: String,
    #[tabled(rename = "Status")]
    status: String,
    #[tabled(rename = "Battery")]
    battery: String,
    #[tabled(rename = "Mowing")]
    mowing: String,
    #[tabled(rename = "Position")]
    position: String,
    #[tabled(rename = "Error")]
    error: String,
}

fn state_status(state: &MowerState) -> Option<MowerStatus> {
    state.status_code.as_deref().map(MowerStatus::from_code)
}

fn status_text(state: &MowerState, color: bool) -> String {
    let text = state.status.as_deref().unwrap_or(catalog::UNKNOWN_STATUS);
    output::paint_status(text, state_status(state).as_ref(), color)
}

fn battery_text(state: &MowerState) -> String {
    state
        .battery_level
        .map_or_else(|| "-".into(), |b| format!("{b}%"))
}

fn position_text(state: &MowerState) -> String {
    state.position.map_or_else(
        || "-".into(),
        |p| format!("{:.5}, {:.5}", p.latitude, p.longitude),
    )
}

fn status_row(state: &MowerState, color: bool) -> StatusRow {
    StatusRow {
        name: state.name.clone(),
        status: status_text(state, color),
        battery: battery_text(state),
        mowing: if state.is_on { "yes" } else { "no" }.into(),
        position: position_text(state),
        error: state
            .attributes
            .get("lastErrorMessage")
            .map_or_else(String::new, ToString::to_string),
    }
}

fn status_detail(state: &MowerState, color: bool) -> String {
    let mut lines = vec![
        format!("Name:      {}", state.name),
        format!("ID:        {}", state.unique_id),
        format!("Model:     {}", state.model),
        format!("Status:    {}", status_text(state, color)),
        format!("Battery:   {}", battery_text(state)),
        format!("Mowing:    {}", if state.is_on { "yes" } else { "no" }),
        format!("Position:  {}", position_text(state)),
    ];
    if !state.attributes.is_empty() {
        lines.push(String::new());
        lines.extend(
            state
                .attributes
                .iter()
                .map(|(key, value)| format!("  {key}: {value}")),
        );
    }
    lines.join("\n")
}

/// Poll once, failing if nothing has ever been fetched.
async fn refresh(mower: &mut Mower<RobotClient>) -> Result<(), CliError> {
    let outcome = mower.update().await?;
    if outcome == PollOutcome::Skipped && mower.snapshot().is_none() {
        return Err(CliError::ConnectionFailed {
            reason: format!("could not fetch status for '{}'", mower.name()),
        });
    }
    Ok(())
}

// ── List ────────────────────────────────────────────────────────────

pub fn list(hub: &Hub, global: &GlobalOpts) -> Result<(), CliError> {
    let identities: Vec<MowerIdentity> = hub
        .registry()
        .iter()
        .map(|m| m.identity().clone())
        .collect();

    let out = output::render_list(
        global.output,
        &identities,
        |m| MowerRow::from(m),
        |m| m.id.clone(),
    )?;
    output::print_output(&out, global.quiet);
    Ok(())
}

// ── Status ──────────────────────────────────────────────────────────

pub async fn status(hub: &mut Hub, query: Option<&str>, global: &GlobalOpts) -> Result<(), CliError> {
    let color = output::should_color(global.color);

    if let Some(query) = query {
        let mower = hub.registry_mut().require_mut(query)?;
        refresh(mower).await?;
        let state = mower.entity_state()?;

        let out = output::render_single(
            global.output,
            &state,
            |s| status_detail(s, color),
            |s| s.status.clone().unwrap_or_default(),
        )?;
        output::print_output(&out, global.quiet);
        return Ok(());
    }

    let mut report = hub.registry_mut().poll_all().await;
    let all_failed = report.failed.len() == report.total();
    if let Some((_, err)) = report.failed.pop().filter(|_| all_failed) {
        return Err(err.into());
    }

    let states = hub
        .registry()
        .iter()
        .map(Mower::entity_state)
        .collect::<Result<Vec<_>, _>>()?;

    let out = output::render_list(
        global.output,
        &states,
        |s| status_row(s, color),
        |s| format!("{}\t{}", s.unique_id, s.status_code.as_deref().unwrap_or("-")),
    )?;
    output::print_output(&out, global.quiet);
    Ok(())
}

// ── Control ─────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    Start,
    Stop,
    Park,
    Toggle,
}

impl Action {
    fn verb(self) -> &'static str {
        match self {
            Self::Start => "start",
            Self::Stop => "stop",
            Self::Park => "park",
            Self::Toggle => "toggle",
        }
    }
}

#[derive(Serialize)]
struct ControlResult {
    mower: String,
    action: &'static str,
    sent: bool,
    status_code: Option<String>,
    status: String,
}

fn control_detail(result: &ControlResult) -> String {
    let status = &result.status;
    if result.sent {
        format!("✓ {}: {} sent, now {status}", result.mower, result.action)
    } else {
        format!("{}: nothing to do ({status})", result.mower)
    }
}

pub async fn control(
    hub: &mut Hub,
    query: &str,
    action: Action,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    let mower = hub.registry_mut().require_mut(query)?;

    // The start/stop guards need the current status.
    refresh(mower).await?;

    let outcome = match action {
        Action::Start => mower.turn_on().await?,
        Action::Stop => mower.turn_off().await?,
        Action::Park => mower.return_to_base().await?,
        Action::Toggle => mower.start_pause().await?,
    };

    let result = ControlResult {
        mower: mower.name().to_owned(),
        action: action.verb(),
        sent: outcome == CommandOutcome::Sent,
        status_code: mower.display_status().map(|s| s.code().to_owned()),
        status: mower.status_or_unknown().into_owned(),
    };

    let out = output::render_single(global.output, &result, control_detail, |r| {
        r.status_code.clone().unwrap_or_default()
    })?;
    output::print_output(&out, global.quiet);
    Ok(())
}

#[cfg(test)]
mod tests {
    use automower_core::{Attributes, Location, SupportedFeatures};

    use super::*;

    fn state() -> MowerState {
        MowerState {
            name: "Lawnie".into(),
            unique_id: "m-1".into(),
            dev_id: "automower_g_m_1".into(),
            model: "G".into(),
            icon: "mdi:robot".into(),
            status_code: Some("OK_CUTTING".into()),
            status: Some("Cutting".into()),
            battery_level: Some(80),
            is_on: true,
            position: Some(Location {
                latitude: 57.7,
                longitude: 14.1,
            }),
            supported_features: SupportedFeatures::MOWER,
            should_poll: true,
            attributes: Attributes::new(),
        }
    }

    #[test]
    fn status_row_formats_fields() {
        let row = status_row(&state(), false);
        assert_eq!(row.status, "Cutting");
        assert_eq!(row.battery, "80%");
        assert_eq!(row.mowing, "yes");
        assert_eq!(row.position, "57.70000, 14.10000");
    }

    #[test]
    fn unpolled_state_shows_placeholders() {
        let mut s = state();
        s.status = None;
        s.status_code = None;
        s.battery_level = None;
        s.position = None;
        let row = status_row(&s, false);
        assert_eq!(row.status, "Unknown");
        assert_eq!(row.battery, "-");
        assert_eq!(row.position, "-");
    }

    #[test]
    fn skipped_control_says_so() {
        let result = ControlResult {
            mower: "Lawnie".into(),
            action: "start",
            sent: false,
            status_code: Some("OK_CHARGING".into()),
            status: "Charging".into(),
        };
        assert_eq!(control_detail(&result), "Lawnie: nothing to do (Charging)");
    }
}
