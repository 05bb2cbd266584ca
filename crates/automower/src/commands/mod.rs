//! Command dispatch: bridges CLI args -> core operations -> output formatting.

pub mod config_cmd;
pub mod mowers;
pub mod watch;

use automower_core::{Hub, HubConfig};

use crate::cli::{Command, GlobalOpts};
use crate::error::CliError;

/// Dispatch an account-bound command to the appropriate handler.
pub async fn dispatch(
    cmd: Command,
    hub: &mut Hub,
    config: &HubConfig,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    match cmd {
        Command::List => mowers::list(hub, global),
        Command::Status { mower } => mowers::status(hub, mower.as_deref(), global).await,
        Command::Start(arg) => mowers::control(hub, &arg.mower, mowers::Action::Start, global).await,
        Command::Stop(arg) => mowers::control(hub, &arg.mower, mowers::Action::Stop, global).await,
        Command::Park(arg) => mowers::control(hub, &arg.mower, mowers::Action::Park, global).await,
        Command::Toggle(arg) => {
            mowers::control(hub, &arg.mower, mowers::Action::Toggle, global).await
        }
        Command::Watch(args) => watch::handle(hub, config, args, global).await,
        // Config and Completions are handled before dispatch
        Command::Config(_) | Command::Completions(_) => unreachable!(),
    }
}
