//! Command dispatch: bridges CLI args -> use cases -> output formatting.

pub mod clear;
pub mod config_cmd;
pub mod favorites;
pub mod fetch;
pub mod list;
pub mod map;
pub mod search;
pub mod show;
pub mod util;

use std::sync::Arc;

use smartcity_core::{CoreConfig, DefaultRepository};

use crate::cli::{Command, GlobalOpts};
use crate::error::CliError;

/// Dispatch a repository-bound command to the appropriate handler.
pub async fn dispatch(
    cmd: Command,
    repo: &Arc<DefaultRepository>,
    core_config: &CoreConfig,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    match cmd {
        Command::Fetch => fetch::handle(repo, global).await,
        Command::List(args) => list::handle(repo, args, global).await,
        Command::Search(args) => search::handle(repo, args, &core_config.search, global).await,
        Command::Show(args) => show::handle(repo, args, global).await,
        Command::Map(args) => map::handle(repo, args, global).await,
        Command::Favorites(args) => favorites::handle(repo, args, global).await,
        Command::Clear => clear::handle(repo, global).await,
        // Config and Completions are handled before dispatch
        Command::Config(_) | Command::Completions(_) => Err(CliError::Internal(
            "config and completions do not use the repository".into(),
        )),
    }
}
