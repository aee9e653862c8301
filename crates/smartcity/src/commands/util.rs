//! Shared helpers for command handlers.

use std::io::IsTerminal;

use smartcity_core::{CityRepository, DefaultRepository};

use crate::cli::GlobalOpts;
use crate::error::CliError;
use crate::output;

/// Make sure the process-local cache holds the city list.
///
/// Talks to the repository directly so connection and timeout failures
/// keep their detail for the exit code.
pub async fn prime(repo: &DefaultRepository, global: &GlobalOpts) -> Result<bool, CliError> {
    let spinner = output::spinner(global, "Fetching city list...");
    let result = repo.fetch_city_list().await;
    spinner.finish_and_clear();
    Ok(result?)
}

/// Prompt for confirmation, auto-approving if `--yes` was passed.
pub fn confirm(message: &str, yes_flag: bool, action: &str) -> Result<bool, CliError> {
    if yes_flag {
        return Ok(true);
    }
    if !std::io::stdin().is_terminal() {
        return Err(CliError::NonInteractiveRequiresYes {
            action: action.into(),
        });
    }
    let confirmed = dialoguer::Confirm::new()
        .with_prompt(message)
        .default(false)
        .interact()
        .map_err(|e| CliError::Io(std::io::Error::other(e)))?;
    Ok(confirmed)
}

/// First `limit` items, or all of them when `limit` is zero.
pub fn take_limit<T>(mut items: Vec<T>, limit: usize) -> Vec<T> {
    if limit > 0 {
        items.truncate(limit);
    }
    items
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn zero_limit_keeps_everything() {
        assert_eq!(take_limit(vec![1, 2, 3], 0), vec![1, 2, 3]);
        assert_eq!(take_limit(vec![1, 2, 3], 2), vec![1, 2]);
        assert_eq!(take_limit(vec![1], 5), vec![1]);
    }
}
