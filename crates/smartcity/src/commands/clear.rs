//! `clear`: drop local data.

use std::sync::Arc;

use smartcity_core::{ClearLocalData, ClearPolicy, DefaultRepository};

use crate::cli::GlobalOpts;
use crate::error::CliError;
use crate::output;

use super::util;

pub async fn handle(repo: &Arc<DefaultRepository>, global: &GlobalOpts) -> Result<(), CliError> {
    let policy = repo.options().clear_policy;
    let prompt = match policy {
        ClearPolicy::CitiesAndFavorites => "Clear cached cities and all favorites?",
        ClearPolicy::CitiesOnly => "Clear cached cities? Favorites are kept.",
    };
    if !util::confirm(prompt, global.yes, "clear")? {
        return Ok(());
    }

    ClearLocalData::new(Arc::clone(repo)).execute().await?;
    output::note(global, &format!("Local data cleared ({policy})"));
    Ok(())
}
