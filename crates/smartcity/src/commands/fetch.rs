//! `fetch`: download the dataset and summarize it.

use chrono::SecondsFormat;
use serde::Serialize;
use smartcity_core::DefaultRepository;

use crate::cli::GlobalOpts;
use crate::error::CliError;
use crate::output;

use super::util;

#[derive(Serialize)]
struct FetchSummary {
    cities: usize,
    fetched_at: Option<String>,
}

pub async fn handle(repo: &DefaultRepository, global: &GlobalOpts) -> Result<(), CliError> {
    let non_empty = util::prime(repo, global).await?;
    if !non_empty {
        output::note(global, "The city dataset is empty.");
    }

    let summary = FetchSummary {
        cities: repo.local().get().map_or(0, |cities| cities.len()),
        fetched_at: repo
            .local()
            .last_refresh()
            .map(|at| at.to_rfc3339_opts(SecondsFormat::Secs, true)),
    };

    let out = output::render_single(
        &global.output,
        &summary,
        |s| {
            format!(
                "Fetched {} cities at {}",
                s.cities,
                s.fetched_at.as_deref().unwrap_or("-")
            )
        },
        |s| s.cities.to_string(),
    );
    output::print_output(&out, global.quiet);
    Ok(())
}
