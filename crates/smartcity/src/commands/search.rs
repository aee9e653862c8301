//! `search`: case-insensitive name search over the fetched list.

use std::sync::Arc;

use futures_util::StreamExt;
use tabled::Tabled;

use smartcity_core::presentation::{SearchMapper, SearchResult};
use smartcity_core::{DefaultRepository, SearchCity, SearchOptions};

use crate::cli::{GlobalOpts, SearchArgs};
use crate::error::CliError;
use crate::output;

use super::util;

// ── Table row ───────────────────────────────────────────────────────

#[derive(Tabled)]
struct ResultRow {
    #[tabled(rename = "ID")]
    id: i64,
    #[tabled(rename = "City")]
    full_name: String,
    #[tabled(rename = "Lat")]
    latitude: String,
    #[tabled(rename = "Lon")]
    longitude: String,
    #[tabled(rename = "Fav")]
    favorite: String,
}

impl ResultRow {
    fn new(result: &SearchResult, color: bool) -> Self {
        Self {
            id: result.id,
            full_name: result.full_name.clone(),
            latitude: format!("{:.4}", result.latitude),
            longitude: format!("{:.4}", result.longitude),
            favorite: output::favorite_mark(result.is_favorite, color),
        }
    }
}

// ── Handler ─────────────────────────────────────────────────────────

pub async fn handle(
    repo: &Arc<DefaultRepository>,
    args: SearchArgs,
    options: &SearchOptions,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    let mut results = if options.is_searchable(&args.query) {
        run_search(repo, &args.query, global).await?
    } else {
        output::note(
            global,
            &format!(
                "queries need more than {} characters, nothing searched",
                options.min_query_len
            ),
        );
        Vec::new()
    };

    if args.favorites {
        results.retain(|r| r.is_favorite);
    }
    let total = results.len();
    let results = util::take_limit(results, args.limit);
    if results.len() < total {
        output::note(global, &format!("showing {} of {total} matches", results.len()));
    }

    let color = output::should_color(&global.color);
    let out = output::render_list(
        &global.output,
        &results,
        |r| ResultRow::new(r, color),
        |r| format!("{}\t{}", r.id, r.full_name),
    );
    output::print_output(&out, global.quiet);
    Ok(())
}

async fn run_search(
    repo: &Arc<DefaultRepository>,
    query: &str,
    global: &GlobalOpts,
) -> Result<Vec<SearchResult>, CliError> {
    util::prime(repo, global).await?;

    let search = SearchCity::new(Arc::clone(repo));
    let mut items = std::pin::pin!(search.execute(query));
    let Some(found) = items.next().await else {
        return Err(CliError::Internal("search produced no result".into()));
    };
    Ok(SearchMapper::map_list(&found?))
}
