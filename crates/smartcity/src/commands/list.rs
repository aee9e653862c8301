//! `list`: watch the city list through one cached and one refreshed
//! snapshot.

use std::sync::Arc;

use futures_util::StreamExt;
use tabled::Tabled;

use smartcity_core::{City, DefaultRepository, WatchCityList};

use crate::cli::{GlobalOpts, ListArgs};
use crate::error::CliError;
use crate::output;

use super::util;

// ── Table row ───────────────────────────────────────────────────────

#[derive(Tabled)]
pub(super) struct CityRow {
    #[tabled(rename = "ID")]
    id: i64,
    #[tabled(rename = "Name")]
    name: String,
    #[tabled(rename = "Country")]
    country: String,
    #[tabled(rename = "Lat")]
    latitude: String,
    #[tabled(rename = "Lon")]
    longitude: String,
    #[tabled(rename = "Fav")]
    favorite: String,
}

impl CityRow {
    pub(super) fn new(city: &City, color: bool) -> Self {
        Self {
            id: city.id,
            name: city.name.clone(),
            country: city.country_code.clone(),
            latitude: format!("{:.4}", city.coordinate.latitude),
            longitude: format!("{:.4}", city.coordinate.longitude),
            favorite: output::favorite_mark(city.is_favorite, color),
        }
    }
}

pub(super) fn plain_line(city: &City) -> String {
    format!("{}\t{}, {}", city.id, city.name, city.country_code)
}

// ── Handler ─────────────────────────────────────────────────────────

pub async fn handle(
    repo: &Arc<DefaultRepository>,
    args: ListArgs,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    let watch = WatchCityList::new(Arc::clone(repo));
    let color = output::should_color(&global.color);

    let spinner = output::spinner(global, "Refreshing city list...");
    let mut snapshots = std::pin::pin!(watch.execute());
    let mut latest: Option<Vec<City>> = None;
    let mut index = 0;
    while let Some(snapshot) = snapshots.next().await {
        let cities = snapshot.inspect_err(|_| spinner.finish_and_clear())?;
        let label = if index == 0 { "cached" } else { "refreshed" };
        spinner.suspend(|| output::note(global, &format!("{label} snapshot: {} cities", cities.len())));
        latest = Some(cities);
        index += 1;
    }
    spinner.finish_and_clear();

    let cities = util::take_limit(latest.unwrap_or_default(), args.limit);
    let out = output::render_list(
        &global.output,
        &cities,
        |c| CityRow::new(c, color),
        plain_line,
    );
    output::print_output(&out, global.quiet);
    Ok(())
}
