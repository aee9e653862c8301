//! `favorites`: add, remove and list favorite cities.

use std::sync::Arc;

use smartcity_core::{
    AddFavorite, City, CityRepository, DefaultRepository, FavoriteStore, RemoveFavorite,
};

use crate::cli::{FavoritesArgs, FavoritesCommand, GlobalOpts};
use crate::error::CliError;
use crate::output;

use super::list::{CityRow, plain_line};
use super::util;

pub async fn handle(
    repo: &Arc<DefaultRepository>,
    args: FavoritesArgs,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    match args.command {
        FavoritesCommand::Add { id } => {
            AddFavorite::new(Arc::clone(repo)).execute(id).await?;
            output::note(global, &format!("City {id} added to favorites"));
            Ok(())
        }

        FavoritesCommand::Remove { id } => {
            RemoveFavorite::new(Arc::clone(repo)).execute(id).await?;
            output::note(global, &format!("City {id} removed from favorites"));
            Ok(())
        }

        FavoritesCommand::List => {
            let ids = repo.favorites().get().await?;
            if ids.is_empty() {
                output::note(global, "No favorite cities yet");
                return Ok(());
            }

            util::prime(repo, global).await?;
            let mut cities: Vec<City> = Vec::with_capacity(ids.len());
            for id in &ids {
                match repo.find_by_id(*id).await? {
                    Some(city) => cities.push(city),
                    None => tracing::warn!(id, "favorite id not present in the dataset"),
                }
            }
            cities.sort_by_cached_key(City::sort_key);

            let color = output::should_color(&global.color);
            let out = output::render_list(
                &global.output,
                &cities,
                |c| CityRow::new(c, color),
                plain_line,
            );
            output::print_output(&out, global.quiet);
            Ok(())
        }
    }
}
