//! `show`: one city by id.

use std::sync::Arc;

use smartcity_core::{City, CityError, DefaultRepository, GetCity};

use crate::cli::{GlobalOpts, ShowArgs};
use crate::error::CliError;
use crate::output;

use super::util;

fn detail(city: &City) -> String {
    format!(
        "ID:        {}\n\
         Name:      {}\n\
         Country:   {}\n\
         Latitude:  {}\n\
         Longitude: {}\n\
         Favorite:  {}",
        city.id,
        city.name,
        city.country_code,
        city.coordinate.latitude,
        city.coordinate.longitude,
        if city.is_favorite { "yes" } else { "no" },
    )
}

pub async fn handle(
    repo: &Arc<DefaultRepository>,
    args: ShowArgs,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    if args.fetch {
        util::prime(repo, global).await?;
    }

    let city = GetCity::new(Arc::clone(repo))
        .execute(args.id)
        .await
        .map_err(|e| match e {
            CityError::CityNotFound => CliError::CityNotFound { id: args.id },
            other => CliError::from(other),
        })?;

    let out = output::render_single(&global.output, &city, detail, super::list::plain_line);
    output::print_output(&out, global.quiet);
    Ok(())
}
