//! `map`: resolve a city into the pin the map view would place.

use std::sync::Arc;

use smartcity_core::presentation::{MapPin, MapsViewModel};
use smartcity_core::{CityError, CityId, DefaultRepository};

use crate::cli::{GlobalOpts, MapArgs};
use crate::error::CliError;
use crate::output;

use super::util;

fn detail(pin: &MapPin) -> String {
    format!(
        "{}{}\n  lat {:.6}  lon {:.6}",
        pin.label,
        if pin.is_favorite { "  ★" } else { "" },
        pin.latitude,
        pin.longitude,
    )
}

/// The map view only keeps the error's kind name; turn it back into a
/// CLI error.
fn error_from_name(name: &str, id: CityId) -> CliError {
    let kinds = [
        CityError::Unknown,
        CityError::NotFound,
        CityError::CityNotFound,
        CityError::ConnectionError,
    ];
    match kinds.into_iter().find(|k| k.name() == name) {
        Some(CityError::CityNotFound) => CliError::CityNotFound { id },
        Some(kind) => CliError::from(kind),
        None => CliError::Internal(format!("map view failed: {name}")),
    }
}

pub async fn handle(
    repo: &Arc<DefaultRepository>,
    args: MapArgs,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    util::prime(repo, global).await?;

    let view = MapsViewModel::new(Arc::clone(repo));
    view.on_load_city(args.id)
        .await
        .map_err(|e| CliError::Internal(format!("map task failed: {e}")))?;

    let state = view.state();
    let Some(pin) = state.ui_object else {
        let name = state.error.map(|e| e.message).unwrap_or_default();
        return Err(error_from_name(&name, args.id));
    };
    view.on_map_loaded();

    let out = output::render_single(&global.output, &pin, detail, |p| {
        format!("{},{}", p.latitude, p.longitude)
    });
    output::print_output(&out, global.quiet);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::exit_code;

    #[test]
    fn error_names_map_back_to_exit_codes() {
        assert_eq!(error_from_name("CityNotFound", 5).exit_code(), exit_code::NOT_FOUND);
        assert_eq!(error_from_name("ConnectionError", 5).exit_code(), exit_code::CONNECTION);
        assert_eq!(error_from_name("???", 5).exit_code(), exit_code::GENERAL);
    }
}
