//! Config subcommand handlers.

use smartcity_config::{Config, save_config_to};

use crate::cli::{ConfigArgs, ConfigCommand, GlobalOpts, OutputFormat};
use crate::config;
use crate::error::CliError;
use crate::output;

use super::util;

pub fn handle(args: ConfigArgs, global: &GlobalOpts) -> Result<(), CliError> {
    match args.command {
        ConfigCommand::Init => {
            let path = config::config_path(global);
            if path.exists()
                && !util::confirm(
                    &format!("Overwrite existing config at {}?", path.display()),
                    global.yes,
                    "config init",
                )?
            {
                return Ok(());
            }
            save_config_to(&Config::default(), &path)?;
            output::note(global, &format!("Config written to {}", path.display()));
            Ok(())
        }

        ConfigCommand::Show => {
            let cfg = config::load(global)?;
            let out = match global.output {
                // TOML is the natural table-mode rendering of a config file.
                OutputFormat::Table | OutputFormat::Plain => {
                    toml::to_string_pretty(&cfg).map_err(smartcity_config::ConfigError::from)?
                }
                _ => output::render_single(&global.output, &cfg, |_| String::new(), |_| String::new()),
            };
            output::print_output(out.trim_end(), global.quiet);
            Ok(())
        }

        ConfigCommand::Path => {
            println!("{}", config::config_path(global).display());
            Ok(())
        }
    }
}
