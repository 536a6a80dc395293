//! `noxsync config`: inspect configuration without touching either system.

use crate::cli::{ConfigArgs, ConfigCommand, GlobalOpts};
use crate::error::CliError;
use crate::output;

pub fn handle(args: &ConfigArgs, global: &GlobalOpts) -> Result<(), CliError> {
    match args.command {
        ConfigCommand::Path => {
            let path = global
                .config
                .clone()
                .unwrap_or_else(noxsync_config::config_path);
            output::print_output(&path.display().to_string(), global.quiet);
            Ok(())
        }
        ConfigCommand::Show => {
            let config = noxsync_config::load_config(global.config.as_deref())?.redacted();
            let out = output::render_single(&global.output, &config, |c| Ok(c.to_toml()?))?;
            output::print_output(&out, global.quiet);
            Ok(())
        }
    }
}
