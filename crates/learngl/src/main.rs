mod cli;
mod config;
mod paths;
mod run;
mod settings;

use anyhow::Result;
use cli::{Command, ConfigAction, RunArgs};
use config::FileConfig;
use paths::AppPaths;
use settings::ConfigLocation;

fn main() -> Result<()> {
    let cli = cli::parse();
    run::initialise_tracing();

    match cli.command {
        Some(Command::Config(config_cmd)) => handle_config_command(config_cmd.action, &cli.run),
        None => run::run(cli.run),
    }
}

fn handle_config_command(action: ConfigAction, args: &RunArgs) -> Result<()> {
    let paths = AppPaths::discover()?;

    match action {
        ConfigAction::Show => {
            let resolved = settings::load(args, &paths)?;
            print!("{}", FileConfig::from_renderer(&resolved).to_toml_string()?);
        }
        ConfigAction::Where => {
            let location = ConfigLocation::select(args, &paths);
            let status = if location.path.is_file() {
                "present"
            } else {
                "missing"
            };
            println!("{} ({status})", location.path.display());
        }
    }
    Ok(())
}
