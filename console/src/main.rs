//! Deployment Console - Entry Point
//!
//! Lists the versions of a deployment cell and deploys, undeploys, balances,
//! removes, copies or moves deployments through the deployments API.

use std::collections::HashMap;
use std::env;
use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::{anyhow, bail, Context};
use deploy_console::app::options::AppOptions;
use deploy_console::app::run::{run, Command};
use deploy_console::cell::id::CellId;
use deploy_console::logs::{init_logging, LogOptions};
use deploy_console::storage::settings::Settings;
use deploy_console::ui::drag_drop::DropMode;
use deploy_console::utils::build_info;

use tracing::{debug, error};

const USAGE: &str = "usage: deploy-console [--config=<path>] <command>
commands:
  --versions=<cell>
  --deploy=<cell> --version=<name>
  --undeploy=<cell> | --balance=<cell> | --unbalance=<cell> | --remove=<cell>
  --copy=<cell> --to=<cell>
  --move=<cell> --to=<cell>
  --version";

#[tokio::main]
async fn main() -> ExitCode {
    // Parse command line arguments
    let mut cli_args: HashMap<String, String> = HashMap::new();
    for arg in env::args().skip(1) {
        if let Some((key, value)) = arg.split_once('=') {
            cli_args.insert(key.trim_start_matches('-').to_string(), value.to_string());
        } else if arg.starts_with("--") {
            cli_args.insert(arg.trim_start_matches('-').to_string(), "true".to_string());
        }
    }

    // Print build info and exit
    if cli_args.get("version").map(String::as_str) == Some("true") && !cli_args.contains_key("deploy") {
        match serde_json::to_string_pretty(&build_info()) {
            Ok(info) => println!("{}", info),
            Err(e) => eprintln!("{}", e),
        }
        return ExitCode::SUCCESS;
    }

    let settings = match Settings::load(cli_args.get("config").map(PathBuf::from).as_deref()).await {
        Ok(settings) => settings,
        Err(e) => {
            eprintln!("Unable to read settings: {}", e);
            return ExitCode::FAILURE;
        }
    };

    let log_options = LogOptions {
        log_level: settings.log_level,
        json_format: settings.json_logs,
    };
    if let Err(e) = init_logging(log_options) {
        eprintln!("Failed to initialize logging: {e}");
    }

    let command = match parse_command(&cli_args) {
        Ok(command) => command,
        Err(e) => {
            eprintln!("{:#}\n\n{}", e, USAGE);
            return ExitCode::from(2);
        }
    };
    debug!("Running {:?}", command);

    let options = AppOptions::from(&settings);
    match run(&options, command).await {
        Ok(true) => ExitCode::SUCCESS,
        Ok(false) => ExitCode::FAILURE,
        Err(e) => {
            error!("Failed to run the console: {e}");
            ExitCode::FAILURE
        }
    }
}

fn parse_command(args: &HashMap<String, String>) -> anyhow::Result<Command> {
    let cell = |key: &str| -> anyhow::Result<CellId> {
        let value = args.get(key).ok_or_else(|| anyhow!("missing --{}", key))?;
        value
            .parse()
            .with_context(|| format!("--{} is not a cell id", key))
    };

    let commands = ["versions", "deploy", "undeploy", "balance", "unbalance", "remove", "copy", "move"];
    let given: Vec<&str> = commands
        .into_iter()
        .filter(|name| args.contains_key(*name))
        .collect();

    let command = match given.as_slice() {
        ["versions"] => Command::Versions(cell("versions")?),
        ["deploy"] => Command::Deploy {
            cell: cell("deploy")?,
            version: args
                .get("version")
                .filter(|version| version.as_str() != "true")
                .cloned()
                .ok_or_else(|| anyhow!("missing --version=<name>"))?,
        },
        ["undeploy"] => Command::Undeploy(cell("undeploy")?),
        ["balance"] => Command::Balance(cell("balance")?),
        ["unbalance"] => Command::Unbalance(cell("unbalance")?),
        ["remove"] => Command::Remove(cell("remove")?),
        ["copy"] => Command::Transfer {
            from: cell("copy")?,
            to: cell("to")?,
            mode: DropMode::Copy,
        },
        ["move"] => Command::Transfer {
            from: cell("move")?,
            to: cell("to")?,
            mode: DropMode::Move,
        },
        [] => bail!("no command given"),
        _ => bail!("only one command at a time: {}", given.join(", ")),
    };
    Ok(command)
}
