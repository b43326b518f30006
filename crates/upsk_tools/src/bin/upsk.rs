#![forbid(unsafe_code)]

use std::io::{self, IsTerminal, Read};

use clap::Parser;
use tracing_subscriber::EnvFilter;
use upsk_contracts::resources::LOGIN_DENIED_MESSAGE;
use upsk_engines::{GeminiProvider, TextGenerationGateway};
use upsk_os::config::PortalConfig;
use upsk_os::Portal;
use upsk_storage::FileKeyValue;
use upsk_tools::portal_cli::{execute_portal_command, Cli, PortalCommand};

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(io::stderr)
        .init();

    if let Err(err) = run() {
        eprintln!("{err}");
        std::process::exit(2);
    }
}

fn run() -> Result<(), String> {
    let cli = Cli::parse();
    let config = PortalConfig::from_env();

    let port = match cli.storage {
        Some(path) => FileKeyValue::for_path(path),
        None => FileKeyValue::default_local(),
    };
    let model = config.generation.model.clone();
    let gateway = TextGenerationGateway::new(GeminiProvider::new(config.generation), model);
    let mut portal = Portal::start(port, config.admin_gate, gateway);

    if matches!(cli.command, PortalCommand::Admin(_)) {
        let password = read_admin_password()?;
        if !portal.login(&password) {
            return Err(LOGIN_DENIED_MESSAGE.to_string());
        }
    }

    let output = execute_portal_command(&mut portal, cli.command)?;
    if !output.is_empty() {
        println!("{output}");
    }
    Ok(())
}

fn read_admin_password() -> Result<String, String> {
    if io::stdin().is_terminal() {
        rpassword::prompt_password("Kata laluan admin:").map_err(|e| e.to_string())
    } else {
        let mut input = String::new();
        io::stdin()
            .read_to_string(&mut input)
            .map_err(|e| e.to_string())?;
        Ok(input.trim_end_matches(['\r', '\n']).to_string())
    }
}
