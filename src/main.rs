mod cli;

use playout::{config, identity::PlayerIdentity, server, store::PlayerRepository};
use playout_db::pool::init_pool;

use anyhow::{Context, Result};
use clap::Parser;
use cli::{Cli, Commands};
use std::path::Path;

fn open_context(config: config::Config) -> Result<server::AppContext> {
    let db_path = config.database.path.to_string_lossy().to_string();
    tracing::info!("Opening database at {}", db_path);
    let db_pool = init_pool(&db_path).with_context(|| format!("Failed to open database {}", db_path))?;

    server::AppContext::from_config(config, db_pool)
}

async fn start_server(host: String, port: u16, config_path: Option<&Path>) -> Result<()> {
    let mut config = config::load_config_or_default(config_path)?;

    // Override host/port from CLI
    config.server.host = host;
    config.server.port = port;

    tracing::info!("Starting playout index server");
    tracing::info!(
        "Server will listen on {}:{}",
        config.server.host,
        config.server.port
    );
    tracing::info!("Publishing indexes to {:?}", config.index.index_dir);

    let ctx = open_context(config)?;
    server::start_server(ctx).await
}

async fn compile_player(uuid: &str, config_path: Option<&Path>) -> Result<()> {
    let config = config::load_config_or_default(config_path)?;
    let ctx = open_context(config)?;

    let player = ctx
        .players
        .find_by_uuid(uuid)
        .await?
        .with_context(|| format!("Unknown player: {}", uuid))?;

    if !player.playlist_id.is_assigned() {
        anyhow::bail!("Player {} has no playlist assigned", uuid);
    }

    let path = ctx.compiler.compile(&player).await?;
    println!("{}", path.display());
    Ok(())
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Respect RUST_LOG env var if set, otherwise use defaults based on verbose flag
    let env_filter = std::env::var("RUST_LOG").unwrap_or_else(|_| {
        if cli.verbose {
            "playout=trace,playout_smil=trace,playout_db=debug,playout_common=debug,tower_http=debug".to_string()
        } else {
            "playout=debug,playout_smil=debug,playout_db=info,tower_http=info".to_string()
        }
    });

    tracing_subscriber::fmt()
        .with_env_filter(&env_filter)
        .init();

    match cli.command {
        Commands::Start { host, port } => {
            let rt = tokio::runtime::Runtime::new()?;
            rt.block_on(start_server(host, port, cli.config.as_deref()))
        }
        Commands::Compile { uuid } => {
            let rt = tokio::runtime::Runtime::new()?;
            rt.block_on(compile_player(&uuid, cli.config.as_deref()))
        }
        Commands::Identify { user_agent, json } => identify(&user_agent, json),
        Commands::Validate {
            config: config_path,
        } => {
            let path = config_path.or(cli.config);
            validate_config(path.as_deref())
        }
        Commands::Version => {
            println!("playout {}", env!("CARGO_PKG_VERSION"));
            Ok(())
        }
    }
}

fn identify(user_agent: &str, json: bool) -> Result<()> {
    let identity = PlayerIdentity::from_user_agent(user_agent);

    if json {
        println!("{}", serde_json::to_string_pretty(&identity)?);
        return Ok(());
    }

    if !identity.is_known() {
        println!("Unrecognized player (model token: {:?})", identity.model_token);
        return Ok(());
    }

    println!("UUID: {}", identity.uuid);
    println!("Name: {}", identity.name);
    println!("Platform: {}", identity.platform);
    println!("Firmware: {}", identity.firmware);
    println!("Model: {} ({})", identity.model, identity.model_token);
    println!(
        "Template: {}",
        playout_smil::select_template(identity.model, &identity.firmware)
    );

    Ok(())
}

fn validate_config(path: Option<&Path>) -> Result<()> {
    match path {
        Some(p) => {
            println!("Validating config: {:?}", p);
            let config = config::load_config(p)?;
            println!("✓ Configuration is valid");
            println!("  Server: {}:{}", config.server.host, config.server.port);
            println!("  Index directory: {:?}", config.index.index_dir);
            println!("  Fixtures directory: {:?}", config.index.fixtures_dir);
            if let Some(ref dir) = config.index.templates_dir {
                println!("  Template overrides: {:?}", dir);
            }
            println!("  Public URL: {}", config.index.public_url);
            println!("  Report server: {}", config.reports.server_url);
            println!("  Database: {:?}", config.database.path);
            println!(
                "  Content limits: depth {}, expansions {}",
                config.content.max_depth, config.content.max_expansions
            );
        }
        None => {
            println!("No config file specified, using defaults");
            let config = config::Config::default();
            println!("Default config:");
            println!("  Server: {}:{}", config.server.host, config.server.port);
            println!("  Index directory: {:?}", config.index.index_dir);
        }
    }

    Ok(())
}
