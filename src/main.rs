use std::net::SocketAddr;
use std::path::PathBuf;

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};

use planboard::config::Config;
use planboard::logging;
use planboard::reports::{self, PlanFilter};
use planboard::rest::dto::PlanResponse;
use planboard::rest::{self, ApiDoc, ApiState};
use planboard::state::BoardState;
use planboard::types::{NewPlan, PlanPriority, PlanStatus, Role};

#[derive(Parser)]
#[command(name = "planboard")]
#[command(about = "Production plan readiness board")]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,

    /// Config file path
    #[arg(short, long)]
    config: Option<String>,

    /// Enable debug logging
    #[arg(short, long)]
    debug: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Start the REST API server (default)
    Serve {
        /// Port to listen on (default: server.port from config)
        #[arg(short, long)]
        port: Option<u16>,
    },

    /// List plans from the configured board
    Plans {
        /// Only plans in this status (e.g., created, production_ready)
        #[arg(short, long)]
        status: Option<PlanStatus>,

        /// Only plans with this priority
        #[arg(short, long)]
        priority: Option<PlanPriority>,

        /// Only plans on this machine
        #[arg(short, long)]
        machine: Option<String>,

        /// Search plan id, part name and machine
        #[arg(long)]
        search: Option<String>,
    },

    /// Show the readiness items owned by a role
    Mine {
        /// Role to report for (e.g., QA_ENGINEER)
        role: Role,
    },

    /// Print the OpenAPI document
    Openapi {
        /// Emit YAML instead of JSON
        #[arg(long)]
        yaml: bool,
    },

    /// Print JSON Schemas for the plan record and creation payload
    Schema,

    /// Write the effective configuration to a TOML file
    InitConfig {
        /// Destination (default: planboard.toml)
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Overwrite an existing file
        #[arg(short, long)]
        force: bool,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Load configuration first (needed for logging setup)
    let config = Config::load(cli.config.as_deref())?;

    let is_server_mode = matches!(cli.command, None | Some(Commands::Serve { .. }));

    let logging_handle = logging::init_logging(&config, is_server_mode, cli.debug)?;
    if let Some(path) = &logging_handle.log_file_path {
        eprintln!("Logging to {}", path.display());
    }

    match cli.command {
        None => cmd_serve(config, None).await?,
        Some(Commands::Serve { port }) => cmd_serve(config, port).await?,
        Some(Commands::Plans {
            status,
            priority,
            machine,
            search,
        }) => {
            let filter = PlanFilter {
                search,
                status,
                priority,
                machine,
            };
            cmd_plans(&config, &filter)?;
        }
        Some(Commands::Mine { role }) => cmd_mine(&config, role)?,
        Some(Commands::Openapi { yaml }) => cmd_openapi(yaml)?,
        Some(Commands::Schema) => cmd_schema()?,
        Some(Commands::InitConfig { output, force }) => cmd_init_config(&config, output, force)?,
    }

    Ok(())
}

async fn cmd_serve(config: Config, port: Option<u16>) -> Result<()> {
    let mut config = config;
    if let Some(port) = port {
        config.server.port = port;
    }
    let addr: SocketAddr = config
        .bind_address()
        .parse()
        .with_context(|| format!("Invalid listen address {}", config.bind_address()))?;

    println!("Starting planboard REST API...");
    println!("  Address: http://{}", addr);
    println!(
        "  Checklist roles: {}",
        config
            .planning
            .participating_roles
            .iter()
            .map(Role::as_str)
            .collect::<Vec<_>>()
            .join(", ")
    );
    println!("  OpenAPI: http://{}/api-docs/openapi.json", addr);
    println!();

    let state = ApiState::new(config)?;
    rest::serve(state, addr).await
}

fn cmd_plans(config: &Config, filter: &PlanFilter) -> Result<()> {
    let board = BoardState::load(&config.planning)?;
    let plans = reports::filter_plans(board.plans(), filter);

    if plans.is_empty() {
        println!("No plans match");
        return Ok(());
    }

    println!("Plans ({} of {})", plans.len(), board.plans().len());
    println!("{}", "─".repeat(78));

    for plan in plans {
        println!(
            "{:<9} {:<18} {:<11} {:<7} {:<19} {}/{} ready",
            plan.id,
            plan.part_name,
            plan.machine_name,
            plan.priority.as_str(),
            plan.status().as_str(),
            plan.readiness.iter().filter(|i| i.is_ready()).count(),
            plan.readiness.len(),
        );
    }

    Ok(())
}

fn cmd_mine(config: &Config, role: Role) -> Result<()> {
    let board = BoardState::load(&config.planning)?;
    let mine = reports::my_readiness(board.plans(), role);

    if mine.items.is_empty() {
        println!("{} owns no readiness items", role.display_name());
        return Ok(());
    }

    println!(
        "{}: {} ready, {} pending, {} not ready",
        role.display_name(),
        mine.ready,
        mine.pending,
        mine.not_ready
    );
    println!("{}", "─".repeat(60));
    for item in &mine.items {
        let lock = if item.editable { "" } else { " (locked)" };
        println!(
            "{:<9} {:<18} {:<10}{}",
            item.plan_id,
            item.part_name,
            item.status.as_str(),
            lock
        );
    }

    Ok(())
}

fn cmd_openapi(yaml: bool) -> Result<()> {
    let doc = if yaml {
        ApiDoc::yaml().context("Failed to render OpenAPI YAML")?
    } else {
        ApiDoc::json().context("Failed to render OpenAPI JSON")?
    };
    println!("{}", doc);
    Ok(())
}

fn cmd_schema() -> Result<()> {
    let schemas = serde_json::json!({
        "PlanResponse": schemars::schema_for!(PlanResponse),
        "NewPlan": schemars::schema_for!(NewPlan),
    });
    println!(
        "{}",
        serde_json::to_string_pretty(&schemas).context("Failed to render JSON Schema")?
    );
    Ok(())
}

fn cmd_init_config(config: &Config, output: Option<PathBuf>, force: bool) -> Result<()> {
    let path = output.clone().unwrap_or_else(Config::local_config_path);
    if path.exists() && !force {
        bail!("{} already exists (use --force to overwrite)", path.display());
    }
    match output {
        Some(path) => config.save_to(&path)?,
        None => config.save()?,
    }
    println!("Wrote {}", path.display());
    Ok(())
}
