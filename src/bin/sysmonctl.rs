//! sysmonctl
//!
//! Command-line interface for the system monitor daemon.

use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, Subcommand, ValueEnum};
use sysmon::alert::SystemIdentities;
use sysmon::{Alert, AlertFlags, AlertTypeMap, Client, ClientConfig, Level, SysmonError};
use tracing_subscriber::{fmt, EnvFilter};

/// System monitor control
#[derive(Parser, Debug)]
#[command(name = "sysmonctl")]
#[command(about = "Send, list and acknowledge system monitor alerts")]
#[command(version)]
struct Args {
    /// Daemon socket path
    #[arg(short, long, default_value = sysmon::DEFAULT_SOCKET_PATH)]
    socket: PathBuf,

    /// Alert type map (TOML)
    #[arg(short, long)]
    types: Option<PathBuf>,

    /// Socket read/write timeout in milliseconds (0 waits forever)
    #[arg(long, default_value = "10000")]
    timeout_ms: u64,

    /// Enable debugging messages
    #[arg(short, long)]
    debug: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Send an alert
    Send {
        /// Alert type name or numeric id
        #[arg(short = 'T', long = "type")]
        alert_type: String,

        /// Severity level
        #[arg(short, long, value_enum, default_value = "normal")]
        level: LevelArg,

        /// Keep the alert after it has been read
        #[arg(short, long)]
        persistent: bool,

        /// Owning user name or uid (defaults to the caller)
        #[arg(short, long)]
        user: Option<String>,

        /// Group name or gid, may be repeated
        #[arg(short, long = "group")]
        groups: Vec<String>,

        /// Optional UUID
        #[arg(short = 'U', long)]
        uuid: Option<String>,

        /// Optional icon name
        #[arg(short, long)]
        icon: Option<String>,

        /// Alert description
        description: String,
    },

    /// List alerts
    List {
        /// Selection expression handed to the daemon
        #[arg(short, long, default_value = sysmon::client::DEFAULT_FILTER)]
        filter: String,
    },

    /// Mark an alert as read
    MarkRead {
        /// Alert id
        id: u64,
    },

    /// List the configured alert types
    Types,
}

#[derive(ValueEnum, Clone, Copy, Debug)]
enum LevelArg {
    Normal,
    Warning,
    Critical,
}

impl From<LevelArg> for Level {
    fn from(level: LevelArg) -> Self {
        match level {
            LevelArg::Normal => Level::Normal,
            LevelArg::Warning => Level::Warning,
            LevelArg::Critical => Level::Critical,
        }
    }
}

fn main() -> ExitCode {
    let args = Args::parse();

    // Initialize tracing/logging
    let default_filter = if args.debug { "info,sysmon=debug" } else { "warn" };
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_filter));

    fmt()
        .with_env_filter(filter)
        .with_target(args.debug)
        .with_writer(std::io::stderr)
        .init();

    match run(args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            tracing::error!("{}", e);
            ExitCode::FAILURE
        }
    }
}

fn run(args: Args) -> sysmon::Result<()> {
    let mut builder = ClientConfig::builder()
        .socket_path(&args.socket)
        .read_timeout_ms(args.timeout_ms)
        .write_timeout_ms(args.timeout_ms);
    if let Some(path) = &args.types {
        builder = builder.types_path(path);
    }
    let config = builder.build();

    match args.command {
        Commands::Send {
            alert_type,
            level,
            persistent,
            user,
            groups,
            uuid,
            icon,
            description,
        } => {
            let mut client = Client::connect_with(&config)?;
            let identities = SystemIdentities::new();

            let mut alert = Alert::new();
            alert
                .set_level(level.into())
                .set_type(resolve_type(&client, &alert_type)?)
                .set_description(description);
            if persistent {
                alert.set_flag(AlertFlags::FLG_PERSIST);
            }
            if let Some(user) = user {
                if !alert.set_user_by_name(&user, &identities) {
                    return Err(SysmonError::Config(format!("Unknown user: {}", user)));
                }
            }
            for group in &groups {
                if !alert.add_group_by_name(group, &identities) {
                    return Err(SysmonError::Config(format!("Unknown group: {}", group)));
                }
            }
            if let Some(uuid) = uuid {
                alert.set_uuid(uuid);
            }
            if let Some(icon) = icon {
                alert.set_icon(icon);
            }

            client.submit_alert(&alert)
        }
        Commands::List { filter } => {
            let mut client = Client::connect_with(&config)?;
            let alerts = client.query_alerts(&filter)?;
            if alerts.is_empty() {
                println!("No alerts");
            }
            for alert in &alerts {
                let type_name = client.type_name_for_id(alert.alert_type()).unwrap_or("?");
                println!("{} {}", alert, type_name);
                if let Some(description) = alert.description() {
                    println!("    {}", description);
                }
            }
            Ok(())
        }
        Commands::MarkRead { id } => Client::connect_with(&config)?.mark_as_read(id),
        Commands::Types => list_types(config.types_path),
    }
}

/// Accept either a configured type name or a numeric id
fn resolve_type(client: &Client, name: &str) -> sysmon::Result<u32> {
    if let Ok(id) = name.parse::<u32>() {
        return Ok(id);
    }
    client
        .type_id_for_name(name)
        .ok_or_else(|| SysmonError::Config(format!("Unknown alert type: {}", name)))
}

/// Print the type map without contacting the daemon
fn list_types(path: Option<PathBuf>) -> sysmon::Result<()> {
    let path = path.ok_or_else(|| SysmonError::Config("No type map given (--types)".to_string()))?;
    let types = AlertTypeMap::load(&path)?;
    for (id, name) in types.iter() {
        println!("{:>6}  {}", id, name);
    }
    Ok(())
}
