use std::path::PathBuf;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HelpTopic {
    Root,
    Migrate,
    Seed,
}

#[derive(Debug, Clone)]
pub enum Command {
    Help(HelpTopic),
    Migrate(MigrateArgs),
    Seed(SeedArgs),
}

/// Where to read configuration from. Shared by every command.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ConnectionArgs {
    /// TOML config file; when absent the environment (and `.env`) is used.
    pub config: Option<PathBuf>,
    /// Overrides the configured database url.
    pub database: Option<String>,
}

#[derive(Debug, Clone)]
pub struct MigrateArgs {
    pub conn: ConnectionArgs,
    pub dry_run: bool,
}

#[derive(Debug, Clone)]
pub struct SeedArgs {
    pub conn: ConnectionArgs,
    /// Apply migrations before inserting.
    pub migrate: bool,
}

pub fn parse_args(args: &[String]) -> anyhow::Result<Command> {
    let mut it = args.iter().skip(1).map(|s| s.as_str());
    let Some(first) = it.next() else {
        return Ok(Command::Help(HelpTopic::Root));
    };

    match first {
        "-h" | "--help" | "help" => Ok(Command::Help(HelpTopic::Root)),
        "migrate" => parse_migrate(it),
        "seed" => parse_seed(it),
        _ => anyhow::bail!("unknown command: {first}"),
    }
}

/// Consume `token` if it is a connection option. Returns `Ok(false)` when
/// the token belongs to the command.
fn parse_connection_arg<'a>(
    token: &str,
    it: &mut impl Iterator<Item = &'a str>,
    conn: &mut ConnectionArgs,
) -> anyhow::Result<bool> {
    match token {
        "--config" => {
            let Some(v) = it.next() else {
                anyhow::bail!("--config requires a value");
            };
            conn.config = Some(PathBuf::from(v));
        }
        _ if token.starts_with("--config=") => {
            conn.config = Some(PathBuf::from(token.trim_start_matches("--config=")));
        }
        "--database" => {
            let Some(v) = it.next() else {
                anyhow::bail!("--database requires a value");
            };
            conn.database = Some(v.to_string());
        }
        _ if token.starts_with("--database=") => {
            conn.database = Some(token.trim_start_matches("--database=").to_string());
        }
        _ => return Ok(false),
    }
    Ok(true)
}

fn parse_migrate<'a>(mut it: impl Iterator<Item = &'a str>) -> anyhow::Result<Command> {
    let mut conn = ConnectionArgs::default();
    let mut dry_run = false;

    while let Some(token) = it.next() {
        if parse_connection_arg(token, &mut it, &mut conn)? {
            continue;
        }
        match token {
            "-h" | "--help" => return Ok(Command::Help(HelpTopic::Migrate)),
            "--dry-run" => dry_run = true,
            other => anyhow::bail!("unknown argument: {other}"),
        }
    }

    Ok(Command::Migrate(MigrateArgs { conn, dry_run }))
}

fn parse_seed<'a>(mut it: impl Iterator<Item = &'a str>) -> anyhow::Result<Command> {
    let mut conn = ConnectionArgs::default();
    let mut migrate = false;

    while let Some(token) = it.next() {
        if parse_connection_arg(token, &mut it, &mut conn)? {
            continue;
        }
        match token {
            "-h" | "--help" => return Ok(Command::Help(HelpTopic::Seed)),
            "--migrate" => migrate = true,
            other => anyhow::bail!("unknown argument: {other}"),
        }
    }

    Ok(Command::Seed(SeedArgs { conn, migrate }))
}

pub fn print_help(topic: HelpTopic) {
    match topic {
        HelpTopic::Root => {
            println!(
                "\
jobly - schema and demo-data CLI for the jobly data layer

USAGE:
  jobly <COMMAND> [OPTIONS]

COMMANDS:
  migrate       Apply the embedded schema migrations
  seed          Insert demo companies, jobs and users
  help          Print this help

Run `jobly <command> --help` for more."
            );
        }
        HelpTopic::Migrate => {
            println!(
                "\
USAGE:
  jobly migrate [OPTIONS]

OPTIONS:
  --config <FILE>       TOML config file (default: environment and .env)
  --database <URL>      Override the configured database url
  --dry-run             List embedded migrations without applying them
  -h, --help            Print help"
            );
        }
        HelpTopic::Seed => {
            println!(
                "\
USAGE:
  jobly seed [OPTIONS]

OPTIONS:
  --config <FILE>       TOML config file (default: environment and .env)
  --database <URL>      Override the configured database url
  --migrate             Apply migrations first
  -h, --help            Print help"
            );
        }
    }
}
