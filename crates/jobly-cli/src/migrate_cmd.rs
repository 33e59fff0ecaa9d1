use crate::cli::MigrateArgs;
use crate::resolve_config;
use anyhow::Context;

pub async fn run(args: MigrateArgs) -> anyhow::Result<()> {
    if args.dry_run {
        println!("embedded migrations (dry-run):");
        for m in jobly::migrate::runner().get_migrations() {
            println!("  V{}__{}", m.version(), m.name());
        }
        return Ok(());
    }

    let config = resolve_config(&args.conn)?;
    let mut client = jobly::connect(&config.database_url)
        .await
        .context("failed to connect")?;

    let report = jobly::migrate::run(&mut client).await?;

    let applied = report.applied_migrations();
    if applied.is_empty() {
        println!("no pending migrations");
    } else {
        println!("applied {} migration(s)", applied.len());
        for m in applied {
            println!("  {}", m);
        }
    }
    Ok(())
}
