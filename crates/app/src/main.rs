use std::error::Error;

use chrono::NaiveDate;
use clap::{Args, Parser, Subcommand};
use ledger::{Engine, EntryKind, Interval, MoneyCents, MonthlyBalance, NewEntryCmd, YearMonth};
use migration::{Migrator, MigratorTrait};
use sea_orm::{DatabaseConnection, DbErr};
use uuid::Uuid;

mod settings;

#[derive(Parser, Debug)]
#[command(name = "ledgerd")]
#[command(about = "Monthly balance ledger with recurring entries")]
struct Cli {
    /// Database connection string; overrides the `database` setting.
    #[arg(long, env = "DATABASE_URL")]
    database_url: Option<String>,

    /// Print results as JSON.
    #[arg(long, global = true)]
    json: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Manage the database schema.
    Migrate(Migrate),
    #[command(flatten)]
    Ledger(LedgerCommand),
}

#[derive(Args, Debug)]
struct Migrate {
    #[command(subcommand)]
    command: MigrateCommand,
}

#[derive(Subcommand, Debug)]
enum MigrateCommand {
    /// Apply pending migrations.
    Up,
    /// Roll back every applied migration.
    Down,
    /// Drop all tables and apply every migration again.
    Fresh,
    /// List applied and pending migrations.
    Status,
}

#[derive(Subcommand, Debug)]
enum LedgerCommand {
    Entry(Entry),
    /// Recompute balances forward from the month of `--anchor`.
    Propagate(PropagateArgs),
    /// Show persisted balances.
    Balances(BalancesArgs),
}

#[derive(Args, Debug)]
struct Entry {
    #[command(subcommand)]
    command: EntryCommand,
}

#[derive(Subcommand, Debug)]
enum EntryCommand {
    Add(EntryAddArgs),
    Remove(EntryRemoveArgs),
    List(UserArgs),
}

#[derive(Args, Debug)]
struct UserArgs {
    #[arg(long)]
    user: String,
}

#[derive(Args, Debug)]
struct EntryAddArgs {
    #[arg(long)]
    user: String,
    #[arg(long, value_parser = parse_kind)]
    kind: EntryKind,
    /// Amount in major units, e.g. `12.34`.
    #[arg(long)]
    amount: MoneyCents,
    #[arg(long)]
    date: NaiveDate,
    #[arg(long, default_value = "none")]
    interval: Interval,
    /// Last day (inclusive) a recurring entry may occur on.
    #[arg(long)]
    until: Option<NaiveDate>,
    #[arg(long)]
    note: Option<String>,
}

#[derive(Args, Debug)]
struct EntryRemoveArgs {
    #[arg(long)]
    user: String,
    #[arg(long)]
    id: Uuid,
}

#[derive(Args, Debug)]
struct PropagateArgs {
    #[arg(long)]
    user: String,
    #[arg(long)]
    anchor: NaiveDate,
    /// Months to walk, anchor included. Defaults to the configured horizon.
    #[arg(long)]
    horizon: Option<u32>,
}

#[derive(Args, Debug)]
struct BalancesArgs {
    #[arg(long)]
    user: String,
    /// First month, `YYYY-MM`.
    #[arg(long)]
    from: YearMonth,
    #[arg(long)]
    months: Option<u32>,
}

fn parse_kind(raw: &str) -> Result<EntryKind, String> {
    EntryKind::try_from(raw.trim().to_lowercase().as_str()).map_err(|err| err.to_string())
}

async fn migrate(db: &DatabaseConnection, command: MigrateCommand) -> Result<(), DbErr> {
    match command {
        MigrateCommand::Up => Migrator::up(db, None).await,
        MigrateCommand::Down => Migrator::down(db, None).await,
        MigrateCommand::Fresh => Migrator::fresh(db).await,
        MigrateCommand::Status => Migrator::status(db).await,
    }
}

fn print_balances(
    months: &[MonthlyBalance],
    json: bool,
) -> Result<(), Box<dyn Error + Send + Sync>> {
    if json {
        println!("{}", serde_json::to_string_pretty(months)?);
        return Ok(());
    }
    for balance in months {
        println!(
            "{}  start {:>12}  end {:>12}",
            balance.month, balance.starting_balance, balance.remaining_balance
        );
    }
    Ok(())
}

async fn run(
    command: LedgerCommand,
    json: bool,
    engine: &Engine,
) -> Result<(), Box<dyn Error + Send + Sync>> {
    let horizon_months = engine.horizon_months();
    match command {
        LedgerCommand::Entry(Entry {
            command: EntryCommand::Add(args),
        }) => {
            let mut cmd = NewEntryCmd::new(args.user, args.kind, args.amount, args.date)
                .every(args.interval);
            if let Some(until) = args.until {
                cmd = cmd.until(until);
            }
            if let Some(note) = args.note {
                cmd = cmd.note(note);
            }
            let change = engine.add_entry(cmd).await?;
            if json {
                println!("{}", serde_json::to_string_pretty(&change.entry)?);
            } else {
                println!("added entry: {}", change.entry.id);
                print_balances(&change.propagation.months, false)?;
            }
        }
        LedgerCommand::Entry(Entry {
            command: EntryCommand::Remove(args),
        }) => {
            let change = engine.delete_entry(&args.user, args.id).await?;
            println!("removed entry: {}", change.entry.id);
        }
        LedgerCommand::Entry(Entry {
            command: EntryCommand::List(args),
        }) => {
            let entries = engine.entries(&args.user).await?;
            if json {
                println!("{}", serde_json::to_string_pretty(&entries)?);
            } else {
                for entry in entries {
                    println!(
                        "{}  {}  {:<7}  {:>12}  {}",
                        entry.id,
                        entry.origin_date,
                        entry.kind.as_str(),
                        entry.amount,
                        entry.interval
                    );
                }
            }
        }
        LedgerCommand::Propagate(args) => {
            let horizon = args.horizon.unwrap_or(horizon_months);
            let report = engine
                .propagate_from(&args.user, YearMonth::of(args.anchor), horizon)
                .await?;
            if json {
                println!("{}", serde_json::to_string_pretty(&report)?);
            } else {
                print_balances(&report.months, false)?;
            }
        }
        LedgerCommand::Balances(args) => {
            let months = args.months.unwrap_or(horizon_months);
            let balances = engine.monthly_balances(&args.user, args.from, months).await?;
            print_balances(&balances, json)?;
        }
    }
    Ok(())
}

async fn dispatch(
    cli: Cli,
    db: DatabaseConnection,
    horizon_months: u32,
) -> Result<(), Box<dyn Error + Send + Sync>> {
    match cli.command {
        Command::Migrate(Migrate { command }) => migrate(&db, command).await?,
        Command::Ledger(command) => {
            Migrator::up(&db, None).await?;
            let engine = Engine::builder()
                .database(db)
                .horizon_months(horizon_months)
                .build()
                .await?;
            run(command, cli.json, &engine).await?;
        }
    }
    Ok(())
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn Error + Send + Sync>> {
    let cli = Cli::parse();
    let settings = settings::Settings::new()?;

    tracing_subscriber::fmt()
        .with_env_filter(format!(
            "ledgerd={level},ledger={level},sea_orm_migration={level}",
            level = settings.app.level
        ))
        .with_writer(std::io::stderr)
        .init();

    let url = cli
        .database_url
        .clone()
        .unwrap_or_else(|| settings.database.url());
    let db = sea_orm::Database::connect(url).await?;

    if let Err(err) = dispatch(cli, db, settings.ledger.horizon_months).await {
        tracing::error!("command failed: {err}");
        return Err(err);
    }
    Ok(())
}
