use std::{error::Error, io};

use chrono::NaiveDate;
use clap::{Args, Parser, Subcommand};
use engine::{Engine, MoneyCents, NewCostEntry};
use migration::MigratorTrait;
use sea_orm::{Database, DatabaseConnection};
use uuid::Uuid;

mod export;

#[derive(Parser, Debug)]
#[command(name = "nebenkosten_admin")]
#[command(about = "Admin utilities for operating cost statements (bootstrap, CSV export)")]
struct Cli {
    /// Database connection string (also read from `DATABASE_URL`).
    #[arg(
        long,
        env = "DATABASE_URL",
        default_value = "sqlite:./nebenkosten.db?mode=rwc"
    )]
    database_url: String,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    Property(Property),
    Unit(Unit),
    Meter(Meter),
    Lease(Lease),
    Cost(Cost),
    /// Print the cost category catalog as CSV.
    Categories,
    /// Print the yearly statement of a property as CSV.
    Statement(StatementArgs),
    /// Print the settlement of a lease as CSV.
    Settle(SettleArgs),
}

#[derive(Args, Debug)]
struct Property {
    #[command(subcommand)]
    command: PropertyCommand,
}

#[derive(Subcommand, Debug)]
enum PropertyCommand {
    Create(PropertyCreateArgs),
}

#[derive(Args, Debug)]
struct PropertyCreateArgs {
    #[arg(long)]
    name: String,
}

#[derive(Args, Debug)]
struct Unit {
    #[command(subcommand)]
    command: UnitCommand,
}

#[derive(Subcommand, Debug)]
enum UnitCommand {
    Create(UnitCreateArgs),
    /// Print the units of a property as CSV.
    List(UnitListArgs),
}

#[derive(Args, Debug)]
struct UnitListArgs {
    #[arg(long)]
    property: Uuid,
}

#[derive(Args, Debug)]
struct UnitCreateArgs {
    #[arg(long)]
    property: Uuid,
    #[arg(long)]
    label: String,
    /// Living area in m².
    #[arg(long, default_value_t = 0.0)]
    area: f64,
}

#[derive(Args, Debug)]
struct Meter {
    #[command(subcommand)]
    command: MeterCommand,
}

#[derive(Subcommand, Debug)]
enum MeterCommand {
    /// Install a meter in a unit.
    Add(MeterAddArgs),
    /// Record a cumulative counter value.
    Read(MeterReadArgs),
}

#[derive(Args, Debug)]
struct MeterAddArgs {
    #[arg(long)]
    unit: Uuid,
    /// Type label, e.g. `Kaltwasser` or `Wärmemengenzähler`.
    #[arg(long)]
    kind: String,
}

#[derive(Args, Debug)]
struct MeterReadArgs {
    #[arg(long)]
    meter: Uuid,
    #[arg(long)]
    date: NaiveDate,
    #[arg(long)]
    value: f64,
}

#[derive(Args, Debug)]
struct Lease {
    #[command(subcommand)]
    command: LeaseCommand,
}

#[derive(Subcommand, Debug)]
enum LeaseCommand {
    Create(LeaseCreateArgs),
    /// Record a payment; `NK` and `Heizung` count as advances.
    Pay(LeasePayArgs),
}

#[derive(Args, Debug)]
struct LeaseCreateArgs {
    #[arg(long)]
    unit: Uuid,
    #[arg(long)]
    tenant: Option<String>,
    #[arg(long)]
    start: NaiveDate,
    #[arg(long)]
    end: Option<NaiveDate>,
}

#[derive(Args, Debug)]
struct LeasePayArgs {
    #[arg(long)]
    lease: Uuid,
    #[arg(long)]
    date: NaiveDate,
    #[arg(long)]
    amount: MoneyCents,
    #[arg(long, default_value = "NK")]
    category: String,
}

#[derive(Args, Debug)]
struct Cost {
    #[command(subcommand)]
    command: CostCommand,
}

#[derive(Subcommand, Debug)]
enum CostCommand {
    Add(CostAddArgs),
}

#[derive(Args, Debug)]
struct CostAddArgs {
    #[arg(long)]
    property: Uuid,
    /// Booking date (YYYY-MM-DD); decides the statement year.
    #[arg(long)]
    date: NaiveDate,
    #[arg(long)]
    category: String,
    /// Gross amount, e.g. `1234,56`.
    #[arg(long)]
    amount: MoneyCents,
    /// VAT in percent.
    #[arg(long, default_value_t = 0.0)]
    vat: f64,
    /// Pin the entry to one unit.
    #[arg(long)]
    unit: Option<Uuid>,
    #[arg(long)]
    supplier: Option<String>,
    #[arg(long)]
    invoice_no: Option<String>,
    #[arg(long)]
    description: Option<String>,
}

#[derive(Args, Debug)]
struct StatementArgs {
    #[arg(long)]
    property: Uuid,
    #[arg(long)]
    year: i32,
    /// Print every (entry, unit) share instead of the per-unit totals.
    #[arg(long)]
    details: bool,
}

#[derive(Args, Debug)]
struct SettleArgs {
    #[arg(long)]
    lease: Uuid,
    #[arg(long)]
    year: i32,
}

async fn connect_db(
    database_url: &str,
) -> Result<DatabaseConnection, Box<dyn Error + Send + Sync>> {
    let db = Database::connect(database_url).await?;
    migration::Migrator::up(&db, None).await?;
    Ok(db)
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn Error + Send + Sync>> {
    let cli = Cli::parse();

    let db = connect_db(&cli.database_url).await?;
    let engine = Engine::builder().database(db).build().await?;

    match cli.command {
        Command::Property(Property {
            command: PropertyCommand::Create(args),
        }) => {
            let property_id = engine.new_property(&args.name).await?;
            println!("created property: {} ({property_id})", args.name.trim());
        }
        Command::Unit(Unit {
            command: UnitCommand::Create(args),
        }) => {
            let unit_id = engine
                .new_unit(args.property, &args.label, args.area)
                .await?;
            println!("created unit: {} ({unit_id})", args.label.trim());
        }
        Command::Unit(Unit {
            command: UnitCommand::List(args),
        }) => {
            let units = engine.units(args.property).await?;
            export::units(io::stdout().lock(), &units)?;
        }
        Command::Meter(Meter {
            command: MeterCommand::Add(args),
        }) => {
            let meter_id = engine.add_meter(args.unit, &args.kind).await?;
            println!("added meter: {} ({meter_id})", args.kind.trim());
        }
        Command::Meter(Meter {
            command: MeterCommand::Read(args),
        }) => {
            engine
                .add_meter_reading(args.meter, args.date, args.value)
                .await?;
            println!("recorded {} on {}", args.value, args.date);
        }
        Command::Lease(Lease {
            command: LeaseCommand::Create(args),
        }) => {
            let lease_id = engine
                .new_lease(args.unit, args.tenant, args.start, args.end)
                .await?;
            println!("created lease: {lease_id}");
        }
        Command::Lease(Lease {
            command: LeaseCommand::Pay(args),
        }) => {
            engine
                .add_payment(args.lease, args.date, args.amount, &args.category)
                .await?;
            println!("recorded {} {} on {}", args.category.trim(), args.amount, args.date);
        }
        Command::Cost(Cost {
            command: CostCommand::Add(args),
        }) => {
            let mut cmd = NewCostEntry::new(args.property, args.date, args.category, args.amount)
                .vat_rate(args.vat);
            cmd.unit_id = args.unit;
            cmd.supplier = args.supplier;
            cmd.invoice_no = args.invoice_no;
            cmd.description = args.description;

            let entry = engine.add_cost_entry(cmd).await?;
            println!(
                "booked {} {} on {} ({})",
                entry.category_code, entry.amount_gross, entry.date, entry.id
            );
        }
        Command::Categories => {
            let catalog = engine.categories().await?;
            export::categories(io::stdout().lock(), &catalog)?;
        }
        Command::Statement(args) => {
            let statement = engine.statement(args.property, args.year).await?;
            if args.details {
                export::statement_details(io::stdout().lock(), &statement)?;
            } else {
                export::statement_preview(io::stdout().lock(), &statement)?;
            }
        }
        Command::Settle(args) => {
            let settlement = engine.settle_lease(args.lease, args.year).await?;
            export::settlement(io::stdout().lock(), &settlement)?;
        }
    }

    Ok(())
}
