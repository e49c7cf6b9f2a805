use std::error::Error;

use clap::{Args, Parser, Subcommand};
use engine::{AllocationAction, Engine, MoneyCents, NewItem};
use migration::MigratorTrait;
use sea_orm::{Database, DatabaseConnection};
use uuid::Uuid;

#[derive(Parser, Debug)]
#[command(name = "decorstock_admin")]
#[command(about = "Admin utilities for Decor Stock (bootstrap customers/items)")]
struct Cli {
    /// Database connection string (also read from `DATABASE_URL`).
    #[arg(
        long,
        env = "DATABASE_URL",
        default_value = "sqlite:./decorstock.db?mode=rwc"
    )]
    database_url: String,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Apply pending migrations and exit.
    Migrate,
    Customer(Customer),
    Item(Item),
}

#[derive(Args, Debug)]
struct Customer {
    #[command(subcommand)]
    command: CustomerCommand,
}

#[derive(Subcommand, Debug)]
enum CustomerCommand {
    Create(CustomerCreateArgs),
}

#[derive(Args, Debug)]
struct CustomerCreateArgs {
    #[arg(long)]
    tenant: String,
    #[arg(long)]
    name: String,
    #[arg(long)]
    phone: Option<String>,
    #[arg(long)]
    email: Option<String>,
}

#[derive(Args, Debug)]
struct Item {
    #[command(subcommand)]
    command: ItemCommand,
}

#[derive(Subcommand, Debug)]
enum ItemCommand {
    Add(ItemAddArgs),
    List(ItemListArgs),
    Action(ItemActionArgs),
}

#[derive(Args, Debug)]
struct ItemAddArgs {
    #[arg(long)]
    tenant: String,
    #[arg(long)]
    category: String,
    #[arg(long)]
    name: String,
    #[arg(long, default_value_t = 0)]
    in_store: i32,
    /// Unit price, e.g. `12.50` or `12,50`.
    #[arg(long, default_value = "0", value_parser = parse_price)]
    price: MoneyCents,
}

#[derive(Args, Debug)]
struct ItemListArgs {
    #[arg(long)]
    tenant: String,
    #[arg(long)]
    category: Option<String>,
}

#[derive(Args, Debug)]
struct ItemActionArgs {
    #[arg(long)]
    tenant: String,
    #[arg(long)]
    id: Uuid,
    /// One of `hire`, `return`, `damage`, `repair`.
    #[arg(long, value_parser = parse_action)]
    action: AllocationAction,
}

fn parse_price(raw: &str) -> Result<MoneyCents, String> {
    raw.parse().map_err(|err: engine::EngineError| err.to_string())
}

fn parse_action(raw: &str) -> Result<AllocationAction, String> {
    raw.parse().map_err(|err: engine::EngineError| err.to_string())
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
        Command::Migrate => {
            println!("database is up to date");
        }
        Command::Customer(Customer {
            command: CustomerCommand::Create(args),
        }) => {
            let customer = engine
                .add_customer(
                    &args.tenant,
                    &args.name,
                    args.phone.as_deref(),
                    args.email.as_deref(),
                )
                .await?;
            println!("created customer: {} ({})", customer.name, customer.id);
        }
        Command::Item(Item {
            command: ItemCommand::Add(args),
        }) => {
            let item = engine
                .add_item(
                    &args.tenant,
                    NewItem {
                        category: args.category,
                        item_name: args.name,
                        in_store: args.in_store,
                        price: args.price,
                    },
                )
                .await?;
            println!("created item: {} ({})", item.item_name, item.id);
        }
        Command::Item(Item {
            command: ItemCommand::List(args),
        }) => {
            let items = engine
                .list_items(&args.tenant, args.category.as_deref())
                .await?;
            for item in items {
                println!(
                    "{}\t{}\t{}\tin_store={} hired={} damaged={}\t{}",
                    item.id,
                    item.category,
                    item.item_name,
                    item.counts.in_store,
                    item.counts.hired,
                    item.counts.damaged,
                    item.price
                );
            }
        }
        Command::Item(Item {
            command: ItemCommand::Action(args),
        }) => match engine.apply_action(&args.tenant, args.id, args.action).await {
            Ok(item) => println!(
                "{}: in_store={} hired={} damaged={}",
                item.item_name, item.counts.in_store, item.counts.hired, item.counts.damaged
            ),
            Err(err) => {
                eprintln!("{err}");
                std::process::exit(1);
            }
        },
    }

    Ok(())
}
