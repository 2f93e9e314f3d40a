//! BookFlow Application CLI

use std::process;

use bookflow_app::{
    auth::{NewAccount, PgAuthService},
    database::{self, Db},
    domain::books::{
        CatalogService, PgCatalogService,
        models::{BookUuid, NewBook},
    },
};
use clap::{Args, Parser, Subcommand};

#[derive(Debug, Parser)]
#[command(name = "bookflow-app", about = "BookFlow CLI", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    Book(BookCommand),
    Admin(AdminCommand),
}

#[derive(Debug, Args)]
struct BookCommand {
    #[command(subcommand)]
    command: BookSubcommand,
}

#[derive(Debug, Subcommand)]
enum BookSubcommand {
    Add(AddBookArgs),
}

#[derive(Debug, Args)]
struct AddBookArgs {
    /// Book title
    #[arg(long)]
    title: String,

    /// Author name
    #[arg(long)]
    author: String,

    /// Price in minor currency units
    #[arg(long)]
    price: u64,

    /// Copies available for purchase
    #[arg(long, default_value_t = 0)]
    stock: u32,

    /// Copies available for borrowing
    #[arg(long, default_value_t = 0)]
    borrowable: u32,

    /// Optional cover image URL
    #[arg(long)]
    img_url: Option<String>,

    /// PostgreSQL connection string
    #[arg(long, env = "DATABASE_URL")]
    database_url: String,
}

#[derive(Debug, Args)]
struct AdminCommand {
    #[command(subcommand)]
    command: AdminSubcommand,
}

#[derive(Debug, Subcommand)]
enum AdminSubcommand {
    Create(CreateAdminArgs),
}

#[derive(Debug, Args)]
struct CreateAdminArgs {
    /// Display name
    #[arg(long)]
    name: String,

    /// Login email
    #[arg(long)]
    email: String,

    /// Password; prefer passing via the environment
    #[arg(long, env = "BOOKFLOW_ADMIN_PASSWORD")]
    password: String,

    /// PostgreSQL connection string
    #[arg(long, env = "DATABASE_URL")]
    database_url: String,
}

#[tokio::main]
pub async fn main() {
    let _env = dotenvy::dotenv();

    let cli = Cli::parse();

    if let Err(error) = run(cli).await {
        eprintln!("{error}");
        process::exit(1);
    }
}

async fn run(cli: Cli) -> Result<(), String> {
    match cli.command {
        Commands::Book(BookCommand {
            command: BookSubcommand::Add(args),
        }) => add_book(args).await,
        Commands::Admin(AdminCommand {
            command: AdminSubcommand::Create(args),
        }) => create_admin(args).await,
    }
}

async fn add_book(args: AddBookArgs) -> Result<(), String> {
    let pool = database::connect(&args.database_url)
        .await
        .map_err(|error| format!("failed to connect to database: {error}"))?;

    let service = PgCatalogService::new(Db::new(pool));

    let book = service
        .create_book(NewBook {
            uuid: BookUuid::new(),
            title: args.title,
            author: args.author,
            price: args.price,
            stock_count: args.stock,
            borrowable_count: args.borrowable,
            img_url: args.img_url,
        })
        .await
        .map_err(|error| format!("failed to add book: {error}"))?;

    println!("book_uuid: {}", book.uuid);
    println!("title: {}", book.title);
    println!("author: {}", book.author);

    Ok(())
}

async fn create_admin(args: CreateAdminArgs) -> Result<(), String> {
    let pool = database::connect(&args.database_url)
        .await
        .map_err(|error| format!("failed to connect to database: {error}"))?;

    let service = PgAuthService::new(pool);

    let issued = service
        .create_admin(NewAccount {
            name: args.name,
            email: args.email,
            password: args.password,
        })
        .await
        .map_err(|error| format!("failed to create admin: {error}"))?;

    println!("user_uuid: {}", issued.user.uuid);
    println!("email: {}", issued.user.email);
    println!("session_token: {}", issued.token);
    println!("store this token now; it is only shown once");

    Ok(())
}
