//! `bookstore` command-line front end.

use bookstore_core::config::Config;
use bookstore_core::domain::{BookId, Shelf};
use bookstore_core::store::BookStore;
use bookstore_core::validation::BookInput;
use bookstore_core::{BookService, BookstoreError};
use clap::{Args, Parser, Subcommand};
use rust_decimal::Decimal;
use std::path::PathBuf;
use std::process::ExitCode;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "bookstore", about = "Manage the bookstore inventory")]
struct Cli {
    /// Database file; overrides BOOKSTORE_DATABASE.
    #[arg(long, global = true)]
    database: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Add a book.
    Add(BookArgs),
    /// Replace every field of an existing book.
    Edit {
        id: i64,
        #[command(flatten)]
        book: BookArgs,
    },
    /// Delete a book permanently.
    Delete { id: i64 },
    /// Show one book.
    Show { id: i64 },
    /// List all books.
    List,
    /// Find books whose title or authors contain QUERY.
    Search { query: String },
    /// List shelves that currently hold books.
    Shelves,
    /// Copies per title on one shelf.
    Shelf { shelf: Shelf },
    /// Import books from a CSV file.
    Import { csv_file_path: PathBuf },
}

#[derive(Args)]
struct BookArgs {
    #[arg(long)]
    title: String,
    #[arg(long)]
    authors: String,
    #[arg(long = "language")]
    original_language: String,
    #[arg(long, allow_negative_numbers = true)]
    first_published: i32,
    #[arg(long = "sales", allow_negative_numbers = true)]
    sales_millions: Decimal,
    #[arg(long, default_value = "")]
    genre: String,
    #[arg(long = "shelf")]
    shelves: String,
    #[arg(long = "copies", allow_negative_numbers = true)]
    number_of_books: i64,
    #[arg(long, allow_negative_numbers = true)]
    price: Decimal,
}

impl From<BookArgs> for BookInput {
    fn from(args: BookArgs) -> Self {
        BookInput {
            title: args.title,
            authors: args.authors,
            original_language: args.original_language,
            first_published: args.first_published,
            sales_millions: args.sales_millions,
            genre: args.genre,
            shelves: args.shelves,
            number_of_books: args.number_of_books,
            price: args.price,
        }
    }
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    let config = match Config::from_env() {
        Ok(config) => config,
        Err(e) => {
            eprintln!("{e}");
            return ExitCode::FAILURE;
        }
    };

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::new(&config.log_filter))
        .with_writer(std::io::stderr)
        .init();

    match run(cli, config).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(BookstoreError::Validation(errors)) => {
            for (field, message) in errors.iter() {
                eprintln!("{field}: {message}");
            }
            ExitCode::FAILURE
        }
        Err(e) => {
            eprintln!("error: {e}");
            ExitCode::FAILURE
        }
    }
}

async fn run(cli: Cli, config: Config) -> Result<(), BookstoreError> {
    let db_path = cli.database.unwrap_or(config.database_path);
    if let Some(parent) = db_path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)?;
    }

    let service = BookService::new(BookStore::open(&db_path).await?);

    match cli.command {
        Command::Add(book) => {
            let record = service.create_book(&book.into()).await?;
            println!("The book was added successfully!");
            println!("{record}");
        }
        Command::Edit { id, book } => {
            let record = service.edit_book(BookId(id), &book.into()).await?;
            println!("The book was updated successfully!");
            println!("{record}");
        }
        Command::Delete { id } => {
            service.delete_book(BookId(id)).await?;
            println!("Deleted book {id}.");
        }
        Command::Show { id } => {
            println!("{}", service.get_book(BookId(id)).await?);
        }
        Command::List => {
            for record in service.list_all_books().await? {
                println!("{record}");
            }
        }
        Command::Search { query } => {
            let books = service.search_books(&query).await?;
            if books.is_empty() {
                println!("No books found.");
            }
            for record in books {
                println!("{record}");
            }
        }
        Command::Shelves => {
            let summary = service.inventory_summary().await?;
            for shelf in summary.shelves {
                println!("Shelf {shelf}");
            }
        }
        Command::Shelf { shelf } => {
            let detail = service.shelf_detail(shelf).await?;
            println!(
                "Shelf {}: {} distinct books",
                detail.shelf, detail.distinct_books_count
            );
            for entry in detail.books {
                println!("  {} by {}: {}", entry.title, entry.authors, entry.total);
            }
        }
        Command::Import { csv_file_path } => {
            let report = service.import_csv_file(&csv_file_path).await?;
            println!("Successfully imported {} books.", report.imported());
        }
    }

    Ok(())
}
