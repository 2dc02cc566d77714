use std::{error::Error, fs, path::Path, process::exit};

use clap::Parser;
use rusqlite::Connection;

use finance_tracker::{
    Amount, CategoryColor, CategoryName, NewCategory, NewTransaction, Timestamp, TransactionType,
    create_category, create_transaction, get_local_timezone, initialize_db,
};

/// A utility for creating a demo database for finance_tracker.
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Args {
    /// File path to save the SQLite database to.
    #[arg(long)]
    db_path: String,

    /// Overwrite the database if the file already exists.
    #[arg(long)]
    force: bool,

    /// The canonical name of the timezone the demo transactions are dated in.
    #[arg(long, env = "LOCAL_TIMEZONE", default_value = "Etc/UTC")]
    timezone: String,
}

const CATEGORIES: [(&str, TransactionType, &str); 5] = [
    ("Mercado", TransactionType::Expense, "#33FF57"),
    ("Biscoitos", TransactionType::Expense, "#3357FF"),
    ("Limpeza", TransactionType::Expense, "#F333FF"),
    ("Transporte", TransactionType::Expense, "#FF33A1"),
    ("Salário", TransactionType::Income, "#33FFF3"),
];

/// Description, amount, type and category name.
const TRANSACTIONS: [(&str, &str, TransactionType, &str); 6] = [
    ("Feijão", "18.75", TransactionType::Expense, "Mercado"),
    ("Macarrão", "14.75", TransactionType::Expense, "Mercado"),
    ("Biscoito Negresco", "2.75", TransactionType::Expense, "Biscoitos"),
    ("Papel Higiênico", "8.25", TransactionType::Expense, "Limpeza"),
    ("Salário Mensal", "2500.00", TransactionType::Income, "Salário"),
    ("Ônibus", "4.50", TransactionType::Expense, "Transporte"),
];

/// Create and populate a database with demo categories and transactions.
fn main() -> Result<(), Box<dyn Error>> {
    let args = Args::parse();

    let Some(timezone) = get_local_timezone(&args.timezone) else {
        eprintln!("Unknown timezone {:?}", args.timezone);
        exit(1);
    };

    let db_path = Path::new(&args.db_path);

    if db_path.is_file() {
        if !args.force {
            eprintln!("File already exists at {db_path:#?}! Use --force to overwrite it.");
            exit(1);
        }

        println!("Removing existing database at {db_path:#?}");
        fs::remove_file(db_path)?;
    }

    println!("Creating database at {db_path:#?}");
    let conn = Connection::open(db_path)?;

    initialize_db(&conn)?;

    println!("Creating categories...");
    let mut categories = Vec::with_capacity(CATEGORIES.len());
    for (name, kind, color) in CATEGORIES {
        let category = create_category(
            NewCategory {
                name: CategoryName::new(name)?,
                kind,
                color: CategoryColor::new(color)?,
            },
            &conn,
        )?;
        categories.push((name, category.id));
    }

    println!("Creating transactions...");
    let now = Timestamp::now(timezone);
    for (description, amount, kind, category_name) in TRANSACTIONS {
        let Some(&(_, category_id)) = categories
            .iter()
            .find(|(name, _)| *name == category_name)
        else {
            return Err(format!("no category named {category_name:?}").into());
        };

        create_transaction(
            NewTransaction {
                description: description.to_owned(),
                amount: amount.parse::<Amount>()?,
                kind,
                date: now,
                category_id,
            },
            &conn,
        )?;
    }

    println!("Success!");

    Ok(())
}
