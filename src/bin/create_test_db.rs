use std::error::Error;
use std::path::Path;
use std::process::exit;

use clap::Parser;
use rusqlite::Connection;
use time::OffsetDateTime;

use expenseur::{
    auth::{Email, PasswordHash, ValidatedPassword, create_user},
    date_key::format_date_key,
    initialize_db,
};

/// A utility for creating a populated database for manually testing the
/// expenseur server.
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Args {
    /// File path to save the SQLite database to.
    #[arg(long, short)]
    output_path: String,
}

fn main() -> Result<(), Box<dyn Error>> {
    let args = Args::parse();

    let output_path = Path::new(&args.output_path);

    match output_path.extension() {
        None => {
            eprintln!("Output path must include a file extension (e.g., 'my_database.db').");
            exit(1);
        }
        Some(extension) if extension.is_empty() => {
            eprintln!("Output path must include a file extension (e.g., 'my_database.db').");
            exit(1);
        }
        _ => {}
    }

    if output_path.is_file() {
        eprintln!("File already exists at {output_path:#?}!");
        exit(1);
    }

    println!("Creating database at {output_path:#?}");
    let connection = Connection::open(output_path)?;

    initialize_db(&connection)?;

    println!("Creating test user test@example.com with password 'test'...");

    let password_hash = PasswordHash::new(
        ValidatedPassword::new_unchecked("test"),
        PasswordHash::DEFAULT_COST,
    )?;
    let user = create_user(
        Email::new("test@example.com")?,
        password_hash,
        &connection,
    )?;

    println!("Recording sample expenses...");

    let today = OffsetDateTime::now_utc().date();
    let samples = [
        (0, 120.0, "Food", "groceries"),
        (0, 45.5, "Transport", "bus fare"),
        (1, 250.0, "Shopping", "shoes"),
        (3, 80.0, "Food", "dinner out"),
        (7, 300.0, "Entertainment", "concert ticket"),
    ];

    for (days_ago, amount, category, description) in samples {
        let date = today - time::Duration::days(days_ago);

        connection.execute(
            "INSERT INTO expense (user_id, date, amount, category, description)
            VALUES (?1, ?2, ?3, ?4, ?5)",
            (
                user.id.as_i64(),
                format_date_key(date),
                amount,
                category,
                description,
            ),
        )?;
    }

    println!("Success!");

    Ok(())
}
