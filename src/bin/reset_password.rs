use std::{error::Error, io, path::Path, process::exit};

use clap::Parser;
use rusqlite::Connection;

use expenseur::auth::{PasswordHash, ValidatedPassword, get_user_by_email};

/// A utility for changing the password of a registered user.
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Args {
    /// File path to the application SQLite database.
    #[arg(long)]
    db_path: String,

    /// The email address of the user whose password should be reset.
    #[arg(long)]
    email: String,
}

fn main() -> Result<(), Box<dyn Error>> {
    let args = Args::parse();
    let db_path = Path::new(&args.db_path);

    if !db_path.is_file() {
        eprintln!("File does not exist at {db_path:#?}!");
        exit(1);
    }

    let connection = Connection::open(db_path)?;
    let user = get_user_by_email(&args.email, &connection)?;
    println!("Resetting password for {}", user.email);

    let password_hash = match prompt_new_password_hash() {
        Some(password_hash) => password_hash,
        None => return Ok(()),
    };

    connection.execute(
        "UPDATE user SET password = ?1 WHERE id = ?2",
        (password_hash.as_ref(), user.id.as_i64()),
    )?;

    println!("Password updated.");

    Ok(())
}

/// Prompt for a new password until a strong, confirmed one is entered.
/// Returns `None` if the prompt is aborted (EOF).
fn prompt_new_password_hash() -> Option<PasswordHash> {
    loop {
        println!();

        let password = match rpassword::prompt_password("Enter a new password: ") {
            Ok(password) => password,
            Err(error) if error.kind() == io::ErrorKind::UnexpectedEof => return None,
            Err(error) => {
                eprintln!("Could not read password from stdin: {error}");
                continue;
            }
        };

        let validated = match ValidatedPassword::new(&password) {
            Ok(validated) => validated,
            Err(error) => {
                eprintln!("{error}");
                continue;
            }
        };

        let confirmation = match rpassword::prompt_password("Confirm the new password: ") {
            Ok(confirmation) => confirmation,
            Err(error) if error.kind() == io::ErrorKind::UnexpectedEof => return None,
            Err(error) => {
                eprintln!("Could not read password from stdin: {error}");
                continue;
            }
        };

        if password != confirmation {
            eprintln!("The passwords do not match, try again.");
            continue;
        }

        match PasswordHash::new(validated, PasswordHash::DEFAULT_COST) {
            Ok(password_hash) => return Some(password_hash),
            Err(error) => {
                eprintln!("Could not hash the password: {error}");
                continue;
            }
        }
    }
}
