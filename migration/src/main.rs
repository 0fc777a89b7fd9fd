use std::{env, fs, path::Path};

mod runner;

#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();

    let url = env::var("DATABASE_URL").expect("DATABASE_URL must be set");
    let args: Vec<String> = env::args().collect();

    match args.get(1).map(|s| s.as_str()) {
        Some("clean") => {
            remove_db_file(&url);
        }
        Some("fresh") => {
            remove_db_file(&url);
            create_db_dir(&url);
            runner::run_all_migrations(&with_create_mode(&url)).await;
        }
        _ => {
            create_db_dir(&url);
            runner::run_all_migrations(&with_create_mode(&url)).await;
        }
    }
}

/// Extracts the on-disk file behind a SQLite URL or bare path; `None` for
/// server-backed DSNs, which have nothing local to clean.
fn sqlite_file(url: &str) -> Option<&str> {
    if let Some(rest) = url.strip_prefix("sqlite://") {
        Some(rest.split('?').next().unwrap_or(rest))
    } else if url.contains("://") {
        None
    } else {
        Some(url)
    }
}

fn with_create_mode(url: &str) -> String {
    match sqlite_file(url) {
        Some(path) => format!("sqlite://{}?mode=rwc", path),
        None => url.to_string(),
    }
}

fn remove_db_file(url: &str) {
    let Some(path) = sqlite_file(url) else {
        println!("Not a SQLite database, nothing to clean: {}", url);
        return;
    };
    let db_path = Path::new(path);
    if db_path.exists() {
        fs::remove_file(db_path).expect("Failed to delete DB file");
        println!("Deleted DB: {}", db_path.display());
    } else {
        println!("DB file does not exist: {}", db_path.display());
    }
}

fn create_db_dir(url: &str) {
    if let Some(path) = sqlite_file(url) {
        if let Some(parent) = Path::new(path).parent() {
            fs::create_dir_all(parent).expect("Failed to create DB directory");
        }
    }
}
