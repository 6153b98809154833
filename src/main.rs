//! WorkHub Console - operator CLI for the WorkHub admin backend.
//!
//! Thin shell over the client library: sign in, inspect tenants and
//! billing, tail the audit log. Listing commands fall back to cached
//! snapshots when the backend is unreachable.

use std::io::{self, Write};
use std::sync::Arc;

use anyhow::Result;
use tracing::info;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use workhub_console::api::{AdminClient, ApiError};
use workhub_console::auth::{FileStore, SessionStore};
use workhub_console::cache::CacheManager;
use workhub_console::config::Config;
use workhub_console::models::{Company, LogLevel, LogQuery};

/// Initialize the tracing subscriber for logging
fn init_tracing() {
    // RUST_LOG controls verbosity (e.g. RUST_LOG=debug)
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));

    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(io::stderr))
        .with(filter)
        .init();
}

fn print_usage() {
    eprintln!("Usage: workhub-console <command>");
    eprintln!();
    eprintln!("Commands:");
    eprintln!("  login [email]    Sign in and store the session");
    eprintln!("  logout           Revoke the session and clear stored credentials");
    eprintln!("  whoami           Show the signed-in user");
    eprintln!("  companies        List tenant companies (cached for offline use)");
    eprintln!("  stats            Show dashboard aggregates");
    eprintln!("  logs [level]     Show recent audit log entries");
    eprintln!("  health           Show backend service health");
}

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env file if present (silently ignore if not found)
    let _ = dotenvy::dotenv();
    init_tracing();

    let args: Vec<String> = std::env::args().collect();
    let command = args.get(1).map(String::as_str).unwrap_or("help");

    let mut config = Config::load().unwrap_or_default();
    let store: Arc<dyn SessionStore> = Arc::new(FileStore::open(Config::data_dir()?)?);
    let client = AdminClient::new(config.api_url(), store)?;

    info!(command, "workhub-console starting");

    match command {
        "login" => login(&client, &mut config, args.get(2).cloned()).await,
        "logout" => {
            client.logout().await?;
            println!("Signed out.");
            Ok(())
        }
        "whoami" => whoami(&client),
        "companies" => companies(&client).await,
        "stats" => stats(&client).await,
        "logs" => logs(&client, args.get(2).map(String::as_str)).await,
        "health" => health(&client).await,
        "help" | "--help" | "-h" => {
            print_usage();
            Ok(())
        }
        other => {
            eprintln!("Unknown command: {}", other);
            print_usage();
            std::process::exit(2);
        }
    }
}

/// Turn an expired session into an actionable message before propagating
fn report(err: ApiError) -> anyhow::Error {
    if err.requires_login() {
        eprintln!("Your session has expired. Run `workhub-console login` to sign in again.");
    }
    err.into()
}

async fn login(client: &AdminClient, config: &mut Config, email_arg: Option<String>) -> Result<()> {
    let email = match email_arg {
        Some(email) => email,
        None => {
            let default = config.last_email.clone().unwrap_or_default();
            if default.is_empty() {
                print!("Email: ");
            } else {
                print!("Email [{}]: ", default);
            }
            io::stdout().flush()?;

            let mut input = String::new();
            io::stdin().read_line(&mut input)?;
            let input = input.trim();
            if input.is_empty() {
                default
            } else {
                input.to_string()
            }
        }
    };

    if email.is_empty() {
        anyhow::bail!("An email address is required");
    }

    let password = rpassword::prompt_password("Password: ")?;

    let user = client.login(&email, &password).await.map_err(report)?;

    config.last_email = Some(email);
    config.save()?;

    println!("Signed in as {} ({})", user.full_name(), user.role);
    Ok(())
}

fn whoami(client: &AdminClient) -> Result<()> {
    match client.current_user() {
        Some(user) => {
            println!("{} <{}> - {}", user.full_name(), user.email, user.role);
            Ok(())
        }
        None => {
            eprintln!("Not signed in. Run `workhub-console login`.");
            std::process::exit(1);
        }
    }
}

async fn companies(client: &AdminClient) -> Result<()> {
    let cache = CacheManager::new(Config::cache_dir()?)?;

    let rows: Vec<Company> = match client.list_companies().await {
        Ok(page) => {
            cache.save("companies", &page.results)?;
            page.results
        }
        Err(ApiError::Network(e)) => match cache.load::<Vec<Company>>("companies")? {
            Some(cached) => {
                eprintln!(
                    "Backend unreachable, showing cached data ({}m old)",
                    cached.age_minutes()
                );
                cached.data
            }
            None => return Err(anyhow::anyhow!(e).context("Backend unreachable and no cached data")),
        },
        Err(e) => return Err(report(e)),
    };

    if rows.is_empty() {
        println!("No companies.");
        return Ok(());
    }
    for company in rows {
        println!(
            "{:>5}  {:<30} {:<10} {:>5} employees  {}",
            company.id,
            company.name,
            company.status_display(),
            company.employee_count,
            company.country.as_deref().unwrap_or("-"),
        );
    }
    Ok(())
}

async fn stats(client: &AdminClient) -> Result<()> {
    let stats = client.dashboard_stats().await.map_err(report)?;
    println!("Companies:            {}", stats.total_companies);
    println!("Active subscriptions: {}", stats.active_subscriptions);
    println!("Monthly revenue:      {:.0}", stats.monthly_revenue);
    println!("Pending invoices:     {}", stats.pending_invoices);
    println!("Signups this month:   {}", stats.signups_this_month);
    Ok(())
}

async fn logs(client: &AdminClient, level_arg: Option<&str>) -> Result<()> {
    let level = match level_arg {
        None => None,
        Some("debug") => Some(LogLevel::Debug),
        Some("info") => Some(LogLevel::Info),
        Some("warning") | Some("warn") => Some(LogLevel::Warning),
        Some("error") => Some(LogLevel::Error),
        Some(other) => anyhow::bail!("Unknown log level: {}", other),
    };

    let query = LogQuery {
        level,
        ..Default::default()
    };
    let page = client.list_logs(&query).await.map_err(report)?;

    for entry in page.results {
        println!(
            "{} {:<5} {:<20} {}",
            entry.timestamp.format("%Y-%m-%d %H:%M:%S"),
            entry.level,
            entry.actor.as_deref().unwrap_or("system"),
            entry.message,
        );
    }
    Ok(())
}

async fn health(client: &AdminClient) -> Result<()> {
    let services = client.service_health().await.map_err(report)?;
    for service in services {
        let latency = service
            .latency_ms
            .map(|ms| format!("{}ms", ms))
            .unwrap_or_else(|| "-".to_string());
        println!("{:<15} {:?}  {}", service.service, service.status, latency);
    }
    Ok(())
}
