//! cfd CLI binary.
//!
//! - `serve`: run the company financials web server
//! - `add-company`: insert or update a company row in the store

mod cli;

use std::sync::Arc;
use std::time::Duration;

use actix_web::middleware::Logger;
use actix_web::{App, HttpServer, web};
use anyhow::{Context, Result, bail};
use clap::Parser;
use tracing::info;
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

use cfd::{
    AppState, Company, CompanyPages, CompanyStore, EDGAR_HOST, EdgarProvider, HttpConfig,
    SqliteStore, Views, YahooProvider, server,
};
use cli::{AddCompanyArgs, Cli, Commands, ServeArgs, normalize_cik};

#[actix_web::main]
async fn main() -> Result<()> {
    // Load environment variables from .env file
    dotenv::dotenv().ok();

    let cli = Cli::parse();

    tracing_subscriber::registry()
        .with(fmt::layer())
        .with(EnvFilter::try_new(&cli.log_level).context("invalid --log-level")?)
        .init();

    let store = SqliteStore::new(&cli.database)
        .with_context(|| format!("failed to open database {}", cli.database.display()))?;

    match cli.command {
        Commands::Serve(args) => serve(store, args).await,
        Commands::AddCompany(args) => add_company(&store, args).await,
    }
}

async fn serve(store: SqliteStore, args: ServeArgs) -> Result<()> {
    let ServeArgs {
        host,
        port,
        contact,
        timeout_secs,
        public_dir,
        no_host_header,
    } = args;

    let mut config = HttpConfig::new(contact).with_timeout(Duration::from_secs(timeout_secs));
    if !no_host_header {
        config = config.with_host_header(EDGAR_HOST);
    }

    let pages = CompanyPages::new(
        Arc::new(store),
        Arc::new(EdgarProvider::new(&config)?),
        Arc::new(YahooProvider::new(&config)?),
    );
    let views = Views::new().context("failed to compile templates")?;
    let state = web::Data::new(AppState::new(pages, views));

    info!(%host, port, public_dir = %public_dir.display(), "Starting server");

    HttpServer::new(move || {
        App::new()
            .wrap(Logger::default())
            .app_data(state.clone())
            .configure(|cfg| server::configure(cfg, &public_dir))
    })
    .bind((host.as_str(), port))
    .with_context(|| format!("failed to bind {host}:{port}"))?
    .run()
    .await?;

    Ok(())
}

async fn add_company(store: &SqliteStore, args: AddCompanyArgs) -> Result<()> {
    let Some(cik) = normalize_cik(&args.cik) else {
        bail!("CIK must be up to 10 digits, got '{}'", args.cik);
    };

    let mut company = Company::new(args.ticker, cik, args.name);
    if let Some(exchange) = args.exchange {
        company = company.with_exchange(exchange);
    }

    // Keep financials that were already fetched for this ticker.
    if let Some(existing) = store.get_company(&company.ticker).await? {
        if existing.financials.is_some() {
            let updated_at = store.financials_updated_at(&company.ticker)?;
            info!(
                ticker = %company.ticker,
                updated_at = ?updated_at,
                "Keeping stored financials"
            );
        }
        company.financials = existing.financials;
    }

    store.upsert_company(&company)?;
    info!(ticker = %company.ticker, cik = %company.cik, "Company stored");
    Ok(())
}
