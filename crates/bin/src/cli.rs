//! Command-line arguments.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

#[derive(Debug, Parser)]
#[command(name = "cfd")]
#[command(about = "Company financials dashboard", long_about = None)]
#[command(version)]
pub(crate) struct Cli {
    #[command(subcommand)]
    pub(crate) command: Commands,

    /// Tracing filter directive, e.g. `info` or `cfd=debug,actix_web=info`
    #[arg(long, global = true, env = "RUST_LOG", default_value = "info")]
    pub(crate) log_level: String,

    /// SQLite database file
    #[arg(long, global = true, env = "CFD_DATABASE", default_value = "cfd.sqlite3")]
    pub(crate) database: PathBuf,
}

#[derive(Debug, Subcommand)]
pub(crate) enum Commands {
    /// Run the web server
    Serve(ServeArgs),

    /// Insert or update a company row
    AddCompany(AddCompanyArgs),
}

#[derive(Debug, Args)]
pub(crate) struct ServeArgs {
    /// Address to bind
    #[arg(long, env = "CFD_HOST", default_value = "127.0.0.1")]
    pub(crate) host: String,

    /// Port to bind
    #[arg(long, env = "CFD_PORT", default_value_t = 8080)]
    pub(crate) port: u16,

    /// Contact e-mail sent as the User-Agent to SEC EDGAR and Yahoo Finance
    #[arg(long, env = "CFD_CONTACT")]
    pub(crate) contact: String,

    /// Timeout for each upstream request, in seconds
    #[arg(long, env = "CFD_HTTP_TIMEOUT_SECS", default_value_t = 10)]
    pub(crate) timeout_secs: u64,

    /// Directory served under /public
    #[arg(long, env = "CFD_PUBLIC_DIR", default_value = "public")]
    pub(crate) public_dir: PathBuf,

    /// Do not send `Host: www.sec.gov` to EDGAR
    #[arg(long)]
    pub(crate) no_host_header: bool,
}

#[derive(Debug, Args)]
pub(crate) struct AddCompanyArgs {
    /// Ticker symbol
    #[arg(long)]
    pub(crate) ticker: String,

    /// SEC CIK; shorter numbers are zero-padded to 10 digits
    #[arg(long)]
    pub(crate) cik: String,

    /// Company name
    #[arg(long)]
    pub(crate) name: String,

    /// Primary exchange
    #[arg(long)]
    pub(crate) exchange: Option<String>,
}

/// Zero-pads a numeric CIK to the 10 digits EDGAR expects.
pub(crate) fn normalize_cik(cik: &str) -> Option<String> {
    let cik = cik.trim();
    let valid = !cik.is_empty() && cik.len() <= 10 && cik.bytes().all(|b| b.is_ascii_digit());
    valid.then(|| format!("{cik:0>10}"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_serve_defaults() {
        let cli = Cli::try_parse_from(["cfd", "serve", "--contact", "someone@example.com"]).unwrap();
        let Commands::Serve(args) = cli.command else {
            panic!("expected serve");
        };
        assert_eq!(args.contact, "someone@example.com");
        assert!(!args.no_host_header);
        assert!(args.port > 0);
    }

    #[test]
    fn test_add_company() {
        let cli = Cli::try_parse_from([
            "cfd",
            "add-company",
            "--ticker",
            "aapl",
            "--cik",
            "320193",
            "--name",
            "Apple Inc.",
            "--database",
            "/tmp/x.sqlite3",
        ])
        .unwrap();
        let Commands::AddCompany(args) = cli.command else {
            panic!("expected add-company");
        };
        assert_eq!(args.ticker, "aapl");
        assert!(args.exchange.is_none());
        assert_eq!(cli.database, PathBuf::from("/tmp/x.sqlite3"));
    }

    #[test]
    fn test_normalize_cik() {
        assert_eq!(normalize_cik("320193").as_deref(), Some("0000320193"));
        assert_eq!(normalize_cik("0000320193").as_deref(), Some("0000320193"));
        assert_eq!(normalize_cik(" 789019 ").as_deref(), Some("0000789019"));
        assert!(normalize_cik("").is_none());
        assert!(normalize_cik("12a").is_none());
        assert!(normalize_cik("12345678901").is_none());
    }
}
