//! # posai: Terminal Front-End for POS.AI
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                          posai process                                  │
//! │                                                                         │
//! │   argv ──► cli::Cli (clap)                                              │
//! │              │                                                          │
//! │              ▼                                                          │
//! │   config::AppConfig::load  (toml file ──► POSAI_* env ──► --db)         │
//! │              │                                                          │
//! │              ├── no subcommand ──► home portal menu                     │
//! │              │                                                          │
//! │              ▼                                                          │
//! │   posai_db::Database::new  (create file, migrate)                       │
//! │              │                                                          │
//! │              ▼                                                          │
//! │   commands::dispatch ──► setup | category | inventory | sale            │
//! │              │                                                          │
//! │              ▼                                                          │
//! │   render::Output  (text tables, or one JSON value per line)             │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

pub mod cli;
pub mod commands;
pub mod config;
pub mod error;
pub mod render;

use serde::Serialize;
use std::io::{BufRead, Write};
use tracing::{debug, error, info};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use cli::Cli;
use config::AppConfig;
use error::{CliError, CliResult};
use posai_db::{Database, DbConfig};
use render::Output;

/// Logs go to stderr so stdout stays clean for tables and JSON.
///
/// Default filter `warn,posai=info,sqlx=warn`; override with `RUST_LOG`.
pub fn init_tracing() {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("warn,posai=info,sqlx=warn"));

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_target(false).with_writer(std::io::stderr))
        .init();
}

/// Runs one command and returns the process exit code.
///
/// On failure the error goes to `stderr` as `error: <message>`, or to
/// `stdout` as one `{code, message}` JSON line when `--json` is set.
pub async fn run<R: BufRead, W: Write, E: Write>(
    cli: Cli,
    input: R,
    mut stdout: W,
    mut stderr: E,
) -> i32 {
    let json = cli.json;

    match execute(cli, input, &mut stdout).await {
        Ok(()) => 0,
        Err(err) => {
            if let Err(e) = report_error(&err, json, &mut stdout, &mut stderr) {
                error!(error = %e, "Could not print error");
            }
            1
        }
    }
}

fn report_error<W: Write, E: Write>(
    err: &CliError,
    json: bool,
    stdout: &mut W,
    stderr: &mut E,
) -> std::io::Result<()> {
    if json {
        serde_json::to_writer(&mut *stdout, err)?;
        writeln!(stdout)?;
        stdout.flush()
    } else {
        writeln!(stderr, "error: {}", err)
    }
}

/// Loads configuration, opens the database and runs one command.
pub async fn execute<R: BufRead, W: Write>(cli: Cli, input: R, writer: W) -> CliResult<()> {
    let mut config = AppConfig::load(cli.config.as_deref())?;
    if let Some(db) = cli.db {
        config.database_path = Some(db);
    }

    let mut out = Output::new(writer, cli.json, config);

    let command = match cli.command {
        Some(command) => command,
        None => {
            home(&mut out)?;
            return out.flush();
        }
    };

    let database_path = out.config().resolve_database_path();
    debug!(path = %database_path.display(), "Opening database");

    let db = Database::new(DbConfig::new(&database_path)).await?;
    let path_text = database_path.display().to_string();

    let result = commands::dispatch(command, &db, &path_text, input, &mut out).await;

    db.close().await;
    info!("Database closed");

    result?;
    out.flush()
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct HomeMenu {
    store_name: String,
    portals: Vec<Portal>,
}

#[derive(Debug, Serialize)]
struct Portal {
    name: &'static str,
    command: &'static str,
}

/// The landing screen: store name and the two portals.
fn home<W: Write>(out: &mut Output<W>) -> CliResult<()> {
    let menu = HomeMenu {
        store_name: out.config().store_name.clone(),
        portals: vec![
            Portal {
                name: "Sale Portal",
                command: "posai sale session",
            },
            Portal {
                name: "Inventory Portal",
                command: "posai inventory --help",
            },
        ],
    };

    out.emit(&menu, |o, m| {
        o.line(format!("Welcome to {}", m.store_name))?;
        o.line("")?;
        for portal in &m.portals {
            o.line(format!("  {:<18} {}", portal.name, portal.command))?;
        }
        Ok(())
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;
    use std::io::Cursor;
    use std::path::Path;

    struct Workspace {
        dir: tempfile::TempDir,
    }

    impl Workspace {
        fn new() -> Self {
            let dir = tempfile::tempdir().unwrap();
            std::fs::write(dir.path().join("posai.toml"), "store_name = \"Test Mart\"\n").unwrap();
            Workspace { dir }
        }

        fn path(&self, name: &str) -> String {
            self.dir.path().join(name).display().to_string()
        }

        async fn run(&self, args: &[&str]) -> CliResult<String> {
            self.run_with_input(args, "").await
        }

        async fn run_with_input(&self, args: &[&str], input: &str) -> CliResult<String> {
            let config = self.path("posai.toml");
            let db = self.path("data/posai.db");

            let mut argv = vec!["posai", "--config", config.as_str(), "--db", db.as_str()];
            argv.extend_from_slice(args);

            let cli = Cli::try_parse_from(argv).unwrap();
            let mut buf = Vec::new();
            execute(cli, Cursor::new(input.to_string()), &mut buf).await?;
            Ok(String::from_utf8(buf).unwrap())
        }
    }

    #[tokio::test]
    async fn test_home_menu_uses_store_name() {
        let ws = Workspace::new();
        let printed = ws.run(&[]).await.unwrap();

        assert!(printed.contains("Welcome to Test Mart"));
        assert!(printed.contains("Sale Portal"));
        assert!(printed.contains("Inventory Portal"));
        assert!(!Path::new(&ws.path("data/posai.db")).exists());
    }

    #[tokio::test]
    async fn test_end_to_end_inventory_and_sale() {
        let ws = Workspace::new();

        let printed = ws.run(&["init"]).await.unwrap();
        assert!(printed.contains("CATEGORIES, PRODUCTS, SUPPLIERS"));
        assert!(Path::new(&ws.path("data/posai.db")).exists());

        ws.run(&["seed"]).await.unwrap();
        ws.run(&[
            "inventory", "save", "--sku", "MILK-1L", "--name", "Milk 1L", "--category", "3",
            "--cost", "50", "--price", "62.5", "--stock", "8",
        ])
        .await
        .unwrap();

        let printed = ws.run(&["inventory", "lookup", "MILK-1L"]).await.unwrap();
        assert!(printed.contains("Category:       Home & Kitchen (3)"));

        let printed = ws
            .run_with_input(&["sale", "session"], "MILK-1L 2\ncheckout\nquit\n")
            .await
            .unwrap();
        assert!(printed.contains("Test Mart - Receipt"));
        assert!(printed.contains("Total: Rs. 125.00"));

        let printed = ws.run(&["--json", "inventory", "recent"]).await.unwrap();
        let rows: serde_json::Value = serde_json::from_str(printed.trim()).unwrap();
        assert_eq!(rows[0]["sku"], "MILK-1L");
        assert_eq!(rows[0]["currentStock"], 6);
    }

    #[tokio::test]
    async fn test_errors_surface_with_codes() {
        let ws = Workspace::new();

        let err = ws
            .run(&["sale", "checkout", "--item", "NOPE-1"])
            .await
            .unwrap_err();
        assert_eq!(err.code, error::ErrorCode::NotFound);

        let cli = Cli::try_parse_from(["posai", "--config", "/no/such/posai.toml", "init"]).unwrap();
        let err = execute(cli, Cursor::new(String::new()), Vec::new())
            .await
            .unwrap_err();
        assert_eq!(err.code, error::ErrorCode::ConfigError);
    }

    #[tokio::test]
    async fn test_run_reports_json_error_on_stdout() {
        let ws = Workspace::new();
        let config = ws.path("posai.toml");
        let db = ws.path("data/posai.db");
        let cli = Cli::try_parse_from([
            "posai", "--json", "--config", &config, "--db", &db, "inventory", "lookup", "",
        ])
        .unwrap();

        let (mut stdout, mut stderr) = (Vec::new(), Vec::new());
        let code = run(cli, Cursor::new(String::new()), &mut stdout, &mut stderr).await;

        assert_eq!(code, 1);
        assert!(stderr.is_empty());
        let printed = String::from_utf8(stdout).unwrap();
        assert_eq!(printed.lines().count(), 1);
        let json: serde_json::Value = serde_json::from_str(printed.trim()).unwrap();
        assert_eq!(json["code"], "VALIDATION_ERROR");
        assert!(json["message"].as_str().unwrap().to_lowercase().contains("sku"));
    }

    #[tokio::test]
    async fn test_run_reports_text_error_on_stderr() {
        let cli = Cli::try_parse_from(["posai", "--config", "/no/such/posai.toml", "init"]).unwrap();

        let (mut stdout, mut stderr) = (Vec::new(), Vec::new());
        let code = run(cli, Cursor::new(String::new()), &mut stdout, &mut stderr).await;

        assert_eq!(code, 1);
        assert!(stdout.is_empty());
        assert!(String::from_utf8(stderr).unwrap().starts_with("error: "));
    }

    #[tokio::test]
    async fn test_run_success_exits_zero() {
        let ws = Workspace::new();
        let config = ws.path("posai.toml");
        let cli = Cli::try_parse_from(["posai", "--config", &config]).unwrap();

        let (mut stdout, mut stderr) = (Vec::new(), Vec::new());
        let code = run(cli, Cursor::new(String::new()), &mut stdout, &mut stderr).await;

        assert_eq!(code, 0);
        assert!(stderr.is_empty());
        assert!(String::from_utf8(stdout).unwrap().contains("Welcome to Test Mart"));
    }
}
