// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use crate::config::settings::Settings;
use crate::domain::models::scrape_report::ScrapeReport;
use crate::domain::services::serp_scraper::SerpScraper;
use crate::engines::chromium_engine::ChromiumSessionFactory;
use crate::infrastructure::database::client_records::{ClientRecords, NewClient};
use crate::infrastructure::database::connection;
use crate::infrastructure::database::entities::client;
use crate::infrastructure::database::inspector::{ColumnInfo, SchemaInspector};
use crate::infrastructure::page_fetcher::PageFetcher;
use crate::infrastructure::proxy::UpstreamProxy;
use crate::infrastructure::search::EngineKind;
use crate::presentation::routes::{self, AppComponents};
use crate::utils::env_file;
use clap::{Parser, Subcommand};
use dialoguer::{theme::ColorfulTheme, Input, Password};
use std::path::PathBuf;
use std::sync::Arc;
use tokio::net::TcpListener;
use tracing::info;
use uuid::Uuid;

#[derive(Debug, Parser)]
#[command(
    name = "serpscout",
    about = "Search-result scraper and admin tooling for the client portal",
    version
)]
pub struct Cli {
    /// Emit logs as JSON
    #[arg(long, global = true)]
    pub log_json: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Start the HTTP server (proxies, fetch function, SERP endpoint)
    Serve,

    /// Scrape the top organic results for a keyword
    Search {
        /// Keyword to search for
        keyword: String,

        /// Search engine to drive
        #[arg(short, long, value_enum, default_value_t = EngineKind::Bing)]
        engine: EngineKind,

        /// Print the full scrape report instead of the result list
        #[arg(long)]
        report: bool,
    },

    /// Fetch a page's raw HTML through the fetch function
    Fetch {
        /// Absolute http(s) URL
        url: String,
    },

    /// Database inspection and client-record maintenance
    Db {
        /// Print JSON instead of plain text
        #[arg(long, global = true)]
        json: bool,

        #[command(subcommand)]
        command: DbCommand,
    },

    /// Environment-file maintenance
    Env {
        #[command(subcommand)]
        command: EnvCommand,
    },
}

#[derive(Debug, Subcommand)]
pub enum DbCommand {
    /// List tables in the public schema
    Tables,

    /// Show the columns of a table
    Describe { table: String },

    /// Count the rows of a table
    Count { table: String },

    /// Find clients by business name (case-insensitive)
    FindClient { business_name: String },

    /// Update one field of a client record
    PatchClient {
        id: Uuid,
        /// One of business_name, website, contact_email, industry, location
        field: String,
        value: String,
    },

    /// Replace every client with this business name by a fresh record
    RebuildClient {
        #[arg(long)]
        business_name: String,
        #[arg(long)]
        website: Option<String>,
        #[arg(long)]
        contact_email: Option<String>,
        #[arg(long)]
        industry: Option<String>,
        #[arg(long)]
        location: Option<String>,
    },
}

#[derive(Debug, Subcommand)]
pub enum EnvCommand {
    /// List recognized keys missing from the env file
    Check {
        #[arg(long, default_value = ".env")]
        path: PathBuf,
    },

    /// Prompt for each missing key and append the answers
    Setup {
        #[arg(long, default_value = ".env")]
        path: PathBuf,
    },
}

/// 执行命令
pub async fn run(command: Commands, settings: Settings) -> anyhow::Result<()> {
    match command {
        Commands::Serve => serve(settings).await,
        Commands::Search {
            keyword,
            engine,
            report,
        } => search(&settings, &keyword, engine, report).await,
        Commands::Fetch { url } => fetch(&settings, &url).await,
        Commands::Db { json, command } => db(&settings, command, json).await,
        Commands::Env { command } => env(command),
    }
}

fn build_scraper(settings: &Settings) -> SerpScraper {
    SerpScraper::new(Arc::new(ChromiumSessionFactory), settings.scraper.clone())
}

async fn serve(settings: Settings) -> anyhow::Result<()> {
    let components = AppComponents {
        scraper: Arc::new(build_scraper(&settings)),
        proxy: Arc::new(UpstreamProxy::new(
            settings.gemini.clone(),
            settings.backend.clone(),
        )?),
        fetcher: Arc::new(PageFetcher::new(
            settings.fetch.clone(),
            &settings.scraper.user_agent,
        )?),
    };

    let app = routes::routes(components);
    let addr = format!("{}:{}", settings.server.host, settings.server.port);
    let listener = TcpListener::bind(&addr).await?;
    info!("Server listening on {}", addr);

    axum::serve(listener, app).await?;
    Ok(())
}

async fn search(
    settings: &Settings,
    keyword: &str,
    engine: EngineKind,
    full_report: bool,
) -> anyhow::Result<()> {
    let scraper = build_scraper(settings);
    let engine = engine.build();
    let report: ScrapeReport = scraper.scrape_report(engine.as_ref(), keyword).await;

    if full_report {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        println!("{}", serde_json::to_string_pretty(&report.results)?);
    }
    Ok(())
}

async fn fetch(settings: &Settings, url: &str) -> anyhow::Result<()> {
    let fetcher = PageFetcher::new(settings.fetch.clone(), &settings.scraper.user_agent)?;
    let page = fetcher.fetch(url).await?;
    println!("{}", page.body);
    Ok(())
}

async fn db(settings: &Settings, command: DbCommand, json: bool) -> anyhow::Result<()> {
    let db = connection::create_pool(&settings.database).await?;
    let inspector = SchemaInspector::new(&db);
    let records = ClientRecords::new(&db);

    match command {
        DbCommand::Tables => {
            let tables = inspector.list_tables().await?;
            if json {
                println!("{}", serde_json::to_string_pretty(&tables)?);
            } else {
                tables.iter().for_each(|t| println!("{}", t));
            }
        }
        DbCommand::Describe { table } => {
            let columns = inspector.describe_table(&table).await?;
            if json {
                println!("{}", serde_json::to_string_pretty(&columns)?);
            } else {
                print!("{}", format_columns(&columns));
            }
        }
        DbCommand::Count { table } => {
            let count = inspector.count_rows(&table).await?;
            if json {
                println!("{}", serde_json::json!({ "table": table, "rows": count }));
            } else {
                println!("{}: {} rows", table, count);
            }
        }
        DbCommand::FindClient { business_name } => {
            let clients = records.find_clients(&business_name).await?;
            if json {
                println!("{}", serde_json::to_string_pretty(&clients)?);
            } else if clients.is_empty() {
                println!("No clients matching '{}'", business_name);
            } else {
                clients.iter().for_each(|c| println!("{}", format_client(c)));
            }
        }
        DbCommand::PatchClient { id, field, value } => {
            let rows = records.patch_client(id, &field, &value).await?;
            if json {
                println!("{}", serde_json::json!({ "id": id, "rows_affected": rows }));
            } else {
                println!("Updated {} on {} ({} row)", field, id, rows);
            }
        }
        DbCommand::RebuildClient {
            business_name,
            website,
            contact_email,
            industry,
            location,
        } => {
            let id = records
                .rebuild_client(NewClient {
                    business_name,
                    website,
                    contact_email,
                    industry,
                    location,
                })
                .await?;
            if json {
                println!("{}", serde_json::json!({ "id": id }));
            } else {
                println!("Rebuilt client {}", id);
            }
        }
    }

    db.close().await?;
    Ok(())
}

fn env(command: EnvCommand) -> anyhow::Result<()> {
    match command {
        EnvCommand::Check { path } => {
            let missing = env_file::missing_keys(&path)?;
            if missing.is_empty() {
                println!("All recognized keys are set in {}", path.display());
            } else {
                missing.iter().for_each(|k| println!("{}", k));
            }
        }
        EnvCommand::Setup { path } => {
            let missing = env_file::missing_keys(&path)?;
            if missing.is_empty() {
                println!("Nothing to do: all recognized keys are set");
                return Ok(());
            }

            let theme = ColorfulTheme::default();
            let mut entries = Vec::new();
            for key in missing {
                let answer: String = if is_secret(key) {
                    Password::with_theme(&theme)
                        .with_prompt(format!("{} (leave empty to skip)", key))
                        .allow_empty_password(true)
                        .interact()?
                } else {
                    Input::with_theme(&theme)
                        .with_prompt(format!("{} (leave empty to skip)", key))
                        .allow_empty(true)
                        .interact_text()?
                };

                let answer = answer.trim();
                if answer.is_empty() {
                    continue;
                }
                let value = if key.ends_with("PRIVATE_KEY") {
                    answer.replace("\\n", "\n")
                } else {
                    answer.to_string()
                };
                entries.push((key.to_string(), value));
            }

            let written = env_file::append_entries(&path, &entries)?;
            println!("Wrote {} key(s) to {}", written.len(), path.display());
        }
    }
    Ok(())
}

fn is_secret(key: &str) -> bool {
    key.ends_with("_KEY")
}

/// 以对齐的文本表格输出列信息
pub fn format_columns(columns: &[ColumnInfo]) -> String {
    let width = columns
        .iter()
        .map(|c| c.column_name.len())
        .max()
        .unwrap_or(0)
        .max("column".len());

    let mut out = format!("{:<width$}  {}  {}\n", "column", "type", "nullable", width = width);
    for c in columns {
        out.push_str(&format!(
            "{:<width$}  {}  {}\n",
            c.column_name,
            c.data_type,
            if c.nullable { "yes" } else { "no" },
            width = width
        ));
    }
    out
}

fn format_client(c: &client::Model) -> String {
    format!(
        "{}  {}  website={}  email={}  industry={}  location={}",
        c.id,
        c.business_name,
        c.website.as_deref().unwrap_or("-"),
        c.contact_email.as_deref().unwrap_or("-"),
        c.industry.as_deref().unwrap_or("-"),
        c.location.as_deref().unwrap_or("-"),
    )
}
