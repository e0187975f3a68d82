//! Command-line front end: one list or write per invocation, results
//! printed as JSON lines.

use std::sync::Arc;

use clap::{Args, Parser, Subcommand};
use serde::Serialize;
use serde_json::json;

use crate::api::http::ReqwestTransport;
use crate::controller::errors::ControllerError;
use crate::controller::state::{FetchOutcome, ListOptions};
use crate::domain::record::Record;
use crate::domain::resource::Resource;
use crate::domain::types::EntityId;
use crate::filters::Filters;
use crate::forms::login::LoginForm;
use crate::models::config::DashboardConfig;
use crate::services::auth;
use crate::services::notify::LogNotificationSink;
use crate::services::screen::ResourceScreen;
use crate::services::{ServiceError, ServiceResult};
use crate::session::SessionStore;
use crate::session::file::FileSessionStore;

type CliScreen = ResourceScreen<Record, ReqwestTransport, FileSessionStore, LogNotificationSink>;

#[derive(Debug, Parser)]
#[command(name = "pushkind-inventory")]
#[command(about = "Browse and edit inventory collections from the terminal")]
pub struct Cli {
    /// YAML configuration file
    #[arg(long, global = true, env = "INVENTORY_CONFIG")]
    pub config: Option<String>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Sign in and store the session token
    Login { username: String, password: String },
    /// Forget the stored session
    Logout,
    /// Print one page of a collection
    List(ListArgs),
    /// Delete one record
    Delete { resource: Resource, id: String },
}

#[derive(Debug, Args)]
pub struct ListArgs {
    pub resource: Resource,

    #[arg(long, default_value_t = 1)]
    pub page: usize,

    #[arg(long = "page-size")]
    pub page_size: Option<usize>,

    /// Client-side search over the fetched page
    #[arg(long)]
    pub search: Option<String>,

    /// Server-side filter as KEY=VALUE; repeatable
    #[arg(long = "filter", value_parser = parse_filter)]
    pub filters: Vec<(String, String)>,
}

fn parse_filter(raw: &str) -> Result<(String, String), String> {
    raw.split_once('=')
        .map(|(key, value)| (key.trim().to_string(), value.trim().to_string()))
        .filter(|(key, _)| !key.is_empty())
        .ok_or_else(|| format!("expected KEY=VALUE, got `{raw}`"))
}

fn print_line<T: Serialize>(value: &T) -> ServiceResult<()> {
    let line = serde_json::to_string(value).map_err(|err| ServiceError::Unexpected(err.to_string()))?;
    println!("{line}");
    Ok(())
}

fn screen(
    config: &DashboardConfig,
    store: Arc<FileSessionStore>,
    resource: Resource,
) -> ServiceResult<CliScreen> {
    if store.token().is_none() {
        return Err(ServiceError::NotSignedIn);
    }
    let transport = Arc::new(ReqwestTransport::from_config(config, store.clone())?);
    Ok(ResourceScreen::for_resource(
        resource,
        transport,
        store,
        ListOptions::from_config(config),
        Arc::new(LogNotificationSink),
    ))
}

/// Executes one command against the configured backend.
pub async fn run(config: &DashboardConfig, command: Command) -> ServiceResult<()> {
    let store = Arc::new(FileSessionStore::new(&config.session_file));

    match command {
        Command::Login { username, password } => {
            let transport = ReqwestTransport::from_config(config, store.clone())?;
            let session =
                auth::login(&transport, store.as_ref(), LoginForm::new(username, password)).await?;
            print_line(&json!({"signed_in": true, "user": session.user}))
        }
        Command::Logout => {
            auth::logout(store.as_ref())?;
            print_line(&json!({"signed_in": false}))
        }
        Command::List(args) => list(config, store, args).await,
        Command::Delete { resource, id } => {
            let id = EntityId::new(id)?;
            let screen = screen(config, store, resource)?;
            screen.submit_delete(&id).await?;
            print_line(&json!({"deleted": id}))
        }
    }
}

async fn list(
    config: &DashboardConfig,
    store: Arc<FileSessionStore>,
    args: ListArgs,
) -> ServiceResult<()> {
    let screen = screen(config, store, args.resource)?;
    let controller = screen.controller();

    let page_size = controller
        .options()
        .clamp_page_size(args.page_size.unwrap_or(config.default_page_size));
    let filters: Filters = args.filters.into_iter().collect();

    match controller.fetch_page(args.page, page_size, &filters).await {
        FetchOutcome::Applied => {}
        FetchOutcome::SessionExpired => {
            return Err(ControllerError::SessionExpired.into());
        }
        FetchOutcome::Abandoned | FetchOutcome::Discarded => {
            return Err(ControllerError::Abandoned.into());
        }
        FetchOutcome::Failed => {
            let message = controller
                .error()
                .map(|err| err.message)
                .unwrap_or_default();
            return Err(ServiceError::Unexpected(message));
        }
    }

    if let Some(term) = args.search {
        controller.set_search_term(term);
    }

    let snapshot = controller.snapshot();
    for item in &snapshot.page.items {
        print_line(item)?;
    }
    print_line(&json!({
        "page": snapshot.page.page,
        "page_size": snapshot.page.page_size,
        "total_pages": snapshot.page.total_pages,
        "total_count": snapshot.page.total_count,
        "filters": snapshot.filters,
    }))
}
