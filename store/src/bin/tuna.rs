//! Operator CLI over the dual-mode store.
//!
//! Records live under the configured data directory; set
//! `TUNA_BACKEND_API_URL` to route calls through the REST backend first.
#![cfg_attr(not(any(test, doctest)), deny(clippy::unwrap_used))]
#![cfg_attr(not(any(test, doctest)), deny(clippy::expect_used))]

use std::ffi::OsString;
use std::io;
use std::sync::Arc;

use camino::Utf8PathBuf;
use clap::{Parser, Subcommand};
use mockable::{DefaultClock, DefaultEnv};
use ortho_config::OrthoConfig;
use serde::Serialize;
use serde_json::json;
use tokio::runtime::Builder;
use tracing::warn;
use tracing_subscriber::{EnvFilter, fmt};

use tuna_store::domain::{ApplicationDraft, DatasetItemDraft};
use tuna_store::outbound::local::FileKeyValueStore;
use tuna_store::{Services, StoreSettings, build_services};

/// `tuna` command arguments.
#[derive(Debug, Parser)]
#[command(
    name = "tuna",
    about = "Manage lucky wheel applications and their items",
    version
)]
struct CliArgs {
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Application records.
    #[command(subcommand)]
    Apps(AppsCommand),
    /// Items shown on an application's wheel.
    #[command(subcommand)]
    Items(ItemsCommand),
}

#[derive(Debug, Subcommand)]
enum AppsCommand {
    /// List the current user's applications.
    List,
    /// Create an application and its companion dataset.
    Create {
        name: String,
        #[arg(long = "tag", value_name = "tag")]
        tags: Vec<String>,
        #[arg(long, value_name = "text")]
        description: Option<String>,
    },
    /// Show one application.
    Show { id: String },
    /// Delete an application.
    Delete { id: String },
}

#[derive(Debug, Subcommand)]
enum ItemsCommand {
    /// List an application's items, seeding mock items on first read.
    List { app_id: String },
    /// Add an item to an application.
    Add {
        app_id: String,
        name: String,
        #[arg(long = "tag", value_name = "tag")]
        tags: Vec<String>,
    },
    /// Delete one of an application's items.
    Delete { app_id: String, item_id: String },
}

fn main() -> io::Result<()> {
    if let Err(e) = fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .json()
        .with_writer(io::stderr)
        .try_init()
    {
        warn!(error = %e, "tracing init failed");
    }

    let args = CliArgs::parse();
    let runtime = Builder::new_current_thread()
        .enable_all()
        .build()
        .map_err(|error| io::Error::other(format!("create Tokio runtime: {error}")))?;
    runtime.block_on(async_main(args))
}

async fn async_main(args: CliArgs) -> io::Result<()> {
    let settings = StoreSettings::load_from_iter([OsString::from("tuna")])
        .map_err(|error| io::Error::other(format!("load settings: {error}")))?;
    let services = open_services(&settings)?;

    match args.command {
        Command::Apps(command) => run_apps(&services, command).await,
        Command::Items(command) => run_items(&services, command).await,
    }
}

fn open_services(settings: &StoreSettings) -> io::Result<Services> {
    let data_dir = Utf8PathBuf::from_path_buf(settings.data_dir()).map_err(|path| {
        io::Error::other(format!(
            "data directory '{}' is not valid UTF-8",
            path.display()
        ))
    })?;
    let store = FileKeyValueStore::open(&data_dir)
        .map_err(|error| io::Error::other(format!("open local store: {error}")))?;

    build_services(
        Arc::new(store),
        Arc::new(DefaultEnv::new()),
        Arc::new(DefaultClock),
        settings,
    )
    .map_err(|error| io::Error::other(error.to_string()))
}

async fn run_apps(services: &Services, command: AppsCommand) -> io::Result<()> {
    let applications = &services.applications;
    match command {
        AppsCommand::List => {
            let listed = applications
                .list_for_current_user()
                .await
                .map_err(failed("list applications"))?;
            print_json(&listed)
        }
        AppsCommand::Create {
            name,
            tags,
            description,
        } => {
            let mut draft = ApplicationDraft::new(name).with_tags(tags);
            draft.description = description;
            let created = applications
                .create(draft)
                .await
                .map_err(failed("create application"))?;
            print_json(&created)
        }
        AppsCommand::Show { id } => {
            let application = applications
                .get_by_id(&id)
                .await
                .map_err(failed("show application"))?;
            print_json(&application)
        }
        AppsCommand::Delete { id } => {
            let deleted = applications
                .delete(&id)
                .await
                .map_err(failed("delete application"))?;
            print_json(&json!({ "id": id, "deleted": deleted }))
        }
    }
}

async fn run_items(services: &Services, command: ItemsCommand) -> io::Result<()> {
    let applications = &services.applications;
    match command {
        ItemsCommand::List { app_id } => {
            let items = applications
                .application_dataset(&app_id)
                .await
                .map_err(failed("list items"))?;
            print_json(&items)
        }
        ItemsCommand::Add { app_id, name, tags } => {
            let item = applications
                .add_dataset_item(&app_id, DatasetItemDraft::new(name).with_tags(tags))
                .await
                .map_err(failed("add item"))?;
            print_json(&item)
        }
        ItemsCommand::Delete { app_id, item_id } => {
            let deleted = applications
                .delete_dataset_item(&app_id, &item_id)
                .await
                .map_err(failed("delete item"))?;
            print_json(&json!({ "id": item_id, "deleted": deleted }))
        }
    }
}

fn failed(operation: &'static str) -> impl Fn(tuna_store::domain::Error) -> io::Error {
    move |error| io::Error::other(format!("{operation} failed: {error}"))
}

fn print_json<T: Serialize + ?Sized>(value: &T) -> io::Result<()> {
    let rendered = serde_json::to_string_pretty(value).map_err(io::Error::other)?;
    println!("{rendered}");
    Ok(())
}
