use api::api::start_server;

#[macro_use]
extern crate diesel;

use clap::{Parser, Subcommand};
use config::API_URL;
use utils::is_server_running;

mod api;
mod client;
mod config;
mod errors;
mod models;
mod schema;
mod todo_commands;
mod ui;
mod utils;

#[derive(Debug, Subcommand)]
enum Commands {
    /// Browse todos in the terminal UI
    #[clap(alias = "ls")]
    List,
    /// Create a todo from prompts
    #[clap(alias = "c")]
    Create,
    /// Print a single todo
    Show { id: i64 },
    /// Print todos created before an ISO-8601 local date-time
    Before { date: String },
    /// Delete every todo
    Clear,
}

#[derive(Debug, Parser)]
#[clap(author, version, about, long_about = "Manage todos from command line")]
struct TodoArgs {
    #[clap(short = 's', long = "start-server")]
    start_server: bool,

    #[clap(subcommand)]
    command: Option<Commands>,
}

fn main() -> anyhow::Result<()> {
    dotenv::dotenv().ok();

    let args = TodoArgs::parse();

    if args.start_server {
        if is_server_running(&API_URL)? {
            anyhow::bail!("Server already running on {}", *API_URL);
        }

        println!("Starting server on {}", *API_URL);
        start_server()?;
    }

    let res = match &args.command {
        Some(Commands::List) => todo_commands::list_todos(),
        Some(Commands::Create) => todo_commands::create_new_todo(),
        Some(Commands::Show { id }) => todo_commands::show_todo(*id),
        Some(Commands::Before { date }) => todo_commands::list_todos_before(date),
        Some(Commands::Clear) => todo_commands::clear_todos(),
        None => Ok(()),
    };

    if let Err(e) = res {
        eprintln!("{:#}", e);
    }

    Ok(())
}
