mod config;
mod contacts;
mod query;
mod selection;
mod store;
mod tags;
mod ui;
mod validate;
mod workspace;

use std::collections::HashSet;
use std::path::PathBuf;

use anyhow::Result;
use clap::{Args, Parser, Subcommand};

use store::Store;
use workspace::Workspace;

#[derive(Parser, Debug)]
#[command(name = "cardfile")]
struct Cli {
    /// Path to an alternate configuration file
    #[arg(long)]
    config: Option<PathBuf>,

    /// Use this data directory instead of the configured one
    #[arg(long)]
    data_dir: Option<PathBuf>,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Query contacts for email addresses (abook-compatible output for aerc/mutt)
    Query(QueryArgs),
}

#[derive(Args, Debug)]
struct QueryArgs {
    /// Search term (matches first name, last name, or email)
    query: String,
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    let config = config::load(cli.config.as_deref())?;

    let data_dir = cli.data_dir.or_else(|| config.data_dir.clone());
    let store = Store::open(data_dir.as_deref())?;
    let mut workspace = Workspace::load(store);

    if let Some(command) = cli.command {
        match command {
            Command::Query(args) => {
                handle_query(args, &workspace);
                return Ok(());
            }
        }
    }

    let mut app = ui::app::App::new(&mut workspace, &config);
    app.run()?;

    Ok(())
}

fn handle_query(args: QueryArgs, workspace: &Workspace) {
    let results = workspace.filtered(&args.query, &HashSet::new());

    // Header line (abook-compatible, ignored by mutt/aerc)
    if results.is_empty() {
        println!("No matches for \"{}\"", args.query);
    } else {
        println!(
            "Found {} contact(s) matching \"{}\"",
            results.len(),
            args.query
        );
    }

    // Results: email<TAB>name<TAB>notes (abook mutt-query format)
    for contact in results.iter().filter(|contact| !contact.email.is_empty()) {
        println!("{}\t{}\t ", contact.email, contact.full_name());
    }
}
