use std::{
    io::{self, Write as _},
    sync::Arc,
    time::Duration,
};

use anyhow::{Context, Result};
use chrono::Local;
use clap::{Parser, Subcommand};
use curator_core::{
    BlacklistDraft, BlacklistView, CommandGateway, CreatorDraft, CreatorsView, HttpCommandGateway,
    LinkDraft, LinksView, PassthroughSanitizer, Sanitizer,
};
use shared::domain::{BlacklistEntryId, CreatorId, LinkId};

mod settings;

#[derive(Parser, Debug)]
#[command(name = "curator", about = "Management console for the curation backend")]
struct Cli {
    /// Overrides the configured command backend base URL.
    #[arg(long)]
    server_url: Option<String>,
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Manage creators.
    #[command(subcommand)]
    Creators(CreatorsCommand),
    /// Manage the creator blacklist.
    #[command(subcommand)]
    Blacklist(BlacklistCommand),
    /// Manage interesting links.
    #[command(subcommand)]
    Links(LinksCommand),
}

#[derive(Subcommand, Debug)]
enum CreatorsCommand {
    List {
        #[arg(long)]
        query: Option<String>,
    },
    Add {
        #[arg(long)]
        name: String,
        #[arg(long)]
        homepage: String,
        #[arg(long)]
        rate: i32,
    },
    Update {
        #[arg(long)]
        id: i64,
        #[arg(long)]
        name: String,
        #[arg(long)]
        homepage: String,
        #[arg(long)]
        rate: i32,
    },
    Delete {
        #[arg(long)]
        id: i64,
        /// Confirms the deletion without prompting.
        #[arg(long)]
        yes: bool,
    },
}

#[derive(Subcommand, Debug)]
enum BlacklistCommand {
    List {
        #[arg(long)]
        query: Option<String>,
    },
    Add {
        /// Id of an existing creator.
        #[arg(long)]
        creator_id: String,
        #[arg(long)]
        reason: String,
        /// DD/MM/YYYY; defaults to today.
        #[arg(long)]
        date: Option<String>,
    },
    Update {
        #[arg(long)]
        id: i64,
        #[arg(long)]
        creator_id: String,
        #[arg(long)]
        reason: String,
        #[arg(long)]
        date: Option<String>,
    },
    Delete {
        #[arg(long)]
        id: i64,
        #[arg(long)]
        yes: bool,
    },
}

#[derive(Subcommand, Debug)]
enum LinksCommand {
    List {
        #[arg(long)]
        query: Option<String>,
        /// Hides links already marked as downloaded.
        #[arg(long)]
        hide_downloaded: bool,
    },
    Add {
        #[arg(long)]
        url: String,
        #[arg(long)]
        source: Option<String>,
        #[arg(long)]
        downloaded: bool,
        #[arg(long)]
        date: Option<String>,
    },
    Update {
        #[arg(long)]
        id: i64,
        #[arg(long)]
        url: String,
        #[arg(long)]
        source: Option<String>,
        #[arg(long)]
        downloaded: bool,
        #[arg(long)]
        date: Option<String>,
    },
    Delete {
        #[arg(long)]
        id: i64,
        #[arg(long)]
        yes: bool,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt().init();
    let cli = Cli::parse();

    let mut settings = settings::load_settings();
    if let Some(url) = cli.server_url {
        settings.server_url = url;
    }
    settings::validate_server_url(&settings.server_url)?;
    tracing::debug!(server_url = %settings.server_url, "console: using command backend");

    let gateway: Arc<dyn CommandGateway> = Arc::new(
        HttpCommandGateway::with_timeout(
            settings.server_url.as_str(),
            Duration::from_secs(settings.request_timeout_secs),
        )
        .context("failed to build the command gateway client")?,
    );
    let sanitizer: Arc<dyn Sanitizer> = Arc::new(PassthroughSanitizer);

    match cli.command {
        Command::Creators(command) => run_creators(command, gateway, sanitizer).await,
        Command::Blacklist(command) => run_blacklist(command, gateway, sanitizer).await,
        Command::Links(command) => run_links(command, gateway, sanitizer).await,
    }
}

fn confirm_on_stdin(prompt: &str) -> Result<bool> {
    print!("{prompt} [y/N] ");
    io::stdout().flush()?;
    let mut answer = String::new();
    io::stdin().read_line(&mut answer)?;
    Ok(matches!(answer.trim(), "y" | "Y" | "yes"))
}

async fn run_creators(
    command: CreatorsCommand,
    gateway: Arc<dyn CommandGateway>,
    sanitizer: Arc<dyn Sanitizer>,
) -> Result<()> {
    let mut view = CreatorsView::new(gateway, sanitizer);
    match command {
        CreatorsCommand::List { query } => {
            view.refresh().await?;
            if let Some(query) = query {
                view.set_query(query);
            }
            let rows = view.visible().await;
            if rows.is_empty() {
                println!("no creators found");
                return Ok(());
            }
            println!("{:<6} {:<24} {:<32} {:>4}", "ID", "NAME", "HOMEPAGE", "RATE");
            for creator in rows {
                println!(
                    "{:<6} {:<24} {:<32} {:>4}",
                    creator.id.0, creator.name, creator.homepage, creator.rate
                );
            }
            Ok(())
        }
        CreatorsCommand::Add {
            name,
            homepage,
            rate,
        } => {
            let ack = view
                .submit(&CreatorDraft {
                    name,
                    homepage,
                    rate,
                })
                .await?;
            println!("{}", ack.message);
            Ok(())
        }
        CreatorsCommand::Update {
            id,
            name,
            homepage,
            rate,
        } => {
            let rows = view.refresh().await?;
            let record = rows
                .into_iter()
                .find(|creator| creator.id.0 == id)
                .with_context(|| format!("creator {id} not found"))?;
            view.begin_edit(record);
            let ack = view
                .submit(&CreatorDraft {
                    name,
                    homepage,
                    rate,
                })
                .await?;
            println!("{}", ack.message);
            Ok(())
        }
        CreatorsCommand::Delete { id, yes } => {
            view.refresh().await?;
            view.request_delete(CreatorId(id));
            if !yes
                && !confirm_on_stdin(
                    "Are you sure you want to delete this creator? This cannot be undone.",
                )?
            {
                view.dismiss_confirmation();
                println!("aborted");
                return Ok(());
            }
            match view.confirm_pending().await? {
                Some(ack) => println!("{}", ack.message),
                None => println!("nothing pending"),
            }
            Ok(())
        }
    }
}

async fn run_blacklist(
    command: BlacklistCommand,
    gateway: Arc<dyn CommandGateway>,
    sanitizer: Arc<dyn Sanitizer>,
) -> Result<()> {
    let mut view = BlacklistView::new(gateway, sanitizer);
    match command {
        BlacklistCommand::List { query } => {
            view.refresh().await?;
            if let Some(query) = query {
                view.set_query(query);
            }
            let rows = view.visible().await;
            if rows.is_empty() {
                println!("no blacklisted creators found");
                return Ok(());
            }
            println!(
                "{:<6} {:<12} {:<32} {:<12}",
                "ID", "CREATOR", "REASON", "DATE"
            );
            for entry in rows {
                println!(
                    "{:<6} {:<12} {:<32} {:<12}",
                    entry.id.0, entry.creator_id.0, entry.reason, entry.date
                );
            }
            Ok(())
        }
        BlacklistCommand::Add {
            creator_id,
            reason,
            date,
        } => {
            view.refresh().await?;
            let date = date.unwrap_or_else(|| Local::now().format("%d/%m/%Y").to_string());
            let ack = view
                .submit(&BlacklistDraft {
                    creator_id,
                    reason,
                    date,
                })
                .await?;
            println!("{}", ack.message);
            Ok(())
        }
        BlacklistCommand::Update {
            id,
            creator_id,
            reason,
            date,
        } => {
            let rows = view.refresh().await?;
            let record = rows
                .into_iter()
                .find(|entry| entry.id.0 == id)
                .with_context(|| format!("blacklist entry {id} not found"))?;
            let date = date.unwrap_or_else(|| record.date.clone());
            view.begin_edit(record);
            let ack = view
                .submit(&BlacklistDraft {
                    creator_id,
                    reason,
                    date,
                })
                .await?;
            println!("{}", ack.message);
            Ok(())
        }
        BlacklistCommand::Delete { id, yes } => {
            view.refresh().await?;
            view.request_delete(BlacklistEntryId(id));
            if !yes && !confirm_on_stdin("Remove this blacklist entry?")? {
                view.dismiss_confirmation();
                println!("aborted");
                return Ok(());
            }
            match view.confirm_pending().await? {
                Some(ack) => println!("{}", ack.message),
                None => println!("nothing pending"),
            }
            Ok(())
        }
    }
}

async fn run_links(
    command: LinksCommand,
    gateway: Arc<dyn CommandGateway>,
    sanitizer: Arc<dyn Sanitizer>,
) -> Result<()> {
    let mut view = LinksView::new(gateway, sanitizer);
    match command {
        LinksCommand::List {
            query,
            hide_downloaded,
        } => {
            view.refresh().await?;
            if let Some(query) = query {
                view.set_query(query);
            }
            view.set_hide_downloaded(hide_downloaded);
            let rows = view.visible().await;
            if rows.is_empty() {
                println!("no interesting links found");
                return Ok(());
            }
            println!(
                "{:<6} {:<40} {:<20} {:<10} {:<12}",
                "ID", "URL", "SOURCE", "DOWNLOADED", "DATE"
            );
            for link in rows {
                println!(
                    "{:<6} {:<40} {:<20} {:<10} {:<12}",
                    link.id.0,
                    link.url,
                    link.source.as_deref().unwrap_or("-"),
                    if link.downloaded { "yes" } else { "no" },
                    link.date.as_deref().unwrap_or("-")
                );
            }
            Ok(())
        }
        LinksCommand::Add {
            url,
            source,
            downloaded,
            date,
        } => {
            let ack = view
                .submit(&LinkDraft {
                    url,
                    source,
                    downloaded,
                    date,
                })
                .await?;
            println!("{}", ack.message);
            Ok(())
        }
        LinksCommand::Update {
            id,
            url,
            source,
            downloaded,
            date,
        } => {
            let rows = view.refresh().await?;
            let record = rows
                .into_iter()
                .find(|link| link.id.0 == id)
                .with_context(|| format!("interesting link {id} not found"))?;
            view.begin_edit(record);
            let ack = view
                .submit(&LinkDraft {
                    url,
                    source,
                    downloaded,
                    date,
                })
                .await?;
            println!("{}", ack.message);
            Ok(())
        }
        LinksCommand::Delete { id, yes } => {
            view.refresh().await?;
            view.request_delete(LinkId(id));
            if !yes && !confirm_on_stdin("Delete this link?")? {
                view.dismiss_confirmation();
                println!("aborted");
                return Ok(());
            }
            match view.confirm_pending().await? {
                Some(ack) => println!("{}", ack.message),
                None => println!("nothing pending"),
            }
            Ok(())
        }
    }
}
