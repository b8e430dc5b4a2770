// tutorfav — command-line front end for tutor favorites
//
// Cross-platform (macOS, Linux, Windows). Each invocation opens the local
// favorites database, does one thing, and exits.

mod config;

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use colored::*;
use std::sync::Arc;
use tracing_appender::non_blocking::WorkerGuard;
use tutorfav_core::{
    ContactLink, FavoriteRecord, FavoriteToggle, FavoritesError, FavoritesStore, SledStorage,
};

#[derive(Parser)]
#[command(name = "tutorfav")]
#[command(about = "tutorfav — keep your favorite tutors close", long_about = None)]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Manage favorite tutors
    Favorite {
        #[command(subcommand)]
        action: FavoriteAction,
    },
    /// Print the messaging link for a favorite tutor
    Contact { id: u64 },
    /// Configure settings
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
}

#[derive(Subcommand)]
enum FavoriteAction {
    /// Mark a tutor as favorite
    Add(TutorArgs),
    /// Unmark a favorite tutor
    Remove { id: u64 },
    /// Flip a tutor's favorite state
    Toggle(TutorArgs),
    List,
    Show { id: u64 },
    /// Print whether a tutor is a favorite
    Status { id: u64 },
}

#[derive(Args)]
struct TutorArgs {
    #[arg(long)]
    id: u64,
    #[arg(short, long)]
    name: String,
    #[arg(short, long, default_value = "")]
    subject: String,
    #[arg(long, default_value = "")]
    bio: String,
    #[arg(long, default_value_t = 0.0)]
    cost: f64,
    #[arg(long, default_value = "")]
    avatar: String,
    /// Messaging handle (phone number)
    #[arg(short, long, default_value = "")]
    whatsapp: String,
}

impl TutorArgs {
    fn into_record(self) -> FavoriteRecord {
        FavoriteRecord::new(self.id, self.name)
            .with_subject(self.subject)
            .with_bio(self.bio)
            .with_cost(self.cost)
            .with_avatar(self.avatar)
            .with_contact_handle(self.whatsapp)
    }
}

#[derive(Subcommand)]
enum ConfigAction {
    Set { key: String, value: String },
    Get { key: String },
    List,
}

#[tokio::main]
async fn main() -> Result<()> {
    let config = config::Config::load()?;
    let _log_guard = init_logging(&config)?;

    let cli = Cli::parse();

    match cli.command {
        Commands::Favorite { action } => cmd_favorite(&config, action).await,
        Commands::Contact { id } => cmd_contact(&config, id).await,
        Commands::Config { action } => cmd_config(config, action),
    }
}

fn init_logging(config: &config::Config) -> Result<Option<WorkerGuard>> {
    let filter = || {
        tracing_subscriber::EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn"))
    };

    if config.log_to_file {
        let log_dir = config::Config::data_dir()?.join("logs");
        std::fs::create_dir_all(&log_dir).context("Failed to create log directory")?;
        let appender = tracing_appender::rolling::daily(log_dir, "tutorfav.log");
        let (writer, guard) = tracing_appender::non_blocking(appender);
        tracing_subscriber::fmt()
            .with_env_filter(filter())
            .with_writer(writer)
            .with_ansi(false)
            .init();
        Ok(Some(guard))
    } else {
        tracing_subscriber::fmt().with_env_filter(filter()).init();
        Ok(None)
    }
}

fn open_store(config: &config::Config) -> Result<FavoritesStore> {
    let path = config.storage_dir()?;
    let backend = SledStorage::open(&path)
        .with_context(|| format!("Failed to open favorites database at {}", path.display()))?;
    tracing::debug!("Opened favorites database at {}", path.display());
    Ok(FavoritesStore::with_config(
        Arc::new(backend),
        config.favorites_config(),
    ))
}

async fn cmd_favorite(config: &config::Config, action: FavoriteAction) -> Result<()> {
    let store = open_store(config)?;

    match action {
        FavoriteAction::Add(args) => {
            let mut row = FavoriteToggle::load(&store, args.into_record()).await?;
            if row.is_favorited() {
                println!(
                    "{} {} is already a favorite",
                    "•".yellow(),
                    row.record().name.bright_cyan()
                );
            } else {
                row.toggle(&store).await?;
                println!("{} Favorited:", "✓".green());
                print_record(row.record());
            }
        }

        FavoriteAction::Remove { id } => {
            let record = find_favorite(&store, id).await?;
            let name = record.name.clone();
            let mut row = FavoriteToggle::new(record, true);
            row.toggle(&store).await?;
            println!("{} Removed favorite: {}", "✓".green(), name.bright_cyan());
        }

        FavoriteAction::Toggle(args) => {
            let mut row = FavoriteToggle::load(&store, args.into_record()).await?;
            let favorited = row.toggle(&store).await?;
            let state = if favorited {
                "favorite".bright_green()
            } else {
                "not a favorite".dimmed()
            };
            println!(
                "{} {} is now {}",
                "✓".green(),
                row.record().name.bright_cyan(),
                state
            );
        }

        FavoriteAction::List => {
            let list = store.list().await?;

            if list.is_empty() {
                println!("{}", "No favorites yet.".dimmed());
            } else {
                println!("{} ({} total)", "Favorites".bold(), list.len());
                println!();

                for record in list {
                    println!(
                        "  {} {} {}",
                        "♥".bright_red(),
                        record.name.bright_cyan(),
                        format!("#{}", record.id).dimmed()
                    );
                    if !record.subject.is_empty() {
                        println!("    {}", record.subject);
                    }
                }
            }
        }

        FavoriteAction::Show { id } => {
            let record = find_favorite(&store, id).await?;
            println!("{}", "Favorite Details".bold());
            print_record(&record);
            let link = ContactLink::new(&config.messaging_scheme, &record.contact_handle);
            println!("  Contact:  {}", link.uri().bright_yellow());
        }

        FavoriteAction::Status { id } => {
            if store.is_favorite(id).await? {
                println!("{} #{} is a favorite", "♥".bright_red(), id);
            } else {
                println!("{}", format!("#{} is not a favorite", id).dimmed());
            }
        }
    }

    Ok(())
}

async fn cmd_contact(config: &config::Config, id: u64) -> Result<()> {
    let store = open_store(config)?;
    let record = find_favorite(&store, id).await?;
    let row = FavoriteToggle::new(record, true);

    // Plain output so it can be piped to `open` / `xdg-open`
    println!("{}", row.contact_link(&config.messaging_scheme));
    Ok(())
}

fn cmd_config(mut config: config::Config, action: ConfigAction) -> Result<()> {
    match action {
        ConfigAction::Set { key, value } => {
            config.set(&key, &value)?;
            config.save()?;
            println!("{} Set {} = {}", "✓".green(), key.bright_cyan(), value);
        }

        ConfigAction::Get { key } => {
            if let Some(value) = config.get(&key) {
                println!("{} = {}", key.bright_cyan(), value);
            } else {
                anyhow::bail!("Unknown config key: {}", key);
            }
        }

        ConfigAction::List => {
            println!("{}", "Configuration".bold());
            println!();

            for (key, value) in config.list() {
                println!("  {:<20} {}", key.bright_cyan(), value);
            }
        }
    }

    Ok(())
}

async fn find_favorite(store: &FavoritesStore, id: u64) -> Result<FavoriteRecord> {
    match store.get(id).await {
        Ok(record) => Ok(record),
        Err(FavoritesError::NotFound(id)) => anyhow::bail!("No favorite with id {}", id),
        Err(err) => Err(err).context("Failed to read favorites"),
    }
}

fn print_record(record: &FavoriteRecord) {
    println!("  Name:     {}", record.name.bright_cyan());
    println!("  Id:       {}", record.id);
    if !record.subject.is_empty() {
        println!("  Subject:  {}", record.subject);
    }
    if !record.bio.is_empty() {
        println!("  Bio:      {}", record.bio);
    }
    println!("  Cost/h:   {:.2}", record.cost);
    if !record.avatar.is_empty() {
        println!("  Avatar:   {}", record.avatar.dimmed());
    }
}
