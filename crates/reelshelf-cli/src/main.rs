use catalog_config::{Config, PathManager, SessionStore};
use catalog_core::{RuntimeFilter, SortKey};
use clap::{ArgAction, Parser, Subcommand, ValueEnum};
use commands::{backfill, clear, comment, config, list, movie, show};

mod commands;
mod logging;
mod output;

#[derive(Parser)]
#[command(name = "reelshelf")]
#[command(about = "ReelShelf - a shared movie catalog with an offline mirror")]
#[command(version)]
struct Cli {
    /// Enable verbose output (use multiple times for more verbosity: -v, -vv)
    #[arg(short, long, action = ArgAction::Count, global = true)]
    verbose: u8,

    /// Suppress all output except errors
    #[arg(short, long, global = true)]
    quiet: bool,

    /// Output format
    #[arg(long, global = true, default_value = "human", value_enum)]
    output: output::OutputFormat,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum DensityArg {
    Compact,
    Wide,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum Toggle {
    On,
    Off,
}

#[derive(clap::Args, Debug)]
pub struct ListArgs {
    /// List the to-watch collection instead of the main one
    #[arg(long, action = ArgAction::SetTrue)]
    pub to_watch: bool,

    /// Only this exact genre string (repeatable)
    #[arg(long = "genre", value_name = "GENRE")]
    pub genres: Vec<String>,

    /// Only this release year (repeatable)
    #[arg(long = "year", value_name = "YEAR")]
    pub years: Vec<i32>,

    /// Case-insensitive match on title or description
    #[arg(short, long)]
    pub search: Option<String>,

    /// Lowest IMDb rating to include
    #[arg(long, default_value_t = 0.0)]
    pub min_rating: f64,

    /// Highest IMDb rating to include
    #[arg(long, default_value_t = 10.0)]
    pub max_rating: f64,

    /// all, short, medium, long, one-season or multi-season
    #[arg(long, default_value_t = RuntimeFilter::All)]
    pub runtime: RuntimeFilter,

    /// Carrying any of these tags (repeatable)
    #[arg(long = "tag", value_name = "TAG")]
    pub tags: Vec<String>,

    /// Sort key; defaults to the saved preference
    #[arg(long)]
    pub sort: Option<SortKey>,

    /// 1-indexed page
    #[arg(long, default_value_t = 1)]
    pub page: usize,

    /// Overrides the page size picked by --density
    #[arg(long)]
    pub page_size: Option<usize>,

    /// compact (12 per page) or wide (15 per page); defaults to config
    #[arg(long, value_enum)]
    pub density: Option<DensityArg>,

    /// Also print the genres, years and tags available to filter on
    #[arg(long, action = ArgAction::SetTrue)]
    pub facets: bool,
}

#[derive(clap::Args, Debug)]
pub struct AddArgs {
    pub title: String,

    #[arg(long)]
    pub year: i32,

    /// Comma-separated, e.g. "Crime, Drama"
    #[arg(long, default_value = "")]
    pub genre: String,

    #[arg(long, default_value = "")]
    pub description: String,

    /// Poster URL
    #[arg(long, default_value = "")]
    pub image: String,

    /// e.g. "142 min" or "3 Seasons"
    #[arg(long)]
    pub runtime: Option<String>,

    #[arg(long)]
    pub imdb_id: Option<String>,

    #[arg(long)]
    pub imdb_rating: Option<f64>,

    #[arg(long = "tag", value_name = "TAG")]
    pub tags: Vec<String>,

    /// Add to the to-watch collection
    #[arg(long, action = ArgAction::SetTrue)]
    pub to_watch: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// List one page of a collection
    #[command(long_about = "Filter, sort and paginate a collection. Filters combine with AND; within one filter (genres, years, tags) any selected value matches.")]
    List(ListArgs),
    /// Show one movie with its comments and similar titles
    Show {
        id: i64,

        /// Look in the to-watch collection only
        #[arg(long, action = ArgAction::SetTrue)]
        to_watch: bool,
    },
    /// Add a movie to the front of a collection
    Add(AddArgs),
    /// Remove a movie
    Remove {
        id: i64,

        #[arg(long, action = ArgAction::SetTrue)]
        to_watch: bool,

        /// Skip the confirmation prompt
        #[arg(short, long, action = ArgAction::SetTrue)]
        yes: bool,
    },
    /// Replace a movie's poster URL (main collection)
    Poster { id: i64, url: String },
    /// Set a movie's runtime text
    Runtime {
        id: i64,
        runtime: String,

        #[arg(long, action = ArgAction::SetTrue)]
        to_watch: bool,
    },
    /// Set a movie's tags
    #[command(long_about = "Replace a movie's tags with the given list. With --append the given tags are added to the existing ones. Tags are trimmed and de-duplicated.")]
    Tag {
        id: i64,
        tags: Vec<String>,

        #[arg(long, action = ArgAction::SetTrue)]
        append: bool,

        #[arg(long, action = ArgAction::SetTrue)]
        to_watch: bool,
    },
    /// Rate a movie from 1 to 5 stars
    Rate {
        id: i64,

        #[arg(allow_negative_numbers = true)]
        rating: i64,

        #[arg(long, action = ArgAction::SetTrue)]
        to_watch: bool,
    },
    /// Move a to-watch entry into the main collection
    Watched {
        id: i64,

        #[arg(short, long, action = ArgAction::SetTrue)]
        yes: bool,
    },
    /// Add, list or delete comments
    Comment {
        #[command(subcommand)]
        cmd: CommentCommands,
    },
    /// Stamp dateAdded on records that lack it
    #[command(long_about = "Give every record without a dateAdded timestamp the current time and write each one back to the remote store. Records keep the new timestamp locally even when the remote write fails.")]
    BackfillDates {
        #[arg(long, action = ArgAction::SetTrue)]
        to_watch: bool,

        #[arg(short, long, action = ArgAction::SetTrue)]
        yes: bool,
    },
    /// Most recently added movies
    Recent {
        #[arg(long, default_value_t = 8)]
        limit: usize,
    },
    /// Manage configuration and local preferences
    Config {
        #[command(subcommand)]
        cmd: ConfigCommands,
    },
    /// Clear the local mirror or session
    #[command(long_about = "Clear locally stored data. --mirror removes the offline copy of the collections and comments, --session removes the anonymous identity and preferences, --all removes both.")]
    Clear {
        #[arg(long, action = ArgAction::SetTrue)]
        all: bool,

        #[arg(long, action = ArgAction::SetTrue)]
        mirror: bool,

        #[arg(long, action = ArgAction::SetTrue)]
        session: bool,
    },
}

#[derive(Subcommand)]
pub enum CommentCommands {
    Add {
        movie_id: i64,
        text: String,

        /// Defaults to the signed-in user, else "Anonymous"
        #[arg(long)]
        username: Option<String>,
    },
    List {
        movie_id: i64,
    },
    Delete {
        movie_id: i64,
        comment_id: String,
    },
}

#[derive(Subcommand)]
pub enum ConfigCommands {
    /// Show current configuration (masks the api key)
    Show {
        /// Show the api key unmasked
        #[arg(long, action = ArgAction::SetTrue)]
        full: bool,

        /// Also check that the remote store answers
        #[arg(long, action = ArgAction::SetTrue)]
        check: bool,
    },
    /// Write a config file
    Init {
        #[arg(long)]
        base_url: Option<String>,

        #[arg(long)]
        api_key: Option<String>,

        /// Overwrite an existing file
        #[arg(long, action = ArgAction::SetTrue)]
        force: bool,
    },
    /// Save the default sort key
    SetSort { sort: SortKey },
    /// Turn the dark palette on or off
    DarkMode {
        #[arg(value_enum)]
        state: Toggle,
    },
    /// Show the identity ratings are recorded under
    Whoami,
}

/// Log file and palette come from disk before anything else runs; a missing
/// or broken config is reported later by the command itself.
fn early_settings() -> (Option<std::path::PathBuf>, bool) {
    let paths = PathManager::default();
    let log_file = Config::load_from_file(&paths.config_file())
        .ok()
        .and_then(|c| c.logging.file);

    let mut session = SessionStore::new(paths.session_file());
    let dark_mode = session.load().map(|_| session.dark_mode()).unwrap_or(false);
    (log_file, dark_mode)
}

#[tokio::main]
async fn main() -> color_eyre::Result<()> {
    color_eyre::install()?;

    let cli = Cli::parse();
    let (log_file, dark_mode) = early_settings();

    logging::init_logging(cli.verbose, cli.quiet, log_file).map_err(|e| color_eyre::eyre::eyre!("{}", e))?;

    let output = output::Output::new(cli.output, cli.quiet).with_dark_mode(dark_mode);

    match cli.command {
        Commands::List(args) => list::run_list(args, &output).await,
        Commands::Show { id, to_watch } => show::run_show(id, to_watch, &output).await,
        Commands::Add(args) => movie::run_add(args, &output).await,
        Commands::Remove { id, to_watch, yes } => movie::run_remove(id, to_watch, yes, &output).await,
        Commands::Poster { id, url } => movie::run_poster(id, &url, &output).await,
        Commands::Runtime { id, runtime, to_watch } => movie::run_runtime(id, &runtime, to_watch, &output).await,
        Commands::Tag {
            id,
            tags,
            append,
            to_watch,
        } => movie::run_tag(id, tags, append, to_watch, &output).await,
        Commands::Rate { id, rating, to_watch } => movie::run_rate(id, rating, to_watch, &output).await,
        Commands::Watched { id, yes } => movie::run_watched(id, yes, &output).await,
        Commands::Comment { cmd } => comment::run_comment(cmd, &output).await,
        Commands::BackfillDates { to_watch, yes } => backfill::run_backfill(to_watch, yes, &output).await,
        Commands::Recent { limit } => list::run_recent(limit, &output).await,
        Commands::Config { cmd } => config::run_config(cmd, &output).await,
        Commands::Clear { all, mirror, session } => clear::run_clear(all, mirror, session, &output),
    }
}
