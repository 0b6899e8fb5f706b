use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};

use movie_tracker::catalog::OmdbClient;
use movie_tracker::client::HttpMoviesClient;
use movie_tracker::config::{Config, ConfigStore};
use movie_tracker::error::ClientError;
use movie_tracker::logging::init_tracing;
use movie_tracker::models::{FavoriteMovie, SortOrder};
use movie_tracker::server::MovieServer;
use movie_tracker::store::{AsyncCell, MovieStore, SearchSessionController};

#[derive(Parser, Debug)]
#[command(name = "movie-tracker")]
#[command(about = "Search movies and keep a list of favorites", long_about = None)]
struct Cli {
    /// Config file (default: ~/.config/movie-tracker/config.toml)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Run the backend service
    Serve,
    /// Search the catalog by title
    Search {
        title: String,
        /// Number of pages to load, as if scrolling to the end each time
        #[arg(long, default_value_t = 1)]
        pages: u32,
    },
    /// List favorite movies
    Favorites {
        /// Order by upvotes: ASC or DES
        #[arg(long, value_parser = parse_sort)]
        sort: Option<SortOrder>,
    },
    /// Add a movie to favorites, or upvote it if already there
    Add { imdb_id: String },
    /// Upvote a favorite movie
    Upvote { imdb_id: String },
}

fn parse_sort(value: &str) -> Result<SortOrder, String> {
    SortOrder::parse(&value.to_ascii_uppercase())
        .ok_or_else(|| format!("expected ASC or DES, got '{}'", value))
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing();

    let path = cli.config.unwrap_or_else(Config::config_path);
    let mut config = Config::load_from(&path)
        .with_context(|| format!("loading config from {}", path.display()))?;
    config.apply_env()?;

    match cli.command {
        Commands::Serve => serve(ConfigStore::new(config)).await,
        command => {
            let api = HttpMoviesClient::new(&config.client.base_url)?;
            let store = MovieStore::new(Arc::new(api));
            run_client(store, config.client.max_search_results, command).await;
            Ok(())
        }
    }
}

async fn serve(config: ConfigStore) -> Result<()> {
    let current = config.get();
    current.validate_for_serving()?;

    let catalog = OmdbClient::new(&current.catalog)?;
    let server = MovieServer::new(config, Arc::new(catalog))?;
    server.run().await.context("movie server failed")?;
    Ok(())
}

async fn run_client(store: MovieStore, max_window: usize, command: Commands) {
    match command {
        Commands::Serve => {}
        Commands::Search { title, pages } => {
            let controller = SearchSessionController::new(store.clone(), max_window);
            controller.on_query_changed(title);
            controller.settled().await;
            for _ in 1..pages {
                if !controller.fetch_next_page() {
                    break;
                }
                controller.settled().await;
            }
            print_search(&store);
        }
        Commands::Favorites { sort } => {
            let list = store.get_all_favorite_movies();
            list.call_api(sort).await;
            print_favorites(&list.state());
        }
        Commands::Add { imdb_id } => {
            let add = store.create_or_upvote_favorite_movie();
            add.call_api(&imdb_id).await;
            report(&add.state().error, "Error adding movie to favorites");
            print_after_refresh(&store).await;
        }
        Commands::Upvote { imdb_id } => {
            let upvote = store.upvote_favorite_movie();
            upvote.call_api(&imdb_id).await;
            report(&upvote.state().error, "Error upvoting movie");
            print_after_refresh(&store).await;
        }
    }
}

/// Wait for the refresh a successful mutation started, then print the list.
async fn print_after_refresh(store: &MovieStore) {
    let mut updates = store.subscribe();
    if updates.wait_for(|state| !state.favorites_busy()).await.is_err() {
        return;
    }
    let list = store.get_all_favorite_movies().state();
    if list.value.is_some() || list.error.is_some() {
        print_favorites(&list);
    }
}

fn print_search(store: &MovieStore) {
    let search = store.search_movies().state();
    report(&search.error, "Error searching movie");

    let Some(buffer) = search.value else {
        return;
    };
    if let Some(reason) = buffer.error_response {
        println!("{}", reason);
        return;
    }
    for movie in &buffer.movies {
        println!("{}  {} ({})", movie.imdb_id, movie.title, movie.year);
    }
    if buffer.has_next_page {
        println!("... more results available");
    }
}

fn print_favorites(list: &AsyncCell<Vec<FavoriteMovie>>) {
    report(&list.error, "Error fetching favorite movies");
    for movie in list.value.iter().flatten() {
        println!(
            "{:>4}  {}  {} ({})",
            movie.upvotes, movie.imdb_id, movie.title, movie.release_year
        );
    }
}

fn report(error: &Option<ClientError>, fallback: &str) {
    let Some(error) = error else {
        return;
    };
    let details = error.describe(fallback);
    match details.status {
        Some(status) => eprintln!("[{}] {}", status, details.message),
        None => eprintln!("{}", details.message),
    }
    if let Some(extra) = details.details {
        eprintln!("{}", extra);
    }
}
