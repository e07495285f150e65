mod cli;

use std::path::Path;
use std::sync::Arc;

use anyhow::Result;
use clap::Parser;
use cli::{Cli, Commands};
use mq_core::config::Config;
use mq_core::{poster_url, CatalogQuery, Movie, MovieId, PosterSize, SortField, SortOrder};
use mq_server::catalog::Catalog;
use mq_server::tmdb::TmdbClient;

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Respect RUST_LOG env var if set, otherwise use defaults based on verbose flag
    let env_filter = std::env::var("RUST_LOG").unwrap_or_else(|_| {
        if cli.verbose {
            "marquee=debug,mq_server=debug,mq_db=debug,tower_http=debug".to_string()
        } else {
            "marquee=info,mq_server=info,tower_http=info".to_string()
        }
    });

    tracing_subscriber::fmt()
        .with_env_filter(&env_filter)
        .with_writer(std::io::stderr)
        .init();

    match cli.command {
        Commands::Start { host, port } => {
            let mut config = load_config(cli.config.as_deref());
            if let Some(host) = host {
                config.server.host = host;
            }
            if let Some(port) = port {
                config.server.port = port;
            }

            tracing::info!("Starting marquee server");
            let rt = tokio::runtime::Runtime::new()?;
            rt.block_on(mq_server::start(config))?;
            Ok(())
        }
        Commands::Show { ids, json } => {
            let config = load_config(cli.config.as_deref());
            show_movies(&config, &ids, json)
        }
        Commands::List {
            search,
            page,
            sort,
            order,
            json,
        } => {
            let config = load_config(cli.config.as_deref());
            let query = CatalogQuery::new(
                search.as_deref(),
                page,
                SortField::parse_or_default(sort.as_deref()),
                SortOrder::parse_or_default(order.as_deref()),
            );
            list_movies(&config, &query, json)
        }
        Commands::Validate {
            config: config_path,
        } => {
            let path = config_path.or(cli.config);
            validate_config(path.as_deref())
        }
        Commands::Version => {
            println!("marquee {}", env!("CARGO_PKG_VERSION"));
            Ok(())
        }
    }
}

fn load_config(path: Option<&Path>) -> Config {
    let mut config = Config::load_or_default(path);
    config.apply_env();
    config
}

fn catalog(config: &Config) -> Catalog {
    let provider = Arc::new(TmdbClient::new(&config.provider));
    Catalog::new(provider, config.catalog.page_detail_limit)
}

fn show_movies(config: &Config, raw_ids: &[String], json: bool) -> Result<()> {
    let mut ids = Vec::with_capacity(raw_ids.len());
    for raw in raw_ids {
        match raw.parse::<MovieId>() {
            Ok(id) => ids.push(id),
            Err(_) => anyhow::bail!("Invalid movie id: {raw}"),
        }
    }

    let rt = tokio::runtime::Runtime::new()?;
    let results = rt.block_on(catalog(config).fetch_each(&ids));

    let mut failed = 0usize;
    let mut movies = Vec::new();
    for (id, result) in results {
        match result {
            Ok(movie) => movies.push(movie),
            Err(e) => {
                failed += 1;
                eprintln!("✗ {id}: {e}");
            }
        }
    }

    if json {
        println!("{}", serde_json::to_string_pretty(&movies)?);
    } else {
        for movie in &movies {
            print_movie(movie, &config.provider.image_base_url);
        }
    }

    if failed > 0 {
        anyhow::bail!("{failed} of {} movies could not be fetched", ids.len());
    }
    Ok(())
}

fn list_movies(config: &Config, query: &CatalogQuery, json: bool) -> Result<()> {
    let rt = tokio::runtime::Runtime::new()?;
    let page = rt.block_on(catalog(config).list_page(query))?;

    if json {
        println!("{}", serde_json::to_string_pretty(&page)?);
        return Ok(());
    }

    match &query.search {
        Some(text) => println!("Search \"{text}\", page {} ({} results)", page.page, page.total),
        None => println!(
            "Discover by {}, page {} ({} results)",
            query.sort_by(),
            page.page,
            page.total
        ),
    }
    for movie in &page.data {
        println!();
        print_movie(movie, &config.provider.image_base_url);
    }

    Ok(())
}

fn print_movie(movie: &Movie, image_base: &str) {
    match movie.year {
        Some(year) => println!("{} ({year})  [{}]", movie.title, movie.id),
        None => println!("{}  [{}]", movie.title, movie.id),
    }
    if let Some(rating) = movie.rating {
        println!("  Rating: {rating:.1}");
    }
    if !movie.genres.is_empty() {
        println!("  Genres: {}", movie.genres.join(", "));
    }
    if !movie.actors.is_empty() {
        println!("  Cast: {}", movie.actors.join(", "));
    }
    if let Some(url) = poster_url(image_base, movie.poster_path.as_deref(), PosterSize::W342) {
        println!("  Poster: {url}");
    }
    if let Some(ref description) = movie.description {
        println!("  {description}");
    }
}

fn validate_config(path: Option<&Path>) -> Result<()> {
    let config = match path {
        Some(p) => {
            println!("Validating config: {:?}", p);
            let config = Config::load(p)?;
            println!("✓ Configuration is valid");
            config
        }
        None => {
            println!("No config file specified, using defaults");
            Config::default()
        }
    };

    println!("  Server: {}:{}", config.server.host, config.server.port);
    println!("  Provider: {}", config.provider.base_url);
    println!("  Page detail limit: {}", config.catalog.page_detail_limit);
    println!("  Favorites backend: {:?}", config.favorites.backend);

    let warnings = config.validate();
    if !warnings.is_empty() {
        println!("\nWarnings:");
        for warning in warnings {
            println!("  ! {warning}");
        }
    }

    Ok(())
}
