use axum::{Router, extract::Extension, routing::get};
use clap::Parser;
use std::sync::Arc;
use taxa_gallery::config::{Cli, Command, HarvestArgs, LANGUAGE_LOOKUP_TIMEOUT, ServeArgs, ServeConfig};
use taxa_gallery::enrichment::client::GbifClient;
use taxa_gallery::enrichment::fetcher::SpeciesEnricher;
use taxa_gallery::gallery::engine::{ImageFilterEngine, OccurrenceFacetFilter};
use taxa_gallery::gallery::handlers::{
    GalleryState, handle_filter_images, handle_images, handle_stats, handle_wikidata_langs,
};
use taxa_gallery::gallery::sparql::{ImageSource, SparqlClient};
use taxa_gallery::harvest::harvester::Harvester;
use taxa_gallery::resolver::strategy::build_resolver;
use taxa_gallery::taxonomy::checkpoint::Checkpoint;
use taxa_gallery::taxonomy::tables::GeoTables;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let cli = Cli::parse();

    match &cli.command {
        Command::Harvest(args) => harvest(&cli, args).await,
        Command::Serve(args) => serve(&cli, args).await,
    }
}

async fn harvest(cli: &Cli, args: &HarvestArgs) -> anyhow::Result<()> {
    // 1. Image collection:
    let source = match &args.images_endpoint {
        Some(url) => ImageSource::Endpoint(SparqlClient::new(
            url.clone(),
            cli.client_config().request_timeout,
        )),
        None => ImageSource::File(cli.images.clone()),
    };
    let images = source.load().await?;
    let species_ids: Vec<String> = images.into_iter().filter_map(|image| image.species_id).collect();

    // 2. Resume from the last checkpoint:
    let checkpoint = Arc::new(Checkpoint::new(&cli.store));
    let store = checkpoint.load()?;
    tracing::info!("Store {:?} has {} species", checkpoint.path(), store.len());

    // 3. Harvest:
    let fetcher = Arc::new(SpeciesEnricher::new(GbifClient::new(&cli.client_config())));
    let harvester = Harvester::new(fetcher, checkpoint.clone(), args.harvest_config());

    tracing::info!("Press Ctrl+C to stop; progress is saved");

    tokio::select! {
        report = harvester.run(&species_ids, &store) => {
            let report = report?;
            tracing::info!("Harvest finished: {}", serde_json::to_string(&report)?);
        }
        _ = tokio::signal::ctrl_c() => {
            tracing::warn!("Interrupted, saving {} species", store.len());
            checkpoint.persist(&store).await?;
        }
    }

    Ok(())
}

async fn serve(cli: &Cli, args: &ServeArgs) -> anyhow::Result<()> {
    let config = ServeConfig::from(args);

    // 1. Local data:
    let store = Arc::new(Checkpoint::new(&cli.store).load()?);
    let tables = Arc::new(GeoTables::load(&cli.continents, &cli.keywords)?);
    let sparql = SparqlClient::new(config.sparql_endpoint.clone(), LANGUAGE_LOOKUP_TIMEOUT);
    let images = ImageSource::File(cli.images.clone()).load().await?;

    tracing::info!(
        "Loaded {} species, {} images (strategy={:?}, taxon_match={:?})",
        store.len(),
        images.len(),
        config.strategy,
        config.taxon_match
    );

    // 2. Filter engines:
    let resolver = build_resolver(config.strategy, store.clone(), tables);
    let engine = ImageFilterEngine::new(store.clone(), resolver, config.taxon_match);
    let facets = OccurrenceFacetFilter::new(GbifClient::new(&cli.client_config()));

    let state = Arc::new(GalleryState {
        images,
        store,
        engine,
        facets,
        sparql,
    });

    // 3. HTTP Router:
    let app = Router::new()
        .route("/api/images", get(handle_images))
        .route("/api/filter_images", get(handle_filter_images))
        .route("/api/wikidata_langs", get(handle_wikidata_langs))
        .route("/api/stats", get(handle_stats))
        .layer(Extension(state));

    // 4. Start HTTP server:
    tracing::info!("HTTP server listening on {}", config.bind);
    tracing::info!("Press Ctrl+C to shutdown");

    let listener = tokio::net::TcpListener::bind(config.bind).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(async {
            let _ = tokio::signal::ctrl_c().await;
        })
        .await?;

    Ok(())
}
