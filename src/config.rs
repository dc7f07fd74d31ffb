//! Runtime Configuration
//!
//! Command-line options with environment fallbacks. The binary converts them
//! into the plain config structs the library takes (`ClientConfig`,
//! `HarvestConfig`, `ServeConfig`), so library callers never touch the CLI.

use crate::enrichment::client::ClientConfig;
use crate::gallery::engine::TaxonMatch;
use crate::harvest::types::HarvestConfig;
use crate::resolver::strategy::ResolutionStrategy;

use clap::{Args, Parser, Subcommand};
use std::net::SocketAddr;
use std::path::PathBuf;
use std::time::Duration;

pub const DEFAULT_SPARQL_ENDPOINT: &str = "https://query.wikidata.org/sparql";

/// Timeout of the language lookup.
pub const LANGUAGE_LOOKUP_TIMEOUT: Duration = Duration::from_secs(10);

#[derive(Debug, Parser)]
#[command(name = "taxa-gallery", version, about = "Species image taxonomy harvester and filter server")]
pub struct Cli {
    /// Persisted taxonomy store (species id -> record).
    #[arg(long, env = "TAXA_STORE", default_value = "static/gbif_mapping.json", global = true)]
    pub store: PathBuf,

    /// Continent code -> country codes table.
    #[arg(long, env = "TAXA_CONTINENTS", default_value = "static/continent_to_country_codes.json", global = true)]
    pub continents: PathBuf,

    /// Continent code -> locality keywords table.
    #[arg(long, env = "TAXA_KEYWORDS", default_value = "static/continent_keywords.json", global = true)]
    pub keywords: PathBuf,

    /// Image collection as a JSON array of flat rows.
    #[arg(long, env = "TAXA_IMAGES", default_value = "static/depicts_from_commons.json", global = true)]
    pub images: PathBuf,

    /// Base URL of the taxonomy API.
    #[arg(long, env = "TAXA_API_BASE", default_value = "https://api.gbif.org/v1", global = true)]
    pub api_base: String,

    /// Per-request timeout in seconds.
    #[arg(long, env = "TAXA_TIMEOUT_SECS", default_value_t = 20, global = true)]
    pub timeout_secs: u64,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Enrich every species referenced by the image collection.
    Harvest(HarvestArgs),
    /// Serve the image filter over HTTP.
    Serve(ServeArgs),
}

#[derive(Debug, Args)]
pub struct HarvestArgs {
    #[arg(long, default_value_t = 8, value_parser = clap::value_parser!(u64).range(1..))]
    pub concurrency: u64,

    #[arg(long, default_value_t = 10, value_parser = clap::value_parser!(u64).range(1..))]
    pub checkpoint_every: u64,

    /// Full query URL; when set, images are read from it instead of the file.
    #[arg(long, env = "TAXA_IMAGES_ENDPOINT")]
    pub images_endpoint: Option<String>,
}

#[derive(Debug, Args)]
pub struct ServeArgs {
    #[arg(long, env = "TAXA_BIND", default_value = "127.0.0.1:5000")]
    pub bind: SocketAddr,

    #[arg(long, value_enum, default_value_t = ResolutionStrategy::Flat)]
    pub strategy: ResolutionStrategy,

    #[arg(long, value_enum, default_value_t = TaxonMatch::DescendantsAndSelf)]
    pub taxon_match: TaxonMatch,

    #[arg(long, env = "TAXA_SPARQL_ENDPOINT", default_value = DEFAULT_SPARQL_ENDPOINT)]
    pub sparql_endpoint: String,
}

/// Settings of the HTTP server.
#[derive(Debug, Clone)]
pub struct ServeConfig {
    pub bind: SocketAddr,
    pub strategy: ResolutionStrategy,
    pub taxon_match: TaxonMatch,
    pub sparql_endpoint: String,
}

impl Default for ServeConfig {
    fn default() -> Self {
        Self {
            bind: SocketAddr::from(([127, 0, 0, 1], 5000)),
            strategy: ResolutionStrategy::default(),
            taxon_match: TaxonMatch::default(),
            sparql_endpoint: DEFAULT_SPARQL_ENDPOINT.to_string(),
        }
    }
}

impl Cli {
    pub fn client_config(&self) -> ClientConfig {
        ClientConfig {
            base_url: self.api_base.trim_end_matches('/').to_string(),
            request_timeout: Duration::from_secs(self.timeout_secs),
        }
    }
}

impl HarvestArgs {
    pub fn harvest_config(&self) -> HarvestConfig {
        HarvestConfig {
            concurrency: self.concurrency as usize,
            checkpoint_every: self.checkpoint_every as usize,
        }
    }
}

impl From<&ServeArgs> for ServeConfig {
    fn from(args: &ServeArgs) -> Self {
        Self {
            bind: args.bind,
            strategy: args.strategy,
            taxon_match: args.taxon_match,
            sparql_endpoint: args.sparql_endpoint.clone(),
        }
    }
}
