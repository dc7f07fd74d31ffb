use super::types::{HarvestConfig, HarvestReport};
use crate::enrichment::fetcher::EnrichmentFetcher;
use crate::error::Result;
use crate::taxonomy::checkpoint::Checkpoint;
use crate::taxonomy::store::TaxonomyStore;
use crate::taxonomy::types::{SpeciesId, SpeciesRecord};

use futures::future::{BoxFuture, FutureExt};
use futures::stream::{self, StreamExt};
use std::collections::HashSet;
use std::sync::Arc;
use tracing::Instrument;

/// Incremental, resumable enrichment of a taxonomy store.
pub struct Harvester {
    fetcher: Arc<dyn EnrichmentFetcher>,
    checkpoint: Arc<Checkpoint>,
    config: HarvestConfig,
}

impl Harvester {
    /// Zero values in `config` are raised to 1.
    pub fn new(
        fetcher: Arc<dyn EnrichmentFetcher>,
        checkpoint: Arc<Checkpoint>,
        config: HarvestConfig,
    ) -> Self {
        let config = HarvestConfig {
            concurrency: config.concurrency.max(1),
            checkpoint_every: config.checkpoint_every.max(1),
        };
        Self {
            fetcher,
            checkpoint,
            config,
        }
    }

    /// Enriches every id not yet in `store`, persisting along the way.
    ///
    /// A failing fetch is recorded as an empty record and the run goes on.
    /// A failing checkpoint write aborts the run; the previous checkpoint on
    /// disk stays valid.
    pub async fn run<I, S>(&self, species_ids: I, store: &TaxonomyStore) -> Result<HarvestReport>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let run_id = uuid::Uuid::new_v4();
        let span = tracing::info_span!("harvest", run_id = %run_id);
        self.run_inner(species_ids, store).instrument(span).await
    }

    async fn run_inner<I, S>(&self, species_ids: I, store: &TaxonomyStore) -> Result<HarvestReport>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let (pending, mut report) = plan(species_ids, store);

        tracing::info!(
            "Harvest planned: {} requested, {} unique, {} already stored, {} invalid, {} to fetch",
            report.requested,
            report.unique,
            report.skipped_existing,
            report.skipped_invalid,
            pending.len()
        );

        let total = pending.len();
        let mut results = stream::iter(pending.into_iter().map(|species_id| {
            let fetcher = self.fetcher.clone();
            async move {
                let result = fetcher.fetch(species_id.as_str()).await;
                (species_id, result)
            }
        }))
        .buffer_unordered(self.config.concurrency);

        // Fetches keep being polled while a checkpoint is written. Checkpoints
        // that come due during a write collapse into one, run right after it.
        let mut saving: Option<BoxFuture<'_, Result<()>>> = None;
        let mut save_due = false;
        let mut fetching = true;

        while fetching || saving.is_some() {
            tokio::select! {
                saved = wait_for(&mut saving) => {
                    saving = None;
                    saved?;
                    report.checkpoints += 1;
                    tracing::info!("Progress saved after {}/{} species", report.fetched, total);

                    if std::mem::take(&mut save_due) {
                        saving = Some(self.checkpoint.persist(store).boxed());
                    }
                }
                next = results.next(), if fetching => {
                    let Some((species_id, result)) = next else {
                        fetching = false;
                        continue;
                    };
                    let record = match result {
                        Ok(record) => record,
                        Err(e) => {
                            tracing::warn!("Enrichment failed for species {}: {}", species_id, e);
                            SpeciesRecord::default()
                        }
                    };
                    store.insert_if_absent(species_id, record);
                    report.fetched += 1;

                    if report.fetched % self.config.checkpoint_every == 0 {
                        if saving.is_none() {
                            saving = Some(self.checkpoint.persist(store).boxed());
                        } else {
                            save_due = true;
                        }
                    }
                }
            }
        }

        self.checkpoint.persist(store).await?;
        report.checkpoints += 1;

        tracing::info!(
            "Harvest finished: {} fetched, {} records stored at {}",
            report.fetched,
            store.len(),
            self.checkpoint.path().display()
        );
        Ok(report)
    }
}

/// Resolves with the in-flight checkpoint write, or never when there is none.
async fn wait_for(saving: &mut Option<BoxFuture<'_, Result<()>>>) -> Result<()> {
    match saving {
        Some(write) => write.await,
        None => std::future::pending().await,
    }
}

/// Deduplicates the input (first occurrence wins) and splits off ids that are
/// invalid or already stored.
fn plan<I, S>(species_ids: I, store: &TaxonomyStore) -> (Vec<SpeciesId>, HarvestReport)
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut report = HarvestReport::default();
    let mut seen: HashSet<String> = HashSet::new();
    let mut pending = Vec::new();

    for raw in species_ids {
        report.requested += 1;
        let raw = raw.as_ref().trim();
        if !seen.insert(raw.to_string()) {
            continue;
        }
        report.unique += 1;

        match SpeciesId::parse(raw) {
            Ok(species_id) if store.contains(species_id.as_str()) => {
                report.skipped_existing += 1;
            }
            Ok(species_id) => pending.push(species_id),
            Err(e) => {
                tracing::debug!("Skipping {}", e);
                report.skipped_invalid += 1;
            }
        }
    }

    (pending, report)
}
