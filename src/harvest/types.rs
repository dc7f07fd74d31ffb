use serde::Serialize;

/// Tunables of a harvest run.
#[derive(Debug, Clone)]
pub struct HarvestConfig {
    /// Maximum number of species enriched at the same time.
    pub concurrency: usize,
    /// Number of completed species between two checkpoints.
    pub checkpoint_every: usize,
}

impl Default for HarvestConfig {
    fn default() -> Self {
        Self {
            concurrency: 8,
            checkpoint_every: 10,
        }
    }
}

/// Summary of one harvest run.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct HarvestReport {
    /// Ids received, duplicates included.
    pub requested: usize,
    /// Distinct ids received.
    pub unique: usize,
    /// Distinct ids rejected as empty or non-numeric.
    pub skipped_invalid: usize,
    /// Distinct ids that already had a record.
    pub skipped_existing: usize,
    /// Ids enriched during this run.
    pub fetched: usize,
    /// Checkpoints written, the final one included.
    pub checkpoints: usize,
}
