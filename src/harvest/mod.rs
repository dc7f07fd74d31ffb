//! Harvest Module
//!
//! Drives enrichment for every distinct species id in the image collection and
//! grows the taxonomy store incrementally.
//!
//! ## Run Lifecycle
//! 1. **Plan**: deduplicate the input ids, drop invalid ones and ids already in the store.
//! 2. **Fetch**: enrich the remaining ids with bounded concurrent I/O over one HTTP pool.
//! 3. **Checkpoint**: every `checkpoint_every` completed ids, persist the whole store.
//! 4. **Finish**: persist once more unconditionally.
//!
//! Re-running after a crash resumes where the last checkpoint left off; a run over
//! an already-complete store performs no remote calls.

pub mod harvester;
pub mod types;
