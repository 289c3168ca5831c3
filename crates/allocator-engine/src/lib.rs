//! Session state, market refresh and export.
//!
//! A [`Session`] owns everything one user sees: portfolio, mode, the
//! market cache and the last computed [`Decision`]. The [`MarketService`]
//! fills the cache with at most one fetch in flight, and the [`Scheduler`]
//! drives it periodically.

mod export;
mod refresh;
mod session;
mod sources;

pub use export::{ExportMetadata, ExportSnapshot, MarketData};
pub use refresh::{FetchedBatch, MarketService, RefreshOutcome, Scheduler, Trigger};
pub use session::{Decision, Session};
pub use sources::{build_chain, build_sources};
