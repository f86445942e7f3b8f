/*!
 * Catalog documents and the flat-file stages around translation.
 *
 * - `model`: the `.xcstrings` document and localization values
 * - `unit`: work units, tagged results and fragments
 * - `store`: directory layout and descriptor I/O
 * - `split`: the split stage and the missing-translation report
 * - `merge`: the merge stage
 */

pub mod merge;
pub mod model;
pub mod split;
pub mod store;
pub mod unit;

pub use merge::{MergeSummary, merge_catalog};
pub use model::{Catalog, ChunkMeta, Localization, StringUnit};
pub use split::{MissingReport, SplitSummary, missing_report, split_catalog};
pub use store::{CatalogLayout, CatalogStore, PendingDescriptor};
pub use unit::{CatalogFragment, Outcome, TranslationResult, WorkUnit};
