//! The script catalog: ordered entry registry and source sync.

pub mod entry;
pub mod order;
pub mod sync;

pub use entry::{
    ConditionSignal, DescriptionSignal, UpdateEntry, CONDITION_SKIP_STATUS, ORDER_FILE_NAME,
};
pub use order::load_order;
pub use sync::sync_catalog;
