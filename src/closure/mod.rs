pub mod computer;
pub mod types;

pub use computer::compute_closure;
pub use types::{
    ApprovedClosure, ClosureEntry, ClosureStatus, ClosureSummary, DraftClosure, EntryUpdate,
    MovementType, SeasonClosure,
};
