pub mod closure;
pub mod import;
pub mod rankings;

pub use closure::ClosureService;
pub use import::{ImportService, ImportSummary};
pub use rankings::RankingService;
