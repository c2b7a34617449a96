//! Screen controllers
//!
//! Controllers hold screen state and talk to the backend through the
//! `ListingSource` / `DealSource` seams and to the host through
//! `MiniAppBridge`. They never render anything themselves.

mod debounce;
mod detail;
mod listing;
mod view;
#[cfg(test)]
pub(crate) mod testing;

pub use debounce::Debouncer;
pub use detail::{purchase_error_message, DetailController, PurchaseOutcome};
pub use listing::{
    load_error_message, ListingController, LoadOutcome, LoadPhase, PageState, SEARCH_DEBOUNCE,
};
pub use view::{ListingView, TracingView};
