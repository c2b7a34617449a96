//! Marketplace backend client
//!
//! ```text
//!   ListingController     DetailController
//!          │                     │
//!   ┌──────┴───────┐      ┌──────┴─────┐
//!   │ListingSource │      │ DealSource │   (traits)
//!   └──────┬───────┘      └──────┬─────┘
//!          └──────────┬──────────┘
//!            ┌────────┴──────────┐
//!            │ MarketplaceClient │
//!            └────────┬──────────┘
//!            ┌────────┴──────────┐
//!            │ RateLimitedClient │
//!            └───────────────────┘
//! ```

pub mod traits;
pub mod http_client;
mod marketplace;
mod models;

// Re-export commonly used types
pub use traits::{
    ApiError,
    ApiResult,
    ErrorKind,
    ListingSource,
    DealSource,
    PAGE_SIZE,
};
pub use http_client::RateLimitedClient;
pub use marketplace::MarketplaceClient;
pub use models::{AuthResponse, ListingQuery};
