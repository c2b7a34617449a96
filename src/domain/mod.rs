//! Domain types and models

pub mod listing;
mod deal;
mod user;
mod timestamp;

pub use listing::{Listing, SellerSummary, NewListing, ListingUpdate, ListingCard, format_price};
pub use deal::{Deal, DealStatus, NewDeal, Review, NewReview};
pub use user::User;
