// Daily tiered offers
//
// Admin-managed offers that discount specific menu items for a date window,
// with per-loyalty-tier discount values and at most one redemption per user
// per calendar day.

pub mod error;
pub mod handlers;
pub mod models;
pub mod repository;
pub mod resolver;

pub use error::*;
pub use models::*;
pub use repository::OffersRepository;
pub use resolver::{best_offer_for_item, AppliedOffer, OfferCandidate};
