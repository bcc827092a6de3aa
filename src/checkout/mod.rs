// Checkout module
//
// Cart line validation and pricing, the pure discount/service-charge
// pipeline, and the mock payment gateway.

pub mod cart;
pub mod error;
pub mod handlers;
pub mod models;
pub mod payment;
pub mod pricing;

pub use cart::CartPricer;
pub use error::*;
pub use models::*;
pub use payment::{PaymentGateway, PaymentOutcome};
