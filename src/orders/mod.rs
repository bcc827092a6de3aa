pub mod error;
pub mod handlers;
pub mod models;
pub mod repository;
pub mod service;
pub mod status_machine;

pub use error::*;
pub use handlers::*;
pub use models::*;
pub use repository::OrdersRepository;
pub use service::OrderService;
pub use status_machine::StatusMachine;
