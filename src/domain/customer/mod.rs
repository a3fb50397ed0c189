//! Customer registry

pub mod model;
pub mod repository;
pub mod table;

pub use model::Customer;
pub use repository::CustomerRepository;
pub use table::{CustomerField, CustomerTable};
