//! Customer card registry

pub mod model;
pub mod repository;
pub mod table;

pub use model::Card;
pub use repository::CardRepository;
pub use table::{CardField, CardTable};
