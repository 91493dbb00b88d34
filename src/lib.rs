pub mod apify;
pub mod audit;
pub mod category;
pub mod collector;
pub mod config;
pub mod error;
pub mod heuristics;
pub mod instagram;
pub mod markets;
pub mod profile;
pub mod seeds;
pub mod store;
pub mod vendor;

mod data;
mod utils;

pub use category::Category;
pub use data::Table;
pub use error::CollectorError;
