pub mod assistant;
pub mod picker;
pub mod providers;
pub mod query;
