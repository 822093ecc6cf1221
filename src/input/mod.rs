pub mod model;

pub use model::TaskRequest;
