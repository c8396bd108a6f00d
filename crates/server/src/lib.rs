pub mod errors;
pub mod routes;
pub mod startup;
pub mod variant;

pub use startup::run;
pub use variant::Variant;
