pub mod error;
pub mod io;
pub mod search;
pub mod variant;

pub use error::PhaseError;
