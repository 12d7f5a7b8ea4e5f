pub mod pokemon;
pub mod profile;
pub mod species;

pub use pokemon::*;
pub use profile::*;
