pub mod error;

pub use error::DocCheckError;
