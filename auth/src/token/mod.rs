pub mod entropy;
pub mod errors;
pub mod generator;

pub use entropy::EntropySource;
pub use entropy::OsEntropy;
pub use errors::TokenError;
pub use generator::TokenGenerator;
pub use generator::TOKEN_BYTES;
pub use generator::TOKEN_LENGTH;
