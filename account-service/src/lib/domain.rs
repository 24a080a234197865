pub mod authorization;
pub mod errors;
pub mod principal;
pub mod token;
