pub mod issuer;
pub mod models;
pub mod validator;
