pub mod jwt;
pub mod pending;
pub mod suggest;
