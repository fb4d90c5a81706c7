pub mod airlines;
pub mod auth;
pub mod banks;
pub mod cities;
pub mod companies;
pub mod dadata;
pub mod extra_services;
pub mod food;
pub mod resource;
pub mod roles;
pub mod rooms;
pub mod transports;
pub mod uploads;
pub mod users;
