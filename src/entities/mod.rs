pub mod airline;
pub mod bank;
pub mod city;
pub mod company;
pub mod extra_service;
pub mod food;
pub mod role;
pub mod room;
pub mod status;
pub mod transport;
pub mod transport_photo;
pub mod user;
