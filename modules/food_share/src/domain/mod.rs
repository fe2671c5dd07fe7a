pub mod access;
pub mod badges;
pub mod error;
pub mod events;
pub mod insights;
pub mod ports;
pub mod repo;
pub mod service;
pub mod validation;
