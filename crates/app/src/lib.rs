//! Valet application: REST collaborators, checkout controller and
//! configuration for the point-of-sale command line.

pub mod api;
pub mod cart_file;
pub mod checkout;
pub mod config;
pub mod context;
pub mod observability;
pub mod receipts;
