//! Storefront and admin backend for downloadable digital products.

pub mod config;
pub mod database;
pub mod dtos;
pub mod email;
pub mod error;
pub mod handlers;
pub mod models;
pub mod routes;
pub mod services;
pub mod state;
pub mod storage;
pub mod validation;
