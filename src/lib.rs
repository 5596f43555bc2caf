#[macro_use]
extern crate diesel;

#[macro_use]
extern crate diesel_migrations;

pub mod auth;
pub mod config;
pub mod core;
pub mod db;
pub mod http;
pub mod provider;
pub mod service;
pub mod util;
