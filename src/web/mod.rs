// src/web/mod.rs
pub mod admin_handlers;
pub mod auth_handlers;
pub mod mw_admin;
pub mod mw_auth;
pub mod presenca_handlers;
pub mod routes;
