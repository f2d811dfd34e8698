//! # Tienda payment server
//! This crate hosts the HTTP layer of the payment backend. It is responsible for:
//! Accepting checkout requests from the storefront and creating the matching gateway transaction.
//! Receiving and authenticating webhook event deliveries from the gateway.
//! Serving order and transaction state from the local mirror, reconciling against the gateway on demand.
//!
//! ## Configuration
//! The server is configured via environment variables. See [config](config/index.html) for more information.
//!
//! ## Routes
//! The server exposes the following routes:
//! * `/health`: A health check route that returns a 200 OK response.
//! * `/orders`, `/orders/{order_id}`: Order registration and lookup.
//! * `/transactions`, `/transactions/{gateway_id}`: Checkout and transaction polling.
//! * `/webhooks`: The webhook route for receiving transaction events from the gateway.

pub mod cli;
pub mod config;
pub mod data_objects;
pub mod errors;
pub mod integrations;
pub mod routes;
pub mod server;
pub mod wompi_routes;

#[cfg(test)]
mod endpoint_tests;
