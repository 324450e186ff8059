//! Service Module
//!
//! RESTful payment API over a [`Db<Payment>`](crate::db::Db).
//!
//! ## Endpoints
//! - `GET    /v1/payments`      list payments in id order
//! - `POST   /v1/payments`      create a payment (201 + `Location`)
//! - `GET    /v1/payments/:id`  fetch a payment
//! - `PUT    /v1/payments/:id`  replace an existing payment
//! - `DELETE /v1/payments/:id`  delete a payment (absent ids succeed)
//!
//! Store calls are synchronous transactions; handlers hand them to the
//! blocking pool so a slow commit never stalls the runtime.

mod response;
mod routes;
mod server;

pub use response::{ApiError, ErrorResponse};
pub use routes::payment_routes;
pub use server::{router, shutdown_signal, HttpServer};

/// Path prefix of the payment resource
pub const URL_PREFIX: &str = "/v1/payments";
