//! # roster
//!
//! A small CRUD HTTP API over user records, each a first name, a last name
//! and a hobby, stored in MongoDB.
//!
//! ## Surface
//!
//! | Method | Path | Answers |
//! |---|---|---|
//! | GET | `/` | welcome text |
//! | GET | `/favicon.ico` | `204` |
//! | GET | `/api/users` | every user |
//! | GET | `/api/users/{id}` | one user, or `404` |
//! | POST | `/api/users` | `201` with the created user, or `400` |
//! | PUT | `/api/users/{id}` | the updated user, `400` or `404` |
//! | DELETE | `/api/users/{id}` | `{"message":"User deleted"}`, or `404` |
//!
//! Unknown routes answer `404 {"error":"Route not found"}`; anything that
//! goes wrong inside answers `500 {"error":"Something went wrong!"}`.
//!
//! ## Layers
//!
//! - [`Server`]: hyper connection loop with graceful shutdown
//! - [`App`]: body parsing, request logging, routing, fallbacks
//! - [`Router`]: radix-tree routing via [`matchit`]
//! - [`middleware`]: the pipeline and its stages
//! - [`controller`]: the five CRUD handlers
//! - [`store`]: the persistence port, with MongoDB and in-memory adapters
//!
//! ## Quick start
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use roster::{App, Config, MongoStore, Server};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = Config::from_env()?;
//!     let store = MongoStore::connect(&config.mongo_uri, config.mongo_db.as_deref()).await?;
//!     Server::bind(config.addr()).await?.serve(App::new(Arc::new(store))).await;
//!     Ok(())
//! }
//! ```

mod app;
mod config;
mod error;
mod handler;
mod request;
mod response;
mod router;
mod routes;
mod server;

pub mod controller;
pub mod middleware;
pub mod model;
pub mod store;

pub use app::App;
pub use config::{Config, ConfigError};
pub use error::{BoxError, Error};
pub use handler::{BoxFuture, Handler, IntoOutcome};
pub use model::{NewUser, User, UserInput, UserPatch, ValidationErrors};
pub use request::Request;
pub use response::{IntoResponse, Json, Response, ResponseBuilder};
pub use router::Router;
pub use server::Server;
pub use store::{MemoryStore, MongoStore, StoreError, UserStore};
