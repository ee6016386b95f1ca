//! Facility server
//!
//! Backend for a tabletop campaign tracker: departments, agents,
//! abnormalities and the facility map, persisted in Postgres and served
//! over HTTP. Also ships the `wait` startup gate used as the container
//! entrypoint.

pub mod api;
pub mod cli;
pub mod config;
pub mod domain;
pub mod infrastructure;

pub use config::AppConfig;
