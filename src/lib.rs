//! Chart-ready submission analytics for web forms.
//!
//! The domain layer holds the pure aggregation engine (period calendar,
//! series densification, conversion rates, summary reduction). The
//! application layer orchestrates it over injected data sources, the
//! infrastructure layer supplies the SQLite event store and configuration,
//! and the presentation layer is the HTTP surface.

pub mod application;
pub mod domain;
pub mod error;
pub mod infrastructure;
pub mod presentation;
