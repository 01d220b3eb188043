//! # hackathon-pipeline
//!
//! Multi-tenant REST service that helps hackathon teams decide which events
//! to enter and get their submissions out on time.
//!
//! The planning core ([`planner`]) is a set of pure functions: priority
//! scoring, three-phase plan building, task generation, checklist parsing,
//! submission validation and alert computation. Everything else moves data
//! in and out of it.
//!
//! ## Architecture
//!
//! ```text
//! Clients (HTTP + session token)
//!     │
//!     ├── REST Handlers (api/)        TeamContext extractor (auth/)
//!     │
//!     ├── TrackerService (service/)
//!     │     ├── planner/              pure scoring, planning, alerts
//!     │     ├── llm/                  TextGenerator (Anthropic, OpenAI, stub)
//!     │     └── ingest/               EventSource registry
//!     │
//!     └── TrackerStore (persistence/)
//!           ├── PostgresStore         sqlx + embedded migrations
//!           └── MemoryStore           in-process tables
//! ```

pub mod api;
pub mod app_state;
pub mod auth;
pub mod config;
pub mod domain;
pub mod error;
pub mod ingest;
pub mod llm;
pub mod persistence;
pub mod planner;
pub mod service;
