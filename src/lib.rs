//! # Groupwise
//!
//! Student and work-group management: a rules engine over an in-memory
//! registry that is persisted as a single JSON document after every change.
//!
//! ## Overview
//!
//! - **Students** are registered under a unique all-digit number with a name
//!   and an institutional email.
//! - **Groups** have a unique name and a `min_capacity..=max_capacity` size
//!   range.
//! - **Membership** is exclusive: a student belongs to at most one group.
//!   Removing a member never takes a group below its minimum.
//!
//! ## Architecture
//!
//! ```text
//! src/
//! ├── cli/              # Terminal rendering and the fake-data seeder
//! ├── modules/          # Rules engine services
//! │   ├── students/    # Registration, editing, search
//! │   ├── groups/      # Group lifecycle and search
//! │   └── membership/  # Add, remove, transfer
//! ├── events.rs         # Change notifications
//! ├── logging.rs        # Tracing subscriber setup
//! ├── persistence.rs    # RegistryStore trait, JSON file and memory stores
//! ├── registry.rs       # Entity ownership and cross-reference repair
//! └── state.rs          # AppState shared by every service call
//! ```
//!
//! Supporting crates:
//!
//! - `groupwise-core`: error taxonomy, text folding, serde helpers
//! - `groupwise-models`: `Student`, `Group`, `GroupId`, DTOs, the persisted document
//! - `groupwise-config`: environment-driven configuration
//!
//! ## Quick Start
//!
//! ```bash
//! GROUPWISE_DATA_FILE=data.json
//! GROUPWISE_EMAIL_DOMAINS=my.istec.pt,istec.pt
//! GROUPWISE_DEFAULT_MIN_CAPACITY=2
//! ```
//!
//! ```bash
//! groupwise group add "Projeto Final" --max 4 --min 2
//! groupwise student add 20240001 --name "Ana Silva" --email ana@my.istec.pt
//! groupwise group enroll "Projeto Final" 20240001
//! ```
//!
//! ## Modules
//!
//! - [`cli`]: Presentation helpers and seeding
//! - [`events`]: Notification hub
//! - [`logging`]: Tracing initialization
//! - [`modules`]: Student, group, and membership services
//! - [`persistence`]: Storage backends
//! - [`registry`]: In-memory entity store
//! - [`state`]: Shared application state

pub mod cli;
pub mod events;
pub mod logging;
pub mod modules;
pub mod persistence;
pub mod registry;
pub mod state;

// Re-export workspace crates for convenience
pub use groupwise_config;
pub use groupwise_core;
pub use groupwise_models;
