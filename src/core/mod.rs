//! # Core Application Logic
//!
//! This module contains Parley's business logic.
//! It knows nothing about any specific UI technology.
//!
//! ```text
//!                    ┌─────────────────────────┐
//!                    │         CORE            │
//!                    │  (this module)          │
//!                    │                         │
//!                    │  • State (app data)     │
//!                    │  • Action (events)      │
//!                    │  • update() (reducer)   │
//!                    │                         │
//!                    │  No UI. I/O only via    │
//!                    │  runtime::perform       │
//!                    └───────────┬─────────────┘
//!                                │
//!                ┌───────────────┴───────────────┐
//!                ▼                               ▼
//!         ┌────────────┐                  ┌────────────┐
//!         │    TUI     │                  │  One-shot  │
//!         │  Adapter   │                  │   (CLI)    │
//!         │ (ratatui)  │                  │            │
//!         └────────────┘                  └────────────┘
//! ```
//!
//! ## Modules
//!
//! - [`state`]: The `App` struct, all application state in one place
//! - [`action`]: The `Action` enum and the `update()` reducer
//! - [`runtime`]: Runs the effects `update()` asks for (timers, requests)
//! - [`transcript`]: Append-only conversation log
//! - [`lockout`]: Input controls and the lock/unlock state machine
//! - [`turn`]: One user message and its reply
//! - [`config`]: Settings resolution

pub mod action;
pub mod config;
pub mod lockout;
pub mod runtime;
pub mod state;
pub mod transcript;
pub mod turn;
