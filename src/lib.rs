//! # TaskMaster
//!
//! Turns meeting transcripts into a task board.
//!
//! This library provides:
//! - An HTTP extraction service that proxies a transcript to a generative-text
//!   model and recovers a JSON array of task candidates from its reply
//! - A client-side board that normalizes candidates into typed tasks, with
//!   filtering, sorting, search, stats and local persistence
//!
//! ## Architecture
//!
//! ```text
//!   ┌──────────────┐  POST /api/extract-tasks  ┌────────────────────┐
//!   │ Board client │ ────────────────────────▶ │ Extraction service │
//!   │  (taskboard) │ ◀──────────────────────── │    (taskmaster)    │
//!   └──────┬───────┘     { tasks: [...] }      └─────────┬──────────┘
//!          │                                             │ prompt
//!          ▼                                             ▼
//!   ┌──────────────┐                            ┌────────────────────┐
//!   │  Local store │                            │  TextGenerator     │
//!   └──────────────┘                            │  (Gemini)          │
//!                                               └────────────────────┘
//! ```
//!
//! ## Modules
//! - `api`: HTTP routes for the extraction service
//! - `extraction`: prompt construction and JSON array recovery
//! - `llm`: generative-text client abstraction and the Gemini implementation
//! - `board`: task model, normalization, board state, local store and the
//!   extraction client

pub mod api;
pub mod board;
pub mod config;
pub mod extraction;
pub mod llm;

pub use board::{Board, Priority, Task};
pub use config::Config;
pub use extraction::{ExtractError, ExtractionService};
