//! # Digital Hub
//!
//! Content and messaging core of the Swadhin Digital Hub marketing site.
//!
//! Every page of the site reads one or more collections from a hosted
//! document store; the chat widget and the contact form forward visitor
//! input to automation webhooks. This crate provides those pieces with
//! typed APIs, plus the `hub` CLI and a small content API server.
//!
//! ## Architecture
//!
//! ```text
//! ┌──────────────┐   ┌──────────────┐   ┌──────────────┐
//! │ DocumentStore│──▶│ DataService  │──▶│   content    │
//! │ HTTP/File/Mem│   │  get_all<T>  │   │ slices/sorts │
//! └──────────────┘   │  get_by_id<T>│   └──────┬───────┘
//!                    └──────────────┘          │
//!                                    ┌─────────┴────────┐
//!                                    ▼                  ▼
//!                              ┌──────────┐       ┌──────────┐
//!                              │   CLI    │       │   HTTP   │
//!                              │  (hub)   │       │  server  │
//!                              └──────────┘       └──────────┘
//!
//! ┌──────────────┐   ┌──────────────┐   ┌──────────────┐
//! │ ChatSession  │──▶│  ChatWidget  │──▶│ chat webhook │
//! │ token store  │   │  transcript  │   └──────────────┘
//! └──────────────┘   └──────────────┘
//!                    ┌──────────────┐   ┌──────────────┐
//!                    │ ContactForm  │──▶│contact webhook│
//!                    └──────────────┘   └──────────────┘
//! ```
//!
//! ## Modules
//!
//! | Module | Purpose |
//! |--------|---------|
//! | [`config`] | TOML configuration parsing |
//! | [`error`] | Typed errors for store, webhooks, sessions |
//! | [`models`] | Content entity types |
//! | [`store`] | Document store backends and the generic data service |
//! | [`content`] | Page-level slicing, ordering and formatting |
//! | [`session`] | Per-profile chat identity |
//! | [`webhook`] | Chat and contact webhook transports |
//! | [`chat`] | Chat widget state machine and transcript |
//! | [`contact`] | Contact form submission flow |
//! | [`server`] | Content API HTTP server |

pub mod chat;
pub mod config;
pub mod contact;
pub mod content;
pub mod error;
pub mod models;
pub mod server;
pub mod session;
pub mod store;
pub mod webhook;
