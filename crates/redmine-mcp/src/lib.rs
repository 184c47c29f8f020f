//! MCP server for Redmine.
//!
//! This crate provides an MCP (Model Context Protocol) server that exposes a
//! Redmine instance to AI assistants like Claude.
//!
//! # Architecture
//!
//! The server uses the `rmcp` crate for MCP protocol handling and wraps the
//! `IssueTracker` trait from the redmine crate. Configuration is resolved once
//! at startup and passed into the client.
//!
//! # Tools
//!
//! ## Issues
//! - `get-issue` - Fetch an issue with a window of its journals
//! - `update-issue` - Update issue fields and notes, optionally logging time
//!
//! ## Reference Data
//! - `list-issue-statuses` - List all issue statuses
//! - `list-project-members` - List users and groups in a project
//! - `whoami` - Show the authenticated user

pub mod cli;
pub mod error;
pub mod models;
pub mod server;
pub mod tools;

pub use error::{Error, Result};
pub use server::RedmineMcpServer;
