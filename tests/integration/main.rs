//! Integration tests for persona composition, the service, and the CLI.

mod cli;
mod composition;
mod service;
mod support;
