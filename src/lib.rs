//! Persona Forge: deterministic agent configuration from personas.
//!
//! A persona is a stored template for an agent. Enhancements are typed,
//! prioritized modifiers layered on top of it. This crate fetches both from a
//! persona store, folds the enhancements into the persona, applies request
//! overrides, and renders the final system prompt into an [`AgentConfig`].

pub mod config;
pub mod error;
pub mod events;
pub mod logging;
pub mod persona;
pub mod tooling;
pub mod types;

pub use error::{PersonaError, Result};
pub use persona::{
    assemble, compose, AgentConfig, AgentCreation, CreateAgentRequest, EnhancementKind,
    Overrides, PersonaConfig, PersonaEnhancement, PersonaService, ThreadType,
};
