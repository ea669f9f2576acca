//! Persona domain
//!
//! Personas are immutable templates loaded from the persona store. Enhancements
//! are typed modifiers applied on top of a persona in priority order. The
//! composition engine folds them into a new persona value, and the prompt
//! assembler renders the final instruction text for the agent runtime.

pub mod compose;
pub mod domain;
pub mod merge;
pub mod prompt;
pub mod repository;
pub mod service;

pub use compose::{compose, order_for_application, Overrides};
pub use domain::{
    AgentConfig, AgentCreation, CreateAgentRequest, EnhancementKind, PersonaConfig,
    PersonaDetail, PersonaEnhancement, PersonaFilter, ThreadType,
};
pub use prompt::{assemble, prompt_digest};
pub use repository::{
    EnhancementFilter, MemoryPersonaRepository, PersonaRepository, RestPersonaRepository,
    SeedDocument,
};
pub use service::{
    HealthReport, HealthStatus, PersonaService, AGENT_CREATED_SUBJECT, DEFAULT_VERSION,
};
