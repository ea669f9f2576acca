pub mod agent;
pub mod enhancement;
pub mod persona;
mod row;
pub mod thread_type;
pub mod validation;

pub use agent::{AgentConfig, AgentCreation, CreateAgentRequest, PersonaDetail};
pub use enhancement::{EnhancementKind, PersonaEnhancement};
pub use persona::{
    default_behavior_weights, PersonaConfig, PersonaFilter, DEFAULT_MAX_TOKENS, DEFAULT_MODEL,
    DEFAULT_TEMPERATURE,
};
pub use thread_type::ThreadType;
pub use validation::validate_request;
