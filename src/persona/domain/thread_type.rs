//! Orchestration pattern tags.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// How agents derived from a persona coordinate with each other.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum ThreadType {
    /// Single agent, single task.
    #[default]
    Base,
    /// Independent agents running side by side.
    Parallel,
    /// Sequential handoff with context passing.
    Chained,
    /// Several agents collaborating on one output.
    Fusion,
    /// Large context with a central planner.
    Big,
    /// Fully automated, event-driven execution.
    #[serde(alias = "zero-touch")]
    ZeroTouch,
}

impl ThreadType {
    pub const ALL: [ThreadType; 6] = [
        ThreadType::Base,
        ThreadType::Parallel,
        ThreadType::Chained,
        ThreadType::Fusion,
        ThreadType::Big,
        ThreadType::ZeroTouch,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            ThreadType::Base => "base",
            ThreadType::Parallel => "parallel",
            ThreadType::Chained => "chained",
            ThreadType::Fusion => "fusion",
            ThreadType::Big => "big",
            ThreadType::ZeroTouch => "zero_touch",
        }
    }

    pub fn description(&self) -> &'static str {
        match self {
            ThreadType::Base => "Single agent, single task execution",
            ThreadType::Parallel => "Multiple independent agents executing simultaneously",
            ThreadType::Chained => "Sequential agent handoff with context passing",
            ThreadType::Fusion => "Multiple agents collaborating on single output",
            ThreadType::Big => "Large context, multi-step planning with orchestration",
            ThreadType::ZeroTouch => "Fully automated execution without human input",
        }
    }

    pub fn use_case(&self) -> &'static str {
        match self {
            ThreadType::Base => "Simple queries, direct actions",
            ThreadType::Parallel => "Multi-source research, concurrent tasks",
            ThreadType::Chained => "Multi-step workflows, validation pipelines",
            ThreadType::Fusion => "Complex analysis, consensus building",
            ThreadType::Big => "Complex projects, architectural design",
            ThreadType::ZeroTouch => "Background tasks, scheduled operations",
        }
    }

    pub fn coordination(&self) -> &'static str {
        match self {
            ThreadType::Base => "none",
            ThreadType::Parallel => "result_aggregation",
            ThreadType::Chained => "sequential_handoff",
            ThreadType::Fusion => "collaborative_merge",
            ThreadType::Big => "central_planner",
            ThreadType::ZeroTouch => "event_driven",
        }
    }
}

impl fmt::Display for ThreadType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ThreadType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "base" => Ok(ThreadType::Base),
            "parallel" => Ok(ThreadType::Parallel),
            "chained" => Ok(ThreadType::Chained),
            "fusion" => Ok(ThreadType::Fusion),
            "big" => Ok(ThreadType::Big),
            "zero_touch" | "zero-touch" => Ok(ThreadType::ZeroTouch),
            other => Err(format!(
                "Unknown thread type: {}. Must be base, parallel, chained, fusion, big, or zero_touch",
                other
            )),
        }
    }
}
