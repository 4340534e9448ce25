use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Retention class for a captured observation, ordered by durability.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MemoryTier {
    Short,
    Working,
    Long,
}

impl std::fmt::Display for MemoryTier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            MemoryTier::Short => "short",
            MemoryTier::Working => "working",
            MemoryTier::Long => "long",
        };
        f.write_str(s)
    }
}

/// What a workflow phase emits for capture: where it came from, what was
/// seen, and how much it matters.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Observation {
    pub category: String,
    pub content: String,
    /// 0.0 to 1.0
    pub importance: f64,
}

impl Observation {
    pub fn new(category: impl Into<String>, content: impl Into<String>, importance: f64) -> Self {
        Self {
            category: category.into(),
            content: content.into(),
            importance,
        }
    }
}

/// A unit of tiered memory. The tier is the only field that ever mutates
/// (via `promote`); records are never deleted by this subsystem.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MemoryRecord {
    pub id: Uuid,
    pub category: String,
    pub content: String,
    pub importance: f64,
    pub tier: MemoryTier,
    pub created_at_ms: u64,
}
