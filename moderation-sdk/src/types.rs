use serde::{Deserialize, Serialize};

/// Provider-neutral outcome of a moderation call
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ModerationVerdict {
    pub flagged: bool,
    /// Names of the categories the provider marked, empty when not flagged
    pub categories: Vec<String>,
}

impl ModerationVerdict {
    pub fn allowed() -> Self {
        Self {
            flagged: false,
            categories: Vec::new(),
        }
    }

    pub fn flagged<I, S>(categories: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            flagged: true,
            categories: categories.into_iter().map(Into::into).collect(),
        }
    }
}
