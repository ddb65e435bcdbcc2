use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;

/// Pipeline stage (one board column)
///
/// The set is closed and ordered: a task always sits in exactly one of these,
/// and new tasks start in the first one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum Stage {
    Stories,
    InProgress,
    PeerReview,
    InTesting,
    Done,
}

impl Stage {
    /// All stages in board order
    pub const ALL: [Stage; 5] = [
        Stage::Stories,
        Stage::InProgress,
        Stage::PeerReview,
        Stage::InTesting,
        Stage::Done,
    ];

    /// The stage new tasks are created in
    pub fn first() -> Self {
        Self::ALL[0]
    }

    pub fn all() -> &'static [Stage] {
        &Self::ALL
    }

    /// Stable identifier, used in snapshots and on the command line
    pub fn id(&self) -> &'static str {
        match self {
            Stage::Stories => "stories",
            Stage::InProgress => "in-progress",
            Stage::PeerReview => "peer-review",
            Stage::InTesting => "in-testing",
            Stage::Done => "done",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Stage::Stories => "Stories",
            Stage::InProgress => "In Progress",
            Stage::PeerReview => "Peer Review",
            Stage::InTesting => "In Testing",
            Stage::Done => "Done",
        }
    }

    /// Presentation color name (terminal palette)
    pub fn color(&self) -> &'static str {
        match self {
            Stage::Stories => "red",
            Stage::InProgress => "blue",
            Stage::PeerReview => "yellow",
            Stage::InTesting => "magenta",
            Stage::Done => "green",
        }
    }

    /// Position of the stage in board order
    pub fn index(&self) -> usize {
        Self::ALL.iter().position(|s| s == self).unwrap_or(0)
    }

    pub fn is_first(&self) -> bool {
        *self == Self::first()
    }

    /// Parse a stage identifier.
    ///
    /// Case-insensitive. Spaces, underscores and camelCase are accepted so that
    /// `in progress`, `inProgress` and `in_progress` all name the same stage as
    /// `in-progress`.
    pub fn from_id(s: &str) -> Option<Self> {
        let normalized = normalize_stage_id(s);
        Self::ALL.iter().copied().find(|stage| stage.id() == normalized)
    }
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.id())
    }
}

// Lenient so snapshots written with `in progress` or `inProgress` still load
impl<'de> Deserialize<'de> for Stage {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        Stage::from_id(&raw)
            .ok_or_else(|| serde::de::Error::custom(format!("unknown stage '{}'", raw)))
    }
}

fn normalize_stage_id(s: &str) -> String {
    let mut out = String::with_capacity(s.len() + 2);
    let mut prev_lower = false;
    for c in s.trim().chars() {
        if c == ' ' || c == '_' || c == '-' {
            if !out.ends_with('-') && !out.is_empty() {
                out.push('-');
            }
            prev_lower = false;
        } else if c.is_uppercase() {
            if prev_lower && !out.ends_with('-') {
                out.push('-');
            }
            out.extend(c.to_lowercase());
            prev_lower = false;
        } else {
            out.push(c);
            prev_lower = c.is_lowercase();
        }
    }
    out
}
