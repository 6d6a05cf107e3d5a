use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Upstream entity id. start.gg returns ids as JSON numbers in some
/// queries and strings in others; both normalize to a string so every
/// comparison in the codebase is string-normalized.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "IdRepr")]
pub struct Id(pub String);

#[derive(Deserialize)]
#[serde(untagged)]
enum IdRepr {
    Number(serde_json::Number),
    Text(String),
}

impl From<IdRepr> for Id {
    fn from(repr: IdRepr) -> Self {
        Self(match repr {
            IdRepr::Number(n) => n.to_string(),
            IdRepr::Text(s) => s,
        })
    }
}

impl Id {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Id {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

impl From<String> for Id {
    fn from(s: String) -> Self {
        Self(s)
    }
}

impl From<&str> for Id {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

/// A player under comparison. Roster membership is by id equality.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Player {
    pub id: Id,
    pub gamer_tag: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub prefix: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user_slug: Option<String>,
}

impl Player {
    pub fn new(id: impl Into<Id>, gamer_tag: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            gamer_tag: gamer_tag.into(),
            prefix: None,
            user_slug: None,
        }
    }

    /// Tag with the team/region prefix when one is present
    pub fn display_name(&self) -> String {
        match &self.prefix {
            Some(prefix) => format!("{} | {}", prefix, self.gamer_tag),
            None => self.gamer_tag.clone(),
        }
    }
}

/// How many of the most recent shared sets a tally covers
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RecencyWindow {
    Short,
    Medium,
    Long,
    All,
}

impl RecencyWindow {
    /// Set count the window truncates to; `None` keeps every shared set.
    pub fn max_sets(&self) -> Option<usize> {
        match self {
            RecencyWindow::Short => Some(10),
            RecencyWindow::Medium => Some(20),
            RecencyWindow::Long => Some(30),
            RecencyWindow::All => None,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            RecencyWindow::Short => "last 10 matches",
            RecencyWindow::Medium => "last 20 matches",
            RecencyWindow::Long => "last 30 matches",
            RecencyWindow::All => "all matches",
        }
    }
}

impl Default for RecencyWindow {
    fn default() -> Self {
        RecencyWindow::Medium
    }
}

impl FromStr for RecencyWindow {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "short" | "10" => Ok(RecencyWindow::Short),
            "medium" | "20" => Ok(RecencyWindow::Medium),
            "long" | "30" => Ok(RecencyWindow::Long),
            "all" => Ok(RecencyWindow::All),
            other => Err(format!(
                "Unknown window '{}' (expected short, medium, long or all)",
                other
            )),
        }
    }
}

// --- API Response Structures ---

/// A completed set as returned by the start.gg sets queries
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SetNode {
    pub id: Id,
    #[serde(default)]
    pub winner_id: Option<Id>,
    #[serde(default)]
    pub completed_at: Option<i64>,
    #[serde(default)]
    pub display_score: Option<String>,
    #[serde(default)]
    pub full_round_text: Option<String>,
    #[serde(default)]
    pub event: Option<EventNode>,
    #[serde(default)]
    pub slots: Option<Vec<SlotNode>>,
}

impl SetNode {
    pub fn completed_at_utc(&self) -> Option<DateTime<Utc>> {
        self.completed_at.and_then(|t| DateTime::from_timestamp(t, 0))
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SlotNode {
    #[serde(default)]
    pub entrant: Option<EntrantNode>,
}

/// A competing unit in a set; carries one participant in singles,
/// several in doubles/team events
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EntrantNode {
    pub id: Id,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub participants: Option<Vec<ParticipantNode>>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ParticipantNode {
    #[serde(default)]
    pub id: Option<Id>,
    #[serde(default)]
    pub gamer_tag: Option<String>,
    #[serde(default)]
    pub prefix: Option<String>,
    #[serde(default)]
    pub user: Option<UserRef>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserRef {
    #[serde(default)]
    pub slug: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EventNode {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub tournament: Option<TournamentRef>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TournamentRef {
    pub id: Id,
    pub name: String,
    pub slug: String,
    #[serde(default)]
    pub start_at: Option<i64>,
}
