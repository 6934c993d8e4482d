//! Data models for ShowBoard

use serde::Deserialize;
use std::fmt;

/// UI Tab selection
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Tab {
    Dashboard,
    Console,
}

/// Sort order applied to the rendered show list
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub enum SortOrder {
    #[default]
    Default,
    NameAsc,
    NameDesc,
    RatingDesc,
}

impl SortOrder {
    pub const ALL: [SortOrder; 4] = [
        SortOrder::Default,
        SortOrder::NameAsc,
        SortOrder::NameDesc,
        SortOrder::RatingDesc,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            SortOrder::Default => "Server order",
            SortOrder::NameAsc => "Name A-Z",
            SortOrder::NameDesc => "Name Z-A",
            SortOrder::RatingDesc => "Rating high-low",
        }
    }
}

/// Stable show identifier as assigned by the API
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Deserialize)]
#[serde(transparent)]
pub struct MovieId(pub u64);

impl fmt::Display for MovieId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Show lifecycle status
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(from = "String")]
pub enum ShowStatus {
    Running,
    Ended,
    ToBeDetermined,
    InDevelopment,
    Other(String),
}

impl ShowStatus {
    pub fn as_str(&self) -> &str {
        match self {
            ShowStatus::Running => "Running",
            ShowStatus::Ended => "Ended",
            ShowStatus::ToBeDetermined => "To Be Determined",
            ShowStatus::InDevelopment => "In Development",
            ShowStatus::Other(s) => s,
        }
    }
}

impl From<String> for ShowStatus {
    fn from(s: String) -> Self {
        match s.as_str() {
            "Running" => ShowStatus::Running,
            "Ended" => ShowStatus::Ended,
            "To Be Determined" => ShowStatus::ToBeDetermined,
            "In Development" => ShowStatus::InDevelopment,
            _ => ShowStatus::Other(s),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Default, Deserialize)]
pub struct Rating {
    #[serde(default)]
    pub average: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct MovieImage {
    pub medium: String,
    pub original: String,
}

/// A single catalog entry (TVMaze show shape)
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Movie {
    pub id: MovieId,
    pub name: String,
    #[serde(default)]
    pub language: Option<String>,
    #[serde(default)]
    pub genres: Vec<String>,
    pub status: ShowStatus,
    #[serde(default)]
    pub rating: Rating,
    #[serde(default)]
    pub image: Option<MovieImage>,
    #[serde(default)]
    pub summary: Option<String>,
    #[serde(default)]
    pub official_site: Option<String>,
}

impl Movie {
    /// Rating worth showing; the API reports unrated shows as null or 0
    pub fn shown_rating(&self) -> Option<f64> {
        self.rating.average.filter(|avg| *avg != 0.0)
    }

    /// "8.8/10", or "N/A" when the show has no rating
    pub fn rating_label(&self) -> String {
        match self.shown_rating() {
            Some(avg) => format!("{}/10", avg),
            None => "N/A".to_string(),
        }
    }

    pub fn genres_label(&self) -> String {
        self.genres.join(", ")
    }

    /// Ended shows can no longer be selected
    pub fn is_unavailable(&self) -> bool {
        self.status == ShowStatus::Ended
    }

    /// Summary with HTML markup removed
    pub fn plain_summary(&self) -> Option<String> {
        self.summary.as_deref().map(strip_html).filter(|s| !s.is_empty())
    }
}

impl fmt::Display for Movie {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let rating = match self.shown_rating() {
            Some(avg) => format!("{}/10", avg),
            None => "No rating".to_string(),
        };
        write!(f, "{} ({}) - Rating: {}", self.name, self.genres_label(), rating)
    }
}

/// User-submitted review
#[derive(Debug, Clone, PartialEq)]
pub enum Review {
    Positive { message: String },
    Negative { message: String },
}

impl Review {
    pub fn message(&self) -> &str {
        match self {
            Review::Positive { message } | Review::Negative { message } => message,
        }
    }
}

impl fmt::Display for Review {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Review::Positive { message } => write!(f, "Positive review: {}", message),
            Review::Negative { message } => write!(f, "Negative review: {}", message),
        }
    }
}

/// Remove tags and decode the handful of entities the API emits
pub fn strip_html(html: &str) -> String {
    let mut out = String::with_capacity(html.len());
    let mut in_tag = false;
    for c in html.chars() {
        match c {
            '<' => in_tag = true,
            '>' if in_tag => {
                in_tag = false;
                out.push(' ');
            }
            _ if !in_tag => out.push(c),
            _ => {}
        }
    }

    out.replace("&amp;", "&")
        .replace("&quot;", "\"")
        .replace("&#39;", "'")
        .replace("&lt;", "<")
        .replace("&gt;", ">")
        .replace("&nbsp;", " ")
        .split_whitespace()
        .collect::<Vec<&str>>()
        .join(" ")
}
