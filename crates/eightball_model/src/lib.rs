use std::fmt::Display;

use serde::{Deserialize, Serialize};
use thiserror::Error;

pub mod catalog;
pub mod filter;
pub mod oracle;

pub use catalog::select_response;
pub use filter::{is_disallowed, ContentFilter, DISALLOWED_TERMS};
pub use oracle::{Oracle, ShakeTicket};

/// Sentiment class of a Magic 8 Ball answer.
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "camelCase")]
pub enum Category {
    Positive,
    Neutral,
    Negative,
}

impl Category {
    pub const ALL: [Category; 3] = [Category::Positive, Category::Neutral, Category::Negative];

    pub fn answers(&self) -> &'static [&'static str] {
        match self {
            Category::Positive => catalog::POSITIVE,
            Category::Neutral => catalog::NEUTRAL,
            Category::Negative => catalog::NEGATIVE,
        }
    }

    /// CSS color the answer is rendered with.
    pub fn color(&self) -> &'static str {
        match self {
            Category::Positive => "#00ff00",
            Category::Neutral => "#ffaa00",
            Category::Negative => "#ff3333",
        }
    }
}

impl Display for Category {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(match self {
            Category::Positive => "positive",
            Category::Neutral => "neutral",
            Category::Negative => "negative",
        })
    }
}

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Answer {
    pub text: String,
    pub category: Category,
}

impl Answer {
    pub fn color(&self) -> &'static str {
        self.category.color()
    }
}

#[derive(Clone, Copy, Debug, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub enum Phase {
    #[default]
    Idle,
    Busy,
    Answered,
}

/// Rejections of a shake attempt. `Display` is the text shown to the user.
#[derive(Clone, Copy, Debug, Error, PartialEq, Eq)]
pub enum UserError {
    #[error("Please ask a question first! 🔮")]
    EmptyQuestion,
    #[error(
        "🔮 The Magic 8 Ball only answers kind and appropriate questions! \
         Please try again with a different question."
    )]
    DisallowedContent,
}
