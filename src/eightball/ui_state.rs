use eightball_model::{Answer, Category, Oracle, Phase};
use serde::Serialize;

const TITLE: &str = "🔮 Magic 8 Ball 🔮";
const SUBTITLE: &str = "Ask a yes or no question and shake the ball!";
const PLACEHOLDER: &str = "Type your question here...";
const INSTRUCTIONS_HEADER: &str = "💡 How to use:";
const INSTRUCTIONS: &[&str] = &[
    "1. Type a yes/no question",
    "2. Click the ball or button to shake",
    "3. Wait for your mystical answer!",
];

/// What the triangle window of the ball shows.
#[derive(Clone, Debug, Serialize, PartialEq)]
#[serde(rename_all = "camelCase", tag = "type")]
pub enum BallView {
    Eight,
    Thinking,
    Answer {
        text: String,
        category: Category,
        color: &'static str,
    },
}

impl From<&Answer> for BallView {
    fn from(answer: &Answer) -> Self {
        BallView::Answer {
            text: answer.text.clone(),
            category: answer.category,
            color: answer.color(),
        }
    }
}

#[derive(Clone, Debug, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct LegendEntry {
    pub category: Category,
    pub label: &'static str,
    pub color: &'static str,
}

#[derive(Clone, Debug, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Instructions {
    pub header: &'static str,
    pub steps: &'static [&'static str],
    pub legend: Vec<LegendEntry>,
}

#[derive(Clone, Debug, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct UiState {
    pub title: &'static str,
    pub subtitle: &'static str,
    pub placeholder: &'static str,

    pub question: String,
    pub phase: Phase,
    pub ball: BallView,

    pub shake_button_label: &'static str,
    pub shake_enabled: bool,

    pub instructions: Instructions,
}

impl From<&Oracle> for UiState {
    fn from(oracle: &Oracle) -> Self {
        let busy = oracle.is_busy();
        let ball = match (busy, oracle.last_answer()) {
            (true, _) => BallView::Thinking,
            (false, Some(answer)) => answer.into(),
            (false, None) => BallView::Eight,
        };
        UiState {
            title: TITLE,
            subtitle: SUBTITLE,
            placeholder: PLACEHOLDER,
            question: oracle.question().to_string(),
            phase: oracle.phase(),
            ball,
            shake_button_label: if busy { "Shaking..." } else { "Shake the Ball" },
            shake_enabled: !busy,
            instructions: instructions(),
        }
    }
}

fn instructions() -> Instructions {
    Instructions {
        header: INSTRUCTIONS_HEADER,
        steps: INSTRUCTIONS,
        legend: Category::ALL
            .into_iter()
            .map(|category| LegendEntry {
                category,
                label: legend_label(category),
                color: category.color(),
            })
            .collect(),
    }
}

fn legend_label(category: Category) -> &'static str {
    match category {
        Category::Positive => "🟢 Green = Positive",
        Category::Neutral => "🟡 Yellow = Neutral",
        Category::Negative => "🔴 Red = Negative",
    }
}
