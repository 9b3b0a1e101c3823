use rand::seq::SliceRandom;
use rand::Rng;

use crate::{Answer, Category};

pub(crate) const POSITIVE: &[&str] = &[
    "It is certain",
    "Without a doubt",
    "Yes definitely",
    "You may rely on it",
    "As I see it, yes",
    "Most likely",
    "Outlook good",
    "Signs point to yes",
];

pub(crate) const NEUTRAL: &[&str] = &[
    "Reply hazy, try again",
    "Ask again later",
    "Better not tell you now",
    "Cannot predict now",
    "Concentrate and ask again",
];

pub(crate) const NEGATIVE: &[&str] = &[
    "Don't count on it",
    "My reply is no",
    "My sources say no",
    "Outlook not so good",
    "Very doubtful",
    "Absolutely not",
    "No way",
];

/// Picks a category first, then an answer within it. Every category is
/// equally likely no matter how many answers it holds.
///
/// Panics if a category has no answers; the tables above are never empty.
pub fn select_response<R: Rng + ?Sized>(rng: &mut R) -> Answer {
    let category = *Category::ALL
        .choose(rng)
        .expect("at least one category");
    let text = *category
        .answers()
        .choose(rng)
        .expect("every category has answers");
    Answer {
        text: String::from(text),
        category,
    }
}
