/// Terms that make a question unacceptable. Matching is a plain substring test
/// on the lowercased question, so "killer" is rejected because of "kill".
pub const DISALLOWED_TERMS: &[&str] = &[
    "damn", "hell", "crap", "stupid", "idiot", "dumb", "hate", "kill", "die", "death", "hurt",
    "violence", "blood", "weapon", "gun", "knife", "fight",
];

#[derive(Clone, Copy, Debug)]
pub struct ContentFilter {
    terms: &'static [&'static str],
}

impl ContentFilter {
    /// Terms are expected to be lowercase.
    pub fn new(terms: &'static [&'static str]) -> Self {
        ContentFilter { terms }
    }

    pub fn first_match(&self, text: &str) -> Option<&'static str> {
        let lower_text = text.to_lowercase();
        self.terms
            .iter()
            .find(|term| lower_text.contains(**term))
            .copied()
    }

    pub fn is_disallowed(&self, text: &str) -> bool {
        self.first_match(text).is_some()
    }
}

impl Default for ContentFilter {
    fn default() -> Self {
        ContentFilter::new(DISALLOWED_TERMS)
    }
}

pub fn is_disallowed(text: &str) -> bool {
    ContentFilter::default().is_disallowed(text)
}
