use log::debug;
use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::catalog::select_response;
use crate::filter::ContentFilter;
use crate::{Answer, Phase, UserError};

/// Identifies the single delayed reveal scheduled by a successful shake.
/// A reveal carrying any other ticket is stale and gets ignored.
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub struct ShakeTicket(u64);

impl ShakeTicket {
    pub fn id(&self) -> u64 {
        self.0
    }
}

/// Question/answer state of one Magic 8 Ball.
///
/// The oracle never waits by itself: [`Oracle::submit`] hands out a ticket and the
/// owner is responsible for calling [`Oracle::reveal`] with it once the delay is over.
#[derive(Clone, Debug, Default)]
pub struct Oracle {
    question: String,
    phase: Phase,
    last_answer: Option<Answer>,
    pending: Option<ShakeTicket>,
    shakes: u64,
    filter: ContentFilter,
}

impl Oracle {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_filter(filter: ContentFilter) -> Self {
        Oracle {
            filter,
            ..Default::default()
        }
    }

    pub fn question(&self) -> &str {
        &self.question
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn last_answer(&self) -> Option<&Answer> {
        self.last_answer.as_ref()
    }

    pub fn pending(&self) -> Option<ShakeTicket> {
        self.pending
    }

    pub fn is_busy(&self) -> bool {
        self.phase == Phase::Busy
    }

    /// Previous answer stays visible until the next successful shake.
    pub fn edit_question(&mut self, text: impl Into<String>) {
        self.question = text.into();
        if self.phase == Phase::Answered {
            self.phase = Phase::Idle;
        }
    }

    /// Starts a shake. `Ok(None)` means a shake is already in progress and nothing changed.
    pub fn submit(&mut self) -> Result<Option<ShakeTicket>, UserError> {
        if self.is_busy() {
            debug!("Shake ignored, already shaking");
            return Ok(None);
        }
        if self.question.trim().is_empty() {
            return Err(UserError::EmptyQuestion);
        }
        if let Some(term) = self.filter.first_match(&self.question) {
            debug!("Question rejected, contains '{term}'");
            return Err(UserError::DisallowedContent);
        }

        self.shakes += 1;
        let ticket = ShakeTicket(self.shakes);
        self.last_answer = None;
        self.phase = Phase::Busy;
        self.pending = Some(ticket);
        Ok(Some(ticket))
    }

    /// Sets the question and shakes in one step. While shaking nothing changes,
    /// the question text included.
    pub fn ask(&mut self, text: impl Into<String>) -> Result<Option<ShakeTicket>, UserError> {
        if self.is_busy() {
            debug!("Question ignored, already shaking");
            return Ok(None);
        }
        self.edit_question(text);
        self.submit()
    }

    pub fn reveal<R: Rng + ?Sized>(&mut self, ticket: ShakeTicket, rng: &mut R) -> Option<&Answer> {
        if self.pending != Some(ticket) {
            debug!("Stale reveal for shake #{} ignored", ticket.id());
            return None;
        }
        self.pending = None;
        self.last_answer = Some(select_response(rng));
        self.question.clear();
        self.phase = Phase::Answered;
        self.last_answer.as_ref()
    }

    /// Drops the outstanding reveal, if any. Called when the ball goes away.
    pub fn cancel_pending(&mut self) -> Option<ShakeTicket> {
        let ticket = self.pending.take();
        if self.phase == Phase::Busy {
            self.phase = Phase::Idle;
        }
        ticket
    }
}

#[cfg(test)]
mod tests {
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    use super::*;
    use crate::Category;

    fn rng() -> StdRng {
        StdRng::seed_from_u64(7)
    }

    fn asked(question: &str) -> Oracle {
        let mut oracle = Oracle::new();
        oracle.edit_question(question);
        oracle
    }

    #[test]
    fn empty_question_is_rejected() {
        let mut oracle = asked("");
        assert_eq!(oracle.submit(), Err(UserError::EmptyQuestion));
        assert_eq!(oracle.phase(), Phase::Idle);
        assert_eq!(oracle.pending(), None);

        oracle.edit_question("  \t ");
        assert_eq!(oracle.submit(), Err(UserError::EmptyQuestion));
        assert_eq!(oracle.phase(), Phase::Idle);
    }

    #[test]
    fn disallowed_question_is_rejected() {
        let mut oracle = asked("I hate you");
        assert_eq!(oracle.submit(), Err(UserError::DisallowedContent));
        assert_eq!(oracle.phase(), Phase::Idle);
        assert_eq!(oracle.question(), "I hate you");
        assert_eq!(oracle.pending(), None);
    }

    #[test]
    fn rejection_keeps_previous_answer() {
        let mut oracle = asked("Will I succeed?");
        let ticket = oracle.submit().unwrap().unwrap();
        oracle.reveal(ticket, &mut rng());
        let answer = oracle.last_answer().cloned();

        oracle.edit_question("die");
        assert_eq!(oracle.submit(), Err(UserError::DisallowedContent));
        assert_eq!(oracle.last_answer().cloned(), answer);
    }

    #[test]
    fn valid_question_goes_busy_then_answered() {
        let mut oracle = asked("Will I succeed?");
        let ticket = oracle.submit().unwrap().expect("shake scheduled");
        assert_eq!(oracle.phase(), Phase::Busy);
        assert_eq!(oracle.pending(), Some(ticket));
        assert_eq!(oracle.last_answer(), None);

        let answer = oracle.reveal(ticket, &mut rng()).cloned().unwrap();
        assert!(Category::ALL.contains(&answer.category));
        assert!(answer.category.answers().contains(&answer.text.as_str()));
        assert_eq!(oracle.phase(), Phase::Answered);
        assert_eq!(oracle.question(), "");
        assert_eq!(oracle.pending(), None);
        assert_eq!(oracle.last_answer(), Some(&answer));
    }

    #[test]
    fn submit_while_busy_is_noop() {
        let mut oracle = asked("Will I succeed?");
        let ticket = oracle.submit().unwrap().unwrap();

        oracle.edit_question("");
        assert_eq!(oracle.submit(), Ok(None));
        assert_eq!(oracle.phase(), Phase::Busy);
        assert_eq!(oracle.pending(), Some(ticket));
        assert_eq!(oracle.last_answer(), None);
    }

    #[test]
    fn ask_uses_the_given_question() {
        // the stored question is stale, the asked one wins
        let mut oracle = asked("Will I");
        let ticket = oracle.ask("Will I succeed?").unwrap().expect("shake scheduled");
        assert_eq!(oracle.question(), "Will I succeed?");
        assert_eq!(oracle.pending(), Some(ticket));

        let mut oracle = asked("");
        assert!(oracle.ask("Am I lucky?").unwrap().is_some());
        assert_eq!(oracle.phase(), Phase::Busy);
    }

    #[test]
    fn ask_rejects_like_submit() {
        let mut oracle = asked("Will I succeed?");
        assert_eq!(oracle.ask("  "), Err(UserError::EmptyQuestion));
        assert_eq!(oracle.phase(), Phase::Idle);
        assert_eq!(oracle.ask("I hate you"), Err(UserError::DisallowedContent));
        assert_eq!(oracle.phase(), Phase::Idle);
    }

    #[test]
    fn ask_while_busy_is_noop() {
        let mut oracle = Oracle::new();
        let ticket = oracle.ask("Will I succeed?").unwrap().unwrap();

        assert_eq!(oracle.ask("Something else?"), Ok(None));
        assert_eq!(oracle.question(), "Will I succeed?");
        assert_eq!(oracle.phase(), Phase::Busy);
        assert_eq!(oracle.pending(), Some(ticket));
    }

    #[test]
    fn reveal_runs_once_per_shake() {
        let mut oracle = asked("Will I succeed?");
        let ticket = oracle.submit().unwrap().unwrap();
        assert!(oracle.reveal(ticket, &mut rng()).is_some());
        let answer = oracle.last_answer().cloned();

        assert!(oracle.reveal(ticket, &mut rng()).is_none());
        assert_eq!(oracle.last_answer().cloned(), answer);
        assert_eq!(oracle.phase(), Phase::Answered);
    }

    #[test]
    fn edit_after_answer_returns_to_idle() {
        let mut oracle = asked("Will I succeed?");
        let ticket = oracle.submit().unwrap().unwrap();
        oracle.reveal(ticket, &mut rng());

        oracle.edit_question("Should I go out?");
        assert_eq!(oracle.phase(), Phase::Idle);
        assert!(oracle.last_answer().is_some());

        let next = oracle.submit().unwrap().unwrap();
        assert_ne!(next, ticket);
        assert_eq!(oracle.last_answer(), None);
    }

    #[test]
    fn cancelled_shake_is_never_revealed() {
        let mut oracle = asked("Will I succeed?");
        let ticket = oracle.submit().unwrap().unwrap();

        assert_eq!(oracle.cancel_pending(), Some(ticket));
        assert_eq!(oracle.phase(), Phase::Idle);
        assert!(oracle.reveal(ticket, &mut rng()).is_none());
        assert_eq!(oracle.last_answer(), None);
        assert_eq!(oracle.question(), "Will I succeed?");
    }

    #[test]
    fn custom_filter_is_used() {
        const TERMS: &[&str] = &["homework"];
        let mut oracle = Oracle::with_filter(ContentFilter::new(TERMS));
        oracle.edit_question("Do I have to do my homework?");
        assert_eq!(oracle.submit(), Err(UserError::DisallowedContent));
        oracle.edit_question("I hate mondays");
        assert!(oracle.submit().unwrap().is_some());
    }
}
