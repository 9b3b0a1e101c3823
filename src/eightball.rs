use std::time::Duration;

use eightball_model::{Oracle, ShakeTicket, UserError};
use futures_util::stream::{StreamExt as _, TryStreamExt as _};
use log::{debug, info, warn};
use message_bus::{Event, Message, MessageBus, Notification, UiCommand, UiUpdate};
use tokio::task::JoinHandle;
use tokio_stream::wrappers::errors::BroadcastStreamRecvError;
use ui_state::UiState;

use crate::utils::print_err;

pub(crate) mod config;
pub(crate) mod message_bus;
pub(crate) mod store;
pub(crate) mod ui_state;

/// One Magic 8 Ball on screen. Owns the oracle and the timer of its pending reveal.
pub struct EightBall {
    oracle: Oracle,
    shake_delay: Duration,
    pending_reveal: Option<JoinHandle<()>>,
    message_bus: MessageBus,
}

impl EightBall {
    pub fn new(shake_delay: Duration, message_bus: MessageBus) -> Self {
        EightBall {
            oracle: Oracle::new(),
            shake_delay,
            pending_reveal: None,
            message_bus,
        }
    }

    /// Returns `false` once the ball has been torn down.
    pub fn dispatch(&mut self, message: Message) -> bool {
        match message {
            Message::UiCommand(UiCommand::InitializeUi) => {}
            Message::UiCommand(UiCommand::EditQuestion(text)) => self.oracle.edit_question(text),
            Message::UiCommand(UiCommand::Shake(text)) => self.shake(text),
            Message::UiCommand(UiCommand::CloseApplication) => {
                self.tear_down();
                return false;
            }
            Message::Event(Event::ShakeFinished(ticket)) => self.reveal(ticket),
            Message::UiUpdate(_) => {}
        }
        true
    }

    /// Runs until the ball is torn down or the bus is closed.
    pub async fn dispatch_messages(mut self) {
        let mut stream = self.message_bus.subscribe().eightball_stream().boxed();
        info!("EightBall worker started.");
        loop {
            match stream.try_next().await {
                Ok(Some(message)) => {
                    if !self.dispatch(message) {
                        break;
                    }
                }
                Ok(None) => break,
                Err(e) => {
                    // Skipped messages are gone, the ones after them still need handling
                    if let Some(BroadcastStreamRecvError::Lagged(n)) =
                        e.downcast_ref::<BroadcastStreamRecvError>()
                    {
                        warn!("EightBall worker lagged, {n} messages skipped");
                    } else {
                        print_err(&e);
                    }
                    continue;
                }
            }
            self.message_bus.send(self.ui_state().into())
        }
        info!("EightBall worker stopped.");
    }

    pub fn ui_state(&self) -> UiState {
        UiState::from(&self.oracle)
    }

    fn shake(&mut self, text: String) {
        match self.oracle.ask(text) {
            Ok(Some(ticket)) => {
                debug!("Shaking for '{}' (#{})", self.oracle.question(), ticket.id());
                self.schedule_reveal(ticket);
            }
            Ok(None) => {}
            Err(e) => self.notify(e),
        }
    }

    fn schedule_reveal(&mut self, ticket: ShakeTicket) {
        let delay = self.shake_delay;
        let message_bus = self.message_bus.clone();
        if let Some(stale) = self.pending_reveal.replace(tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            message_bus.send(Message::Event(Event::ShakeFinished(ticket)));
        })) {
            stale.abort();
        }
    }

    fn reveal(&mut self, ticket: ShakeTicket) {
        let Some(answer) = self.oracle.reveal(ticket, &mut rand::thread_rng()) else {
            return;
        };
        info!("The ball says: {} ({})", answer.text, answer.category);
        self.pending_reveal = None;
    }

    fn notify(&self, e: UserError) {
        warn!("Shake rejected: {e:?}");
        self.message_bus
            .send(Message::UiUpdate(UiUpdate::Notification(Notification {
                message: e.to_string(),
            })));
    }

    fn tear_down(&mut self) {
        if let Some(handle) = self.pending_reveal.take() {
            handle.abort();
        }
        if let Some(ticket) = self.oracle.cancel_pending() {
            info!("Discarded pending shake #{}", ticket.id());
        }
    }
}

impl Drop for EightBall {
    fn drop(&mut self) {
        self.tear_down();
    }
}
