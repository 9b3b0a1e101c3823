use anyhow::Result;
use eightball_model::ShakeTicket;
use futures_util::{Stream, StreamExt};
use log::error;
use serde::Serialize;
use tokio::sync::broadcast::error::RecvError;
use tokio::sync::broadcast::{Receiver, Sender};
use tokio_stream::wrappers::BroadcastStream;

use super::ui_state::UiState;

#[derive(Clone)]
pub(crate) struct MessageBus(Sender<Message>);

impl MessageBus {
    pub fn new() -> Self {
        let (sender, _) = tokio::sync::broadcast::channel(100);
        Self(sender)
    }

    pub fn send(&self, message: Message) {
        if let Err(message) = self.0.send(message) {
            error!("Message not sent {:?}", message);
        }
    }

    pub fn subscribe(&self) -> MessageBusSubscription {
        MessageBusSubscription(self.0.subscribe())
    }
}

pub(crate) struct MessageBusSubscription(Receiver<Message>);

impl MessageBusSubscription {
    #[allow(dead_code)]
    pub async fn recv(&mut self) -> Option<Message> {
        Self::translate_recv(self.0.recv().await)
    }

    pub fn stream(self) -> impl Stream<Item = Result<Message>> {
        BroadcastStream::new(self.0).map(|r| r.map_err(anyhow::Error::from))
    }

    pub fn ui_update_stream(self) -> impl Stream<Item = Result<UiUpdate>> {
        self.stream().filter_map(|r| async move {
            match r {
                Ok(Message::UiUpdate(ui_update)) => Some(Ok(ui_update)),
                Err(e) => Some(Err(e)),
                _ => None,
            }
        })
    }

    /// Everything the ball itself reacts to: UI commands and its own timer events.
    pub fn eightball_stream(self) -> impl Stream<Item = Result<Message>> {
        self.stream().filter(|r| {
            let keep = !matches!(r, Ok(Message::UiUpdate(_)));
            async move { keep }
        })
    }

    fn translate_recv(r: Result<Message, RecvError>) -> Option<Message> {
        match r {
            Ok(message) => Some(message),
            Err(RecvError::Lagged(_)) => {
                panic!("MessageBus receiver lagged!");
            }
            Err(RecvError::Closed) => None,
        }
    }
}

#[derive(Clone, Debug)]
pub(crate) enum Message {
    UiUpdate(UiUpdate),
    UiCommand(UiCommand),
    Event(Event),
}

impl From<UiState> for Message {
    fn from(value: UiState) -> Self {
        Message::UiUpdate(UiUpdate::State(value))
    }
}

impl From<UiCommand> for Message {
    fn from(value: UiCommand) -> Self {
        Message::UiCommand(value)
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum UiUpdate {
    State(UiState),
    /// Must be acknowledged by the user before continuing (rendered as an alert).
    Notification(Notification),
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Notification {
    pub message: String,
}

#[derive(Debug, Clone)]
pub enum Event {
    ShakeFinished(ShakeTicket),
}

#[derive(Clone, Debug)]
pub enum UiCommand {
    InitializeUi,
    EditQuestion(String),
    /// Carries the question typed when the ball was shaken.
    Shake(String),
    CloseApplication,
}
