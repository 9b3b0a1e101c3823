use anyhow::{Context, Result};
use axum::extract::ws::{self, WebSocket};
use axum::extract::{Json, State, WebSocketUpgrade};
use axum::response::Response;
use axum::routing::{any, post};
use axum::Router;
use eightball::message_bus::{Message, MessageBus, UiCommand};
use eightball::{store, EightBall};
use futures_util::stream::StreamExt as _;
use log::{debug, info};
use serde::{Deserialize, Serialize};
use std::fmt::Display;
use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;
use tokio::signal;
use tower_http::services::ServeDir;
use utils::{print_err, unwrap_or_def_verbose, ResultExt as _};

mod eightball;
mod logging;
mod utils;

struct AppState {
    message_bus: MessageBus,
}

type AppStateArg = State<Arc<AppState>>;

async fn initialize_ui(State(state): AppStateArg) {
    debug!("initialize_ui");
    state.message_bus.send(UiCommand::InitializeUi.into());
}

#[derive(Debug, Deserialize)]
struct EditQuestion {
    text: String,
}
async fn edit_question(State(state): AppStateArg, Json(body): Json<EditQuestion>) {
    debug!("edit_question({body:?})");
    state
        .message_bus
        .send(UiCommand::EditQuestion(body.text).into());
}

#[derive(Debug, Deserialize)]
struct Shake {
    text: String,
}
/// Shared by the shake button, clicks on the ball and Enter in the question box.
/// The question comes along, edits posted just before may still be in flight.
async fn shake(State(state): AppStateArg, Json(body): Json<Shake>) {
    debug!("shake({body:?})");
    state.message_bus.send(UiCommand::Shake(body.text).into());
}

async fn create_ui_event_stream(ws: WebSocketUpgrade, State(state): AppStateArg) -> Response {
    ws.on_upgrade(move |socket| ui_event_stream(socket, state.message_bus.clone()))
}

fn wrap_result<T: Serialize, E: Display>(
    r: std::result::Result<T, E>,
) -> std::result::Result<ws::Message, axum::Error> {
    #[derive(Serialize)]
    #[serde(rename_all = "camelCase")]
    enum WrappedResult<T> {
        Success(T),
        Error(String),
    }
    let wrapped_result = match r {
        Ok(data) => WrappedResult::Success(data),
        Err(e) => WrappedResult::Error(e.to_string()),
    };
    let json_text = serde_json::to_string_pretty(&wrapped_result)
        .unwrap_or_else(|e| format!("{{ \"error\": \"JSON serialization failed: {e}\" }}"));
    Ok(ws::Message::text(json_text))
}

async fn ui_event_stream(socket: WebSocket, message_bus: MessageBus) {
    debug!("ui_event_stream");
    let stream = message_bus.subscribe().ui_update_stream().map(wrap_result);
    let _ = stream.forward(socket).await.inspect_err(print_err);
}

async fn terminate_on_signal() -> Result<()> {
    let interrupt_signal: Pin<Box<dyn Future<Output = _>>> = Box::pin(async {
        signal::unix::signal(signal::unix::SignalKind::interrupt())
            .context("Failed to register terminate signal handlers!")?
            .recv()
            .await;
        Ok(())
    });
    let terminate_signal = Box::pin(async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .context("Failed to register terminate signal handlers!")?
            .recv()
            .await;
        Ok(())
    });
    futures_util::future::select_all([interrupt_signal, terminate_signal])
        .await
        .0
}

fn make_router(message_bus: MessageBus, static_serving_dir: &std::path::Path) -> Router {
    let shared_state = Arc::new(AppState { message_bus });
    Router::new()
        .nest(
            "/api/v1",
            Router::new()
                .route("/ui_stream", any(create_ui_event_stream))
                .route("/initialize_ui", post(initialize_ui))
                .route("/edit_question", post(edit_question))
                .route("/shake", post(shake))
                .with_state(shared_state),
        )
        .fallback_service(ServeDir::new(static_serving_dir))
}

#[tokio::main]
async fn main() -> Result<()> {
    let _logger = logging::init();
    let config = unwrap_or_def_verbose(store::load_config());
    let message_bus = MessageBus::new();

    // The ball is created here, explicitly, and handed to the worker task that hosts it.
    let eightball = EightBall::new(config.shake_delay(), message_bus.clone());
    let eightball_task = tokio::spawn(eightball.dispatch_messages());

    let app = make_router(message_bus.clone(), &config.static_serving_dir);
    let listener = tokio::net::TcpListener::bind(&config.serving_addr)
        .await
        .with_context(|| format!("Cannot bind {}", config.serving_addr))?;
    tokio::spawn(async move {
        axum::serve(listener, app)
            .await
            .context("HTTP server failed")
            .print_err()
    });

    info!("Running on {}", config.serving_addr);
    let _ = terminate_on_signal().await.inspect_err(print_err);
    info!("Terminating.");
    message_bus.send(Message::UiCommand(UiCommand::CloseApplication));

    debug!("Waiting for workers to stop...");
    let _ = eightball_task.await.inspect_err(print_err);
    debug!("All workers stopped.");
    Ok(())
}
