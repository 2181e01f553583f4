use std::{convert::Infallible, net::SocketAddr};

use axum::{body::Bytes, extract::State, http::StatusCode, routing::post, Router};
use teloxide::{
    stop::{mk_stop_token, StopFlag, StopToken},
    types::Update,
    update_listeners::{StatefulListener, UpdateListener},
};
use tokio::{net::TcpListener, sync::mpsc};
use tokio_stream::wrappers::UnboundedReceiverStream;

use crate::error::BotResult;

pub const WEBHOOK_PATH: &str = "/webhook";

const ACK: &str = "OK";

pub type UpdateSender = mpsc::UnboundedSender<Result<Update, Infallible>>;

#[derive(Clone)]
struct WebhookState {
    updates: UpdateSender,
}

pub fn router(updates: UpdateSender) -> Router {
    Router::new()
        .route(WEBHOOK_PATH, post(handle_webhook))
        .with_state(WebhookState { updates })
}

// Always 200 so Telegram never redelivers, whatever happened to the body.
async fn handle_webhook(State(state): State<WebhookState>, body: Bytes) -> (StatusCode, &'static str) {
    match serde_json::from_slice::<Update>(&body) {
        Ok(update) => {
            if state.updates.send(Ok(update)).is_err() {
                error!("Dispatcher has stopped, dropping webhook update");
            }
        }
        Err(e) => {
            warn!(
                "Failed to parse webhook payload: {}; payload: {}",
                e,
                String::from_utf8_lossy(&body)
            );
        }
    }

    (StatusCode::OK, ACK)
}

fn receiver_stream<S, T>(state: &mut (S, T)) -> &mut S {
    &mut state.0
}

fn stop_token<S>(state: &mut (S, StopToken)) -> StopToken {
    state.1.clone()
}

/// An update listener fed by the webhook route. The flag fires once the
/// dispatcher stops the listener, which is when the HTTP server should go too.
pub fn channel_listener() -> (UpdateSender, StopFlag, impl UpdateListener<Err = Infallible>) {
    let (tx, rx) = mpsc::unbounded_channel();
    let (token, flag) = mk_stop_token();

    let listener = StatefulListener::new((UnboundedReceiverStream::new(rx), token), receiver_stream, stop_token);

    (tx, flag, listener)
}

pub async fn bind(port: u16) -> BotResult<TcpListener> {
    let listener = TcpListener::bind(SocketAddr::from(([0, 0, 0, 0], port))).await?;
    info!("Webhook listener on {}{}", listener.local_addr()?, WEBHOOK_PATH);
    Ok(listener)
}

pub async fn serve(listener: TcpListener, updates: UpdateSender, stop: StopFlag) -> BotResult<()> {
    axum::serve(listener, router(updates)).with_graceful_shutdown(stop).await?;
    info!("Webhook listener shut down");
    Ok(())
}
