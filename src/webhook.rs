use anyhow::{Context, Result};
use axum::extract::rejection::JsonRejection;
use axum::extract::State;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::{any, post};
use axum::{Json, Router};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use teloxide::prelude::*;
use teloxide::types::ParseMode;
use tracing::{debug, error, info, warn};

use crate::config::Config;
use crate::forward::truncate_for_log;

/// Service name reported by the health endpoint.
const SERVICE_NAME: &str = "message-forwarder";

/// Alert posted by the trusted upstream. `from` and `timestamp` are
/// informational and tolerated missing.
#[derive(Debug, Deserialize)]
struct AlertPayload {
    text: String,
    #[serde(default)]
    from: String,
    #[serde(default)]
    timestamp: Option<DateTime<Utc>>,
}

#[derive(Debug, Serialize)]
struct ForwardResponse {
    status: &'static str,
    message: &'static str,
}

#[derive(Debug, Serialize)]
struct HealthResponse {
    status: &'static str,
    timestamp: String,
    service: &'static str,
}

#[derive(Clone)]
struct WebhookState {
    bot: Bot,
    target: ChatId,
}

fn alert_text(text: &str) -> String {
    format!("🤖 **Alerta CornerProBot2:**\n\n{text}")
}

/// Run the webhook receiver until process exit.
pub async fn run(config: Config, port: u16) -> Result<()> {
    let bot = Bot::new(&config.bot_token);

    let me = bot
        .get_me()
        .await
        .context("Failed to authenticate with the Telegram Bot API")?;
    info!("Bot authorized as @{}", me.username());
    info!("Forwarding alerts to chat {}", config.target_chat_id);

    let state = WebhookState {
        bot,
        target: ChatId(config.target_chat_id),
    };

    let app = router(state);

    let addr = format!("0.0.0.0:{port}");
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("Failed to bind to {addr}"))?;

    info!("Webhook server listening on port {}", port);
    info!("Endpoint: http://localhost:{}/webhook", port);
    info!("Health check: http://localhost:{}/health", port);

    axum::serve(listener, app).await.context("Server error")?;

    Ok(())
}

fn router(state: WebhookState) -> Router {
    Router::new()
        .route(
            "/webhook",
            post(handle_webhook).fallback(method_not_allowed),
        )
        .route("/health", any(handle_health))
        .with_state(state)
}

async fn method_not_allowed() -> Response {
    (StatusCode::METHOD_NOT_ALLOWED, "Método não permitido").into_response()
}

async fn handle_webhook(
    State(state): State<WebhookState>,
    payload: Result<Json<AlertPayload>, JsonRejection>,
) -> Response {
    let Json(alert) = match payload {
        Ok(body) => body,
        Err(rejection) => {
            warn!("Rejected webhook body: {}", rejection);
            return (StatusCode::BAD_REQUEST, "JSON inválido").into_response();
        }
    };

    let from = if alert.from.is_empty() {
        "<unknown>"
    } else {
        alert.from.as_str()
    };
    info!(
        "Alert received from {}: {}",
        from,
        truncate_for_log(&alert.text, 50)
    );
    if let Some(ts) = alert.timestamp {
        debug!("Alert generated at {}", ts.to_rfc3339());
    }

    let send = state
        .bot
        .send_message(state.target, alert_text(&alert.text))
        .parse_mode(ParseMode::Markdown);

    match send.await {
        Ok(_) => {
            info!("Alert forwarded to chat {}", state.target);
            (
                StatusCode::OK,
                Json(ForwardResponse {
                    status: "success",
                    message: "Mensagem encaminhada",
                }),
            )
                .into_response()
        }
        Err(e) => {
            error!("Failed to forward alert: {}", e);
            (StatusCode::INTERNAL_SERVER_ERROR, "Erro ao enviar mensagem").into_response()
        }
    }
}

async fn handle_health() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "healthy",
        timestamp: Utc::now().to_rfc3339(),
        service: SERVICE_NAME,
    })
}
