use std::time::Duration;

use anyhow::{Context, Result};
use teloxide::prelude::*;
use teloxide::update_listeners::Polling;
use tracing::{debug, error, info};

use crate::config::Config;
use crate::forward;

/// Long-poll timeout for the update stream.
const POLL_TIMEOUT: Duration = Duration::from_secs(60);

/// Run the polling forwarder until process exit.
pub async fn run(config: Config) -> Result<()> {
    let bot = Bot::new(&config.bot_token);

    let me = bot
        .get_me()
        .await
        .context("Failed to authenticate with the Telegram Bot API")?;
    info!("Bot authorized as @{}", me.username());
    info!(
        "Listening for private messages, forwarding to chat {}",
        config.target_chat_id
    );
    if config.source_chat_id != 0 {
        info!("Source filter active: chat {}", config.source_chat_id);
    }

    let source_chat_id = config.source_chat_id;
    let target = ChatId(config.target_chat_id);

    let handler = Update::filter_message()
        .filter_map(move |msg: Message| {
            if forward::should_forward(source_chat_id, &msg) {
                Some(msg)
            } else {
                debug!("Ignoring message from chat {}", msg.chat.id);
                None
            }
        })
        .endpoint(handle_message);

    let listener = Polling::builder(bot.clone()).timeout(POLL_TIMEOUT).build();

    Dispatcher::builder(bot, handler)
        .dependencies(dptree::deps![target])
        .default_handler(|upd| async move {
            debug!("Unhandled update: {:?}", upd.id);
        })
        .error_handler(LoggingErrorHandler::with_custom_text("forwarder"))
        .build()
        .dispatch_with_listener(
            listener,
            LoggingErrorHandler::with_custom_text("update listener"),
        )
        .await;

    Ok(())
}

async fn handle_message(bot: Bot, msg: Message, target: ChatId) -> ResponseResult<()> {
    let sender = msg
        .from
        .as_ref()
        .map(forward::sender_label)
        .unwrap_or_else(|| "<unknown>".to_string());
    let preview = forward::truncate_for_log(forward::content_of(&msg).unwrap_or(""), 50);
    info!("New message from {}: {}", sender, preview);

    let outbound = forward::classify(&msg);

    // Exactly one send per accepted message. A failure is logged and the
    // loop moves on to the next update.
    match forward::deliver(&bot, target, outbound).await {
        Ok(()) => info!("Message forwarded to chat {}", target),
        Err(e) => error!("Failed to forward message: {}", e),
    }

    Ok(())
}
