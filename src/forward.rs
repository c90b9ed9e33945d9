use teloxide::prelude::*;
use teloxide::types::{FileId, InputFile, Message, User};
use teloxide::RequestError;

/// Sent when a message carries no forwardable content and no usable sender label.
const UNSUPPORTED_PLACEHOLDER: &str = "📎 Mensagem de tipo não suportado";

/// Decides whether a polled message qualifies for forwarding.
///
/// The source filter (when non-zero) and the private-chat requirement are
/// both necessary, checked in that order. Group and channel traffic never
/// passes.
pub fn should_forward(source_chat_id: i64, msg: &Message) -> bool {
    if source_chat_id != 0 && msg.chat.id.0 != source_chat_id {
        return false;
    }
    msg.chat.is_private()
}

/// Display label for a message originator: "@handle" when one exists,
/// otherwise the first name with the last name appended when present.
pub fn sender_label(user: &User) -> String {
    if let Some(handle) = &user.username {
        return format!("@{handle}");
    }
    match &user.last_name {
        Some(last) => format!("{} {}", user.first_name, last),
        None => user.first_name.clone(),
    }
}

/// Forwardable text of a message: the text, else the caption, else nothing.
pub fn content_of(msg: &Message) -> Option<&str> {
    msg.text()
        .or_else(|| msg.caption())
        .filter(|t| !t.is_empty())
}

/// Combines the sender label with the message content.
///
/// Messages without a sender record are not expected here (the filter only
/// passes private chats), but if one slips through the content is used bare.
pub fn format_forward(sender: Option<&User>, content: Option<&str>) -> String {
    let label = sender.map(sender_label).unwrap_or_default();
    match (label.is_empty(), content) {
        (false, Some(text)) => format!("👤 {label}:\n{text}"),
        (false, None) => format!("👤 {label}"),
        (true, Some(text)) => text.to_string(),
        (true, None) => String::new(),
    }
}

fn formatted(msg: &Message) -> String {
    format_forward(msg.from.as_ref(), content_of(msg))
}

/// One outgoing send operation. Media travels by Telegram file id only;
/// bytes are never downloaded or re-uploaded.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outbound {
    Text(String),
    Photo { file: FileId, caption: String },
    Document { file: FileId, caption: String },
    Video { file: FileId, caption: String },
    Audio { file: FileId, caption: String },
    Voice { file: FileId },
    Sticker { file: FileId },
}

/// Maps an accepted message onto exactly one outgoing send operation.
///
/// First match wins, in this order: text, photo, document, video, audio,
/// voice, sticker. Photos use the highest-resolution variant (Telegram
/// orders the size list ascending). Voice notes and stickers carry no
/// caption. Anything else falls back to a text send of the formatted
/// content, or the placeholder when no label or content is derivable.
pub fn classify(msg: &Message) -> Outbound {
    if msg.text().is_some_and(|t| !t.is_empty()) {
        return Outbound::Text(formatted(msg));
    }
    if let Some(best) = msg.photo().and_then(|sizes| sizes.last()) {
        return Outbound::Photo {
            file: best.file.id.clone(),
            caption: formatted(msg),
        };
    }
    if let Some(doc) = msg.document() {
        return Outbound::Document {
            file: doc.file.id.clone(),
            caption: formatted(msg),
        };
    }
    if let Some(video) = msg.video() {
        return Outbound::Video {
            file: video.file.id.clone(),
            caption: formatted(msg),
        };
    }
    if let Some(audio) = msg.audio() {
        return Outbound::Audio {
            file: audio.file.id.clone(),
            caption: formatted(msg),
        };
    }
    if let Some(voice) = msg.voice() {
        return Outbound::Voice {
            file: voice.file.id.clone(),
        };
    }
    if let Some(sticker) = msg.sticker() {
        return Outbound::Sticker {
            file: sticker.file.id.clone(),
        };
    }

    let text = formatted(msg);
    if text.is_empty() {
        Outbound::Text(UNSUPPORTED_PLACEHOLDER.to_string())
    } else {
        Outbound::Text(text)
    }
}

/// Issues the single send call for a classified message.
pub async fn deliver(bot: &Bot, target: ChatId, outbound: Outbound) -> Result<(), RequestError> {
    match outbound {
        Outbound::Text(text) => {
            bot.send_message(target, text).await?;
        }
        Outbound::Photo { file, caption } => {
            bot.send_photo(target, InputFile::file_id(file))
                .caption(caption)
                .await?;
        }
        Outbound::Document { file, caption } => {
            bot.send_document(target, InputFile::file_id(file))
                .caption(caption)
                .await?;
        }
        Outbound::Video { file, caption } => {
            bot.send_video(target, InputFile::file_id(file))
                .caption(caption)
                .await?;
        }
        Outbound::Audio { file, caption } => {
            bot.send_audio(target, InputFile::file_id(file))
                .caption(caption)
                .await?;
        }
        Outbound::Voice { file } => {
            bot.send_voice(target, InputFile::file_id(file)).await?;
        }
        Outbound::Sticker { file } => {
            bot.send_sticker(target, InputFile::file_id(file)).await?;
        }
    }
    Ok(())
}

/// Shortens a log preview, walking back to a UTF-8 char boundary so
/// slicing doesn't panic.
pub fn truncate_for_log(text: &str, max_len: usize) -> String {
    if text.len() <= max_len {
        return text.to_string();
    }
    let mut end = max_len;
    while end > 0 && !text.is_char_boundary(end) {
        end -= 1;
    }
    format!("{}...", &text[..end])
}
