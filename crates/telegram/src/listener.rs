use std::sync::Arc;

use teloxide::prelude::*;
use tracing::{info, warn};

use common::TradeJournal;

type HandlerResult = Result<(), Box<dyn std::error::Error + Send + Sync>>;

/// Feedback extracted from an operator reply.
#[derive(Debug, Clone, PartialEq)]
struct Feedback {
    replied_to: i32,
    text: String,
    image: Option<String>,
}

/// Long-poll Telegram and store replies to bot messages as trade feedback.
///
/// Only messages in `chat_id` are considered. Run with `tokio::spawn`; the
/// future completes when the dispatcher shuts down.
pub async fn run_feedback_listener(bot: Bot, chat_id: ChatId, journal: Arc<dyn TradeJournal>) {
    info!(chat_id = chat_id.0, "Telegram feedback listener starting (long-polling)");

    let handler = Update::filter_message()
        .filter(move |msg: Message| msg.chat.id == chat_id)
        .endpoint(handle_reply);

    Dispatcher::builder(bot, handler)
        .dependencies(dptree::deps![journal])
        .build()
        .dispatch()
        .await;
}

async fn handle_reply(bot: Bot, msg: Message, journal: Arc<dyn TradeJournal>) -> HandlerResult {
    let Some(feedback) = extract_feedback(&msg) else {
        return Ok(());
    };

    let ack = match journal
        .add_feedback(feedback.replied_to, &feedback.text, feedback.image.as_deref())
        .await
    {
        Ok(true) => {
            info!(message_id = feedback.replied_to, has_image = feedback.image.is_some(), "Feedback stored");
            "Feedback saved. Thanks!"
        }
        Ok(false) => "That message does not belong to a recorded trade.",
        Err(e) => {
            warn!(message_id = feedback.replied_to, error = %e, "Failed to store feedback");
            "Could not save the feedback, check the logs."
        }
    };

    bot.send_message(msg.chat.id, ack)
        .reply_to_message_id(msg.id)
        .await?;
    Ok(())
}

/// A reply carrying text, or a photo with an optional caption. The largest
/// photo size is kept.
fn extract_feedback(msg: &Message) -> Option<Feedback> {
    let replied_to = msg.reply_to_message()?.id.0;

    if let Some(photos) = msg.photo() {
        let image = photos.last().map(|p| p.file.id.clone());
        return Some(Feedback {
            replied_to,
            text: msg.caption().unwrap_or_default().to_string(),
            image,
        });
    }

    let text = msg.text()?.trim();
    if text.is_empty() {
        return None;
    }
    Some(Feedback {
        replied_to,
        text: text.to_string(),
        image: None,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::{json, Value};

    fn chat() -> Value {
        json!({ "id": 42, "type": "private", "first_name": "Operator" })
    }

    fn bot_message(id: i32) -> Value {
        json!({
            "message_id": id,
            "date": 1_700_000_000,
            "chat": chat(),
            "text": "TRADE CLOSED",
        })
    }

    /// An operator message with `extra` fields merged in.
    fn operator_message(extra: Value) -> Message {
        let mut msg = json!({
            "message_id": 100,
            "date": 1_700_000_300,
            "chat": chat(),
            "from": { "id": 42, "is_bot": false, "first_name": "Operator" },
        });
        if let (Some(base), Some(extra)) = (msg.as_object_mut(), extra.as_object()) {
            base.extend(extra.clone());
        }
        serde_json::from_value(msg).unwrap()
    }

    #[test]
    fn text_reply_becomes_feedback() {
        let msg = operator_message(json!({
            "text": "  entered too late  ",
            "reply_to_message": bot_message(7),
        }));
        assert_eq!(
            extract_feedback(&msg),
            Some(Feedback {
                replied_to: 7,
                text: "entered too late".into(),
                image: None,
            })
        );
    }

    #[test]
    fn photo_reply_keeps_caption_and_largest_size() {
        let msg = operator_message(json!({
            "caption": "fake breakout",
            "photo": [
                { "file_id": "small", "file_unique_id": "s", "width": 90, "height": 90, "file_size": 1_000 },
                { "file_id": "large", "file_unique_id": "l", "width": 1280, "height": 720, "file_size": 90_000 },
            ],
            "reply_to_message": bot_message(8),
        }));
        let feedback = extract_feedback(&msg).unwrap();
        assert_eq!(feedback.replied_to, 8);
        assert_eq!(feedback.text, "fake breakout");
        assert_eq!(feedback.image.as_deref(), Some("large"));
    }

    #[test]
    fn photo_without_caption_has_empty_text() {
        let msg = operator_message(json!({
            "photo": [{ "file_id": "only", "file_unique_id": "o", "width": 90, "height": 90 }],
            "reply_to_message": bot_message(9),
        }));
        let feedback = extract_feedback(&msg).unwrap();
        assert_eq!(feedback.text, "");
        assert_eq!(feedback.image.as_deref(), Some("only"));
    }

    #[test]
    fn message_that_is_not_a_reply_is_ignored() {
        let msg = operator_message(json!({ "text": "hello bot" }));
        assert_eq!(extract_feedback(&msg), None);
    }

    #[test]
    fn blank_text_reply_is_ignored() {
        let msg = operator_message(json!({
            "text": "   ",
            "reply_to_message": bot_message(7),
        }));
        assert_eq!(extract_feedback(&msg), None);
    }
}
