use std::sync::Arc;

use async_trait::async_trait;
use log::{error, warn};
use teloxide::payloads::{SendMessageSetters, SendPhotoSetters};
use teloxide::requests::Requester;
use teloxide::types::{ChatId, InputFile, ParseMode};
use teloxide::Bot;

use crate::config::Config;
use crate::errors::DeliveryError;
use crate::models::listing::Listing;

/// Delivery collaborator for the scan. A failed delivery never aborts the
/// rest of the batch.
#[async_trait]
pub trait Notifier: Send + Sync {
    async fn send_listing(&self, listing: &Listing) -> Result<(), DeliveryError>;
}

pub struct TelegramNotifier {
    bot: Bot,
    chat_ids: Vec<ChatId>,
    config: Arc<Config>,
}

impl TelegramNotifier {
    pub fn new(config: Arc<Config>) -> TelegramNotifier {
        TelegramNotifier {
            bot: Bot::new(&config.telegram_bot_token),
            chat_ids: config.telegram_chat_ids.iter().map(|id| ChatId(*id)).collect(),
            config,
        }
    }

    async fn send_to_chat(
        &self,
        chat_id: ChatId,
        listing: &Listing,
        text: &str,
    ) -> Result<(), DeliveryError> {
        // Photo with caption when the source gave us one; on a refused photo
        // fall back to the plain text alert, as a bad image URL should not
        // cost the alert itself.
        if let Some(photo_url) = listing.photo_url.as_deref() {
            if let Ok(url) = reqwest::Url::parse(photo_url) {
                match self
                    .bot
                    .send_photo(chat_id, InputFile::url(url))
                    .caption(text)
                    .parse_mode(ParseMode::Markdown)
                    .await
                {
                    Ok(_) => return Ok(()),
                    Err(e) => warn!(
                        "photo send failed for {}, falling back to text: {}",
                        listing.address, e
                    ),
                }
            }
        }

        self.bot
            .send_message(chat_id, text)
            .parse_mode(ParseMode::Markdown)
            .await?;
        Ok(())
    }

    /// Connectivity probe for the CLI test mode.
    pub async fn send_test(&self) -> Result<(), DeliveryError> {
        let text = format!(
            "*Rental Hunter Test*\n\n\
             If you see this message, Telegram notifications are working.\n\n\
             Current criteria:\n\
             - Location: {}\n\
             - Type: Houses only\n\
             - Min sqft: {}\n\
             - Max rent: ${}/month",
            self.config.location, self.config.min_sqft, self.config.max_rent
        );

        for chat_id in &self.chat_ids {
            self.bot
                .send_message(*chat_id, &text)
                .parse_mode(ParseMode::Markdown)
                .await?;
        }
        Ok(())
    }
}

#[async_trait]
impl Notifier for TelegramNotifier {
    async fn send_listing(&self, listing: &Listing) -> Result<(), DeliveryError> {
        let text = format_listing_message(listing);

        let mut failed = 0usize;
        for chat_id in &self.chat_ids {
            if let Err(e) = self.send_to_chat(*chat_id, listing, &text).await {
                error!("delivery to chat {} failed: {}", chat_id, e);
                failed += 1;
            }
        }

        if failed > 0 && failed == self.chat_ids.len() {
            return Err(DeliveryError::AllChatsFailed(failed));
        }
        Ok(())
    }
}

pub fn format_listing_message(listing: &Listing) -> String {
    let mut lines = vec![
        "*NEW RENTAL LISTING*".to_string(),
        String::new(),
        format!("*{}*", listing.address),
        format!(
            "{}, {} {}",
            listing.city, listing.state, listing.zip_code
        ),
        String::new(),
        format!("*${}/month*", listing.price),
    ];

    let mut details: Vec<String> = Vec::new();
    if let Some(beds) = listing.bedrooms {
        details.push(format!("{} bed", beds));
    }
    if let Some(baths) = listing.bathrooms {
        details.push(format!("{} bath", format_baths(baths)));
    }
    if let Some(sqft) = listing.sqft {
        details.push(format!("{} sqft", sqft));
    }
    if !details.is_empty() {
        lines.push(details.join(" | "));
    }

    lines.push(String::new());
    lines.push(format!("Source: {}", listing.source.display_name()));
    lines.push(format!("[View Listing]({})", listing.url));

    lines.join("\n")
}

// "2.0" -> "2", "2.5" -> "2.5"
fn format_baths(baths: f32) -> String {
    let formatted = format!("{:.1}", baths);
    formatted
        .trim_end_matches('0')
        .trim_end_matches('.')
        .to_string()
}
