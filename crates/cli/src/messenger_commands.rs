use {
    anyhow::{Context, Result},
    bistro_auto_reply::content,
    bistro_config::BistroConfig,
    bistro_messenger::{GraphApiSender, OutboundMessage, Sender},
    tracing::info,
};

/// Publish the Get Started button, greeting and persistent menu.
pub async fn publish_profile(config: &BistroConfig) -> Result<()> {
    let sender = GraphApiSender::from_config(&config.messenger)?;
    let profile = content::messenger_profile();
    sender
        .set_profile(&profile)
        .await
        .context("failed to update the Messenger profile")?;
    info!(
        get_started = profile.get_started_payload(),
        "messenger profile updated"
    );
    Ok(())
}

/// Send one text message outside of a conversation flow.
pub async fn send_text(config: &BistroConfig, recipient_id: &str, text: &str) -> Result<()> {
    let sender = GraphApiSender::from_config(&config.messenger)?;
    let receipt = sender
        .send(recipient_id, &OutboundMessage::text(text))
        .await
        .with_context(|| format!("failed to send message to {recipient_id}"))?;
    println!(
        "sent {}",
        receipt.message_id.as_deref().unwrap_or("(no message id)")
    );
    Ok(())
}
