//! Handling of a single inbound update.
//!
//! An update is resolved against the membership store, classified, and then fans out
//! into up to three independent sub-actions (notify, joke, help). A failure in one
//! sub-action never prevents the others from running.

use tracing::{debug, error, info, instrument, warn};

use crate::{
    base::{config::Config, error::RelayError, triggers::TriggerSet, types::InboundUpdate},
    service::{chat::ChatClient, db::DbClient},
};

/// Outcome of handling one update.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct UpdateReport {
    /// Texts that were successfully sent, in send order.
    pub sent: Vec<String>,
    /// Non-fatal conditions raised while handling the update.
    pub failures: Vec<RelayError>,
}

impl UpdateReport {
    /// Whether the update was handled without any reported condition.
    pub fn is_clean(&self) -> bool {
        self.failures.is_empty()
    }

    fn fail(&mut self, failure: RelayError) {
        match &failure {
            RelayError::UnknownChat(_) | RelayError::NoMembers(_) => warn!("{}", failure),
            _ => error!("{}", failure),
        }

        self.failures.push(failure);
    }
}

/// Handles one inbound update to completion.
///
/// Never fails: every condition is logged and recorded in the returned report.
#[instrument(skip_all, fields(chat_id = update.chat_id))]
pub async fn handle_update(update: InboundUpdate, config: &Config, triggers: &TriggerSet, db: &DbClient, chat: &ChatClient) -> UpdateReport {
    let mut report = UpdateReport::default();

    let Some(text) = update.text.as_deref() else {
        debug!("Ignoring update without text.");
        return report;
    };

    // Resolve the chat; unknown chats are dropped here.

    let internal_id = match db.resolve_internal_id(update.chat_id).await {
        Ok(internal_id) => internal_id,
        Err(err) => {
            report.fail(RelayError::from_store(&err));
            return report;
        }
    };

    // Classify, then run every requested action.

    if triggers.requests_notify_all(text) {
        info!("Notifying all members ...");
        notify_all(update.chat_id, internal_id, config, db, chat, &mut report).await;
    }

    if triggers.requests_joke(text) {
        info!("Posting a joke ...");
        let link = compose_joke_link(&config.joke_base_url, pick_joke_id(config.joke_post_bound));
        send(chat, update.chat_id, link, &mut report).await;
    }

    if triggers.requests_help(text) {
        info!("Posting help ...");
        send(chat, update.chat_id, compose_help(triggers), &mut report).await;
    }

    report
}

async fn notify_all(chat_id: i64, internal_id: i64, config: &Config, db: &DbClient, chat: &ChatClient, report: &mut UpdateReport) {
    let members = match db.list_members(internal_id).await {
        Ok(members) => members,
        Err(err) => {
            report.fail(RelayError::from_store(&err));
            return;
        }
    };

    if members.is_empty() {
        report.fail(RelayError::NoMembers(chat_id));
        return;
    }

    let text = compose_mentions(&members, config.rehearsal, config.notify_prefix.as_deref());
    send(chat, chat_id, text, report).await;
}

async fn send(chat: &ChatClient, chat_id: i64, text: String, report: &mut UpdateReport) {
    match chat.send_message(chat_id, &text).await {
        Ok(()) => report.sent.push(text),
        Err(err) => report.fail(RelayError::SendFailed {
            chat_id,
            reason: format!("{err:#}"),
        }),
    }
}

// Formatting.

/// Builds the notification text: every member followed by a single space, in input order.
///
/// Rehearsal mode lists plain handles so nobody is pinged.
pub fn compose_mentions(members: &[String], rehearsal: bool, prefix: Option<&str>) -> String {
    let mentions: String = members
        .iter()
        .map(|member| if rehearsal { format!("{member} ") } else { format!("@{member} ") })
        .collect();

    match prefix {
        Some(prefix) if !prefix.is_empty() => format!("{prefix}\n{mentions}"),
        _ => mentions,
    }
}

/// Picks a joke index in `[0, bound)`.
pub fn pick_joke_id(bound: u32) -> u32 {
    fastrand::u32(0..bound.max(1))
}

pub fn compose_joke_link(base_url: &str, joke_id: u32) -> String {
    format!("{}/{}", base_url.trim_end_matches('/'), joke_id)
}

/// Usage message listing the active trigger literals.
pub fn compose_help(triggers: &TriggerSet) -> String {
    format!(
        "Mention {} to ping everyone in this chat.\nMention {} for a random joke.",
        triggers.notify_literals().join(", "),
        triggers.joke_literals().join(", ")
    )
}

// Tests.
