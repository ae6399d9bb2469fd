pub type Err = anyhow::Error;
pub type Res<T> = Result<T, Err>;
pub type Void = Res<()>;

/// A single inbound update, as handed over by the chat transport.
///
/// `text` is `None` for messages without a textual body (stickers, photos, joins, etc.).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InboundUpdate {
    pub chat_id: i64,
    pub text: Option<String>,
}

impl InboundUpdate {
    pub fn new(chat_id: i64, text: impl Into<String>) -> Self {
        Self { chat_id, text: Some(text.into()) }
    }

    pub fn without_text(chat_id: i64) -> Self {
        Self { chat_id, text: None }
    }
}
