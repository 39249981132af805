use super::{failure, SERVER_ERROR};
use crate::{
    api::{
        dto::{ChatStarted, ConversationPage, MessagePage, SentMessage},
        mapper::map_all,
        params::NewMessage,
        ApiClient, NoParams, Page,
    },
    models::{Conversation, Message},
    resource::ResourceFlow,
};
use http::Method;
use std::sync::Arc;
use tracing::{debug, instrument};

pub const CONVERSATIONS_PATH: &str = "api/v1/conversaciones";

pub const SEND_FAILED: &str = "Error sending message";
pub const START_FAILED: &str = "Error starting chat";

fn messages_path(conversation_id: i64) -> String {
    format!("{CONVERSATIONS_PATH}/{conversation_id}/mensajes/listar")
}

fn send_path(conversation_id: i64) -> String {
    format!("{CONVERSATIONS_PATH}/{conversation_id}/mensajes/enviar")
}

fn start_chat_path(product_id: i64) -> String {
    format!("api/v1/productos/{product_id}/iniciar-chat")
}

#[derive(Debug, Clone)]
pub struct ConversationRepository {
    api: Arc<ApiClient>,
}

impl ConversationRepository {
    #[must_use]
    pub fn new(api: Arc<ApiClient>) -> Self {
        Self { api }
    }

    #[must_use]
    pub fn list(&self, page: Page) -> ResourceFlow<Vec<Conversation>> {
        let api = Arc::clone(&self.api);
        ResourceFlow::spawn(async move { list_conversations(&api, page).await })
    }

    #[must_use]
    pub fn messages(&self, conversation_id: i64, page: Page) -> ResourceFlow<Vec<Message>> {
        let api = Arc::clone(&self.api);
        ResourceFlow::spawn(async move { list_messages(&api, conversation_id, page).await })
    }

    /// Post `content` to a conversation; yields the stored message.
    #[must_use]
    pub fn send(&self, conversation_id: i64, content: impl Into<String>) -> ResourceFlow<Message> {
        let api = Arc::clone(&self.api);
        let content = content.into();
        ResourceFlow::spawn(async move { send_message(&api, conversation_id, &content).await })
    }

    /// Open (or reopen) the chat about a product; yields the conversation id.
    #[must_use]
    pub fn start_chat(&self, product_id: i64) -> ResourceFlow<i64> {
        let api = Arc::clone(&self.api);
        ResourceFlow::spawn(async move { start_chat(&api, product_id).await })
    }
}

#[instrument(skip(api))]
async fn list_conversations(api: &ApiClient, page: Page) -> Result<Vec<Conversation>, String> {
    let reply: Option<ConversationPage> = api
        .call(Method::POST, CONVERSATIONS_PATH, &page)
        .await
        .map_err(|e| failure("conversations.list", &e, SERVER_ERROR))?;

    Ok(reply.map_or_else(Vec::new, |page| map_all(page.conversations)))
}

#[instrument(skip(api))]
async fn list_messages(
    api: &ApiClient,
    conversation_id: i64,
    page: Page,
) -> Result<Vec<Message>, String> {
    let reply: Option<MessagePage> = api
        .call(Method::POST, &messages_path(conversation_id), &page)
        .await
        .map_err(|e| failure("conversations.messages", &e, SERVER_ERROR))?;

    let messages: Vec<Message> = reply.map_or_else(Vec::new, |page| map_all(page.messages));
    debug!(count = messages.len(), "messages listed");
    Ok(messages)
}

#[instrument(skip(api, content))]
async fn send_message(api: &ApiClient, conversation_id: i64, content: &str) -> Result<Message, String> {
    let reply: Option<SentMessage> = api
        .call(Method::POST, &send_path(conversation_id), &NewMessage { content })
        .await
        .map_err(|e| failure("conversations.send", &e, SEND_FAILED))?;

    reply
        .and_then(|sent| sent.data)
        .map(Message::from)
        .ok_or_else(|| SEND_FAILED.to_string())
}

#[instrument(skip(api))]
async fn start_chat(api: &ApiClient, product_id: i64) -> Result<i64, String> {
    let reply: Option<ChatStarted> = api
        .call(Method::POST, &start_chat_path(product_id), &NoParams {})
        .await
        .map_err(|e| failure("conversations.start_chat", &e, START_FAILED))?;

    reply
        .and_then(|started| started.conversation_id)
        .ok_or_else(|| START_FAILED.to_string())
}
