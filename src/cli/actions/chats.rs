use super::render::{follow, or_dash, truncate};
use crate::{
    api::Page,
    cli::globals::GlobalArgs,
    models::{Conversation, Message},
};
use anyhow::Result;

#[derive(Debug)]
pub enum Operation {
    List(Page),
    Messages(i64, Page),
    Send { conversation_id: i64, content: String },
    Start(i64),
}

#[derive(Debug)]
pub struct Args {
    pub globals: GlobalArgs,
    pub operation: Operation,
}

/// Execute a conversation action.
/// # Errors
/// Returns an error if the request fails.
pub async fn execute(args: Args) -> Result<()> {
    let market = args.globals.marketplace(args.globals.open_store()?)?;

    match args.operation {
        Operation::List(page) => {
            let conversations =
                follow(market.conversations.list(page), "Loading conversations").await?;
            if conversations.is_empty() {
                println!("No conversations");
            }
            for conversation in &conversations {
                println!("{}", conversation_line(conversation));
            }
        }
        Operation::Messages(id, page) => {
            let messages = follow(market.conversations.messages(id, page), "Loading messages").await?;
            for message in &messages {
                println!("{}", message_line(message));
            }
        }
        Operation::Send {
            conversation_id,
            content,
        } => {
            let message = follow(
                market.conversations.send(conversation_id, content),
                "Sending message",
            )
            .await?;
            println!("{}", message_line(&message));
        }
        Operation::Start(product_id) => {
            let id = follow(market.conversations.start_chat(product_id), "Starting chat").await?;
            println!("Conversation {id} ready");
        }
    }

    Ok(())
}

fn conversation_line(conversation: &Conversation) -> String {
    format!(
        "{:>5}  {:<28}  {:<16}  {:>3} msgs  {}",
        conversation.id,
        truncate(&conversation.subject, 28),
        truncate(&conversation.counterpart.name, 16),
        conversation.message_count,
        truncate(or_dash(conversation.last_message.as_deref()), 40),
    )
}

fn message_line(message: &Message) -> String {
    let unread = if message.read { ' ' } else { '*' };
    format!(
        "{unread}[{}] {}: {}",
        or_dash(message.sent_at.as_deref()),
        message.sender_name,
        message.content
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Counterpart;

    #[test]
    fn test_conversation_line() {
        let conversation = Conversation {
            id: 5,
            subject: "Consulta sobre Bicicleta".into(),
            counterpart: Counterpart {
                id: 8,
                name: "Marta".into(),
            },
            state: "abierta".into(),
            message_count: 2,
            last_message: None,
            last_message_at: None,
            product_id: Some(4),
        };

        let line = conversation_line(&conversation);
        assert!(line.contains("Consulta sobre Bicicleta"));
        assert!(line.contains("Marta"));
        assert!(line.ends_with("2 msgs  -"));
    }

    #[test]
    fn test_message_line_marks_unread() {
        let mut message = Message {
            id: 1,
            content: "¿Sigue disponible?".into(),
            sent_at: Some("2024-05-01 09:30:00".into()),
            read: false,
            sender_id: 8,
            sender_name: "Marta".into(),
            from_buyer: true,
            from_seller: false,
        };
        assert_eq!(
            message_line(&message),
            "*[2024-05-01 09:30:00] Marta: ¿Sigue disponible?"
        );

        message.read = true;
        assert!(message_line(&message).starts_with(' '));
    }
}
