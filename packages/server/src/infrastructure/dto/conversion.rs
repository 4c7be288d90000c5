//! Conversion logic between DTOs and domain entities.

use crate::domain::{
    ChatEvent, Message, MessageText, NewMessage, Timestamp, TypingSignal, UserName,
    ValueObjectError,
};
use crate::infrastructure::dto::{http, websocket as dto};

// ========================================
// DTO → Domain Entity
// ========================================

impl TryFrom<dto::NewMessageData> for NewMessage {
    type Error = ValueObjectError;

    fn try_from(dto: dto::NewMessageData) -> Result<Self, Self::Error> {
        Ok(NewMessage::new(
            UserName::new(dto.user)?,
            MessageText::new(dto.message)?,
            dto.timestamp.map(Timestamp::new),
        ))
    }
}

impl TryFrom<http::CreateMessageRequest> for NewMessage {
    type Error = ValueObjectError;

    fn try_from(dto: http::CreateMessageRequest) -> Result<Self, Self::Error> {
        Ok(NewMessage::new(
            UserName::new(dto.user)?,
            MessageText::new(dto.message)?,
            dto.timestamp.map(Timestamp::new),
        ))
    }
}

impl TryFrom<dto::TypingData> for TypingSignal {
    type Error = ValueObjectError;

    fn try_from(dto: dto::TypingData) -> Result<Self, Self::Error> {
        Ok(TypingSignal {
            user: UserName::new(dto.user)?,
            is_typing: dto.is_typing,
        })
    }
}

impl TryFrom<dto::ClientEvent> for ChatEvent {
    type Error = ValueObjectError;

    fn try_from(dto: dto::ClientEvent) -> Result<Self, Self::Error> {
        match dto {
            dto::ClientEvent::Message(data) => Ok(ChatEvent::MessageRelayed(data.try_into()?)),
            dto::ClientEvent::Typing(data) => Ok(ChatEvent::Typing(data.try_into()?)),
        }
    }
}

// ========================================
// Domain Entity → DTO
// ========================================

impl From<&Message> for dto::MessageData {
    fn from(model: &Message) -> Self {
        Self {
            id: Some(model.id.value()),
            user: model.user.as_str().to_string(),
            message: model.text.as_str().to_string(),
            timestamp: Some(model.timestamp.as_str().to_string()),
        }
    }
}

impl From<&NewMessage> for dto::MessageData {
    fn from(model: &NewMessage) -> Self {
        Self {
            id: None,
            user: model.user.as_str().to_string(),
            message: model.text.as_str().to_string(),
            timestamp: model.timestamp.as_ref().map(|t| t.as_str().to_string()),
        }
    }
}

impl From<&TypingSignal> for dto::TypingData {
    fn from(model: &TypingSignal) -> Self {
        Self {
            user: model.user.as_str().to_string(),
            is_typing: model.is_typing,
        }
    }
}

impl From<&ChatEvent> for dto::ServerEvent {
    fn from(model: &ChatEvent) -> Self {
        match model {
            ChatEvent::InitialMessages(messages) => {
                dto::ServerEvent::InitialMessages(messages.iter().map(Into::into).collect())
            }
            ChatEvent::MessageCreated(message) => dto::ServerEvent::Message(message.into()),
            ChatEvent::MessageRelayed(message) => dto::ServerEvent::Message(message.into()),
            ChatEvent::Typing(signal) => dto::ServerEvent::Typing(signal.into()),
        }
    }
}

impl From<Message> for http::MessageResponse {
    fn from(model: Message) -> Self {
        Self {
            id: model.id.value(),
            user: model.user.into_string(),
            message: model.text.into_string(),
            timestamp: model.timestamp.into_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::MessageId;

    fn stored_message() -> Message {
        Message {
            id: MessageId::new(3),
            user: UserName::new("Charlie".to_string()).unwrap(),
            text: MessageText::new("Anyone up for lunch later?".to_string()).unwrap(),
            timestamp: Timestamp::new("2025-08-06T08:02:00Z".to_string()),
        }
    }

    #[test]
    fn test_client_typing_event_to_domain() {
        // テスト項目: クライアントの typing イベントがドメインイベントに変換される
        // given (前提条件):
        let dto_event = dto::ClientEvent::Typing(dto::TypingData {
            user: "Alice".to_string(),
            is_typing: true,
        });

        // when (操作):
        let event = ChatEvent::try_from(dto_event).unwrap();

        // then (期待する結果):
        assert_eq!(
            event,
            ChatEvent::Typing(TypingSignal::started(
                UserName::new("Alice".to_string()).unwrap()
            ))
        );
    }

    #[test]
    fn test_client_message_with_empty_text_is_rejected() {
        // テスト項目: 本文が空の message イベントは変換に失敗する
        // given (前提条件):
        let dto_event = dto::ClientEvent::Message(dto::NewMessageData {
            user: "Alice".to_string(),
            message: String::new(),
            timestamp: None,
        });

        // when (操作):
        let result = ChatEvent::try_from(dto_event);

        // then (期待する結果):
        assert_eq!(result, Err(ValueObjectError::MessageTextEmpty));
    }

    #[test]
    fn test_stored_message_to_server_event() {
        // テスト項目: 保存済みメッセージが id 付きの message イベントに変換される
        // given (前提条件):
        let event = ChatEvent::MessageCreated(stored_message());

        // when (操作):
        let dto_event = dto::ServerEvent::from(&event);

        // then (期待する結果):
        assert_eq!(
            dto_event,
            dto::ServerEvent::Message(dto::MessageData {
                id: Some(3),
                user: "Charlie".to_string(),
                message: "Anyone up for lunch later?".to_string(),
                timestamp: Some("2025-08-06T08:02:00Z".to_string()),
            })
        );
    }

    #[test]
    fn test_stored_message_to_http_response() {
        // テスト項目: 保存済みメッセージが REST レスポンスに変換される
        // given (前提条件):
        let message = stored_message();

        // when (操作):
        let response = http::MessageResponse::from(message);

        // then (期待する結果):
        assert_eq!(response.id, 3);
        assert_eq!(response.user, "Charlie");
        assert_eq!(response.timestamp, "2025-08-06T08:02:00Z");
    }

    #[test]
    fn test_create_request_with_empty_timestamp_defaults_later() {
        // テスト項目: 空の timestamp を持つリクエストは timestamp 未指定として変換される
        // given (前提条件):
        let request = http::CreateMessageRequest {
            user: "Alice".to_string(),
            message: "hi".to_string(),
            timestamp: Some(String::new()),
        };

        // when (操作):
        let new_message = NewMessage::try_from(request).unwrap();

        // then (期待する結果):
        assert_eq!(new_message.timestamp, None);
    }
}
