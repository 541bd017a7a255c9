//! Service layer tests over in-memory repositories
//!
//! Covers conversation dedup, membership read-state, message lifecycle,
//! pagination, and event routing.

mod common;

use common::{stale_lookup_context, test_context, test_context_with, RecordingNotifier};
use courier_common::MessagingConfig;
use courier_core::{
    Conversation, ConversationRepository, DomainError, DomainEvent, MessageKind, Snowflake,
};
use courier_service::{
    ConversationService, MembershipService, MessageService, ServiceContext, ServiceError,
};

const ALICE: Snowflake = Snowflake::new(101);
const BOB: Snowflake = Snowflake::new(102);
const CAROL: Snowflake = Snowflake::new(103);
const OUTSIDER: Snowflake = Snowflake::new(999);

fn assert_domain_err<T: std::fmt::Debug>(
    result: Result<T, ServiceError>,
    check: impl FnOnce(&DomainError) -> bool,
) {
    match result {
        Err(ServiceError::Domain(e)) if check(&e) => {}
        other => panic!("expected domain error, got {other:?}"),
    }
}

async fn open_direct(ctx: &ServiceContext) -> Snowflake {
    let response = ConversationService::new(ctx)
        .open_direct(ALICE, BOB)
        .await
        .unwrap();
    response.id.parse().unwrap()
}

// ============================================================================
// Conversations
// ============================================================================

#[tokio::test]
async fn test_open_direct_is_idempotent_and_symmetric() {
    let (ctx, notifier) = test_context();
    let service = ConversationService::new(&ctx);

    let first = service.open_direct(ALICE, BOB).await.unwrap();
    let again = service.open_direct(ALICE, BOB).await.unwrap();
    let reversed = service.open_direct(BOB, ALICE).await.unwrap();

    assert_eq!(first.id, again.id);
    assert_eq!(first.id, reversed.id);
    assert_eq!(first.kind, "direct");

    // Only the first open announces the conversation
    let events = notifier.events();
    assert_eq!(events.len(), 1);
    let (recipients, event) = &events[0];
    assert_eq!(event.event_type(), "CONVERSATION_CREATED");
    assert_eq!(recipients, &vec![ALICE, BOB]);
}

#[tokio::test]
async fn test_lost_direct_creation_race_returns_winner_without_event() {
    let (ctx, notifier, store) = stale_lookup_context();

    // The rival creator's row is already committed, but this caller's
    // lookup runs before it becomes visible
    let winner = Conversation::direct(Snowflake::new(424_242));
    store
        .create_with_members(&winner, &[ALICE, BOB])
        .await
        .unwrap();

    let opened = ConversationService::new(&ctx)
        .open_direct(ALICE, BOB)
        .await
        .unwrap();

    assert_eq!(opened.id, "424242");
    assert!(
        notifier.events().is_empty(),
        "losing the race must not announce a second creation"
    );
}

#[tokio::test]
async fn test_open_direct_with_self_is_rejected() {
    let (ctx, notifier) = test_context();

    let result = ConversationService::new(&ctx).open_direct(ALICE, ALICE).await;
    assert_domain_err(result, |e| matches!(e, DomainError::SelfConversation));
    assert!(notifier.events().is_empty());
}

#[tokio::test]
async fn test_create_group_includes_creator_and_collapses_duplicates() {
    let (ctx, notifier) = test_context();
    let service = ConversationService::new(&ctx);

    let response = service
        .create_group(
            ALICE,
            Some("Weekend plans".to_string()),
            None,
            vec![BOB, BOB, ALICE, CAROL],
        )
        .await
        .unwrap();
    assert_eq!(response.kind, "group");
    assert_eq!(response.title.as_deref(), Some("Weekend plans"));

    let conversation_id: Snowflake = response.id.parse().unwrap();
    let summary = service.get_conversation(conversation_id, ALICE).await.unwrap();
    assert_eq!(summary.member_ids.len(), 3);

    let (recipients, _) = &notifier.events()[0];
    assert_eq!(recipients.len(), 3);
}

#[tokio::test]
async fn test_create_group_requires_two_distinct_members() {
    let (ctx, _) = test_context();
    let service = ConversationService::new(&ctx);

    // Creator plus duplicates of the creator is still one member
    let result = service.create_group(ALICE, None, None, vec![ALICE, ALICE]).await;
    assert_domain_err(result, |e| {
        matches!(e, DomainError::NotEnoughMembers { min: 2 })
    });

    let result = service.create_group(ALICE, None, None, vec![]).await;
    assert_domain_err(result, |e| matches!(e, DomainError::NotEnoughMembers { .. }));
}

#[tokio::test]
async fn test_list_conversations_orders_by_recent_activity() {
    let (ctx, _) = test_context();
    let conversations = ConversationService::new(&ctx);
    let messages = MessageService::new(&ctx);

    let with_bob = conversations.open_direct(ALICE, BOB).await.unwrap();
    let with_carol = conversations.open_direct(ALICE, CAROL).await.unwrap();

    // Newer conversation leads until older one sees activity
    let listing = conversations.list_conversations(ALICE, 1, Some(50)).await.unwrap();
    assert_eq!(listing.data[0].id, with_carol.id);

    let bob_conv: Snowflake = with_bob.id.parse().unwrap();
    messages
        .send_message(bob_conv, BOB, "ping".to_string(), MessageKind::Text, None)
        .await
        .unwrap();

    let listing = conversations.list_conversations(ALICE, 1, Some(50)).await.unwrap();
    assert_eq!(listing.data.len(), 2);
    assert_eq!(listing.data[0].id, with_bob.id);
    assert_eq!(listing.data[0].unread_count, 1);
    assert_eq!(
        listing.data[0]
            .last_message
            .as_ref()
            .unwrap()
            .preview
            .as_deref(),
        Some("ping")
    );
}

#[tokio::test]
async fn test_list_conversations_rejects_invalid_page() {
    let (ctx, _) = test_context();

    let result = ConversationService::new(&ctx)
        .list_conversations(ALICE, 0, Some(50))
        .await;
    assert_domain_err(result, |e| matches!(e, DomainError::InvalidPage(0)));
}

#[tokio::test]
async fn test_get_conversation_requires_membership() {
    let (ctx, _) = test_context();
    let service = ConversationService::new(&ctx);
    let conversation_id = open_direct(&ctx).await;

    let result = service.get_conversation(conversation_id, OUTSIDER).await;
    assert_domain_err(result, |e| matches!(e, DomainError::NotAConversationMember));

    let missing = service
        .get_conversation(Snowflake::new(424_242), ALICE)
        .await;
    assert_domain_err(missing, |e| matches!(e, DomainError::ConversationNotFound(_)));
}

#[tokio::test]
async fn test_delete_conversation_cascades_and_notifies() {
    let (ctx, notifier) = test_context();
    let conversations = ConversationService::new(&ctx);
    let messages = MessageService::new(&ctx);
    let conversation_id = open_direct(&ctx).await;

    messages
        .send_message(conversation_id, ALICE, "bye".to_string(), MessageKind::Text, None)
        .await
        .unwrap();

    let result = conversations.delete_conversation(conversation_id, OUTSIDER).await;
    assert_domain_err(result, |e| matches!(e, DomainError::NotAConversationMember));

    conversations
        .delete_conversation(conversation_id, ALICE)
        .await
        .unwrap();

    let gone = conversations.get_conversation(conversation_id, ALICE).await;
    assert_domain_err(gone, |e| matches!(e, DomainError::ConversationNotFound(_)));

    let events = notifier.events();
    let (recipients, event) = events.last().unwrap();
    assert_eq!(event.event_type(), "CONVERSATION_DELETED");
    assert_eq!(recipients.len(), 2);
}

// ============================================================================
// Read state
// ============================================================================

#[tokio::test]
async fn test_mark_read_zeroes_counter_and_is_idempotent() {
    let (ctx, notifier) = test_context();
    let memberships = MembershipService::new(&ctx);
    let messages = MessageService::new(&ctx);
    let conversation_id = open_direct(&ctx).await;

    for n in 0..3 {
        messages
            .send_message(
                conversation_id,
                BOB,
                format!("msg {n}"),
                MessageKind::Text,
                None,
            )
            .await
            .unwrap();
    }

    let before = memberships.get_membership(conversation_id, ALICE).await.unwrap();
    assert_eq!(before.unread_count, 3);

    memberships.mark_read(conversation_id, ALICE).await.unwrap();
    let after = memberships.get_membership(conversation_id, ALICE).await.unwrap();
    assert_eq!(after.unread_count, 0);
    assert!(after.last_read_at.is_some());

    // Reading again is a no-op, not an error
    memberships.mark_read(conversation_id, ALICE).await.unwrap();

    let read_events: Vec<_> = notifier
        .events()
        .into_iter()
        .filter(|(_, e)| e.event_type() == "CONVERSATION_READ")
        .collect();
    assert_eq!(read_events.len(), 2);
    assert_eq!(read_events[0].0, vec![ALICE]);
}

#[tokio::test]
async fn test_mark_read_requires_membership() {
    let (ctx, _) = test_context();
    let conversation_id = open_direct(&ctx).await;

    let result = MembershipService::new(&ctx)
        .mark_read(conversation_id, OUTSIDER)
        .await;
    assert_domain_err(result, |e| matches!(e, DomainError::NotAConversationMember));
}

#[tokio::test]
async fn test_sender_unread_stays_at_zero() {
    let (ctx, _) = test_context();
    let memberships = MembershipService::new(&ctx);
    let messages = MessageService::new(&ctx);
    let conversation_id = open_direct(&ctx).await;

    messages
        .send_message(conversation_id, ALICE, "one".to_string(), MessageKind::Text, None)
        .await
        .unwrap();
    messages
        .send_message(conversation_id, ALICE, "two".to_string(), MessageKind::Text, None)
        .await
        .unwrap();

    let alice = memberships.get_membership(conversation_id, ALICE).await.unwrap();
    let bob = memberships.get_membership(conversation_id, BOB).await.unwrap();
    assert_eq!(alice.unread_count, 0);
    assert_eq!(bob.unread_count, 2);
}

// ============================================================================
// Messages
// ============================================================================

#[tokio::test]
async fn test_send_message_requires_membership() {
    let (ctx, _) = test_context();
    let messages = MessageService::new(&ctx);
    let conversation_id = open_direct(&ctx).await;

    let result = messages
        .send_message(conversation_id, OUTSIDER, "hi".to_string(), MessageKind::Text, None)
        .await;
    assert_domain_err(result, |e| matches!(e, DomainError::NotAConversationMember));

    let missing = messages
        .send_message(
            Snowflake::new(424_242),
            ALICE,
            "hi".to_string(),
            MessageKind::Text,
            None,
        )
        .await;
    assert_domain_err(missing, |e| matches!(e, DomainError::ConversationNotFound(_)));
}

#[tokio::test]
async fn test_send_message_validates_content() {
    let messaging = MessagingConfig {
        max_message_length: 10,
        ..MessagingConfig::default()
    };
    let (ctx, _) = test_context_with(messaging);
    let messages = MessageService::new(&ctx);
    let conversation_id = open_direct(&ctx).await;

    let empty = messages
        .send_message(conversation_id, ALICE, "   ".to_string(), MessageKind::Text, None)
        .await;
    assert_domain_err(empty, |e| matches!(e, DomainError::EmptyContent));

    let too_long = messages
        .send_message(
            conversation_id,
            ALICE,
            "12345678901".to_string(),
            MessageKind::Text,
            None,
        )
        .await;
    assert_domain_err(too_long, |e| {
        matches!(e, DomainError::ContentTooLong { max: 10 })
    });

    // Exactly at the limit passes
    messages
        .send_message(
            conversation_id,
            ALICE,
            "1234567890".to_string(),
            MessageKind::Text,
            None,
        )
        .await
        .unwrap();
}

#[tokio::test]
async fn test_reply_targets_are_scoped_to_the_conversation() {
    let (ctx, _) = test_context();
    let conversations = ConversationService::new(&ctx);
    let messages = MessageService::new(&ctx);

    let first = open_direct(&ctx).await;
    let other_conv: Snowflake = conversations
        .open_direct(ALICE, CAROL)
        .await
        .unwrap()
        .id
        .parse()
        .unwrap();

    let original = messages
        .send_message(first, ALICE, "original".to_string(), MessageKind::Text, None)
        .await
        .unwrap();
    let original_id: Snowflake = original.id.parse().unwrap();

    // Reply in the same conversation works
    let reply = messages
        .send_message(
            first,
            BOB,
            "a reply".to_string(),
            MessageKind::Text,
            Some(original_id),
        )
        .await
        .unwrap();
    assert_eq!(reply.reply_to.as_deref(), Some(original.id.as_str()));

    // The same target is invalid from another conversation
    let cross = messages
        .send_message(
            other_conv,
            ALICE,
            "stolen reply".to_string(),
            MessageKind::Text,
            Some(original_id),
        )
        .await;
    assert_domain_err(cross, |e| {
        matches!(e, DomainError::InvalidReplyReference(id) if *id == original_id)
    });

    // A nonexistent target is invalid too
    let dangling = messages
        .send_message(
            first,
            ALICE,
            "into the void".to_string(),
            MessageKind::Text,
            Some(Snowflake::new(777_777)),
        )
        .await;
    assert_domain_err(dangling, |e| matches!(e, DomainError::InvalidReplyReference(_)));
}

#[tokio::test]
async fn test_replying_to_a_deleted_message_is_allowed() {
    let (ctx, _) = test_context();
    let messages = MessageService::new(&ctx);
    let conversation_id = open_direct(&ctx).await;

    let target = messages
        .send_message(conversation_id, ALICE, "doomed".to_string(), MessageKind::Text, None)
        .await
        .unwrap();
    let target_id: Snowflake = target.id.parse().unwrap();
    messages.delete_message(target_id, ALICE).await.unwrap();

    let reply = messages
        .send_message(
            conversation_id,
            BOB,
            "late reply".to_string(),
            MessageKind::Text,
            Some(target_id),
        )
        .await
        .unwrap();
    assert_eq!(reply.reply_to.as_deref(), Some(target.id.as_str()));
}

#[tokio::test]
async fn test_message_pages_are_newest_first_with_stable_boundaries() {
    let (ctx, _) = test_context();
    let messages = MessageService::new(&ctx);
    let conversation_id = open_direct(&ctx).await;

    for n in 0..120 {
        messages
            .send_message(
                conversation_id,
                if n % 2 == 0 { ALICE } else { BOB },
                format!("message {n}"),
                MessageKind::Text,
                None,
            )
            .await
            .unwrap();
    }

    let page1 = messages.get_messages(conversation_id, ALICE, 1, Some(50)).await.unwrap();
    assert_eq!(page1.data.len(), 50);
    assert_eq!(page1.pagination.total, 120);
    assert!(page1.pagination.has_more);
    assert_eq!(page1.data[0].content.as_deref(), Some("message 119"));

    let page3 = messages.get_messages(conversation_id, ALICE, 3, Some(50)).await.unwrap();
    assert_eq!(page3.data.len(), 20);
    assert!(!page3.pagination.has_more);
    assert_eq!(page3.data.last().unwrap().content.as_deref(), Some("message 0"));

    // Beyond the end: empty page, not an error
    let page4 = messages.get_messages(conversation_id, ALICE, 4, Some(50)).await.unwrap();
    assert!(page4.data.is_empty());
    assert!(!page4.pagination.has_more);

    let invalid = messages.get_messages(conversation_id, ALICE, 0, Some(50)).await;
    assert_domain_err(invalid, |e| matches!(e, DomainError::InvalidPage(0)));

    // Oversized page_size clamps to the configured cap
    let clamped = messages
        .get_messages(conversation_id, ALICE, 1, Some(500))
        .await
        .unwrap();
    assert_eq!(clamped.pagination.page_size, 100);
    assert_eq!(clamped.data.len(), 100);
}

#[tokio::test]
async fn test_absent_page_size_uses_configured_default() {
    let (ctx, _) = test_context_with(MessagingConfig {
        default_page_size: 2,
        ..MessagingConfig::default()
    });
    let messages = MessageService::new(&ctx);
    let conversation_id = open_direct(&ctx).await;

    for n in 0..3 {
        messages
            .send_message(
                conversation_id,
                ALICE,
                format!("message {n}"),
                MessageKind::Text,
                None,
            )
            .await
            .unwrap();
    }

    let page = messages
        .get_messages(conversation_id, ALICE, 1, None)
        .await
        .unwrap();
    assert_eq!(page.pagination.page_size, 2);
    assert_eq!(page.data.len(), 2);
    assert!(page.pagination.has_more);

    let listing = ConversationService::new(&ctx)
        .list_conversations(ALICE, 1, None)
        .await
        .unwrap();
    assert_eq!(listing.pagination.page_size, 2);
}

#[tokio::test]
async fn test_get_messages_requires_membership() {
    let (ctx, _) = test_context();
    let conversation_id = open_direct(&ctx).await;

    let result = MessageService::new(&ctx)
        .get_messages(conversation_id, OUTSIDER, 1, Some(50))
        .await;
    assert_domain_err(result, |e| matches!(e, DomainError::NotAConversationMember));
}

#[tokio::test]
async fn test_deleted_message_keeps_its_slot_as_a_tombstone() {
    let (ctx, _) = test_context();
    let conversations = ConversationService::new(&ctx);
    let messages = MessageService::new(&ctx);
    let conversation_id = open_direct(&ctx).await;

    let mut ids = Vec::new();
    for n in 0..3 {
        let sent = messages
            .send_message(
                conversation_id,
                ALICE,
                format!("message {n}"),
                MessageKind::Text,
                None,
            )
            .await
            .unwrap();
        ids.push(sent.id.parse::<Snowflake>().unwrap());
    }

    // Delete the newest message
    messages.delete_message(ids[2], ALICE).await.unwrap();

    let page = messages.get_messages(conversation_id, ALICE, 1, Some(50)).await.unwrap();
    assert_eq!(page.pagination.total, 3);
    assert_eq!(page.data.len(), 3);
    assert!(page.data[0].deleted);
    assert!(page.data[0].content.is_none());
    assert!(!page.data[1].deleted);

    // The listing preview falls back to the newest surviving message
    let summary = conversations
        .get_conversation(conversation_id, ALICE)
        .await
        .unwrap();
    assert_eq!(
        summary.last_message.unwrap().preview.as_deref(),
        Some("message 1")
    );

    let twice = messages.delete_message(ids[2], ALICE).await;
    assert_domain_err(twice, |e| matches!(e, DomainError::MessageAlreadyDeleted));
}

#[tokio::test]
async fn test_only_the_sender_may_edit_or_delete() {
    let (ctx, _) = test_context();
    let messages = MessageService::new(&ctx);
    let conversation_id = open_direct(&ctx).await;

    let sent = messages
        .send_message(conversation_id, ALICE, "mine".to_string(), MessageKind::Text, None)
        .await
        .unwrap();
    let message_id: Snowflake = sent.id.parse().unwrap();

    let edit = messages
        .edit_message(message_id, BOB, "hijacked".to_string())
        .await;
    assert_domain_err(edit, |e| matches!(e, DomainError::NotMessageSender));

    let delete = messages.delete_message(message_id, BOB).await;
    assert_domain_err(delete, |e| matches!(e, DomainError::NotMessageSender));
}

#[tokio::test]
async fn test_edit_updates_content_and_stamps_edited_at() {
    let (ctx, notifier) = test_context();
    let messages = MessageService::new(&ctx);
    let conversation_id = open_direct(&ctx).await;

    let sent = messages
        .send_message(conversation_id, ALICE, "typo".to_string(), MessageKind::Text, None)
        .await
        .unwrap();
    assert!(sent.edited_at.is_none());
    let message_id: Snowflake = sent.id.parse().unwrap();

    let edited = messages
        .edit_message(message_id, ALICE, "fixed".to_string())
        .await
        .unwrap();
    assert_eq!(edited.content.as_deref(), Some("fixed"));
    assert!(edited.edited_at.is_some());

    let (recipients, event) = notifier.events().last().unwrap().clone();
    assert_eq!(event.event_type(), "MESSAGE_EDITED");
    assert_eq!(recipients, vec![BOB]);
}

#[tokio::test]
async fn test_editing_a_deleted_message_fails() {
    let (ctx, _) = test_context();
    let messages = MessageService::new(&ctx);
    let conversation_id = open_direct(&ctx).await;

    let sent = messages
        .send_message(conversation_id, ALICE, "gone soon".to_string(), MessageKind::Text, None)
        .await
        .unwrap();
    let message_id: Snowflake = sent.id.parse().unwrap();
    messages.delete_message(message_id, ALICE).await.unwrap();

    let result = messages
        .edit_message(message_id, ALICE, "too late".to_string())
        .await;
    assert_domain_err(result, |e| matches!(e, DomainError::MessageAlreadyDeleted));
}

// ============================================================================
// Event routing
// ============================================================================

#[tokio::test]
async fn test_message_sent_event_excludes_sender_and_carries_preview() {
    let messaging = MessagingConfig {
        preview_length: 8,
        ..MessagingConfig::default()
    };
    let (ctx, notifier) = test_context_with(messaging);
    let conversations = ConversationService::new(&ctx);
    let messages = MessageService::new(&ctx);

    let conversation_id: Snowflake = conversations
        .create_group(ALICE, Some("Trio".to_string()), None, vec![BOB, CAROL])
        .await
        .unwrap()
        .id
        .parse()
        .unwrap();

    messages
        .send_message(
            conversation_id,
            ALICE,
            "a rather long announcement".to_string(),
            MessageKind::Text,
            None,
        )
        .await
        .unwrap();

    let events = notifier.events();
    let (recipients, event) = events.last().unwrap();
    assert_eq!(event.event_type(), "MESSAGE_SENT");
    assert!(!recipients.contains(&ALICE));
    assert_eq!(recipients.len(), 2);

    match event {
        DomainEvent::MessageSent(e) => {
            assert_eq!(e.sender_id, ALICE);
            assert_eq!(e.kind, "text");
            assert_eq!(e.preview.as_deref(), Some("a rather"));
        }
        other => panic!("expected MessageSent, got {other:?}"),
    }
}
