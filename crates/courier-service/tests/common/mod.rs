//! In-memory repository fakes and a recording notifier for service tests

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use chrono::Utc;
use parking_lot::{Mutex, RwLock};

use courier_common::{JwtService, MessagingConfig};
use courier_core::traits::{
    ConversationRepository, MembershipRepository, MessageRepository, Notifier,
};
use courier_core::{
    direct_pair_key, Conversation, DomainError, DomainEvent, Membership, Message, Page,
    PageRequest, RepoResult, Snowflake, SnowflakeGenerator,
};
use courier_service::{ServiceContext, ServiceContextBuilder};

#[derive(Default)]
struct StoreInner {
    conversations: HashMap<i64, Conversation>,
    direct_keys: HashMap<String, Snowflake>,
    memberships: HashMap<(i64, i64), Membership>,
    messages: HashMap<i64, Message>,
}

/// Single in-memory store backing all three repository traits
#[derive(Default)]
pub struct InMemoryStore {
    inner: RwLock<StoreInner>,
}

#[async_trait]
impl ConversationRepository for InMemoryStore {
    async fn find_by_id(&self, id: Snowflake) -> RepoResult<Option<Conversation>> {
        Ok(self.inner.read().conversations.get(&id.into_inner()).cloned())
    }

    async fn find_direct(
        &self,
        user_a: Snowflake,
        user_b: Snowflake,
    ) -> RepoResult<Option<Conversation>> {
        let inner = self.inner.read();
        let key = direct_pair_key(user_a, user_b);
        Ok(inner
            .direct_keys
            .get(&key)
            .and_then(|id| inner.conversations.get(&id.into_inner()))
            .cloned())
    }

    async fn create_with_members(
        &self,
        conversation: &Conversation,
        member_ids: &[Snowflake],
    ) -> RepoResult<Conversation> {
        let mut inner = self.inner.write();

        if conversation.is_direct() {
            if let [a, b] = member_ids {
                let key = direct_pair_key(*a, *b);
                // Unique pair key already taken: hand back the winner
                if let Some(existing_id) = inner.direct_keys.get(&key) {
                    let existing = inner
                        .conversations
                        .get(&existing_id.into_inner())
                        .cloned()
                        .ok_or_else(|| {
                            DomainError::InternalError("dangling direct key".to_string())
                        })?;
                    return Ok(existing);
                }
                inner.direct_keys.insert(key, conversation.id);
            }
        }

        inner
            .conversations
            .insert(conversation.id.into_inner(), conversation.clone());
        for &user_id in member_ids {
            inner.memberships.insert(
                (conversation.id.into_inner(), user_id.into_inner()),
                Membership::new(conversation.id, user_id),
            );
        }

        Ok(conversation.clone())
    }

    async fn find_by_user(
        &self,
        user_id: Snowflake,
        page: PageRequest,
    ) -> RepoResult<Page<Conversation>> {
        let inner = self.inner.read();
        let mut items: Vec<Conversation> = inner
            .memberships
            .values()
            .filter(|m| m.user_id == user_id)
            .filter_map(|m| inner.conversations.get(&m.conversation_id.into_inner()))
            .cloned()
            .collect();
        items.sort_by(|a, b| (b.updated_at, b.id).cmp(&(a.updated_at, a.id)));

        let total = items.len() as i64;
        let paged: Vec<Conversation> = items
            .into_iter()
            .skip(page.offset() as usize)
            .take(page.limit() as usize)
            .collect();

        Ok(Page::new(paged, total, page))
    }

    async fn delete(&self, id: Snowflake) -> RepoResult<()> {
        let mut inner = self.inner.write();
        if inner.conversations.remove(&id.into_inner()).is_none() {
            return Err(DomainError::ConversationNotFound(id));
        }
        inner.direct_keys.retain(|_, conv_id| *conv_id != id);
        inner.memberships.retain(|(conv_id, _), _| *conv_id != id.into_inner());
        inner.messages.retain(|_, m| m.conversation_id != id);
        Ok(())
    }
}

#[async_trait]
impl MembershipRepository for InMemoryStore {
    async fn find(
        &self,
        conversation_id: Snowflake,
        user_id: Snowflake,
    ) -> RepoResult<Option<Membership>> {
        Ok(self
            .inner
            .read()
            .memberships
            .get(&(conversation_id.into_inner(), user_id.into_inner()))
            .cloned())
    }

    async fn find_by_conversation(
        &self,
        conversation_id: Snowflake,
    ) -> RepoResult<Vec<Membership>> {
        let inner = self.inner.read();
        let mut members: Vec<Membership> = inner
            .memberships
            .values()
            .filter(|m| m.conversation_id == conversation_id)
            .cloned()
            .collect();
        members.sort_by_key(|m| m.user_id);
        Ok(members)
    }

    async fn is_member(&self, conversation_id: Snowflake, user_id: Snowflake) -> RepoResult<bool> {
        Ok(self
            .inner
            .read()
            .memberships
            .contains_key(&(conversation_id.into_inner(), user_id.into_inner())))
    }

    async fn mark_read(&self, conversation_id: Snowflake, user_id: Snowflake) -> RepoResult<()> {
        let mut inner = self.inner.write();
        let membership = inner
            .memberships
            .get_mut(&(conversation_id.into_inner(), user_id.into_inner()))
            .ok_or(DomainError::NotAConversationMember)?;
        membership.mark_read(Utc::now());
        Ok(())
    }
}

#[async_trait]
impl MessageRepository for InMemoryStore {
    async fn find_by_id(&self, id: Snowflake) -> RepoResult<Option<Message>> {
        Ok(self.inner.read().messages.get(&id.into_inner()).cloned())
    }

    async fn create(&self, message: &Message) -> RepoResult<()> {
        let mut inner = self.inner.write();
        let conversation_id = message.conversation_id;
        let conversation = inner
            .conversations
            .get_mut(&conversation_id.into_inner())
            .ok_or(DomainError::ConversationNotFound(conversation_id))?;
        conversation.touch(message.created_at);

        for membership in inner.memberships.values_mut() {
            if membership.conversation_id == conversation_id
                && membership.user_id != message.sender_id
            {
                membership.record_incoming();
            }
        }

        inner
            .messages
            .insert(message.id.into_inner(), message.clone());
        Ok(())
    }

    async fn find_by_conversation(
        &self,
        conversation_id: Snowflake,
        page: PageRequest,
    ) -> RepoResult<Page<Message>> {
        let inner = self.inner.read();
        let mut items: Vec<Message> = inner
            .messages
            .values()
            .filter(|m| m.conversation_id == conversation_id)
            .cloned()
            .collect();
        items.sort_by(|a, b| (b.created_at, b.id).cmp(&(a.created_at, a.id)));

        let total = items.len() as i64;
        let paged: Vec<Message> = items
            .into_iter()
            .skip(page.offset() as usize)
            .take(page.limit() as usize)
            .collect();

        Ok(Page::new(paged, total, page))
    }

    async fn find_latest(&self, conversation_id: Snowflake) -> RepoResult<Option<Message>> {
        let inner = self.inner.read();
        let mut items: Vec<&Message> = inner
            .messages
            .values()
            .filter(|m| m.conversation_id == conversation_id && !m.is_deleted())
            .collect();
        items.sort_by(|a, b| (b.created_at, b.id).cmp(&(a.created_at, a.id)));
        Ok(items.first().map(|m| (*m).clone()))
    }

    async fn update_content(&self, message: &Message) -> RepoResult<()> {
        let mut inner = self.inner.write();
        match inner.messages.get_mut(&message.id.into_inner()) {
            Some(stored) if !stored.is_deleted() => {
                *stored = message.clone();
                Ok(())
            }
            _ => Err(DomainError::MessageNotFound(message.id)),
        }
    }

    async fn soft_delete(&self, id: Snowflake) -> RepoResult<()> {
        let mut inner = self.inner.write();
        match inner.messages.get_mut(&id.into_inner()) {
            Some(stored) if !stored.is_deleted() => {
                stored.delete().map_err(|_| DomainError::MessageNotFound(id))
            }
            _ => Err(DomainError::MessageNotFound(id)),
        }
    }
}

/// Conversation repository whose first direct-pair lookup misses.
///
/// Models the window where a rival creator commits between this caller's
/// lookup and its insert: the lookup sees nothing, the insert collides on
/// the pair key and hands back the winner.
pub struct StaleDirectLookup {
    store: Arc<InMemoryStore>,
    missed: Mutex<bool>,
}

impl StaleDirectLookup {
    pub fn new(store: Arc<InMemoryStore>) -> Self {
        Self {
            store,
            missed: Mutex::new(false),
        }
    }
}

#[async_trait]
impl ConversationRepository for StaleDirectLookup {
    async fn find_by_id(&self, id: Snowflake) -> RepoResult<Option<Conversation>> {
        ConversationRepository::find_by_id(&*self.store, id).await
    }

    async fn find_direct(
        &self,
        user_a: Snowflake,
        user_b: Snowflake,
    ) -> RepoResult<Option<Conversation>> {
        {
            let mut missed = self.missed.lock();
            if !*missed {
                *missed = true;
                return Ok(None);
            }
        }
        self.store.find_direct(user_a, user_b).await
    }

    async fn create_with_members(
        &self,
        conversation: &Conversation,
        member_ids: &[Snowflake],
    ) -> RepoResult<Conversation> {
        self.store.create_with_members(conversation, member_ids).await
    }

    async fn find_by_user(
        &self,
        user_id: Snowflake,
        page: PageRequest,
    ) -> RepoResult<Page<Conversation>> {
        self.store.find_by_user(user_id, page).await
    }

    async fn delete(&self, id: Snowflake) -> RepoResult<()> {
        ConversationRepository::delete(&*self.store, id).await
    }
}

/// Notifier that records every delivery instead of publishing
#[derive(Default)]
pub struct RecordingNotifier {
    events: Mutex<Vec<(Vec<Snowflake>, DomainEvent)>>,
}

#[async_trait]
impl Notifier for RecordingNotifier {
    async fn notify_users(&self, recipients: &[Snowflake], event: &DomainEvent) {
        self.events.lock().push((recipients.to_vec(), event.clone()));
    }
}

impl RecordingNotifier {
    pub fn events(&self) -> Vec<(Vec<Snowflake>, DomainEvent)> {
        self.events.lock().clone()
    }

    pub fn event_types(&self) -> Vec<&'static str> {
        self.events.lock().iter().map(|(_, e)| e.event_type()).collect()
    }
}

/// Build a service context over fresh in-memory fakes
pub fn test_context() -> (ServiceContext, Arc<RecordingNotifier>) {
    test_context_with(MessagingConfig::default())
}

/// Context whose first direct lookup misses, plus the raw store for seeding
/// the rival creator's row
pub fn stale_lookup_context() -> (ServiceContext, Arc<RecordingNotifier>, Arc<InMemoryStore>) {
    let store = Arc::new(InMemoryStore::default());
    let notifier = Arc::new(RecordingNotifier::default());

    let ctx = ServiceContextBuilder::new()
        .conversation_repo(Arc::new(StaleDirectLookup::new(store.clone())))
        .membership_repo(store.clone() as Arc<dyn MembershipRepository>)
        .message_repo(store.clone() as Arc<dyn MessageRepository>)
        .notifier(notifier.clone() as Arc<dyn Notifier>)
        .jwt_service(Arc::new(JwtService::new("test-secret-key", 900)))
        .snowflake_generator(Arc::new(SnowflakeGenerator::new(1)))
        .messaging(MessagingConfig::default())
        .build()
        .expect("context with all dependencies must build");

    (ctx, notifier, store)
}

pub fn test_context_with(messaging: MessagingConfig) -> (ServiceContext, Arc<RecordingNotifier>) {
    let store = Arc::new(InMemoryStore::default());
    let notifier = Arc::new(RecordingNotifier::default());

    let ctx = ServiceContextBuilder::new()
        .conversation_repo(store.clone() as Arc<dyn ConversationRepository>)
        .membership_repo(store.clone() as Arc<dyn MembershipRepository>)
        .message_repo(store as Arc<dyn MessageRepository>)
        .notifier(notifier.clone() as Arc<dyn Notifier>)
        .jwt_service(Arc::new(JwtService::new("test-secret-key", 900)))
        .snowflake_generator(Arc::new(SnowflakeGenerator::new(1)))
        .messaging(messaging)
        .build()
        .expect("context with all dependencies must build");

    (ctx, notifier)
}
