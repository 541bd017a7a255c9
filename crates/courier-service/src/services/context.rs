//! Service context - dependency container for services
//!
//! Holds the repositories, notifier, and other dependencies needed by services.

use std::sync::Arc;

use courier_common::{JwtService, MessagingConfig};
use courier_core::traits::{
    ConversationRepository, MembershipRepository, MessageRepository, Notifier,
};
use courier_core::{Snowflake, SnowflakeGenerator};

/// Service context containing all dependencies
///
/// This is the main dependency container that gets passed to all services.
/// It provides access to:
/// - Persistence repositories
/// - The notifier for push events
/// - JWT service for token verification
/// - Snowflake generator for ID generation
/// - Messaging limits (page sizes, content length, preview length)
#[derive(Clone)]
pub struct ServiceContext {
    // Repositories
    conversation_repo: Arc<dyn ConversationRepository>,
    membership_repo: Arc<dyn MembershipRepository>,
    message_repo: Arc<dyn MessageRepository>,

    // Push events
    notifier: Arc<dyn Notifier>,

    // Services
    jwt_service: Arc<JwtService>,
    snowflake_generator: Arc<SnowflakeGenerator>,

    // Limits
    messaging: MessagingConfig,
}

impl ServiceContext {
    /// Create a new service context with all dependencies
    pub fn new(
        conversation_repo: Arc<dyn ConversationRepository>,
        membership_repo: Arc<dyn MembershipRepository>,
        message_repo: Arc<dyn MessageRepository>,
        notifier: Arc<dyn Notifier>,
        jwt_service: Arc<JwtService>,
        snowflake_generator: Arc<SnowflakeGenerator>,
        messaging: MessagingConfig,
    ) -> Self {
        Self {
            conversation_repo,
            membership_repo,
            message_repo,
            notifier,
            jwt_service,
            snowflake_generator,
            messaging,
        }
    }

    // === Repositories ===

    /// Get the conversation repository
    pub fn conversation_repo(&self) -> &dyn ConversationRepository {
        self.conversation_repo.as_ref()
    }

    /// Get the membership repository
    pub fn membership_repo(&self) -> &dyn MembershipRepository {
        self.membership_repo.as_ref()
    }

    /// Get the message repository
    pub fn message_repo(&self) -> &dyn MessageRepository {
        self.message_repo.as_ref()
    }

    // === Push Events ===

    /// Get the notifier
    pub fn notifier(&self) -> &dyn Notifier {
        self.notifier.as_ref()
    }

    // === Services ===

    /// Get the JWT service
    pub fn jwt_service(&self) -> &JwtService {
        self.jwt_service.as_ref()
    }

    /// Get the snowflake ID generator
    pub fn snowflake_generator(&self) -> &SnowflakeGenerator {
        self.snowflake_generator.as_ref()
    }

    /// Generate a new Snowflake ID
    pub fn generate_id(&self) -> Snowflake {
        self.snowflake_generator.generate()
    }

    // === Limits ===

    /// Get the messaging limits
    pub fn messaging(&self) -> &MessagingConfig {
        &self.messaging
    }
}

impl std::fmt::Debug for ServiceContext {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ServiceContext")
            .field("repositories", &"...")
            .field("notifier", &"...")
            .field("messaging", &self.messaging)
            .finish()
    }
}

/// Builder for creating a `ServiceContext` with custom configuration
pub struct ServiceContextBuilder {
    conversation_repo: Option<Arc<dyn ConversationRepository>>,
    membership_repo: Option<Arc<dyn MembershipRepository>>,
    message_repo: Option<Arc<dyn MessageRepository>>,
    notifier: Option<Arc<dyn Notifier>>,
    jwt_service: Option<Arc<JwtService>>,
    snowflake_generator: Option<Arc<SnowflakeGenerator>>,
    messaging: Option<MessagingConfig>,
}

impl ServiceContextBuilder {
    pub fn new() -> Self {
        Self {
            conversation_repo: None,
            membership_repo: None,
            message_repo: None,
            notifier: None,
            jwt_service: None,
            snowflake_generator: None,
            messaging: None,
        }
    }

    pub fn conversation_repo(mut self, repo: Arc<dyn ConversationRepository>) -> Self {
        self.conversation_repo = Some(repo);
        self
    }

    pub fn membership_repo(mut self, repo: Arc<dyn MembershipRepository>) -> Self {
        self.membership_repo = Some(repo);
        self
    }

    pub fn message_repo(mut self, repo: Arc<dyn MessageRepository>) -> Self {
        self.message_repo = Some(repo);
        self
    }

    pub fn notifier(mut self, notifier: Arc<dyn Notifier>) -> Self {
        self.notifier = Some(notifier);
        self
    }

    pub fn jwt_service(mut self, service: Arc<JwtService>) -> Self {
        self.jwt_service = Some(service);
        self
    }

    pub fn snowflake_generator(mut self, generator: Arc<SnowflakeGenerator>) -> Self {
        self.snowflake_generator = Some(generator);
        self
    }

    pub fn messaging(mut self, messaging: MessagingConfig) -> Self {
        self.messaging = Some(messaging);
        self
    }

    /// Build the `ServiceContext`
    ///
    /// # Errors
    /// Returns `ServiceError::Validation` if any required dependency is missing.
    /// The messaging limits fall back to their defaults when unset.
    pub fn build(self) -> super::error::ServiceResult<ServiceContext> {
        Ok(ServiceContext::new(
            self.conversation_repo
                .ok_or_else(|| super::error::ServiceError::validation("conversation_repo is required"))?,
            self.membership_repo
                .ok_or_else(|| super::error::ServiceError::validation("membership_repo is required"))?,
            self.message_repo
                .ok_or_else(|| super::error::ServiceError::validation("message_repo is required"))?,
            self.notifier
                .ok_or_else(|| super::error::ServiceError::validation("notifier is required"))?,
            self.jwt_service
                .ok_or_else(|| super::error::ServiceError::validation("jwt_service is required"))?,
            self.snowflake_generator
                .ok_or_else(|| super::error::ServiceError::validation("snowflake_generator is required"))?,
            self.messaging.unwrap_or_default(),
        ))
    }
}

impl Default for ServiceContextBuilder {
    fn default() -> Self {
        Self::new()
    }
}
