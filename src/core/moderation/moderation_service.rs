// Link guard service - core business logic for link moderation.
//
// This service handles:
// - Classifying inbound messages (via LinkDetector)
// - Counting violations per (chat, user)
// - Escalation (warn -> mute -> ban)
// - The reprieve check that runs after a mute expires
//
// NO Discord dependencies here - just pure domain logic.

use super::link_detector::LinkDetector;
use super::moderation_models::{
    Classification, EnforcementAction, EnforcementThresholds, InboundMessage, ModerationConfig,
    ModerationOutcome, ReprieveOutcome, ViolationKey, MAX_MUTE_DURATION_SECS,
};
use super::reprieve_scheduler::ReprieveScheduler;
use async_trait::async_trait;
use std::cmp::Ordering;
use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;

// ============================================================================
// ERRORS
// ============================================================================

#[derive(Debug, Error)]
pub enum ModerationError {
    #[error("Platform action failed: {0}")]
    ActionFailed(String),

    #[allow(dead_code)]
    #[error("Storage error: {0}")]
    StorageError(String),

    #[error("Configuration error: {0}")]
    ConfigError(String),
}

// ============================================================================
// PORTS
// ============================================================================

/// Trait for the violation counters.
///
/// A key with no entry has zero violations. Implementations must never keep
/// an entry with a count of zero.
#[async_trait]
pub trait ViolationStore: Send + Sync + 'static {
    /// Atomically add one violation and return the new count.
    async fn increment(&self, key: ViolationKey) -> Result<u32, ModerationError>;

    /// Current count, `None` when there is no record.
    async fn get(&self, key: ViolationKey) -> Result<Option<u32>, ModerationError>;

    /// Atomically remove the record, returning the count it held.
    async fn remove(&self, key: ViolationKey) -> Result<Option<u32>, ModerationError>;
}

/// Outbound platform actions the core asks the adapter to perform.
#[async_trait]
pub trait ModerationActions: Send + Sync + 'static {
    async fn send_message(&self, channel_id: u64, text: &str) -> Result<(), ModerationError>;

    async fn mute(
        &self,
        chat_id: u64,
        user_id: u64,
        duration: Duration,
    ) -> Result<(), ModerationError>;

    async fn ban(&self, chat_id: u64, user_id: u64) -> Result<(), ModerationError>;
}

// ============================================================================
// CORE SERVICE
// ============================================================================

struct ServiceInner<S, A> {
    store: S,
    actions: A,
    detector: LinkDetector,
    thresholds: EnforcementThresholds,
    reprieves: Arc<ReprieveScheduler>,
}

/// Link moderation service. Cheap to clone; clones share all state.
pub struct LinkGuardService<S: ViolationStore, A: ModerationActions> {
    inner: Arc<ServiceInner<S, A>>,
}

impl<S: ViolationStore, A: ModerationActions> Clone for LinkGuardService<S, A> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

/// `@name` when the platform gave us one, otherwise the numeric ID.
pub fn display_name(username: Option<&str>, user_id: u64) -> String {
    match username.map(str::trim) {
        Some(name) if !name.is_empty() => format!("@{}", name),
        _ => user_id.to_string(),
    }
}

/// Human-readable mute length: whole minutes when it divides evenly.
pub fn format_duration(duration: Duration) -> String {
    let secs = duration.as_secs();
    if secs >= 60 && secs % 60 == 0 {
        let minutes = secs / 60;
        format!("{} minute{}", minutes, if minutes == 1 { "" } else { "s" })
    } else {
        format!("{} second{}", secs, if secs == 1 { "" } else { "s" })
    }
}

impl<S: ViolationStore, A: ModerationActions> LinkGuardService<S, A> {
    /// Create a new service with the given store and platform actions.
    pub fn new(store: S, actions: A, config: ModerationConfig) -> Result<Self, ModerationError> {
        if config.thresholds.warn_limit == 0 {
            return Err(ModerationError::ConfigError(
                "warn_limit must be at least 1".to_string(),
            ));
        }
        if config.thresholds.mute_duration_secs == 0
            || config.thresholds.mute_duration_secs > MAX_MUTE_DURATION_SECS
        {
            return Err(ModerationError::ConfigError(format!(
                "mute duration must be between 1 and {} seconds",
                MAX_MUTE_DURATION_SECS
            )));
        }

        let detector = LinkDetector::new(config.admin_ids)?;

        Ok(Self {
            inner: Arc::new(ServiceInner {
                store,
                actions,
                detector,
                thresholds: config.thresholds,
                reprieves: Arc::new(ReprieveScheduler::new()),
            }),
        })
    }

    pub fn thresholds(&self) -> EnforcementThresholds {
        self.inner.thresholds
    }

    pub fn is_admin(&self, user_id: u64) -> bool {
        self.inner.detector.is_admin(user_id)
    }

    /// Number of reprieve checks waiting to fire.
    pub fn pending_reprieves(&self) -> usize {
        self.inner.reprieves.pending()
    }

    pub fn has_pending_reprieve(&self, key: ViolationKey) -> bool {
        self.inner.reprieves.is_pending(&key)
    }

    /// Entry point for every inbound message.
    pub async fn on_message(
        &self,
        message: &InboundMessage,
    ) -> Result<ModerationOutcome, ModerationError> {
        let classification = self.inner.detector.classify(
            message.text.as_deref(),
            message.user_id,
            message.chat_kind,
        );

        if classification != Classification::Violation {
            tracing::debug!(
                chat_id = message.chat_id,
                user_id = message.user_id,
                ?classification,
                "Message passed link guard"
            );
            return Ok(ModerationOutcome::passed(classification));
        }

        let action = self
            .record_violation(
                message.key(),
                message.channel_id,
                message.username.as_deref(),
            )
            .await?;

        Ok(ModerationOutcome {
            classification,
            action: Some(action),
        })
    }

    /// Count one violation and enforce whatever the new count calls for.
    ///
    /// Platform failures are logged and do not roll back the count.
    pub async fn record_violation(
        &self,
        key: ViolationKey,
        channel_id: u64,
        username: Option<&str>,
    ) -> Result<EnforcementAction, ModerationError> {
        let warn_count = self.inner.store.increment(key).await?;
        let limit = self.inner.thresholds.warn_limit;
        let who = display_name(username, key.user_id);

        match warn_count.cmp(&limit) {
            Ordering::Less => {
                let remaining = limit - warn_count;
                tracing::info!(
                    chat_id = key.chat_id,
                    user_id = key.user_id,
                    warn_count,
                    remaining,
                    "Link violation, warning issued"
                );

                let text = format!(
                    "⚠️ {}, links are not allowed here. Warning {}/{}: {} remaining before a mute.",
                    who, warn_count, limit, remaining
                );
                self.notify(channel_id, &text).await;

                Ok(EnforcementAction::Warn {
                    warn_count,
                    remaining,
                })
            }
            Ordering::Equal => {
                let duration = self.inner.thresholds.mute_duration();
                tracing::info!(
                    chat_id = key.chat_id,
                    user_id = key.user_id,
                    warn_count,
                    mute_secs = duration.as_secs(),
                    "Link violation limit reached, muting"
                );

                let text = format!(
                    "⚠️ {}, links are not allowed here. Warning {}/{}: 0 remaining. Muted for {}.",
                    who,
                    warn_count,
                    limit,
                    format_duration(duration)
                );
                self.notify(channel_id, &text).await;

                if let Err(e) = self.inner.actions.mute(key.chat_id, key.user_id, duration).await {
                    tracing::error!(
                        chat_id = key.chat_id,
                        user_id = key.user_id,
                        "Failed to mute user: {}",
                        e
                    );
                }

                self.schedule_reprieve(key, channel_id);

                Ok(EnforcementAction::Mute {
                    warn_count,
                    duration,
                })
            }
            Ordering::Greater => {
                // Whoever takes the record bans; a racing reprieve check may have beaten us.
                let taken = self.inner.store.remove(key).await?;
                self.inner.reprieves.cancel(&key);

                if taken.is_none() {
                    tracing::debug!(
                        chat_id = key.chat_id,
                        user_id = key.user_id,
                        warn_count,
                        "Record already taken by another check, not banning again"
                    );
                    return Ok(EnforcementAction::Ban { warn_count });
                }

                tracing::info!(
                    chat_id = key.chat_id,
                    user_id = key.user_id,
                    warn_count,
                    "Link violation past limit, banning"
                );
                self.ban_and_announce(key, channel_id, &who).await;

                Ok(EnforcementAction::Ban { warn_count })
            }
        }
    }

    /// Decide what happens once a mute has run its course.
    ///
    /// Bans if the count went past the limit in the meantime, otherwise wipes
    /// the slate. A missing record is a no-op.
    pub async fn reprieve_check(
        &self,
        key: ViolationKey,
        channel_id: u64,
    ) -> Result<ReprieveOutcome, ModerationError> {
        let Some(warn_count) = self.inner.store.remove(key).await? else {
            tracing::debug!(
                chat_id = key.chat_id,
                user_id = key.user_id,
                "Reprieve check found no record"
            );
            return Ok(ReprieveOutcome::NoRecord);
        };

        if warn_count > self.inner.thresholds.warn_limit {
            tracing::info!(
                chat_id = key.chat_id,
                user_id = key.user_id,
                warn_count,
                "Violation during mute, banning"
            );
            let who = display_name(None, key.user_id);
            self.ban_and_announce(key, channel_id, &who).await;
            Ok(ReprieveOutcome::Banned)
        } else {
            tracing::info!(
                chat_id = key.chat_id,
                user_id = key.user_id,
                "Mute expired quietly, warnings cleared"
            );
            Ok(ReprieveOutcome::Cleared)
        }
    }

    /// Current violation count (0 when there is no record).
    pub async fn warn_count(&self, key: ViolationKey) -> Result<u32, ModerationError> {
        Ok(self.inner.store.get(key).await?.unwrap_or(0))
    }

    /// Admin action: drop the record and any pending reprieve check.
    ///
    /// Returns `true` if there was anything to clear.
    pub async fn pardon(&self, key: ViolationKey) -> Result<bool, ModerationError> {
        let had_record = self.inner.store.remove(key).await?.is_some();
        let had_job = self.inner.reprieves.cancel(&key);
        if had_record || had_job {
            tracing::info!(
                chat_id = key.chat_id,
                user_id = key.user_id,
                "Violation record pardoned"
            );
        }
        Ok(had_record || had_job)
    }

    fn schedule_reprieve(&self, key: ViolationKey, channel_id: u64) {
        let service = self.clone();
        let delay = self.inner.thresholds.reprieve_delay();

        self.inner.reprieves.schedule(key, delay, async move {
            if let Err(e) = service.reprieve_check(key, channel_id).await {
                tracing::error!(
                    chat_id = key.chat_id,
                    user_id = key.user_id,
                    "Reprieve check failed: {}",
                    e
                );
            }
        });
    }

    async fn ban_and_announce(&self, key: ViolationKey, channel_id: u64, who: &str) {
        match self.inner.actions.ban(key.chat_id, key.user_id).await {
            Ok(()) => {
                let text = format!("🚫 {} has been banned for posting links.", who);
                self.notify(channel_id, &text).await;
            }
            Err(e) => tracing::error!(
                chat_id = key.chat_id,
                user_id = key.user_id,
                "Failed to ban user: {}",
                e
            ),
        }
    }

    async fn notify(&self, channel_id: u64, text: &str) {
        if let Err(e) = self.inner.actions.send_message(channel_id, text).await {
            tracing::warn!(channel_id, "Failed to send moderation notice: {}", e);
        }
    }
}

// ============================================================================
// TESTS
// ============================================================================
