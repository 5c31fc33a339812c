use std::sync::Arc;

use chrono::{DateTime, Utc};
use tracing::{debug, info, warn};
use validator::Validate;

use super::domain::{JoinRequest, ReferralCode, WaitlistEntry, WaitlistStats};
use super::identity::IdentityGenerator;
use super::repository::{RepositoryError, WaitlistRepository};
use super::store::{EntrySet, StoreError};
use crate::config::WaitlistConfig;

/// Attempts at drawing an unused referral code before giving up.
pub const MAX_CODE_ATTEMPTS: usize = 8;

/// Service composing the entry store, ranking, and identity generation.
pub struct WaitlistService<R, G> {
    repository: Arc<R>,
    identities: Arc<G>,
    config: WaitlistConfig,
}

impl<R, G> WaitlistService<R, G>
where
    R: WaitlistRepository + 'static,
    G: IdentityGenerator + 'static,
{
    pub fn new(repository: Arc<R>, identities: Arc<G>, config: WaitlistConfig) -> Self {
        Self {
            repository,
            identities,
            config,
        }
    }

    pub fn config(&self) -> &WaitlistConfig {
        &self.config
    }

    /// Join the waitlist now.
    pub fn join(&self, request: JoinRequest) -> Result<WaitlistEntry, WaitlistError> {
        self.join_at(request, Utc::now())
    }

    /// Join the waitlist with an explicit join timestamp.
    ///
    /// The whole join happens inside one repository write. An email already
    /// on the waitlist is rejected before field validation, and any rejected
    /// join leaves the store unchanged.
    pub fn join_at(
        &self,
        request: JoinRequest,
        joined_at: DateTime<Utc>,
    ) -> Result<WaitlistEntry, WaitlistError> {
        let request = request.normalized();

        let outcome = self
            .repository
            .write(|entries| self.apply_join(entries, request, joined_at));

        match outcome {
            Ok(result) => result,
            Err(err) => {
                warn!(error = %err, "waitlist join failed: repository unavailable");
                Err(err.into())
            }
        }
    }

    fn apply_join(
        &self,
        entries: &mut EntrySet,
        request: JoinRequest,
        joined_at: DateTime<Utc>,
    ) -> Result<WaitlistEntry, WaitlistError> {
        if entries.find_by_email(&request.email).is_some() {
            info!("waitlist join rejected: duplicate email");
            return Err(WaitlistError::DuplicateEmail);
        }
        request.validate()?;

        let JoinRequest {
            name,
            email,
            referral_code,
        } = request;

        let referrer = match referral_code.as_deref() {
            Some(code) => {
                let referrer = entries.find_by_referral_code(code).map(|e| e.id.clone());
                if referrer.is_none() {
                    debug!(referral_code = code, "referral code not found; ignoring");
                }
                referrer
            }
            None => None,
        };

        let referral_code = self.unused_referral_code(entries)?;
        let entry = WaitlistEntry {
            id: self.identities.generate_id(),
            email,
            name,
            referral_code,
            referred_by: referrer.clone(),
            referral_count: 0,
            position: entries.len() as u32 + 1,
            joined_at,
        };
        let id = entry.id.clone();

        entries.insert(entry)?;
        if let Some(referrer) = &referrer {
            entries.record_referral(referrer);
        }
        entries.rerank();

        let joined = entries
            .find_by_id(&id)
            .cloned()
            .ok_or_else(|| RepositoryError::Unavailable("inserted entry missing".to_string()))?;

        info!(
            entry_id = %joined.id.0,
            position = joined.position,
            referred = referrer.is_some(),
            total = entries.len(),
            "waitlist entry joined"
        );
        Ok(joined)
    }

    fn unused_referral_code(&self, entries: &EntrySet) -> Result<ReferralCode, WaitlistError> {
        for _ in 0..MAX_CODE_ATTEMPTS {
            let code = self.identities.generate_referral_code();
            if entries.find_by_referral_code(code.as_str()).is_none() {
                return Ok(code);
            }
        }

        Err(WaitlistError::IdentityExhausted {
            attempts: MAX_CODE_ATTEMPTS,
        })
    }

    /// Queue summary for `email`, or `None` when it never joined.
    pub fn stats(&self, email: &str) -> Result<Option<WaitlistStats>, WaitlistError> {
        let email = email.trim();
        let stats = self.repository.read(|entries| {
            entries.find_by_email(email).map(|entry| WaitlistStats {
                position: entry.position,
                referral_count: entry.referral_count,
                referral_code: entry.referral_code.clone(),
                total_entries: entries.len(),
            })
        })?;
        Ok(stats)
    }

    pub fn position(&self, email: &str) -> Result<Option<u32>, WaitlistError> {
        let email = email.trim();
        let position = self
            .repository
            .read(|entries| entries.find_by_email(email).map(|entry| entry.position))?;
        Ok(position)
    }

    /// All entries ordered by position.
    pub fn entries(&self) -> Result<Vec<WaitlistEntry>, WaitlistError> {
        Ok(self.repository.read(EntrySet::all)?)
    }

    pub fn reset(&self) -> Result<(), WaitlistError> {
        self.repository.write(EntrySet::reset)?;
        info!("waitlist reset");
        Ok(())
    }

    pub fn referral_link(&self, code: &ReferralCode) -> String {
        self.config.referral_link(code.as_str())
    }
}

/// Error raised by the waitlist service.
#[derive(Debug, thiserror::Error)]
pub enum WaitlistError {
    #[error("This email is already on the waitlist.")]
    DuplicateEmail,
    #[error("invalid submission: {0}")]
    Validation(#[from] validator::ValidationErrors),
    #[error("could not allocate an unused referral code after {attempts} attempts")]
    IdentityExhausted { attempts: usize },
    #[error(transparent)]
    Repository(#[from] RepositoryError),
}

impl From<StoreError> for WaitlistError {
    fn from(value: StoreError) -> Self {
        match value {
            StoreError::DuplicateEmail(_) => Self::DuplicateEmail,
            StoreError::DuplicateReferralCode(_) => Self::IdentityExhausted { attempts: 1 },
        }
    }
}
