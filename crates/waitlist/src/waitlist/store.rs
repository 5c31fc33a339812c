use super::domain::{EntryId, WaitlistEntry};
use super::ranking;

/// The in-process entry set, kept in join order.
#[derive(Debug, Clone, Default)]
pub struct EntrySet {
    entries: Vec<WaitlistEntry>,
}

impl EntrySet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn find_by_email(&self, email: &str) -> Option<&WaitlistEntry> {
        self.entries.iter().find(|entry| entry.email == email)
    }

    pub fn find_by_referral_code(&self, code: &str) -> Option<&WaitlistEntry> {
        self.entries
            .iter()
            .find(|entry| entry.referral_code.as_str() == code)
    }

    pub fn find_by_id(&self, id: &EntryId) -> Option<&WaitlistEntry> {
        self.entries.iter().find(|entry| &entry.id == id)
    }

    /// Append a new entry. Email and referral code must both be unused.
    pub fn insert(&mut self, entry: WaitlistEntry) -> Result<(), StoreError> {
        if self.find_by_email(&entry.email).is_some() {
            return Err(StoreError::DuplicateEmail(entry.email));
        }
        if self
            .find_by_referral_code(entry.referral_code.as_str())
            .is_some()
        {
            return Err(StoreError::DuplicateReferralCode(entry.referral_code.0));
        }

        self.entries.push(entry);
        Ok(())
    }

    /// Credit one referral to `referrer`. Returns the new count, or `None` if unknown.
    pub fn record_referral(&mut self, referrer: &EntryId) -> Option<u32> {
        let entry = self.entries.iter_mut().find(|entry| &entry.id == referrer)?;
        entry.referral_count += 1;
        Some(entry.referral_count)
    }

    /// Recompute every position from referral counts and join times.
    pub fn rerank(&mut self) {
        ranking::assign_positions(&mut self.entries);
    }

    /// Snapshot of all entries ordered by position.
    pub fn all(&self) -> Vec<WaitlistEntry> {
        let mut snapshot = self.entries.clone();
        snapshot.sort_by_key(|entry| entry.position);
        snapshot
    }

    pub fn reset(&mut self) {
        self.entries.clear();
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum StoreError {
    #[error("email {0} is already on the waitlist")]
    DuplicateEmail(String),
    #[error("referral code {0} is already assigned")]
    DuplicateReferralCode(String),
}
