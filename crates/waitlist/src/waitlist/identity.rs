use std::sync::atomic::{AtomicU64, Ordering};

use rand::Rng;
use uuid::Uuid;

use super::domain::{EntryId, ReferralCode};

/// Source of entry ids and referral codes, injectable so tests can pin them.
pub trait IdentityGenerator: Send + Sync {
    fn generate_id(&self) -> EntryId;
    fn generate_referral_code(&self) -> ReferralCode;
}

const CODE_CHARSET: &[u8] = b"ABCDEFGHIJKLMNOPQRSTUVWXYZabcdefghijklmnopqrstuvwxyz0123456789";

/// UUID v4 ids and random alphanumeric referral codes.
#[derive(Debug, Clone)]
pub struct RandomIdentityGenerator {
    code_length: usize,
}

impl RandomIdentityGenerator {
    pub fn new(code_length: usize) -> Self {
        Self {
            code_length: code_length.max(1),
        }
    }
}

impl Default for RandomIdentityGenerator {
    fn default() -> Self {
        Self::new(8)
    }
}

impl IdentityGenerator for RandomIdentityGenerator {
    fn generate_id(&self) -> EntryId {
        EntryId(Uuid::new_v4().to_string())
    }

    fn generate_referral_code(&self) -> ReferralCode {
        let mut rng = rand::thread_rng();
        let code = (0..self.code_length)
            .map(|_| {
                let idx = rng.gen_range(0..CODE_CHARSET.len());
                CODE_CHARSET[idx] as char
            })
            .collect();
        ReferralCode(code)
    }
}

/// Predictable `entry-000001` / `REF00001` identities for tests, demos, and replays.
#[derive(Debug)]
pub struct SequentialIdentityGenerator {
    next_id: AtomicU64,
    next_code: AtomicU64,
}

impl Default for SequentialIdentityGenerator {
    fn default() -> Self {
        Self {
            next_id: AtomicU64::new(1),
            next_code: AtomicU64::new(1),
        }
    }
}

impl IdentityGenerator for SequentialIdentityGenerator {
    fn generate_id(&self) -> EntryId {
        let id = self.next_id.fetch_add(1, Ordering::Relaxed);
        EntryId(format!("entry-{id:06}"))
    }

    fn generate_referral_code(&self) -> ReferralCode {
        let code = self.next_code.fetch_add(1, Ordering::Relaxed);
        ReferralCode(format!("REF{code:05}"))
    }
}
