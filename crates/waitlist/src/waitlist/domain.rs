use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use validator::Validate;

/// Identifier wrapper for waitlist entries.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct EntryId(pub String);

/// Code an entry shares so that later signups count toward its referrals.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ReferralCode(pub String);

impl ReferralCode {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for ReferralCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// One waitlist signup record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WaitlistEntry {
    pub id: EntryId,
    pub email: String,
    pub name: String,
    pub referral_code: ReferralCode,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub referred_by: Option<EntryId>,
    pub referral_count: u32,
    pub position: u32,
    pub joined_at: DateTime<Utc>,
}

/// Signup payload accepted by the join workflow.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct JoinRequest {
    #[validate(length(min = 1, max = 100, message = "Name must be 1-100 characters"))]
    pub name: String,
    #[validate(email(message = "Invalid email format"))]
    pub email: String,
    #[serde(default)]
    pub referral_code: Option<String>,
}

impl JoinRequest {
    pub fn new(name: impl Into<String>, email: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            email: email.into(),
            referral_code: None,
        }
    }

    pub fn with_referral_code(mut self, code: impl Into<String>) -> Self {
        self.referral_code = Some(code.into());
        self
    }

    /// Trim surrounding whitespace and drop a blank referral code.
    pub fn normalized(self) -> Self {
        let referral_code = self
            .referral_code
            .map(|code| code.trim().to_string())
            .filter(|code| !code.is_empty());

        Self {
            name: self.name.trim().to_string(),
            email: self.email.trim().to_string(),
            referral_code,
        }
    }
}

/// Queue summary for a single signup.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WaitlistStats {
    pub position: u32,
    pub referral_count: u32,
    pub referral_code: ReferralCode,
    pub total_entries: usize,
}
