//! Data models for capability submissions

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Review status of a submission
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum SubmissionStatus {
    #[default]
    #[serde(alias = "pending", alias = "Pending")]
    Pending,
    #[serde(alias = "approved", alias = "Approved")]
    Approved,
    #[serde(alias = "rejected", alias = "Rejected")]
    Rejected,
}

impl SubmissionStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            SubmissionStatus::Pending => "PENDING",
            SubmissionStatus::Approved => "APPROVED",
            SubmissionStatus::Rejected => "REJECTED",
        }
    }

    /// Check if a reviewer has already decided
    pub fn is_decided(&self) -> bool {
        !matches!(self, SubmissionStatus::Pending)
    }
}

impl std::str::FromStr for SubmissionStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "PENDING" => Ok(SubmissionStatus::Pending),
            "APPROVED" => Ok(SubmissionStatus::Approved),
            "REJECTED" => Ok(SubmissionStatus::Rejected),
            _ => Err(format!("Invalid submission status: {}", s)),
        }
    }
}

impl std::fmt::Display for SubmissionStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Business data entered on the capability form
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CompanyProfile {
    pub company_name: Option<String>,
    pub credit_code: Option<String>,
    pub company_scale: Option<String>,
    pub company_type: Option<String>,
    pub company_address: Option<String>,
    pub business_intro: Option<String>,
    pub core_products: Vec<String>,
    pub intellectual_properties: Vec<String>,
    pub patents: Vec<String>,
    pub contact_name: Option<String>,
    pub contact_info: Option<String>,
}

/// A capability submission and its review outcome.
///
/// Serializes as one flat camelCase object. Deserializing goes through
/// [`StoredSubmission`], so legacy records are backfilled on the way in.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", from = "StoredSubmission")]
pub struct Submission {
    pub id: String,
    #[serde(flatten)]
    pub profile: CompanyProfile,
    pub submitted_by: Option<String>,
    pub submitted_by_username: Option<String>,
    pub status: SubmissionStatus,
    pub created_at: DateTime<Utc>,
    pub decision_at: Option<DateTime<Utc>>,
    pub decision_remark: Option<String>,
    pub decision_by: Option<String>,
    pub decision_by_name: Option<String>,
    /// Same text as `decision_remark`; older readers look here
    pub decision_reason: Option<String>,
}

impl Submission {
    /// Create a pending submission stamped with a fresh id and the current time
    pub fn new(
        profile: CompanyProfile,
        submitted_by: Option<String>,
        submitted_by_username: Option<String>,
    ) -> Self {
        Self {
            id: new_submission_id(),
            profile,
            submitted_by,
            submitted_by_username,
            status: SubmissionStatus::Pending,
            created_at: Utc::now(),
            decision_at: None,
            decision_remark: None,
            decision_by: None,
            decision_by_name: None,
            decision_reason: None,
        }
    }

    /// Record a reviewer decision, replacing any earlier one
    pub fn apply_decision(
        &mut self,
        status: SubmissionStatus,
        remark: Option<String>,
        decision_by: Option<String>,
        decision_by_name: Option<String>,
        decided_at: DateTime<Utc>,
    ) {
        self.status = status;
        self.decision_reason = remark.clone();
        self.decision_remark = remark;
        self.decision_by = decision_by;
        self.decision_by_name = decision_by_name;
        self.decision_at = Some(decided_at);
    }
}

pub(crate) fn new_submission_id() -> String {
    Uuid::new_v4().to_string()
}

/// On-disk form of a submission as older writers may have left it.
///
/// Every field is optional and unknown fields are ignored. Text and list
/// fields go through the same coercion as form payloads, so a number where a
/// string belongs is kept as its text instead of failing the whole file.
#[derive(Debug, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct StoredSubmission {
    #[serde(deserialize_with = "loose::text")]
    pub id: Option<String>,
    #[serde(deserialize_with = "loose::text")]
    pub company_name: Option<String>,
    #[serde(deserialize_with = "loose::text")]
    pub credit_code: Option<String>,
    #[serde(deserialize_with = "loose::text")]
    pub company_scale: Option<String>,
    #[serde(deserialize_with = "loose::text")]
    pub company_type: Option<String>,
    #[serde(deserialize_with = "loose::text")]
    pub company_address: Option<String>,
    #[serde(deserialize_with = "loose::text")]
    pub business_intro: Option<String>,
    #[serde(deserialize_with = "loose::list")]
    pub core_products: Vec<String>,
    #[serde(deserialize_with = "loose::list")]
    pub intellectual_properties: Vec<String>,
    #[serde(deserialize_with = "loose::list")]
    pub patents: Vec<String>,
    #[serde(deserialize_with = "loose::text")]
    pub contact_name: Option<String>,
    #[serde(deserialize_with = "loose::text")]
    pub contact_info: Option<String>,
    #[serde(deserialize_with = "loose::text")]
    pub submitted_by: Option<String>,
    #[serde(deserialize_with = "loose::text")]
    pub submitted_by_username: Option<String>,
    pub status: Option<SubmissionStatus>,
    #[serde(deserialize_with = "timestamp::deserialize")]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(deserialize_with = "timestamp::deserialize")]
    pub decision_at: Option<DateTime<Utc>>,
    #[serde(deserialize_with = "loose::text")]
    pub decision_remark: Option<String>,
    #[serde(deserialize_with = "loose::text")]
    pub decision_by: Option<String>,
    #[serde(deserialize_with = "loose::text")]
    pub decision_by_name: Option<String>,
    #[serde(deserialize_with = "loose::text")]
    pub decision_reason: Option<String>,
}

impl StoredSubmission {
    /// Fill in what older records lack: id, creation time and `decisionReason`
    pub fn into_submission(self, now: DateTime<Utc>) -> Submission {
        let decision_reason = self
            .decision_reason
            .or_else(|| self.decision_remark.clone());

        Submission {
            id: self
                .id
                .filter(|id| !id.is_empty())
                .unwrap_or_else(new_submission_id),
            profile: CompanyProfile {
                company_name: self.company_name,
                credit_code: self.credit_code,
                company_scale: self.company_scale,
                company_type: self.company_type,
                company_address: self.company_address,
                business_intro: self.business_intro,
                core_products: self.core_products,
                intellectual_properties: self.intellectual_properties,
                patents: self.patents,
                contact_name: self.contact_name,
                contact_info: self.contact_info,
            },
            submitted_by: self.submitted_by,
            submitted_by_username: self.submitted_by_username,
            status: self.status.unwrap_or_default(),
            created_at: self.created_at.unwrap_or(now),
            decision_at: self.decision_at,
            decision_remark: self.decision_remark,
            decision_by: self.decision_by,
            decision_by_name: self.decision_by_name,
            decision_reason,
        }
    }
}

impl From<StoredSubmission> for Submission {
    fn from(stored: StoredSubmission) -> Self {
        stored.into_submission(Utc::now())
    }
}

/// Submission counts per status
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StatusCounts {
    pub total: usize,
    pub pending: usize,
    pub approved: usize,
    pub rejected: usize,
}

impl StatusCounts {
    pub fn record(&mut self, status: SubmissionStatus) {
        self.total += 1;
        match status {
            SubmissionStatus::Pending => self.pending += 1,
            SubmissionStatus::Approved => self.approved += 1,
            SubmissionStatus::Rejected => self.rejected += 1,
        }
    }
}

impl FromIterator<SubmissionStatus> for StatusCounts {
    fn from_iter<I: IntoIterator<Item = SubmissionStatus>>(iter: I) -> Self {
        let mut counts = StatusCounts::default();
        for status in iter {
            counts.record(status);
        }
        counts
    }
}

/// Field readers that accept any JSON value and coerce it like a payload
mod loose {
    use serde::{Deserialize, Deserializer};
    use serde_json::Value;

    use crate::payload::{as_list, as_text};

    pub fn text<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
    where
        D: Deserializer<'de>,
    {
        let value = Option::<Value>::deserialize(deserializer)?;
        Ok(as_text(value.as_ref()))
    }

    pub fn list<'de, D>(deserializer: D) -> Result<Vec<String>, D::Error>
    where
        D: Deserializer<'de>,
    {
        let value = Option::<Value>::deserialize(deserializer)?;
        Ok(as_list(value.as_ref()))
    }
}

/// Timestamps are written as RFC 3339; older files may hold epoch seconds.
mod timestamp {
    use chrono::{DateTime, Utc};
    use serde::de::Error;
    use serde::{Deserialize, Deserializer};

    #[derive(Deserialize)]
    #[serde(untagged)]
    enum RawTimestamp {
        Text(String),
        Seconds(f64),
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Option<DateTime<Utc>>, D::Error>
    where
        D: Deserializer<'de>,
    {
        match Option::<RawTimestamp>::deserialize(deserializer)? {
            None => Ok(None),
            Some(RawTimestamp::Text(text)) => DateTime::parse_from_rfc3339(&text)
                .map(|dt| Some(dt.with_timezone(&Utc)))
                .map_err(D::Error::custom),
            Some(RawTimestamp::Seconds(secs)) => from_epoch_seconds(secs)
                .map(Some)
                .ok_or_else(|| D::Error::custom(format!("Timestamp out of range: {}", secs))),
        }
    }

    pub(super) fn from_epoch_seconds(secs: f64) -> Option<DateTime<Utc>> {
        if !secs.is_finite() {
            return None;
        }
        let whole = secs.floor();
        let nanos = ((secs - whole) * 1e9).round().min(999_999_999.0) as u32;
        DateTime::from_timestamp(whole as i64, nanos)
    }
}
