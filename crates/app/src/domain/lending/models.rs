//! Lend Submission Models

use std::str::FromStr;

use jiff::Timestamp;
use thiserror::Error;

use crate::{domain::users::models::UserUuid, uuids::TypedUuid};

/// Lend submission UUID
pub type SubmissionUuid = TypedUuid<LendSubmission>;

/// Review state of a lend submission.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SubmissionStatus {
    PendingReview,
    Approved,
    Rejected,
}

impl SubmissionStatus {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::PendingReview => "Pending Review",
            Self::Approved => "Approved",
            Self::Rejected => "Rejected",
        }
    }
}

#[derive(Debug, Error)]
#[error("unknown submission status")]
pub struct ParseSubmissionStatusError;

impl FromStr for SubmissionStatus {
    type Err = ParseSubmissionStatusError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value {
            "Pending Review" => Ok(Self::PendingReview),
            "Approved" => Ok(Self::Approved),
            "Rejected" => Ok(Self::Rejected),
            _ => Err(ParseSubmissionStatusError),
        }
    }
}

/// Declared physical condition of the offered copies.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Condition {
    New,
    #[default]
    Good,
    Acceptable,
}

impl Condition {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::New => "New",
            Self::Good => "Good",
            Self::Acceptable => "Acceptable",
        }
    }
}

#[derive(Debug, Error)]
#[error("unknown condition")]
pub struct ParseConditionError;

impl FromStr for Condition {
    type Err = ParseConditionError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value {
            "New" => Ok(Self::New),
            "Good" => Ok(Self::Good),
            "Acceptable" => Ok(Self::Acceptable),
            _ => Err(ParseConditionError),
        }
    }
}

/// Reviewer verdict on a pending submission.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReviewAction {
    Approve,
    Reject,
}

#[derive(Debug, Error)]
#[error("unknown review action")]
pub struct ParseReviewActionError;

impl FromStr for ReviewAction {
    type Err = ParseReviewActionError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value {
            "approve" => Ok(Self::Approve),
            "reject" => Ok(Self::Reject),
            _ => Err(ParseReviewActionError),
        }
    }
}

/// New Lend Submission Model
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewLendSubmission {
    pub uuid: SubmissionUuid,
    pub title: String,
    pub author: String,
    pub isbn: String,
    pub edition: Option<String>,
    pub condition: Condition,
    pub img_url: Option<String>,
    pub copies: u32,
}

/// Lend Submission Model
#[derive(Debug, Clone)]
pub struct LendSubmission {
    pub uuid: SubmissionUuid,
    pub lender_uuid: UserUuid,
    pub title: String,
    pub author: String,
    pub isbn: String,
    pub edition: Option<String>,
    pub condition: Condition,
    pub img_url: Option<String>,
    pub copies: u32,
    pub status: SubmissionStatus,
    pub reviewed_at: Option<Timestamp>,
    pub created_at: Timestamp,
}
