//! Outbound messages to a single browser connection

use serde::{Deserialize, Serialize};

use crate::types::GroupLabel;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "event")]
pub enum ServerEvent {
    #[serde(rename = "GROUP_ASSIGNED")]
    GroupAssigned { group: GroupLabel },

    /// The final submission was not stored
    #[serde(rename = "SUBMISSION_REJECTED")]
    SubmissionRejected { reason: String },
}
