//! Inbound messages from the experiment UI

use serde_json::{Map, Value};

use super::{EVENT_FINAL_SUBMISSION, EVENT_REQUEST_GROUP, EVENT_REQUEST_GROUP_ASSIGNMENT};
use crate::errors::{SharedError, SharedResult};
use crate::types::ParticipantRecord;

/// A decoded inbound frame
#[derive(Debug, Clone, PartialEq)]
pub enum ClientEvent {
    /// Ask the balancer for a condition
    RequestGroup,

    /// End of session; `record` is the `data.all_data` object
    FinalSubmission { record: ParticipantRecord },

    /// Any other event name. Phase markers, task timestamps and so on.
    Telemetry { event: String, payload: Option<Value> },
}

impl ClientEvent {
    /// Decode a text frame.
    ///
    /// Fails when the frame is not a JSON object, has no string `event`, or
    /// is a final submission whose `data` / `data.all_data` is not an object.
    /// A submission with no `all_data` at all decodes to an empty record so
    /// the recorder can reject it for the missing identifier.
    pub fn decode(text: &str) -> SharedResult<Self> {
        let value: Value = serde_json::from_str(text).map_err(|e| SharedError::malformed(format!("invalid JSON: {e}")))?;

        let Value::Object(mut fields) = value else {
            return Err(SharedError::malformed("expected a JSON object"));
        };

        let event = match fields.remove("event") {
            Some(Value::String(event)) => event,
            Some(_) => return Err(SharedError::malformed("`event` must be a string")),
            None => return Err(SharedError::malformed("missing `event` field")),
        };

        match event.as_str() {
            EVENT_REQUEST_GROUP | EVENT_REQUEST_GROUP_ASSIGNMENT => Ok(Self::RequestGroup),
            EVENT_FINAL_SUBMISSION => Self::decode_submission(fields),
            _ => {
                let payload = if fields.is_empty() { None } else { Some(Value::Object(fields)) };
                Ok(Self::Telemetry { event, payload })
            }
        }
    }

    fn decode_submission(mut fields: Map<String, Value>) -> SharedResult<Self> {
        let Some(Value::Object(mut data)) = fields.remove("data") else {
            return Err(SharedError::malformed("final submission without a `data` object"));
        };

        let record = match data.remove("all_data") {
            Some(Value::Object(all_data)) => ParticipantRecord::from_map(all_data),
            None | Some(Value::Null) => ParticipantRecord::new(),
            Some(_) => return Err(SharedError::malformed("`data.all_data` must be an object")),
        };

        Ok(Self::FinalSubmission { record })
    }

    /// Event name for logging
    pub fn name(&self) -> &str {
        match self {
            Self::RequestGroup => EVENT_REQUEST_GROUP,
            Self::FinalSubmission { .. } => EVENT_FINAL_SUBMISSION,
            Self::Telemetry { event, .. } => event,
        }
    }
}
