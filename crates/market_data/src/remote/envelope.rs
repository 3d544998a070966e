use serde::Deserialize;
use serde_json::Value;

/// The code every successful response carries.
pub const SUCCESS_CODE: &str = "0";

/// Outer object wrapping every API response.
#[derive(Deserialize, Debug)]
pub struct Envelope {
    #[serde(default)]
    pub code: Value,
    #[serde(default)]
    pub msg: Option<String>,
    #[serde(default)]
    pub data: Value,
}

#[derive(Debug, PartialEq)]
pub enum EnvelopeOutcome {
    Success(Vec<Value>),
    Rejected { code: String, message: String },
    UnexpectedPayload(String),
}

impl Envelope {
    pub fn parse(body: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(body)
    }

    /// Codes arrive as strings, occasionally as bare numbers.
    pub fn code(&self) -> String {
        match &self.code {
            Value::String(s) => s.clone(),
            Value::Null => String::new(),
            other => other.to_string(),
        }
    }

    pub fn into_outcome(self) -> EnvelopeOutcome {
        let code = self.code();
        if code != SUCCESS_CODE {
            return EnvelopeOutcome::Rejected {
                code,
                message: self.msg.unwrap_or_default(),
            };
        }

        match self.data {
            Value::Null => EnvelopeOutcome::Success(Vec::new()),
            Value::Array(records) => EnvelopeOutcome::Success(records),
            record @ Value::Object(_) => EnvelopeOutcome::Success(vec![record]),
            other => EnvelopeOutcome::UnexpectedPayload(format!("data is not a list: {other}")),
        }
    }
}
