use chrono::Utc;
use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;
use std::sync::atomic::{AtomicI64, Ordering};

/// Marker carried by ids that were generated locally and never confirmed by the server.
pub const TEMPORARY_ID_PREFIX: &str = "temp_";

static LAST_TEMPORARY_STAMP: AtomicI64 = AtomicI64::new(0);

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(transparent)]
pub struct QuoteId(String);

impl QuoteId {
    pub fn new(value: String) -> Result<Self, String> {
        Self::validate(&value)?;
        Ok(Self(value))
    }

    /// Id assigned by the remote store. Rejects values that look provisional.
    pub fn committed(value: String) -> Result<Self, String> {
        let id = Self::new(value)?;
        if id.is_temporary() {
            return Err(format!(
                "Committed quote ID cannot start with `{TEMPORARY_ID_PREFIX}`"
            ));
        }
        Ok(id)
    }

    /// Generates a provisional id from the wall clock in milliseconds.
    ///
    /// The stamp is forced to increase across calls within the process, so two
    /// quotes created in the same millisecond still receive distinct ids.
    pub fn temporary() -> Self {
        let now = Utc::now().timestamp_millis();
        let mut last = LAST_TEMPORARY_STAMP.load(Ordering::Relaxed);
        loop {
            let next = if now > last { now } else { last + 1 };
            match LAST_TEMPORARY_STAMP.compare_exchange_weak(
                last,
                next,
                Ordering::AcqRel,
                Ordering::Relaxed,
            ) {
                Ok(_) => return Self(format!("{TEMPORARY_ID_PREFIX}{next}")),
                Err(actual) => last = actual,
            }
        }
    }

    pub fn is_temporary(&self) -> bool {
        self.0.starts_with(TEMPORARY_ID_PREFIX)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    fn validate(value: &str) -> Result<(), String> {
        if value.trim().is_empty() {
            return Err("Quote ID cannot be empty".to_string());
        }
        Ok(())
    }
}

// The backend has served both numeric and text ids over time.
impl<'de> Deserialize<'de> for QuoteId {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum RawId {
            Text(String),
            Integer(i64),
        }

        let value = match RawId::deserialize(deserializer)? {
            RawId::Text(text) => text,
            RawId::Integer(number) => number.to_string(),
        };
        QuoteId::new(value).map_err(serde::de::Error::custom)
    }
}

impl fmt::Display for QuoteId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<QuoteId> for String {
    fn from(value: QuoteId) -> Self {
        value.0
    }
}
