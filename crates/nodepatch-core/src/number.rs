use serde::{Deserialize, Serialize};
use serde_json::Number as JsonNumber;

use crate::ParseError;

/// A numeric node property, stored as an IEEE-754 double like the dashboard does.
#[derive(Clone, Copy, Debug, PartialOrd, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Number(f64);

impl Number {
    /// Creates a new [`Number`] after validating finiteness.
    ///
    /// ```
    /// # use nodepatch_core::Number;
    /// let num = Number::new(4096.0)?;
    /// assert_eq!(num.get(), 4096.0);
    /// assert!(Number::new(f64::NAN).is_err());
    /// # Ok::<(), nodepatch_core::ParseError>(())
    /// ```
    pub fn new(value: f64) -> Result<Self, ParseError> {
        if value.is_finite() {
            Ok(Self(value))
        } else {
            Err(ParseError::NotFinite { value })
        }
    }

    /// Returns the raw floating-point value.
    #[must_use]
    pub fn get(self) -> f64 {
        self.0
    }

    /// Converts the number into a `serde_json::Number`, preferring an integer form.
    ///
    /// ```
    /// # use nodepatch_core::Number;
    /// assert_eq!(Number::new(8.0)?.to_json_number().to_string(), "8");
    /// assert_eq!(Number::new(0.5)?.to_json_number().to_string(), "0.5");
    /// assert_eq!(Number::new(2f64.powi(63))?.to_json_number().to_string(), "9223372036854775808");
    /// # Ok::<(), nodepatch_core::ParseError>(())
    /// ```
    #[must_use]
    pub fn to_json_number(self) -> JsonNumber {
        if self.0.fract() == 0.0 && !(self.0 == 0.0 && self.0.is_sign_negative()) {
            // `i64::MAX as f64` and `u64::MAX as f64` round up to 2^63 and 2^64.
            if (i64::MIN as f64) <= self.0 && self.0 < (i64::MAX as f64) {
                return JsonNumber::from(self.0 as i64);
            }
            if self.0 >= 0.0 && self.0 < (u64::MAX as f64) {
                return JsonNumber::from(self.0 as u64);
            }
        }
        JsonNumber::from_f64(self.0).expect("finite number")
    }

    pub(crate) fn from_json_number(number: &JsonNumber) -> Self {
        // Without arbitrary_precision every serde_json number has an f64 view.
        Self(number.as_f64().unwrap_or_default())
    }
}

impl PartialEq for Number {
    fn eq(&self, other: &Self) -> bool {
        self.0 == other.0
    }
}

impl std::fmt::Display for Number {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.to_json_number())
    }
}
