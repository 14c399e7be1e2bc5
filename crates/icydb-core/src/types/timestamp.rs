use crate::{
    traits::{
        AsView, Atomic, EntityKeyBytes, FieldValue, FieldValueKind, NumCast, NumFromPrimitive,
        NumToPrimitive, SanitizeAuto, SanitizeCustom, ValidateAuto, ValidateCustom, Visitable,
    },
    types::Duration,
    value::Value,
};
use candid::CandidType;
use canic_cdk::utils::time::now_secs;
use chrono::DateTime;
use derive_more::{Add, AddAssign, Display, FromStr, Sub, SubAssign};
use serde::{Deserialize, Serialize};

///
/// Timestamp
/// (in seconds)
///

#[derive(
    Add,
    AddAssign,
    CandidType,
    Clone,
    Copy,
    Debug,
    Default,
    Display,
    Eq,
    FromStr,
    PartialEq,
    Hash,
    Ord,
    PartialOrd,
    Serialize,
    Deserialize,
    Sub,
    SubAssign,
)]
#[repr(transparent)]
pub struct Timestamp(u64);

impl Timestamp {
    pub const EPOCH: Self = Self(u64::MIN);
    pub const MIN: Self = Self(u64::MIN);
    pub const MAX: Self = Self(u64::MAX);

    /// Construct from seconds.
    #[must_use]
    pub const fn from_seconds(secs: u64) -> Self {
        Self(secs)
    }

    /// Construct from milliseconds (truncate to seconds).
    #[must_use]
    pub const fn from_millis(ms: u64) -> Self {
        Self(ms / 1_000)
    }

    /// Construct from microseconds (truncate to seconds).
    #[must_use]
    pub const fn from_micros(us: u64) -> Self {
        Self(us / 1_000_000)
    }

    /// Construct from nanoseconds (truncate to seconds).
    #[must_use]
    pub const fn from_nanos(ns: u64) -> Self {
        Self(ns / 1_000_000_000)
    }

    #[allow(clippy::cast_sign_loss)]
    pub fn parse_rfc3339(s: &str) -> Result<Self, String> {
        let dt =
            DateTime::parse_from_rfc3339(s).map_err(|e| format!("timestamp parse error: {e}"))?;
        let ts = dt.timestamp();
        if ts < 0 {
            return Err("timestamp before epoch".to_string());
        }

        Ok(Self(ts as u64))
    }

    pub fn parse_flexible(s: &str) -> Result<Self, String> {
        // Try integer seconds
        if let Ok(n) = s.parse::<u64>() {
            return Ok(Self(n));
        }

        // Try RFC3339
        Self::parse_rfc3339(s)
    }

    #[must_use]
    /// Current wall-clock timestamp in seconds.
    pub fn now() -> Self {
        Self(now_secs())
    }

    #[must_use]
    pub const fn get(self) -> u64 {
        self.0
    }
}

impl AsView for Timestamp {
    type ViewType = u64;

    fn as_view(&self) -> Self::ViewType {
        self.0
    }

    fn from_view(view: Self::ViewType) -> Self {
        Self(view)
    }
}

impl Atomic for Timestamp {}

impl EntityKeyBytes for Timestamp {
    const BYTE_LEN: usize = ::core::mem::size_of::<u64>();

    fn write_bytes(&self, out: &mut [u8]) {
        assert_eq!(out.len(), Self::BYTE_LEN);
        out.copy_from_slice(&self.get().to_be_bytes());
    }
}

impl FieldValue for Timestamp {
    fn kind() -> FieldValueKind {
        FieldValueKind::Atomic
    }

    fn to_value(&self) -> Value {
        Value::Timestamp(*self)
    }

    fn from_value(value: &Value) -> Option<Self> {
        match value {
            Value::Timestamp(v) => Some(*v),
            _ => None,
        }
    }
}

impl From<u64> for Timestamp {
    fn from(u: u64) -> Self {
        Self(u)
    }
}

impl PartialEq<u64> for Timestamp {
    fn eq(&self, other: &u64) -> bool {
        self.0 == *other
    }
}

impl PartialOrd<u64> for Timestamp {
    fn partial_cmp(&self, other: &u64) -> Option<std::cmp::Ordering> {
        self.0.partial_cmp(other)
    }
}

impl PartialEq<i64> for Timestamp {
    fn eq(&self, other: &i64) -> bool {
        if *other < 0 {
            false
        } else {
            self.0 == other.unsigned_abs()
        }
    }
}

impl PartialOrd<i64> for Timestamp {
    fn partial_cmp(&self, other: &i64) -> Option<std::cmp::Ordering> {
        if *other < 0 {
            Some(std::cmp::Ordering::Greater)
        } else {
            self.0.partial_cmp(&other.unsigned_abs())
        }
    }
}

impl PartialEq<Timestamp> for u64 {
    fn eq(&self, other: &Timestamp) -> bool {
        *self == other.0
    }
}

impl PartialOrd<Timestamp> for u64 {
    fn partial_cmp(&self, other: &Timestamp) -> Option<std::cmp::Ordering> {
        self.partial_cmp(&other.0)
    }
}

impl PartialEq<Timestamp> for i64 {
    fn eq(&self, other: &Timestamp) -> bool {
        if *self < 0 {
            false
        } else {
            self.unsigned_abs() == other.0
        }
    }
}

impl PartialOrd<Timestamp> for i64 {
    fn partial_cmp(&self, other: &Timestamp) -> Option<std::cmp::Ordering> {
        if *self < 0 {
            Some(std::cmp::Ordering::Less)
        } else {
            self.unsigned_abs().partial_cmp(&other.0)
        }
    }
}

impl std::ops::Sub<Timestamp> for u64 {
    type Output = Self;

    fn sub(self, rhs: Timestamp) -> Self::Output {
        self.saturating_sub(rhs.0)
    }
}

impl std::ops::Sub<Timestamp> for i64 {
    type Output = Self;

    fn sub(self, rhs: Timestamp) -> Self::Output {
        self.saturating_sub(Self::try_from(rhs.0).unwrap_or(Self::MAX))
    }
}

impl std::ops::Add<u64> for Timestamp {
    type Output = Self;

    fn add(self, rhs: u64) -> Self::Output {
        Self(self.0.saturating_add(rhs))
    }
}

impl std::ops::AddAssign<u64> for Timestamp {
    fn add_assign(&mut self, rhs: u64) {
        self.0 = self.0.saturating_add(rhs);
    }
}

impl std::ops::Add<i64> for Timestamp {
    type Output = Self;

    fn add(self, rhs: i64) -> Self::Output {
        if rhs >= 0 {
            Self(self.0.saturating_add(rhs.unsigned_abs()))
        } else {
            Self(self.0.saturating_sub(rhs.unsigned_abs()))
        }
    }
}

impl std::ops::AddAssign<i64> for Timestamp {
    fn add_assign(&mut self, rhs: i64) {
        if rhs >= 0 {
            self.0 = self.0.saturating_add(rhs.unsigned_abs());
        } else {
            self.0 = self.0.saturating_sub(rhs.unsigned_abs());
        }
    }
}

impl std::ops::Sub<u64> for Timestamp {
    type Output = Self;

    fn sub(self, rhs: u64) -> Self::Output {
        Self(self.0.saturating_sub(rhs))
    }
}

impl std::ops::SubAssign<u64> for Timestamp {
    fn sub_assign(&mut self, rhs: u64) {
        self.0 = self.0.saturating_sub(rhs);
    }
}

impl std::ops::Sub<i64> for Timestamp {
    type Output = Self;

    fn sub(self, rhs: i64) -> Self::Output {
        if rhs >= 0 {
            Self(self.0.saturating_sub(rhs.unsigned_abs()))
        } else {
            Self(self.0.saturating_add(rhs.unsigned_abs()))
        }
    }
}

impl std::ops::SubAssign<i64> for Timestamp {
    fn sub_assign(&mut self, rhs: i64) {
        if rhs >= 0 {
            self.0 = self.0.saturating_sub(rhs.unsigned_abs());
        } else {
            self.0 = self.0.saturating_add(rhs.unsigned_abs());
        }
    }
}

impl std::ops::Add<Duration> for Timestamp {
    type Output = Self;

    fn add(self, rhs: Duration) -> Self::Output {
        // Timestamp stores seconds, so duration is truncated from millis to whole seconds.
        Self(self.0.saturating_add(rhs.as_secs()))
    }
}

impl std::ops::AddAssign<Duration> for Timestamp {
    fn add_assign(&mut self, rhs: Duration) {
        // Timestamp stores seconds, so duration is truncated from millis to whole seconds.
        self.0 = self.0.saturating_add(rhs.as_secs());
    }
}

impl std::ops::Sub<Duration> for Timestamp {
    type Output = Self;

    fn sub(self, rhs: Duration) -> Self::Output {
        // Timestamp stores seconds, so duration is truncated from millis to whole seconds.
        Self(self.0.saturating_sub(rhs.as_secs()))
    }
}

impl std::ops::SubAssign<Duration> for Timestamp {
    fn sub_assign(&mut self, rhs: Duration) {
        // Timestamp stores seconds, so duration is truncated from millis to whole seconds.
        self.0 = self.0.saturating_sub(rhs.as_secs());
    }
}

impl NumCast for Timestamp {
    fn from<T: NumToPrimitive>(n: T) -> Option<Self> {
        n.to_u64().map(Self)
    }
}

impl NumFromPrimitive for Timestamp {
    #[allow(clippy::cast_sign_loss)]
    fn from_i64(n: i64) -> Option<Self> {
        if n < 0 { None } else { Some(Self(n as u64)) }
    }

    fn from_u64(n: u64) -> Option<Self> {
        Some(Self(n))
    }
}

impl NumToPrimitive for Timestamp {
    fn to_i64(&self) -> Option<i64> {
        self.0.to_i64()
    }

    fn to_u64(&self) -> Option<u64> {
        self.0.to_u64()
    }
}

impl SanitizeAuto for Timestamp {}

impl SanitizeCustom for Timestamp {}

impl ValidateAuto for Timestamp {}

impl ValidateCustom for Timestamp {}

impl Visitable for Timestamp {}

///
/// TESTS
///
