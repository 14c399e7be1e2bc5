use crate::{
    traits::{
        AsView, EntityKeyBytes, FieldValue, FieldValueKind, Inner, SanitizeAuto, SanitizeCustom,
        UpdateView, ValidateAuto, ValidateCustom, Visitable,
    },
    types::{Principal, PrincipalEncodeError, Subaccount},
    value::Value,
};
use candid::CandidType;
use canic_cdk::types::Account as IcrcAccount;
use serde::{Deserialize, Serialize};
use std::{
    fmt::{self, Display},
    str::FromStr,
};
use thiserror::Error as ThisError;

///
/// Account
///

#[derive(CandidType, Clone, Copy, Debug, Default, Deserialize, Eq, Hash, PartialEq, Serialize)]
pub struct Account {
    pub owner: Principal,
    pub subaccount: Option<Subaccount>,
}

///
/// AccountEncodeError
///
/// Errors returned when encoding an account for persistence.
///

#[derive(Debug, ThisError)]
pub enum AccountEncodeError {
    #[error("account owner principal encoding failed: {0}")]
    OwnerEncode(#[from] PrincipalEncodeError),

    #[error("account owner principal exceeds max length: {len} bytes (limit {max})")]
    OwnerTooLarge { len: usize, max: usize },
}

impl Account {
    pub const STORED_SIZE: u32 = 62;

    const PRINCIPAL_MAX_LEN: usize = Principal::MAX_LENGTH_IN_BYTES as usize;
    const SUBACCOUNT_LEN: usize = 32;
    const TAG_SUBACCOUNT: u8 = 0x80;
    const LEN_MASK: u8 = 0x7F;

    /// Build an account from owner and optional subaccount.
    pub fn new<P: Into<Principal>, S: Into<Subaccount>>(owner: P, subaccount: Option<S>) -> Self {
        Self {
            owner: owner.into(),
            subaccount: subaccount.map(Into::into),
        }
    }

    /// Convert to the ICRC account representation.
    pub fn to_icrc_type(&self) -> IcrcAccount {
        IcrcAccount {
            owner: self.owner.into(),
            subaccount: self.subaccount.map(Into::into),
        }
    }

    #[must_use]
    /// Test helper that builds a deterministic account from a byte seed.
    pub fn dummy(v: u8) -> Self {
        let p = Principal::from_slice(&[v]);
        let s = [v; 32];

        Self::new(p, Some(s))
    }

    /// Convert the account into a deterministic, fixed-size byte representation.
    pub fn to_bytes(&self) -> Result<Vec<u8>, AccountEncodeError> {
        let principal_bytes = self.owner.to_bytes()?;
        let len = principal_bytes.len();
        if len > Self::PRINCIPAL_MAX_LEN {
            return Err(AccountEncodeError::OwnerTooLarge {
                len,
                max: Self::PRINCIPAL_MAX_LEN,
            });
        }

        let mut out = vec![0u8; Self::STORED_SIZE as usize];

        // Encode principal length and subaccount presence in the tag byte.
        #[allow(clippy::cast_possible_truncation)]
        let mut tag = u8::try_from(len).map_err(|_| AccountEncodeError::OwnerTooLarge {
            len,
            max: Self::PRINCIPAL_MAX_LEN,
        })?;
        if self.subaccount.is_some() {
            tag |= Self::TAG_SUBACCOUNT;
        }
        out[0] = tag;

        // Principal bytes (padded to fixed length).
        if len > 0 {
            out[1..=len].copy_from_slice(&principal_bytes);
        }

        // Subaccount bytes (fixed length).
        let subaccount_bytes = self.subaccount.unwrap_or_default().to_array();
        let sub_offset = 1 + Self::PRINCIPAL_MAX_LEN;
        out[sub_offset..sub_offset + Self::SUBACCOUNT_LEN].copy_from_slice(&subaccount_bytes);

        Ok(out)
    }

    /// Construct the maximum possible account for storage sizing tests.
    #[must_use]
    pub fn max_storable() -> Self {
        Self::new(Principal::MAX, Some(Subaccount::MAX))
    }

    #[must_use]
    #[allow(clippy::cast_possible_truncation)]
    fn ordering_tag(&self) -> u8 {
        let len = self.owner.as_slice().len();
        let len = len.min(u8::MAX as usize);
        let mut tag = len as u8;
        if self.subaccount.is_some() {
            tag |= Self::TAG_SUBACCOUNT;
        }
        tag
    }

    pub fn try_from_bytes(bytes: &[u8]) -> Result<Self, &'static str> {
        if bytes.len() != Self::STORED_SIZE as usize {
            return Err("corrupted Account: invalid size");
        }

        let tag = bytes[0];
        let has_subaccount = (tag & Self::TAG_SUBACCOUNT) != 0;
        let len = (tag & Self::LEN_MASK) as usize;
        if len > Self::PRINCIPAL_MAX_LEN {
            return Err("corrupted Account: invalid principal length");
        }

        let principal_end = 1 + len;
        let principal_region_end = 1 + Self::PRINCIPAL_MAX_LEN;
        let owner = Principal::from_slice(&bytes[1..principal_end]);

        let padding = &bytes[principal_end..principal_region_end];
        if padding.iter().any(|&b| b != 0) {
            return Err("corrupted Account: non-zero principal padding");
        }

        let sub_offset = principal_region_end;
        let mut sub = [0u8; Self::SUBACCOUNT_LEN];
        sub.copy_from_slice(&bytes[sub_offset..sub_offset + Self::SUBACCOUNT_LEN]);

        let subaccount = if has_subaccount {
            Some(Subaccount::from_array(sub))
        } else {
            if sub.iter().any(|&b| b != 0) {
                return Err("corrupted Account: non-zero subaccount bytes without flag");
            }
            None
        };

        Ok(Self { owner, subaccount })
    }
}

impl AsView for Account {
    type ViewType = Self;

    fn as_view(&self) -> Self::ViewType {
        *self
    }

    fn from_view(view: Self::ViewType) -> Self {
        view
    }
}

// Display logic is a bit convoluted and the code's in the icrc_ledger_types
// repo that I don't really want to wrap
impl Display for Account {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_icrc_type())
    }
}

impl EntityKeyBytes for Account {
    const BYTE_LEN: usize = Self::STORED_SIZE as usize;

    fn write_bytes(&self, out: &mut [u8]) {
        assert_eq!(out.len(), Self::BYTE_LEN);
        let encoded = self
            .to_bytes()
            .expect("account primary key encoding must remain valid");

        out.copy_from_slice(&encoded);
    }
}

impl FieldValue for Account {
    fn kind() -> FieldValueKind {
        FieldValueKind::Atomic
    }

    fn to_value(&self) -> Value {
        Value::Account(*self)
    }

    fn from_value(value: &Value) -> Option<Self> {
        match value {
            Value::Account(v) => Some(*v),
            _ => None,
        }
    }
}

impl From<Account> for IcrcAccount {
    fn from(acc: Account) -> Self {
        acc.to_icrc_type()
    }
}

impl From<IcrcAccount> for Account {
    fn from(acc: IcrcAccount) -> Self {
        Self {
            owner: acc.owner.into(),
            subaccount: acc.subaccount.map(Into::into),
        }
    }
}

impl FromStr for Account {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let icrc = IcrcAccount::from_str(s)?;

        Ok(Self {
            owner: icrc.owner.into(),
            subaccount: icrc.subaccount.map(Into::into),
        })
    }
}

impl<P: Into<Principal>> From<P> for Account {
    fn from(owner: P) -> Self {
        Self {
            owner: owner.into(),
            subaccount: None,
        }
    }
}

impl Inner<Self> for Account {
    fn inner(&self) -> &Self {
        self
    }

    fn into_inner(self) -> Self {
        self
    }
}

impl Ord for Account {
    fn cmp(&self, other: &Self) -> std::cmp::Ordering {
        let tag_cmp = self.ordering_tag().cmp(&other.ordering_tag());
        if tag_cmp != std::cmp::Ordering::Equal {
            return tag_cmp;
        }

        let mut self_owner = [0u8; Self::PRINCIPAL_MAX_LEN];
        let self_bytes = self.owner.as_slice();
        self_owner[..self_bytes.len()].copy_from_slice(self_bytes);

        let mut other_owner = [0u8; Self::PRINCIPAL_MAX_LEN];
        let other_bytes = other.owner.as_slice();
        other_owner[..other_bytes.len()].copy_from_slice(other_bytes);

        let owner_cmp = self_owner.cmp(&other_owner);
        if owner_cmp != std::cmp::Ordering::Equal {
            return owner_cmp;
        }

        let self_sub = self.subaccount.unwrap_or_default().to_array();
        let other_sub = other.subaccount.unwrap_or_default().to_array();

        self_sub.cmp(&other_sub)
    }
}

impl PartialOrd for Account {
    fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
        Some(self.cmp(other))
    }
}

impl SanitizeAuto for Account {}

impl SanitizeCustom for Account {}

impl TryFrom<&[u8]> for Account {
    type Error = &'static str;

    fn try_from(bytes: &[u8]) -> Result<Self, Self::Error> {
        Self::try_from_bytes(bytes)
    }
}

impl UpdateView for Account {
    type UpdateViewType = Self;

    fn merge(&mut self, v: Self::UpdateViewType) -> Result<(), crate::traits::Error> {
        *self = v;

        Ok(())
    }
}

impl ValidateAuto for Account {}

impl ValidateCustom for Account {}

impl Visitable for Account {}

///
/// TESTS
///
