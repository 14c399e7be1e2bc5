use crate::{
    error::InternalError,
    types::{
        Account, Date, Decimal, Duration, Int, Int128, Nat, Nat128, Principal, Repr, Timestamp,
    },
    value::{Value, ValueEnum},
};
use thiserror::Error as ThisError;

const NEGATIVE_MARKER: u8 = 0x00;
const ZERO_MARKER: u8 = 0x01;
const POSITIVE_MARKER: u8 = 0x02;

const LENGTH_BYTES: usize = 2;
const MAX_SEGMENT_LEN: usize = u16::MAX as usize;
const DECIMAL_DIGIT_BUFFER_LEN: usize = 39;
const BIGINT_DECIMAL_CHUNK_BASE: u64 = 1_000_000_000;
const BIGINT_DECIMAL_CHUNK_WIDTH: usize = 9;
const DECIMAL_POSITIVE_TERMINATOR: u8 = 0x00;
const DECIMAL_NEGATIVE_TERMINATOR: u8 = 0xFF;
const ACCOUNT_OWNER_MAX_LEN: usize = Principal::MAX_LENGTH_IN_BYTES as usize;
const ACCOUNT_SUBACCOUNT_LEN: usize = 32;
const ACCOUNT_SUBACCOUNT_TAG: u8 = 0x80;

///
/// OrderedValueEncodeError
///
/// Canonical index-encoding failures for one `Value` component.
///

#[derive(Debug, ThisError)]
pub(crate) enum OrderedValueEncodeError {
    #[error("null values are not indexable")]
    NullNotIndexable,

    #[error("value kind '{kind}' is not canonically index-orderable")]
    UnsupportedValueKind { kind: &'static str },

    #[error("ordered segment exceeds max length: {len} bytes (limit {max})")]
    SegmentTooLarge { len: usize, max: usize },

    #[error("decimal exponent overflow during canonical encoding")]
    DecimalExponentOverflow,
}

impl From<OrderedValueEncodeError> for InternalError {
    fn from(err: OrderedValueEncodeError) -> Self {
        Self::index_unsupported(format!(
            "index value is not canonically order-encodable: {err}"
        ))
    }
}

///
/// EncodedValue
///
/// Cached canonical index-component bytes for one logical `Value`.
/// This wrapper keeps value + bytes together so planning/execution callsites
/// can avoid re-encoding the same literal repeatedly.
///

#[derive(Clone, Debug, Eq, PartialEq)]
pub(crate) struct EncodedValue {
    raw: Value,
    encoded: Vec<u8>,
}

impl EncodedValue {
    /// Encode a value once into canonical index-component bytes.
    pub(crate) fn try_new(raw: Value) -> Result<Self, OrderedValueEncodeError> {
        let encoded = encode_canonical_index_component(&raw)?;

        Ok(Self { raw, encoded })
    }

    /// Encode a borrowed value by cloning it into this cached wrapper.
    pub(crate) fn try_from_ref(raw: &Value) -> Result<Self, OrderedValueEncodeError> {
        Self::try_new(raw.clone())
    }

    /// Encode all values in order into cached wrappers.
    pub(crate) fn try_encode_all(values: &[Value]) -> Result<Vec<Self>, OrderedValueEncodeError> {
        values.iter().map(Self::try_from_ref).collect()
    }

    #[must_use]
    pub(crate) const fn encoded(&self) -> &[u8] {
        self.encoded.as_slice()
    }
}

/// OrderedEncode
///
/// Internal ordered-byte encoder for fixed-width value components.
pub(crate) trait OrderedEncode {
    fn encode_ordered(&self, out: &mut Vec<u8>) -> Result<(), OrderedValueEncodeError>;
}

impl OrderedEncode for Date {
    fn encode_ordered(&self, out: &mut Vec<u8>) -> Result<(), OrderedValueEncodeError> {
        out.extend_from_slice(&ordered_i32_bytes(self.get()));
        Ok(())
    }
}

impl OrderedEncode for Duration {
    fn encode_ordered(&self, out: &mut Vec<u8>) -> Result<(), OrderedValueEncodeError> {
        out.extend_from_slice(&self.repr().to_be_bytes());
        Ok(())
    }
}

impl OrderedEncode for Int128 {
    fn encode_ordered(&self, out: &mut Vec<u8>) -> Result<(), OrderedValueEncodeError> {
        out.extend_from_slice(&ordered_i128_bytes(self.get()));
        Ok(())
    }
}

impl OrderedEncode for Nat128 {
    fn encode_ordered(&self, out: &mut Vec<u8>) -> Result<(), OrderedValueEncodeError> {
        out.extend_from_slice(&self.get().to_be_bytes());
        Ok(())
    }
}

impl OrderedEncode for Timestamp {
    fn encode_ordered(&self, out: &mut Vec<u8>) -> Result<(), OrderedValueEncodeError> {
        out.extend_from_slice(&self.repr().to_be_bytes());
        Ok(())
    }
}

/// Encode one scalar index component so lexicographic byte order matches
/// canonical `Value` order for supported primitive variants.
pub(crate) fn encode_canonical_index_component(
    value: &Value,
) -> Result<Vec<u8>, OrderedValueEncodeError> {
    let mut out = Vec::new();

    out.push(value.canonical_tag().to_u8());
    encode_component_payload(&mut out, value)?;

    Ok(out)
}

// Encode the variant-local payload after the canonical variant tag.
fn encode_component_payload(
    out: &mut Vec<u8>,
    value: &Value,
) -> Result<(), OrderedValueEncodeError> {
    match value {
        Value::Account(v) => {
            push_account_payload(out, v);
            Ok(())
        }
        Value::Blob(_) | Value::List(_) | Value::Map(_) => {
            Err(OrderedValueEncodeError::UnsupportedValueKind {
                kind: value.canonical_tag().label(),
            })
        }
        Value::Bool(v) => {
            out.push(u8::from(*v));
            Ok(())
        }
        Value::Date(v) => v.encode_ordered(out),
        Value::Decimal(v) => push_decimal_payload(out, *v),
        Value::Duration(v) => v.encode_ordered(out),
        Value::Enum(v) => push_enum_payload(out, v),
        Value::Float32(v) => {
            out.extend_from_slice(&ordered_f32_bytes(v.get()));
            Ok(())
        }
        Value::Float64(v) => {
            out.extend_from_slice(&ordered_f64_bytes(v.get()));
            Ok(())
        }
        Value::Int(v) => {
            out.extend_from_slice(&ordered_i64_bytes(*v));
            Ok(())
        }
        Value::Int128(v) => v.encode_ordered(out),
        Value::IntBig(v) => push_signed_bigint_payload(out, v),
        Value::Null => Err(OrderedValueEncodeError::NullNotIndexable),
        Value::Principal(v) => {
            push_terminated_bytes(out, v.as_slice());
            Ok(())
        }
        Value::Subaccount(v) => {
            out.extend_from_slice(&v.to_bytes());
            Ok(())
        }
        Value::Text(v) => {
            push_terminated_bytes(out, v.as_bytes());
            Ok(())
        }
        Value::Timestamp(v) => v.encode_ordered(out),
        Value::Uint(v) => {
            out.extend_from_slice(&v.to_be_bytes());
            Ok(())
        }
        Value::Uint128(v) => v.encode_ordered(out),
        Value::UintBig(v) => push_unsigned_bigint_payload(out, v),
        Value::Ulid(v) => {
            out.extend_from_slice(&v.to_bytes());
            Ok(())
        }
        Value::Unit => Ok(()),
    }
}

// Account ordering uses the same tuple contract as `Account::cmp`.
#[expect(clippy::cast_possible_truncation)]
fn push_account_payload(out: &mut Vec<u8>, account: &Account) {
    let owner = account.owner.as_slice();
    let owner_len = owner.len().min(ACCOUNT_OWNER_MAX_LEN).min(u8::MAX as usize);

    let mut ordering_tag = owner_len as u8;
    if account.subaccount.is_some() {
        ordering_tag |= ACCOUNT_SUBACCOUNT_TAG;
    }

    out.push(ordering_tag);

    let mut owner_padded = [0u8; ACCOUNT_OWNER_MAX_LEN];
    owner_padded[..owner_len].copy_from_slice(&owner[..owner_len]);
    out.extend_from_slice(&owner_padded);

    let subaccount = account.subaccount.unwrap_or_default().to_array();
    let _ = ACCOUNT_SUBACCOUNT_LEN;
    out.extend_from_slice(&subaccount);
}

// Enum ordering is variant -> path option -> payload option, recursively.
fn push_enum_payload(out: &mut Vec<u8>, value: &ValueEnum) -> Result<(), OrderedValueEncodeError> {
    push_terminated_bytes(out, value.variant.as_bytes());

    match &value.path {
        Some(path) => {
            out.push(1);
            push_terminated_bytes(out, path.as_bytes());
        }
        None => out.push(0),
    }

    match &value.payload {
        Some(payload) => {
            out.push(1);

            let payload_bytes = encode_canonical_index_component(payload)?;
            push_len_prefixed_bytes(out, &payload_bytes)?;
        }
        None => out.push(0),
    }

    Ok(())
}

// Decimal ordering is sign bucket + exponent + significant digits + terminator.
fn push_decimal_payload(out: &mut Vec<u8>, value: Decimal) -> Result<(), OrderedValueEncodeError> {
    let normalized = value.normalize();
    if normalized.is_zero() {
        out.push(ZERO_MARKER);
        return Ok(());
    }

    let parts = normalized.parts();
    let mut digits_buf = [0u8; DECIMAL_DIGIT_BUFFER_LEN];
    let digit_len = write_u128_decimal_digits(parts.mantissa.unsigned_abs(), &mut digits_buf);
    let exponent = decimal_exponent(parts.scale, digit_len)?;

    let exponent_bytes = ordered_i32_bytes(exponent);
    let digits_bytes = &digits_buf[..digit_len];

    if parts.mantissa.is_negative() {
        out.push(NEGATIVE_MARKER);
        push_inverted(out, &exponent_bytes);
        push_inverted(out, digits_bytes);
        out.push(DECIMAL_NEGATIVE_TERMINATOR);
    } else {
        out.push(POSITIVE_MARKER);
        out.extend_from_slice(&exponent_bytes);
        out.extend_from_slice(digits_bytes);
        out.push(DECIMAL_POSITIVE_TERMINATOR);
    }

    Ok(())
}

fn write_u128_decimal_digits(mut value: u128, out: &mut [u8; DECIMAL_DIGIT_BUFFER_LEN]) -> usize {
    let mut write_idx = DECIMAL_DIGIT_BUFFER_LEN;

    loop {
        write_idx = write_idx.saturating_sub(1);
        out[write_idx] = match value % 10 {
            0 => b'0',
            1 => b'1',
            2 => b'2',
            3 => b'3',
            4 => b'4',
            5 => b'5',
            6 => b'6',
            7 => b'7',
            8 => b'8',
            9 => b'9',
            _ => unreachable!("decimal digit remainder must be in 0..=9"),
        };
        value /= 10;

        if value == 0 {
            break;
        }
    }

    let len = DECIMAL_DIGIT_BUFFER_LEN.saturating_sub(write_idx);
    out.copy_within(write_idx..DECIMAL_DIGIT_BUFFER_LEN, 0);
    len
}

// Signed big-int ordering uses sign bucket + digit length + digit bytes.
fn push_signed_bigint_payload(
    out: &mut Vec<u8>,
    value: &Int,
) -> Result<(), OrderedValueEncodeError> {
    let (negative, limbs) = value.sign_and_u32_digits();
    let digits = u32_limbs_to_decimal_digits(limbs);

    if digits.len() == 1 && digits[0] == b'0' {
        out.push(ZERO_MARKER);
        return Ok(());
    }

    let digits_len = encode_segment_len(digits.len())?;

    if negative {
        out.push(NEGATIVE_MARKER);
        push_inverted(out, &digits_len);
        push_inverted(out, &digits);
    } else {
        out.push(POSITIVE_MARKER);
        out.extend_from_slice(&digits_len);
        out.extend_from_slice(&digits);
    }

    Ok(())
}

// Unsigned big-int ordering is length + digit bytes.
fn push_unsigned_bigint_payload(
    out: &mut Vec<u8>,
    value: &Nat,
) -> Result<(), OrderedValueEncodeError> {
    let digits = u32_limbs_to_decimal_digits(value.u32_digits());

    let digits_len = encode_segment_len(digits.len())?;
    out.extend_from_slice(&digits_len);
    out.extend_from_slice(&digits);

    Ok(())
}

// Byte strings are escaped so tuple boundaries remain unambiguous.
// Segment size bounds for these terminated payloads are enforced by the outer
// index-key component caps in `IndexKey`, not at this primitive encoder layer.
fn push_terminated_bytes(out: &mut Vec<u8>, bytes: &[u8]) {
    for &byte in bytes {
        if byte == 0 {
            out.extend_from_slice(&[0, 0xFF]);
        } else {
            out.push(byte);
        }
    }

    out.extend_from_slice(&[0, 0]);
}

fn push_len_prefixed_bytes(out: &mut Vec<u8>, bytes: &[u8]) -> Result<(), OrderedValueEncodeError> {
    let len = encode_segment_len(bytes.len())?;
    out.extend_from_slice(&len);
    out.extend_from_slice(bytes);
    Ok(())
}

fn push_inverted(out: &mut Vec<u8>, bytes: &[u8]) {
    for &byte in bytes {
        out.push(!byte);
    }
}

fn encode_segment_len(len: usize) -> Result<[u8; LENGTH_BYTES], OrderedValueEncodeError> {
    let len_u16 = u16::try_from(len).map_err(|_| OrderedValueEncodeError::SegmentTooLarge {
        len,
        max: MAX_SEGMENT_LEN,
    })?;

    Ok(len_u16.to_be_bytes())
}

fn decimal_exponent(scale: u32, digit_len: usize) -> Result<i32, OrderedValueEncodeError> {
    if scale > Decimal::max_supported_scale() {
        return Err(OrderedValueEncodeError::DecimalExponentOverflow);
    }

    let digit_count =
        u32::try_from(digit_len).map_err(|_| OrderedValueEncodeError::DecimalExponentOverflow)?;
    let normalized_digits = digit_count
        .checked_sub(1)
        .ok_or(OrderedValueEncodeError::DecimalExponentOverflow)?;

    let exponent = i64::from(normalized_digits)
        .checked_sub(i64::from(scale))
        .ok_or(OrderedValueEncodeError::DecimalExponentOverflow)?;

    i32::try_from(exponent).map_err(|_| OrderedValueEncodeError::DecimalExponentOverflow)
}

// Convert little-endian base-2^32 limbs to ASCII decimal digits.
// This avoids decimal String formatting but still uses temporary vectors.
fn u32_limbs_to_decimal_digits(mut quotient: Vec<u32>) -> Vec<u8> {
    trim_zero_limbs(&mut quotient);
    if quotient.is_empty() {
        return vec![b'0'];
    }

    // base-2^32 and base-1e9 are close in radix width, so chunks are roughly
    // one-to-one with limbs; reserve once to reduce allocator churn.
    let mut chunks = Vec::with_capacity(quotient.len().saturating_add(1));
    while !quotient.is_empty() {
        let mut remainder = 0u64;
        for limb in quotient.iter_mut().rev() {
            let value = (remainder << 32) | u64::from(*limb);
            let quotient_limb = value / BIGINT_DECIMAL_CHUNK_BASE;
            *limb = u32::try_from(quotient_limb).expect("quotient limb always fits in u32");
            remainder = value % BIGINT_DECIMAL_CHUNK_BASE;
        }

        chunks.push(u32::try_from(remainder).expect("remainder always fits in u32"));
        trim_zero_limbs(&mut quotient);
    }

    chunks_to_decimal_digits(chunks)
}

fn trim_zero_limbs(limbs: &mut Vec<u32>) {
    while limbs.last().copied() == Some(0) {
        limbs.pop();
    }
}

fn chunks_to_decimal_digits(mut chunks: Vec<u32>) -> Vec<u8> {
    let mut out = Vec::with_capacity(chunks.len().saturating_mul(BIGINT_DECIMAL_CHUNK_WIDTH));

    if let Some(most_significant) = chunks.pop() {
        push_unpadded_chunk_digits(&mut out, most_significant);
    } else {
        out.push(b'0');
        return out;
    }

    while let Some(chunk) = chunks.pop() {
        push_padded_chunk_digits(&mut out, chunk);
    }

    out
}

fn push_unpadded_chunk_digits(out: &mut Vec<u8>, chunk: u32) {
    let mut scratch = [0u8; BIGINT_DECIMAL_CHUNK_WIDTH];
    let mut write_idx = BIGINT_DECIMAL_CHUNK_WIDTH;
    let mut value = chunk;

    loop {
        write_idx = write_idx.saturating_sub(1);
        scratch[write_idx] = digit_to_ascii(value % 10);
        value /= 10;
        if value == 0 {
            break;
        }
    }

    out.extend_from_slice(&scratch[write_idx..BIGINT_DECIMAL_CHUNK_WIDTH]);
}

fn push_padded_chunk_digits(out: &mut Vec<u8>, chunk: u32) {
    let mut divisor = 100_000_000u32;
    for _ in 0..BIGINT_DECIMAL_CHUNK_WIDTH {
        out.push(digit_to_ascii((chunk / divisor) % 10));
        divisor = if divisor > 1 { divisor / 10 } else { 1 };
    }
}

fn digit_to_ascii(value: u32) -> u8 {
    match value {
        0 => b'0',
        1 => b'1',
        2 => b'2',
        3 => b'3',
        4 => b'4',
        5 => b'5',
        6 => b'6',
        7 => b'7',
        8 => b'8',
        9 => b'9',
        _ => unreachable!("decimal digit must be in 0..=9"),
    }
}

const fn ordered_i32_bytes(value: i32) -> [u8; 4] {
    let biased = value.cast_unsigned() ^ (1u32 << 31);
    biased.to_be_bytes()
}

const fn ordered_i64_bytes(value: i64) -> [u8; 8] {
    let biased = value.cast_unsigned() ^ (1u64 << 63);
    biased.to_be_bytes()
}

const fn ordered_i128_bytes(value: i128) -> [u8; 16] {
    let biased = value.cast_unsigned() ^ (1u128 << 127);
    biased.to_be_bytes()
}

const fn ordered_f32_bytes(value: f32) -> [u8; 4] {
    let bits = value.to_bits();
    let ordered = if bits & 0x8000_0000 == 0 {
        bits ^ 0x8000_0000
    } else {
        !bits
    };

    ordered.to_be_bytes()
}

const fn ordered_f64_bytes(value: f64) -> [u8; 8] {
    let bits = value.to_bits();
    let ordered = if bits & 0x8000_0000_0000_0000 == 0 {
        bits ^ 0x8000_0000_0000_0000
    } else {
        !bits
    };

    ordered.to_be_bytes()
}

///
/// TESTS
///
