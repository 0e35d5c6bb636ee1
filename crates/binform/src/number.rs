//! Fixed-width numeric codecs: integers, floats, 64-bit big integers and
//! booleans.
//!
//! Signed integers are stored as a bias over the unsigned encoding of the
//! same width: encode adds `2^(bits-1) - 1`, decode subtracts it. The signed
//! range is therefore `[-(2^(bits-1) - 1), 2^(bits-1)]`.

use binform_buffers::{Endian, Reader, Writer};
use serde::{Deserialize, Serialize};

use crate::codec::Codec;
use crate::context::Context;
use crate::error::{CodecError, Result};
use crate::value::Value;

/// Which code paths enforce a numeric codec's `[minimum, maximum]` range.
///
/// [`Codec::is_valid`] always enforces it; the mode only gates encode and
/// decode, so trusted fast paths can skip the check.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ValidationMode {
    Encode,
    Decode,
    #[default]
    Both,
    None,
}

impl ValidationMode {
    pub fn on_encode(self) -> bool {
        matches!(self, ValidationMode::Encode | ValidationMode::Both)
    }

    pub fn on_decode(self) -> bool {
        matches!(self, ValidationMode::Decode | ValidationMode::Both)
    }
}

/// Width of an [`IntCodec`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum IntWidth {
    W8,
    W16,
    W24,
    W32,
    W40,
    W48,
}

impl IntWidth {
    pub fn bytes(self) -> usize {
        match self {
            IntWidth::W8 => 1,
            IntWidth::W16 => 2,
            IntWidth::W24 => 3,
            IntWidth::W32 => 4,
            IntWidth::W40 => 5,
            IntWidth::W48 => 6,
        }
    }

    pub fn bits(self) -> u32 {
        self.bytes() as u32 * 8
    }
}

/// Inclusive optional bounds plus the validation mode that gates them.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
struct Bounds<T> {
    minimum: Option<T>,
    maximum: Option<T>,
    mode: ValidationMode,
}

impl<T: PartialOrd + Copy + ToString> Bounds<T> {
    fn check(&self, value: T, natural: (T, T)) -> Result<()> {
        let minimum = self.minimum.unwrap_or(natural.0);
        let maximum = self.maximum.unwrap_or(natural.1);
        // Comparisons are negated so NaN never passes a configured bound.
        let below = self.minimum.is_some() && !(value >= minimum);
        let above = self.maximum.is_some() && !(value <= maximum);
        if below || above {
            return Err(CodecError::out_of_range(value, minimum, maximum));
        }
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// IntCodec

/// Fixed-width integer over [`Value::Int`], 8 to 48 bits, either signedness,
/// either byte order (host order by default).
///
/// ```
/// use binform::{Codec, IntCodec, IntWidth, Value};
///
/// let codec = IntCodec::signed(IntWidth::W16).big_endian();
/// assert_eq!(codec.encode(&Value::Int(0)).unwrap(), [0x7f, 0xff]);
/// assert_eq!(codec.decode(&[0x7f, 0xfe]).unwrap(), Value::Int(-1));
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct IntCodec {
    width: IntWidth,
    signed: bool,
    endian: Endian,
    bounds: Bounds<i64>,
}

impl IntCodec {
    pub fn unsigned(width: IntWidth) -> Self {
        Self {
            width,
            signed: false,
            endian: Endian::NATIVE,
            bounds: Bounds::default(),
        }
    }

    pub fn signed(width: IntWidth) -> Self {
        Self {
            signed: true,
            ..Self::unsigned(width)
        }
    }

    pub fn endian(mut self, endian: Endian) -> Self {
        self.endian = endian;
        self
    }

    pub fn big_endian(self) -> Self {
        self.endian(Endian::Big)
    }

    pub fn little_endian(self) -> Self {
        self.endian(Endian::Little)
    }

    pub fn minimum(mut self, minimum: i64) -> Self {
        self.bounds.minimum = Some(minimum);
        self
    }

    pub fn maximum(mut self, maximum: i64) -> Self {
        self.bounds.maximum = Some(maximum);
        self
    }

    pub fn range(self, minimum: i64, maximum: i64) -> Self {
        self.minimum(minimum).maximum(maximum)
    }

    pub fn validation_mode(mut self, mode: ValidationMode) -> Self {
        self.bounds.mode = mode;
        self
    }

    pub fn width(&self) -> IntWidth {
        self.width
    }

    fn bias(&self) -> i64 {
        if self.signed {
            (1i64 << (self.width.bits() - 1)) - 1
        } else {
            0
        }
    }

    /// Smallest and largest values the width can hold.
    pub fn natural_range(&self) -> (i64, i64) {
        let max_raw = (1i64 << self.width.bits()) - 1;
        (-self.bias(), max_raw - self.bias())
    }

    fn check_natural(&self, value: &Value) -> Result<i64> {
        let n = value.as_i64().ok_or(CodecError::invalid("integer"))?;
        let (lo, hi) = self.natural_range();
        if n < lo || n > hi {
            return Err(CodecError::out_of_range(n, lo, hi));
        }
        Ok(n)
    }
}

impl Codec for IntCodec {
    fn validate(&self, value: &Value, _ctx: &mut Context) -> bool {
        self.check_natural(value)
            .and_then(|n| self.bounds.check(n, self.natural_range()))
            .is_ok()
    }

    fn measure(&self, value: &Value, _ctx: &mut Context) -> Result<usize> {
        let n = self.check_natural(value)?;
        if self.bounds.mode.on_encode() {
            self.bounds.check(n, self.natural_range())?;
        }
        Ok(self.width.bytes())
    }

    fn write(&self, value: &Value, writer: &mut Writer, _ctx: &mut Context) -> Result<()> {
        let n = self.check_natural(value)?;
        if self.bounds.mode.on_encode() {
            self.bounds.check(n, self.natural_range())?;
        }
        writer.uint((n + self.bias()) as u64, self.width.bytes(), self.endian);
        Ok(())
    }

    fn read(&self, reader: &mut Reader<'_>, _ctx: &mut Context) -> Result<Value> {
        let raw = reader.uint(self.width.bytes(), self.endian)?;
        let n = raw as i64 - self.bias();
        if self.bounds.mode.on_decode() {
            self.bounds.check(n, self.natural_range())?;
        }
        Ok(Value::Int(n))
    }
}

// ---------------------------------------------------------------------------
// FloatCodec

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FloatPrecision {
    Single,
    Double,
}

/// IEEE 754 float over [`Value::Float`].
///
/// Single precision only accepts values that survive the trip through `f32`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FloatCodec {
    precision: FloatPrecision,
    endian: Endian,
    bounds: Bounds<f64>,
}

impl FloatCodec {
    pub fn f32() -> Self {
        Self {
            precision: FloatPrecision::Single,
            endian: Endian::NATIVE,
            bounds: Bounds::default(),
        }
    }

    pub fn f64() -> Self {
        Self {
            precision: FloatPrecision::Double,
            ..Self::f32()
        }
    }

    pub fn endian(mut self, endian: Endian) -> Self {
        self.endian = endian;
        self
    }

    pub fn big_endian(self) -> Self {
        self.endian(Endian::Big)
    }

    pub fn little_endian(self) -> Self {
        self.endian(Endian::Little)
    }

    pub fn minimum(mut self, minimum: f64) -> Self {
        self.bounds.minimum = Some(minimum);
        self
    }

    pub fn maximum(mut self, maximum: f64) -> Self {
        self.bounds.maximum = Some(maximum);
        self
    }

    pub fn range(self, minimum: f64, maximum: f64) -> Self {
        self.minimum(minimum).maximum(maximum)
    }

    pub fn validation_mode(mut self, mode: ValidationMode) -> Self {
        self.bounds.mode = mode;
        self
    }

    fn size(&self) -> usize {
        match self.precision {
            FloatPrecision::Single => 4,
            FloatPrecision::Double => 8,
        }
    }

    fn check_shape(&self, value: &Value) -> Result<f64> {
        let f = value.as_f64().ok_or(CodecError::invalid("float"))?;
        if self.precision == FloatPrecision::Single && !f.is_nan() && f64::from(f as f32) != f {
            return Err(CodecError::invalid("float representable in 32 bits"));
        }
        Ok(f)
    }
}

const FLOAT_NATURAL: (f64, f64) = (f64::NEG_INFINITY, f64::INFINITY);

impl Codec for FloatCodec {
    fn validate(&self, value: &Value, _ctx: &mut Context) -> bool {
        self.check_shape(value)
            .and_then(|f| self.bounds.check(f, FLOAT_NATURAL))
            .is_ok()
    }

    fn measure(&self, value: &Value, _ctx: &mut Context) -> Result<usize> {
        let f = self.check_shape(value)?;
        if self.bounds.mode.on_encode() {
            self.bounds.check(f, FLOAT_NATURAL)?;
        }
        Ok(self.size())
    }

    fn write(&self, value: &Value, writer: &mut Writer, _ctx: &mut Context) -> Result<()> {
        let f = self.check_shape(value)?;
        if self.bounds.mode.on_encode() {
            self.bounds.check(f, FLOAT_NATURAL)?;
        }
        match self.precision {
            FloatPrecision::Single => writer.f32(f as f32, self.endian),
            FloatPrecision::Double => writer.f64(f, self.endian),
        }
        Ok(())
    }

    fn read(&self, reader: &mut Reader<'_>, _ctx: &mut Context) -> Result<Value> {
        let f = match self.precision {
            FloatPrecision::Single => f64::from(reader.f32(self.endian)?),
            FloatPrecision::Double => reader.f64(self.endian)?,
        };
        if self.bounds.mode.on_decode() {
            self.bounds.check(f, FLOAT_NATURAL)?;
        }
        Ok(Value::Float(f))
    }
}

// ---------------------------------------------------------------------------
// BigIntCodec

/// 64-bit integer over [`Value::BigInt`]: unsigned `[0, 2^64)` or bias-signed
/// `[-(2^63 - 1), 2^63]`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BigIntCodec {
    signed: bool,
    endian: Endian,
    bounds: Bounds<i128>,
}

impl BigIntCodec {
    pub fn unsigned() -> Self {
        Self {
            signed: false,
            endian: Endian::NATIVE,
            bounds: Bounds::default(),
        }
    }

    pub fn signed() -> Self {
        Self {
            signed: true,
            ..Self::unsigned()
        }
    }

    pub fn endian(mut self, endian: Endian) -> Self {
        self.endian = endian;
        self
    }

    pub fn big_endian(self) -> Self {
        self.endian(Endian::Big)
    }

    pub fn little_endian(self) -> Self {
        self.endian(Endian::Little)
    }

    pub fn minimum(mut self, minimum: i128) -> Self {
        self.bounds.minimum = Some(minimum);
        self
    }

    pub fn maximum(mut self, maximum: i128) -> Self {
        self.bounds.maximum = Some(maximum);
        self
    }

    pub fn range(self, minimum: i128, maximum: i128) -> Self {
        self.minimum(minimum).maximum(maximum)
    }

    pub fn validation_mode(mut self, mode: ValidationMode) -> Self {
        self.bounds.mode = mode;
        self
    }

    fn bias(&self) -> i128 {
        if self.signed {
            (1i128 << 63) - 1
        } else {
            0
        }
    }

    pub fn natural_range(&self) -> (i128, i128) {
        let max_raw = i128::from(u64::MAX);
        (-self.bias(), max_raw - self.bias())
    }

    fn check_natural(&self, value: &Value) -> Result<i128> {
        let n = match value {
            Value::BigInt(n) => *n,
            _ => return Err(CodecError::invalid("big integer")),
        };
        let (lo, hi) = self.natural_range();
        if n < lo || n > hi {
            return Err(CodecError::out_of_range(n, lo, hi));
        }
        Ok(n)
    }
}

impl Codec for BigIntCodec {
    fn validate(&self, value: &Value, _ctx: &mut Context) -> bool {
        self.check_natural(value)
            .and_then(|n| self.bounds.check(n, self.natural_range()))
            .is_ok()
    }

    fn measure(&self, value: &Value, _ctx: &mut Context) -> Result<usize> {
        let n = self.check_natural(value)?;
        if self.bounds.mode.on_encode() {
            self.bounds.check(n, self.natural_range())?;
        }
        Ok(8)
    }

    fn write(&self, value: &Value, writer: &mut Writer, _ctx: &mut Context) -> Result<()> {
        let n = self.check_natural(value)?;
        if self.bounds.mode.on_encode() {
            self.bounds.check(n, self.natural_range())?;
        }
        writer.uint((n + self.bias()) as u64, 8, self.endian);
        Ok(())
    }

    fn read(&self, reader: &mut Reader<'_>, _ctx: &mut Context) -> Result<Value> {
        let raw = reader.uint(8, self.endian)?;
        let n = i128::from(raw) - self.bias();
        if self.bounds.mode.on_decode() {
            self.bounds.check(n, self.natural_range())?;
        }
        Ok(Value::BigInt(n))
    }
}

// ---------------------------------------------------------------------------
// BooleanCodec

/// One byte: `0` is false, `1` is true. Other bytes fail to decode.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct BooleanCodec;

impl Codec for BooleanCodec {
    fn validate(&self, value: &Value, _ctx: &mut Context) -> bool {
        value.as_bool().is_some()
    }

    fn measure(&self, value: &Value, _ctx: &mut Context) -> Result<usize> {
        value.as_bool().ok_or(CodecError::invalid("boolean"))?;
        Ok(1)
    }

    fn write(&self, value: &Value, writer: &mut Writer, _ctx: &mut Context) -> Result<()> {
        let b = value.as_bool().ok_or(CodecError::invalid("boolean"))?;
        writer.u8(u8::from(b));
        Ok(())
    }

    fn read(&self, reader: &mut Reader<'_>, _ctx: &mut Context) -> Result<Value> {
        match reader.u8()? {
            0 => Ok(Value::Bool(false)),
            1 => Ok(Value::Bool(true)),
            _ => Err(CodecError::invalid("boolean byte 0 or 1")),
        }
    }
}
