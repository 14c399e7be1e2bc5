use crate::{
    core::traits::{NumCast, Validator},
    prelude::*,
};

fn cast_decimal<N: NumCast + Clone>(value: &N) -> Result<Decimal, String> {
    <Decimal as NumCast>::from(value.clone()).ok_or_else(|| {
        format!(
            "value of type {} cannot be represented as Decimal",
            core::any::type_name::<N>()
        )
    })
}

///
/// Lt
///

#[validator]
pub struct Lt {
    target: Decimal,
}

impl Lt {
    pub fn new<N: NumCast + Clone>(target: N) -> Self {
        let target = cast_decimal(&target)
            .unwrap_or_else(|e| panic!("Lt::new failed to convert target: {e}"));

        Self { target }
    }
}

impl<N: NumCast + Clone> Validator<N> for Lt {
    fn validate(&self, value: &N) -> Result<(), String> {
        let v = cast_decimal(value)?;

        if v < self.target {
            Ok(())
        } else {
            Err(format!("{} must be < {}", v, self.target))
        }
    }
}

///
/// Gt
///

#[validator]
pub struct Gt {
    target: Decimal,
}

impl Gt {
    pub fn new<N: NumCast + Clone>(target: N) -> Self {
        let target = cast_decimal(&target)
            .unwrap_or_else(|e| panic!("Gt::new failed to convert target: {e}"));

        Self { target }
    }
}

impl<N: NumCast + Clone> Validator<N> for Gt {
    fn validate(&self, value: &N) -> Result<(), String> {
        let v = cast_decimal(value)?;

        if v > self.target {
            Ok(())
        } else {
            Err(format!("{} must be > {}", v, self.target))
        }
    }
}

///
/// Lte
///

#[validator]
pub struct Lte {
    target: Decimal,
}

impl Lte {
    pub fn new<N: NumCast + Clone>(target: N) -> Self {
        let target = cast_decimal(&target)
            .unwrap_or_else(|e| panic!("Lte::new failed to convert target: {e}"));

        Self { target }
    }
}

impl<N: NumCast + Clone> Validator<N> for Lte {
    fn validate(&self, value: &N) -> Result<(), String> {
        let v = cast_decimal(value)?;

        if v <= self.target {
            Ok(())
        } else {
            Err(format!("{} must be <= {}", v, self.target))
        }
    }
}

///
/// Gte
///

#[validator]
pub struct Gte {
    target: Decimal,
}

impl Gte {
    pub fn new<N: NumCast + Clone>(target: N) -> Self {
        let target = cast_decimal(&target)
            .unwrap_or_else(|e| panic!("Gte::new failed to convert target: {e}"));

        Self { target }
    }
}

impl<N: NumCast + Clone> Validator<N> for Gte {
    fn validate(&self, value: &N) -> Result<(), String> {
        let v = cast_decimal(value)?;

        if v >= self.target {
            Ok(())
        } else {
            Err(format!("{} must be >= {}", v, self.target))
        }
    }
}

///
/// Equal
///

#[validator]
pub struct Equal {
    target: Decimal,
}

impl Equal {
    pub fn new<N: NumCast + Clone>(target: N) -> Self {
        let target = cast_decimal(&target)
            .unwrap_or_else(|e| panic!("Equal::new failed to convert target: {e}"));

        Self { target }
    }
}

impl<N: NumCast + Clone> Validator<N> for Equal {
    fn validate(&self, value: &N) -> Result<(), String> {
        let v = cast_decimal(value)?;

        if v == self.target {
            Ok(())
        } else {
            Err(format!("{} must be == {}", v, self.target))
        }
    }
}

///
/// NotEqual
///

#[validator]
pub struct NotEqual {
    target: Decimal,
}

impl NotEqual {
    pub fn new<N: NumCast + Clone>(target: N) -> Self {
        let target = cast_decimal(&target)
            .unwrap_or_else(|e| panic!("NotEqual::new failed to convert target: {e}"));

        Self { target }
    }
}

impl<N: NumCast + Clone> Validator<N> for NotEqual {
    fn validate(&self, value: &N) -> Result<(), String> {
        let v = cast_decimal(value)?;

        if v == self.target {
            Err(format!("{} must be != {}", v, self.target))
        } else {
            Ok(())
        }
    }
}

///
/// Range
///

#[validator]
pub struct Range {
    min: Decimal,
    max: Decimal,
}

impl Range {
    pub fn new<N: NumCast + Clone>(min: N, max: N) -> Self {
        let min =
            cast_decimal(&min).unwrap_or_else(|e| panic!("Range::new failed to convert min: {e}"));
        let max =
            cast_decimal(&max).unwrap_or_else(|e| panic!("Range::new failed to convert max: {e}"));
        assert!(min <= max, "range requires min <= max");

        Self { min, max }
    }
}

impl<N: NumCast + Clone> Validator<N> for Range {
    fn validate(&self, n: &N) -> Result<(), String> {
        let v = cast_decimal(n)?;

        if v < self.min || v > self.max {
            Err(format!(
                "{} must be between {} and {}",
                v, self.min, self.max
            ))
        } else {
            Ok(())
        }
    }
}

///
/// MultipleOf
///

#[validator]
pub struct MultipleOf {
    target: Decimal,
}

impl MultipleOf {
    pub fn new<N: NumCast + Clone>(target: N) -> Self {
        let target = cast_decimal(&target)
            .unwrap_or_else(|e| panic!("MultipleOf::new failed to convert target: {e}"));
        Self { target }
    }
}

impl<N: NumCast + Clone> Validator<N> for MultipleOf {
    fn validate(&self, n: &N) -> Result<(), String> {
        let v = cast_decimal(n)?;

        if (*v % *self.target).is_zero() {
            Ok(())
        } else {
            Err(format!("{v} is not a multiple of {}", self.target))
        }
    }
}

///
/// TESTS
///
