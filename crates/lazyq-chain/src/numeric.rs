//! Decimal aggregates: sum, average, median, min, max.
//!
//! Every element (or selector projection) is converted to a `Decimal` first;
//! absent values (`None`) are skipped rather than counted as zero.

use rust_decimal::prelude::FromPrimitive;
use rust_decimal::{Decimal, RoundingStrategy};

use lazyq_core::config::Rounding;
use lazyq_core::error::{Error, Result};

use crate::query::Query;

/// Largest scale a `Decimal` can carry.
pub const MAX_SCALE: u32 = 28;

/// Conversion into the aggregate domain. `Ok(None)` marks an absent value.
pub trait IntoDecimal {
    fn into_decimal(self) -> Result<Option<Decimal>>;
}

macro_rules! impl_into_decimal_exact {
    ($($t:ty),* $(,)?) => {
        $(
            impl IntoDecimal for $t {
                fn into_decimal(self) -> Result<Option<Decimal>> {
                    Ok(Some(Decimal::from(self)))
                }
            }
        )*
    };
}

impl_into_decimal_exact!(i8, i16, i32, i64, isize, u8, u16, u32, u64, usize);

impl IntoDecimal for f32 {
    fn into_decimal(self) -> Result<Option<Decimal>> {
        Decimal::from_f32(self)
            .map(Some)
            .ok_or_else(|| Error::TypeMismatch(format!("{self} has no decimal form")))
    }
}

impl IntoDecimal for f64 {
    fn into_decimal(self) -> Result<Option<Decimal>> {
        Decimal::from_f64(self)
            .map(Some)
            .ok_or_else(|| Error::TypeMismatch(format!("{self} has no decimal form")))
    }
}

impl IntoDecimal for Decimal {
    fn into_decimal(self) -> Result<Option<Decimal>> {
        Ok(Some(self))
    }
}

impl<N: IntoDecimal> IntoDecimal for Option<N> {
    fn into_decimal(self) -> Result<Option<Decimal>> {
        match self {
            Some(n) => n.into_decimal(),
            None => Ok(None),
        }
    }
}

fn strategy(rounding: Rounding) -> RoundingStrategy {
    match rounding {
        Rounding::HalfUp => RoundingStrategy::MidpointAwayFromZero,
        Rounding::HalfDown => RoundingStrategy::MidpointTowardZero,
        Rounding::HalfEven => RoundingStrategy::MidpointNearestEven,
        Rounding::Up => RoundingStrategy::AwayFromZero,
        Rounding::Down => RoundingStrategy::ToZero,
        Rounding::Ceiling => RoundingStrategy::ToPositiveInfinity,
        Rounding::Floor => RoundingStrategy::ToNegativeInfinity,
    }
}

fn check_scale(scale: Option<u32>) -> Result<()> {
    match scale {
        Some(s) if s > MAX_SCALE => Err(Error::invalid(format!(
            "scale {s} exceeds the maximum of {MAX_SCALE}"
        ))),
        _ => Ok(()),
    }
}

fn add(a: Decimal, b: Decimal) -> Result<Decimal> {
    a.checked_add(b)
        .ok_or_else(|| Error::invalid("decimal overflow while summing"))
}

/// `sum / count` brought to `scale` (the sum's own scale when `None`).
fn divide(sum: Decimal, count: usize, scale: Option<u32>, rounding: Rounding) -> Result<Decimal> {
    let quotient = sum
        .checked_div(Decimal::from(count))
        .ok_or_else(|| Error::invalid("decimal overflow while dividing"))?;
    let scale = scale.unwrap_or_else(|| sum.scale());
    Ok(quotient.round_dp_with_strategy(scale, strategy(rounding)))
}

impl<T: Clone + 'static> Query<T> {
    /// Present projections in source order.
    fn decimals<N, F>(&self, selector: F) -> Result<Vec<Decimal>>
    where
        N: IntoDecimal,
        F: Fn(T) -> N,
    {
        let mut values = Vec::new();
        for item in self.iter() {
            if let Some(value) = selector(item?).into_decimal()? {
                values.push(value);
            }
        }
        Ok(values)
    }

    /// Zero when nothing is present.
    pub fn sum_by<N, F>(&self, selector: F) -> Result<Decimal>
    where
        N: IntoDecimal,
        F: Fn(T) -> N,
    {
        self.decimals(selector)?
            .into_iter()
            .try_fold(Decimal::ZERO, add)
    }

    /// Mean of the present projections, `None` when there are none.
    ///
    /// The quotient is rounded to `scale` with `rounding`; without a scale it
    /// keeps the scale of the sum.
    pub fn average_with<N, F>(
        &self,
        scale: Option<u32>,
        rounding: Rounding,
        selector: F,
    ) -> Result<Option<Decimal>>
    where
        N: IntoDecimal,
        F: Fn(T) -> N,
    {
        check_scale(scale)?;
        let values = self.decimals(selector)?;
        if values.is_empty() {
            return Ok(None);
        }
        let count = values.len();
        let sum = values.into_iter().try_fold(Decimal::ZERO, add)?;
        divide(sum, count, scale, rounding).map(Some)
    }

    /// `average_with` under this chain's configured scale and rounding.
    pub fn average_by<N, F>(&self, selector: F) -> Result<Option<Decimal>>
    where
        N: IntoDecimal,
        F: Fn(T) -> N,
    {
        let config = self.config();
        self.average_with(config.decimal_scale, config.rounding, selector)
    }

    /// Middle present projection. An odd count returns the middle value as is;
    /// an even count averages the two middle values like `average_with`.
    pub fn median_with<N, F>(
        &self,
        scale: Option<u32>,
        rounding: Rounding,
        selector: F,
    ) -> Result<Option<Decimal>>
    where
        N: IntoDecimal,
        F: Fn(T) -> N,
    {
        check_scale(scale)?;
        let mut values = self.decimals(selector)?;
        values.sort();
        let len = values.len();
        let (low, high) = match (values.get((len.max(1) - 1) / 2), values.get(len / 2)) {
            (Some(low), Some(high)) => (*low, *high),
            _ => return Ok(None),
        };
        if len % 2 == 1 {
            return Ok(Some(high));
        }
        divide(add(low, high)?, 2, scale, rounding).map(Some)
    }

    pub fn median_by<N, F>(&self, selector: F) -> Result<Option<Decimal>>
    where
        N: IntoDecimal,
        F: Fn(T) -> N,
    {
        let config = self.config();
        self.median_with(config.decimal_scale, config.rounding, selector)
    }

    pub fn min_by<N, F>(&self, selector: F) -> Result<Option<Decimal>>
    where
        N: IntoDecimal,
        F: Fn(T) -> N,
    {
        Ok(self.decimals(selector)?.into_iter().min())
    }

    pub fn max_by<N, F>(&self, selector: F) -> Result<Option<Decimal>>
    where
        N: IntoDecimal,
        F: Fn(T) -> N,
    {
        Ok(self.decimals(selector)?.into_iter().max())
    }
}

impl<T: Clone + IntoDecimal + 'static> Query<T> {
    pub fn sum(&self) -> Result<Decimal> {
        self.sum_by(|x| x)
    }

    pub fn average(&self) -> Result<Option<Decimal>> {
        self.average_by(|x| x)
    }

    pub fn median(&self) -> Result<Option<Decimal>> {
        self.median_by(|x| x)
    }

    pub fn min(&self) -> Result<Option<Decimal>> {
        self.min_by(|x| x)
    }

    pub fn max(&self) -> Result<Option<Decimal>> {
        self.max_by(|x| x)
    }
}

#[cfg(test)]
mod tests {
    use std::str::FromStr;

    use super::*;
    use lazyq_core::QueryConfig;

    fn dec(s: &str) -> Decimal {
        Decimal::from_str(s).unwrap()
    }

    #[test]
    fn test_sum_skips_absent_values() {
        let q = Query::from(vec![Some(1), None, Some(4)]);
        assert_eq!(q.sum().unwrap(), dec("5"));
        assert_eq!(Query::<i32>::empty().sum().unwrap(), Decimal::ZERO);
    }

    #[test]
    fn test_average_keeps_sum_scale_by_default() {
        let q = Query::from(vec![1, 2]);
        assert_eq!(q.average().unwrap(), Some(dec("2")));
        assert_eq!(
            q.average_with(Some(2), Rounding::HalfUp, |x| x).unwrap(),
            Some(dec("1.50"))
        );
        assert_eq!(
            q.average_with(Some(0), Rounding::HalfEven, |x| x).unwrap(),
            Some(dec("2"))
        );
        assert_eq!(
            q.average_with(Some(0), Rounding::Down, |x| x).unwrap(),
            Some(dec("1"))
        );
        assert_eq!(Query::<i32>::empty().average().unwrap(), None);
    }

    #[test]
    fn test_average_uses_configured_scale() {
        let config = QueryConfig::default().with_decimal_scale(3);
        let q = Query::from(vec![1, 1, 2]).with_config(config);
        assert_eq!(q.average().unwrap(), Some(dec("1.333")));
    }

    #[test]
    fn test_median_odd_and_even() {
        assert_eq!(Query::from(vec![5, 1, 3]).median().unwrap(), Some(dec("3")));
        assert_eq!(
            Query::from(vec![4, 1, 3, 2])
                .median_with(Some(1), Rounding::HalfUp, |x| x)
                .unwrap(),
            Some(dec("2.5"))
        );
        assert_eq!(Query::<i32>::empty().median().unwrap(), None);
    }

    #[test]
    fn test_min_max_and_scale_limit() {
        let q = Query::from(vec![2.5f64, -1.0, 7.25]);
        assert_eq!(q.min().unwrap(), Some(dec("-1")));
        assert_eq!(q.max().unwrap(), Some(dec("7.25")));
        assert!(matches!(
            q.average_with(Some(MAX_SCALE + 1), Rounding::HalfUp, |x| x),
            Err(Error::InvalidArgument(_))
        ));
        assert!(matches!(
            Query::from(vec![f64::NAN]).sum(),
            Err(Error::TypeMismatch(_))
        ));
    }
}
