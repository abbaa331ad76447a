//! Positive cart quantities.

use core::fmt;

use serde::{Deserialize, Serialize};

/// Error returned when a quantity is not a positive integer.
#[derive(thiserror::Error, Debug, Clone, Copy, PartialEq, Eq)]
#[error("quantity must be a positive integer")]
pub struct QuantityError;

/// A cart-line quantity.
///
/// Quantities are validated once, at the edge where the value enters the
/// system (cart add). Checkout does not re-validate positivity; it only
/// compares demand against stock.
///
/// ## Examples
///
/// ```
/// use market_lane_core::Quantity;
///
/// assert!(Quantity::new(1).is_ok());
/// assert!(Quantity::new(0).is_err());
/// assert!(Quantity::new(-3).is_err());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "i32", into = "i32")]
pub struct Quantity(i32);

impl Quantity {
    /// Create a quantity, rejecting zero and negative values.
    ///
    /// # Errors
    ///
    /// Returns [`QuantityError`] if `value <= 0`.
    pub const fn new(value: i32) -> Result<Self, QuantityError> {
        if value > 0 {
            Ok(Self(value))
        } else {
            Err(QuantityError)
        }
    }

    /// Get the underlying i32 value.
    #[must_use]
    pub const fn get(self) -> i32 {
        self.0
    }
}

impl fmt::Display for Quantity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl TryFrom<i32> for Quantity {
    type Error = QuantityError;

    fn try_from(value: i32) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<Quantity> for i32 {
    fn from(q: Quantity) -> Self {
        q.0
    }
}

#[cfg(feature = "postgres")]
impl sqlx::Type<sqlx::Postgres> for Quantity {
    fn type_info() -> sqlx::postgres::PgTypeInfo {
        <i32 as sqlx::Type<sqlx::Postgres>>::type_info()
    }

    fn compatible(ty: &sqlx::postgres::PgTypeInfo) -> bool {
        <i32 as sqlx::Type<sqlx::Postgres>>::compatible(ty)
    }
}

#[cfg(feature = "postgres")]
impl<'r> sqlx::Decode<'r, sqlx::Postgres> for Quantity {
    fn decode(value: sqlx::postgres::PgValueRef<'r>) -> Result<Self, sqlx::error::BoxDynError> {
        let v = <i32 as sqlx::Decode<sqlx::Postgres>>::decode(value)?;
        Ok(Self::new(v)?)
    }
}

#[cfg(feature = "postgres")]
impl sqlx::Encode<'_, sqlx::Postgres> for Quantity {
    fn encode_by_ref(
        &self,
        buf: &mut sqlx::postgres::PgArgumentBuffer,
    ) -> Result<sqlx::encode::IsNull, sqlx::error::BoxDynError> {
        <i32 as sqlx::Encode<sqlx::Postgres>>::encode_by_ref(&self.0, buf)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_positive_accepted() {
        assert_eq!(Quantity::new(1).unwrap().get(), 1);
        assert_eq!(Quantity::new(250).unwrap().get(), 250);
    }

    #[test]
    fn test_zero_rejected() {
        assert_eq!(Quantity::new(0), Err(QuantityError));
    }

    #[test]
    fn test_negative_rejected() {
        assert_eq!(Quantity::new(-1), Err(QuantityError));
        assert_eq!(Quantity::new(i32::MIN), Err(QuantityError));
    }

    #[test]
    fn test_try_from() {
        let q: Quantity = 4i32.try_into().unwrap();
        assert_eq!(i32::from(q), 4);
    }

    #[test]
    fn test_serde_roundtrip() {
        let q = Quantity::new(3).unwrap();
        assert_eq!(serde_json::to_string(&q).unwrap(), "3");
        let parsed: Quantity = serde_json::from_str("3").unwrap();
        assert_eq!(parsed, q);
    }

    #[test]
    fn test_serde_rejects_non_positive() {
        assert!(serde_json::from_str::<Quantity>("0").is_err());
        assert!(serde_json::from_str::<Quantity>("-2").is_err());
    }
}
