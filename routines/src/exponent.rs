use crate::ConversionError;
use ark_std::{string::String, vec::Vec};
use num_bigint::BigInt;
use num_traits::ToPrimitive;

/// Values usable as the exponent of [`crate::matrix_power`].
///
/// Only exact integers convert. Floats are refused even when they hold an
/// integral value, and so are strings, sequences and `None`.
pub trait Exponent {
    fn to_exponent(&self) -> Result<i64, ConversionError>;
}

macro_rules! integer_exponent {
    ($($t:ty),+) => {
        $(
            impl Exponent for $t {
                fn to_exponent(&self) -> Result<i64, ConversionError> {
                    i64::try_from(*self).map_err(|_| ConversionError::Overflow)
                }
            }
        )+
    };
}

integer_exponent!(i8, i16, i32, i64, i128, isize, u8, u16, u32, u64, u128, usize);

macro_rules! rejected_exponent {
    ($($t:ty),+) => {
        $(
            impl Exponent for $t {
                fn to_exponent(&self) -> Result<i64, ConversionError> {
                    Err(ConversionError::ToInteger)
                }
            }
        )+
    };
}

rejected_exponent!(f32, f64, str, String);

impl Exponent for BigInt {
    fn to_exponent(&self) -> Result<i64, ConversionError> {
        self.to_i64().ok_or(ConversionError::Overflow)
    }
}

impl<E: Exponent> Exponent for Option<E> {
    fn to_exponent(&self) -> Result<i64, ConversionError> {
        self.as_ref()
            .ok_or(ConversionError::ToInteger)?
            .to_exponent()
    }
}

impl<E> Exponent for [E] {
    fn to_exponent(&self) -> Result<i64, ConversionError> {
        Err(ConversionError::ToInteger)
    }
}

impl<E> Exponent for Vec<E> {
    fn to_exponent(&self) -> Result<i64, ConversionError> {
        Err(ConversionError::ToInteger)
    }
}

impl<E: Exponent + ?Sized> Exponent for &E {
    fn to_exponent(&self) -> Result<i64, ConversionError> {
        (**self).to_exponent()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_integers_convert() {
        assert_eq!(3u8.to_exponent().unwrap(), 3);
        assert_eq!((-7i32).to_exponent().unwrap(), -7);
        assert_eq!(i64::MIN.to_exponent().unwrap(), i64::MIN);
        assert_eq!(BigInt::from(-4).to_exponent().unwrap(), -4);
        assert_eq!((&5usize).to_exponent().unwrap(), 5);
        assert_eq!(Some(2i16).to_exponent().unwrap(), 2);
    }

    #[test]
    fn test_overflow() {
        assert!(matches!(
            u64::MAX.to_exponent(),
            Err(ConversionError::Overflow)
        ));
        assert!(matches!(
            (i128::from(i64::MAX) + 1).to_exponent(),
            Err(ConversionError::Overflow)
        ));
        let big: BigInt = BigInt::from(u64::MAX) * 4u8;
        assert!(matches!(big.to_exponent(), Err(ConversionError::Overflow)));
    }

    #[test]
    fn test_non_integers_rejected() {
        assert!(matches!(4.0f64.to_exponent(), Err(ConversionError::ToInteger)));
        assert!(matches!((-2.3f32).to_exponent(), Err(ConversionError::ToInteger)));
        assert!(matches!("4".to_exponent(), Err(ConversionError::ToInteger)));
        assert!(matches!(
            String::from("a").to_exponent(),
            Err(ConversionError::ToInteger)
        ));
        assert!(matches!(
            Vec::<i64>::new().to_exponent(),
            Err(ConversionError::ToInteger)
        ));
        assert!(matches!(
            None::<i64>.to_exponent(),
            Err(ConversionError::ToInteger)
        ));
        assert!(matches!(Some(1.5f64).to_exponent(), Err(ConversionError::ToInteger)));
    }
}
