use crate::xsd::is_integer_datatype;
use crate::{ThinError, ThinResult};
use oxrdf::vocab::xsd;
use oxrdf::{Literal, LiteralRef};
use oxsdatatypes::{Decimal, Double, Integer};
use std::cmp::Ordering;
use std::str::FromStr;

/// A numeric value of one of the SPARQL numeric datatypes.
///
/// `xsd:float` values are promoted to [`Numeric::Double`] when read from a literal.
#[derive(Copy, Clone, Debug)]
pub enum Numeric {
    Integer(Integer),
    Decimal(Decimal),
    Double(Double),
}

impl Numeric {
    /// Reads a numeric value from a literal with a numeric datatype.
    ///
    /// Returns an error for non-numeric datatypes and ill-typed lexical forms.
    pub fn from_literal(literal: LiteralRef<'_>) -> ThinResult<Self> {
        let datatype = literal.datatype();
        let value = literal.value();
        if is_integer_datatype(datatype) {
            Ok(Numeric::Integer(Integer::from_str(value)?))
        } else if datatype == xsd::DECIMAL {
            Ok(Numeric::Decimal(Decimal::from_str(value)?))
        } else if datatype == xsd::DOUBLE || datatype == xsd::FLOAT {
            Ok(Numeric::Double(Double::from_str(value)?))
        } else {
            ThinError::expected()
        }
    }

    /// Creates a literal with the canonical lexical form of this value.
    pub fn to_literal(self) -> Literal {
        match self {
            Numeric::Integer(value) => Literal::new_typed_literal(value.to_string(), xsd::INTEGER),
            Numeric::Decimal(value) => Literal::new_typed_literal(value.to_string(), xsd::DECIMAL),
            Numeric::Double(value) => Literal::new_typed_literal(value.to_string(), xsd::DOUBLE),
        }
    }

    /// Returns whether this value is zero or NaN, i.e. whether its effective boolean value is
    /// `false`.
    pub fn is_zero_or_nan(self) -> bool {
        match self {
            Numeric::Integer(value) => i64::from(value) == 0,
            Numeric::Decimal(value) => value == Decimal::from(Integer::from(0)),
            Numeric::Double(value) => {
                let value = f64::from(value);
                value == 0.0 || value.is_nan()
            }
        }
    }

    /// Returns whether this value is a double NaN.
    pub fn is_nan(self) -> bool {
        matches!(self, Numeric::Double(value) if f64::from(value).is_nan())
    }

    /// [op:numeric-add](https://www.w3.org/TR/xpath-functions-31/#func-numeric-add)
    pub fn checked_add(self, rhs: Self) -> ThinResult<Self> {
        match NumericPair::with_casts_from(self, rhs) {
            NumericPair::Integer(lhs, rhs) => lhs.checked_add(rhs).map(Numeric::Integer),
            NumericPair::Decimal(lhs, rhs) => lhs.checked_add(rhs).map(Numeric::Decimal),
            NumericPair::Double(lhs, rhs) => Some(Numeric::Double(lhs + rhs)),
        }
        .ok_or(ThinError::default())
    }

    /// [op:numeric-subtract](https://www.w3.org/TR/xpath-functions-31/#func-numeric-subtract)
    pub fn checked_sub(self, rhs: Self) -> ThinResult<Self> {
        match NumericPair::with_casts_from(self, rhs) {
            NumericPair::Integer(lhs, rhs) => lhs.checked_sub(rhs).map(Numeric::Integer),
            NumericPair::Decimal(lhs, rhs) => lhs.checked_sub(rhs).map(Numeric::Decimal),
            NumericPair::Double(lhs, rhs) => Some(Numeric::Double(lhs - rhs)),
        }
        .ok_or(ThinError::default())
    }

    /// [op:numeric-multiply](https://www.w3.org/TR/xpath-functions-31/#func-numeric-multiply)
    pub fn checked_mul(self, rhs: Self) -> ThinResult<Self> {
        match NumericPair::with_casts_from(self, rhs) {
            NumericPair::Integer(lhs, rhs) => lhs.checked_mul(rhs).map(Numeric::Integer),
            NumericPair::Decimal(lhs, rhs) => lhs.checked_mul(rhs).map(Numeric::Decimal),
            NumericPair::Double(lhs, rhs) => Some(Numeric::Double(lhs * rhs)),
        }
        .ok_or(ThinError::default())
    }

    /// [op:numeric-divide](https://www.w3.org/TR/xpath-functions-31/#func-numeric-divide)
    ///
    /// Dividing two integers yields a decimal. Division by zero is an error for integers and
    /// decimals.
    pub fn checked_div(self, rhs: Self) -> ThinResult<Self> {
        match NumericPair::with_casts_from(self, rhs) {
            NumericPair::Integer(lhs, rhs) => {
                Decimal::from(lhs).checked_div(rhs).map(Numeric::Decimal)
            }
            NumericPair::Decimal(lhs, rhs) => lhs.checked_div(rhs).map(Numeric::Decimal),
            NumericPair::Double(lhs, rhs) => Some(Numeric::Double(lhs / rhs)),
        }
        .ok_or(ThinError::default())
    }

    /// [op:numeric-unary-minus](https://www.w3.org/TR/xpath-functions-31/#func-numeric-unary-minus)
    pub fn checked_neg(self) -> ThinResult<Self> {
        match self {
            Numeric::Integer(value) => value.checked_neg().map(Numeric::Integer),
            Numeric::Decimal(value) => value.checked_neg().map(Numeric::Decimal),
            Numeric::Double(value) => Some(Numeric::Double(-value)),
        }
        .ok_or(ThinError::default())
    }
}

impl From<i64> for Numeric {
    fn from(value: i64) -> Self {
        Numeric::Integer(value.into())
    }
}

impl PartialEq for Numeric {
    fn eq(&self, other: &Self) -> bool {
        self.partial_cmp(other) == Some(Ordering::Equal)
    }
}

impl PartialOrd for Numeric {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        match NumericPair::with_casts_from(*self, *other) {
            NumericPair::Integer(lhs, rhs) => Some(lhs.cmp(&rhs)),
            NumericPair::Decimal(lhs, rhs) => Some(lhs.cmp(&rhs)),
            NumericPair::Double(lhs, rhs) => lhs.partial_cmp(&rhs),
        }
    }
}

/// Two numeric values promoted to their common type following the
/// [SPARQL operator mapping](https://www.w3.org/TR/sparql11-query/#OperatorMapping).
pub enum NumericPair {
    Integer(Integer, Integer),
    Decimal(Decimal, Decimal),
    Double(Double, Double),
}

impl NumericPair {
    pub fn with_casts_from(lhs: Numeric, rhs: Numeric) -> NumericPair {
        match (lhs, rhs) {
            (Numeric::Integer(lhs), Numeric::Integer(rhs)) => NumericPair::Integer(lhs, rhs),
            (Numeric::Integer(lhs), Numeric::Decimal(rhs)) => {
                NumericPair::Decimal(Decimal::from(lhs), rhs)
            }
            (Numeric::Integer(lhs), Numeric::Double(rhs)) => NumericPair::Double(lhs.into(), rhs),

            (Numeric::Decimal(lhs), Numeric::Integer(rhs)) => {
                NumericPair::Decimal(lhs, Decimal::from(rhs))
            }
            (Numeric::Decimal(lhs), Numeric::Decimal(rhs)) => NumericPair::Decimal(lhs, rhs),
            (Numeric::Decimal(lhs), Numeric::Double(rhs)) => NumericPair::Double(lhs.into(), rhs),

            (Numeric::Double(lhs), Numeric::Integer(rhs)) => NumericPair::Double(lhs, rhs.into()),
            (Numeric::Double(lhs), Numeric::Decimal(rhs)) => NumericPair::Double(lhs, rhs.into()),
            (Numeric::Double(lhs), Numeric::Double(rhs)) => NumericPair::Double(lhs, rhs),
        }
    }
}
