use crate::vocab::xsd;
use crate::{Date, DateTime, Numeric, ThinError, ThinResult};
use oxrdf::{BlankNodeRef, LiteralRef, NamedNodeRef, TermRef};
use std::cmp::Ordering;
use std::str::FromStr;

/// A borrowed view on an RDF term that exposes the value of literals with a supported datatype.
///
/// Literals with an unsupported datatype, or with a lexical form that is not valid for their
/// datatype, are kept as [`TypedValueRef::OtherLiteral`].
#[derive(Debug, Clone, Copy)]
pub enum TypedValueRef<'value> {
    NamedNode(NamedNodeRef<'value>),
    BlankNode(BlankNodeRef<'value>),
    Boolean(bool),
    Numeric(Numeric),
    /// A simple literal or an `xsd:string`.
    SimpleLiteral(&'value str),
    LanguageString {
        value: &'value str,
        language: &'value str,
    },
    DateTime(DateTime),
    Date(Date),
    OtherLiteral(LiteralRef<'value>),
}

impl<'value> TypedValueRef<'value> {
    /// Creates the typed view of `term`.
    pub fn from_term(term: TermRef<'value>) -> ThinResult<Self> {
        match term {
            TermRef::NamedNode(node) => Ok(Self::NamedNode(node)),
            TermRef::BlankNode(node) => Ok(Self::BlankNode(node)),
            TermRef::Literal(literal) => Ok(Self::from_literal(literal)),
            #[allow(
                unreachable_patterns,
                reason = "Quoted triples only exist if the rdf-star feature is enabled"
            )]
            _ => ThinError::expected(),
        }
    }

    /// Creates the typed view of `literal`.
    pub fn from_literal(literal: LiteralRef<'value>) -> Self {
        if let Some(language) = literal.language() {
            return Self::LanguageString {
                value: literal.value(),
                language,
            };
        }

        let datatype = literal.datatype();
        let value = literal.value();
        let typed = if datatype == xsd::STRING {
            Ok(Self::SimpleLiteral(value))
        } else if datatype == xsd::BOOLEAN {
            parse_boolean(value).map(Self::Boolean)
        } else if datatype == xsd::DATE_TIME {
            DateTime::from_str(value)
                .map(Self::DateTime)
                .map_err(ThinError::from)
        } else if datatype == xsd::DATE {
            Date::from_str(value)
                .map(Self::Date)
                .map_err(ThinError::from)
        } else {
            Numeric::from_literal(literal).map(Self::Numeric)
        };
        typed.unwrap_or(Self::OtherLiteral(literal))
    }

    /// Returns whether the underlying term is a literal.
    pub fn is_literal(&self) -> bool {
        !matches!(self, Self::NamedNode(_) | Self::BlankNode(_))
    }

    /// [Effective boolean value](https://www.w3.org/TR/sparql11-query/#ebv)
    pub fn effective_boolean_value(&self) -> ThinResult<bool> {
        match self {
            Self::Boolean(value) => Ok(*value),
            Self::Numeric(value) => Ok(!value.is_zero_or_nan()),
            Self::SimpleLiteral(value) => Ok(!value.is_empty()),
            Self::OtherLiteral(literal)
                if literal.datatype() == xsd::BOOLEAN
                    || crate::is_numeric_datatype(literal.datatype()) =>
            {
                // Ill-typed boolean or numeric literals have an effective boolean value of false.
                Ok(false)
            }
            _ => ThinError::expected(),
        }
    }

    /// [RDFterm-equal](https://www.w3.org/TR/sparql11-query/#func-RDFterm-equal) extended with
    /// value equality for the supported datatypes.
    ///
    /// Comparing two literals that cannot be compared (e.g., literals with unknown datatypes, or
    /// incomparable dateTime values) is an error.
    pub fn value_eq(&self, other: &Self) -> ThinResult<bool> {
        match (self, other) {
            (Self::NamedNode(lhs), Self::NamedNode(rhs)) => Ok(lhs == rhs),
            (Self::BlankNode(lhs), Self::BlankNode(rhs)) => Ok(lhs == rhs),
            (Self::Boolean(lhs), Self::Boolean(rhs)) => Ok(lhs == rhs),
            (Self::Numeric(lhs), Self::Numeric(rhs)) => Ok(lhs == rhs),
            (Self::SimpleLiteral(lhs), Self::SimpleLiteral(rhs)) => Ok(lhs == rhs),
            (
                Self::LanguageString {
                    value: lhs_value,
                    language: lhs_language,
                },
                Self::LanguageString {
                    value: rhs_value,
                    language: rhs_language,
                },
            ) => {
                let same_language = lhs_language.eq_ignore_ascii_case(rhs_language);
                Ok(lhs_value == rhs_value && same_language)
            }
            (Self::DateTime(lhs), Self::DateTime(rhs)) => lhs
                .partial_cmp(rhs)
                .map(|ordering| ordering == Ordering::Equal)
                .ok_or(ThinError::default()),
            (Self::Date(lhs), Self::Date(rhs)) => lhs
                .partial_cmp(rhs)
                .map(|ordering| ordering == Ordering::Equal)
                .ok_or(ThinError::default()),
            (Self::OtherLiteral(lhs), Self::OtherLiteral(rhs)) if lhs == rhs => Ok(true),
            (Self::OtherLiteral(_), other) | (other, Self::OtherLiteral(_)) => {
                if other.is_literal() {
                    ThinError::expected()
                } else {
                    Ok(false)
                }
            }
            _ => Ok(false),
        }
    }

    /// Orders two values for the SPARQL relational operators.
    ///
    /// Returns `None` if the values cannot be ordered, including incomparable dateTime values.
    pub fn partial_cmp_values(&self, other: &Self) -> Option<Ordering> {
        match (self, other) {
            (Self::Boolean(lhs), Self::Boolean(rhs)) => Some(lhs.cmp(rhs)),
            (Self::Numeric(lhs), Self::Numeric(rhs)) => lhs.partial_cmp(rhs),
            (Self::SimpleLiteral(lhs), Self::SimpleLiteral(rhs)) => Some(lhs.cmp(rhs)),
            (Self::DateTime(lhs), Self::DateTime(rhs)) => lhs.partial_cmp(rhs),
            (Self::Date(lhs), Self::Date(rhs)) => lhs.partial_cmp(rhs),
            _ => None,
        }
    }
}

fn parse_boolean(value: &str) -> ThinResult<bool> {
    match value {
        "true" | "1" => Ok(true),
        "false" | "0" => Ok(false),
        _ => ThinError::expected(),
    }
}
