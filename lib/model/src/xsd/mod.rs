mod date;
mod date_time;
mod numeric;
mod parser;
mod timeline;
mod timezone;

pub use date::Date;
pub use date_time::DateTime;
pub use numeric::{Numeric, NumericPair};
pub use parser::{ParseDateTimeError, ParseDateTimeErrorKind};
pub use timeline::{compare_nullable, days_in_month, is_leap_year, TimelinePosition};
pub use timezone::{Timezone, MAX_TIMEZONE_OFFSET_MINUTES};

use oxrdf::vocab::xsd;
use oxrdf::NamedNodeRef;

/// Checks if the datatype is one of the integer datatypes derived from `xsd:decimal`.
pub fn is_integer_datatype(datatype: NamedNodeRef<'_>) -> bool {
    const INTEGER_DATATYPES: [NamedNodeRef<'static>; 13] = [
        xsd::INTEGER,
        xsd::BYTE,
        xsd::SHORT,
        xsd::INT,
        xsd::LONG,
        xsd::UNSIGNED_BYTE,
        xsd::UNSIGNED_SHORT,
        xsd::UNSIGNED_INT,
        xsd::UNSIGNED_LONG,
        xsd::POSITIVE_INTEGER,
        xsd::NEGATIVE_INTEGER,
        xsd::NON_POSITIVE_INTEGER,
        xsd::NON_NEGATIVE_INTEGER,
    ];
    INTEGER_DATATYPES.contains(&datatype)
}

/// Checks if the datatype is a numeric datatype.
pub fn is_numeric_datatype(datatype: NamedNodeRef<'_>) -> bool {
    is_integer_datatype(datatype)
        || datatype == xsd::DECIMAL
        || datatype == xsd::FLOAT
        || datatype == xsd::DOUBLE
}
