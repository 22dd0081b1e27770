//! Rusty-Forms-Validation Core
//!
//! Pure predicate functions for registration form fields. Every predicate
//! takes the submitted value (and optionally a rule parameter) and answers
//! with a plain `bool`; none of them allocate state or fail loudly on bad
//! parameters.
//!
//! ```
//! use rusty_forms_validation::{must_include, is_valid_date, DateFormat};
//!
//! assert!(must_include("Abc123!", "number,uppercase,special"));
//! assert!(is_valid_date("29.02.2024", DateFormat::DayMonthYear));
//! ```

pub mod charset;
pub mod date;
pub mod email;
pub mod numeric;
pub mod string;

// Re-export all validators
pub use charset::*;
pub use date::*;
pub use email::*;
pub use numeric::*;
pub use string::*;
