//! Core fiscal calculation, invoice numbering, and duplicate guard.
//!
//! All monetary values are [`rust_decimal::Decimal`] and pass through
//! [`round_money`] on their way in and out of the calculator.

mod calc;
mod error;
mod guard;
mod money;
mod numbering;
mod period;
mod types;

pub use calc::*;
pub use error::*;
pub use guard::*;
pub use money::*;
pub use numbering::*;
pub use period::*;
pub use types::*;
