//! Error codes and error reporting for the Tplus template compiler.
//!
//! Every compiler layer returns [`CompileError`]. Each error carries an
//! [`ErrorCode`] whose range decides its [`ErrorKind`]:
//!
//! - **Syntax**: malformed tag or expression, always attributable to a
//!   template line (and, when available, the raw tag text).
//! - **Fatal**: mismatch with the environment, e.g. an undefined function,
//!   an unregistered wrapper method or an unwritable artifact root.
//!
//! Both kinds abort the compile of the current template. [`Report`] renders
//! them for the operator log and for the optional inline HTML report.

mod error;
mod error_code;
mod report;

pub use error::CompileError;
pub use error_code::{ErrorCode, ErrorKind, ALL_CODES};
pub use report::Report;
