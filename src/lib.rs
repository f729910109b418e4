//! Success/failure container with functional combinators, a JSON codec and a
//! single endpoint HTTP client reporting through it.
//!
//! ```rust
//! use routcome::{combinators::compose_outcome, Outcome};
//!
//! fn doubles_a_single(digit: i32) -> Outcome<i32, String> {
//!     match (-9..10).contains(&digit) {
//!         true => Outcome::Success(2 * digit),
//!         false => Outcome::Failure(format!("{} is not a single digit!", digit)),
//!     }
//! }
//!
//! let quadruple = compose_outcome(doubles_a_single, doubles_a_single);
//! assert_eq!(quadruple(2), Outcome::Success(8));
//! assert!(quadruple(5).to_optional().is_none());
//! ```

pub mod combinators;
pub mod ext;
pub mod http;
pub mod json;
pub mod middleware;
pub mod outcome;
pub mod testing;
pub mod transport;

pub use http::{HttpClient, HttpFailure};
pub use json::CodingFailure;
pub use outcome::Outcome;
