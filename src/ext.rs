use crate::outcome::Outcome;

/// Lifts `Option` into [`Outcome`].
pub trait OptionExt<T> {
    /// `Some` becomes `Success`, `None` becomes `Failure(failure)`.
    fn outcome<F>(self, failure: F) -> Outcome<T, F>;
}

impl<T> OptionExt<T> for Option<T> {
    fn outcome<F>(self, failure: F) -> Outcome<T, F> {
        match self {
            Some(value) => Outcome::Success(value),
            None => Outcome::Failure(failure),
        }
    }
}

pub trait IteratorExt<S, F>: Iterator<Item = Outcome<S, F>> + Sized {
    /// Keeps successful values in order, failures are dropped.
    ///
    /// ```rust
    /// use routcome::{ext::IteratorExt, Outcome};
    ///
    /// let parsed: Vec<i32> = ["1", "x", "3"]
    ///     .into_iter()
    ///     .map(|s| Outcome::from(s.parse::<i32>()))
    ///     .successes()
    ///     .collect();
    /// assert_eq!(parsed, vec![1, 3]);
    /// ```
    fn successes(self) -> Successes<Self> {
        Successes { inner: self }
    }
}

impl<I, S, F> IteratorExt<S, F> for I where I: Iterator<Item = Outcome<S, F>> {}

/// Iterator returned by [`IteratorExt::successes`].
pub struct Successes<I> {
    inner: I,
}

impl<I, S, F> Iterator for Successes<I>
where
    I: Iterator<Item = Outcome<S, F>>,
{
    type Item = S;

    fn next(&mut self) -> Option<S> {
        self.inner.find_map(Outcome::to_optional)
    }
}
