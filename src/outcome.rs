/// Result of a computation that can either succeed with `S` or fail with `F`.
///
/// Every transformation consumes the value and produces a new `Outcome`,
/// nothing is mutated in place.
///
/// ```rust
/// use routcome::Outcome;
///
/// let doubled: Outcome<i32, String> = Outcome::pure(21).map(|v| v * 2);
/// assert_eq!(doubled, Outcome::Success(42));
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Outcome<S, F> {
    Success(S),
    Failure(F),
}

impl<S, F> Outcome<S, F> {
    /// Lifts bare value into `Success`.
    pub fn pure(value: S) -> Self {
        Self::Success(value)
    }

    pub fn is_successful(&self) -> bool {
        matches!(self, Self::Success(_))
    }

    pub fn is_failure(&self) -> bool {
        !self.is_successful()
    }

    /// Optional representation, failure is dropped.
    pub fn to_optional(self) -> Option<S> {
        match self {
            Self::Success(value) => Some(value),
            Self::Failure(_) => None,
        }
    }

    /// Returns failure value if there is one.
    pub fn failure(self) -> Option<F> {
        match self {
            Self::Success(_) => None,
            Self::Failure(error) => Some(error),
        }
    }

    pub fn as_ref(&self) -> Outcome<&S, &F> {
        match self {
            Self::Success(value) => Outcome::Success(value),
            Self::Failure(error) => Outcome::Failure(error),
        }
    }

    /// Transforms success value, failure passes through untouched.
    pub fn map<S2, T>(self, transform: T) -> Outcome<S2, F>
    where
        T: FnOnce(S) -> S2,
    {
        match self {
            Self::Success(value) => Outcome::Success(transform(value)),
            Self::Failure(error) => Outcome::Failure(error),
        }
    }

    /// Transforms failure value, success passes through untouched.
    pub fn map_error<F2, T>(self, transform: T) -> Outcome<S, F2>
    where
        T: FnOnce(F) -> F2,
    {
        match self {
            Self::Success(value) => Outcome::Success(value),
            Self::Failure(error) => Outcome::Failure(transform(error)),
        }
    }

    /// Chains another fallible step. `transform` is never called on failure.
    pub fn flat_map<S2, T>(self, transform: T) -> Outcome<S2, F>
    where
        T: FnOnce(S) -> Outcome<S2, F>,
    {
        match self {
            Self::Success(value) => transform(value),
            Self::Failure(error) => Outcome::Failure(error),
        }
    }

    /// Turns failure into a new attempt which may itself succeed or fail.
    ///
    /// ```rust
    /// use routcome::Outcome;
    ///
    /// let recovered = Outcome::<i32, &str>::Failure("too big")
    ///     .flat_map_error(|_| Outcome::<i32, String>::Success(9));
    /// assert_eq!(recovered, Outcome::Success(9));
    /// ```
    pub fn flat_map_error<F2, T>(self, transform: T) -> Outcome<S, F2>
    where
        T: FnOnce(F) -> Outcome<S, F2>,
    {
        match self {
            Self::Success(value) => Outcome::Success(value),
            Self::Failure(error) => transform(error),
        }
    }

    /// Map ignoring the received value.
    pub fn replace<S2>(self, new_value: S2) -> Outcome<S2, F> {
        self.map(|_| new_value)
    }

    /// Runs exactly one of the hooks, depending on the variant, and returns
    /// self unchanged so calls can be chained.
    pub fn on_each<OF, OS>(self, on_failure: OF, on_success: OS) -> Self
    where
        OF: FnOnce(&F),
        OS: FnOnce(&S),
    {
        match &self {
            Self::Success(value) => on_success(value),
            Self::Failure(error) => on_failure(error),
        }
        self
    }

    pub fn on_success<OS>(self, on_success: OS) -> Self
    where
        OS: FnOnce(&S),
    {
        self.on_each(|_| {}, on_success)
    }

    pub fn on_failure<OF>(self, on_failure: OF) -> Self
    where
        OF: FnOnce(&F),
    {
        self.on_each(on_failure, |_| {})
    }

    pub fn unwrap_or(self, default: S) -> S {
        self.unwrap_or_else(|| default)
    }

    /// `default` is evaluated only on failure.
    pub fn unwrap_or_else<D>(self, default: D) -> S
    where
        D: FnOnce() -> S,
    {
        match self {
            Self::Success(value) => value,
            Self::Failure(_) => default(),
        }
    }

    pub fn into_result(self) -> Result<S, F> {
        self.into()
    }
}

impl<S, F> From<Result<S, F>> for Outcome<S, F> {
    fn from(result: Result<S, F>) -> Self {
        match result {
            Ok(value) => Self::Success(value),
            Err(error) => Self::Failure(error),
        }
    }
}

impl<S, F> From<Outcome<S, F>> for Result<S, F> {
    fn from(outcome: Outcome<S, F>) -> Self {
        match outcome {
            Outcome::Success(value) => Ok(value),
            Outcome::Failure(error) => Err(error),
        }
    }
}
