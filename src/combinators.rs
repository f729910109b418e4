//! Point-free helpers for composing plain, optional and fallible functions.
//!
//! Curried functions are returned as boxed closures because the inner
//! closure captures the first argument and has to be nameable in the outer
//! closure's return type.

use std::rc::Rc;

use crate::outcome::Outcome;

/// Curried function of two arguments.
pub type Curried<A, B, R> = Box<dyn Fn(A) -> Box<dyn Fn(B) -> R>>;

/// Turns a function of two arguments into a chain of single argument ones.
///
/// ```rust
/// use routcome::combinators::curry;
///
/// let add = curry(|a: i32, b: i32| a + b);
/// assert_eq!(add(1)(2), 3);
/// ```
pub fn curry<A, B, R, F>(f: F) -> impl Fn(A) -> Box<dyn Fn(B) -> R>
where
    F: Fn(A, B) -> R + 'static,
    A: Clone + 'static,
    B: 'static,
    R: 'static,
{
    let f = Rc::new(f);
    move |a: A| -> Box<dyn Fn(B) -> R> {
        let f = Rc::clone(&f);
        Box::new(move |b: B| f(a.clone(), b))
    }
}

/// Three argument version of [`curry`].
pub fn curry3<A, B, C, R, F>(f: F) -> impl Fn(A) -> Curried<B, C, R>
where
    F: Fn(A, B, C) -> R + 'static,
    A: Clone + 'static,
    B: Clone + 'static,
    C: 'static,
    R: 'static,
{
    let f = Rc::new(f);
    move |a: A| -> Curried<B, C, R> {
        let f = Rc::clone(&f);
        Box::new(move |b: B| -> Box<dyn Fn(C) -> R> {
            let f = Rc::clone(&f);
            let a = a.clone();
            Box::new(move |c: C| f(a.clone(), b.clone(), c))
        })
    }
}

/// Swaps arguments of curried function.
///
/// ```rust
/// use routcome::combinators::{curry, flip};
///
/// let minus = flip(curry(|a: i32, b: i32| a - b));
/// assert_eq!(minus(1)(10), 9);
/// ```
pub fn flip<A, B, R, F, G>(f: F) -> impl Fn(B) -> Box<dyn Fn(A) -> R>
where
    F: Fn(A) -> G + 'static,
    G: Fn(B) -> R,
    A: 'static,
    B: Clone + 'static,
    R: 'static,
{
    let f = Rc::new(f);
    move |b: B| -> Box<dyn Fn(A) -> R> {
        let f = Rc::clone(&f);
        Box::new(move |a: A| f(a)(b.clone()))
    }
}

/// Forward application, `a |> f`.
pub fn pipe<A, B, F>(a: A, f: F) -> B
where
    F: FnOnce(A) -> B,
{
    f(a)
}

/// Forward composition, `f >>> g`.
pub fn compose<A, B, C, F, G>(f: F, g: G) -> impl Fn(A) -> C
where
    F: Fn(A) -> B,
    G: Fn(B) -> C,
{
    move |a| g(f(a))
}

/// Kleisli composition over `Option`. `g` is skipped when `f` yields `None`.
pub fn compose_option<A, B, C, F, G>(f: F, g: G) -> impl Fn(A) -> Option<C>
where
    F: Fn(A) -> Option<B>,
    G: Fn(B) -> Option<C>,
{
    move |a| f(a).and_then(&g)
}

/// Kleisli composition over [`Outcome`]. Both steps share failure type and
/// `g` is skipped when `f` fails.
pub fn compose_outcome<A, B, C, E, F, G>(f: F, g: G) -> impl Fn(A) -> Outcome<C, E>
where
    F: Fn(A) -> Outcome<B, E>,
    G: Fn(B) -> Outcome<C, E>,
{
    move |a| f(a).flat_map(&g)
}

/// Applicative apply, `f <*> x`.
///
/// Failure of the function side wins when both sides failed.
pub fn ap<A, B, E, F>(f: Outcome<F, E>, x: Outcome<A, E>) -> Outcome<B, E>
where
    F: FnOnce(A) -> B,
{
    f.flat_map(|f| x.map(f))
}

/// Maps over the successful result of a fallible function, `f <^> g`.
pub fn map_after<A, B, C, E, F, G>(f: F, g: G) -> impl Fn(A) -> Outcome<C, E>
where
    F: Fn(A) -> Outcome<B, E>,
    G: Fn(B) -> C,
{
    move |a| f(a).map(&g)
}

/// Failure coalescing, `outcome ?? default`. `default` only runs on failure.
pub fn coalesce<A, E, D>(outcome: Outcome<A, E>, default: D) -> A
where
    D: FnOnce() -> A,
{
    outcome.unwrap_or_else(default)
}

/// Coalescing lifted to fallible functions.
pub fn coalesce_with<A, B, E, F, D>(f: F, default: D) -> impl Fn(A) -> B
where
    F: Fn(A) -> Outcome<B, E>,
    D: Fn() -> B,
{
    move |a| coalesce(f(a), &default)
}
