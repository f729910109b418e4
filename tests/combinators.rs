use routcome::{
    combinators::{
        ap, coalesce_with, compose, compose_option, compose_outcome, curry, curry3, flip,
        map_after, pipe,
    },
    ext::OptionExt,
    Outcome,
};

#[derive(Debug, Clone, PartialEq)]
struct Person {
    name: String,
    age: u32,
    hobby: Option<String>,
}

impl Person {
    fn new(name: String, age: u32, hobby: Option<String>) -> Self {
        Self { name, age, hobby }
    }
}

#[derive(Debug, Clone, PartialEq)]
enum MyError {
    UhOh(String),
}

fn validate_hobby(hobby: Option<&str>) -> Outcome<Option<String>, MyError> {
    hobby
        .map(|h| Some(h.to_string()))
        .outcome(MyError::UhOh("Hobby Was Nil".into()))
}

fn clamping(value: i32, range: std::ops::Range<i32>) -> i32 {
    if range.start == range.end {
        return range.end;
    }
    value.clamp(range.start, range.end - 1)
}

#[test]
fn test_curry_and_flip() {
    let add = curry(|a: i32, b: i32| a + b);
    let add_two = add(2);
    assert_eq!(add_two(3), 5);
    assert_eq!(add_two(40), 42);

    let clamped_by = flip(curry(clamping));
    let single_digit = clamped_by(-9..10);
    assert_eq!(single_digit(18), 9);
    assert_eq!(single_digit(-30), -9);
    assert_eq!(single_digit(4), 4);

    let person = curry3(Person::new);
    assert_eq!(
        person("Bobby".into())(13)(None),
        Person::new("Bobby".into(), 13, None)
    );
}

#[test]
fn test_pipe_and_compose() {
    let double = |x: i32| x * 2;
    let describe = |x: i32| format!("got {}", x);

    assert_eq!(pipe(21, double), 42);
    assert_eq!(compose(double, describe)(4), "got 8");
}

#[test]
fn test_compose_option_short_circuits() {
    let half = |x: i32| (x % 2 == 0).then(|| x / 2);
    let quarter = compose_option(half, half);

    assert_eq!(quarter(8), Some(2));
    assert_eq!(quarter(6), None);
    assert_eq!(quarter(3), None);
}

#[test]
fn test_compose_outcome_short_circuits() {
    let parse = |s: &str| Outcome::from(s.parse::<i32>().map_err(|e| e.to_string()));
    let positive = |x: i32| match x > 0 {
        true => Outcome::Success(x as u32),
        false => Outcome::Failure(format!("{} is not positive", x)),
    };

    let parse_positive = compose_outcome(parse, positive);
    assert_eq!(parse_positive("12"), Outcome::Success(12));
    assert_eq!(
        parse_positive("-3"),
        Outcome::Failure("-3 is not positive".to_string())
    );
    assert_eq!(
        parse_positive("x"),
        Outcome::Failure("invalid digit found in string".to_string())
    );

    let never = compose_outcome(parse, |_: i32| -> Outcome<u32, String> {
        panic!("second step called after failure")
    });
    assert!(never("x").is_failure());
}

#[test]
fn test_ap_builds_person() {
    let person = ap(
        ap(
            ap(Outcome::pure(curry3(Person::new)), Outcome::pure("Bobby".to_string())),
            Outcome::pure(13),
        ),
        validate_hobby(Some("Video Games")),
    );
    assert_eq!(
        person,
        Outcome::Success(Person::new(
            "Bobby".into(),
            13,
            Some("Video Games".into())
        ))
    );

    let missing = ap(
        ap(
            ap(Outcome::pure(curry3(Person::new)), Outcome::pure("Bobby".to_string())),
            Outcome::pure(13),
        ),
        validate_hobby(None),
    );
    assert_eq!(missing, Outcome::Failure(MyError::UhOh("Hobby Was Nil".into())));
}

#[test]
fn test_ap_is_left_biased() {
    let f: Outcome<fn(i32) -> i32, MyError> = Outcome::Failure(MyError::UhOh("function".into()));
    let x: Outcome<i32, MyError> = Outcome::Failure(MyError::UhOh("value".into()));

    assert_eq!(ap(f, x), Outcome::Failure(MyError::UhOh("function".into())));

    let f: Outcome<fn(i32) -> i32, MyError> = Outcome::Success(|x| x + 1);
    let x: Outcome<i32, MyError> = Outcome::Failure(MyError::UhOh("value".into()));
    assert_eq!(ap(f, x), Outcome::Failure(MyError::UhOh("value".into())));

    let f: Outcome<fn(i32) -> i32, MyError> = Outcome::Success(|x| x + 1);
    assert_eq!(ap(f, Outcome::Success(1)), Outcome::Success(2));
}

#[test]
fn test_map_after_and_coalesce_with() {
    let parse = |s: &str| Outcome::from(s.parse::<i32>());

    let doubled = map_after(parse, |x: i32| x * 2);
    assert_eq!(doubled("21"), Outcome::Success(42));
    assert!(doubled("x").is_failure());

    let or_zero = coalesce_with(parse, || 0);
    assert_eq!(or_zero("7"), 7);
    assert_eq!(or_zero("seven"), 0);
}
