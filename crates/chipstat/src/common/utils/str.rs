use std::borrow::Cow;

/// Return the input string with an added "s" at the end if `count` is larger than one and non-zero.
pub fn pluralize(value: &str, count: usize) -> Cow<'_, str> {
    if count == 1 {
        Cow::Borrowed(value)
    } else {
        Cow::Owned(format!("{value}s"))
    }
}

/// Concatenates all decimal digits of `value`, e.g. `W72F1` => `721`.
pub fn embedded_digits(value: &str) -> String {
    value.chars().filter(|c| c.is_ascii_digit()).collect()
}
