/// Name of the cookie Django stores its CSRF token in.
pub(crate) const CSRF_COOKIE: &str = "csrftoken";

/// Returns the value of `name` from a `Cookie`-header-shaped string
/// (`a=1; b=2`). Empty values are treated as absent.
pub(crate) fn cookie_value<'a>(cookies: &'a str, name: &str) -> Option<&'a str> {
    cookies
        .split(';')
        .filter_map(|part| part.trim().split_once('='))
        .find_map(|(key, value)| {
            let value = value.trim();
            (key.trim() == name && !value.is_empty()).then_some(value)
        })
}
