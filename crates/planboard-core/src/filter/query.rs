// ── Query-string codec ──
//
// `application/x-www-form-urlencoded` in both directions, via the
// `url` crate's form codec. Multi-value filters travel as a single
// comma-joined value under one key.

use url::form_urlencoded;

use super::FilterState;

/// Parse query text into a filter snapshot.
///
/// Accepts an optional leading `?`. Pairs with an empty key or an empty
/// value are dropped, since an absent key already means "not filtered".
/// When a key repeats, the last occurrence wins and keeps the position
/// of the first.
pub fn parse_query(query: &str) -> FilterState {
    let raw = query.strip_prefix('?').unwrap_or(query);
    form_urlencoded::parse(raw.as_bytes())
        .filter(|(key, value)| !key.is_empty() && !value.is_empty())
        .map(|(key, value)| (key.into_owned(), value.into_owned()))
        .collect()
}

/// Encode key/value pairs as `k=v&k=v`, in the order given.
pub fn encode_query<'a, I>(pairs: I) -> String
where
    I: IntoIterator<Item = (&'a str, &'a str)>,
{
    form_urlencoded::Serializer::new(String::new())
        .extend_pairs(pairs)
        .finish()
}
