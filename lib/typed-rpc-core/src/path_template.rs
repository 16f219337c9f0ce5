//! URL path templates.
//!
//! A template is written with `{name}` placeholders (`/items/{id}`); the
//! `:name` form used by some routers is accepted too. [`PathTemplate::expand`]
//! substitutes percent-encoded values on the client side and
//! [`PathTemplate::to_route`] renders the router syntax on the server side.

use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;

use percent_encoding::{AsciiSet, CONTROLS, utf8_percent_encode};

use crate::{Error, Result};

/// Encodes everything but unreserved characters and sub-delimiters.
const PATH_SEGMENT_ENCODE_SET: &AsciiSet = &CONTROLS
    .add(b' ')
    .add(b'"')
    .add(b'#')
    .add(b'<')
    .add(b'>')
    .add(b'`')
    .add(b'?')
    .add(b'{')
    .add(b'}')
    .add(b'/')
    .add(b'\\')
    .add(b'%');

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
enum Segment {
    Literal(String),
    Param(String),
}

/// A parsed URL path template.
///
/// Cheap to clone. Stored in request extensions so middleware can see the
/// template (`/items/{id}`) rather than the resolved path (`/items/42`).
///
/// # Example
///
/// ```
/// use std::collections::BTreeMap;
/// use typed_rpc_core::PathTemplate;
///
/// let template = PathTemplate::new("/items/:id");
/// assert_eq!(template.to_route(), "/items/{id}");
///
/// let params = BTreeMap::from([("id".to_string(), "a b".to_string())]);
/// assert_eq!(template.expand(&params).expect("bound"), "/items/a%20b");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct PathTemplate {
    raw: Arc<str>,
    segments: Arc<[Segment]>,
}

impl PathTemplate {
    /// Parse a template.
    ///
    /// Parsing is total: an unterminated or empty `{` is kept as literal text.
    #[must_use]
    pub fn new(template: &str) -> Self {
        let segments = parse(template);
        Self {
            raw: Arc::from(template),
            segments: segments.into(),
        }
    }

    /// Get the template string as written.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.raw
    }

    /// Placeholder names, in order of appearance.
    pub fn placeholders(&self) -> impl Iterator<Item = &str> {
        self.segments.iter().filter_map(|segment| match segment {
            Segment::Param(name) => Some(name.as_str()),
            Segment::Literal(_) => None,
        })
    }

    /// Substitute every placeholder with its percent-encoded value.
    ///
    /// Values without a matching placeholder are ignored.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidRequest`] if a placeholder has no value.
    pub fn expand(&self, params: &BTreeMap<String, String>) -> Result<String> {
        let mut path = String::with_capacity(self.raw.len());
        for segment in self.segments.iter() {
            match segment {
                Segment::Literal(text) => path.push_str(text),
                Segment::Param(name) => {
                    let value = params.get(name).ok_or_else(|| {
                        Error::invalid_request(format!(
                            "path parameter '{name}' of '{}' is not bound",
                            self.raw
                        ))
                    })?;
                    path.extend(utf8_percent_encode(value, PATH_SEGMENT_ENCODE_SET));
                }
            }
        }
        Ok(path)
    }

    /// Render the route syntax understood by the server router (`{name}`).
    #[must_use]
    pub fn to_route(&self) -> String {
        let mut route = String::with_capacity(self.raw.len());
        for segment in self.segments.iter() {
            match segment {
                Segment::Literal(text) => route.push_str(text),
                Segment::Param(name) => {
                    route.push('{');
                    route.push_str(name);
                    route.push('}');
                }
            }
        }
        route
    }
}

fn parse(template: &str) -> Vec<Segment> {
    let mut segments = Vec::new();
    let mut literal = String::new();
    let mut rest = template;
    let mut prev = None;

    loop {
        let mut chars = rest.chars();
        let Some(ch) = chars.next() else {
            break;
        };
        let after = chars.as_str();

        let param = match ch {
            '{' => after
                .split_once('}')
                .filter(|(name, _)| !name.is_empty() && !name.contains(['/', '{'])),
            ':' if matches!(prev, None | Some('/')) => {
                let (name, tail) = after
                    .find('/')
                    .map_or((after, ""), |end| after.split_at(end));
                (!name.is_empty()).then_some((name, tail))
            }
            _ => None,
        };

        match param {
            Some((name, tail)) => {
                if !literal.is_empty() {
                    segments.push(Segment::Literal(std::mem::take(&mut literal)));
                }
                segments.push(Segment::Param(name.to_string()));
                rest = tail;
                prev = Some('}');
            }
            None => {
                literal.push(ch);
                rest = after;
                prev = Some(ch);
            }
        }
    }

    if !literal.is_empty() {
        segments.push(Segment::Literal(literal));
    }
    segments
}

impl fmt::Display for PathTemplate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.raw)
    }
}

impl AsRef<str> for PathTemplate {
    fn as_ref(&self) -> &str {
        &self.raw
    }
}

impl From<&str> for PathTemplate {
    fn from(template: &str) -> Self {
        Self::new(template)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn params(pairs: &[(&str, &str)]) -> BTreeMap<String, String> {
        pairs
            .iter()
            .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
            .collect()
    }

    #[test]
    fn placeholders_in_both_syntaxes() {
        let braces = PathTemplate::new("/users/{id}/posts/{post_id}");
        assert_eq!(braces.placeholders().collect::<Vec<_>>(), ["id", "post_id"]);

        let colons = PathTemplate::new("/users/:id/posts/:post_id");
        assert_eq!(colons.placeholders().collect::<Vec<_>>(), ["id", "post_id"]);
        assert_eq!(colons.to_route(), "/users/{id}/posts/{post_id}");
    }

    #[test]
    fn expand_encodes_values() {
        let template = PathTemplate::new("/files/{name}");
        let path = template
            .expand(&params(&[("name", "a/b c?.txt")]))
            .expect("bound");
        assert_eq!(path, "/files/a%2Fb%20c%3F.txt");
    }

    #[test]
    fn expand_ignores_extra_values() {
        let template = PathTemplate::new("/items/{id}");
        let path = template
            .expand(&params(&[("id", "42"), ("unused", "x")]))
            .expect("bound");
        assert_eq!(path, "/items/42");
    }

    #[test]
    fn expand_fails_on_missing_value() {
        let template = PathTemplate::new("/items/{id}");
        let err = template.expand(&BTreeMap::new()).expect_err("unbound");
        assert!(matches!(err, Error::InvalidRequest(ref msg) if msg.contains("'id'")));
    }

    #[test]
    fn malformed_braces_stay_literal() {
        let template = PathTemplate::new("/weird/{/{}");
        assert_eq!(template.placeholders().count(), 0);
        assert_eq!(template.expand(&BTreeMap::new()).expect("no params"), "/weird/{/{}");
    }

    #[test]
    fn colon_inside_segment_is_literal() {
        let template = PathTemplate::new("/time/12:30");
        assert_eq!(template.placeholders().count(), 0);
        assert_eq!(template.to_route(), "/time/12:30");
    }

    #[test]
    fn display_and_as_ref() {
        let template = PathTemplate::from("/users/{id}");
        assert_eq!(template.to_string(), "/users/{id}");
        let s: &str = template.as_ref();
        assert_eq!(s, "/users/{id}");
    }
}
