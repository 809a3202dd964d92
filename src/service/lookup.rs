use serde_json::Value;

/// One step of a lookup path.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Key<'k> {
    Index(usize),
    Name(&'k str),
}

impl<'k> From<&'k str> for Key<'k> {
    fn from(value: &'k str) -> Self {
        Key::Name(value)
    }
}

impl From<usize> for Key<'_> {
    fn from(value: usize) -> Self {
        Key::Index(value)
    }
}

/// Builds a `[Key; N]` from a mix of string and integer literals.
///
/// ```
/// use ccw_order_tracker::path;
/// use ccw_order_tracker::service::lookup::Key;
///
/// assert_eq!(path!["Item", 0, "value"], [Key::Name("Item"), Key::Index(0), Key::Name("value")]);
/// ```
#[macro_export]
macro_rules! path {
    ($($key:expr),* $(,)?) => {
        [$($crate::service::lookup::Key::from($key)),*]
    };
}

/// Walks `path` from `root`, stopping at the first step that does not exist.
///
/// An index descends only into an array and only when in range. A name descends
/// only into an object that holds the key. A `null` at the end of the path
/// counts as absent.
pub fn lookup<'a>(root: &'a Value, path: &[Key<'_>]) -> Option<&'a Value> {
    let mut node = root;
    for key in path {
        node = match (node, key) {
            (Value::Array(items), Key::Index(i)) => items.get(*i)?,
            (Value::Object(map), Key::Name(name)) => map.get(*name)?,
            _ => return None,
        };
    }
    (!node.is_null()).then_some(node)
}

/// Like [`lookup`] but falls back to `default`.
pub fn lookup_or<'a>(root: &'a Value, path: &[Key<'_>], default: &'a Value) -> &'a Value {
    lookup(root, path).unwrap_or(default)
}
