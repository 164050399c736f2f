use blogpilot_core::Resource;
use blogpilot_core::models::InquiryStatus;
use std::fmt;

/// One positional parameter of a query key.
///
/// `Unset` is its own variant, so "no filter" never compares equal to a real
/// value such as an empty string or zero.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum KeyParam {
    Unset,
    Int(i64),
    Text(String),
    Status(InquiryStatus),
}

impl KeyParam {
    pub fn opt_int(value: Option<i64>) -> Self {
        value.map_or(KeyParam::Unset, KeyParam::Int)
    }

    pub fn opt_text(value: Option<&str>) -> Self {
        value.map_or(KeyParam::Unset, |s| KeyParam::Text(s.to_string()))
    }

    pub fn opt_status(value: Option<InquiryStatus>) -> Self {
        value.map_or(KeyParam::Unset, KeyParam::Status)
    }

    pub fn is_unset(&self) -> bool {
        matches!(self, KeyParam::Unset)
    }
}

impl From<i64> for KeyParam {
    fn from(value: i64) -> Self {
        KeyParam::Int(value)
    }
}

impl From<u32> for KeyParam {
    fn from(value: u32) -> Self {
        KeyParam::Int(i64::from(value))
    }
}

impl From<&str> for KeyParam {
    fn from(value: &str) -> Self {
        KeyParam::Text(value.to_string())
    }
}

impl From<String> for KeyParam {
    fn from(value: String) -> Self {
        KeyParam::Text(value)
    }
}

impl From<InquiryStatus> for KeyParam {
    fn from(value: InquiryStatus) -> Self {
        KeyParam::Status(value)
    }
}

impl fmt::Display for KeyParam {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            KeyParam::Unset => f.write_str("-"),
            KeyParam::Int(v) => write!(f, "{v}"),
            KeyParam::Text(s) => write!(f, "{s:?}"),
            KeyParam::Status(s) => f.write_str(s.as_str()),
        }
    }
}

/// Cache key: resource namespace, scope within it, then the parameters that
/// change the server response, in a fixed order.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct QueryKey {
    pub namespace: Resource,
    pub scope: &'static str,
    pub params: Vec<KeyParam>,
}

impl QueryKey {
    pub fn new(namespace: Resource, scope: &'static str) -> Self {
        Self {
            namespace,
            scope,
            params: Vec::new(),
        }
    }

    pub fn param(mut self, param: impl Into<KeyParam>) -> Self {
        self.params.push(param.into());
        self
    }

    /// True when some parameter is `Unset`. Detail keys built without an id
    /// look like this.
    pub fn has_unset(&self) -> bool {
        self.params.iter().any(KeyParam::is_unset)
    }
}

impl fmt::Display for QueryKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.namespace, self.scope)?;
        for param in &self.params {
            write!(f, "/{param}")?;
        }
        Ok(())
    }
}

/// Selects cache entries for invalidation, cancellation and removal.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum KeyFilter {
    All,
    Namespace(Resource),
    Scope(Resource, &'static str),
    Exact(QueryKey),
}

impl KeyFilter {
    pub fn matches(&self, key: &QueryKey) -> bool {
        match self {
            KeyFilter::All => true,
            KeyFilter::Namespace(ns) => key.namespace == *ns,
            KeyFilter::Scope(ns, scope) => key.namespace == *ns && key.scope == *scope,
            KeyFilter::Exact(exact) => key == exact,
        }
    }
}

impl From<Resource> for KeyFilter {
    fn from(ns: Resource) -> Self {
        KeyFilter::Namespace(ns)
    }
}

impl From<QueryKey> for KeyFilter {
    fn from(key: QueryKey) -> Self {
        KeyFilter::Exact(key)
    }
}

impl fmt::Display for KeyFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            KeyFilter::All => f.write_str("*"),
            KeyFilter::Namespace(ns) => write!(f, "{ns}/*"),
            KeyFilter::Scope(ns, scope) => write!(f, "{ns}/{scope}/*"),
            KeyFilter::Exact(key) => write!(f, "{key}"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unset_distinct_from_values() {
        assert_ne!(KeyParam::Unset, KeyParam::Text(String::new()));
        assert_ne!(KeyParam::Unset, KeyParam::Int(0));
        assert_eq!(KeyParam::opt_text(None), KeyParam::Unset);
    }

    #[test]
    fn test_filter_matching() {
        let key = QueryKey::new(Resource::Notices, "list").param(2u32).param(10u32);

        assert!(KeyFilter::All.matches(&key));
        assert!(KeyFilter::Namespace(Resource::Notices).matches(&key));
        assert!(!KeyFilter::Namespace(Resource::Blogs).matches(&key));
        assert!(KeyFilter::Scope(Resource::Notices, "list").matches(&key));
        assert!(!KeyFilter::Scope(Resource::Notices, "detail").matches(&key));
        assert!(KeyFilter::Exact(key.clone()).matches(&key));
        assert!(
            !KeyFilter::Exact(QueryKey::new(Resource::Notices, "list").param(1u32).param(10u32))
                .matches(&key)
        );
    }

    #[test]
    fn test_display() {
        let key = QueryKey::new(Resource::Blogs, "my")
            .param(1u32)
            .param(KeyParam::Unset);
        assert_eq!(key.to_string(), "blogs/my/1/-");
        assert!(key.has_unset());
    }
}
