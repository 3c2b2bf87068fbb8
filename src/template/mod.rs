//! Resource declaration model.
//!
//! Declarations are built from [`Expr`] values, which keep literal values
//! apart from deferred references (resource refs, attributes, pseudo
//! parameters). Rendering to the target template format lives in
//! [`render`]; merging rendered declarations into a host collection lives
//! in [`merge`].

pub mod merge;
pub mod render;

use std::collections::BTreeMap;

/// Named fields of a map-valued expression.
pub type Fields = BTreeMap<String, Expr>;

/// Deployment-scoped values the templating system resolves at deploy time.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Pseudo {
    AccountId,
    Region,
    Partition,
}

impl Pseudo {
    /// Parameter name as understood by the templating system.
    pub fn name(self) -> &'static str {
        match self {
            Pseudo::AccountId => "AWS::AccountId",
            Pseudo::Region => "AWS::Region",
            Pseudo::Partition => "AWS::Partition",
        }
    }
}

/// A value inside a resource declaration.
#[derive(Debug, Clone, PartialEq)]
pub enum Expr {
    Bool(bool),
    Int(i64),
    Str(String),
    List(Vec<Expr>),
    Map(Fields),
    /// User-supplied payload carried through untouched.
    Json(serde_json::Value),
    /// Reference to another resource in the same template.
    Ref(String),
    /// Attribute of another resource in the same template.
    Attr { resource: String, attribute: String },
    /// Deployment pseudo parameter.
    Pseudo(Pseudo),
    /// String with `${...}` placeholders resolved by the templating system.
    Interpolate(String),
    /// Concatenation of the parts with no separator.
    Concat(Vec<Expr>),
}

impl Expr {
    pub fn reference(resource: impl Into<String>) -> Self {
        Expr::Ref(resource.into())
    }

    pub fn attr(resource: impl Into<String>, attribute: impl Into<String>) -> Self {
        Expr::Attr {
            resource: resource.into(),
            attribute: attribute.into(),
        }
    }

    /// Shorthand for the `Arn` attribute of a resource.
    pub fn arn(resource: impl Into<String>) -> Self {
        Self::attr(resource, "Arn")
    }

    pub fn interpolate(template: impl Into<String>) -> Self {
        Expr::Interpolate(template.into())
    }

    pub fn concat(parts: impl IntoIterator<Item = Expr>) -> Self {
        Expr::Concat(parts.into_iter().collect())
    }

    /// Build a map expression from `(key, value)` pairs.
    pub fn map<K, I>(entries: I) -> Self
    where
        K: Into<String>,
        I: IntoIterator<Item = (K, Expr)>,
    {
        Expr::Map(entries.into_iter().map(|(k, v)| (k.into(), v)).collect())
    }

    /// Build a list of string literals.
    pub fn strings<S: Into<String>>(items: impl IntoIterator<Item = S>) -> Self {
        Expr::List(items.into_iter().map(|s| Expr::Str(s.into())).collect())
    }

    /// Field lookup on a map expression.
    pub fn get(&self, key: &str) -> Option<&Expr> {
        match self {
            Expr::Map(fields) => fields.get(key),
            _ => None,
        }
    }

    /// Resource names this expression points at, in encounter order.
    pub fn references(&self) -> Vec<&str> {
        let mut out = Vec::new();
        self.collect_references(&mut out);
        out
    }

    fn collect_references<'a>(&'a self, out: &mut Vec<&'a str>) {
        match self {
            Expr::Ref(resource) | Expr::Attr { resource, .. } => out.push(resource),
            Expr::List(items) | Expr::Concat(items) => {
                items.iter().for_each(|e| e.collect_references(out))
            }
            Expr::Map(fields) => fields.values().for_each(|e| e.collect_references(out)),
            _ => {}
        }
    }
}

impl From<bool> for Expr {
    fn from(value: bool) -> Self {
        Expr::Bool(value)
    }
}

impl From<u32> for Expr {
    fn from(value: u32) -> Self {
        Expr::Int(i64::from(value))
    }
}

impl From<i64> for Expr {
    fn from(value: i64) -> Self {
        Expr::Int(value)
    }
}

impl From<&str> for Expr {
    fn from(value: &str) -> Self {
        Expr::Str(value.to_string())
    }
}

impl From<String> for Expr {
    fn from(value: String) -> Self {
        Expr::Str(value)
    }
}

impl From<Vec<Expr>> for Expr {
    fn from(value: Vec<Expr>) -> Self {
        Expr::List(value)
    }
}

impl From<Fields> for Expr {
    fn from(value: Fields) -> Self {
        Expr::Map(value)
    }
}

impl From<Pseudo> for Expr {
    fn from(value: Pseudo) -> Self {
        Expr::Pseudo(value)
    }
}

/// One infrastructure object: a type discriminator plus its properties.
#[derive(Debug, Clone, PartialEq)]
pub struct Resource {
    pub resource_type: &'static str,
    pub properties: Fields,
}

impl Resource {
    pub fn new(resource_type: &'static str) -> Self {
        Self {
            resource_type,
            properties: Fields::new(),
        }
    }

    /// Set a property, replacing any previous value.
    pub fn with(mut self, key: &str, value: impl Into<Expr>) -> Self {
        self.properties.insert(key.to_string(), value.into());
        self
    }

    /// Set a property only when `value` is `Some`.
    pub fn with_opt<V: Into<Expr>>(self, key: &str, value: Option<V>) -> Self {
        match value {
            Some(v) => self.with(key, v),
            None => self,
        }
    }

    pub fn property(&self, key: &str) -> Option<&Expr> {
        self.properties.get(key)
    }
}

/// Identifier-keyed declarations produced for one stream, in insertion order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ResourceMap {
    entries: Vec<(String, Resource)>,
}

impl ResourceMap {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a declaration. An existing identifier keeps its position and
    /// has its declaration replaced.
    pub fn insert(&mut self, id: impl Into<String>, resource: Resource) {
        let id = id.into();
        match self.entries.iter_mut().find(|(key, _)| *key == id) {
            Some(entry) => entry.1 = resource,
            None => self.entries.push((id, resource)),
        }
    }

    pub fn get(&self, id: &str) -> Option<&Resource> {
        self.entries
            .iter()
            .find(|(key, _)| key == id)
            .map(|(_, resource)| resource)
    }

    pub fn contains_key(&self, id: &str) -> bool {
        self.get(id).is_some()
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(key, _)| key.as_str())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &Resource)> {
        self.entries.iter().map(|(key, r)| (key.as_str(), r))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl IntoIterator for ResourceMap {
    type Item = (String, Resource);
    type IntoIter = std::vec::IntoIter<(String, Resource)>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.into_iter()
    }
}
