//! Comparison options
//!
//! Options adjust how the structural diff treats particular paths, member
//! names or value kinds. They are collected in order and resolved per node:
//!
//! 1. Rules naming the exact path of the node
//! 2. Rules naming the member key of the node
//! 3. Global rules (numeric tolerance, empty equivalence, extra members)
//!
//! A more specific rule always wins over a less specific one. Among rules of
//! the same specificity, the one added last wins.
//!
//! Paths start empty at the root, join object members with `.` and append
//! `[i]` for array elements, e.g. `crew[0].name`.

use crate::node::Node;
use std::fmt;
use std::sync::Arc;

/// Custom equality predicate, called as `predicate(got, expected)`
pub type Predicate = Arc<dyn Fn(&Node, &Node) -> bool + Send + Sync>;

/// A single comparison rule
#[derive(Clone)]
pub enum Rule {
    /// Skip the node at this exact path
    IgnorePath(String),
    /// Skip every object member with this key
    IgnoreField(String),
    /// Replace comparison of the node at this exact path
    EquateAt(String, Predicate),
    /// Replace comparison of every object member with this key
    EquateField(String, Predicate),
    /// Treat numbers within the tolerance as equal
    EquateApprox(f64),
    /// Treat null, absent members, `[]` and `{}` as equal
    EquateEmpty,
    /// Compare the array at this exact path ignoring element order
    UnorderedAt(String),
    /// Members only present in `got` are not differences
    AllowExtraFields,
}

impl fmt::Debug for Rule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Rule::IgnorePath(path) => f.debug_tuple("IgnorePath").field(path).finish(),
            Rule::IgnoreField(key) => f.debug_tuple("IgnoreField").field(key).finish(),
            Rule::EquateAt(path, _) => f.debug_tuple("EquateAt").field(path).finish(),
            Rule::EquateField(key, _) => f.debug_tuple("EquateField").field(key).finish(),
            Rule::EquateApprox(tolerance) => {
                f.debug_tuple("EquateApprox").field(tolerance).finish()
            }
            Rule::EquateEmpty => write!(f, "EquateEmpty"),
            Rule::UnorderedAt(path) => f.debug_tuple("UnorderedAt").field(path).finish(),
            Rule::AllowExtraFields => write!(f, "AllowExtraFields"),
        }
    }
}

/// What the diff engine does with a node
pub(crate) enum Action<'a> {
    Ignore,
    Equate(&'a Predicate),
    Recurse,
}

/// Ordered set of comparison rules
#[derive(Debug, Clone, Default)]
pub struct Options {
    rules: Vec<Rule>,
}

impl Options {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add an arbitrary rule
    pub fn rule(mut self, rule: Rule) -> Self {
        self.rules.push(rule);
        self
    }

    pub fn ignore_path(self, path: &str) -> Self {
        self.rule(Rule::IgnorePath(path.to_string()))
    }

    pub fn ignore_field(self, key: &str) -> Self {
        self.rule(Rule::IgnoreField(key.to_string()))
    }

    pub fn equate_at<F>(self, path: &str, predicate: F) -> Self
    where
        F: Fn(&Node, &Node) -> bool + Send + Sync + 'static,
    {
        self.rule(Rule::EquateAt(path.to_string(), Arc::new(predicate)))
    }

    pub fn equate_field<F>(self, key: &str, predicate: F) -> Self
    where
        F: Fn(&Node, &Node) -> bool + Send + Sync + 'static,
    {
        self.rule(Rule::EquateField(key.to_string(), Arc::new(predicate)))
    }

    pub fn equate_approx(self, tolerance: f64) -> Self {
        self.rule(Rule::EquateApprox(tolerance.abs()))
    }

    pub fn equate_empty(self) -> Self {
        self.rule(Rule::EquateEmpty)
    }

    pub fn unordered_at(self, path: &str) -> Self {
        self.rule(Rule::UnorderedAt(path.to_string()))
    }

    pub fn allow_extra_fields(self) -> Self {
        self.rule(Rule::AllowExtraFields)
    }

    /// Merge another set of options after these ones
    pub fn extend(mut self, other: Options) -> Self {
        self.rules.extend(other.rules);
        self
    }

    pub fn rules(&self) -> &[Rule] {
        &self.rules
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    /// Resolve the action for the node at `path`, reached through `key`
    /// when the node is an object member.
    pub(crate) fn resolve(&self, path: &str, key: Option<&str>) -> Action<'_> {
        let by_path = self.rules.iter().rev().find_map(|rule| match rule {
            Rule::IgnorePath(p) if p == path => Some(Action::Ignore),
            Rule::EquateAt(p, predicate) if p == path => Some(Action::Equate(predicate)),
            _ => None,
        });
        if let Some(action) = by_path {
            return action;
        }

        let Some(key) = key else {
            return Action::Recurse;
        };
        self.rules
            .iter()
            .rev()
            .find_map(|rule| match rule {
                Rule::IgnoreField(k) if k == key => Some(Action::Ignore),
                Rule::EquateField(k, predicate) if k == key => Some(Action::Equate(predicate)),
                _ => None,
            })
            .unwrap_or(Action::Recurse)
    }

    pub(crate) fn tolerance(&self) -> Option<f64> {
        self.rules.iter().rev().find_map(|rule| match rule {
            Rule::EquateApprox(tolerance) => Some(*tolerance),
            _ => None,
        })
    }

    pub(crate) fn empty_is_equal(&self) -> bool {
        self.rules.iter().any(|rule| matches!(rule, Rule::EquateEmpty))
    }

    pub(crate) fn extra_fields_allowed(&self) -> bool {
        self.rules
            .iter()
            .any(|rule| matches!(rule, Rule::AllowExtraFields))
    }

    pub(crate) fn is_unordered(&self, path: &str) -> bool {
        self.rules
            .iter()
            .any(|rule| matches!(rule, Rule::UnorderedAt(p) if p == path))
    }
}

impl From<Rule> for Options {
    fn from(rule: Rule) -> Self {
        Options::new().rule(rule)
    }
}

impl FromIterator<Rule> for Options {
    fn from_iter<I: IntoIterator<Item = Rule>>(iter: I) -> Self {
        Options {
            rules: iter.into_iter().collect(),
        }
    }
}
