//! Structural diff between two serializable values
//!
//! Both values are rendered into [`Node`] trees and walked in parallel:
//! objects member by member, arrays position by position and scalars by
//! value. Every mismatch becomes a [`Difference`] tagged with the path where
//! it was found.

use crate::error::{ExpectError, ExpectResult, Side};
use crate::node::{to_node, Node, NULL};
use crate::options::{Action, Options};
use serde::Serialize;
use std::fmt;
use tracing::{debug, trace};

/// Rendered in place of a value that does not exist on one side
const ABSENT: &str = "(missing)";

/// Rendered in place of the empty root path
const ROOT: &str = "(root)";

/// Category of a difference
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DiffKind {
    /// Both sides hold scalars of the same kind with different values
    Value,
    /// The sides hold different kinds of value (e.g. string vs number)
    Kind,
    /// Arrays of different lengths
    Length,
    /// Present in `expected` but not in `got`
    Missing,
    /// Present in `got` but not in `expected`
    Extra,
}

impl fmt::Display for DiffKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DiffKind::Value => write!(f, "VALUE"),
            DiffKind::Kind => write!(f, "KIND"),
            DiffKind::Length => write!(f, "LENGTH"),
            DiffKind::Missing => write!(f, "MISSING"),
            DiffKind::Extra => write!(f, "EXTRA"),
        }
    }
}

/// A specific difference between two values
#[derive(Debug, Clone, PartialEq)]
pub struct Difference {
    pub kind: DiffKind,
    pub path: String,
    pub got: Option<Node>,
    pub expected: Option<Node>,
}

impl fmt::Display for Difference {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let path = if self.path.is_empty() {
            ROOT
        } else {
            self.path.as_str()
        };
        writeln!(f, "{} {}", self.kind, path)?;
        writeln!(f, "- {}", render_side(self.got.as_ref()))?;
        writeln!(f, "+ {}", render_side(self.expected.as_ref()))
    }
}

fn render_side(value: Option<&Node>) -> String {
    value.map_or_else(|| ABSENT.to_string(), Node::to_string)
}

/// The full set of differences between two values
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Diff {
    differences: Vec<Difference>,
}

impl Diff {
    pub fn is_empty(&self) -> bool {
        self.differences.is_empty()
    }

    pub fn len(&self) -> usize {
        self.differences.len()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Difference> {
        self.differences.iter()
    }

    /// Render the diff as line-oriented text, keeping at most `limit` entries
    ///
    /// An empty diff renders as an empty string.
    pub fn render(&self, limit: usize) -> String {
        if self.is_empty() {
            return String::new();
        }

        let mut out = String::from("--- got\n+++ expected\n");
        for difference in self.differences.iter().take(limit) {
            out.push_str(&difference.to_string());
        }
        if self.differences.len() > limit {
            let rest = self.differences.len() - limit;
            out.push_str(&format!("... and {} more differences\n", rest));
        }
        out
    }
}

impl fmt::Display for Diff {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.render(usize::MAX))
    }
}

impl<'a> IntoIterator for &'a Diff {
    type Item = &'a Difference;
    type IntoIter = std::slice::Iter<'a, Difference>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

/// Compute the structural diff of `got` against `expected`
///
/// Every field the value's `Serialize` impl emits is compared. Fields marked
/// `#[serde(skip)]` (or skipped by `skip_serializing_if`) are never seen and
/// so never compared.
///
/// Fails only when one of the values cannot be serialized into a tree, for
/// example a map whose keys are not strings.
pub fn diff<G, E>(got: &G, expected: &E, options: &Options) -> ExpectResult<Diff>
where
    G: Serialize + ?Sized,
    E: Serialize + ?Sized,
{
    let got = to_node(got).map_err(|source| ExpectError::Serialize {
        side: Side::Got,
        source,
    })?;
    let expected = to_node(expected).map_err(|source| ExpectError::Serialize {
        side: Side::Expected,
        source,
    })?;

    Ok(diff_nodes(&got, &expected, options))
}

/// Compute the structural diff of two already-rendered trees
pub fn diff_nodes(got: &Node, expected: &Node, options: &Options) -> Diff {
    let mut differences = Vec::new();
    compare_node("", None, got, expected, options, &mut differences);
    debug!(differences = differences.len(), "Computed structural diff");
    Diff { differences }
}

fn child_path(path: &str, key: &str) -> String {
    if path.is_empty() {
        key.to_string()
    } else {
        format!("{}.{}", path, key)
    }
}

fn index_path(path: &str, index: usize) -> String {
    format!("{}[{}]", path, index)
}

fn push(differences: &mut Vec<Difference>, difference: Difference) {
    trace!(kind = %difference.kind, path = %difference.path, "Found difference");
    differences.push(difference);
}

fn compare_node(
    path: &str,
    key: Option<&str>,
    got: &Node,
    expected: &Node,
    options: &Options,
    differences: &mut Vec<Difference>,
) {
    match options.resolve(path, key) {
        Action::Ignore => return,
        Action::Equate(predicate) => {
            if !predicate(got, expected) {
                push(
                    differences,
                    Difference {
                        kind: DiffKind::Value,
                        path: path.to_string(),
                        got: Some(got.clone()),
                        expected: Some(expected.clone()),
                    },
                );
            }
            return;
        }
        Action::Recurse => {}
    }

    if options.empty_is_equal() && got.is_empty() && expected.is_empty() {
        return;
    }

    match (got, expected) {
        (Node::Object(got_obj), Node::Object(exp_obj)) => {
            // Every expected member must exist in got with an equal value
            for (member, exp_value) in exp_obj {
                let new_path = child_path(path, member);
                match got_obj.get(member) {
                    Some(got_value) => compare_node(
                        &new_path,
                        Some(member),
                        got_value,
                        exp_value,
                        options,
                        differences,
                    ),
                    None => absent_member(
                        new_path,
                        member,
                        None,
                        Some(exp_value),
                        options,
                        differences,
                    ),
                }
            }

            if options.extra_fields_allowed() {
                return;
            }
            for (member, got_value) in got_obj {
                if !exp_obj.contains_key(member) {
                    absent_member(
                        child_path(path, member),
                        member,
                        Some(got_value),
                        None,
                        options,
                        differences,
                    );
                }
            }
        }
        (Node::Array(got_arr), Node::Array(exp_arr)) => {
            if options.is_unordered(path) {
                compare_unordered(path, got_arr, exp_arr, options, differences);
                return;
            }

            if got_arr.len() != exp_arr.len() {
                push(
                    differences,
                    Difference {
                        kind: DiffKind::Length,
                        path: path.to_string(),
                        got: Some(Node::from(got_arr.len())),
                        expected: Some(Node::from(exp_arr.len())),
                    },
                );
            }

            for (i, (got_elem, exp_elem)) in got_arr.iter().zip(exp_arr.iter()).enumerate() {
                compare_node(
                    &index_path(path, i),
                    None,
                    got_elem,
                    exp_elem,
                    options,
                    differences,
                );
            }
        }
        (Node::Number(got_num), Node::Number(exp_num)) => {
            let equal = match options.tolerance() {
                Some(tolerance) => got_num.approx_eq(exp_num, tolerance),
                None => got_num == exp_num,
            };
            if !equal {
                push(
                    differences,
                    Difference {
                        kind: DiffKind::Value,
                        path: path.to_string(),
                        got: Some(got.clone()),
                        expected: Some(expected.clone()),
                    },
                );
            }
        }
        _ => {
            let kind = if got.kind() != expected.kind() {
                DiffKind::Kind
            } else if got != expected {
                DiffKind::Value
            } else {
                return;
            };
            push(
                differences,
                Difference {
                    kind,
                    path: path.to_string(),
                    got: Some(got.clone()),
                    expected: Some(expected.clone()),
                },
            );
        }
    }
}

/// Record a member present on only one side, unless options excuse it
fn absent_member(
    path: String,
    member: &str,
    got: Option<&Node>,
    expected: Option<&Node>,
    options: &Options,
    differences: &mut Vec<Difference>,
) {
    let present = got.or(expected).unwrap_or(&NULL);
    match options.resolve(&path, Some(member)) {
        Action::Ignore => return,
        Action::Equate(predicate) => {
            let (g, e) = match got {
                Some(g) => (g, &NULL),
                None => (&NULL, present),
            };
            if predicate(g, e) {
                return;
            }
        }
        Action::Recurse => {}
    }
    if options.empty_is_equal() && present.is_empty() {
        return;
    }

    let kind = if got.is_some() {
        DiffKind::Extra
    } else {
        DiffKind::Missing
    };
    push(
        differences,
        Difference {
            kind,
            path,
            got: got.cloned(),
            expected: expected.cloned(),
        },
    );
}

/// Match array elements as a multiset
///
/// Each expected element consumes the first unmatched got element that is
/// structurally equal to it. Leftovers are reported at their own index.
fn compare_unordered(
    path: &str,
    got_arr: &[Node],
    exp_arr: &[Node],
    options: &Options,
    differences: &mut Vec<Difference>,
) {
    let mut matched = vec![false; got_arr.len()];

    for (i, exp_elem) in exp_arr.iter().enumerate() {
        let elem_path = index_path(path, i);
        let found = got_arr.iter().enumerate().position(|(j, got_elem)| {
            if matched[j] {
                return false;
            }
            let mut scratch = Vec::new();
            compare_node(&elem_path, None, got_elem, exp_elem, options, &mut scratch);
            scratch.is_empty()
        });

        match found {
            Some(j) => matched[j] = true,
            None => push(
                differences,
                Difference {
                    kind: DiffKind::Missing,
                    path: elem_path,
                    got: None,
                    expected: Some(exp_elem.clone()),
                },
            ),
        }
    }

    for (j, got_elem) in got_arr.iter().enumerate() {
        if !matched[j] {
            push(
                differences,
                Difference {
                    kind: DiffKind::Extra,
                    path: index_path(path, j),
                    got: Some(got_elem.clone()),
                    expected: None,
                },
            );
        }
    }
}
