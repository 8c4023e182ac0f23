//! # Virgule Router
//!
//! A file-system route tree for Rust web frameworks that converts a pages
//! directory structure into URL routes.
//!
//! ## Features
//!
//! - **Static routes** - `about.rs` serves `/about`
//! - **Dynamic segments** - `users/[id].rs` serves `/users/42`
//! - **Catch-all routes** - `docs/[...slug].rs` serves `/docs/guide/intro`
//! - **Optional catch-all** - `files/[[...path]].rs` also serves `/files`
//! - **Index collapsing** - `blog/index.rs` serves `/blog` without shadowing
//!   a sibling route file named `index`
//! - **Build-time conflict detection** - ambiguous route sets are rejected
//!   when the tree is built, never at request time
//! - **Zero runtime ambiguity** - fixed precedence (static > dynamic >
//!   catch-all) and per-level uniqueness make every match deterministic
//!
//! ## Quick Start
//!
//! ```rust
//! use virgule_router::RouteTree;
//!
//! let mut tree = RouteTree::new();
//!
//! // Feed it route files, in any order
//! tree.insert("index.rs").unwrap();
//! tree.insert("users/[id].rs").unwrap();
//! tree.insert("docs/[[...slug]].rs").unwrap();
//!
//! // Match incoming request paths
//! let hit = tree.match_route("/users/42").unwrap();
//! assert_eq!(hit.file_path, "users/[id].rs");
//! assert_eq!(hit.params["id"].as_str(), Some("42"));
//! ```
//!
//! ## File Naming Convention
//!
//! | File Path | Matches | Binds |
//! |-----------|---------|-------|
//! | `index.rs` | `/` | — |
//! | `about.rs` | `/about` | — |
//! | `users/index.rs` | `/users` | — |
//! | `users/[id].rs` | `/users/42` | `id = "42"` |
//! | `users/[[id]].rs` | `/users/42` | `id = "42"` (optionality tracked, not matched) |
//! | `docs/[...slug].rs` | `/docs/a/b` | `slug = ["a", "b"]` |
//! | `docs/[[...slug]].rs` | `/docs`, `/docs/a/b` | `slug = []`, `["a", "b"]` |
//!
//! ## Route Precedence
//!
//! At every level of the tree, candidates are tried in a fixed order:
//!
//! 1. **Static child** - exact segment match
//! 2. **Dynamic child** - binds the segment to its parameter
//! 3. **Catch-all child** - binds all remaining segments and stops
//!
//! A level holds at most one dynamic and at most one catch-all child, and
//! the two kinds cannot coexist, so a request path never has more than one
//! possible match.
//!
//! ## Conflict Detection
//!
//! ```rust
//! use virgule_router::{RouteConflict, RouteTree};
//!
//! let mut tree = RouteTree::new();
//! tree.insert("users/[id].rs").unwrap();
//!
//! // Two dynamic segments with different names cannot share a level.
//! let err = tree.insert("users/[slug].rs").unwrap_err();
//! assert!(matches!(err, RouteConflict::ParamMismatch { .. }));
//! ```

use std::collections::HashMap;

use thiserror::Error;

/// A parameter value extracted while matching a request path.
///
/// Dynamic segments bind a single segment; catch-all segments bind the
/// ordered sequence of all remaining segments (possibly empty when the
/// catch-all is optional).
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ParamValue {
    /// Bound by a dynamic segment such as `[id]`.
    Single(String),
    /// Bound by a catch-all segment such as `[...slug]`.
    Many(Vec<String>),
}

impl ParamValue {
    /// The bound segment, if this value came from a dynamic segment.
    pub fn as_str(&self) -> Option<&str> {
        match self {
            ParamValue::Single(value) => Some(value),
            ParamValue::Many(_) => None,
        }
    }

    /// The bound segment sequence, if this value came from a catch-all.
    pub fn as_segments(&self) -> Option<&[String]> {
        match self {
            ParamValue::Single(_) => None,
            ParamValue::Many(segments) => Some(segments),
        }
    }
}

/// Parameters extracted from a matched request path, keyed by name.
pub type Params = HashMap<String, ParamValue>;

/// A successful route lookup: the route file that should serve the request
/// and the parameters bound along the way.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RouteMatch<'tree> {
    /// The relative file path that was inserted for this route.
    pub file_path: &'tree str,
    /// Parameter bindings accumulated during the walk.
    pub params: Params,
}

/// A build-time routing conflict: two inserted files cannot be represented
/// unambiguously in the same tree.
///
/// Conflicts are detected during [`RouteTree::insert`], symmetrically with
/// respect to insertion order, so that matching never has to disambiguate.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RouteConflict {
    /// Two files both terminate at the same node.
    #[error("'{segment}' in '{path}' conflicts with '{existing}'")]
    DuplicateRoute {
        /// The file being inserted.
        path: String,
        /// The final segment of the inserted file.
        segment: String,
        /// The file already owning the node.
        existing: String,
    },

    /// A dynamic or catch-all segment collides with a wildcard already
    /// present at the same level.
    #[error("{segment} in '{path}' conflicts with {existing}")]
    SegmentClash {
        /// The file being inserted.
        path: String,
        /// The offending segment of the inserted file.
        segment: String,
        /// The pre-existing wildcard, rendered in bracket syntax.
        existing: String,
    },

    /// Two dynamic segments at the same level disagree on parameter name
    /// or optionality.
    #[error("{segment} in '{path}' has different specificity than {existing}")]
    ParamMismatch {
        /// The file being inserted.
        path: String,
        /// The offending segment of the inserted file.
        segment: String,
        /// The pre-existing dynamic segment, rendered in bracket syntax.
        existing: String,
    },

    /// A catch-all segment was followed by further segments.
    #[error("{segment} in '{path}' must be the last part of the URL")]
    CatchAllNotLast {
        /// The file being inserted.
        path: String,
        /// The catch-all segment that is not last.
        segment: String,
    },
}

/// One `/`-delimited component of a route file path, classified by kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Segment<'a> {
    Static(&'a str),
    Dynamic { param: &'a str, optional: bool },
    CatchAll { param: &'a str, optional: bool },
}

impl<'a> Segment<'a> {
    fn parse(raw: &'a str) -> Self {
        let Some(inner) = raw
            .strip_prefix('[')
            .and_then(|rest| rest.strip_suffix(']'))
        else {
            return Segment::Static(raw);
        };

        let (inner, optional) = match inner
            .strip_prefix('[')
            .and_then(|rest| rest.strip_suffix(']'))
        {
            Some(unwrapped) => (unwrapped, true),
            None => (inner, false),
        };

        match inner.strip_prefix("...") {
            Some(param) => Segment::CatchAll { param, optional },
            None => Segment::Dynamic { param: inner, optional },
        }
    }
}

fn bracket_pattern(param: &str, optional: bool, catch_all: bool) -> String {
    let depth = if optional { 2 } else { 1 };
    format!(
        "{}{}{}{}",
        "[".repeat(depth),
        if catch_all { "..." } else { "" },
        param,
        "]".repeat(depth)
    )
}

#[derive(Debug, Default)]
struct Node {
    file_path: Option<String>,
    children: Children,
}

/// Per-level child slots. Static children are unique by segment text; the
/// dynamic and catch-all slots hold at most one child each.
#[derive(Debug, Default)]
struct Children {
    statics: HashMap<String, Node>,
    dynamic: Option<Box<DynamicChild>>,
    catch_all: Option<CatchAllChild>,
}

#[derive(Debug)]
struct DynamicChild {
    param: String,
    optional: bool,
    node: Node,
}

impl DynamicChild {
    fn pattern(&self) -> String {
        bracket_pattern(&self.param, self.optional, false)
    }
}

/// A catch-all terminates its defining path, so it owns a file and never
/// has children.
#[derive(Debug)]
struct CatchAllChild {
    param: String,
    optional: bool,
    file_path: String,
}

impl CatchAllChild {
    fn pattern(&self) -> String {
        bracket_pattern(&self.param, self.optional, true)
    }
}

/// The route tree: a trie of path segments built once from a set of route
/// files, then queried read-only for every request.
///
/// Building takes `&mut self`; matching takes `&self`. Move the finished
/// tree into an `Arc` and the type system guarantees the single-writer /
/// many-readers lifecycle.
#[derive(Debug, Default)]
pub struct RouteTree {
    root: Node,
}

impl RouteTree {
    /// Create an empty route tree.
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert one route file, given as a path relative to the pages
    /// directory.
    ///
    /// The file extension is stripped and the remaining components become
    /// tree levels. A final segment literally named `index` terminates at
    /// the current directory node instead of opening a new level, so
    /// `blog/index.rs` and `blog/[slug].rs` coexist.
    ///
    /// Insertion order never affects the resulting tree's matching
    /// behavior; conflicting pairs of files are rejected whichever of the
    /// two arrives second.
    ///
    /// # Errors
    ///
    /// Returns a [`RouteConflict`] describing the inserted path, the
    /// offending segment, and the pre-existing route it collides with.
    /// Nodes created before the conflict was detected remain valid
    /// non-terminal waypoints; no cleanup is needed and the tree never
    /// matches a route that was not fully inserted.
    ///
    /// ```rust
    /// use virgule_router::RouteTree;
    ///
    /// let mut tree = RouteTree::new();
    /// tree.insert("blog/index.rs").unwrap();
    /// tree.insert("blog/[slug].rs").unwrap();
    ///
    /// assert_eq!(tree.match_route("/blog").unwrap().file_path, "blog/index.rs");
    /// assert_eq!(tree.match_route("/blog/hello").unwrap().file_path, "blog/[slug].rs");
    /// ```
    pub fn insert(&mut self, relative_path: &str) -> Result<(), RouteConflict> {
        let route = route_stem(relative_path);
        let segments: Vec<&str> = route
            .split('/')
            .filter(|segment| !segment.is_empty() && *segment != ".")
            .collect();

        let mut node = &mut self.root;

        for (index, raw) in segments.iter().enumerate() {
            let last = index + 1 == segments.len();

            match Segment::parse(raw) {
                Segment::CatchAll { param, optional } => {
                    if !last {
                        return Err(RouteConflict::CatchAllNotLast {
                            path: relative_path.to_owned(),
                            segment: (*raw).to_owned(),
                        });
                    }
                    if let Some(dynamic) = &node.children.dynamic {
                        return Err(RouteConflict::SegmentClash {
                            path: relative_path.to_owned(),
                            segment: (*raw).to_owned(),
                            existing: dynamic.pattern(),
                        });
                    }
                    if let Some(catch_all) = &node.children.catch_all {
                        return Err(RouteConflict::SegmentClash {
                            path: relative_path.to_owned(),
                            segment: (*raw).to_owned(),
                            existing: catch_all.pattern(),
                        });
                    }
                    node.children.catch_all = Some(CatchAllChild {
                        param: param.to_owned(),
                        optional,
                        file_path: relative_path.to_owned(),
                    });
                    return Ok(());
                }

                Segment::Dynamic { param, optional } => {
                    if let Some(catch_all) = &node.children.catch_all {
                        return Err(RouteConflict::SegmentClash {
                            path: relative_path.to_owned(),
                            segment: (*raw).to_owned(),
                            existing: catch_all.pattern(),
                        });
                    }
                    if let Some(existing) = &node.children.dynamic {
                        if existing.param != param || existing.optional != optional {
                            return Err(RouteConflict::ParamMismatch {
                                path: relative_path.to_owned(),
                                segment: (*raw).to_owned(),
                                existing: existing.pattern(),
                            });
                        }
                        if last {
                            if let Some(owner) = &existing.node.file_path {
                                return Err(RouteConflict::DuplicateRoute {
                                    path: relative_path.to_owned(),
                                    segment: (*raw).to_owned(),
                                    existing: owner.clone(),
                                });
                            }
                        }
                    }
                    let dynamic = node.children.dynamic.get_or_insert_with(|| {
                        Box::new(DynamicChild {
                            param: param.to_owned(),
                            optional,
                            node: Node::default(),
                        })
                    });
                    if last {
                        dynamic.node.file_path = Some(relative_path.to_owned());
                    }
                    node = &mut dynamic.node;
                }

                Segment::Static(segment) => {
                    // A trailing `index` file belongs to the directory
                    // itself, not to a child level.
                    if last && segment == "index" {
                        if let Some(owner) = &node.file_path {
                            return Err(RouteConflict::DuplicateRoute {
                                path: relative_path.to_owned(),
                                segment: segment.to_owned(),
                                existing: owner.clone(),
                            });
                        }
                        node.file_path = Some(relative_path.to_owned());
                        return Ok(());
                    }

                    let child = node.children.statics.entry(segment.to_owned()).or_default();
                    if last {
                        if let Some(owner) = &child.file_path {
                            return Err(RouteConflict::DuplicateRoute {
                                path: relative_path.to_owned(),
                                segment: segment.to_owned(),
                                existing: owner.clone(),
                            });
                        }
                        child.file_path = Some(relative_path.to_owned());
                    }
                    node = child;
                }
            }
        }

        Ok(())
    }

    /// Match a request path against the tree.
    ///
    /// The path is split on `/` with empty segments discarded, so leading,
    /// trailing, and repeated slashes are all normalized away. Returns
    /// `None` when no route covers the path; a miss is an ordinary outcome,
    /// not an error.
    ///
    /// Matching is a pure read: it touches no shared mutable state, never
    /// blocks, and runs in time proportional to the number of request path
    /// segments.
    ///
    /// ```rust
    /// use virgule_router::RouteTree;
    ///
    /// let mut tree = RouteTree::new();
    /// tree.insert("files/[...path].rs").unwrap();
    ///
    /// let hit = tree.match_route("/files/a/b/c").unwrap();
    /// assert_eq!(hit.file_path, "files/[...path].rs");
    /// assert_eq!(
    ///     hit.params["path"].as_segments(),
    ///     Some(&["a".to_string(), "b".to_string(), "c".to_string()][..]),
    /// );
    ///
    /// assert!(tree.match_route("/somewhere/else").is_none());
    /// ```
    pub fn match_route(&self, request_path: &str) -> Option<RouteMatch<'_>> {
        let segments: Vec<&str> = request_path
            .split('/')
            .filter(|segment| !segment.is_empty())
            .collect();

        let mut node = &self.root;
        let mut params = Params::new();

        for (index, segment) in segments.iter().enumerate() {
            if let Some(child) = node.children.statics.get(*segment) {
                node = child;
                continue;
            }
            if let Some(dynamic) = &node.children.dynamic {
                params.insert(
                    dynamic.param.clone(),
                    ParamValue::Single((*segment).to_owned()),
                );
                node = &dynamic.node;
                continue;
            }
            if let Some(catch_all) = &node.children.catch_all {
                let rest = segments[index..]
                    .iter()
                    .map(|segment| (*segment).to_owned())
                    .collect();
                params.insert(catch_all.param.clone(), ParamValue::Many(rest));
                return Some(RouteMatch {
                    file_path: &catch_all.file_path,
                    params,
                });
            }
            return None;
        }

        // Every request segment is consumed. A terminal node wins; failing
        // that, an optional catch-all matches the empty remainder.
        if let Some(file_path) = &node.file_path {
            return Some(RouteMatch { file_path, params });
        }
        if let Some(catch_all) = &node.children.catch_all {
            if catch_all.optional {
                params.insert(catch_all.param.clone(), ParamValue::Many(Vec::new()));
                return Some(RouteMatch {
                    file_path: &catch_all.file_path,
                    params,
                });
            }
        }
        None
    }
}

/// Normalize separators and strip the file extension, leaving the segments
/// that define the route.
fn route_stem(relative_path: &str) -> String {
    let normalized = relative_path.replace('\\', "/");
    let basename_start = normalized.rfind('/').map_or(0, |slash| slash + 1);
    match normalized.rfind('.') {
        // The dot must sit inside the basename, not lead it, to count as
        // an extension separator.
        Some(dot) if dot > basename_start => normalized[..dot].to_owned(),
        _ => normalized,
    }
}
