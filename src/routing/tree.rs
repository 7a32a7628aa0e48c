//! Mirror of axum's routing tree used to detect conflicts before a route is
//! handed over.
//!
//! Axum keeps a single path tree for every method, and so does the mirror. A
//! wildcard position keeps the kind and name it was first registered with,
//! whatever the method. Literal and wildcard siblings at one position, and
//! duplicate routes, only conflict within a method: every node records, per
//! concrete method, the first pattern that went through it.
//!
//! The tree lives as long as the router, so later batches are checked against
//! every route registered before them.

use {
    super::{PathPattern, RouteMethod, Segment},
    crate::ConflictDetail,
    std::collections::BTreeMap,
};

/// First pattern per concrete method.
type Origins = BTreeMap<RouteMethod, String>;

#[derive(Debug)]
struct Node {
    /// First pattern, of any method, that created this node.
    origin: String,
    methods: Origins,
    literals: Vec<(String, Node)>,
    param: Option<(String, Box<Node>)>,
    catch_all: Option<CatchAll>,
    terminal: Origins,
    slash_terminal: Origins,
}

#[derive(Debug)]
struct CatchAll {
    name: String,
    origin: String,
    methods: Origins,
}

fn first_origin<'a>(origins: &'a Origins, trees: &[RouteMethod]) -> Option<&'a str> {
    trees.iter().find_map(|method| origins.get(method)).map(String::as_str)
}

fn mark(origins: &mut Origins, trees: &[RouteMethod], raw: &str) {
    for method in trees {
        origins.entry(*method).or_insert_with(|| raw.to_owned());
    }
}

impl Node {
    fn new(origin: &str) -> Self {
        Self {
            origin: origin.to_owned(),
            methods: Origins::new(),
            literals: Vec::new(),
            param: None,
            catch_all: None,
            terminal: Origins::new(),
            slash_terminal: Origins::new(),
        }
    }

    /// The wildcard child one of `trees` already goes through.
    fn wildcard_for(&self, trees: &[RouteMethod]) -> Option<(String, &str)> {
        if let Some((name, child)) = &self.param
            && let Some(origin) = first_origin(&child.methods, trees)
        {
            return Some((format!(":{name}"), origin));
        }
        let catch_all = self.catch_all.as_ref()?;
        first_origin(&catch_all.methods, trees)
            .map(|origin| (format!("*{}", catch_all.name), origin))
    }

    /// The literal child one of `trees` already goes through.
    fn literal_for(&self, trees: &[RouteMethod]) -> Option<(&str, &str)> {
        self.literals.iter().find_map(|(text, child)| {
            first_origin(&child.methods, trees).map(|origin| (text.as_str(), origin))
        })
    }

    fn literal(&self, text: &str) -> Option<&Node> {
        self.literals
            .iter()
            .find(|(t, _)| t == text)
            .map(|(_, child)| child)
    }

    /// Walks `pattern` without changing anything and reports the first
    /// position it cannot take.
    fn check(&self, method: RouteMethod, pattern: &PathPattern) -> Result<(), ConflictDetail> {
        let raw = pattern.as_str();
        let trees = method.trees();
        let conflict = |segment: &Segment, existing_segment: String, existing_pattern: &str| {
            ConflictDetail {
                method,
                pattern: raw.to_owned(),
                segment: segment.to_string(),
                existing_segment,
                existing_pattern: existing_pattern.to_owned(),
            }
        };

        let mut node = self;
        for segment in pattern.segments() {
            let next = match segment {
                Segment::Literal(text) => {
                    if let Some((existing, origin)) = node.wildcard_for(trees) {
                        return Err(conflict(segment, existing, origin));
                    }
                    node.literal(text)
                }
                Segment::Param(name) => {
                    if let Some((text, origin)) = node.literal_for(trees) {
                        return Err(conflict(segment, text.to_owned(), origin));
                    }
                    if let Some(catch_all) = &node.catch_all {
                        return Err(conflict(
                            segment,
                            format!("*{}", catch_all.name),
                            &catch_all.origin,
                        ));
                    }
                    match &node.param {
                        Some((existing, child)) if existing != name => {
                            return Err(conflict(segment, format!(":{existing}"), &child.origin));
                        }
                        Some((_, child)) => Some(child.as_ref()),
                        None => None,
                    }
                }
                Segment::CatchAll(name) => {
                    if let Some((text, origin)) = node.literal_for(trees) {
                        return Err(conflict(segment, text.to_owned(), origin));
                    }
                    if let Some((existing, child)) = &node.param {
                        return Err(conflict(segment, format!(":{existing}"), &child.origin));
                    }
                    if let Some(catch_all) = &node.catch_all {
                        // Another name is a second wildcard at one position; the
                        // same name under a taken method is the same route twice.
                        let taken = first_origin(&catch_all.methods, trees);
                        if catch_all.name != *name || taken.is_some() {
                            return Err(conflict(
                                segment,
                                format!("*{}", catch_all.name),
                                taken.unwrap_or(catch_all.origin.as_str()),
                            ));
                        }
                    }
                    return Ok(());
                }
            };
            match next {
                Some(child) => node = child,
                None => return Ok(()),
            }
        }

        let slot = if pattern.has_trailing_slash() {
            &node.slash_terminal
        } else {
            &node.terminal
        };
        if let Some(existing) = first_origin(slot, trees) {
            let last = pattern
                .segments()
                .last()
                .map(ToString::to_string)
                .unwrap_or_else(|| "/".to_owned());
            return Err(ConflictDetail {
                method,
                pattern: raw.to_owned(),
                segment: last.clone(),
                existing_segment: last,
                existing_pattern: existing.to_owned(),
            });
        }
        Ok(())
    }

    /// Adds `pattern` to the tree. Only called once [`Node::check`] passed.
    fn record(&mut self, method: RouteMethod, pattern: &PathPattern) {
        let raw = pattern.as_str();
        let trees = method.trees();

        let mut node = self;
        for segment in pattern.segments() {
            node = match segment {
                Segment::Literal(text) => {
                    let index = match node.literals.iter().position(|(t, _)| t == text) {
                        Some(index) => index,
                        None => {
                            node.literals.push((text.clone(), Node::new(raw)));
                            node.literals.len() - 1
                        }
                    };
                    &mut node.literals[index].1
                }
                Segment::Param(name) => {
                    let (_, child) = node
                        .param
                        .get_or_insert_with(|| (name.clone(), Box::new(Node::new(raw))));
                    child.as_mut()
                }
                Segment::CatchAll(name) => {
                    let catch_all = node.catch_all.get_or_insert_with(|| CatchAll {
                        name: name.clone(),
                        origin: raw.to_owned(),
                        methods: Origins::new(),
                    });
                    mark(&mut catch_all.methods, trees, raw);
                    return;
                }
            };
            mark(&mut node.methods, trees, raw);
        }

        let slot = if pattern.has_trailing_slash() {
            &mut node.slash_terminal
        } else {
            &mut node.terminal
        };
        mark(slot, trees, raw);
    }
}

/// Every route registered on one router, across methods and batches.
#[derive(Debug)]
pub(crate) struct RouteTree {
    root: Node,
}

impl Default for RouteTree {
    fn default() -> Self {
        Self {
            root: Node::new("/"),
        }
    }
}

impl RouteTree {
    /// Records `pattern` under `method`, or explains why it cannot coexist with
    /// what has been recorded so far (including an identical earlier pattern).
    /// A rejected pattern leaves the tree unchanged.
    pub(crate) fn insert(
        &mut self,
        method: RouteMethod,
        pattern: &PathPattern,
    ) -> Result<(), ConflictDetail> {
        self.root.check(method, pattern)?;
        self.root.record(method, pattern);
        Ok(())
    }
}
