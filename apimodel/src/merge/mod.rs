//! Inheritance merge across the resolved hierarchy.
//!
//! Every attribute is combined over the same sequence of layers, the *locate
//! order*: endpoint, leaf resource, each lineage resource from the root to the
//! leaf, server, then service. The leaf therefore contributes twice. Later
//! layers win for plain header keys, variables and credential fields.

mod layer;

pub use layer::{MergeLayer, MergeProvenance};

use crate::{Auth, BasicAuth, Header, Link, ResolvedResource, Vars};

impl<'m> ResolvedResource<'m> {
    /// Layers in locate order.
    #[must_use]
    pub fn layers(&self) -> Vec<MergeLayer<'m>> {
        let mut layers = Vec::with_capacity(self.lineage().len() + 4);
        layers.push(MergeLayer::endpoint(self.endpoint()));
        layers.push(MergeLayer::resource(self.resource()));
        layers.extend(
            self.lineage()
                .iter()
                .enumerate()
                .map(|(depth, r)| MergeLayer::lineage(depth, r)),
        );
        layers.push(MergeLayer::server(self.server()));
        layers.push(MergeLayer::service(self.service()));
        layers
    }

    /// Headers after applying every layer's operators.
    #[must_use]
    pub fn combined_headers(&self) -> Header {
        self.layers()
            .iter()
            .filter_map(MergeLayer::headers)
            .fold(Header::new(), reduce_header)
    }

    /// Variables with later layers overwriting earlier ones.
    #[must_use]
    pub fn combined_vars(&self) -> Vars {
        let mut vars = Vars::new();
        for layer in self.layers() {
            overlay_vars(&mut vars, layer.vars());
        }
        vars
    }

    /// Links from every layer, concatenated without de-duplication.
    #[must_use]
    pub fn combined_links(&self) -> Vec<Link> {
        self.layers()
            .iter()
            .filter_map(MergeLayer::links)
            .flatten()
            .cloned()
            .collect()
    }

    /// Credential reduced across every layer.
    #[must_use]
    pub fn combined_auth(&self) -> Option<Auth> {
        self.layers()
            .iter()
            .fold(None, |acc, layer| reduce_auth(acc, layer.auth()))
    }
}

/// Apply one layer's header map to the accumulated headers.
///
/// A plain key replaces the accumulated values; `+key` appends; `-key`
/// removes matching values. Within one layer plain keys apply first, then
/// appends, then removals. Keys left without values are dropped.
///
/// ```
/// use apimodel::{config::header, merge::reduce_header};
///
/// let acc = header([("A", ["1", "2", "3"])]);
/// let merged = reduce_header(acc, &header([("-A", ["2"])]));
/// assert_eq!(merged, header([("A", ["1", "3"])]));
/// ```
#[must_use]
pub fn reduce_header(mut acc: Header, layer: &Header) -> Header {
    for (key, values) in layer.iter().filter(|(k, _)| !is_operator(k)) {
        if values.is_empty() {
            acc.remove(key);
        } else {
            acc.insert(key.clone(), values.clone());
        }
    }
    for (key, values) in layer {
        if let Some(name) = key.strip_prefix('+') {
            if !values.is_empty() {
                acc.entry(name.to_owned())
                    .or_default()
                    .extend(values.iter().cloned());
            }
        }
    }
    for (key, values) in layer {
        if let Some(name) = key.strip_prefix('-') {
            let emptied = acc.get_mut(name).is_some_and(|existing| {
                existing.retain(|v| !values.contains(v));
                existing.is_empty()
            });
            if emptied {
                acc.remove(name);
            }
        }
    }
    acc
}

fn is_operator(key: &str) -> bool {
    key.starts_with(['+', '-'])
}

/// Overwrite `acc` with every entry of `layer`.
pub fn overlay_vars(acc: &mut Vars, layer: &Vars) {
    for (k, v) in layer {
        acc.insert(k.clone(), v.clone());
    }
}

/// Combine an accumulated credential with the next layer's.
///
/// Missing values keep the accumulator. Values of the same kind merge field
/// by field, preferring non-empty new fields. Values of a different kind
/// replace the accumulator.
#[must_use]
pub fn reduce_auth(acc: Option<Auth>, new: Option<&Auth>) -> Option<Auth> {
    let Some(next) = new else {
        return acc;
    };
    match (acc, next) {
        (Some(Auth::Basic(old)), Auth::Basic(incoming)) => Some(Auth::Basic(BasicAuth {
            user: prefer_new(&incoming.user, old.user),
            password: prefer_new(&incoming.password, old.password),
        })),
        #[expect(
            unreachable_patterns,
            reason = "basic is the only credential kind; mixed kinds replace"
        )]
        (None | Some(_), incoming) => Some(incoming.clone()),
    }
}

fn prefer_new(new: &str, old: String) -> String {
    if new.is_empty() { old } else { new.to_owned() }
}
