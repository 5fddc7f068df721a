use std::collections::HashSet;

use crate::graph::Package;

/// Pseudo-import emitted by foreign-language interop; never resolvable,
/// so it is in the exact-ignore set from the start.
const FOREIGN_SENTINEL: &str = "c";

/// Decides which packages and edges make it into the rendered graph.
///
/// User-supplied lists are lower-cased and trimmed at configuration time
/// and matched case-insensitively. The base path comes from resolved
/// import paths and is matched case-sensitively.
pub struct FilterPolicy {
    ignored: HashSet<String>,
    ignored_prefixes: Vec<String>,
    included_prefixes: Vec<String>,
    base_path: Option<String>,
    infer_base: bool,
    ignore_platform: bool,
}

impl FilterPolicy {
    pub fn new() -> Self {
        Self {
            ignored: HashSet::from([FOREIGN_SENTINEL.to_string()]),
            ignored_prefixes: Vec::new(),
            included_prefixes: Vec::new(),
            base_path: None,
            infer_base: false,
            ignore_platform: false,
        }
    }

    pub fn ignore_platform(mut self, on: bool) -> Self {
        self.ignore_platform = on;
        self
    }

    pub fn ignore_exact<I, S>(mut self, paths: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        for p in paths {
            let p = p.as_ref().trim().to_lowercase();
            if !p.is_empty() {
                self.ignored.insert(p);
            }
        }
        self
    }

    pub fn ignore_prefixes<I, S>(mut self, prefixes: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        self.ignored_prefixes.extend(sanitize(prefixes));
        self
    }

    pub fn include_prefixes<I, S>(mut self, prefixes: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        self.included_prefixes.extend(sanitize(prefixes));
        self
    }

    /// Enable base-path restriction; the base is inferred from the first
    /// resolved package via [`observe_root`](Self::observe_root).
    pub fn filter_by_base_path(mut self, on: bool) -> Self {
        self.infer_base = on;
        self
    }

    pub fn base_path(&self) -> Option<&str> {
        self.base_path.as_deref()
    }

    /// Fix the base path from the root package's import path: its parent
    /// segment (everything before the last `/`). Only the first call with
    /// inference enabled has any effect.
    pub fn observe_root(&mut self, import_path: &str) {
        if self.infer_base && self.base_path.is_none() {
            if let Some((parent, _)) = import_path.rsplit_once('/') {
                self.base_path = Some(parent.to_string());
            }
        }
    }

    /// Pre-resolution short-circuit: exact-ignored paths are never resolved
    /// at all, so their subtrees stay undiscovered.
    pub fn skip_resolution(&self, import_path: &str) -> bool {
        self.ignored.contains(&import_path.to_lowercase())
    }

    /// The always-include override wins over every other rule.
    pub fn is_ignored(&self, pkg: &Package) -> bool {
        if self.always_included(&pkg.import_path) {
            return false;
        }
        self.ignored.contains(&pkg.import_path.to_lowercase())
            || (pkg.is_platform && self.ignore_platform)
            || has_prefix_ci(&pkg.import_path, &self.ignored_prefixes)
            || self.outside_base(&pkg.import_path)
    }

    pub fn always_included(&self, import_path: &str) -> bool {
        has_prefix_ci(import_path, &self.included_prefixes)
    }

    /// True when a base path is set and the path falls outside it.
    pub fn outside_base(&self, import_path: &str) -> bool {
        self.base_path
            .as_deref()
            .is_some_and(|base| !import_path.starts_with(base))
    }

    /// True when a base path is set and the path falls inside it.
    pub fn in_base_path(&self, import_path: &str) -> bool {
        self.base_path
            .as_deref()
            .is_some_and(|base| import_path.starts_with(base))
    }
}

impl Default for FilterPolicy {
    fn default() -> Self {
        Self::new()
    }
}

fn sanitize<I, S>(values: I) -> Vec<String>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    values
        .into_iter()
        .map(|v| v.as_ref().trim().to_lowercase())
        .filter(|v| !v.is_empty())
        .collect()
}

fn has_prefix_ci(s: &str, prefixes: &[String]) -> bool {
    let lower = s.to_lowercase();
    prefixes.iter().any(|p| lower.starts_with(p.as_str()))
}
