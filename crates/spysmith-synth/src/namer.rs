//! Member naming.
//!
//! Every method of an interface gets a variable prefix that all of its
//! tracking fields share (`fetchIdCallsCount`, `fetchIdClosure`, ...).
//! Prefixes must be unique within one interface, so overloads are
//! disambiguated in stages:
//!
//! 1. name + capitalized call-site labels
//! 2. + sanitized return type (`Void` when there is none)
//! 3. name + labels + sanitized parameter types + return label
//! 4. stage 3 + a 1-based ordinal in declaration order
//!
//! A member only moves to the next stage while its candidate collides.

use indexmap::IndexMap;
use rustc_hash::FxHashSet;
use smallvec::SmallVec;
use spysmith_syntax::MethodMember;
use tracing::trace;

use crate::type_analysis::sanitized_label;

/// Uppercase the first character, dropping surrounding backticks.
///
/// `id` -> `Id`, `` `default` `` -> `Default`.
#[must_use]
pub fn capitalize_first(text: &str) -> String {
    let text = text.trim_matches('`');
    let mut chars = text.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

/// Stage 1 prefix: method name followed by its capitalized call-site labels.
///
/// `fetch(id:)` -> `fetchId`, `foo(_ x:)` -> `foo`.
#[must_use]
pub fn prefix(method: &MethodMember) -> String {
    let mut out = method.name.trim_matches('`').to_string();
    for label in method.parameters.iter().filter_map(|p| p.call_label()) {
        out.push_str(&capitalize_first(label));
    }
    out
}

fn return_label(method: &MethodMember) -> String {
    method
        .return_type
        .as_ref()
        .map_or_else(|| "Void".to_string(), sanitized_label)
}

fn parameter_types_label(method: &MethodMember) -> String {
    let mut out = String::new();
    for param in &method.parameters {
        if param.is_inout {
            out.push_str("Inout");
        }
        if param.is_variadic {
            out.push_str("Variadic");
        }
        out.push_str(&sanitized_label(&param.ty));
    }
    out
}

/// Prefixes already handed out within one interface.
#[derive(Debug, Default)]
pub struct UsedPrefixes {
    taken: FxHashSet<String>,
}

impl UsedPrefixes {
    #[must_use]
    pub fn contains(&self, candidate: &str) -> bool {
        self.taken.contains(candidate)
    }

    /// Take `candidate`. Returns false if it was already taken.
    pub fn claim(&mut self, candidate: &str) -> bool {
        self.taken.insert(candidate.to_string())
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.taken.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.taken.is_empty()
    }
}

type Group = SmallVec<[usize; 4]>;

/// Group member indices by candidate, keeping first-seen order.
fn group_by<'a>(
    members: &[usize],
    candidate: impl Fn(usize) -> &'a str,
) -> IndexMap<&'a str, Group> {
    let mut groups: IndexMap<&str, Group> = IndexMap::new();
    for &index in members {
        groups.entry(candidate(index)).or_default().push(index);
    }
    groups
}

/// Claim every candidate that is unique among `members` and not yet taken.
/// Returns the members that still collide, in declaration order.
fn claim_unique(
    members: &[usize],
    candidates: &[String],
    resolved: &mut [Option<String>],
    used: &mut UsedPrefixes,
) -> Vec<usize> {
    let groups = group_by(members, |index| candidates[index].as_str());
    let mut colliding = Vec::new();
    for (candidate, group) in &groups {
        if group.len() == 1 && !used.contains(candidate) {
            used.claim(candidate);
            resolved[group[0]] = Some((*candidate).to_string());
        } else {
            colliding.extend(group.iter().copied());
        }
    }
    colliding.sort_unstable();
    colliding
}

/// Assign a unique variable prefix to every method, in declaration order.
#[must_use]
pub fn resolve(methods: &[MethodMember]) -> Vec<String> {
    let mut used = UsedPrefixes::default();
    let mut resolved: Vec<Option<String>> = vec![None; methods.len()];
    let all: Vec<usize> = (0..methods.len()).collect();

    // Stage 1
    let stage1: Vec<String> = methods.iter().map(prefix).collect();
    let pending = claim_unique(&all, &stage1, &mut resolved, &mut used);

    // Stage 2
    let stage2: Vec<String> = methods
        .iter()
        .zip(&stage1)
        .map(|(method, base)| format!("{base}{}", return_label(method)))
        .collect();
    let pending = claim_unique(&pending, &stage2, &mut resolved, &mut used);

    // Stage 3
    let stage3: Vec<String> = methods
        .iter()
        .zip(&stage1)
        .map(|(method, base)| {
            format!(
                "{base}{}{}",
                parameter_types_label(method),
                return_label(method)
            )
        })
        .collect();
    let pending = claim_unique(&pending, &stage3, &mut resolved, &mut used);

    // Stage 4: ordinals count within each remaining stage-3 group
    for group in group_by(&pending, |index| stage3[index].as_str()).values() {
        let mut ordinal = 1usize;
        for &index in group {
            let mut candidate = format!("{}{ordinal}", stage3[index]);
            while !used.claim(&candidate) {
                ordinal += 1;
                candidate = format!("{}{ordinal}", stage3[index]);
            }
            ordinal += 1;
            resolved[index] = Some(candidate);
        }
    }

    methods
        .iter()
        .zip(resolved)
        .zip(stage1)
        .map(|((method, resolved), base)| {
            let prefix = resolved.unwrap_or(base);
            trace!(method = %method.name, prefix = %prefix, "resolved member prefix");
            prefix
        })
        .collect()
}

#[cfg(test)]
#[path = "../tests/namer_tests.rs"]
mod tests;
