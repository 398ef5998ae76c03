// Keyed data join.
//
// Partitions incoming keys against existing elements:
// - update: key present on both sides (first unclaimed existing element wins)
// - enter:  key only in the incoming set, or a repeat of an already claimed key
// - exit:   existing elements never claimed, including repeated existing keys

use std::collections::{HashMap, HashSet};

use super::ElementId;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct JoinPlan {
    /// Indices into the incoming list.
    pub enter: Vec<usize>,
    /// (existing element, incoming index)
    pub update: Vec<(ElementId, usize)>,
    pub exit: Vec<ElementId>,
}

impl JoinPlan {
    pub fn by_key<'a, I, K>(existing: I, incoming: &[K]) -> JoinPlan
    where
        I: IntoIterator<Item = (ElementId, &'a str)>,
        K: AsRef<str>,
    {
        let mut plan = JoinPlan::default();
        let mut by_key: HashMap<&str, ElementId> = HashMap::new();
        let mut order: Vec<ElementId> = Vec::new();

        for (id, key) in existing {
            order.push(id);
            if by_key.contains_key(key) {
                plan.exit.push(id);
            } else {
                by_key.insert(key, id);
            }
        }

        for (i, key) in incoming.iter().enumerate() {
            match by_key.remove(key.as_ref()) {
                Some(id) => plan.update.push((id, i)),
                None => plan.enter.push(i),
            }
        }

        let unclaimed: HashSet<ElementId> = by_key.into_values().collect();
        plan.exit.extend(order.into_iter().filter(|id| unclaimed.contains(id)));
        plan
    }

    pub fn summary(&self) -> JoinSummary {
        JoinSummary { entered: self.enter.len(), updated: self.update.len(), exited: self.exit.len() }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct JoinSummary {
    pub entered: usize,
    pub updated: usize,
    pub exited: usize,
}
