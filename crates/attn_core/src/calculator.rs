//! Priority and urgency scoring.
//!
//! Pure functions over two resolved trees. Every (path, facet, key) found
//! in either tree is scored; a value missing on one side counts as 0.0.

use crate::resolver::{ResolvedData, ResolvedTree};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// One item of the score ranking. Lower score is more urgent.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoredItem {
    /// Directory key.
    pub path: String,
    /// Facet name.
    pub facet: String,
    /// Attribute key.
    pub attribute: String,
    /// Resolved attribute value.
    pub attribute_value: f64,
    /// Resolved priority value.
    pub priority_value: f64,
    /// `attribute_value * priority_value`.
    pub score: f64,
}

/// One item of the urgency ranking. Higher urgency is more urgent.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UrgencyItem {
    /// Directory key.
    pub path: String,
    /// Facet name.
    pub facet: String,
    /// Attribute key.
    pub attribute: String,
    /// Resolved attribute value.
    pub attribute_value: f64,
    /// Resolved priority value.
    pub priority_value: f64,
    /// `(1 - attribute_value) * priority_value`.
    pub urgency: f64,
    /// `attribute_value * 100`, rounded to one decimal.
    pub completion_percent: f64,
}

/// A (path, facet, key) triple with both resolved values.
struct Entry<'a> {
    path: &'a str,
    facet: &'a str,
    attribute: &'a str,
    attribute_value: f64,
    priority_value: f64,
}

/// Ranks items of resolved attribute/priority trees.
///
/// # Examples
///
/// ```
/// use attn_core::{Calculator, ResolvedTree};
///
/// let mut attributes = ResolvedTree::new();
/// attributes.entry(".".into()).or_default()
///     .entry("Operator".into()).or_default()
///     .insert("event_processing_works".into(), 0.0);
/// let mut priorities = ResolvedTree::new();
/// priorities.entry(".".into()).or_default()
///     .entry("Operator".into()).or_default()
///     .insert("event_processing_works".into(), 1.0);
///
/// let ranking = Calculator::new(&attributes, &priorities).urgency_ranking();
/// assert_eq!(ranking[0].urgency, 1.0);
/// ```
pub struct Calculator<'a> {
    attributes: &'a ResolvedTree,
    priorities: &'a ResolvedTree,
}

impl<'a> Calculator<'a> {
    /// Creates a calculator over two resolved trees.
    pub fn new(attributes: &'a ResolvedTree, priorities: &'a ResolvedTree) -> Self {
        Self {
            attributes,
            priorities,
        }
    }

    /// Creates a calculator over resolver output.
    pub fn from_resolved(data: &'a ResolvedData) -> Self {
        Self::new(&data.attributes, &data.priorities)
    }

    /// Items sorted by ascending score, most urgent first.
    ///
    /// Ties keep path, facet, key order.
    pub fn score_ranking(&self) -> Vec<ScoredItem> {
        let mut items: Vec<ScoredItem> = self
            .entries()
            .into_iter()
            .map(|e| ScoredItem {
                path: e.path.to_string(),
                facet: e.facet.to_string(),
                attribute: e.attribute.to_string(),
                attribute_value: e.attribute_value,
                priority_value: e.priority_value,
                score: e.attribute_value * e.priority_value,
            })
            .collect();
        items.sort_by(|a, b| a.score.total_cmp(&b.score));
        items
    }

    /// Items sorted by descending urgency, most urgent first.
    ///
    /// Ties keep path, facet, key order.
    pub fn urgency_ranking(&self) -> Vec<UrgencyItem> {
        let mut items: Vec<UrgencyItem> = self
            .entries()
            .into_iter()
            .map(|e| UrgencyItem {
                path: e.path.to_string(),
                facet: e.facet.to_string(),
                attribute: e.attribute.to_string(),
                attribute_value: e.attribute_value,
                priority_value: e.priority_value,
                urgency: (1.0 - e.attribute_value) * e.priority_value,
                completion_percent: round_to(e.attribute_value * 100.0, 1),
            })
            .collect();
        items.sort_by(|a, b| b.urgency.total_cmp(&a.urgency));
        items
    }

    /// Union of both trees in lexicographic path, facet, key order.
    fn entries(&self) -> Vec<Entry<'a>> {
        let attributes = self.attributes;
        let priorities = self.priorities;

        let paths: BTreeSet<&'a str> = attributes
            .keys()
            .chain(priorities.keys())
            .map(String::as_str)
            .collect();

        let mut out = Vec::new();
        for path in paths {
            let attr_facets = attributes.get(path);
            let prio_facets = priorities.get(path);

            let facets: BTreeSet<&'a str> = attr_facets
                .into_iter()
                .flat_map(|m| m.keys())
                .chain(prio_facets.into_iter().flat_map(|m| m.keys()))
                .map(String::as_str)
                .collect();

            for facet in facets {
                let attr_values = attr_facets.and_then(|m| m.get(facet));
                let prio_values = prio_facets.and_then(|m| m.get(facet));

                let keys: BTreeSet<&'a str> = attr_values
                    .into_iter()
                    .flat_map(|m| m.keys())
                    .chain(prio_values.into_iter().flat_map(|m| m.keys()))
                    .map(String::as_str)
                    .collect();

                for attribute in keys {
                    out.push(Entry {
                        path,
                        facet,
                        attribute,
                        attribute_value: attr_values
                            .and_then(|m| m.get(attribute))
                            .copied()
                            .unwrap_or(0.0),
                        priority_value: prio_values
                            .and_then(|m| m.get(attribute))
                            .copied()
                            .unwrap_or(0.0),
                    });
                }
            }
        }
        out
    }
}

/// Aggregate figures over an urgency ranking.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RankingSummary {
    /// Number of ranked items.
    pub total_items: usize,
    /// Items with urgency above 0.8.
    pub high_urgency: usize,
    /// Items with urgency above 0.5, up to 0.8.
    pub medium_urgency: usize,
    /// Items with urgency of at most 0.5.
    pub low_urgency: usize,
    /// Mean completion in percent, one decimal.
    pub average_completion: f64,
    /// Mean urgency, four decimals.
    pub average_urgency: f64,
}

impl RankingSummary {
    /// Summarizes an urgency ranking.
    pub fn from_urgency(items: &[UrgencyItem]) -> Self {
        if items.is_empty() {
            return Self::default();
        }

        let n = items.len() as f64;
        let completion: f64 = items.iter().map(|i| i.attribute_value).sum();
        let urgency: f64 = items.iter().map(|i| i.urgency).sum();

        Self {
            total_items: items.len(),
            high_urgency: items.iter().filter(|i| i.urgency > 0.8).count(),
            medium_urgency: items
                .iter()
                .filter(|i| i.urgency > 0.5 && i.urgency <= 0.8)
                .count(),
            low_urgency: items.iter().filter(|i| i.urgency <= 0.5).count(),
            average_completion: round_to(completion / n * 100.0, 1),
            average_urgency: round_to(urgency / n, 4),
        }
    }
}

fn round_to(value: f64, decimals: i32) -> f64 {
    let factor = 10f64.powi(decimals);
    (value * factor).round() / factor
}
