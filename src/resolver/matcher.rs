use std::cmp::Ordering;
use std::collections::HashMap;

use serde::Serialize;

/// Matches scoring below this are dropped from the result. An empty result is
/// a normal outcome for a search, not an error.
pub const MATCH_THRESHOLD: f32 = 0.3;

/// One row of an externally-owned roster (a contact or a meeting), snapshotted
/// by the caller for the duration of a single match call. Field names are
/// free-form ("name", "email", "topic", ...).
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct CandidateRecord {
    fields: HashMap<String, String>,
}

impl CandidateRecord {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_field(mut self, name: &str, value: &str) -> Self {
        self.fields.insert(name.to_string(), value.to_string());
        self
    }

    pub fn from_pairs(pairs: &[(&str, &str)]) -> Self {
        let mut record = Self::new();
        for (name, value) in pairs {
            record.fields.insert((*name).to_string(), (*value).to_string());
        }
        record
    }

    pub fn field(&self, name: &str) -> Option<&str> {
        self.fields.get(name).map(String::as_str)
    }
}

/// Relative importance of each field when combining per-field scores, e.g.
/// a contact's name weighing more than their company.
#[derive(Debug, Clone)]
pub struct FieldWeights(Vec<(String, f32)>);

impl FieldWeights {
    pub fn new(pairs: &[(&str, f32)]) -> Self {
        Self(
            pairs
                .iter()
                .map(|(name, weight)| ((*name).to_string(), *weight))
                .collect(),
        )
    }

    pub fn contacts() -> Self {
        Self::new(&[("name", 0.6), ("email", 0.25), ("company", 0.15)])
    }

    pub fn meetings() -> Self {
        Self::new(&[("topic", 0.7), ("agenda", 0.3)])
    }

    fn iter(&self) -> impl Iterator<Item = (&str, f32)> {
        self.0.iter().map(|(name, weight)| (name.as_str(), *weight))
    }
}

/// Pluggable similarity heuristic, so substring containment can be swapped
/// for edit distance or token overlap without touching the composer.
pub trait ScoreStrategy {
    /// Similarity of `query` to one field value, in [0, 1].
    fn score_field(&self, query: &str, value: &str) -> f32;
}

/// Case-insensitive containment: exact equality scores 1.0, a contained query
/// scores a 0.7 base plus a bonus for how much of the field it covers.
pub struct SubstringScorer;

impl ScoreStrategy for SubstringScorer {
    fn score_field(&self, query: &str, value: &str) -> f32 {
        let q = query.trim().to_lowercase();
        let v = value.trim().to_lowercase();
        if q.is_empty() || v.is_empty() {
            return 0.0;
        }
        if q == v {
            return 1.0;
        }
        if v.contains(&q) {
            return 0.7 + 0.3 * (q.len() as f32 / v.len() as f32);
        }
        0.0
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct Match {
    pub record: CandidateRecord,
    pub score: f32,
}

/// Ranked matches, descending score. Ties keep roster order.
pub type MatchResult = Vec<Match>;

pub fn rank(query: &str, candidates: &[CandidateRecord], weights: &FieldWeights) -> MatchResult {
    rank_with(&SubstringScorer, query, candidates, weights)
}

pub fn rank_with<S: ScoreStrategy + ?Sized>(
    scorer: &S,
    query: &str,
    candidates: &[CandidateRecord],
    weights: &FieldWeights,
) -> MatchResult {
    let mut matches: MatchResult = Vec::new();
    for record in candidates {
        let mut total = 0.0;
        let mut weight_sum = 0.0;
        for (field, weight) in weights.iter() {
            weight_sum += weight;
            if let Some(value) = record.field(field) {
                total += weight * scorer.score_field(query, value);
            }
        }
        if weight_sum <= 0.0 {
            continue;
        }
        let score = total / weight_sum;
        if score >= MATCH_THRESHOLD {
            matches.push(Match {
                record: record.clone(),
                score,
            });
        }
    }
    // Stable sort keeps roster order across equal scores.
    matches.sort_by(|a, b| b.score.partial_cmp(&a.score).unwrap_or(Ordering::Equal));
    matches
}

#[cfg(test)]
mod tests {
    use super::*;

    fn contacts() -> Vec<CandidateRecord> {
        vec![
            CandidateRecord::from_pairs(&[
                ("name", "Sarah Johnson"),
                ("email", "sarah.johnson@acme.com"),
                ("company", "Acme"),
            ]),
            CandidateRecord::from_pairs(&[
                ("name", "John Smith"),
                ("email", "john.smith@globex.com"),
                ("company", "Globex"),
            ]),
        ]
    }

    #[test]
    fn first_name_fragment_ranks_the_right_contact_first() {
        let ranked = rank("sarah", &contacts(), &FieldWeights::contacts());
        assert_eq!(ranked[0].record.field("name"), Some("Sarah Johnson"));
        assert!(ranked[0].score > MATCH_THRESHOLD);
    }

    #[test]
    fn no_match_is_empty_not_an_error() {
        let ranked = rank("zzz", &contacts(), &FieldWeights::contacts());
        assert!(ranked.is_empty());
    }

    #[test]
    fn exact_field_equality_beats_containment() {
        let scorer = SubstringScorer;
        assert_eq!(scorer.score_field("Acme", "acme"), 1.0);
        assert!(scorer.score_field("acm", "acme") < 1.0);
        assert!(scorer.score_field("acm", "acme") > 0.7);
    }

    #[test]
    fn ties_keep_roster_order() {
        let twins = vec![
            CandidateRecord::from_pairs(&[("name", "Ann Lee"), ("email", "first@x.com")]),
            CandidateRecord::from_pairs(&[("name", "Ann Lee"), ("email", "first@x.com")]),
        ];
        let weights = FieldWeights::new(&[("name", 1.0)]);
        let ranked = rank("ann lee", &twins, &weights);
        assert_eq!(ranked.len(), 2);
        assert_eq!(ranked[0].record.field("email"), Some("first@x.com"));
    }
}
