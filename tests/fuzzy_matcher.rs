use zoomBridge::resolver::matcher::{
    rank, rank_with, CandidateRecord, FieldWeights, ScoreStrategy, MATCH_THRESHOLD,
};

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
        CandidateRecord::from_pairs(&[
            ("name", "Sara Connor"),
            ("email", "sara@initech.com"),
            ("company", "Initech"),
        ]),
    ]
}

#[test]
fn first_name_query_ranks_the_right_contact_first() {
    let ranked = rank("sarah", &contacts(), &FieldWeights::contacts());
    assert!(!ranked.is_empty());
    assert_eq!(ranked[0].record.field("name"), Some("Sarah Johnson"));
    assert!(ranked[0].score > MATCH_THRESHOLD);
}

#[test]
fn scores_descend() {
    let ranked = rank("sara", &contacts(), &FieldWeights::contacts());
    assert!(ranked.len() >= 2);
    for pair in ranked.windows(2) {
        assert!(pair[0].score >= pair[1].score);
    }
}

#[test]
fn unmatched_query_returns_empty_not_error() {
    let ranked = rank("zzz", &contacts(), &FieldWeights::contacts());
    assert!(ranked.is_empty());
}

#[test]
fn company_query_still_finds_the_contact() {
    let weights = FieldWeights::new(&[("company", 1.0)]);
    let ranked = rank("globex", &contacts(), &weights);
    assert_eq!(ranked.len(), 1);
    assert_eq!(ranked[0].record.field("name"), Some("John Smith"));
    assert_eq!(ranked[0].score, 1.0);
}

#[test]
fn meeting_topic_fragment_matches() {
    let meetings = vec![
        CandidateRecord::from_pairs(&[("topic", "Team Standup"), ("id", "1")]),
        CandidateRecord::from_pairs(&[("topic", "Think Tank Meeting"), ("id", "2")]),
    ];
    let ranked = rank("think tank", &meetings, &FieldWeights::meetings());
    assert_eq!(ranked.len(), 1);
    assert_eq!(ranked[0].record.field("id"), Some("2"));
}

// The heuristic is swappable without touching any caller.
struct ExactOnly;

impl ScoreStrategy for ExactOnly {
    fn score_field(&self, query: &str, value: &str) -> f32 {
        if query.eq_ignore_ascii_case(value) {
            1.0
        } else {
            0.0
        }
    }
}

#[test]
fn alternate_scoring_strategy_plugs_in() {
    let weights = FieldWeights::new(&[("name", 1.0)]);
    let ranked = rank_with(&ExactOnly, "sarah johnson", &contacts(), &weights);
    assert_eq!(ranked.len(), 1);
    assert_eq!(ranked[0].record.field("name"), Some("Sarah Johnson"));

    let partial = rank_with(&ExactOnly, "sarah", &contacts(), &weights);
    assert!(partial.is_empty());
}
