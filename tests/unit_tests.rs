// Unit tests for Donor Match

use donor_match::core::{
    edits::DonorEdits,
    filters::{matches_city, matches_engagement, matches_focus, ExclusionSet, FilterPass, MatchCriteria},
    matcher::DonorMatcher,
};
use donor_match::models::{Donor, Engagement, EventStatus, SuggestQuery};
use rand::rngs::StdRng;
use rand::SeedableRng;

fn create_donor(id: i64, city: &str, focus: &[&str], engagement: Engagement) -> Donor {
    Donor {
        id,
        name: format!("Donor {}", id),
        city: city.to_string(),
        email: format!("donor{}@example.org", id),
        total_donation: 75.0,
        engagement,
        medical_focus: focus.iter().map(|f| f.to_string()).collect(),
        pmm: None,
    }
}

fn create_criteria() -> MatchCriteria {
    MatchCriteria {
        city: "Portland".to_string(),
        medical_focus: "Brain Cancer".to_string(),
        engagement: Engagement::High,
    }
}

#[test]
fn test_attribute_predicates() {
    let donor = create_donor(1, "Portland", &["Cardiology", "Brain Cancer"], Engagement::Rare);
    let criteria = create_criteria();

    assert!(matches_city(&donor, &criteria));
    assert!(matches_focus(&donor, &criteria));
    assert!(!matches_engagement(&donor, &criteria));
}

#[test]
fn test_city_comparison_is_exact() {
    let donor = create_donor(1, "portland", &["Brain Cancer"], Engagement::High);
    assert!(!matches_city(&donor, &create_criteria()));
}

#[test]
fn test_cascade_order() {
    assert_eq!(FilterPass::CASCADE.len(), 7);
    assert_eq!(FilterPass::CASCADE[0], FilterPass::CityFocusEngagement);
    assert_eq!(FilterPass::CASCADE[1], FilterPass::CityEngagement);
    assert_eq!(FilterPass::CASCADE[2], FilterPass::CityFocus);
    assert_eq!(FilterPass::CASCADE[3], FilterPass::FocusEngagement);
    assert_eq!(FilterPass::CASCADE[4], FilterPass::City);
    assert_eq!(FilterPass::CASCADE[5], FilterPass::Engagement);
    assert_eq!(FilterPass::CASCADE[6], FilterPass::Focus);
}

#[test]
fn test_every_cascade_level_ranks_in_order() {
    // one donor per pass, listed in reverse so pool order cannot explain the result
    let pool = vec![
        create_donor(7, "Salem", &["Brain Cancer"], Engagement::Rare),
        create_donor(6, "Salem", &["Cardiology"], Engagement::High),
        create_donor(5, "Portland", &["Cardiology"], Engagement::Rare),
        create_donor(4, "Salem", &["Brain Cancer"], Engagement::High),
        create_donor(3, "Portland", &["Brain Cancer"], Engagement::Rare),
        create_donor(2, "Portland", &["Cardiology"], Engagement::High),
        create_donor(1, "Portland", &["Brain Cancer"], Engagement::High),
    ];

    let result = DonorMatcher::new().suggest(
        &create_criteria(),
        &pool,
        &ExclusionSet::empty(),
        4,
        &mut StdRng::seed_from_u64(0),
    );

    let order: Vec<i64> = result.best.iter().chain(&result.additional).map(|d| d.id).collect();
    assert_eq!(order, vec![1, 2, 3, 4, 5, 6, 7]);
    assert_eq!(result.backfilled, 0);
}

#[test]
fn test_pass_stops_at_target() {
    let pool: Vec<Donor> = (1..=10)
        .map(|i| create_donor(i, "Portland", &["Brain Cancer"], Engagement::High))
        .collect();

    let result = DonorMatcher::new().suggest(
        &create_criteria(),
        &pool,
        &ExclusionSet::empty(),
        2,
        &mut StdRng::seed_from_u64(0),
    );

    assert_eq!(result.len(), 4);
    assert_eq!(result.eligible, 10);
}

#[test]
fn test_exclusion_after_commit_style_edits() {
    let mut edits = DonorEdits::new();
    edits.stage_add(10);
    edits.stage_remove(10);
    edits.stage_remove(11);

    let excluded = ExclusionSet::new(&[10, 11, 12], &edits);

    assert!(!excluded.contains(10));
    assert!(!excluded.contains(11));
    assert!(excluded.contains(12));
}

#[test]
fn test_event_status_boundaries() {
    assert_eq!(EventStatus::from_counts(0, 1), EventStatus::NotStarted);
    assert_eq!(EventStatus::from_counts(1, 2), EventStatus::InProcess);
    assert_eq!(EventStatus::from_counts(2, 2), EventStatus::FullyInvited);
}

#[test]
fn test_suggest_query_deserializes_from_query_string() {
    let query: SuggestQuery =
        serde_json::from_str(r#"{"city": "Eugene", "engagement": "Moderately Engaged"}"#).unwrap();
    let overrides = query.overrides().unwrap();

    assert_eq!(overrides.city.as_deref(), Some("Eugene"));
    assert_eq!(overrides.medical_focus, None);
    assert_eq!(overrides.engagement, Some(Engagement::Moderate));
}
