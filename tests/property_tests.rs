use std::collections::HashSet;

use proptest::prelude::*;
use rand::rngs::StdRng;
use rand::SeedableRng;

use donor_match::core::{DonorEdits, DonorMatcher, ExclusionSet, MatchCriteria};
use donor_match::models::{Donor, DonorId, Engagement};

const CITIES: &[&str] = &["Reno", "Boise", "Tulsa"];
const FOCUSES: &[&str] = &["Brain Cancer", "Cardiology", "Diabetes"];
const TIERS: &[Engagement] = &[Engagement::High, Engagement::Moderate, Engagement::Rare];

fn donor_strategy() -> impl Strategy<Value = (u8, u8, u8)> {
    (0u8..3, 0u8..3, 0u8..3)
}

fn build_pool(attrs: &[(u8, u8, u8)]) -> Vec<Donor> {
    attrs
        .iter()
        .enumerate()
        .map(|(i, (city, focus, tier))| Donor {
            id: i as DonorId + 1,
            name: format!("Donor {}", i + 1),
            city: CITIES[*city as usize].to_string(),
            email: format!("donor{}@example.org", i + 1),
            total_donation: 10.0,
            engagement: TIERS[*tier as usize],
            medical_focus: vec![FOCUSES[*focus as usize].to_string()],
            pmm: None,
        })
        .collect()
}

fn criteria() -> MatchCriteria {
    MatchCriteria {
        city: "Reno".to_string(),
        medical_focus: "Cardiology".to_string(),
        engagement: Engagement::High,
    }
}

#[derive(Debug, Clone)]
enum Stage {
    Add(DonorId),
    Remove(DonorId),
}

fn stage_strategy() -> impl Strategy<Value = Stage> {
    prop_oneof![
        (1i64..40).prop_map(Stage::Add),
        (1i64..40).prop_map(Stage::Remove),
    ]
}

proptest! {
    #[test]
    fn partitions_are_full_when_pool_is_large_enough(
        attrs in prop::collection::vec(donor_strategy(), 0..60),
        capacity in 1i32..15,
        seed in any::<u64>(),
    ) {
        let pool = build_pool(&attrs);
        let result = DonorMatcher::new().suggest(
            &criteria(),
            &pool,
            &ExclusionSet::empty(),
            capacity,
            &mut StdRng::seed_from_u64(seed),
        );

        let cap = capacity as usize;
        let expected = pool.len().min(cap * 2);
        prop_assert_eq!(result.len(), expected);
        prop_assert!(result.best.len() <= cap);
        prop_assert!(result.additional.len() <= cap);
        if pool.len() >= cap * 2 {
            prop_assert_eq!(result.best.len(), cap);
            prop_assert_eq!(result.additional.len(), cap);
        }
        if result.best.len() < cap {
            prop_assert!(result.additional.is_empty());
        }

        let unique: HashSet<DonorId> = result.best.iter().chain(&result.additional).map(|d| d.id).collect();
        prop_assert_eq!(unique.len(), result.len());
    }

    #[test]
    fn excluded_donors_never_suggested(
        attrs in prop::collection::vec(donor_strategy(), 1..40),
        assigned in prop::collection::vec(1i64..40, 0..15),
        stages in prop::collection::vec(stage_strategy(), 0..20),
        capacity in 1i32..10,
        seed in any::<u64>(),
    ) {
        let pool = build_pool(&attrs);
        let mut edits = DonorEdits::new();
        for stage in &stages {
            match stage {
                Stage::Add(id) => edits.stage_add(*id),
                Stage::Remove(id) => edits.stage_remove(*id),
            }
        }
        prop_assert!(edits.added.is_disjoint(&edits.removed));

        let excluded = ExclusionSet::new(&assigned, &edits);
        let result = DonorMatcher::new().suggest(
            &criteria(),
            &pool,
            &excluded,
            capacity,
            &mut StdRng::seed_from_u64(seed),
        );

        for donor in result.best.iter().chain(&result.additional) {
            prop_assert!(!excluded.contains(donor.id));
            prop_assert!(!edits.added.contains(&donor.id));
        }

        let eligible = pool.iter().filter(|d| !excluded.contains(d.id)).count();
        prop_assert_eq!(result.eligible, eligible);
        prop_assert_eq!(result.len(), eligible.min(capacity as usize * 2));
    }

    #[test]
    fn reconcile_matches_set_algebra(
        persisted in prop::collection::btree_set(1i64..30, 0..15),
        stages in prop::collection::vec(stage_strategy(), 0..20),
    ) {
        let mut edits = DonorEdits::new();
        for stage in &stages {
            match stage {
                Stage::Add(id) => edits.stage_add(*id),
                Stage::Remove(id) => edits.stage_remove(*id),
            }
        }

        let persisted: Vec<DonorId> = persisted.into_iter().collect();
        let final_ids: HashSet<DonorId> = edits.reconcile(&persisted).into_iter().collect();

        let expected: HashSet<DonorId> = persisted
            .iter()
            .copied()
            .filter(|id| !edits.removed.contains(id))
            .chain(edits.added.iter().copied())
            .collect();
        prop_assert_eq!(final_ids, expected);
    }
}
