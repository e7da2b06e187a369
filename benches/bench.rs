// Criterion benchmarks for Donor Match

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use donor_match::core::{DonorEdits, DonorMatcher, ExclusionSet, FilterPass, MatchCriteria};
use donor_match::models::{Donor, DonorId, Engagement};
use rand::rngs::StdRng;
use rand::SeedableRng;

const CITIES: &[&str] = &["Boston", "Chicago", "Denver", "Seattle", "Austin"];
const FOCUSES: &[&str] = &["Brain Cancer", "Cardiology", "Diabetes", "Pediatrics"];
const TIERS: &[Engagement] = &[Engagement::High, Engagement::Moderate, Engagement::Rare];

fn create_donor(id: usize) -> Donor {
    Donor {
        id: id as DonorId,
        name: format!("Donor {}", id),
        city: CITIES[id % CITIES.len()].to_string(),
        email: format!("donor{}@example.org", id),
        total_donation: (id * 37 % 5000) as f64,
        engagement: TIERS[id % TIERS.len()],
        medical_focus: vec![
            FOCUSES[id % FOCUSES.len()].to_string(),
            FOCUSES[(id / 3) % FOCUSES.len()].to_string(),
        ],
        pmm: None,
    }
}

fn create_criteria() -> MatchCriteria {
    MatchCriteria {
        city: "Denver".to_string(),
        medical_focus: "Pediatrics".to_string(),
        engagement: Engagement::High,
    }
}

fn bench_filter_pass(c: &mut Criterion) {
    let donor = create_donor(7);
    let criteria = create_criteria();

    c.bench_function("filter_cascade_single_donor", |b| {
        b.iter(|| {
            FilterPass::CASCADE
                .iter()
                .position(|pass| pass.matches(black_box(&donor), black_box(&criteria)))
        });
    });
}

fn bench_suggest(c: &mut Criterion) {
    let matcher = DonorMatcher::new();
    let criteria = create_criteria();

    let mut group = c.benchmark_group("suggest");

    for pool_size in [100, 1000, 10_000].iter() {
        let pool: Vec<Donor> = (0..*pool_size).map(create_donor).collect();

        let mut edits = DonorEdits::new();
        for id in (0..*pool_size as DonorId).step_by(10) {
            edits.stage_add(id);
        }
        let excluded = ExclusionSet::new(&[], &edits);

        group.bench_with_input(
            BenchmarkId::new("capacity_50", pool_size),
            pool_size,
            |b, _| {
                let mut rng = StdRng::seed_from_u64(17);
                b.iter(|| {
                    matcher.suggest(
                        black_box(&criteria),
                        black_box(&pool),
                        black_box(&excluded),
                        black_box(50),
                        &mut rng,
                    )
                });
            },
        );
    }

    group.finish();
}

fn bench_backfill_heavy(c: &mut Criterion) {
    let matcher = DonorMatcher::new();
    let criteria = MatchCriteria {
        city: "Nowhere".to_string(),
        medical_focus: "None".to_string(),
        engagement: Engagement::High,
    };
    let pool: Vec<Donor> = (0..2000)
        .map(create_donor)
        .map(|mut d| {
            d.engagement = Engagement::Rare;
            d
        })
        .collect();

    c.bench_function("suggest_all_backfill_2000", |b| {
        let mut rng = StdRng::seed_from_u64(5);
        b.iter(|| matcher.suggest(&criteria, black_box(&pool), &ExclusionSet::empty(), 200, &mut rng));
    });
}

criterion_group!(benches, bench_filter_pass, bench_suggest, bench_backfill_heavy);

criterion_main!(benches);
