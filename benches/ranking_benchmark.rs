use criterion::{black_box, criterion_group, criterion_main, Criterion};
use recipesense::{
    core::RecipeRecord,
    ranking::{normalize_ingredient, IntelligenceRanker, Ranker},
};

fn create_test_recipes(count: usize) -> Vec<RecipeRecord> {
    (0..count)
        .map(|i| {
            RecipeRecord::new(i as i64, format!("Test Recipe {}", i))
                .with_counts(i % 5, i % 7)
                .with_likes((i * 13 % 120) as i64)
        })
        .collect()
}

fn bench_intelligence_ranking(c: &mut Criterion) {
    let ranker = IntelligenceRanker::new();

    let recipes_12 = create_test_recipes(12);
    let recipes_50 = create_test_recipes(50);
    let recipes_100 = create_test_recipes(100);

    c.bench_function("intelligence_rank_12", |b| {
        b.iter(|| black_box(ranker.rank(recipes_12.clone(), "eggs, tomatoes, rice")));
    });

    c.bench_function("intelligence_rank_50", |b| {
        b.iter(|| black_box(ranker.rank(recipes_50.clone(), "eggs, tomatoes, rice")));
    });

    c.bench_function("intelligence_rank_100", |b| {
        b.iter(|| black_box(ranker.rank(recipes_100.clone(), "eggs, tomatoes, rice")));
    });
}

fn bench_normalize(c: &mut Criterion) {
    c.bench_function("normalize_ingredient", |b| {
        b.iter(|| black_box(normalize_ingredient(black_box("  Cherry Tomatoes "))));
    });
}

criterion_group!(benches, bench_intelligence_ranking, bench_normalize);
criterion_main!(benches);
