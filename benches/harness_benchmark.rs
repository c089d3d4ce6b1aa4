use criterion::{black_box, criterion_group, criterion_main, Criterion};
use textcat::{BayesClassifier, Dataset, Evaluator, LabeledExample, Splitter, TextClassifier, TrainingDriver};

const TOPICS: [(&str, &str); 5] = [
    ("tech", "software release programming code compiler database network"),
    ("sports", "match team goal championship tournament player score"),
    ("business", "stock market earnings merger startup funding revenue"),
    ("science", "research experiment discovery planet molecule theory"),
    ("entertainment", "movie premiere celebrity album concert festival award"),
];

fn synthetic_dataset(size: usize) -> Dataset {
    (0..size)
        .map(|i| {
            let (category, vocabulary) = TOPICS[i % TOPICS.len()];
            let words: Vec<&str> = vocabulary.split(' ').collect();
            let text = (0..8)
                .map(|j| words[(i * 7 + j * 3) % words.len()])
                .collect::<Vec<_>>()
                .join(" ");
            LabeledExample::new(text, category)
        })
        .collect()
}

fn setup_benchmark_classifier(size: usize) -> BayesClassifier {
    let mut classifier = BayesClassifier::new();
    TrainingDriver::train(&mut classifier, &synthetic_dataset(size)).unwrap();
    classifier
}

fn bench_training(c: &mut Criterion) {
    let mut group = c.benchmark_group("Training");
    group.sample_size(50);
    group.warm_up_time(std::time::Duration::from_secs(1));

    for &size in &[100, 1_000, 10_000] {
        let dataset = synthetic_dataset(size);
        group.bench_function(format!("examples_{}", size), |b| b.iter(|| {
            let mut classifier = BayesClassifier::new();
            TrainingDriver::train(&mut classifier, black_box(&dataset)).unwrap()
        }));
    }

    group.finish();
}

fn bench_prediction(c: &mut Criterion) {
    let classifier = setup_benchmark_classifier(1_000);
    let mut group = c.benchmark_group("Prediction");
    group.sample_size(50);
    group.warm_up_time(std::time::Duration::from_secs(1));

    group.bench_function("short_text", |b| b.iter(|| {
        classifier.classify_category(black_box("startup funding round")).unwrap()
    }));

    group.bench_function("long_text", |b| b.iter(|| {
        classifier.classify_category(black_box(
            "The research team announced a discovery at the festival while the stock \
             market reacted to the merger and the championship match ended with a late \
             goal, all covered by a software release note about the new compiler."
        )).unwrap()
    }));

    group.finish();
}

fn bench_evaluation(c: &mut Criterion) {
    let mut group = c.benchmark_group("Evaluation");
    group.sample_size(30);

    let split = Splitter::default().split_seeded(synthetic_dataset(5_000), 42);
    let mut classifier = BayesClassifier::new();
    TrainingDriver::train(&mut classifier, &split.train).unwrap();

    group.bench_function("evaluate_1000", |b| b.iter(|| {
        Evaluator::evaluate(&classifier, black_box(&split.test)).unwrap()
    }));

    group.bench_function("serialize_binary", |b| b.iter(|| {
        black_box(&classifier).to_bytes().unwrap()
    }));

    group.finish();
}

criterion_group!(
    benches,
    bench_training,
    bench_prediction,
    bench_evaluation
);
criterion_main!(benches);
