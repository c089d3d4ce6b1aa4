use std::io::Cursor;
use textcat::{
    BayesClassifier, ConfusionMatrix, Dataset, Evaluator, LabeledExample, Splitter, TextClassifier,
};

fn dataset(input: &str) -> Dataset {
    Dataset::from_reader(Cursor::new(input)).unwrap()
}

#[test]
fn test_single_field_line_is_excluded() {
    let loaded = dataset("just one field\nreal text\treal");
    assert_eq!(loaded.len(), 1);
    assert_eq!(loaded.skipped(), 1);
    assert_eq!(loaded.examples()[0], LabeledExample::new("real text", "real"));
}

#[test]
fn test_split_is_a_partition() {
    let lines: String = (0..37).map(|i| format!("text number {}\tc{}\n", i, i % 4)).collect();
    let original = dataset(&lines);

    for seed in 0..5 {
        let split = Splitter::default().split_seeded(original.clone(), seed);
        assert_eq!(split.train.len(), 29);
        assert_eq!(split.test.len(), 8);

        let mut union: Vec<LabeledExample> =
            split.train.iter().chain(split.test.iter()).cloned().collect();
        let mut expected = original.examples().to_vec();
        union.sort_by(|a, b| a.text.cmp(&b.text));
        expected.sort_by(|a, b| a.text.cmp(&b.text));
        assert_eq!(union, expected);
    }
}

#[test]
fn test_confusion_matrix_sums_to_test_size() -> Result<(), Box<dyn std::error::Error>> {
    let mut classifier = BayesClassifier::new();
    classifier.train("sunny warm day", "weather")?;
    classifier.train("rain and clouds", "weather")?;
    classifier.train("goal scored in the match", "sports")?;

    let test: Dataset = vec![
        LabeledExample::new("warm rain", "weather"),
        LabeledExample::new("match day", "sports"),
        LabeledExample::new("goal", "sports"),
        LabeledExample::new("unseen words", "politics"),
        LabeledExample::new("", "weather"),
    ]
    .into();

    let evaluation = Evaluator::evaluate(&classifier, &test)?;
    let matrix = &evaluation.matrix;
    let sum: u64 = matrix
        .labels()
        .iter()
        .flat_map(|a| matrix.labels().iter().map(move |p| (a, p)))
        .map(|(a, p)| matrix.get(a, p))
        .sum();
    assert_eq!(sum, test.len() as u64);
    assert_eq!(evaluation.test_size(), 5);

    // A category the classifier never learned can't be predicted.
    let politics = evaluation.metrics["politics"];
    assert_eq!(politics.precision, 0.0);
    assert_eq!(politics.recall, 0.0);
    assert_eq!(politics.f1, 0.0);
    Ok(())
}

#[test]
fn test_metrics_follow_matrix_counts() {
    let matrix = ConfusionMatrix::from_pairs(&[
        ("spam", "spam"),
        ("spam", "spam"),
        ("spam", "ham"),
        ("ham", "ham"),
        ("ham", "ham"),
        ("ham", "spam"),
    ]);
    let spam = matrix.category_metrics("spam");
    assert!((spam.precision - 2.0 / 3.0).abs() < 1e-12);
    assert!((spam.recall - 2.0 / 3.0).abs() < 1e-12);
    assert!((spam.f1 - 2.0 / 3.0).abs() < 1e-12);
    assert!((matrix.accuracy().unwrap() - 4.0 / 6.0).abs() < 1e-12);
}

#[test]
fn test_empty_test_set_is_an_error() {
    let classifier = BayesClassifier::new();
    let result = Evaluator::evaluate(&classifier, &Dataset::default());
    assert!(matches!(result, Err(textcat::HarnessError::EmptyTestSet)));
}
