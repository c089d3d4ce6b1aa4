use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;
use log::{debug, info, warn};

use crate::error::HarnessError;

const FIELD_DELIMITER: char = '\t';

/// One line of training data: free text and the category it belongs to
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct LabeledExample {
    pub text: String,
    pub category: String,
}

impl LabeledExample {
    pub fn new(text: impl Into<String>, category: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            category: category.into(),
        }
    }

    /// Parses a tab-delimited record.
    ///
    /// The last field is the category; every earlier field is rejoined with
    /// tabs to form the text. Returns `None` for records with fewer than two
    /// fields or a blank category.
    pub fn parse(line: &str) -> Option<Self> {
        let (text, category) = line.rsplit_once(FIELD_DELIMITER)?;
        let category = category.trim();
        if category.is_empty() {
            return None;
        }
        Some(Self::new(text, category))
    }
}

/// An ordered collection of labeled examples.
///
/// Order is file order until the dataset is shuffled by the splitter.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Dataset {
    examples: Vec<LabeledExample>,
    skipped: usize,
}

impl Dataset {
    pub fn new(examples: Vec<LabeledExample>) -> Self {
        Self { examples, skipped: 0 }
    }

    /// Loads a dataset from a UTF-8, tab-separated file.
    ///
    /// Blank lines are ignored and malformed records are skipped (see
    /// [`LabeledExample::parse`]). A missing or unreadable file fails as a
    /// whole; no partial dataset is returned.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, HarnessError> {
        let path = path.as_ref();
        info!("Loading training data from {:?}", path);

        let unavailable = |source| HarnessError::ResourceUnavailable {
            path: path.to_path_buf(),
            source,
        };
        let file = File::open(path).map_err(unavailable)?;
        let dataset = Self::from_reader(BufReader::new(file)).map_err(unavailable)?;

        info!(
            "Loaded {} examples ({} malformed lines skipped)",
            dataset.len(),
            dataset.skipped
        );
        Ok(dataset)
    }

    /// Parses records from any buffered reader, in source order
    pub fn from_reader<R: BufRead>(reader: R) -> std::io::Result<Self> {
        let mut examples = Vec::new();
        let mut skipped = 0;

        for (number, line) in reader.lines().enumerate() {
            let line = line?;
            if line.trim().is_empty() {
                continue;
            }
            match LabeledExample::parse(&line) {
                Some(example) => examples.push(example),
                None => {
                    debug!("Skipping malformed line {}: {:?}", number + 1, line);
                    skipped += 1;
                }
            }
        }

        if skipped > 0 {
            warn!("Skipped {} malformed lines", skipped);
        }
        Ok(Self { examples, skipped })
    }

    pub fn len(&self) -> usize {
        self.examples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.examples.is_empty()
    }

    /// Number of malformed lines excluded while loading
    pub fn skipped(&self) -> usize {
        self.skipped
    }

    pub fn examples(&self) -> &[LabeledExample] {
        &self.examples
    }

    pub fn iter(&self) -> std::slice::Iter<'_, LabeledExample> {
        self.examples.iter()
    }

    pub fn into_examples(self) -> Vec<LabeledExample> {
        self.examples
    }
}

impl From<Vec<LabeledExample>> for Dataset {
    fn from(examples: Vec<LabeledExample>) -> Self {
        Self::new(examples)
    }
}

impl FromIterator<LabeledExample> for Dataset {
    fn from_iter<I: IntoIterator<Item = LabeledExample>>(iter: I) -> Self {
        Self::new(iter.into_iter().collect())
    }
}

impl<'a> IntoIterator for &'a Dataset {
    type Item = &'a LabeledExample;
    type IntoIter = std::slice::Iter<'a, LabeledExample>;

    fn into_iter(self) -> Self::IntoIter {
        self.examples.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    fn parse(input: &str) -> Dataset {
        Dataset::from_reader(Cursor::new(input)).unwrap()
    }

    #[test]
    fn test_parses_records_in_order() {
        let dataset = parse("I love it\tpos\nI hate it\tneg\n");
        assert_eq!(
            dataset.examples(),
            &[LabeledExample::new("I love it", "pos"), LabeledExample::new("I hate it", "neg")]
        );
    }

    #[test]
    fn test_extra_tabs_stay_in_text() {
        let dataset = parse("left\tright\tlabel");
        assert_eq!(dataset.examples()[0], LabeledExample::new("left\tright", "label"));
    }

    #[test]
    fn test_malformed_and_blank_lines() {
        let dataset = parse("just one field\n\n   \ngood\tyes\nno category\t  \n");
        assert_eq!(dataset.len(), 1);
        assert_eq!(dataset.skipped(), 2);
        assert_eq!(dataset.examples()[0].category, "yes");
    }

    #[test]
    fn test_windows_line_endings() {
        let dataset = parse("text\tcat\r\nmore\tdog\r\n");
        assert_eq!(dataset.examples()[0].category, "cat");
        assert_eq!(dataset.examples()[1].category, "dog");
    }

    #[test]
    fn test_empty_input() {
        let dataset = parse("");
        assert!(dataset.is_empty());
        assert_eq!(dataset.skipped(), 0);
    }

    #[test]
    fn test_missing_file() {
        let result = Dataset::load("/nonexistent/textcat/train.tsv");
        assert!(matches!(result, Err(HarnessError::ResourceUnavailable { .. })));
    }
}
