//! Human-readable alignment reports and error frequency tables.
//!
//! Both report kinds accept a [`WordOutput`] or a [`CharacterOutput`] through
//! [`AlignmentView`]. Word-level reports separate tokens with a space,
//! character-level reports print tokens back to back.

use std::fmt::Write as _;
use std::hash::Hash;

use ahash::AHashMap;

use crate::measures::ErrorCounts;
use crate::types::{AlignmentChunk, CharacterOutput, EditOp, WordOutput};

/// Read access to a processed corpus
pub trait AlignmentView {
    fn references(&self) -> &[Vec<String>];
    fn hypotheses(&self) -> &[Vec<String>];
    fn alignments(&self) -> &[Vec<AlignmentChunk>];
    fn counts(&self) -> ErrorCounts;
    fn is_character_level(&self) -> bool;
    /// Named rates printed in the summary, in order
    fn summary_measures(&self) -> Vec<(&'static str, f64)>;
}

impl AlignmentView for WordOutput {
    fn references(&self) -> &[Vec<String>] {
        &self.references
    }

    fn hypotheses(&self) -> &[Vec<String>] {
        &self.hypotheses
    }

    fn alignments(&self) -> &[Vec<AlignmentChunk>] {
        &self.alignments
    }

    fn counts(&self) -> ErrorCounts {
        ErrorCounts {
            hits: self.hits,
            substitutions: self.substitutions,
            deletions: self.deletions,
            insertions: self.insertions,
        }
    }

    fn is_character_level(&self) -> bool {
        false
    }

    fn summary_measures(&self) -> Vec<(&'static str, f64)> {
        vec![
            ("mer", self.mer),
            ("wil", self.wil),
            ("wip", self.wip),
            ("wer", self.wer),
        ]
    }
}

impl AlignmentView for CharacterOutput {
    fn references(&self) -> &[Vec<String>] {
        &self.references
    }

    fn hypotheses(&self) -> &[Vec<String>] {
        &self.hypotheses
    }

    fn alignments(&self) -> &[Vec<AlignmentChunk>] {
        &self.alignments
    }

    fn counts(&self) -> ErrorCounts {
        ErrorCounts {
            hits: self.hits,
            substitutions: self.substitutions,
            deletions: self.deletions,
            insertions: self.insertions,
        }
    }

    fn is_character_level(&self) -> bool {
        true
    }

    fn summary_measures(&self) -> Vec<(&'static str, f64)> {
        vec![("cer", self.cer)]
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct VisualizeOptions {
    /// Append the `=== SUMMARY ===` block
    pub show_measures: bool,
    /// Leave out sentence pairs without any error
    pub skip_correct: bool,
    /// Best-effort wrapping of long sentences
    pub line_width: Option<usize>,
}

impl Default for VisualizeOptions {
    fn default() -> Self {
        Self {
            show_measures: true,
            skip_correct: true,
            line_width: None,
        }
    }
}

/// REF, HYP and operation rows of one block
struct Rows {
    reference: String,
    hypothesis: String,
    ops: String,
    width: usize,
}

impl Rows {
    fn new() -> Self {
        Self {
            reference: "REF: ".to_string(),
            hypothesis: "HYP: ".to_string(),
            ops: "     ".to_string(),
            width: 5,
        }
    }

    fn push_cell(&mut self, reference: &str, hypothesis: &str, mark: char, width: usize) {
        let _ = write!(self.reference, "{reference:>width$}");
        let _ = write!(self.hypothesis, "{hypothesis:>width$}");
        let _ = write!(self.ops, "{mark:>width$}");
        self.width += width;
    }

    fn push_separator(&mut self) {
        self.reference.push(' ');
        self.hypothesis.push(' ');
        self.ops.push(' ');
        self.width += 1;
    }

    /// Write the three rows, dropping the trailing separator if there is one
    fn finish(mut self, out: &mut String, separated: bool) {
        if separated {
            self.reference.pop();
            self.hypothesis.pop();
            self.ops.pop();
        }
        let _ = writeln!(out, "{}\n{}\n{}", self.reference, self.hypothesis, self.ops);
    }
}

fn comparison_rows(
    reference: &[String],
    hypothesis: &[String],
    chunks: &[AlignmentChunk],
    separated: bool,
    line_width: Option<usize>,
) -> String {
    let mut out = String::new();
    let mut rows = Rows::new();

    for chunk in chunks {
        let (mark, len) = match chunk.kind {
            EditOp::Equal => (' ', chunk.reference_len()),
            EditOp::Substitute => ('S', chunk.reference_len()),
            EditOp::Delete => ('D', chunk.reference_len()),
            EditOp::Insert => ('I', chunk.hypothesis_len()),
        };

        for k in 0..len {
            let ref_token = chunk
                .kind
                .advances_reference()
                .then(|| reference[chunk.ref_start_idx + k].as_str());
            let hyp_token = chunk
                .kind
                .advances_hypothesis()
                .then(|| hypothesis[chunk.hyp_start_idx + k].as_str());

            let width = ref_token
                .map_or(0, |t| t.chars().count())
                .max(hyp_token.map_or(0, |t| t.chars().count()))
                .max(1);

            if let Some(limit) = line_width {
                if rows.width + width > limit {
                    std::mem::replace(&mut rows, Rows::new()).finish(&mut out, separated);
                    out.push('\n');
                }
            }

            let stars = "*".repeat(width);
            rows.push_cell(
                ref_token.unwrap_or(&stars),
                hyp_token.unwrap_or(&stars),
                mark,
                width,
            );
            if separated {
                rows.push_separator();
            }
        }
    }

    rows.finish(&mut out, separated);
    out
}

/// Render the alignment of every sentence pair, optionally followed by a summary
pub fn visualize_alignment<O: AlignmentView>(output: &O, options: &VisualizeOptions) -> String {
    let separated = !output.is_character_level();
    let mut out = String::new();

    let pairs = output
        .references()
        .iter()
        .zip(output.hypotheses())
        .zip(output.alignments());

    for (idx, ((reference, hypothesis), chunks)) in pairs.enumerate() {
        let correct =
            chunks.is_empty() || (chunks.len() == 1 && chunks[0].kind == EditOp::Equal);
        if options.skip_correct && correct {
            continue;
        }

        let _ = write!(out, "=== SENTENCE {} ===\n\n", idx + 1);
        out.push_str(&comparison_rows(
            reference,
            hypothesis,
            chunks,
            separated,
            options.line_width,
        ));
        out.push('\n');
    }

    if options.show_measures {
        let counts = output.counts();
        out.push_str("=== SUMMARY ===\n");
        let _ = writeln!(out, "number of sentences: {}", output.alignments().len());
        let _ = writeln!(
            out,
            "substitutions={} deletions={} insertions={} hits={}",
            counts.substitutions, counts.deletions, counts.insertions, counts.hits
        );
        out.push('\n');
        let measures: Vec<String> = output
            .summary_measures()
            .into_iter()
            .map(|(name, value)| format!("{name}={:.2}%", value * 100.0))
            .collect();
        out.push_str(&measures.join("\n"));
        out.push('\n');
    } else {
        out.pop();
    }

    out
}

/// Occurrence counts that remember first-seen order
#[derive(Debug, Clone)]
pub struct FrequencyTable<K> {
    entries: Vec<(K, usize)>,
    index: AHashMap<K, usize>,
}

impl<K: Eq + Hash + Clone> FrequencyTable<K> {
    pub fn new() -> Self {
        Self {
            entries: Vec::new(),
            index: AHashMap::new(),
        }
    }

    pub fn add(&mut self, key: K) {
        match self.index.get(&key) {
            Some(&slot) => self.entries[slot].1 += 1,
            None => {
                self.index.insert(key.clone(), self.entries.len());
                self.entries.push((key, 1));
            }
        }
    }

    pub fn get(&self, key: &K) -> usize {
        self.index.get(key).map_or(0, |&slot| self.entries[slot].1)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Entries by descending count; equal counts keep first-seen order
    pub fn most_common(&self) -> Vec<(&K, usize)> {
        let mut sorted: Vec<(&K, usize)> = self.entries.iter().map(|(k, n)| (k, *n)).collect();
        sorted.sort_by(|a, b| b.1.cmp(&a.1));
        sorted
    }
}

impl<K: Eq + Hash + Clone> Default for FrequencyTable<K> {
    fn default() -> Self {
        Self::new()
    }
}

/// How often each span was substituted (keyed by `(from, to)`), inserted or deleted
#[derive(Debug, Clone, Default)]
pub struct ErrorFrequencies {
    pub substitutions: FrequencyTable<(String, String)>,
    pub insertions: FrequencyTable<String>,
    pub deletions: FrequencyTable<String>,
}

/// Count error spans; the tokens of a span are joined with a space at word level
pub fn collect_error_counts<O: AlignmentView>(output: &O) -> ErrorFrequencies {
    let separator = if output.is_character_level() { "" } else { " " };
    let mut frequencies = ErrorFrequencies::default();

    let pairs = output
        .references()
        .iter()
        .zip(output.hypotheses())
        .zip(output.alignments());

    for ((reference, hypothesis), chunks) in pairs {
        for chunk in chunks {
            let removed = || reference[chunk.reference_range()].join(separator);
            let added = || hypothesis[chunk.hypothesis_range()].join(separator);

            match chunk.kind {
                EditOp::Equal => {}
                EditOp::Substitute => frequencies.substitutions.add((removed(), added())),
                EditOp::Insert => frequencies.insertions.add(added()),
                EditOp::Delete => frequencies.deletions.add(removed()),
            }
        }
    }

    frequencies
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ErrorCountOptions {
    pub show_substitutions: bool,
    pub show_insertions: bool,
    pub show_deletions: bool,
    /// Only list the `k` most frequent errors of each kind
    pub top_k: Option<usize>,
}

impl Default for ErrorCountOptions {
    fn default() -> Self {
        Self {
            show_substitutions: true,
            show_insertions: true,
            show_deletions: true,
            top_k: None,
        }
    }
}

trait FrequencyKey {
    fn display_width(&self) -> usize;
    fn render(&self, width: usize) -> String;
}

impl FrequencyKey for String {
    fn display_width(&self) -> usize {
        self.chars().count()
    }

    fn render(&self, width: usize) -> String {
        format!("{self:<width$}")
    }
}

impl FrequencyKey for (String, String) {
    fn display_width(&self) -> usize {
        self.0.chars().count().max(self.1.chars().count())
    }

    fn render(&self, width: usize) -> String {
        format!("{:<width$} --> {:<width$}", self.0, self.1)
    }
}

fn frequency_list<K>(table: &FrequencyTable<K>, top_k: Option<usize>) -> String
where
    K: FrequencyKey + Eq + Hash + Clone,
{
    if table.is_empty() {
        // No trailing newline, so the next header follows without a blank line.
        return "none".to_string();
    }

    let mut entries = table.most_common();
    if let Some(k) = top_k {
        entries.truncate(k);
    }

    let width = entries
        .iter()
        .map(|(key, _)| key.display_width())
        .max()
        .unwrap_or(0);

    entries
        .iter()
        .map(|(key, count)| format!("{} = {}x\n", key.render(width), count))
        .collect()
}

/// Render the error frequency tables of a processed corpus
pub fn visualize_error_counts<O: AlignmentView>(output: &O, options: &ErrorCountOptions) -> String {
    let frequencies = collect_error_counts(output);

    let sections = [
        (
            options.show_substitutions,
            "SUBSTITUTIONS",
            frequency_list(&frequencies.substitutions, options.top_k),
        ),
        (
            options.show_insertions,
            "INSERTIONS",
            frequency_list(&frequencies.insertions, options.top_k),
        ),
        (
            options.show_deletions,
            "DELETIONS",
            frequency_list(&frequencies.deletions, options.top_k),
        ),
    ];

    let mut out = String::new();
    for (shown, title, body) in sections {
        if !shown {
            continue;
        }
        if !out.is_empty() {
            out.push('\n');
        }
        let _ = writeln!(out, "=== {title} ===");
        out.push_str(&body);
    }

    if out.ends_with('\n') {
        out.pop();
    }
    out
}
