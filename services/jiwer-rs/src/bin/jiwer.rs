use std::path::{Path, PathBuf};

use anyhow::Context;
use clap::Parser;
use jiwer_core::transformations::{
    cer_contiguous, cer_default, wer_contiguous, wer_default, wer_standardize,
    wer_standardize_contiguous,
};
use jiwer_core::{
    process_characters_with, process_words_with, visualize_alignment, ProcessConfig,
    VisualizeOptions,
};
use tracing_subscriber::EnvFilter;

/// Compute the word (or character) error rate between two newline-delimited files.
#[derive(Parser, Debug)]
#[command(name = "jiwer", author, version, about)]
struct Args {
    /// File with one reference sentence per line.
    #[arg(long, short = 'r', alias = "gt")]
    reference: PathBuf,

    /// File with one hypothesis sentence per line.
    #[arg(long, short = 'y', alias = "hp")]
    hypothesis: PathBuf,

    /// Compute CER instead of WER.
    #[arg(long, short = 'c')]
    cer: bool,

    /// Print the alignment of each sentence with a summary.
    #[arg(long, short = 'a')]
    align: bool,

    /// Join all lines into one sentence per side before aligning; line counts may differ.
    #[arg(long, short = 'g')]
    global: bool,

    /// Lower-case, expand contractions and drop non-words before computing the WER.
    #[arg(long, short = 's', conflicts_with = "cer")]
    standardize: bool,

    /// Print the full output as JSON.
    #[arg(long, conflicts_with = "align")]
    json: bool,
}

fn read_sentences(path: &Path) -> anyhow::Result<Vec<String>> {
    let text = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read {}", path.display()))?;
    Ok(text
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .map(str::to_string)
        .collect())
}

fn config_for(args: &Args) -> ProcessConfig {
    let transform = match (args.cer, args.global, args.standardize) {
        (true, false, _) => cer_default(),
        (true, true, _) => cer_contiguous(),
        (false, false, false) => wer_default(),
        (false, true, false) => wer_contiguous(),
        (false, false, true) => wer_standardize(),
        (false, true, true) => wer_standardize_contiguous(),
    };
    ProcessConfig::with_transform(transform)
}

fn run(args: &Args) -> anyhow::Result<String> {
    let references = read_sentences(&args.reference)?;
    let hypotheses = read_sentences(&args.hypothesis)?;

    if !args.global && references.len() != hypotheses.len() {
        anyhow::bail!(
            "Number of sentences does not match: {} contains {} lines, {} contains {} lines",
            args.reference.display(),
            references.len(),
            args.hypothesis.display(),
            hypotheses.len()
        );
    }

    tracing::debug!(
        references = references.len(),
        hypotheses = hypotheses.len(),
        cer = args.cer,
        global = args.global,
        "loaded sentences"
    );

    let config = config_for(args);
    let options = VisualizeOptions::default();

    let rendered = if args.cer {
        let output = process_characters_with(references, hypotheses, &config)
            .context("Failed to compute the character error rate")?;
        if args.json {
            serde_json::to_string_pretty(&output)?
        } else if args.align {
            visualize_alignment(&output, &options)
        } else {
            output.cer.to_string()
        }
    } else {
        let output = process_words_with(references, hypotheses, &config)
            .context("Failed to compute the word error rate")?;
        if args.json {
            serde_json::to_string_pretty(&output)?
        } else if args.align {
            visualize_alignment(&output, &options)
        } else {
            output.wer.to_string()
        }
    };

    Ok(rendered)
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse();
    let rendered = run(&args)?;
    println!("{}", rendered.trim_end_matches('\n'));
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn lines_file(lines: &[&str]) -> NamedTempFile {
        let mut file = NamedTempFile::new().expect("temp file");
        for line in lines {
            writeln!(file, "{line}").expect("write line");
        }
        file
    }

    fn args(reference: &NamedTempFile, hypothesis: &NamedTempFile, extra: &[&str]) -> Args {
        let mut argv = vec![
            "jiwer".to_string(),
            "--reference".to_string(),
            reference.path().display().to_string(),
            "--hypothesis".to_string(),
            hypothesis.path().display().to_string(),
        ];
        argv.extend(extra.iter().map(|s| s.to_string()));
        Args::try_parse_from(argv).expect("valid args")
    }

    #[test]
    fn prints_wer_and_skips_blank_lines() {
        let reference = lines_file(&["hello world", "", "good morning"]);
        let hypothesis = lines_file(&["hello duck", "good morning", "   "]);

        let out = run(&args(&reference, &hypothesis, &[])).unwrap();
        assert_eq!(out, "0.25");
    }

    #[test]
    fn line_count_mismatch_needs_global() {
        let reference = lines_file(&["one two", "three"]);
        let hypothesis = lines_file(&["one two three"]);

        assert!(run(&args(&reference, &hypothesis, &[])).is_err());
        assert_eq!(run(&args(&reference, &hypothesis, &["--global"])).unwrap(), "0");
        assert_eq!(
            run(&args(&reference, &hypothesis, &["--global", "--cer"])).unwrap(),
            "0"
        );
    }

    #[test]
    fn cer_and_alignment_output() {
        let reference = lines_file(&["abcd"]);
        let hypothesis = lines_file(&["abed"]);

        assert_eq!(run(&args(&reference, &hypothesis, &["--cer"])).unwrap(), "0.25");

        let aligned = run(&args(&reference, &hypothesis, &["-c", "-a"])).unwrap();
        assert!(aligned.starts_with("=== SENTENCE 1 ===\n\nREF: abcd\nHYP: abed\n"));
        assert!(aligned.ends_with("cer=25.00%\n"));
    }

    #[test]
    fn json_output_parses() {
        let reference = lines_file(&["It's here"]);
        let hypothesis = lines_file(&["it is here"]);

        let out = run(&args(&reference, &hypothesis, &["--standardize", "--json"])).unwrap();
        let value: serde_json::Value = serde_json::from_str(&out).unwrap();
        assert_eq!(value["wer"], 0.0);
        assert_eq!(value["alignments"][0][0]["type"], "equal");
    }

    #[test]
    fn standardize_conflicts_with_cer() {
        let reference = lines_file(&["a"]);
        let hypothesis = lines_file(&["a"]);
        let argv = vec![
            "jiwer".to_string(),
            "--reference".to_string(),
            reference.path().display().to_string(),
            "--hypothesis".to_string(),
            hypothesis.path().display().to_string(),
            "--cer".to_string(),
            "--standardize".to_string(),
        ];
        assert!(Args::try_parse_from(argv).is_err());
    }

    #[test]
    fn missing_file_reports_path() {
        let hypothesis = lines_file(&["a"]);
        let argv = vec![
            "jiwer".to_string(),
            "--reference".to_string(),
            "/nonexistent/reference.txt".to_string(),
            "--hypothesis".to_string(),
            hypothesis.path().display().to_string(),
        ];
        let err = run(&Args::try_parse_from(argv).unwrap()).unwrap_err();
        assert!(format!("{err:#}").contains("/nonexistent/reference.txt"));
    }
}
