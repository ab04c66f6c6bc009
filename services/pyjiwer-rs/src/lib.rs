//! jiwer native: Python bindings for the jiwer-core kernel.
//!
//! Every entry point accepts either a single sentence (`str`) or a list of
//! sentences (`list[str]`) per side, plus an optional preset name selecting
//! the normalization pipeline (`"wer_default"`, `"cer_contiguous"`, ...).

use pyo3::exceptions::PyValueError;
use pyo3::prelude::*;

use jiwer_core::transformations::preset;
use jiwer_core::{
    AlignmentChunk, CharacterOutput, JiwerError, ProcessConfig, VisualizeOptions, WordOutput,
};

// ============================================================================
// CONVERSIONS
// ============================================================================

#[derive(FromPyObject)]
enum Sentences {
    One(String),
    Many(Vec<String>),
}

impl Sentences {
    fn into_vec(self) -> Vec<String> {
        match self {
            Sentences::One(sentence) => vec![sentence],
            Sentences::Many(sentences) => sentences,
        }
    }
}

fn to_py_err(err: JiwerError) -> PyErr {
    PyValueError::new_err(err.to_string())
}

fn config_for(transform: Option<&str>, characters: bool) -> PyResult<ProcessConfig> {
    match transform {
        None if characters => Ok(ProcessConfig::characters()),
        None => Ok(ProcessConfig::words()),
        Some(name) => preset(name)
            .map(ProcessConfig::with_transform)
            .ok_or_else(|| PyValueError::new_err(format!("unknown transform preset `{name}`"))),
    }
}

fn words(
    reference: Sentences,
    hypothesis: Sentences,
    transform: Option<&str>,
) -> PyResult<WordOutput> {
    let config = config_for(transform, false)?;
    jiwer_core::process_words_with(reference.into_vec(), hypothesis.into_vec(), &config)
        .map_err(to_py_err)
}

fn characters(
    reference: Sentences,
    hypothesis: Sentences,
    transform: Option<&str>,
) -> PyResult<CharacterOutput> {
    let config = config_for(transform, true)?;
    jiwer_core::process_characters_with(reference.into_vec(), hypothesis.into_vec(), &config)
        .map_err(to_py_err)
}

// ============================================================================
// PROCESSING FUNCTIONS
// ============================================================================

#[pyfunction]
#[pyo3(name = "process_words", signature = (reference, hypothesis, transform=None))]
fn py_process_words(
    reference: Sentences,
    hypothesis: Sentences,
    transform: Option<&str>,
) -> PyResult<PyWordOutput> {
    words(reference, hypothesis, transform).map(PyWordOutput::from)
}

#[pyfunction]
#[pyo3(name = "process_characters", signature = (reference, hypothesis, transform=None))]
fn py_process_characters(
    reference: Sentences,
    hypothesis: Sentences,
    transform: Option<&str>,
) -> PyResult<PyCharacterOutput> {
    characters(reference, hypothesis, transform).map(PyCharacterOutput::from)
}

// ============================================================================
// MEASURE FUNCTIONS
// ============================================================================

#[pyfunction]
#[pyo3(name = "wer", signature = (reference, hypothesis, transform=None))]
fn py_wer(reference: Sentences, hypothesis: Sentences, transform: Option<&str>) -> PyResult<f64> {
    Ok(words(reference, hypothesis, transform)?.wer)
}

#[pyfunction]
#[pyo3(name = "mer", signature = (reference, hypothesis, transform=None))]
fn py_mer(reference: Sentences, hypothesis: Sentences, transform: Option<&str>) -> PyResult<f64> {
    Ok(words(reference, hypothesis, transform)?.mer)
}

#[pyfunction]
#[pyo3(name = "wip", signature = (reference, hypothesis, transform=None))]
fn py_wip(reference: Sentences, hypothesis: Sentences, transform: Option<&str>) -> PyResult<f64> {
    Ok(words(reference, hypothesis, transform)?.wip)
}

#[pyfunction]
#[pyo3(name = "wil", signature = (reference, hypothesis, transform=None))]
fn py_wil(reference: Sentences, hypothesis: Sentences, transform: Option<&str>) -> PyResult<f64> {
    Ok(words(reference, hypothesis, transform)?.wil)
}

#[pyfunction]
#[pyo3(name = "cer", signature = (reference, hypothesis, transform=None))]
fn py_cer(reference: Sentences, hypothesis: Sentences, transform: Option<&str>) -> PyResult<f64> {
    Ok(characters(reference, hypothesis, transform)?.cer)
}

// ============================================================================
// VISUALIZATION
// ============================================================================

#[derive(FromPyObject)]
enum AnyOutput<'py> {
    Words(PyRef<'py, PyWordOutput>),
    Characters(PyRef<'py, PyCharacterOutput>),
}

#[pyfunction]
#[pyo3(
    name = "visualize_alignment",
    signature = (output, show_measures=true, skip_correct=true, line_width=None)
)]
fn py_visualize_alignment(
    output: AnyOutput<'_>,
    show_measures: bool,
    skip_correct: bool,
    line_width: Option<usize>,
) -> String {
    let options = VisualizeOptions {
        show_measures,
        skip_correct,
        line_width,
    };
    match output {
        AnyOutput::Words(words) => jiwer_core::visualize_alignment(&words.inner, &options),
        AnyOutput::Characters(chars) => jiwer_core::visualize_alignment(&chars.inner, &options),
    }
}

// ============================================================================
// PYTHON CLASSES
// ============================================================================

#[pyclass(name = "AlignmentChunk")]
#[derive(Clone)]
struct PyAlignmentChunk {
    #[pyo3(get, name = "type")]
    kind: String,
    #[pyo3(get)]
    ref_start_idx: usize,
    #[pyo3(get)]
    ref_end_idx: usize,
    #[pyo3(get)]
    hyp_start_idx: usize,
    #[pyo3(get)]
    hyp_end_idx: usize,
}

#[pymethods]
impl PyAlignmentChunk {
    fn __repr__(&self) -> String {
        format!(
            "AlignmentChunk(type='{}', ref_start_idx={}, ref_end_idx={}, hyp_start_idx={}, hyp_end_idx={})",
            self.kind, self.ref_start_idx, self.ref_end_idx, self.hyp_start_idx, self.hyp_end_idx
        )
    }
}

impl From<&AlignmentChunk> for PyAlignmentChunk {
    fn from(chunk: &AlignmentChunk) -> Self {
        Self {
            kind: chunk.kind.as_str().to_string(),
            ref_start_idx: chunk.ref_start_idx,
            ref_end_idx: chunk.ref_end_idx,
            hyp_start_idx: chunk.hyp_start_idx,
            hyp_end_idx: chunk.hyp_end_idx,
        }
    }
}

fn py_alignments(alignments: &[Vec<AlignmentChunk>]) -> Vec<Vec<PyAlignmentChunk>> {
    alignments
        .iter()
        .map(|chunks| chunks.iter().map(PyAlignmentChunk::from).collect())
        .collect()
}

#[pyclass(name = "WordOutput")]
struct PyWordOutput {
    inner: WordOutput,
}

impl From<WordOutput> for PyWordOutput {
    fn from(inner: WordOutput) -> Self {
        Self { inner }
    }
}

#[pymethods]
impl PyWordOutput {
    #[getter]
    fn references(&self) -> Vec<Vec<String>> {
        self.inner.references.clone()
    }

    #[getter]
    fn hypotheses(&self) -> Vec<Vec<String>> {
        self.inner.hypotheses.clone()
    }

    #[getter]
    fn alignments(&self) -> Vec<Vec<PyAlignmentChunk>> {
        py_alignments(&self.inner.alignments)
    }

    #[getter]
    fn wer(&self) -> f64 {
        self.inner.wer
    }

    #[getter]
    fn mer(&self) -> f64 {
        self.inner.mer
    }

    #[getter]
    fn wil(&self) -> f64 {
        self.inner.wil
    }

    #[getter]
    fn wip(&self) -> f64 {
        self.inner.wip
    }

    #[getter]
    fn hits(&self) -> usize {
        self.inner.hits
    }

    #[getter]
    fn substitutions(&self) -> usize {
        self.inner.substitutions
    }

    #[getter]
    fn insertions(&self) -> usize {
        self.inner.insertions
    }

    #[getter]
    fn deletions(&self) -> usize {
        self.inner.deletions
    }

    fn __repr__(&self) -> String {
        format!(
            "WordOutput(wer={}, mer={}, wil={}, wip={}, hits={}, substitutions={}, insertions={}, deletions={})",
            self.inner.wer,
            self.inner.mer,
            self.inner.wil,
            self.inner.wip,
            self.inner.hits,
            self.inner.substitutions,
            self.inner.insertions,
            self.inner.deletions
        )
    }
}

#[pyclass(name = "CharacterOutput")]
struct PyCharacterOutput {
    inner: CharacterOutput,
}

impl From<CharacterOutput> for PyCharacterOutput {
    fn from(inner: CharacterOutput) -> Self {
        Self { inner }
    }
}

#[pymethods]
impl PyCharacterOutput {
    #[getter]
    fn references(&self) -> Vec<Vec<String>> {
        self.inner.references.clone()
    }

    #[getter]
    fn hypotheses(&self) -> Vec<Vec<String>> {
        self.inner.hypotheses.clone()
    }

    #[getter]
    fn alignments(&self) -> Vec<Vec<PyAlignmentChunk>> {
        py_alignments(&self.inner.alignments)
    }

    #[getter]
    fn cer(&self) -> f64 {
        self.inner.cer
    }

    #[getter]
    fn hits(&self) -> usize {
        self.inner.hits
    }

    #[getter]
    fn substitutions(&self) -> usize {
        self.inner.substitutions
    }

    #[getter]
    fn insertions(&self) -> usize {
        self.inner.insertions
    }

    #[getter]
    fn deletions(&self) -> usize {
        self.inner.deletions
    }

    fn __repr__(&self) -> String {
        format!(
            "CharacterOutput(cer={}, hits={}, substitutions={}, insertions={}, deletions={})",
            self.inner.cer,
            self.inner.hits,
            self.inner.substitutions,
            self.inner.insertions,
            self.inner.deletions
        )
    }
}

// ============================================================================
// MODULE
// ============================================================================

#[pymodule]
fn jiwer_native(_py: Python, m: &PyModule) -> PyResult<()> {
    // Processing
    m.add_function(wrap_pyfunction!(py_process_words, m)?)?;
    m.add_function(wrap_pyfunction!(py_process_characters, m)?)?;

    // Measures
    m.add_function(wrap_pyfunction!(py_wer, m)?)?;
    m.add_function(wrap_pyfunction!(py_mer, m)?)?;
    m.add_function(wrap_pyfunction!(py_wip, m)?)?;
    m.add_function(wrap_pyfunction!(py_wil, m)?)?;
    m.add_function(wrap_pyfunction!(py_cer, m)?)?;

    // Visualization
    m.add_function(wrap_pyfunction!(py_visualize_alignment, m)?)?;

    // Classes
    m.add_class::<PyAlignmentChunk>()?;
    m.add_class::<PyWordOutput>()?;
    m.add_class::<PyCharacterOutput>()?;

    Ok(())
}
