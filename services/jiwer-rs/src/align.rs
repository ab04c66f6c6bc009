//! Levenshtein alignment of token sequences into run-length encoded chunks.
//!
//! The cost table is never materialized. Filling the DP keeps two rolling
//! columns and records, per cell, whether the cost steps up or down relative to
//! its upper and left neighbours (four bit planes). The backtrace only needs
//! those deltas, so a sentence pair costs 4 bits per cell instead of a full
//! integer table.

use std::hash::Hash;
use std::iter;

use ndarray::Array2;
use rayon::prelude::*;
use rustc_hash::FxHashSet;
use serde::{Deserialize, Serialize};

use crate::types::{AlignmentChunk, EditOp};

/// Which optimal path to report when several alignments share the minimum cost.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TieBreak {
    /// Tokens shared as a common prefix or suffix are reported as `equal`
    /// first. Walking back over the rest: delete whenever deleting is optimal,
    /// else insert when the cell to the left improves on the diagonal
    /// predecessor, else take the diagonal. Matches the alignments jiwer
    /// reports through rapidfuzz.
    #[default]
    DeletionFirst,
    /// Walking back from `D[n][m]` over the whole table: diagonal, then
    /// insertion, then deletion, whichever is first to lie on an optimal path.
    /// Shared affixes get no special treatment.
    DiagonalFirst,
}

/// Standard Levenshtein distance using dynamic programming
pub fn levenshtein<T: PartialEq>(a: &[T], b: &[T]) -> usize {
    let len_a = a.len();
    let len_b = b.len();

    if len_a == 0 {
        return len_b;
    }
    if len_b == 0 {
        return len_a;
    }

    let mut prev_row: Vec<usize> = (0..=len_b).collect();
    let mut curr_row = vec![0; len_b + 1];

    for (i, tok_a) in a.iter().enumerate() {
        curr_row[0] = i + 1;

        for (j, tok_b) in b.iter().enumerate() {
            let cost = if tok_a == tok_b { 0 } else { 1 };

            curr_row[j + 1] = std::cmp::min(
                std::cmp::min(curr_row[j] + 1, prev_row[j + 1] + 1),
                prev_row[j] + cost,
            );
        }

        std::mem::swap(&mut prev_row, &mut curr_row);
    }

    prev_row[len_b]
}

/// Cost differences between neighbouring cells of the DP table `D`.
///
/// `i` indexes the reference, `j` the hypothesis; both are 1-based cell
/// coordinates as in `D[i][j]`.
trait Lattice {
    /// `D[i][j] - D[i-1][j]`
    fn vertical(&self, i: usize, j: usize) -> i8;
    /// `D[i][j] - D[i][j-1]`
    fn horizontal(&self, i: usize, j: usize) -> i8;
}

/// Table of two sequences without a single matching token: `D[i][j] = max(i, j)`.
struct Disjoint;

impl Lattice for Disjoint {
    fn vertical(&self, i: usize, j: usize) -> i8 {
        i8::from(i > j)
    }

    fn horizontal(&self, i: usize, j: usize) -> i8 {
        i8::from(j > i)
    }
}

/// Bit planes of ±1 deltas, one row of 64-bit words per hypothesis token
struct DeltaLattice {
    vertical_pos: Array2<u64>,
    vertical_neg: Array2<u64>,
    horizontal_pos: Array2<u64>,
    horizontal_neg: Array2<u64>,
}

impl DeltaLattice {
    fn build<T: PartialEq>(reference: &[T], hypothesis: &[T]) -> Self {
        let n = reference.len();
        let m = hypothesis.len();
        let words = n.div_ceil(64);

        let mut lattice = Self {
            vertical_pos: Array2::zeros((m, words)),
            vertical_neg: Array2::zeros((m, words)),
            horizontal_pos: Array2::zeros((m, words)),
            horizontal_neg: Array2::zeros((m, words)),
        };

        // prev[i] = D[i][j], curr[i] = D[i][j + 1]
        let mut prev: Vec<usize> = (0..=n).collect();
        let mut curr = vec![0usize; n + 1];

        for (j, hyp_token) in hypothesis.iter().enumerate() {
            curr[0] = j + 1;

            for (i, ref_token) in reference.iter().enumerate() {
                let cost = if ref_token == hyp_token {
                    prev[i]
                } else {
                    1 + prev[i].min(prev[i + 1]).min(curr[i])
                };
                curr[i + 1] = cost;

                let word = i / 64;
                let bit = 1u64 << (i % 64);

                if cost > curr[i] {
                    lattice.vertical_pos[[j, word]] |= bit;
                } else if cost < curr[i] {
                    lattice.vertical_neg[[j, word]] |= bit;
                }

                if cost > prev[i + 1] {
                    lattice.horizontal_pos[[j, word]] |= bit;
                } else if cost < prev[i + 1] {
                    lattice.horizontal_neg[[j, word]] |= bit;
                }
            }

            std::mem::swap(&mut prev, &mut curr);
        }

        lattice
    }

    fn delta(pos: &Array2<u64>, neg: &Array2<u64>, i: usize, j: usize) -> i8 {
        let (row, word, bit) = (j - 1, (i - 1) / 64, 1u64 << ((i - 1) % 64));
        if pos[[row, word]] & bit != 0 {
            1
        } else if neg[[row, word]] & bit != 0 {
            -1
        } else {
            0
        }
    }
}

impl Lattice for DeltaLattice {
    fn vertical(&self, i: usize, j: usize) -> i8 {
        if j == 0 {
            return 1;
        }
        Self::delta(&self.vertical_pos, &self.vertical_neg, i, j)
    }

    fn horizontal(&self, i: usize, j: usize) -> i8 {
        if i == 0 {
            return 1;
        }
        Self::delta(&self.horizontal_pos, &self.horizontal_neg, i, j)
    }
}

fn common_prefix<T: PartialEq>(a: &[T], b: &[T]) -> usize {
    a.iter().zip(b).take_while(|(x, y)| x == y).count()
}

fn common_suffix<T: PartialEq>(a: &[T], b: &[T]) -> usize {
    a.iter()
        .rev()
        .zip(b.iter().rev())
        .take_while(|(x, y)| x == y)
        .count()
}

fn shares_token<T: Eq + Hash>(a: &[T], b: &[T]) -> bool {
    let (short, long) = if a.len() <= b.len() { (a, b) } else { (b, a) };
    if short.is_empty() {
        return false;
    }
    let seen: FxHashSet<&T> = short.iter().collect();
    long.iter().any(|token| seen.contains(token))
}

/// Merge consecutive operations of the same kind into chunks
pub fn chunks_from_editops(ops: &[EditOp]) -> Vec<AlignmentChunk> {
    let mut chunks: Vec<AlignmentChunk> = Vec::new();
    let (mut i, mut j) = (0, 0);

    for &op in ops {
        let next_i = i + usize::from(op.advances_reference());
        let next_j = j + usize::from(op.advances_hypothesis());

        match chunks.last_mut() {
            Some(last) if last.kind == op => {
                last.ref_end_idx = next_i;
                last.hyp_end_idx = next_j;
            }
            _ => chunks.push(AlignmentChunk {
                kind: op,
                ref_start_idx: i,
                ref_end_idx: next_i,
                hyp_start_idx: j,
                hyp_end_idx: next_j,
            }),
        }

        i = next_i;
        j = next_j;
    }

    chunks
}

/// Unit-cost sequence aligner with a fixed tie-break policy
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Aligner {
    tie_break: TieBreak,
}

impl Aligner {
    pub fn new(tie_break: TieBreak) -> Self {
        Self { tie_break }
    }

    pub fn tie_break(&self) -> TieBreak {
        self.tie_break
    }

    /// Minimum number of edits turning `reference` into `hypothesis`
    pub fn distance<T: PartialEq>(&self, reference: &[T], hypothesis: &[T]) -> usize {
        let prefix = common_prefix(reference, hypothesis);
        let (reference, hypothesis) = (&reference[prefix..], &hypothesis[prefix..]);
        let suffix = common_suffix(reference, hypothesis);
        levenshtein(
            &reference[..reference.len() - suffix],
            &hypothesis[..hypothesis.len() - suffix],
        )
    }

    /// One operation per aligned position, in order
    pub fn editops<T: Eq + Hash>(&self, reference: &[T], hypothesis: &[T]) -> Vec<EditOp> {
        let (prefix, suffix) = match self.tie_break {
            TieBreak::DeletionFirst => {
                let prefix = common_prefix(reference, hypothesis);
                (prefix, common_suffix(&reference[prefix..], &hypothesis[prefix..]))
            }
            TieBreak::DiagonalFirst => (0, 0),
        };
        let ref_core = &reference[prefix..reference.len() - suffix];
        let hyp_core = &hypothesis[prefix..hypothesis.len() - suffix];

        let core_ops = if shares_token(ref_core, hyp_core) {
            tracing::trace!(
                reference = ref_core.len(),
                hypothesis = hyp_core.len(),
                "building delta lattice"
            );
            let lattice = DeltaLattice::build(ref_core, hyp_core);
            self.backtrace(ref_core, hyp_core, &lattice)
        } else {
            self.backtrace(ref_core, hyp_core, &Disjoint)
        };

        let mut ops = Vec::with_capacity(prefix + core_ops.len() + suffix);
        ops.extend(iter::repeat(EditOp::Equal).take(prefix));
        ops.extend(core_ops);
        ops.extend(iter::repeat(EditOp::Equal).take(suffix));
        ops
    }

    /// Run-length encoded alignment of one sentence pair
    pub fn opcodes<T: Eq + Hash>(&self, reference: &[T], hypothesis: &[T]) -> Vec<AlignmentChunk> {
        chunks_from_editops(&self.editops(reference, hypothesis))
    }

    /// Align every sentence pair of a corpus, in parallel when requested
    pub fn align_corpus<T: Eq + Hash + Sync>(
        &self,
        references: &[Vec<T>],
        hypotheses: &[Vec<T>],
        parallel: bool,
    ) -> Vec<Vec<AlignmentChunk>> {
        if parallel {
            references
                .par_iter()
                .zip(hypotheses.par_iter())
                .map(|(r, h)| self.opcodes(r, h))
                .collect()
        } else {
            references
                .iter()
                .zip(hypotheses)
                .map(|(r, h)| self.opcodes(r, h))
                .collect()
        }
    }

    fn backtrace<T: PartialEq, L: Lattice>(
        &self,
        reference: &[T],
        hypothesis: &[T],
        lattice: &L,
    ) -> Vec<EditOp> {
        let (mut i, mut j) = (reference.len(), hypothesis.len());
        let mut ops = Vec::with_capacity(i.max(j));

        let diagonal = |i: usize, j: usize| {
            if reference[i] == hypothesis[j] {
                EditOp::Equal
            } else {
                EditOp::Substitute
            }
        };

        match self.tie_break {
            TieBreak::DeletionFirst => {
                while i > 0 && j > 0 {
                    if lattice.vertical(i, j) == 1 {
                        ops.push(EditOp::Delete);
                        i -= 1;
                        continue;
                    }

                    j -= 1;
                    if j > 0 && lattice.vertical(i, j) == -1 {
                        ops.push(EditOp::Insert);
                    } else {
                        i -= 1;
                        ops.push(diagonal(i, j));
                    }
                }
            }
            TieBreak::DiagonalFirst => {
                while i > 0 && j > 0 {
                    let op = diagonal(i - 1, j - 1);
                    let step = if op == EditOp::Equal { 0 } else { 1 };

                    // D[i][j] - D[i-1][j-1]
                    if lattice.vertical(i, j) + lattice.horizontal(i - 1, j) == step {
                        ops.push(op);
                        i -= 1;
                        j -= 1;
                    } else if lattice.horizontal(i, j) == 1 {
                        ops.push(EditOp::Insert);
                        j -= 1;
                    } else {
                        ops.push(EditOp::Delete);
                        i -= 1;
                    }
                }
            }
        }

        ops.extend(iter::repeat(EditOp::Delete).take(i));
        ops.extend(iter::repeat(EditOp::Insert).take(j));
        ops.reverse();
        ops
    }
}

/// Alignment of one sentence pair with the default tie-break
pub fn opcodes<T: Eq + Hash>(reference: &[T], hypothesis: &[T]) -> Vec<AlignmentChunk> {
    Aligner::default().opcodes(reference, hypothesis)
}
