use crate::Genome;

use rand_chacha::ChaCha8Rng;

/// The result of evaluating a genome: a scalar
/// fitness plus evaluator-specific diagnostics.
#[derive(Clone, Debug, PartialEq)]
pub struct Evaluation<D> {
    pub fitness: f64,
    pub diagnostics: D,
}

impl<D> Evaluation<D> {
    pub fn new(fitness: f64, diagnostics: D) -> Evaluation<D> {
        Evaluation {
            fitness,
            diagnostics,
        }
    }
}

/// An interface for fitness evaluators shared by
/// the genomes of a population.
///
/// Evaluations of different genomes must be
/// independent of each other: they are run in
/// parallel, each with its own random stream.
/// The returned fitness must be finite; anything
/// else is treated as a broken evaluator.
pub trait Evaluator: Sync {
    type Diagnostics: Send;

    /// Scores `genome`, drawing any randomness from `rng`.
    fn evaluate(
        &self,
        genome: &Genome<Self::Diagnostics>,
        rng: &mut ChaCha8Rng,
    ) -> Evaluation<Self::Diagnostics>;
}

/// Plain fitness functions are evaluators without diagnostics.
impl<F> Evaluator for F
where
    F: Fn(&Genome<()>, &mut ChaCha8Rng) -> f64 + Sync,
{
    type Diagnostics = ();

    fn evaluate(&self, genome: &Genome<()>, rng: &mut ChaCha8Rng) -> Evaluation<()> {
        Evaluation::new(self(genome, rng), ())
    }
}
