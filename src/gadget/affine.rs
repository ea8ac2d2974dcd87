/// A sparse affine form `Σ coeff·slot + constant` over the previous layer's
/// slots. This is what one neuron computes before its activation.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Affine {
    /// `(input slot, coefficient)`, sorted by slot, no zero coefficients.
    pub terms: Vec<(usize, f64)>,
    pub constant: f64,
}

impl Affine {
    pub fn slot(slot: usize) -> Affine {
        Affine { terms: vec![(slot, 1.0)], constant: 0.0 }
    }

    pub fn constant(value: f64) -> Affine {
        Affine { terms: Vec::new(), constant: value }
    }

    /// Unit-weight sum of several slots.
    pub fn sum_of(slots: &[usize]) -> Affine {
        slots.iter().fold(Affine::default(), |acc, &s| acc.plus(Affine::slot(s)))
    }

    pub fn plus(mut self, other: Affine) -> Affine {
        for (slot, coeff) in other.terms {
            match self.terms.binary_search_by_key(&slot, |(s, _)| *s) {
                Ok(i) => self.terms[i].1 += coeff,
                Err(i) => self.terms.insert(i, (slot, coeff)),
            }
        }
        self.terms.retain(|(_, c)| *c != 0.0);
        self.constant += other.constant;
        self
    }

    pub fn minus(self, other: Affine) -> Affine {
        self.plus(other.scaled(-1.0))
    }

    pub fn scaled(mut self, factor: f64) -> Affine {
        for term in &mut self.terms {
            term.1 *= factor;
        }
        self.terms.retain(|(_, c)| *c != 0.0);
        self.constant *= factor;
        self
    }

    pub fn offset(mut self, delta: f64) -> Affine {
        self.constant += delta;
        self
    }

    /// Largest slot index referenced, if any.
    pub fn max_slot(&self) -> Option<usize> {
        self.terms.last().map(|(s, _)| *s)
    }

    pub fn evaluate(&self, inputs: &[f64]) -> f64 {
        self.terms.iter().map(|(s, c)| c * inputs[*s]).sum::<f64>() + self.constant
    }
}
