use num_bigint::BigInt;

use super::Point;

#[derive(Clone, PartialEq, Eq, Debug)]
pub struct Polynomial {
    /// Coefficients in ascending order, i.e. [1, 2, 3] -> 1 + 2x + 3x^2
    coefficients: Vec<i64>,
}

impl Polynomial {
    pub fn new(coefficients: Vec<i64>) -> Self {
        let mut coefficients = coefficients;
        while let Some(c) = coefficients.last()
            && c == &0
        {
            coefficients.pop();
        }
        Self { coefficients }
    }

    /// Generates a polynomial of the given degree with coefficients drawn from `-bound..=bound`.
    /// The leading coefficient is never zero.
    pub fn random(degree: usize, bound: i64) -> Self {
        let bound = bound.max(1);
        let mut coefficients: Vec<i64> = (0..degree)
            .map(|_| rand::random_range(-bound..=bound))
            .collect();
        let mut leading = 0;
        while leading == 0 {
            leading = rand::random_range(-bound..=bound);
        }
        coefficients.push(leading);
        Self { coefficients }
    }

    pub fn degree(&self) -> usize {
        self.coefficients.len().saturating_sub(1)
    }

    /// Exact evaluation using Horner's method
    pub fn evaluate(&self, x: i64) -> BigInt {
        let x = BigInt::from(x);
        let mut result = BigInt::from(0);
        for c in self.coefficients.iter().rev() {
            result = result * &x + *c;
        }
        result
    }

    pub fn evaluate_at_zero(&self) -> BigInt {
        if self.coefficients.is_empty() {
            return BigInt::from(0);
        }
        BigInt::from(self.coefficients[0])
    }

    /// Samples the polynomial at every given abscissa, preserving their order.
    pub fn sample(&self, xs: &[i64]) -> Vec<Point> {
        xs.iter()
            .map(|&x| Point::new(x, self.evaluate(x)))
            .collect()
    }
}
