//! Probability densities for the map matching HMM
//!
//! The log variants are evaluated directly in the log domain. Taking the log
//! of the plain density underflows to -inf once a candidate is more than
//! roughly 150 m from its measurement with the default sigma.

use std::f64::consts::PI;

/// Density of a zero-mean normal distribution with standard deviation `sigma` at `x`
///
/// Formula: 1 / (sigma * sqrt(2π)) * exp(-x² / (2 sigma²))
pub fn normal_distribution(sigma: f64, x: f64) -> f64 {
    1.0 / ((2.0 * PI).sqrt() * sigma) * (-0.5 * (x / sigma).powi(2)).exp()
}

/// Natural log of [`normal_distribution`]
pub fn log_normal_distribution(sigma: f64, x: f64) -> f64 {
    -((2.0 * PI).sqrt() * sigma).ln() - 0.5 * (x / sigma).powi(2)
}

/// Density of an exponential distribution with rate `beta` at `x`
pub fn exponential_distribution(beta: f64, x: f64) -> f64 {
    beta * (-beta * x).exp()
}

/// Natural log of [`exponential_distribution`]
pub fn log_exponential_distribution(beta: f64, x: f64) -> f64 {
    beta.ln() - beta * x
}
