//! Mathematical building blocks.
//!
//! - `distributions`: standard normal CDF and PDF
//! - `solvers`: root finding for nonlinear systems and bounded least-squares

pub mod distributions;
pub mod solvers;
