//! Prenatal Calc - pregnancy, fertility and prenatal health calculators.
//!
//! # Overview
//!
//! This crate is the calculation core behind a practice website's patient
//! calculators: due date, pregnancy week, conception, ovulation and fertile
//! window, prenatal risk, calorie and water needs, nutrient requirements,
//! BMI and pregnancy weight gain.
//!
//! Every calculation is a pure function of its inputs and an explicit
//! `today`. Nothing reads the wall clock, keeps state between calls, or
//! touches the network.
//!
//! # Modules
//!
//! - [`model`]: Input and result records shared by the calculators
//! - [`dates`]: Date parsing, day arithmetic and medical constants
//! - [`pregnancy`]: Due date and gestational age
//! - [`fertility`]: Ovulation, conception and fertile window
//! - [`risk`]: Prenatal risk scoring
//! - [`nutrition`]: Calorie, water and nutrient requirements
//! - [`body`]: BMI and pregnancy weight gain
//! - [`validation`]: Per-field input validation
//! - [`api`]: JSON request dispatch used by callers and the CLI

pub mod api;
pub mod body;
pub mod dates;
pub mod error;
pub mod fertility;
pub mod model;
pub mod nutrition;
pub mod pregnancy;
pub mod risk;
pub mod validation;

pub use error::CalcError;
