// src/models/mod.rs

use serde::{Deserialize, Serialize};

mod attendance;
mod employee;
mod payroll;
mod quotation;

pub use attendance::*;
pub use employee::*;
pub use payroll::*;
pub use quotation::*;

// ─── JWT Claims ───────────────────────────────────────────────────────────────

#[derive(Debug, Serialize, Deserialize)]
pub struct Claims {
    pub sub: String,
    pub name: String,
    pub role: String,
    pub exp: usize,
    pub iat: usize,
}
