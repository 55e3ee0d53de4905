pub mod attendance;
pub mod employee;
pub mod general;
pub mod payroll;
pub mod quotation;
