pub mod period;
pub mod validation;

pub use period::Period;
pub use validation::format_validation_errors;
