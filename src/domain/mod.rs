// Domain layer - Canvas records, metrics and sensor descriptions
pub mod assignment;
pub mod course;
pub mod errors;
pub mod metric;
pub mod observee;
pub mod sensor;
