pub mod evaluate;
pub mod report;

pub use evaluate::evaluate;
pub use report::EvaluationReport;
