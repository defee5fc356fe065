pub mod answer;
pub mod question;
pub mod score;

pub use answer::{AnswerStatistics, RecordAnswerRequest, RecordAnswerResponse, Statistics};
pub use question::Question;
pub use score::ScoreDescription;
