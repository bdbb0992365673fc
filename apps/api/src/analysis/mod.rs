// Résumé / job-description matching engine.
// Every operation is a pure function of its input text; only `cache` holds state,
// and it is owned by the HTTP layer rather than the engine.

pub mod cache;
pub mod contact;
pub mod engine;
pub mod gaps;
pub mod handlers;
pub mod jobs;
pub mod keywords;
pub mod lemmatizer;
pub mod normalizer;
pub mod segmenter;
pub mod similarity;
pub mod stop_words;
