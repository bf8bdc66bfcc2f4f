pub mod similarity;
pub mod tokenize;

pub use similarity::{jaccard, text_similarity};
pub use tokenize::{token_set, word_count};
