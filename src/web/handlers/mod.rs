// Route handlers, grouped by what they serve.

pub mod articles;
pub mod keywords;
pub mod nlp;
pub mod topics;
