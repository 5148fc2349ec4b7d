pub mod analyzer;
pub mod filter;
pub mod gazetteer;
pub mod ranker;
pub mod text;
