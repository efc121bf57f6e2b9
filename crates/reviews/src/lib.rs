//! Reviews module: vendor ratings of wholesalers and the wholesaler's reply.

pub mod review;

pub use review::{Rating, Reply, Review, ReviewDraft};
