//! Field extractors. Each one is a [`cascade::Cascade`] of keyword-anchored
//! rules, except the sender, which scans the letter bottom to top.

pub mod body;
pub mod cascade;
pub mod classification;
pub mod dates;
pub mod event;
pub mod recipient;
pub mod sender;

pub use body::BodyExtractor;
pub use cascade::{Cascade, Hit, Rule};
pub use dates::DateExtractor;
pub use event::{EventExtractor, EventHits};
pub use recipient::{BoundaryRepair, RecipientExtractor};
pub use sender::SenderExtractor;
