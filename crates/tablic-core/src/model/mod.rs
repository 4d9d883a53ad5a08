pub mod bucket;
pub mod card;
pub mod card_set;
pub mod deck;
pub mod pattern;
pub mod play;
pub mod rank;
pub mod rules;
pub mod suit;
