pub mod card;
pub mod catalog;
pub mod category;
pub mod deck;
