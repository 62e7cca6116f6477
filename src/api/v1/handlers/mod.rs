pub mod groups;
pub mod health;
