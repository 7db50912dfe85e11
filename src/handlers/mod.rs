pub mod devis;
pub mod health;
pub mod settings;
