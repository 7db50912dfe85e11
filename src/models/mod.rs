pub mod devis;
pub mod settings;

pub use devis::{Client, Devis, Prestation, Pricing};
pub use settings::{CompanySettings, SETTINGS_ID};
