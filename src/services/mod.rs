pub mod database;
pub mod devis;
pub mod metrics;
pub mod settings;

pub use database::MongoDb;
pub use devis::DevisRepository;
pub use metrics::{get_metrics, init_metrics};
pub use settings::SettingsRepository;
