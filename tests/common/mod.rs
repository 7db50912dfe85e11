use devis_service::config::Config;
use devis_service::services::MongoDb;
use devis_service::Application;
use serde_json::{json, Value};
use uuid::Uuid;

pub struct TestApp {
    pub address: String,
    pub port: u16,
    pub db: MongoDb,
    pub db_name: String,
    pub api: reqwest::Client,
}

impl TestApp {
    pub async fn spawn() -> Self {
        if std::env::var("MONGODB_URI").is_err() {
            std::env::set_var("MONGODB_URI", "mongodb://localhost:27017");
        }
        std::env::set_var("MONGODB_DATABASE", "devis_test");

        let db_name = format!("devis_test_{}", Uuid::new_v4().simple());

        let mut config = Config::from_env().expect("Failed to load configuration");
        config.server.host = "127.0.0.1".to_string();
        config.server.port = 0; // Random port for testing
        config.mongodb.database = db_name.clone();

        let app = Application::build(config)
            .await
            .expect("Failed to build test application");

        let port = app.port();
        let db = app.db().clone();
        let address = format!("http://127.0.0.1:{}", port);

        tokio::spawn(async move {
            app.run_until_stopped().await.ok();
        });

        // Wait for the server to come up by polling the health endpoint
        let api = reqwest::Client::new();
        let health_url = format!("{}/health", address);
        for _ in 0..50 {
            if api.get(&health_url).send().await.is_ok() {
                break;
            }
            tokio::time::sleep(tokio::time::Duration::from_millis(50)).await;
        }

        TestApp {
            address,
            port,
            db,
            db_name,
            api,
        }
    }

    pub fn url(&self, path: &str) -> String {
        format!("{}{}", self.address, path)
    }

    /// Upsert company settings with the given tariffs.
    pub async fn upsert_settings(&self, tarif_km: f64, tarif_h: f64) -> reqwest::Response {
        self.api
            .post(self.url("/api/company-settings"))
            .json(&json!({
                "nom_societe": "VTC Prestige",
                "numero_siret": "12345678900011",
                "adresse": "1 rue de la Paix, 75002 Paris",
                "telephone": "+33600000000",
                "email": "contact@vtc-prestige.fr",
                "tarif_transfert_km": tarif_km,
                "tarif_mise_disposition_h": tarif_h,
            }))
            .send()
            .await
            .expect("Failed to upsert settings")
    }

    pub async fn create_devis(&self, body: &Value) -> reqwest::Response {
        self.api
            .post(self.url("/api/devis"))
            .json(body)
            .send()
            .await
            .expect("Failed to create devis")
    }

    /// Drop the throwaway test database.
    pub async fn cleanup(&self) {
        let _ = self.db.client().database(&self.db_name).drop(None).await;
    }
}

pub fn client_body() -> Value {
    json!({
        "nom": "Martin",
        "prenom": "Claire",
        "adresse": "2 avenue Foch, 75116 Paris",
        "telephone": "+33611111111",
        "email": "claire.martin@example.fr",
    })
}

pub fn transfert_body(km: f64) -> Value {
    json!({
        "client": client_body(),
        "type_prestation": "transfert",
        "adresse_prise_en_charge": "Aéroport CDG, Terminal 2E",
        "adresse_destination": "Place Vendôme, Paris",
        "nombre_kilometres": km,
    })
}

pub fn mise_a_disposition_body(heures: f64) -> Value {
    json!({
        "client": client_body(),
        "type_prestation": "mise_a_disposition",
        "nombre_heures": heures,
    })
}
