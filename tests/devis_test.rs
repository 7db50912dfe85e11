mod common;

use common::{client_body, mise_a_disposition_body, transfert_body, TestApp};
use chrono::{DateTime, Utc};
use serde_json::{json, Value};

#[tokio::test]
async fn transfert_devis_is_priced_from_km_tariff() {
    let app = TestApp::spawn().await;
    app.upsert_settings(2.5, 90.0).await;

    let response = app.create_devis(&transfert_body(40.0)).await;
    assert!(response.status().is_success());
    let devis: Value = response.json().await.expect("Invalid JSON");

    assert_eq!(devis["type_prestation"], "transfert");
    assert_eq!(devis["prix_unitaire"], 2.5);
    assert_eq!(devis["prix_ht"], 100.0);
    assert_eq!(devis["taux_tva"], 0.10);
    assert_eq!(devis["montant_tva"], 10.0);
    assert_eq!(devis["prix_ttc"], 110.0);
    assert_eq!(devis["is_facture"], false);
    assert_eq!(devis["nombre_kilometres"], 40.0);
    assert_eq!(devis["client"]["nom"], "Martin");

    app.cleanup().await;
}

#[tokio::test]
async fn mise_a_disposition_devis_is_priced_from_hour_tariff() {
    let app = TestApp::spawn().await;
    app.upsert_settings(2.5, 90.0).await;

    let response = app.create_devis(&mise_a_disposition_body(2.0)).await;
    assert!(response.status().is_success());
    let devis: Value = response.json().await.expect("Invalid JSON");

    assert_eq!(devis["type_prestation"], "mise_a_disposition");
    assert_eq!(devis["prix_unitaire"], 90.0);
    assert_eq!(devis["prix_ht"], 180.0);
    assert_eq!(devis["taux_tva"], 0.20);
    assert_eq!(devis["montant_tva"], 36.0);
    assert_eq!(devis["prix_ttc"], 216.0);

    app.cleanup().await;
}

#[tokio::test]
async fn missing_kilometres_is_a_bad_request() {
    let app = TestApp::spawn().await;
    app.upsert_settings(2.5, 90.0).await;

    let response = app
        .create_devis(&json!({
            "client": client_body(),
            "type_prestation": "transfert",
            "adresse_prise_en_charge": "Orly",
            "adresse_destination": "Paris",
        }))
        .await;

    assert_eq!(response.status().as_u16(), 400);

    app.cleanup().await;
}

#[tokio::test]
async fn unknown_type_prestation_is_a_bad_request() {
    let app = TestApp::spawn().await;
    app.upsert_settings(2.5, 90.0).await;

    let response = app
        .create_devis(&json!({
            "client": client_body(),
            "type_prestation": "croisiere",
            "nombre_heures": 2.0,
        }))
        .await;

    assert_eq!(response.status().as_u16(), 400);

    app.cleanup().await;
}

#[tokio::test]
async fn create_without_settings_is_a_bad_request() {
    let app = TestApp::spawn().await;

    let response = app.create_devis(&transfert_body(10.0)).await;
    assert_eq!(response.status().as_u16(), 400);

    app.cleanup().await;
}

#[tokio::test]
async fn get_unknown_devis_returns_404() {
    let app = TestApp::spawn().await;

    let response = app
        .api
        .get(app.url("/api/devis/non-existent-id"))
        .send()
        .await
        .expect("Failed to execute request");

    assert_eq!(response.status().as_u16(), 404);

    app.cleanup().await;
}

#[tokio::test]
async fn numero_devis_is_date_prefixed_and_sequential() {
    let app = TestApp::spawn().await;
    app.upsert_settings(2.0, 80.0).await;

    let first: Value = app
        .create_devis(&transfert_body(10.0))
        .await
        .json()
        .await
        .expect("Invalid JSON");
    let second: Value = app
        .create_devis(&transfert_body(20.0))
        .await
        .json()
        .await
        .expect("Invalid JSON");

    let today = Utc::now().format("%Y%m%d").to_string();
    assert_eq!(
        first["numero_devis"].as_str().unwrap(),
        format!("DEV-{}-0001", today)
    );
    assert_eq!(
        second["numero_devis"].as_str().unwrap(),
        format!("DEV-{}-0002", today)
    );

    app.cleanup().await;
}

#[tokio::test]
async fn devis_keeps_rate_snapshot_after_tariff_change() {
    let app = TestApp::spawn().await;
    app.upsert_settings(2.0, 80.0).await;

    let devis: Value = app
        .create_devis(&transfert_body(10.0))
        .await
        .json()
        .await
        .expect("Invalid JSON");
    let id = devis["id"].as_str().unwrap().to_string();

    // Raise the tariff; the existing quote must not move.
    app.upsert_settings(5.0, 120.0).await;

    let fetched: Value = app
        .api
        .get(app.url(&format!("/api/devis/{}", id)))
        .send()
        .await
        .expect("Failed to execute request")
        .json()
        .await
        .expect("Invalid JSON");

    assert_eq!(fetched["prix_unitaire"], 2.0);
    assert_eq!(fetched["prix_ht"], 20.0);

    app.cleanup().await;
}

#[tokio::test]
async fn list_devis_returns_newest_first() {
    let app = TestApp::spawn().await;
    app.upsert_settings(2.0, 80.0).await;

    for km in [10.0, 20.0, 30.0] {
        app.create_devis(&transfert_body(km)).await;
        // created_at has millisecond precision in the store
        tokio::time::sleep(tokio::time::Duration::from_millis(5)).await;
    }

    let listed: Vec<Value> = app
        .api
        .get(app.url("/api/devis"))
        .send()
        .await
        .expect("Failed to execute request")
        .json()
        .await
        .expect("Invalid JSON");

    assert_eq!(listed.len(), 3);
    let dates: Vec<DateTime<Utc>> = listed
        .iter()
        .map(|d| {
            d["created_at"]
                .as_str()
                .unwrap()
                .parse()
                .expect("Invalid created_at")
        })
        .collect();
    assert!(dates.windows(2).all(|w| w[0] >= w[1]));
    assert_eq!(listed[0]["nombre_kilometres"], 30.0);

    app.cleanup().await;
}

#[tokio::test]
async fn date_validite_is_thirty_days_after_creation() {
    let app = TestApp::spawn().await;
    app.upsert_settings(2.0, 80.0).await;

    let devis: Value = app
        .create_devis(&mise_a_disposition_body(1.0))
        .await
        .json()
        .await
        .expect("Invalid JSON");

    let creation: DateTime<Utc> = devis["date_creation"].as_str().unwrap().parse().unwrap();
    let validite: DateTime<Utc> = devis["date_validite"].as_str().unwrap().parse().unwrap();
    assert_eq!(validite - creation, chrono::Duration::days(30));

    app.cleanup().await;
}
