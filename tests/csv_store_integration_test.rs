//! End-to-end tests over real files
//!
//! A vendor list and a company dataset on disk, registries served by a
//! mock HTTP server.

use mockito::Matcher;
use std::fs;
use std::path::Path;
use tokio::sync::watch;
use vendor_enrich::adapters::input::read_identities;
use vendor_enrich::adapters::store::{CompanyStore, CsvCompanyStore};
use vendor_enrich::cli::commands::enrich::EnrichArgs;
use vendor_enrich::cli::EXIT_COMPLETED_WITH_ERRORS;
use vendor_enrich::config::EnrichConfig;
use vendor_enrich::core::enrich::{EnrichmentCoordinator, PersistenceStatus};
use vendor_enrich::domain::{CompanyId, CountryCode};

const DATASET: &str = "\
Vendor Country,Company SIREN,Company Name,Local Activity Code,Local Activity Code Description,L1 Classification,L2 Classification,L3 Classification
FR,552100554,Old Name,00.00Z,Old activity,IT,Software,
US,987654,Legacy Corp,N/A,N/A,Other,,
";

const VENDORS: &str = "\
Vendor,Country,Company_ID
Acme,FR,552100554
Newco,FR,111111111
Dansk,DK,10150825
Yankee,US,987654
Blank,,222222
";

fn write(dir: &Path, name: &str, contents: &str) -> String {
    let path = dir.join(name);
    fs::write(&path, contents).unwrap();
    path.to_string_lossy().into_owned()
}

fn config_for(server: &mockito::ServerGuard, store_path: &str) -> EnrichConfig {
    let mut config = EnrichConfig::default();
    config.enrichment.inter_batch_delay_ms = 0;
    config.enrichment.per_fetch_timeout_secs = 5;
    config.sources.fr_api_url = format!("{}/search?q={{id}}", server.url());
    config.sources.be_search_url = format!("{}/kbo?nummer={{id}}", server.url());
    config.sources.dk_company_url = format!("{}/cvr/{{id}}", server.url());
    config.store.path = store_path.to_string();
    config.input.id_column = "company_id".to_string();
    config.logging.local_enabled = false;
    config
}

async fn mock_france(server: &mut mockito::ServerGuard, id: &str, name: &str) -> mockito::Mock {
    server
        .mock("GET", "/search")
        .match_query(Matcher::UrlEncoded("q".into(), id.into()))
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(format!(
            r#"{{"results": [{{"nom_complet": "{name}", "activite_principale": "62.01Z",
                "libelle_activite_principale": "Programmation informatique"}}]}}"#
        ))
        .create_async()
        .await
}

#[test]
fn test_read_identities_from_vendor_export() {
    let dir = tempfile::tempdir().unwrap();
    let path = write(dir.path(), "vendors.csv", VENDORS);

    let list = read_identities(&path, "COUNTRY", "company_id").unwrap();

    assert_eq!(list.identities.len(), 4);
    assert_eq!(list.skipped_rows, 1);
    assert_eq!(list.identities[0].country, "FR");
    assert_eq!(list.identities[0].id, "552100554");
}

#[test]
fn test_read_identities_missing_column() {
    let dir = tempfile::tempdir().unwrap();
    let path = write(dir.path(), "vendors.csv", VENDORS);

    let err = read_identities(&path, "country", "siren").unwrap_err();
    assert!(err.to_string().contains("siren"));
}

#[tokio::test]
async fn test_enrich_new_vendors_into_csv_dataset() {
    let dir = tempfile::tempdir().unwrap();
    let store_path = write(dir.path(), "companies.csv", DATASET);
    let vendors = read_identities(write(dir.path(), "vendors.csv", VENDORS), "country", "company_id")
        .unwrap();

    let mut server = mockito::Server::new_async().await;
    let newco = mock_france(&mut server, "111111111", "NEWCO SAS").await;

    let config = config_for(&server, &store_path);
    let mut store = CsvCompanyStore::open(&store_path).unwrap();
    assert_eq!(store.retained_count(), 1);

    let report = EnrichmentCoordinator::from_config(&config)
        .unwrap()
        .run(&vendors.identities, &mut store)
        .await
        .unwrap();

    newco.assert_async().await;
    assert_eq!(report.known, 1);
    assert_eq!(report.skipped_unsupported, 1);
    assert_eq!(report.total_candidates, 2);
    assert_eq!(report.added, 2);
    assert_eq!(report.per_country[&CountryCode::Dk].fetch_errors, 1);
    assert_eq!(report.persistence, PersistenceStatus::Persisted);

    let reopened = CsvCompanyStore::open(&store_path).unwrap();
    assert_eq!(reopened.len(), 3);
    assert_eq!(reopened.retained_count(), 1);

    let existing = reopened.get(&CompanyId::new("552100554").unwrap()).unwrap();
    assert_eq!(existing.name, "Old Name");
    assert_eq!(existing.classification_l1, "IT");

    let added = reopened.get(&CompanyId::new("111111111").unwrap()).unwrap();
    assert_eq!(added.name, "NEWCO SAS");
    assert_eq!(added.activity_code, "62.01Z");
    assert!(added.classification_l1.is_empty());

    let unknown = reopened.get(&CompanyId::new("10150825").unwrap()).unwrap();
    assert_eq!(unknown.name, "N/A");

    let text = fs::read_to_string(&store_path).unwrap();
    assert!(text.starts_with("Vendor Country,Company SIREN,Company Name"));
    assert!(text.contains("US,987654,Legacy Corp"));
}

#[tokio::test]
async fn test_refresh_existing_overwrites_fetched_fields_only() {
    let dir = tempfile::tempdir().unwrap();
    let store_path = write(dir.path(), "companies.csv", DATASET);

    let mut server = mockito::Server::new_async().await;
    mock_france(&mut server, "552100554", "ACME SA").await;

    let mut config = config_for(&server, &store_path);
    config.enrichment.refresh_existing = true;
    let mut store = CsvCompanyStore::open(&store_path).unwrap();

    let identities = vec![vendor_enrich::domain::VendorIdentity::new("FR", "552100554")];
    let report = EnrichmentCoordinator::from_config(&config)
        .unwrap()
        .run(&identities, &mut store)
        .await
        .unwrap();

    assert_eq!(report.updated, 1);
    let reopened = CsvCompanyStore::open(&store_path).unwrap();
    let record = reopened.get(&CompanyId::new("552100554").unwrap()).unwrap();
    assert_eq!(record.name, "ACME SA");
    assert_eq!(record.activity_description, "Programmation informatique");
    assert_eq!(record.classification_l1, "IT");
    assert_eq!(record.classification_l2, "Software");
}

#[tokio::test]
async fn test_kept_aside_row_is_not_duplicated() {
    let dir = tempfile::tempdir().unwrap();
    let store_path = write(
        dir.path(),
        "companies.csv",
        "Vendor Country,Company SIREN,Company Name,Local Activity Code,Local Activity Code Description,L1 Classification,L2 Classification,L3 Classification\n\
         US,552100554,Globex,N/A,N/A,Retail,,\n",
    );
    let identities = vec![vendor_enrich::domain::VendorIdentity::new("FR", "552100554")];

    let mut server = mockito::Server::new_async().await;
    mock_france(&mut server, "552100554", "ACME").await;

    // Already in the dataset, so nothing is fetched by default
    let config = config_for(&server, &store_path);
    let mut store = CsvCompanyStore::open(&store_path).unwrap();
    let report = EnrichmentCoordinator::from_config(&config)
        .unwrap()
        .run(&identities, &mut store)
        .await
        .unwrap();
    assert_eq!(report.known, 1);
    assert_eq!(report.added, 0);
    assert_eq!(fs::read_to_string(&store_path).unwrap().matches("552100554").count(), 1);

    // A refresh replaces the row and keeps its classification
    let mut config = config_for(&server, &store_path);
    config.enrichment.refresh_existing = true;
    let mut store = CsvCompanyStore::open(&store_path).unwrap();
    let report = EnrichmentCoordinator::from_config(&config)
        .unwrap()
        .run(&identities, &mut store)
        .await
        .unwrap();
    assert_eq!(report.added, 0);
    assert_eq!(report.updated, 1);

    let text = fs::read_to_string(&store_path).unwrap();
    assert_eq!(text.matches("552100554").count(), 1);
    let reopened = CsvCompanyStore::open(&store_path).unwrap();
    let record = reopened.get(&CompanyId::new("552100554").unwrap()).unwrap();
    assert_eq!(record.country, CountryCode::Fr);
    assert_eq!(record.name, "ACME");
    assert_eq!(record.classification_l1, "Retail");
    assert_eq!(reopened.retained_count(), 0);
}

#[tokio::test]
async fn test_dry_run_leaves_dataset_untouched() {
    let dir = tempfile::tempdir().unwrap();
    let store_path = write(dir.path(), "companies.csv", DATASET);

    let mut server = mockito::Server::new_async().await;
    mock_france(&mut server, "111111111", "NEWCO SAS").await;

    let mut config = config_for(&server, &store_path);
    config.application.dry_run = true;
    let mut store = CsvCompanyStore::open(&store_path).unwrap();

    let identities = vec![vendor_enrich::domain::VendorIdentity::new("FR", "111111111")];
    let report = EnrichmentCoordinator::from_config(&config)
        .unwrap()
        .run(&identities, &mut store)
        .await
        .unwrap();

    assert!(report.dry_run);
    assert_eq!(report.added, 1);
    assert_eq!(fs::read_to_string(&store_path).unwrap(), DATASET);
}

#[tokio::test]
async fn test_enrich_command_exit_code() {
    let dir = tempfile::tempdir().unwrap();
    let store_path = write(dir.path(), "companies.csv", DATASET);
    let input = write(dir.path(), "vendors.csv", VENDORS);

    let mut server = mockito::Server::new_async().await;
    mock_france(&mut server, "111111111", "NEWCO SAS").await;

    let config_path = write(
        dir.path(),
        "vendor-enrich.toml",
        &format!(
            r#"
[enrichment]
inter_batch_delay_ms = 0
per_fetch_timeout_secs = 5

[sources]
fr_api_url = "{url}/search?q={{id}}"
be_search_url = "{url}/kbo?nummer={{id}}"
dk_company_url = "{url}/cvr/{{id}}"

[store]
path = "{store_path}"

[input]
country_column = "Country"
id_column = "Company_ID"

[logging]
local_enabled = false
"#,
            url = server.url()
        ),
    );

    let args = EnrichArgs {
        input,
        yes: true,
        dry_run: false,
        refresh_existing: false,
        country: None,
    };
    let (_tx, rx) = watch::channel(false);

    // DK lookup is not mocked and comes back unknown
    assert_eq!(
        args.execute(&config_path, rx).await.unwrap(),
        EXIT_COMPLETED_WITH_ERRORS
    );

    let args = EnrichArgs {
        input: write(dir.path(), "fr_only.csv", "country,company_id\nFR,111111111\n"),
        yes: true,
        dry_run: true,
        refresh_existing: false,
        country: Some("FR".to_string()),
    };
    let (_tx, rx) = watch::channel(false);
    assert_eq!(args.execute(&config_path, rx).await.unwrap(), 0);
}
