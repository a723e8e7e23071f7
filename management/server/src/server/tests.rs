use std::error::Error;
use std::fs;
use std::sync::Arc;
use std::time::Duration;
use std::time::Instant;

use mime::APPLICATION_JSON;
use reqwest::StatusCode;
use reqwest::header::CONTENT_TYPE;
use serde_json::Value;
use serde_json::json;
use swf_management_common::tracing::test_utils::enable_tracing_for_tests;
use tempfile::TempDir;
use tracing::debug;

use super::Server;
use super::management_config::ManagementConfig;
use crate::aggregator::listing_config::ListingConfig;
use crate::aggregator::listing_config::ResponseShape;
use crate::registry::ProcessDescriptor;
use crate::registry::ProcessRegistry;
use crate::registry::RegistryError;
use crate::registry::directory::DirectoryRegistry;
use crate::registry::in_memory::InMemoryRegistry;

#[tokio::test]
async fn status() -> Result<(), Box<dyn Error>> {
    let config = TestConfig::new(registry(), ResponseShape::Full);
    let handle = Server::run(config.clone()).await?;

    let client = make_client(&config).await?;
    let response = client.get(config.url("/status")).send().await?;
    assert_eq!(StatusCode::OK, response.status());
    assert_eq!("UP", response.text().await?);

    let () = handle.stop("End of test").await?;
    Ok(())
}

#[tokio::test]
async fn list_full() -> Result<(), Box<dyn Error>> {
    let config = TestConfig::new(registry(), ResponseShape::Full);
    let handle = Server::run(config.clone()).await?;

    let client = make_client(&config).await?;
    let expected = json!([
        { "id": "orders", "name": "Order Process", "description": "Handles orders" },
        { "id": "shipping", "name": "Shipping Process", "description": "default description" },
    ]);
    for path in ["/management/processes/", "/management/processes"] {
        let response = client.get(config.url(path)).send().await?;
        assert_eq!(StatusCode::OK, response.status());
        assert_eq!(
            Some(APPLICATION_JSON.as_ref()),
            response
                .headers()
                .get(CONTENT_TYPE)
                .and_then(|value| value.to_str().ok())
        );
        assert_eq!(expected, serde_json::from_str::<Value>(&response.text().await?)?);
    }

    let () = handle.stop("End of test").await?;
    Ok(())
}

#[tokio::test]
async fn list_ids() -> Result<(), Box<dyn Error>> {
    let registry = registry();
    registry.deploy(ProcessDescriptor::new("billing", "Billing Process")?);
    let config = TestConfig::new(registry, ResponseShape::Ids);
    let handle = Server::run(config.clone()).await?;

    let client = make_client(&config).await?;
    let response = client
        .get(config.url("/management/processes/"))
        .send()
        .await?;
    assert_eq!(StatusCode::OK, response.status());
    assert_eq!(
        json!(["billing", "orders", "shipping"]),
        serde_json::from_str::<Value>(&response.text().await?)?
    );

    let () = handle.stop("End of test").await?;
    Ok(())
}

#[tokio::test]
async fn list_id_and_name() -> Result<(), Box<dyn Error>> {
    let config = TestConfig::new(registry(), ResponseShape::IdAndName);
    let handle = Server::run(config.clone()).await?;

    let client = make_client(&config).await?;
    let response = client
        .get(config.url("/management/processes/"))
        .send()
        .await?;
    assert_eq!(
        json!([
            { "id": "orders", "name": "Order Process" },
            { "id": "shipping", "name": "Shipping Process" },
        ]),
        serde_json::from_str::<Value>(&response.text().await?)?
    );

    let () = handle.stop("End of test").await?;
    Ok(())
}

#[tokio::test]
async fn list_reflects_deployments() -> Result<(), Box<dyn Error>> {
    let registry = registry();
    let config = TestConfig::new(registry.clone(), ResponseShape::Ids);
    let handle = Server::run(config.clone()).await?;

    let client = make_client(&config).await?;
    registry.undeploy("orders");
    let response = client
        .get(config.url("/management/processes/"))
        .send()
        .await?;
    assert_eq!(
        json!(["shipping"]),
        serde_json::from_str::<Value>(&response.text().await?)?
    );

    let () = handle.stop("End of test").await?;
    Ok(())
}

#[tokio::test]
async fn get_process() -> Result<(), Box<dyn Error>> {
    let config = TestConfig::new(registry(), ResponseShape::Full);
    let handle = Server::run(config.clone()).await?;

    let client = make_client(&config).await?;
    let response = client
        .get(config.url("/management/processes/orders"))
        .send()
        .await?;
    assert_eq!(StatusCode::OK, response.status());
    assert_eq!(
        json!({ "id": "orders", "name": "Order Process", "description": "Handles orders" }),
        serde_json::from_str::<Value>(&response.text().await?)?
    );

    let response = client
        .get(config.url("/management/processes/billing"))
        .send()
        .await?;
    assert_eq!(StatusCode::NOT_FOUND, response.status());
    assert_eq!(
        "[NotFound] Process 'billing' is not deployed",
        response.text().await?
    );

    let () = handle.stop("End of test").await?;
    Ok(())
}

#[tokio::test]
async fn get_source() -> Result<(), Box<dyn Error>> {
    let config = TestConfig::new(registry(), ResponseShape::Full);
    let handle = Server::run(config.clone()).await?;

    let client = make_client(&config).await?;
    let response = client
        .get(config.url("/management/processes/orders/source"))
        .send()
        .await?;
    assert_eq!(StatusCode::OK, response.status());
    assert_eq!(
        Some(APPLICATION_JSON.as_ref()),
        response
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|value| value.to_str().ok())
    );
    assert_eq!(ORDERS_SOURCE, response.text().await?);

    let response = client
        .get(config.url("/management/processes/shipping/source"))
        .send()
        .await?;
    assert_eq!(StatusCode::NOT_FOUND, response.status());
    assert_eq!(
        "[NoSource] Process 'shipping' doesn't have a source",
        response.text().await?
    );

    let () = handle.stop("End of test").await?;
    Ok(())
}

#[tokio::test]
async fn registry_failure() -> Result<(), Box<dyn Error>> {
    let config = TestConfig::new(Arc::new(Unavailable), ResponseShape::Full);
    let handle = Server::run(config.clone()).await?;

    let client = make_client(&config).await?;
    let response = client
        .get(config.url("/management/processes/"))
        .send()
        .await?;
    assert_eq!(StatusCode::INTERNAL_SERVER_ERROR, response.status());
    let body = response.text().await?;
    assert!(
        body.starts_with("[ListProcesses] Failed to list the processes: [Engine] The process engine is unavailable"),
        "{body}"
    );

    let () = handle.stop("End of test").await?;
    Ok(())
}

#[tokio::test]
async fn directory_registry() -> Result<(), Box<dyn Error>> {
    let resources = TempDir::new()?;
    fs::write(resources.path().join("shipping.sw.json"), SHIPPING_SOURCE)?;
    fs::write(resources.path().join("orders.sw.json"), ORDERS_SOURCE)?;
    let config = TestConfig::new(
        Arc::new(DirectoryRegistry::new(resources.path())),
        ResponseShape::Full,
    );
    let handle = Server::run(config.clone()).await?;

    let client = make_client(&config).await?;
    let response = client
        .get(config.url("/management/processes/"))
        .send()
        .await?;
    assert_eq!(
        json!([
            { "id": "orders", "name": "Order Process", "description": "Handles orders" },
            { "id": "shipping", "name": "Shipping Process", "description": "default description" },
        ]),
        serde_json::from_str::<Value>(&response.text().await?)?
    );

    fs::write(resources.path().join("broken.sw.json"), "{")?;
    let response = client
        .get(config.url("/management/processes/"))
        .send()
        .await?;
    assert_eq!(StatusCode::INTERNAL_SERVER_ERROR, response.status());

    let () = handle.stop("End of test").await?;
    Ok(())
}

const ORDERS_SOURCE: &str = r#"{"id":"orders","name":"Order Process","description":"Handles orders"}"#;
const SHIPPING_SOURCE: &str = r#"{"id":"shipping","name":"Shipping Process"}"#;

fn registry() -> Arc<InMemoryRegistry> {
    Arc::new(
        [
            ProcessDescriptor::new("orders", "Order Process")
                .expect("orders")
                .with_metadata("Description", "Handles orders")
                .with_source(ORDERS_SOURCE),
            ProcessDescriptor::new("shipping", "Shipping Process").expect("shipping"),
        ]
        .into_iter()
        .collect(),
    )
}

/// A registry whose backing store is gone.
struct Unavailable;

impl ProcessRegistry for Unavailable {
    fn process_ids(&self) -> Result<Vec<String>, RegistryError> {
        Err(RegistryError::engine("The process engine is unavailable"))
    }

    fn process_by_id(&self, id: &str) -> Result<Arc<ProcessDescriptor>, RegistryError> {
        Err(RegistryError::NotFound(id.to_owned()))
    }
}

async fn make_client(config: &TestConfig) -> Result<reqwest::Client, Box<dyn Error>> {
    let client = reqwest::Client::new();
    let mut wait = Duration::from_millis(1);
    while wait < Duration::from_secs(5) {
        let t = Instant::now();
        match client.get(config.url("/status")).send().await {
            Ok(response) => match response.text().await.as_deref() {
                Ok("UP") => return Ok(client),
                response => debug!("Unexpected response: {response:?}"),
            },
            Err(error) => debug!("Failed: {error:?}"),
        }
        tokio::time::sleep(wait).await;
        wait = Duration::max(t.elapsed(), wait) * 2;
    }
    panic!("Failed to connect")
}

struct TestConfig {
    port: u16,
    listing: ListingConfig,
    registry: Arc<dyn ProcessRegistry>,
}

impl TestConfig {
    fn new(registry: Arc<dyn ProcessRegistry>, shape: ResponseShape) -> Arc<Self> {
        enable_tracing_for_tests();
        Arc::new(Self {
            port: portpicker::pick_unused_port().expect("pick_unused_port()"),
            listing: ListingConfig {
                shape,
                ..ListingConfig::default()
            },
            registry,
        })
    }

    fn url(&self, path: &str) -> String {
        format!("http://{}:{}{path}", self.host(), self.port)
    }
}

impl ManagementConfig for TestConfig {
    fn enable_tracing(&self) -> bool {
        false
    }

    fn port(&self) -> u16 {
        self.port
    }

    fn listing(&self) -> ListingConfig {
        self.listing.clone()
    }

    fn registry(&self) -> Arc<dyn ProcessRegistry> {
        self.registry.clone()
    }
}
