use super::mocks::StubTransport;
use serving_client::{
    Result, ServingClient,
    config::ClientConfig,
    payload::NonFinitePolicy,
    serving::{EndpointInvoker, EndpointTarget},
};
use std::path::PathBuf;
use std::sync::Arc;
use tempfile::TempDir;
use tokio::fs;

pub const TEST_HOST: &str = "https://dbc-test.cloud.example.com/";
pub const TEST_ENDPOINT: &str = "sentiment-endpoint";
pub const TEST_TOKEN: &str = "dapi0123456789abcdef";

pub fn create_test_target() -> EndpointTarget {
    EndpointTarget::new(TEST_HOST, TEST_ENDPOINT, TEST_TOKEN)
}

pub fn create_client_config(non_finite: NonFinitePolicy) -> ClientConfig {
    ClientConfig {
        timeout_secs: 120,
        non_finite,
    }
}

/// Client wired to a shared stub so tests can inspect what was sent.
pub fn create_test_client(stub: &Arc<StubTransport>) -> ServingClient {
    create_test_client_with_policy(stub, NonFinitePolicy::Sentinel)
}

pub fn create_test_client_with_policy(
    stub: &Arc<StubTransport>,
    non_finite: NonFinitePolicy,
) -> ServingClient {
    let invoker = EndpointInvoker::new(stub.clone(), &create_client_config(non_finite));
    ServingClient::new(invoker, create_test_target())
}

/// Create a temporary directory for test files
pub fn create_temp_dir() -> TempDir {
    tempfile::tempdir().expect("Failed to create temp directory")
}

pub async fn write_test_file(dir: &TempDir, name: &str, content: &str) -> Result<PathBuf> {
    let path = dir.path().join(name);
    fs::write(&path, content).await?;
    Ok(path)
}

pub const SAMPLE_CSV: &str = "\
id,text,label
1,great product,1
2,\"terrible, would not buy\",0
3,it was fine,1
4,never again,0
";

pub const SAMPLE_CONFIG_YAML: &str = r#"
endpoint:
  host: "https://dbc-file.cloud.example.com"
  token: "dapi-from-file-000000"
  name: "file-endpoint"
client:
  timeout_secs: 45
  non_finite: "null"
logs:
  level: "debug"
"#;

pub const INVALID_CONFIG_YAML: &str = r#"
endpoint:
  host: ["not", "a", "string"]
client:
  timeout_secs: "soon"
"#;
