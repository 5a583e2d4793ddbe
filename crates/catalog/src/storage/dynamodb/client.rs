//! AWS SDK client setup.

use aws_sdk_dynamodb::config::Credentials;
use aws_sdk_dynamodb::Client;

/// Options for building a DynamoDB client.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientOptions {
    pub region: String,
    /// Custom endpoint URL (for local DynamoDB). When set, dummy static
    /// credentials are used instead of the default provider chain.
    pub endpoint_url: Option<String>,
}

impl ClientOptions {
    /// Returns a display string for the target environment.
    pub fn target_display(&self) -> String {
        match &self.endpoint_url {
            Some(url) => format!("Local DynamoDB ({})", url),
            None => format!("AWS DynamoDB (region: {})", self.region),
        }
    }
}

/// Creates a DynamoDB client with the given options.
pub async fn create_client(options: &ClientOptions) -> Client {
    let mut loader = aws_config::defaults(aws_config::BehaviorVersion::latest())
        .region(aws_config::Region::new(options.region.clone()));

    if let Some(endpoint) = &options.endpoint_url {
        loader = loader
            .endpoint_url(endpoint)
            .credentials_provider(Credentials::new("dummy", "dummy", None, None, "static"));
    }

    let sdk_config = loader.load().await;
    Client::new(&sdk_config)
}
