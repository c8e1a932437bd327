use std::fmt;

/// Where an invocation goes and the credential it carries.
#[derive(Clone, PartialEq, Eq)]
pub struct EndpointTarget {
    host: String,
    endpoint_name: String,
    credential: String,
}

impl EndpointTarget {
    pub fn new(
        host: impl Into<String>,
        endpoint_name: impl Into<String>,
        credential: impl Into<String>,
    ) -> Self {
        let host = host.into();
        Self {
            host: host.trim_end_matches('/').to_string(),
            endpoint_name: endpoint_name.into(),
            credential: credential.into(),
        }
    }

    pub fn host(&self) -> &str {
        &self.host
    }

    pub fn endpoint_name(&self) -> &str {
        &self.endpoint_name
    }

    pub fn credential(&self) -> &str {
        &self.credential
    }

    pub fn invocations_url(&self) -> String {
        build_invocations_url(&self.host, &self.endpoint_name)
    }

    /// Token shortened for display: first 6 and last 4 characters.
    pub fn masked_credential(&self) -> String {
        mask_credential(&self.credential)
    }
}

impl fmt::Debug for EndpointTarget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EndpointTarget")
            .field("host", &self.host)
            .field("endpoint_name", &self.endpoint_name)
            .field("credential", &self.masked_credential())
            .finish()
    }
}

pub fn build_invocations_url(host: &str, endpoint_name: &str) -> String {
    format!(
        "{}/serving-endpoints/{}/invocations",
        host.trim_end_matches('/'),
        endpoint_name
    )
}

pub fn mask_credential(credential: &str) -> String {
    let chars: Vec<char> = credential.chars().collect();
    if chars.len() < 12 {
        return "masked".to_string();
    }
    let head: String = chars[..6].iter().collect();
    let tail: String = chars[chars.len() - 4..].iter().collect();
    format!("{head}…{tail}")
}
