// ABOUTME: Custom serde deserializers for config types.
// ABOUTME: Accepts forwards either as "L:host:R" strings or as mappings.

use serde::Deserialize;

use super::forward::{DEFAULT_FORWARD_HOST, ForwardSpec};

pub fn deserialize_forwards<'de, D>(deserializer: D) -> Result<Vec<ForwardSpec>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    let values: Vec<ForwardEntry> = Vec::deserialize(deserializer)?;
    values
        .into_iter()
        .map(ForwardEntry::into_forward_spec)
        .collect::<Result<Vec<_>, _>>()
        .map_err(serde::de::Error::custom)
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum ForwardEntry {
    Simple(String),
    Detailed {
        local_port: u16,
        #[serde(default = "default_remote_host")]
        remote_host: String,
        remote_port: u16,
    },
}

fn default_remote_host() -> String {
    DEFAULT_FORWARD_HOST.to_string()
}

impl ForwardEntry {
    fn into_forward_spec(self) -> Result<ForwardSpec, String> {
        match self {
            ForwardEntry::Simple(s) => ForwardSpec::parse(&s).map_err(|e| e.to_string()),
            ForwardEntry::Detailed {
                local_port,
                remote_host,
                remote_port,
            } => {
                let spec = ForwardSpec::new(local_port, remote_host, remote_port);
                spec.validate().map_err(|e| e.to_string())?;
                Ok(spec)
            }
        }
    }
}
