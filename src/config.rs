use std::path::PathBuf;
use std::time::Duration;

use crate::endpoint::CandidateEndpoint;
use crate::swap::client::DEFAULT_TIMEOUT;
use crate::transport::TransportConfig;

pub const DEFAULT_ONION_HOSTS: [&str; 4] = [
    "cqy2caejjpclixkumyvb24agvyth67znr7koee5264i6ucjxno3rcaid.onion",
    "5a2k6b3ov6w2ryl5th3jnsrujqj4x4micvxz75pbeama47fzonnwwcyd.onion",
    "2syzexutltau2n455oryarrervet36fzj2sksxbkpmg5anzustojsvid.onion",
    "5arhxqhg6sbken6qfnlnb4ozw3m7kzhjafqhzt5fcgdpy5s7qcjfciad.onion",
];
pub const DEFAULT_SERVICE_PORT: u16 = 8000;
pub const DEFAULT_PROBE_PATH: &str = "/ping";

#[derive(Debug, Clone)]
pub struct ClientConfig {
    pub hosts: Vec<String>,
    pub port: u16,
    pub probe_path: String,
    pub timeout: Duration,
    pub transport: TransportConfig,
    pub store_path: PathBuf,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            hosts: DEFAULT_ONION_HOSTS.iter().map(|h| h.to_string()).collect(),
            port: DEFAULT_SERVICE_PORT,
            probe_path: DEFAULT_PROBE_PATH.to_string(),
            timeout: DEFAULT_TIMEOUT,
            transport: TransportConfig::default(),
            store_path: default_store_path(),
        }
    }
}

impl ClientConfig {
    pub fn candidates(&self) -> Vec<CandidateEndpoint> {
        self.hosts
            .iter()
            .map(|host| CandidateEndpoint::new(host.clone(), self.port))
            .collect()
    }
}

pub fn default_store_path() -> PathBuf {
    std::env::temp_dir().join("swap-id").join("swaps.sqlite3")
}
