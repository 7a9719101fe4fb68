use serde::{Deserialize, Serialize};

/// Latency/availability target the surrounding service framework declares
/// for a core service. Read by the core, never enforced by it.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct ServiceSlo {
    pub target_latency_ms: u64,
    pub target_availability_pct: f64,
}

/// A core service's declared dependencies and SLO.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ServiceSpec {
    pub name: String,
    pub depends_on: Vec<String>,
    pub slo: ServiceSlo,
}

/// The declared topology for the three core services.
pub fn default_topology() -> Vec<ServiceSpec> {
    vec![
        ServiceSpec {
            name: "bridge".to_string(),
            depends_on: vec![
                "ledger".to_string(),
                "security".to_string(),
                "audit".to_string(),
            ],
            slo: ServiceSlo {
                target_latency_ms: 200,
                target_availability_pct: 99.85,
            },
        },
        ServiceSpec {
            name: "compliance".to_string(),
            depends_on: vec![
                "ledger".to_string(),
                "audit".to_string(),
                "risk".to_string(),
            ],
            slo: ServiceSlo {
                target_latency_ms: 500,
                target_availability_pct: 99.50,
            },
        },
        ServiceSpec {
            name: "journal".to_string(),
            depends_on: vec!["audit".to_string(), "replay".to_string()],
            slo: ServiceSlo {
                target_latency_ms: 50,
                target_availability_pct: 99.98,
            },
        },
    ]
}

/// Look up one service's spec by name from the default topology.
pub fn service_spec(name: &str) -> Option<ServiceSpec> {
    default_topology().into_iter().find(|s| s.name == name)
}
