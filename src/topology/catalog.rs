//! Entity catalog consumed by the stack layout, plus the compiled-in demo
//! landscape.

use serde::{Deserialize, Serialize};

use super::types::{HealthStatus, LayerType, Severity, Technology};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CatalogEntity {
	pub id: String,
	pub layer_type: LayerType,
	pub label: String,
	pub sub_label: String,
	#[serde(default)]
	pub status: HealthStatus,
	#[serde(default)]
	pub vulnerability_severity: Option<Severity>,
	#[serde(default)]
	pub technology_tag: Option<Technology>,
	/// Orphaned/undiscovered entity. Must not appear in any dependency.
	#[serde(default)]
	pub orphaned: bool,
}

impl CatalogEntity {
	pub fn new(
		id: impl Into<String>,
		layer_type: LayerType,
		label: impl Into<String>,
		sub_label: impl Into<String>,
	) -> Self {
		Self {
			id: id.into(),
			layer_type,
			label: label.into(),
			sub_label: sub_label.into(),
			status: HealthStatus::Healthy,
			vulnerability_severity: None,
			technology_tag: None,
			orphaned: false,
		}
	}

	pub fn tech(mut self, technology: Technology) -> Self {
		self.technology_tag = Some(technology);
		self
	}

	pub fn status(mut self, status: HealthStatus) -> Self {
		self.status = status;
		self
	}

	pub fn vulnerable(mut self, severity: Severity) -> Self {
		self.vulnerability_severity = Some(severity);
		self
	}

	pub fn orphaned(mut self) -> Self {
		self.orphaned = true;
		self
	}
}

/// Entities in display order plus `(from, to)` dependencies between them.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct EntityCatalog {
	pub entities: Vec<CatalogEntity>,
	pub dependencies: Vec<(String, String)>,
}

impl EntityCatalog {
	pub fn is_empty(&self) -> bool {
		self.entities.is_empty()
	}

	pub fn entity(&self, id: &str) -> Option<&CatalogEntity> {
		self.entities.iter().find(|e| e.id == id)
	}

	/// Entities of one layer, in catalog order.
	pub fn layer(&self, layer: LayerType) -> impl Iterator<Item = &CatalogEntity> {
		self.entities.iter().filter(move |e| e.layer_type == layer)
	}

	/// Small e-commerce landscape: a shop stack, a separate back-office
	/// stack, and one orphan per layer.
	pub fn demo() -> Self {
		use HealthStatus::{Critical, Warning};
		use LayerType::*;

		let entities = vec![
			CatalogEntity::new("app-webshop", Application, "easyTravel Web", "Web application")
				.tech(Technology::Browser),
			CatalogEntity::new("app-mobile", Application, "easyTravel Mobile", "Mobile app")
				.tech(Technology::Mobile)
				.status(Warning),
			CatalogEntity::new("app-backoffice", Application, "Backoffice Portal", "Web application")
				.tech(Technology::Browser),
			CatalogEntity::new("app-kiosk", Application, "Airport Kiosk", "Not monitored")
				.tech(Technology::Browser)
				.orphaned(),
			CatalogEntity::new("svc-frontend", Service, "frontend", "Web request service")
				.tech(Technology::NodeJs),
			CatalogEntity::new("svc-checkout", Service, "checkout", "Web service")
				.tech(Technology::Java)
				.status(Warning),
			CatalogEntity::new("svc-payment", Service, "payment", "Web service")
				.tech(Technology::Java)
				.status(Critical)
				.vulnerable(Severity::Critical),
			CatalogEntity::new("svc-inventory", Service, "inventory", "gRPC service")
				.tech(Technology::Go),
			CatalogEntity::new("svc-auth", Service, "auth", "Web service")
				.tech(Technology::DotNet)
				.vulnerable(Severity::High),
			CatalogEntity::new("svc-search", Service, "search", "Queue listener")
				.tech(Technology::Python)
				.vulnerable(Severity::Medium),
			CatalogEntity::new("svc-backoffice", Service, "backoffice", "Web service")
				.tech(Technology::DotNet),
			CatalogEntity::new("svc-reporting", Service, "reporting", "Undiscovered")
				.tech(Technology::Python)
				.orphaned(),
			CatalogEntity::new("proc-nginx", Process, "nginx", "Reverse proxy")
				.tech(Technology::Nginx),
			CatalogEntity::new("proc-node", Process, "node server.js", "Node.js")
				.tech(Technology::NodeJs),
			CatalogEntity::new("proc-checkout", Process, "checkout.jar", "Tomcat")
				.tech(Technology::Java),
			CatalogEntity::new("proc-payment", Process, "payment.jar", "Spring Boot")
				.tech(Technology::Java)
				.status(Critical)
				.vulnerable(Severity::High),
			CatalogEntity::new("proc-inventory", Process, "inventoryd", "Go binary")
				.tech(Technology::Go),
			CatalogEntity::new("proc-auth", Process, "Auth.Service.exe", ".NET")
				.tech(Technology::DotNet),
			CatalogEntity::new("proc-search", Process, "search-worker", "Celery")
				.tech(Technology::Python),
			CatalogEntity::new("proc-postgres", Process, "postgres", "PostgreSQL 15")
				.tech(Technology::Postgres)
				.vulnerable(Severity::Low),
			CatalogEntity::new("proc-redis", Process, "redis-server", "Redis 7")
				.tech(Technology::Redis),
			CatalogEntity::new("proc-kafka", Process, "kafka", "Kafka broker")
				.tech(Technology::Kafka)
				.status(Warning),
			CatalogEntity::new("proc-backoffice", Process, "w3wp.exe", "IIS worker")
				.tech(Technology::DotNet),
			CatalogEntity::new("proc-cron", Process, "cron", "Unmonitored")
				.tech(Technology::Linux)
				.orphaned(),
			CatalogEntity::new("host-web-01", Host, "web-01", "Ubuntu 22.04")
				.tech(Technology::Linux),
			CatalogEntity::new("host-web-02", Host, "web-02", "Ubuntu 22.04")
				.tech(Technology::Linux),
			CatalogEntity::new("host-app-01", Host, "app-01", "RHEL 9")
				.tech(Technology::Linux)
				.vulnerable(Severity::Medium),
			CatalogEntity::new("host-k8s-01", Host, "k8s-node-01", "EKS worker")
				.tech(Technology::Kubernetes),
			CatalogEntity::new("host-db-01", Host, "db-01", "RHEL 9")
				.tech(Technology::Linux),
			CatalogEntity::new("host-win-01", Host, "win-01", "Windows Server 2019")
				.tech(Technology::Windows)
				.status(Warning)
				.vulnerable(Severity::Critical),
			CatalogEntity::new("host-spare-07", Host, "spare-07", "No agent")
				.tech(Technology::Linux)
				.orphaned(),
			CatalogEntity::new("dc-eu-west", Datacenter, "eu-west-1", "AWS region")
				.tech(Technology::Aws),
			CatalogEntity::new("dc-us-east", Datacenter, "eastus", "Azure region")
				.tech(Technology::Azure),
			CatalogEntity::new("dc-vienna", Datacenter, "Vienna DC", "On premises")
				.tech(Technology::OnPrem),
			CatalogEntity::new("dc-lab", Datacenter, "Lab", "Decommissioned")
				.tech(Technology::OnPrem)
				.orphaned(),
		];

		let dependencies = [
			("app-webshop", "svc-frontend"),
			("app-mobile", "svc-frontend"),
			("app-mobile", "svc-auth"),
			("app-backoffice", "svc-backoffice"),
			("svc-frontend", "svc-checkout"),
			("svc-frontend", "svc-search"),
			("svc-frontend", "svc-auth"),
			("svc-checkout", "svc-payment"),
			("svc-checkout", "svc-inventory"),
			("svc-frontend", "proc-nginx"),
			("svc-frontend", "proc-node"),
			("svc-checkout", "proc-checkout"),
			("svc-payment", "proc-payment"),
			("svc-inventory", "proc-inventory"),
			("svc-auth", "proc-auth"),
			("svc-search", "proc-search"),
			("svc-backoffice", "proc-backoffice"),
			("proc-checkout", "proc-postgres"),
			("proc-payment", "proc-postgres"),
			("proc-checkout", "proc-kafka"),
			("proc-search", "proc-kafka"),
			("proc-auth", "proc-redis"),
			("proc-nginx", "host-web-01"),
			("proc-node", "host-web-02"),
			("proc-checkout", "host-app-01"),
			("proc-payment", "host-app-01"),
			("proc-inventory", "host-k8s-01"),
			("proc-search", "host-k8s-01"),
			("proc-kafka", "host-k8s-01"),
			("proc-auth", "host-app-01"),
			("proc-redis", "host-db-01"),
			("proc-postgres", "host-db-01"),
			("proc-backoffice", "host-win-01"),
			("host-web-01", "dc-eu-west"),
			("host-web-02", "dc-eu-west"),
			("host-app-01", "dc-eu-west"),
			("host-k8s-01", "dc-us-east"),
			("host-db-01", "dc-eu-west"),
			("host-win-01", "dc-vienna"),
		]
		.into_iter()
		.map(|(from, to)| (from.to_owned(), to.to_owned()))
		.collect();

		Self {
			entities,
			dependencies,
		}
	}
}
