//! Project directory client.
//!
//! Resolves a package id to the project that lists it, using a GraphQL
//! directory service whose entities follow the `data { attributes { ... } }`
//! envelope convention. The service expects browser traffic, so every request
//! carries fixed `Origin`, `Referer` and `User-Agent` headers.
//!
//! ## Query
//!
//! A single named query `package($hash)` filters `contracts` by `ContractId`
//! and chain name, and pulls the linked project's full attribute graph. Only
//! the first matching contract's project is used.

use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use tracing::{debug, error, info, warn};

use crate::error::MetadataError;
use crate::http::{HttpTimeouts, JsonTransport};
use crate::network::origin_of;

/// Chain name every contract lookup is filtered by.
pub const CHAIN_NAME: &str = "Sui";

/// Contract label marking a deployable package.
pub const PACKAGE_LABEL: &str = "Package";

const USER_AGENT: &str = "Mozilla/5.0 (X11; Linux x86_64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/124.0 Safari/537.36";

const PACKAGE_QUERY: &str = r#"
    query package($hash: String, $chain: String) {
        contracts(filters: { ContractId: { eq: $hash }, chain: { Name: { eq: $chain } } }) {
            data {
                attributes {
                    ContractId
                    Name
                    Label
                    project {
                        data {
                            attributes {
                                Name
                                ShortDescription
                                Description
                                Website
                                Github
                                Twitter
                                Discord
                                Telegram
                                Medium
                                Docs
                                categories { data { attributes { Name } } }
                                tokens { data { attributes { TokenId Name Label } } }
                                contracts(pagination: { limit: 100 }) {
                                    data { attributes { ContractId Name Label } }
                                }
                                Logo { data { attributes { url } } }
                            }
                        }
                    }
                }
            }
        }
    }
"#;

/// Project entry from the directory, with its contract list.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ProjectRecord {
    pub name: String,
    pub short_description: Option<String>,
    pub description: Option<String>,
    pub website: Option<String>,
    pub github: Option<String>,
    pub socials: SocialLinks,
    pub logo: Option<String>,
    pub categories: Vec<String>,
    pub tokens: Vec<TokenDescriptor>,
    pub contracts: Vec<ContractDescriptor>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SocialLinks {
    pub twitter: Option<String>,
    pub discord: Option<String>,
    pub telegram: Option<String>,
    pub medium: Option<String>,
    pub docs: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TokenDescriptor {
    pub id: String,
    pub name: Option<String>,
    pub label: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ContractDescriptor {
    pub id: String,
    pub name: Option<String>,
    pub label: Option<String>,
}

impl ContractDescriptor {
    /// Whether this contract is a deployed package worth enriching.
    pub fn is_package(&self) -> bool {
        self.label.as_deref() == Some(PACKAGE_LABEL)
    }
}

/// GraphQL client for the project directory.
#[derive(Clone)]
pub struct GraphMetadataClient {
    endpoint: String,
    transport: JsonTransport,
}

impl GraphMetadataClient {
    pub fn new(endpoint: &str, timeouts: HttpTimeouts) -> Self {
        let mut transport = JsonTransport::new(timeouts).with_header("User-Agent", USER_AGENT);
        if let Some(origin) = origin_of(endpoint) {
            transport = transport
                .with_header("Origin", origin.clone())
                .with_header("Referer", format!("{}/", origin));
        }
        Self {
            endpoint: endpoint.to_string(),
            transport,
        }
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    /// Resolve the project listing `package_id`.
    ///
    /// Returns `None` on any failure; the cause is logged.
    pub fn resolve_project(&self, package_id: &str) -> Option<ProjectRecord> {
        match self.try_resolve_project(package_id) {
            Ok(project) => {
                info!(
                    package_id,
                    project = %project.name,
                    contracts = project.contracts.len(),
                    "resolved project"
                );
                Some(project)
            }
            Err(e @ (MetadataError::NoMatch(_) | MetadataError::MissingProject(_))) => {
                warn!(package_id, error = %e, "project not found");
                None
            }
            Err(e) => {
                error!(package_id, error = %e, "project lookup failed");
                None
            }
        }
    }

    /// Resolve the project listing `package_id`, keeping the failure cause.
    pub fn try_resolve_project(&self, package_id: &str) -> Result<ProjectRecord, MetadataError> {
        let body = json!({
            "operationName": "package",
            "query": PACKAGE_QUERY,
            "variables": { "hash": package_id, "chain": CHAIN_NAME }
        });
        let response = self.transport.post_json(&self.endpoint, &body)?;
        parse_project_response(package_id, response)
    }
}

// =============================================================================
// Response shapes
// =============================================================================

#[derive(Debug, Deserialize)]
struct GraphQLEnvelope {
    #[serde(default)]
    data: Option<ContractsData>,
    #[serde(default)]
    errors: Option<Vec<GraphQLErrorBody>>,
}

#[derive(Debug, Deserialize)]
struct GraphQLErrorBody {
    #[serde(default)]
    message: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ContractsData {
    #[serde(default)]
    contracts: Option<Collection<ContractAttrs>>,
}

#[derive(Debug, Deserialize)]
struct Collection<T> {
    #[serde(default = "Vec::new")]
    data: Vec<Node<T>>,
}

#[derive(Debug, Deserialize)]
struct Entity<T> {
    #[serde(default = "Option::default")]
    data: Option<Node<T>>,
}

#[derive(Debug, Deserialize)]
struct Node<T> {
    #[serde(default = "Option::default")]
    attributes: Option<T>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "PascalCase")]
struct ContractAttrs {
    #[serde(default)]
    contract_id: Option<String>,
    #[serde(default)]
    name: Option<String>,
    #[serde(default)]
    label: Option<String>,
    #[serde(rename = "project", default)]
    project: Option<Entity<ProjectAttrs>>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "PascalCase")]
struct ContractRefAttrs {
    #[serde(default)]
    contract_id: Option<String>,
    #[serde(default)]
    name: Option<String>,
    #[serde(default)]
    label: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "PascalCase")]
struct ProjectAttrs {
    #[serde(default)]
    name: Option<String>,
    #[serde(default)]
    short_description: Option<String>,
    #[serde(default)]
    description: Option<String>,
    #[serde(default)]
    website: Option<String>,
    #[serde(default)]
    github: Option<String>,
    #[serde(default)]
    twitter: Option<String>,
    #[serde(default)]
    discord: Option<String>,
    #[serde(default)]
    telegram: Option<String>,
    #[serde(default)]
    medium: Option<String>,
    #[serde(default)]
    docs: Option<String>,
    #[serde(rename = "categories", default)]
    categories: Option<Collection<NamedAttrs>>,
    #[serde(rename = "tokens", default)]
    tokens: Option<Collection<TokenAttrs>>,
    #[serde(rename = "contracts", default)]
    contracts: Option<Collection<ContractRefAttrs>>,
    #[serde(default)]
    logo: Option<Entity<MediaAttrs>>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "PascalCase")]
struct NamedAttrs {
    #[serde(default)]
    name: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "PascalCase")]
struct TokenAttrs {
    #[serde(default)]
    token_id: Option<String>,
    #[serde(default)]
    name: Option<String>,
    #[serde(default)]
    label: Option<String>,
}

#[derive(Debug, Deserialize)]
struct MediaAttrs {
    #[serde(default)]
    url: Option<String>,
}

impl<T> Collection<T> {
    fn into_attributes(self) -> impl Iterator<Item = T> {
        self.data.into_iter().filter_map(|node| node.attributes)
    }
}

impl<T> Entity<T> {
    fn into_attributes(self) -> Option<T> {
        self.data.and_then(|node| node.attributes)
    }
}

/// Blank strings from the directory count as absent.
fn present(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}

impl ProjectAttrs {
    fn into_record(self) -> ProjectRecord {
        ProjectRecord {
            name: present(self.name).unwrap_or_default(),
            short_description: present(self.short_description),
            description: present(self.description),
            website: present(self.website),
            github: present(self.github),
            socials: SocialLinks {
                twitter: present(self.twitter),
                discord: present(self.discord),
                telegram: present(self.telegram),
                medium: present(self.medium),
                docs: present(self.docs),
            },
            logo: self
                .logo
                .and_then(Entity::into_attributes)
                .and_then(|media| present(media.url)),
            categories: self
                .categories
                .map(|c| c.into_attributes().filter_map(|a| present(a.name)).collect())
                .unwrap_or_default(),
            tokens: self
                .tokens
                .map(|c| {
                    c.into_attributes()
                        .filter_map(|t| {
                            Some(TokenDescriptor {
                                id: present(t.token_id)?,
                                name: present(t.name),
                                label: present(t.label),
                            })
                        })
                        .collect()
                })
                .unwrap_or_default(),
            contracts: self
                .contracts
                .map(|c| {
                    c.into_attributes()
                        .filter_map(|contract| {
                            Some(ContractDescriptor {
                                id: present(contract.contract_id)?,
                                name: present(contract.name),
                                label: present(contract.label),
                            })
                        })
                        .collect()
                })
                .unwrap_or_default(),
        }
    }
}

/// Turn a `package` query response into the first matching project.
pub fn parse_project_response(
    package_id: &str,
    body: Value,
) -> Result<ProjectRecord, MetadataError> {
    let envelope: GraphQLEnvelope =
        serde_json::from_value(body).map_err(|e| MetadataError::Malformed(e.to_string()))?;

    if let Some(errors) = envelope.errors.filter(|errors| !errors.is_empty()) {
        let message = errors
            .into_iter()
            .next()
            .and_then(|e| e.message)
            .unwrap_or_else(|| "unknown error".to_string());
        return Err(MetadataError::Query(message));
    }

    let contracts: Vec<ContractAttrs> = envelope
        .data
        .ok_or_else(|| MetadataError::Malformed("no data in response".to_string()))?
        .contracts
        .map(|c| c.into_attributes().collect())
        .unwrap_or_default();

    if contracts.len() > 1 {
        debug!(
            package_id,
            matches = contracts.len(),
            "multiple contracts match, using the first"
        );
    }

    let first = contracts
        .into_iter()
        .next()
        .ok_or_else(|| MetadataError::NoMatch(package_id.to_string()))?;
    let contract_id = first
        .contract_id
        .clone()
        .unwrap_or_else(|| package_id.to_string());

    first
        .project
        .and_then(Entity::into_attributes)
        .map(ProjectAttrs::into_record)
        .ok_or(MetadataError::MissingProject(contract_id))
}
