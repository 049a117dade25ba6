//! Plan → YAML resource documents.
//!
//! Layout (paths relative to the bundle root):
//! - `gateways/<gateway>.yml`: one per gateway
//! - `pipelines/<pipeline>.yml`: one per pipeline, pointing at its gateway
//! - `schemas.yml`: distinct destination schemas referenced by the pipelines
//!
//! Maps are `BTreeMap`s so identical plans render byte-identical documents.

use std::collections::{BTreeMap, HashSet};

use serde::Serialize;
use tracing::debug;

use ingestplan_core::config::RenderDefaults;
use ingestplan_core::plan::{sanitize, Gateway, Pipeline, Plan};
use ingestplan_core::VERSION;

use crate::error::{Error, Result};

/// Staging schema used when neither a gateway storage schema nor a
/// destination schema default is configured.
pub const DEFAULT_STAGING_SCHEMA: &str = "ingestplan_staging";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderedDocument {
    pub path: String,
    pub contents: String,
}

#[derive(Serialize)]
struct Document<T> {
    resources: T,
}

#[derive(Serialize)]
struct PipelineResources<T> {
    pipelines: BTreeMap<String, T>,
}

#[derive(Serialize)]
struct SchemaResources {
    schemas: BTreeMap<String, SchemaSpec>,
}

#[derive(Serialize)]
struct GatewaySpec {
    name: String,
    gateway_definition: GatewayDefinition,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    clusters: Vec<ClusterSpec>,
}

#[derive(Serialize)]
struct GatewayDefinition {
    connection_names: Vec<String>,
    gateway_storage_catalog: String,
    gateway_storage_schema: String,
    gateway_storage_name: String,
}

#[derive(Serialize)]
struct ClusterSpec {
    label: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    node_type_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    driver_node_type_id: Option<String>,
}

#[derive(Serialize)]
struct IngestionSpec {
    name: String,
    ingestion_definition: IngestionDefinition,
    #[serde(skip_serializing_if = "Option::is_none")]
    timeout_minutes: Option<u32>,
    tags: BTreeMap<&'static str, String>,
}

#[derive(Serialize)]
struct IngestionDefinition {
    ingestion_gateway_id: String,
    connection_name: String,
    source_type: String,
    objects: Vec<ObjectSpec>,
}

#[derive(Serialize)]
struct ObjectSpec {
    table: TableSpec,
}

#[derive(Serialize)]
struct TableSpec {
    /// Set only when it differs from the pipeline's connection.
    #[serde(skip_serializing_if = "Option::is_none")]
    connection_name: Option<String>,
    source_catalog: String,
    source_schema: String,
    source_table: String,
    destination_catalog: String,
    destination_schema: String,
}

#[derive(Serialize)]
struct SchemaSpec {
    catalog_name: String,
    name: String,
    comment: &'static str,
}

/// Render every document for `plan`: gateways first, then pipelines in plan
/// order, then the schema list. An empty plan renders only an empty schema list.
///
/// Fails with [`Error::DuplicateDocument`] if two documents share a path.
pub fn render_plan(plan: &Plan, defaults: &RenderDefaults) -> Result<Vec<RenderedDocument>> {
    let mut docs = Vec::with_capacity(plan.gateways.len() + plan.pipeline_count() + 1);

    for g in &plan.gateways {
        docs.push(render_gateway(g, defaults)?);
    }
    for g in &plan.gateways {
        for p in &g.pipelines {
            docs.push(render_pipeline(p, g, defaults)?);
        }
    }
    docs.push(render_schemas(plan)?);

    let mut paths = HashSet::with_capacity(docs.len());
    for d in &docs {
        if !paths.insert(d.path.as_str()) {
            return Err(Error::DuplicateDocument(d.path.clone()));
        }
    }
    Ok(docs)
}

pub fn render_gateway(g: &Gateway, defaults: &RenderDefaults) -> Result<RenderedDocument> {
    let name = g.name();
    let storage_catalog = defaults
        .gateway_storage_catalog
        .clone()
        .unwrap_or_else(|| defaults.destination_catalog_default.clone());
    let storage_schema = defaults
        .gateway_storage_schema
        .clone()
        .or_else(|| defaults.destination_schema_default.clone())
        .unwrap_or_else(|| DEFAULT_STAGING_SCHEMA.to_string());

    let clusters = if defaults.gateway_node_type.is_some() || defaults.gateway_driver_node_type.is_some()
    {
        vec![ClusterSpec {
            label: "default",
            node_type_id: defaults.gateway_node_type.clone(),
            driver_node_type_id: defaults.gateway_driver_node_type.clone(),
        }]
    } else {
        Vec::new()
    };

    let spec = GatewaySpec {
        name: name.clone(),
        gateway_definition: GatewayDefinition {
            connection_names: g.connection_names().into_iter().map(String::from).collect(),
            gateway_storage_catalog: storage_catalog,
            gateway_storage_schema: storage_schema,
            gateway_storage_name: name.clone(),
        },
        clusters,
    };

    let mut pipelines = BTreeMap::new();
    pipelines.insert(name.clone(), spec);
    let contents = to_yaml(&Document {
        resources: PipelineResources { pipelines },
    })?;
    Ok(RenderedDocument {
        path: format!("gateways/{name}.yml"),
        contents,
    })
}

pub fn render_pipeline(
    p: &Pipeline,
    gateway: &Gateway,
    defaults: &RenderDefaults,
) -> Result<RenderedDocument> {
    let name = p.name();
    let connections = p.connection_names();
    let connection = connections.first().copied().unwrap_or_default();
    if connections.len() > 1 {
        debug!(pipeline = %name, ?connections, "pipeline spans several connections");
    }
    let objects = p
        .tables
        .iter()
        .map(|t| ObjectSpec {
            table: TableSpec {
                connection_name: (t.connection_name != connection)
                    .then(|| t.connection_name.clone()),
                source_catalog: t.database_name.clone(),
                source_schema: t.schema_name.clone(),
                source_table: t.table_name.clone(),
                destination_catalog: p.target.destination_catalog.clone(),
                destination_schema: p.target.schema_for(t).to_string(),
            },
        })
        .collect();

    let mut tags = BTreeMap::new();
    tags.insert("kind", p.kind.to_string());
    tags.insert("server", p.server_name.clone());

    let spec = IngestionSpec {
        name: name.clone(),
        ingestion_definition: IngestionDefinition {
            ingestion_gateway_id: format!("${{resources.pipelines.{}.id}}", gateway.name()),
            connection_name: connection.to_string(),
            source_type: p.target.source_type.clone(),
            objects,
        },
        timeout_minutes: defaults.pipeline_timeout_minutes,
        tags,
    };

    let mut pipelines = BTreeMap::new();
    pipelines.insert(name.clone(), spec);
    let contents = to_yaml(&Document {
        resources: PipelineResources { pipelines },
    })?;
    Ok(RenderedDocument {
        path: format!("pipelines/{name}.yml"),
        contents,
    })
}

pub fn render_schemas(plan: &Plan) -> Result<RenderedDocument> {
    let mut schemas = BTreeMap::new();
    for p in plan.pipelines() {
        for t in &p.tables {
            let catalog = &p.target.destination_catalog;
            let schema = p.target.schema_for(t);
            schemas
                .entry(format!("{}_{}", sanitize(catalog), sanitize(schema)))
                .or_insert_with(|| SchemaSpec {
                    catalog_name: catalog.clone(),
                    name: schema.to_string(),
                    comment: "Destination schema for ingestion pipelines",
                });
        }
    }
    let contents = to_yaml(&Document {
        resources: SchemaResources { schemas },
    })?;
    Ok(RenderedDocument {
        path: "schemas.yml".to_string(),
        contents,
    })
}

fn to_yaml<T: Serialize>(doc: &T) -> Result<String> {
    let body = serde_yaml::to_string(doc)?;
    Ok(format!(
        "# Generated by ingestplan {VERSION}. Do not edit by hand.\n{body}"
    ))
}
