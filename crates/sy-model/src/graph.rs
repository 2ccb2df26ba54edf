//! Artifact Graph (C2) — the deployer's output and the router/mediation
//! engine's input. Four keyed registries, each enforcing name uniqueness
//! on insert; APIs additionally enforce context-path uniqueness across
//! the whole graph.

use crate::api::Api;
use crate::endpoint::Endpoint;
use crate::error::ModelError;
use crate::inbound::Inbound;
use crate::sequence::Sequence;
use indexmap::IndexMap;

#[derive(Debug, Clone, Default)]
pub struct ArtifactGraph {
    apis: IndexMap<String, Api>,
    endpoints: IndexMap<String, Endpoint>,
    sequences: IndexMap<String, Sequence>,
    inbounds: IndexMap<String, Inbound>,
}

impl ArtifactGraph {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert_api(&mut self, api: Api) -> Result<(), ModelError> {
        if self.apis.contains_key(&api.name) {
            return Err(ModelError::DuplicateName {
                kind: "API",
                name: api.name,
            });
        }
        if let Some(existing) = self.apis.values().find(|a| a.context == api.context) {
            return Err(ModelError::DuplicateContext(existing.context.clone()));
        }
        self.apis.insert(api.name.clone(), api);
        Ok(())
    }

    pub fn insert_endpoint(&mut self, endpoint: Endpoint) -> Result<(), ModelError> {
        if self.endpoints.contains_key(&endpoint.name) {
            return Err(ModelError::DuplicateName {
                kind: "Endpoint",
                name: endpoint.name,
            });
        }
        self.endpoints.insert(endpoint.name.clone(), endpoint);
        Ok(())
    }

    pub fn insert_sequence(&mut self, sequence: Sequence) -> Result<(), ModelError> {
        let name = sequence
            .name
            .clone()
            .ok_or_else(|| ModelError::Other("top-level sequence must have a name".to_string()))?;
        if self.sequences.contains_key(&name) {
            return Err(ModelError::DuplicateName {
                kind: "Sequence",
                name,
            });
        }
        self.sequences.insert(name, sequence);
        Ok(())
    }

    pub fn insert_inbound(&mut self, inbound: Inbound) -> Result<(), ModelError> {
        if self.inbounds.contains_key(&inbound.name) {
            return Err(ModelError::DuplicateName {
                kind: "Inbound",
                name: inbound.name,
            });
        }
        self.inbounds.insert(inbound.name.clone(), inbound);
        Ok(())
    }

    pub fn api(&self, name: &str) -> Option<&Api> {
        self.apis.get(name)
    }

    pub fn apis(&self) -> impl Iterator<Item = &Api> {
        self.apis.values()
    }

    pub fn endpoint(&self, name: &str) -> Option<&Endpoint> {
        self.endpoints.get(name)
    }

    pub fn endpoints(&self) -> impl Iterator<Item = &Endpoint> {
        self.endpoints.values()
    }

    pub fn sequence(&self, name: &str) -> Option<&Sequence> {
        self.sequences.get(name)
    }

    pub fn sequences(&self) -> impl Iterator<Item = &Sequence> {
        self.sequences.values()
    }

    pub fn inbounds(&self) -> impl Iterator<Item = &Inbound> {
        self.inbounds.values()
    }

    pub fn inbound(&self, name: &str) -> Option<&Inbound> {
        self.inbounds.get(name)
    }

    pub fn api_count(&self) -> usize {
        self.apis.len()
    }
}
