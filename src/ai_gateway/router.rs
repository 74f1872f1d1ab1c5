use std::collections::{BTreeMap, HashMap};

use crate::ai_gateway::{
    error::{GatewayError, invalid_request},
    types::{AIGatewayConfig, BackendId, BackendProfile, DEFAULT_ROUTE_ALIAS, ModelTarget},
};

#[derive(Clone)]
pub struct BackendRouter {
    backends: HashMap<BackendId, BackendProfile>,
    route_aliases: BTreeMap<String, ModelTarget>,
}

#[derive(Debug, Clone)]
pub struct SelectedBackend {
    pub backend_id: BackendId,
    pub profile: BackendProfile,
    pub resolved_model: String,
}

impl BackendRouter {
    pub fn new(config: &AIGatewayConfig) -> Result<Self, GatewayError> {
        if config.backends.is_empty() {
            return Err(invalid_request("ai_gateway.backends must not be empty"));
        }

        let mut backends = HashMap::new();
        for profile in &config.backends {
            if profile.models.is_empty() {
                return Err(invalid_request(format!(
                    "backend '{}' must declare at least one model",
                    profile.id
                )));
            }
            if backends
                .insert(profile.id.clone(), profile.clone())
                .is_some()
            {
                return Err(invalid_request(format!(
                    "duplicate backend id '{}' in ai_gateway.backends",
                    profile.id
                )));
            }
        }

        for (alias, target) in &config.route_aliases {
            let profile = backends.get(&target.backend_id).ok_or_else(|| {
                invalid_request(format!(
                    "route alias '{}' references unknown backend '{}'",
                    alias, target.backend_id
                ))
            })?;
            if !profile.models.iter().any(|model| model.id == target.model_id) {
                return Err(invalid_request(format!(
                    "route alias '{}' references unknown model '{}' on backend '{}'",
                    alias, target.model_id, target.backend_id
                )));
            }
        }

        if !config.route_aliases.contains_key(DEFAULT_ROUTE_ALIAS) {
            return Err(invalid_request(format!(
                "ai_gateway.route_aliases must define '{}'",
                DEFAULT_ROUTE_ALIAS
            )));
        }

        Ok(Self {
            backends,
            route_aliases: config.route_aliases.clone(),
        })
    }

    /// Resolves a route given either as an alias name or as `backend_id/model_id`.
    pub fn select(&self, route: Option<&str>) -> Result<SelectedBackend, GatewayError> {
        let route = route
            .map(str::trim)
            .filter(|route| !route.is_empty())
            .unwrap_or(DEFAULT_ROUTE_ALIAS);

        let (backend_id, model_id) = match self.route_aliases.get(route) {
            Some(target) => (target.backend_id.clone(), target.model_id.clone()),
            None => match route.split_once('/') {
                Some((backend_id, model_id)) if !backend_id.is_empty() && !model_id.is_empty() => {
                    (backend_id.to_string(), model_id.to_string())
                }
                _ => {
                    return Err(invalid_request(format!(
                        "route '{}' is neither an alias nor backend_id/model_id",
                        route
                    )));
                }
            },
        };

        let profile = self.backends.get(&backend_id).ok_or_else(|| {
            invalid_request(format!("selected backend '{}' does not exist", backend_id))
        })?;
        if !profile.models.iter().any(|model| model.id == model_id) {
            return Err(invalid_request(format!(
                "model '{}' is not declared on backend '{}'",
                model_id, backend_id
            )));
        }

        Ok(SelectedBackend {
            backend_id,
            profile: profile.clone(),
            resolved_model: model_id,
        })
    }
}
