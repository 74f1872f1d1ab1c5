use std::env;

use async_trait::async_trait;

use crate::ai_gateway::{
    error::{GatewayError, GatewayErrorKind, invalid_request},
    types::{BackendProfile, CredentialRef, ResolvedCredential},
};

#[async_trait]
pub trait CredentialProvider: Send + Sync {
    async fn resolve(
        &self,
        reference: &CredentialRef,
        backend: &BackendProfile,
    ) -> Result<ResolvedCredential, GatewayError>;
}

/// Reads bearer tokens from the process environment at call time.
#[derive(Default)]
pub struct EnvCredentialProvider;

#[async_trait]
impl CredentialProvider for EnvCredentialProvider {
    async fn resolve(
        &self,
        reference: &CredentialRef,
        backend: &BackendProfile,
    ) -> Result<ResolvedCredential, GatewayError> {
        match reference {
            CredentialRef::Env { var } => {
                let token = env::var(var)
                    .ok()
                    .filter(|token| !token.trim().is_empty())
                    .ok_or_else(|| {
                        GatewayError::new(
                            GatewayErrorKind::Authentication,
                            format!(
                                "missing credential environment variable {} for backend {}",
                                var, backend.id
                            ),
                        )
                        .with_retryable(false)
                        .with_backend_id(backend.id.clone())
                    })?;
                Ok(ResolvedCredential::bearer(token.trim()))
            }
            CredentialRef::InlineToken { token } => {
                if token.trim().is_empty() {
                    return Err(invalid_request(format!(
                        "inline credential token for backend {} cannot be empty",
                        backend.id
                    )));
                }
                Ok(ResolvedCredential::bearer(token.trim()))
            }
            CredentialRef::None => Ok(ResolvedCredential::none()),
        }
    }
}
