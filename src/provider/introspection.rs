use crate::auth::{FailureReason, IntrospectionResult, Store, TokenValidation};
use crate::core::types::{unix_now, HashedTokenValue, Scope};

use super::{AuthorizationProvider, Error};

use tracing::{event, Level};

fn terminal(reason: FailureReason) -> Result<IntrospectionResult, Error> {
    event!(Level::DEBUG, ?reason, "Token rejected");
    Ok(IntrospectionResult::inactive(reason))
}

impl<S: Store> AuthorizationProvider<S> {
    pub fn introspection_request(
        &self,
        request: &TokenValidation,
    ) -> Result<IntrospectionResult, Error> {
        self.introspect_at(request, unix_now())
    }

    /// Decide whether the presented token is usable at `now` for the requested scopes.
    ///
    /// Checks run in a fixed order and the first failing one decides the outcome. Nothing
    /// is remembered between calls.
    #[tracing::instrument(
        skip(self, request),
        fields(requested = %request.scopes.as_ref().map(Scope::as_joined).unwrap_or_default())
    )]
    pub fn introspect_at(
        &self,
        request: &TokenValidation,
        now: i64,
    ) -> Result<IntrospectionResult, Error> {
        let hashed: HashedTokenValue = self.hasher.hash_without_salt(&request.token);

        let token = match self.store.get_token(&hashed)? {
            Some(token) => token,
            None => return terminal(FailureReason::NoTokenFound),
        };

        if now >= token.expires_at {
            return terminal(FailureReason::TokenExpired);
        }
        if now <= token.created_at {
            return terminal(FailureReason::TokenUsedBeforeCreation);
        }
        if !token.active {
            return terminal(FailureReason::TokenRevoked);
        }

        let account = match self.store.get_account(token.account_id)? {
            Some(account) => account,
            None => return terminal(FailureReason::NoUserAssociated),
        };
        if !account.active {
            return terminal(FailureReason::UserDisabled);
        }

        let granted = Scope::from_parts(
            self.store
                .list_token_scopes(&token)?
                .into_iter()
                .map(|s| s.value),
        );

        let scope = match &request.scopes {
            Some(required) if !required.is_empty() => {
                if granted.has_administrator() || granted.contains_all(required) {
                    required.clone()
                } else {
                    return terminal(FailureReason::InsufficientScope);
                }
            }
            _ => granted,
        };

        event!(
            Level::DEBUG,
            token_id = token.id,
            kind = ?token.kind,
            account_id = account.id,
            "Token active"
        );
        Ok(IntrospectionResult::active(&token, &account, scope))
    }
}
