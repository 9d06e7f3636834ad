//! Login container

use super::ContainerContext;
use crate::core::error::{BilledError, StoreError, ValidationError};
use crate::core::navigation::Route;
use crate::core::session::JWT_KEY;
use crate::core::user::{User, UserType};
use serde::{Deserialize, Serialize};
use validator::Validate;

/// Fields of both login forms
#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
pub struct LoginForm {
    #[validate(email(message = "Adresse email invalide"))]
    pub email: String,

    #[validate(length(min = 1, message = "Mot de passe requis"))]
    pub password: String,
}

#[derive(Debug, Clone, PartialEq)]
pub enum LoginOutcome {
    Connected(User),
    Invalid(ValidationError),
    Refused(StoreError),
}

pub struct Login {
    ctx: ContainerContext,
}

impl Login {
    pub fn new(ctx: ContainerContext) -> Self {
        Self { ctx }
    }

    pub async fn handle_submit_employee(
        &self,
        form: LoginForm,
    ) -> Result<LoginOutcome, BilledError> {
        self.connect(UserType::Employee, form, Route::Bills).await
    }

    pub async fn handle_submit_admin(&self, form: LoginForm) -> Result<LoginOutcome, BilledError> {
        self.connect(UserType::Admin, form, Route::Dashboard).await
    }

    async fn connect(
        &self,
        user_type: UserType,
        form: LoginForm,
        landing: Route,
    ) -> Result<LoginOutcome, BilledError> {
        if let Err(errors) = form.validate() {
            return Ok(LoginOutcome::Invalid(errors.into()));
        }

        let user = User::connected(user_type, &form.email, &form.password);
        self.ctx.session_mut()?.set_user(&user)?;

        let jwt = match self.login_or_register(&user, &form.password).await {
            Ok(jwt) => jwt,
            Err(err) => {
                tracing::warn!(email = %user.email, error = %err, "login refused");
                self.ctx.session_mut()?.clear();
                return Ok(LoginOutcome::Refused(err));
            }
        };

        self.ctx.session_mut()?.set_item(JWT_KEY, jwt);
        tracing::info!(email = %user.email, user_type = ?user.user_type, "user connected");
        self.ctx.navigator.navigate(landing);
        Ok(LoginOutcome::Connected(user))
    }

    /// An unknown account is created on the fly, then logged in
    async fn login_or_register(&self, user: &User, password: &str) -> Result<String, StoreError> {
        let users = self.ctx.store.users();
        match users.login(&user.email, password).await {
            Err(StoreError::NotFound { .. }) => {
                tracing::debug!(email = %user.email, "unknown account, creating it");
                users.create(user.clone()).await?;
                users.login(&user.email, password).await
            }
            other => other,
        }
    }
}
