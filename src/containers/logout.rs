//! Logout container

use super::ContainerContext;
use crate::core::error::BilledError;
use crate::core::navigation::Route;

pub struct Logout {
    ctx: ContainerContext,
}

impl Logout {
    pub fn new(ctx: ContainerContext) -> Self {
        Self { ctx }
    }

    /// Forget everything about the client and go back to the login page
    pub fn handle_click(&self) -> Result<(), BilledError> {
        self.ctx.session_mut()?.clear();
        self.ctx.navigator.navigate(Route::Login);
        Ok(())
    }
}
