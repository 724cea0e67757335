// src/auth.rs
//! Credential exchange, session persistence and the client-side route guard

use std::sync::Arc;

use crate::app_log;
use crate::core::{JobBoardApi, SessionContext};
use crate::error::{ClientError, FlowError};
use crate::messages::{
    GENERIC_ERROR, LOGIN_FAILED, PASSWORD_MISMATCH, REGISTER_FAILED, REGISTER_SUCCESS,
};
use crate::types::{LoginRequest, RegisterRequest, Session};

/// Views of the application.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Route {
    Landing,
    Login,
    Register,
    Dashboard,
}

impl Route {
    pub fn path(self) -> &'static str {
        match self {
            Route::Landing => "/",
            Route::Login => "/login",
            Route::Register => "/register",
            Route::Dashboard => "/dashboard",
        }
    }

    pub fn requires_session(self) -> bool {
        matches!(self, Route::Dashboard)
    }
}

/// Where a navigation to `route` actually lands. Only gates navigation; the
/// backend is the authority on what the token may access.
pub fn guard(route: Route, session: &SessionContext) -> Result<Route, ClientError> {
    if route.requires_session() && session.token()?.is_none() {
        app_log!(info, "no session for {}, redirecting to login", route.path());
        return Ok(Route::Login);
    }
    Ok(route)
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct RegistrationForm {
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub password: String,
    pub confirm_password: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct LoggedIn {
    pub route: Route,
    pub session: Session,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Registered {
    pub route: Route,
    pub notice: &'static str,
}

pub struct AuthService<A: JobBoardApi> {
    api: Arc<A>,
    session: SessionContext,
}

impl<A: JobBoardApi> AuthService<A> {
    pub fn new(api: Arc<A>, session: SessionContext) -> Self {
        Self { api, session }
    }

    /// Email to pre-fill the login form with, if the user asked to be remembered.
    pub fn remembered_email(&self) -> Result<Option<String>, ClientError> {
        self.session.remembered_email()
    }

    pub async fn login(
        &self,
        email: &str,
        password: &str,
        remember: bool,
    ) -> Result<LoggedIn, FlowError> {
        let fail = |e: ClientError| FlowError::new(e, LOGIN_FAILED, GENERIC_ERROR);

        self.session
            .set_remembered_email(remember.then_some(email))
            .map_err(fail)?;

        let request = LoginRequest {
            email: email.to_string(),
            password: password.to_string(),
        };

        let payload = self.api.login(&request).await.map_err(|e| {
            app_log!(warn, "Login error: {}", e);
            fail(e)
        })?;

        let Some(token) = payload.token.filter(|t| !t.is_empty()) else {
            app_log!(warn, "login succeeded without a token");
            return Err(fail(ClientError::Rejected {
                message: payload.message,
            }));
        };

        let session = Session {
            token,
            user: payload.user.unwrap_or_default(),
        };
        self.session.save(&session).map_err(fail)?;

        Ok(LoggedIn {
            route: Route::Dashboard,
            session,
        })
    }

    /// Create an account. Does not log in; the caller goes to the login view.
    pub async fn register(&self, form: &RegistrationForm) -> Result<Registered, FlowError> {
        if form.password != form.confirm_password {
            return Err(FlowError::validation(PASSWORD_MISMATCH));
        }

        let request = RegisterRequest {
            name: format!("{} {}", form.first_name, form.last_name),
            email: form.email.clone(),
            password: form.password.clone(),
        };

        self.api.register(&request).await.map_err(|e| {
            app_log!(warn, "Register error: {}", e);
            FlowError::new(e, REGISTER_FAILED, GENERIC_ERROR)
        })?;

        app_log!(info, "registered account for {}", form.email);
        Ok(Registered {
            route: Route::Login,
            notice: REGISTER_SUCCESS,
        })
    }

    /// Forget the session locally. Nothing is sent to the backend.
    pub fn logout(&self) -> Result<Route, FlowError> {
        self.session
            .clear()
            .map_err(|e| FlowError::new(e, GENERIC_ERROR, GENERIC_ERROR))?;
        Ok(Route::Landing)
    }
}
