// src/profile.rs
use std::sync::Arc;

use crate::app_log;
use crate::core::{JobBoardApi, SessionContext};
use crate::error::{ClientError, FlowError};
use crate::messages::{
    NEW_PASSWORD_MISMATCH, PROFILE_UPDATED, PROFILE_UPDATE_ERROR, PROFILE_UPDATE_FAILED,
    TOKEN_MISSING,
};
use crate::types::{ProfileUpdate, User};

/// Edit-profile form. Password fields are only sent when a new password is set.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ProfileForm {
    pub name: String,
    pub email: String,
    pub current_password: String,
    pub new_password: String,
    pub confirm_password: String,
}

impl ProfileForm {
    pub fn from_user(user: &User) -> Self {
        Self {
            name: user.name.clone(),
            email: user.email.clone(),
            ..Self::default()
        }
    }

    /// Same name and email, password inputs emptied.
    pub fn cleared(&self) -> Self {
        Self {
            name: self.name.clone(),
            email: self.email.clone(),
            ..Self::default()
        }
    }

    fn to_update(&self) -> ProfileUpdate {
        let changing_password = !self.new_password.is_empty();
        ProfileUpdate {
            name: self.name.clone(),
            email: self.email.clone(),
            current_password: changing_password.then(|| self.current_password.clone()),
            new_password: changing_password.then(|| self.new_password.clone()),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ProfileSaved {
    pub user: Option<User>,
    pub form: ProfileForm,
    pub notice: &'static str,
}

pub struct ProfileEditor<A: JobBoardApi> {
    api: Arc<A>,
    session: SessionContext,
}

impl<A: JobBoardApi> ProfileEditor<A> {
    pub fn new(api: Arc<A>, session: SessionContext) -> Self {
        Self { api, session }
    }

    /// Pre-filled form for the stored user.
    pub fn form(&self) -> Result<ProfileForm, ClientError> {
        Ok(self
            .session
            .session()?
            .map(|s| ProfileForm::from_user(&s.user))
            .unwrap_or_default())
    }

    /// Send the update. The current password is checked by the backend; only the
    /// new/confirm pair is compared here. On success the stored user gets the new
    /// name and email, the token stays as it is.
    pub async fn submit(&self, form: &ProfileForm) -> Result<ProfileSaved, FlowError> {
        let fail = |e: ClientError| FlowError::new(e, PROFILE_UPDATE_FAILED, PROFILE_UPDATE_ERROR);

        let token = match self.session.token().map_err(fail)? {
            Some(token) => token,
            None => return Err(FlowError::validation(TOKEN_MISSING)),
        };

        if !form.new_password.is_empty() && form.new_password != form.confirm_password {
            return Err(FlowError::validation(NEW_PASSWORD_MISMATCH));
        }

        self.api
            .update_profile(&token, &form.to_update())
            .await
            .map_err(|e| {
                app_log!(error, "Error updating profile: {}", e);
                fail(e)
            })?;

        let user = self
            .session
            .update_user(&form.name, &form.email)
            .map_err(fail)?;

        Ok(ProfileSaved {
            user,
            form: form.cleared(),
            notice: PROFILE_UPDATED,
        })
    }
}
