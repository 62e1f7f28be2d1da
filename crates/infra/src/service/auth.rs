use std::sync::Arc;

use chrono::Utc;
use thiserror::Error;
use tracing::info;

use nexcrm_auth::{
    hash_password, verify_password, PasswordError, Role, TokenError, TokenKind, TokenPair,
    TokenService,
};
use nexcrm_core::{DomainError, UserId};
use nexcrm_tenancy::{Organization, OrganizationMember, User};

use crate::store::{MembershipStore, OrganizationStore, UserStore};

const MIN_PASSWORD_LEN: usize = 8;

#[derive(Debug, Error)]
pub enum AuthError {
    #[error("invalid credentials")]
    InvalidCredentials,
    #[error("user account is inactive")]
    InactiveUser,
    #[error(transparent)]
    Token(#[from] TokenError),
    #[error(transparent)]
    Password(#[from] PasswordError),
    #[error(transparent)]
    Domain(#[from] DomainError),
}

#[derive(Debug, Clone)]
pub struct RegisterRequest {
    pub email: String,
    pub username: String,
    pub first_name: String,
    pub last_name: String,
    pub password: String,
}

/// Result of a successful registration: the user, their personal
/// organization and the owner membership, plus a token pair.
#[derive(Debug, Clone)]
pub struct RegisteredAccount {
    pub user: User,
    pub organization: Organization,
    pub member: OrganizationMember,
    pub tokens: TokenPair,
}

#[derive(Debug, Clone)]
pub struct LoginOutcome {
    pub user: User,
    pub tokens: TokenPair,
}

/// Registration, login, token refresh and password changes.
#[derive(Clone)]
pub struct AuthService {
    users: Arc<UserStore>,
    organizations: Arc<OrganizationStore>,
    memberships: Arc<MembershipStore>,
    tokens: TokenService,
}

impl AuthService {
    pub fn new(
        users: Arc<UserStore>,
        organizations: Arc<OrganizationStore>,
        memberships: Arc<MembershipStore>,
        tokens: TokenService,
    ) -> Self {
        Self {
            users,
            organizations,
            memberships,
            tokens,
        }
    }

    /// Creates a user together with a personal organization the user owns.
    pub fn register(&self, request: RegisterRequest) -> Result<RegisteredAccount, AuthError> {
        if request.password.len() < MIN_PASSWORD_LEN {
            return Err(DomainError::validation(
                "password must be at least 8 characters",
            )
            .into());
        }

        let password_hash = hash_password(&request.password)?;
        let user = User::new(
            &request.email,
            &request.username,
            &request.first_name,
            &request.last_name,
            password_hash,
        )?;
        self.users.insert(user.clone())?;

        let organization = Organization::new(format!(
            "{} {}'s Organization",
            user.first_name, user.last_name
        ));
        self.organizations.insert(organization.clone());

        let member = OrganizationMember::new(user.id, organization.id, Role::Owner);
        self.memberships.add(member.clone())?;

        let tokens = self.tokens.issue_pair(user.id)?;
        info!(user_id = %user.id, organization_id = %organization.id, "registered new account");
        Ok(RegisteredAccount {
            user,
            organization,
            member,
            tokens,
        })
    }

    /// Verifies credentials and stamps `last_login`. Unknown email and wrong
    /// password are indistinguishable to the caller.
    pub fn login(&self, email: &str, password: &str) -> Result<LoginOutcome, AuthError> {
        let mut user = self
            .users
            .find_by_email(email)
            .ok_or(AuthError::InvalidCredentials)?;
        if !verify_password(password, &user.password_hash) {
            return Err(AuthError::InvalidCredentials);
        }
        if !user.is_active {
            return Err(AuthError::InactiveUser);
        }

        user.last_login = Some(Utc::now());
        user.updated_at = Utc::now();
        self.users.update(user.clone())?;

        let tokens = self.tokens.issue_pair(user.id)?;
        Ok(LoginOutcome { user, tokens })
    }

    /// Exchanges a refresh token for a fresh pair.
    pub fn refresh(&self, refresh_token: &str) -> Result<LoginOutcome, AuthError> {
        let claims = self.tokens.verify(refresh_token, TokenKind::Refresh)?;
        let user = self
            .users
            .get(claims.sub)
            .ok_or(AuthError::InvalidCredentials)?;
        if !user.is_active {
            return Err(AuthError::InactiveUser);
        }
        let tokens = self.tokens.issue_pair(user.id)?;
        Ok(LoginOutcome { user, tokens })
    }

    /// Resolves a bearer access token to its active user.
    pub fn authenticate(&self, access_token: &str) -> Result<User, AuthError> {
        let claims = self.tokens.verify(access_token, TokenKind::Access)?;
        let user = self
            .users
            .get(claims.sub)
            .ok_or(AuthError::InvalidCredentials)?;
        if !user.is_active {
            return Err(AuthError::InactiveUser);
        }
        Ok(user)
    }

    pub fn change_password(
        &self,
        user_id: UserId,
        current_password: &str,
        new_password: &str,
    ) -> Result<(), AuthError> {
        let mut user = self.users.get(user_id).ok_or(DomainError::NotFound)?;
        if !verify_password(current_password, &user.password_hash) {
            return Err(AuthError::InvalidCredentials);
        }
        if new_password.len() < MIN_PASSWORD_LEN {
            return Err(DomainError::validation(
                "password must be at least 8 characters",
            )
            .into());
        }
        user.password_hash = hash_password(new_password)?;
        user.updated_at = Utc::now();
        self.users.update(user)?;
        Ok(())
    }

    pub fn user(&self, user_id: UserId) -> Option<User> {
        self.users.get(user_id)
    }
}
