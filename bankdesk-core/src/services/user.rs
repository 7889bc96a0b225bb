//! User service - login identities and password checks
//!
//! Passwords are hashed with Argon2id and stored as PHC strings, so the
//! parameters travel with each hash and can be raised without a migration.

use std::sync::Arc;

use argon2::password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString};
use argon2::{Algorithm, Argon2, Params, Version};
use rand::Rng;
use uuid::Uuid;

use crate::adapters::duckdb::DuckDbRepository;
use crate::domain::result::{Error, Result};
use crate::domain::{Caller, Role, User};
use crate::ports::IdentityResolver;

const INVALID_CREDENTIALS: &str = "Invalid username or password";

/// Creates users and turns credentials into a `Caller`
pub struct UserService {
    repository: Arc<DuckDbRepository>,
    params: Params,
}

impl UserService {
    pub fn new(repository: Arc<DuckDbRepository>) -> Self {
        Self {
            repository,
            params: Params::default(),
        }
    }

    /// Use explicit Argon2 cost parameters (cheap ones keep tests fast)
    pub fn with_hash_params(mut self, params: Params) -> Self {
        self.params = params;
        self
    }

    fn hasher(&self) -> Argon2<'static> {
        Argon2::new(Algorithm::Argon2id, Version::V0x13, self.params.clone())
    }

    fn hash_password(&self, password: &str) -> Result<String> {
        let salt_bytes: [u8; 16] = rand::thread_rng().gen();
        let salt = SaltString::encode_b64(&salt_bytes)
            .map_err(|e| Error::database(format!("Failed to encode salt: {}", e)))?;
        let hash = self
            .hasher()
            .hash_password(password.as_bytes(), &salt)
            .map_err(|e| Error::database(format!("Failed to hash password: {}", e)))?;
        Ok(hash.to_string())
    }

    /// Register a login identity
    ///
    /// A `customer_id`, when given, must name an existing customer.
    pub fn create_user(
        &self,
        username: &str,
        password: &str,
        role: Role,
        customer_id: Option<Uuid>,
    ) -> Result<User> {
        let username = username.trim();
        if username.is_empty() || password.is_empty() {
            return Err(Error::validation("Username and password are required"));
        }
        if let Some(id) = customer_id {
            if self.repository.get_customer(id)?.is_none() {
                return Err(Error::not_found("No customer exists with this customer_id"));
            }
        }

        let user = User::new(username, self.hash_password(password)?, role, customer_id);
        self.repository.insert_user(&user)?;
        tracing::info!(user = %user.id, role = %user.role, "user created");
        Ok(user)
    }

    /// Register a user on behalf of `registrar`
    ///
    /// Anyone may sign up as an unbound USER. An ADMIN role or a customer
    /// binding grants access to money, so those require an administrator.
    pub fn register(
        &self,
        username: &str,
        password: &str,
        role: Role,
        customer_id: Option<Uuid>,
        registrar: Option<&Caller>,
    ) -> Result<User> {
        if role == Role::Admin || customer_id.is_some() {
            match registrar {
                None => {
                    return Err(Error::unauthorized(
                        "Administrator credentials are required to grant a role or customer binding",
                    ))
                }
                Some(caller) => caller.require_admin()?,
            }
        }
        self.create_user(username, password, role, customer_id)
    }

    pub fn list_users(&self) -> Result<Vec<User>> {
        self.repository.list_users()
    }

    /// Check credentials and resolve the caller's capabilities
    ///
    /// Unknown usernames and wrong passwords produce the same error.
    pub fn authenticate(&self, username: &str, password: &str) -> Result<Caller> {
        let user = self
            .repository
            .get_user_by_username(username.trim())?
            .ok_or_else(|| Error::unauthorized(INVALID_CREDENTIALS))?;

        let parsed = PasswordHash::new(&user.password_hash)
            .map_err(|e| Error::database(format!("Stored password hash is invalid: {}", e)))?;
        if self
            .hasher()
            .verify_password(password.as_bytes(), &parsed)
            .is_err()
        {
            tracing::debug!(username, "password mismatch");
            return Err(Error::unauthorized(INVALID_CREDENTIALS));
        }

        self.repository.resolve_caller(user.id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{Account, AccountType, Customer};

    fn service() -> (Arc<DuckDbRepository>, UserService) {
        let repo = Arc::new(DuckDbRepository::open_in_memory().unwrap());
        repo.ensure_schema().unwrap();
        let service = UserService::new(Arc::clone(&repo))
            .with_hash_params(Params::new(8, 1, 1, None).unwrap());
        (repo, service)
    }

    #[test]
    fn test_password_is_hashed() {
        let (repo, service) = service();
        let user = service.create_user("teller", "s3cret", Role::Admin, None).unwrap();

        let stored = repo.get_user(user.id).unwrap().unwrap();
        assert!(stored.password_hash.starts_with("$argon2id$"));
        assert!(!stored.password_hash.contains("s3cret"));
    }

    #[test]
    fn test_authenticate_admin() {
        let (_, service) = service();
        service.create_user("root", "pw", Role::Admin, None).unwrap();

        let caller = service.authenticate("root", "pw").unwrap();
        assert!(caller.is_admin());
    }

    #[test]
    fn test_wrong_password_and_unknown_user_look_the_same() {
        let (_, service) = service();
        service.create_user("root", "pw", Role::Admin, None).unwrap();

        let wrong = service.authenticate("root", "nope").unwrap_err();
        let unknown = service.authenticate("nobody", "pw").unwrap_err();
        assert!(matches!(wrong, Error::Unauthorized(_)));
        assert_eq!(wrong.to_string(), unknown.to_string());
    }

    #[test]
    fn test_customer_binding() {
        let (repo, service) = service();
        let customer = Customer::new("Alan", "Turing", "alan@example.com");
        repo.insert_customer(&customer).unwrap();
        let account = Account::open(customer.id, AccountType::Savings, Uuid::new_v4());
        repo.insert_account(&account).unwrap();

        service
            .create_user("alan", "enigma", Role::User, Some(customer.id))
            .unwrap();
        let caller = service.authenticate("alan", "enigma").unwrap();
        assert_eq!(caller.customer_id, Some(customer.id));
        assert!(caller.owned_accounts.contains(&account.id));
    }

    #[test]
    fn test_create_user_validation() {
        let (_, service) = service();
        assert!(matches!(
            service.create_user("  ", "pw", Role::User, None),
            Err(Error::Validation(_))
        ));
        assert!(matches!(
            service.create_user("bob", "pw", Role::User, Some(Uuid::new_v4())),
            Err(Error::NotFound(_))
        ));
    }

    #[test]
    fn test_register_privileged_users_requires_admin() {
        let (repo, service) = service();
        let customer = Customer::new("Ada", "Lovelace", "ada@example.com");
        repo.insert_customer(&customer).unwrap();
        let admin = Caller::admin(Uuid::new_v4());
        let user = Caller::customer(Uuid::new_v4(), customer.id, Vec::new());

        assert!(matches!(
            service.register("eve", "pw", Role::Admin, None, None),
            Err(Error::Unauthorized(_))
        ));
        assert!(matches!(
            service.register("eve", "pw", Role::User, Some(customer.id), None),
            Err(Error::Unauthorized(_))
        ));
        assert!(matches!(
            service.register("eve", "pw", Role::Admin, None, Some(&user)),
            Err(Error::Forbidden(_))
        ));
        assert!(service.list_users().unwrap().is_empty());

        service.register("carol", "pw", Role::User, None, None).unwrap();
        service
            .register("ada", "pw", Role::User, Some(customer.id), Some(&admin))
            .unwrap();
        service.register("root", "pw", Role::Admin, None, Some(&admin)).unwrap();

        let names: Vec<String> = service
            .list_users()
            .unwrap()
            .into_iter()
            .map(|u| u.username)
            .collect();
        assert_eq!(names.len(), 3);
        assert!(names.contains(&"carol".to_string()));
    }
}
