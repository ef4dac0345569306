//! # Directory
//!
//! Suppliers and staff users.
//!
//! Supplier changes are open to any operator. User changes require an
//! acting user whose role is [`Role::Admin`].

use crate::error::{CoreError, CoreResult, ValidationError};
use crate::state::StoreState;
use crate::types::{NewSupplier, NewUser, Role, Supplier, User};
use crate::validation::{validate_new_supplier, validate_new_user};

impl StoreState {
    // =========================================================================
    // Suppliers
    // =========================================================================

    pub fn supplier(&self, id: &str) -> Option<&Supplier> {
        self.suppliers.iter().find(|s| s.id == id)
    }

    pub fn add_supplier(&mut self, id: String, draft: NewSupplier) -> CoreResult<Supplier> {
        validate_new_supplier(&draft)?;

        let supplier = Supplier {
            id,
            name: draft.name,
            contact: draft.contact,
            email: draft.email,
        };
        self.suppliers.push(supplier.clone());
        Ok(supplier)
    }

    pub fn update_supplier(&mut self, supplier: Supplier) -> CoreResult<()> {
        let index = self
            .suppliers
            .iter()
            .position(|s| s.id == supplier.id)
            .ok_or_else(|| CoreError::SupplierNotFound(supplier.id.clone()))?;

        validate_new_supplier(&NewSupplier {
            name: supplier.name.clone(),
            contact: supplier.contact.clone(),
            email: supplier.email.clone(),
        })?;

        self.suppliers[index] = supplier;
        Ok(())
    }

    pub fn delete_supplier(&mut self, id: &str) -> CoreResult<Supplier> {
        let index = self
            .suppliers
            .iter()
            .position(|s| s.id == id)
            .ok_or_else(|| CoreError::SupplierNotFound(id.to_string()))?;

        Ok(self.suppliers.remove(index))
    }

    // =========================================================================
    // Users
    // =========================================================================

    pub fn user(&self, id: &str) -> Option<&User> {
        self.users.iter().find(|u| u.id == id)
    }

    /// Looks up a user by exact username.
    pub fn user_by_username(&self, username: &str) -> Option<&User> {
        self.users.iter().find(|u| u.username == username)
    }

    /// Adds a staff account.
    ///
    /// ## Errors
    /// - `PermissionDenied` unless `actor` is an admin
    /// - `Validation` for a bad or already taken username
    pub fn add_user(&mut self, actor: &User, id: String, draft: NewUser) -> CoreResult<User> {
        ensure_can_manage(actor, "add users")?;
        validate_new_user(&draft)?;
        self.ensure_username_free(&draft.username, None)?;

        let user = User {
            id,
            username: draft.username,
            role: draft.role,
        };
        self.users.push(user.clone());
        Ok(user)
    }

    pub fn update_user(&mut self, actor: &User, user: User) -> CoreResult<()> {
        ensure_can_manage(actor, "update users")?;

        let index = self
            .users
            .iter()
            .position(|u| u.id == user.id)
            .ok_or_else(|| CoreError::UserNotFound(user.id.clone()))?;

        validate_new_user(&NewUser {
            username: user.username.clone(),
            role: user.role,
        })?;
        self.ensure_username_free(&user.username, Some(&user.id))?;

        self.users[index] = user;
        Ok(())
    }

    pub fn delete_user(&mut self, actor: &User, id: &str) -> CoreResult<User> {
        ensure_can_manage(actor, "delete users")?;

        let index = self
            .users
            .iter()
            .position(|u| u.id == id)
            .ok_or_else(|| CoreError::UserNotFound(id.to_string()))?;

        Ok(self.users.remove(index))
    }

    fn ensure_username_free(&self, username: &str, owner: Option<&str>) -> CoreResult<()> {
        let taken = self
            .users
            .iter()
            .any(|u| u.username == username && Some(u.id.as_str()) != owner);

        if taken {
            return Err(ValidationError::Duplicate {
                field: "username".to_string(),
                value: username.to_string(),
            }
            .into());
        }

        Ok(())
    }
}

fn ensure_can_manage(actor: &User, action: &str) -> CoreResult<()> {
    if actor.role.can_manage_users() {
        return Ok(());
    }

    Err(CoreError::PermissionDenied {
        username: actor.username.clone(),
        role: actor.role.to_string(),
        action: action.to_string(),
    })
}
