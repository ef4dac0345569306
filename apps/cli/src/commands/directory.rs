//! # Directory Commands
//!
//! Suppliers and staff accounts. User changes run as the configured
//! operator (`--operator` / `GROCER_OPERATOR`), and only admins may make
//! them.

use clap::{Args, Subcommand};

use super::AppContext;
use crate::error::ApiError;
use grocer_core::{NewSupplier, NewUser, Role, Supplier, User};

// =============================================================================
// Suppliers
// =============================================================================

#[derive(Debug, Subcommand)]
pub enum SupplierCommand {
    List,
    Add(SupplierArgs),
    Update {
        id: String,
        #[arg(long)]
        name: Option<String>,
        #[arg(long)]
        contact: Option<String>,
        #[arg(long)]
        email: Option<String>,
    },
    Delete {
        id: String,
    },
}

#[derive(Debug, Args)]
pub struct SupplierArgs {
    #[arg(long)]
    pub name: String,
    /// Phone number
    #[arg(long)]
    pub contact: String,
    #[arg(long)]
    pub email: String,
}

pub async fn run_suppliers(ctx: &AppContext, command: SupplierCommand) -> Result<String, ApiError> {
    match command {
        SupplierCommand::List => {
            let suppliers = ctx.store.suppliers().await;
            ctx.output(&suppliers, |s| supplier_table(s))
        }
        SupplierCommand::Add(args) => {
            let supplier = ctx
                .store
                .add_supplier(NewSupplier {
                    name: args.name,
                    contact: args.contact,
                    email: args.email,
                })
                .await?;
            ctx.output(&supplier, |s| format!("Added supplier {} ({})", s.name, s.id))
        }
        SupplierCommand::Update {
            id,
            name,
            contact,
            email,
        } => {
            let mut supplier = ctx
                .store
                .suppliers()
                .await
                .into_iter()
                .find(|s| s.id == id)
                .ok_or_else(|| ApiError::not_found("Supplier", &id))?;

            if let Some(name) = name {
                supplier.name = name;
            }
            if let Some(contact) = contact {
                supplier.contact = contact;
            }
            if let Some(email) = email {
                supplier.email = email;
            }

            ctx.store.update_supplier(supplier.clone()).await?;
            ctx.output(&supplier, |s| format!("Updated supplier {} ({})", s.name, s.id))
        }
        SupplierCommand::Delete { id } => {
            ctx.store.delete_supplier(&id).await?;
            Ok(format!("Deleted supplier {}", id))
        }
    }
}

fn supplier_table(suppliers: &[Supplier]) -> String {
    if suppliers.is_empty() {
        return "No suppliers".to_string();
    }

    let mut lines = vec![format!(
        "{:<36}  {:<24}  {:<16}  {}",
        "ID", "NAME", "CONTACT", "EMAIL"
    )];
    for s in suppliers {
        lines.push(format!(
            "{:<36}  {:<24}  {:<16}  {}",
            s.id, s.name, s.contact, s.email
        ));
    }
    lines.join("\n")
}

// =============================================================================
// Users
// =============================================================================

#[derive(Debug, Subcommand)]
pub enum UserCommand {
    List,
    Add {
        #[arg(long)]
        username: String,
        /// admin, manager or cashier
        #[arg(long, default_value = "cashier")]
        role: Role,
    },
    Update {
        id: String,
        #[arg(long)]
        username: Option<String>,
        #[arg(long)]
        role: Option<Role>,
    },
    Delete {
        id: String,
    },
}

pub async fn run_users(ctx: &AppContext, command: UserCommand) -> Result<String, ApiError> {
    let operator = ctx.config.operator.as_str();

    match command {
        UserCommand::List => {
            let users = ctx.store.users().await;
            ctx.output(&users, |u| user_table(u))
        }
        UserCommand::Add { username, role } => {
            let user = ctx
                .store
                .add_user(operator, NewUser { username, role })
                .await?;
            ctx.output(&user, |u| {
                format!("Added user {} as {} ({})", u.username, u.role, u.id)
            })
        }
        UserCommand::Update { id, username, role } => {
            let mut user = ctx
                .store
                .users()
                .await
                .into_iter()
                .find(|u| u.id == id)
                .ok_or_else(|| ApiError::not_found("User", &id))?;

            if let Some(username) = username {
                user.username = username;
            }
            if let Some(role) = role {
                user.role = role;
            }

            ctx.store.update_user(operator, user.clone()).await?;
            ctx.output(&user, |u| format!("Updated user {} ({})", u.username, u.id))
        }
        UserCommand::Delete { id } => {
            ctx.store.delete_user(operator, &id).await?;
            Ok(format!("Deleted user {}", id))
        }
    }
}

fn user_table(users: &[User]) -> String {
    let mut lines = vec![format!("{:<36}  {:<20}  {}", "ID", "USERNAME", "ROLE")];
    for u in users {
        lines.push(format!("{:<36}  {:<20}  {}", u.id, u.username, u.role));
    }
    lines.join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::commands::test_support::context;
    use crate::error::ErrorCode;
    use grocer_core::StockPolicy;

    #[tokio::test]
    async fn test_seeded_suppliers_listed() {
        let ctx = context(StockPolicy::AllowNegative).await;
        let out = run_suppliers(&ctx, SupplierCommand::List).await.unwrap();
        assert!(out.contains("Supplier A"));
        assert!(out.contains("supplierB@example.com"));
    }

    #[tokio::test]
    async fn test_supplier_add_update_delete() {
        let ctx = context(StockPolicy::AllowNegative).await;

        run_suppliers(
            &ctx,
            SupplierCommand::Add(SupplierArgs {
                name: "Fresh Farms".to_string(),
                contact: "+237600000000".to_string(),
                email: "orders@freshfarms.example".to_string(),
            }),
        )
        .await
        .unwrap();
        let id = ctx
            .store
            .suppliers()
            .await
            .into_iter()
            .find(|s| s.name == "Fresh Farms")
            .map(|s| s.id)
            .unwrap();

        run_suppliers(
            &ctx,
            SupplierCommand::Update {
                id: id.clone(),
                name: None,
                contact: Some("+237611111111".to_string()),
                email: None,
            },
        )
        .await
        .unwrap();
        let supplier = ctx
            .store
            .suppliers()
            .await
            .into_iter()
            .find(|s| s.id == id)
            .unwrap();
        assert_eq!(supplier.contact, "+237611111111");
        assert_eq!(supplier.name, "Fresh Farms");

        run_suppliers(&ctx, SupplierCommand::Delete { id: id.clone() })
            .await
            .unwrap();
        let err = run_suppliers(&ctx, SupplierCommand::Delete { id })
            .await
            .unwrap_err();
        assert_eq!(err.code, ErrorCode::NotFound);
    }

    #[tokio::test]
    async fn test_admin_operator_manages_users() {
        let ctx = context(StockPolicy::AllowNegative).await;

        let out = run_users(
            &ctx,
            UserCommand::Add {
                username: "cashier2".to_string(),
                role: Role::Cashier,
            },
        )
        .await
        .unwrap();
        assert!(out.starts_with("Added user cashier2 as cashier"));

        let list = run_users(&ctx, UserCommand::List).await.unwrap();
        assert!(list.contains("cashier2"));
        assert_eq!(ctx.store.users().await.len(), 4);
    }

    #[tokio::test]
    async fn test_cashier_operator_is_denied() {
        let mut ctx = context(StockPolicy::AllowNegative).await;
        ctx.config.operator = "cashier1".to_string();

        let err = run_users(
            &ctx,
            UserCommand::Delete {
                id: "2".to_string(),
            },
        )
        .await
        .unwrap_err();

        assert_eq!(err.code, ErrorCode::PermissionDenied);
        assert_eq!(ctx.store.users().await.len(), 3);
    }

    #[tokio::test]
    async fn test_unknown_operator_is_not_found() {
        let mut ctx = context(StockPolicy::AllowNegative).await;
        ctx.config.operator = "ghost".to_string();

        let err = run_users(
            &ctx,
            UserCommand::Add {
                username: "someone".to_string(),
                role: Role::Manager,
            },
        )
        .await
        .unwrap_err();
        assert_eq!(err.code, ErrorCode::NotFound);
    }

    #[tokio::test]
    async fn test_update_user_role() {
        let ctx = context(StockPolicy::AllowNegative).await;

        run_users(
            &ctx,
            UserCommand::Update {
                id: "3".to_string(),
                username: None,
                role: Some(Role::Manager),
            },
        )
        .await
        .unwrap();

        let user = ctx.store.user_by_username("cashier1").await.unwrap();
        assert_eq!(user.role, Role::Manager);
    }
}
