//! Marketplace actors
//!
//! Vendors and suppliers share the same order records but own opposite
//! sides of them. Role-specific lookups go through a directory object so
//! handlers never branch on role strings.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use surrealdb::Surreal;
use surrealdb::engine::local::Db;
use surrealdb::RecordId;

use crate::db::models::Order;
use crate::db::repository::{RepoResult, SupplierRepository, VendorRepository};

/// Caller role carried in the JWT
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Vendor,
    Supplier,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Vendor => "vendor",
            Role::Supplier => "supplier",
        }
    }

    /// Table a caller record id must belong to for this role
    pub fn table(&self) -> &'static str {
        self.as_str()
    }

    /// The side of an order this role owns
    ///
    /// Suppliers advance fulfillment, vendors cancel and pay; both checks
    /// reduce to comparing the caller id against this record link.
    pub fn owning_party<'a>(&self, order: &'a Order) -> &'a RecordId {
        match self {
            Role::Vendor => &order.vendor,
            Role::Supplier => &order.supplier,
        }
    }
}

impl FromStr for Role {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "vendor" => Ok(Role::Vendor),
            "supplier" => Ok(Role::Supplier),
            other => Err(format!("Unknown role: {}", other)),
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Display fields shared by both actor kinds
#[derive(Debug, Clone, Serialize)]
pub struct ActorContact {
    pub name: String,
    pub contact: String,
}

/// Role-specific record lookup
#[async_trait]
pub trait ActorDirectory: Send + Sync {
    fn role(&self) -> Role;

    /// Resolve an actor's display name and contact by record id
    async fn find_contact(&self, id: &RecordId) -> RepoResult<Option<ActorContact>>;
}

pub struct VendorDirectory {
    repo: VendorRepository,
}

impl VendorDirectory {
    pub fn new(db: Surreal<Db>) -> Self {
        Self {
            repo: VendorRepository::new(db),
        }
    }
}

#[async_trait]
impl ActorDirectory for VendorDirectory {
    fn role(&self) -> Role {
        Role::Vendor
    }

    async fn find_contact(&self, id: &RecordId) -> RepoResult<Option<ActorContact>> {
        let vendor = self.repo.find_by_id(id).await?;
        Ok(vendor.map(|v| ActorContact {
            name: v.name,
            contact: v.contact,
        }))
    }
}

pub struct SupplierDirectory {
    repo: SupplierRepository,
}

impl SupplierDirectory {
    pub fn new(db: Surreal<Db>) -> Self {
        Self {
            repo: SupplierRepository::new(db),
        }
    }
}

#[async_trait]
impl ActorDirectory for SupplierDirectory {
    fn role(&self) -> Role {
        Role::Supplier
    }

    async fn find_contact(&self, id: &RecordId) -> RepoResult<Option<ActorContact>> {
        let supplier = self.repo.find_by_id(id).await?;
        Ok(supplier.map(|s| ActorContact {
            name: s.name,
            contact: s.contact,
        }))
    }
}

/// Directory for the given role
pub fn directory_for(role: Role, db: Surreal<Db>) -> Box<dyn ActorDirectory> {
    match role {
        Role::Vendor => Box::new(VendorDirectory::new(db)),
        Role::Supplier => Box::new(SupplierDirectory::new(db)),
    }
}
