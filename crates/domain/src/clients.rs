//! Client records owned by a salesperson.
//!
//! Mirrors the authorize-then-mutate shape of the order engine, scoped by
//! `client.owner`. Creation requires an authenticated caller, who becomes
//! the owner for the record's lifetime.

use chrono::Utc;
use common::{ClientId, SellerId};
use store::{Client, ClientStore};

use crate::access;
use crate::error::{DomainError, Result};

/// Fields supplied when registering a client.
#[derive(Debug, Clone)]
pub struct NewClient {
    pub first_name: String,
    pub last_name: String,
    pub company: String,
    pub email: String,
    pub phone: Option<String>,
}

/// Fields of a client that an update may replace. The owner is immutable.
#[derive(Debug, Clone, Default)]
pub struct ClientUpdate {
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub company: Option<String>,
    pub email: Option<String>,
    pub phone: Option<Option<String>>,
}

/// Manages client records on behalf of an authenticated seller.
#[derive(Clone)]
pub struct ClientDesk<S> {
    store: S,
}

impl<S: ClientStore> ClientDesk<S> {
    /// Creates a new desk over the given store.
    pub fn new(store: S) -> Self {
        Self { store }
    }

    /// Registers a client owned by the caller.
    ///
    /// A duplicate email fails with `AlreadyExists` and leaves no second
    /// record; the uniqueness check and the insert are a single atomic
    /// step in the store.
    #[tracing::instrument(skip(self, new))]
    pub async fn create_client(
        &self,
        caller: Option<SellerId>,
        new: NewClient,
    ) -> Result<Client> {
        let owner = caller.ok_or(DomainError::Forbidden)?;

        let client = Client {
            id: ClientId::new(),
            first_name: new.first_name,
            last_name: new.last_name,
            company: new.company,
            email: new.email,
            phone: new.phone,
            owner,
            created_at: Utc::now(),
        };
        self.store.insert_client(client.clone()).await?;

        metrics::counter!("clients_created_total").increment(1);
        tracing::info!(client_id = %client.id, "client registered");
        Ok(client)
    }

    /// Returns a client, only to its owner.
    #[tracing::instrument(skip(self))]
    pub async fn get_client(&self, caller: Option<SellerId>, id: ClientId) -> Result<Client> {
        let client = self
            .store
            .get_client(id)
            .await?
            .ok_or_else(|| DomainError::not_found("client", id))?;
        access::require_owner(client.owner, caller)?;
        Ok(client)
    }

    /// Updates a client owned by the caller.
    #[tracing::instrument(skip(self, update))]
    pub async fn update_client(
        &self,
        caller: Option<SellerId>,
        id: ClientId,
        update: ClientUpdate,
    ) -> Result<Client> {
        let mut client = self
            .store
            .get_client(id)
            .await?
            .ok_or_else(|| DomainError::not_found("client", id))?;
        access::require_owner(client.owner, caller)?;

        if let Some(first_name) = update.first_name {
            client.first_name = first_name;
        }
        if let Some(last_name) = update.last_name {
            client.last_name = last_name;
        }
        if let Some(company) = update.company {
            client.company = company;
        }
        if let Some(email) = update.email {
            client.email = email;
        }
        if let Some(phone) = update.phone {
            client.phone = phone;
        }

        self.store.update_client(client.clone()).await?;
        Ok(client)
    }

    /// Deletes a client owned by the caller.
    #[tracing::instrument(skip(self))]
    pub async fn delete_client(&self, caller: Option<SellerId>, id: ClientId) -> Result<()> {
        let client = self
            .store
            .get_client(id)
            .await?
            .ok_or_else(|| DomainError::not_found("client", id))?;
        access::require_owner(client.owner, caller)?;

        self.store.delete_client(id).await?;
        Ok(())
    }

    /// Lists the caller's clients.
    #[tracing::instrument(skip(self))]
    pub async fn list_clients(&self, caller: Option<SellerId>) -> Result<Vec<Client>> {
        let seller = caller.ok_or(DomainError::Forbidden)?;
        Ok(self.store.list_clients_for_owner(seller).await?)
    }
}
