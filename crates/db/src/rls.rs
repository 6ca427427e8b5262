//! Society-scoped transactions.
//!
//! The `tenant_isolation` policies compare each row's `society_id` with the
//! `app.current_society_id` setting. Writes that touch several tables open a
//! [`SocietyTxn`], which sets it transaction-locally before anything else runs.

use sea_orm::{
    ConnectionTrait, DatabaseConnection, DatabaseTransaction, DbBackend, DbErr, Statement,
    TransactionTrait,
};
use uuid::Uuid;

/// Postgres setting the isolation policies read.
pub const SOCIETY_SETTING: &str = "app.current_society_id";

/// `set_config(.., true)` is the bindable form of `SET LOCAL`.
fn scope_statement(society_id: Uuid) -> Statement {
    Statement::from_sql_and_values(
        DbBackend::Postgres,
        "SELECT set_config($1, $2, true)",
        [SOCIETY_SETTING.into(), society_id.to_string().into()],
    )
}

/// An open transaction bound to one society. Rolls back on drop unless
/// committed.
#[derive(Debug)]
pub struct SocietyTxn {
    society_id: Uuid,
    txn: DatabaseTransaction,
}

impl SocietyTxn {
    /// Begins a transaction and scopes it to `society_id`.
    ///
    /// # Errors
    ///
    /// Fails if the transaction cannot start or the setting is rejected.
    pub async fn begin(db: &DatabaseConnection, society_id: Uuid) -> Result<Self, DbErr> {
        let txn = db.begin().await?;
        txn.execute(scope_statement(society_id)).await?;
        Ok(Self { society_id, txn })
    }

    /// Society this transaction is bound to.
    #[must_use]
    pub const fn society_id(&self) -> Uuid {
        self.society_id
    }

    /// Connection to run queries on.
    #[must_use]
    pub const fn transaction(&self) -> &DatabaseTransaction {
        &self.txn
    }

    /// Commits the transaction, persisting every write made through it.
    ///
    /// # Errors
    ///
    /// Fails if the commit fails.
    pub async fn commit(self) -> Result<(), DbErr> {
        self.txn.commit().await
    }
}

/// `db.with_rls(society_id)` on a pool.
#[async_trait::async_trait]
pub trait SocietyScoped {
    /// Opens a [`SocietyTxn`].
    async fn with_rls(&self, society_id: Uuid) -> Result<SocietyTxn, DbErr>;
}

#[async_trait::async_trait]
impl SocietyScoped for DatabaseConnection {
    async fn with_rls(&self, society_id: Uuid) -> Result<SocietyTxn, DbErr> {
        SocietyTxn::begin(self, society_id).await
    }
}
