use anyhow::{Context, Result};
use std::path::PathBuf;
use std::rc::Rc;

use crate::config::Config;
use crate::db::Database;
use crate::models::{Blog, Month, Note};
use crate::remote::{HttpRemote, Offline, RemoteApi};
use crate::storage::{
    AssetStorage, Backend, BudgetStorage, ExpenseStorage, ReadingList, StockStorage, SystemClock,
    Transfer,
};

/// Every storage wrapper, wired to one set of ports.
pub(crate) struct Session {
    pub db: Rc<Database>,
    pub budgets: BudgetStorage,
    pub expenses: ExpenseStorage,
    pub assets: AssetStorage,
    pub stocks: StockStorage,
    pub blogs: ReadingList<Blog>,
    pub notes: ReadingList<Note>,
    pub transfer: Transfer,
}

impl Session {
    pub(crate) fn open(config: &Config) -> Result<Self> {
        let db_path = get_db_path(config)?;
        let db = Rc::new(
            Database::open(&db_path)
                .with_context(|| format!("Failed to open {}", db_path.display()))?,
        );
        let remote: Rc<dyn RemoteApi> = if config.offline {
            Rc::new(Offline)
        } else {
            Rc::new(HttpRemote::new(&config.api_url, config.timeout))
        };
        tracing::debug!(
            db = %db_path.display(),
            api = %config.api_url,
            offline = config.offline,
            "session opened"
        );
        Ok(Self::wire(db, remote, config.epoch))
    }

    fn wire(db: Rc<Database>, remote: Rc<dyn RemoteApi>, epoch: Month) -> Self {
        let backend = Backend::new(remote, db.clone(), Rc::new(SystemClock));
        let expenses = ExpenseStorage::new(backend.clone());
        let budgets = BudgetStorage::new(backend.clone(), Rc::new(expenses.clone()), epoch);
        let assets = AssetStorage::new(backend.clone());
        let transfer = Transfer::new(
            backend.clone(),
            budgets.clone(),
            expenses.clone(),
            assets.clone(),
        );
        Self {
            db,
            budgets,
            expenses,
            assets,
            stocks: StockStorage::new(backend.clone()),
            blogs: ReadingList::blogs(backend.clone()),
            notes: ReadingList::notes(backend),
            transfer,
        }
    }
}

fn get_db_path(config: &Config) -> Result<PathBuf> {
    let data_dir = match &config.data_dir {
        Some(dir) => dir.clone(),
        None => directories::ProjectDirs::from("com", "pocketledger", "PocketLedger")
            .ok_or_else(|| anyhow::anyhow!("Could not determine data directory"))?
            .data_dir()
            .to_path_buf(),
    };
    std::fs::create_dir_all(&data_dir)
        .with_context(|| format!("Failed to create data directory: {}", data_dir.display()))?;
    Ok(data_dir.join("pocketledger.db"))
}
